//! Row-to-word mapping shared by every word source.

use tracing::debug;

use quiz_core::Word;

use crate::error::SourceError;

/// Map one data row to a word.
///
/// Fields are positional: source, target, audio reference, note, fail count.
/// Returns `None` when any of the first three fields is missing or blank.
#[must_use]
pub fn word_from_fields<S: AsRef<str>>(fields: &[S]) -> Option<Word> {
    let field = |index: usize| fields.get(index).map_or("", |value| value.as_ref().trim());

    let word = Word::new(field(0), field(1), field(2)).ok()?;
    Some(
        word.with_note(field(3))
            .with_fail_count(parse_fail_count(field(4))),
    )
}

/// Parse the fail-count column. Anything that is not a non-negative whole
/// number becomes 0.
///
/// Spreadsheet tools store numbers as floats, so `"3.0"` is accepted as 3.
#[must_use]
pub fn parse_fail_count(raw: &str) -> u32 {
    let raw = raw.trim();
    if let Ok(count) = raw.parse::<u32>() {
        return count;
    }

    match raw.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value >= 0.0
                && value.fract() == 0.0
                && value <= f64::from(u32::MAX) =>
        {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let count = value as u32;
            count
        }
        _ => 0,
    }
}

/// Map data rows (header already removed) to words, keeping row order.
///
/// `first_line` is the 1-based line of the first data row in the source
/// document, used to report dropped rows.
///
/// # Errors
///
/// Returns `SourceError::EmptySource` if no row yields a word.
pub fn words_from_rows<I, S>(rows: I, first_line: usize) -> Result<Vec<Word>, SourceError>
where
    I: IntoIterator<Item = Vec<S>>,
    S: AsRef<str>,
{
    let (words, dropped) = map_rows(rows, first_line);
    if words.is_empty() {
        return Err(SourceError::EmptySource);
    }

    debug!(kept = words.len(), dropped = dropped.len(), "rows mapped to words");
    Ok(words)
}

/// Kept words, plus the source lines of the rows that were dropped.
fn map_rows<I, S>(rows: I, first_line: usize) -> (Vec<Word>, Vec<usize>)
where
    I: IntoIterator<Item = Vec<S>>,
    S: AsRef<str>,
{
    let mut words = Vec::new();
    let mut dropped = Vec::new();

    for (line, row) in (first_line..).zip(rows) {
        match word_from_fields(&row) {
            Some(word) => words.push(word),
            None => {
                debug!(line, "dropping row without source, target and audio");
                dropped.push(line);
            }
        }
    }
    (words, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_with_three_fields_gets_defaults() {
        let word = word_from_fields(&["Hallo", "Hola", "a.mp3"]).unwrap();
        assert_eq!(word.source(), "Hallo");
        assert_eq!(word.target(), "Hola");
        assert_eq!(word.audio_ref(), "a.mp3");
        assert_eq!(word.note(), "");
        assert_eq!(word.fail_count(), 0);
    }

    #[test]
    fn blank_leading_field_drops_row() {
        assert!(word_from_fields(&["", "Vacío", ""]).is_none());
        assert!(word_from_fields(&["Hallo", "  ", "a.mp3"]).is_none());
        assert!(word_from_fields(&["Hallo", "Hola"]).is_none());
    }

    #[test]
    fn note_and_fail_count_are_read() {
        let word = word_from_fields(&[" Haus ", "casa", "h.mp3", " noun ", "4"]).unwrap();
        assert_eq!(word.source(), "Haus");
        assert_eq!(word.note(), "noun");
        assert_eq!(word.fail_count(), 4);
    }

    #[test]
    fn malformed_fail_count_falls_back_to_zero() {
        assert_eq!(parse_fail_count(""), 0);
        assert_eq!(parse_fail_count("abc"), 0);
        assert_eq!(parse_fail_count("-2"), 0);
        assert_eq!(parse_fail_count("3.5"), 0);
        assert_eq!(parse_fail_count("NaN"), 0);
        assert_eq!(parse_fail_count("3.0"), 3);
        assert_eq!(parse_fail_count(" 7 "), 7);
    }

    #[test]
    fn scenario_second_row_is_dropped() {
        let rows = vec![
            vec!["Hallo".to_owned(), "Hola".to_owned(), "a.mp3".to_owned()],
            vec![String::new(), "Vacío".to_owned(), String::new()],
        ];
        let words = words_from_rows(rows, 2).unwrap();

        assert_eq!(words, vec![Word::new("Hallo", "Hola", "a.mp3").unwrap()]);
    }

    #[test]
    fn order_is_preserved_and_only_short_rows_drop() {
        let rows: Vec<Vec<&str>> = vec![
            vec!["a", "1", "a.mp3"],
            vec!["b", "2"],
            vec!["c", "3", "c.mp3", "", "x"],
            vec![],
            vec!["d", "4", "d.mp3", "note", "2"],
        ];
        let words = words_from_rows(rows, 2).unwrap();
        let sources: Vec<_> = words.iter().map(Word::source).collect();
        assert_eq!(sources, ["a", "c", "d"]);
    }

    #[test]
    fn no_valid_rows_is_empty_source() {
        let rows: Vec<Vec<&str>> = vec![vec!["", "", ""], vec!["only"]];
        assert!(matches!(words_from_rows(rows, 2), Err(SourceError::EmptySource)));
    }

    #[test]
    fn dropped_rows_are_reported_by_source_line() {
        let rows: Vec<Vec<&str>> = vec![
            vec!["a", "1", "a.mp3"],
            vec!["", "2", ""],
            vec!["c", "3", "c.mp3"],
            vec!["d"],
        ];
        let (words, dropped) = map_rows(rows, 5);
        assert_eq!(words.len(), 2);
        assert_eq!(dropped, [6, 8]);
    }
}

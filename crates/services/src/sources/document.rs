use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use tracing::info;

use quiz_core::Word;

use super::rows::words_from_rows;
use crate::error::SourceError;

/// Load words from the first sheet of a spreadsheet file.
///
/// The container format (xlsx, xls, xlsb, ods) is detected from the bytes.
/// Row 0 is the header and is skipped.
///
/// # Errors
///
/// Returns `SourceError::MalformedDocument` if the buffer is empty, is not a
/// readable spreadsheet or has no sheets, and `SourceError::EmptySource` if no
/// row is usable.
pub fn load_from_document(bytes: &[u8]) -> Result<Vec<Word>, SourceError> {
    if bytes.is_empty() {
        return Err(SourceError::MalformedDocument("file is empty".into()));
    }

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| SourceError::MalformedDocument(err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SourceError::MalformedDocument("workbook contains no sheets".into()))?
        .map_err(|err| SourceError::MalformedDocument(err.to_string()))?;

    // The range starts at the first used cell, so a blank header row or
    // leading blank columns are not part of it.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let header_rows = usize::from(start_row == 0);
    let leading_blanks = usize::try_from(start_col).unwrap_or(0);

    let rows = range.rows().skip(header_rows).map(|cells| {
        let mut fields = vec![String::new(); leading_blanks];
        fields.extend(cells.iter().map(cell_text));
        fields
    });

    let first_line = usize::try_from(start_row).unwrap_or(0) + header_rows + 1;
    let words = words_from_rows(rows, first_line)?;
    info!(words = words.len(), "loaded words from document");
    Ok(words)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        other => other.to_string(),
    }
}

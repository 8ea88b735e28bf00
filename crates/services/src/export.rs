use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::info;

use quiz_core::Word;

use crate::config::ExportColumns;
use crate::error::ExportError;

// Rows past this do not fit in an xlsx sheet.
const MAX_DATA_ROWS: usize = 1_048_575;

/// Render `words` as a single-sheet xlsx workbook.
///
/// The header row holds the labels from `columns`; each word follows on its
/// own row with the fail count written as a number. Column widths fit the
/// longest value in the column plus two characters.
///
/// # Errors
///
/// Returns `ExportError::TooManyRows` if `words` does not fit in one sheet and
/// `ExportError::Xlsx` if the workbook cannot be written.
pub fn export_workbook(words: &[Word], columns: &ExportColumns) -> Result<Vec<u8>, ExportError> {
    if words.len() > MAX_DATA_ROWS {
        return Err(ExportError::TooManyRows(words.len()));
    }

    let header = columns.header();
    let mut widths = header.map(|label| label.chars().count());

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(&columns.sheet_name)?;

    for (col, label) in (0_u16..).zip(header) {
        sheet.write_string(0, col, label)?;
    }

    for (row, word) in (1_u32..).zip(words) {
        let text_cells = [word.source(), word.target(), word.audio_ref(), word.note()];
        for (col, value) in (0_u16..).zip(text_cells) {
            if !value.is_empty() {
                sheet.write_string(row, col, value)?;
            }
        }
        sheet.write_number(row, 4, f64::from(word.fail_count()))?;

        for (width, value) in widths.iter_mut().zip(text_cells) {
            *width = (*width).max(value.chars().count());
        }
        widths[4] = widths[4].max(word.fail_count().to_string().len());
    }

    for (col, width) in (0_u16..).zip(widths) {
        #[allow(clippy::cast_precision_loss)]
        sheet.set_column_width(col, (width + 2) as f64)?;
    }

    let bytes = workbook.save_to_buffer()?;
    info!(words = words.len(), bytes = bytes.len(), "exported word list");
    Ok(bytes)
}

/// Export `words` and write the workbook to `path`, replacing any existing file.
///
/// # Errors
///
/// Same as [`export_workbook`], plus `ExportError::Io` if the file cannot be written.
pub fn write_workbook(
    path: &Path,
    words: &[Word],
    columns: &ExportColumns,
) -> Result<(), ExportError> {
    let bytes = export_workbook(words, columns)?;
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), "wrote updated word list");
    Ok(())
}

//! Word source adapters: a published Google Sheet or an uploaded spreadsheet file.

mod document;
mod remote;
mod rows;

pub use document::load_from_document;
pub use remote::{HttpSheetFetcher, RemoteSheetSource, SheetFetcher, SheetId, parse_csv_rows};
pub use rows::{parse_fail_count, word_from_fields, words_from_rows};

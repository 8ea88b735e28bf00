//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::SessionError;

/// Errors emitted by the word source adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("invalid Google Sheet URL: could not find the sheet id")]
    InvalidSourceReference,
    #[error("failed to fetch sheet (status {status}); make sure it is published to the web")]
    SourceUnavailable { status: reqwest::StatusCode },
    #[error("could not read the spreadsheet: {0}")]
    MalformedDocument(String),
    #[error("no valid rows found; each row needs at least source, target and audio URL")]
    EmptySource,
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Errors emitted while writing the updated word list.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("too many words to export: {0}")]
    TooManyRows(usize),
    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors emitted while reading `QuizConfig`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors emitted by `QuizController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ControllerError {
    #[error("no quiz is running")]
    NoActiveSession,
    #[error("there are no failed words to review")]
    NothingToReview,
    #[error("results are not available yet")]
    NotInResults,
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod sources;

pub use quiz_core::Clock;

pub use config::{ExportColumns, QuizConfig, RevealPacing};
pub use controller::{AppPhase, AppSnapshot, QuizController, ResultsSnapshot, RoundSnapshot};
pub use error::{ConfigError, ControllerError, ExportError, SourceError};
pub use export::{export_workbook, write_workbook};
pub use sources::{HttpSheetFetcher, RemoteSheetSource, SheetFetcher, SheetId, load_from_document};

//! Application flow: setup, playing and results, on top of the session engine.

mod quiz;
mod state;

pub use quiz::{QuizController, begin_review};
pub use state::{AppPhase, AppSnapshot, ApplicationState, ResultsSnapshot, RoundSnapshot};

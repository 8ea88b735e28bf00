#![forbid(unsafe_code)]

pub mod error;
pub mod merge;
pub mod model;
pub mod session;
pub mod time;

pub use error::SessionError;
pub use merge::{merge_session_result, merge_updates};
pub use model::{PerformanceTier, SessionResult, Word, WordError, WordKey};
pub use session::{AnswerOutcome, Session, SessionState};
pub use time::Clock;

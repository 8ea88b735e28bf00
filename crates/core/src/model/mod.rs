mod session;
mod word;

pub use session::{PerformanceTier, SessionResult, SessionResultError};
pub use word::{Word, WordError, WordKey};

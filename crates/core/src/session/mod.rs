mod answer;
mod engine;

pub use answer::{AnswerOutcome, is_correct};
pub use engine::{RoundResult, Session, SessionState, SessionWord};

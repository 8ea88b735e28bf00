use thiserror::Error;

use crate::model::SessionResultError;

/// Misuse of the session state machine.
///
/// Every variant except `Empty` means the caller drove the session out of
/// order; callers should treat them as bugs rather than user-facing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no words available for session")]
    Empty,

    #[error("current round was already evaluated")]
    AlreadyEvaluated,

    #[error("session has no active word")]
    NoActiveWord,

    #[error("no evaluated round waiting to advance")]
    NoPendingReveal,

    #[error("session is not complete ({answered} of {total} rounds answered)")]
    SessionNotComplete { answered: usize, total: usize },

    #[error(transparent)]
    Result(#[from] SessionResultError),
}

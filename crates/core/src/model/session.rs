use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::model::Word;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionResultError {
    #[error("score ({score}) plus failed words ({failed}) does not match total ({total})")]
    CountMismatch {
        score: usize,
        failed: usize,
        total: usize,
    },
}

//
// ─── PERFORMANCE TIER ──────────────────────────────────────────────────────────
//

/// Coarse rating of a finished session, derived from accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceTier {
    /// 90% or better.
    Excellent,
    /// 70% to 89%.
    Great,
    /// 50% to 69%.
    Good,
    /// Below 50%.
    KeepTrying,
}

impl PerformanceTier {
    #[must_use]
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            90.. => Self::Excellent,
            70..=89 => Self::Great,
            50..=69 => Self::Good,
            _ => Self::KeepTrying,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent work! You're a vocabulary master!",
            Self::Great => "Great job! Keep practicing to get even better.",
            Self::Good => "Good effort! A little more practice will make a big difference.",
            Self::KeepTrying => "Keep trying! Every attempt is a step forward.",
        }
    }
}

//
// ─── SESSION RESULT ────────────────────────────────────────────────────────────
//

/// Outcome of a completed session.
///
/// `final_working_set` carries the updated fail counters that the controller
/// merges back into the master list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    score: usize,
    failed_words: Vec<Word>,
    final_working_set: Vec<Word>,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl SessionResult {
    /// Assemble a result from its parts, checking the session accounting.
    ///
    /// # Errors
    ///
    /// Returns `SessionResultError::CountMismatch` if `score + failed_words` is not the
    /// size of the working set.
    pub fn from_parts(
        score: usize,
        failed_words: Vec<Word>,
        final_working_set: Vec<Word>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SessionResultError> {
        let total = final_working_set.len();
        if score.saturating_add(failed_words.len()) != total {
            return Err(SessionResultError::CountMismatch {
                score,
                failed: failed_words.len(),
                total,
            });
        }

        Ok(Self {
            score,
            failed_words,
            final_working_set,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total_words(&self) -> usize {
        self.final_working_set.len()
    }

    #[must_use]
    pub fn failed_words(&self) -> &[Word] {
        &self.failed_words
    }

    #[must_use]
    pub fn final_working_set(&self) -> &[Word] {
        &self.final_working_set
    }

    /// Wall-clock time from start to completion. Zero if the clock stepped back.
    #[must_use]
    pub fn duration(&self) -> Duration {
        (self.completed_at - self.started_at).max(Duration::zero())
    }

    /// Correct answers as a whole percentage, rounded half up. Zero for an empty session.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        let total = self.total_words();
        if total == 0 {
            return 0;
        }
        let percent = (self.score * 200 + total) / (total * 2);
        u32::try_from(percent).unwrap_or(100)
    }

    #[must_use]
    pub fn performance(&self) -> PerformanceTier {
        PerformanceTier::from_percent(self.accuracy_percent())
    }
}

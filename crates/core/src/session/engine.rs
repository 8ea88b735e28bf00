use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use super::answer::{AnswerOutcome, is_correct};
use crate::error::SessionError;
use crate::model::{SessionResult, Word};

//
// ─── ROUND STATE ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundResult {
    Correct,
    Incorrect,
}

/// A word inside a running session, annotated with the result of its round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionWord {
    word: Word,
    result: Option<RoundResult>,
}

impl SessionWord {
    fn new(word: Word) -> Self {
        Self { word, result: None }
    }

    #[must_use]
    pub fn word(&self) -> &Word {
        &self.word
    }

    #[must_use]
    pub fn result(&self) -> Option<RoundResult> {
        self.result
    }
}

/// Where the session is in its round cycle.
///
/// `InRound` waits for an answer, `RoundEvaluated` holds the outcome until the
/// caller advances, `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InRound,
    RoundEvaluated,
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One pass through a shuffled snapshot of words.
///
/// Evaluation and advancing are separate steps: `submit_answer` consumes the
/// round and records its outcome, `advance` moves on once the caller is done
/// revealing it. The working set is fixed at `start`.
pub struct Session {
    working_set: Vec<SessionWord>,
    position: usize,
    score: usize,
    failed_this_session: Vec<Word>,
    state: SessionState,
    pending: Option<AnswerOutcome>,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Start a session over a uniformly shuffled copy of `words`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `words` is empty.
    pub fn start<R: Rng + ?Sized>(
        words: Vec<Word>,
        rng: &mut R,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if words.is_empty() {
            return Err(SessionError::Empty);
        }

        let mut working_set: Vec<SessionWord> = words.into_iter().map(SessionWord::new).collect();
        working_set.shuffle(rng);

        Ok(Self {
            working_set,
            position: 0,
            score: 0,
            failed_this_session: Vec::new(),
            state: SessionState::InRound,
            pending: None,
            started_at,
        })
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.working_set.len()
    }

    #[must_use]
    pub fn working_set(&self) -> &[SessionWord] {
        &self.working_set
    }

    #[must_use]
    pub fn failed_words(&self) -> &[Word] {
        &self.failed_this_session
    }

    /// Every round has been evaluated.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.working_set.len()
    }

    /// 1-based number of the round on screen. While a reveal is pending this is
    /// the round just evaluated.
    #[must_use]
    pub fn round_number(&self) -> usize {
        match self.state {
            SessionState::InRound => self.position + 1,
            SessionState::RoundEvaluated | SessionState::Finished => self.position,
        }
    }

    /// Word at `position`, or `None` once the session is exhausted.
    #[must_use]
    pub fn current_word(&self) -> Option<&Word> {
        self.working_set.get(self.position).map(SessionWord::word)
    }

    /// The word evaluated last and its outcome, while waiting for `advance`.
    #[must_use]
    pub fn revealed(&self) -> Option<(&Word, &AnswerOutcome)> {
        let outcome = self.pending.as_ref()?;
        let index = self.position.checked_sub(1)?;
        self.working_set.get(index).map(|entry| (&entry.word, outcome))
    }

    /// Evaluate `raw_input` against the current word and consume the round.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyEvaluated` if the previous outcome has not been advanced past.
    /// Returns `SessionError::NoActiveWord` if the session is exhausted.
    pub fn submit_answer(&mut self, raw_input: &str) -> Result<AnswerOutcome, SessionError> {
        match self.state {
            SessionState::RoundEvaluated => return Err(SessionError::AlreadyEvaluated),
            SessionState::Finished => return Err(SessionError::NoActiveWord),
            SessionState::InRound => {}
        }

        let Some(entry) = self.working_set.get_mut(self.position) else {
            return Err(SessionError::NoActiveWord);
        };

        let outcome = if is_correct(raw_input, entry.word.target()) {
            entry.result = Some(RoundResult::Correct);
            self.score += 1;
            AnswerOutcome::Correct
        } else {
            entry.word.record_failure();
            entry.result = Some(RoundResult::Incorrect);
            self.failed_this_session.push(entry.word.clone());
            AnswerOutcome::Incorrect {
                expected: entry.word.target().to_owned(),
            }
        };

        self.position += 1;
        self.state = SessionState::RoundEvaluated;
        self.pending = Some(outcome.clone());
        Ok(outcome)
    }

    /// Leave the reveal of the last evaluated round.
    ///
    /// Returns the new state: `InRound` if words remain, otherwise `Finished`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoPendingReveal` unless the session is in `RoundEvaluated`.
    pub fn advance(&mut self) -> Result<SessionState, SessionError> {
        if self.state != SessionState::RoundEvaluated {
            return Err(SessionError::NoPendingReveal);
        }

        self.pending = None;
        self.state = if self.is_exhausted() {
            SessionState::Finished
        } else {
            SessionState::InRound
        };
        Ok(self.state)
    }

    /// Build the end-of-session result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionNotComplete` if rounds remain unanswered.
    pub fn finish(&self, completed_at: DateTime<Utc>) -> Result<SessionResult, SessionError> {
        if !self.is_exhausted() {
            return Err(SessionError::SessionNotComplete {
                answered: self.position,
                total: self.total(),
            });
        }

        let final_working_set = self
            .working_set
            .iter()
            .map(|entry| entry.word.clone())
            .collect();

        Ok(SessionResult::from_parts(
            self.score,
            self.failed_this_session.clone(),
            final_working_set,
            self.started_at,
            completed_at,
        )?)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("words_len", &self.working_set.len())
            .field("position", &self.position)
            .field("score", &self.score)
            .field("failed_len", &self.failed_this_session.len())
            .field("state", &self.state)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

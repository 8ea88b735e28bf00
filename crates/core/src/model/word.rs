use std::fmt;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordError {
    #[error("source term cannot be empty")]
    EmptySource,

    #[error("target translation cannot be empty")]
    EmptyTarget,

    #[error("audio reference cannot be empty")]
    EmptyAudioRef,
}

//
// ─── IDENTITY ──────────────────────────────────────────────────────────────────
//

/// Merge identity of a word: the `(source, target)` pair.
///
/// The fail counter is not part of the key: it is the only field that changes
/// while a word lives in the master list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WordKey {
    pub source: String,
    pub target: String,
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source, self.target)
    }
}

//
// ─── WORD ──────────────────────────────────────────────────────────────────────
//

/// A single vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    source: String,
    target: String,
    audio_ref: String,
    note: String,
    fail_count: u32,
}

impl Word {
    /// Build a word from its three required fields.
    ///
    /// Fields are stored trimmed. `note` defaults to empty and `fail_count` to 0.
    ///
    /// # Errors
    ///
    /// Returns `WordError` if any required field is empty after trimming.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        audio_ref: impl Into<String>,
    ) -> Result<Self, WordError> {
        let source = trimmed(source.into());
        let target = trimmed(target.into());
        let audio_ref = trimmed(audio_ref.into());

        if source.is_empty() {
            return Err(WordError::EmptySource);
        }
        if target.is_empty() {
            return Err(WordError::EmptyTarget);
        }
        if audio_ref.is_empty() {
            return Err(WordError::EmptyAudioRef);
        }

        Ok(Self {
            source,
            target,
            audio_ref,
            note: String::new(),
            fail_count: 0,
        })
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = trimmed(note.into());
        self
    }

    #[must_use]
    pub fn with_fail_count(mut self, fail_count: u32) -> Self {
        self.fail_count = fail_count;
        self
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn audio_ref(&self) -> &str {
        &self.audio_ref
    }

    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    #[must_use]
    pub fn fail_count(&self) -> u32 {
        self.fail_count
    }

    #[must_use]
    pub fn key(&self) -> WordKey {
        WordKey {
            source: self.source.clone(),
            target: self.target.clone(),
        }
    }

    /// Returns true if `other` has the same `(source, target)` identity.
    #[must_use]
    pub fn same_identity(&self, other: &Word) -> bool {
        self.source == other.source && self.target == other.target
    }

    pub(crate) fn record_failure(&mut self) {
        self.fail_count = self.fail_count.saturating_add(1);
    }
}

fn trimmed(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_owned()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

/// Returns true if `raw_input` matches `expected`.
///
/// The input is trimmed and both sides are lowercased before an exact
/// comparison. Inner whitespace and accents are significant.
#[must_use]
pub fn is_correct(raw_input: &str, expected: &str) -> bool {
    raw_input.trim().to_lowercase() == expected.to_lowercase()
}

/// Result of evaluating one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    /// Carries the expected answer so it can be revealed to the user.
    Incorrect { expected: String },
}

impl AnswerOutcome {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

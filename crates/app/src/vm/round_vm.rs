use quiz_core::AnswerOutcome;
use quiz_services::RoundSnapshot;

/// Shown instead of the source word until the user asks for it.
pub const HIDDEN_PROMPT: &str = "? ? ?";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundVm {
    pub progress: String,
    pub prompt: String,
    pub score: usize,
    pub feedback: Option<String>,
}

impl RoundVm {
    /// Build the round view. The source word is shown once the user asked for
    /// it or the answer has been evaluated.
    #[must_use]
    pub fn new(round: &RoundSnapshot, prompt_visible: bool) -> Self {
        let prompt = if prompt_visible || round.outcome.is_some() {
            round.source.clone()
        } else {
            HIDDEN_PROMPT.to_owned()
        };

        Self {
            progress: format!("{} / {}", round.number, round.total),
            prompt,
            score: round.score,
            feedback: round.outcome.as_ref().map(feedback_text),
        }
    }
}

fn feedback_text(outcome: &AnswerOutcome) -> String {
    match outcome {
        AnswerOutcome::Correct => "Correct!".to_owned(),
        AnswerOutcome::Incorrect { expected } => format!("Correct answer: {expected}"),
    }
}

use quiz_services::ResultsSnapshot;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub score_line: String,
    pub accuracy: String,
    pub elapsed: String,
    pub message: &'static str,
    pub failed: Vec<String>,
    pub review_label: Option<String>,
}

impl From<&ResultsSnapshot> for ResultsVm {
    fn from(results: &ResultsSnapshot) -> Self {
        Self {
            score_line: format!("Correct Answers: {} / {}", results.score, results.total),
            accuracy: format!("{}%", results.accuracy_percent),
            elapsed: format_elapsed(results.elapsed_secs),
            message: results.tier.message(),
            failed: results.failed.iter().map(ToString::to_string).collect(),
            review_label: review_label(results.failed.len()),
        }
    }
}

#[must_use]
pub fn format_elapsed(secs: u64) -> String {
    match (secs / 60, secs % 60) {
        (0, secs) => format!("{secs}s"),
        (mins, secs) => format!("{mins}m {secs:02}s"),
    }
}

/// Label of the review action, or `None` when there is nothing to review.
#[must_use]
pub fn review_label(failed: usize) -> Option<String> {
    match failed {
        0 => None,
        1 => Some("Review 1 Failed Word".to_owned()),
        n => Some(format!("Review {n} Failed Words")),
    }
}

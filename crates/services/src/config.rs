use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use quiz_core::AnswerOutcome;

use crate::error::ConfigError;

pub const DEFAULT_EXPORT_BASE_URL: &str = "https://docs.google.com";

/// Runtime knobs for the quiz.
///
/// Every field has a default, so a config file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Scheme and host serving the `/spreadsheets/d/{id}/gviz/tq` CSV export.
    pub export_base_url: String,
    pub reveal: RevealPacing,
    pub export: ExportColumns,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            export_base_url: DEFAULT_EXPORT_BASE_URL.to_owned(),
            reveal: RevealPacing::default(),
            export: ExportColumns::default(),
        }
    }
}

impl QuizConfig {
    /// Parse a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if the document is not valid JSON or has wrong types.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, `ConfigError::Json` if it cannot be parsed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

/// Pause after an evaluated answer before moving to the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RevealPacing {
    pub correct_ms: u64,
    /// Longer so the revealed answer can be read.
    pub incorrect_ms: u64,
}

impl Default for RevealPacing {
    fn default() -> Self {
        Self {
            correct_ms: 1000,
            incorrect_ms: 1500,
        }
    }
}

impl RevealPacing {
    #[must_use]
    pub fn delay_for(&self, outcome: &AnswerOutcome) -> Duration {
        let millis = if outcome.is_correct() {
            self.correct_ms
        } else {
            self.incorrect_ms
        };
        Duration::from_millis(millis)
    }
}

/// Human-facing labels of the exported workbook. Column order is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportColumns {
    pub sheet_name: String,
    pub file_name: String,
    pub source_label: String,
    pub target_label: String,
    pub audio_ref_label: String,
    pub note_label: String,
    pub fail_count_label: String,
}

impl Default for ExportColumns {
    fn default() -> Self {
        Self {
            sheet_name: "Updated Vocabulary".into(),
            file_name: "vocabulary_updated.xlsx".into(),
            source_label: "Source".into(),
            target_label: "Target".into(),
            audio_ref_label: "Audio URL".into(),
            note_label: "Notes".into(),
            fail_count_label: "Times Failed".into(),
        }
    }
}

impl ExportColumns {
    /// Header labels in export column order.
    #[must_use]
    pub fn header(&self) -> [&str; 5] {
        [
            self.source_label.as_str(),
            self.target_label.as_str(),
            self.audio_ref_label.as_str(),
            self.note_label.as_str(),
            self.fail_count_label.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = QuizConfig::from_json(
            r#"{ "reveal": { "incorrect_ms": 2500 }, "export": { "note_label": "Notas" } }"#,
        )
        .unwrap();

        assert_eq!(config.export_base_url, DEFAULT_EXPORT_BASE_URL);
        assert_eq!(config.reveal.correct_ms, 1000);
        assert_eq!(config.reveal.incorrect_ms, 2500);
        assert_eq!(config.export.header()[3], "Notas");
        assert_eq!(config.export.sheet_name, "Updated Vocabulary");
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = QuizConfig::from_json(r#"{ "reveal": { "correct_ms": "fast" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn incorrect_answers_pause_longer() {
        let pacing = RevealPacing::default();
        let wrong = AnswerOutcome::Incorrect {
            expected: "Hola".into(),
        };
        assert_eq!(pacing.delay_for(&AnswerOutcome::Correct), Duration::from_secs(1));
        assert_eq!(pacing.delay_for(&wrong), Duration::from_millis(1500));
    }
}

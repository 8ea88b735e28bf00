use quiz_core::{AnswerOutcome, PerformanceTier, Session, SessionResult, SessionState, Word, WordKey};

/// Screen the application is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppPhase {
    #[default]
    Setup,
    Playing,
    Results,
}

/// Everything the controller owns. `Default` is the fresh state a restart returns to.
#[derive(Debug, Default)]
pub struct ApplicationState {
    pub phase: AppPhase,
    pub master: Vec<Word>,
    pub session: Option<Session>,
    pub last_result: Option<SessionResult>,
    /// User-facing message of the last failed load.
    pub last_error: Option<String>,
}

impl ApplicationState {
    #[must_use]
    pub fn snapshot(&self) -> AppSnapshot {
        let round = match self.phase {
            AppPhase::Playing => self.session.as_ref().and_then(RoundSnapshot::of),
            AppPhase::Setup | AppPhase::Results => None,
        };
        let results = match self.phase {
            AppPhase::Results => self.last_result.as_ref().map(ResultsSnapshot::of),
            AppPhase::Setup | AppPhase::Playing => None,
        };

        AppSnapshot {
            phase: self.phase,
            master_len: self.master.len(),
            round,
            results,
            last_error: self.last_error.clone(),
        }
    }
}

//
// ─── SNAPSHOTS ─────────────────────────────────────────────────────────────────
//

/// Owned, read-only view of the application for presentation layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSnapshot {
    pub phase: AppPhase,
    pub master_len: usize,
    pub round: Option<RoundSnapshot>,
    pub results: Option<ResultsSnapshot>,
    pub last_error: Option<String>,
}

/// The round on screen. While an answer is being revealed, `outcome` is set
/// and the word is the one just evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSnapshot {
    pub number: usize,
    pub total: usize,
    pub score: usize,
    pub source: String,
    pub audio_ref: String,
    pub outcome: Option<AnswerOutcome>,
}

impl RoundSnapshot {
    fn of(session: &Session) -> Option<Self> {
        let (word, outcome) = match session.state() {
            SessionState::InRound => (session.current_word()?, None),
            SessionState::RoundEvaluated => {
                let (word, outcome) = session.revealed()?;
                (word, Some(outcome.clone()))
            }
            SessionState::Finished => return None,
        };

        Some(Self {
            number: session.round_number(),
            total: session.total(),
            score: session.score(),
            source: word.source().to_owned(),
            audio_ref: word.audio_ref().to_owned(),
            outcome,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsSnapshot {
    pub score: usize,
    pub total: usize,
    pub accuracy_percent: u32,
    pub tier: PerformanceTier,
    pub elapsed_secs: u64,
    pub failed: Vec<WordKey>,
}

impl ResultsSnapshot {
    fn of(result: &SessionResult) -> Self {
        Self {
            score: result.score(),
            total: result.total_words(),
            accuracy_percent: result.accuracy_percent(),
            tier: result.performance(),
            elapsed_secs: elapsed_secs(result),
            failed: result.failed_words().iter().map(Word::key).collect(),
        }
    }
}

fn elapsed_secs(result: &SessionResult) -> u64 {
    u64::try_from(result.duration().num_seconds()).unwrap_or(0)
}

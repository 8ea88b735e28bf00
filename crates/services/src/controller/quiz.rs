use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tracing::{error, info, warn};

use quiz_core::{
    AnswerOutcome, Clock, Session, SessionError, SessionResult, SessionState, Word,
    merge_session_result,
};

use super::state::{AppPhase, AppSnapshot, ApplicationState};
use crate::config::{ExportColumns, QuizConfig};
use crate::error::{ControllerError, SourceError};
use crate::export::export_workbook;
use crate::sources::{self, HttpSheetFetcher, RemoteSheetSource, SheetFetcher};

/// Start a session over exactly the words failed in the previous one.
///
/// # Errors
///
/// Returns `ControllerError::NothingToReview` if `failed` is empty.
pub fn begin_review<R: Rng + ?Sized>(
    failed: Vec<Word>,
    rng: &mut R,
    started_at: DateTime<Utc>,
) -> Result<Session, ControllerError> {
    if failed.is_empty() {
        return Err(ControllerError::NothingToReview);
    }
    Ok(Session::start(failed, rng, started_at)?)
}

/// Drives the quiz: loading, rounds, results, review and export.
///
/// Every transition runs to completion on `&mut self`; observers get the
/// resulting [`AppSnapshot`] through [`QuizController::subscribe`].
pub struct QuizController {
    state: ApplicationState,
    remote: RemoteSheetSource,
    export: ExportColumns,
    clock: Clock,
    rng: StdRng,
    snapshots: watch::Sender<AppSnapshot>,
}

impl QuizController {
    #[must_use]
    pub fn new(config: &QuizConfig) -> Self {
        let fetcher = HttpSheetFetcher::new(config.export_base_url.clone());
        let (snapshots, _) = watch::channel(AppSnapshot::default());
        Self {
            state: ApplicationState::default(),
            remote: RemoteSheetSource::new(Arc::new(fetcher)),
            export: config.export.clone(),
            clock: Clock::default(),
            rng: StdRng::from_os_rng(),
            snapshots,
        }
    }

    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn SheetFetcher>) -> Self {
        self.remote = RemoteSheetSource::new(fetcher);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Shuffle deterministically.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ─── Queries ───────────────────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> AppPhase {
        self.state.phase
    }

    #[must_use]
    pub fn master_list(&self) -> &[Word] {
        &self.state.master
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.state.session.as_ref()
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&SessionResult> {
        self.state.last_result.as_ref()
    }

    #[must_use]
    pub fn export_columns(&self) -> &ExportColumns {
        &self.export
    }

    #[must_use]
    pub fn snapshot(&self) -> AppSnapshot {
        self.state.snapshot()
    }

    /// Receive a fresh snapshot after every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.snapshots.subscribe()
    }

    // ─── Loading ───────────────────────────────────────────────────────────────

    /// Load the master list from a published Google Sheet and start a quiz over it.
    ///
    /// Returns the number of words loaded.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Source` if the sheet cannot be loaded. The
    /// previous state is kept and only `last_error` changes.
    pub async fn load_from_remote(&mut self, url: &str) -> Result<usize, ControllerError> {
        let loaded = self.remote.load_from_remote(url).await;
        self.apply_load(loaded)
    }

    /// Load the master list from spreadsheet bytes and start a quiz over it.
    ///
    /// # Errors
    ///
    /// Same as [`QuizController::load_from_remote`].
    pub fn load_from_document(&mut self, bytes: &[u8]) -> Result<usize, ControllerError> {
        let loaded = sources::load_from_document(bytes);
        self.apply_load(loaded)
    }

    fn apply_load(
        &mut self,
        loaded: Result<Vec<Word>, SourceError>,
    ) -> Result<usize, ControllerError> {
        let words = match loaded {
            Ok(words) => words,
            Err(err) => {
                warn!(error = %err, "word source failed");
                self.state.last_error = Some(err.to_string());
                self.publish();
                return Err(err.into());
            }
        };

        let session = guard(Session::start(
            words.clone(),
            &mut self.rng,
            self.clock.now(),
        ))?;
        let count = words.len();
        self.state = ApplicationState {
            phase: AppPhase::Playing,
            master: words,
            session: Some(session),
            last_result: None,
            last_error: None,
        };
        info!(words = count, "quiz started");
        self.publish();
        Ok(count)
    }

    // ─── Rounds ────────────────────────────────────────────────────────────────

    /// Evaluate an answer for the current round.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NoActiveSession` outside of a quiz and
    /// `ControllerError::Session` if the round was already evaluated.
    pub fn submit_answer(&mut self, raw_input: &str) -> Result<AnswerOutcome, ControllerError> {
        let session = self.active_session()?;
        let outcome = guard(session.submit_answer(raw_input))?;
        self.publish();
        Ok(outcome)
    }

    /// Move past the revealed answer. After the last round the result is
    /// merged into the master list and the phase becomes `Results`.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NoActiveSession` outside of a quiz and
    /// `ControllerError::Session` if no answer is being revealed.
    pub fn advance(&mut self) -> Result<AppPhase, ControllerError> {
        let session = self.active_session()?;
        if guard(session.advance())? == SessionState::Finished {
            self.complete_session()?;
        }
        self.publish();
        Ok(self.state.phase)
    }

    fn complete_session(&mut self) -> Result<(), ControllerError> {
        let Some(session) = self.state.session.as_ref() else {
            return Err(ControllerError::NoActiveSession);
        };
        let result = guard(session.finish(self.clock.now()))?;

        self.state.master = merge_session_result(&self.state.master, &result);
        info!(
            score = result.score(),
            total = result.total_words(),
            failed = result.failed_words().len(),
            elapsed_ms = result.duration().num_milliseconds(),
            "session finished"
        );
        self.state.session = None;
        self.state.last_result = Some(result);
        self.state.phase = AppPhase::Results;
        Ok(())
    }

    fn active_session(&mut self) -> Result<&mut Session, ControllerError> {
        match self.state.session.as_mut() {
            Some(session) if self.state.phase == AppPhase::Playing => Ok(session),
            _ => {
                error!(phase = ?self.state.phase, "no quiz is running");
                Err(ControllerError::NoActiveSession)
            }
        }
    }

    // ─── Results ───────────────────────────────────────────────────────────────

    /// Start a review session over the words failed in the last quiz.
    ///
    /// Returns the number of words under review.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NotInResults` unless results are shown and
    /// `ControllerError::NothingToReview` if nothing was failed.
    pub fn begin_review(&mut self) -> Result<usize, ControllerError> {
        let failed = match (&self.state.phase, &self.state.last_result) {
            (AppPhase::Results, Some(result)) => result.failed_words().to_vec(),
            _ => return Err(ControllerError::NotInResults),
        };

        let session = begin_review(failed, &mut self.rng, self.clock.now())?;
        let count = session.total();
        self.state.session = Some(session);
        self.state.last_result = None;
        self.state.phase = AppPhase::Playing;
        info!(words = count, "review started");
        self.publish();
        Ok(count)
    }

    /// Drop everything and return to setup.
    pub fn restart(&mut self) {
        self.state = ApplicationState::default();
        info!("quiz reset");
        self.publish();
    }

    /// Render the master list, with updated fail counts, as an xlsx workbook.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Export` if the workbook cannot be written.
    pub fn export_master_list(&self) -> Result<Vec<u8>, ControllerError> {
        Ok(export_workbook(&self.state.master, &self.export)?)
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.snapshot());
    }
}

fn guard<T>(result: Result<T, SessionError>) -> Result<T, ControllerError> {
    result.map_err(|err| {
        error!(error = %err, "session state misuse");
        ControllerError::Session(err)
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use quiz_core::time::fixed_now;

    use super::*;
    use crate::sources::SheetId;

    const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/vocab/edit";

    struct StaticFetcher {
        body: Mutex<Result<String, reqwest::StatusCode>>,
    }

    impl StaticFetcher {
        fn new(body: Result<&str, reqwest::StatusCode>) -> Arc<Self> {
            Arc::new(Self {
                body: Mutex::new(body.map(str::to_owned)),
            })
        }
    }

    #[async_trait]
    impl SheetFetcher for StaticFetcher {
        async fn fetch_csv(&self, _sheet_id: &SheetId) -> Result<String, SourceError> {
            self.body
                .lock()
                .unwrap()
                .clone()
                .map_err(|status| SourceError::SourceUnavailable { status })
        }
    }

    fn controller(body: Result<&str, reqwest::StatusCode>) -> QuizController {
        QuizController::new(&QuizConfig::default())
            .with_fetcher(StaticFetcher::new(body))
            .with_clock(Clock::fixed(fixed_now()))
            .with_rng_seed(7)
    }

    fn expected_target(controller: &QuizController) -> String {
        controller
            .session()
            .and_then(Session::current_word)
            .map(|word| word.target().to_owned())
            .unwrap()
    }

    const TWO_WORDS: &str = "German,Spanish,Audio\nHallo,Hola,a.mp3\nHaus,casa,h.mp3,,1\n";

    #[tokio::test]
    async fn load_starts_a_quiz() {
        let mut quiz = controller(Ok(TWO_WORDS));

        assert_eq!(quiz.load_from_remote(SHEET_URL).await.unwrap(), 2);

        assert_eq!(quiz.phase(), AppPhase::Playing);
        assert_eq!(quiz.master_list().len(), 2);
        let round = quiz.snapshot().round.unwrap();
        assert_eq!(round.number, 1);
        assert_eq!(round.total, 2);
        assert!(round.outcome.is_none());
    }

    #[tokio::test]
    async fn failed_load_only_sets_last_error() {
        let mut quiz = controller(Err(reqwest::StatusCode::NOT_FOUND));

        let err = quiz.load_from_remote(SHEET_URL).await.unwrap_err();

        assert!(matches!(
            err,
            ControllerError::Source(SourceError::SourceUnavailable { .. })
        ));
        assert_eq!(quiz.phase(), AppPhase::Setup);
        assert!(quiz.master_list().is_empty());
        assert!(quiz.snapshot().last_error.unwrap().contains("404"));
    }

    #[tokio::test]
    async fn failed_reload_keeps_running_quiz() {
        let mut quiz = controller(Ok(TWO_WORDS));
        quiz.load_from_remote(SHEET_URL).await.unwrap();
        quiz.submit_answer("wrong").unwrap();

        let err = quiz.load_from_remote("not a sheet url").await.unwrap_err();

        assert!(matches!(
            err,
            ControllerError::Source(SourceError::InvalidSourceReference)
        ));
        assert_eq!(quiz.phase(), AppPhase::Playing);
        assert_eq!(quiz.session().unwrap().position(), 1);
        assert!(quiz.state().last_error.is_some());
    }

    #[tokio::test]
    async fn full_pass_merges_fail_counts() {
        let mut quiz = controller(Ok(TWO_WORDS));
        quiz.load_from_remote(SHEET_URL).await.unwrap();

        let first = expected_target(&quiz);
        assert_eq!(quiz.submit_answer(&first).unwrap(), AnswerOutcome::Correct);
        assert_eq!(quiz.advance().unwrap(), AppPhase::Playing);

        let second = expected_target(&quiz);
        let outcome = quiz.submit_answer("nope").unwrap();
        assert_eq!(outcome, AnswerOutcome::Incorrect { expected: second.clone() });
        assert_eq!(quiz.advance().unwrap(), AppPhase::Results);

        assert!(quiz.session().is_none());
        let results = quiz.snapshot().results.unwrap();
        assert_eq!((results.score, results.total), (1, 2));
        assert_eq!(results.accuracy_percent, 50);
        assert_eq!(results.elapsed_secs, 0);

        let failed = quiz
            .master_list()
            .iter()
            .find(|word| word.target() == second)
            .unwrap();
        let before = if second == "casa" { 1 } else { 0 };
        assert_eq!(failed.fail_count(), before + 1);
        let sources: Vec<_> = quiz.master_list().iter().map(Word::source).collect();
        assert_eq!(sources, ["Hallo", "Haus"]);
    }

    #[tokio::test]
    async fn double_submit_is_rejected_without_side_effects() {
        let mut quiz = controller(Ok(TWO_WORDS));
        quiz.load_from_remote(SHEET_URL).await.unwrap();
        quiz.submit_answer("x").unwrap();
        let before = quiz.snapshot();

        let err = quiz.submit_answer("x").unwrap_err();

        assert!(matches!(
            err,
            ControllerError::Session(SessionError::AlreadyEvaluated)
        ));
        assert_eq!(quiz.snapshot(), before);
    }

    #[test]
    fn rounds_require_a_running_quiz() {
        let mut quiz = controller(Ok(TWO_WORDS));
        assert!(matches!(
            quiz.submit_answer("Hola"),
            Err(ControllerError::NoActiveSession)
        ));
        assert!(matches!(quiz.advance(), Err(ControllerError::NoActiveSession)));
        assert!(matches!(quiz.begin_review(), Err(ControllerError::NotInResults)));
    }

    #[tokio::test]
    async fn review_covers_only_failed_words() {
        let mut quiz = controller(Ok(
            "a,b,c\neins,uno,1.mp3\nzwei,dos,2.mp3\ndrei,tres,3.mp3\n",
        ));
        quiz.load_from_remote(SHEET_URL).await.unwrap();

        while quiz.phase() == AppPhase::Playing {
            let target = expected_target(&quiz);
            let answer = if target == "uno" { target } else { String::new() };
            quiz.submit_answer(&answer).unwrap();
            quiz.advance().unwrap();
        }

        assert_eq!(quiz.begin_review().unwrap(), 2);
        let mut under_review: Vec<_> = quiz
            .session()
            .unwrap()
            .working_set()
            .iter()
            .map(|entry| entry.word().target().to_owned())
            .collect();
        under_review.sort();
        assert_eq!(under_review, ["dos", "tres"]);
        assert!(quiz.last_result().is_none());
    }

    #[tokio::test]
    async fn perfect_run_has_nothing_to_review() {
        let mut quiz = controller(Ok(TWO_WORDS));
        quiz.load_from_remote(SHEET_URL).await.unwrap();
        while quiz.phase() == AppPhase::Playing {
            let target = expected_target(&quiz);
            quiz.submit_answer(&target).unwrap();
            quiz.advance().unwrap();
        }

        assert!(matches!(
            quiz.begin_review(),
            Err(ControllerError::NothingToReview)
        ));
        assert_eq!(quiz.phase(), AppPhase::Results);
    }

    #[tokio::test]
    async fn restart_returns_to_fresh_state() {
        let mut quiz = controller(Ok(TWO_WORDS));
        quiz.load_from_remote(SHEET_URL).await.unwrap();

        quiz.restart();

        assert_eq!(quiz.snapshot(), AppSnapshot::default());
        assert!(quiz.master_list().is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_each_transition() {
        let mut quiz = controller(Ok(TWO_WORDS));
        let mut updates = quiz.subscribe();

        quiz.load_from_remote(SHEET_URL).await.unwrap();
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().phase, AppPhase::Playing);

        quiz.submit_answer("x").unwrap();
        assert!(updates.borrow_and_update().round.as_ref().unwrap().outcome.is_some());
    }

    #[test]
    fn review_helper_rejects_empty_input() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            begin_review(Vec::new(), &mut rng, fixed_now()),
            Err(ControllerError::NothingToReview)
        ));
    }
}

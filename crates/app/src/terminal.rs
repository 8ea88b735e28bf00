use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::warn;

use quiz_services::{AppPhase, QuizController, RevealPacing, write_workbook};

use crate::audio::AudioCue;
use crate::vm::{ResultsVm, RoundVm};

const QUIT: &str = ":quit";
const SHOW: &str = ":show";
const AUDIO: &str = ":audio";

enum Flow {
    Continue,
    Quit,
}

/// Line-oriented front end: reads commands and answers from `input`, renders
/// to `output` and plays clips through `cue`.
pub struct QuizTerminal<R, W, A> {
    input: Lines<R>,
    output: W,
    cue: A,
    pacing: RevealPacing,
    export_path: PathBuf,
}

impl<R, W, A> QuizTerminal<R, W, A>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    A: AudioCue,
{
    #[must_use]
    pub fn new(input: R, output: W, cue: A, pacing: RevealPacing, export_path: PathBuf) -> Self {
        Self {
            input: input.lines(),
            output,
            cue,
            pacing,
            export_path,
        }
    }

    /// Run until the user quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if input or output fails, or if the controller rejects
    /// a transition the terminal drove.
    pub async fn run(&mut self, quiz: &mut QuizController) -> Result<()> {
        loop {
            let flow = match quiz.phase() {
                AppPhase::Setup => self.setup(quiz).await?,
                AppPhase::Playing => self.play_round(quiz).await?,
                AppPhase::Results => self.results(quiz).await?,
            };
            if matches!(flow, Flow::Quit) {
                return Ok(());
            }
        }
    }

    /// Load from a spreadsheet path if `source` names a file, otherwise from a sheet URL.
    /// Load failures are reported to the user, not returned.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to the output fails.
    pub async fn load(&mut self, quiz: &mut QuizController, source: &str) -> Result<()> {
        let source = source.trim();
        if Path::new(source).is_file() {
            return self.load_file(quiz, Path::new(source)).await;
        }
        let loaded = quiz.load_from_remote(source).await;
        self.report_load(loaded.map_err(anyhow::Error::from))
    }

    /// # Errors
    ///
    /// Returns an error only if writing to the output fails.
    pub async fn load_file(&mut self, quiz: &mut QuizController, path: &Path) -> Result<()> {
        let loaded = match tokio::fs::read(path).await {
            Ok(bytes) => quiz.load_from_document(&bytes).map_err(anyhow::Error::from),
            Err(err) => {
                Err(anyhow::Error::new(err).context(format!("could not read {}", path.display())))
            }
        };
        self.report_load(loaded)
    }

    fn report_load(&mut self, loaded: Result<usize>) -> Result<()> {
        match loaded {
            Ok(count) => writeln!(self.output, "Loaded {count} words.")?,
            Err(err) => writeln!(self.output, "Error: {err:#}")?,
        }
        Ok(())
    }

    // ─── Screens ───────────────────────────────────────────────────────────────

    async fn setup(&mut self, quiz: &mut QuizController) -> Result<Flow> {
        writeln!(
            self.output,
            "\nEnter a published Google Sheet URL or a spreadsheet file path ({QUIT} to exit)."
        )?;
        self.prompt()?;

        let Some(line) = self.read_line().await? else {
            return Ok(Flow::Quit);
        };
        if line.trim() == QUIT {
            return Ok(Flow::Quit);
        }

        self.load(quiz, &line).await?;
        Ok(Flow::Continue)
    }

    async fn play_round(&mut self, quiz: &mut QuizController) -> Result<Flow> {
        let Some(round) = quiz.snapshot().round else {
            bail!("quiz is playing but has no round");
        };

        self.play_audio(&round.audio_ref);
        let mut prompt_visible = false;
        let answer = loop {
            self.render_round(&RoundVm::new(&round, prompt_visible))?;
            let Some(line) = self.read_line().await? else {
                return Ok(Flow::Quit);
            };
            match line.trim() {
                SHOW => prompt_visible = true,
                AUDIO => self.play_audio(&round.audio_ref),
                QUIT => return Ok(Flow::Quit),
                _ => break line,
            }
        };

        let outcome = quiz.submit_answer(&answer)?;
        if let Some(revealed) = quiz.snapshot().round {
            let vm = RoundVm::new(&revealed, true);
            if let Some(feedback) = vm.feedback {
                writeln!(self.output, "  {} {feedback}", vm.prompt)?;
            }
        }

        self.reveal_pause(self.pacing.delay_for(&outcome)).await?;
        quiz.advance()?;
        Ok(Flow::Continue)
    }

    async fn results(&mut self, quiz: &mut QuizController) -> Result<Flow> {
        let Some(results) = quiz.snapshot().results else {
            bail!("results screen without results");
        };
        let vm = ResultsVm::from(&results);

        writeln!(self.output, "\nQuiz complete!")?;
        writeln!(self.output, "{}  ({})  in {}", vm.score_line, vm.accuracy, vm.elapsed)?;
        writeln!(self.output, "{}", vm.message)?;
        if !vm.failed.is_empty() {
            writeln!(self.output, "Words to Review:")?;
            for word in &vm.failed {
                writeln!(self.output, "  {word}")?;
            }
        }
        if let Some(label) = &vm.review_label {
            writeln!(self.output, "[r] {label}")?;
        }
        writeln!(self.output, "[d] Download Updated File")?;
        writeln!(self.output, "[n] Start New Quiz")?;
        writeln!(self.output, "[q] Quit")?;
        self.prompt()?;

        let Some(line) = self.read_line().await? else {
            return Ok(Flow::Quit);
        };
        match line.trim().to_lowercase().as_str() {
            "r" if vm.review_label.is_some() => {
                quiz.begin_review()?;
            }
            "d" => self.download(quiz).await?,
            "n" => quiz.restart(),
            "q" | QUIT => return Ok(Flow::Quit),
            other => writeln!(self.output, "Unknown option: {other}")?,
        }
        Ok(Flow::Continue)
    }

    async fn download(&mut self, quiz: &QuizController) -> Result<()> {
        let path = self.export_path.clone();
        let words = quiz.master_list().to_vec();
        let columns = quiz.export_columns().clone();
        let written =
            tokio::task::spawn_blocking(move || write_workbook(&path, &words, &columns)).await?;

        match written {
            Ok(()) => writeln!(self.output, "Saved {}", self.export_path.display())?,
            Err(err) => writeln!(self.output, "Error: could not save the file: {err}")?,
        }
        Ok(())
    }

    // ─── Helpers ───────────────────────────────────────────────────────────────

    fn render_round(&mut self, vm: &RoundVm) -> Result<()> {
        writeln!(self.output, "\n[{}]  score {}", vm.progress, vm.score)?;
        writeln!(self.output, "  {}", vm.prompt)?;
        writeln!(self.output, "Type the translation ({SHOW}, {AUDIO}, {QUIT}).")?;
        self.prompt()
    }

    fn play_audio(&mut self, audio_ref: &str) {
        if let Err(err) = self.cue.play(audio_ref) {
            warn!(error = %err, audio_ref, "audio playback failed");
        }
    }

    fn prompt(&mut self) -> Result<()> {
        write!(self.output, "> ")?;
        self.output.flush()?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.input.next_line().await?)
    }

    /// Wait out the reveal of an evaluated answer. Lines typed meanwhile are
    /// consumed and dropped so they never answer the next word.
    async fn reveal_pause(&mut self, delay: Duration) -> Result<()> {
        if delay.is_zero() {
            return Ok(());
        }

        let pause = tokio::time::sleep(delay);
        tokio::pin!(pause);
        loop {
            tokio::select! {
                biased;
                () = &mut pause => return Ok(()),
                line = self.input.next_line() => match line? {
                    Some(_) => writeln!(self.output, "Already answered, wait for the next word.")?,
                    None => {
                        pause.as_mut().await;
                        return Ok(());
                    }
                },
            }
        }
    }
}

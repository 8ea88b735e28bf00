use std::io::{self, Write};

/// Plays the pronunciation clip behind a word's opaque audio reference.
pub trait AudioCue {
    /// # Errors
    ///
    /// Returns an error if the clip cannot be played.
    fn play(&mut self, audio_ref: &str) -> io::Result<()>;
}

/// Prints the reference so the user can open it in a player.
#[derive(Debug, Default)]
pub struct TerminalCue;

impl AudioCue for TerminalCue {
    fn play(&mut self, audio_ref: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "♪ {audio_ref}")?;
        out.flush()
    }
}

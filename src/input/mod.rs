//! Secret input loop: drives one byte at a time through the terminal backend and applies
//! the echo policy.

mod line;
mod source;


use crate::config::ReaderConfig;
use crate::error::{ReadError, ReadFailure, ReadResult};
use crate::secret::SecretBytes;
use crate::terminal::{RawModeGuard, StdinTerminal, SttyCommand, TerminalBackend};
use std::io::{self, Write};

pub use source::{ByteSource, ReaderSource, StdinSource};

/// What the user sees while typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EchoPolicy {
    /// Nothing is printed.
    #[default]
    Hidden,
    /// One mask glyph per accepted byte.
    Masked,
    /// Every accepted byte is printed as typed.
    Echoed,
}

impl EchoPolicy {
    /// Whether anything is drawn per keystroke (and so must be erased on backspace).
    #[must_use]
    pub fn shows_input(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

impl std::fmt::Display for EchoPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Hidden => "hidden",
            Self::Masked => "masked",
            Self::Echoed => "echoed",
        };
        write!(f, "{label}")
    }
}

/// Reads secrets from a byte source, echoing to a display, with raw mode on a terminal.
pub struct SecretReader<S, W, T> {
    source: S,
    display: W,
    terminal: T,
    config: ReaderConfig,
}

impl SecretReader<StdinSource, io::Stdout, StdinTerminal> {
    /// Stdin for input, stdout for echo, default limits and `stty`.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(
            StdinSource::default(),
            io::stdout(),
            StdinTerminal::new(SttyCommand::default()),
        )
    }
}

impl<S, W, T> SecretReader<S, W, T>
where
    S: ByteSource,
    W: Write,
    T: TerminalBackend,
{
    pub fn new(source: S, display: W, terminal: T) -> Self {
        Self {
            source,
            display,
            terminal,
            config: ReaderConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn display(&self) -> &W {
        &self.display
    }

    pub fn into_parts(self) -> (S, W, T) {
        (self.source, self.display, self.terminal)
    }

    /// Read one secret under `policy`.
    ///
    /// On a terminal, raw mode is held for the duration of the loop and released on every
    /// exit path, followed by a newline on the display. The returned bytes exclude the
    /// CR/LF terminator.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Interrupted`] on Ctrl-C, [`ReadError::MaxLengthExceeded`] when
    /// the byte limit runs out, and [`ReadError::Io`] for source, raw-mode, or restore
    /// failures. The loop's error wins over a restore failure; a restore failure is only
    /// returned when the loop itself succeeded.
    pub fn read_secret(&mut self, policy: EchoPolicy) -> ReadResult {
        if !self.terminal.is_terminal() {
            tracing::debug!(%policy, "input is not a terminal; reading without raw mode");
            return line::collect_secret(
                &mut self.source,
                &mut self.display,
                policy,
                &self.config,
            );
        }

        let guard = match RawModeGuard::acquire(&self.terminal) {
            Ok(guard) => guard,
            Err(err) => {
                return Err(ReadFailure::new(
                    ReadError::Io(err),
                    SecretBytes::default(),
                ))
            }
        };
        let outcome = line::collect_secret(
            &mut self.source,
            &mut self.display,
            policy,
            &self.config,
        );
        let restored = guard.release(&mut self.display);

        match (outcome, restored) {
            (outcome, Ok(())) => outcome,
            (Ok(secret), Err(err)) => Err(ReadFailure::new(ReadError::Io(err), secret)),
            (Err(failure), Err(err)) => {
                tracing::warn!(
                    error = %err,
                    read_error = %failure,
                    "terminal restore failed after an earlier read error"
                );
                Err(failure)
            }
        }
    }

    /// # Errors
    ///
    /// See [`SecretReader::read_secret`].
    pub fn read_hidden(&mut self) -> ReadResult {
        self.read_secret(EchoPolicy::Hidden)
    }

    /// # Errors
    ///
    /// See [`SecretReader::read_secret`].
    pub fn read_masked(&mut self) -> ReadResult {
        self.read_secret(EchoPolicy::Masked)
    }

    /// # Errors
    ///
    /// See [`SecretReader::read_secret`].
    pub fn read_echoed(&mut self) -> ReadResult {
        self.read_secret(EchoPolicy::Echoed)
    }
}

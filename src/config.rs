//! Reader limits and CLI-facing settings so callers pass configuration in explicitly.

use crate::terminal::SttyCommand;
use anyhow::{anyhow, Result};
use clap::Args;

pub const DEFAULT_MAX_LENGTH: usize = 512;
pub const DEFAULT_MASK: u8 = b'*';
pub const DEFAULT_ERASE: &[u8] = b"\x08 \x08";
pub const DEFAULT_STTY_PROGRAM: &str = "stty";

pub(crate) const MAX_LENGTH_CEILING: usize = 64 * 1024;

/// Settings consumed by the input loop for one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Total bytes the loop may consume before giving up, control bytes included.
    pub max_length: usize,
    /// Glyph printed per accepted byte under masked echo.
    pub mask: u8,
    /// Sequence that visually removes one character (backspace, space, backspace).
    pub erase: Vec<u8>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            mask: DEFAULT_MASK,
            erase: DEFAULT_ERASE.to_vec(),
        }
    }
}

/// Shared flags for binaries built on the reader.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Maximum number of bytes consumed before the read is aborted
    #[arg(long = "max-length", env = "PASSREAD_MAX_LENGTH", default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// Glyph echoed for each character in masked mode
    #[arg(long = "mask", env = "PASSREAD_MASK", default_value_t = DEFAULT_MASK as char)]
    pub mask: char,

    /// stty program used on terminals without native raw-mode support (e.g. "busybox stty")
    #[arg(long = "stty", env = "PASSREAD_STTY", default_value = DEFAULT_STTY_PROGRAM)]
    pub stty: String,

    /// Write JSON trace events to the trace log file
    #[arg(long = "logs", default_value_t = false)]
    pub logs: bool,

    /// Disable all logging, overriding --logs
    #[arg(long = "no-logs", default_value_t = false)]
    pub no_logs: bool,
}

impl AppConfig {
    /// Reject values the reader cannot honor.
    ///
    /// # Errors
    ///
    /// Returns an error when the byte limit is zero or too large, the mask is not a single
    /// printable ASCII character, or the stty command is blank.
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 || self.max_length > MAX_LENGTH_CEILING {
            return Err(anyhow!(
                "--max-length must be between 1 and {MAX_LENGTH_CEILING}, got {}",
                self.max_length
            ));
        }
        if !self.mask.is_ascii_graphic() {
            return Err(anyhow!(
                "--mask must be a printable ASCII character, got {:?}",
                self.mask
            ));
        }
        if self.stty.trim().is_empty() {
            return Err(anyhow!("--stty must not be empty"));
        }
        Ok(())
    }

    #[must_use]
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig {
            max_length: self.max_length,
            mask: u8::try_from(self.mask).unwrap_or(DEFAULT_MASK),
            ..ReaderConfig::default()
        }
    }

    /// Split `--stty` on whitespace into program and leading arguments.
    #[must_use]
    pub fn stty_command(&self) -> SttyCommand {
        let mut parts = self.stty.split_whitespace();
        let program = parts.next().unwrap_or(DEFAULT_STTY_PROGRAM);
        SttyCommand::new(program).with_prefix_args(parts)
    }

    #[inline]
    #[must_use]
    pub fn logging_enabled(&self) -> bool {
        self.logs && !self.no_logs
    }
}

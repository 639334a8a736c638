//! Read failures that keep the partial secret next to the reason the loop stopped.

use crate::secret::SecretBytes;
use std::io;

/// Result of one secret read.
pub type ReadResult = std::result::Result<SecretBytes, ReadFailure>;

/// Why a read stopped without a terminator.
#[derive(Debug)]
pub enum ReadError {
    /// The user typed Ctrl-C (byte 3) while raw mode was active.
    Interrupted,
    /// More than `limit` bytes were consumed without a terminator.
    MaxLengthExceeded { limit: usize },
    /// The byte source, raw-mode switch, or `stty` subprocess failed.
    Io(io::Error),
}

impl ReadError {
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interrupted => write!(f, "interrupted"),
            Self::MaxLengthExceeded { limit } => {
                write!(f, "maximum byte limit ({limit}) exceeded")
            }
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// A [`ReadError`] plus whatever bytes had been collected when it occurred.
#[derive(Debug)]
pub struct ReadFailure {
    error: ReadError,
    partial: SecretBytes,
}

impl ReadFailure {
    pub(crate) fn new(error: ReadError, partial: SecretBytes) -> Self {
        Self { error, partial }
    }

    #[must_use]
    pub fn error(&self) -> &ReadError {
        &self.error
    }

    /// Bytes accepted before the failure, terminator and control bytes excluded.
    #[must_use]
    pub fn partial(&self) -> &SecretBytes {
        &self.partial
    }

    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.error.is_interrupted()
    }

    #[must_use]
    pub fn into_parts(self) -> (ReadError, SecretBytes) {
        (self.error, self.partial)
    }
}

impl std::fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for ReadFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

//! Terminal secret input: read a password byte by byte with hidden, masked, or echoed display.
//!
//! The input loop lives in [`input`], the raw-mode plumbing in [`terminal`]. The free
//! functions below wire both to the process stdin/stdout for the common case.

pub mod config;
pub mod error;
pub mod input;
pub mod secret;
pub mod telemetry;
pub mod terminal;

pub use config::{AppConfig, ReaderConfig, DEFAULT_MAX_LENGTH};
pub use error::{ReadError, ReadFailure, ReadResult};
pub use input::{ByteSource, EchoPolicy, ReaderSource, SecretReader, StdinSource};
pub use secret::SecretBytes;
pub use terminal::{NoTerminal, RawModeHandle, StdinTerminal, SttyCommand, TerminalBackend};

/// Read from the terminal on stdin without echoing anything.
///
/// The returned bytes never include the CR/LF terminator.
///
/// # Errors
///
/// Returns the partial buffer together with the reason the read stopped early.
pub fn read_hidden() -> ReadResult {
    SecretReader::stdio().read_hidden()
}

/// Read from the terminal on stdin, printing `*` for every accepted byte.
///
/// # Errors
///
/// Returns the partial buffer together with the reason the read stopped early.
pub fn read_masked() -> ReadResult {
    SecretReader::stdio().read_masked()
}

/// Read from the terminal on stdin, echoing every accepted byte.
///
/// # Errors
///
/// Returns the partial buffer together with the reason the read stopped early.
pub fn read_echoed() -> ReadResult {
    SecretReader::stdio().read_echoed()
}

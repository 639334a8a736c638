//! Terminal detection and raw-mode switching over native termios/console APIs, with an
//! `stty` subprocess fallback for POSIX layers running on top of a non-POSIX console.

mod guard;
mod native;
mod stty;

use std::io;

pub use guard::RawModeGuard;
pub use native::NativeState;
pub use stty::{SttyCommand, RAW_MODE_FLAGS};

#[cfg(unix)]
pub use std::os::fd::RawFd;
#[cfg(not(unix))]
pub type RawFd = i32;

pub const STDIN_FD: RawFd = 0;

/// Everything needed to put a terminal back the way it was before raw mode.
///
/// Restoring consumes the handle, so it cannot be applied twice.
pub enum RawModeHandle {
    /// Saved state from the native console/termios API.
    Native(NativeState),
    /// Output of `stty --save`, replayed verbatim on restore.
    Snapshot(String),
}

impl std::fmt::Debug for RawModeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native(_) => write!(f, "RawModeHandle::Native"),
            Self::Snapshot(state) => f.debug_tuple("RawModeHandle::Snapshot").field(state).finish(),
        }
    }
}

/// Seam between the input loop and the terminal it reads from.
pub trait TerminalBackend {
    type Handle;

    fn is_terminal(&self) -> bool;

    /// # Errors
    ///
    /// Returns an error when the terminal settings cannot be saved or changed.
    fn enter_raw_mode(&self) -> io::Result<Self::Handle>;

    /// # Errors
    ///
    /// Returns an error when the saved settings cannot be reapplied.
    fn restore(&self, handle: Self::Handle) -> io::Result<()>;
}

/// Returns true when `fd` is an interactive terminal.
///
/// The native predicate is consulted first; when it says no, a bare `stty` probe decides
/// (POSIX shells on Windows answer there). Probe failures count as "not a terminal".
#[must_use]
pub fn is_terminal(fd: RawFd, stty: &SttyCommand) -> bool {
    native::is_native_terminal(fd) || stty.probe(fd)
}

/// Switch `fd` into raw mode and return the state needed to undo it.
///
/// # Errors
///
/// Returns an error when the native raw-mode call fails, or when the `stty` snapshot or
/// flag change cannot be performed.
pub fn enter_raw_mode(fd: RawFd, stty: &SttyCommand) -> io::Result<RawModeHandle> {
    if native::is_native_terminal(fd) {
        let state = native::make_raw(fd)?;
        tracing::debug!(fd, "raw mode entered via native terminal api");
        return Ok(RawModeHandle::Native(state));
    }

    let snapshot = stty.save(fd)?;
    stty.apply_raw(fd)?;
    tracing::debug!(fd, "raw mode entered via stty");
    Ok(RawModeHandle::Snapshot(snapshot))
}

/// Put `fd` back into the state captured by [`enter_raw_mode`].
///
/// # Errors
///
/// Returns an error when the native restore call or the `stty` replay fails.
pub fn restore(fd: RawFd, handle: RawModeHandle, stty: &SttyCommand) -> io::Result<()> {
    match handle {
        RawModeHandle::Native(state) => native::restore(fd, state)?,
        RawModeHandle::Snapshot(snapshot) => stty.replay(fd, &snapshot)?,
    }
    tracing::debug!(fd, "terminal state restored");
    Ok(())
}

/// The process input descriptor, switched with native calls or `stty`.
#[derive(Debug, Clone, Default)]
pub struct StdinTerminal {
    fd: RawFd,
    stty: SttyCommand,
}

impl StdinTerminal {
    #[must_use]
    pub fn new(stty: SttyCommand) -> Self {
        Self::with_fd(STDIN_FD, stty)
    }

    /// Drive an arbitrary descriptor instead of stdin (e.g. an opened `/dev/tty`).
    #[must_use]
    pub fn with_fd(fd: RawFd, stty: SttyCommand) -> Self {
        Self { fd, stty }
    }

    #[must_use]
    pub fn fd(&self) -> RawFd {
        self.fd
    }
}

impl TerminalBackend for StdinTerminal {
    type Handle = RawModeHandle;

    fn is_terminal(&self) -> bool {
        is_terminal(self.fd, &self.stty)
    }

    fn enter_raw_mode(&self) -> io::Result<RawModeHandle> {
        enter_raw_mode(self.fd, &self.stty)
    }

    fn restore(&self, handle: RawModeHandle) -> io::Result<()> {
        restore(self.fd, handle, &self.stty)
    }
}

/// Backend for input that is never a terminal (pipes, files, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTerminal;

impl TerminalBackend for NoTerminal {
    type Handle = ();

    fn is_terminal(&self) -> bool {
        false
    }

    fn enter_raw_mode(&self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "input is not a terminal",
        ))
    }

    fn restore(&self, _handle: ()) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests;

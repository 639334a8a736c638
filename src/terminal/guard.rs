//! Scoped raw mode: whatever path leaves the read, the terminal gets its settings back.

use super::TerminalBackend;
use std::io::{self, Write};

/// RAII guard holding the restore handle for one raw-mode session.
///
/// Call [`RawModeGuard::release`] on normal exit paths to observe the restore result and
/// emit the trailing newline. If the guard is dropped unreleased (a panic unwinding through
/// the read), the terminal is still restored and the error is only traced.
pub struct RawModeGuard<'a, T: TerminalBackend> {
    backend: &'a T,
    handle: Option<T::Handle>,
}

impl<'a, T: TerminalBackend> RawModeGuard<'a, T> {
    /// Enter raw mode on `backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot enter raw mode; nothing needs restoring then.
    pub fn acquire(backend: &'a T) -> io::Result<Self> {
        let handle = backend.enter_raw_mode()?;
        Ok(Self {
            backend,
            handle: Some(handle),
        })
    }

    /// Restore the terminal, then move the cursor to a fresh line on `display`.
    ///
    /// The newline is written even when restoring fails; its own write error is ignored
    /// since it is purely cosmetic.
    ///
    /// # Errors
    ///
    /// Returns the restore error, if any.
    pub fn release(mut self, display: &mut impl Write) -> io::Result<()> {
        let result = self.restore_now();
        let _ = display.write_all(b"\n");
        let _ = display.flush();
        result
    }

    fn restore_now(&mut self) -> io::Result<()> {
        match self.handle.take() {
            Some(handle) => self.backend.restore(handle),
            None => Ok(()),
        }
    }
}

impl<T: TerminalBackend> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.restore_now() {
            tracing::warn!(error = %err, "failed to restore terminal while unwinding");
        }
    }
}

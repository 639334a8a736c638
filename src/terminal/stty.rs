//! `stty` subprocess driver for terminals that only a POSIX emulation layer can configure.

use super::RawFd;
use std::ffi::{OsStr, OsString};
use std::io;
use std::process::{Command, ExitStatus, Stdio};

/// Flag changes equivalent to `cfmakeraw`. Setting `cs8` clears the old size bits itself.
pub const RAW_MODE_FLAGS: [&str; 16] = [
    "-ignbrk", "-brkint", "-parmrk", "-istrip", "-inlcr", "-igncr", "-icrnl", "-ixon", "-opost",
    "-echo", "-echonl", "-icanon", "-isig", "-iexten", "-parenb", "cs8",
];

const SAVE_FLAG: &str = "--save";

/// How to launch `stty`: a program plus optional leading arguments (`busybox stty`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SttyCommand {
    program: OsString,
    prefix_args: Vec<OsString>,
}

impl Default for SttyCommand {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_STTY_PROGRAM)
    }
}

impl SttyCommand {
    #[must_use]
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            prefix_args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_prefix_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.prefix_args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    /// Run `stty` with `fd` as its stdin and return its captured stdout.
    ///
    /// # Errors
    ///
    /// Returns an error when the descriptor cannot be duplicated, the process cannot be
    /// spawned, or it exits unsuccessfully.
    pub fn run<S: AsRef<OsStr>>(&self, fd: RawFd, args: &[S]) -> io::Result<Vec<u8>> {
        let output = Command::new(&self.program)
            .args(&self.prefix_args)
            .args(args)
            .stdin(duplicate_input(fd)?)
            .output()?;
        if output.status.success() {
            return Ok(output.stdout);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(io::Error::other(format_exit_error(
            &self.program,
            output.status,
            stderr.trim(),
        )))
    }

    /// `stty` refuses to run against a non-terminal stdin, so a clean exit means "terminal".
    pub(super) fn probe(&self, fd: RawFd) -> bool {
        let no_args: [&str; 0] = [];
        match self.run(fd, &no_args) {
            Ok(_) => true,
            Err(err) => {
                tracing::trace!(fd, error = %err, "stty probe failed");
                false
            }
        }
    }

    pub(super) fn save(&self, fd: RawFd) -> io::Result<String> {
        let output = self.run(fd, &[SAVE_FLAG])?;
        Ok(String::from_utf8_lossy(&output).trim().to_string())
    }

    pub(super) fn apply_raw(&self, fd: RawFd) -> io::Result<()> {
        self.run(fd, &RAW_MODE_FLAGS).map(|_| ())
    }

    pub(super) fn replay(&self, fd: RawFd, snapshot: &str) -> io::Result<()> {
        self.run(fd, &[snapshot]).map(|_| ())
    }
}

fn format_exit_error(program: &OsStr, status: ExitStatus, stderr: &str) -> String {
    let code = status
        .code()
        .map(|value| value.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let program = program.to_string_lossy();
    if stderr.is_empty() {
        format!("{program} exited with code {code}")
    } else {
        format!("{program} exited with code {code}: {stderr}")
    }
}

/// Hand the child its own copy of `fd`; the copy is closed once the child is spawned.
#[cfg(unix)]
fn duplicate_input(fd: RawFd) -> io::Result<Stdio> {
    use std::os::fd::BorrowedFd;

    if fd < 0 {
        return Err(io::Error::from_raw_os_error(libc::EBADF));
    }
    // SAFETY: the descriptor is only borrowed for the duration of the dup call below;
    // the caller keeps ownership of `fd`.
    let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
    Ok(Stdio::from(borrowed.try_clone_to_owned()?))
}

#[cfg(not(unix))]
fn duplicate_input(fd: RawFd) -> io::Result<Stdio> {
    if fd == super::STDIN_FD {
        return Ok(Stdio::inherit());
    }
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("stty can only drive stdin on this platform (fd {fd})"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_flags_end_with_character_size() {
        assert_eq!(RAW_MODE_FLAGS.last(), Some(&"cs8"));
        assert!(RAW_MODE_FLAGS.contains(&"-echo"));
        assert!(RAW_MODE_FLAGS.contains(&"-icanon"));
        assert!(RAW_MODE_FLAGS.contains(&"-isig"));
        assert!(RAW_MODE_FLAGS
            .iter()
            .take(RAW_MODE_FLAGS.len() - 1)
            .all(|flag| flag.starts_with('-')));
    }

    #[test]
    fn default_command_is_plain_stty() {
        let command = SttyCommand::default();
        assert_eq!(command.program, OsString::from("stty"));
        assert!(command.prefix_args.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn format_exit_error_includes_code_and_stderr() {
        let status = match Command::new("sh").args(["-c", "exit 3"]).status() {
            Ok(status) => status,
            Err(err) => panic!("shell should produce an exit status: {err}"),
        };
        assert_eq!(
            format_exit_error(OsStr::new("stty"), status, "not a tty"),
            "stty exited with code 3: not a tty"
        );
        assert_eq!(
            format_exit_error(OsStr::new("stty"), status, ""),
            "stty exited with code 3"
        );
    }

    #[cfg(unix)]
    #[test]
    fn duplicate_input_rejects_negative_descriptors() {
        match duplicate_input(-1) {
            Err(err) => assert_eq!(err.raw_os_error(), Some(libc::EBADF)),
            Ok(_) => panic!("negative fd should not duplicate"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn missing_program_reports_spawn_error() {
        use std::os::fd::AsRawFd;

        let dev_null = match std::fs::File::open("/dev/null") {
            Ok(file) => file,
            Err(err) => panic!("/dev/null should open: {err}"),
        };
        let command = SttyCommand::new("/definitely/not/a/real/passread-stty");
        match command.run(dev_null.as_raw_fd(), &[SAVE_FLAG]) {
            Err(err) => assert_eq!(err.kind(), io::ErrorKind::NotFound),
            Ok(_) => panic!("missing program should fail"),
        }
        assert!(!command.probe(dev_null.as_raw_fd()));
    }
}

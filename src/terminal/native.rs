//! Native raw-mode primitives: termios on Unix, the console API (via crossterm) on Windows.

use super::RawFd;
use std::io;

/// Terminal attributes captured before raw mode was applied.
#[cfg(unix)]
pub struct NativeState {
    original: libc::termios,
}

#[cfg(unix)]
pub(super) fn is_native_terminal(fd: RawFd) -> bool {
    // SAFETY: `isatty` only inspects the descriptor number and never dereferences memory.
    unsafe { libc::isatty(fd) == 1 }
}

/// Clear the flags `cfmakeraw` clears and force 8-bit characters.
///
/// Reads return after a single byte with no timeout.
#[cfg(unix)]
pub(super) fn apply_raw_profile(attrs: &mut libc::termios) {
    attrs.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON);
    attrs.c_oflag &= !libc::OPOST;
    attrs.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    attrs.c_cflag &= !(libc::CSIZE | libc::PARENB);
    attrs.c_cflag |= libc::CS8;
    attrs.c_cc[libc::VMIN] = 1;
    attrs.c_cc[libc::VTIME] = 0;
}

#[cfg(unix)]
pub(super) fn read_attrs(fd: RawFd) -> io::Result<libc::termios> {
    // SAFETY: termios is a plain C struct; zeroed is a valid bit pattern that tcgetattr
    // overwrites on success.
    let mut attrs: libc::termios = unsafe { std::mem::zeroed() };
    // SAFETY: `attrs` is a live, writable termios for the duration of the call.
    if unsafe { libc::tcgetattr(fd, &mut attrs) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(attrs)
}

#[cfg(unix)]
fn write_attrs(fd: RawFd, attrs: &libc::termios) -> io::Result<()> {
    // SAFETY: `attrs` points to an initialized termios that outlives the call.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, attrs) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(unix)]
pub(super) fn make_raw(fd: RawFd) -> io::Result<NativeState> {
    let original = read_attrs(fd)?;
    let mut raw = original;
    apply_raw_profile(&mut raw);
    write_attrs(fd, &raw)?;
    Ok(NativeState { original })
}

#[cfg(unix)]
pub(super) fn restore(fd: RawFd, state: NativeState) -> io::Result<()> {
    write_attrs(fd, &state.original)
}

/// Marker that the console was switched through crossterm, which keeps the original mode.
#[cfg(windows)]
pub struct NativeState {
    _private: (),
}

#[cfg(windows)]
pub(super) fn is_native_terminal(fd: RawFd) -> bool {
    use std::io::IsTerminal;
    fd == super::STDIN_FD && io::stdin().is_terminal()
}

#[cfg(windows)]
pub(super) fn make_raw(_fd: RawFd) -> io::Result<NativeState> {
    crossterm::terminal::enable_raw_mode()?;
    Ok(NativeState { _private: () })
}

#[cfg(windows)]
pub(super) fn restore(_fd: RawFd, _state: NativeState) -> io::Result<()> {
    crossterm::terminal::disable_raw_mode()
}

#[cfg(not(any(unix, windows)))]
pub struct NativeState {
    _private: (),
}

#[cfg(not(any(unix, windows)))]
pub(super) fn is_native_terminal(_fd: RawFd) -> bool {
    false
}

#[cfg(not(any(unix, windows)))]
pub(super) fn make_raw(_fd: RawFd) -> io::Result<NativeState> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "native raw mode is not available on this platform",
    ))
}

#[cfg(not(any(unix, windows)))]
pub(super) fn restore(_fd: RawFd, _state: NativeState) -> io::Result<()> {
    Ok(())
}

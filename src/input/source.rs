//! Pluggable one-byte-at-a-time input so the loop can run without a real terminal.

use crate::terminal::{RawFd, STDIN_FD};
use std::io::{self, Read};

/// Produces the next input byte, or the error that ends the read.
pub trait ByteSource {
    /// # Errors
    ///
    /// Returns an error when no further byte can be produced (end of stream included).
    fn next_byte(&mut self) -> io::Result<u8>;
}

impl<F> ByteSource for F
where
    F: FnMut() -> io::Result<u8>,
{
    fn next_byte(&mut self) -> io::Result<u8> {
        self()
    }
}

/// Adapts any [`Read`] into a [`ByteSource`]; a zero-length read is end of stream.
///
/// Interrupted reads are surfaced to the caller rather than retried.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn next_byte(&mut self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        match self.reader.read(&mut byte)? {
            0 => Err(end_of_stream()),
            _ => Ok(byte[0]),
        }
    }
}

fn end_of_stream() -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "input closed before a line terminator",
    )
}

/// Unbuffered reads from process standard input (or another descriptor), one byte per call.
///
/// Bytes after the terminator stay on the descriptor for whoever reads it next.
#[derive(Debug, Clone, Copy)]
pub struct StdinSource {
    fd: RawFd,
}

impl Default for StdinSource {
    fn default() -> Self {
        Self { fd: STDIN_FD }
    }
}

impl StdinSource {
    /// Read from `fd` instead of stdin; the caller keeps ownership of the descriptor.
    #[must_use]
    pub fn with_fd(fd: RawFd) -> Self {
        Self { fd }
    }

    #[must_use]
    pub fn fd(&self) -> RawFd {
        self.fd
    }
}

impl ByteSource for StdinSource {
    #[cfg(unix)]
    fn next_byte(&mut self) -> io::Result<u8> {
        let mut byte = 0u8;
        // SAFETY: `byte` is a live, writable one-byte buffer for the duration of the call.
        let n = unsafe { libc::read(self.fd, (&mut byte as *mut u8).cast::<libc::c_void>(), 1) };
        match n {
            0 => Err(end_of_stream()),
            n if n < 0 => Err(io::Error::last_os_error()),
            _ => Ok(byte),
        }
    }

    #[cfg(not(unix))]
    fn next_byte(&mut self) -> io::Result<u8> {
        if self.fd != STDIN_FD {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("only stdin can be read on this platform (fd {})", self.fd),
            ));
        }
        ReaderSource::new(io::stdin()).next_byte()
    }
}

//! The bounded byte loop: backspace, enter, Ctrl-C, NUL, and the byte limit.

use super::{ByteSource, EchoPolicy};
use crate::config::{ReaderConfig, MAX_LENGTH_CEILING};
use crate::error::{ReadError, ReadFailure, ReadResult};
use crate::secret::SecretBytes;
use std::io::{self, Write};

const NUL: u8 = 0;
const ETX: u8 = 3;
const BACKSPACE: u8 = 8;
const LINE_FEED: u8 = 10;
const CARRIAGE_RETURN: u8 = 13;
const DELETE: u8 = 127;

enum Stop {
    Enter,
    Interrupt,
    Failed(io::Error),
}

impl Stop {
    fn label(&self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Interrupt => "interrupt",
            Self::Failed(_) => "source error",
        }
    }
}

/// Read until a terminator, Ctrl-C, a source error, or `max_length + 1` bytes consumed.
///
/// Every byte read counts toward the limit, including NUL and backspace, so a source
/// that floods control bytes still terminates.
pub(crate) fn collect_secret<S, W>(
    source: &mut S,
    display: &mut W,
    policy: EchoPolicy,
    config: &ReaderConfig,
) -> ReadResult
where
    S: ByteSource + ?Sized,
    W: Write + ?Sized,
{
    let erase: &[u8] = if policy.shows_input() {
        &config.erase
    } else {
        &[]
    };
    let mask = [config.mask];

    // Reservation is capped; a larger limit grows the buffer on demand.
    let reserve = config.max_length.min(MAX_LENGTH_CEILING).saturating_add(1);
    let mut secret = SecretBytes::with_capacity(reserve);
    let mut consumed = 0usize;
    let stop = (0..=config.max_length).find_map(|_| {
        consumed += 1;
        let byte = match source.next_byte() {
            Ok(byte) => byte,
            Err(err) => return Some(Stop::Failed(err)),
        };
        match byte {
            DELETE | BACKSPACE => {
                if secret.pop() {
                    show(display, erase);
                }
                None
            }
            CARRIAGE_RETURN | LINE_FEED => Some(Stop::Enter),
            ETX => Some(Stop::Interrupt),
            NUL => None,
            other => {
                secret.push(other);
                match policy {
                    EchoPolicy::Hidden => {}
                    EchoPolicy::Masked => show(display, &mask),
                    EchoPolicy::Echoed => show(display, &[other]),
                }
                None
            }
        }
    });

    tracing::debug!(
        %policy,
        consumed,
        kept = secret.len(),
        stop = stop.as_ref().map_or("limit", Stop::label),
        "secret read finished"
    );

    let error = match stop {
        Some(Stop::Enter) => return Ok(secret),
        Some(Stop::Interrupt) => ReadError::Interrupted,
        Some(Stop::Failed(err)) => ReadError::Io(err),
        None => ReadError::MaxLengthExceeded {
            limit: config.max_length,
        },
    };
    Err(ReadFailure::new(error, secret))
}

/// Echo output is cosmetic: a broken display must not lose the secret being typed.
fn show<W: Write + ?Sized>(display: &mut W, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    if let Err(err) = display.write_all(bytes).and_then(|()| display.flush()) {
        tracing::debug!(error = %err, "echo write failed");
    }
}

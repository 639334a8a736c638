//! Secret byte buffer that never reallocates mid-read and wipes itself on drop.

use zeroize::{Zeroize, Zeroizing};

/// Bytes collected by the input loop.
///
/// Capacity is reserved up front so pushing within the reservation never moves the
/// contents and leaves a stale copy behind in freed memory. The buffer is zeroed when dropped.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct SecretBytes {
    bytes: Vec<u8>,
}

impl SecretBytes {
    /// # Panics
    ///
    /// Panics like [`Vec::with_capacity`] when `capacity` exceeds `isize::MAX` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Remove the last byte; returns `false` when the buffer was already empty.
    pub(crate) fn pop(&mut self) -> bool {
        match self.bytes.pop() {
            Some(mut byte) => {
                byte.zeroize();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hand the bytes over in a wrapper that still zeroes them on drop.
    #[must_use]
    pub fn into_zeroizing(mut self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(std::mem::take(&mut self.bytes))
    }
}

impl From<Vec<u8>> for SecretBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl AsRef<[u8]> for SecretBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretBytes([REDACTED; {}])", self.bytes.len())
    }
}

impl Drop for SecretBytes {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

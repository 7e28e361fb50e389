//! Signed blobs produced by the sign entry point.

use std::fmt;

/// Self-authenticating blob: `message_len + signature_bytes` opaque bytes.
///
/// Passed whole into open/verify; its internal layout belongs to the native
/// backend. The message length is not embedded, so callers that need it
/// track it themselves.
#[must_use = "signature must be stored or transmitted"]
#[derive(Clone, PartialEq, Eq)]
pub struct SignedBlob {
    bytes: Vec<u8>,
}

impl SignedBlob {
    /// Raw blob bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take ownership of the raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Blob length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for SignedBlob {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<&[u8]> for SignedBlob {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }
}

impl AsRef<[u8]> for SignedBlob {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SignedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignedBlob({} bytes)", self.bytes.len())
    }
}

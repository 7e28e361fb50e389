//! Error types for `sqisign-core`.
//!
//! Messages carry lengths and native status codes only. Key bytes, message
//! bytes and recovered content never appear in an error.

use thiserror::Error;

/// Errors produced at the native signature boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// A boundary buffer could not be acquired (or its size overflowed).
    #[error("buffer allocation failed: {0}")]
    Allocation(String),

    /// The native keypair entry point returned a nonzero status.
    #[error("key generation failed: {0}")]
    Generation(String),

    /// The native sign entry point returned a nonzero status or broke the
    /// written-length contract.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Caller-supplied lengths violate the boundary contract. Detected before
    /// any native call.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The native open or verify entry point rejected the input. Corrupted
    /// blobs, wrong keys and tampered messages are not distinguished.
    #[error("signature verification failed")]
    Verification,

    /// The blob opened, but its recovered content differs from the digest.
    #[error("recovered message does not match digest")]
    DigestMismatch,

    /// Raw bytes for key reconstruction have the wrong length or encoding.
    #[error("invalid key material: {0}")]
    Deserialization(String),

    /// Size parameters are not positive.
    #[error("invalid size parameters: {0}")]
    InvalidParameters(String),
}

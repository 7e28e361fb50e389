//! Digest-oriented signing interface on top of [`SigningEngine`].
//!
//! Callers that only deal in "sign this digest" / "check this signature
//! against this digest" use [`SignerAdapter`]. Verification opens the blob
//! and compares the recovered content with the expected digest, so a valid
//! blob over some other content is reported as
//! [`CryptoError::DigestMismatch`] rather than accepted.

use zeroize::Zeroizing;

use crate::blob::SignedBlob;
use crate::engine::SigningEngine;
use crate::error::CryptoError;
use crate::keys::{PrivateKey, PublicKey};

/// Constant-time byte comparison.
///
/// Returns `true` iff both slices have equal length and identical contents.
/// The digest length is not secret, only its value.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Sign/verify digests through one engine.
#[derive(Clone, Copy, Debug)]
pub struct SignerAdapter<'e> {
    engine: &'e SigningEngine,
}

impl<'e> SignerAdapter<'e> {
    #[must_use]
    pub const fn new(engine: &'e SigningEngine) -> Self {
        Self { engine }
    }

    /// The engine every call goes through.
    #[must_use]
    pub const fn engine(&self) -> &'e SigningEngine {
        self.engine
    }

    /// Sign `digest` with `private_key`. Identical to [`SigningEngine::sign`].
    ///
    /// # Errors
    ///
    /// Same as [`SigningEngine::sign`].
    pub fn sign(&self, private_key: &PrivateKey, digest: &[u8]) -> Result<SignedBlob, CryptoError> {
        self.engine.sign(private_key, digest)
    }

    /// Open `signature` under `public_key` and require that it carries
    /// exactly `digest`.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::Verification`] if the blob does not open (including
    ///   blobs too short to hold a signature)
    /// - [`CryptoError::DigestMismatch`] if it opens to different content
    /// - [`CryptoError::Allocation`] if the recovery buffer cannot be acquired
    pub fn verify(
        &self,
        public_key: &PublicKey,
        digest: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError> {
        let recovered = Zeroizing::new(self.engine.open(public_key, signature).map_err(
            |e| match e {
                CryptoError::Allocation(_) => e,
                _ => CryptoError::Verification,
            },
        )?);
        if !constant_time_eq(&recovered, digest) {
            tracing::debug!(
                key = %public_key.fingerprint(),
                digest_len = digest.len(),
                recovered_len = recovered.len(),
                "signature opened to a different digest"
            );
            return Err(CryptoError::DigestMismatch);
        }
        Ok(())
    }

    /// Bind `private_key` for repeated signing.
    #[must_use]
    pub const fn bind(self, private_key: PrivateKey) -> DigestSigner<'e> {
        DigestSigner {
            adapter: self,
            private_key,
        }
    }
}

#[cfg(any(feature = "native", feature = "reference"))]
impl Default for SignerAdapter<'static> {
    fn default() -> Self {
        Self::new(SigningEngine::global())
    }
}

/// A [`SignerAdapter`] that owns its private key.
#[derive(Debug)]
pub struct DigestSigner<'e> {
    adapter: SignerAdapter<'e>,
    private_key: PrivateKey,
}

impl DigestSigner<'_> {
    /// Sign `digest` with the bound key.
    ///
    /// # Errors
    ///
    /// Same as [`SigningEngine::sign`].
    pub fn sign(&self, digest: &[u8]) -> Result<SignedBlob, CryptoError> {
        self.adapter.sign(&self.private_key, digest)
    }

    /// Public half recorded with the bound key, if any.
    #[must_use]
    pub const fn public_key(&self) -> Option<&PublicKey> {
        self.private_key.public_key()
    }

    /// Release the bound key.
    #[must_use]
    pub fn into_private_key(self) -> PrivateKey {
        self.private_key
    }
}

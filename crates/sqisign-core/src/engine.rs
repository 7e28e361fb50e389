//! Signing engine: the only caller of the native entry points.
//!
//! This module provides:
//! - [`SigningEngine::generate_keypair`]: fresh key pair, both halves returned
//!   to the caller
//! - [`SigningEngine::sign`]: signed blob of `message_len + signature_bytes`
//! - [`SigningEngine::open`]: message recovery from a signed blob
//! - [`SigningEngine::verify`]: boolean check through the native verify
//!   entry point, independent of `open`
//!
//! # Buffer discipline
//!
//! Every output buffer is allocated immediately before its native call,
//! zero-filled with binary zero and sized exactly from [`SizeParameters`].
//! Written-length out-parameters are seeded with the capacity and the value
//! the native side reports back is authoritative; a report larger than the
//! capacity is treated as a failure. Scratch buffers are owned by the call
//! that allocated them and dropped (wiped) on every exit path.
//!
//! # Concurrency
//!
//! Non-reentrant backends are serialized by one mutex held for exactly one
//! native call. Reentrant backends run unguarded.

use std::sync::{Mutex, MutexGuard, PoisonError};

use sqisign_sys::{c_int, c_ulonglong};
use tracing::{debug, warn};

use crate::backend::NativeBackend;
use crate::blob::SignedBlob;
use crate::error::CryptoError;
use crate::keys::{KeyPair, PrivateKey, PublicKey};
use crate::memory::{ScratchBuffer, SecretBuffer};
use crate::params::SizeParameters;

/// Safe wrapper around one [`NativeBackend`].
#[derive(Debug)]
pub struct SigningEngine {
    backend: NativeBackend,
    serial: Option<Mutex<()>>,
}

fn native_len(len: usize, what: &str) -> Result<c_ulonglong, CryptoError> {
    c_ulonglong::try_from(len)
        .map_err(|_| CryptoError::MalformedInput(format!("{what} length {len} exceeds native range")))
}

impl SigningEngine {
    /// Wrap `backend`, serializing its calls unless it is reentrant.
    #[must_use]
    pub fn new(backend: NativeBackend) -> Self {
        Self {
            serial: (!backend.reentrant).then(|| Mutex::new(())),
            backend,
        }
    }

    /// Process-wide engine over [`NativeBackend::default_backend`],
    /// initialized on first use. Requires feature `native` or `reference`.
    #[cfg(any(feature = "native", feature = "reference"))]
    pub fn global() -> &'static Self {
        use std::sync::OnceLock;

        static ENGINE: OnceLock<SigningEngine> = OnceLock::new();
        ENGINE.get_or_init(|| {
            let engine = Self::new(NativeBackend::default_backend());
            let p = engine.params();
            tracing::info!(
                algorithm = p.algorithm_name,
                public_key_bytes = p.public_key_bytes,
                secret_key_bytes = p.secret_key_bytes,
                signature_bytes = p.signature_bytes,
                serialized = engine.serial.is_some(),
                "signing engine initialized"
            );
            engine
        })
    }

    /// Size parameters every buffer of this engine is sized from.
    #[must_use]
    pub const fn params(&self) -> &SizeParameters {
        &self.backend.params
    }

    /// The wrapped backend.
    #[must_use]
    pub const fn backend(&self) -> &NativeBackend {
        &self.backend
    }

    /// Enter a native call. Holds the serialization lock for non-reentrant
    /// backends; the lock guards no data, so poisoning is ignored.
    fn enter(&self) -> Option<MutexGuard<'_, ()>> {
        self.serial
            .as_ref()
            .map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn check_public_key(&self, public_key: &PublicKey) -> Result<(), CryptoError> {
        let expected = self.params().public_key_bytes;
        if public_key.len() != expected {
            return Err(CryptoError::MalformedInput(format!(
                "public key is {} bytes (expected {expected})",
                public_key.len()
            )));
        }
        Ok(())
    }

    fn check_private_key(&self, private_key: &PrivateKey) -> Result<(), CryptoError> {
        let expected = self.params().secret_key_bytes;
        if private_key.len() != expected {
            return Err(CryptoError::MalformedInput(format!(
                "private key is {} bytes (expected {expected})",
                private_key.len()
            )));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Key generation
    // -----------------------------------------------------------------------

    /// Generate a key pair with one native keypair call.
    ///
    /// The private key is written straight into a [`SecretBuffer`]; on
    /// failure both buffers are released and no partial pair escapes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Allocation`] if a buffer cannot be acquired, or
    /// [`CryptoError::Generation`] on a nonzero native status.
    pub fn generate_keypair(&self) -> Result<KeyPair, CryptoError> {
        let p = self.params();
        let mut pk = ScratchBuffer::zeroed(p.public_key_bytes, "public key buffer")?;
        let mut sk = SecretBuffer::zeroed(p.secret_key_bytes)?;

        let status: c_int = {
            let _serial = self.enter();
            // SAFETY: `pk` and `sk` are exactly `public_key_bytes` and
            // `secret_key_bytes` long and outlive the call.
            unsafe { (self.backend.keypair)(pk.as_mut_ptr(), sk.expose_mut().as_mut_ptr()) }
        };
        if status != 0 {
            warn!(algorithm = p.algorithm_name, status, "native keypair failed");
            return Err(CryptoError::Generation(format!("native status {status}")));
        }

        let public = PublicKey::from_native(pk.into_vec());
        debug!(
            algorithm = p.algorithm_name,
            key = %public.fingerprint(),
            "generated key pair"
        );
        Ok(KeyPair {
            private: PrivateKey::from_native(sk, public.clone()),
            public,
        })
    }

    // -----------------------------------------------------------------------
    // Sign
    // -----------------------------------------------------------------------

    /// Sign `message`, producing a blob of `message.len() + signature_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedInput`] if the private key has the
    /// wrong length, [`CryptoError::Allocation`] if the output buffer cannot
    /// be acquired, or [`CryptoError::Signing`] on a nonzero native status or
    /// an impossible written length.
    pub fn sign(&self, private_key: &PrivateKey, message: &[u8]) -> Result<SignedBlob, CryptoError> {
        let p = self.params();
        self.check_private_key(private_key)?;
        let capacity = p.signed_len(message.len()).ok_or_else(|| {
            CryptoError::Allocation(format!(
                "signed blob size overflows for a {}-byte message",
                message.len()
            ))
        })?;
        let message_len = native_len(message.len(), "message")?;
        let mut written = native_len(capacity, "signed blob")?;
        let mut sm = ScratchBuffer::zeroed(capacity, "signed blob buffer")?;

        let status: c_int = {
            let _serial = self.enter();
            // SAFETY: `sm` holds `capacity` bytes and `written` is seeded with
            // that capacity; `message` and the key are valid for their
            // lengths and outlive the call.
            unsafe {
                (self.backend.sign)(
                    sm.as_mut_ptr(),
                    &mut written,
                    message.as_ptr(),
                    message_len,
                    private_key.expose_secret().as_ptr(),
                )
            }
        };
        if status != 0 {
            warn!(algorithm = p.algorithm_name, status, "native sign failed");
            return Err(CryptoError::Signing(format!("native status {status}")));
        }

        let bytes = usize::try_from(written)
            .ok()
            .and_then(|len| sm.into_prefix(len))
            .ok_or_else(|| {
                warn!(
                    algorithm = p.algorithm_name,
                    written, capacity, "native sign reported more bytes than it was given"
                );
                CryptoError::Signing(format!(
                    "native layer reported {written} bytes for a {capacity}-byte buffer"
                ))
            })?;
        debug!(
            algorithm = p.algorithm_name,
            message_len = message.len(),
            blob_len = bytes.len(),
            "signed message"
        );
        Ok(SignedBlob::from(bytes))
    }

    // -----------------------------------------------------------------------
    // Open
    // -----------------------------------------------------------------------

    /// Verify `signed` under `public_key` and recover the embedded message.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedInput`] if the blob is shorter than
    /// `signature_bytes` or the key has the wrong length (no native call is
    /// made), [`CryptoError::Allocation`] if the output buffer cannot be
    /// acquired, or [`CryptoError::Verification`] if the native layer rejects
    /// the blob.
    pub fn open(&self, public_key: &PublicKey, signed: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let p = self.params();
        self.check_public_key(public_key)?;
        let capacity = p.message_capacity(signed.len()).ok_or_else(|| {
            CryptoError::MalformedInput(format!(
                "signed blob is {} bytes (minimum {})",
                signed.len(),
                p.signature_bytes
            ))
        })?;
        let signed_len = native_len(signed.len(), "signed blob")?;
        let mut written = native_len(capacity, "message")?;
        let mut m = ScratchBuffer::zeroed(capacity, "recovered message buffer")?;

        let status: c_int = {
            let _serial = self.enter();
            // SAFETY: `m` holds `capacity` bytes and `written` is seeded with
            // that capacity; `signed` and the key are valid for their lengths
            // and outlive the call.
            unsafe {
                (self.backend.open)(
                    m.as_mut_ptr(),
                    &mut written,
                    signed.as_ptr(),
                    signed_len,
                    public_key.as_bytes().as_ptr(),
                )
            }
        };
        if status != 0 {
            debug!(
                algorithm = p.algorithm_name,
                status,
                key = %public_key.fingerprint(),
                "native open rejected blob"
            );
            return Err(CryptoError::Verification);
        }

        let message = usize::try_from(written)
            .ok()
            .and_then(|len| m.into_prefix(len))
            .ok_or_else(|| {
                warn!(
                    algorithm = p.algorithm_name,
                    written, capacity, "native open reported more bytes than it was given"
                );
                CryptoError::Verification
            })?;
        debug!(
            algorithm = p.algorithm_name,
            blob_len = signed.len(),
            message_len = message.len(),
            key = %public_key.fingerprint(),
            "opened signed blob"
        );
        Ok(message)
    }

    // -----------------------------------------------------------------------
    // Verify
    // -----------------------------------------------------------------------

    /// Check `signature` over `message` under `public_key` with the native
    /// verify entry point. No message is recovered.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedInput`] if the signature is shorter
    /// than `signature_bytes` or the key has the wrong length (no native call
    /// is made), or [`CryptoError::Verification`] if the native layer rejects
    /// the signature.
    pub fn verify(
        &self,
        public_key: &PublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError> {
        let p = self.params();
        self.check_public_key(public_key)?;
        if signature.len() < p.signature_bytes {
            return Err(CryptoError::MalformedInput(format!(
                "signature is {} bytes (minimum {})",
                signature.len(),
                p.signature_bytes
            )));
        }
        let message_len = native_len(message.len(), "message")?;
        let signature_len = native_len(signature.len(), "signature")?;

        let status: c_int = {
            let _serial = self.enter();
            // SAFETY: all three inputs are valid for their lengths and
            // outlive the call; nothing is written.
            unsafe {
                (self.backend.verify)(
                    message.as_ptr(),
                    message_len,
                    signature.as_ptr(),
                    signature_len,
                    public_key.as_bytes().as_ptr(),
                )
            }
        };
        if status != 0 {
            debug!(
                algorithm = p.algorithm_name,
                status,
                key = %public_key.fingerprint(),
                "native verify rejected signature"
            );
            return Err(CryptoError::Verification);
        }
        debug!(
            algorithm = p.algorithm_name,
            message_len = message.len(),
            key = %public_key.fingerprint(),
            "verified signature"
        );
        Ok(())
    }
}

#[cfg(any(feature = "native", feature = "reference"))]
impl Default for SigningEngine {
    fn default() -> Self {
        Self::new(NativeBackend::default_backend())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

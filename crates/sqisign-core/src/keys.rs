//! Key material: [`PublicKey`], [`PrivateKey`] and [`KeyPair`].
//!
//! Both key types are fixed-length opaque byte strings. Reconstruction from
//! raw bytes validates the length against a [`SizeParameters`] set; there is
//! no other structure to check, the native backend owns the encoding.

use std::fmt;
use std::sync::Arc;

use data_encoding::HEXLOWER_PERMISSIVE;
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::memory::SecretBuffer;
use crate::params::SizeParameters;

/// Bytes of the BLAKE3 digest shown as a key fingerprint.
const FINGERPRINT_LEN: usize = 8;

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// Public verification key, exactly `public_key_bytes` long.
///
/// Safe to distribute publicly. `Display` renders lowercase hex. Clones
/// share one immutable byte buffer.
#[must_use = "public key must be stored or published"]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    bytes: Arc<[u8]>,
}

impl PublicKey {
    /// Reconstruct a public key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Deserialization`] if `bytes` is not exactly
    /// `params.public_key_bytes` long.
    pub fn from_bytes(params: &SizeParameters, bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != params.public_key_bytes {
            return Err(CryptoError::Deserialization(format!(
                "invalid public key length: {} bytes (expected {})",
                bytes.len(),
                params.public_key_bytes
            )));
        }
        Ok(Self {
            bytes: bytes.into(),
        })
    }

    /// Parse a hex-encoded public key (either case).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Deserialization`] if the text is not valid hex
    /// or decodes to the wrong length.
    pub fn from_hex(params: &SizeParameters, hex: &str) -> Result<Self, CryptoError> {
        let bytes = HEXLOWER_PERMISSIVE
            .decode(hex.trim().as_bytes())
            .map_err(|e| CryptoError::Deserialization(format!("invalid public key hex: {e}")))?;
        Self::from_bytes(params, &bytes)
    }

    pub(crate) fn from_native(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Owned copy of the raw key bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false` for keys built through this crate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Short BLAKE3 fingerprint (16 hex characters) for logs and display.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = blake3::hash(&self.bytes);
        data_encoding::HEXLOWER.encode(&digest.as_bytes()[..FINGERPRINT_LEN])
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("len", &self.bytes.len())
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&data_encoding::HEXLOWER.encode(&self.bytes))
    }
}

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

/// Secret signing key, exactly `secret_key_bytes` long.
///
/// Stored in a [`SecretBuffer`] (mlocked, zeroized on drop). Not `Clone`:
/// use [`PrivateKey::try_duplicate`] for an explicit copy. `Debug` never
/// shows the bytes.
pub struct PrivateKey {
    secret: SecretBuffer,
    public: Option<PublicKey>,
}

impl PrivateKey {
    /// Reconstruct a private key from raw bytes.
    ///
    /// The reconstructed key has no attached public key; see
    /// [`PrivateKey::with_public_key`].
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Deserialization`] if `bytes` is not exactly
    /// `params.secret_key_bytes` long, or [`CryptoError::Allocation`] if the
    /// secure buffer cannot be allocated.
    pub fn from_bytes(params: &SizeParameters, bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != params.secret_key_bytes {
            return Err(CryptoError::Deserialization(format!(
                "invalid private key length: {} bytes (expected {})",
                bytes.len(),
                params.secret_key_bytes
            )));
        }
        Ok(Self {
            secret: SecretBuffer::new(bytes)?,
            public: None,
        })
    }

    pub(crate) fn from_native(secret: SecretBuffer, public: PublicKey) -> Self {
        Self {
            secret,
            public: Some(public),
        }
    }

    /// Attach the matching public key for later lookup.
    pub fn with_public_key(mut self, public: PublicKey) -> Self {
        self.public = Some(public);
        self
    }

    /// The public half recorded at generation (or attached explicitly).
    ///
    /// For keys from [`SigningEngine::generate_keypair`] this is a handle on
    /// the same bytes as [`KeyPair::public`], not a separate copy.
    ///
    /// [`SigningEngine::generate_keypair`]: crate::engine::SigningEngine::generate_keypair
    #[must_use]
    pub const fn public_key(&self) -> Option<&PublicKey> {
        self.public.as_ref()
    }

    /// Raw secret bytes. Exporting them is a security event: keep the
    /// returned slice short-lived.
    #[must_use]
    pub fn expose_secret(&self) -> &[u8] {
        self.secret.expose()
    }

    /// Owned copy of the raw secret bytes, wiped when dropped.
    #[must_use]
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(self.secret.expose().to_vec())
    }

    /// Explicit bytewise copy of the key (and its public back-reference).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Allocation`] if the secure buffer cannot be
    /// allocated.
    pub fn try_duplicate(&self) -> Result<Self, CryptoError> {
        Ok(Self {
            secret: self.secret.try_duplicate()?,
            public: self.public.clone(),
        })
    }

    /// Key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.secret.len()
    }

    /// Always `false` for keys built through this crate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(***)")
    }
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// Both halves of a freshly generated key pair, owned by the caller.
#[derive(Debug)]
pub struct KeyPair {
    /// Public half (safe to share).
    pub public: PublicKey,
    /// Private half; its [`PrivateKey::public_key`] points at a copy of
    /// `public`.
    pub private: PrivateKey,
}

impl KeyPair {
    /// Split into `(public, private)`.
    #[must_use]
    pub fn into_parts(self) -> (PublicKey, PrivateKey) {
        (self.public, self.private)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

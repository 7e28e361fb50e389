//! Size parameters of the active signature configuration.
//!
//! This module provides:
//! - [`SecurityLevel`]: the SQIsign parameter set selected at build time
//! - [`SizeParameters`]: the three byte lengths plus the algorithm name that
//!   size every buffer crossing the native boundary
//!
//! Parameters are resolved once per process ([`SizeParameters::active`]) and
//! are read-only afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(any(feature = "native", feature = "reference"))]
use crate::engine::SigningEngine;
use crate::error::CryptoError;

// ---------------------------------------------------------------------------
// SecurityLevel
// ---------------------------------------------------------------------------

/// SQIsign security level (NIST category).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityLevel {
    /// NIST category I.
    #[serde(rename = "lvl1")]
    Level1,
    /// NIST category III.
    #[serde(rename = "lvl3")]
    Level3,
    /// NIST category V.
    #[serde(rename = "lvl5")]
    Level5,
}

impl SecurityLevel {
    /// The level the native library is built for (cargo features `lvl1`,
    /// `lvl3`, `lvl5`; the highest enabled one wins).
    #[must_use]
    pub const fn active() -> Self {
        match sqisign_sys::BUILD_LEVEL {
            5 => Self::Level5,
            3 => Self::Level3,
            _ => Self::Level1,
        }
    }

    /// NIST category number.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Level1 => 1,
            Self::Level3 => 3,
            Self::Level5 => 5,
        }
    }

    /// SQIsign size constants for this level.
    #[must_use]
    pub const fn sqisign_parameters(self) -> SizeParameters {
        let c = match self {
            Self::Level1 => sqisign_sys::LVL1,
            Self::Level3 => sqisign_sys::LVL3,
            Self::Level5 => sqisign_sys::LVL5,
        };
        SizeParameters {
            public_key_bytes: c.public_key_bytes,
            secret_key_bytes: c.secret_key_bytes,
            signature_bytes: c.signature_bytes,
            algorithm_name: c.algorithm_name,
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lvl{}", self.number())
    }
}

impl FromStr for SecurityLevel {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "lvl1" => Ok(Self::Level1),
            "3" | "lvl3" => Ok(Self::Level3),
            "5" | "lvl5" => Ok(Self::Level5),
            other => Err(CryptoError::InvalidParameters(format!(
                "unknown security level {other:?} (expected 1, 3 or 5)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// SizeParameters
// ---------------------------------------------------------------------------

/// Byte lengths every boundary buffer is sized from.
///
/// Use [`SizeParameters::new`] to construct with validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SizeParameters {
    /// Public key length (`CRYPTO_PUBLICKEYBYTES`).
    pub public_key_bytes: usize,
    /// Secret key length (`CRYPTO_SECRETKEYBYTES`).
    pub secret_key_bytes: usize,
    /// Bytes a sign operation adds to the message (`CRYPTO_BYTES`).
    pub signature_bytes: usize,
    /// Algorithm name (`CRYPTO_ALGNAME`).
    pub algorithm_name: &'static str,
}

impl SizeParameters {
    /// Create a parameter set, rejecting zero lengths.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidParameters`] if any length is zero or the
    /// algorithm name is empty.
    pub fn new(
        public_key_bytes: usize,
        secret_key_bytes: usize,
        signature_bytes: usize,
        algorithm_name: &'static str,
    ) -> Result<Self, CryptoError> {
        let params = Self {
            public_key_bytes,
            secret_key_bytes,
            signature_bytes,
            algorithm_name,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check that every length is positive and the name is set.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidParameters`] naming the first bad field.
    pub fn validate(&self) -> Result<(), CryptoError> {
        for (what, len) in [
            ("public key", self.public_key_bytes),
            ("secret key", self.secret_key_bytes),
            ("signature overhead", self.signature_bytes),
        ] {
            if len == 0 {
                return Err(CryptoError::InvalidParameters(format!(
                    "{what} length must be positive"
                )));
            }
        }
        if self.algorithm_name.is_empty() {
            return Err(CryptoError::InvalidParameters(
                "algorithm name must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Parameters of the process-wide default backend, resolved on first use.
    ///
    /// With the SQIsign backend (or no backend compiled in) these are
    /// [`SecurityLevel::active`]'s constants. Only a build that enables the
    /// `reference` feature without `native` reports ML-DSA-65 sizes.
    pub fn active() -> &'static Self {
        #[cfg(any(feature = "native", feature = "reference"))]
        {
            SigningEngine::global().params()
        }
        #[cfg(not(any(feature = "native", feature = "reference")))]
        {
            static BUILD_LEVEL: SizeParameters = SecurityLevel::active().sqisign_parameters();
            &BUILD_LEVEL
        }
    }

    /// Length of the signed blob for a `message_len`-byte message.
    ///
    /// Returns `None` if the sum overflows `usize`.
    #[must_use]
    pub const fn signed_len(&self, message_len: usize) -> Option<usize> {
        message_len.checked_add(self.signature_bytes)
    }

    /// Capacity needed to open a `signed_len`-byte blob.
    ///
    /// Returns `None` if the blob is shorter than the signature overhead.
    #[must_use]
    pub const fn message_capacity(&self, signed_len: usize) -> Option<usize> {
        signed_len.checked_sub(self.signature_bytes)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

//! Native backends: the four foreign entry points as a value.
//!
//! A [`NativeBackend`] bundles the size parameters of a signature library
//! with its `keypair` / `sign` / `open` / `verify` entry points (C ABI, see
//! `sqisign-sys`) and whether those entry points may run concurrently.
//!
//! - [`NativeBackend::sqisign`]: the linked SQIsign library (feature `native`)
//! - [`NativeBackend::reference`]: pure-Rust ML-DSA-65 behind the same ABI
//!   (feature `reference`)
//! - [`NativeBackend::new`]: any other implementation
//!
//! The process-wide default is SQIsign whenever `native` is enabled. The
//! reference backend only becomes the default when it is requested
//! explicitly and `native` is off; its sizes are ML-DSA-65's, independent of
//! the `lvl*` features.

use std::fmt;

use sqisign_sys::{KeypairFn, OpenFn, SignFn, VerifyFn};

use crate::error::CryptoError;
use crate::params::SizeParameters;

#[cfg(feature = "reference")]
pub mod reference;

/// The four native entry points plus the parameters that size their buffers.
#[derive(Clone, Copy)]
pub struct NativeBackend {
    pub(crate) params: SizeParameters,
    pub(crate) reentrant: bool,
    pub(crate) keypair: KeypairFn,
    pub(crate) sign: SignFn,
    pub(crate) open: OpenFn,
    pub(crate) verify: VerifyFn,
}

impl NativeBackend {
    /// Wrap an arbitrary implementation of the native ABI.
    ///
    /// Set `reentrant` only if the implementation keeps no hidden shared
    /// state; otherwise the engine serializes every call.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidParameters`] if `params` has a zero
    /// length or an empty name.
    pub fn new(
        params: SizeParameters,
        reentrant: bool,
        keypair: KeypairFn,
        sign: SignFn,
        open: OpenFn,
        verify: VerifyFn,
    ) -> Result<Self, CryptoError> {
        params.validate()?;
        Ok(Self {
            params,
            reentrant,
            keypair,
            sign,
            open,
            verify,
        })
    }

    /// The linked SQIsign library at the build-selected security level.
    ///
    /// SQIsign's reentrancy has not been validated, so calls are serialized.
    #[cfg(feature = "native")]
    #[must_use]
    pub fn sqisign() -> Self {
        Self {
            params: crate::params::SecurityLevel::active().sqisign_parameters(),
            reentrant: false,
            keypair: sqisign_sys::sqisign_keypair,
            sign: sqisign_sys::sqisign_sign,
            open: sqisign_sys::sqisign_open,
            verify: sqisign_sys::sqisign_verify,
        }
    }

    /// Pure-Rust ML-DSA-65 implementation of the same ABI.
    #[cfg(feature = "reference")]
    #[must_use]
    pub fn reference() -> Self {
        Self {
            params: reference::PARAMETERS,
            reentrant: true,
            keypair: reference::keypair,
            sign: reference::sign,
            open: reference::open,
            verify: reference::verify,
        }
    }

    /// SQIsign when the native library is linked; the reference backend
    /// only if it was enabled and `native` is off.
    #[cfg(any(feature = "native", feature = "reference"))]
    #[must_use]
    pub fn default_backend() -> Self {
        #[cfg(feature = "native")]
        {
            Self::sqisign()
        }
        #[cfg(not(feature = "native"))]
        {
            Self::reference()
        }
    }

    /// Size parameters of this backend.
    #[must_use]
    pub const fn params(&self) -> &SizeParameters {
        &self.params
    }

    /// Whether the entry points may be called concurrently.
    #[must_use]
    pub const fn is_reentrant(&self) -> bool {
        self.reentrant
    }
}

impl fmt::Debug for NativeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBackend")
            .field("algorithm", &self.params.algorithm_name)
            .field("params", &self.params)
            .field("reentrant", &self.reentrant)
            .finish_non_exhaustive()
    }
}

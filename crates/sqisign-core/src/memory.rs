//! Boundary buffers and secure memory for key material.
//!
//! This module provides:
//! - [`SecretBuffer`]: long-lived secret storage (mlocked, zeroized on drop,
//!   masked `Debug`/`Display`)
//! - [`ScratchBuffer`]: per-call output buffer handed to a native entry point,
//!   zero-filled with binary zero, exactly sized, wiped on drop
//!
//! Both allocate fallibly: exhaustion is reported as
//! [`CryptoError::Allocation`] instead of aborting the process.

use crate::error::CryptoError;
use secrecy::{ExposeSecret, ExposeSecretMut, SecretSlice};
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Allocate exactly `len` bytes of binary zero.
fn try_alloc_zeroed(len: usize, what: &str) -> Result<Vec<u8>, CryptoError> {
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|e| CryptoError::Allocation(format!("{what} ({len} bytes): {e}")))?;
    bytes.resize(len, 0);
    Ok(bytes)
}

// ---------------------------------------------------------------------------
// Platform-specific memory locking
// ---------------------------------------------------------------------------

/// RAII guard that unlocks memory on drop.
///
/// When created, locks a memory region via `mlock` to prevent it from being
/// swapped to disk. On drop, calls `munlock` to release the lock.
pub(crate) struct LockedRegion {
    ptr: *const u8,
    len: usize,
    locked: bool,
}

// SAFETY: The pointer is only used for mlock/munlock system calls, which
// are thread-safe. The pointed-to data is owned by SecretBuffer and is not
// accessed through LockedRegion.
unsafe impl Send for LockedRegion {}
unsafe impl Sync for LockedRegion {}

impl LockedRegion {
    /// Attempt to lock a memory region. Returns a guard that unlocks on drop.
    ///
    /// If `mlock` fails (insufficient privileges or quota), the region is
    /// **not** locked but no error is returned.
    #[must_use]
    fn try_lock(ptr: *const u8, len: usize) -> Self {
        let locked = platform::try_mlock(ptr, len);
        if !locked && len > 0 {
            static WARNED: std::sync::Once = std::sync::Once::new();
            WARNED.call_once(|| {
                tracing::warn!(
                    "mlock failed: secret key material may be swapped to disk, \
                     consider increasing RLIMIT_MEMLOCK"
                );
            });
        }
        Self { ptr, len, locked }
    }

    const fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Drop for LockedRegion {
    fn drop(&mut self) {
        if self.locked {
            platform::try_munlock(self.ptr, self.len);
        }
    }
}

// ---------------------------------------------------------------------------
// SecretBuffer
// ---------------------------------------------------------------------------

/// Variable-length buffer for secret key bytes.
///
/// Wraps [`SecretSlice<u8>`] from the `secrecy` crate and adds:
/// - `mlock` on allocation (soft fallback if unavailable)
/// - Masked `Debug` output (`SecretBuffer(***)`)
/// - Zeroization on drop (via `secrecy`'s built-in `Zeroize`)
///
/// Deliberately not `Clone`: duplicates are made with
/// [`SecretBuffer::try_duplicate`].
pub struct SecretBuffer {
    inner: SecretSlice<u8>,
    lock: LockedRegion,
}

impl SecretBuffer {
    /// Copy `data` into a new locked allocation.
    ///
    /// The caller should zeroize the source data after calling this.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Allocation`] if memory allocation fails.
    pub fn new(data: &[u8]) -> Result<Self, CryptoError> {
        let mut bytes = try_alloc_zeroed(data.len(), "secret buffer")?;
        bytes.copy_from_slice(data);
        Ok(Self::lock(bytes.into()))
    }

    /// Allocate `len` bytes of binary zero, to be filled by a native call.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Allocation`] if memory allocation fails.
    pub fn zeroed(len: usize) -> Result<Self, CryptoError> {
        Ok(Self::lock(try_alloc_zeroed(len, "secret buffer")?.into()))
    }

    fn lock(inner: SecretSlice<u8>) -> Self {
        let exposed = inner.expose_secret();
        let lock = LockedRegion::try_lock(exposed.as_ptr(), exposed.len());
        Self { inner, lock }
    }

    /// Explicit bytewise copy into a fresh locked allocation.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Allocation`] if memory allocation fails.
    pub fn try_duplicate(&self) -> Result<Self, CryptoError> {
        Self::new(self.expose())
    }

    /// Expose the underlying bytes. Use sparingly, only when the raw bytes
    /// are needed for a native call or an explicit export.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    pub(crate) fn expose_mut(&mut self) -> &mut [u8] {
        self.inner.expose_secret_mut()
    }

    /// Returns the number of bytes in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Returns `true` if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the underlying memory is `mlock`'d.
    #[must_use]
    pub const fn is_mlocked(&self) -> bool {
        self.lock.is_locked()
    }
}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBuffer(***)")
    }
}

impl fmt::Display for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBuffer(***)")
    }
}

// ---------------------------------------------------------------------------
// ScratchBuffer
// ---------------------------------------------------------------------------

/// Output buffer owned by exactly one native call.
///
/// Capacity is fixed at allocation. Whatever the call leaves behind is wiped
/// when the buffer is dropped, so every early return releases it cleanly.
pub(crate) struct ScratchBuffer {
    bytes: Zeroizing<Vec<u8>>,
}

impl ScratchBuffer {
    pub(crate) fn zeroed(len: usize, what: &str) -> Result<Self, CryptoError> {
        Ok(Self {
            bytes: Zeroizing::new(try_alloc_zeroed(len, what)?),
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr()
    }

    /// Keep the first `written` bytes and hand them to the caller.
    ///
    /// Returns `None` if `written` exceeds the capacity; the buffer is then
    /// dropped (and wiped) whole.
    pub(crate) fn into_prefix(mut self, written: usize) -> Option<Vec<u8>> {
        if written > self.capacity() {
            return None;
        }
        let mut out = std::mem::take(&mut *self.bytes);
        out[written..].zeroize();
        out.truncate(written);
        Some(out)
    }

    /// Hand the whole buffer to the caller.
    pub(crate) fn into_vec(mut self) -> Vec<u8> {
        std::mem::take(&mut *self.bytes)
    }
}

// ---------------------------------------------------------------------------
// Platform-specific implementations
// ---------------------------------------------------------------------------

#[cfg(unix)]
mod platform {
    pub(super) fn try_mlock(ptr: *const u8, len: usize) -> bool {
        if len == 0 {
            return true;
        }
        // SAFETY: mlock is safe to call with any valid pointer/length pair.
        // If the pointer is invalid, the kernel returns ENOMEM which we handle.
        unsafe { libc::mlock(ptr.cast(), len) == 0 }
    }

    pub(super) fn try_munlock(ptr: *const u8, len: usize) {
        if len == 0 {
            return;
        }
        // SAFETY: munlock is safe to call. Failure is non-critical.
        unsafe {
            libc::munlock(ptr.cast(), len);
        }
    }
}

#[cfg(not(unix))]
mod platform {
    pub(super) fn try_mlock(_ptr: *const u8, _len: usize) -> bool {
        false
    }

    pub(super) fn try_munlock(_ptr: *const u8, _len: usize) {}
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

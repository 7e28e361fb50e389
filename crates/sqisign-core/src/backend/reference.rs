//! Reference backend: ML-DSA-65 (FIPS 204) behind the native C ABI.
//!
//! Used when the SQIsign library is not linked. The entry points have the
//! exact signatures of `sqisign-sys`, so the engine drives them through the
//! same raw-pointer boundary as the real library.
//!
//! Blob layout: `signature (3309 bytes) || message`. `verify` accepts either
//! the detached signature or a whole blob whose embedded message must equal
//! the supplied one.
//!
//! Status codes: `0` success, [`STATUS_INVALID_ARGUMENT`] for bad pointers or
//! lengths, [`STATUS_RNG_FAILURE`] if the OS RNG fails,
//! [`STATUS_REJECTED`] for signing or verification failures.

use std::ptr;
use std::slice;

use libcrux_ml_dsa::ml_dsa_65::{
    self, MLDSA65Signature, MLDSA65SigningKey, MLDSA65VerificationKey,
};
use rand::rngs::OsRng;
use rand::RngCore;
use sqisign_sys::{c_int, c_uchar, c_ulonglong};
use zeroize::Zeroize;

use crate::params::SizeParameters;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// ML-DSA-65 verification key (public key) length in bytes (FIPS 204).
pub const VERIFICATION_KEY_LEN: usize = 1952;

/// ML-DSA-65 signing key (private key) length in bytes (FIPS 204).
pub const SIGNING_KEY_LEN: usize = 4032;

/// ML-DSA-65 signature length in bytes (FIPS 204).
pub const SIGNATURE_LEN: usize = 3309;

/// Size parameters of the reference backend.
pub const PARAMETERS: SizeParameters = SizeParameters {
    public_key_bytes: VERIFICATION_KEY_LEN,
    secret_key_bytes: SIGNING_KEY_LEN,
    signature_bytes: SIGNATURE_LEN,
    algorithm_name: "ML-DSA-65",
};

pub const STATUS_INVALID_ARGUMENT: c_int = -1;
pub const STATUS_RNG_FAILURE: c_int = -2;
pub const STATUS_REJECTED: c_int = -3;

const STATUS_OK: c_int = 0;

/// Key generation and signing randomness size (32 bytes).
const RAND_LEN: usize = 32;

/// ML-DSA context string for domain separation.
const CONTEXT: &[u8] = b"SQISIGN-CORE-REFERENCE-v1";

// ---------------------------------------------------------------------------
// Pointer helpers
// ---------------------------------------------------------------------------

/// Borrow `len` bytes at `ptr`. A zero length never dereferences `ptr`.
///
/// # Safety
///
/// For nonzero `len`, `ptr` must be valid for reads of `len` bytes for `'a`.
unsafe fn input<'a>(ptr: *const c_uchar, len: c_ulonglong) -> Option<&'a [u8]> {
    let len = usize::try_from(len).ok()?;
    if len == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    // SAFETY: guaranteed by the caller.
    Some(unsafe { slice::from_raw_parts(ptr, len) })
}

/// Read the capacity seeded into a value-in/value-out length.
///
/// # Safety
///
/// `len` must be valid for reads.
unsafe fn capacity(len: *const c_ulonglong) -> Option<usize> {
    // SAFETY: guaranteed by the caller.
    usize::try_from(unsafe { *len }).ok()
}

/// # Safety
///
/// `pk` must be valid for reads of [`VERIFICATION_KEY_LEN`] bytes.
unsafe fn verification_key(pk: *const c_uchar) -> MLDSA65VerificationKey {
    let mut bytes = [0u8; VERIFICATION_KEY_LEN];
    // SAFETY: guaranteed by the caller; `bytes` is a distinct local.
    unsafe { ptr::copy_nonoverlapping(pk, bytes.as_mut_ptr(), VERIFICATION_KEY_LEN) };
    MLDSA65VerificationKey::new(bytes)
}

fn check_signature(vk: &MLDSA65VerificationKey, message: &[u8], sig: &[u8]) -> bool {
    let Ok(sig_arr) = <[u8; SIGNATURE_LEN]>::try_from(sig) else {
        return false;
    };
    let signature = MLDSA65Signature::new(sig_arr);
    ml_dsa_65::verify(vk, message, CONTEXT, &signature).is_ok()
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// `keypair(pk_out[1952], sk_out[4032])`.
///
/// # Safety
///
/// `pk` and `sk` must be valid for writes of [`VERIFICATION_KEY_LEN`] and
/// [`SIGNING_KEY_LEN`] bytes respectively.
pub unsafe extern "C" fn keypair(pk: *mut c_uchar, sk: *mut c_uchar) -> c_int {
    if pk.is_null() || sk.is_null() {
        return STATUS_INVALID_ARGUMENT;
    }

    let mut keygen_rand = [0u8; RAND_LEN];
    if OsRng.try_fill_bytes(&mut keygen_rand).is_err() {
        return STATUS_RNG_FAILURE;
    }
    let kp = ml_dsa_65::generate_key_pair(keygen_rand);
    keygen_rand.zeroize();

    // libcrux key types do not implement `Zeroize`; the signing key copy in
    // `kp` is released unwiped. The caller's buffer is the authoritative copy.
    let vk: &[u8] = kp.verification_key.as_ref();
    let signing_key: &[u8] = kp.signing_key.as_slice();
    if vk.len() != VERIFICATION_KEY_LEN || signing_key.len() != SIGNING_KEY_LEN {
        return STATUS_REJECTED;
    }

    // SAFETY: lengths checked above; output buffers guaranteed by the caller.
    unsafe {
        ptr::copy_nonoverlapping(vk.as_ptr(), pk, VERIFICATION_KEY_LEN);
        ptr::copy_nonoverlapping(signing_key.as_ptr(), sk, SIGNING_KEY_LEN);
    }
    STATUS_OK
}

/// `sign(sm_out, sm_len_out, m_in, m_len, sk_in[4032])`.
///
/// `*smlen` carries the capacity of `sm` in and the written length out.
///
/// # Safety
///
/// `sm` must be valid for writes of `*smlen` bytes, `m` for reads of `mlen`
/// bytes and `sk` for reads of [`SIGNING_KEY_LEN`] bytes.
pub unsafe extern "C" fn sign(
    sm: *mut c_uchar,
    smlen: *mut c_ulonglong,
    m: *const c_uchar,
    mlen: c_ulonglong,
    sk: *const c_uchar,
) -> c_int {
    if sm.is_null() || smlen.is_null() || sk.is_null() {
        return STATUS_INVALID_ARGUMENT;
    }
    // SAFETY: guaranteed by the caller.
    let Some(message) = (unsafe { input(m, mlen) }) else {
        return STATUS_INVALID_ARGUMENT;
    };
    let Some(total) = message.len().checked_add(SIGNATURE_LEN) else {
        return STATUS_INVALID_ARGUMENT;
    };
    // SAFETY: checked non-null above.
    match unsafe { capacity(smlen) } {
        Some(cap) if cap >= total => {}
        _ => return STATUS_INVALID_ARGUMENT,
    }
    let Ok(written) = c_ulonglong::try_from(total) else {
        return STATUS_INVALID_ARGUMENT;
    };

    let mut key_bytes = [0u8; SIGNING_KEY_LEN];
    // SAFETY: guaranteed by the caller; `key_bytes` is a distinct local.
    unsafe { ptr::copy_nonoverlapping(sk, key_bytes.as_mut_ptr(), SIGNING_KEY_LEN) };
    let signing_key = MLDSA65SigningKey::new(key_bytes);
    key_bytes.zeroize();

    let mut sign_rand = [0u8; RAND_LEN];
    if OsRng.try_fill_bytes(&mut sign_rand).is_err() {
        return STATUS_RNG_FAILURE;
    }
    let result = ml_dsa_65::sign(&signing_key, message, CONTEXT, sign_rand);
    sign_rand.zeroize();
    let Ok(signature) = result else {
        return STATUS_REJECTED;
    };
    let sig_bytes: &[u8] = signature.as_ref();
    if sig_bytes.len() != SIGNATURE_LEN {
        return STATUS_REJECTED;
    }

    // SAFETY: capacity checked above; `ptr::copy` tolerates a caller that
    // aliases the message inside the output buffer.
    unsafe {
        ptr::copy_nonoverlapping(sig_bytes.as_ptr(), sm, SIGNATURE_LEN);
        ptr::copy(message.as_ptr(), sm.add(SIGNATURE_LEN), message.len());
        *smlen = written;
    }
    STATUS_OK
}

/// `open(m_out, m_len_out, sm_in, sm_len, pk_in[1952])`.
///
/// `*mlen` carries the capacity of `m` in and the recovered length out.
///
/// # Safety
///
/// `m` must be valid for writes of `*mlen` bytes, `sm` for reads of `smlen`
/// bytes and `pk` for reads of [`VERIFICATION_KEY_LEN`] bytes.
pub unsafe extern "C" fn open(
    m: *mut c_uchar,
    mlen: *mut c_ulonglong,
    sm: *const c_uchar,
    smlen: c_ulonglong,
    pk: *const c_uchar,
) -> c_int {
    if mlen.is_null() || pk.is_null() {
        return STATUS_INVALID_ARGUMENT;
    }
    // SAFETY: guaranteed by the caller.
    let Some(signed) = (unsafe { input(sm, smlen) }) else {
        return STATUS_INVALID_ARGUMENT;
    };
    if signed.len() < SIGNATURE_LEN {
        return STATUS_INVALID_ARGUMENT;
    }
    let (sig, message) = signed.split_at(SIGNATURE_LEN);
    // SAFETY: checked non-null above.
    match unsafe { capacity(mlen) } {
        Some(cap) if cap >= message.len() => {}
        _ => return STATUS_INVALID_ARGUMENT,
    }
    if !message.is_empty() && m.is_null() {
        return STATUS_INVALID_ARGUMENT;
    }
    let Ok(recovered) = c_ulonglong::try_from(message.len()) else {
        return STATUS_INVALID_ARGUMENT;
    };

    // SAFETY: guaranteed by the caller.
    let vk = unsafe { verification_key(pk) };
    if !check_signature(&vk, message, sig) {
        return STATUS_REJECTED;
    }

    // SAFETY: capacity checked above; `m` is non-null whenever bytes are
    // copied.
    unsafe {
        if !message.is_empty() {
            ptr::copy(message.as_ptr(), m, message.len());
        }
        *mlen = recovered;
    }
    STATUS_OK
}

/// `verify(m_in, m_len, sig_in, sig_len, pk_in[1952])`.
///
/// # Safety
///
/// `m` must be valid for reads of `mlen` bytes, `sig` for reads of `siglen`
/// bytes and `pk` for reads of [`VERIFICATION_KEY_LEN`] bytes.
pub unsafe extern "C" fn verify(
    m: *const c_uchar,
    mlen: c_ulonglong,
    sig: *const c_uchar,
    siglen: c_ulonglong,
    pk: *const c_uchar,
) -> c_int {
    if pk.is_null() {
        return STATUS_INVALID_ARGUMENT;
    }
    // SAFETY: guaranteed by the caller.
    let (Some(message), Some(sig)) = (unsafe { input(m, mlen) }, unsafe { input(sig, siglen) })
    else {
        return STATUS_INVALID_ARGUMENT;
    };
    if sig.len() < SIGNATURE_LEN {
        return STATUS_INVALID_ARGUMENT;
    }
    let (detached, embedded) = sig.split_at(SIGNATURE_LEN);
    if !embedded.is_empty() && embedded != message {
        return STATUS_REJECTED;
    }

    // SAFETY: guaranteed by the caller.
    let vk = unsafe { verification_key(pk) };
    if check_signature(&vk, message, detached) {
        STATUS_OK
    } else {
        STATUS_REJECTED
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

//! `sqisign-sys`: raw C ABI of the SQIsign native library.
//!
//! This crate only declares what crosses the boundary: the four entry point
//! signatures, the per-level size constants from `api.h`, and (behind the
//! `link` feature) the `extern "C"` block itself. All buffer management lives
//! in `sqisign-core`.
//!
//! Every entry point returns `0` on success and nonzero on failure. Length
//! out-parameters are value-in/value-out: the native side overwrites them with
//! the number of bytes actually written.

pub use libc::{c_int, c_uchar, c_ulonglong};

/// `keypair(pk_out, sk_out)`.
pub type KeypairFn = unsafe extern "C" fn(pk: *mut c_uchar, sk: *mut c_uchar) -> c_int;

/// `sign(sm_out, sm_len_out, m_in, m_len, sk_in)`.
pub type SignFn = unsafe extern "C" fn(
    sm: *mut c_uchar,
    smlen: *mut c_ulonglong,
    m: *const c_uchar,
    mlen: c_ulonglong,
    sk: *const c_uchar,
) -> c_int;

/// `open(m_out, m_len_out, sm_in, sm_len, pk_in)`.
pub type OpenFn = unsafe extern "C" fn(
    m: *mut c_uchar,
    mlen: *mut c_ulonglong,
    sm: *const c_uchar,
    smlen: c_ulonglong,
    pk: *const c_uchar,
) -> c_int;

/// `verify(m_in, m_len, sig_in, sig_len, pk_in)`.
pub type VerifyFn = unsafe extern "C" fn(
    m: *const c_uchar,
    mlen: c_ulonglong,
    sig: *const c_uchar,
    siglen: c_ulonglong,
    pk: *const c_uchar,
) -> c_int;

/// Size constants of one SQIsign parameter set, as published in `api.h`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelConstants {
    /// `CRYPTO_PUBLICKEYBYTES`
    pub public_key_bytes: usize,
    /// `CRYPTO_SECRETKEYBYTES`
    pub secret_key_bytes: usize,
    /// `CRYPTO_BYTES`
    pub signature_bytes: usize,
    /// `CRYPTO_ALGNAME`
    pub algorithm_name: &'static str,
}

pub const LVL1: LevelConstants = LevelConstants {
    public_key_bytes: 64,
    secret_key_bytes: 782,
    signature_bytes: 177,
    algorithm_name: "SQIsign_lvl1",
};

pub const LVL3: LevelConstants = LevelConstants {
    public_key_bytes: 96,
    secret_key_bytes: 1138,
    signature_bytes: 263,
    algorithm_name: "SQIsign_lvl3",
};

pub const LVL5: LevelConstants = LevelConstants {
    public_key_bytes: 128,
    secret_key_bytes: 1509,
    signature_bytes: 335,
    algorithm_name: "SQIsign_lvl5",
};

/// Security level selected by cargo features (`lvl5` > `lvl3` > `lvl1`).
pub const BUILD_LEVEL: u8 = if cfg!(feature = "lvl5") {
    5
} else if cfg!(feature = "lvl3") {
    3
} else {
    1
};

/// Constants of the level the native library is built for.
pub const ACTIVE: LevelConstants = match BUILD_LEVEL {
    5 => LVL5,
    3 => LVL3,
    _ => LVL1,
};

#[cfg(feature = "link")]
extern "C" {
    pub fn sqisign_keypair(pk: *mut c_uchar, sk: *mut c_uchar) -> c_int;

    pub fn sqisign_sign(
        sm: *mut c_uchar,
        smlen: *mut c_ulonglong,
        m: *const c_uchar,
        mlen: c_ulonglong,
        sk: *const c_uchar,
    ) -> c_int;

    pub fn sqisign_open(
        m: *mut c_uchar,
        mlen: *mut c_ulonglong,
        sm: *const c_uchar,
        smlen: c_ulonglong,
        pk: *const c_uchar,
    ) -> c_int;

    pub fn sqisign_verify(
        m: *const c_uchar,
        mlen: c_ulonglong,
        sig: *const c_uchar,
        siglen: c_ulonglong,
        pk: *const c_uchar,
    ) -> c_int;
}

//! `sqisign-core` — Safe boundary around the SQIsign post-quantum signature
//! primitive.
//!
//! Every buffer handed to native code is allocated here, sized from the
//! active [`SizeParameters`], zero-filled and released on every exit path.
//! Callers only ever see owned Rust values and [`CryptoError`].
//!
//! Backends are chosen with cargo features:
//! - `native`: link the SQIsign library; sizes follow the `lvl1` / `lvl3` /
//!   `lvl5` feature
//! - `reference`: pure-Rust ML-DSA-65 behind the same C ABI, the process-wide
//!   default only when `native` is off
//!
//! With neither, only [`NativeBackend::new`] engines are available.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;
pub mod params;

pub mod blob;
pub mod keys;

pub mod backend;
pub mod engine;

pub mod adapter;

pub use adapter::{DigestSigner, SignerAdapter};
pub use backend::NativeBackend;
pub use blob::SignedBlob;
pub use engine::SigningEngine;
pub use error::CryptoError;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use memory::SecretBuffer;
pub use params::{SecurityLevel, SizeParameters};

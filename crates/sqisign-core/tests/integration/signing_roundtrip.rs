//! Integration tests for keypair → sign → open / verify through the
//! process-wide engine.
//!
//! Tests full roundtrips with realistic message sizes, tamper sensitivity,
//! cross-key rejection, idempotence and the raw length contract.

use sqisign_core::{
    CryptoError, NativeBackend, PrivateKey, PublicKey, SigningEngine, SizeParameters,
};

fn engine() -> &'static SigningEngine {
    SigningEngine::global()
}

fn overhead() -> usize {
    engine().params().signature_bytes
}

/// The canonical small scenario: sign "hello", open it, then corrupt it.
#[test]
fn hello_roundtrip_and_tamper() {
    let kp = engine().generate_keypair().expect("keygen should succeed");

    let blob = engine().sign(&kp.private, b"hello").expect("signing should succeed");
    assert_eq!(blob.len(), 5 + overhead());

    let message = engine()
        .open(&kp.public, blob.as_bytes())
        .expect("open should succeed");
    assert_eq!(message, b"hello");

    let mut tampered = blob.into_bytes();
    tampered[0] ^= 0x01;
    assert_eq!(
        engine().open(&kp.public, &tampered),
        Err(CryptoError::Verification)
    );
}

/// Roundtrip across empty, tiny, 1 KB and 64 KB messages.
#[test]
fn roundtrip_various_message_sizes() {
    let kp = engine().generate_keypair().expect("keygen should succeed");
    for len in [0usize, 1, 1024, 65_536] {
        let message: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        let blob = engine().sign(&kp.private, &message).expect("signing should succeed");
        assert_eq!(blob.len(), len + overhead(), "blob length for {len}-byte message");

        let recovered = engine()
            .open(&kp.public, blob.as_bytes())
            .expect("open should succeed");
        assert_eq!(recovered, message);
    }
}

/// Verify through the native verify entry point with the detached signature.
#[test]
fn verify_detached_signature() {
    let kp = engine().generate_keypair().expect("keygen should succeed");
    let message = b"verify without recovering the message";
    let blob = engine().sign(&kp.private, message).expect("signing should succeed");

    let signature = &blob.as_bytes()[..overhead()];
    engine()
        .verify(&kp.public, message, signature)
        .expect("verify should succeed");

    assert_eq!(
        engine().verify(&kp.public, b"a different message", signature),
        Err(CryptoError::Verification)
    );
}

/// Flipping one bit anywhere in the blob makes open fail. Samples one bit in
/// every 61st byte plus the first and last byte.
#[test]
fn single_bit_flips_are_rejected_by_open() {
    let kp = engine().generate_keypair().expect("keygen should succeed");
    let blob = engine()
        .sign(&kp.private, b"tamper sensitivity")
        .expect("signing should succeed")
        .into_bytes();

    let mut positions: Vec<usize> = (0..blob.len()).step_by(61).collect();
    positions.push(blob.len() - 1);
    for (n, pos) in positions.into_iter().enumerate() {
        let mut tampered = blob.clone();
        tampered[pos] ^= 1 << (n % 8);
        assert_eq!(
            engine().open(&kp.public, &tampered),
            Err(CryptoError::Verification),
            "bit flip at byte {pos} was not detected"
        );
    }
}

/// Flipping one bit of the detached signature makes verify fail.
#[test]
fn single_bit_flips_are_rejected_by_verify() {
    let kp = engine().generate_keypair().expect("keygen should succeed");
    let message = b"tamper sensitivity";
    let blob = engine().sign(&kp.private, message).expect("signing should succeed");
    let signature = &blob.as_bytes()[..overhead()];

    for (n, pos) in (0..signature.len()).step_by(53).enumerate() {
        let mut tampered = signature.to_vec();
        tampered[pos] ^= 1 << (n % 8);
        assert_eq!(
            engine().verify(&kp.public, message, &tampered),
            Err(CryptoError::Verification),
            "bit flip at byte {pos} was not detected"
        );
    }
}

/// Cross-key rejection: sign with key A, open/verify with key B.
#[test]
fn cross_keypair_verification_fails() {
    let kp_a = engine().generate_keypair().expect("keygen A should succeed");
    let kp_b = engine().generate_keypair().expect("keygen B should succeed");
    assert_ne!(kp_a.public, kp_b.public);

    let message = b"signed with key A";
    let blob = engine().sign(&kp_a.private, message).expect("signing should succeed");

    assert_eq!(
        engine().open(&kp_b.public, blob.as_bytes()),
        Err(CryptoError::Verification)
    );
    assert_eq!(
        engine().verify(&kp_b.public, message, &blob.as_bytes()[..overhead()]),
        Err(CryptoError::Verification)
    );
}

/// Opening or verifying the same blob twice gives the same answer.
#[test]
fn open_and_verify_are_idempotent() {
    let kp = engine().generate_keypair().expect("keygen should succeed");
    let message = b"idempotent";
    let blob = engine().sign(&kp.private, message).expect("signing should succeed");

    let first = engine().open(&kp.public, blob.as_bytes()).expect("first open");
    let second = engine().open(&kp.public, blob.as_bytes()).expect("second open");
    assert_eq!(first, second);

    let signature = &blob.as_bytes()[..overhead()];
    for _ in 0..2 {
        engine()
            .verify(&kp.public, message, signature)
            .expect("verify should succeed");
    }
}

/// Keys survive export and reconstruction from raw bytes.
#[test]
fn reconstructed_keys_interoperate() {
    let params = engine().params();
    let kp = engine().generate_keypair().expect("keygen should succeed");
    assert_eq!(kp.public.len(), params.public_key_bytes);
    assert_eq!(kp.private.len(), params.secret_key_bytes);

    let public = PublicKey::from_hex(params, &kp.public.to_string()).expect("hex import");
    let private =
        PrivateKey::from_bytes(params, &kp.private.to_bytes()).expect("raw import");
    assert!(private.public_key().is_none());

    let blob = engine().sign(&private, b"exported").expect("signing should succeed");
    assert_eq!(
        engine().open(&public, blob.as_bytes()).expect("open"),
        b"exported"
    );
}

/// Deserialization enforces the exact key lengths.
#[test]
fn deserialization_rejects_wrong_lengths() {
    let params = engine().params();
    for len in [0, params.public_key_bytes - 1, params.public_key_bytes + 1] {
        assert!(matches!(
            PublicKey::from_bytes(params, &vec![0u8; len]),
            Err(CryptoError::Deserialization(_))
        ));
    }
    for len in [0, params.secret_key_bytes - 1, params.secret_key_bytes + 1] {
        assert!(matches!(
            PrivateKey::from_bytes(params, &vec![0u8; len]),
            Err(CryptoError::Deserialization(_))
        ));
    }
}

/// Blobs shorter than the signature overhead never reach native code.
#[test]
fn short_blob_is_malformed_input() {
    let kp = engine().generate_keypair().expect("keygen should succeed");
    for len in [0, 1, overhead() - 1] {
        assert!(matches!(
            engine().open(&kp.public, &vec![0u8; len]),
            Err(CryptoError::MalformedInput(_))
        ));
    }
}

/// The active parameters are the global engine's parameters.
#[test]
fn active_parameters_match_global_engine() {
    let active = SizeParameters::active();
    assert_eq!(active, engine().params());
    assert_eq!(active, NativeBackend::default_backend().params());
}

/// The reference backend's verify also accepts the whole signed blob, as
/// long as the embedded message matches.
#[test]
fn reference_verify_accepts_full_blob() {
    let engine = SigningEngine::new(NativeBackend::reference());
    let kp = engine.generate_keypair().expect("keygen should succeed");
    let blob = engine.sign(&kp.private, b"whole blob").expect("signing should succeed");

    engine
        .verify(&kp.public, b"whole blob", blob.as_bytes())
        .expect("verify should succeed");
    assert_eq!(
        engine.verify(&kp.public, b"other blob", blob.as_bytes()),
        Err(CryptoError::Verification)
    );
}

//! Integration tests for the digest adapter.

use sqisign_core::{CryptoError, SignerAdapter, SigningEngine};

fn digest(label: &str) -> [u8; 32] {
    *blake3::hash(label.as_bytes()).as_bytes()
}

#[test]
fn sign_and_verify_digest() {
    let adapter = SignerAdapter::default();
    let kp = adapter.engine().generate_keypair().expect("keygen should succeed");
    let d = digest("release-1.0.tar.gz");

    let signature = adapter.sign(&kp.private, &d).expect("signing should succeed");
    assert_eq!(signature.len(), d.len() + adapter.engine().params().signature_bytes);
    adapter
        .verify(&kp.public, &d, signature.as_bytes())
        .expect("verification should succeed");
}

/// A valid signature over digest B must not be accepted for digest A.
#[test]
fn valid_signature_over_other_digest_is_mismatch() {
    let adapter = SignerAdapter::default();
    let kp = adapter.engine().generate_keypair().expect("keygen should succeed");

    let signature = adapter
        .sign(&kp.private, &digest("b"))
        .expect("signing should succeed");
    assert_eq!(
        adapter.verify(&kp.public, &digest("a"), signature.as_bytes()),
        Err(CryptoError::DigestMismatch)
    );
}

/// A digest that is a prefix of the signed one is still a mismatch.
#[test]
fn truncated_digest_is_mismatch() {
    let adapter = SignerAdapter::default();
    let kp = adapter.engine().generate_keypair().expect("keygen should succeed");
    let d = digest("prefix");

    let signature = adapter.sign(&kp.private, &d).expect("signing should succeed");
    assert_eq!(
        adapter.verify(&kp.public, &d[..16], signature.as_bytes()),
        Err(CryptoError::DigestMismatch)
    );
}

/// Open failures surface as `Verification`, never as `DigestMismatch`.
#[test]
fn corrupted_or_foreign_signature_is_verification_error() {
    let adapter = SignerAdapter::default();
    let kp_a = adapter.engine().generate_keypair().expect("keygen A should succeed");
    let kp_b = adapter.engine().generate_keypair().expect("keygen B should succeed");
    let d = digest("payload");

    let signature = adapter.sign(&kp_a.private, &d).expect("signing should succeed");
    assert_eq!(
        adapter.verify(&kp_b.public, &d, signature.as_bytes()),
        Err(CryptoError::Verification)
    );

    let mut corrupted = signature.into_bytes();
    corrupted[3] ^= 0x80;
    assert_eq!(
        adapter.verify(&kp_a.public, &d, &corrupted),
        Err(CryptoError::Verification)
    );

    assert_eq!(
        adapter.verify(&kp_a.public, &d, &corrupted[..8]),
        Err(CryptoError::Verification)
    );
}

#[test]
fn bound_signer_signs_with_its_key() {
    let engine = SigningEngine::global();
    let kp = engine.generate_keypair().expect("keygen should succeed");
    let public = kp.public.clone();
    let signer = SignerAdapter::new(engine).bind(kp.private);
    assert_eq!(signer.public_key(), Some(&public));

    let d = digest("bound");
    let signature = signer.sign(&d).expect("signing should succeed");
    SignerAdapter::new(engine)
        .verify(&public, &d, signature.as_bytes())
        .expect("verification should succeed");

    let private = signer.into_private_key();
    assert_eq!(private.len(), engine.params().secret_key_bytes);
}

// tests/auth_tests.rs
//! Proof construction — binding to method, URL, and body

mod support;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use quill::auth::authenticate;
use quill::keys::Sign;
use serde::Serialize;
use sha2::{Digest, Sha256};
use support::{test_signer, FixedClock};

/// Mirror of the signed assertion, field order included
#[derive(Serialize)]
struct Reconstructed<'a> {
    created_at: i64,
    method: &'a str,
    url: &'a str,
    pubkey: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<&'a str>,
}

fn verify(
    pubkey_hex: &str,
    sig_hex: &str,
    created_at: i64,
    method: &str,
    url: &str,
    payload: Option<&str>,
) -> bool {
    let pubkey: [u8; 32] = hex::decode(pubkey_hex).unwrap().try_into().unwrap();
    let sig: [u8; 64] = hex::decode(sig_hex).unwrap().try_into().unwrap();
    let message = serde_json::to_vec(&Reconstructed {
        created_at,
        method,
        url,
        pubkey: pubkey_hex,
        payload,
    })
    .unwrap();
    VerifyingKey::from_bytes(&pubkey)
        .unwrap()
        .verify(&message, &Signature::from_bytes(&sig))
        .is_ok()
}

#[test]
fn proof_signature_verifies_for_its_own_request() {
    let signer = test_signer();
    let clock = FixedClock(1_700_000_000);
    let proof = authenticate("POST", "https://api.example/posts", None, &signer, &clock).unwrap();

    assert!(verify(
        &proof.pubkey,
        &proof.sig,
        proof.created_at,
        "POST",
        "https://api.example/posts",
        None,
    ));
}

#[test]
fn changing_the_method_invalidates_the_proof() {
    let signer = test_signer();
    let clock = FixedClock(1_700_000_000);
    let proof = authenticate("POST", "https://api.example/posts", None, &signer, &clock).unwrap();

    assert!(!verify(
        &proof.pubkey,
        &proof.sig,
        proof.created_at,
        "DELETE",
        "https://api.example/posts",
        None,
    ));
}

#[test]
fn changing_the_url_invalidates_the_proof() {
    let signer = test_signer();
    let clock = FixedClock(1_700_000_000);
    let proof = authenticate("POST", "https://api.example/posts", None, &signer, &clock).unwrap();

    assert!(!verify(
        &proof.pubkey,
        &proof.sig,
        proof.created_at,
        "POST",
        "https://api.example/media",
        None,
    ));
}

#[test]
fn changing_the_body_invalidates_the_proof() {
    let signer = test_signer();
    let clock = FixedClock(1_700_000_000);
    let body = br#"{"title":"a"}"#;
    let proof = authenticate(
        "POST",
        "https://api.example/posts",
        Some(body),
        &signer,
        &clock,
    )
    .unwrap();

    let original = hex::encode(Sha256::digest(body));
    let tampered = hex::encode(Sha256::digest(br#"{"title":"b"}"#));

    assert!(verify(
        &proof.pubkey,
        &proof.sig,
        proof.created_at,
        "POST",
        "https://api.example/posts",
        Some(&original),
    ));
    assert!(!verify(
        &proof.pubkey,
        &proof.sig,
        proof.created_at,
        "POST",
        "https://api.example/posts",
        Some(&tampered),
    ));
}

#[test]
fn proof_timestamp_comes_from_the_clock() {
    let signer = test_signer();
    let proof = authenticate(
        "GET",
        "https://api.example/posts",
        None,
        &signer,
        &FixedClock(12345),
    )
    .unwrap();
    assert_eq!(proof.created_at, 12345);
}

#[test]
fn body_hash_is_recorded_on_the_proof() {
    let signer = test_signer();
    let body = b"image bytes";
    let proof = authenticate(
        "PUT",
        "https://api.example/media",
        Some(body),
        &signer,
        &FixedClock(1),
    )
    .unwrap();
    assert_eq!(
        proof.payload.as_deref(),
        Some(hex::encode(Sha256::digest(body)).as_str())
    );
}

#[test]
fn header_value_is_one_encoded_authorization_token() {
    let signer = test_signer();
    let proof = authenticate(
        "GET",
        "https://api.example/posts",
        None,
        &signer,
        &FixedClock(1),
    )
    .unwrap();

    let header = proof.header_value();
    let encoded = header.strip_prefix("Quill ").unwrap();
    let decoded: serde_json::Value =
        serde_json::from_slice(&STANDARD.decode(encoded).unwrap()).unwrap();
    assert_eq!(decoded["method"], "GET");
    assert_eq!(decoded["url"], "https://api.example/posts");
    assert_eq!(decoded["pubkey"], hex::encode(signer.public_key()));
    assert!(decoded["sig"].is_string());
}

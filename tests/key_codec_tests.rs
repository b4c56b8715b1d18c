// tests/key_codec_tests.rs
//! Secret key decoding — both encodings, all rejection paths

use quill::error::QuillError;
use quill::keys::{
    decode_secret_key, encode_public_key, encode_secret_key, KeySigner, SecretKey,
};

const HEX_KEY: &str = "7f3b9a1c5d2e8f4a6b0c1d2e3f4a5b6c7d8e9f0a1b2c3d4e5f6a7b8c9d0e1f2a";

#[test]
fn decode_accepts_lowercase_hex() {
    decode_secret_key(HEX_KEY).unwrap();
}

#[test]
fn decode_accepts_uppercase_hex() {
    decode_secret_key(&HEX_KEY.to_uppercase()).unwrap();
}

#[test]
fn decode_trims_surrounding_whitespace() {
    decode_secret_key(&format!("  {HEX_KEY}\n")).unwrap();
}

#[test]
fn decode_rejects_short_hex() {
    let err = decode_secret_key(&HEX_KEY[..63]).unwrap_err();
    assert!(matches!(err, QuillError::InvalidSecretKey(_)));
}

#[test]
fn decode_rejects_long_hex() {
    let err = decode_secret_key(&format!("{HEX_KEY}ab")).unwrap_err();
    assert!(matches!(err, QuillError::InvalidSecretKey(_)));
}

#[test]
fn decode_rejects_non_hex_characters() {
    let bad = format!("{}zz", &HEX_KEY[..62]);
    let err = decode_secret_key(&bad).unwrap_err();
    assert!(matches!(err, QuillError::InvalidSecretKey(_)));
}

#[test]
fn decode_rejects_empty_input() {
    assert!(matches!(
        decode_secret_key(""),
        Err(QuillError::InvalidSecretKey(_))
    ));
}

#[test]
fn encoded_secret_key_round_trips() {
    let key = SecretKey::from_bytes([42u8; 32]);
    let encoded = encode_secret_key(&key).unwrap();
    assert!(encoded.starts_with("qsec1"));

    let decoded = decode_secret_key(&encoded).unwrap();
    // Same key bytes → same public key
    let a = KeySigner::new(&key).verifying_key();
    let b = KeySigner::new(&decoded).verifying_key();
    assert_eq!(a.to_bytes(), b.to_bytes());
}

#[test]
fn decode_rejects_public_key_tag() {
    let key = SecretKey::from_bytes([42u8; 32]);
    let public = KeySigner::new(&key).verifying_key();
    let encoded = encode_public_key(&public).unwrap();
    assert!(encoded.starts_with("qpub1"));

    let err = decode_secret_key(&encoded).unwrap_err();
    assert!(matches!(err, QuillError::InvalidSecretKey(_)));
}

#[test]
fn decode_rejects_corrupted_bech32() {
    let key = SecretKey::from_bytes([42u8; 32]);
    let mut encoded = encode_secret_key(&key).unwrap();
    // Flip the final checksum character
    let last = encoded.pop().unwrap();
    encoded.push(if last == 'q' { 'p' } else { 'q' });

    let err = decode_secret_key(&encoded).unwrap_err();
    assert!(matches!(err, QuillError::InvalidSecretKey(_)));
}

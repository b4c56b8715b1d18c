// src/keys.rs
//! Secret key decoding, encoding, and the signing capability
//!
//! A secret key is 32 raw bytes. Users hand it to us either as a
//! bech32 string with the `qsec` prefix or as 64 hex characters;
//! anything else is rejected outright.

use bech32::{Bech32, Hrp};
use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use crate::consts::{PUBLIC_KEY_HRP, SECRET_KEY_HRP};
use crate::error::{QuillError, Result};

/// 256-bit private signing key — zeroed on drop, never serialized
pub struct SecretKey(Zeroizing<[u8; 32]>);

impl SecretKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Decode a user-supplied key string into a 32-byte secret key.
///
/// Accepts the `qsec` bech32 encoding or a 64-character hex string
/// (case-insensitive). Pure and side-effect-free: either a valid key
/// comes back or `InvalidSecretKey` does.
pub fn decode_secret_key(input: &str) -> Result<SecretKey> {
    let trimmed = input.trim();

    if let Ok((hrp, data)) = bech32::decode(trimmed) {
        if hrp != Hrp::parse(SECRET_KEY_HRP).expect("static hrp is valid") {
            return Err(QuillError::InvalidSecretKey(format!(
                "encoded value is tagged `{hrp}`, not a secret key"
            )));
        }
        let bytes: [u8; 32] = data.try_into().map_err(|_| {
            QuillError::InvalidSecretKey("decoded payload is not 32 bytes".into())
        })?;
        return Ok(SecretKey::from_bytes(bytes));
    }

    // A string carrying the secret-key prefix that failed to decode is
    // a malformed encoding, not a hex candidate
    if trimmed.starts_with(SECRET_KEY_HRP) {
        return Err(QuillError::InvalidSecretKey(
            "malformed bech32 encoding".into(),
        ));
    }

    if trimmed.len() != 64 || !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(QuillError::InvalidSecretKey(
            "expected a qsec string or 64 hex characters".into(),
        ));
    }

    let decoded = hex::decode(trimmed)
        .map_err(|e| QuillError::InvalidSecretKey(format!("bad hex: {e}")))?;
    let bytes: [u8; 32] = decoded
        .try_into()
        .map_err(|_| QuillError::InvalidSecretKey("decoded payload is not 32 bytes".into()))?;
    Ok(SecretKey::from_bytes(bytes))
}

/// Bech32-encode a secret key under the `qsec` prefix
pub fn encode_secret_key(key: &SecretKey) -> Result<String> {
    encode_with_hrp(SECRET_KEY_HRP, key.as_bytes())
}

/// Bech32-encode a public key under the `qpub` prefix
pub fn encode_public_key(public_key: &VerifyingKey) -> Result<String> {
    encode_with_hrp(PUBLIC_KEY_HRP, public_key.as_bytes())
}

fn encode_with_hrp(hrp: &str, bytes: &[u8; 32]) -> Result<String> {
    let hrp = Hrp::parse(hrp).expect("static hrp is valid");
    bech32::encode::<Bech32>(hrp, bytes)
        .map_err(|e| QuillError::InvalidSecretKey(format!("encoding failed: {e}")))
}

/// Generate a fresh random secret key
pub fn generate_secret_key() -> SecretKey {
    let signing = SigningKey::generate(&mut rand::rngs::OsRng);
    SecretKey::from_bytes(signing.to_bytes())
}

/// Signing capability bound to one secret key.
///
/// Injected into the request authenticator so the key itself never
/// travels past this seam.
pub trait Sign {
    /// Detached signature over `message`
    fn sign(&self, message: &[u8]) -> [u8; 64];

    /// Raw public key of the signer
    fn public_key(&self) -> [u8; 32];
}

/// Production signer backed by Ed25519
pub struct KeySigner {
    signing: SigningKey,
}

impl KeySigner {
    pub fn new(secret: &SecretKey) -> Self {
        Self {
            signing: SigningKey::from_bytes(secret.as_bytes()),
        }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing.verifying_key()
    }
}

impl Sign for KeySigner {
    fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing.sign(message).to_bytes()
    }

    fn public_key(&self) -> [u8; 32] {
        self.signing.verifying_key().to_bytes()
    }
}

// src/vault.rs
//! Encrypted keyfile — seals a secret key under a user password
//!
//! On disk the keyfile is a single line: the `qvault1` magic prefix
//! followed by the base64 of the AES-Crypt v3 ciphertext of the raw
//! 32 key bytes. The prefix is checked before any decryption attempt.

use std::io::Cursor;
use std::path::Path;

use aescrypt_rs::{aliases::Password, decrypt, encrypt};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

use crate::consts::{KEYFILE_KDF_ITERATIONS, KEYFILE_MAGIC};
use crate::error::{QuillError, Result};
use crate::keys::SecretKey;
use crate::prompt::PasswordPrompt;

/// Encrypt a secret key under `password`, producing the keyfile string
pub fn seal(key: &SecretKey, password: &str) -> Result<String> {
    let mut ciphertext = Vec::new();
    encrypt(
        Cursor::new(key.as_bytes().as_slice()),
        &mut ciphertext,
        &Password::new(password.to_string()),
        KEYFILE_KDF_ITERATIONS,
    )
    .map_err(QuillError::Crypto)?;
    Ok(format!("{KEYFILE_MAGIC}{}", STANDARD.encode(ciphertext)))
}

/// Seal `key` and write the keyfile at `path`.
///
/// Encryption is unconditional once invoked; overwrite confirmation is
/// the caller's policy.
pub fn seal_to_file(path: &Path, key: &SecretKey, password: &str) -> Result<()> {
    let sealed = seal(key, password)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, sealed + "\n")?;
    Ok(())
}

/// Open the keyfile at `path`, asking `prompt` for the password.
///
/// User cancellation surfaces as `OperationAborted`, never as
/// `DecryptionFailed`.
pub fn open(path: &Path, prompt: &dyn PasswordPrompt) -> Result<SecretKey> {
    if !path.exists() {
        return Err(QuillError::KeyfileNotFound(path.to_path_buf()));
    }
    let password = prompt
        .ask("Keyfile password: ")?
        .ok_or(QuillError::OperationAborted)?;
    open_with_password(path, &password)
}

pub fn open_with_password(path: &Path, password: &str) -> Result<SecretKey> {
    if !path.exists() {
        return Err(QuillError::KeyfileNotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    let trimmed = text.trim();

    let encoded = trimmed
        .strip_prefix(KEYFILE_MAGIC)
        .ok_or_else(|| QuillError::InvalidKeyfileFormat(path.to_path_buf()))?;
    let ciphertext = STANDARD
        .decode(encoded)
        .map_err(|_| QuillError::InvalidKeyfileFormat(path.to_path_buf()))?;

    let mut plaintext = Zeroizing::new(Vec::new());
    decrypt(
        Cursor::new(ciphertext),
        &mut *plaintext,
        &Password::new(password.to_string()),
    )
    .map_err(|_| QuillError::DecryptionFailed)?;

    let bytes: [u8; 32] = plaintext
        .as_slice()
        .try_into()
        .map_err(|_| QuillError::DecryptionFailed)?;
    tracing::debug!(path = %path.display(), "keyfile unsealed");
    Ok(SecretKey::from_bytes(bytes))
}

// src/error.rs
//! Public error type for the entire crate

use std::path::PathBuf;

use aescrypt_rs::AescryptError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuillError>;

#[derive(Error, Debug)]
pub enum QuillError {
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("keyfile not found: {}", .0.display())]
    KeyfileNotFound(PathBuf),

    #[error("not a quill keyfile: {}", .0.display())]
    InvalidKeyfileFormat(PathBuf),

    #[error("decryption failed — wrong password or corrupted keyfile")]
    DecryptionFailed,

    #[error("operation aborted")]
    OperationAborted,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("refusing to overwrite existing keyfile: {}", .0.display())]
    KeyfileExists(PathBuf),

    #[error("image validation failed: {0}")]
    ImageValidation(String),

    #[error("api request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("missing required fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("no updates provided")]
    NoUpdatesProvided,

    #[error("config error: {0}")]
    Config(String),

    #[error("crypto operation failed: {0}")]
    Crypto(AescryptError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

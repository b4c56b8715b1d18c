// src/lib.rs
//! quill — publish signed posts to a remote content service
//!
//! Features:
//! - bech32 / hex secret key decoding
//! - password-encrypted keyfile (AES Crypt v3)
//! - fresh signed proof per outbound request
//! - content-embedded image uploads with consistent rewriting

pub mod api;
pub mod auth;
pub mod config;
pub mod consts;
pub mod error;
pub mod images;
pub mod keys;
pub mod post;
pub mod prompt;
pub mod vault;

// Re-export everything users need at the crate root
pub use api::{ApiClient, ApiRequest, ApiResponse, HttpTransport, PostRef, Transport};
pub use auth::{authenticate, AuthProof, Clock, SystemClock};
pub use config::{load as load_config, Config};
pub use error::{QuillError, Result};
pub use images::{
    process_images, process_update_assets, scan_image_references, ImagePolicy, ProcessedContent,
};
pub use keys::{decode_secret_key, generate_secret_key, KeySigner, SecretKey, Sign};
pub use post::{
    assemble_create, assemble_update, parse_document, Document, PostOverrides, PostPayload,
    UpdatePayload,
};
pub use prompt::{PasswordPrompt, TtyPrompt};

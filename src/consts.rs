// src/consts.rs
//! Shared constants — key encodings, keyfile format, upload limits

/// Bech32 human-readable prefix for encoded secret keys
pub const SECRET_KEY_HRP: &str = "qsec";

/// Bech32 human-readable prefix for encoded public keys
pub const PUBLIC_KEY_HRP: &str = "qpub";

/// Magic prefix opening every sealed keyfile — checked before any
/// decryption attempt
pub const KEYFILE_MAGIC: &str = "qvault1";

/// KDF iterations for the password-derived keyfile encryption
// 600_000 ≈ 0.5–1 second on typical CPU — defense against GPU cracking
pub const KEYFILE_KDF_ITERATIONS: u32 = 600_000;

/// Default keyfile name under the platform config directory
pub const DEFAULT_KEYFILE_NAME: &str = "quill.key";

/// Authorization scheme carried on every authenticated request
pub const AUTH_SCHEME: &str = "Quill";

/// Default cap on a single uploaded image
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Extension → MIME pairs accepted for upload by default
pub const DEFAULT_IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("avif", "image/avif"),
];

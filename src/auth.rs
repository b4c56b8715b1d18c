// src/auth.rs
//! Per-request authentication proofs
//!
//! Every outbound request carries a freshly signed assertion binding
//! the HTTP method, target URL, creation time, and (when present) a
//! hash of the body. Proofs are built immediately before the request
//! goes out and are never cached or reused.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::consts::AUTH_SCHEME;
use crate::error::Result;
use crate::keys::Sign;

/// Clock capability — injected so proofs are testable without
/// wall-clock timing
pub trait Clock {
    fn now_unix(&self) -> i64;
}

/// Wall clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// The signed portion of a proof. Field order is the canonical
/// serialization order; the verifier reconstructs exactly this JSON.
#[derive(Debug, Serialize)]
struct Assertion<'a> {
    created_at: i64,
    method: &'a str,
    url: &'a str,
    pubkey: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<&'a str>,
}

/// One-shot authentication artifact for exactly one HTTP request
#[derive(Debug, Serialize)]
pub struct AuthProof {
    pub created_at: i64,
    pub method: String,
    pub url: String,
    pub pubkey: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    pub sig: String,
    #[serde(skip)]
    header: String,
}

impl AuthProof {
    /// The single `Authorization` value carried by the request
    pub fn header_value(&self) -> &str {
        &self.header
    }
}

/// Build a fresh proof for one `(method, url, body)` triple.
///
/// The timestamp is taken from `clock` at construction time; servers
/// are expected to reject proofs outside a validity window.
pub fn authenticate(
    method: &str,
    url: &str,
    body: Option<&[u8]>,
    signer: &dyn Sign,
    clock: &dyn Clock,
) -> Result<AuthProof> {
    let created_at = clock.now_unix();
    let pubkey = hex::encode(signer.public_key());
    let payload = body.map(|bytes| hex::encode(Sha256::digest(bytes)));

    let assertion = Assertion {
        created_at,
        method,
        url,
        pubkey: &pubkey,
        payload: payload.as_deref(),
    };
    let message = serde_json::to_vec(&assertion)?;
    let sig = hex::encode(signer.sign(&message));

    let mut proof = AuthProof {
        created_at,
        method: method.to_string(),
        url: url.to_string(),
        pubkey,
        payload,
        sig,
        header: String::new(),
    };
    let encoded = STANDARD.encode(serde_json::to_vec(&proof)?);
    proof.header = format!("{AUTH_SCHEME} {encoded}");
    Ok(proof)
}

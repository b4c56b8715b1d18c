// tests/support.rs
//! Test doubles — scripted transport, fixed clock, static prompt
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use quill::api::{ApiRequest, ApiResponse, Transport};
use quill::auth::Clock;
use quill::error::Result;
use quill::keys::{KeySigner, SecretKey};
use quill::prompt::PasswordPrompt;

/// Transport that replays scripted responses and records every request
pub struct MockTransport {
    responses: Mutex<VecDeque<ApiResponse>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new(responses: Vec<ApiResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn ok_json(body: &str) -> ApiResponse {
        ApiResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.seen.lock().unwrap().push(request);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more times than scripted");
        Ok(response)
    }
}

pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}

/// Prompt that always answers with the configured value
pub struct StaticPrompt(pub Option<String>);

impl PasswordPrompt for StaticPrompt {
    fn ask(&self, _message: &str) -> Result<Option<String>> {
        Ok(self.0.clone())
    }
}

pub fn test_secret_key() -> SecretKey {
    SecretKey::from_bytes([7u8; 32])
}

pub fn test_signer() -> KeySigner {
    KeySigner::new(&test_secret_key())
}

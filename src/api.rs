// src/api.rs
//! Transport seam and the content-service client
//!
//! The `Transport` trait is the only way bytes leave the process; the
//! production implementation is a thin reqwest wrapper. `ApiClient`
//! signs each request with a fresh proof and treats any non-2xx status
//! as terminal. No retries, no internal timeouts.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::auth::{authenticate, Clock};
use crate::error::{QuillError, Result};
use crate::keys::Sign;
use crate::post::{PostPayload, UpdatePayload};

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// External HTTP collaborator
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// reqwest-backed transport with a `quill/<version>` User-Agent
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("quill/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| QuillError::Config(format!("invalid http method: {e}")))?;
        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }
}

/// Reference to a post as reported by the service
#[derive(Debug, Clone, Deserialize)]
pub struct PostRef {
    pub slug: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MediaResponse {
    url: String,
}

/// Authenticated client for the remote content service
pub struct ApiClient<'a> {
    base_url: String,
    transport: &'a dyn Transport,
    signer: &'a dyn Sign,
    clock: &'a dyn Clock,
}

impl<'a> ApiClient<'a> {
    pub fn new(
        base_url: impl Into<String>,
        transport: &'a dyn Transport,
        signer: &'a dyn Sign,
        clock: &'a dyn Clock,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            signer,
            clock,
        }
    }

    pub async fn create_post(&self, payload: &PostPayload) -> Result<PostRef> {
        let url = format!("{}/posts", self.base_url);
        let body = serde_json::to_vec(payload)?;
        let response = self
            .send_signed("POST", url, Some(body), Some("application/json"))
            .await?;
        response.json()
    }

    pub async fn update_post(&self, slug: &str, payload: &UpdatePayload) -> Result<PostRef> {
        let url = format!("{}/posts/{slug}", self.base_url);
        let body = serde_json::to_vec(payload)?;
        let response = self
            .send_signed("PUT", url, Some(body), Some("application/json"))
            .await?;
        response.json()
    }

    pub async fn delete_post(&self, slug: &str) -> Result<()> {
        let url = format!("{}/posts/{slug}", self.base_url);
        self.send_signed("DELETE", url, None, None).await?;
        Ok(())
    }

    /// Upload one image, returning its remote URL
    pub async fn upload_image(&self, bytes: Vec<u8>, mime: &str) -> Result<String> {
        let url = format!("{}/media", self.base_url);
        let response = self.send_signed("PUT", url, Some(bytes), Some(mime)).await?;
        let media: MediaResponse = response.json()?;
        Ok(media.url)
    }

    /// Sign and send one request. A fresh proof is built here for every
    /// call; proofs are never reused.
    async fn send_signed(
        &self,
        method: &str,
        url: String,
        body: Option<Vec<u8>>,
        content_type: Option<&str>,
    ) -> Result<ApiResponse> {
        let proof = authenticate(method, &url, body.as_deref(), self.signer, self.clock)?;
        let mut headers = vec![("Authorization".to_string(), proof.header_value().to_string())];
        if let Some(content_type) = content_type {
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }
        tracing::debug!(method, url = %url, "sending authenticated request");
        let response = self
            .transport
            .send(ApiRequest {
                method: method.to_string(),
                url,
                headers,
                body,
            })
            .await?;
        if !response.is_success() {
            return Err(QuillError::Api {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }
}

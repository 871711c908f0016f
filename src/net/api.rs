//! HTTP client for the moments collection resource.
//!
//! DESIGN
//! ======
//! `MomentsApi` is the seam between the album store and the network. The
//! store only ever talks to this trait, so tests can count calls or inject
//! failures without a server.
//!
//! ERROR HANDLING
//! ==============
//! Any non-2xx status is surfaced as `ApiError::Status` with the response
//! body kept for logging. The store decides whether that becomes a load or
//! a mutation failure.

use std::time::Duration;

use serde::Serialize;

use crate::config::{ClientConfig, ClientTimeouts};
use crate::moment::{Moment, MomentPayload};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

// =============================================================================
// TRAIT
// =============================================================================

/// Remote collection operations. One call per method, no retries.
#[async_trait::async_trait]
pub trait MomentsApi: Send + Sync {
    /// `GET /`
    async fn list(&self) -> Result<Vec<Moment>, ApiError>;
    /// `POST /`
    async fn create(&self, payload: &MomentPayload) -> Result<(), ApiError>;
    /// `PUT /{id}`
    async fn update(&self, id: i64, payload: &MomentPayload) -> Result<(), ApiError>;
    /// `DELETE /{id}`
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

// =============================================================================
// REQWEST IMPLEMENTATION
// =============================================================================

pub struct HttpMomentsApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpMomentsApi {
    /// Build a client for the collection at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeouts: ClientTimeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.api_url.clone(), config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{id}", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }

    async fn send_json(&self, request: reqwest::RequestBuilder, body: &impl Serialize) -> Result<String, ApiError> {
        self.send(request.json(body)).await
    }
}

#[async_trait::async_trait]
impl MomentsApi for HttpMomentsApi {
    async fn list(&self) -> Result<Vec<Moment>, ApiError> {
        let text = self.send(self.http.get(&self.base_url)).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn create(&self, payload: &MomentPayload) -> Result<(), ApiError> {
        self.send_json(self.http.post(&self.base_url), payload)
            .await
            .map(drop)
    }

    async fn update(&self, id: i64, payload: &MomentPayload) -> Result<(), ApiError> {
        self.send_json(self.http.put(self.item_url(id)), payload)
            .await
            .map(drop)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.send(self.http.delete(self.item_url(id)))
            .await
            .map(drop)
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

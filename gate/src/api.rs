//! Auth-service HTTP boundary.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session cookie is HTTP-only and owned by the backend; this client
//! never reads or writes it. reqwest's cookie store keeps it riding along
//! on subsequent calls, and session validity is inferred purely from call
//! outcomes. No retries, no timeouts beyond the client's defaults.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is classified into one of three kinds: transport (no
//! usable response), rejection (the backend answered with an error status,
//! optionally carrying a `detail` body), or malformed (a success response
//! without the expected identity fields).

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

use crate::domain::DomainConfig;
use crate::identity::Identity;

/// Username/password pair submitted to a login endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// One failed call to the auth service.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable response arrived (connect, timeout, wire-level read).
    #[error("network error: {0}")]
    Transport(String),
    /// The backend answered with an error status.
    #[error("request failed with status {status}")]
    Rejected { status: u16, detail: Option<String> },
    /// A success response arrived without the expected identity fields.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl AuthError {
    /// The server-supplied detail string, when the rejection carried one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => detail.as_deref(),
            Self::Transport(_) | Self::Malformed(_) => None,
        }
    }
}

/// Async boundary to one domain's auth endpoints. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// POST the domain's login endpoint; success returns the new identity.
    async fn login(&self, credentials: &Credentials) -> Result<Identity, AuthError>;
    /// POST the domain's logout endpoint.
    async fn logout(&self) -> Result<(), AuthError>;
    /// GET the domain's whoami endpoint.
    async fn whoami(&self) -> Result<Identity, AuthError>;
}

/// Error body shape the backend uses for rejections.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Parse a success body into an identity, classifying missing or invalid
/// identity fields as [`AuthError::Malformed`].
fn decode_identity(body: &str) -> Result<Identity, AuthError> {
    serde_json::from_str(body).map_err(|e| AuthError::Malformed(e.to_string()))
}

/// Pull the `detail` string out of a rejection body, if it has one.
fn decode_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body).ok().map(|b| b.detail)
}

/// reqwest-backed [`AuthApi`] for one identity domain.
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
    config: DomainConfig,
}

impl HttpAuthApi {
    /// Build a cookie-carrying client for `config`'s endpoints under
    /// `base_url` (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>, config: DomainConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(Self { client, base_url: base_url.into(), config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Read a response expected to carry an identity payload.
    async fn read_identity(resp: reqwest::Response) -> Result<Identity, AuthError> {
        let status = resp.status().as_u16();
        let success = resp.status().is_success();
        let body = resp
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        if success {
            decode_identity(&body)
        } else {
            Err(AuthError::Rejected { status, detail: decode_detail(&body) })
        }
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        let resp = self
            .client
            .post(self.url(self.config.login_endpoint))
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Self::read_identity(resp).await
    }

    async fn logout(&self) -> Result<(), AuthError> {
        let resp = self
            .client
            .post(self.url(self.config.logout_endpoint))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        if resp.status().is_success() {
            return Ok(());
        }
        let body = resp
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Err(AuthError::Rejected { status, detail: decode_detail(&body) })
    }

    async fn whoami(&self) -> Result<Identity, AuthError> {
        let resp = self
            .client
            .get(self.url(self.config.whoami_endpoint))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Self::read_identity(resp).await
    }
}

//! HDFS authentication strategies.
//!
//! Simple authentication identifies the caller with `user.name`; secure
//! clusters use delegation tokens. Negotiating a token (Kerberos/SPNEGO) is
//! outside this crate: a token is either configured up front or requested
//! from the NameNode's `GETDELEGATIONTOKEN` operation as-is.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::HdfsConfig;
use crate::{BoardError, Result};

/// User agent string for token requests.
const USER_AGENT: &str = "hdfs-board/0.1";

/// Credential a client appends to a file URL before using it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessCredential {
    /// Simple authentication (`user.name=...`).
    UserName(String),
    /// Delegation token (`delegation=...`).
    Delegation(String),
}

impl AccessCredential {
    /// Query parameter carrying this credential.
    pub fn query_pair(&self) -> (&'static str, &str) {
        match self {
            AccessCredential::UserName(user) => ("user.name", user),
            AccessCredential::Delegation(token) => ("delegation", token),
        }
    }
}

/// Issues delegation tokens on demand.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain a new delegation token.
    async fn token(&self) -> Result<String>;
}

/// Where delegation tokens come from.
#[derive(Clone)]
pub enum TokenSource {
    /// A token issued out of band.
    Static(String),
    /// Ask the provider for a fresh token on every call.
    Fetch(Arc<dyn TokenProvider>),
}

impl TokenSource {
    /// Get a delegation token.
    pub async fn token(&self) -> Result<String> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Fetch(provider) => provider.token().await,
        }
    }

    /// Whether every call yields a newly issued token.
    pub fn is_refreshing(&self) -> bool {
        matches!(self, TokenSource::Fetch(_))
    }
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenSource::Static(_) => f.write_str("Static(..)"),
            TokenSource::Fetch(_) => f.write_str("Fetch(..)"),
        }
    }
}

/// Authentication strategy, chosen once from configuration.
#[derive(Debug, Clone)]
pub enum HdfsAuth {
    /// Simple authentication as `user`.
    Insecure { user: String },
    /// Delegation-token authentication.
    Credentialed { tokens: TokenSource },
}

impl HdfsAuth {
    /// Select the strategy for `config`.
    pub fn from_config(config: &HdfsConfig) -> Result<Self> {
        if !config.secure {
            return Ok(HdfsAuth::Insecure {
                user: config.user.clone(),
            });
        }

        let tokens = if config.delegation_token.is_empty() {
            TokenSource::Fetch(Arc::new(DelegationTokenClient::new(config)?))
        } else {
            TokenSource::Static(config.delegation_token.clone())
        };
        Ok(HdfsAuth::Credentialed { tokens })
    }

    /// Credential for direct client access to file URLs.
    pub async fn credential(&self) -> Result<AccessCredential> {
        match self {
            HdfsAuth::Insecure { user } => Ok(AccessCredential::UserName(user.clone())),
            HdfsAuth::Credentialed { tokens } => {
                Ok(AccessCredential::Delegation(tokens.token().await?))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(rename = "Token")]
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(rename = "urlString")]
    url_string: String,
}

/// Parse a `GETDELEGATIONTOKEN` response body.
fn parse_token_response(body: &[u8]) -> Result<String> {
    let response: TokenResponse = serde_json::from_slice(body)
        .map_err(|e| BoardError::Token(format!("invalid token response: {e}")))?;
    if response.token.url_string.is_empty() {
        return Err(BoardError::Token("empty delegation token".to_string()));
    }
    Ok(response.token.url_string)
}

/// Client for the NameNode's delegation token endpoint.
#[derive(Debug, Clone)]
pub struct DelegationTokenClient {
    client: Client,
    url: String,
    user: String,
}

impl DelegationTokenClient {
    /// Create a client for the NameNode in `config`.
    pub fn new(config: &HdfsConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.token_timeout_secs);
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BoardError::Token(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: format!("{}/webhdfs/v1/", config.endpoint()),
            user: config.user.clone(),
        })
    }

    /// Request a new delegation token.
    pub async fn fetch(&self) -> Result<String> {
        let mut request = self
            .client
            .get(&self.url)
            .query(&[("op", "GETDELEGATIONTOKEN")]);
        if !self.user.is_empty() {
            request = request.query(&[("user.name", self.user.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BoardError::Token(format!("failed to request token: {e}")))?;

        if !response.status().is_success() {
            return Err(BoardError::Token(format!("HTTP error: {}", response.status())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BoardError::Token(format!("failed to read response: {e}")))?;

        tracing::debug!("Fetched delegation token");
        parse_token_response(&body)
    }
}

#[async_trait]
impl TokenProvider for DelegationTokenClient {
    async fn token(&self) -> Result<String> {
        self.fetch().await
    }
}

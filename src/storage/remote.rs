//! Remote filesystem capability.
//!
//! [`RemoteFs`] is the narrow set of calls the file store needs. The
//! production implementation wraps an `opendal` operator pointed at WebHDFS;
//! the same wrapper over the memory service backs development setups.
//! [`RefreshingFs`] rebuilds the WebHDFS operator per call when delegation
//! tokens are fetched rather than configured.

use std::sync::Arc;

use async_trait::async_trait;
use opendal::{services, ErrorKind, Operator};

use super::auth::{HdfsAuth, TokenSource};
use crate::config::{HdfsConfig, StorageBackend};
use crate::{BoardError, Result};

/// Size information for a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentSummary {
    /// Logical length in bytes.
    pub length: u64,
    /// Bytes consumed on the filesystem.
    pub space_consumed: u64,
}

/// Operations the store delegates to the remote filesystem.
///
/// Paths are relative to the configured storage root and use `/`.
#[async_trait]
pub trait RemoteFs: Send + Sync {
    /// Write `bytes` to `name`. Fails if the name exists and `overwrite` is false.
    async fn write(&self, name: &str, bytes: Vec<u8>, overwrite: bool) -> Result<()>;

    /// Delete `name`.
    async fn delete(&self, name: &str) -> Result<()>;

    /// Names of the entries directly inside `directory` (empty = root).
    async fn list(&self, directory: &str) -> Result<Vec<String>>;

    /// Size information for `name`.
    async fn content_summary(&self, name: &str) -> Result<ContentSummary>;
}

/// [`RemoteFs`] over an `opendal` operator.
#[derive(Clone)]
pub struct OperatorFs {
    operator: Operator,
}

impl OperatorFs {
    /// Wrap an existing operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    fn webhdfs_builder(config: &HdfsConfig) -> services::Webhdfs {
        services::Webhdfs::default()
            .endpoint(&config.endpoint())
            .root(&config.effective_root())
    }

    /// WebHDFS operator using simple authentication as `user`.
    pub fn webhdfs_as_user(config: &HdfsConfig, user: &str) -> Result<Self> {
        let builder = Self::webhdfs_builder(config).user_name(user);
        Ok(Self::new(Operator::new(builder)?.finish()))
    }

    /// WebHDFS operator authenticated with a delegation token.
    pub fn webhdfs_with_token(config: &HdfsConfig, token: &str) -> Result<Self> {
        let builder = Self::webhdfs_builder(config).delegation(token);
        Ok(Self::new(Operator::new(builder)?.finish()))
    }

    /// Memory-backed operator.
    pub fn memory() -> Result<Self> {
        let operator = Operator::new(services::Memory::default())?.finish();
        Ok(Self::new(operator))
    }

    /// Listing path for a directory: `/` for the root, otherwise with a trailing `/`.
    fn dir_path(directory: &str) -> String {
        let trimmed = directory.trim_end_matches('/');
        if trimmed.is_empty() || trimmed == "." {
            "/".to_string()
        } else {
            format!("{trimmed}/")
        }
    }
}

#[async_trait]
impl RemoteFs for OperatorFs {
    async fn write(&self, name: &str, bytes: Vec<u8>, overwrite: bool) -> Result<()> {
        if !overwrite && self.operator.exists(name).await? {
            return Err(BoardError::Storage(format!("'{name}' already exists")));
        }
        self.operator.write(name, bytes).await?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.operator.delete(name).await?;
        Ok(())
    }

    async fn list(&self, directory: &str) -> Result<Vec<String>> {
        let path = Self::dir_path(directory);
        let entries = match self.operator.list(&path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(entries
            .into_iter()
            .filter(|entry| entry.path() != path)
            .map(|entry| entry.name().trim_end_matches('/').to_string())
            .filter(|name| !name.is_empty())
            .collect())
    }

    async fn content_summary(&self, name: &str) -> Result<ContentSummary> {
        let meta = self.operator.stat(name).await?;
        // Replication is not visible through the operator; report logical size.
        let length = meta.content_length();
        Ok(ContentSummary {
            length,
            space_consumed: length,
        })
    }
}

type OperatorBuilder = dyn Fn(&str) -> Result<OperatorFs> + Send + Sync;

/// [`RemoteFs`] that authenticates every operation with a newly issued
/// delegation token, so an expired token never outlives one call.
pub struct RefreshingFs {
    tokens: TokenSource,
    build: Box<OperatorBuilder>,
}

impl RefreshingFs {
    /// WebHDFS access with tokens from `tokens`.
    pub fn webhdfs(config: &HdfsConfig, tokens: TokenSource) -> Self {
        let config = config.clone();
        Self::with_builder(tokens, move |token| {
            OperatorFs::webhdfs_with_token(&config, token)
        })
    }

    /// Build the per-operation operator with `build`.
    pub fn with_builder<F>(tokens: TokenSource, build: F) -> Self
    where
        F: Fn(&str) -> Result<OperatorFs> + Send + Sync + 'static,
    {
        Self {
            tokens,
            build: Box::new(build),
        }
    }

    async fn operator(&self) -> Result<OperatorFs> {
        let token = self.tokens.token().await?;
        (self.build)(&token)
    }
}

#[async_trait]
impl RemoteFs for RefreshingFs {
    async fn write(&self, name: &str, bytes: Vec<u8>, overwrite: bool) -> Result<()> {
        self.operator().await?.write(name, bytes, overwrite).await
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.operator().await?.delete(name).await
    }

    async fn list(&self, directory: &str) -> Result<Vec<String>> {
        self.operator().await?.list(directory).await
    }

    async fn content_summary(&self, name: &str) -> Result<ContentSummary> {
        self.operator().await?.content_summary(name).await
    }
}

/// Connect to the configured backend.
pub async fn connect(config: &HdfsConfig, auth: &HdfsAuth) -> Result<Arc<dyn RemoteFs>> {
    match config.backend {
        StorageBackend::Webhdfs => {
            tracing::info!(
                endpoint = %config.endpoint(),
                root = %config.effective_root(),
                secure = config.secure,
                "Connecting to WebHDFS"
            );
            let remote: Arc<dyn RemoteFs> = match auth {
                HdfsAuth::Insecure { user } => {
                    Arc::new(OperatorFs::webhdfs_as_user(config, user)?)
                }
                HdfsAuth::Credentialed { tokens } if tokens.is_refreshing() => {
                    Arc::new(RefreshingFs::webhdfs(config, tokens.clone()))
                }
                HdfsAuth::Credentialed { tokens } => {
                    let token = tokens.token().await?;
                    Arc::new(OperatorFs::webhdfs_with_token(config, &token)?)
                }
            };
            Ok(remote)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage backend; files are lost on restart");
            Ok(Arc::new(OperatorFs::memory()?))
        }
    }
}

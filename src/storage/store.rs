//! File store: name resolution and delegation to the remote filesystem.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};
use url::Url;

use super::auth::{AccessCredential, HdfsAuth};
use super::naming::{char_len, normalize_separators, split_path, RemoteName};
use super::remote::{connect, RemoteFs};
use super::suffix::{RandomSuffix, SuffixGenerator};
use crate::config::HdfsConfig;
use crate::{BoardError, Result};

/// Stores uploaded files under collision-free names.
///
/// Name resolution checks remote existence and rewrites taken names as
/// `{root}_{suffix}{ext}`. There is no locking: two concurrent saves of the
/// same name can both see it as free between the final check and the write.
#[derive(Clone)]
pub struct FileStore {
    remote: Arc<dyn RemoteFs>,
    suffixes: Arc<dyn SuffixGenerator>,
    auth: HdfsAuth,
    endpoint: String,
    root: String,
}

impl FileStore {
    /// Create a store over an existing remote filesystem.
    pub fn new(config: &HdfsConfig, remote: Arc<dyn RemoteFs>, auth: HdfsAuth) -> Self {
        Self {
            remote,
            suffixes: Arc::new(RandomSuffix),
            auth,
            endpoint: config.endpoint(),
            root: config.effective_root(),
        }
    }

    /// Connect to the backend described by `config`.
    pub async fn connect(config: &HdfsConfig) -> Result<Self> {
        let auth = HdfsAuth::from_config(config)?;
        let remote = connect(config, &auth).await?;
        Ok(Self::new(config, remote, auth))
    }

    /// Replace the suffix generator.
    pub fn with_suffix_generator(mut self, suffixes: Arc<dyn SuffixGenerator>) -> Self {
        self.suffixes = suffixes;
        self
    }

    /// Save `content` under `name` or an available alternative.
    ///
    /// `content` is read to the end and written with overwrite enabled.
    /// Returns the name actually used.
    pub async fn save<R>(&self, name: &str, mut content: R, max_length: Option<usize>) -> Result<String>
    where
        R: AsyncRead + Unpin + Send,
    {
        if name.is_empty() {
            return Err(BoardError::Validation("file name is required".to_string()));
        }

        let name = self.get_available_name(name, max_length).await?;

        let mut bytes = Vec::new();
        content.read_to_end(&mut bytes).await?;
        let size = bytes.len();

        self.remote.write(&name, bytes, true).await?;
        tracing::info!(name = %name, size, "Stored file");

        Ok(name)
    }

    /// Return a name that is free on the remote filesystem.
    ///
    /// The name is returned unchanged when it is free and within
    /// `max_length`. Otherwise suffixed candidates are generated, truncating
    /// the root as needed to fit `max_length`, until one is free.
    pub async fn get_available_name(&self, name: &str, max_length: Option<usize>) -> Result<String> {
        let mut candidate = RemoteName::parse(name)?;
        if candidate.file_name().is_empty() {
            return Err(BoardError::Validation(format!(
                "'{name}' does not name a file"
            )));
        }

        let mut name = normalize_separators(name);
        while self.exists(&name).await? || max_length.is_some_and(|max| char_len(&name) > max) {
            tracing::debug!(name = %name, "Name unavailable, trying an alternative");
            name = candidate.with_suffix(&self.suffixes.next_suffix());

            let Some(max_length) = max_length else {
                continue;
            };

            let truncation = char_len(&name).saturating_sub(max_length);
            if truncation > 0 {
                candidate.truncate_root(truncation);
                if candidate.root.is_empty() {
                    return Err(BoardError::NameSpaceExhausted(name));
                }
                name = candidate.with_suffix(&self.suffixes.next_suffix());
            }
        }

        Ok(name)
    }

    /// Check whether `name` exists, by listing its directory.
    pub async fn exists(&self, name: &str) -> Result<bool> {
        let name = normalize_separators(name);
        let (directory, file_name) = split_path(&name);
        let listing = self.remote.list(directory).await?;
        Ok(listing.iter().any(|entry| entry == file_name))
    }

    /// Delete `name` from the remote filesystem.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.remote.delete(name).await?;
        tracing::info!(name = %name, "Deleted file");
        Ok(())
    }

    /// List the entries of a directory.
    pub async fn list_dir(&self, path: &str) -> Result<Vec<String>> {
        self.remote.list(path).await
    }

    /// Space consumed by `name`, in bytes.
    pub async fn size(&self, name: &str) -> Result<u64> {
        Ok(self.remote.content_summary(name).await?.space_consumed)
    }

    /// WebHDFS `OPEN` locator for `name`.
    ///
    /// Clients must append a credential before using it; see
    /// [`FileStore::authorized_url`].
    pub fn url(&self, name: &str) -> Result<String> {
        Ok(self.locator(name)?.to_string())
    }

    /// Locator for `name` with `credential` appended.
    pub fn authorized_url(&self, name: &str, credential: &AccessCredential) -> Result<String> {
        let mut url = self.locator(name)?;
        let (key, value) = credential.query_pair();
        url.query_pairs_mut().append_pair(key, value);
        Ok(url.to_string())
    }

    /// Credential for client-side access, fetched per call.
    pub async fn access_credential(&self) -> Result<AccessCredential> {
        self.auth.credential().await
    }

    fn locator(&self, name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| BoardError::Config(format!("invalid HDFS endpoint: {e}")))?;

        let name = normalize_separators(name);
        let segments = ["webhdfs", "v1"]
            .into_iter()
            .chain(self.root.split('/'))
            .chain(name.split('/'))
            .filter(|segment| !segment.is_empty());

        url.path_segments_mut()
            .map_err(|_| BoardError::Config(format!("invalid HDFS endpoint: {}", self.endpoint)))?
            .clear()
            .extend(segments);
        url.query_pairs_mut().append_pair("op", "OPEN");
        Ok(url)
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("endpoint", &self.endpoint)
            .field("root", &self.root)
            .finish()
    }
}

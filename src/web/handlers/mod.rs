//! API handlers for the web layer.

pub mod post;

pub use post::*;

use std::sync::Arc;

use crate::config::FilesConfig;
use crate::storage::FileStore;
use crate::Database;

/// Shared database handle.
pub type SharedDatabase = Arc<Database>;

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Post metadata.
    pub db: SharedDatabase,
    /// Attachment storage.
    pub store: FileStore,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
    /// Maximum stored name length, if any.
    pub max_name_length: Option<usize>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: SharedDatabase, store: FileStore, files: &FilesConfig) -> Self {
        Self {
            db,
            store,
            max_upload_size: files.max_upload_size_bytes(),
            max_name_length: files.name_length_limit(),
        }
    }
}

//! Post metadata.
//!
//! A post is a title plus the stored name of its attachment. The attachment
//! bytes live in the remote store; only the final name is kept here.

mod model;
mod repository;

pub use model::{NewPost, Post};
pub use repository::PostRepository;

/// Maximum length for a post title (in characters).
pub const MAX_TITLE_LENGTH: usize = 200;

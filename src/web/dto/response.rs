//! Response DTOs for Web API.

use serde::Serialize;

use crate::datetime::to_rfc3339;
use crate::post::Post;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Post in API responses.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    /// Post ID.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Name the attachment is stored under.
    pub filename: String,
    /// Creation time (RFC 3339).
    pub created: String,
    /// Direct WebHDFS link to the attachment, credential included.
    pub url: String,
}

impl PostResponse {
    /// Build a response from a post and its file URL.
    pub fn new(post: Post, url: String) -> Self {
        Self {
            id: post.id,
            title: post.title,
            filename: post.filename,
            created: to_rfc3339(&post.created),
            url,
        }
    }
}

//! Post model.

/// Post entity as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Post title.
    pub title: String,
    /// Name of the attachment in the remote store.
    pub filename: String,
    /// Creation timestamp (UTC, SQLite format).
    pub created: String,
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// Final stored name returned by the file store.
    pub filename: String,
}

impl NewPost {
    /// Create a new post with required fields.
    pub fn new(title: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            filename: filename.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post() {
        let post = NewPost::new("Quarterly report", "report.pdf");
        assert_eq!(post.title, "Quarterly report");
        assert_eq!(post.filename, "report.pdf");
    }
}

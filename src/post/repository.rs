//! Post repository.
//!
//! This module provides CRUD operations for posts in the database.

use super::model::{NewPost, Post};
use crate::db::DbPool;
use crate::{BoardError, Result};

/// Repository for post CRUD operations.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post.
    ///
    /// Returns the created post with the assigned ID.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO posts (title, filename) VALUES (?, ?) RETURNING id")
                .bind(&new_post.title)
                .bind(&new_post.filename)
                .fetch_one(self.pool)
                .await
                .map_err(|e| BoardError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BoardError::NotFound("post".to_string()))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, title, filename, created FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| BoardError::Database(e.to_string()))?;

        Ok(post)
    }

    /// List all posts, newest first.
    pub async fn list(&self) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT id, title, filename, created FROM posts ORDER BY created DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| BoardError::Database(e.to_string()))?;

        Ok(posts)
    }

    /// Delete a post by ID.
    ///
    /// Returns true if a post was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| BoardError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all posts.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool)
            .await
            .map_err(|e| BoardError::Database(e.to_string()))?;

        Ok(count)
    }
}

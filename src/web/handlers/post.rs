//! Post handlers for Web API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::post::{NewPost, Post, PostRepository, MAX_TITLE_LENGTH};
use crate::storage::{secure_filename, AccessCredential};
use crate::web::dto::{ApiResponse, PostResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Build the response for `post`, with its file URL authorized by `credential`.
fn to_response(
    state: &AppState,
    post: Post,
    credential: &AccessCredential,
) -> Result<PostResponse, ApiError> {
    let url = state.store.authorized_url(&post.filename, credential)?;
    Ok(PostResponse::new(post, url))
}

/// Credential for file links, fetched once per request.
async fn fetch_credential(state: &AppState) -> Result<AccessCredential, ApiError> {
    state.store.access_credential().await.map_err(|e| {
        tracing::error!("Failed to get HDFS credential: {}", e);
        ApiError::bad_gateway("Could not get HDFS credential")
    })
}

fn too_large(max_upload_size: u64) -> ApiError {
    let max_mb = max_upload_size / 1024 / 1024;
    ApiError::payload_too_large(format!("File too large (max {}MB)", max_mb))
}

/// Map a multipart read failure, keeping body-limit rejections as 413.
fn multipart_error(e: MultipartError, max_upload_size: u64, message: &str) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Upload rejected by body limit: {}", e);
        return too_large(max_upload_size);
    }
    tracing::error!("{}: {}", message, e);
    ApiError::bad_request(message)
}

/// GET /api/posts - List posts, newest first.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<PostResponse>>>, ApiError> {
    let repo = PostRepository::new(state.db.pool());
    let posts = repo.list().await?;

    if posts.is_empty() {
        return Ok(Json(ApiResponse::new(Vec::new())));
    }

    let credential = fetch_credential(&state).await?;
    let responses = posts
        .into_iter()
        .map(|post| to_response(&state, post, &credential))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ApiResponse::new(responses)))
}

/// POST /api/posts - Create a post with an attachment.
///
/// Request body: multipart/form-data with "title" and "file" fields.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<PostResponse>>), ApiError> {
    let mut title: Option<String> = None;
    let mut filename: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    let limit = state.max_upload_size;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit, "Invalid multipart data"))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| multipart_error(e, limit, "Invalid title"))?,
                );
            }
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                content = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| multipart_error(e, limit, "Failed to read file"))?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let title = title.map(|t| t.trim().to_string()).unwrap_or_default();
    if title.is_empty() {
        return Err(ApiError::field("title", "Title is required."));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ApiError::field(
            "title",
            format!("Title must be at most {MAX_TITLE_LENGTH} characters."),
        ));
    }

    let (filename, content) = match (filename, content) {
        (Some(filename), Some(content)) if !filename.is_empty() => (filename, content),
        _ => return Err(ApiError::field("file", "File is required.")),
    };

    if content.len() as u64 > state.max_upload_size {
        return Err(too_large(state.max_upload_size));
    }

    let safe_name = secure_filename(&filename);
    if safe_name.is_empty() {
        return Err(ApiError::field("file", "Invalid file name."));
    }

    let stored_name = state
        .store
        .save(&safe_name, content.as_slice(), state.max_name_length)
        .await?;

    let repo = PostRepository::new(state.db.pool());
    let post = match repo.create(&NewPost::new(&title, &stored_name)).await {
        Ok(post) => post,
        Err(e) => {
            tracing::error!("Failed to create post: {}", e);
            if let Err(e) = state.store.delete(&stored_name).await {
                tracing::warn!(name = %stored_name, "Failed to clean up stored file: {}", e);
            }
            return Err(ApiError::internal("Failed to create post"));
        }
    };

    tracing::info!(id = post.id, filename = %post.filename, "Created post");

    let credential = fetch_credential(&state).await?;
    let response = to_response(&state, post, &credential)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(response))))
}

/// GET /api/posts/:id - Get a single post.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let repo = PostRepository::new(state.db.pool());
    let post = repo
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Post id {post_id} doesn't exist.")))?;

    let credential = fetch_credential(&state).await?;
    let response = to_response(&state, post, &credential)?;
    Ok(Json(ApiResponse::new(response)))
}

/// DELETE /api/posts/:id - Delete a post and its attachment.
///
/// The attachment is removed first; if that fails the post is kept.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = PostRepository::new(state.db.pool());
    let post = repo
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Post id {post_id} doesn't exist.")))?;

    if let Err(e) = state.store.delete(&post.filename).await {
        tracing::error!(id = post_id, filename = %post.filename, "Failed to delete file: {}", e);
        return Err(ApiError::bad_gateway("Could not delete from HDFS"));
    }

    repo.delete(post_id).await?;
    tracing::info!(id = post_id, "Deleted post");

    Ok(StatusCode::NO_CONTENT)
}

//! Error types for the board.

use thiserror::Error;

/// Common error type for the board.
#[derive(Error, Debug)]
pub enum BoardError {
    /// The directory part of a requested name contains a `..` segment.
    ///
    /// The request is rejected as-is; the name is never rewritten.
    #[error("detected path traversal attempt in '{0}'")]
    PathTraversal(String),

    /// No name fitting the length limit could be built.
    #[error(
        "storage can not find an available filename for \"{0}\"; \
         make sure the file field allows a sufficient max length"
    )]
    NameSpaceExhausted(String),

    /// Remote filesystem error (connectivity, permission, protocol).
    #[error("storage error: {0}")]
    Storage(String),

    /// Database error.
    ///
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Delegation token retrieval error.
    #[error("token error: {0}")]
    Token(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for BoardError {
    fn from(e: sqlx::Error) -> Self {
        BoardError::Database(e.to_string())
    }
}

impl From<opendal::Error> for BoardError {
    fn from(e: opendal::Error) -> Self {
        BoardError::Storage(e.to_string())
    }
}

/// Result type alias for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_traversal_display() {
        let err = BoardError::PathTraversal("../etc".to_string());
        assert_eq!(
            err.to_string(),
            "detected path traversal attempt in '../etc'"
        );
    }

    #[test]
    fn test_name_space_exhausted_display() {
        let err = BoardError::NameSpaceExhausted("a_ABCDEFG.txt".to_string());
        assert!(err.to_string().contains("a_ABCDEFG.txt"));
        assert!(err.to_string().contains("max length"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = BoardError::Validation("title is required".to_string());
        assert_eq!(err.to_string(), "validation error: title is required");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = BoardError::NotFound("post".to_string());
        assert_eq!(err.to_string(), "post not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BoardError = io_err.into();
        assert!(matches!(err, BoardError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_opendal_error_conversion() {
        let remote = opendal::Error::new(opendal::ErrorKind::PermissionDenied, "denied");
        let err: BoardError = remote.into();
        assert!(matches!(err, BoardError::Storage(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(BoardError::Storage("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}

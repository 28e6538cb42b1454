//! Web API.
//!
//! JSON endpoints for creating, listing, and deleting posts. Each post
//! carries one attachment stored through [`crate::storage::FileStore`].

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;

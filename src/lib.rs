//! hdfs-board - a post board with attachments on HDFS.
//!
//! Post metadata lives in SQLite; attachments are written to HDFS through
//! WebHDFS under collision-free names.

pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod post;
pub mod storage;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{BoardError, Result};
pub use post::{NewPost, Post, PostRepository};
pub use storage::{FileStore, RemoteFs};
pub use web::WebServer;

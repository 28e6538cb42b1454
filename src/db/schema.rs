//! Database schema and migrations.
//!
//! Migrations are applied in order when the database is opened; the
//! `schema_version` table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: posts with their attachment's stored name
    r#"
CREATE TABLE posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    filename    TEXT NOT NULL,              -- final name in the remote store
    created     TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_posts_created ON posts(created);
"#,
];

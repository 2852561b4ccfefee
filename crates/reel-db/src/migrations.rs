//! Embedded SQL migrations and runner.
//!
//! Migrations are `&str` constants applied in order; the
//! `schema_migrations` table records which versions already ran.

use reel_core::{Error, Result};
use rusqlite::Connection;

/// V1: catalog, users, and per-user watched state.
const V1_INITIAL: &str = r#"
CREATE TABLE users (
    id         TEXT PRIMARY KEY,
    username   TEXT UNIQUE NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE videos (
    id           TEXT PRIMARY KEY,
    file_path    TEXT NOT NULL UNIQUE,
    file_name    TEXT NOT NULL,
    file_size    INTEGER NOT NULL,
    content_type TEXT,
    created_at   TEXT NOT NULL
);

CREATE TABLE watched (
    user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    video_id    TEXT NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
    watched_at  TEXT NOT NULL,
    watch_count INTEGER NOT NULL DEFAULT 1,
    PRIMARY KEY (user_id, video_id)
);

CREATE INDEX idx_watched_user ON watched(user_id);
"#;

const MIGRATIONS: &[(i64, &str)] = &[(1, V1_INITIAL)];

/// Apply every migration that has not run yet, each in its own transaction.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;
        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;
        tx.execute("INSERT INTO schema_migrations (version) VALUES (?1)", [version])
            .map_err(|e| Error::database(e.to_string()))?;
        tx.commit().map_err(|e| Error::database(e.to_string()))?;
    }

    Ok(())
}

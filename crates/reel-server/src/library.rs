//! Collaborator interfaces the streaming endpoints consume, and their
//! SQLite-backed implementation.
//!
//! The traits are synchronous: implementations are expected to be quick
//! lookups, and the one write ([`WatchedStatusStore::mark_watched`]) is
//! always invoked from a blocking task.

use std::path::PathBuf;

use reel_core::{Result, UserId, VideoId};
use reel_db::models::User;
use reel_db::pool::{get_conn, DbPool};
use reel_db::queries;

/// What the catalog knows about a video file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: VideoId,
    pub file_path: PathBuf,
    /// Content type reported by the catalog, if any.
    pub content_type: Option<String>,
}

/// Maps a video identifier to a file on disk.
pub trait Catalog: Send + Sync {
    fn video(&self, id: VideoId) -> Result<Option<CatalogEntry>>;
}

/// Looks up users by id.
pub trait UserDirectory: Send + Sync {
    fn user(&self, id: UserId) -> Result<Option<User>>;
}

/// Persists "user watched video".
pub trait WatchedStatusStore: Send + Sync {
    fn mark_watched(&self, video: VideoId, user: UserId) -> Result<()>;
}

/// All three collaborators over one SQLite pool.
#[derive(Clone)]
pub struct SqliteLibrary {
    db: DbPool,
}

impl SqliteLibrary {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

impl Catalog for SqliteLibrary {
    fn video(&self, id: VideoId) -> Result<Option<CatalogEntry>> {
        let conn = get_conn(&self.db)?;
        Ok(queries::videos::get_video(&conn, id)?.map(|v| CatalogEntry {
            id: v.id,
            file_path: PathBuf::from(v.file_path),
            content_type: v.content_type,
        }))
    }
}

impl UserDirectory for SqliteLibrary {
    fn user(&self, id: UserId) -> Result<Option<User>> {
        let conn = get_conn(&self.db)?;
        queries::users::get_user(&conn, id)
    }
}

impl WatchedStatusStore for SqliteLibrary {
    fn mark_watched(&self, video: VideoId, user: UserId) -> Result<()> {
        let conn = get_conn(&self.db)?;
        let state = queries::watched::mark_watched(&conn, user, video)?;
        tracing::debug!(
            %video,
            %user,
            watch_count = state.watch_count,
            "Watched state stored"
        );
        Ok(())
    }
}

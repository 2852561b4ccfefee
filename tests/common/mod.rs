//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, default config and
//! full [`AppContext`]. The [`TestHarness::with_server`] constructor starts
//! Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reel_core::config::Config;
use reel_core::{UserId, VideoId};
use reel_db::pool::{init_memory_pool, DbPool};
use reel_server::context::AppContext;
use reel_server::library::{SqliteLibrary, WatchedStatusStore};
use reel_server::router::build_router;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
}

impl TestHarness {
    /// Create a new harness with default configuration and in-memory DB.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration and in-memory DB.
    pub fn with_config(config: Config) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::new(config, SqliteLibrary::new(db.clone()));
        Self { ctx, db }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let addr = harness.serve().await;
        (harness, addr)
    }

    /// Start an Axum server whose watched-state writes go to `store`
    /// instead of the SQLite library.
    pub async fn with_server_store(store: Arc<dyn WatchedStatusStore>) -> (Self, SocketAddr) {
        let mut harness = Self::new();
        harness.ctx.watched = store;
        let addr = harness.serve().await;
        (harness, addr)
    }

    async fn serve(&self) -> SocketAddr {
        let app = build_router(self.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> reel_db::PooledConnection {
        reel_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    /// Register `path` in the catalog.
    pub fn add_video(&self, path: &Path, content_type: Option<&str>) -> VideoId {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        let size = std::fs::metadata(path).map(|m| m.len() as i64).unwrap_or(0);
        reel_db::queries::videos::create_video(
            &self.conn(),
            path.to_str().unwrap(),
            &name,
            size,
            content_type,
        )
        .expect("failed to create video")
        .id
    }

    pub fn add_user(&self, username: &str) -> UserId {
        reel_db::queries::users::create_user(&self.conn(), username)
            .expect("failed to create user")
            .id
    }

    pub fn watch_count(&self, user: UserId, video: VideoId) -> Option<i64> {
        reel_db::queries::watched::get_watched(&self.conn(), user, video)
            .expect("failed to query watched state")
            .map(|w| w.watch_count)
    }

    /// Poll until the video is marked watched, or give up after ~2s.
    pub async fn wait_for_watched(&self, user: UserId, video: VideoId) -> Option<i64> {
        for _ in 0..200 {
            if let Some(count) = self.watch_count(user, video) {
                return Some(count);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }
}

/// Create a sparse file of `len` zero bytes at `dir/name`.
pub fn large_media_file(dir: &Path, name: &str, len: u64) -> std::path::PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).expect("failed to create media file");
    file.set_len(len).expect("failed to size media file");
    path
}

/// Write `len` bytes of a repeating 0..=255 pattern to `dir/name`.
pub fn media_file(dir: &Path, name: &str, len: usize) -> std::path::PathBuf {
    let path = dir.join(name);
    let data: Vec<u8> = (0..=255u8).cycle().take(len).collect();
    std::fs::write(&path, data).expect("failed to write media file");
    path
}

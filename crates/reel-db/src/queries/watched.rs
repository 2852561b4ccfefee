//! Per-user watched state.

use chrono::Utc;
use reel_core::{Error, Result, UserId, VideoId};
use rusqlite::Connection;

use crate::models::WatchedState;

/// Record that `user_id` watched `video_id`.
///
/// Repeated calls refresh `watched_at` and bump `watch_count`.
pub fn mark_watched(conn: &Connection, user_id: UserId, video_id: VideoId) -> Result<WatchedState> {
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO watched (user_id, video_id, watched_at, watch_count)
         VALUES (?1, ?2, ?3, 1)
         ON CONFLICT(user_id, video_id) DO UPDATE SET
            watched_at = excluded.watched_at,
            watch_count = watch_count + 1",
        rusqlite::params![user_id.to_string(), video_id.to_string(), &now],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    get_watched(conn, user_id, video_id)?
        .ok_or_else(|| Error::Internal("watched row missing after upsert".into()))
}

/// Fetch the watched state for a (user, video) pair.
pub fn get_watched(
    conn: &Connection,
    user_id: UserId,
    video_id: VideoId,
) -> Result<Option<WatchedState>> {
    let q = format!(
        "SELECT {} FROM watched WHERE user_id = ?1 AND video_id = ?2",
        WatchedState::COLUMNS
    );
    let result = conn.query_row(
        &q,
        rusqlite::params![user_id.to_string(), video_id.to_string()],
        WatchedState::from_row,
    );
    match result {
        Ok(w) => Ok(Some(w)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

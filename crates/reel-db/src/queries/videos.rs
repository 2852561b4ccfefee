//! Catalog entries for local video files.

use chrono::Utc;
use reel_core::{Error, Result, VideoId};
use rusqlite::Connection;

use crate::models::Video;

/// Register a file in the catalog.
pub fn create_video(
    conn: &Connection,
    file_path: &str,
    file_name: &str,
    file_size: i64,
    content_type: Option<&str>,
) -> Result<Video> {
    let id = VideoId::new();
    let created_at = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO videos (id, file_path, file_name, file_size, content_type, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            id.to_string(),
            file_path,
            file_name,
            file_size,
            content_type,
            created_at,
        ],
    )
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            Error::Validation(format!("'{file_path}' is already registered"))
        } else {
            Error::database(e.to_string())
        }
    })?;

    Ok(Video {
        id,
        file_path: file_path.to_string(),
        file_name: file_name.to_string(),
        file_size,
        content_type: content_type.map(String::from),
        created_at,
    })
}

/// Look up a catalog entry by id.
pub fn get_video(conn: &Connection, id: VideoId) -> Result<Option<Video>> {
    let q = format!("SELECT {} FROM videos WHERE id = ?1", Video::COLUMNS);
    match conn.query_row(&q, [id.to_string()], Video::from_row) {
        Ok(v) => Ok(Some(v)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{get_conn, init_memory_pool};

    #[test]
    fn create_and_get() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let v = create_video(&conn, "/media/ep01.mkv", "ep01.mkv", 4096, Some("video/x-matroska"))
            .unwrap();
        let by_id = get_video(&conn, v.id).unwrap().unwrap();
        assert_eq!(by_id, v);
    }

    #[test]
    fn unknown_video_is_none() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        assert!(get_video(&conn, VideoId::new()).unwrap().is_none());
    }

    #[test]
    fn duplicate_path_rejected() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        create_video(&conn, "/media/a.mp4", "a.mp4", 1, None).unwrap();
        let err = create_video(&conn, "/media/a.mp4", "a.mp4", 1, None).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}

//! Turning request parameters into an opened file.
//!
//! Files are addressed either by catalog id or by an encoded absolute path.
//! The encoding is standard Base64 with three characters swapped for
//! URL-safe ones: `+` becomes `-`, `/` becomes `_` and `=` becomes `,`.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reel_core::{Error, Result, UserId, VideoId};
use tokio::fs::File;

use crate::library::{Catalog, UserDirectory};

/// A file opened for streaming.
#[derive(Debug)]
pub struct OpenedFile {
    pub path: PathBuf,
    pub file: File,
    /// Size reported by the opened handle's metadata.
    pub size: u64,
    pub mime: String,
}

/// Where the bytes come from.
#[derive(Debug)]
pub enum StreamSource {
    /// A catalog entry, optionally on behalf of a known user.
    Cataloged {
        video: VideoId,
        file: OpenedFile,
        user: Option<UserId>,
    },
    /// A file addressed directly by path.
    AdHoc { file: OpenedFile },
}

/// Who should be credited with a view once the threshold is crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchContext {
    pub video: VideoId,
    pub user: UserId,
}

impl StreamSource {
    pub fn file(&self) -> &OpenedFile {
        match self {
            StreamSource::Cataloged { file, .. } | StreamSource::AdHoc { file } => file,
        }
    }

    pub fn into_file(self) -> OpenedFile {
        match self {
            StreamSource::Cataloged { file, .. } | StreamSource::AdHoc { file } => file,
        }
    }

    /// The watch context, if auto-watch was requested for a cataloged video
    /// with a resolved user.
    pub fn watch_context(&self, autowatch: bool) -> Option<WatchContext> {
        match self {
            StreamSource::Cataloged {
                video,
                user: Some(user),
                ..
            } if autowatch => Some(WatchContext {
                video: *video,
                user: *user,
            }),
            _ => None,
        }
    }
}

/// Resolve a catalog id (and optional user id) to an opened file.
pub async fn resolve_by_id(
    catalog: &dyn Catalog,
    users: &dyn UserDirectory,
    raw_id: &str,
    raw_user: Option<&str>,
) -> Result<StreamSource> {
    let video: VideoId = raw_id.parse().map_err(|_| Error::video_not_found())?;
    let entry = catalog.video(video)?.ok_or_else(Error::video_not_found)?;

    let file = open_file(&entry.file_path, entry.content_type.as_deref()).await?;
    let user = resolve_user(users, raw_user)?;

    Ok(StreamSource::Cataloged {
        video: entry.id,
        file,
        user,
    })
}

/// Resolve an encoded absolute path to an opened file.
pub async fn resolve_by_encoded_path(
    users: &dyn UserDirectory,
    encoded: &str,
    raw_user: Option<&str>,
) -> Result<StreamSource> {
    let path = decode_path(encoded).ok_or_else(Error::video_not_found)?;
    let file = open_file(Path::new(&path), None).await?;
    // A user is validated here too, but ad-hoc files are never credited.
    resolve_user(users, raw_user)?;

    Ok(StreamSource::AdHoc { file })
}

fn resolve_user(users: &dyn UserDirectory, raw_user: Option<&str>) -> Result<Option<UserId>> {
    let Some(raw) = raw_user.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let id: UserId = raw.parse().map_err(|_| Error::user_not_found())?;
    let user = users.user(id)?.ok_or_else(Error::user_not_found)?;
    Ok(Some(user.id))
}

/// Open `path` for reading and resolve its size and content type.
pub async fn open_file(path: &Path, reported_type: Option<&str>) -> Result<OpenedFile> {
    let file = File::open(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::video_not_found(),
        _ => Error::open(path, e),
    })?;
    let meta = file.metadata().await.map_err(|e| Error::open(path, e))?;
    if meta.is_dir() {
        return Err(Error::NotAFile(path.to_path_buf()));
    }

    Ok(OpenedFile {
        path: path.to_path_buf(),
        file,
        size: meta.len(),
        mime: reel_stream::mime::resolve(path, reported_type),
    })
}

/// Decode the URL form of an absolute path. `None` if it is not valid
/// Base64 or not UTF-8.
pub fn decode_path(encoded: &str) -> Option<String> {
    let standard: String = encoded
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            ',' => '=',
            c => c,
        })
        .collect();
    let bytes = STANDARD.decode(standard).ok()?;
    String::from_utf8(bytes).ok()
}

/// Inverse of [`decode_path`].
pub fn encode_path(path: &str) -> String {
    STANDARD
        .encode(path)
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            '=' => ',',
            c => c,
        })
        .collect()
}

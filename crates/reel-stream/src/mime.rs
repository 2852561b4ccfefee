//! Content-type resolution for streamed files.
//!
//! A reported content type wins unless it is missing or generic. Otherwise
//! the extension is looked up in a fixed table of media and subtitle types,
//! then in `mime_guess`, and finally falls back to `application/octet-stream`.

use std::path::Path;

/// Content type used when nothing better is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Media and subtitle extensions players care about. Several of these are
/// missing from, or mapped differently by, general purpose MIME databases.
fn media_type_for_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext {
        // Video containers
        "mp4" | "m4v" => "video/mp4",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "ogm" | "ogv" => "video/ogg",
        "ts" | "m2ts" | "mts" => "video/mp2t",
        "mpg" | "mpeg" => "video/mpeg",
        "3gp" => "video/3gpp",
        // Audio containers
        "mka" => "audio/x-matroska",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "wav" => "audio/wav",
        // Subtitles
        "srt" => "application/x-subrip",
        "ass" | "ssa" => "text/x-ssa",
        "vtt" => "text/vtt",
        "sub" => "text/x-microdvd",
        "idx" => "text/plain",
        "sup" => "application/octet-stream",
        _ => return None,
    };
    Some(mime)
}

fn is_generic(content_type: &str) -> bool {
    let ct = content_type.trim();
    ct.is_empty()
        || ct.eq_ignore_ascii_case(OCTET_STREAM)
        || ct.eq_ignore_ascii_case("binary/octet-stream")
        || ct.eq_ignore_ascii_case("application/unknown")
}

/// Resolve the content type for `path`, preferring `reported` when it is
/// specific.
pub fn resolve(path: &Path, reported: Option<&str>) -> String {
    if let Some(ct) = reported.filter(|ct| !is_generic(ct)) {
        return ct.trim().to_string();
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if let Some(mime) = media_type_for_extension(&ext) {
        return mime.to_string();
    }

    mime_guess::from_ext(&ext)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}

//! `Range` header parsing.
//!
//! Parsing is permissive: only a single `bytes=` range is understood and any
//! value that does not fit one of the three accepted shapes falls back to the
//! whole file rather than producing `416 Range Not Satisfiable`.

use std::fmt;

/// An inclusive byte interval over a file of `total` bytes.
///
/// For `total >= 1`, `start <= end <= total - 1` always holds. An empty file
/// is represented by [`ByteRange::empty`], whose [`len`](Self::len) is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl ByteRange {
    /// The whole of a file of `total` bytes.
    pub fn full(total: u64) -> Self {
        if total == 0 {
            return Self::empty();
        }
        Self {
            start: 0,
            end: total - 1,
            total,
        }
    }

    /// Zero-length marker used for empty files.
    pub fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            total: 0,
        }
    }

    /// Number of bytes covered, `end - start + 1` (0 for an empty file).
    pub fn len(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value for the `Content-Range` response header.
    pub fn content_range(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            write!(f, "bytes */0")
        } else {
            write!(f, "bytes {}-{}/{}", self.start, self.end, self.total)
        }
    }
}

/// Parse a raw `Range` header value against a file of `total` bytes.
///
/// Accepted shapes, after stripping an optional `bytes=` prefix and looking
/// only at the first comma separated range:
///
/// - `-N`: the last `N` bytes
/// - `N-`: from `N` to the end
/// - `A-B`: from `A` to `B`, clamped to the file
///
/// Everything else yields [`ByteRange::full`].
pub fn parse(raw: Option<&str>, total: u64) -> ByteRange {
    let full = ByteRange::full(total);
    if total == 0 {
        return full;
    }

    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return full;
    };
    let value = value.strip_prefix("bytes=").unwrap_or(value);
    let first = value.split(',').next().unwrap_or_default().trim();
    let Some((from, to)) = first.split_once('-') else {
        return full;
    };

    let last = total - 1;
    let (from, to) = (from.trim(), to.trim());
    let (start, end) = match (from.is_empty(), to.is_empty()) {
        (true, false) => {
            let Ok(suffix) = to.parse::<u64>() else {
                return full;
            };
            (total.saturating_sub(suffix), last)
        }
        (false, true) => {
            let Ok(start) = from.parse::<u64>() else {
                return full;
            };
            (start, last)
        }
        (false, false) => {
            let (Ok(start), Ok(end)) = (from.parse::<u64>(), to.parse::<u64>()) else {
                return full;
            };
            (start.min(last), end.min(last))
        }
        (true, true) => return full,
    };

    ByteRange {
        start: start.min(end),
        end,
        total,
    }
}

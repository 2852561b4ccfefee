//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server and streaming sections. Every section defaults sensibly so a
//! completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Fraction of a file that must be read before it counts as watched.
///
/// High enough that players fetching trailing index atoms near the end of a
/// container do not trip it, low enough that players which never fetch the
/// last few bytes still do.
pub const DEFAULT_WATCHED_THRESHOLD: f64 = 0.89;

/// Value sent in the `Server` response header of streaming endpoints.
pub const DEFAULT_SERVER_NAME: &str = "Reelstream Stream Server 1.0";

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub streaming: StreamingConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        let threshold = self.streaming.watched_threshold;
        if !(threshold > 0.0 && threshold < 1.0) {
            warnings.push(format!(
                "streaming.watched_threshold {threshold} is outside (0, 1); using {DEFAULT_WATCHED_THRESHOLD}"
            ));
        }

        if self.streaming.chunk_size == 0 {
            warnings.push(format!(
                "streaming.chunk_size is 0; using {}",
                default_chunk_size()
            ));
        }

        if self.streaming.server_name.trim().is_empty() {
            warnings.push("streaming.server_name is empty".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8111,
            db_path: PathBuf::from("./data/reelstream.db"),
        }
    }
}

/// Streaming and auto-watch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Fraction of the file after which auto-watch marks it watched.
    pub watched_threshold: f64,
    /// Read size used when streaming a response body.
    pub chunk_size: usize,
    /// Identifier sent in the `Server` header.
    pub server_name: String,
}

fn default_chunk_size() -> usize {
    64 * 1024
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            watched_threshold: DEFAULT_WATCHED_THRESHOLD,
            chunk_size: default_chunk_size(),
            server_name: DEFAULT_SERVER_NAME.into(),
        }
    }
}

impl StreamingConfig {
    /// The configured threshold, or the default when it is outside `(0, 1)`.
    pub fn effective_threshold(&self) -> f64 {
        let t = self.watched_threshold;
        if t > 0.0 && t < 1.0 {
            t
        } else {
            DEFAULT_WATCHED_THRESHOLD
        }
    }

    /// The configured chunk size, or the default when it is zero.
    pub fn effective_chunk_size(&self) -> usize {
        if self.chunk_size == 0 {
            default_chunk_size()
        } else {
            self.chunk_size
        }
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reelstream")]
#[command(author, version, about = "Byte-range media streaming server")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the streaming server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,

    /// Create a user and print its id
    AddUser {
        username: String,
    },

    /// Register a media file in the catalog and print its id
    AddVideo {
        /// File to register
        #[arg(required = true)]
        file: PathBuf,

        /// Content type to record instead of the detected one
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Print the encoded form of a path for `/stream/file/{encoded_path}`
    EncodePath {
        path: String,
    },
}

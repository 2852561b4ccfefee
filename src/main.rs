mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use reel_core::config::Config;
use std::path::Path;

async fn start_server(host: Option<String>, port: Option<u16>, config_path: Option<&Path>) -> Result<()> {
    let mut config = Config::load_or_default(config_path);

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting reelstream");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    reel_server::start(config).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelstream=trace,reel_server=trace,reel_stream=trace,reel_db=debug,tower_http=debug"
                .to_string()
        } else {
            "reelstream=info,reel_server=info,reel_stream=info,reel_db=info,tower_http=info"
                .to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("reelstream {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::AddUser { username } => add_user(cli.config.as_deref(), &username),
        Commands::AddVideo { file, content_type } => {
            add_video(cli.config.as_deref(), &file, content_type.as_deref())
        }
        Commands::EncodePath { path } => {
            println!("{}", reel_server::resolver::encode_path(&path));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            let contents = std::fs::read_to_string(p)
                .with_context(|| format!("Failed to read {}", p.display()))?;
            Config::from_json(&contents)?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("✓ Configuration is valid");
    } else {
        for warning in &warnings {
            println!("! {warning}");
        }
    }
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Database: {}", config.server.db_path.display());
    println!(
        "  Watched threshold: {}",
        config.streaming.effective_threshold()
    );

    Ok(())
}

fn open_db(config_path: Option<&Path>) -> Result<reel_db::DbPool> {
    let config = Config::load_or_default(config_path);
    let db_path = &config.server.db_path;
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(reel_db::pool::init_pool(&db_path.to_string_lossy())?)
}

fn add_user(config_path: Option<&Path>, username: &str) -> Result<()> {
    let pool = open_db(config_path)?;
    let conn = reel_db::pool::get_conn(&pool)?;
    let user = reel_db::queries::users::create_user(&conn, username)?;
    println!("{}", user.id);
    Ok(())
}

fn add_video(config_path: Option<&Path>, file: &Path, content_type: Option<&str>) -> Result<()> {
    let path = file
        .canonicalize()
        .with_context(|| format!("File does not exist: {}", file.display()))?;
    let meta = std::fs::metadata(&path)?;
    if meta.is_dir() {
        anyhow::bail!("{} is a directory, not a file", path.display());
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = reel_stream::mime::resolve(&path, content_type);
    let size = i64::try_from(meta.len()).context("File too large")?;

    let pool = open_db(config_path)?;
    let conn = reel_db::pool::get_conn(&pool)?;
    let video = reel_db::queries::videos::create_video(
        &conn,
        &path.to_string_lossy(),
        &file_name,
        size,
        Some(&mime),
    )?;

    tracing::debug!(path = %path.display(), content_type = %mime, "Registered video");
    println!("{}", video.id);
    Ok(())
}

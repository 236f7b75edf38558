use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use youtube_gemini_backend::{ApiServer, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("YouTube Gemini Backend")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Answers questions about YouTube videos using Gemini")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Interface to bind (overrides HOST)"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .value_parser(clap::value_parser!(u16))
                .help("Port to listen on (overrides PORT)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");

    // Initialize logging
    let default_filter = if verbose {
        "youtube_gemini_backend=debug,tower_http=debug,warn"
    } else {
        "youtube_gemini_backend=info,tower_http=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if verbose {
        info!("Verbose logging enabled");
    }

    // Load configuration
    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let mut config = Config::load(config_path.as_deref())?;

    if let Some(host) = matches.get_one::<String>("host") {
        config.server.host = host.clone();
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    config.validate()?;

    info!("🚀 YouTube Gemini Backend starting...");
    for line in config.summary().lines() {
        info!("{}", line);
    }

    let state = AppState::from_config(config)?;
    ApiServer::new(state).start().await
}

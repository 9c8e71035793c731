//! UMP Music label website.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                   LABEL SITE                      │
//!                         │                                                   │
//!     Client Request      │  ┌──────────┐    ┌──────────────┐                 │
//!     ────────────────────┼─▶│   http   │───▶│   locale     │── redirect ─────┼──▶ /es/...
//!                         │  │  server  │    │  middleware  │                 │
//!                         │  └──────────┘    └──────┬───────┘                 │
//!                         │                         │ bypass / localized      │
//!                         │                         ▼                         │
//!                         │  ┌──────────┐    ┌──────────────┐  ┌───────────┐  │
//!     JSON page model     │  │  pages   │◀───│   content    │  │   admin   │  │
//!     ◀───────────────────┼──│ + i18n   │    │    store     │◀─│  + media  │  │
//!                         │  └────┬─────┘    └──────────────┘  └───────────┘  │
//!                         │       │ profile variant                           │
//!                         │       ▼                                           │
//!                         │  ┌──────────┐                                     │
//!                         │  │ dispatch │  Artist | Dj | Producer             │
//!                         │  └──────────┘                                     │
//!                         │                                                   │
//!                         │  Cross-cutting: config (+watcher), observability, │
//!                         │  lifecycle (signals, graceful shutdown)           │
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use umpmusic_site::config::{load_config, watcher::ConfigWatcher, SiteConfig};
use umpmusic_site::content::ContentStore;
use umpmusic_site::lifecycle::{signals::spawn_signal_handler, Shutdown};
use umpmusic_site::media::FsBlobStore;
use umpmusic_site::observability::{logging, metrics};
use umpmusic_site::SiteServer;

#[derive(Parser)]
#[command(name = "umpmusic-site")]
#[command(about = "Bilingual record label website", long_about = None)]
struct Args {
    /// TOML config file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SiteConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "umpmusic-site starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        locales = ?config.i18n.locales,
        default_locale = %config.i18n.default_locale,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = ContentStore::open(&config.content.data_path)?;
    let blobs = Arc::new(FsBlobStore::under_assets(Path::new(&config.content.assets_dir)));

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = SiteServer::new(config, store, blobs)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

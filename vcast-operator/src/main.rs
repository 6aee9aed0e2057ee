//! Control surface (vcast-operator) - Main entry point
//!
//! Hosts the operator HTTP API, owns the staging/style stores and the
//! liveness registry, and runs the broadcast sync tasks that keep the
//! rendering surfaces in step.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vcast_common::channel::SurfaceChannel;
use vcast_common::config::Settings;
use vcast_common::corpus::CorpusIndex;
use vcast_operator::api;
use vcast_operator::events::EventBus;
use vcast_operator::history::LookupHistory;
use vcast_operator::liveness::SurfaceRegistry;
use vcast_operator::selection::RapidSelector;
use vcast_operator::staging::StagingStore;
use vcast_operator::styles::StyleStore;
use vcast_operator::sync;

/// Command-line arguments for vcast-operator
#[derive(Parser, Debug)]
#[command(name = "vcast-operator")]
#[command(about = "Control surface for VerseCast")]
#[command(version)]
struct Args {
    /// Config file path
    #[arg(short, long, env = "VERSECAST_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP API port
    #[arg(short, long, env = "VCAST_OPERATOR_PORT")]
    port: Option<u16>,

    /// Directory holding the corpus JSON files
    #[arg(short, long, env = "VCAST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Send content straight live, bypassing the preview slot
    #[arg(long, env = "VCAST_DIRECT_MODE")]
    direct: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vcast_operator=debug,vcast_common=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(port) = args.port {
        settings.http_port = port;
    }
    if let Some(data_dir) = args.data_dir {
        settings.data_dir = data_dir;
    }
    if args.direct {
        settings.direct_mode = true;
    }

    info!("Starting VerseCast operator on port {}", settings.http_port);
    info!("Corpus directory: {}", settings.data_dir.display());

    let corpus = Arc::new(CorpusIndex::load_dir(&settings.data_dir));
    if corpus.loaded().is_empty() {
        warn!("No translation corpus loaded; lookups will resolve nothing");
    }

    let channel = Arc::new(
        SurfaceChannel::open(settings.group_addr, settings.group_port)
            .context("Failed to join the surface channel")?,
    );
    info!(
        "Joined surface channel {}:{}",
        settings.group_addr, settings.group_port
    );

    let events = EventBus::new(256);
    let staging = Arc::new(StagingStore::new(events.clone()));
    let styles = Arc::new(StyleStore::new(events.clone()));
    let registry = Arc::new(SurfaceRegistry::new(
        settings.liveness_timeout(),
        events.clone(),
    ));
    let history = Arc::new(LookupHistory::new());
    let selector = Arc::new(Mutex::new(RapidSelector::new(corpus.clone())));

    // Broadcast sync: mirror store changes out, probe liveness, resync on
    // surface replies.
    sync::spawn_store_broadcaster(events.clone(), channel.clone());
    sync::spawn_heartbeat(channel.clone(), registry.clone(), settings.ping_interval());
    sync::spawn_reply_listener(
        channel.clone(),
        registry.clone(),
        staging.clone(),
        styles.clone(),
    );

    let app_state = api::AppState {
        corpus,
        staging,
        styles,
        registry,
        history,
        selector,
        events,
        direct_mode: settings.direct_mode,
    };
    let app = api::create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.http_port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

//! Rendering surface (vcast-display) - Main entry point
//!
//! Joins the surface channel, announces itself, answers heartbeat pings
//! and applies content/style broadcasts to its local state. Rendering here
//! is plain logging; a real deployment embeds `DisplayState` behind an
//! actual UI.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use vcast_common::channel::SurfaceChannel;
use vcast_common::config::Settings;
use vcast_display::state::DisplayState;

/// Command-line arguments for vcast-display
#[derive(Parser, Debug)]
#[command(name = "vcast-display")]
#[command(about = "Audience-facing rendering surface for VerseCast")]
#[command(version)]
struct Args {
    /// Config file path
    #[arg(short, long, env = "VERSECAST_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vcast_display=debug,vcast_common=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())
        .context("Failed to load configuration")?;

    let channel = SurfaceChannel::open(settings.group_addr, settings.group_port)
        .context("Failed to join the surface channel")?;

    let mut state = DisplayState::new(Uuid::new_v4());
    info!(
        "Display {} joined {}:{}",
        state.surface_id(),
        settings.group_addr,
        settings.group_port
    );

    // Announce ourselves so the operator resyncs us without waiting for
    // the next ping.
    channel.send(&state.ready_message()).await;

    loop {
        let message = channel
            .recv()
            .await
            .context("Surface channel receive failed")?;
        if let Some(reply) = state.apply(message) {
            channel.send(&reply).await;
        }
    }
}

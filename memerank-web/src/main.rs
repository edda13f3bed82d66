//! memerank-web - Main entry point
//!
//! Multi-user meme rating web service: a fixed catalog of images, per-user
//! rating sessions, append-only SQLite persistence, and a leaderboard
//! behind a closing gate.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use memerank_web::{build_router, catalog::Catalog, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for memerank-web
#[derive(Parser, Debug)]
#[command(name = "memerank-web")]
#[command(about = "Meme rating web service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8082", env = "PORT")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Directory containing the meme images
    #[arg(short, long, default_value = "memes", env = "MEME_DIR")]
    meme_dir: PathBuf,

    /// SQLite database file for rating records
    #[arg(long, default_value = "meme_rankings.db", env = "MEME_DB")]
    db_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memerank_web=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Meme Ranker (memerank-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    // Missing or empty meme directory refuses to start
    let catalog = Catalog::load(&args.meme_dir)
        .with_context(|| format!("Failed to load memes from {}", args.meme_dir.display()))?;
    info!(
        "Loaded {} memes from {}",
        catalog.len(),
        args.meme_dir.display()
    );

    let pool = memerank_common::db::init_database(&args.db_path)
        .await
        .context("Failed to initialize database")?;

    let public_addr = format!("{}:{}", args.host, args.port);
    let state = AppState::new(pool, catalog, args.meme_dir.clone(), public_addr);
    let app = build_router(state);

    let bind_addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("memerank-web listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

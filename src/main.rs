//! MsgCache-RS: a cached message search service
//!
//! This is the main entry point for the application.

use anyhow::Result;
use msgcache_rs::{
    config::Settings,
    loader::Loader,
    snapshot::SnapshotCell,
    upstream::FeedClient,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Starting MsgCache-RS v{}", msgcache_rs::VERSION);

    // Load configuration
    let settings = load_settings()?;
    info!("Mirroring upstream feed at {}", settings.upstream.url);

    // Initialize the feed client
    let client = FeedClient::with_settings(&settings.upstream)?;

    // Create the publication cell and application state; the server starts
    // serving immediately and answers 503 until the snapshot is published.
    let snapshot = SnapshotCell::new();
    let state = AppState::new(settings.clone(), snapshot.clone());

    // One-shot startup load in the background
    let loader = Loader::new(client, &settings.upstream);
    tokio::spawn(async move {
        match loader.load().await {
            Ok(outcome) => {
                for failure in &outcome.warnings {
                    warn!(
                        "page at skip={} was dropped after {} attempts: {}",
                        failure.skip, failure.attempts, failure.error
                    );
                }
                info!(
                    "publishing snapshot with {} of {} records",
                    outcome.snapshot.len(),
                    outcome.snapshot.expected_total()
                );
                snapshot.publish(outcome.snapshot);
            }
            Err(err) => error!("initial feed load failed, serving degraded: {}", err),
        }
    });

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load settings from file or use defaults
fn load_settings() -> Result<Settings> {
    // Check for settings file in various locations
    let paths = [
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/msgcache/settings.yml"),
        dirs::config_dir()
            .map(|p| p.join("msgcache-rs/settings.yml"))
            .unwrap_or_default(),
    ];

    // Check environment variable first
    if let Ok(path) = std::env::var("MSGCACHE_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    // Try each default path
    for path in paths.iter() {
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    // Use defaults
    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}

//! sc2link - connect to a running game and report what it offers.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sc2link_client::config::load_dotenv_from_repo_root;
use sc2link_client::{ClientConfig, GameClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_files = load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sc2link_client=debug,sc2link=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    for path in &env_files.loaded {
        tracing::debug!(path = %path.display(), "Loaded env file");
    }
    for (path, error) in &env_files.rejected {
        tracing::warn!(path = %path.display(), %error, "Ignoring unreadable env file");
    }

    let config = ClientConfig::from_env();
    let wait_for_end = std::env::var("SC2_WAIT_FOR_END")
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false);

    tracing::info!(host = %config.host, port = config.port, "Starting sc2link");

    let mut client = GameClient::connect(&config)
        .await
        .context("failed to connect to the game API")?;

    let ping = client.ping().await.context("ping failed")?;
    tracing::info!(
        game_version = %ping.game_version,
        base_build = ping.base_build,
        status = %client.status(),
        "Game is up"
    );

    let maps = client
        .available_maps()
        .await
        .context("failed to list available maps")?;
    for path in &maps.local_map_paths {
        tracing::info!(map = %path, "Local map");
    }
    for name in &maps.battlenet_map_names {
        tracing::info!(map = %name, "Battle.net map");
    }

    if wait_for_end {
        tracing::info!("Waiting for the game to end");
        client.wait_for_end().await;
    }

    tracing::info!(status = %client.status(), "Shutting down");
    if let Err(e) = client.close().await {
        tracing::warn!(error = %e, "Failed to close connection cleanly");
    }
    Ok(())
}

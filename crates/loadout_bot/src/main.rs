//! Loadout bot server - keeps the Fortnite catalog warm and announces new cosmetics.

use clap::Parser;
use loadout_bot::{AppContext, BotConfig, BotServer, DiffOutcome, init_logging};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Command-line arguments for the bot server.
#[derive(Parser, Debug)]
#[command(name = "loadout")]
#[command(about = "Fortnite catalog cache and new cosmetics notifier")]
#[command(version)]
struct Args {
    /// Path to configuration file; defaults apply when omitted
    #[arg(short, long, env = "LOADOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Run one refresh and one diff cycle, then exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BotConfig::from_file(path)?,
        None => BotConfig::default(),
    }
    .with_env_overrides();

    init_logging(&config.logging)?;
    info!(config_file = ?args.config, languages = ?config.cache.languages, "Configuration loaded");
    if config.api.api_key.is_empty() {
        warn!("FORTNITE_API_KEY not set - upstream may reject requests");
    }

    let context = Arc::new(AppContext::from_config(&config).await?);
    let server = BotServer::new(context, &config);

    if args.once {
        let (refresh, diff) = server.run_once().await;
        info!(success = refresh.is_success(), "Refresh finished");
        match diff {
            Ok(DiffOutcome::Changed { new_items, dispatch }) => info!(
                new_items = new_items.len(),
                delivered_pages = dispatch.map_or(0, |report| *report.delivered_pages()),
                "Diff finished"
            ),
            Ok(outcome) => info!(?outcome, "Diff finished"),
            Err(e) => error!(error = %e, "Diff failed"),
        }
        return Ok(());
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for CTRL+C, shutting down");
        }
    };

    info!("Bot server running. Press CTRL+C to shutdown.");
    server.run_until(shutdown).await;
    info!("Bot server stopped");
    Ok(())
}

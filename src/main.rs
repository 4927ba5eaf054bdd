//! Command-line entry point for the like tracker.
//!
//! Reads the authorization and task configuration files, acquires a
//! credential (cached or via the interactive browser flow), and reports
//! whether the target user liked the configured wall post.

use anyhow::Result;
use bridge_desktop::{DesktopInteraction, ReqwestHttpClient};
use clap::Parser;
use core_auth::{AuthManager, AuthSettings};
use core_runtime::config::ConfigMap;
use core_runtime::events::EventBus;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_tracker::{LikeTracker, TaskSettings};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "liketracker")]
#[command(about = "Checks whether a user liked a wall post", long_about = None)]
struct Cli {
    /// Path to the authorization configuration file
    #[arg(long, default_value = "authorization.config")]
    auth_config: PathBuf,

    /// Path to the task configuration file
    #[arg(long, default_value = "task.config")]
    task_config: PathBuf,

    /// Log output format: pretty, compact, or json
    #[arg(long, default_value = "compact")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(LoggingConfig::default().with_format(cli.log_format)) {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        // Every failure funnels through the one generic exit path.
        tracing::error!(error = %e, "Run failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let auth_config = ConfigMap::load(&cli.auth_config, &AuthSettings::config_spec())?;
    let settings = AuthSettings::from_config(&auth_config)?;

    let task_config = ConfigMap::load(&cli.task_config, &TaskSettings::config_spec())?;
    let task = TaskSettings::from_config(&task_config)?;

    let http_client = Arc::new(ReqwestHttpClient::new());
    let interaction = Arc::new(DesktopInteraction::new());
    let events = EventBus::default();

    info!("Authorizing...");
    let api_version = settings.api_version.clone();
    let manager = AuthManager::new(settings, http_client.clone(), interaction, events.clone());
    let credential = manager.authorize().await?;

    info!("Tracking...");
    let tracker = LikeTracker::new(credential, api_version, http_client, events);
    let liked = tracker.run(&task).await?;

    if liked {
        println!("The post is liked");
    } else {
        println!("The post is not liked");
    }

    Ok(())
}

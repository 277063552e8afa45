use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use tend::api::HttpStore;
use tend::app::{App, AppEvent};
use tend::config::{Config, USER_ID_ENV};
use tend::sync::Dispatcher;
use tend::ui;

/// Get the config directory path (~/.config/tend/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("tend"))
}

#[derive(Parser, Debug)]
#[command(name = "tend", about = "Terminal todo list synced with a remote todos API")]
struct Args {
    /// Config file to read instead of ~/.config/tend/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Owning user id (overrides TEND_USER_ID and the config file)
    #[arg(long, value_name = "ID", value_parser = clap::value_parser!(u32).range(1..))]
    user_id: Option<u32>,

    /// Base URL of the todos API (overrides the config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // The TUI owns stdout; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }

    let env_user = std::env::var(USER_ID_ENV).ok();
    let user_id = config
        .resolve_user_id(args.user_id, env_user.as_deref())
        .context("Failed to resolve the owning user")?;

    let base_url = config
        .base_url()
        .with_context(|| format!("Invalid API base URL '{}'", config.api_base_url))?;
    let store = HttpStore::new(base_url, config.request_timeout())
        .context("Failed to create HTTP client")?;

    match user_id {
        Some(id) => tracing::info!(user_id = id, api = %config.api_base_url, "Starting session"),
        None => tracing::warn!("No user id configured, starting unconfigured session"),
    }

    let mut app = App::with_notification_ttl(user_id, config.notification_ttl());

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    let dispatcher = Dispatcher::new(Arc::new(store), event_tx);

    dispatcher.load(&mut app);

    ui::run(&mut app, dispatcher, event_rx).await?;

    Ok(())
}

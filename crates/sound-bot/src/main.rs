//! Telegram Sound Bot - Main entry point.

use anyhow::Context;
use sound_bot::auth::AuthGate;
use sound_bot::catalog::SoundCatalog;
use sound_bot::config::Config;
use sound_bot::dispatch::Dispatcher;
use sound_bot::error::AppResult;
use sound_bot::metrics::{self, Metrics};
use sound_bot::server::{create_router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use telegram_client::{TelegramClient, UpdateReceiver};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::RwLock;
use tokio_stream::StreamExt;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.bot.log_level);

    info!("Starting Telegram Sound Bot...");

    // Durable usage counters
    let store = usage_store::UsageStore::open(&config.bot.db_path)?;

    // One-shot asset scan; the catalog is immutable for this process
    let catalog = Arc::new(SoundCatalog::scan(&config.bot.asset_dir)?);
    if catalog.is_empty() {
        warn!("No sound assets found in {:?}", config.bot.asset_dir);
    } else {
        info!("Loaded {} sound commands", catalog.len());
    }

    let client = TelegramClient::new(&config.telegram.api_url, &config.telegram.token)?;

    let me = client.get_me().await?;
    let bot_username = me.username.unwrap_or_default();
    if bot_username.is_empty() {
        warn!("Platform returned no bot username; @-addressed commands will be ignored");
    }
    info!("Authenticated as @{}", bot_username);

    client.set_my_commands(&catalog.bot_commands()).await?;

    // Restore metrics once, then count this boot
    let mut metrics = Metrics::new();
    if let Some(snapshot) = metrics::load_snapshot(&config.bot.metrics_path).await {
        metrics.restore(snapshot);
    }
    metrics.mark_startup();
    info!("Startup #{}", metrics.startup_count());
    let metrics = Arc::new(RwLock::new(metrics));

    let auth = AuthGate::new(config.bot.allowed_user_ids());
    let dispatcher = Arc::new(Dispatcher::new(
        client.clone(),
        store,
        catalog,
        auth,
        bot_username,
    ));

    if config.bot.is_development() {
        run_polling(&client, &dispatcher, &metrics, &config).await?;
    } else {
        run_webhook(&client, dispatcher.clone(), metrics.clone(), &config).await?;
    }

    // Flush metrics so counts survive the restart
    let snapshot = metrics.read().await.snapshot();
    if let Err(e) = metrics::save_snapshot(&config.bot.metrics_path, &snapshot).await {
        warn!("Failed to save metrics snapshot: {}", e);
    }

    info!("Shutting down...");
    Ok(())
}

/// Development mode: long-poll the platform, no HTTP server.
async fn run_polling(
    client: &TelegramClient,
    dispatcher: &Dispatcher,
    metrics: &Arc<RwLock<Metrics>>,
    config: &Config,
) -> AppResult<()> {
    // Long polling and webhooks are mutually exclusive
    client.delete_webhook().await?;
    info!("Polling for updates...");

    let receiver = UpdateReceiver::new(client.clone(), config.telegram.poll_timeout);
    let mut stream = Box::pin(receiver.stream());

    loop {
        tokio::select! {
            Some(update) = stream.next() => {
                if let Some(command) = update
                    .message
                    .as_ref()
                    .and_then(|m| m.text.as_deref())
                    .and_then(metrics::raw_command)
                {
                    metrics.write().await.record(command);
                }
                dispatcher.handle_update(&update).await;
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

/// Production mode: register the webhook and serve HTTP.
async fn run_webhook(
    client: &TelegramClient,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<RwLock<Metrics>>,
    config: &Config,
) -> AppResult<()> {
    let host = config
        .webhook
        .host
        .as_deref()
        .context("WEBHOOK__HOST must be set in production mode")?;

    let webhook_url = format!("https://{}/{}", host, config.telegram.token);

    client.delete_webhook().await?;
    client.set_webhook(&webhook_url).await?;
    info!("Webhook registered");

    let state = AppState::new(
        dispatcher,
        metrics,
        config.telegram.token.clone(),
        webhook_url,
    );
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.webhook.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    // Stop webhook delivery while we are down
    if let Err(e) = client.delete_webhook().await {
        warn!("Failed to remove webhook: {}", e);
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

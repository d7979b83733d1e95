//! Bittrex Pump & Dump Notifier
//!
//! Runs the poll loop in the foreground, or manages the background service.

use bittrex_notifier::{
    chart::{ChartRenderer, PlottersChart},
    client::{BittrexClient, ExchangeApi},
    config::Config,
    logos::LogoCache,
    monitor::{cancel_on_signal, PollingLoop},
    notify::{NotificationDispatcher, TerminalNotifier},
    scanner::MarketFilter,
    service::{ServiceManager, SERVICE_DESCRIPTION, SERVICE_NAME},
};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "bittrex-notifier")]
#[command(about = "OS X Notification of pump & dumps on Bittrex")]
struct Cli {
    /// Without a command the notifier runs in the foreground
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the background service
    Install,
    /// Remove the background service
    Remove,
    /// Start the background service
    Start,
    /// Stop the background service
    Stop,
    /// Show whether the background service is running
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let status = match cli.command {
        Some(command) => manage(command).await?,
        None => run(Config::default()).await?,
    };
    println!("{}", status);
    Ok(())
}

async fn manage(command: Commands) -> anyhow::Result<String> {
    let service = ServiceManager::new(SERVICE_NAME, SERVICE_DESCRIPTION)?;
    let status = match command {
        Commands::Install => service.install().await?,
        Commands::Remove => service.remove().await?,
        Commands::Start => service.start().await?,
        Commands::Stop => service.stop().await?,
        Commands::Status => service.status().await?,
    };
    Ok(status)
}

async fn run(config: Config) -> anyhow::Result<String> {
    tracing::info!("Starting Bittrex notifier");

    let exchange: Arc<dyn ExchangeApi> = Arc::new(BittrexClient::new(&config.exchange)?);

    let logos = LogoCache::new(config.logo_dir.clone(), exchange.clone());
    let logo_status = logos.ensure().await;
    if logo_status.is_degraded() {
        tracing::warn!("Logo cache degraded: {:?}", logo_status);
    }

    let charts = Arc::new(ChartRenderer::new(
        exchange.clone(),
        Arc::new(PlottersChart::from_config(&config.chart)),
        config.chart.clone(),
    ));
    let dispatcher = NotificationDispatcher::new(
        Arc::new(TerminalNotifier::from_config(&config.notification)),
        charts,
        &config,
    );
    let poller = PollingLoop::new(
        exchange,
        MarketFilter::new(config.thresholds.clone()),
        dispatcher,
        config.poll_interval(),
    );

    let shutdown = CancellationToken::new();
    cancel_on_signal(shutdown.clone())?;

    poller.run(shutdown).await?;
    Ok("Service exited".to_string())
}

/// Daisy Player - headless client
use clap::Parser;
use daisy_cli::{commands::Commands, App, AppConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "daisy")]
#[command(about = "Daisy Player headless client", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "DAISY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daisy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    let app = App::bootstrap(config).await?;

    let result = daisy_cli::commands::dispatch(&app, cli.command).await;
    app.shutdown().await?;
    result
}

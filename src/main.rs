use std::path::PathBuf;

use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vsfetch::config::{resolve_config_path, Config};
use vsfetch::services::Engine;
use vsfetch::AppState;

#[derive(Parser)]
#[command(name = "vsfetch", version, about = "VATSIM network state fetcher")]
struct Args {
    /// Config file to use
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config_path = resolve_config_path(args.config);
    let config = Config::load(&config_path)?;

    let state = AppState::new(config)?;
    Engine::new(state).run().await;
    Ok(())
}

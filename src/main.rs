use clap::Parser;
use std::process;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use creator_agent::config::ConfigManager;
use creator_agent::{ApiServer, AppContext, CreatorResult};

mod cli;

use cli::{Args, Commands};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("creator_agent=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> CreatorResult<()> {
    match args.command {
        Commands::Serve { host, port } => {
            info!("⚡ Creator Agent v{}", creator_agent::VERSION);

            let manager = match args.config {
                Some(path) => ConfigManager::with_path(path),
                None => ConfigManager::new(),
            };
            let mut config = manager.load_config().await?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let (host, port) = (config.server.host.clone(), config.server.port);

            let app = AppContext::initialize(config).await?;
            ApiServer::new(app.gateway).start(&host, port).await
        }
        Commands::Chat { server, poll_interval, max_polls } => {
            cli::client::run_chat(&server, Duration::from_secs(poll_interval), max_polls).await
        }
        Commands::Status { server } => cli::client::run_status(&server).await,
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use palisade::classifier::{download, OnnxClassifier};
use palisade::config::Config;
use palisade::service::lifecycle::SERVICE;
use palisade::service::ModerationService;
use palisade::web;

/// Palisade: content moderation over HTTP.
///
/// Serves a local ONNX moderation model (KoalaAI/Text-Moderation) behind a
/// JSON endpoint and tracks recent request throughput.
#[derive(Parser)]
#[command(name = "palisade", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the moderation HTTP server
    Serve {
        /// Bind address (overrides PALISADE_BIND)
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (overrides PALISADE_PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Download the ONNX moderation model
    DownloadModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("palisade=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, port } => {
            let config = Config::load()?;
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            let port = port.unwrap_or(config.port);

            // Startup hook: a model-load failure here aborts startup.
            config.require_model()?;
            info!("loading moderation model from {}", config.model_dir.display());
            let service = SERVICE.initialize(|| {
                let classifier = OnnxClassifier::load(&config.model_dir)?;
                Ok(ModerationService::new(Arc::new(classifier)))
            })?;

            let result = web::run_server(service, &bind, port).await;

            // Shutdown hook: release the model whether or not serving failed.
            SERVICE.cleanup();
            result
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            println!("Downloading moderation model to: {}", config.model_dir.display());
            download::download_model(&config.model_dir).await?;
            println!("\nDone. Start the server with: palisade serve");
            Ok(())
        }
    }
}

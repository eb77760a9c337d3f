//! multirouted: the multiroute HTTP daemon.
//!
//! Serves the analysis endpoints over HTTP, routing each task to its
//! configured Ollama model.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use llm_multiroute::server::config::{Config, Secrets};
use llm_multiroute::server::{self, AppState};
use llm_multiroute::{Dispatcher, OllamaClient, TaskType};

/// multiroute daemon, a per-task LLM text analysis service.
#[derive(Parser)]
#[command(name = "multirouted")]
#[command(version = llm_multiroute::PKG_VERSION)]
#[command(about = "Text analysis API with per-task model routing")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to (overrides config and environment).
    #[arg(short, long, env = "MULTIROUTE_ADDRESS")]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: info; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    config.apply_overrides(|var| std::env::var(var).ok())?;
    if let Some(address) = args.address {
        config.server.address = address;
    }
    let secrets = Secrets::load()?;

    let backend = build_backend(&config, &secrets)?;
    for task in TaskType::ALL {
        info!(%task, model = backend.routes().model(task), "route");
    }

    let state = AppState::new(
        Dispatcher::new(Arc::new(backend)),
        config.routing.clone(),
    );

    info!(
        version = llm_multiroute::version_string(),
        address = %config.server.address,
        ollama = %config.ollama.base_url,
        "multirouted starting"
    );

    server::serve(&config, state).await?;

    Ok(())
}

/// Build the Ollama backend from configuration.
fn build_backend(config: &Config, secrets: &Secrets) -> llm_multiroute::Result<OllamaClient> {
    let mut builder = OllamaClient::builder(&config.ollama.base_url)
        .temperature(config.ollama.temperature)
        .timeout(config.ollama.timeout())
        .routes(config.routing.clone());

    if let Some(key) = secrets.api_key() {
        builder = builder.api_key(key);
    }

    builder.build()
}

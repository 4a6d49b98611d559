//! Headless pursuit client: runs AI-vs-AI training matches.
mod config;
mod trainer;

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::RunConfig;
use trainer::Trainer;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = RunConfig::from_env();
    tracing::info!(?config, "pursuit client starting");

    Trainer::new(config).run()
}

/// Logging to stderr, filterable through `RUST_LOG`.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

use anyhow::Result;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_error::ErrorLayer;
use tracing_log::LogTracer;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

/// Installs a Bunyan-JSON global subscriber, one per process. `service_name`
/// identifies the agent in the log stream (`"league_manager"`,
/// `"referee_agent"`, `"player_agent"`) -- every agent calls this exactly
/// once at start-up, before anything else.
pub fn init_tracing(service_name: &str) -> Result<()> {
    LogTracer::init()?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let formatting_layer = BunyanFormattingLayer::new(service_name.to_string(), std::io::stdout);

    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

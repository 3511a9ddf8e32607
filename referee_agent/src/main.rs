use anyhow::{Context, Result};
use net::{init_tracing, AgentConfig};
use referee_agent::{build_router, register_with_league_manager, RefereeState};
use rpc_client::RpcClient;
use std::env;
use std::sync::Arc;
use tracing::info;

fn capacity_from_env() -> Result<u32> {
    env::var("CAPACITY")
        .context("CAPACITY must be set")?
        .parse()
        .context("CAPACITY must be a positive integer")
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    init_tracing("referee_agent")?;

    let config = AgentConfig::from_env().context("loading referee config")?;
    let referee_id = env::var("REFEREE_ID").context("REFEREE_ID must be set")?;
    let capacity = capacity_from_env()?;
    let lm_endpoint = config
        .league_manager_endpoint
        .clone()
        .context("LEAGUE_MANAGER_ENDPOINT must be set for a referee")?;

    let rpc = Arc::new(RpcClient::new());
    let state = Arc::new(RefereeState::new(
        referee_id.clone(),
        capacity,
        config.public_endpoint.clone(),
        lm_endpoint,
        rpc,
    ));

    register_with_league_manager(&state)
        .await
        .context("initial registration with league manager failed")?;
    info!(referee_id = %referee_id, capacity, "registered with league manager");

    let app = build_router(state);

    info!(addr = %config.bind_addr, "referee listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

use anyhow::{Context, Result};
use net::{init_tracing, AgentConfig};
use player_agent::{build_router, register_with_league_manager, PlayerState};
use rpc_client::RpcClient;
use std::env;
use std::sync::Arc;
use tracing::info;

fn supported_games_from_env() -> Vec<String> {
    env::var("SUPPORTED_GAMES")
        .unwrap_or_else(|_| "even_odd".to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn fixed_move_from_env() -> Result<Option<u32>> {
    match env::var("FIXED_MOVE") {
        Ok(v) => Ok(Some(v.parse().context("FIXED_MOVE must be an integer")?)),
        Err(_) => Ok(None),
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    init_tracing("player_agent")?;

    let config = AgentConfig::from_env().context("loading player config")?;
    let display_name = env::var("DISPLAY_NAME").context("DISPLAY_NAME must be set")?;
    let strategy_name = env::var("STRATEGY").unwrap_or_else(|_| "always_lowest".to_string());
    let fixed_move = fixed_move_from_env()?;
    let lm_endpoint = config
        .league_manager_endpoint
        .clone()
        .context("LEAGUE_MANAGER_ENDPOINT must be set for a player")?;

    let rpc = Arc::new(RpcClient::new());
    let state = Arc::new(PlayerState::new(
        display_name.clone(),
        config.public_endpoint.clone(),
        lm_endpoint,
        supported_games_from_env(),
        strategy_name.clone(),
        fixed_move,
        rpc,
    ));

    register_with_league_manager(&state)
        .await
        .context("initial registration with league manager failed")?;
    info!(player_id = ?state.player_id(), display_name = %display_name, strategy = %strategy_name, "registered with league manager");

    let app = build_router(state);

    info!(addr = %config.bind_addr, "player listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

use anyhow::{Context, Result};
use event_bus::InMemoryEventBus;
use league_manager::{build_router, LeagueManager, MatchRules};
use net::{init_tracing, AgentConfig};
use rpc_client::RpcClient;
use std::env;
use std::sync::Arc;
use tracing::info;

fn max_players_from_env() -> Result<usize> {
    match env::var("MAX_PLAYERS") {
        Ok(v) => v.parse().context("MAX_PLAYERS must be a positive integer"),
        Err(_) => Ok(64),
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    init_tracing("league_manager")?;

    let config = AgentConfig::from_env().context("loading league manager config")?;
    let tournament_id = env::var("TOURNAMENT_ID").unwrap_or_else(|_| "T1".to_string());
    let max_players = max_players_from_env()?;

    let rpc = Arc::new(RpcClient::new());
    let events = Arc::new(InMemoryEventBus::new());
    let lm = Arc::new(LeagueManager::new(
        tournament_id,
        MatchRules::default(),
        max_players,
        rpc,
        events,
    ));

    let app = build_router(lm);

    info!(addr = %config.bind_addr, "league manager listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

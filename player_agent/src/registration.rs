//! One-time start-up handshake: the player announces itself to the league
//! manager before it can receive `game_invite` calls.

use anyhow::{Context, Result};
use transport::{method, Envelope, RegisterPlayerParams, RegisterPlayerResult};

use crate::state::PlayerState;

const PROTOCOL_CLIENT_VERSION: &str = "1.0";

pub async fn register_with_league_manager(state: &PlayerState) -> Result<()> {
    let params = RegisterPlayerParams {
        display_name: state.display_name.clone(),
        endpoint: state.public_endpoint.clone(),
        supported_games: state.supported_games.clone(),
        version: PROTOCOL_CLIENT_VERSION.to_string(),
    };
    let envelope = Envelope::new(format!("player:{}", state.display_name), None, params);

    let result: RegisterPlayerResult = state
        .rpc
        .call(
            &state.lm_endpoint,
            method::REGISTER_PLAYER,
            serde_json::json!(uuid::Uuid::new_v4().to_string()),
            envelope,
        )
        .await
        .map_err(|e| anyhow::anyhow!("register_player failed: {e}"))
        .context("registering with league manager")?;

    state.set_identity(result.player_id, result.auth_token);
    Ok(())
}

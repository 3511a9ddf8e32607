//! One-time start-up handshake: the referee announces itself to the
//! league manager before it can accept `assign_match` calls.

use anyhow::{Context, Result};
use transport::{method, Envelope, RegisterRefereeParams, RegisterRefereeResult};

use crate::state::RefereeState;

pub async fn register_with_league_manager(state: &RefereeState) -> Result<()> {
    let params = RegisterRefereeParams {
        referee_id: state.referee_id.clone(),
        endpoint: state.public_endpoint.clone(),
        capacity: state.capacity,
    };
    let envelope = Envelope::new(format!("referee:{}", state.referee_id), None, params);

    let result: RegisterRefereeResult = state
        .rpc
        .call(
            &state.lm_endpoint,
            method::REGISTER_REFEREE,
            serde_json::json!(uuid::Uuid::new_v4().to_string()),
            envelope,
        )
        .await
        .map_err(|e| anyhow::anyhow!("register_referee failed: {e}"))
        .context("registering with league manager")?;

    state.set_token(result.auth_token);
    Ok(())
}

//! The referee's HTTP surface: one `/mcp` endpoint decoding `assign_match`
//! and `cancel_match`, plus `/health`.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use net::{health, respond, DecodedCall, TokenVerifier};
use tracing::{info, warn};
use transport::{AssignMatchResult, CancelMatchResult, ErrorKind, RpcError, ToolCall};

use crate::match_runner::{MatchRunner, MatchRunnerConfig, PeerHandle};
use crate::state::RefereeState;

impl TokenVerifier for RefereeState {
    fn verify(&self, _method: &str, token: Option<&str>) -> bool {
        match token {
            Some(t) => self.has_token(t),
            None => false,
        }
    }
}

impl TokenVerifier for Arc<RefereeState> {
    fn verify(&self, method: &str, token: Option<&str>) -> bool {
        self.as_ref().verify(method, token)
    }
}

pub fn build_router(state: Arc<RefereeState>) -> Router {
    Router::new()
        .route("/mcp", post(mcp))
        .route("/health", get(health))
        .with_state(state)
}

async fn mcp(State(state): State<Arc<RefereeState>>, call: DecodedCall) -> Response {
    let DecodedCall { id, call } = call;
    match call {
        ToolCall::AssignMatch(env) => {
            let params = env.payload;
            let permit = match Arc::clone(&state.capacity_slots).try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => {
                    return respond::<AssignMatchResult>(
                        id,
                        Err(RpcError::new(ErrorKind::CapacityExceeded, "referee is at capacity")),
                    )
                }
            };

            let runner_config = MatchRunnerConfig {
                match_id: params.match_id.clone(),
                round_index: params.round_index,
                referee_id: state.referee_id.clone(),
                referee_token: state.token().unwrap_or_default(),
                player_a: PeerHandle { player_id: params.player_a, endpoint: params.player_a_endpoint },
                player_b: PeerHandle { player_id: params.player_b, endpoint: params.player_b_endpoint },
                game_config: params.game_config,
                lm_endpoint: state.lm_endpoint.clone(),
            };

            let cancel = state.register_match(params.match_id.clone());
            let runner = match MatchRunner::new(runner_config, Arc::clone(&state.rpc), cancel) {
                Some(runner) => runner,
                None => {
                    state.forget_match(&params.match_id);
                    return respond::<AssignMatchResult>(
                        id,
                        Err(RpcError::new(ErrorKind::UnknownGame, "unsupported game type")),
                    );
                }
            };

            let match_id = params.match_id.clone();
            let state_for_task = Arc::clone(&state);
            tokio::spawn(async move {
                let _permit = permit;
                let outcome = runner.run().await;
                info!(match_id = %match_id, outcome = ?outcome, "match finished");
                state_for_task.forget_match(&match_id);
            });

            respond(id, Ok::<_, RpcError>(AssignMatchResult { accepted: true, reason: None }))
        }
        ToolCall::CancelMatch(env) => {
            let params = env.payload;
            let cancelled = state.cancel_match(&params.match_id);
            if !cancelled {
                warn!(match_id = %params.match_id, "cancel_match for unknown or already-finished match");
            }
            respond(id, Ok::<_, RpcError>(CancelMatchResult { cancelled }))
        }
        other => respond::<()>(
            id,
            Err(RpcError::new(
                ErrorKind::MalformedMessage,
                format!("{} is not part of the referee's tool surface", other.method_name()),
            )),
        ),
    }
}

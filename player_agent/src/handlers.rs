//! The player's HTTP surface: one `/mcp` endpoint decoding `game_invite`,
//! `request_move`, `round_result`, and `game_over`, plus `/health`.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use domain::{resolve_strategy, GameSession, ObservedOutcome, RoleAssignment, RoundRecord, SessionState};
use net::{health, respond, DecodedCall, TokenVerifier};
use tracing::warn;
use transport::{
    ErrorKind, GameOverResult, GameInviteResult, RequestMoveResult, Role, RoundResultResult, RpcError, ToolCall,
};

use crate::session::PlayerSession;
use crate::state::PlayerState;

impl TokenVerifier for PlayerState {
    fn verify(&self, _method: &str, token: Option<&str>) -> bool {
        match token {
            Some(t) => self.has_token(t),
            None => false,
        }
    }
}

impl TokenVerifier for Arc<PlayerState> {
    fn verify(&self, method: &str, token: Option<&str>) -> bool {
        self.as_ref().verify(method, token)
    }
}

pub fn build_router(state: Arc<PlayerState>) -> Router {
    Router::new()
        .route("/mcp", post(mcp))
        .route("/health", get(health))
        .with_state(state)
}

async fn mcp(State(state): State<Arc<PlayerState>>, call: DecodedCall) -> Response {
    let DecodedCall { id, call } = call;
    match call {
        ToolCall::GameInvite(env) => {
            let params = env.payload;
            if state.sessions.has_active(params.game_id) {
                return respond(
                    id,
                    Ok::<_, RpcError>(GameInviteResult {
                        accepted: false,
                        reason: Some("duplicate invite for an active game".to_string()),
                    }),
                );
            }

            let own_id = match state.player_id() {
                Some(id) => id,
                None => {
                    return respond::<GameInviteResult>(
                        id,
                        Err(RpcError::new(ErrorKind::InvalidPhase, "not yet registered with the league manager")),
                    )
                }
            };

            let (odd_id, even_id) = match params.role {
                Role::Odd => (own_id.clone(), params.opponent_id.clone()),
                Role::Even => (params.opponent_id.clone(), own_id.clone()),
            };
            let mut session = GameSession::new(params.game_id, params.match_id, odd_id, even_id, params.max_rounds);
            session.state = SessionState::CollectingMoves;

            state.sessions.insert(
                params.game_id,
                PlayerSession {
                    own_id,
                    session,
                    strategy: resolve_strategy(&state.strategy_name, state.fixed_move),
                    valid_min: params.valid_move_range.min,
                    valid_max: params.valid_move_range.max,
                    last_answered_round: None,
                },
            );

            respond(id, Ok::<_, RpcError>(GameInviteResult { accepted: true, reason: None }))
        }
        ToolCall::RequestMove(env) => {
            let params = env.payload;
            if !state.sessions.contains(params.game_id) {
                return respond::<RequestMoveResult>(
                    id,
                    Err(RpcError::new(ErrorKind::MatchNotFound, "request_move for unknown game id")),
                );
            }

            // A `silent` strategy never answers: this handler hangs forever,
            // so the referee's own `request_move` deadline is what ends the
            // wait and drives the default-move substitution path.
            let is_silent = state
                .sessions
                .with_session(params.game_id, |ps| ps.strategy.name() == "silent")
                .await
                .unwrap_or(false);
            if is_silent {
                std::future::pending::<()>().await;
            }

            let view_history = &params.game_state_view;
            let outcome = state
                .sessions
                .with_session(params.game_id, |ps| {
                    if ps.last_answered_round == Some(params.round_number) {
                        return Err(RpcError::new(
                            ErrorKind::DuplicateMove,
                            "already submitted a move for this round",
                        ));
                    }
                    let role = ps.role().unwrap_or(RoleAssignment::Odd);
                    let own_moves_so_far = view_history
                        .history
                        .iter()
                        .filter_map(|r| r.moves.get(&ps.own_id).copied())
                        .collect();
                    let view = domain::SessionView {
                        role,
                        round_number: params.round_number,
                        min_move: ps.valid_min,
                        max_move: ps.valid_max,
                        own_moves_so_far,
                        own_score: view_history.your_score,
                        opponent_score: view_history.opponent_score,
                    };
                    let mv = ps.strategy.choose_move(&view);
                    ps.last_answered_round = Some(params.round_number);
                    Ok(RequestMoveResult { move_value: mv, confidence: None })
                })
                .await
                .unwrap_or_else(|| Err(RpcError::new(ErrorKind::MatchNotFound, "request_move for unknown game id")));

            respond(id, outcome)
        }
        ToolCall::RoundResult(env) => {
            let params = env.payload;
            if !state.sessions.contains(params.game_id) {
                warn!(game_id = %params.game_id, "round_result for unknown game id, ignoring");
                return respond(id, Ok::<_, RpcError>(RoundResultResult {}));
            }

            state
                .sessions
                .with_session(params.game_id, |ps| {
                    if params.round_number <= ps.session.current_round {
                        return;
                    }
                    let own_move = params.moves.get(&ps.own_id).copied();
                    let opponent_id = if ps.own_id == ps.session.odd_player_id {
                        ps.session.even_player_id.clone()
                    } else {
                        ps.session.odd_player_id.clone()
                    };
                    let opponent_move = params.moves.get(&opponent_id).copied();
                    let won_round = params.winner_id.as_deref() == Some(ps.own_id.as_str());

                    ps.session.record_round(RoundRecord {
                        round_number: params.round_number,
                        moves: params.moves.clone(),
                        sum: params.sum,
                        winner_id: params.winner_id.clone(),
                    });

                    if let Some(own_move) = own_move {
                        ps.strategy.observe(&ObservedOutcome {
                            round_number: params.round_number,
                            own_move,
                            opponent_move,
                            sum: params.sum,
                            won_round,
                        });
                    }
                })
                .await;

            respond(id, Ok::<_, RpcError>(RoundResultResult {}))
        }
        ToolCall::GameOver(env) => {
            let params = env.payload;
            if !state.sessions.contains(params.game_id) {
                warn!(game_id = %params.game_id, "game_over for unknown game id, ignoring");
                return respond(id, Ok::<_, RpcError>(GameOverResult {}));
            }

            state
                .sessions
                .with_session(params.game_id, |ps| {
                    if !ps.is_terminal() {
                        ps.session.state = SessionState::Finished;
                    }
                })
                .await;

            respond(id, Ok::<_, RpcError>(GameOverResult {}))
        }
        other => respond::<()>(
            id,
            Err(RpcError::new(
                ErrorKind::MalformedMessage,
                format!("{} is not part of the player's tool surface", other.method_name()),
            )),
        ),
    }
}

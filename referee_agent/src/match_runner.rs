//! The match execution state machine: one `MatchRunner` per assigned
//! pairing, owning its `GameSession` for the match's lifetime.
//! `ASSIGNED -> INVITING -> RUNNING(1..max) -> FINISHED`, with `FORFEIT`/
//! `CANCELLED` side-exits. No shared mutable state beyond the capacity
//! semaphore held by the caller for the runner's lifetime.

use chrono::Utc;
use domain::{resolve_game, GamePort, GameSession, RoleWinner, RoundRecord, SessionState};
use rpc_client::RpcClient;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use transport::{
    method, Envelope, GameConfig, GameInviteParams, GameInviteResult, GameOverParams, GameOverResult,
    GameStateView, ReportMatchResultParams, ReportMatchResultResult, RequestMoveParams,
    RequestMoveResult, Role, RoundResultParams, RoundResultResult, RoundSummary, Scores,
};
use uuid::Uuid;

/// Everything the runner needs about one peer to call it: its endpoint and
/// the bearer token the referee presents as its own credential.
#[derive(Debug, Clone)]
pub struct PeerHandle {
    pub player_id: String,
    pub endpoint: String,
}

pub struct MatchRunnerConfig {
    pub match_id: String,
    pub round_index: u32,
    pub referee_id: String,
    pub referee_token: String,
    pub player_a: PeerHandle,
    pub player_b: PeerHandle,
    pub game_config: GameConfig,
    pub lm_endpoint: String,
}

/// Outcome handed back to the caller once the runner has finished (or
/// given up trying to finish) so `report_match_result` can be built and
/// delivered with the retry-until-acknowledged policy.
#[derive(Debug, Clone)]
pub enum RunnerOutcome {
    Finished { winner_id: Option<String>, scores: Scores, rounds: Vec<RoundSummary> },
    Forfeit { winner_id: Option<String> },
    DoubleForfeit,
    Cancelled,
}

pub struct MatchRunner {
    config: MatchRunnerConfig,
    game: Box<dyn GamePort>,
    session: GameSession,
    rpc: Arc<RpcClient>,
    cancel: CancellationToken,
}

fn sender_tag(referee_id: &str) -> String {
    format!("referee:{referee_id}")
}

impl MatchRunner {
    pub fn new(config: MatchRunnerConfig, rpc: Arc<RpcClient>, cancel: CancellationToken) -> Option<Self> {
        let game = resolve_game(&config.game_config.game_type)?;
        let (odd, even) = deterministic_roles(&config.player_a.player_id, &config.player_b.player_id);
        let session = GameSession::new(Uuid::new_v4(), config.match_id.clone(), odd, even, config.game_config.max_rounds);
        Some(MatchRunner { config, game, session, rpc, cancel })
    }

    fn peer(&self, player_id: &str) -> &PeerHandle {
        if self.config.player_a.player_id == player_id {
            &self.config.player_a
        } else {
            &self.config.player_b
        }
    }

    fn envelope<P>(&self, payload: P) -> Envelope<P> {
        Envelope::new(sender_tag(&self.config.referee_id), Some(self.config.referee_token.clone()), payload)
    }

    /// Runs the whole match to completion: inviting, the round loop,
    /// finishing, reporting to the league manager. Returns the outcome
    /// that was (eventually) acknowledged by the LM.
    pub async fn run(mut self) -> RunnerOutcome {
        self.session.state = SessionState::WaitingForAccept;
        match self.invite_both().await {
            InviteOutcome::BothAccepted => {}
            InviteOutcome::Cancelled => return RunnerOutcome::Cancelled,
            InviteOutcome::Forfeit { winner_id } => {
                self.report_until_acknowledged(&winner_id, &Scores::new(), &[]).await;
                return RunnerOutcome::Forfeit { winner_id };
            }
        }

        self.session.state = SessionState::CollectingMoves;
        let mut rounds_summary = Vec::new();
        for round_number in 1..=self.config.game_config.max_rounds {
            if self.cancel.is_cancelled() {
                self.session.state = SessionState::Aborted;
                return RunnerOutcome::Cancelled;
            }

            match self.run_one_round(round_number).await {
                RoundOutcome::Continue(summary) => rounds_summary.push(summary),
                RoundOutcome::Forfeit { winner_id } => {
                    let scores = self.session.scores.clone();
                    self.game_over_both(&winner_id, "opponent exceeded the default-move forfeit threshold").await;
                    self.report_until_acknowledged(&winner_id, &scores, &rounds_summary).await;
                    return RunnerOutcome::Forfeit { winner_id };
                }
            }
        }

        self.session.state = SessionState::Finished;
        let odd_score = *self.session.scores.get(&self.session.odd_player_id).unwrap_or(&0);
        let even_score = *self.session.scores.get(&self.session.even_player_id).unwrap_or(&0);
        let winner_id = match self.game.decide_match(odd_score, even_score) {
            domain::MatchOutcome::Winner(RoleWinner::Odd) => Some(self.session.odd_player_id.clone()),
            domain::MatchOutcome::Winner(RoleWinner::Even) => Some(self.session.even_player_id.clone()),
            domain::MatchOutcome::Draw => None,
        };
        let scores = self.session.scores.clone();
        self.game_over_both(&winner_id, "max_rounds reached").await;
        self.report_until_acknowledged(&winner_id, &scores, &rounds_summary).await;
        RunnerOutcome::Finished { winner_id, scores, rounds: rounds_summary }
    }

    async fn invite_both(&mut self) -> InviteOutcome {
        let odd_id = self.session.odd_player_id.clone();
        let even_id = self.session.even_player_id.clone();

        let odd_call = self.call_invite(&odd_id, Role::Odd, &even_id);
        let even_call = self.call_invite(&even_id, Role::Even, &odd_id);

        let (odd_result, even_result) = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return InviteOutcome::Cancelled,
            pair = futures_join(odd_call, even_call) => pair,
        };

        let odd_ok = matches!(odd_result, Ok(GameInviteResult { accepted: true, .. }));
        let even_ok = matches!(even_result, Ok(GameInviteResult { accepted: true, .. }));

        match (odd_ok, even_ok) {
            (true, true) => InviteOutcome::BothAccepted,
            (true, false) => InviteOutcome::Forfeit { winner_id: Some(odd_id) },
            (false, true) => InviteOutcome::Forfeit { winner_id: Some(even_id) },
            (false, false) => InviteOutcome::Forfeit { winner_id: None },
        }
    }

    async fn call_invite(&self, invitee: &str, role: Role, opponent: &str) -> Result<GameInviteResult, transport::RpcError> {
        let peer = self.peer(invitee);
        let params = GameInviteParams {
            match_id: self.config.match_id.clone(),
            game_id: self.session.game_id,
            role,
            opponent_id: opponent.to_string(),
            max_rounds: self.config.game_config.max_rounds,
            valid_move_range: self.config.game_config.valid_move_range,
        };
        self.rpc
            .call(&peer.endpoint, method::GAME_INVITE, json!(Uuid::new_v4().to_string()), self.envelope(params))
            .await
    }

    async fn run_one_round(&mut self, round_number: u32) -> RoundOutcome {
        let odd_id = self.session.odd_player_id.clone();
        let even_id = self.session.even_player_id.clone();

        let view = self.state_view_for(round_number);
        let odd_call = self.call_request_move(&odd_id, round_number, view.clone());
        let even_call = self.call_request_move(&even_id, round_number, view);

        let (odd_res, even_res) = futures_join(odd_call, even_call).await;

        let odd_move = self.resolve_move(&odd_id, odd_res);
        let even_move = self.resolve_move(&even_id, even_res);

        // A player's default-move count is tolerated up to the configured
        // threshold; exceeding it removes the player and the opponent wins
        // by forfeit.
        let forfeit_threshold = self.config.game_config.default_move_forfeit_threshold;
        if self.session.default_move_counts.get(&odd_id).copied().unwrap_or(0) > forfeit_threshold {
            return RoundOutcome::Forfeit { winner_id: Some(even_id) };
        }
        if self.session.default_move_counts.get(&even_id).copied().unwrap_or(0) > forfeit_threshold {
            return RoundOutcome::Forfeit { winner_id: Some(odd_id) };
        }

        let outcome = self.game.adjudicate_round(odd_move, even_move);
        let winner_id = match outcome.winner {
            RoleWinner::Odd => odd_id.clone(),
            RoleWinner::Even => even_id.clone(),
        };

        let mut moves = BTreeMap::new();
        moves.insert(odd_id.clone(), odd_move);
        moves.insert(even_id.clone(), even_move);

        self.session.record_round(RoundRecord {
            round_number,
            moves: moves.clone(),
            sum: outcome.sum,
            winner_id: Some(winner_id.clone()),
        });

        self.deliver_round_result(round_number, &moves, outcome.sum, &winner_id).await;

        RoundOutcome::Continue(RoundSummary {
            round_number,
            moves,
            sum: outcome.sum,
            winner_id: Some(winner_id),
        })
    }

    fn state_view_for(&self, round_number: u32) -> GameStateView {
        GameStateView {
            round_number,
            your_score: 0, // populated per-recipient just below in `call_request_move`
            opponent_score: 0,
            history: self
                .session
                .history
                .iter()
                .map(|r| RoundSummary {
                    round_number: r.round_number,
                    moves: r.moves.clone(),
                    sum: r.sum,
                    winner_id: r.winner_id.clone(),
                })
                .collect(),
        }
    }

    async fn call_request_move(&self, player_id: &str, round_number: u32, mut view: GameStateView) -> Result<RequestMoveResult, transport::RpcError> {
        let opponent_id = if player_id == self.session.odd_player_id {
            &self.session.even_player_id
        } else {
            &self.session.odd_player_id
        };
        view.your_score = *self.session.scores.get(player_id).unwrap_or(&0);
        view.opponent_score = *self.session.scores.get(opponent_id).unwrap_or(&0);

        let peer = self.peer(player_id);
        let params = RequestMoveParams { game_id: self.session.game_id, round_number, game_state_view: view };
        self.rpc
            .call(&peer.endpoint, method::REQUEST_MOVE, json!(Uuid::new_v4().to_string()), self.envelope(params))
            .await
    }

    /// A timed-out or invalid move is replaced with the configured default
    /// and charged against the player's per-match forfeit count.
    fn resolve_move(&mut self, player_id: &str, result: Result<RequestMoveResult, transport::RpcError>) -> u32 {
        let range = self.config.game_config.valid_move_range;
        match result {
            Ok(RequestMoveResult { move_value, .. }) if range.contains(move_value) => move_value,
            Ok(_) => {
                warn!(player_id, "move outside valid range, substituting default");
                self.session.charge_default_move(player_id);
                self.config.game_config.default_move
            }
            Err(err) => {
                warn!(player_id, error = %err, "move request failed, substituting default");
                self.session.charge_default_move(player_id);
                self.config.game_config.default_move
            }
        }
    }

    async fn deliver_round_result(&self, round_number: u32, moves: &BTreeMap<String, u32>, sum: u32, winner_id: &str) {
        for player_id in [&self.session.odd_player_id, &self.session.even_player_id] {
            let peer = self.peer(player_id);
            let params = RoundResultParams {
                game_id: self.session.game_id,
                round_number,
                moves: moves.clone(),
                sum,
                winner_id: Some(winner_id.to_string()),
                scores: self.session.scores.clone(),
            };
            let result: Result<RoundResultResult, _> = self
                .rpc
                .call(&peer.endpoint, method::ROUND_RESULT, json!(Uuid::new_v4().to_string()), self.envelope(params))
                .await;
            if let Err(err) = result {
                // Fire-and-forget at the application level: logged, never
                // retried, never blocks the match.
                warn!(player_id = %player_id, error = %err, "round_result delivery failed");
            }
        }
    }

    async fn game_over_both(&self, winner_id: &Option<String>, reason: &str) {
        for player_id in [&self.session.odd_player_id, &self.session.even_player_id] {
            let peer = self.peer(player_id);
            let params = GameOverParams {
                game_id: self.session.game_id,
                winner_id: winner_id.clone(),
                scores: self.session.scores.clone(),
                reason: reason.to_string(),
            };
            let result: Result<GameOverResult, _> = self
                .rpc
                .call(&peer.endpoint, method::GAME_OVER, json!(Uuid::new_v4().to_string()), self.envelope(params))
                .await;
            if let Err(err) = result {
                warn!(player_id = %player_id, error = %err, "game_over delivery failed");
            }
        }
    }

    /// `report_match_result` must be retried until acknowledged: standings
    /// correctness depends on delivery, so this loop outlives `rpc_client`'s
    /// bounded per-call retry budget.
    async fn report_until_acknowledged(&self, winner_id: &Option<String>, scores: &Scores, rounds: &[RoundSummary]) {
        let params = ReportMatchResultParams {
            match_id: self.config.match_id.clone(),
            referee_id: self.config.referee_id.clone(),
            winner_id: winner_id.clone(),
            scores: scores.clone(),
            rounds_summary: rounds.to_vec(),
        };

        let mut backoff = Duration::from_secs(1);
        loop {
            let result: Result<ReportMatchResultResult, _> = self
                .rpc
                .call(
                    &self.config.lm_endpoint,
                    method::REPORT_MATCH_RESULT,
                    json!(Uuid::new_v4().to_string()),
                    self.envelope(params.clone()),
                )
                .await;
            match result {
                Ok(ReportMatchResultResult { acknowledged: true }) => {
                    info!(match_id = %self.config.match_id, "match result acknowledged");
                    return;
                }
                Ok(_) | Err(_) => {
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(Duration::from_secs(30));
                }
            }
        }
    }
}

enum InviteOutcome {
    BothAccepted,
    Forfeit { winner_id: Option<String> },
    Cancelled,
}

enum RoundOutcome {
    Continue(RoundSummary),
    Forfeit { winner_id: Option<String> },
}

async fn futures_join<A, B, T, U>(a: A, b: B) -> (T, U)
where
    A: std::future::Future<Output = T>,
    B: std::future::Future<Output = U>,
{
    tokio::join!(a, b)
}

/// Deterministic role assignment: the lexicographically-smaller player id
/// is `ODD`.
fn deterministic_roles(player_a: &str, player_b: &str) -> (String, String) {
    if player_a < player_b {
        (player_a.to_string(), player_b.to_string())
    } else {
        (player_b.to_string(), player_a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_role_is_the_lexicographically_smaller_id() {
        assert_eq!(deterministic_roles("P02", "P01"), ("P01".to_string(), "P02".to_string()));
        assert_eq!(deterministic_roles("P01", "P02"), ("P01".to_string(), "P02".to_string()));
    }
}

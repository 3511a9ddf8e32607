//! The league manager's HTTP surface: one `/mcp` endpoint decoding the
//! closed `ToolCall` set, dispatched to `LeagueManager`, plus `/health`
//! and the `/events` SSE mirror.

use crate::controller::LeagueManager;
use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use futures_util::StreamExt;
use net::{health, respond, DecodedCall, TokenVerifier};
use std::convert::Infallible;
use std::sync::Arc;
use transport::{ErrorKind, RpcError, ToolCall};

/// Control-plane tools (`start_league`, `run_next_round`, `run_all_rounds`,
/// `get_standings`) are operator calls, not agent-to-agent ones -- the wire
/// protocol has no operator identity to issue a token to, so these are the
/// one exception to "every non-registration call is token-gated".
const OPERATOR_METHODS: &[&str] = &[
    transport::method::START_LEAGUE,
    transport::method::RUN_NEXT_ROUND,
    transport::method::RUN_ALL_ROUNDS,
    transport::method::GET_STANDINGS,
];

impl TokenVerifier for LeagueManager {
    fn verify(&self, method: &str, token: Option<&str>) -> bool {
        if OPERATOR_METHODS.contains(&method) {
            return true;
        }
        match token {
            Some(t) => self.has_token(t),
            None => false,
        }
    }
}

impl TokenVerifier for Arc<LeagueManager> {
    fn verify(&self, method: &str, token: Option<&str>) -> bool {
        self.as_ref().verify(method, token)
    }
}

pub fn build_router(lm: Arc<LeagueManager>) -> Router {
    Router::new()
        .route("/mcp", post(mcp))
        .route("/health", get(health))
        .route("/events", get(events))
        .with_state(lm)
}

async fn mcp(State(lm): State<Arc<LeagueManager>>, call: DecodedCall) -> Response {
    let DecodedCall { id, call } = call;
    match call {
        ToolCall::RegisterPlayer(env) => {
            let p = env.payload;
            let result = lm.register_player(p.display_name, p.endpoint, p.supported_games).await;
            respond(id, result)
        }
        ToolCall::RegisterReferee(env) => {
            let p = env.payload;
            let result = lm.register_referee(p.referee_id, p.endpoint, p.capacity).await;
            respond(id, result)
        }
        ToolCall::ReportMatchResult(env) => {
            let result = lm.report_match_result(env.payload).await;
            respond(id, result)
        }
        ToolCall::GetStandings(_) => respond(id, lm.get_standings().await),
        ToolCall::StartLeague(_) => respond(id, lm.start_league().await),
        ToolCall::RunNextRound(_) => respond(id, lm.run_next_round().await),
        ToolCall::RunAllRounds(_) => respond(id, lm.run_all_rounds().await),
        other => respond::<()>(
            id,
            Err(RpcError::new(
                ErrorKind::MalformedMessage,
                format!("{} is not part of the league manager's tool surface", other.method_name()),
            )),
        ),
    }
}

/// `GET /events`: a read-only SSE mirror of the lifecycle event bus, for
/// the out-of-scope dashboard to subscribe to. Never authoritative.
async fn events(State(lm): State<Arc<LeagueManager>>) -> impl IntoResponse {
    let stream = lm.subscribe_events().await.map(|event| {
        let json = serde_json::to_string(&SerializableEvent::from(&event)).unwrap_or_default();
        Ok::<_, Infallible>(Event::default().data(json))
    });
    Sse::new(stream)
}

/// `event_bus::LeagueEvent` carries `domain::StandingsEntry` which has no
/// wire representation of its own (standings views are serialized via
/// `transport::StandingsEntryView` at the LM tool boundary); this adapter
/// gives the SSE feed a JSON shape without adding `serde` to `domain`.
#[derive(serde::Serialize)]
#[serde(tag = "kind")]
enum SerializableEvent {
    TournamentStarted { tournament_id: String, total_rounds: u32 },
    MatchDispatched { match_id: String, referee_id: String },
    MatchCompleted { match_id: String, winner_id: Option<String> },
    StandingsUpdated { round_index: u32, standings: Vec<StandingsRow> },
    TournamentCompleted { final_standings: Vec<StandingsRow>, winner_id: Option<String> },
    TournamentDegraded { forfeits: Vec<DegradedMatchRow> },
    BreakerStateChanged { target: String, state: String },
}

#[derive(serde::Serialize)]
struct DegradedMatchRow {
    match_id: String,
    reason: String,
}

impl From<&event_bus::DegradedMatch> for DegradedMatchRow {
    fn from(d: &event_bus::DegradedMatch) -> Self {
        DegradedMatchRow { match_id: d.match_id.clone(), reason: d.reason.clone() }
    }
}

#[derive(serde::Serialize)]
struct StandingsRow {
    player_id: String,
    wins: u32,
    losses: u32,
    draws: u32,
    points: u32,
    games_played: u32,
    rank: u32,
}

impl From<&domain::StandingsEntry> for StandingsRow {
    fn from(e: &domain::StandingsEntry) -> Self {
        StandingsRow {
            player_id: e.player_id.clone(),
            wins: e.wins,
            losses: e.losses,
            draws: e.draws,
            points: e.points(),
            games_played: e.games_played,
            rank: e.rank,
        }
    }
}

impl From<&event_bus::LeagueEvent> for SerializableEvent {
    fn from(event: &event_bus::LeagueEvent) -> Self {
        use event_bus::LeagueEvent::*;
        match event {
            TournamentStarted { tournament_id, total_rounds } => SerializableEvent::TournamentStarted {
                tournament_id: tournament_id.clone(),
                total_rounds: *total_rounds,
            },
            MatchDispatched { match_id, referee_id } => SerializableEvent::MatchDispatched {
                match_id: match_id.clone(),
                referee_id: referee_id.clone(),
            },
            MatchCompleted { match_id, winner_id } => SerializableEvent::MatchCompleted {
                match_id: match_id.clone(),
                winner_id: winner_id.clone(),
            },
            StandingsUpdated { round_index, standings } => SerializableEvent::StandingsUpdated {
                round_index: *round_index,
                standings: standings.iter().map(StandingsRow::from).collect(),
            },
            TournamentCompleted { final_standings, winner_id } => SerializableEvent::TournamentCompleted {
                final_standings: final_standings.iter().map(StandingsRow::from).collect(),
                winner_id: winner_id.clone(),
            },
            TournamentDegraded { forfeits } => SerializableEvent::TournamentDegraded {
                forfeits: forfeits.iter().map(DegradedMatchRow::from).collect(),
            },
            BreakerStateChanged { target, state } => SerializableEvent::BreakerStateChanged {
                target: target.clone(),
                state: format!("{state:?}"),
            },
        }
    }
}

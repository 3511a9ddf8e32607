//! Shared harness: spins up a league manager, referees, and players as real
//! HTTP servers on loopback ephemeral ports, wired together exactly the way
//! independent processes would be -- registration and every subsequent call
//! goes over the wire, nothing is short-circuited in-process.

use std::sync::Arc;

use event_bus::InMemoryEventBus;
use league_manager::{build_router as lm_router, LeagueManager, MatchRules};
use player_agent::{build_router as player_router, register_with_league_manager as register_player, PlayerState};
use referee_agent::{build_router as referee_router, register_with_league_manager as register_referee, RefereeState};
use rpc_client::{BreakerConfig, RetryPolicy, RpcClient};
use tokio::net::TcpListener;
use transport::{
    method, ControlStatusResult, Envelope, GetStandingsParams, GetStandingsResult, RunAllRoundsParams,
    RunNextRoundParams, StartLeagueParams,
};

pub struct LeagueHandle {
    pub lm: Arc<LeagueManager>,
    pub endpoint: String,
    rpc: Arc<RpcClient>,
}

async fn bind_ephemeral() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback ephemeral port");
    let addr = listener.local_addr().expect("bound listener has a local address");
    (listener, format!("http://{addr}/mcp"))
}

/// An `RpcClient` whose deadlines are scaled down 100x (30s `request_move`
/// becomes 300ms) and that never retries a timeout. Lets a test exercise a
/// silent player's default-move/forfeit path without actually waiting 30s
/// per round.
fn fast_rpc_client() -> Arc<RpcClient> {
    let retry = RetryPolicy { max_attempts: 1, ..RetryPolicy::default() };
    Arc::new(RpcClient::with_policies(retry, BreakerConfig::default()).with_deadline_scale(0.01))
}

pub async fn spawn_league_manager(rules: MatchRules, max_players: usize) -> LeagueHandle {
    let (listener, endpoint) = bind_ephemeral().await;
    // Separate from the league manager's own outbound client -- this one
    // plays the role of an external operator console calling in over HTTP.
    let operator_rpc = Arc::new(RpcClient::new());
    let events = Arc::new(InMemoryEventBus::new());
    let lm = Arc::new(LeagueManager::new(
        "T1".to_string(),
        rules,
        max_players,
        Arc::new(RpcClient::new()),
        events,
    ));

    let router = lm_router(Arc::clone(&lm));
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service()).await.expect("league manager server crashed");
    });

    LeagueHandle { lm, endpoint, rpc: operator_rpc }
}

impl LeagueHandle {
    pub async fn start_league(&self) -> ControlStatusResult {
        let envelope = Envelope::new("test-operator", None, StartLeagueParams::default());
        self.rpc
            .call(&self.endpoint, method::START_LEAGUE, serde_json::json!(uuid::Uuid::new_v4().to_string()), envelope)
            .await
            .expect("start_league succeeds")
    }

    pub async fn run_next_round(&self) -> ControlStatusResult {
        let envelope = Envelope::new("test-operator", None, RunNextRoundParams::default());
        self.rpc
            .call(&self.endpoint, method::RUN_NEXT_ROUND, serde_json::json!(uuid::Uuid::new_v4().to_string()), envelope)
            .await
            .expect("run_next_round succeeds")
    }

    pub async fn run_all_rounds(&self) -> ControlStatusResult {
        let envelope = Envelope::new("test-operator", None, RunAllRoundsParams::default());
        self.rpc
            .call(&self.endpoint, method::RUN_ALL_ROUNDS, serde_json::json!(uuid::Uuid::new_v4().to_string()), envelope)
            .await
            .expect("run_all_rounds succeeds")
    }

    pub async fn get_standings(&self) -> GetStandingsResult {
        let envelope = Envelope::new("test-operator", None, GetStandingsParams::default());
        self.rpc
            .call(&self.endpoint, method::GET_STANDINGS, serde_json::json!(uuid::Uuid::new_v4().to_string()), envelope)
            .await
            .expect("get_standings succeeds")
    }
}

/// Spawns one referee, registers it with the league manager at `lm_endpoint`,
/// then starts serving. Returns the referee's own `/mcp` endpoint.
pub async fn spawn_referee(referee_id: &str, capacity: u32, lm_endpoint: &str) -> String {
    spawn_referee_with_rpc(referee_id, capacity, lm_endpoint, Arc::new(RpcClient::new())).await
}

/// Like `spawn_referee`, but with a caller-supplied outbound `RpcClient` --
/// used by tests that need to shrink the referee's call deadlines (e.g. to
/// exercise a silent player's move-timeout path without a 30s wait).
pub async fn spawn_referee_with_rpc(
    referee_id: &str,
    capacity: u32,
    lm_endpoint: &str,
    rpc: Arc<RpcClient>,
) -> String {
    let (listener, endpoint) = bind_ephemeral().await;
    let state = Arc::new(RefereeState::new(
        referee_id.to_string(),
        capacity,
        endpoint.clone(),
        lm_endpoint.to_string(),
        rpc,
    ));
    register_referee(&state).await.expect("referee registers with the league manager");

    let router = referee_router(state);
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service()).await.expect("referee server crashed");
    });
    endpoint
}

/// Like `spawn_referee`, but with deadlines shrunk 100x and timeouts never
/// retried -- the harness for tests that drive a silent player to forfeit.
pub async fn spawn_referee_fast(referee_id: &str, capacity: u32, lm_endpoint: &str) -> String {
    spawn_referee_with_rpc(referee_id, capacity, lm_endpoint, fast_rpc_client()).await
}

/// Spawns one player, registers it with the league manager, then starts
/// serving. Returns the player's own `/mcp` endpoint.
pub async fn spawn_player(display_name: &str, strategy: &str, fixed_move: Option<u32>, lm_endpoint: &str) -> String {
    let (listener, endpoint) = bind_ephemeral().await;
    let rpc = Arc::new(RpcClient::new());
    let state = Arc::new(PlayerState::new(
        display_name.to_string(),
        endpoint.clone(),
        lm_endpoint.to_string(),
        vec!["even_odd".to_string()],
        strategy.to_string(),
        fixed_move,
        rpc,
    ));
    register_player(&state).await.expect("player registers with the league manager");

    let router = player_router(state);
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service()).await.expect("player server crashed");
    });
    endpoint
}

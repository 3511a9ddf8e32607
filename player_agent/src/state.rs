//! Process-wide state for one player agent.

use rpc_client::RpcClient;
use std::sync::{Arc, Mutex};

use crate::session::SessionStore;

pub struct PlayerState {
    /// Assigned by the league manager at registration; unknown until then.
    player_id: Mutex<Option<String>>,
    token: Mutex<Option<String>>,
    pub display_name: String,
    pub public_endpoint: String,
    pub lm_endpoint: String,
    pub supported_games: Vec<String>,
    pub strategy_name: String,
    pub fixed_move: Option<u32>,
    pub rpc: Arc<RpcClient>,
    pub sessions: SessionStore,
}

impl PlayerState {
    pub fn new(
        display_name: String,
        public_endpoint: String,
        lm_endpoint: String,
        supported_games: Vec<String>,
        strategy_name: String,
        fixed_move: Option<u32>,
        rpc: Arc<RpcClient>,
    ) -> Self {
        PlayerState {
            player_id: Mutex::new(None),
            token: Mutex::new(None),
            display_name,
            public_endpoint,
            lm_endpoint,
            supported_games,
            strategy_name,
            fixed_move,
            rpc,
            sessions: SessionStore::new(),
        }
    }

    pub fn set_identity(&self, player_id: String, token: String) {
        *self.player_id.lock().expect("player id mutex poisoned") = Some(player_id);
        *self.token.lock().expect("player token mutex poisoned") = Some(token);
    }

    pub fn player_id(&self) -> Option<String> {
        self.player_id.lock().expect("player id mutex poisoned").clone()
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().expect("player token mutex poisoned").clone()
    }

    /// The referee is the only peer permitted to call a player's tools, and
    /// it always presents the player's own token back to it (mirrors the
    /// referee's own inbound check) -- a single shared secret per agent is
    /// enough, no per-sender roster needed.
    pub fn has_token(&self, presented: &str) -> bool {
        self.token().as_deref() == Some(presented)
    }
}

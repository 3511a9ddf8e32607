//! Process-wide state for one referee agent: its identity and credentials,
//! the capacity semaphore that bounds concurrent matches, and the
//! cancellation tokens that let `cancel_match` reach a running
//! [`crate::match_runner::MatchRunner`].

use dashmap::DashMap;
use rpc_client::RpcClient;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

pub struct RefereeState {
    pub referee_id: String,
    pub capacity: u32,
    pub public_endpoint: String,
    pub lm_endpoint: String,
    /// Populated by `register_referee` at start-up; this is the referee's
    /// own bearer credential, presented on every call it makes (to the LM
    /// and to players), and the value it checks inbound calls against --
    /// the LM is the only peer permitted to call a referee's tools, so a
    /// single shared secret (rather than a per-sender roster) is enough.
    token: Mutex<Option<String>>,
    pub rpc: Arc<RpcClient>,
    pub capacity_slots: Arc<Semaphore>,
    cancellations: DashMap<String, CancellationToken>,
    matches_run: AtomicU64,
}

impl RefereeState {
    pub fn new(referee_id: String, capacity: u32, public_endpoint: String, lm_endpoint: String, rpc: Arc<RpcClient>) -> Self {
        RefereeState {
            referee_id,
            capacity,
            public_endpoint,
            lm_endpoint,
            token: Mutex::new(None),
            rpc,
            capacity_slots: Arc::new(Semaphore::new(capacity as usize)),
            cancellations: DashMap::new(),
            matches_run: AtomicU64::new(0),
        }
    }

    pub fn set_token(&self, token: String) {
        *self.token.lock().expect("referee token mutex poisoned") = Some(token);
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().expect("referee token mutex poisoned").clone()
    }

    pub fn has_token(&self, presented: &str) -> bool {
        self.token().as_deref() == Some(presented)
    }

    pub fn register_match(&self, match_id: String) -> CancellationToken {
        let token = CancellationToken::new();
        self.cancellations.insert(match_id, token.clone());
        token
    }

    pub fn cancel_match(&self, match_id: &str) -> bool {
        match self.cancellations.get(match_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn forget_match(&self, match_id: &str) {
        self.cancellations.remove(match_id);
        self.matches_run.fetch_add(1, Ordering::Relaxed);
    }
}

//! Per-game session bookkeeping: one [`PlayerSession`] per accepted invite,
//! held in a [`SessionStore`] keyed by `game_id`. A session is its own
//! single-writer: two calls against the same `game_id` serialize on its
//! internal mutex, calls against different games run concurrently.

use dashmap::DashMap;
use domain::{GameSession, RoleAssignment, Strategy};
use tokio::sync::Mutex;
use uuid::Uuid;

pub struct PlayerSession {
    pub own_id: String,
    pub session: GameSession,
    pub strategy: Box<dyn Strategy>,
    pub valid_min: u32,
    pub valid_max: u32,
    /// Round number of the last move this session answered, so a repeated
    /// `request_move` for the same round is recognized as a duplicate
    /// rather than answered twice.
    pub last_answered_round: Option<u32>,
}

impl PlayerSession {
    pub fn role(&self) -> Option<RoleAssignment> {
        self.session.role_of(&self.own_id)
    }

    pub fn is_terminal(&self) -> bool {
        self.session.is_finished()
    }
}

#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, Mutex<PlayerSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    /// `true` if there is already a session for `game_id` that has not
    /// reached a terminal state -- an invite for it MUST be rejected.
    pub fn has_active(&self, game_id: Uuid) -> bool {
        match self.sessions.get(&game_id) {
            None => false,
            // A session is never held locked across an await point by this
            // player, so a busy lock here means a concurrent call is mutating
            // live state -- treat that as active too.
            Some(entry) => match entry.try_lock() {
                Ok(guard) => !guard.is_terminal(),
                Err(_) => true,
            },
        }
    }

    pub fn insert(&self, game_id: Uuid, session: PlayerSession) {
        self.sessions.insert(game_id, Mutex::new(session));
    }

    pub fn contains(&self, game_id: Uuid) -> bool {
        self.sessions.contains_key(&game_id)
    }

    pub async fn with_session<F, R>(&self, game_id: Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut PlayerSession) -> R,
    {
        let entry = self.sessions.get(&game_id)?;
        let mut guard = entry.lock().await;
        Some(f(&mut guard))
    }
}

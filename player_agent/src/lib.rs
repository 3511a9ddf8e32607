//! One strategy-driven player: session bookkeeping per game, idempotent
//! `round_result`/`game_over` handling, duplicate-move and duplicate-invite
//! rejection.

mod handlers;
mod registration;
mod session;
mod state;

pub use handlers::build_router;
pub use registration::register_with_league_manager;
pub use state::PlayerState;

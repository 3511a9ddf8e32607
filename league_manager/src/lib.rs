//! The league manager: sole registrar, round-robin scheduler, per-round
//! dispatcher, and standings authority for one tournament.

mod controller;
mod dispatcher;
mod handlers;
mod match_rules;

pub use controller::LeagueManager;
pub use handlers::build_router;
pub use match_rules::MatchRules;

//! The referee: accepts match assignments up to a declared capacity, runs
//! the match execution state machine for each, and reports results back to
//! the league manager.

mod handlers;
mod match_runner;
mod registration;
mod state;

pub use handlers::build_router;
pub use match_runner::{MatchRunner, MatchRunnerConfig, PeerHandle, RunnerOutcome};
pub use registration::register_with_league_manager;
pub use state::RefereeState;

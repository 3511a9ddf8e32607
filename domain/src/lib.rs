//! Pure domain model: entities and rules with no networking, no JSON, no
//! knowledge of the wire format. Deliberately independent of `transport` so
//! these types stay unit-testable in isolation and reusable by any agent.

mod game_port;
mod game_session;
mod match_;
mod player;
mod referee;
mod schedule;
mod standings;
mod strategy;
mod tournament;

pub use game_port::{resolve_game, EvenOddGame, GamePort, MatchOutcome, RoleWinner, RoundOutcome};
pub use game_session::{GameSession, RoleAssignment, RoundRecord, SessionState};
pub use match_::{format_match_id, Match, MatchOutcomeReport, MatchStatus};
pub use player::{format_player_id, PlayerRecord};
pub use referee::RefereeRecord;
pub use schedule::{generate_round_robin, Pairing, Schedule};
pub use standings::{MatchResult, Standings, StandingsEntry};
pub use strategy::{
    resolve_strategy, AlwaysLowestStrategy, CyclicStrategy, FixedMoveStrategy, ObservedOutcome,
    SessionView, SilentStrategy, Strategy,
};
pub use tournament::{Phase, TournamentState};

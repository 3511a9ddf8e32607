//! The closed set of tool payload schemas. One struct pair per
//! tool call. Kept as plain data — no behavior — so both sides of the wire
//! (caller and handler) share exactly one definition.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// `ODD`/`EVEN` role tag, normalizing the legacy `PLAYER_A`/`PLAYER_B` alias
/// at deserialize time. The lexicographically-smaller player id maps to
/// `ODD`; see DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    #[serde(rename = "ODD")]
    Odd,
    #[serde(rename = "EVEN")]
    Even,
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_uppercase().as_str() {
            "ODD" | "PLAYER_A" => Ok(Role::Odd),
            "EVEN" | "PLAYER_B" => Ok(Role::Even),
            other => Err(serde::de::Error::custom(format!(
                "unknown role tag: {other}"
            ))),
        }
    }
}

/// Inclusive integer range for a valid move. Configured per game, not
/// fixed by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidMoveRange {
    pub min: u32,
    pub max: u32,
}

impl ValidMoveRange {
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Per-match game configuration carried in `assign_match`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub game_type: String,
    pub max_rounds: u32,
    pub valid_move_range: ValidMoveRange,
    /// Value substituted for a missing/invalid move. Default documented in
    /// DESIGN.md.
    pub default_move: u32,
    /// Number of per-match default moves tolerated before a player is
    /// removed and the opponent wins by forfeit.
    pub default_move_forfeit_threshold: u32,
}

pub type Scores = BTreeMap<String, u32>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_number: u32,
    pub moves: BTreeMap<String, u32>,
    pub sum: u32,
    pub winner_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsEntryView {
    pub player_id: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points: u32,
    pub games_played: u32,
    pub rank: u32,
}

// ---- League Manager tools ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPlayerParams {
    pub display_name: String,
    pub endpoint: String,
    pub supported_games: Vec<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPlayerResult {
    pub player_id: String,
    pub auth_token: String,
    pub assigned_role_policy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRefereeParams {
    pub referee_id: String,
    pub endpoint: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRefereeResult {
    pub auth_token: String,
    pub accepted_capacity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMatchResultParams {
    pub match_id: String,
    pub referee_id: String,
    pub winner_id: Option<String>,
    pub scores: Scores,
    pub rounds_summary: Vec<RoundSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMatchResultResult {
    pub acknowledged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GetStandingsParams {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetStandingsResult {
    pub round_index: u32,
    pub standings: Vec<StandingsEntryView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StartLeagueParams {}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunNextRoundParams {}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunAllRoundsParams {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlStatusResult {
    pub phase: String,
    pub current_round: u32,
    pub total_rounds: u32,
}

// ---- Referee tools ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignMatchParams {
    pub match_id: String,
    pub round_index: u32,
    pub player_a: String,
    pub player_b: String,
    /// The LM is the sole holder of player endpoints; it passes both along
    /// so the referee can reach them for `game_invite`/`request_move`/
    /// `round_result`/`game_over` without a separate lookup call.
    pub player_a_endpoint: String,
    pub player_b_endpoint: String,
    pub game_config: GameConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignMatchResult {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelMatchParams {
    pub match_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelMatchResult {
    pub cancelled: bool,
}

// ---- Player tools ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameInviteParams {
    pub match_id: String,
    pub game_id: Uuid,
    pub role: Role,
    pub opponent_id: String,
    pub max_rounds: u32,
    pub valid_move_range: ValidMoveRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameInviteResult {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateView {
    pub round_number: u32,
    pub your_score: u32,
    pub opponent_score: u32,
    pub history: Vec<RoundSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMoveParams {
    pub game_id: Uuid,
    pub round_number: u32,
    pub game_state_view: GameStateView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMoveResult {
    #[serde(rename = "move")]
    pub move_value: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundResultParams {
    pub game_id: Uuid,
    pub round_number: u32,
    pub moves: BTreeMap<String, u32>,
    pub sum: u32,
    pub winner_id: Option<String>,
    pub scores: Scores,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RoundResultResult {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOverParams {
    pub game_id: Uuid,
    pub winner_id: Option<String>,
    pub scores: Scores,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameOverResult {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_accepts_legacy_aliases() {
        let odd: Role = serde_json::from_str("\"PLAYER_A\"").unwrap();
        let even: Role = serde_json::from_str("\"PLAYER_B\"").unwrap();
        assert_eq!(odd, Role::Odd);
        assert_eq!(even, Role::Even);
    }

    #[test]
    fn valid_move_range_is_inclusive() {
        let r = ValidMoveRange { min: 1, max: 10 };
        assert!(r.contains(1));
        assert!(r.contains(10));
        assert!(!r.contains(0));
        assert!(!r.contains(11));
    }
}

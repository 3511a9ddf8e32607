// player record, owned exclusively by the league manager

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub player_id: String,
    pub display_name: String,
    pub endpoint: String,
    pub supported_games: BTreeSet<String>,
    pub auth_token: String,
    pub registered_at: DateTime<Utc>,
}

impl PlayerRecord {
    pub fn supports(&self, game_type: &str) -> bool {
        self.supported_games.contains(game_type)
    }
}

/// Formats the sequential id for the Nth registered player: `register_player`
/// assigns `P01, P02, ...` deterministically, 1-based.
pub fn format_player_id(ordinal: usize) -> String {
    format!("P{:02}", ordinal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_ids_are_sequential_and_zero_padded() {
        assert_eq!(format_player_id(1), "P01");
        assert_eq!(format_player_id(9), "P09");
        assert_eq!(format_player_id(10), "P10");
        assert_eq!(format_player_id(123), "P123");
    }
}

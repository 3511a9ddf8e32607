// a dispatched match between one pairing

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Assigned,
    Inviting,
    Running,
    Complete,
    Forfeit,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct MatchOutcomeReport {
    pub winner_id: Option<String>,
    pub is_double_forfeit: bool,
}

#[derive(Debug, Clone)]
pub struct Match {
    pub match_id: String,
    pub round_index: u32,
    pub player_a: String,
    pub player_b: String,
    pub referee_id: String,
    pub status: MatchStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub outcome: Option<MatchOutcomeReport>,
}

impl Match {
    pub fn new(match_id: String, round_index: u32, player_a: String, player_b: String, referee_id: String) -> Self {
        debug_assert_ne!(player_a, player_b, "a match cannot pair a player against itself");
        Match {
            match_id,
            round_index,
            player_a,
            player_b,
            referee_id,
            status: MatchStatus::Assigned,
            started_at: None,
            completed_at: None,
            outcome: None,
        }
    }

    pub fn involves(&self, player_id: &str) -> bool {
        self.player_a == player_id || self.player_b == player_id
    }

    pub fn opponent_of(&self, player_id: &str) -> Option<&str> {
        if self.player_a == player_id {
            Some(&self.player_b)
        } else if self.player_b == player_id {
            Some(&self.player_a)
        } else {
            None
        }
    }
}

/// `R{round}M{match}` match ids.
pub fn format_match_id(round_index: u32, match_ordinal: usize) -> String {
    format!("R{}M{}", round_index, match_ordinal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_id_follows_the_r_m_convention() {
        assert_eq!(format_match_id(1, 1), "R1M1");
        assert_eq!(format_match_id(3, 2), "R3M2");
    }

    #[test]
    fn opponent_lookup_resolves_either_side() {
        let m = Match::new("R1M1".into(), 1, "P01".into(), "P02".into(), "R01".into());
        assert_eq!(m.opponent_of("P01"), Some("P02"));
        assert_eq!(m.opponent_of("P02"), Some("P01"));
        assert_eq!(m.opponent_of("P03"), None);
    }
}

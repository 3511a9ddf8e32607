// game session: the referee's in-match view of one game

use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    WaitingForAccept,
    CollectingMoves,
    Resolving,
    Finished,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleAssignment {
    Odd,
    Even,
}

#[derive(Debug, Clone)]
pub struct RoundRecord {
    pub round_number: u32,
    pub moves: BTreeMap<String, u32>,
    pub sum: u32,
    pub winner_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    pub game_id: Uuid,
    pub match_id: String,
    pub odd_player_id: String,
    pub even_player_id: String,
    pub max_rounds: u32,
    pub current_round: u32,
    pub scores: BTreeMap<String, u32>,
    pub history: Vec<RoundRecord>,
    pub state: SessionState,
    /// count of default-move substitutions charged to each player this
    /// match.
    pub default_move_counts: BTreeMap<String, u32>,
}

impl GameSession {
    pub fn new(game_id: Uuid, match_id: String, odd_player_id: String, even_player_id: String, max_rounds: u32) -> Self {
        debug_assert_ne!(odd_player_id, even_player_id);
        let mut scores = BTreeMap::new();
        scores.insert(odd_player_id.clone(), 0);
        scores.insert(even_player_id.clone(), 0);
        let mut default_move_counts = BTreeMap::new();
        default_move_counts.insert(odd_player_id.clone(), 0);
        default_move_counts.insert(even_player_id.clone(), 0);
        GameSession {
            game_id,
            match_id,
            odd_player_id,
            even_player_id,
            max_rounds,
            current_round: 0,
            scores,
            history: Vec::new(),
            state: SessionState::Init,
            default_move_counts,
        }
    }

    pub fn role_of(&self, player_id: &str) -> Option<RoleAssignment> {
        if player_id == self.odd_player_id {
            Some(RoleAssignment::Odd)
        } else if player_id == self.even_player_id {
            Some(RoleAssignment::Even)
        } else {
            None
        }
    }

    pub fn record_round(&mut self, record: RoundRecord) {
        debug_assert_eq!(record.round_number, self.current_round + 1);
        if let Some(winner) = &record.winner_id {
            *self.scores.entry(winner.clone()).or_insert(0) += 1;
        }
        self.current_round = record.round_number;
        self.history.push(record);
    }

    pub fn charge_default_move(&mut self, player_id: &str) -> u32 {
        let count = self.default_move_counts.entry(player_id.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Finished | SessionState::Aborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_record_accrues_into_scores() {
        let mut session = GameSession::new(Uuid::new_v4(), "R1M1".into(), "P01".into(), "P02".into(), 3);
        session.record_round(RoundRecord {
            round_number: 1,
            moves: BTreeMap::from([("P01".to_string(), 3), ("P02".to_string(), 2)]),
            sum: 5,
            winner_id: Some("P01".to_string()),
        });
        assert_eq!(session.scores["P01"], 1);
        assert_eq!(session.scores["P02"], 0);
        assert_eq!(session.current_round, 1);
    }

    #[test]
    fn default_move_charges_accumulate_per_player() {
        let mut session = GameSession::new(Uuid::new_v4(), "R1M1".into(), "P01".into(), "P02".into(), 3);
        assert_eq!(session.charge_default_move("P01"), 1);
        assert_eq!(session.charge_default_move("P01"), 2);
        assert_eq!(session.charge_default_move("P02"), 1);
    }
}

//! Per-tournament game configuration: the core runs exactly one registered
//! game (`even_odd`), fixed `max_rounds` (no best-of-N threshold), and the
//! defaults below -- see DESIGN.md for the rationale.

use transport::{GameConfig, ValidMoveRange};

#[derive(Debug, Clone)]
pub struct MatchRules {
    pub game_type: String,
    pub max_rounds: u32,
    pub valid_move_range: ValidMoveRange,
    pub default_move: u32,
    pub default_move_forfeit_threshold: u32,
}

impl MatchRules {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            game_type: self.game_type.clone(),
            max_rounds: self.max_rounds,
            valid_move_range: self.valid_move_range,
            default_move: self.default_move,
            default_move_forfeit_threshold: self.default_move_forfeit_threshold,
        }
    }
}

impl Default for MatchRules {
    /// `even_odd`, 3 rounds, moves in `[1, 10]`, default move is the lowest
    /// valid value, two tolerated default moves before forfeit.
    fn default() -> Self {
        MatchRules {
            game_type: "even_odd".to_string(),
            max_rounds: 3,
            valid_move_range: ValidMoveRange { min: 1, max: 10 },
            default_move: 1,
            default_move_forfeit_threshold: 2,
        }
    }
}

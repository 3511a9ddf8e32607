//! The `GamePort` seam generalizes round adjudication and match decision
//! over a game type the same way a sport-rules trait generalizes scoring.
//! The registry holds exactly one entry, `even_odd`; the trait exists so
//! the referee's match loop is not hardwired to one game's arithmetic.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleWinner {
    Odd,
    Even,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub sum: u32,
    pub winner: RoleWinner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Winner(RoleWinner),
    Draw,
}

pub trait GamePort: Send + Sync {
    fn game_type(&self) -> &'static str;

    /// Adjudicates one in-match round from both players' moves.
    fn adjudicate_round(&self, odd_move: u32, even_move: u32) -> RoundOutcome;

    /// Decides the match once `max_rounds` (or a configured threshold) is
    /// reached, from each role's accumulated in-match score.
    fn decide_match(&self, odd_score: u32, even_score: u32) -> MatchOutcome;
}

/// `sum = move_odd + move_even`; an even sum wins the round for `EVEN`,
/// odd for `ODD`.
pub struct EvenOddGame;

impl GamePort for EvenOddGame {
    fn game_type(&self) -> &'static str {
        "even_odd"
    }

    fn adjudicate_round(&self, odd_move: u32, even_move: u32) -> RoundOutcome {
        let sum = odd_move + even_move;
        let winner = if sum % 2 == 0 { RoleWinner::Even } else { RoleWinner::Odd };
        RoundOutcome { sum, winner }
    }

    fn decide_match(&self, odd_score: u32, even_score: u32) -> MatchOutcome {
        use std::cmp::Ordering::*;
        match odd_score.cmp(&even_score) {
            Greater => MatchOutcome::Winner(RoleWinner::Odd),
            Less => MatchOutcome::Winner(RoleWinner::Even),
            Equal => MatchOutcome::Draw,
        }
    }
}

/// Resolves a registered `game_type` string to its `GamePort`. The registry
/// is closed -- there is exactly one entry -- so an unknown `game_type` is
/// rejected at registration time with `UNSUPPORTED_GAME`, not silently
/// substituted.
pub fn resolve_game(game_type: &str) -> Option<Box<dyn GamePort>> {
    match game_type {
        "even_odd" => Some(Box::new(EvenOddGame)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_sum_favors_even_role_odd_sum_favors_odd_role() {
        let game = EvenOddGame;
        assert_eq!(game.adjudicate_round(3, 2).winner, RoleWinner::Odd); // 5
        assert_eq!(game.adjudicate_round(2, 2).winner, RoleWinner::Even); // 4
    }

    #[test]
    fn higher_match_score_wins_equal_scores_draw() {
        let game = EvenOddGame;
        assert_eq!(game.decide_match(3, 0), MatchOutcome::Winner(RoleWinner::Odd));
        assert_eq!(game.decide_match(0, 3), MatchOutcome::Winner(RoleWinner::Even));
        assert_eq!(game.decide_match(1, 1), MatchOutcome::Draw);
    }

    #[test]
    fn unsupported_game_type_resolves_to_none() {
        assert!(resolve_game("chess").is_none());
        assert!(resolve_game("even_odd").is_some());
    }
}

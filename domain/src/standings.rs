// standings computation and deterministic ranking

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StandingsEntry {
    pub player_id: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_played: u32,
    pub rank: u32,
}

impl StandingsEntry {
    pub fn new(player_id: String) -> Self {
        StandingsEntry {
            player_id,
            ..Default::default()
        }
    }

    /// `points = 3 * wins + 1 * draws`.
    pub fn points(&self) -> u32 {
        3 * self.wins + self.draws
    }
}

#[derive(Debug, Clone)]
pub struct Standings {
    entries: BTreeMap<String, StandingsEntry>,
    /// match ids already applied, gating idempotent `report_match_result`
    /// ingestion.
    applied_matches: std::collections::HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub match_id: String,
    pub player_a: String,
    pub player_b: String,
    pub winner_id: Option<String>,
}

impl Standings {
    pub fn new(player_ids: &[String]) -> Self {
        let entries = player_ids
            .iter()
            .map(|id| (id.clone(), StandingsEntry::new(id.clone())))
            .collect();
        let mut standings = Standings {
            entries,
            applied_matches: std::collections::HashSet::new(),
        };
        standings.recompute_ranks();
        standings
    }

    /// Applies a completed match's result exactly once per `match_id`
    /// (idempotent: a repeat delivery is a no-op and still returns `true`,
    /// mirroring `report_match_result`'s `{acknowledged: true}` contract).
    pub fn apply_result(&mut self, result: &MatchResult) -> bool {
        if !self.applied_matches.insert(result.match_id.clone()) {
            return true; // already applied; idempotent ack
        }

        for id in [&result.player_a, &result.player_b] {
            if let Some(entry) = self.entries.get_mut(id) {
                entry.games_played += 1;
            }
        }

        match &result.winner_id {
            Some(winner) => {
                let loser = if winner == &result.player_a {
                    &result.player_b
                } else {
                    &result.player_a
                };
                if let Some(entry) = self.entries.get_mut(winner) {
                    entry.wins += 1;
                }
                if let Some(entry) = self.entries.get_mut(loser) {
                    entry.losses += 1;
                }
            }
            None => {
                for id in [&result.player_a, &result.player_b] {
                    if let Some(entry) = self.entries.get_mut(id) {
                        entry.draws += 1;
                    }
                }
            }
        }

        self.recompute_ranks();
        true
    }

    /// Records a match that never ran (double forfeit: a referee could not
    /// be reached after retries). Per the glossary, a double forfeit is
    /// "no score change" -- neither player's win/loss/draw counters move --
    /// but the match still counts toward `games_played` so invariant 2's
    /// per-player game count still holds.
    pub fn apply_double_forfeit(&mut self, match_id: &str, player_a: &str, player_b: &str) -> bool {
        if !self.applied_matches.insert(match_id.to_string()) {
            return true;
        }
        for id in [player_a, player_b] {
            if let Some(entry) = self.entries.get_mut(id) {
                entry.games_played += 1;
            }
        }
        self.recompute_ranks();
        true
    }

    pub fn has_applied(&self, match_id: &str) -> bool {
        self.applied_matches.contains(match_id)
    }

    /// Total order: points desc, wins desc, draws desc, player_id asc
    ///.
    fn recompute_ranks(&mut self) {
        let mut ordered: Vec<&mut StandingsEntry> = self.entries.values_mut().collect();
        ordered.sort_by(|a, b| {
            b.points()
                .cmp(&a.points())
                .then(b.wins.cmp(&a.wins))
                .then(b.draws.cmp(&a.draws))
                .then(a.player_id.cmp(&b.player_id))
        });
        for (rank, entry) in ordered.into_iter().enumerate() {
            entry.rank = rank as u32 + 1;
        }
    }

    pub fn entries_by_rank(&self) -> Vec<StandingsEntry> {
        let mut rows: Vec<StandingsEntry> = self.entries.values().cloned().collect();
        rows.sort_by_key(|e| e.rank);
        rows
    }

    pub fn leader(&self) -> Option<StandingsEntry> {
        self.entries_by_rank().into_iter().find(|e| e.rank == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("P{:02}", i)).collect()
    }

    #[test]
    fn win_gives_three_points_draw_gives_one() {
        let mut s = Standings::new(&ids(2));
        s.apply_result(&MatchResult {
            match_id: "R1M1".into(),
            player_a: "P01".into(),
            player_b: "P02".into(),
            winner_id: Some("P01".into()),
        });
        let rows = s.entries_by_rank();
        assert_eq!(rows[0].player_id, "P01");
        assert_eq!(rows[0].points(), 3);
        assert_eq!(rows[1].points(), 0);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn repeated_delivery_of_same_match_is_idempotent() {
        let mut s = Standings::new(&ids(2));
        let result = MatchResult {
            match_id: "R1M1".into(),
            player_a: "P01".into(),
            player_b: "P02".into(),
            winner_id: Some("P01".into()),
        };
        s.apply_result(&result);
        let after_first = s.entries_by_rank();
        s.apply_result(&result);
        s.apply_result(&result);
        let after_repeats = s.entries_by_rank();
        assert_eq!(after_first, after_repeats);
        assert_eq!(after_repeats[0].wins, 1);
    }

    #[test]
    fn draw_increments_draws_for_both_players() {
        let mut s = Standings::new(&ids(2));
        s.apply_result(&MatchResult {
            match_id: "R1M1".into(),
            player_a: "P01".into(),
            player_b: "P02".into(),
            winner_id: None,
        });
        let rows = s.entries_by_rank();
        assert!(rows.iter().all(|r| r.draws == 1 && r.points() == 1));
    }

    #[test]
    fn double_forfeit_counts_the_game_but_changes_no_decision() {
        let mut s = Standings::new(&ids(2));
        s.apply_double_forfeit("R1M1", "P01", "P02");
        let rows = s.entries_by_rank();
        assert!(rows.iter().all(|r| r.games_played == 1 && r.points() == 0));
        // idempotent, same as apply_result
        s.apply_double_forfeit("R1M1", "P01", "P02");
        let rows_again = s.entries_by_rank();
        assert_eq!(rows, rows_again);
    }

    #[test]
    fn tie_break_falls_through_to_player_id_ascending() {
        let mut s = Standings::new(&ids(3));
        // P01 beats P02, P03 beats nobody yet: P01 and P03 still tie at the
        // start on 0 points; verify id-ascending placement before any result.
        let rows = s.entries_by_rank();
        assert_eq!(rows.iter().map(|r| r.player_id.clone()).collect::<Vec<_>>(),
            vec!["P01".to_string(), "P02".to_string(), "P03".to_string()]);
    }
}

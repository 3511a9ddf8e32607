//! The league manager's top-level view of one tournament run.

use crate::match_::Match;
use crate::player::PlayerRecord;
use crate::referee::RefereeRecord;
use crate::schedule::Schedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    RegistrationOpen,
    Scheduled,
    RunningRound,
    BetweenRounds,
    Complete,
}

impl Phase {
    /// Registration endpoints are only open in this phase.
    pub fn accepts_registration(&self) -> bool {
        matches!(self, Phase::RegistrationOpen)
    }
}

#[derive(Debug, Clone)]
pub struct TournamentState {
    pub tournament_id: String,
    pub game_type: String,
    pub players: Vec<PlayerRecord>,
    pub referees: Vec<RefereeRecord>,
    pub phase: Phase,
    pub current_round: u32,
    pub schedule: Option<Schedule>,
    pub matches: Vec<Match>,
}

impl TournamentState {
    pub fn new(tournament_id: String, game_type: String) -> Self {
        TournamentState {
            tournament_id,
            game_type,
            players: Vec::new(),
            referees: Vec::new(),
            phase: Phase::RegistrationOpen,
            current_round: 0,
            schedule: None,
            matches: Vec::new(),
        }
    }

    pub fn total_rounds(&self) -> u32 {
        self.schedule.as_ref().map(|s| s.total_rounds() as u32).unwrap_or(0)
    }

    pub fn is_final_round(&self) -> bool {
        self.current_round == self.total_rounds() && self.total_rounds() > 0
    }

    /// `REGISTRATION_OPEN -> SCHEDULED`, triggered by `start_league`.
    pub fn close_registration_with_schedule(&mut self, schedule: Schedule) {
        debug_assert_eq!(self.phase, Phase::RegistrationOpen);
        self.schedule = Some(schedule);
        self.phase = Phase::Scheduled;
    }

    pub fn begin_round(&mut self) {
        debug_assert!(matches!(self.phase, Phase::Scheduled | Phase::BetweenRounds));
        self.current_round += 1;
        self.phase = Phase::RunningRound;
    }

    /// Called once every match in `current_round` has a reported result.
    /// Transitions to `COMPLETE` on the last round, otherwise
    /// `BETWEEN_ROUNDS` awaiting the next `run_next_round`.
    pub fn finish_round(&mut self) {
        debug_assert_eq!(self.phase, Phase::RunningRound);
        if self.is_final_round() {
            self.phase = Phase::Complete;
        } else {
            self.phase = Phase::BetweenRounds;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::generate_round_robin;

    #[test]
    fn phase_walks_registration_through_complete() {
        let mut t = TournamentState::new("T1".into(), "even_odd".into());
        assert_eq!(t.phase, Phase::RegistrationOpen);
        let players = vec!["P01".to_string(), "P02".to_string()];
        let schedule = generate_round_robin(&players);
        t.close_registration_with_schedule(schedule);
        assert_eq!(t.phase, Phase::Scheduled);

        t.begin_round();
        assert_eq!(t.phase, Phase::RunningRound);
        assert_eq!(t.current_round, 1);

        t.finish_round();
        assert_eq!(t.phase, Phase::Complete); // only one round for N=2
    }

    #[test]
    fn multi_round_tournament_cycles_between_rounds_before_completing() {
        let mut t = TournamentState::new("T1".into(), "even_odd".into());
        let players: Vec<String> = (1..=3).map(|i| format!("P{:02}", i)).collect();
        t.close_registration_with_schedule(generate_round_robin(&players));
        assert_eq!(t.total_rounds(), 3);

        t.begin_round();
        t.finish_round();
        assert_eq!(t.phase, Phase::BetweenRounds);

        t.begin_round();
        t.finish_round();
        assert_eq!(t.phase, Phase::BetweenRounds);

        t.begin_round();
        t.finish_round();
        assert_eq!(t.phase, Phase::Complete);
    }
}

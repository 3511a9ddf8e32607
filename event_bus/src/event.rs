use domain::StandingsEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

/// One match the league manager could not run to a clean decision --
/// currently only the dispatch-level double forfeit (a referee stayed
/// unreachable through the retry budget), since that is the one forfeit
/// kind the league manager observes directly rather than through an
/// opaque `winner_id` in `report_match_result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedMatch {
    pub match_id: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub enum LeagueEvent {
    TournamentStarted {
        tournament_id: String,
        total_rounds: u32,
    },
    MatchDispatched {
        match_id: String,
        referee_id: String,
    },
    MatchCompleted {
        match_id: String,
        winner_id: Option<String>,
    },
    StandingsUpdated {
        round_index: u32,
        standings: Vec<StandingsEntry>,
    },
    TournamentCompleted {
        final_standings: Vec<StandingsEntry>,
        winner_id: Option<String>,
    },
    TournamentDegraded {
        forfeits: Vec<DegradedMatch>,
    },
    BreakerStateChanged {
        target: String,
        state: BreakerState,
    },
}

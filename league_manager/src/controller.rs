//! The league manager: sole registrar, dispatcher, and standings authority
//! for one tournament. A single `tokio::sync::Mutex` guards all mutable
//! tournament state -- the single-writer discipline -- while outbound calls
//! to referees happen with the lock released.

use crate::dispatcher::select_referee;
use crate::match_rules::MatchRules;
use chrono::Utc;
use dashmap::DashSet;
use domain::{
    format_match_id, format_player_id, generate_round_robin, Match, MatchOutcomeReport,
    MatchStatus, Pairing, PlayerRecord, RefereeRecord, Standings, StandingsEntry,
    TournamentState,
};
use event_bus::{EventBus, LeagueEvent};
use rpc_client::RpcClient;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use transport::{
    method, AssignMatchParams, AssignMatchResult, ControlStatusResult, Envelope, ErrorKind,
    GetStandingsResult, RegisterPlayerResult, RegisterRefereeResult, ReportMatchResultParams,
    ReportMatchResultResult, RpcError, StandingsEntryView,
};
use uuid::Uuid;

struct Inner {
    tournament: TournamentState,
    standings: Standings,
    /// Matches of the current round not yet in a terminal state. Gates the
    /// round barrier: round R+1 is never dispatched until this reaches zero
    /// for round R.
    pending_in_round: u32,
    /// Matches that could not be run to a clean decision -- currently only
    /// dispatch-level double forfeits, surfaced via `tournament.degraded`.
    degraded: Vec<event_bus::DegradedMatch>,
}

pub struct LeagueManager {
    inner: Mutex<Inner>,
    rpc: Arc<RpcClient>,
    events: Arc<dyn EventBus>,
    match_rules: MatchRules,
    max_players: usize,
    /// Wakes a dispatcher waiting on a full referee roster when any referee
    /// frees a slot.
    capacity_notify: Notify,
    /// Wakes `run_next_round`'s barrier wait when the last outstanding
    /// match of the round reaches a terminal state.
    round_done_notify: Notify,
    /// Mirrors every issued auth token outside the tournament mutex so the
    /// HTTP envelope extractor can check bearer tokens synchronously,
    /// without awaiting the single-writer lock on every inbound call.
    known_tokens: DashSet<String>,
}

fn sender_tag(tournament_id: &str) -> String {
    format!("league_manager:{tournament_id}")
}

impl LeagueManager {
    pub fn new(
        tournament_id: String,
        match_rules: MatchRules,
        max_players: usize,
        rpc: Arc<RpcClient>,
        events: Arc<dyn EventBus>,
    ) -> Self {
        let game_type = match_rules.game_type.clone();
        LeagueManager {
            inner: Mutex::new(Inner {
                tournament: TournamentState::new(tournament_id, game_type),
                standings: Standings::new(&[]),
                pending_in_round: 0,
                degraded: Vec::new(),
            }),
            rpc,
            events,
            match_rules,
            max_players,
            capacity_notify: Notify::new(),
            round_done_notify: Notify::new(),
            known_tokens: DashSet::new(),
        }
    }

    /// Synchronous bearer-token membership check used by the HTTP
    /// extractor; does not touch the tournament mutex.
    pub fn has_token(&self, token: &str) -> bool {
        self.known_tokens.contains(token)
    }

    // ---- registration ----

    pub async fn register_player(
        &self,
        display_name: String,
        endpoint: String,
        supported_games: Vec<String>,
    ) -> Result<RegisterPlayerResult, RpcError> {
        let mut inner = self.inner.lock().await;
        if !inner.tournament.phase.accepts_registration() {
            return Err(RpcError::new(ErrorKind::RegistrationClosed, "registration is closed"));
        }
        if inner.tournament.players.len() >= self.max_players {
            return Err(RpcError::new(ErrorKind::LeagueFull, "league is at max_players capacity"));
        }
        if inner.tournament.players.iter().any(|p| p.endpoint == endpoint) {
            return Err(RpcError::new(ErrorKind::AlreadyRegistered, "endpoint already registered"));
        }
        if !supported_games.iter().any(|g| g == &inner.tournament.game_type) {
            return Err(RpcError::new(ErrorKind::UnsupportedGame, "player does not support this tournament's game type"));
        }

        let player_id = format_player_id(inner.tournament.players.len() + 1);
        let auth_token = Uuid::new_v4().to_string();
        inner.tournament.players.push(PlayerRecord {
            player_id: player_id.clone(),
            display_name,
            endpoint,
            supported_games: supported_games.into_iter().collect(),
            auth_token: auth_token.clone(),
            registered_at: Utc::now(),
        });

        self.known_tokens.insert(auth_token.clone());
        Ok(RegisterPlayerResult {
            player_id,
            auth_token,
            assigned_role_policy: "lexicographically smaller player_id is ODD".to_string(),
        })
    }

    pub async fn register_referee(
        &self,
        referee_id: String,
        endpoint: String,
        capacity: u32,
    ) -> Result<RegisterRefereeResult, RpcError> {
        let mut inner = self.inner.lock().await;
        if inner.tournament.referees.iter().any(|r| r.referee_id == referee_id) {
            return Err(RpcError::new(ErrorKind::DuplicateRefereeId, "referee_id already registered"));
        }
        let auth_token = Uuid::new_v4().to_string();
        inner.tournament.referees.push(RefereeRecord {
            referee_id,
            endpoint,
            capacity,
            active_matches: 0,
            auth_token: auth_token.clone(),
        });
        self.known_tokens.insert(auth_token.clone());
        Ok(RegisterRefereeResult { auth_token, accepted_capacity: capacity })
    }

    // ---- control plane ----

    pub async fn start_league(&self) -> Result<ControlStatusResult, RpcError> {
        let mut inner = self.inner.lock().await;
        if inner.tournament.phase != domain::Phase::RegistrationOpen {
            return Err(RpcError::new(ErrorKind::InvalidPhase, "start_league requires REGISTRATION_OPEN"));
        }
        if inner.tournament.players.len() < 2 {
            return Err(RpcError::new(ErrorKind::NoPlayersRegistered, "at least two players must be registered"));
        }
        if inner.tournament.referees.is_empty() {
            return Err(RpcError::new(ErrorKind::NoRefereesAvailable, "at least one referee must be registered"));
        }

        let player_ids: Vec<String> = inner.tournament.players.iter().map(|p| p.player_id.clone()).collect();
        let schedule = generate_round_robin(&player_ids);
        inner.standings = Standings::new(&player_ids);
        let total_rounds = schedule.total_rounds() as u32;
        inner.tournament.close_registration_with_schedule(schedule);
        let tournament_id = inner.tournament.tournament_id.clone();
        let status = self.status_snapshot(&inner);
        drop(inner);

        self.events
            .publish(&tournament_id, LeagueEvent::TournamentStarted { tournament_id: tournament_id.clone(), total_rounds })
            .await;
        Ok(status)
    }

    pub async fn run_next_round(&self) -> Result<ControlStatusResult, RpcError> {
        let (tournament_id, round_index, pairings) = {
            let mut inner = self.inner.lock().await;
            match inner.tournament.phase {
                domain::Phase::Complete => return Ok(self.status_snapshot(&inner)),
                domain::Phase::Scheduled | domain::Phase::BetweenRounds => {}
                _ => return Err(RpcError::new(ErrorKind::InvalidPhase, "run_next_round requires SCHEDULED or BETWEEN_ROUNDS")),
            }
            assert_eq!(inner.pending_in_round, 0, "round R+1 dispatched before round R fully reported");
            inner.tournament.begin_round();
            let round_index = inner.tournament.current_round;
            let pairings = inner
                .tournament
                .schedule
                .as_ref()
                .expect("schedule exists once SCHEDULED")
                .round((round_index - 1) as usize)
                .expect("current_round is always within the schedule's bounds")
                .to_vec();
            (inner.tournament.tournament_id.clone(), round_index, pairings)
        };

        let real_pairings: Vec<(String, String)> = pairings
            .into_iter()
            .filter_map(|p| match p {
                Pairing::Match(a, b) => Some((a, b)),
                Pairing::Bye(_) => None,
            })
            .collect();

        {
            let mut inner = self.inner.lock().await;
            inner.pending_in_round = real_pairings.len() as u32;
        }

        for (ordinal, (player_a, player_b)) in real_pairings.into_iter().enumerate() {
            let match_id = format_match_id(round_index, ordinal + 1);
            self.dispatch_one(&tournament_id, match_id, round_index, player_a, player_b).await;
        }

        self.await_round_completion().await;

        let mut inner = self.inner.lock().await;
        inner.tournament.finish_round();
        let phase = inner.tournament.phase;
        let standings_view = inner.standings.entries_by_rank();
        let status = self.status_snapshot(&inner);
        drop(inner);

        self.events
            .publish(&tournament_id, LeagueEvent::StandingsUpdated { round_index, standings: standings_view.clone() })
            .await;
        if phase == domain::Phase::Complete {
            let winner_id = standings_view.iter().find(|e| e.rank == 1).map(|e| e.player_id.clone());
            self.events
                .publish(&tournament_id, LeagueEvent::TournamentCompleted { final_standings: standings_view, winner_id })
                .await;
        }
        Ok(status)
    }

    pub async fn run_all_rounds(&self) -> Result<ControlStatusResult, RpcError> {
        loop {
            let status = self.run_next_round().await?;
            if status.phase == "COMPLETE" {
                return Ok(status);
            }
        }
    }

    pub async fn get_standings(&self) -> Result<GetStandingsResult, RpcError> {
        let inner = self.inner.lock().await;
        Ok(GetStandingsResult {
            round_index: inner.tournament.current_round,
            standings: inner.standings.entries_by_rank().iter().map(view_of).collect(),
        })
    }

    // ---- dispatch ----

    async fn dispatch_one(
        &self,
        tournament_id: &str,
        match_id: String,
        round_index: u32,
        player_a: String,
        player_b: String,
    ) {
        loop {
            let selected = {
                let inner = self.inner.lock().await;
                let selected_referee = select_referee(&inner.tournament.referees).map(|idx| {
                    let r = &inner.tournament.referees[idx];
                    (idx, r.referee_id.clone(), r.endpoint.clone(), r.auth_token.clone())
                });
                selected_referee.map(|(idx, referee_id, ref_endpoint, token)| {
                    let player_a_endpoint = inner
                        .tournament
                        .players
                        .iter()
                        .find(|p| p.player_id == player_a)
                        .map(|p| p.endpoint.clone())
                        .unwrap_or_default();
                    let player_b_endpoint = inner
                        .tournament
                        .players
                        .iter()
                        .find(|p| p.player_id == player_b)
                        .map(|p| p.endpoint.clone())
                        .unwrap_or_default();
                    (idx, referee_id, ref_endpoint, token, player_a_endpoint, player_b_endpoint)
                })
            };
            let (idx, referee_id, endpoint, token, player_a_endpoint, player_b_endpoint) = match selected {
                Some(x) => x,
                None => {
                    self.capacity_notify.notified().await;
                    continue;
                }
            };

            let envelope = Envelope::new(
                sender_tag(tournament_id),
                Some(token),
                AssignMatchParams {
                    match_id: match_id.clone(),
                    round_index,
                    player_a: player_a.clone(),
                    player_b: player_b.clone(),
                    player_a_endpoint,
                    player_b_endpoint,
                    game_config: self.match_rules.game_config(),
                },
            );
            let result: Result<AssignMatchResult, RpcError> = self
                .rpc
                .call(&endpoint, method::ASSIGN_MATCH, serde_json::json!(Uuid::new_v4().to_string()), envelope)
                .await;

            match result {
                Ok(AssignMatchResult { accepted: true, .. }) => {
                    let mut inner = self.inner.lock().await;
                    inner.tournament.referees[idx].on_match_assigned();
                    let mut m = Match::new(match_id.clone(), round_index, player_a, player_b, referee_id.clone());
                    m.status = MatchStatus::Inviting;
                    m.started_at = Some(Utc::now());
                    inner.tournament.matches.push(m);
                    drop(inner);
                    self.events
                        .publish(tournament_id, LeagueEvent::MatchDispatched { match_id, referee_id })
                        .await;
                    return;
                }
                Ok(AssignMatchResult { accepted: false, .. }) | Err(RpcError { kind: ErrorKind::CapacityExceeded, .. }) => {
                    // Another dispatch raced us onto this referee; try the
                    // next-least-loaded one.
                    continue;
                }
                Err(transport_err) => {
                    // Retries already happened inside `rpc_client`; this is
                    // final. Cancel the match and record a double forfeit.
                    let mut inner = self.inner.lock().await;
                    let mut m = Match::new(match_id.clone(), round_index, player_a.clone(), player_b.clone(), referee_id);
                    m.status = MatchStatus::Cancelled;
                    m.completed_at = Some(Utc::now());
                    m.outcome = Some(MatchOutcomeReport { winner_id: None, is_double_forfeit: true });
                    inner.tournament.matches.push(m);
                    inner.standings.apply_double_forfeit(&match_id, &player_a, &player_b);
                    inner.pending_in_round = inner.pending_in_round.saturating_sub(1);
                    inner.degraded.push(event_bus::DegradedMatch {
                        match_id: match_id.clone(),
                        reason: format!("referee unreachable after retries: {transport_err}"),
                    });
                    let degraded_so_far = inner.degraded.clone();
                    drop(inner);
                    self.round_done_notify.notify_one();
                    self.events
                        .publish(tournament_id, LeagueEvent::MatchCompleted { match_id, winner_id: None })
                        .await;
                    self.events
                        .publish(tournament_id, LeagueEvent::TournamentDegraded { forfeits: degraded_so_far })
                        .await;
                    return;
                }
            }
        }
    }

    async fn await_round_completion(&self) {
        loop {
            {
                let inner = self.inner.lock().await;
                if inner.pending_in_round == 0 {
                    return;
                }
            }
            self.round_done_notify.notified().await;
        }
    }

    // ---- result ingestion ----

    pub async fn report_match_result(&self, params: ReportMatchResultParams) -> Result<ReportMatchResultResult, RpcError> {
        let mut inner = self.inner.lock().await;

        if inner.standings.has_applied(&params.match_id) {
            return Ok(ReportMatchResultResult { acknowledged: true });
        }

        let referee_id = {
            let m = inner
                .tournament
                .matches
                .iter_mut()
                .find(|m| m.match_id == params.match_id)
                .ok_or_else(|| RpcError::new(ErrorKind::MatchNotFound, "no such match_id"))?;
            m.status = MatchStatus::Complete;
            m.completed_at = Some(Utc::now());
            m.outcome = Some(MatchOutcomeReport { winner_id: params.winner_id.clone(), is_double_forfeit: false });
            m.referee_id.clone()
        };

        let (player_a, player_b) = inner
            .tournament
            .matches
            .iter()
            .find(|m| m.match_id == params.match_id)
            .map(|m| (m.player_a.clone(), m.player_b.clone()))
            .expect("match was just looked up above");

        inner.standings.apply_result(&domain::MatchResult {
            match_id: params.match_id.clone(),
            player_a,
            player_b,
            winner_id: params.winner_id.clone(),
        });

        if let Some(r) = inner.tournament.referees.iter_mut().find(|r| r.referee_id == referee_id) {
            r.on_match_terminated();
        }
        inner.pending_in_round = inner.pending_in_round.saturating_sub(1);
        let tournament_id = inner.tournament.tournament_id.clone();
        drop(inner);

        self.capacity_notify.notify_one();
        self.round_done_notify.notify_one();
        self.events
            .publish(&tournament_id, LeagueEvent::MatchCompleted { match_id: params.match_id, winner_id: params.winner_id })
            .await;

        Ok(ReportMatchResultResult { acknowledged: true })
    }

    pub async fn subscribe_events(&self) -> event_bus::EventStream {
        let tournament_id = self.inner.lock().await.tournament.tournament_id.clone();
        self.events.subscribe(&tournament_id).await
    }

    fn status_snapshot(&self, inner: &Inner) -> ControlStatusResult {
        ControlStatusResult {
            phase: phase_name(inner.tournament.phase).to_string(),
            current_round: inner.tournament.current_round,
            total_rounds: inner.tournament.total_rounds(),
        }
    }
}

fn phase_name(phase: domain::Phase) -> &'static str {
    match phase {
        domain::Phase::RegistrationOpen => "REGISTRATION_OPEN",
        domain::Phase::Scheduled => "SCHEDULED",
        domain::Phase::RunningRound => "RUNNING_ROUND",
        domain::Phase::BetweenRounds => "BETWEEN_ROUNDS",
        domain::Phase::Complete => "COMPLETE",
    }
}

fn view_of(entry: &StandingsEntry) -> StandingsEntryView {
    StandingsEntryView {
        player_id: entry.player_id.clone(),
        wins: entry.wins,
        losses: entry.losses,
        draws: entry.draws,
        points: entry.points(),
        games_played: entry.games_played,
        rank: entry.rank,
    }
}

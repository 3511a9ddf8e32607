use dashmap::DashMap;
use event_bus::{BreakerState as PublicBreakerState, EventBus, LeagueEvent};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Closed,
    Open,
    HalfOpen,
}

impl From<State> for PublicBreakerState {
    fn from(s: State) -> Self {
        match s {
            State::Closed => PublicBreakerState::Closed,
            State::Open => PublicBreakerState::Open,
            State::HalfOpen => PublicBreakerState::HalfOpen,
        }
    }
}

struct TargetState {
    state: State,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

impl Default for TargetState {
    fn default() -> Self {
        TargetState {
            state: State::Closed,
            consecutive_failures: 0,
            opened_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BreakerConfig {
    pub failure_threshold: u32,
    pub cooldown: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        BreakerConfig {
            failure_threshold: 5,
            cooldown: Duration::from_secs(30),
        }
    }
}

/// One consecutive-failure counter per outbound target (peer endpoint).
/// Opens after `failure_threshold` consecutive failures, fails fast for
/// `cooldown`, then allows exactly one half-open trial call.
pub struct CircuitBreaker {
    config: BreakerConfig,
    targets: DashMap<String, Arc<Mutex<TargetState>>>,
    events: Option<Arc<dyn EventBus>>,
    tournament_id: String,
}

pub enum Admission {
    Allowed,
    Rejected,
}

impl CircuitBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        CircuitBreaker {
            config,
            targets: DashMap::new(),
            events: None,
            tournament_id: String::new(),
        }
    }

    pub fn with_event_bus(mut self, events: Arc<dyn EventBus>, tournament_id: impl Into<String>) -> Self {
        self.events = Some(events);
        self.tournament_id = tournament_id.into();
        self
    }

    fn entry(&self, target: &str) -> Arc<Mutex<TargetState>> {
        self.targets
            .entry(target.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(TargetState::default())))
            .clone()
    }

    /// Call before attempting a request. `Rejected` means fail fast without
    /// touching the network.
    pub async fn admit(&self, target: &str) -> Admission {
        let cell = self.entry(target);
        let mut guard = cell.lock().await;
        match guard.state {
            State::Closed => Admission::Allowed,
            State::HalfOpen => Admission::Rejected, // a trial call is already in flight conceptually
            State::Open => {
                let opened_at = guard.opened_at.expect("open state always records opened_at");
                if opened_at.elapsed() >= self.config.cooldown {
                    guard.state = State::HalfOpen;
                    drop(guard);
                    self.publish(target, State::HalfOpen).await;
                    Admission::Allowed
                } else {
                    Admission::Rejected
                }
            }
        }
    }

    pub async fn record_success(&self, target: &str) {
        let cell = self.entry(target);
        let mut guard = cell.lock().await;
        let was_open = !matches!(guard.state, State::Closed);
        guard.state = State::Closed;
        guard.consecutive_failures = 0;
        guard.opened_at = None;
        drop(guard);
        if was_open {
            self.publish(target, State::Closed).await;
        }
    }

    pub async fn record_failure(&self, target: &str) {
        let cell = self.entry(target);
        let mut guard = cell.lock().await;
        match guard.state {
            State::HalfOpen => {
                guard.state = State::Open;
                guard.opened_at = Some(Instant::now());
                drop(guard);
                self.publish(target, State::Open).await;
            }
            State::Closed => {
                guard.consecutive_failures += 1;
                if guard.consecutive_failures >= self.config.failure_threshold {
                    guard.state = State::Open;
                    guard.opened_at = Some(Instant::now());
                    drop(guard);
                    self.publish(target, State::Open).await;
                }
            }
            State::Open => {}
        }
    }

    async fn publish(&self, target: &str, state: State) {
        if let Some(events) = &self.events {
            events
                .publish(
                    &self.tournament_id,
                    LeagueEvent::BreakerStateChanged {
                        target: target.to_string(),
                        state: state.into(),
                    },
                )
                .await;
        }
    }
}

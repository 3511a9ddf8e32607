//! In-process pub/sub for tournament lifecycle events. Lets `league_manager`
//! expose an `SSE` feed without threading observer callbacks through every
//! dispatcher and ingestion path.

mod bus;
mod event;

pub use bus::{EventBus, EventStream, InMemoryEventBus};
pub use event::{BreakerState, DegradedMatch, LeagueEvent};

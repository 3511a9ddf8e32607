//! Outbound call plumbing shared by every agent that talks to a peer: a
//! deadline table keyed by call kind, exponential-backoff retry for
//! transport failures, and a per-target circuit breaker.

mod breaker;
mod call_kind;
mod client;
mod retry;

pub use breaker::{Admission, BreakerConfig, CircuitBreaker};
pub use call_kind::CallKind;
pub use client::RpcClient;
pub use retry::RetryPolicy;

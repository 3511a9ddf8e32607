//! HTTP server scaffolding shared by the league manager, referee, and
//! player binaries: tracing setup, agent configuration, the envelope
//! decode-and-authenticate extractor, the health endpoint, and the
//! error-kind-to-HTTP-status mapping.

mod config;
mod envelope_extractor;
mod error_mapping;
mod health;
mod tracing_setup;

pub use config::AgentConfig;
pub use envelope_extractor::{respond, DecodedCall, RpcErrorResponse, TokenVerifier};
pub use error_mapping::status_for;
pub use health::health;
pub use tracing_setup::init_tracing;

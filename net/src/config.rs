use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

/// Process-level configuration every agent needs: where it binds, how
/// peers should reach it, and the bearer token it was issued (or, for the
/// league manager, the token namespace it issues to others). Loading reads
/// environment variables via `dotenvy::dotenv()` first, then `env::var`
/// with `anyhow::Context`.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub bind_addr: SocketAddr,
    pub public_endpoint: String,
    pub league_manager_endpoint: Option<String>,
    pub auth_token: Option<String>,
}

impl AgentConfig {
    /// Reads `BIND_ADDR`, `PUBLIC_ENDPOINT`, `LEAGUE_MANAGER_ENDPOINT`
    /// (optional), and `AUTH_TOKEN` (optional) from the environment.
    /// `.env`, if present, is loaded first and never overrides an already-set
    /// variable.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .context("BIND_ADDR must be set")?
            .parse()
            .context("BIND_ADDR must be a valid socket address")?;
        let public_endpoint = env::var("PUBLIC_ENDPOINT").context("PUBLIC_ENDPOINT must be set")?;
        let league_manager_endpoint = env::var("LEAGUE_MANAGER_ENDPOINT").ok();
        let auth_token = env::var("AUTH_TOKEN").ok();

        Ok(AgentConfig {
            bind_addr,
            public_endpoint,
            league_manager_endpoint,
            auth_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bind_addr_is_a_context_ed_error() {
        // SAFETY: test runs single-threaded within this process only for
        // this assertion's lifetime of env mutation.
        unsafe {
            env::remove_var("BIND_ADDR");
        }
        let err = AgentConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
    }
}

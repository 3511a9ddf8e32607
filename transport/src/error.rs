//! Error taxonomy. Kinds, not type names: every domain failure in
//! the system is one of these, each with a stable JSON-RPC error code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The complete, closed set of error kinds the core can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    // --- transport ---
    #[error("connection refused")]
    ConnectionRefused,
    #[error("call timed out")]
    Timeout,
    #[error("malformed message")]
    MalformedMessage,
    #[error("protocol version mismatch")]
    ProtocolVersionMismatch,
    #[error("authentication failed")]
    AuthFailed,

    // --- registration ---
    #[error("league is full")]
    LeagueFull,
    #[error("registration is closed")]
    RegistrationClosed,
    #[error("already registered")]
    AlreadyRegistered,
    #[error("duplicate referee id")]
    DuplicateRefereeId,
    #[error("unsupported game")]
    UnsupportedGame,

    // --- dispatch ---
    #[error("referee capacity exceeded")]
    CapacityExceeded,
    #[error("no referees available")]
    NoRefereesAvailable,
    #[error("no players registered")]
    NoPlayersRegistered,

    // --- match ---
    #[error("match not found")]
    MatchNotFound,
    #[error("invite rejected")]
    InviteRejected,
    #[error("invite timed out")]
    InviteTimeout,
    #[error("move timed out")]
    MoveTimeout,
    #[error("invalid move")]
    InvalidMove,
    #[error("duplicate move")]
    DuplicateMove,
    #[error("game already started")]
    GameAlreadyStarted,
    #[error("unknown game")]
    UnknownGame,
    #[error("match already reported")]
    MatchAlreadyReported,

    // --- controller ---
    #[error("invalid tournament phase for this call")]
    InvalidPhase,
    #[error("standings inconsistency")]
    StandingsInconsistency,
}

impl ErrorKind {
    /// Stable numeric JSON-RPC error code. Transport codes live in the
    /// reserved `-32000..-32099` server-error band; domain codes use a
    /// private `-33xxx` band partitioned by taxonomy section.
    pub fn code(&self) -> i64 {
        use ErrorKind::*;
        match self {
            ConnectionRefused => -32000,
            Timeout => -32001,
            MalformedMessage => -32700,
            ProtocolVersionMismatch => -32002,
            AuthFailed => -32003,

            LeagueFull => -33100,
            RegistrationClosed => -33101,
            AlreadyRegistered => -33102,
            DuplicateRefereeId => -33103,
            UnsupportedGame => -33104,

            CapacityExceeded => -33200,
            NoRefereesAvailable => -33201,
            NoPlayersRegistered => -33202,

            MatchNotFound => -33300,
            InviteRejected => -33301,
            InviteTimeout => -33302,
            MoveTimeout => -33303,
            InvalidMove => -33304,
            DuplicateMove => -33305,
            GameAlreadyStarted => -33306,
            UnknownGame => -33307,
            MatchAlreadyReported => -33308,

            InvalidPhase => -33400,
            StandingsInconsistency => -33401,
        }
    }

    /// Transport-level failures are recovered locally via retry + backoff +
    /// circuit breaker. Domain errors are surfaced as-is.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ErrorKind::ConnectionRefused | ErrorKind::Timeout | ErrorKind::MalformedMessage
        )
    }

    /// Clients MUST NOT retry domain errors. `AuthFailed` and
    /// `ProtocolVersionMismatch` are transport-adjacent but not retryable:
    /// retrying with the same token/tag cannot succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::ConnectionRefused | ErrorKind::Timeout | ErrorKind::MalformedMessage
        )
    }
}

/// An error as it travels the wire: a stable `kind`, a human `message`, and
/// optional structured `data` for debugging.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{kind}: {message}")]
pub struct RpcError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        RpcError {
            kind,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn code(&self) -> i64 {
        self.kind.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_retryable_domain_errors_are_not() {
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(ErrorKind::ConnectionRefused.is_retryable());
        assert!(!ErrorKind::InvalidMove.is_retryable());
        assert!(!ErrorKind::AuthFailed.is_retryable());
    }

    #[test]
    fn error_codes_are_pairwise_distinct() {
        use ErrorKind::*;
        let all = [
            ConnectionRefused,
            Timeout,
            MalformedMessage,
            ProtocolVersionMismatch,
            AuthFailed,
            LeagueFull,
            RegistrationClosed,
            AlreadyRegistered,
            DuplicateRefereeId,
            UnsupportedGame,
            CapacityExceeded,
            NoRefereesAvailable,
            NoPlayersRegistered,
            MatchNotFound,
            InviteRejected,
            InviteTimeout,
            MoveTimeout,
            InvalidMove,
            DuplicateMove,
            GameAlreadyStarted,
            UnknownGame,
            MatchAlreadyReported,
            InvalidPhase,
            StandingsInconsistency,
        ];
        let mut codes: Vec<i64> = all.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}

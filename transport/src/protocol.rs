//! Protocol version negotiation.

use serde::{Deserialize, Serialize};

/// The protocol tag carried on every envelope.
///
/// Agents compare the tag on an inbound call against [`ProtocolTag::CURRENT`]
/// and reject mismatches with `ErrorKind::ProtocolVersionMismatch`. The core
/// only ever speaks one tag; the type stays open (a `String`, not a fixed
/// enum) so a future `league.v2` rollout doesn't require changing every
/// payload type, only the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolTag(pub String);

impl ProtocolTag {
    pub const CURRENT: &'static str = "league.v1";

    pub fn current() -> Self {
        ProtocolTag(Self::CURRENT.to_string())
    }

    pub fn is_current(&self) -> bool {
        self.0 == Self::CURRENT
    }
}

impl std::fmt::Display for ProtocolTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProtocolTag {
    fn from(s: &str) -> Self {
        ProtocolTag(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_tag_is_recognized() {
        assert!(ProtocolTag::current().is_current());
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(!ProtocolTag::from("league.v99").is_current());
    }
}

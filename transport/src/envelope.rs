//! The envelope wrapping every tool call's payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `protocol`, `message_id`, `sender`, `timestamp`, `auth_token`, `payload`.
/// `auth_token` is omitted only for the initial registration calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<P> {
    pub protocol: String,
    pub message_id: Uuid,
    pub sender: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub auth_token: Option<String>,
    pub payload: P,
}

impl<P> Envelope<P> {
    pub fn new(sender: impl Into<String>, auth_token: Option<String>, payload: P) -> Self {
        Envelope {
            protocol: crate::ProtocolTag::current().0,
            message_id: Uuid::new_v4(),
            sender: sender.into(),
            timestamp: Utc::now(),
            auth_token,
            payload,
        }
    }

    /// Replace the payload, keeping the envelope's header fields.
    pub fn map_payload<Q>(self, payload: Q) -> Envelope<Q> {
        Envelope {
            protocol: self.protocol,
            message_id: self.message_id,
            sender: self.sender,
            timestamp: self.timestamp,
            auth_token: self.auth_token,
            payload,
        }
    }
}

/// Parses `"<role>:<id>"` sender tags (e.g. `"referee:R01"`).
pub fn parse_sender(sender: &str) -> Option<(&str, &str)> {
    sender.split_once(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_round_trips_through_json() {
        let env = Envelope::new("player:P01", Some("tok".to_string()), 42u32);
        let json = serde_json::to_string(&env).unwrap();
        let back: Envelope<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.payload, 42);
        assert_eq!(back.sender, "player:P01");
        assert_eq!(back.auth_token.as_deref(), Some("tok"));
    }

    #[test]
    fn sender_tag_parses_role_and_id() {
        assert_eq!(parse_sender("referee:R01"), Some(("referee", "R01")));
        assert_eq!(parse_sender("garbage"), None);
    }
}

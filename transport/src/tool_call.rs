//! The closed tagged variant over every tool call the system accepts,
//! resolved from a raw JSON-RPC request by method name: the method name
//! selects the variant, decoded once at the HTTP boundary.

use crate::envelope::Envelope;
use crate::error::{ErrorKind, RpcError};
use crate::jsonrpc::RawRpcRequest;
use crate::payload::*;

macro_rules! tool_calls {
    ($( $const_name:ident, $variant:ident => $method:literal : $params:ty ),+ $(,)?) => {
        /// Method name constants, one per tool exposed anywhere in the
        /// system (LM, REF, or PLY).
        pub mod method {
            $( pub const $const_name: &str = $method; )+
        }

        /// One variant per tool call, each carrying the fully-typed envelope
        /// for that call.
        #[derive(Debug, Clone)]
        pub enum ToolCall {
            $( $variant(Envelope<$params>), )+
        }

        impl ToolCall {
            /// Decode a raw request (method name + envelope with a
            /// still-generic `payload: Value`) into the one matching
            /// variant, or a `MalformedMessage`/unknown-method error.
            pub fn decode(request: RawRpcRequest) -> Result<Self, RpcError> {
                let RawRpcRequest { method, params, .. } = request;
                match method.as_str() {
                    $(
                        $method => {
                            let payload: $params = serde_json::from_value(params.payload)
                                .map_err(|e| RpcError::new(
                                    ErrorKind::MalformedMessage,
                                    format!("invalid payload for {}: {e}", $method),
                                ))?;
                            Ok(ToolCall::$variant(params.map_payload(payload)))
                        }
                    )+
                    other => Err(RpcError::new(
                        ErrorKind::MalformedMessage,
                        format!("unknown method: {other}"),
                    )),
                }
            }

            pub fn method_name(&self) -> &'static str {
                match self {
                    $( ToolCall::$variant(_) => $method, )+
                }
            }
        }
    };
}

tool_calls! {
    REGISTER_PLAYER, RegisterPlayer => "register_player": RegisterPlayerParams,
    REGISTER_REFEREE, RegisterReferee => "register_referee": RegisterRefereeParams,
    REPORT_MATCH_RESULT, ReportMatchResult => "report_match_result": ReportMatchResultParams,
    GET_STANDINGS, GetStandings => "get_standings": GetStandingsParams,
    START_LEAGUE, StartLeague => "start_league": StartLeagueParams,
    RUN_NEXT_ROUND, RunNextRound => "run_next_round": RunNextRoundParams,
    RUN_ALL_ROUNDS, RunAllRounds => "run_all_rounds": RunAllRoundsParams,
    ASSIGN_MATCH, AssignMatch => "assign_match": AssignMatchParams,
    CANCEL_MATCH, CancelMatch => "cancel_match": CancelMatchParams,
    GAME_INVITE, GameInvite => "game_invite": GameInviteParams,
    REQUEST_MOVE, RequestMove => "request_move": RequestMoveParams,
    ROUND_RESULT, RoundResult => "round_result": RoundResultParams,
    GAME_OVER, GameOver => "game_over": GameOverParams,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;
    use crate::jsonrpc::RpcRequest;
    use serde_json::json;

    #[test]
    fn decodes_known_method_into_matching_variant() {
        let envelope = Envelope::new(
            "player:P01",
            None,
            json!({
                "display_name": "Ada",
                "endpoint": "http://127.0.0.1:8100/mcp",
                "supported_games": ["even_odd"],
                "version": "1.0",
            }),
        );
        let request = RpcRequest::new(method::REGISTER_PLAYER, envelope, json!(1));
        let call = ToolCall::decode(request).unwrap();
        assert_eq!(call.method_name(), "register_player");
        assert!(matches!(call, ToolCall::RegisterPlayer(_)));
    }

    #[test]
    fn unknown_method_is_malformed() {
        let envelope = Envelope::new("player:P01", None, json!({}));
        let request = RpcRequest::new("not_a_real_method", envelope, json!(1));
        let err = ToolCall::decode(request).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedMessage);
    }

    #[test]
    fn mismatched_payload_shape_is_malformed() {
        let envelope = Envelope::new("player:P01", None, json!({"nonsense": true}));
        let request = RpcRequest::new(method::REGISTER_PLAYER, envelope, json!(1));
        let err = ToolCall::decode(request).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedMessage);
    }
}

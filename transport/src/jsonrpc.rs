//! JSON-RPC 2.0 request/response framing.

use crate::envelope::Envelope;
use crate::error::RpcError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest<P> {
    pub jsonrpc: String,
    pub method: String,
    pub params: Envelope<P>,
    pub id: Value,
}

impl<P> RpcRequest<P> {
    pub fn new(method: impl Into<String>, params: Envelope<P>, id: Value) -> Self {
        RpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// The wire shape of a request before the method-keyed payload has been
/// resolved to its concrete type: `params.payload` stays a raw [`Value`]
/// until [`crate::tool_call::ToolCall::decode`] looks at `method` and
/// decodes once at the HTTP boundary.
pub type RawRpcRequest = RpcRequest<Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse<T> {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<RpcError>,
    pub id: Value,
}

impl<T> RpcResponse<T> {
    pub fn success(result: T, id: Value) -> Self {
        RpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn failure(error: RpcError, id: Value) -> Self {
        RpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    pub fn into_result(self) -> Result<T, RpcError> {
        match (self.result, self.error) {
            (Some(r), _) => Ok(r),
            (None, Some(e)) => Err(e),
            (None, None) => Err(RpcError::new(
                crate::error::ErrorKind::MalformedMessage,
                "response carries neither result nor error",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn success_response_round_trips() {
        let resp = RpcResponse::success(7u32, Value::from(1));
        let json = serde_json::to_string(&resp).unwrap();
        let back: RpcResponse<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_result().unwrap(), 7);
    }

    #[test]
    fn failure_response_round_trips() {
        let resp: RpcResponse<u32> =
            RpcResponse::failure(RpcError::new(ErrorKind::InvalidMove, "bad move"), Value::from(2));
        let json = serde_json::to_string(&resp).unwrap();
        let back: RpcResponse<u32> = serde_json::from_str(&json).unwrap();
        let err = back.into_result().unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidMove);
    }
}

use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use transport::{ErrorKind, ProtocolTag, RawRpcRequest, RpcError, RpcResponse, ToolCall};

use crate::error_mapping::status_for;

/// Anything an agent's server state can use to decide whether a bearer
/// token is acceptable for a given method. Registration methods (e.g.
/// `register_player`, `register_referee`) are exempt by convention -- the
/// caller has no token yet.
pub trait TokenVerifier {
    fn verify(&self, method: &str, token: Option<&str>) -> bool;
}

const EXEMPT_METHODS: &[&str] = &[
    transport::method::REGISTER_PLAYER,
    transport::method::REGISTER_REFEREE,
];

/// The "decode once at the HTTP boundary" extractor: parses the JSON-RPC
/// envelope, rejects an unsupported protocol tag, checks the bearer token
/// (skipped for registration calls), and resolves the closed [`ToolCall`]
/// enum -- or fails with a JSON-RPC error response a handler never has to
/// construct by hand. The JSON-RPC `id` travels alongside the call so a
/// handler can echo it back on the `RpcResponse`.
pub struct DecodedCall {
    pub id: Value,
    pub call: ToolCall,
}

pub struct RpcErrorResponse {
    status: StatusCode,
    body: RpcResponse<()>,
}

impl IntoResponse for RpcErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Builds the HTTP response for a handler's `Result<T, RpcError>`, reusing
/// the same status mapping the extractor uses for its own rejections so a
/// peer sees one consistent status-to-kind convention regardless of where
/// in the pipeline the error originated.
pub fn respond<T: Serialize>(id: Value, result: Result<T, RpcError>) -> Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(RpcResponse::success(value, id))).into_response(),
        Err(error) => {
            let status = status_for(error.kind);
            (status, Json(RpcResponse::failure(error, id))).into_response()
        }
    }
}

fn reject(id: serde_json::Value, error: RpcError) -> RpcErrorResponse {
    RpcErrorResponse {
        status: status_for(error.kind),
        body: RpcResponse::failure(error, id),
    }
}

impl<S> FromRequest<S> for DecodedCall
where
    S: TokenVerifier + Send + Sync,
{
    type Rejection = RpcErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw): Json<RawRpcRequest> = Json::from_request(req, state)
            .await
            .map_err(|e| reject(json!(null), RpcError::new(ErrorKind::MalformedMessage, e.to_string())))?;

        let id = raw.id.clone();

        let tag = ProtocolTag::from(raw.params.protocol.as_str());
        if !tag.is_current() {
            return Err(reject(
                id,
                RpcError::new(
                    ErrorKind::ProtocolVersionMismatch,
                    format!("unsupported protocol tag: {tag}"),
                ),
            ));
        }

        if !EXEMPT_METHODS.contains(&raw.method.as_str())
            && !state.verify(&raw.method, raw.params.auth_token.as_deref())
        {
            return Err(reject(id, RpcError::new(ErrorKind::AuthFailed, "invalid or missing auth token")));
        }

        let tool_call = ToolCall::decode(raw).map_err(|e| reject(id.clone(), e))?;
        Ok(DecodedCall { id, call: tool_call })
    }
}

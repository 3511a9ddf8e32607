//! Wire protocol: JSON-RPC 2.0 envelope, the closed set of tool payloads,
//! and the error taxonomy. No networking here; agents
//! use this crate to agree on what bytes mean, `net` and `rpc_client` move
//! the bytes.

mod envelope;
mod error;
mod jsonrpc;
mod payload;
mod protocol;
mod tool_call;

pub use envelope::{parse_sender, Envelope};
pub use error::{ErrorKind, RpcError};
pub use jsonrpc::{RawRpcRequest, RpcRequest, RpcResponse, JSONRPC_VERSION};
pub use payload::*;
pub use protocol::ProtocolTag;
pub use tool_call::{method, ToolCall};

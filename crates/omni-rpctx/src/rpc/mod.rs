//! JSON-RPC surface: parameter parsing, method registry and dispatch.

pub mod handler;
pub mod methods;
pub mod params;

pub use handler::{JsonRpcId, JsonRpcRequest, JsonRpcResponse, TxRpcHandler};
pub use methods::{get_method_info, is_method_supported, MethodInfo, METHOD_REGISTRY};

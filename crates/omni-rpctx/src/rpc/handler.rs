//! JSON-RPC entry point for the transaction commands.

use super::methods::get_method_info;
use crate::domain::{codes, RpcErrorObject, RpcTxError};
use crate::ports::inbound::TxCommandApi;
use crate::ports::outbound::PropertyRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// JSON-RPC request ID: string or number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcId {
    String(String),
    Number(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<JsonRpcId>,
}

fn default_version() -> String {
    "2.0".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
    pub id: Option<JsonRpcId>,
}

impl JsonRpcResponse {
    fn from_result(id: Option<JsonRpcId>, result: Result<String, RpcErrorObject>) -> Self {
        let (result, error) = match result {
            Ok(r) => (Some(r), None),
            Err(e) => (None, Some(e)),
        };
        Self {
            jsonrpc: default_version(),
            result,
            error,
            id,
        }
    }
}

/// Parses params, runs the command and renders the single response string.
pub struct TxRpcHandler {
    api: Arc<dyn TxCommandApi>,
    registry: Arc<dyn PropertyRegistry>,
}

impl TxRpcHandler {
    /// `registry` resolves property divisibility while parsing amounts.
    pub fn new(api: Arc<dyn TxCommandApi>, registry: Arc<dyn PropertyRegistry>) -> Self {
        Self { api, registry }
    }

    #[instrument(skip(self, params), fields(param_count = params.len()))]
    pub fn handle(&self, method: &str, params: &[Value]) -> Result<String, RpcErrorObject> {
        let Some(info) = get_method_info(method) else {
            warn!("unknown method");
            return Err(RpcErrorObject::method_not_found(method));
        };

        let request = info
            .parse_params(params, self.registry.as_ref())
            .map_err(|e| {
                debug!(error = %e, "parameter rejected");
                RpcTxError::from(e).to_rpc_error()
            })?;

        self.api
            .execute(request)
            .map(|outcome| outcome.to_response())
            .map_err(RpcErrorObject::from)
    }

    /// Full request/response envelope.
    pub fn handle_request(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let result = match &request.params {
            Value::Array(params) => self.handle(&request.method, params),
            Value::Null => self.handle(&request.method, &[]),
            _ => Err(RpcErrorObject::new(
                codes::INVALID_PARAMS,
                "Params must be a positional array",
            )),
        };
        JsonRpcResponse::from_result(request.id.clone(), result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLedger;
    use crate::domain::{PropertyDescriptor, RpcTxConfig};
    use crate::ports::outbound::{MockBuilder, MockEncoder};
    use crate::service::{CommandPorts, TxCommandService};
    use omni_types::{Address, PropertyId};
    use serde_json::json;

    fn handler() -> (TxRpcHandler, Arc<InMemoryLedger>) {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.register_property(PropertyDescriptor::new(
            PropertyId(3),
            "Quantum",
            true,
            Address::from("1Issuer"),
        ));
        let ports = CommandPorts::with_ledger(
            Arc::new(MockEncoder::default()),
            Arc::new(MockBuilder::succeeding()),
            ledger.clone(),
        );
        let service = Arc::new(TxCommandService::from_config(RpcTxConfig::default(), ports));
        (TxRpcHandler::new(service, ledger.clone()), ledger)
    }

    #[test]
    fn test_unknown_method() {
        let (handler, _) = handler();
        let err = handler.handle("omni_sendall", &[]).unwrap_err();
        assert_eq!(err.code, codes::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_parameter_error_code() {
        let (handler, _) = handler();
        let err = handler
            .handle("omni_send", &[json!("1A"), json!("1B"), json!(0), json!("1")])
            .unwrap_err();
        assert_eq!(err.code, codes::RPC_INVALID_PARAMETER);
    }

    #[test]
    fn test_send_returns_txid() {
        let (handler, ledger) = handler();
        ledger.set_balance(&Address::from("1A"), PropertyId(3), 500_000_000);

        let txid = handler
            .handle("omni_send", &[json!("1A"), json!("1B"), json!(3), json!("1.0")])
            .unwrap();
        assert_eq!(txid.len(), 64);
        assert_eq!(ledger.pending_count(), 1);
    }

    #[test]
    fn test_validation_error_in_envelope() {
        let (handler, _) = handler();
        let request: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "method": "omni_send",
            "params": ["1A", "1B", 3, "1.0"],
            "id": 7
        }))
        .unwrap();

        let response = handler.handle_request(&request);
        assert_eq!(response.id, Some(JsonRpcId::Number(7)));
        assert!(response.result.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code, codes::RPC_TYPE_ERROR);
        assert_eq!(error.message, "Sender has insufficient balance");
    }

    #[test]
    fn test_named_params_rejected() {
        let (handler, _) = handler();
        let request = JsonRpcRequest {
            jsonrpc: "2.0".into(),
            method: "omni_send".into(),
            params: json!({"from": "1A"}),
            id: None,
        };
        let response = handler.handle_request(&request);
        assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);
    }
}

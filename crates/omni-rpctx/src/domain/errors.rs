//! Error types for the transaction command subsystem.
//!
//! | Layer | Type | Raised by |
//! |-------|------|-----------|
//! | Parameters | `ParameterError` | `rpc::params`, before the pipeline |
//! | Business rules | `ValidationFailure` | `domain::rules` |
//! | Wallet | `BuilderFailure` | `TransactionBuilder` port |
//!
//! All three fold into `RpcTxError`, which maps to a JSON-RPC error object.

use omni_types::{Address, AmountError, PropertyId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON-RPC error codes used by the base node.
pub mod codes {
    /// Unexpected type or failed business rule.
    pub const RPC_TYPE_ERROR: i32 = -3;
    /// Invalid, missing or duplicate parameter.
    pub const RPC_INVALID_PARAMETER: i32 = -8;
    /// JSON-RPC 2.0 unknown method.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// JSON-RPC 2.0 wrong arity.
    pub const INVALID_PARAMS: i32 = -32602;
}

/// Wallet builder result codes with known meanings.
pub mod builder_codes {
    pub const WALLET_ACCESS: i32 = -205;
    pub const INPUT_SELECTION: i32 = -206;
    pub const CREATE_TX: i32 = -211;
    pub const COMMIT_TX: i32 = -213;
    pub const REDEMPTION_BAD_KEY_ID: i32 = -220;
    pub const REDEMPTION_FETCH_PUBKEY: i32 = -221;
    pub const REDEMPTION_INVALID_PUBKEY: i32 = -222;
    pub const REDEMPTION_BAD_VALIDATION: i32 = -223;
    pub const PAYLOAD_TOO_LARGE: i32 = -224;
}

/// Which balance fell short in a sufficient-balance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceShortfall {
    /// Confirmed balance is below the amount.
    Confirmed,
    /// Confirmed balance suffices, but pending outgoing transactions do not
    /// leave enough available.
    Pending,
}

/// A failed business rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// Reference output above the sanity ceiling.
    #[error("Invalid reference amount: {amount} exceeds {ceiling}")]
    InvalidReferenceAmount { amount: i64, ceiling: i64 },

    #[error("{}", insufficient_balance_message(.shortfall))]
    InsufficientBalance {
        shortfall: BalanceShortfall,
        required: i64,
        balance: i64,
    },

    #[error("Property name must not be empty")]
    InvalidPropertyName,

    /// Only the base currency pair may be offered or accepted on the DEx.
    #[error("Invalid property {0} for sale - only 1 and 2 are permitted")]
    InvalidProperty(PropertyId),

    #[error("Property {0} does not exist")]
    PropertyNotFound(PropertyId),

    #[error("The specified property {0} does not have a crowdsale active")]
    NoActiveCrowdsale(PropertyId),

    #[error("Sender {sender} is not authorized to manage property {property}")]
    NotAuthorized { sender: Address, property: PropertyId },

    /// Zero where a positive amount is required.
    #[error("Invalid {field}")]
    InvalidAmount { field: &'static str },

    #[error("{field} not in range")]
    AmountOutOfRange { field: &'static str },

    #[error("Property for sale and property desired must be in the same ecosystem")]
    EcosystemMismatch {
        for_sale: PropertyId,
        desired: PropertyId,
    },

    #[error("Property for sale and property desired must be different")]
    SameProperty(PropertyId),

    #[error("There is already a sell offer from {seller} on property {property}, use update instead")]
    DuplicateOffer { seller: Address, property: PropertyId },

    #[error("There is no matching sell offer from {seller} on property {property}")]
    NoMatchingOffer { seller: Address, property: PropertyId },

    /// The offer passed the existence check but could not be loaded.
    #[error("Unable to load sell offer from {seller} on property {property}")]
    OfferUnavailable { seller: Address, property: PropertyId },

    #[error("Unsafe trade protection - minimum accept fee {fee} is above {ceiling}")]
    UnsafeAcceptFee { fee: i64, ceiling: i64 },

    #[error("Unsafe trade protection - payment time limit {blocks} is less than {minimum} blocks")]
    UnsafePaymentWindow { blocks: u8, minimum: u8 },
}

fn insufficient_balance_message(shortfall: &BalanceShortfall) -> &'static str {
    match shortfall {
        BalanceShortfall::Confirmed => "Sender has insufficient balance",
        BalanceShortfall::Pending => {
            "Sender has insufficient balance (due to pending transactions)"
        }
    }
}

impl ValidationFailure {
    /// JSON-RPC code the failure is reported with.
    pub fn rpc_code(&self) -> i32 {
        match self {
            Self::InvalidProperty(_)
            | Self::PropertyNotFound(_)
            | Self::EcosystemMismatch { .. }
            | Self::SameProperty(_) => codes::RPC_INVALID_PARAMETER,
            _ => codes::RPC_TYPE_ERROR,
        }
    }
}

/// A raw argument that could not be turned into a typed field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("Expected between {min} and {max} parameters, got {got}")]
    Arity { min: usize, max: usize, got: usize },

    #[error("Invalid {field}: expected {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Invalid address")]
    InvalidAddress,

    #[error("Property identifier is out of range")]
    PropertyIdOutOfRange,

    #[error("Property identifier does not exist")]
    PropertyDoesNotExist,

    #[error("Property appreciation can only take place with a previous property of 0")]
    PreviousIdNotSupported,

    #[error("Invalid {field}: {source}")]
    Amount {
        field: &'static str,
        source: AmountError,
    },

    #[error("Invalid {field}: amount must be positive")]
    NonPositiveAmount { field: &'static str },

    #[error("{field} must not be longer than {max} characters")]
    TextTooLong { field: &'static str, max: usize },

    #[error("{field} out of range: {detail}")]
    OutOfRange { field: &'static str, detail: String },
}

impl ParameterError {
    pub fn rpc_code(&self) -> i32 {
        match self {
            Self::Arity { .. } => codes::INVALID_PARAMS,
            Self::WrongType { .. } | Self::Amount { .. } | Self::NonPositiveAmount { .. } => {
                codes::RPC_TYPE_ERROR
            }
            _ => codes::RPC_INVALID_PARAMETER,
        }
    }
}

/// Non-zero result from the wallet transaction builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", builder_message(.code))]
pub struct BuilderFailure {
    pub code: i32,
}

impl BuilderFailure {
    pub fn new(code: i32) -> Self {
        Self { code }
    }

    pub fn message(&self) -> &'static str {
        builder_message(&self.code)
    }
}

fn builder_message(code: &i32) -> &'static str {
    use builder_codes::*;
    match *code {
        WALLET_ACCESS => "Error with wallet access",
        INPUT_SELECTION => "Error choosing inputs for the send transaction",
        CREATE_TX => "Error creating transaction",
        COMMIT_TX => "Error committing transaction",
        REDEMPTION_BAD_KEY_ID => "Error with redemption address key id",
        REDEMPTION_FETCH_PUBKEY => "Error fetching public key for redemption address",
        REDEMPTION_INVALID_PUBKEY => "Redemption address public key is invalid",
        REDEMPTION_BAD_VALIDATION => "Error with redemption address",
        PAYLOAD_TOO_LARGE => "Payload is too large for the transaction class",
        _ => "Unknown error",
    }
}

/// Error surfaced by any command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcTxError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error(transparent)]
    Builder(#[from] BuilderFailure),
}

impl RpcTxError {
    pub fn rpc_code(&self) -> i32 {
        match self {
            Self::Parameter(e) => e.rpc_code(),
            Self::Validation(e) => e.rpc_code(),
            Self::Builder(e) => e.code,
        }
    }

    pub fn to_rpc_error(&self) -> RpcErrorObject {
        RpcErrorObject::new(self.rpc_code(), self.to_string())
    }
}

/// Result type for command operations.
pub type RpcTxResult<T> = Result<T, RpcTxError>;

/// JSON-RPC error object returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i32,
    pub message: String,
}

impl RpcErrorObject {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(codes::METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }
}

impl From<RpcTxError> for RpcErrorObject {
    fn from(e: RpcTxError) -> Self {
        e.to_rpc_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_balance_messages() {
        let confirmed = ValidationFailure::InsufficientBalance {
            shortfall: BalanceShortfall::Confirmed,
            required: 10,
            balance: 5,
        };
        let pending = ValidationFailure::InsufficientBalance {
            shortfall: BalanceShortfall::Pending,
            required: 10,
            balance: 5,
        };
        assert_eq!(confirmed.to_string(), "Sender has insufficient balance");
        assert!(pending.to_string().contains("pending transactions"));
    }

    #[test]
    fn test_validation_codes() {
        assert_eq!(
            ValidationFailure::InvalidProperty(PropertyId(3)).rpc_code(),
            codes::RPC_INVALID_PARAMETER
        );
        assert_eq!(
            ValidationFailure::InvalidPropertyName.rpc_code(),
            codes::RPC_TYPE_ERROR
        );
    }

    #[test]
    fn test_builder_failure_keeps_its_code() {
        let err: RpcTxError = BuilderFailure::new(builder_codes::INPUT_SELECTION).into();
        assert_eq!(err.rpc_code(), -206);
        assert!(err.to_string().contains("inputs"));
        assert_eq!(BuilderFailure::new(-1).message(), "Unknown error");
    }

    #[test]
    fn test_rpc_error_object_serialization() {
        let err: RpcTxError = ValidationFailure::SameProperty(PropertyId(5)).into();
        let json = serde_json::to_value(err.to_rpc_error()).unwrap();
        assert_eq!(json["code"], -8);
        assert!(json["message"].as_str().unwrap().contains("different"));
    }

    #[test]
    fn test_parameter_error_codes() {
        assert_eq!(
            ParameterError::Arity { min: 2, max: 2, got: 1 }.rpc_code(),
            codes::INVALID_PARAMS
        );
        assert_eq!(
            ParameterError::InvalidAddress.rpc_code(),
            codes::RPC_INVALID_PARAMETER
        );
    }
}

//! # Error Types
//!
//! Errors raised while converting textual input into protocol primitives.

use thiserror::Error;

/// Errors from parsing decimal amount strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Empty input.
    #[error("Amount is empty")]
    Empty,

    /// Non-digit characters, a sign, or more than one decimal point.
    #[error("Invalid amount format: {0}")]
    Malformed(String),

    /// More fractional digits than the token type allows.
    #[error("Too many decimal places: {places} (max {max})")]
    TooManyDecimals { places: usize, max: usize },

    /// Value does not fit the protocol's 8-byte signed range.
    #[error("Amount out of range: {0}")]
    Overflow(String),
}

/// Errors from decoding other primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("Invalid transaction id: {0}")]
    InvalidTxId(String),
}

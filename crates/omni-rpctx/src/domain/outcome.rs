//! Result of a successful build.

use omni_types::TxId;
use serde::{Deserialize, Serialize};

/// Either a broadcast transaction or an unsigned one, never both.
///
/// Only produced for builder result code zero; non-zero codes become
/// `BuilderFailure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionOutcome {
    /// Signed and broadcast.
    Committed(TxId),
    /// Built but not signed or broadcast; serialized transaction bytes.
    Unsigned(Vec<u8>),
}

impl TransactionOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    pub fn txid(&self) -> Option<TxId> {
        match self {
            Self::Committed(txid) => Some(*txid),
            Self::Unsigned(_) => None,
        }
    }

    /// The single string returned to the caller: txid hex or raw hex.
    pub fn to_response(&self) -> String {
        match self {
            Self::Committed(txid) => txid.to_hex(),
            Self::Unsigned(raw) => hex::encode(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_committed_response_is_txid() {
        let txid = TxId::from_bytes([0x42; 32]);
        let outcome = TransactionOutcome::Committed(txid);
        assert!(outcome.is_committed());
        assert_eq!(outcome.txid(), Some(txid));
        assert_eq!(outcome.to_response(), "42".repeat(32));
    }

    #[test]
    fn test_unsigned_response_is_raw_hex() {
        let outcome = TransactionOutcome::Unsigned(vec![0x01, 0x00, 0xff]);
        assert!(!outcome.is_committed());
        assert_eq!(outcome.txid(), None);
        assert_eq!(outcome.to_response(), "0100ff");
    }
}

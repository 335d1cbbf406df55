//! Outbound (Driven) ports for the transaction command subsystem.
//!
//! These traits define the collaborators the pipeline depends on. All reads
//! are single, consistent-as-of-call-time lookups; the pipeline never
//! writes ledger state.

use crate::domain::{
    BalanceSnapshot, BuilderFailure, CommandPayload, FeePolicy, OfferDescriptor, PendingEntry,
    PropertyDescriptor, TransactionOutcome,
};
use omni_types::{Address, PropertyId};

/// Turns validated payload fields into protocol bytes.
///
/// Total for validated input: every bound the encoder relies on has already
/// been enforced by the rule set.
pub trait PayloadEncoder: Send + Sync {
    fn encode(&self, payload: &CommandPayload) -> Vec<u8>;
}

/// Everything the wallet needs to build one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub sender: Address,
    pub recipient: Option<Address>,
    /// Address able to redeem data outputs; the sender unless one was given.
    pub redeem_address: Address,
    /// Minor units sent to the recipient's reference output.
    pub reference_amount: i64,
    pub payload: Vec<u8>,
    /// Sign and broadcast; when false, return the unsigned encoding.
    pub commit: bool,
}

/// Wallet-side transaction construction.
///
/// # Errors
/// Any non-zero wallet result code, wrapped in `BuilderFailure`.
pub trait TransactionBuilder: Send + Sync {
    /// Builds a transaction under `fees`, committing it if requested.
    ///
    /// Fee decisions must come from `fees`, not from any ambient setting:
    /// during a DEx accept the context's lock is held for this call.
    ///
    /// That lock is not reentrant. An implementation must not call
    /// `FeePolicyContext::current`, `set` or `scoped_override` from here,
    /// or a DEx accept deadlocks on its own guard.
    fn build(
        &self,
        request: &BuildRequest,
        fees: &FeePolicy,
    ) -> Result<TransactionOutcome, BuilderFailure>;
}

/// Sink for optimistic effects of broadcast transactions.
pub trait PendingTracker: Send + Sync {
    fn record(&self, entry: PendingEntry);
}

/// Balance ledger.
pub trait BalanceView: Send + Sync {
    fn balance(&self, address: &Address, property: PropertyId) -> BalanceSnapshot;
}

/// Property registry.
pub trait PropertyRegistry: Send + Sync {
    fn property(&self, id: PropertyId) -> Option<PropertyDescriptor>;

    fn is_crowdsale_active(&self, id: PropertyId) -> bool {
        self.property(id).is_some_and(|sp| sp.crowdsale_active)
    }

    fn is_same_ecosystem(&self, a: PropertyId, b: PropertyId) -> bool {
        a.ecosystem() == b.ecosystem()
    }
}

/// DEx order book.
pub trait DexOrderBook: Send + Sync {
    fn offer(&self, seller: &Address, property: PropertyId) -> Option<OfferDescriptor>;

    fn offer_exists(&self, seller: &Address, property: PropertyId) -> bool {
        self.offer(seller, property).is_some()
    }
}

/// Encoder that records every payload it is asked to encode.
#[cfg(test)]
#[derive(Default)]
pub struct MockEncoder {
    pub encoded: parking_lot::Mutex<Vec<CommandPayload>>,
}

#[cfg(test)]
impl MockEncoder {
    pub fn calls(&self) -> usize {
        self.encoded.lock().len()
    }
}

#[cfg(test)]
impl PayloadEncoder for MockEncoder {
    fn encode(&self, payload: &CommandPayload) -> Vec<u8> {
        self.encoded.lock().push(payload.clone());
        vec![payload.kind().code() as u8]
    }
}

/// Builder returning a fixed result and recording requests and fee policies.
#[cfg(test)]
pub struct MockBuilder {
    pub fail_with: Option<i32>,
    pub requests: parking_lot::Mutex<Vec<(BuildRequest, FeePolicy)>>,
}

#[cfg(test)]
impl MockBuilder {
    pub fn succeeding() -> Self {
        Self {
            fail_with: None,
            requests: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(code: i32) -> Self {
        Self {
            fail_with: Some(code),
            requests: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn last(&self) -> Option<(BuildRequest, FeePolicy)> {
        self.requests.lock().last().cloned()
    }
}

#[cfg(test)]
impl TransactionBuilder for MockBuilder {
    fn build(
        &self,
        request: &BuildRequest,
        fees: &FeePolicy,
    ) -> Result<TransactionOutcome, BuilderFailure> {
        self.requests.lock().push((request.clone(), *fees));
        if let Some(code) = self.fail_with {
            return Err(BuilderFailure::new(code));
        }
        if request.commit {
            Ok(TransactionOutcome::Committed(omni_types::TxId::from_bytes(
                [request.payload.len() as u8; 32],
            )))
        } else {
            Ok(TransactionOutcome::Unsigned(request.payload.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyRegistry;

    impl PropertyRegistry for EmptyRegistry {
        fn property(&self, _id: PropertyId) -> Option<PropertyDescriptor> {
            None
        }
    }

    #[test]
    fn test_default_crowdsale_lookup_on_missing_property() {
        assert!(!EmptyRegistry.is_crowdsale_active(PropertyId(3)));
    }

    #[test]
    fn test_default_ecosystem_comparison() {
        assert!(EmptyRegistry.is_same_ecosystem(PropertyId(1), PropertyId(3)));
        assert!(!EmptyRegistry.is_same_ecosystem(PropertyId(1), PropertyId(2)));
    }

    #[test]
    fn test_mock_builder_respects_commit_flag() {
        let builder = MockBuilder::succeeding();
        let mut request = BuildRequest {
            sender: Address::from("1Sender"),
            recipient: None,
            redeem_address: Address::from("1Sender"),
            reference_amount: 0,
            payload: vec![1, 2, 3],
            commit: true,
        };
        assert!(builder
            .build(&request, &FeePolicy::default())
            .unwrap()
            .is_committed());
        request.commit = false;
        assert_eq!(
            builder.build(&request, &FeePolicy::default()).unwrap(),
            TransactionOutcome::Unsigned(vec![1, 2, 3])
        );
    }
}

//! # Transaction Command Service
//!
//! Runs every command through the same pipeline:
//!
//! ```text
//! request ──→ rules (in order, first failure wins) ──→ encode payload
//!                                                          │
//!            ┌─────────────── build(request, &FeePolicy) ←─┘
//!            │
//!            ├── committed + tracked kind ──→ PendingTracker::record
//!            └──→ TransactionOutcome (txid or raw transaction)
//! ```
//!
//! Only the DEx accept deviates: it builds under a scoped fee override held
//! for the duration of the build.

use crate::domain::rules::{self, RuleResult};
use crate::domain::{
    ChangeIssuerRequest, CloseCrowdsaleRequest, CommandPayload, DexAcceptRequest, DexAction,
    DexSellRequest, FeePolicy, FeePolicyContext, FeeRate, GrantRequest, IssuanceCrowdsaleRequest,
    IssuanceFixedRequest, IssuanceManagedRequest, MetaDexAction, PendingEntry, RevokeRequest,
    RpcTxConfig, RpcTxError, RpcTxResult, SendToOwnersRequest, SimpleSendRequest, TradeRequest,
    TransactionOutcome, ValidationFailure, FEE_RATE_BYTES,
};
use crate::ports::inbound::TxCommandApi;
use crate::ports::outbound::{
    BalanceView, BuildRequest, DexOrderBook, PayloadEncoder, PendingTracker, PropertyRegistry,
    TransactionBuilder,
};
use omni_types::{Address, PropertyId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Collaborators the service drives.
#[derive(Clone)]
pub struct CommandPorts {
    pub encoder: Arc<dyn PayloadEncoder>,
    pub builder: Arc<dyn TransactionBuilder>,
    pub pending: Arc<dyn PendingTracker>,
    pub balances: Arc<dyn BalanceView>,
    pub registry: Arc<dyn PropertyRegistry>,
    pub order_book: Arc<dyn DexOrderBook>,
}

impl CommandPorts {
    /// Uses one ledger for every read port and the pending tracker.
    pub fn with_ledger<L>(
        encoder: Arc<dyn PayloadEncoder>,
        builder: Arc<dyn TransactionBuilder>,
        ledger: Arc<L>,
    ) -> Self
    where
        L: BalanceView + PropertyRegistry + DexOrderBook + PendingTracker + 'static,
    {
        Self {
            encoder,
            builder,
            pending: ledger.clone(),
            balances: ledger.clone(),
            registry: ledger.clone(),
            order_book: ledger,
        }
    }
}

/// Fields of a pending entry known before the build.
struct PendingDraft {
    recipient: Option<Address>,
    property: PropertyId,
    amount: i64,
    property_desired: Option<PropertyId>,
    amount_desired: i64,
    action: u8,
    min_accept_fee: i64,
    payment_window: u8,
}

impl PendingDraft {
    fn transfer(recipient: Option<Address>, property: PropertyId, amount: i64) -> Self {
        Self {
            recipient,
            property,
            amount,
            property_desired: None,
            amount_desired: 0,
            action: 0,
            min_accept_fee: 0,
            payment_window: 0,
        }
    }
}

/// One transaction ready for the builder.
struct Submission<'a> {
    sender: &'a Address,
    recipient: Option<&'a Address>,
    redeem_address: Option<&'a Address>,
    reference_amount: i64,
    payload: CommandPayload,
    pending: Option<PendingDraft>,
}

impl<'a> Submission<'a> {
    fn new(sender: &'a Address, payload: CommandPayload) -> Self {
        Self {
            sender,
            recipient: None,
            redeem_address: None,
            reference_amount: 0,
            payload,
            pending: None,
        }
    }

    fn recipient(mut self, recipient: &'a Address) -> Self {
        self.recipient = Some(recipient);
        self
    }

    fn redeem_address(mut self, redeem: Option<&'a Address>) -> Self {
        self.redeem_address = redeem;
        self
    }

    fn reference_amount(mut self, amount: i64) -> Self {
        self.reference_amount = amount;
        self
    }

    fn pending(mut self, draft: PendingDraft) -> Self {
        self.pending = Some(draft);
        self
    }
}

/// Transaction command service.
pub struct TxCommandService {
    config: RpcTxConfig,
    auto_commit: AtomicBool,
    fees: Arc<FeePolicyContext>,
    ports: CommandPorts,
}

impl TxCommandService {
    pub fn new(config: RpcTxConfig, fees: Arc<FeePolicyContext>, ports: CommandPorts) -> Self {
        Self {
            auto_commit: AtomicBool::new(config.submission.auto_commit),
            config,
            fees,
            ports,
        }
    }

    /// Service with its own fee context seeded from `config`.
    pub fn from_config(config: RpcTxConfig, ports: CommandPorts) -> Self {
        let fees = Arc::new(FeePolicyContext::new(config.initial_fee_policy()));
        Self::new(config, fees, ports)
    }

    pub fn config(&self) -> &RpcTxConfig {
        &self.config
    }

    pub fn fee_context(&self) -> &Arc<FeePolicyContext> {
        &self.fees
    }

    pub fn auto_commit(&self) -> bool {
        self.auto_commit.load(Ordering::SeqCst)
    }

    pub fn set_auto_commit(&self, enabled: bool) {
        self.auto_commit.store(enabled, Ordering::SeqCst);
        info!(enabled, "auto-commit switched");
    }

    /// Encodes, builds and, on commit, records the pending effect.
    fn submit(&self, submission: Submission<'_>, fees: &FeePolicy) -> RpcTxResult<TransactionOutcome> {
        let kind = submission.payload.kind();
        let payload = self.ports.encoder.encode(&submission.payload);
        let commit = self.auto_commit();
        debug!(kind = ?kind, payload_len = payload.len(), commit, "payload encoded");

        let request = BuildRequest {
            sender: submission.sender.clone(),
            recipient: submission.recipient.cloned(),
            redeem_address: submission.redeem_address.unwrap_or(submission.sender).clone(),
            reference_amount: submission.reference_amount,
            payload,
            commit,
        };

        let outcome = self.ports.builder.build(&request, fees).map_err(|failure| {
            warn!(kind = ?kind, code = failure.code, %failure, "transaction build failed");
            RpcTxError::from(failure)
        })?;

        // Only broadcast transactions have an effect to track.
        match (&outcome, submission.pending) {
            (TransactionOutcome::Committed(txid), Some(draft)) if commit && kind.tracks_pending() => {
                self.ports.pending.record(PendingEntry {
                    txid: *txid,
                    sender: submission.sender.clone(),
                    recipient: draft.recipient,
                    kind,
                    property: draft.property,
                    amount: draft.amount,
                    property_desired: draft.property_desired,
                    amount_desired: draft.amount_desired,
                    action: draft.action,
                    min_accept_fee: draft.min_accept_fee,
                    payment_window: draft.payment_window,
                });
                info!(%txid, kind = ?kind, "transaction committed, pending entry recorded");
            }
            (TransactionOutcome::Committed(txid), _) => {
                info!(%txid, kind = ?kind, "transaction committed");
            }
            (TransactionOutcome::Unsigned(raw), _) => {
                debug!(kind = ?kind, raw_len = raw.len(), "unsigned transaction built");
            }
        }

        Ok(outcome)
    }

    /// Submits under the fee policy currently in force.
    fn submit_with_current_fees(&self, submission: Submission<'_>) -> RpcTxResult<TransactionOutcome> {
        let fees = self.fees.current();
        self.submit(submission, &fees)
    }

    fn check_simple_send(&self, request: &SimpleSendRequest) -> RuleResult {
        rules::require_sane_reference_amount(
            request.reference_amount,
            self.config.protection.max_reference_amount,
        )?;
        rules::require_sufficient_balance(
            self.ports.balances.as_ref(),
            &request.from,
            request.property,
            request.amount,
        )
    }

    /// Returns the amounts to encode: validated for new and updated
    /// offers, passed through for cancels.
    fn check_dex_sell(&self, request: &DexSellRequest) -> RuleResult<(i64, i64)> {
        rules::require_base_currency(request.property)?;
        if request.action == DexAction::Cancel {
            return Ok((
                saturating_amount(request.amount_for_sale),
                saturating_amount(request.amount_desired),
            ));
        }

        let amount_for_sale = rules::require_amount_in_range(request.amount_for_sale, "amount for sale")?;
        let amount_desired = rules::require_amount_in_range(request.amount_desired, "amount desired")?;
        rules::require_sufficient_balance(
            self.ports.balances.as_ref(),
            &request.from,
            request.property,
            amount_for_sale,
        )?;
        if request.action == DexAction::New {
            rules::require_no_open_offer(
                self.ports.order_book.as_ref(),
                &request.from,
                request.property,
            )?;
        }
        Ok((amount_for_sale, amount_desired))
    }

    /// Returns the offer's minimum accept fee.
    fn check_dex_accept(&self, request: &DexAcceptRequest) -> RuleResult<i64> {
        rules::require_base_currency(request.property)?;
        let offer = rules::require_open_offer(
            self.ports.order_book.as_ref(),
            &request.seller,
            request.property,
        )?;
        if !request.override_protection {
            rules::require_safe_accept(&offer, &self.config.protection)?;
        }
        Ok(offer.min_accept_fee)
    }

    fn check_revoke(&self, request: &RevokeRequest) -> RuleResult {
        rules::require_token_administrator(
            self.ports.registry.as_ref(),
            &request.from,
            request.property,
        )?;
        rules::require_sufficient_balance(
            self.ports.balances.as_ref(),
            &request.from,
            request.property,
            request.amount,
        )
    }

    fn check_close_crowdsale(&self, request: &CloseCrowdsaleRequest) -> RuleResult {
        rules::require_active_crowdsale(self.ports.registry.as_ref(), request.property)?;
        rules::require_token_administrator(
            self.ports.registry.as_ref(),
            &request.from,
            request.property,
        )
    }

    /// Returns the amounts to encode; zero for pair and global cancels.
    fn check_trade(&self, request: &TradeRequest) -> RuleResult<(i64, i64)> {
        if request.action != MetaDexAction::CancelEverything {
            rules::require_tradable_pair(
                self.ports.registry.as_ref(),
                request.property_for_sale,
                request.property_desired,
            )?;
        }

        let (amount_for_sale, amount_desired) = match request.action {
            MetaDexAction::Add | MetaDexAction::CancelAtPrice => (
                rules::require_amount_in_range(request.amount_for_sale, "amount for sale")?,
                rules::require_amount_in_range(request.amount_desired, "amount desired")?,
            ),
            MetaDexAction::CancelPair | MetaDexAction::CancelEverything => (0, 0),
        };

        if request.action == MetaDexAction::Add {
            rules::require_sufficient_balance(
                self.ports.balances.as_ref(),
                &request.from,
                request.property_for_sale,
                amount_for_sale,
            )?;
        }
        Ok((amount_for_sale, amount_desired))
    }
}

/// Cancels carry whatever amounts were given; clamp them to the protocol range.
fn saturating_amount(amount: u64) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

fn rejected(failure: ValidationFailure) -> RpcTxError {
    warn!(%failure, code = failure.rpc_code(), "command rejected");
    failure.into()
}

impl TxCommandApi for TxCommandService {
    #[instrument(skip(self, request), fields(sender = %request.from, property = %request.property))]
    fn simple_send(&self, request: SimpleSendRequest) -> RpcTxResult<TransactionOutcome> {
        self.check_simple_send(&request).map_err(rejected)?;

        let payload = CommandPayload::SimpleSend {
            property: request.property,
            amount: request.amount,
        };
        let submission = Submission::new(&request.from, payload)
            .recipient(&request.to)
            .redeem_address(request.redeem_address.as_ref())
            .reference_amount(request.reference_amount)
            .pending(PendingDraft::transfer(
                Some(request.to.clone()),
                request.property,
                request.amount,
            ));
        self.submit_with_current_fees(submission)
    }

    #[instrument(skip(self, request), fields(sender = %request.from, property = %request.property, action = ?request.action))]
    fn dex_sell(&self, request: DexSellRequest) -> RpcTxResult<TransactionOutcome> {
        let (amount_for_sale, amount_desired) = self.check_dex_sell(&request).map_err(rejected)?;

        let payload = CommandPayload::DexSell {
            property: request.property,
            amount_for_sale,
            amount_desired,
            payment_window: request.payment_window,
            min_accept_fee: request.min_accept_fee,
            action: request.action,
        };
        let submission = Submission::new(&request.from, payload).pending(PendingDraft {
            recipient: None,
            property: request.property,
            amount: amount_for_sale,
            property_desired: None,
            amount_desired,
            action: request.action.code(),
            min_accept_fee: request.min_accept_fee,
            payment_window: request.payment_window,
        });
        self.submit_with_current_fees(submission)
    }

    #[instrument(skip(self, request), fields(sender = %request.from, seller = %request.seller, property = %request.property))]
    fn dex_accept(&self, request: DexAcceptRequest) -> RpcTxResult<TransactionOutcome> {
        let min_accept_fee = self.check_dex_accept(&request).map_err(rejected)?;

        let payload = CommandPayload::DexAccept {
            property: request.property,
            amount: request.amount,
        };
        let submission = Submission::new(&request.from, payload).recipient(&request.seller);

        let guard = self
            .fees
            .scoped_override(FeePolicy::at_least(FeeRate::new(min_accept_fee, FEE_RATE_BYTES)));
        debug!(min_accept_fee, saved = ?guard.saved(), "accept fee override installed");
        self.submit(submission, &guard)
    }

    #[instrument(skip(self, request), fields(sender = %request.from, name = %request.info.name))]
    fn issuance_crowdsale(
        &self,
        request: IssuanceCrowdsaleRequest,
    ) -> RpcTxResult<TransactionOutcome> {
        rules::require_non_empty_name(&request.info.name).map_err(rejected)?;

        let payload = CommandPayload::IssuanceCrowdsale {
            info: request.info,
            terms: request.terms,
        };
        self.submit_with_current_fees(Submission::new(&request.from, payload))
    }

    #[instrument(skip(self, request), fields(sender = %request.from, name = %request.info.name))]
    fn issuance_fixed(&self, request: IssuanceFixedRequest) -> RpcTxResult<TransactionOutcome> {
        rules::require_non_empty_name(&request.info.name).map_err(rejected)?;

        let payload = CommandPayload::IssuanceFixed {
            info: request.info,
            amount: request.amount,
        };
        self.submit_with_current_fees(Submission::new(&request.from, payload))
    }

    #[instrument(skip(self, request), fields(sender = %request.from, name = %request.info.name))]
    fn issuance_managed(&self, request: IssuanceManagedRequest) -> RpcTxResult<TransactionOutcome> {
        rules::require_non_empty_name(&request.info.name).map_err(rejected)?;

        let payload = CommandPayload::IssuanceManaged { info: request.info };
        self.submit_with_current_fees(Submission::new(&request.from, payload))
    }

    #[instrument(skip(self, request), fields(sender = %request.from, property = %request.property))]
    fn send_to_owners(&self, request: SendToOwnersRequest) -> RpcTxResult<TransactionOutcome> {
        rules::require_sufficient_balance(
            self.ports.balances.as_ref(),
            &request.from,
            request.property,
            request.amount,
        )
        .map_err(rejected)?;

        let payload = CommandPayload::SendToOwners {
            property: request.property,
            amount: request.amount,
        };
        let submission = Submission::new(&request.from, payload)
            .redeem_address(request.redeem_address.as_ref())
            .pending(PendingDraft::transfer(None, request.property, request.amount));
        self.submit_with_current_fees(submission)
    }

    #[instrument(skip(self, request), fields(sender = %request.from, property = %request.property))]
    fn grant(&self, request: GrantRequest) -> RpcTxResult<TransactionOutcome> {
        rules::require_token_administrator(
            self.ports.registry.as_ref(),
            &request.from,
            request.property,
        )
        .map_err(rejected)?;

        let recipient = request.to.as_ref().unwrap_or(&request.from);
        let payload = CommandPayload::Grant {
            property: request.property,
            amount: request.amount,
            memo: request.memo.clone(),
        };
        self.submit_with_current_fees(Submission::new(&request.from, payload).recipient(recipient))
    }

    #[instrument(skip(self, request), fields(sender = %request.from, property = %request.property))]
    fn revoke(&self, request: RevokeRequest) -> RpcTxResult<TransactionOutcome> {
        self.check_revoke(&request).map_err(rejected)?;

        let payload = CommandPayload::Revoke {
            property: request.property,
            amount: request.amount,
            memo: request.memo,
        };
        self.submit_with_current_fees(Submission::new(&request.from, payload))
    }

    #[instrument(skip(self, request), fields(sender = %request.from, property = %request.property))]
    fn close_crowdsale(&self, request: CloseCrowdsaleRequest) -> RpcTxResult<TransactionOutcome> {
        self.check_close_crowdsale(&request).map_err(rejected)?;

        let payload = CommandPayload::CloseCrowdsale {
            property: request.property,
        };
        self.submit_with_current_fees(Submission::new(&request.from, payload))
    }

    #[instrument(skip(self, request), fields(
        sender = %request.from,
        for_sale = %request.property_for_sale,
        desired = %request.property_desired,
        action = ?request.action,
    ))]
    fn trade(&self, request: TradeRequest) -> RpcTxResult<TransactionOutcome> {
        let (amount_for_sale, amount_desired) = self.check_trade(&request).map_err(rejected)?;

        let payload = CommandPayload::Trade {
            property_for_sale: request.property_for_sale,
            amount_for_sale,
            property_desired: request.property_desired,
            amount_desired,
            action: request.action,
        };
        let submission = Submission::new(&request.from, payload).pending(PendingDraft {
            recipient: None,
            property: request.property_for_sale,
            amount: amount_for_sale,
            property_desired: Some(request.property_desired),
            amount_desired,
            action: request.action.code(),
            min_accept_fee: 0,
            payment_window: 0,
        });
        self.submit_with_current_fees(submission)
    }

    #[instrument(skip(self, request), fields(sender = %request.from, to = %request.to, property = %request.property))]
    fn change_issuer(&self, request: ChangeIssuerRequest) -> RpcTxResult<TransactionOutcome> {
        rules::require_token_administrator(
            self.ports.registry.as_ref(),
            &request.from,
            request.property,
        )
        .map_err(rejected)?;

        let payload = CommandPayload::ChangeIssuer {
            property: request.property,
        };
        self.submit_with_current_fees(Submission::new(&request.from, payload).recipient(&request.to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLedger;
    use crate::domain::{
        BalanceShortfall, OfferDescriptor, PropertyDescriptor, TxKind,
    };
    use crate::ports::outbound::{MockBuilder, MockEncoder};
    use omni_types::COIN;

    struct Harness {
        ledger: Arc<InMemoryLedger>,
        encoder: Arc<MockEncoder>,
        builder: Arc<MockBuilder>,
        service: TxCommandService,
    }

    fn harness_with(builder: MockBuilder) -> Harness {
        let ledger = Arc::new(InMemoryLedger::new());
        let encoder = Arc::new(MockEncoder::default());
        let builder = Arc::new(builder);
        let ports = CommandPorts::with_ledger(encoder.clone(), builder.clone(), ledger.clone());
        let service = TxCommandService::from_config(RpcTxConfig::default(), ports);
        Harness {
            ledger,
            encoder,
            builder,
            service,
        }
    }

    fn harness() -> Harness {
        harness_with(MockBuilder::succeeding())
    }

    fn alice() -> Address {
        Address::from("1Alice")
    }

    fn bob() -> Address {
        Address::from("1Bob")
    }

    fn send(amount: i64) -> SimpleSendRequest {
        SimpleSendRequest {
            from: alice(),
            to: bob(),
            property: PropertyId(3),
            amount,
            redeem_address: None,
            reference_amount: 0,
        }
    }

    #[test]
    fn test_simple_send_records_pending() {
        let h = harness();
        h.ledger.set_balance(&alice(), PropertyId(3), 1000);

        let outcome = h.service.simple_send(send(400)).unwrap();
        assert!(outcome.is_committed());

        let pending = h.ledger.pending_entries();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].txid, outcome.txid().unwrap());
        assert_eq!(pending[0].kind, TxKind::SimpleSend);
        assert_eq!(pending[0].recipient, Some(bob()));
        assert_eq!(h.ledger.balance(&alice(), PropertyId(3)).available, 600);
        assert_eq!(h.builder.last().unwrap().0.redeem_address, alice());
    }

    #[test]
    fn test_insufficient_balance_stops_before_encoding() {
        let h = harness();
        h.ledger.set_balance(&alice(), PropertyId(3), 100);

        let err = h.service.simple_send(send(101)).unwrap_err();
        assert!(matches!(
            err,
            RpcTxError::Validation(ValidationFailure::InsufficientBalance {
                shortfall: BalanceShortfall::Confirmed,
                ..
            })
        ));
        assert_eq!(h.encoder.calls(), 0);
        assert!(h.builder.last().is_none());
    }

    #[test]
    fn test_reference_amount_checked_before_balance() {
        let h = harness();
        let mut request = send(10);
        request.reference_amount = COIN / 100 + 1;
        assert!(matches!(
            h.service.simple_send(request),
            Err(RpcTxError::Validation(ValidationFailure::InvalidReferenceAmount { .. }))
        ));
    }

    #[test]
    fn test_unsigned_build_records_nothing() {
        let h = harness();
        h.ledger.set_balance(&alice(), PropertyId(3), 1000);
        h.service.set_auto_commit(false);

        let outcome = h.service.simple_send(send(10)).unwrap();
        assert!(!outcome.is_committed());
        assert_eq!(h.ledger.pending_count(), 0);
        assert!(!h.builder.last().unwrap().0.commit);
    }

    /// Reports a broadcast whatever the commit flag says.
    struct AlwaysCommitting;

    impl TransactionBuilder for AlwaysCommitting {
        fn build(
            &self,
            _request: &BuildRequest,
            _fees: &FeePolicy,
        ) -> Result<TransactionOutcome, crate::domain::BuilderFailure> {
            Ok(TransactionOutcome::Committed(omni_types::TxId::from_bytes([9; 32])))
        }
    }

    #[test]
    fn test_pending_requires_commit_flag() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.set_balance(&alice(), PropertyId(3), 1000);
        let ports = CommandPorts::with_ledger(
            Arc::new(MockEncoder::default()),
            Arc::new(AlwaysCommitting),
            ledger.clone(),
        );
        let service = TxCommandService::from_config(RpcTxConfig::default(), ports);
        service.set_auto_commit(false);

        assert!(service.simple_send(send(10)).unwrap().is_committed());
        assert_eq!(ledger.pending_count(), 0);

        service.set_auto_commit(true);
        service.simple_send(send(10)).unwrap();
        assert_eq!(ledger.pending_count(), 1);
    }

    #[test]
    fn test_builder_failure_surfaces_code() {
        let h = harness_with(MockBuilder::failing(-206));
        h.ledger.set_balance(&alice(), PropertyId(3), 1000);

        let err = h.service.simple_send(send(10)).unwrap_err();
        assert_eq!(err.rpc_code(), -206);
        assert_eq!(h.ledger.pending_count(), 0);
    }

    #[test]
    fn test_dex_accept_uses_offer_fee_and_restores() {
        let h = harness();
        let before = h.service.fee_context().current();
        h.ledger.open_offer(OfferDescriptor {
            seller: bob(),
            property: PropertyId::OMNI,
            amount_for_sale: 10 * COIN,
            amount_desired: COIN,
            min_accept_fee: 20_000,
            payment_window: 15,
        });

        let request = DexAcceptRequest {
            from: alice(),
            seller: bob(),
            property: PropertyId::OMNI,
            amount: COIN,
            override_protection: false,
        };
        h.service.dex_accept(request).unwrap();

        let (build, fees) = h.builder.last().unwrap();
        assert_eq!(build.recipient, Some(bob()));
        assert_eq!(fees, FeePolicy::at_least(FeeRate::per_kilobyte(20_000)));
        assert_eq!(h.service.fee_context().current(), before);
        assert_eq!(h.ledger.pending_count(), 0);
    }

    #[test]
    fn test_trade_cancel_everything_skips_checks() {
        let h = harness();
        let request = TradeRequest {
            from: alice(),
            property_for_sale: PropertyId(99),
            amount_for_sale: 5,
            property_desired: PropertyId(99),
            amount_desired: 5,
            action: MetaDexAction::CancelEverything,
        };
        h.service.trade(request).unwrap();

        let pending = h.ledger.pending_entries();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].amount, 0);
        assert_eq!(pending[0].amount_desired, 0);
        assert_eq!(pending[0].action, MetaDexAction::CancelEverything.code());
    }

    #[test]
    fn test_grant_defaults_recipient_to_sender() {
        let h = harness();
        h.ledger
            .register_property(PropertyDescriptor::new(PropertyId(7), "Managed", false, alice()));

        let request = GrantRequest {
            from: alice(),
            to: None,
            property: PropertyId(7),
            amount: 50,
            memo: String::new(),
        };
        h.service.grant(request).unwrap();
        assert_eq!(h.builder.last().unwrap().0.recipient, Some(alice()));
        assert_eq!(h.ledger.pending_count(), 0);
    }

    #[test]
    fn test_close_crowdsale_checks_activity_first() {
        let h = harness();
        h.ledger
            .register_property(PropertyDescriptor::new(PropertyId(7), "Sale", true, alice()));

        let request = CloseCrowdsaleRequest {
            from: bob(),
            property: PropertyId(7),
        };
        assert!(matches!(
            h.service.close_crowdsale(request),
            Err(RpcTxError::Validation(ValidationFailure::NoActiveCrowdsale(_)))
        ));
    }

    #[test]
    fn test_dex_sell_cancel_passes_amounts_through() {
        let h = harness();
        let request = DexSellRequest {
            from: alice(),
            property: PropertyId::OMNI,
            amount_for_sale: 0,
            amount_desired: u64::MAX,
            payment_window: 10,
            min_accept_fee: 0,
            action: DexAction::Cancel,
        };
        h.service.dex_sell(request).unwrap();

        let encoded = h.encoder.encoded.lock().clone();
        assert!(matches!(
            encoded.as_slice(),
            [CommandPayload::DexSell {
                amount_for_sale: 0,
                amount_desired: i64::MAX,
                ..
            }]
        ));
    }
}

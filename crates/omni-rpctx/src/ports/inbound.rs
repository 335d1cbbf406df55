//! # Inbound Port - TxCommandApi
//!
//! Primary driving port: one operation per transaction command.
//!
//! | Method | Transaction kind | Pending entry |
//! |--------|------------------|---------------|
//! | `simple_send` | 0 | yes |
//! | `send_to_owners` | 3 | yes |
//! | `dex_sell` | 20 | yes |
//! | `trade` | 21 | yes |
//! | `dex_accept` | 22 | no |
//! | `issuance_fixed` | 50 | no |
//! | `issuance_crowdsale` | 51 | no |
//! | `close_crowdsale` | 53 | no |
//! | `issuance_managed` | 54 | no |
//! | `grant` | 55 | no |
//! | `revoke` | 56 | no |
//! | `change_issuer` | 70 | no |
//!
//! Pending entries are only written when the transaction was committed.

use crate::domain::{
    ChangeIssuerRequest, CloseCrowdsaleRequest, CommandRequest, DexAcceptRequest, DexSellRequest,
    GrantRequest, IssuanceCrowdsaleRequest, IssuanceFixedRequest, IssuanceManagedRequest,
    RevokeRequest, RpcTxResult, SendToOwnersRequest, SimpleSendRequest, TradeRequest,
    TransactionOutcome,
};

/// Transaction command API.
///
/// Every operation validates, encodes and builds exactly one transaction.
///
/// # Errors
/// - `Validation`: the first business rule that did not hold
/// - `Builder`: the wallet returned a non-zero result code
pub trait TxCommandApi: Send + Sync {
    fn simple_send(&self, request: SimpleSendRequest) -> RpcTxResult<TransactionOutcome>;

    fn dex_sell(&self, request: DexSellRequest) -> RpcTxResult<TransactionOutcome>;

    /// Accepts a DEx offer, paying at least the offer's minimum fee.
    fn dex_accept(&self, request: DexAcceptRequest) -> RpcTxResult<TransactionOutcome>;

    fn issuance_crowdsale(&self, request: IssuanceCrowdsaleRequest)
        -> RpcTxResult<TransactionOutcome>;

    fn issuance_fixed(&self, request: IssuanceFixedRequest) -> RpcTxResult<TransactionOutcome>;

    fn issuance_managed(&self, request: IssuanceManagedRequest) -> RpcTxResult<TransactionOutcome>;

    fn send_to_owners(&self, request: SendToOwnersRequest) -> RpcTxResult<TransactionOutcome>;

    fn grant(&self, request: GrantRequest) -> RpcTxResult<TransactionOutcome>;

    fn revoke(&self, request: RevokeRequest) -> RpcTxResult<TransactionOutcome>;

    fn close_crowdsale(&self, request: CloseCrowdsaleRequest) -> RpcTxResult<TransactionOutcome>;

    fn trade(&self, request: TradeRequest) -> RpcTxResult<TransactionOutcome>;

    fn change_issuer(&self, request: ChangeIssuerRequest) -> RpcTxResult<TransactionOutcome>;

    /// Dispatches a parsed request to its operation.
    fn execute(&self, request: CommandRequest) -> RpcTxResult<TransactionOutcome> {
        match request {
            CommandRequest::SimpleSend(r) => self.simple_send(r),
            CommandRequest::DexSell(r) => self.dex_sell(r),
            CommandRequest::DexAccept(r) => self.dex_accept(r),
            CommandRequest::IssuanceCrowdsale(r) => self.issuance_crowdsale(r),
            CommandRequest::IssuanceFixed(r) => self.issuance_fixed(r),
            CommandRequest::IssuanceManaged(r) => self.issuance_managed(r),
            CommandRequest::SendToOwners(r) => self.send_to_owners(r),
            CommandRequest::Grant(r) => self.grant(r),
            CommandRequest::Revoke(r) => self.revoke(r),
            CommandRequest::CloseCrowdsale(r) => self.close_crowdsale(r),
            CommandRequest::Trade(r) => self.trade(r),
            CommandRequest::ChangeIssuer(r) => self.change_issuer(r),
        }
    }
}

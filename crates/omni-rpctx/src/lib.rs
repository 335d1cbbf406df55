//! # Transaction Command Subsystem
//!
//! Validates, encodes and submits token-layer transactions on behalf of a
//! wallet holder.
//!
//! ## Purpose
//!
//! Each command (send, DEx offer/accept, issuance, send-to-owners, grant,
//! revoke, crowdsale close, MetaDEx trade, issuer change) checks its business
//! rules against read-only ledger views, hands a payload to the wallet's
//! transaction builder, and, when the transaction was broadcast, records its
//! optimistic effect so later commands see reduced available balances.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Rules run before encoding; first failure wins | `service.rs` - `check_*` |
//! | Pending entries only for committed, tracked kinds | `service.rs` - `submit()` |
//! | Fee policy restored after every accept | `domain/fee_policy.rs` - `FeeOverrideGuard::drop` |
//! | Concurrent readers never see an accept's fee override | `domain/fee_policy.rs` - lock held by guard |
//! | Available balance never exceeds confirmed | `domain/entities.rs` - `BalanceSnapshot::new` |
//!
//! ## Command Pipeline
//!
//! ```text
//! JSON params ──→ rpc::params ──→ CommandRequest ──→ rules ──→ PayloadEncoder
//!                                                                   │
//!         PendingTracker ←── committed? ←── TransactionBuilder ←────┘
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  rpc/      - JSON-RPC params, method registry, dispatch         │
//! │  adapters/ - In-memory ledger read models                       │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - TxCommandApi trait                         │
//! │  ports/outbound.rs - encoder, builder, ledger view traits       │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/commands.rs   - typed command requests                  │
//! │  domain/rules.rs      - validation rule set                     │
//! │  domain/fee_policy.rs - fee policy context and scoped override  │
//! │  domain/errors.rs     - error kinds and JSON-RPC codes          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use omni_rpctx::{CommandPorts, InMemoryLedger, RpcTxConfig, TxCommandService, TxRpcHandler};
//!
//! let ledger = Arc::new(InMemoryLedger::new());
//! let ports = CommandPorts::with_ledger(encoder, wallet_builder, ledger.clone());
//! let service = Arc::new(TxCommandService::from_config(RpcTxConfig::default(), ports));
//! let handler = TxRpcHandler::new(service, ledger);
//!
//! let txid = handler.handle("omni_send", &params)?;
//! ```

#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod rpc;
pub mod service;

pub use adapters::InMemoryLedger;
pub use domain::{
    CommandRequest, FeePolicy, FeePolicyContext, FeeRate, RpcErrorObject, RpcTxConfig,
    RpcTxError, RpcTxResult, TransactionOutcome,
};
pub use ports::{
    BalanceView, BuildRequest, DexOrderBook, PayloadEncoder, PendingTracker, PropertyRegistry,
    TransactionBuilder, TxCommandApi,
};
pub use rpc::TxRpcHandler;
pub use service::{CommandPorts, TxCommandService};

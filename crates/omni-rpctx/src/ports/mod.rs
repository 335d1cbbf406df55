//! Ports layer (hexagonal architecture).

pub mod inbound;
pub mod outbound;

pub use inbound::TxCommandApi;
pub use outbound::{
    BalanceView, BuildRequest, DexOrderBook, PayloadEncoder, PendingTracker, PropertyRegistry,
    TransactionBuilder,
};

//! Read models consumed by the validation rules, and the pending record
//! written after a broadcast.

use omni_types::{Address, Ecosystem, PropertyId, TxId};
use serde::{Deserialize, Serialize};

/// Protocol transaction type numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    SimpleSend = 0,
    SendToOwners = 3,
    TradeOffer = 20,
    MetaDexTrade = 21,
    AcceptOffer = 22,
    CreatePropertyFixed = 50,
    CreatePropertyVariable = 51,
    CloseCrowdsale = 53,
    CreatePropertyManaged = 54,
    GrantTokens = 55,
    RevokeTokens = 56,
    ChangeIssuer = 70,
}

impl TxKind {
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Kinds whose broadcast has an effect worth reflecting before
    /// confirmation.
    pub fn tracks_pending(self) -> bool {
        matches!(
            self,
            Self::SimpleSend | Self::SendToOwners | Self::TradeOffer | Self::MetaDexTrade
        )
    }
}

/// Registered token class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub id: PropertyId,
    pub name: String,
    pub divisible: bool,
    pub issuer: Address,
    pub ecosystem: Ecosystem,
    pub crowdsale_active: bool,
}

impl PropertyDescriptor {
    pub fn new(id: PropertyId, name: impl Into<String>, divisible: bool, issuer: Address) -> Self {
        Self {
            id,
            name: name.into(),
            divisible,
            issuer,
            ecosystem: id.ecosystem(),
            crowdsale_active: false,
        }
    }

    pub fn with_active_crowdsale(mut self) -> Self {
        self.crowdsale_active = true;
        self
    }
}

/// Balance of one (address, property) pair.
///
/// `available` is `confirmed` net of outgoing amounts still pending, so
/// `available <= confirmed` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub confirmed: i64,
    pub available: i64,
}

impl BalanceSnapshot {
    pub fn new(confirmed: i64, available: i64) -> Self {
        Self {
            confirmed,
            available: available.min(confirmed),
        }
    }

    pub fn settled(confirmed: i64) -> Self {
        Self::new(confirmed, confirmed)
    }
}

/// A live DEx sell offer, unique per (seller, property).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferDescriptor {
    pub seller: Address,
    pub property: PropertyId,
    pub amount_for_sale: i64,
    pub amount_desired: i64,
    /// Minimum fee, in base-ledger minor units, a buyer must pay to accept.
    pub min_accept_fee: i64,
    /// Blocks a buyer has to pay after a successful accept.
    pub payment_window: u8,
}

/// Optimistic record of a broadcast, not yet confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEntry {
    pub txid: TxId,
    pub sender: Address,
    pub recipient: Option<Address>,
    pub kind: TxKind,
    pub property: PropertyId,
    pub amount: i64,
    pub property_desired: Option<PropertyId>,
    pub amount_desired: i64,
    /// Raw action code of offer and trade commands, zero otherwise.
    pub action: u8,
    /// Offer terms of a DEx sell, zero otherwise.
    #[serde(default)]
    pub min_accept_fee: i64,
    #[serde(default)]
    pub payment_window: u8,
}

impl PendingEntry {
    /// Offer a DEx sell `New` or `Update` leaves live once confirmed.
    pub fn offer(&self) -> Option<OfferDescriptor> {
        let opens = matches!(
            (self.kind, super::DexAction::from_code(self.action)),
            (
                TxKind::TradeOffer,
                Some(super::DexAction::New | super::DexAction::Update)
            )
        );
        opens.then(|| OfferDescriptor {
            seller: self.sender.clone(),
            property: self.property,
            amount_for_sale: self.amount,
            amount_desired: self.amount_desired,
            min_accept_fee: self.min_accept_fee,
            payment_window: self.payment_window,
        })
    }

    /// Amount this entry holds back from the sender's available balance.
    pub fn outgoing_amount(&self) -> i64 {
        match self.kind {
            TxKind::SimpleSend | TxKind::SendToOwners => self.amount,
            TxKind::TradeOffer if self.action != super::DexAction::Cancel.code() => self.amount,
            TxKind::MetaDexTrade if self.action == super::MetaDexAction::Add.code() => self.amount,
            _ => 0,
        }
    }
}

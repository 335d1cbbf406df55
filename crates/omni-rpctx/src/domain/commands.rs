//! Typed command requests.
//!
//! One request per invocation, built by the parameter parser and consumed
//! once by the pipeline. Offer and trade commands carry their amounts
//! unchecked (`u64`); the validation rules decide per action whether they
//! must be positive and in range.

use omni_types::{Address, Ecosystem, PropertyId, PropertyType};
use serde::{Deserialize, Serialize};

/// Action code of a DEx sell offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DexAction {
    New = 1,
    Update = 2,
    Cancel = 3,
}

impl DexAction {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::New),
            2 => Some(Self::Update),
            3 => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Action code of a MetaDEx trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetaDexAction {
    Add = 1,
    CancelAtPrice = 2,
    CancelPair = 3,
    CancelEverything = 4,
}

impl MetaDexAction {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Add),
            2 => Some(Self::CancelAtPrice),
            3 => Some(Self::CancelPair),
            4 => Some(Self::CancelEverything),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleSendRequest {
    pub from: Address,
    pub to: Address,
    pub property: PropertyId,
    pub amount: i64,
    pub redeem_address: Option<Address>,
    /// Base-ledger minor units attached to the reference output.
    pub reference_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DexSellRequest {
    pub from: Address,
    pub property: PropertyId,
    pub amount_for_sale: u64,
    pub amount_desired: u64,
    pub payment_window: u8,
    pub min_accept_fee: i64,
    pub action: DexAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DexAcceptRequest {
    pub from: Address,
    /// Seller whose offer is being accepted.
    pub seller: Address,
    pub property: PropertyId,
    pub amount: i64,
    /// Skips the unsafe-trade protection on fee and payment window.
    pub override_protection: bool,
}

/// Descriptive fields shared by the three issuance commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceInfo {
    pub ecosystem: Ecosystem,
    pub property_type: PropertyType,
    pub previous_id: PropertyId,
    pub category: String,
    pub subcategory: String,
    pub name: String,
    pub url: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrowdsaleTerms {
    pub property_desired: PropertyId,
    pub tokens_per_unit: i64,
    pub deadline: i64,
    pub early_bonus: u8,
    pub issuer_percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceCrowdsaleRequest {
    pub from: Address,
    pub info: IssuanceInfo,
    pub terms: CrowdsaleTerms,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceFixedRequest {
    pub from: Address,
    pub info: IssuanceInfo,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceManagedRequest {
    pub from: Address,
    pub info: IssuanceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendToOwnersRequest {
    pub from: Address,
    pub property: PropertyId,
    pub amount: i64,
    pub redeem_address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRequest {
    pub from: Address,
    /// Receiver of the new tokens; the administrator itself when absent.
    pub to: Option<Address>,
    pub property: PropertyId,
    pub amount: i64,
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeRequest {
    pub from: Address,
    pub property: PropertyId,
    pub amount: i64,
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseCrowdsaleRequest {
    pub from: Address,
    pub property: PropertyId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRequest {
    pub from: Address,
    pub property_for_sale: PropertyId,
    pub amount_for_sale: u64,
    pub property_desired: PropertyId,
    pub amount_desired: u64,
    pub action: MetaDexAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeIssuerRequest {
    pub from: Address,
    /// New administrator.
    pub to: Address,
    pub property: PropertyId,
}

/// A parsed command, ready for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRequest {
    SimpleSend(SimpleSendRequest),
    DexSell(DexSellRequest),
    DexAccept(DexAcceptRequest),
    IssuanceCrowdsale(IssuanceCrowdsaleRequest),
    IssuanceFixed(IssuanceFixedRequest),
    IssuanceManaged(IssuanceManagedRequest),
    SendToOwners(SendToOwnersRequest),
    Grant(GrantRequest),
    Revoke(RevokeRequest),
    CloseCrowdsale(CloseCrowdsaleRequest),
    Trade(TradeRequest),
    ChangeIssuer(ChangeIssuerRequest),
}

impl CommandRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SimpleSend(_) => "simple_send",
            Self::DexSell(_) => "dex_sell",
            Self::DexAccept(_) => "dex_accept",
            Self::IssuanceCrowdsale(_) => "issuance_crowdsale",
            Self::IssuanceFixed(_) => "issuance_fixed",
            Self::IssuanceManaged(_) => "issuance_managed",
            Self::SendToOwners(_) => "send_to_owners",
            Self::Grant(_) => "grant",
            Self::Revoke(_) => "revoke",
            Self::CloseCrowdsale(_) => "close_crowdsale",
            Self::Trade(_) => "trade",
            Self::ChangeIssuer(_) => "change_issuer",
        }
    }

    pub fn sender(&self) -> &Address {
        match self {
            Self::SimpleSend(r) => &r.from,
            Self::DexSell(r) => &r.from,
            Self::DexAccept(r) => &r.from,
            Self::IssuanceCrowdsale(r) => &r.from,
            Self::IssuanceFixed(r) => &r.from,
            Self::IssuanceManaged(r) => &r.from,
            Self::SendToOwners(r) => &r.from,
            Self::Grant(r) => &r.from,
            Self::Revoke(r) => &r.from,
            Self::CloseCrowdsale(r) => &r.from,
            Self::Trade(r) => &r.from,
            Self::ChangeIssuer(r) => &r.from,
        }
    }
}

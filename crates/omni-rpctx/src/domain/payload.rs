//! Validated payload fields handed to the encoder.
//!
//! Every amount here has passed the command's rules, so encoders can treat
//! the conversion to bytes as total.

use super::commands::{CrowdsaleTerms, DexAction, IssuanceInfo, MetaDexAction};
use super::entities::TxKind;
use omni_types::PropertyId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandPayload {
    SimpleSend {
        property: PropertyId,
        amount: i64,
    },
    SendToOwners {
        property: PropertyId,
        amount: i64,
    },
    DexSell {
        property: PropertyId,
        amount_for_sale: i64,
        amount_desired: i64,
        payment_window: u8,
        min_accept_fee: i64,
        action: DexAction,
    },
    DexAccept {
        property: PropertyId,
        amount: i64,
    },
    IssuanceCrowdsale {
        info: IssuanceInfo,
        terms: CrowdsaleTerms,
    },
    IssuanceFixed {
        info: IssuanceInfo,
        amount: i64,
    },
    IssuanceManaged {
        info: IssuanceInfo,
    },
    Grant {
        property: PropertyId,
        amount: i64,
        memo: String,
    },
    Revoke {
        property: PropertyId,
        amount: i64,
        memo: String,
    },
    CloseCrowdsale {
        property: PropertyId,
    },
    Trade {
        property_for_sale: PropertyId,
        amount_for_sale: i64,
        property_desired: PropertyId,
        amount_desired: i64,
        action: MetaDexAction,
    },
    ChangeIssuer {
        property: PropertyId,
    },
}

impl CommandPayload {
    pub fn kind(&self) -> TxKind {
        match self {
            Self::SimpleSend { .. } => TxKind::SimpleSend,
            Self::SendToOwners { .. } => TxKind::SendToOwners,
            Self::DexSell { .. } => TxKind::TradeOffer,
            Self::DexAccept { .. } => TxKind::AcceptOffer,
            Self::IssuanceCrowdsale { .. } => TxKind::CreatePropertyVariable,
            Self::IssuanceFixed { .. } => TxKind::CreatePropertyFixed,
            Self::IssuanceManaged { .. } => TxKind::CreatePropertyManaged,
            Self::Grant { .. } => TxKind::GrantTokens,
            Self::Revoke { .. } => TxKind::RevokeTokens,
            Self::CloseCrowdsale { .. } => TxKind::CloseCrowdsale,
            Self::Trade { .. } => TxKind::MetaDexTrade,
            Self::ChangeIssuer { .. } => TxKind::ChangeIssuer,
        }
    }
}

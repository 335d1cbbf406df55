//! Validation rule set.
//!
//! Each rule is a pure read against the ledger ports. Commands apply their
//! rules in a fixed order and stop at the first failure, so the caller
//! always sees the earliest rule that did not hold.
//!
//! | Rule | Failure |
//! |------|---------|
//! | `require_sane_reference_amount` | `InvalidReferenceAmount` |
//! | `require_sufficient_balance` | `InsufficientBalance` |
//! | `require_non_empty_name` | `InvalidPropertyName` |
//! | `require_base_currency` | `InvalidProperty` |
//! | `require_active_crowdsale` | `NoActiveCrowdsale` |
//! | `require_token_administrator` | `NotAuthorized` |
//! | `require_amount_in_range` | `InvalidAmount` / `AmountOutOfRange` |
//! | `require_tradable_pair` | `PropertyNotFound` / `EcosystemMismatch` / `SameProperty` |
//! | `require_no_open_offer` | `DuplicateOffer` |
//! | `require_open_offer` | `NoMatchingOffer` / `OfferUnavailable` |
//! | `require_safe_accept` | `UnsafeAcceptFee` / `UnsafePaymentWindow` |

use omni_types::{is_range_ok, Address, PropertyId};

use super::config::ProtectionConfig;
use super::entities::OfferDescriptor;
use super::errors::{BalanceShortfall, ValidationFailure};
use crate::ports::outbound::{BalanceView, DexOrderBook, PropertyRegistry};

pub type RuleResult<T = ()> = Result<T, ValidationFailure>;

pub fn require_sane_reference_amount(amount: i64, ceiling: i64) -> RuleResult {
    if amount > ceiling {
        return Err(ValidationFailure::InvalidReferenceAmount { amount, ceiling });
    }
    Ok(())
}

/// Confirmed balance first, then the balance left after pending outgoing
/// transactions.
pub fn require_sufficient_balance(
    balances: &dyn BalanceView,
    address: &Address,
    property: PropertyId,
    amount: i64,
) -> RuleResult {
    let snapshot = balances.balance(address, property);
    if snapshot.confirmed < amount {
        return Err(ValidationFailure::InsufficientBalance {
            shortfall: BalanceShortfall::Confirmed,
            required: amount,
            balance: snapshot.confirmed,
        });
    }
    if snapshot.available < amount {
        return Err(ValidationFailure::InsufficientBalance {
            shortfall: BalanceShortfall::Pending,
            required: amount,
            balance: snapshot.available,
        });
    }
    Ok(())
}

pub fn require_non_empty_name(name: &str) -> RuleResult {
    if name.is_empty() {
        return Err(ValidationFailure::InvalidPropertyName);
    }
    Ok(())
}

pub fn require_base_currency(property: PropertyId) -> RuleResult {
    if !property.is_base_currency() {
        return Err(ValidationFailure::InvalidProperty(property));
    }
    Ok(())
}

pub fn require_active_crowdsale(registry: &dyn PropertyRegistry, property: PropertyId) -> RuleResult {
    if !registry.is_crowdsale_active(property) {
        return Err(ValidationFailure::NoActiveCrowdsale(property));
    }
    Ok(())
}

/// Sender must be the recorded issuer. An unknown property has no issuer.
pub fn require_token_administrator(
    registry: &dyn PropertyRegistry,
    sender: &Address,
    property: PropertyId,
) -> RuleResult {
    match registry.property(property) {
        Some(sp) if &sp.issuer == sender => Ok(()),
        _ => Err(ValidationFailure::NotAuthorized {
            sender: sender.clone(),
            property,
        }),
    }
}

/// Positive and representable; returns the amount as a protocol integer.
pub fn require_amount_in_range(amount: u64, field: &'static str) -> RuleResult<i64> {
    if amount == 0 {
        return Err(ValidationFailure::InvalidAmount { field });
    }
    if !is_range_ok(amount) {
        return Err(ValidationFailure::AmountOutOfRange { field });
    }
    Ok(amount as i64)
}

/// Both properties exist, share an ecosystem and differ, checked in that
/// order.
pub fn require_tradable_pair(
    registry: &dyn PropertyRegistry,
    for_sale: PropertyId,
    desired: PropertyId,
) -> RuleResult {
    for id in [for_sale, desired] {
        if registry.property(id).is_none() {
            return Err(ValidationFailure::PropertyNotFound(id));
        }
    }
    if !registry.is_same_ecosystem(for_sale, desired) {
        return Err(ValidationFailure::EcosystemMismatch { for_sale, desired });
    }
    if for_sale == desired {
        return Err(ValidationFailure::SameProperty(for_sale));
    }
    Ok(())
}

pub fn require_no_open_offer(
    book: &dyn DexOrderBook,
    seller: &Address,
    property: PropertyId,
) -> RuleResult {
    if book.offer_exists(seller, property) {
        return Err(ValidationFailure::DuplicateOffer {
            seller: seller.clone(),
            property,
        });
    }
    Ok(())
}

/// Existence check, then load. An offer that exists but cannot be loaded
/// is reported separately from a missing one.
pub fn require_open_offer(
    book: &dyn DexOrderBook,
    seller: &Address,
    property: PropertyId,
) -> RuleResult<OfferDescriptor> {
    if !book.offer_exists(seller, property) {
        return Err(ValidationFailure::NoMatchingOffer {
            seller: seller.clone(),
            property,
        });
    }
    book.offer(seller, property)
        .ok_or_else(|| ValidationFailure::OfferUnavailable {
            seller: seller.clone(),
            property,
        })
}

/// Unsafe trade protection for a DEx accept.
pub fn require_safe_accept(offer: &OfferDescriptor, protection: &ProtectionConfig) -> RuleResult {
    if offer.min_accept_fee > protection.max_accept_fee {
        return Err(ValidationFailure::UnsafeAcceptFee {
            fee: offer.min_accept_fee,
            ceiling: protection.max_accept_fee,
        });
    }
    if offer.payment_window < protection.min_payment_window {
        return Err(ValidationFailure::UnsafePaymentWindow {
            blocks: offer.payment_window,
            minimum: protection.min_payment_window,
        });
    }
    Ok(())
}

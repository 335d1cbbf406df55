//! In-memory ledger read models.
//!
//! Backs all four read/record ports with plain maps. Available balance is
//! derived on every read: confirmed balance minus the outgoing amounts of
//! the sender's pending entries for that property.

use crate::domain::{
    BalanceSnapshot, OfferDescriptor, PendingEntry, PropertyDescriptor, TxKind,
};
use crate::ports::outbound::{BalanceView, DexOrderBook, PendingTracker, PropertyRegistry};
use omni_types::{Address, PropertyId, TxId};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Ledger state kept in memory.
#[derive(Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<(Address, PropertyId), i64>>,
    properties: RwLock<HashMap<PropertyId, PropertyDescriptor>>,
    offers: RwLock<HashMap<(Address, PropertyId), OfferDescriptor>>,
    pending: RwLock<Vec<PendingEntry>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the confirmed balance of `address` in `property`.
    pub fn set_balance(&self, address: &Address, property: PropertyId, confirmed: i64) {
        self.balances
            .write()
            .insert((address.clone(), property), confirmed);
    }

    pub fn register_property(&self, descriptor: PropertyDescriptor) {
        self.properties.write().insert(descriptor.id, descriptor);
    }

    /// Returns false if the property is unknown.
    pub fn set_crowdsale_active(&self, property: PropertyId, active: bool) -> bool {
        match self.properties.write().get_mut(&property) {
            Some(sp) => {
                sp.crowdsale_active = active;
                true
            }
            None => false,
        }
    }

    /// Records a live offer, replacing any previous one from the same seller.
    pub fn open_offer(&self, offer: OfferDescriptor) {
        self.offers
            .write()
            .insert((offer.seller.clone(), offer.property), offer);
    }

    pub fn close_offer(&self, seller: &Address, property: PropertyId) -> Option<OfferDescriptor> {
        self.offers.write().remove(&(seller.clone(), property))
    }

    pub fn pending_entries(&self) -> Vec<PendingEntry> {
        self.pending.read().clone()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.read().len()
    }

    /// Ends a pending entry's lifecycle by confirmation.
    ///
    /// A DEx sell replaces the seller's live offer: the previous offer's
    /// reserve returns to the confirmed balance, then `New` and `Update`
    /// reserve their amount and open the new offer. Other kinds move their
    /// outgoing amount out of the sender's confirmed balance; a simple send
    /// also credits its recipient.
    pub fn confirm(&self, txid: &TxId) -> Option<PendingEntry> {
        let entry = self.take_pending(txid)?;
        let key = (entry.sender.clone(), entry.property);
        if entry.kind == TxKind::TradeOffer {
            let mut offers = self.offers.write();
            let mut balances = self.balances.write();
            let confirmed = balances.entry(key.clone()).or_default();
            if let Some(previous) = offers.remove(&key) {
                *confirmed += previous.amount_for_sale;
            }
            if let Some(offer) = entry.offer() {
                *confirmed -= offer.amount_for_sale;
                offers.insert(key, offer);
            }
        } else {
            let mut balances = self.balances.write();
            *balances.entry(key).or_default() -= entry.outgoing_amount();
            if let (TxKind::SimpleSend, Some(recipient)) = (entry.kind, entry.recipient.as_ref()) {
                *balances
                    .entry((recipient.clone(), entry.property))
                    .or_default() += entry.amount;
            }
        }
        debug!(txid = %txid, kind = ?entry.kind, "pending entry confirmed");
        Some(entry)
    }

    /// Drops a pending entry without applying it.
    pub fn evict(&self, txid: &TxId) -> Option<PendingEntry> {
        let entry = self.take_pending(txid)?;
        debug!(txid = %txid, kind = ?entry.kind, "pending entry evicted");
        Some(entry)
    }

    fn take_pending(&self, txid: &TxId) -> Option<PendingEntry> {
        let mut pending = self.pending.write();
        let index = pending.iter().position(|e| &e.txid == txid)?;
        Some(pending.remove(index))
    }

    fn pending_outgoing(&self, address: &Address, property: PropertyId) -> i64 {
        self.pending
            .read()
            .iter()
            .filter(|e| &e.sender == address && e.property == property)
            .map(PendingEntry::outgoing_amount)
            .fold(0i64, i64::saturating_add)
    }
}

impl BalanceView for InMemoryLedger {
    fn balance(&self, address: &Address, property: PropertyId) -> BalanceSnapshot {
        let confirmed = self
            .balances
            .read()
            .get(&(address.clone(), property))
            .copied()
            .unwrap_or(0);
        let available = confirmed.saturating_sub(self.pending_outgoing(address, property));
        BalanceSnapshot::new(confirmed, available)
    }
}

impl PropertyRegistry for InMemoryLedger {
    fn property(&self, id: PropertyId) -> Option<PropertyDescriptor> {
        self.properties.read().get(&id).cloned()
    }
}

impl DexOrderBook for InMemoryLedger {
    fn offer(&self, seller: &Address, property: PropertyId) -> Option<OfferDescriptor> {
        self.offers.read().get(&(seller.clone(), property)).cloned()
    }

    fn offer_exists(&self, seller: &Address, property: PropertyId) -> bool {
        self.offers.read().contains_key(&(seller.clone(), property))
    }
}

impl PendingTracker for InMemoryLedger {
    fn record(&self, entry: PendingEntry) {
        debug!(txid = %entry.txid, kind = ?entry.kind, sender = %entry.sender, "pending entry recorded");
        self.pending.write().push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DexAction;

    fn alice() -> Address {
        Address::from("1Alice")
    }

    fn bob() -> Address {
        Address::from("1Bob")
    }

    fn send(txid: u8, amount: i64) -> PendingEntry {
        PendingEntry {
            txid: TxId::from_bytes([txid; 32]),
            sender: alice(),
            recipient: Some(bob()),
            kind: TxKind::SimpleSend,
            property: PropertyId(3),
            amount,
            property_desired: None,
            amount_desired: 0,
            action: 0,
            min_accept_fee: 0,
            payment_window: 0,
        }
    }

    fn sell(txid: u8, action: DexAction, amount: i64) -> PendingEntry {
        PendingEntry {
            txid: TxId::from_bytes([txid; 32]),
            sender: alice(),
            recipient: None,
            kind: TxKind::TradeOffer,
            property: PropertyId::OMNI,
            amount,
            property_desired: None,
            amount_desired: 10,
            action: action.code(),
            min_accept_fee: 10_000,
            payment_window: 20,
        }
    }

    #[test]
    fn test_unknown_balance_is_zero() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.balance(&alice(), PropertyId(3)), BalanceSnapshot::default());
    }

    #[test]
    fn test_pending_reduces_available_only() {
        let ledger = InMemoryLedger::new();
        ledger.set_balance(&alice(), PropertyId(3), 100);
        ledger.record(send(1, 30));
        ledger.record(send(2, 20));

        let snapshot = ledger.balance(&alice(), PropertyId(3));
        assert_eq!(snapshot.confirmed, 100);
        assert_eq!(snapshot.available, 50);
        // Other properties are untouched.
        assert_eq!(ledger.balance(&alice(), PropertyId(4)).available, 0);
    }

    #[test]
    fn test_confirm_moves_funds() {
        let ledger = InMemoryLedger::new();
        ledger.set_balance(&alice(), PropertyId(3), 100);
        ledger.record(send(1, 30));

        let confirmed = ledger.confirm(&TxId::from_bytes([1; 32])).unwrap();
        assert_eq!(confirmed.amount, 30);
        assert_eq!(ledger.pending_count(), 0);
        assert_eq!(ledger.balance(&alice(), PropertyId(3)), BalanceSnapshot::settled(70));
        assert_eq!(ledger.balance(&bob(), PropertyId(3)), BalanceSnapshot::settled(30));
    }

    #[test]
    fn test_evict_restores_available() {
        let ledger = InMemoryLedger::new();
        ledger.set_balance(&alice(), PropertyId(3), 100);
        ledger.record(send(1, 30));
        assert!(ledger.evict(&TxId::from_bytes([1; 32])).is_some());
        assert!(ledger.evict(&TxId::from_bytes([1; 32])).is_none());
        assert_eq!(ledger.balance(&alice(), PropertyId(3)), BalanceSnapshot::settled(100));
    }

    #[test]
    fn test_property_and_crowdsale_state() {
        let ledger = InMemoryLedger::new();
        assert!(!ledger.set_crowdsale_active(PropertyId(5), true));

        ledger.register_property(PropertyDescriptor::new(PropertyId(5), "Quantum", false, alice()));
        assert!(!ledger.is_crowdsale_active(PropertyId(5)));
        assert!(ledger.set_crowdsale_active(PropertyId(5), true));
        assert!(ledger.is_crowdsale_active(PropertyId(5)));
        assert_eq!(ledger.property(PropertyId(5)).unwrap().issuer, alice());
    }

    #[test]
    fn test_offer_book() {
        let ledger = InMemoryLedger::new();
        let offer = OfferDescriptor {
            seller: alice(),
            property: PropertyId::OMNI,
            amount_for_sale: 100,
            amount_desired: 10,
            min_accept_fee: 10_000,
            payment_window: 20,
        };
        ledger.open_offer(offer.clone());
        assert!(ledger.offer_exists(&alice(), PropertyId::OMNI));
        assert!(!ledger.offer_exists(&alice(), PropertyId::TEST_OMNI));
        assert_eq!(ledger.close_offer(&alice(), PropertyId::OMNI), Some(offer));
        assert!(ledger.offer(&alice(), PropertyId::OMNI).is_none());
    }

    #[test]
    fn test_confirmed_sell_opens_offer() {
        let ledger = InMemoryLedger::new();
        ledger.set_balance(&alice(), PropertyId::OMNI, 1000);
        ledger.record(sell(1, DexAction::New, 400));
        assert!(!ledger.offer_exists(&alice(), PropertyId::OMNI));

        ledger.confirm(&TxId::from_bytes([1; 32])).unwrap();
        let offer = ledger.offer(&alice(), PropertyId::OMNI).unwrap();
        assert_eq!(offer.amount_for_sale, 400);
        assert_eq!(offer.min_accept_fee, 10_000);
        assert_eq!(offer.payment_window, 20);
        assert_eq!(ledger.balance(&alice(), PropertyId::OMNI), BalanceSnapshot::settled(600));
    }

    #[test]
    fn test_confirmed_update_swaps_reserve() {
        let ledger = InMemoryLedger::new();
        ledger.set_balance(&alice(), PropertyId::OMNI, 1000);
        ledger.record(sell(1, DexAction::New, 400));
        ledger.confirm(&TxId::from_bytes([1; 32])).unwrap();

        ledger.record(sell(2, DexAction::Update, 600));
        ledger.confirm(&TxId::from_bytes([2; 32])).unwrap();
        assert_eq!(
            ledger.offer(&alice(), PropertyId::OMNI).unwrap().amount_for_sale,
            600
        );
        assert_eq!(ledger.balance(&alice(), PropertyId::OMNI), BalanceSnapshot::settled(400));
    }

    #[test]
    fn test_confirmed_cancel_releases_reserve() {
        let ledger = InMemoryLedger::new();
        ledger.set_balance(&alice(), PropertyId::OMNI, 1000);
        ledger.record(sell(1, DexAction::New, 400));
        ledger.confirm(&TxId::from_bytes([1; 32])).unwrap();

        ledger.record(sell(2, DexAction::Cancel, 0));
        ledger.confirm(&TxId::from_bytes([2; 32])).unwrap();
        assert!(!ledger.offer_exists(&alice(), PropertyId::OMNI));
        assert_eq!(ledger.balance(&alice(), PropertyId::OMNI), BalanceSnapshot::settled(1000));
    }
}

//! Process-wide fee policy with scoped override.
//!
//! ## Critical Section
//!
//! ```text
//! scoped_override(policy) ──lock──→ save prior ──→ install override
//!                                                       │
//!                                         builder runs with &FeePolicy
//!                                                       │
//! guard dropped (return / error / unwind) ──→ restore prior ──unlock──→
//! ```
//!
//! The lock is held for the guard's whole lifetime, so a concurrent
//! `current()` blocks until the prior policy is back in place and can never
//! observe an override that belongs to another command. Code holding a guard
//! must read the policy through the guard, never through `current()`.

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::trace;

/// Byte denominator fee rates are expressed against.
pub const FEE_RATE_BYTES: u64 = 1000;

/// Fee rate in base-ledger minor units per 1000 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRate(i64);

impl FeeRate {
    pub fn per_kilobyte(fee: i64) -> Self {
        Self(fee)
    }

    /// Rate that pays `fee_paid` for a transaction of `bytes` bytes.
    pub fn new(fee_paid: i64, bytes: u64) -> Self {
        if bytes == 0 {
            return Self(0);
        }
        let rate = i128::from(fee_paid) * i128::from(FEE_RATE_BYTES) / i128::from(bytes);
        Self(rate.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }

    pub fn fee_per_kilobyte(self) -> i64 {
        self.0
    }

    /// Fee owed by a transaction of `bytes` bytes.
    pub fn fee_for(self, bytes: u64) -> i64 {
        let fee = i128::from(self.0) * i128::from(bytes) / i128::from(FEE_RATE_BYTES);
        if fee == 0 && self.0 > 0 && bytes > 0 {
            // Never round a non-zero rate down to a free transaction.
            return self.0;
        }
        fee.clamp(0, i128::from(i64::MAX)) as i64
    }
}

/// Fee settings the transaction builder obeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeePolicy {
    pub fee_rate: FeeRate,
    /// Pay at least the custom rate, even when a lower fee would relay.
    pub pay_at_least_custom_fee: bool,
}

impl FeePolicy {
    pub fn new(fee_rate: FeeRate, pay_at_least_custom_fee: bool) -> Self {
        Self {
            fee_rate,
            pay_at_least_custom_fee,
        }
    }

    /// Policy that forces at least `fee_rate`.
    pub fn at_least(fee_rate: FeeRate) -> Self {
        Self::new(fee_rate, true)
    }
}

/// Shared, mutable fee policy of the process.
#[derive(Debug, Default)]
pub struct FeePolicyContext {
    slot: Mutex<FeePolicy>,
}

impl FeePolicyContext {
    pub fn new(initial: FeePolicy) -> Self {
        Self {
            slot: Mutex::new(initial),
        }
    }

    /// Snapshot of the policy in force.
    pub fn current(&self) -> FeePolicy {
        *self.slot.lock()
    }

    /// Replaces the policy permanently (operator fee settings).
    pub fn set(&self, policy: FeePolicy) {
        *self.slot.lock() = policy;
    }

    /// Installs `policy` until the returned guard is dropped.
    pub fn scoped_override(&self, policy: FeePolicy) -> FeeOverrideGuard<'_> {
        let mut slot = self.slot.lock();
        let saved = *slot;
        *slot = policy;
        trace!(?saved, installed = ?policy, "fee policy override installed");
        FeeOverrideGuard { slot, saved }
    }
}

/// Holds a fee override in place; restores the prior policy on drop.
pub struct FeeOverrideGuard<'a> {
    slot: MutexGuard<'a, FeePolicy>,
    saved: FeePolicy,
}

impl FeeOverrideGuard<'_> {
    /// Policy that will be restored.
    pub fn saved(&self) -> FeePolicy {
        self.saved
    }
}

impl Deref for FeeOverrideGuard<'_> {
    type Target = FeePolicy;

    fn deref(&self) -> &FeePolicy {
        &self.slot
    }
}

impl Drop for FeeOverrideGuard<'_> {
    fn drop(&mut self) {
        *self.slot = self.saved;
        trace!(restored = ?self.saved, "fee policy override released");
    }
}

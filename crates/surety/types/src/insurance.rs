//! Policies and the credit ledger
//!
//! The `PolicyBook` owns premiums and withdrawable credits. Premiums are
//! tracked per `(flight key, passenger)` pair; a passenger's observable
//! "running total" is the sum over flights. Credits only grow through
//! consensus-triggered payouts and only shrink through withdrawal.

use crate::{AccountId, Amount, FlightKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One passenger's cumulative premium against one flight.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Policy {
    pub passenger: AccountId,
    /// Cumulative premium paid; zeroed when the payout is credited
    pub premium: Amount,
    /// Set when the payout has been credited — exactly one credit per
    /// (passenger, resolved flight) pair
    pub settled: bool,
    pub purchased_at: DateTime<Utc>,
}

impl Policy {
    pub fn new(passenger: AccountId) -> Self {
        Self {
            passenger,
            premium: Amount::zero(),
            settled: false,
            purchased_at: Utc::now(),
        }
    }
}

/// Premiums per flight plus the passenger credit ledger.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PolicyBook {
    /// Policies keyed by flight, then passenger
    policies: HashMap<FlightKey, HashMap<AccountId, Policy>>,
    /// Withdrawable credit per passenger; never negative by construction
    credits: HashMap<AccountId, Amount>,
}

impl PolicyBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate a premium payment into the passenger's policy for a flight.
    pub fn add_premium(&mut self, key: &FlightKey, passenger: &AccountId, payment: Amount) {
        let policy = self
            .policies
            .entry(key.clone())
            .or_default()
            .entry(passenger.clone())
            .or_insert_with(|| Policy::new(passenger.clone()));
        policy.premium = policy.premium.saturating_add(payment);
    }

    pub fn policy(&self, key: &FlightKey, passenger: &AccountId) -> Option<&Policy> {
        self.policies.get(key).and_then(|p| p.get(passenger))
    }

    pub fn policy_mut(&mut self, key: &FlightKey, passenger: &AccountId) -> Option<&mut Policy> {
        self.policies.get_mut(key).and_then(|p| p.get_mut(passenger))
    }

    /// All policies held against one flight.
    pub fn policies_for_mut(
        &mut self,
        key: &FlightKey,
    ) -> impl Iterator<Item = &mut Policy> {
        self.policies.get_mut(key).into_iter().flat_map(|p| p.values_mut())
    }

    /// Premium outstanding for one `(flight, passenger)` pair.
    pub fn premium_of(&self, key: &FlightKey, passenger: &AccountId) -> Amount {
        self.policy(key, passenger)
            .map(|p| p.premium)
            .unwrap_or_default()
    }

    /// The passenger's running premium total across all flights. Matches
    /// the observed single-total query surface; consumed premiums are
    /// zeroed at credit time and drop out of this total.
    pub fn total_premium_of(&self, passenger: &AccountId) -> Amount {
        self.policies
            .values()
            .filter_map(|p| p.get(passenger))
            .fold(Amount::zero(), |acc, p| acc.saturating_add(p.premium))
    }

    /// Add to a passenger's withdrawable credit.
    pub fn credit(&mut self, passenger: &AccountId, amount: Amount) {
        let entry = self.credits.entry(passenger.clone()).or_default();
        *entry = entry.saturating_add(amount);
    }

    pub fn credit_of(&self, passenger: &AccountId) -> Amount {
        self.credits.get(passenger).copied().unwrap_or_default()
    }

    /// Remove and return the passenger's entire credit. The ledger entry is
    /// zeroed before the caller sees the amount — state first, value second.
    pub fn take_credit(&mut self, passenger: &AccountId) -> Amount {
        self.credits.remove(passenger).unwrap_or_default()
    }
}

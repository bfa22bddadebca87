//! Airline records: who is admitted and who is funded
//!
//! The `AirlineTable` is the canonical "who's in" structure for the
//! registry. It stores admission and funding state plus the pending vote
//! sets for candidates under multiparty consensus. It does NOT decide
//! admission — that policy lives in the runtime registry.

use crate::{AccountId, Amount, SuretyError, SuretyResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A record for a single admitted airline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AirlineRecord {
    pub id: AccountId,
    /// Only funded airlines may sponsor candidates or register flights
    pub funded: bool,
    pub balance: Amount,
    /// Sponsor votes received while admission required multiparty consensus
    pub votes: BTreeSet<AccountId>,
    pub joined_at: DateTime<Utc>,
}

impl AirlineRecord {
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            funded: false,
            balance: Amount::zero(),
            votes: BTreeSet::new(),
            joined_at: Utc::now(),
        }
    }

    pub fn with_votes(mut self, votes: BTreeSet<AccountId>) -> Self {
        self.votes = votes;
        self
    }
}

/// All admitted airlines plus pending admission votes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AirlineTable {
    airlines: HashMap<AccountId, AirlineRecord>,
    /// Votes for candidates not yet admitted, keyed by candidate
    pending_votes: HashMap<AccountId, BTreeSet<AccountId>>,
}

impl AirlineTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit an airline. Rejects duplicates and clears any pending votes
    /// that were tracked for the candidate.
    pub fn admit(&mut self, record: AirlineRecord) -> SuretyResult<()> {
        if self.airlines.contains_key(&record.id) {
            return Err(SuretyError::AlreadyRegistered(record.id.to_string()));
        }
        self.pending_votes.remove(&record.id);
        self.airlines.insert(record.id.clone(), record);
        Ok(())
    }

    /// Record a sponsor vote for a pending candidate. Returns `(inserted,
    /// total)` — `inserted` is false for a duplicate vote by the same
    /// sponsor, which must not double-count.
    pub fn record_vote(&mut self, candidate: &AccountId, sponsor: AccountId) -> (bool, usize) {
        let votes = self.pending_votes.entry(candidate.clone()).or_default();
        let inserted = votes.insert(sponsor);
        (inserted, votes.len())
    }

    /// Remove and return the pending votes for a candidate.
    pub fn take_votes(&mut self, candidate: &AccountId) -> BTreeSet<AccountId> {
        self.pending_votes.remove(candidate).unwrap_or_default()
    }

    pub fn get(&self, id: &AccountId) -> Option<&AirlineRecord> {
        self.airlines.get(id)
    }

    pub fn get_mut(&mut self, id: &AccountId) -> Option<&mut AirlineRecord> {
        self.airlines.get_mut(id)
    }

    pub fn is_registered(&self, id: &AccountId) -> bool {
        self.airlines.contains_key(id)
    }

    pub fn is_funded(&self, id: &AccountId) -> bool {
        self.airlines.get(id).map(|a| a.funded).unwrap_or(false)
    }

    pub fn balance_of(&self, id: &AccountId) -> Option<Amount> {
        self.airlines.get(id).map(|a| a.balance)
    }

    /// All admitted airline ids, sorted for deterministic iteration.
    pub fn registered_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.airlines.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of admitted airlines.
    pub fn admitted_count(&self) -> usize {
        self.airlines.len()
    }
}

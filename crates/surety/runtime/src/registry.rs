//! Airline Registry — admission voting and funding
//!
//! Admission is single-sponsor while the registry is small. From the
//! multiparty threshold onward, each candidate collects votes from distinct
//! funded sponsors across separate calls and is admitted the instant the
//! vote count reaches half the admitted airlines, rounded up. The quorum is
//! evaluated against the admitted count at vote time, not a snapshot taken
//! at the first vote.

use crate::config::SuretyConfig;
use surety_types::{AccountId, AirlineRecord, AirlineTable, Amount, SuretyError, SuretyResult};
use tracing::{debug, info};

/// Result of a registration call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// Candidate is now admitted
    Admitted,
    /// Vote accepted, quorum not yet reached
    VoteRecorded { votes: usize, needed: usize },
    /// Same sponsor voted for the same pending candidate again — no-op
    DuplicateVote { votes: usize },
}

/// Manages airline admission and funding state.
pub struct AirlineRegistry {
    airlines: AirlineTable,
    config: SuretyConfig,
}

impl AirlineRegistry {
    /// Create a registry with the genesis airline pre-admitted, unfunded.
    pub fn new(config: SuretyConfig, genesis: AccountId) -> Self {
        let mut airlines = AirlineTable::new();
        // Fresh table, cannot collide
        let _ = airlines.admit(AirlineRecord::new(genesis.clone()));

        info!(airline = %genesis, "genesis airline admitted");

        Self { airlines, config }
    }

    /// Sponsor a candidate for admission.
    pub fn register_airline(
        &mut self,
        sponsor: &AccountId,
        candidate: AccountId,
    ) -> SuretyResult<AdmissionOutcome> {
        if !self.airlines.is_funded(sponsor) {
            return Err(SuretyError::Unauthorized {
                account: sponsor.clone(),
                action: "sponsor an airline",
            });
        }
        if self.airlines.is_registered(&candidate) {
            return Err(SuretyError::AlreadyRegistered(candidate.to_string()));
        }

        let admitted = self.airlines.admitted_count();
        if admitted < self.config.multiparty_threshold {
            self.airlines.admit(AirlineRecord::new(candidate.clone()))?;
            info!(airline = %candidate, sponsor = %sponsor, "airline admitted by single sponsor");
            return Ok(AdmissionOutcome::Admitted);
        }

        let (inserted, votes) = self.airlines.record_vote(&candidate, sponsor.clone());
        if !inserted {
            debug!(airline = %candidate, sponsor = %sponsor, "duplicate admission vote ignored");
            return Ok(AdmissionOutcome::DuplicateVote { votes });
        }

        let needed = admitted.div_ceil(2);
        if votes >= needed {
            let ballot = self.airlines.take_votes(&candidate);
            self.airlines
                .admit(AirlineRecord::new(candidate.clone()).with_votes(ballot))?;
            info!(airline = %candidate, votes, needed, "airline admitted by multiparty consensus");
            Ok(AdmissionOutcome::Admitted)
        } else {
            debug!(airline = %candidate, sponsor = %sponsor, votes, needed, "admission vote recorded");
            Ok(AdmissionOutcome::VoteRecorded { votes, needed })
        }
    }

    /// Deposit funding. The first deposit at or above the minimum marks the
    /// airline funded; later deposits just accumulate.
    pub fn fund_airline(&mut self, airline: &AccountId, amount: Amount) -> SuretyResult<()> {
        if !self.airlines.is_registered(airline) {
            return Err(SuretyError::NotRegistered(airline.clone()));
        }
        if amount < self.config.min_funding {
            return Err(SuretyError::InsufficientFunding {
                offered: amount,
                required: self.config.min_funding,
            });
        }

        let record = self
            .airlines
            .get_mut(airline)
            .ok_or_else(|| SuretyError::NotRegistered(airline.clone()))?;
        record.balance = record.balance.saturating_add(amount);
        record.funded = true;

        info!(airline = %airline, amount = %amount, balance = %record.balance, "airline funded");
        Ok(())
    }

    // --- Query methods ---

    pub fn is_registered(&self, airline: &AccountId) -> bool {
        self.airlines.is_registered(airline)
    }

    pub fn is_funded(&self, airline: &AccountId) -> bool {
        self.airlines.is_funded(airline)
    }

    pub fn balance_of(&self, airline: &AccountId) -> Option<Amount> {
        self.airlines.balance_of(airline)
    }

    pub fn registered_airlines(&self) -> Vec<AccountId> {
        self.airlines.registered_ids()
    }

    pub fn registered_count(&self) -> usize {
        self.airlines.admitted_count()
    }

    /// Table access for components that must check funding state.
    pub fn table(&self) -> &AirlineTable {
        &self.airlines
    }
}

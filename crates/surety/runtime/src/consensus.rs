//! Consensus Resolver — request rounds and response tallies
//!
//! Per flight the state machine is `IDLE → REQUESTED → RESOLVED`. Each
//! request draws a fresh index and opens an independent round; responses
//! are partitioned by `(flight, index, status)` and contributors are
//! tracked as a set, so out-of-order and duplicate submissions cannot
//! double-count. The first tally to collect `min_responses` distinct
//! oracles locks the flight's status. A round that never reaches quorum is
//! simply abandoned — callers re-request, which opens a new round under a
//! new index.

use crate::{
    config::SuretyConfig, flights::FlightCatalog, insurance::InsuranceLedger,
    oracles::OracleDirectory, sampler::IndexSampler,
};
use std::collections::{BTreeSet, HashMap};
use surety_types::{
    AccountId, EventLog, FlightKey, FlightStatus, LedgerEvent, ResponseKey, SuretyError,
    SuretyResult,
};
use tracing::{debug, info};

/// Result of submitting one oracle response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Response counted, quorum not yet reached
    Accepted { responses: usize },
    /// Same oracle already in this tally — no effect
    Duplicate { responses: usize },
    /// This response completed the quorum and resolved the flight
    Finalized { status: FlightStatus },
}

pub struct ConsensusResolver {
    /// Open request indexes per flight; several rounds may run at once
    open_requests: HashMap<FlightKey, BTreeSet<u8>>,
    /// Distinct contributors per `(flight, index, status)` triple
    tallies: HashMap<ResponseKey, BTreeSet<AccountId>>,
    config: SuretyConfig,
}

impl ConsensusResolver {
    pub fn new(config: SuretyConfig) -> Self {
        Self {
            open_requests: HashMap::new(),
            tallies: HashMap::new(),
            config,
        }
    }

    /// Open a status round for a flight. Draws a fresh request index and
    /// emits the oracle-request event; oracles holding that index respond.
    pub fn fetch_flight_status(
        &mut self,
        catalog: &FlightCatalog,
        sampler: &mut IndexSampler,
        key: &FlightKey,
        events: &mut EventLog,
    ) -> SuretyResult<u8> {
        if !catalog.is_registered(key) {
            return Err(SuretyError::FlightNotRegistered);
        }
        if catalog.is_resolved(key) {
            return Err(SuretyError::AlreadyResolved);
        }

        let index = sampler.draw(self.config.bucket_space);
        self.open_requests.entry(key.clone()).or_default().insert(index);

        events.log(LedgerEvent::OracleRequest {
            index,
            airline: key.airline.clone(),
            flight: key.flight.clone(),
            departs_at: key.departs_at,
        });

        info!(flight = %key, index, "status round opened");
        Ok(index)
    }

    /// Submit one oracle's answer for an open round.
    pub fn submit_oracle_response(
        &mut self,
        directory: &OracleDirectory,
        catalog: &mut FlightCatalog,
        insurance: &mut InsuranceLedger,
        oracle: &AccountId,
        index: u8,
        key: &FlightKey,
        status: FlightStatus,
        events: &mut EventLog,
    ) -> SuretyResult<ResponseOutcome> {
        let indexes = directory.indexes_of(oracle)?;
        if !indexes.contains(&index) {
            return Err(SuretyError::UnauthorizedOracle {
                oracle: oracle.clone(),
                index,
            });
        }
        if catalog.is_resolved(key) {
            return Err(SuretyError::AlreadyResolved);
        }
        let round_open = self
            .open_requests
            .get(key)
            .map(|indexes| indexes.contains(&index))
            .unwrap_or(false);
        if !round_open {
            return Err(SuretyError::UnknownRequest { index });
        }

        let tally = self
            .tallies
            .entry(ResponseKey {
                flight: key.clone(),
                index,
                status,
            })
            .or_default();
        if !tally.insert(oracle.clone()) {
            debug!(flight = %key, oracle = %oracle, index, "duplicate oracle response ignored");
            return Ok(ResponseOutcome::Duplicate {
                responses: tally.len(),
            });
        }
        let responses = tally.len();

        debug!(flight = %key, oracle = %oracle, index, status = %status, responses, "oracle response recorded");

        if responses < self.config.min_responses {
            return Ok(ResponseOutcome::Accepted { responses });
        }

        // First quorum wins: write-once status, then the payout side effect.
        catalog.record_resolution(key, status)?;
        self.open_requests.remove(key);
        self.tallies.retain(|k, _| k.flight != *key);

        events.log(LedgerEvent::FlightStatusUpdated {
            airline: key.airline.clone(),
            flight: key.flight.clone(),
            departs_at: key.departs_at,
            status,
        });

        if status.is_airline_fault() {
            let credited = insurance.credit_flight(key);
            info!(flight = %key, credited, "airline-fault resolution credited policyholders");
        }

        info!(flight = %key, status = %status, responses, "consensus reached");
        Ok(ResponseOutcome::Finalized { status })
    }

    /// True iff a round with this index is open for the flight.
    pub fn has_open_request(&self, key: &FlightKey, index: u8) -> bool {
        self.open_requests
            .get(key)
            .map(|indexes| indexes.contains(&index))
            .unwrap_or(false)
    }

    /// Open rounds for a flight, across all indexes.
    pub fn open_round_count(&self, key: &FlightKey) -> usize {
        self.open_requests.get(key).map(|s| s.len()).unwrap_or(0)
    }
}

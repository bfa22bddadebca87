//! SuretyApp — the unified application surface
//!
//! Composes the component managers behind the full command/query surface
//! and enforces the invariants that cross them: the operational gate guards
//! every mutating command, the resolver is the only writer of flight
//! status, and the insurance ledger credits each policy at most once.
//!
//! This is the runtime counterpart of the tables in `surety-types`.

use crate::{
    config::SuretyConfig,
    consensus::{ConsensusResolver, ResponseOutcome},
    flights::FlightCatalog,
    gate::OperationalGate,
    insurance::InsuranceLedger,
    oracles::OracleDirectory,
    registry::{AdmissionOutcome, AirlineRegistry},
    sampler::IndexSampler,
};
use chrono::{DateTime, Utc};
use surety_types::{
    AccountId, Amount, EventLog, FlightKey, FlightStatus, LedgerEvent, SuretyResult,
};
use tracing::info;

/// The FlightSurety core. All state lives here; callers interact only
/// through the operations below, each of which completes or fails
/// synchronously.
pub struct SuretyApp {
    gate: OperationalGate,
    registry: AirlineRegistry,
    directory: OracleDirectory,
    catalog: FlightCatalog,
    resolver: ConsensusResolver,
    insurance: InsuranceLedger,
    sampler: IndexSampler,
    events: EventLog,
}

impl SuretyApp {
    /// Production construction: OS-entropy sampler, default protocol
    /// constants, one genesis airline pre-registered and unfunded.
    pub fn new(owner: AccountId, genesis_airline: AccountId) -> Self {
        Self::with_parts(
            SuretyConfig::default(),
            owner,
            genesis_airline,
            IndexSampler::from_entropy(),
        )
    }

    /// Deterministic construction for tests and replay.
    pub fn seeded(owner: AccountId, genesis_airline: AccountId, seed: u64) -> Self {
        Self::with_parts(
            SuretyConfig::default(),
            owner,
            genesis_airline,
            IndexSampler::seeded(seed),
        )
    }

    /// Full control over configuration and randomness.
    pub fn with_parts(
        config: SuretyConfig,
        owner: AccountId,
        genesis_airline: AccountId,
        sampler: IndexSampler,
    ) -> Self {
        info!(owner = %owner, genesis = %genesis_airline, "surety core created");

        Self {
            gate: OperationalGate::new(owner),
            registry: AirlineRegistry::new(config.clone(), genesis_airline),
            directory: OracleDirectory::new(config.clone()),
            catalog: FlightCatalog::new(),
            resolver: ConsensusResolver::new(config.clone()),
            insurance: InsuranceLedger::new(config),
            sampler,
            events: EventLog::new(),
        }
    }

    fn flight_key(airline: &AccountId, flight: &str, departs_at: DateTime<Utc>) -> FlightKey {
        FlightKey::new(airline.clone(), flight, departs_at)
    }

    // --- Commands ---

    /// Owner-only gate toggle. Deliberately not gated itself, otherwise a
    /// closed gate could never be reopened.
    pub fn set_operating_status(
        &mut self,
        caller: &AccountId,
        operational: bool,
    ) -> SuretyResult<()> {
        self.gate.set_operating_status(caller, operational)
    }

    pub fn register_airline(
        &mut self,
        sponsor: &AccountId,
        candidate: AccountId,
    ) -> SuretyResult<AdmissionOutcome> {
        self.gate.ensure_operational()?;
        self.registry.register_airline(sponsor, candidate)
    }

    pub fn fund_airline(&mut self, airline: &AccountId, amount: Amount) -> SuretyResult<()> {
        self.gate.ensure_operational()?;
        self.registry.fund_airline(airline, amount)
    }

    pub fn register_flight(
        &mut self,
        airline: &AccountId,
        flight: &str,
        departs_at: DateTime<Utc>,
    ) -> SuretyResult<()> {
        self.gate.ensure_operational()?;
        let key = Self::flight_key(airline, flight, departs_at);
        self.catalog.register_flight(self.registry.table(), key)
    }

    pub fn buy_insurance(
        &mut self,
        passenger: &AccountId,
        airline: &AccountId,
        flight: &str,
        departs_at: DateTime<Utc>,
        payment: Amount,
    ) -> SuretyResult<()> {
        self.gate.ensure_operational()?;
        let key = Self::flight_key(airline, flight, departs_at);
        self.insurance
            .buy_insurance(&self.catalog, passenger, &key, payment)
    }

    /// Open a status round. Returns the request index oracles must match.
    pub fn fetch_flight_status(
        &mut self,
        airline: &AccountId,
        flight: &str,
        departs_at: DateTime<Utc>,
    ) -> SuretyResult<u8> {
        self.gate.ensure_operational()?;
        let key = Self::flight_key(airline, flight, departs_at);
        self.resolver
            .fetch_flight_status(&self.catalog, &mut self.sampler, &key, &mut self.events)
    }

    pub fn register_oracle(&mut self, oracle: AccountId, fee: Amount) -> SuretyResult<[u8; 3]> {
        self.gate.ensure_operational()?;
        self.directory
            .register_oracle(&mut self.sampler, oracle, fee)
    }

    /// Submit one oracle response; `status_code` is the wire value.
    pub fn submit_oracle_response(
        &mut self,
        oracle: &AccountId,
        index: u8,
        airline: &AccountId,
        flight: &str,
        departs_at: DateTime<Utc>,
        status_code: u8,
    ) -> SuretyResult<ResponseOutcome> {
        self.gate.ensure_operational()?;
        let status = FlightStatus::from_code(status_code)?;
        let key = Self::flight_key(airline, flight, departs_at);
        self.resolver.submit_oracle_response(
            &self.directory,
            &mut self.catalog,
            &mut self.insurance,
            oracle,
            index,
            &key,
            status,
            &mut self.events,
        )
    }

    pub fn claim_insurance(
        &mut self,
        passenger: &AccountId,
        airline: &AccountId,
        flight: &str,
        departs_at: DateTime<Utc>,
    ) -> SuretyResult<Amount> {
        self.gate.ensure_operational()?;
        let key = Self::flight_key(airline, flight, departs_at);
        self.insurance.claim_insurance(&self.catalog, passenger, &key)
    }

    pub fn withdraw(&mut self, passenger: &AccountId) -> SuretyResult<Amount> {
        self.gate.ensure_operational()?;
        self.insurance.withdraw(passenger)
    }

    // --- Queries (side-effect free) ---

    pub fn is_operational(&self) -> bool {
        self.gate.is_operational()
    }

    pub fn is_airline_registered(&self, airline: &AccountId) -> bool {
        self.registry.is_registered(airline)
    }

    pub fn is_airline_funded(&self, airline: &AccountId) -> bool {
        self.registry.is_funded(airline)
    }

    pub fn airline_balance(&self, airline: &AccountId) -> Option<Amount> {
        self.registry.balance_of(airline)
    }

    pub fn registered_airlines(&self) -> Vec<AccountId> {
        self.registry.registered_airlines()
    }

    pub fn is_flight_registered(
        &self,
        airline: &AccountId,
        flight: &str,
        departs_at: DateTime<Utc>,
    ) -> bool {
        self.catalog
            .is_registered(&Self::flight_key(airline, flight, departs_at))
    }

    pub fn flight_status(
        &self,
        airline: &AccountId,
        flight: &str,
        departs_at: DateTime<Utc>,
    ) -> Option<FlightStatus> {
        self.catalog
            .status_of(&Self::flight_key(airline, flight, departs_at))
    }

    pub fn oracle_indexes(&self, oracle: &AccountId) -> SuretyResult<[u8; 3]> {
        self.directory.indexes_of(oracle)
    }

    /// Running premium total across flights (the observed `checkPremium`).
    pub fn premium_of(&self, passenger: &AccountId) -> Amount {
        self.insurance.total_premium_of(passenger)
    }

    pub fn credit_of(&self, passenger: &AccountId) -> Amount {
        self.insurance.credit_of(passenger)
    }

    /// Drain pending outbound events, oldest first. The core appends and
    /// never blocks on consumption.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        self.events.drain()
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }
}

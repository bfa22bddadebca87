//! Flight records: what is scheduled and how it resolved
//!
//! A flight is keyed by `(airline, flight code, departure timestamp)` and
//! carries a status that is written exactly once, by the consensus
//! resolver's finalize step. The `FlightBoard` is the source of truth for
//! "which flights exist and how they resolved".

use crate::{AccountId, SuretyError, SuretyResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Composite key identifying one scheduled flight.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlightKey {
    /// Operating airline
    pub airline: AccountId,
    /// Flight code, e.g. "SK806"
    pub flight: String,
    /// Scheduled departure
    pub departs_at: DateTime<Utc>,
}

impl FlightKey {
    pub fn new(airline: AccountId, flight: impl Into<String>, departs_at: DateTime<Utc>) -> Self {
        Self {
            airline,
            flight: flight.into(),
            departs_at,
        }
    }
}

impl std::fmt::Display for FlightKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.airline, self.flight, self.departs_at)
    }
}

/// Resolved status of a flight, with fixed wire codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FlightStatus {
    #[default]
    Unknown,
    OnTime,
    LateAirline,
    LateWeather,
    LateTechnical,
    LateOther,
}

impl FlightStatus {
    /// Wire value. These codes round-trip exactly and must never change.
    pub const fn code(self) -> u8 {
        match self {
            FlightStatus::Unknown => 0,
            FlightStatus::OnTime => 10,
            FlightStatus::LateAirline => 20,
            FlightStatus::LateWeather => 30,
            FlightStatus::LateTechnical => 40,
            FlightStatus::LateOther => 50,
        }
    }

    pub fn from_code(code: u8) -> SuretyResult<Self> {
        match code {
            0 => Ok(FlightStatus::Unknown),
            10 => Ok(FlightStatus::OnTime),
            20 => Ok(FlightStatus::LateAirline),
            30 => Ok(FlightStatus::LateWeather),
            40 => Ok(FlightStatus::LateTechnical),
            50 => Ok(FlightStatus::LateOther),
            other => Err(SuretyError::UnknownStatusCode(other)),
        }
    }

    /// Only airline-caused delays qualify for insurance payouts.
    pub fn is_airline_fault(self) -> bool {
        matches!(self, FlightStatus::LateAirline)
    }
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlightStatus::Unknown => "unknown",
            FlightStatus::OnTime => "on-time",
            FlightStatus::LateAirline => "late-airline",
            FlightStatus::LateWeather => "late-weather",
            FlightStatus::LateTechnical => "late-technical",
            FlightStatus::LateOther => "late-other",
        };
        write!(f, "{}", name)
    }
}

/// One registered flight and its resolution state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlightRecord {
    pub key: FlightKey,
    /// Current status; meaningful only once `resolved` is true
    pub status: FlightStatus,
    /// Write-once flag: set together with `status` at finalize time
    pub resolved: bool,
    pub registered_at: DateTime<Utc>,
}

impl FlightRecord {
    pub fn new(key: FlightKey) -> Self {
        Self {
            key,
            status: FlightStatus::Unknown,
            resolved: false,
            registered_at: Utc::now(),
        }
    }

    /// Set the final status. Check-and-set in one step: a resolved flight
    /// never changes status again.
    pub fn resolve(&mut self, status: FlightStatus) -> SuretyResult<()> {
        if self.resolved {
            return Err(SuretyError::AlreadyResolved);
        }
        self.status = status;
        self.resolved = true;
        Ok(())
    }
}

/// All registered flights, keyed by flight key.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FlightBoard {
    flights: HashMap<FlightKey, FlightRecord>,
}

impl FlightBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a flight. Duplicate keys are rejected.
    pub fn add(&mut self, record: FlightRecord) -> SuretyResult<()> {
        if self.flights.contains_key(&record.key) {
            return Err(SuretyError::AlreadyRegistered(record.key.to_string()));
        }
        self.flights.insert(record.key.clone(), record);
        Ok(())
    }

    pub fn get(&self, key: &FlightKey) -> Option<&FlightRecord> {
        self.flights.get(key)
    }

    pub fn get_mut(&mut self, key: &FlightKey) -> Option<&mut FlightRecord> {
        self.flights.get_mut(key)
    }

    pub fn is_registered(&self, key: &FlightKey) -> bool {
        self.flights.contains_key(key)
    }

    pub fn is_resolved(&self, key: &FlightKey) -> bool {
        self.flights.get(key).map(|f| f.resolved).unwrap_or(false)
    }

    pub fn status_of(&self, key: &FlightKey) -> Option<FlightStatus> {
        self.flights.get(key).map(|f| f.status)
    }

    /// All flight keys, sorted for deterministic iteration.
    pub fn registered_flights(&self) -> Vec<FlightKey> {
        let mut keys: Vec<FlightKey> = self.flights.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

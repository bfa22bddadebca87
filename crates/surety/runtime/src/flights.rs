//! Flight Catalog — registered flights and their resolved status
//!
//! Funded airlines register flights; the consensus resolver is the only
//! writer of a flight's status, and it writes exactly once.

use surety_types::{
    AirlineTable, FlightBoard, FlightKey, FlightRecord, FlightStatus, SuretyError, SuretyResult,
};
use tracing::info;

pub struct FlightCatalog {
    flights: FlightBoard,
}

impl FlightCatalog {
    pub fn new() -> Self {
        Self {
            flights: FlightBoard::new(),
        }
    }

    /// Register a flight for a funded airline.
    pub fn register_flight(&mut self, airlines: &AirlineTable, key: FlightKey) -> SuretyResult<()> {
        if !airlines.is_funded(&key.airline) {
            return Err(SuretyError::Unauthorized {
                account: key.airline.clone(),
                action: "register a flight",
            });
        }
        self.flights.add(FlightRecord::new(key.clone()))?;

        info!(flight = %key, "flight registered");
        Ok(())
    }

    /// Write the final status. Only the consensus resolver calls this, and
    /// the record enforces write-once.
    pub(crate) fn record_resolution(
        &mut self,
        key: &FlightKey,
        status: FlightStatus,
    ) -> SuretyResult<()> {
        let record = self
            .flights
            .get_mut(key)
            .ok_or(SuretyError::FlightNotRegistered)?;
        record.resolve(status)?;

        info!(flight = %key, status = %status, "flight status resolved");
        Ok(())
    }

    // --- Query methods ---

    pub fn is_registered(&self, key: &FlightKey) -> bool {
        self.flights.is_registered(key)
    }

    pub fn is_resolved(&self, key: &FlightKey) -> bool {
        self.flights.is_resolved(key)
    }

    pub fn status_of(&self, key: &FlightKey) -> Option<FlightStatus> {
        self.flights.status_of(key)
    }

    pub fn registered_flights(&self) -> Vec<FlightKey> {
        self.flights.registered_flights()
    }

    pub fn flight_count(&self) -> usize {
        self.flights.len()
    }
}

impl Default for FlightCatalog {
    fn default() -> Self {
        Self::new()
    }
}

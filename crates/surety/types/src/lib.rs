//! FlightSurety domain types
//!
//! Pure data for the insurance ledger: identities, amounts, airline and
//! flight records, policies, oracle assignments, and the outbound event log.
//! These types store state and enforce local invariants — they do NOT make
//! policy decisions. Decision logic lives in `surety-runtime`.

pub mod airline;
pub mod error;
pub mod event;
pub mod flight;
pub mod insurance;
pub mod oracle;

pub use airline::{AirlineRecord, AirlineTable};
pub use error::{SuretyError, SuretyResult};
pub use event::{EventLog, LedgerEvent};
pub use flight::{FlightBoard, FlightKey, FlightRecord, FlightStatus};
pub use insurance::{Policy, PolicyBook};
pub use oracle::{OracleRecord, OracleRoster, ResponseKey};

use serde::{Deserialize, Serialize};

/// Subunits per whole unit of value. All amounts are subunit counts.
pub const UNIT: u64 = 1_000_000;

/// Identity of a participant: airline, passenger, oracle, or the gate owner.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    /// Generate a new random AccountId
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Create an AccountId from a known string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A quantity of value in subunits.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(pub u64);

impl Amount {
    pub const fn new(subunits: u64) -> Self {
        Self(subunits)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Whole units, e.g. `Amount::from_units(10)` for the airline funding floor.
    pub const fn from_units(units: u64) -> Self {
        Self(units * UNIT)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    /// Half of this amount, floored to whole subunits.
    pub fn half(self) -> Amount {
        Amount(self.0 / 2)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

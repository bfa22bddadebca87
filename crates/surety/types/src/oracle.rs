//! Oracle records: who answers status requests and for which buckets
//!
//! Each oracle is assigned three index buckets at registration, fixed for
//! its lifetime. A status request carries one bucket, and only oracles
//! holding that bucket may respond. Repeats across the three draws are
//! allowed — imperfect sharding is intentional.

use crate::{AccountId, FlightKey, FlightStatus, SuretyError, SuretyResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A registered oracle and its fixed bucket assignment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OracleRecord {
    pub id: AccountId,
    /// Assigned once at registration, never changed
    pub indexes: [u8; 3],
    pub registered_at: DateTime<Utc>,
}

impl OracleRecord {
    pub fn new(id: AccountId, indexes: [u8; 3]) -> Self {
        Self {
            id,
            indexes,
            registered_at: Utc::now(),
        }
    }

    pub fn holds_index(&self, index: u8) -> bool {
        self.indexes.contains(&index)
    }
}

/// All registered oracles, keyed by identity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OracleRoster {
    oracles: HashMap<AccountId, OracleRecord>,
}

impl OracleRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: OracleRecord) -> SuretyResult<()> {
        if self.oracles.contains_key(&record.id) {
            return Err(SuretyError::AlreadyRegistered(record.id.to_string()));
        }
        self.oracles.insert(record.id.clone(), record);
        Ok(())
    }

    pub fn get(&self, id: &AccountId) -> Option<&OracleRecord> {
        self.oracles.get(id)
    }

    pub fn is_registered(&self, id: &AccountId) -> bool {
        self.oracles.contains_key(id)
    }

    pub fn indexes_of(&self, id: &AccountId) -> SuretyResult<[u8; 3]> {
        self.oracles
            .get(id)
            .map(|o| o.indexes)
            .ok_or_else(|| SuretyError::NotRegistered(id.clone()))
    }

    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }
}

/// Tally key: one `(flight, request index, status)` triple.
///
/// Responses are partitioned by request index, so two concurrent rounds for
/// the same flight never cross-contaminate each other's tallies.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseKey {
    pub flight: FlightKey,
    pub index: u8,
    pub status: FlightStatus,
}

//! Outbound events
//!
//! The core never calls collaborators directly. It appends events to an
//! `EventLog` and moves on; oracle hosts and the presentation layer drain
//! the log on their own schedule. Appending never blocks.

use crate::{AccountId, FlightStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events emitted by the core for outside consumers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A status round was opened; oracles holding `index` should respond.
    OracleRequest {
        index: u8,
        airline: AccountId,
        flight: String,
        departs_at: DateTime<Utc>,
    },
    /// Consensus finalized a flight's status.
    FlightStatusUpdated {
        airline: AccountId,
        flight: String,
        departs_at: DateTime<Utc>,
        status: FlightStatus,
    },
}

/// Append-only outbox for ledger events.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> {
        self.events.iter()
    }

    /// Remove and return all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<LedgerEvent> {
        self.events.drain(..).collect()
    }
}

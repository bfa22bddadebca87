//! Oracle Directory — fee-gated registration and bucket assignment
//!
//! Every oracle pays a registration fee and receives three index buckets
//! from the shared sampler. The assignment is fixed for the oracle's
//! lifetime and is what authorizes it to answer a status request carrying
//! one of its buckets.

use crate::{config::SuretyConfig, sampler::IndexSampler};
use surety_types::{AccountId, Amount, OracleRecord, OracleRoster, SuretyError, SuretyResult};
use tracing::info;

pub struct OracleDirectory {
    roster: OracleRoster,
    config: SuretyConfig,
}

impl OracleDirectory {
    pub fn new(config: SuretyConfig) -> Self {
        Self {
            roster: OracleRoster::new(),
            config,
        }
    }

    /// Register an oracle and assign its three buckets.
    pub fn register_oracle(
        &mut self,
        sampler: &mut IndexSampler,
        oracle: AccountId,
        fee: Amount,
    ) -> SuretyResult<[u8; 3]> {
        if fee < self.config.registration_fee {
            return Err(SuretyError::InsufficientFee {
                offered: fee,
                required: self.config.registration_fee,
            });
        }
        if self.roster.is_registered(&oracle) {
            return Err(SuretyError::AlreadyRegistered(oracle.to_string()));
        }

        let indexes = sampler.draw_triple(self.config.bucket_space);
        self.roster.add(OracleRecord::new(oracle.clone(), indexes))?;

        info!(oracle = %oracle, ?indexes, "oracle registered");
        Ok(indexes)
    }

    /// The oracle's fixed bucket assignment.
    pub fn indexes_of(&self, oracle: &AccountId) -> SuretyResult<[u8; 3]> {
        self.roster.indexes_of(oracle)
    }

    /// True iff the oracle is registered and holds `index`.
    pub fn is_authorized(&self, oracle: &AccountId, index: u8) -> bool {
        self.roster
            .get(oracle)
            .map(|o| o.holds_index(index))
            .unwrap_or(false)
    }

    pub fn is_registered(&self, oracle: &AccountId) -> bool {
        self.roster.is_registered(oracle)
    }

    pub fn oracle_count(&self) -> usize {
        self.roster.len()
    }
}

//! Protocol constants
//!
//! Read once at startup and handed to each manager. Defaults match the
//! deployed protocol; the `with_*` setters exist for tests that want
//! smaller quorums or fee floors.

use serde::{Deserialize, Serialize};
use surety_types::Amount;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuretyConfig {
    /// Minimum airline funding deposit (sets `funded = true`)
    pub min_funding: Amount,
    /// Per-purchase premium cap
    pub max_premium: Amount,
    /// Oracle registration fee floor
    pub registration_fee: Amount,
    /// Admitted-airline count at which admission switches from
    /// single-sponsor to multiparty voting
    pub multiparty_threshold: usize,
    /// Distinct oracle responses needed to finalize one (index, status) pair
    pub min_responses: usize,
    /// Index buckets are drawn from `0..bucket_space`
    pub bucket_space: u8,
}

impl Default for SuretyConfig {
    fn default() -> Self {
        Self {
            min_funding: Amount::from_units(10),
            max_premium: Amount::from_units(1),
            registration_fee: Amount::from_units(1),
            multiparty_threshold: 4,
            min_responses: 3,
            bucket_space: 10,
        }
    }
}

impl SuretyConfig {
    pub fn with_min_funding(mut self, amount: Amount) -> Self {
        self.min_funding = amount;
        self
    }

    pub fn with_max_premium(mut self, amount: Amount) -> Self {
        self.max_premium = amount;
        self
    }

    pub fn with_registration_fee(mut self, amount: Amount) -> Self {
        self.registration_fee = amount;
        self
    }

    pub fn with_multiparty_threshold(mut self, count: usize) -> Self {
        self.multiparty_threshold = count;
        self
    }

    pub fn with_min_responses(mut self, count: usize) -> Self {
        self.min_responses = count;
        self
    }

    pub fn with_bucket_space(mut self, space: u8) -> Self {
        self.bucket_space = space;
        self
    }
}

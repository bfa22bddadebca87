//! Insurance Ledger — premiums, payouts, withdrawals
//!
//! Passengers buy bounded policies against registered flights. When
//! consensus resolves a flight as an airline-caused delay, every premium on
//! that flight is converted into a credit of 3/2 the premium (integer
//! floor) and the consumed premium is zeroed, so no flight ever pays the
//! same passenger twice. Withdrawal zeroes the ledger entry before the
//! amount leaves the ledger.

use crate::{config::SuretyConfig, flights::FlightCatalog};
use surety_types::{AccountId, Amount, FlightKey, PolicyBook, SuretyError, SuretyResult};
use tracing::{debug, info};

pub struct InsuranceLedger {
    book: PolicyBook,
    config: SuretyConfig,
}

impl InsuranceLedger {
    pub fn new(config: SuretyConfig) -> Self {
        Self {
            book: PolicyBook::new(),
            config,
        }
    }

    /// Buy insurance on a registered, unresolved flight. The payment
    /// accumulates into the passenger's premium for that flight.
    pub fn buy_insurance(
        &mut self,
        catalog: &FlightCatalog,
        passenger: &AccountId,
        key: &FlightKey,
        payment: Amount,
    ) -> SuretyResult<()> {
        if !catalog.is_registered(key) {
            return Err(SuretyError::FlightNotRegistered);
        }
        if catalog.is_resolved(key) {
            return Err(SuretyError::AlreadyResolved);
        }
        if payment.is_zero() {
            return Err(SuretyError::InvalidPremium);
        }
        if payment > self.config.max_premium {
            return Err(SuretyError::PremiumExceedsCap {
                offered: payment,
                cap: self.config.max_premium,
            });
        }

        self.book.add_premium(key, passenger, payment);
        info!(flight = %key, passenger = %passenger, payment = %payment, "insurance purchased");
        Ok(())
    }

    /// Credit every outstanding premium on a flight at 3/2. Called from the
    /// consensus finalize step when the resolved status is airline-caused.
    /// Returns the number of passengers credited.
    pub(crate) fn credit_flight(&mut self, key: &FlightKey) -> usize {
        let mut credited = Vec::new();
        for policy in self.book.policies_for_mut(key) {
            if policy.settled || policy.premium.is_zero() {
                continue;
            }
            let premium = policy.premium;
            let payout = premium.saturating_add(premium.half());
            policy.premium = Amount::zero();
            policy.settled = true;
            credited.push((policy.passenger.clone(), payout));
        }

        let count = credited.len();
        for (passenger, payout) in credited {
            self.book.credit(&passenger, payout);
            info!(flight = %key, passenger = %passenger, payout = %payout, "insurance payout credited");
        }
        count
    }

    /// Passenger-initiated confirmation of a payout. The backstop path for
    /// the finalize-time credit: if an unsettled qualifying premium still
    /// exists it is credited here, exactly once either way. Returns the
    /// amount newly credited by this call.
    pub fn claim_insurance(
        &mut self,
        catalog: &FlightCatalog,
        passenger: &AccountId,
        key: &FlightKey,
    ) -> SuretyResult<Amount> {
        let status = catalog.status_of(key).ok_or(SuretyError::FlightNotRegistered)?;
        if !catalog.is_resolved(key) || !status.is_airline_fault() {
            return Err(SuretyError::InsufficientCredit);
        }

        let policy = self
            .book
            .policy_mut(key, passenger)
            .ok_or(SuretyError::InsufficientCredit)?;
        if policy.settled {
            // Already credited at finalize time; nothing further to pay
            debug!(flight = %key, passenger = %passenger, "claim on settled policy");
            return Ok(Amount::zero());
        }

        let premium = policy.premium;
        let payout = premium.saturating_add(premium.half());
        policy.premium = Amount::zero();
        policy.settled = true;
        self.book.credit(passenger, payout);

        info!(flight = %key, passenger = %passenger, payout = %payout, "insurance claim credited");
        Ok(payout)
    }

    /// Withdraw the passenger's entire credit. The ledger entry is zeroed
    /// before the amount is handed back — state first, value second.
    pub fn withdraw(&mut self, passenger: &AccountId) -> SuretyResult<Amount> {
        if self.book.credit_of(passenger).is_zero() {
            return Err(SuretyError::InsufficientCredit);
        }
        let amount = self.book.take_credit(passenger);

        info!(passenger = %passenger, amount = %amount, "credit withdrawn");
        Ok(amount)
    }

    // --- Query methods ---

    pub fn premium_of(&self, passenger: &AccountId, key: &FlightKey) -> Amount {
        self.book.premium_of(key, passenger)
    }

    /// Running premium total across all flights, the observed
    /// `checkPremium` surface.
    pub fn total_premium_of(&self, passenger: &AccountId) -> Amount {
        self.book.total_premium_of(passenger)
    }

    pub fn credit_of(&self, passenger: &AccountId) -> Amount {
        self.book.credit_of(passenger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use surety_types::{AirlineRecord, AirlineTable, FlightStatus};

    fn setup() -> (InsuranceLedger, FlightCatalog, FlightKey) {
        let mut airlines = AirlineTable::new();
        let mut record = AirlineRecord::new(AccountId::new("a-1"));
        record.funded = true;
        airlines.admit(record).unwrap();

        let mut catalog = FlightCatalog::new();
        let key = FlightKey::new(AccountId::new("a-1"), "SK806", Utc::now());
        catalog.register_flight(&airlines, key.clone()).unwrap();

        (InsuranceLedger::new(SuretyConfig::default()), catalog, key)
    }

    #[test]
    fn test_buy_within_cap() {
        let (mut ledger, catalog, key) = setup();
        let passenger = AccountId::new("p-1");

        ledger
            .buy_insurance(&catalog, &passenger, &key, Amount::from_units(1))
            .unwrap();
        assert_eq!(ledger.premium_of(&passenger, &key), Amount::from_units(1));
        assert_eq!(ledger.total_premium_of(&passenger), Amount::from_units(1));
    }

    #[test]
    fn test_premium_above_cap_rejected() {
        let (mut ledger, catalog, key) = setup();
        let passenger = AccountId::new("p-1");

        // 1.5 units is over the 1 unit cap
        let result = ledger.buy_insurance(
            &catalog,
            &passenger,
            &key,
            Amount::new(surety_types::UNIT + surety_types::UNIT / 2),
        );
        assert!(matches!(result, Err(SuretyError::PremiumExceedsCap { .. })));
        assert_eq!(ledger.premium_of(&passenger, &key), Amount::zero());
    }

    #[test]
    fn test_zero_premium_rejected() {
        let (mut ledger, catalog, key) = setup();
        let result = ledger.buy_insurance(&catalog, &AccountId::new("p-1"), &key, Amount::zero());
        assert!(matches!(result, Err(SuretyError::InvalidPremium)));
    }

    #[test]
    fn test_unregistered_flight_rejected() {
        let (mut ledger, catalog, _) = setup();
        let ghost = FlightKey::new(AccountId::new("a-1"), "XX000", Utc::now());
        let result =
            ledger.buy_insurance(&catalog, &AccountId::new("p-1"), &ghost, Amount::new(100));
        assert!(matches!(result, Err(SuretyError::FlightNotRegistered)));
    }

    #[test]
    fn test_buy_after_resolution_rejected() {
        let (mut ledger, mut catalog, key) = setup();
        catalog.record_resolution(&key, FlightStatus::OnTime).unwrap();
        let result =
            ledger.buy_insurance(&catalog, &AccountId::new("p-1"), &key, Amount::new(100));
        assert!(matches!(result, Err(SuretyError::AlreadyResolved)));
    }

    #[test]
    fn test_credit_flight_pays_three_halves_once() {
        let (mut ledger, catalog, key) = setup();
        let passenger = AccountId::new("p-1");
        ledger
            .buy_insurance(&catalog, &passenger, &key, Amount::from_units(1))
            .unwrap();

        assert_eq!(ledger.credit_flight(&key), 1);
        assert_eq!(
            ledger.credit_of(&passenger),
            Amount::new(surety_types::UNIT + surety_types::UNIT / 2)
        );
        // Premium consumed, second pass credits nobody
        assert_eq!(ledger.premium_of(&passenger, &key), Amount::zero());
        assert_eq!(ledger.credit_flight(&key), 0);
        assert_eq!(
            ledger.credit_of(&passenger),
            Amount::new(surety_types::UNIT + surety_types::UNIT / 2)
        );
    }

    #[test]
    fn test_claim_is_backstop_not_double_credit() {
        let (mut ledger, mut catalog, key) = setup();
        let passenger = AccountId::new("p-1");
        ledger
            .buy_insurance(&catalog, &passenger, &key, Amount::new(1000))
            .unwrap();
        catalog
            .record_resolution(&key, FlightStatus::LateAirline)
            .unwrap();

        // Lazy path: nothing credited yet, claim performs the credit
        let paid = ledger.claim_insurance(&catalog, &passenger, &key).unwrap();
        assert_eq!(paid, Amount::new(1500));
        assert_eq!(ledger.credit_of(&passenger), Amount::new(1500));

        // Second claim finds the policy settled and credits nothing
        let paid = ledger.claim_insurance(&catalog, &passenger, &key).unwrap();
        assert_eq!(paid, Amount::zero());
        assert_eq!(ledger.credit_of(&passenger), Amount::new(1500));
    }

    #[test]
    fn test_claim_requires_airline_fault() {
        let (mut ledger, mut catalog, key) = setup();
        let passenger = AccountId::new("p-1");
        ledger
            .buy_insurance(&catalog, &passenger, &key, Amount::new(1000))
            .unwrap();

        // Unresolved flight
        let result = ledger.claim_insurance(&catalog, &passenger, &key);
        assert!(matches!(result, Err(SuretyError::InsufficientCredit)));

        catalog.record_resolution(&key, FlightStatus::LateWeather).unwrap();
        let result = ledger.claim_insurance(&catalog, &passenger, &key);
        assert!(matches!(result, Err(SuretyError::InsufficientCredit)));
        assert_eq!(ledger.credit_of(&passenger), Amount::zero());
    }

    #[test]
    fn test_withdraw_zeroes_before_paying() {
        let (mut ledger, catalog, key) = setup();
        let passenger = AccountId::new("p-1");
        ledger
            .buy_insurance(&catalog, &passenger, &key, Amount::new(1000))
            .unwrap();
        ledger.credit_flight(&key);

        let paid = ledger.withdraw(&passenger).unwrap();
        assert_eq!(paid, Amount::new(1500));
        assert_eq!(ledger.credit_of(&passenger), Amount::zero());

        let result = ledger.withdraw(&passenger);
        assert!(matches!(result, Err(SuretyError::InsufficientCredit)));
    }
}

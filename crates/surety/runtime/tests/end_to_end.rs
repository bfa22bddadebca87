//! End-to-end scenarios through the full application surface.

use chrono::{DateTime, Utc};
use surety_runtime::{AdmissionOutcome, ResponseOutcome, SuretyApp};
use surety_types::{AccountId, Amount, FlightStatus, LedgerEvent, SuretyError, UNIT};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn owner() -> AccountId {
    AccountId::new("owner")
}

fn airline(n: usize) -> AccountId {
    AccountId::new(format!("airline-{n}"))
}

fn app(seed: u64) -> SuretyApp {
    init_tracing();
    SuretyApp::seeded(owner(), airline(1), seed)
}

/// Fund the genesis airline and register one flight, returning its fields.
fn flight_on_app(app: &mut SuretyApp) -> (AccountId, &'static str, DateTime<Utc>) {
    let carrier = airline(1);
    let departs_at = Utc::now();
    app.fund_airline(&carrier, Amount::from_units(10)).unwrap();
    app.register_flight(&carrier, "SK806", departs_at).unwrap();
    (carrier, "SK806", departs_at)
}

/// Register oracles through the public surface until `want` of them hold
/// `index`. Roughly 27% of oracles hold any given bucket, so 400 draws is
/// comfortably enough for any seed.
fn oracles_holding(app: &mut SuretyApp, index: u8, want: usize) -> Vec<AccountId> {
    let mut held = Vec::new();
    for n in 0..400 {
        if held.len() == want {
            break;
        }
        let oracle = AccountId::new(format!("oracle-{n}"));
        let indexes = app
            .register_oracle(oracle.clone(), Amount::from_units(1))
            .unwrap();
        if indexes.contains(&index) {
            held.push(oracle);
        }
    }
    assert_eq!(held.len(), want, "not enough oracles drew index {index}");
    held
}

/// Drive a round to quorum with the given status and return the outcome of
/// the final submission.
fn resolve_flight(
    app: &mut SuretyApp,
    carrier: &AccountId,
    flight: &str,
    departs_at: DateTime<Utc>,
    status: FlightStatus,
) -> ResponseOutcome {
    let index = app.fetch_flight_status(carrier, flight, departs_at).unwrap();
    let oracles = oracles_holding(app, index, 3);

    let mut last = ResponseOutcome::Accepted { responses: 0 };
    for oracle in &oracles {
        last = app
            .submit_oracle_response(oracle, index, carrier, flight, departs_at, status.code())
            .unwrap();
    }
    last
}

#[test]
fn late_airline_delay_pays_out_three_halves() {
    let mut app = app(101);
    let (carrier, flight, departs_at) = flight_on_app(&mut app);
    let passenger = AccountId::new("passenger-1");

    app.buy_insurance(&passenger, &carrier, flight, departs_at, Amount::from_units(1))
        .unwrap();
    assert_eq!(app.premium_of(&passenger), Amount::from_units(1));

    let outcome = resolve_flight(&mut app, &carrier, flight, departs_at, FlightStatus::LateAirline);
    assert_eq!(
        outcome,
        ResponseOutcome::Finalized {
            status: FlightStatus::LateAirline
        }
    );
    assert_eq!(
        app.flight_status(&carrier, flight, departs_at),
        Some(FlightStatus::LateAirline)
    );

    // Credited at finalize time, premium consumed
    assert_eq!(app.credit_of(&passenger), Amount::new(UNIT + UNIT / 2));

    let paid = app.withdraw(&passenger).unwrap();
    assert_eq!(paid, Amount::new(UNIT + UNIT / 2));
    assert_eq!(app.credit_of(&passenger), Amount::zero());

    // Nothing left to withdraw
    let result = app.withdraw(&passenger);
    assert!(matches!(result, Err(SuretyError::InsufficientCredit)));
}

#[test]
fn on_time_flight_credits_nothing() {
    let mut app = app(102);
    let (carrier, flight, departs_at) = flight_on_app(&mut app);
    let passenger = AccountId::new("passenger-1");

    app.buy_insurance(&passenger, &carrier, flight, departs_at, Amount::from_units(1))
        .unwrap();
    resolve_flight(&mut app, &carrier, flight, departs_at, FlightStatus::OnTime);

    assert_eq!(app.credit_of(&passenger), Amount::zero());
    let result = app.claim_insurance(&passenger, &carrier, flight, departs_at);
    assert!(matches!(result, Err(SuretyError::InsufficientCredit)));
    let result = app.withdraw(&passenger);
    assert!(matches!(result, Err(SuretyError::InsufficientCredit)));
}

#[test]
fn weather_delay_is_not_the_airlines_fault() {
    let mut app = app(103);
    let (carrier, flight, departs_at) = flight_on_app(&mut app);
    let passenger = AccountId::new("passenger-1");

    app.buy_insurance(&passenger, &carrier, flight, departs_at, Amount::from_units(1))
        .unwrap();
    resolve_flight(&mut app, &carrier, flight, departs_at, FlightStatus::LateWeather);

    assert_eq!(app.credit_of(&passenger), Amount::zero());
}

#[test]
fn fifth_airline_requires_multiparty_consensus() {
    let mut app = app(104);
    app.fund_airline(&airline(1), Amount::from_units(10)).unwrap();

    for n in 2..=4 {
        let outcome = app.register_airline(&airline(1), airline(n)).unwrap();
        assert_eq!(outcome, AdmissionOutcome::Admitted);
    }
    app.fund_airline(&airline(2), Amount::from_units(10)).unwrap();

    // 4 admitted: the fifth needs ceil(4/2) = 2 distinct funded sponsors
    let outcome = app.register_airline(&airline(1), airline(5)).unwrap();
    assert_eq!(outcome, AdmissionOutcome::VoteRecorded { votes: 1, needed: 2 });
    assert!(!app.is_airline_registered(&airline(5)));

    // A repeat from the same sponsor changes nothing
    let outcome = app.register_airline(&airline(1), airline(5)).unwrap();
    assert_eq!(outcome, AdmissionOutcome::DuplicateVote { votes: 1 });

    let outcome = app.register_airline(&airline(2), airline(5)).unwrap();
    assert_eq!(outcome, AdmissionOutcome::Admitted);
    assert!(app.is_airline_registered(&airline(5)));
    assert_eq!(app.registered_airlines().len(), 5);
}

#[test]
fn unfunded_airline_cannot_participate() {
    let mut app = app(105);

    // Genesis is registered but has not funded
    let result = app.register_airline(&airline(1), airline(2));
    assert!(matches!(result, Err(SuretyError::Unauthorized { .. })));
    let result = app.register_flight(&airline(1), "SK806", Utc::now());
    assert!(matches!(result, Err(SuretyError::Unauthorized { .. })));
}

#[test]
fn closed_gate_blocks_every_command() {
    let mut app = app(106);
    let (carrier, flight, departs_at) = flight_on_app(&mut app);

    // Only the owner may close
    let result = app.set_operating_status(&carrier, false);
    assert!(matches!(result, Err(SuretyError::Unauthorized { .. })));

    app.set_operating_status(&owner(), false).unwrap();
    assert!(!app.is_operational());

    let passenger = AccountId::new("passenger-1");
    let result = app.buy_insurance(&passenger, &carrier, flight, departs_at, Amount::new(100));
    assert!(matches!(result, Err(SuretyError::NotOperational)));
    let result = app.fetch_flight_status(&carrier, flight, departs_at);
    assert!(matches!(result, Err(SuretyError::NotOperational)));

    // Queries still answer while closed
    assert!(app.is_flight_registered(&carrier, flight, departs_at));

    app.set_operating_status(&owner(), true).unwrap();
    app.buy_insurance(&passenger, &carrier, flight, departs_at, Amount::new(100))
        .unwrap();
}

#[test]
fn premium_cap_is_enforced_at_purchase() {
    let mut app = app(107);
    let (carrier, flight, departs_at) = flight_on_app(&mut app);
    let passenger = AccountId::new("passenger-1");

    let result = app.buy_insurance(
        &passenger,
        &carrier,
        flight,
        departs_at,
        Amount::new(UNIT + UNIT / 2),
    );
    assert!(matches!(result, Err(SuretyError::PremiumExceedsCap { .. })));

    app.buy_insurance(&passenger, &carrier, flight, departs_at, Amount::from_units(1))
        .unwrap();
    assert_eq!(app.premium_of(&passenger), Amount::from_units(1));
}

#[test]
fn funding_accumulates_across_deposits() {
    let mut app = app(108);
    app.fund_airline(&airline(1), Amount::from_units(10)).unwrap();
    app.fund_airline(&airline(1), Amount::from_units(10)).unwrap();

    assert!(app.is_airline_funded(&airline(1)));
    assert_eq!(app.airline_balance(&airline(1)), Some(Amount::from_units(20)));
}

#[test]
fn request_event_precedes_status_event() {
    let mut app = app(109);
    let (carrier, flight, departs_at) = flight_on_app(&mut app);

    resolve_flight(&mut app, &carrier, flight, departs_at, FlightStatus::LateOther);
    let events = app.drain_events();
    assert_eq!(events.len(), 2);

    match &events[0] {
        LedgerEvent::OracleRequest {
            airline, flight: f, ..
        } => {
            assert_eq!(airline, &carrier);
            assert_eq!(f, flight);
        }
        other => panic!("unexpected first event {other:?}"),
    }
    match &events[1] {
        LedgerEvent::FlightStatusUpdated { status, .. } => {
            assert_eq!(*status, FlightStatus::LateOther);
        }
        other => panic!("unexpected second event {other:?}"),
    }
}

#[test]
fn two_passengers_credited_independently() {
    let mut app = app(110);
    let (carrier, flight, departs_at) = flight_on_app(&mut app);
    let alice = AccountId::new("passenger-alice");
    let bob = AccountId::new("passenger-bob");

    app.buy_insurance(&alice, &carrier, flight, departs_at, Amount::from_units(1))
        .unwrap();
    app.buy_insurance(&bob, &carrier, flight, departs_at, Amount::new(400_000))
        .unwrap();

    resolve_flight(&mut app, &carrier, flight, departs_at, FlightStatus::LateAirline);

    assert_eq!(app.credit_of(&alice), Amount::new(UNIT + UNIT / 2));
    assert_eq!(app.credit_of(&bob), Amount::new(600_000));

    assert_eq!(app.withdraw(&alice).unwrap(), Amount::new(UNIT + UNIT / 2));
    // Alice's withdrawal leaves Bob untouched
    assert_eq!(app.credit_of(&bob), Amount::new(600_000));
}

#[test]
fn resolved_flight_is_closed_for_business() {
    let mut app = app(111);
    let (carrier, flight, departs_at) = flight_on_app(&mut app);

    resolve_flight(&mut app, &carrier, flight, departs_at, FlightStatus::OnTime);

    let passenger = AccountId::new("passenger-1");
    let result = app.buy_insurance(&passenger, &carrier, flight, departs_at, Amount::new(100));
    assert!(matches!(result, Err(SuretyError::AlreadyResolved)));
    let result = app.fetch_flight_status(&carrier, flight, departs_at);
    assert!(matches!(result, Err(SuretyError::AlreadyResolved)));
}

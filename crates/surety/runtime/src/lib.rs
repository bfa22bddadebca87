//! # surety-runtime
//!
//! The FlightSurety core: a shared state machine mutated by independent,
//! unordered callers. Airlines admit each other by multiparty vote,
//! passengers buy bounded policies, and a flight's status is ratified only
//! when enough independent oracles agree on the same answer.
//!
//! Component managers, leaf-first:
//!
//! - [`gate::OperationalGate`] — process-wide enable/disable switch
//! - [`registry::AirlineRegistry`] — admission voting and funding
//! - [`oracles::OracleDirectory`] — fee-gated registration, fixed buckets
//! - [`flights::FlightCatalog`] — registered flights, write-once status
//! - [`consensus::ConsensusResolver`] — request rounds and response tallies
//! - [`insurance::InsuranceLedger`] — premiums, payouts, withdrawals
//!
//! [`app::SuretyApp`] composes the managers behind the full command/query
//! surface. Every operation validates its preconditions before touching
//! state and completes or fails synchronously; nothing blocks and nothing
//! is retried internally.

pub mod app;
pub mod config;
pub mod consensus;
pub mod flights;
pub mod gate;
pub mod insurance;
pub mod oracles;
pub mod registry;
pub mod sampler;

pub use app::SuretyApp;
pub use config::SuretyConfig;
pub use consensus::{ConsensusResolver, ResponseOutcome};
pub use flights::FlightCatalog;
pub use gate::OperationalGate;
pub use insurance::InsuranceLedger;
pub use oracles::OracleDirectory;
pub use registry::{AdmissionOutcome, AirlineRegistry};
pub use sampler::IndexSampler;

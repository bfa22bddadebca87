use thiserror::Error;

use crate::{AccountId, Amount};

/// Errors surfaced by the FlightSurety core.
///
/// Every operation validates all preconditions before mutating anything, so
/// an error never leaves partial state behind. Nothing is retried
/// internally; re-requesting a flight status or resubmitting funding is the
/// caller's responsibility.
#[derive(Error, Debug)]
pub enum SuretyError {
    #[error("contract is not operational")]
    NotOperational,

    #[error("{account} is not authorized to {action}")]
    Unauthorized {
        account: AccountId,
        action: &'static str,
    },

    #[error("oracle {oracle} does not hold index {index}")]
    UnauthorizedOracle { oracle: AccountId, index: u8 },

    #[error("already registered: {0}")]
    AlreadyRegistered(String),

    #[error("flight status is already resolved")]
    AlreadyResolved,

    #[error("no open status request for index {index}")]
    UnknownRequest { index: u8 },

    #[error("registration fee too low: offered {offered}, required {required}")]
    InsufficientFee { offered: Amount, required: Amount },

    #[error("funding below minimum: offered {offered}, required {required}")]
    InsufficientFunding { offered: Amount, required: Amount },

    #[error("no withdrawable credit")]
    InsufficientCredit,

    #[error("premium {offered} exceeds cap {cap}")]
    PremiumExceedsCap { offered: Amount, cap: Amount },

    #[error("premium must be greater than zero")]
    InvalidPremium,

    #[error("flight is not registered")]
    FlightNotRegistered,

    #[error("{0} is not registered")]
    NotRegistered(AccountId),

    #[error("unknown flight status code: {0}")]
    UnknownStatusCode(u8),
}

pub type SuretyResult<T> = Result<T, SuretyError>;

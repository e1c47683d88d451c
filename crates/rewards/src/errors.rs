use thiserror::Error;
use tollgate_token::TokenError;
use tollgate_types::{Amount, TaxError};

/// Errors that can occur while mutating or querying reward pools and
/// vesting schedules.
///
/// Every error is terminal for the triggering operation: no partial state
/// survives a failure, and nothing is retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewardError {
    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("insufficient staked balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Amount, available: Amount },

    #[error("reward pool cannot cover gross payout: required {required}, available {available}")]
    InsufficientRewardPool { required: Amount, available: Amount },

    #[error("duration must be greater than zero")]
    InvalidDuration,

    #[error("invalid vesting schedule: {0}")]
    InvalidSchedule(&'static str),

    #[error("a vesting schedule already exists for this beneficiary")]
    ScheduleExists,

    #[error("no vesting schedule recorded for this beneficiary")]
    UnknownBeneficiary,

    #[error("nothing vested and unreleased to pay out")]
    NothingToRelease,

    #[error("caller is not the pool administrator")]
    Unauthorized,

    #[error("arithmetic overflow while computing {0}")]
    ArithmeticOverflow(&'static str),

    #[error(transparent)]
    Tax(#[from] TaxError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

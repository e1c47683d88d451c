//! Tollgate Reward Engine
//!
//! Deterministic, tax-aware reward accounting for tokens that deduct a
//! basis-point transfer tax on every move. One shared engine backs three
//! distribution surfaces:
//! - staking yield (reward-token stake)
//! - liquidity-mining incentives (LP-token stake)
//! - presale vesting (no stake, linear release)
//!
//! All three use the same net-denominated accounting: a time-weighted
//! reward-per-staked-unit accumulator (or a linear vesting curve) computes
//! each participant's NET entitlement, and every payout is grossed UP so the
//! recipient lands exactly that net amount after the token's tax fires.
//!
//! ## Invariants
//! - Integer math only, `REWARD_PRECISION`-scaled; NO floating point
//! - Every division floors except the gross-up, which ceils: rounding dust
//!   is absorbed by the pool, never by the participant
//! - Each operation is atomic under its pool's lock: validate, mutate,
//!   then transfer — a failed transfer rolls the mutation back

pub mod accumulator;
pub mod config;
pub mod errors;
pub mod staking;
pub mod vesting;

pub use accumulator::RewardAccumulator;
pub use config::PoolConfig;
pub use errors::RewardError;
pub use staking::{PoolStatistics, RewardPool, UserStake};
pub use vesting::{VestingSchedule, VestingScheduler};

//! Time-weighted reward-per-staked-unit accumulator.
//!
//! Converts a net reward rate and elapsed time into per-participant
//! entitlement without per-second iteration: `reward_per_token_stored` is a
//! monotonically non-decreasing running total of net reward per staked unit
//! (scaled by `REWARD_PRECISION`), and each participant's share is their
//! balance times the accumulator delta since their last checkpoint.
//!
//! The rate itself is stored pre-scaled (net units per second times
//! `REWARD_PRECISION`) so that small budgets over long durations do not
//! truncate to a zero rate.

use crate::errors::RewardError;
use serde::{Deserialize, Serialize};
use tollgate_types::{mul_add_mul_div_floor, mul_div_floor, Amount, Timestamp, REWARD_PRECISION};

/// Per-pool accumulator state. Accrual stops advancing past `period_finish`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAccumulator {
    /// Net reward units per second, scaled by `REWARD_PRECISION`.
    pub reward_rate: u128,
    /// Accumulated net reward per staked unit, scaled. Non-decreasing.
    pub reward_per_token_stored: u128,
    /// Timestamp of the last accumulator refresh.
    pub last_update_time: Timestamp,
    /// End of the current reward period.
    pub period_finish: Timestamp,
}

impl RewardAccumulator {
    /// Accrual clock: time is capped at the end of the reward period.
    pub fn last_time_reward_applicable(&self, now: Timestamp) -> Timestamp {
        now.min(self.period_finish)
    }

    /// Virtual read of the accumulator at `now`, without mutating state.
    ///
    /// With nothing staked the stored value is returned unchanged: there is
    /// nobody to accrue to, and those seconds are not paid retroactively.
    pub fn reward_per_token(
        &self,
        now: Timestamp,
        total_staked: Amount,
    ) -> Result<u128, RewardError> {
        if total_staked == 0 {
            return Ok(self.reward_per_token_stored);
        }
        let until = self.last_time_reward_applicable(now);
        let elapsed = u128::from(until.saturating_sub(self.last_update_time));
        if elapsed == 0 {
            return Ok(self.reward_per_token_stored);
        }
        let delta = mul_div_floor(self.reward_rate, elapsed, total_staked)
            .ok_or(RewardError::ArithmeticOverflow("reward-per-token delta"))?;
        self.reward_per_token_stored
            .checked_add(delta)
            .ok_or(RewardError::ArithmeticOverflow("reward-per-token total"))
    }

    /// Freeze the accumulator at `now`. Must run before any stake mutation.
    pub fn settle(&mut self, now: Timestamp, total_staked: Amount) -> Result<(), RewardError> {
        self.reward_per_token_stored = self.reward_per_token(now, total_staked)?;
        self.last_update_time = self.last_time_reward_applicable(now);
        Ok(())
    }

    /// Start (or extend) a reward period: `net` reward units distributed
    /// linearly over `duration` seconds starting at `now`.
    ///
    /// If a period is still live, its undistributed remainder is folded into
    /// the new rate so no declared reward is lost.
    pub fn set_reward(
        &mut self,
        net: Amount,
        duration: u64,
        now: Timestamp,
    ) -> Result<(), RewardError> {
        if duration == 0 {
            return Err(RewardError::InvalidDuration);
        }

        let remaining = if now < self.period_finish {
            u128::from(self.period_finish - now)
        } else {
            0
        };

        // rate = (net * PRECISION + old_rate * remaining) / duration. The
        // old rate is already PRECISION-scaled, so both products need the
        // wide intermediate; flooring the combined numerator once keeps the
        // remainder from being discarded twice.
        self.reward_rate = mul_add_mul_div_floor(
            net,
            REWARD_PRECISION,
            self.reward_rate,
            remaining,
            u128::from(duration),
        )
        .ok_or(RewardError::ArithmeticOverflow("reward rate"))?;
        self.last_update_time = now;
        self.period_finish = now
            .checked_add(duration)
            .ok_or(RewardError::ArithmeticOverflow("period finish"))?;
        Ok(())
    }

    /// Total net reward still scheduled for distribution at `now`.
    pub fn remaining_net(&self, now: Timestamp) -> Amount {
        if now >= self.period_finish {
            return 0;
        }
        let remaining = u128::from(self.period_finish - now);
        // Scaled rate times seconds, unscaled: floor division, dust stays
        // with the pool.
        mul_div_floor(self.reward_rate, remaining, REWARD_PRECISION).unwrap_or(0)
    }
}

//! Linear vesting scheduler for net-denominated allocations.
//!
//! A schedule promises a beneficiary a fixed NET total, released linearly
//! between `start` and `start + duration`. Releases run through the same
//! gross-up as reward claims: the pool sends the grossed-up amount and the
//! beneficiary lands exactly the vested net after the token's tax fires.
//!
//! Schedules are immutable in their total and window; only `released`
//! moves, and `released <= vested_net(now) <= total_net` always holds.

use crate::config::PoolConfig;
use crate::errors::RewardError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tollgate_token::TokenLedger;
use tollgate_types::{
    account_hex, mul_div_floor, pool_custody_account_id, AccountId, Amount, Timestamp,
};
use tracing::{debug, info};

/// Per-beneficiary linear release schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    /// Total net amount promised.
    pub total_net: Amount,
    /// Net amount already paid out.
    pub released: Amount,
    /// Start of the vesting window.
    pub start: Timestamp,
    /// Window length in seconds.
    pub duration: u64,
}

impl VestingSchedule {
    /// Net amount vested at `now`:
    /// `total_net * min(max(now - start, 0), duration) / duration`.
    /// Non-decreasing in `now`; the full total at or after the window end.
    pub fn vested_net(&self, now: Timestamp) -> Result<Amount, RewardError> {
        let elapsed = now.saturating_sub(self.start).min(self.duration);
        if elapsed == self.duration {
            return Ok(self.total_net);
        }
        mul_div_floor(self.total_net, u128::from(elapsed), u128::from(self.duration))
            .ok_or(RewardError::ArithmeticOverflow("vested amount"))
    }

    /// Vested-but-unreleased net amount at `now`. Zero (not an underflow)
    /// when `now` precedes the time of an earlier release.
    pub fn releasable(&self, now: Timestamp) -> Result<Amount, RewardError> {
        Ok(self.vested_net(now)?.saturating_sub(self.released))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SchedulerState {
    schedules: HashMap<AccountId, VestingSchedule>,
    total_net_released: Amount,
    total_gross_paid: Amount,
}

/// Vesting scheduler sharing the pools' custody and gross-up pattern.
///
/// No stake, no accumulator: entitlement is a pure function of wall-clock
/// time against each beneficiary's fixed allocation.
pub struct VestingScheduler {
    name: String,
    account: AccountId,
    config: PoolConfig,
    state: RwLock<SchedulerState>,
}

impl VestingScheduler {
    pub fn new(name: impl Into<String>, config: PoolConfig) -> Result<Self, RewardError> {
        config.validate()?;
        let name = name.into();
        let account = pool_custody_account_id(&name);
        Ok(Self {
            name,
            account,
            config,
            state: RwLock::new(SchedulerState::default()),
        })
    }

    /// Custody account holding the gross release pool.
    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Record a schedule for `beneficiary`. Admin-only.
    ///
    /// One schedule per beneficiary: a second call is rejected with
    /// `ScheduleExists` rather than overwriting or extending a promise
    /// already made.
    pub fn create_vesting(
        &self,
        caller: &AccountId,
        beneficiary: AccountId,
        total_net: Amount,
        start: Timestamp,
        duration: u64,
    ) -> Result<(), RewardError> {
        self.config.ensure_admin(caller)?;
        if duration == 0 {
            return Err(RewardError::InvalidDuration);
        }
        if total_net == 0 {
            return Err(RewardError::InvalidSchedule("zero total allocation"));
        }

        let mut state = self.state.write();
        if state.schedules.contains_key(&beneficiary) {
            return Err(RewardError::ScheduleExists);
        }
        state.schedules.insert(
            beneficiary,
            VestingSchedule {
                total_net,
                released: 0,
                start,
                duration,
            },
        );

        info!(
            target: "tollgate::vesting",
            scheduler = %self.name,
            beneficiary = %account_hex(&beneficiary),
            total_net = total_net,
            start = start,
            duration = duration,
            "Vesting schedule created"
        );
        Ok(())
    }

    /// The schedule recorded for `beneficiary`, if any.
    pub fn schedule(&self, beneficiary: &AccountId) -> Option<VestingSchedule> {
        self.state.read().schedules.get(beneficiary).copied()
    }

    /// Net amount vested for `beneficiary` at `now`.
    pub fn vested_net(&self, beneficiary: &AccountId, now: Timestamp) -> Result<Amount, RewardError> {
        self.state
            .read()
            .schedules
            .get(beneficiary)
            .ok_or(RewardError::UnknownBeneficiary)?
            .vested_net(now)
    }

    /// Vested-but-unreleased net amount for `beneficiary` at `now`.
    pub fn releasable(&self, beneficiary: &AccountId, now: Timestamp) -> Result<Amount, RewardError> {
        self.state
            .read()
            .schedules
            .get(beneficiary)
            .ok_or(RewardError::UnknownBeneficiary)?
            .releasable(now)
    }

    /// Pay out everything vested and unreleased for `beneficiary`.
    ///
    /// Fails with `NothingToRelease` before any further vesting accrues, so
    /// callers can tell "nothing vested yet" from "pool underfunded". The
    /// gross requirement is verified against custody before any state
    /// moves; a failed transfer rolls `released` back. Returns the net
    /// amount paid.
    pub fn release(
        &self,
        beneficiary: &AccountId,
        now: Timestamp,
        token: &mut dyn TokenLedger,
    ) -> Result<Amount, RewardError> {
        let mut state = self.state.write();
        let schedule = state
            .schedules
            .get(beneficiary)
            .ok_or(RewardError::UnknownBeneficiary)?;

        let releasable = schedule.releasable(now)?;
        if releasable == 0 {
            return Err(RewardError::NothingToRelease);
        }

        let gross = self.config.tax.gross_for_net(releasable)?;
        let available = token.balance_of(&self.account);
        if available < gross {
            return Err(RewardError::InsufficientRewardPool {
                required: gross,
                available,
            });
        }

        let schedule = state
            .schedules
            .get_mut(beneficiary)
            .ok_or(RewardError::UnknownBeneficiary)?;
        schedule.released += releasable;
        state.total_net_released = state
            .total_net_released
            .checked_add(releasable)
            .ok_or(RewardError::ArithmeticOverflow("total net released"))?;
        state.total_gross_paid = state
            .total_gross_paid
            .checked_add(gross)
            .ok_or(RewardError::ArithmeticOverflow("total gross paid"))?;

        if let Err(err) = token.transfer(&self.account, beneficiary, gross) {
            let schedule = state
                .schedules
                .get_mut(beneficiary)
                .ok_or(RewardError::UnknownBeneficiary)?;
            schedule.released -= releasable;
            state.total_net_released -= releasable;
            state.total_gross_paid -= gross;
            return Err(err.into());
        }

        info!(
            target: "tollgate::vesting",
            scheduler = %self.name,
            beneficiary = %account_hex(beneficiary),
            net = releasable,
            gross = gross,
            "Vested allocation released"
        );
        Ok(releasable)
    }

    /// Transfer a gross amount from `funder` into the release pool.
    pub fn fund_gross(
        &self,
        funder: &AccountId,
        amount: Amount,
        token: &mut dyn TokenLedger,
    ) -> Result<Amount, RewardError> {
        if amount == 0 {
            return Err(RewardError::ZeroAmount);
        }
        let landed = token.transfer(funder, &self.account, amount)?;
        debug!(
            target: "tollgate::vesting",
            scheduler = %self.name,
            funder = %account_hex(funder),
            gross = amount,
            landed = landed,
            "Release pool funded"
        );
        Ok(landed)
    }

    /// Gross balance custody must hold to pay out `net_budget`.
    pub fn required_gross_funding(&self, net_budget: Amount) -> Result<Amount, RewardError> {
        Ok(self.config.tax.gross_for_net(net_budget)?)
    }
}

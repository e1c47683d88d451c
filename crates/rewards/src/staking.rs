//! Staking pool: stake ledger, reward claims, funding, and admin surface.
//!
//! One `RewardPool` instance backs both the staking pool (reward-token
//! stake) and the liquidity-mining pool (LP-token stake); the engine never
//! cares what the staked unit is. All entitlements are NET-denominated;
//! claims are grossed up so the participant lands exactly their net
//! entitlement after the reward token's transfer tax fires.
//!
//! ## Key invariants
//! - `total_staked == Σ user.balance`
//! - A checkpoint precedes every balance mutation
//! - `InsufficientRewardPool` is checked against the exact gross
//!   requirement before any transfer; a claim never partially pays
//! - All state mutations commit before the external token transfer, and a
//!   failed transfer rolls them back

use crate::accumulator::RewardAccumulator;
use crate::config::PoolConfig;
use crate::errors::RewardError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tollgate_token::TokenLedger;
use tollgate_types::{
    account_hex, mul_div_floor, pool_custody_account_id, AccountId, Amount, Timestamp,
    REWARD_PRECISION,
};
use tracing::{debug, info, warn};

/// Per-participant stake record. Created on first stake and kept for the
/// pool's lifetime: a balance returning to zero must not discard unclaimed
/// rewards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStake {
    /// Staked amount in stake-token units.
    pub balance: Amount,
    /// Snapshot of `reward_per_token_stored` at the last checkpoint.
    pub reward_per_token_paid: u128,
    /// Net reward units earned but not yet claimed.
    pub rewards_accrued: Amount,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PoolState {
    accumulator: RewardAccumulator,
    total_staked: Amount,
    stakes: HashMap<AccountId, UserStake>,
    total_net_paid: Amount,
    total_gross_paid: Amount,
}

/// Monitoring snapshot of a pool's lifetime totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatistics {
    pub total_staked: Amount,
    pub stakers: usize,
    pub total_net_paid: Amount,
    pub total_gross_paid: Amount,
    pub period_finish: Timestamp,
}

/// A tax-aware reward pool.
///
/// The pool owns its configuration and a custody account; its whole mutable
/// state sits behind one lock, so every operation is atomic and serialized
/// with respect to all others on the same pool.
pub struct RewardPool {
    name: String,
    account: AccountId,
    config: PoolConfig,
    state: RwLock<PoolState>,
}

impl RewardPool {
    /// Create a pool with a deterministic custody account derived from
    /// `name`.
    pub fn new(name: impl Into<String>, config: PoolConfig) -> Result<Self, RewardError> {
        config.validate()?;
        let name = name.into();
        let account = pool_custody_account_id(&name);
        Ok(Self {
            name,
            account,
            config,
            state: RwLock::new(PoolState::default()),
        })
    }

    /// The pool's custody account (holds the gross reward balance).
    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Fold the accumulator delta since the user's last checkpoint into
    /// their accrued balance and re-baseline them. Must precede any
    /// mutation of their stake.
    fn checkpoint(
        state: &mut PoolState,
        user: &AccountId,
        now: Timestamp,
    ) -> Result<(), RewardError> {
        state.accumulator.settle(now, state.total_staked)?;
        let per_token = state.accumulator.reward_per_token_stored;
        let stake = state.stakes.entry(*user).or_default();

        let delta = per_token - stake.reward_per_token_paid;
        if delta > 0 && stake.balance > 0 {
            let owed = mul_div_floor(stake.balance, delta, REWARD_PRECISION)
                .ok_or(RewardError::ArithmeticOverflow("checkpointed reward"))?;
            stake.rewards_accrued = stake
                .rewards_accrued
                .checked_add(owed)
                .ok_or(RewardError::ArithmeticOverflow("accrued reward total"))?;
        }
        stake.reward_per_token_paid = per_token;
        Ok(())
    }

    /// Net reward owed to `user` as of `now`, computed over a virtual
    /// accumulator refresh without mutating state.
    fn earned_in(state: &PoolState, user: &AccountId, now: Timestamp) -> Result<Amount, RewardError> {
        let per_token = state.accumulator.reward_per_token(now, state.total_staked)?;
        let stake = state.stakes.get(user).copied().unwrap_or_default();

        let delta = per_token - stake.reward_per_token_paid;
        let pending = mul_div_floor(stake.balance, delta, REWARD_PRECISION)
            .ok_or(RewardError::ArithmeticOverflow("pending reward"))?;
        stake
            .rewards_accrued
            .checked_add(pending)
            .ok_or(RewardError::ArithmeticOverflow("earned reward"))
    }

    /// Stake `amount` units, pulling them from `user` into pool custody.
    pub fn stake(
        &self,
        user: &AccountId,
        amount: Amount,
        now: Timestamp,
        stake_token: &mut dyn TokenLedger,
    ) -> Result<(), RewardError> {
        if amount == 0 {
            return Err(RewardError::ZeroAmount);
        }
        let mut state = self.state.write();

        // Validate the pull before touching any state.
        let available = stake_token.balance_of(user);
        if available < amount {
            return Err(RewardError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        Self::checkpoint(&mut state, user, now)?;
        let stake = state.stakes.entry(*user).or_default();
        stake.balance = stake
            .balance
            .checked_add(amount)
            .ok_or(RewardError::ArithmeticOverflow("user stake balance"))?;
        state.total_staked = state
            .total_staked
            .checked_add(amount)
            .ok_or(RewardError::ArithmeticOverflow("total staked"))?;

        if let Err(err) = stake_token.transfer(user, &self.account, amount) {
            // Roll the mutation back: the pull did not happen.
            let stake = state.stakes.entry(*user).or_default();
            stake.balance -= amount;
            state.total_staked -= amount;
            return Err(err.into());
        }

        debug!(
            target: "tollgate::staking",
            pool = %self.name,
            user = %account_hex(user),
            amount = amount,
            total_staked = state.total_staked,
            "Stake added"
        );
        Ok(())
    }

    /// Withdraw `amount` staked units back to `user`.
    pub fn withdraw(
        &self,
        user: &AccountId,
        amount: Amount,
        now: Timestamp,
        stake_token: &mut dyn TokenLedger,
    ) -> Result<(), RewardError> {
        if amount == 0 {
            return Err(RewardError::ZeroAmount);
        }
        let mut state = self.state.write();

        let staked = state.stakes.get(user).map(|s| s.balance).unwrap_or(0);
        if staked < amount {
            return Err(RewardError::InsufficientBalance {
                requested: amount,
                available: staked,
            });
        }

        Self::checkpoint(&mut state, user, now)?;
        let stake = state.stakes.entry(*user).or_default();
        stake.balance -= amount;
        state.total_staked -= amount;

        if let Err(err) = stake_token.transfer(&self.account, user, amount) {
            let stake = state.stakes.entry(*user).or_default();
            stake.balance += amount;
            state.total_staked += amount;
            return Err(err.into());
        }

        debug!(
            target: "tollgate::staking",
            pool = %self.name,
            user = %account_hex(user),
            amount = amount,
            total_staked = state.total_staked,
            "Stake withdrawn"
        );
        Ok(())
    }

    /// Current staked balance of `user`.
    pub fn staked_balance(&self, user: &AccountId) -> Amount {
        self.state
            .read()
            .stakes
            .get(user)
            .map(|s| s.balance)
            .unwrap_or(0)
    }

    /// Sum of all staked balances.
    pub fn total_staked(&self) -> Amount {
        self.state.read().total_staked
    }

    /// Net reward units owed to `user` as of `now`. Pure view.
    pub fn earned(&self, user: &AccountId, now: Timestamp) -> Result<Amount, RewardError> {
        Self::earned_in(&self.state.read(), user, now)
    }

    /// Claim the caller's full net entitlement.
    ///
    /// Computes the exact gross requirement, verifies the custody balance
    /// covers it, zeroes the entitlement, and only then transfers — the
    /// checks-effects-interactions ordering. Returns the net amount paid
    /// (zero when nothing is owed, without transferring).
    pub fn get_reward(
        &self,
        user: &AccountId,
        now: Timestamp,
        reward_token: &mut dyn TokenLedger,
    ) -> Result<Amount, RewardError> {
        let mut state = self.state.write();

        let entitlement = Self::earned_in(&state, user, now)?;
        if entitlement == 0 {
            return Ok(0);
        }

        let gross = self.config.tax.gross_for_net(entitlement)?;
        let available = reward_token.balance_of(&self.account);
        if available < gross {
            // Nothing has been mutated yet: the entitlement survives.
            return Err(RewardError::InsufficientRewardPool {
                required: gross,
                available,
            });
        }

        Self::checkpoint(&mut state, user, now)?;
        let stake = state.stakes.entry(*user).or_default();
        debug_assert_eq!(stake.rewards_accrued, entitlement);
        stake.rewards_accrued = 0;
        state.total_net_paid = state
            .total_net_paid
            .checked_add(entitlement)
            .ok_or(RewardError::ArithmeticOverflow("total net paid"))?;
        state.total_gross_paid = state
            .total_gross_paid
            .checked_add(gross)
            .ok_or(RewardError::ArithmeticOverflow("total gross paid"))?;

        if let Err(err) = reward_token.transfer(&self.account, user, gross) {
            let stake = state.stakes.entry(*user).or_default();
            stake.rewards_accrued = entitlement;
            state.total_net_paid -= entitlement;
            state.total_gross_paid -= gross;
            return Err(err.into());
        }

        info!(
            target: "tollgate::staking",
            pool = %self.name,
            user = %account_hex(user),
            net = entitlement,
            gross = gross,
            "Reward claimed"
        );
        Ok(entitlement)
    }

    /// Withdraw the full staked balance and claim all rewards in one call.
    pub fn exit(
        &self,
        user: &AccountId,
        now: Timestamp,
        stake_token: &mut dyn TokenLedger,
        reward_token: &mut dyn TokenLedger,
    ) -> Result<(Amount, Amount), RewardError> {
        let staked = self.staked_balance(user);
        self.withdraw(user, staked, now, stake_token)?;
        let net = self.get_reward(user, now, reward_token)?;
        Ok((staked, net))
    }

    /// Declare a net reward budget distributed linearly over `duration`
    /// seconds. Admin-only. A still-live period's remainder folds into the
    /// new rate.
    ///
    /// Custody sufficiency is NOT enforced here — underfunding surfaces as
    /// `InsufficientRewardPool` at claim time — but it is logged so
    /// operators can fund before participants hit the guard.
    pub fn notify_reward_amount(
        &self,
        caller: &AccountId,
        net: Amount,
        duration: u64,
        now: Timestamp,
        reward_token: &dyn TokenLedger,
    ) -> Result<(), RewardError> {
        self.config.ensure_admin(caller)?;
        let mut state = self.state.write();

        let total_staked = state.total_staked;
        state.accumulator.settle(now, total_staked)?;
        state.accumulator.set_reward(net, duration, now)?;

        // The funding check is advisory: a scheduled budget too large to
        // gross up counts as underfunded rather than aborting the
        // already-committed period.
        let scheduled = state.accumulator.remaining_net(now);
        let required = self
            .config
            .tax
            .gross_for_net(scheduled)
            .unwrap_or(Amount::MAX);
        let available = reward_token.balance_of(&self.account);
        if available < required {
            warn!(
                target: "tollgate::staking",
                pool = %self.name,
                scheduled_net = scheduled,
                required_gross = required,
                available = available,
                "Reward period declared with underfunded custody balance"
            );
        }

        info!(
            target: "tollgate::staking",
            pool = %self.name,
            net = net,
            duration = duration,
            period_finish = state.accumulator.period_finish,
            "Reward period notified"
        );
        Ok(())
    }

    /// Transfer a gross amount from `funder` into pool custody. The token
    /// taxes this transfer like any other unless the funder is exempt, so
    /// funders must pre-compute the gross needed to land their target
    /// budget (see [`RewardPool::required_gross_funding`]).
    pub fn fund_gross(
        &self,
        funder: &AccountId,
        amount: Amount,
        reward_token: &mut dyn TokenLedger,
    ) -> Result<Amount, RewardError> {
        if amount == 0 {
            return Err(RewardError::ZeroAmount);
        }
        let landed = reward_token.transfer(funder, &self.account, amount)?;
        info!(
            target: "tollgate::staking",
            pool = %self.name,
            funder = %account_hex(funder),
            gross = amount,
            landed = landed,
            "Pool funded"
        );
        Ok(landed)
    }

    /// Gross balance the custody account must hold to pay out `net_budget`
    /// through the taxed reward token.
    pub fn required_gross_funding(&self, net_budget: Amount) -> Result<Amount, RewardError> {
        Ok(self.config.tax.gross_for_net(net_budget)?)
    }

    /// Lifetime totals for monitoring.
    pub fn statistics(&self) -> PoolStatistics {
        let state = self.state.read();
        PoolStatistics {
            total_staked: state.total_staked,
            stakers: state.stakes.values().filter(|s| s.balance > 0).count(),
            total_net_paid: state.total_net_paid,
            total_gross_paid: state.total_gross_paid,
            period_finish: state.accumulator.period_finish,
        }
    }
}

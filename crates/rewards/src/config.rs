use crate::errors::RewardError;
use serde::{Deserialize, Serialize};
use tollgate_types::{AccountId, TaxParams};

/// Per-pool configuration, owned by the pool instance.
///
/// Admin identity is an explicit value checked against the authenticated
/// caller of each administrative operation; there is no ambient "owner"
/// state. `tax` must match the reward token's transfer tax — the pool
/// grosses every payout up against these parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Account allowed to call administrative operations.
    pub admin: AccountId,
    /// Transfer tax the reward token applies on every payout.
    pub tax: TaxParams,
}

impl PoolConfig {
    pub fn new(admin: AccountId, tax: TaxParams) -> Result<Self, RewardError> {
        tax.validate()?;
        Ok(Self { admin, tax })
    }

    pub fn validate(&self) -> Result<(), RewardError> {
        self.tax.validate()?;
        Ok(())
    }

    /// Fail with `Unauthorized` unless `caller` is the configured admin.
    pub fn ensure_admin(&self, caller: &AccountId) -> Result<(), RewardError> {
        if caller != &self.admin {
            return Err(RewardError::Unauthorized);
        }
        Ok(())
    }
}

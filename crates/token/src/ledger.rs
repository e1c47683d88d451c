//! Token ledger interface for taxed transfers
//!
//! Provides a lightweight, deterministic interface for moving token balances
//! between accounts, where the token itself may deduct a basis-point tax on
//! every transfer and forward it to a fixed collector account.
//!
//! Used by the staking, liquidity-mining, and vesting pools for custody and
//! payout transfers.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tollgate_types::{account_hex, AccountId, Amount, TaxError, TaxParams};
use tracing::debug;

/// Errors raised by token ledger operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient token balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Amount, available: Amount },

    #[error(transparent)]
    InvalidTax(#[from] TaxError),
}

/// Interface for token ledger operations.
///
/// The amount credited to `to` is `amount - floor(amount * tax_bps / 10000)`,
/// with the remainder sent to the fixed collector account. A tax of zero
/// basis points models a plain (untaxed) token.
pub trait TokenLedger: Send + Sync {
    /// Move `amount` gross from `from` to `to`, deducting the transfer tax.
    /// Returns the net amount credited to `to`.
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<Amount, TokenError>;

    /// Current balance of an account.
    fn balance_of(&self, account: &AccountId) -> Amount;

    /// Tax parameters this token applies on every transfer.
    fn tax_params(&self) -> TaxParams;

    /// Account receiving the deducted tax.
    fn collector(&self) -> AccountId;
}

/// Deterministic in-memory taxed token.
///
/// The full supply is minted to a treasury account at construction; every
/// transfer siphons the tax to the collector. Total supply never changes,
/// so `sum(balances) == total_supply` is an invariant.
///
/// Senders can be marked tax-exempt, the way taxed tokens exempt their
/// deployer so pools can be seeded with a full gross balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryTaxToken {
    balances: HashMap<AccountId, Amount>,
    total_supply: Amount,
    tax: TaxParams,
    collector: AccountId,
    /// Senders whose transfers bypass the tax.
    tax_exempt: HashSet<AccountId>,
    /// Cumulative tax routed to the collector, for conservation checks.
    total_tax_collected: Amount,
}

impl InMemoryTaxToken {
    /// Create a token with `supply` minted to `treasury`.
    pub fn new(
        supply: Amount,
        treasury: AccountId,
        collector: AccountId,
        tax: TaxParams,
    ) -> Result<Self, TokenError> {
        tax.validate()?;
        let mut balances = HashMap::new();
        balances.insert(treasury, supply);
        Ok(Self {
            balances,
            total_supply: supply,
            tax,
            collector,
            tax_exempt: HashSet::new(),
            total_tax_collected: 0,
        })
    }

    /// Untaxed token (e.g. an LP or plain stake token).
    pub fn untaxed(supply: Amount, treasury: AccountId) -> Self {
        Self::new(supply, treasury, [0u8; 32], TaxParams::ZERO)
            .expect("zero tax is always valid")
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn total_tax_collected(&self) -> Amount {
        self.total_tax_collected
    }

    /// Exempt a sender from the transfer tax (deployer/funding accounts).
    pub fn set_tax_exempt(&mut self, account: AccountId) {
        self.tax_exempt.insert(account);
    }

    pub fn is_tax_exempt(&self, account: &AccountId) -> bool {
        self.tax_exempt.contains(account)
    }
}

impl TokenLedger for InMemoryTaxToken {
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<Amount, TokenError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        let tax_amount = if self.tax_exempt.contains(from) {
            0
        } else {
            self.tax.tax_on_gross(amount)
        };
        let net = amount - tax_amount;

        *self.balances.entry(*from).or_insert(0) -= amount;
        *self.balances.entry(*to).or_insert(0) += net;
        if tax_amount > 0 {
            *self.balances.entry(self.collector).or_insert(0) += tax_amount;
            self.total_tax_collected += tax_amount;
        }

        debug!(
            target: "tollgate::token",
            from = %account_hex(from),
            to = %account_hex(to),
            gross = amount,
            net = net,
            tax = tax_amount,
            "Taxed transfer"
        );

        Ok(net)
    }

    fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn tax_params(&self) -> TaxParams {
        self.tax
    }

    fn collector(&self) -> AccountId {
        self.collector
    }
}

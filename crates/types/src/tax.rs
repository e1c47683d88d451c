//! Transfer-tax parameters and the gross-up calculator.
//!
//! The reward token deducts a basis-point tax on every transfer and forwards
//! it to a fixed collector account. Paying a participant an exact net amount
//! therefore requires sending a larger gross amount through the taxed
//! channel. The gross-up rounds UP: under-rounding would leave the recipient
//! short after tax, so the at-most-one-unit remainder is absorbed by the
//! pool, never by the recipient.

use crate::math::{mul_div_ceil, mul_div_floor};
use crate::scalars::{Amount, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by tax-parameter validation and gross-up math.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TaxError {
    #[error("tax rate {0} bps must be below the {BPS_DENOMINATOR} bps denominator")]
    RateOutOfRange(u16),

    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

/// Basis-point transfer tax applied by the reward token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxParams {
    /// Tax rate in basis points (100 = 1%). Must stay below 10_000.
    pub tax_bps: u16,
}

impl TaxParams {
    /// Tax-free parameters (plain token, e.g. an LP stake token).
    pub const ZERO: TaxParams = TaxParams { tax_bps: 0 };

    pub fn new(tax_bps: u16) -> Result<Self, TaxError> {
        let params = Self { tax_bps };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), TaxError> {
        if u64::from(self.tax_bps) >= BPS_DENOMINATOR {
            return Err(TaxError::RateOutOfRange(self.tax_bps));
        }
        Ok(())
    }

    /// Denominator of the net fraction: `10_000 - tax_bps`.
    fn net_denominator(&self) -> u128 {
        u128::from(BPS_DENOMINATOR) - u128::from(self.tax_bps)
    }

    /// Tax deducted from a gross transfer: `floor(gross * tax_bps / 10_000)`.
    pub fn tax_on_gross(&self, gross: Amount) -> Amount {
        // Cannot overflow or divide by zero: bps fits in u16 and the
        // denominator is a constant, and the quotient never exceeds gross.
        mul_div_floor(gross, u128::from(self.tax_bps), u128::from(BPS_DENOMINATOR))
            .unwrap_or(gross)
    }

    /// Amount the recipient is credited after tax.
    pub fn net_after_tax(&self, gross: Amount) -> Amount {
        gross - self.tax_on_gross(gross)
    }

    /// Minimal gross amount whose post-tax remainder is at least `net`:
    /// `ceil(net * 10_000 / (10_000 - tax_bps))`.
    pub fn gross_for_net(&self, net: Amount) -> Result<Amount, TaxError> {
        self.validate()?;
        mul_div_ceil(net, u128::from(BPS_DENOMINATOR), self.net_denominator())
            .ok_or(TaxError::Overflow("gross-up of net entitlement"))
    }
}

//! Overflow-safe integer math helpers.
//!
//! Accumulator and gross-up math multiplies 18-decimal token amounts by an
//! 18-decimal precision factor, which does not fit in a u128 intermediate.
//! These helpers route the product through a 256-bit `BigUint` and fail
//! (return `None`) only when the final result does not fit back in u128 or
//! the divisor is zero.

use num_bigint::BigUint;

/// `floor(a * b / div)` with a 256-bit intermediate product.
/// Returns `None` if `div == 0` or the quotient overflows u128.
pub fn mul_div_floor(a: u128, b: u128, div: u128) -> Option<u128> {
    if div == 0 {
        return None;
    }
    let product = BigUint::from(a) * BigUint::from(b);
    let quotient = product / BigUint::from(div);
    u128::try_from(quotient).ok()
}

/// `ceil(a * b / div)` with a 256-bit intermediate product.
/// Returns `None` if `div == 0` or the quotient overflows u128.
pub fn mul_div_ceil(a: u128, b: u128, div: u128) -> Option<u128> {
    if div == 0 {
        return None;
    }
    let product = BigUint::from(a) * BigUint::from(b);
    let divisor = BigUint::from(div);
    let quotient = (product + (&divisor - 1u32)) / divisor;
    u128::try_from(quotient).ok()
}

/// `floor((a * b + c * d) / div)` with a 256-bit intermediate numerator.
/// Returns `None` if `div == 0` or the quotient overflows u128.
///
/// Used when folding a still-live reward period's remainder into a fresh
/// rate: at 18-decimal magnitudes both products overflow u128 on their own,
/// and flooring the combined numerator once keeps the remainder intact.
pub fn mul_add_mul_div_floor(a: u128, b: u128, c: u128, d: u128, div: u128) -> Option<u128> {
    if div == 0 {
        return None;
    }
    let numerator = BigUint::from(a) * BigUint::from(b) + BigUint::from(c) * BigUint::from(d);
    u128::try_from(numerator / BigUint::from(div)).ok()
}

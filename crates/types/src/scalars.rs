//! Canonical scalar units and account identifiers.
//!
//! ## Units
//! - Token amounts use `Amount` (u128) in base units (18-decimal style)
//! - Timestamps are seconds (`Timestamp`, u64)
//! - All rate/share math is scaled by `REWARD_PRECISION` to avoid
//!   truncation to zero; NO floating point allowed

// =============================================================================
// CANONICAL UNITS
// =============================================================================

/// Token amount in base units.
pub type Amount = u128;

/// Wall-clock timestamp in seconds.
pub type Timestamp = u64;

/// Account identifier.
pub type AccountId = [u8; 32];

/// Basis-point denominator (1 bps = 1/10000).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Scaling factor for reward-per-staked-unit accumulators.
pub const REWARD_PRECISION: u128 = 1_000_000_000_000_000_000;

// =============================================================================
// ACCOUNT HELPERS
// =============================================================================

/// Derive a deterministic custody account ID for a pool.
/// `account = BLAKE3("TOLLGATE_POOL" || label)`
///
/// This creates a protocol-owned address with no private key -
/// funds can only leave it through the pool's own operations.
pub fn pool_custody_account_id(label: &str) -> AccountId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"TOLLGATE_POOL");
    hasher.update(label.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Short hex rendering of an account ID for logs and error messages.
pub fn account_hex(account: &AccountId) -> String {
    hex::encode(&account[..8])
}

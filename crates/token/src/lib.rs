//! Tollgate token boundary
//!
//! The minimal contract the reward engine requires from the taxed reward
//! token (and from untaxed stake tokens), plus a deterministic in-memory
//! implementation for tests and simulations.

pub mod ledger;

pub use ledger::{InMemoryTaxToken, TokenError, TokenLedger};

//! Tollgate canonical types
//!
//! Scalar aliases, basis-point tax parameters, the gross-up calculator,
//! and overflow-safe wide mul/div helpers shared by the token boundary
//! and the reward accounting engine.
//!
//! All monetary math is integer-only. NO floating point.

pub mod math;
pub mod scalars;
pub mod tax;

pub use math::*;
pub use scalars::*;
pub use tax::*;

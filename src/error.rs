//! Structured errors for malformed generator parameters.
//!
//! Reversers never raise: "not recognized" and "input exhausted" are both
//! expressed as `None` from a reverser function (see the family modules).
//! This type covers the other error kind from the design: a constructor
//! precondition violated by the caller.

use thiserror::Error;

/// A generator constructor precondition was violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ParamError {
    /// The output modulus `m` must be strictly positive.
    #[error("modulus must be positive, got {0}")]
    NonPositiveModulus(i128),

    /// LCG multiplier `a` must satisfy `0 < a < m`.
    #[error("multiplier {a} out of range for modulus {m} (need 0 < a < m)")]
    MultiplierOutOfRange { a: u64, m: u64 },

    /// LCG increment `c` must satisfy `0 <= c < m`.
    #[error("increment {c} out of range for modulus {m} (need 0 <= c < m)")]
    IncrementOutOfRange { c: u64, m: u64 },

    /// A seed value must satisfy `0 <= x < m`.
    #[error("seed value {x} out of range for modulus {m} (need 0 <= x < m)")]
    SeedOutOfRange { x: u64, m: u64 },

    /// LFG lags must satisfy `0 < r < s < m`.
    #[error("invalid lags r={r}, s={s} for modulus {m} (need 0 < r < s < m)")]
    InvalidLags { r: usize, s: usize, m: u64 },

    /// The LFG seed window must contain exactly `max(r, s)` values.
    #[error("seed window has length {got}, expected max(r, s) = {want}")]
    SeedWindowLength { got: usize, want: usize },

    /// Xoshiro256** forbids the all-zero state.
    #[error("xoshiro256** state must not be all zero")]
    AllZeroState,

    /// A ran3 seed array snapshot must contain exactly 55 values.
    #[error("ran3 seed window has length {0}, expected 55")]
    SeedArrayLength(usize),
}

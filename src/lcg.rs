//! Linear congruential generator and its reverser.
//!
//! `x_{n+1} = (a * x_n + c) mod m`. The reverser never sees `m`, `a` or `c`;
//! it only sees the raw output stream and has to recover all three plus the
//! current state.

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use tracing::trace;

use crate::bigint_util::{gcd_all, mod_inverse, to_u64};
use crate::error::ParamError;
use crate::iter::{synchronize, Buffering};
use crate::primes::divisors;

/// A snapshot of an [`Lcg`]'s parameters and current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LcgState {
    pub m: u64,
    pub a: u64,
    pub c: u64,
    pub x: u64,
}

/// Linear congruential generator.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: LcgState,
}

impl Lcg {
    /// Builds a generator from explicit parameters. `m` must be positive,
    /// `a` must satisfy `0 < a < m`, and `c` and the seed `x0` must satisfy
    /// `0 <= c, x0 < m`.
    pub fn new(m: u64, a: u64, c: u64, x0: u64) -> Result<Self, ParamError> {
        if m == 0 {
            return Err(ParamError::NonPositiveModulus(0));
        }
        if a == 0 || a >= m {
            return Err(ParamError::MultiplierOutOfRange { a, m });
        }
        if c >= m {
            return Err(ParamError::IncrementOutOfRange { c, m });
        }
        if x0 >= m {
            return Err(ParamError::SeedOutOfRange { x: x0, m });
        }
        Ok(Lcg {
            state: LcgState { m, a, c, x: x0 },
        })
    }

    /// Restores a generator from a previously captured state, without
    /// re-validating the parameters it was built with.
    pub fn from_state(state: LcgState) -> Self {
        Lcg { state }
    }

    /// Captures the current parameters and state.
    pub fn state(&self) -> LcgState {
        self.state
    }
}

impl Iterator for Lcg {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let m = self.state.m as u128;
        let x = (self.state.a as u128 * self.state.x as u128 + self.state.c as u128) % m;
        self.state.x = x as u64;
        Some(self.state.x)
    }
}

/// Minimum determinant products to collect before giving up on finding a
/// nontrivial gcd (fewer than this and a spurious gcd of 1 is too likely).
const MIN_GUESSES: usize = 8;
/// Determinant products are plentiful; this many is enough to gcd down to
/// the true modulus with overwhelming probability.
const MAX_GUESSES: usize = 30;
const CONFIRM_STEPS: usize = 4;

/// Attempts to recover the full state of an LCG from its raw output stream.
///
/// Builds a sliding window of four consecutive first differences and
/// accumulates `x4*x1 - x2*x3` determinant products, whose gcd is a
/// multiple of the true modulus. Candidate moduli (the gcd and its
/// small-prime quotients) are tried in turn: for each, the multiplier is
/// recovered via modular inverse and the increment falls out directly, and
/// the result is confirmed against the remaining input before being
/// accepted.
///
/// Returns `None` if the stream doesn't look like an LCG, or ends before
/// enough evidence has been collected.
pub fn reverse_lcg<I: Iterator<Item = u64>>(input: I) -> Option<LcgState> {
    let mut raw = Buffering::new(input, Some(3));

    let mut window: [i128; 4] = [0; 4];
    let mut filled = 0usize;
    let mut prev: Option<i128> = None;
    let mut guesses: Vec<BigInt> = Vec::with_capacity(MAX_GUESSES);

    while guesses.len() < MAX_GUESSES {
        let Some(v) = raw.next() else { break };
        let v = v as i128;
        if let Some(p) = prev {
            let d = v - p;
            if filled < 4 {
                window[filled] = d;
                filled += 1;
            } else {
                window.rotate_left(1);
                window[3] = d;
            }
            if filled == 4 {
                let (x1, x2, x3, x4) = (window[0], window[1], window[2], window[3]);
                let guess =
                    BigInt::from(x4) * BigInt::from(x1) - BigInt::from(x2) * BigInt::from(x3);
                if guess.sign() == Sign::Plus {
                    guesses.push(guess);
                }
            }
        }
        prev = Some(v);
    }

    if guesses.len() < MIN_GUESSES {
        trace!(count = guesses.len(), "lcg: not enough determinant products");
        return None;
    }
    if raw.buffer.len() < 3 {
        return None;
    }

    let g = gcd_all(&guesses);
    if g <= BigInt::one() {
        return None;
    }

    let a1 = raw.buffer[0] as i128;
    let a2 = raw.buffer[1] as i128;
    let a3 = raw.buffer[2] as i128;

    let g_u64 = to_u64(&g)?;

    for modulus in divisors(g_u64) {
        if modulus < 2 {
            continue;
        }
        let m_big = BigInt::from(modulus);
        let diff21 = BigInt::from(a2 - a1).mod_floor(&m_big);
        let Some(inv) = mod_inverse(&diff21, &m_big) else {
            continue;
        };
        let multiplier = (BigInt::from(a3 - a2) * &inv).mod_floor(&m_big);
        if multiplier.is_zero() {
            continue;
        }
        let increment = (BigInt::from(a2) - &multiplier * BigInt::from(a1)).mod_floor(&m_big);

        let (Some(a), Some(c)) = (to_u64(&multiplier), to_u64(&increment)) else {
            continue;
        };
        let x = a3.rem_euclid(modulus as i128) as u64;

        let Ok(mut candidate) = Lcg::new(modulus, a, c, x) else {
            continue;
        };
        if synchronize(&mut candidate, &mut raw, CONFIRM_STEPS) {
            return Some(candidate.state());
        }
    }

    None
}

//! Additive lagged Fibonacci generator, with an optional carry bit, and its
//! reverser.
//!
//! `x_n = (x_{n-r} + x_{n-s} + carry_in) mod m`, with `0 < r < s`. When
//! carry is enabled, `carry_out = 1` iff the pre-modulo sum reached `m`,
//! and that bit feeds into the next step.
//!
//! Neither the lags, the modulus, nor whether carry is in play are visible
//! to the reverser; only the output stream is.

use num_bigint::BigInt;
use num_traits::Zero;
use tracing::trace;

use crate::bigint_util::to_u64;
use crate::error::ParamError;
use crate::iter::{synchronize, Buffering};

/// Whether an [`Lfg`] propagates a carry bit between steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CarryMode {
    NoCarry,
    Carry,
}

/// A snapshot of an [`Lfg`]'s parameters and current state.
///
/// `window` holds the `s` most recently produced values, oldest first, so
/// `window[0]` is `x_{n-s}` and `window[s-1]` is `x_{n-1}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LfgState {
    pub m: u64,
    pub r: usize,
    pub s: usize,
    pub carry_mode: CarryMode,
    pub carry: bool,
    pub window: Vec<u64>,
}

/// Additive lagged Fibonacci generator.
#[derive(Clone, Debug)]
pub struct Lfg {
    state: LfgState,
}

impl Lfg {
    /// Builds a generator from explicit parameters. `m` must be positive,
    /// the lags must satisfy `0 < r < s`, and `window` must hold exactly
    /// `s` seed values, each in `[0, m)`.
    pub fn new(
        m: u64,
        r: usize,
        s: usize,
        carry_mode: CarryMode,
        carry: bool,
        window: Vec<u64>,
    ) -> Result<Self, ParamError> {
        if m == 0 {
            return Err(ParamError::NonPositiveModulus(0));
        }
        if r == 0 || r >= s {
            return Err(ParamError::InvalidLags { r, s, m });
        }
        if window.len() != s {
            return Err(ParamError::SeedWindowLength {
                got: window.len(),
                want: s,
            });
        }
        if window.iter().any(|&x| x >= m) {
            return Err(ParamError::SeedOutOfRange {
                x: *window.iter().find(|&&x| x >= m).unwrap(),
                m,
            });
        }
        let carry = matches!(carry_mode, CarryMode::Carry) && carry;
        Ok(Lfg {
            state: LfgState {
                m,
                r,
                s,
                carry_mode,
                carry,
                window,
            },
        })
    }

    /// Restores a generator from a previously captured state, without
    /// re-validating the parameters it was built with.
    pub fn from_state(state: LfgState) -> Self {
        Lfg { state }
    }

    /// Captures the current parameters and state.
    pub fn state(&self) -> LfgState {
        self.state.clone()
    }
}

impl Iterator for Lfg {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let s = self.state.s;
        let r = self.state.r;
        let xr = self.state.window[s - r] as u128;
        let xs = self.state.window[0] as u128;
        let carry_in = if self.state.carry { 1u128 } else { 0 };
        let sum = xr + xs + carry_in;
        let m = self.state.m as u128;
        let out = (sum % m) as u64;

        // Wrap detection must match the original's post-modulo comparison
        // (`value < queue[-r] or value < queue[-s]`), not `sum >= m`: those
        // two diverge when `xr == xs == m-1` and `carry_in == 1`, where the
        // sum overflows twice but the reduced output isn't less than either
        // operand.
        self.state.carry =
            matches!(self.state.carry_mode, CarryMode::Carry) && (out < xr as u64 || out < xs as u64);
        self.state.window.remove(0);
        self.state.window.push(out);

        Some(out)
    }
}

/// Largest lag the reverser is willing to guess. Real-world LFGs (e.g. the
/// classic `r=5, s=17` or `r=24, s=55` choices) comfortably fit inside this.
const MAX_LAG: usize = 64;
/// How many residuals past `s` to inspect when testing an `(r, s, carry)`
/// hypothesis.
const OBSERVATION_WINDOW: usize = 64;
/// Minimum number of nonzero residuals required before trusting the
/// recovered modulus.
const MIN_NONZERO_RESIDUALS: usize = 2;
const CONFIRM_STEPS: usize = 8;

/// Attempts to recover the full state of an additive lagged Fibonacci
/// generator (with or without carry) from its raw output stream.
///
/// For each candidate lag pair `0 < r < s <= MAX_LAG` and each candidate
/// carry mode, replays the buffered output against the recurrence: if
/// `(r, s, carry)` are right, `x_{n-r} + x_{n-s} + carry_in - x_n` is
/// always exactly `0` or exactly `m` (never anything in between, and
/// never a different multiple, since the pre-modulo sum can overflow the
/// modulus at most once). Any hypothesis whose nonzero residuals don't
/// all agree is rejected outright; one that produces a single consistent
/// residual value is treated as the modulus and confirmed against the
/// remaining input before being accepted.
///
/// Returns `None` if no lag pair and carry mode both fit the observed
/// prefix and survive confirmation.
pub fn reverse_lfg<I: Iterator<Item = u64>>(input: I) -> Option<LfgState> {
    let mut raw = Buffering::new(input, Some(MAX_LAG));
    let mut buf: Vec<u64> = Vec::with_capacity(MAX_LAG + OBSERVATION_WINDOW);
    while buf.len() < MAX_LAG + OBSERVATION_WINDOW {
        match raw.next() {
            Some(v) => buf.push(v),
            None => break,
        }
    }
    // The remaining tail is drained into a `Vec` once so each candidate can
    // be synchronized against a fresh `.iter().copied()` of it; `I` itself
    // is not required to be `Clone`, so `raw`/`input` can't be replayed.
    let tail: Vec<u64> = raw.collect();

    for s in 2..=MAX_LAG.min(buf.len().saturating_sub(1)) {
        if buf.len() - s < MIN_NONZERO_RESIDUALS {
            continue;
        }
        for r in 1..s {
            for carry_mode in [CarryMode::NoCarry, CarryMode::Carry] {
                let carry0_options: &[bool] = match carry_mode {
                    CarryMode::NoCarry => &[false],
                    CarryMode::Carry => &[false, true],
                };
                for &carry0 in carry0_options {
                    if let Some(state) = try_lag_pair(&buf, r, s, carry_mode, carry0) {
                        let mut candidate = Lfg::from_state(state.clone());
                        if synchronize(&mut candidate, &mut tail.iter().copied(), CONFIRM_STEPS) {
                            return Some(state);
                        }
                        trace!(r, s, ?carry_mode, "lfg: candidate failed synchronization");
                    }
                }
            }
        }
    }

    None
}

fn try_lag_pair(
    buf: &[u64],
    r: usize,
    s: usize,
    carry_mode: CarryMode,
    carry0: bool,
) -> Option<LfgState> {
    let mut carry = carry0;
    let mut modulus: Option<BigInt> = None;
    let mut nonzero_count = 0usize;

    for i in s..buf.len() {
        let xr = BigInt::from(buf[i - r]);
        let xs = BigInt::from(buf[i - s]);
        let carry_in = if carry { BigInt::from(1) } else { BigInt::zero() };
        let out = BigInt::from(buf[i]);
        let residual = &xr + &xs + carry_in - &out;

        if residual.is_zero() {
            carry = false;
        } else {
            match &modulus {
                None => modulus = Some(residual.clone()),
                Some(m) if m == &residual => {}
                Some(_) => return None,
            }
            nonzero_count += 1;
            carry = matches!(carry_mode, CarryMode::Carry);
        }
    }

    if nonzero_count < MIN_NONZERO_RESIDUALS {
        return None;
    }
    let m_big = modulus?;
    let m = to_u64(&m_big)?;
    if m < 2 {
        return None;
    }

    let window = buf[buf.len() - s..].to_vec();
    if window.iter().any(|&x| x >= m) {
        return None;
    }

    Some(LfgState {
        m,
        r,
        s,
        carry_mode,
        carry,
        window,
    })
}

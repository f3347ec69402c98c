//! Xoshiro256** generator and its reverser.
//!
//! `next()` mixes the four 64-bit words of state through a scrambled
//! linear-feedback step (Blackman & Vigna, 2018); the reverser inverts the
//! output function algebraically rather than searching for it.

use std::sync::OnceLock;

use wrapping_arithmetic::wrappit;

use crate::bigint_util::mod_inverse;
use crate::error::ParamError;
use crate::iter::{confirm_tail, Buffering};

/// A snapshot of a [`Xoshiro256StarStar`]'s state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XoshiroState {
    pub s0: u64,
    pub s1: u64,
    pub s2: u64,
    pub s3: u64,
}

/// Xoshiro256** pseudo-random generator.
#[derive(Clone, Debug)]
pub struct Xoshiro256StarStar {
    state: XoshiroState,
}

impl Xoshiro256StarStar {
    /// Builds a generator from an explicit, non-zero state.
    pub fn new(s0: u64, s1: u64, s2: u64, s3: u64) -> Result<Self, ParamError> {
        if s0 == 0 && s1 == 0 && s2 == 0 && s3 == 0 {
            return Err(ParamError::AllZeroState);
        }
        Ok(Xoshiro256StarStar {
            state: XoshiroState { s0, s1, s2, s3 },
        })
    }

    /// Restores a generator from a previously captured state.
    pub fn from_state(state: XoshiroState) -> Self {
        Xoshiro256StarStar { state }
    }

    /// Captures the current state.
    pub fn state(&self) -> XoshiroState {
        self.state
    }
}

impl Iterator for Xoshiro256StarStar {
    type Item = u64;

    #[wrappit]
    #[inline]
    fn next(&mut self) -> Option<u64> {
        let XoshiroState { s0, s1, s2, s3 } = self.state;

        let result = (s1 * 5).rotate_left(7) * 9;
        let t = s1 << 17;

        let s2 = s2 ^ s0;
        let s3 = s3 ^ s1;
        let s1 = s1 ^ s2;
        let s0 = s0 ^ s3;
        let s2 = s2 ^ t;
        let s3 = s3.rotate_left(45);

        self.state = XoshiroState { s0, s1, s2, s3 };
        Some(result)
    }
}

use rand_core::{Error as RandError, RngCore, SeedableRng};

impl RngCore for Xoshiro256StarStar {
    fn next_u32(&mut self) -> u32 {
        Iterator::next(self).expect("xoshiro256** never exhausts") as u32
    }

    fn next_u64(&mut self) -> u64 {
        Iterator::next(self).expect("xoshiro256** never exhausts")
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut i = 0;
        while i < dest.len() {
            let x = self.next_u64();
            let j = dest.len().min(i + 8);
            dest[i..j].copy_from_slice(&x.to_le_bytes()[0..(j - i)]);
            i = j;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Xoshiro256StarStar {
    type Seed = [u8; 32];

    /// Splits the 32-byte seed into the four little-endian state words.
    /// An all-zero seed is remapped to a fixed non-zero state, since the
    /// family forbids the all-zero state but `SeedableRng` must not fail.
    fn from_seed(seed: Self::Seed) -> Self {
        let word = |i: usize| u64::from_le_bytes(seed[i * 8..i * 8 + 8].try_into().unwrap());
        let (s0, s1, s2, s3) = (word(0), word(1), word(2), word(3));
        Xoshiro256StarStar::new(s0, s1, s2, s3)
            .unwrap_or_else(|_| Xoshiro256StarStar::new(1, 0, 0, 0).unwrap())
    }
}

/// Modular inverse of 9 mod 2^64, computed once and reused by the reverser.
fn inv9() -> u64 {
    static INV: OnceLock<u64> = OnceLock::new();
    *INV.get_or_init(|| mod_inverse_pow2_64(9))
}

/// Modular inverse of 5 mod 2^64, computed once and reused by the reverser.
fn inv5() -> u64 {
    static INV: OnceLock<u64> = OnceLock::new();
    *INV.get_or_init(|| mod_inverse_pow2_64(5))
}

fn mod_inverse_pow2_64(odd: u64) -> u64 {
    use num_bigint::BigInt;
    use num_traits::ToPrimitive;

    let modulus = BigInt::from(1u8) << 64;
    let inv = mod_inverse(&BigInt::from(odd), &modulus).expect("odd numbers are invertible mod 2^64");
    inv.to_u64().expect("inverse mod 2^64 fits in u64")
}

/// Inverts the `rotl(y * 9, 7)` half of the output function, recovering the
/// `s1` word that produced output `y`.
#[wrappit]
#[inline]
fn h(y: u64) -> u64 {
    let undone_mul9 = y * inv9();
    let undone_rotl7 = undone_mul9.rotate_left(64 - 7);
    undone_rotl7 * inv5()
}

const CONFIRM_STEPS: usize = 8;

/// Attempts to recover the full state of a Xoshiro256** generator from four
/// or more consecutive raw outputs.
///
/// Four outputs fully determine the state at algebraic inversion of the
/// output function (see [`h`]); the candidate is then replayed past those
/// four outputs and any further input must agree before the reversal is
/// accepted, since the recovered state is one `next()` call away from a
/// generator that has *not yet* produced `a`.
pub fn reverse_xoshiro<I: Iterator<Item = u64>>(input: I) -> Option<XoshiroState> {
    let mut raw = Buffering::new(input, None);

    let a = raw.next()?;
    let b = raw.next()?;
    let c = raw.next()?;
    let d = raw.next()?;

    let s1 = h(a);
    let s0_xor_s2 = s1 ^ h(b);
    let s0_xor_s3 = (s1 << 17) ^ h(c);

    let t0 = s1 ^ s0_xor_s3;
    let t1 = s1 ^ s0_xor_s2;
    let t3 = t0 ^ h(d) ^ (t1 << 17);

    let s3 = t3.rotate_left(64 - 45) ^ s1;
    let s0 = t0 ^ s1 ^ s3;
    let s2 = t1 ^ s0 ^ s1;

    if s0 == 0 && s1 == 0 && s2 == 0 && s3 == 0 {
        return None;
    }

    let mut candidate = Xoshiro256StarStar::from_state(XoshiroState { s0, s1, s2, s3 });
    if confirm_tail(&mut candidate, &mut raw, 4, CONFIRM_STEPS) {
        Some(candidate.state())
    } else {
        None
    }
}

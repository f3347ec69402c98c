//! MT19937 ("Mersenne Twister") generator and its reverser.
//!
//! The reverser's core trick is that tempering is a bijective, GF(2)-linear
//! map on each 32-bit word: inverting it word-by-word recovers the raw
//! 624-word state array directly from 624 consecutive outputs, no search
//! required.

use wrapping_arithmetic::wrappit;

use crate::iter::{confirm_tail, Buffering};

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_B0DF;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;
const F: u32 = 1_812_433_253;

const TEMPER_U: u32 = 11;
const TEMPER_S: u32 = 7;
const TEMPER_B: u32 = 0x9D2C_5680;
const TEMPER_T: u32 = 15;
const TEMPER_C: u32 = 0xEFC6_0000;
const TEMPER_L: u32 = 18;

/// A snapshot of an [`Mt19937`]'s 624-word state and twist counter.
///
/// The spec does not require `State` equality for this family (unlike the
/// other four): two differently-phased but behaviourally identical state
/// arrays are not comparable in general without replaying the twist, so no
/// `PartialEq` is derived.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mt19937State {
    #[cfg_attr(feature = "serde", serde(with = "serde_big_array_shim"))]
    pub state: [u32; N],
    pub index: usize,
}

impl std::fmt::Debug for Mt19937State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mt19937State")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "serde")]
mod serde_big_array_shim {
    //! `serde`'s derive only has blanket array support up to length 32;
    //! the 624-word MT19937 state needs a manual Vec round-trip instead.
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(arr: &[u32; super::N], s: S) -> Result<S::Ok, S::Error> {
        arr.to_vec().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u32; super::N], D::Error> {
        let v = Vec::<u32>::deserialize(d)?;
        v.try_into()
            .map_err(|v: Vec<u32>| serde::de::Error::invalid_length(v.len(), &"624"))
    }
}

/// MT19937 pseudo-random generator.
#[derive(Clone)]
pub struct Mt19937 {
    state: [u32; N],
    index: usize,
}

impl Mt19937 {
    /// Seeds a generator the standard way: `state[0] = seed`, then
    /// `state[i] = F * (state[i-1] ^ (state[i-1] >> 30)) + i`.
    #[wrappit]
    pub fn new(seed: u32) -> Self {
        let mut state = [0u32; N];
        state[0] = seed;
        for i in 1..N {
            state[i] = F * (state[i - 1] ^ (state[i - 1] >> 30)) + i as u32;
        }
        // Force a twist before the first output.
        Mt19937 { state, index: N }
    }

    /// Restores a generator from a previously captured state.
    pub fn from_state(state: Mt19937State) -> Self {
        Mt19937 {
            state: state.state,
            index: state.index,
        }
    }

    /// Captures the current state.
    pub fn state(&self) -> Mt19937State {
        Mt19937State {
            state: self.state,
            index: self.index,
        }
    }

    #[wrappit]
    fn twist(&mut self) {
        for i in 0..N {
            let x = (self.state[i] & UPPER_MASK) | (self.state[(i + 1) % N] & LOWER_MASK);
            let mut x_a = x >> 1;
            if x & 1 != 0 {
                x_a ^= MATRIX_A;
            }
            self.state[i] = self.state[(i + M) % N] ^ x_a;
        }
        self.index = 0;
    }
}

#[wrappit]
#[inline]
fn temper(mut y: u32) -> u32 {
    y ^= y >> TEMPER_U;
    y ^= (y << TEMPER_S) & TEMPER_B;
    y ^= (y << TEMPER_T) & TEMPER_C;
    y ^= y >> TEMPER_L;
    y
}

impl Iterator for Mt19937 {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.index >= N {
            self.twist();
        }
        let y = self.state[self.index];
        self.index += 1;
        Some(temper(y))
    }
}

use rand_core::{Error as RandError, RngCore, SeedableRng};

impl RngCore for Mt19937 {
    fn next_u32(&mut self) -> u32 {
        Iterator::next(self).expect("MT19937 never exhausts")
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut i = 0;
        while i < dest.len() {
            let x = self.next_u32();
            let j = dest.len().min(i + 4);
            dest[i..j].copy_from_slice(&x.to_le_bytes()[0..(j - i)]);
            i = j;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mt19937 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Mt19937::new(u32::from_le_bytes(seed))
    }
}

/// Inverts `y ^= y >> shift`. Right-shift-xor is its own inverse whenever
/// `shift >= 16` (two applications cancel because the doubly-shifted term
/// vanishes), which covers `TEMPER_L`; the general iterative form below
/// also handles `TEMPER_U`, where one application does not suffice.
#[wrappit]
fn undo_right_shift_xor(y: u32, shift: u32) -> u32 {
    let mut x = y;
    let rounds = (32 + shift - 1) / shift;
    for _ in 0..rounds {
        x = y ^ (x >> shift);
    }
    x
}

/// Inverts `y ^= (y << shift) & mask`. The low `shift` bits of `x` equal
/// the low `shift` bits of `y` (since `x << shift` zeroes them), so each
/// successive chunk of `shift` bits can be recovered from the ones already
/// known; iterating `ceil(32 / shift)` times is enough to converge.
#[wrappit]
fn undo_left_shift_xor_and(y: u32, shift: u32, mask: u32) -> u32 {
    let mut x = y;
    let rounds = (32 + shift - 1) / shift;
    for _ in 0..rounds {
        x = y ^ ((x << shift) & mask);
    }
    x
}

/// Inverts [`temper`], recovering the raw state word that produced it.
fn untemper(y: u32) -> u32 {
    let y = undo_right_shift_xor(y, TEMPER_L);
    let y = undo_left_shift_xor_and(y, TEMPER_T, TEMPER_C);
    let y = undo_left_shift_xor_and(y, TEMPER_S, TEMPER_B);
    undo_right_shift_xor(y, TEMPER_U)
}

const CONFIRM_STEPS: usize = 16;

/// Attempts to recover the full state of an MT19937 generator from 624
/// consecutive raw outputs.
///
/// Each output untempers directly into its corresponding state word (see
/// [`untemper`]); no search over an offset is needed, since the counter is
/// set to `624` so the reconstructed generator re-twists before producing
/// anything further, exactly as the original would at this point in its
/// cycle. Any input beyond the first 624 values must continue to agree.
///
/// This relies on the input being a twist-boundary-aligned window (624
/// outputs since construction, or since the start of any later batch) —
/// the twist recomputes all 624 words from one another simultaneously, so
/// a window straddling two batches does not untemper into a state array
/// that continues correctly. Every public MT19937 state-recovery tool
/// shares this assumption.
pub fn reverse_mt19937<I: Iterator<Item = u32>>(input: I) -> Option<Mt19937State> {
    let mut raw = Buffering::new(input, None);

    let mut state = [0u32; N];
    for slot in state.iter_mut() {
        *slot = untemper(raw.next()?);
    }

    let mut candidate = Mt19937::from_state(Mt19937State { state, index: N });
    if confirm_tail(&mut candidate, &mut raw, 0, CONFIRM_STEPS) {
        Some(candidate.state())
    } else {
        None
    }
}

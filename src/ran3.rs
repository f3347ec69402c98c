//! Knuth's subtractive generator (`ran3`) and its reverser.
//!
//! This is a bit-exact port of the classic Numerical Recipes `ran3`, as it
//! commonly circulates in C# ports: a 55-word additive/subtractive lagged
//! array seeded by a scramble pass, walked by two pointers 21 apart.

use wrapping_arithmetic::wrappit;

use crate::error::ParamError;
use crate::iter::{confirm_tail, Buffering};

const SIZE: usize = 55;
const MBIG: i32 = i32::MAX;
const MSEED: i32 = 161803398;

/// A snapshot of a [`Ran3`]'s state: the 56-slot array (index 0 unused)
/// and the two walking pointers.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ran3State {
    pub arr: [i32; SIZE + 1],
    pub p_a: usize,
    pub p_b: usize,
}

impl Ran3State {
    fn values_from(&self, start: usize) -> [i32; SIZE] {
        // Treat pointer 0 (the pristine pre-generation position) as
        // cyclically adjacent to 55, matching `Iterator::next`'s wrap.
        let zero_based = (start + SIZE - 1) % SIZE;
        let mut out = [0i32; SIZE];
        for (i, slot) in out.iter_mut().enumerate() {
            let idx = 1 + (zero_based + i) % SIZE;
            *slot = self.arr[idx];
        }
        out
    }
}

impl PartialEq for Ran3State {
    /// Two states are equal iff walking both arrays 55 steps from their
    /// respective pointers produces the same values in the same order.
    /// The raw pointer values and array layout are not otherwise
    /// meaningful: ran3's state space has a cyclic symmetry the fixed
    /// `(p_a, p_b)` choice in [`reverse_ran3`] deliberately exploits.
    fn eq(&self, other: &Self) -> bool {
        let offset = (self.p_b + SIZE - self.p_a) % SIZE;
        let other_offset = (other.p_b + SIZE - other.p_a) % SIZE;
        offset == other_offset && self.values_from(self.p_a) == other.values_from(other.p_a)
    }
}

/// Knuth's subtractive generator.
#[derive(Clone, Debug)]
pub struct Ran3 {
    state: Ran3State,
}

impl Ran3 {
    /// Builds a generator from a 32-bit seed via the standard `ran3`
    /// scramble pass.
    #[wrappit]
    pub fn new(seed: i32) -> Self {
        let mut arr = [0i32; SIZE + 1];

        let mut mj = MSEED - seed.unsigned_abs() as i32;
        mj %= MBIG;
        arr[SIZE] = mj;
        let mut mk = 1i32;
        for i in 1..=(SIZE - 1) {
            let ii = (21 * i) % SIZE;
            arr[ii] = mk;
            mk = mj - mk;
            if mk < 0 {
                mk += MBIG;
            }
            mj = arr[ii];
        }
        for _ in 1..=4 {
            for i in 1..=SIZE {
                arr[i] -= arr[1 + (i + 30) % SIZE];
                if arr[i] < 0 {
                    arr[i] += MBIG;
                }
            }
        }

        Ran3 {
            state: Ran3State { arr, p_a: 0, p_b: 21 },
        }
    }

    /// Restores a generator from a previously captured state.
    pub fn from_state(state: Ran3State) -> Result<Self, ParamError> {
        if state.arr.len() != SIZE + 1 {
            return Err(ParamError::SeedArrayLength(state.arr.len() - 1));
        }
        Ok(Ran3 { state })
    }

    /// Captures the current state.
    pub fn state(&self) -> Ran3State {
        self.state.clone()
    }
}

impl Iterator for Ran3 {
    type Item = i32;

    #[wrappit]
    fn next(&mut self) -> Option<i32> {
        self.state.p_a = self.state.p_a % SIZE + 1;
        self.state.p_b = self.state.p_b % SIZE + 1;

        let mut v = self.state.arr[self.state.p_a] - self.state.arr[self.state.p_b];
        if v == MBIG {
            v -= 1;
        }
        if v < 0 {
            v += MBIG;
        }
        self.state.arr[self.state.p_a] = v;
        Some(v)
    }
}

const CONFIRM_STEPS: usize = 8;

/// Attempts to recover the state of a ran3 generator from exactly 55
/// consecutive raw outputs.
///
/// After any 55 consecutive calls from *any* starting state, the array
/// slots `1..=55` hold exactly those 55 emitted values in order and the
/// pointers sit exactly 21 apart — a direct consequence of both pointers
/// cycling through all 55 slots once per 55 calls. Fixing the recovered
/// pointers at `(55, 21)` and the array at the observed values therefore
/// reconstructs a state equivalent to the generator's true one, regardless
/// of where in its own cycle the original generator actually started.
pub fn reverse_ran3<I: Iterator<Item = i32>>(input: I) -> Option<Ran3State> {
    let mut raw = Buffering::new(input, None);

    let mut arr = [0i32; SIZE + 1];
    for slot in arr.iter_mut().skip(1) {
        *slot = raw.next()?;
    }

    let state = Ran3State {
        arr,
        p_a: SIZE,
        p_b: 21,
    };
    let mut candidate = Ran3::from_state(state.clone()).ok()?;
    if confirm_tail(&mut candidate, &mut raw, 0, CONFIRM_STEPS) {
        Some(candidate.state())
    } else {
        None
    }
}

//! Recovers the internal state of a pseudo-random number generator from a
//! finite prefix of its output, across five PRNG families: a linear
//! congruential generator, an additive lagged Fibonacci generator (with
//! optional carry), Knuth's subtractive `ran3`, Xoshiro256**, and the
//! Mersenne Twister MT19937.
//!
//! Each family module exposes a forward generator (an [`Iterator`] over the
//! family's output type) and a `reverse_*` function: given an iterator of
//! observed outputs, it either recovers a `State` that continues the
//! sequence exactly where the input left off, or returns `None` to report
//! that the input does not look like that family. `None` covers both
//! genuine non-recognition and premature input exhaustion; constructors
//! report malformed parameters separately through [`error::ParamError`].
//!
//! ```
//! use seedseeker::lcg::{reverse_lcg, Lcg};
//!
//! let source = Lcg::new(2147483647, 48271, 0, 1).unwrap();
//! let observed: Vec<u64> = source.take(64).collect();
//! let recovered = reverse_lcg(observed.into_iter()).expect("recognized as an LCG");
//! assert_eq!(recovered.a, 48271);
//! ```

pub mod error;
pub mod iter;
pub mod lcg;
pub mod lfg;
pub mod mt19937;
pub mod primes;
pub mod ran3;
pub mod xoshiro;

mod bigint_util;

pub use error::ParamError;

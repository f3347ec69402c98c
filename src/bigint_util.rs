//! Small arbitrary-precision helpers shared by the LCG and LFG reversers.
//!
//! Candidate products accumulated while hunting for a modulus, and the
//! residual deltas the LFG reverser inspects, can exceed 64 bits well before
//! the true modulus is known (the source only promises the *final* recovered
//! parameters fit in 64 bits). `BigInt` keeps that search honest.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

/// Computes the modular inverse of `a` mod `m`, or `None` if `a` and `m`
/// are not coprime.
pub(crate) fn mod_inverse(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    if m.is_one() {
        return Some(BigInt::zero());
    }
    let egcd = a.extended_gcd(m);
    if !egcd.gcd.is_one() {
        return None;
    }
    Some(egcd.x.mod_floor(m))
}

/// Folds the gcd of a non-empty slice of `BigInt`s.
pub(crate) fn gcd_all(values: &[BigInt]) -> BigInt {
    values
        .iter()
        .fold(BigInt::zero(), |acc, v| acc.gcd(v))
}

/// Narrows a non-negative `BigInt` into a `u64`, if it fits.
pub(crate) fn to_u64(value: &BigInt) -> Option<u64> {
    value.to_u64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_inverse_of_coprime_pair() {
        let a = BigInt::from(3);
        let m = BigInt::from(11);
        let inv = mod_inverse(&a, &m).unwrap();
        assert_eq!((&inv * &a).mod_floor(&m), BigInt::one());
    }

    #[test]
    fn mod_inverse_absent_when_not_coprime() {
        assert_eq!(mod_inverse(&BigInt::from(4), &BigInt::from(8)), None);
    }

    #[test]
    fn gcd_all_reduces_shared_factor() {
        let values = vec![BigInt::from(12), BigInt::from(18), BigInt::from(30)];
        assert_eq!(gcd_all(&values), BigInt::from(6));
    }
}

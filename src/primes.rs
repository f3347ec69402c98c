//! Sieve of Eratosthenes up to 2¹⁶, and small-prime divisor enumeration.
//!
//! The LCG reverser walks candidate moduli from `g` (the gcd of collected
//! determinant products) down to its small-prime quotients, trying the
//! "cleanest" candidates first. The sieve only needs to run once per
//! process.

use std::sync::OnceLock;

const SIEVE_LIMIT: u64 = 1 << 16;

fn sieve(limit: u64) -> Vec<u64> {
    let limit = limit as usize;
    let mut is_prime = vec![true; limit + 1];
    if limit >= 1 {
        is_prime[0] = false;
        is_prime[1] = false;
    }

    let mut primes = Vec::new();
    for i in 2..=limit {
        if !is_prime[i] {
            continue;
        }
        primes.push(i as u64);
        let mut j = i * 2;
        while j <= limit {
            is_prime[j] = false;
            j += i;
        }
    }
    primes
}

fn primes_table() -> &'static [u64] {
    static PRIMES: OnceLock<Vec<u64>> = OnceLock::new();
    PRIMES.get_or_init(|| sieve(SIEVE_LIMIT))
}

/// Yields `n` itself, followed by `n / p` for every prime `p <= 2^16` that
/// divides `n` evenly. The LCG reverser relies on `n` being tried first.
pub fn divisors(n: u64) -> impl Iterator<Item = u64> {
    std::iter::once(n).chain(primes_table().iter().filter_map(move |&p| {
        if n % p == 0 {
            Some(n / p)
        } else {
            None
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sieve_matches_known_small_primes() {
        let primes = sieve(50);
        assert_eq!(
            primes,
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47]
        );
    }

    #[test]
    fn divisors_yields_self_first() {
        let got: Vec<u64> = divisors(60).take(1).collect();
        assert_eq!(got, vec![60]);
    }

    #[test]
    fn divisors_include_small_prime_quotients() {
        let got: Vec<u64> = divisors(60).collect();
        // 60 = 2^2 * 3 * 5, quotients by 2, 3, 5 must all appear.
        assert!(got.contains(&30)); // 60 / 2
        assert!(got.contains(&20)); // 60 / 3
        assert!(got.contains(&12)); // 60 / 5
    }

    #[test]
    fn divisors_of_prime_is_just_itself_and_one() {
        let got: Vec<u64> = divisors(97).collect();
        assert_eq!(got[0], 97);
        assert!(got.iter().skip(1).all(|&d| d == 1 || d != 97));
    }
}

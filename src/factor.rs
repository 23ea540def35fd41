//! # Heuristic Factorization Dispatcher
//!
//! Ties trial division, a perfect-power check, deterministic primality,
//! Pollard-rho, and Lenstra ECF together into the size-escalating
//! strategy `nut_u64_factor_heuristic` uses: try the cheap methods first
//! and only escalate once a cofactor proves too large for them.
//!
//! ## References
//!
//! - `nut_u64_factor_heuristic`, `nut_u64_is_perfect_power` in the
//!   original C factorization library.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::factors::Factors;
use crate::{lenstra, pollard, primality};

/// Tunables for [`factor_heuristic`], mirroring the original library's
/// `nut_FactorConf`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FactorConfig {
    /// Use Pollard-rho for cofactors at most this large. `0` disables
    /// Pollard; `u64::MAX` always prefers it over Lenstra.
    pub pollard_max: u64,
    /// Pollard-rho batched-gcd stride.
    pub pollard_stride: u64,
    /// Use Lenstra ECF for cofactors at most this large (above
    /// `pollard_max`).
    pub lenstra_max: u64,
    /// Lenstra ECF smoothness bound: scalars `2..=lenstra_bfac` are tried
    /// per curve.
    pub lenstra_bfac: u64,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            pollard_max: 100_000,
            pollard_stride: 10,
            lenstra_max: u64::MAX,
            lenstra_bfac: 10,
        }
    }
}

/// A source of random `u64`s in `[lo, hi)`, injected so factoring is
/// reproducible under test while defaulting to OS entropy in production —
/// the same capability-closure shape the teacher uses for its
/// coordination-client abstraction.
pub trait RandomSource {
    fn next_in_range(&mut self, lo: u64, hi: u64) -> u64;
}

/// [`RandomSource`] backed by `rand_chacha`'s ChaCha12 generator, seedable
/// for deterministic tests or seeded from OS entropy for production use.
pub struct ChaChaRandomSource {
    rng: rand_chacha::ChaCha12Rng,
}

impl ChaChaRandomSource {
    pub fn from_os_entropy() -> Self {
        use rand::SeedableRng;
        Self { rng: rand_chacha::ChaCha12Rng::from_entropy() }
    }

    pub fn from_seed(seed: u64) -> Self {
        use rand::SeedableRng;
        Self { rng: rand_chacha::ChaCha12Rng::seed_from_u64(seed) }
    }
}

impl RandomSource for ChaChaRandomSource {
    fn next_in_range(&mut self, lo: u64, hi: u64) -> u64 {
        use rand::Rng;
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }
}

/// Trial division by a known prime list, returning the undivided
/// cofactor alongside the factors pulled out.
fn trial_div(mut n: u64, primes: &[u64], factors: &mut Factors) -> u64 {
    for &p in primes {
        if p < 2 || p * p > n {
            continue;
        }
        if n % p == 0 {
            let mut k = 0u32;
            while n % p == 0 {
                n /= p;
                k += 1;
            }
            factors.append(p, k);
        }
    }
    n
}

/// Largest `e >= 2` and base `r` with `r^e == n`, if `n` is a perfect
/// power up to exponent `max_exp`. Checked by binary-searching candidate
/// roots via floating-point estimate plus integer correction.
fn perfect_power(n: u64, max_exp: u32) -> (u64, u32) {
    if n < 4 {
        return (n, 1);
    }
    for e in (2..=max_exp).rev() {
        let mut r = (n as f64).powf(1.0 / e as f64).round() as u64;
        for cand in r.saturating_sub(1)..=r + 1 {
            if cand > 1 && crate::modular::pow_u64(cand, e as u64) == n {
                r = cand;
                return (r, e);
            }
        }
    }
    (n, 1)
}

const SMOOTHNESS: u64 = 101 * 101;

/// Factor `n` completely, trying in order: trial division against
/// `primes`, a perfect-power reduction, deterministic Miller-Rabin,
/// Pollard-rho (below `conf.pollard_max`), then Lenstra ECF (below
/// `conf.lenstra_max`). Returns the accumulated [`Factors`] plus any
/// cofactor the escalation gave up on (`1` on full success).
pub fn factor_heuristic(
    n: u64,
    primes: &[u64],
    conf: &FactorConfig,
    rng: &mut dyn RandomSource,
) -> Result<(Factors, u64)> {
    let mut factors = Factors::with_capacity(16);
    let mut n = trial_div(n, primes, &mut factors);
    if n == 1 {
        return Ok((factors, 1));
    }
    let (base, exponent) = perfect_power(n, 9);
    n = base;
    if primality::is_prime(n) {
        factors.append(n, exponent);
        return Ok((factors, 1));
    }
    loop {
        let m = if n <= conf.pollard_max {
            loop {
                let x = rng.next_in_range(0, n);
                let m = pollard::factor_one(n, x, conf.pollard_stride);
                if m != n {
                    break m;
                }
            }
        } else if n <= conf.lenstra_max {
            loop {
                let x = rng.next_in_range(0, n) as i64;
                let y = rng.next_in_range(0, n) as i64;
                let a = rng.next_in_range(0, n) as i64;
                match lenstra::factor_one(n as i64, x, y, a, conf.lenstra_bfac as i64) {
                    lenstra::LenstraOutcome::Factor(f) | lenstra::LenstraOutcome::Degenerate(f)
                        if f != 1 && f != n =>
                    {
                        break f;
                    }
                    _ => continue,
                }
            }
        } else {
            warn!(n, "factor_heuristic: cofactor exceeds both pollard_max and lenstra_max, giving up");
            return Ok((factors, n));
        };
        debug!(n, m, "factor_heuristic: split off a cofactor");
        let mut k = 1u32;
        n /= m;
        while n % m == 0 {
            k += 1;
            n /= m;
        }
        if m < SMOOTHNESS || primality::is_prime(m) {
            factors.append(m, k * exponent);
        } else {
            let (sub_factors, cofactor) = factor_heuristic(m, &[], conf, rng)?;
            if cofactor != 1 {
                return Ok((factors, cofactor));
            }
            factors.combine(&sub_factors, k * exponent);
        }
        if n == 1 {
            return Ok((factors, 1));
        }
        if n < SMOOTHNESS || primality::is_prime(n) {
            factors.append(n, exponent);
            return Ok((factors, 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(u64);
    impl RandomSource for FixedSource {
        fn next_in_range(&mut self, lo: u64, hi: u64) -> u64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
            if hi <= lo {
                lo
            } else {
                lo + self.0 % (hi - lo)
            }
        }
    }

    #[test]
    fn factors_product_of_two_primes() {
        let mut rng = FixedSource(12345);
        let conf = FactorConfig::default();
        let (factors, cofactor) = factor_heuristic(8051, &[], &conf, &mut rng).unwrap();
        assert_eq!(cofactor, 1);
        assert_eq!(factors.prod(), 8051);
    }

    #[test]
    fn factors_highly_composite_number_via_trial_division() {
        let primes = crate::sieve::generate_primes(100);
        let mut rng = FixedSource(1);
        let conf = FactorConfig::default();
        let (factors, cofactor) = factor_heuristic(720_720, &primes, &conf, &mut rng).unwrap();
        assert_eq!(cofactor, 1);
        assert_eq!(factors.prod(), 720_720);
    }

    #[test]
    fn perfect_power_detects_exact_square() {
        assert_eq!(perfect_power(144, 9), (12, 2));
    }

    #[test]
    fn perfect_power_leaves_non_powers_alone() {
        assert_eq!(perfect_power(30, 9), (30, 1));
    }

    #[test]
    fn factors_a_perfect_power_of_a_prime() {
        let mut rng = FixedSource(7);
        let conf = FactorConfig::default();
        // 3^10 = 59049
        let (factors, cofactor) = factor_heuristic(59_049, &[], &conf, &mut rng).unwrap();
        assert_eq!(cofactor, 1);
        assert_eq!(factors.prod(), 59_049);
    }
}

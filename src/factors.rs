//! # Prime Factorizations
//!
//! `Factors` is the owned, sorted-by-prime representation every other
//! module in this crate produces and consumes: [`crate::factor`] builds
//! one per input, [`crate::sieve`] builds a table of them in bulk, and
//! the divisor-function helpers here turn one into `phi`, `sigma`, or a
//! divisor enumeration without re-factoring.
//!
//! ## References
//!
//! - `nut_Factors` / `nut_Factor_*` in the original C factorization
//!   library this module generalizes from a flexible-array-member struct
//!   to an owned `Vec`.

use std::ops::ControlFlow;

use crate::modular::{lcm_i64, pow_u64};

/// A prime factorization, stored as strictly-increasing `(prime, power)`
/// pairs. Never holds a zero power or a duplicate prime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Factors {
    entries: Vec<(u64, u32)>,
}

/// What happened when a prime power was folded into a [`Factors`].
///
/// Mirrors the C API's three insertion branches (new trailing entry,
/// power bump on an existing entry, mid-array insertion) as a value
/// instead of leaving the caller to infer it from a return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new `(prime, power)` pair was appended at the end.
    Appended,
    /// An existing prime's power was increased.
    PowerBumped,
    /// A new pair was inserted to keep primes in order.
    Inserted,
}

impl Factors {
    /// An empty factorization (the factorization of 1).
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// An empty factorization with room for `max_primes` distinct primes
    /// before the backing `Vec` reallocates.
    pub fn with_capacity(max_primes: usize) -> Self {
        Self { entries: Vec::with_capacity(max_primes) }
    }

    /// An empty factorization sized for any number up to `n`, given the
    /// list of primes up to `sqrt(n)` (or further) that trial division
    /// will be run against. Counts how many of the leading primes could
    /// simultaneously divide some number `<= n` and reserves that many
    /// slots.
    pub fn for_bound(n: u64, primes: &[u64]) -> Self {
        let mut prod: u64 = 1;
        let mut count = 0usize;
        for &p in primes {
            match prod.checked_mul(p) {
                Some(next) if next <= n => {
                    prod = next;
                    count += 1;
                }
                _ => break,
            }
        }
        Self::with_capacity(count.max(1))
    }

    /// The `(prime, power)` pairs, strictly increasing by prime.
    pub fn entries(&self) -> &[(u64, u32)] {
        &self.entries
    }

    pub fn num_primes(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The power of `p` in this factorization, or 0 if `p` does not
    /// divide the represented number.
    pub fn power_of(&self, p: u64) -> u32 {
        self.entries
            .binary_search_by_key(&p, |&(prime, _)| prime)
            .map(|i| self.entries[i].1)
            .unwrap_or(0)
    }

    /// Fold a prime power into this factorization, preserving the
    /// strictly-increasing-prime invariant. `m` must be prime and `k >
    /// 0`; violating this corrupts the invariant silently, matching the
    /// C contract ("composite numbers or zero powers should not be
    /// supplied").
    pub fn append(&mut self, m: u64, k: u32) -> InsertOutcome {
        debug_assert!(k > 0, "Factors::append: zero power for prime {m}");
        match self.entries.binary_search_by_key(&m, |&(p, _)| p) {
            Ok(i) => {
                self.entries[i].1 += k;
                InsertOutcome::PowerBumped
            }
            Err(i) if i == self.entries.len() => {
                self.entries.push((m, k));
                InsertOutcome::Appended
            }
            Err(i) => {
                self.entries.insert(i, (m, k));
                InsertOutcome::Inserted
            }
        }
    }

    /// Merge `other`'s prime powers into `self`, each scaled by `k` —
    /// as if `other`'s factored number were raised to the `k`-th power
    /// and then combined in. Used when a composite cofactor `m` is
    /// discovered to satisfy `m^k | n` and `m` has since been factored.
    pub fn combine(&mut self, other: &Factors, k: u32) {
        let mut merged = Vec::with_capacity(self.entries.len() + other.entries.len());
        let (mut i, mut j) = (0, 0);
        while i < self.entries.len() && j < other.entries.len() {
            let (p, a) = self.entries[i];
            let (q, b) = other.entries[j];
            if p < q {
                merged.push((p, a));
                i += 1;
            } else if p > q {
                merged.push((q, b * k));
                j += 1;
            } else {
                merged.push((p, a + b * k));
                i += 1;
                j += 1;
            }
        }
        merged.extend_from_slice(&self.entries[i..]);
        merged.extend(other.entries[j..].iter().map(|&(p, b)| (p, b * k)));
        self.entries = merged;
    }

    /// Raise the factored number to a power by multiplying every
    /// exponent by `power`.
    pub fn ipow(&mut self, power: u32) {
        for (_, e) in self.entries.iter_mut() {
            *e *= power;
        }
    }

    /// The number this factorization represents, `prod p_i^e_i`.
    /// Overflows (wrapping) the same as every other arithmetic op in
    /// this crate above 2^63.
    pub fn prod(&self) -> u64 {
        self.entries
            .iter()
            .fold(1u64, |acc, &(p, e)| acc.wrapping_mul(pow_u64(p, e as u64)))
    }

    /// Number of divisors, `prod (e_i + 1)`.
    pub fn divcount(&self) -> u64 {
        self.entries.iter().fold(1u64, |acc, &(_, e)| acc * (e as u64 + 1))
    }

    /// Sum of divisors, `prod (p_i^(e_i+1) - 1)/(p_i - 1)`.
    pub fn divsum(&self) -> u64 {
        self.entries.iter().fold(1u64, |acc, &(p, e)| {
            acc * (pow_u64(p, e as u64 + 1) - 1) / (p - 1)
        })
    }

    /// Sum of `power`-th powers of divisors. `divpowsum(0) == divcount()`
    /// and `divpowsum(1) == divsum()`.
    pub fn divpowsum(&self, power: u64) -> u64 {
        if power == 0 {
            return self.divcount();
        }
        if power == 1 {
            return self.divsum();
        }
        self.entries.iter().fold(1u64, |acc, &(p, e)| {
            let pe = pow_u64(p, power);
            acc * (pow_u64(pe, e as u64 + 1) - 1) / (pe - 1)
        })
    }

    /// Number of ordered `k`-tuples of positive integers whose product
    /// is the factored number, `prod binom(e_i + k - 1, k - 1)`.
    pub fn divtupcount(&self, k: u64) -> u64 {
        match k {
            0 => (self.entries.is_empty()) as u64,
            1 => 1,
            2 => self.divcount(),
            _ => self
                .entries
                .iter()
                .fold(1u64, |acc, &(_, e)| acc * binom(e as u64 + k - 1, k - 1)),
        }
    }

    /// Euler's totient: the count of integers in `[1, n]` coprime to
    /// `n`, `prod p_i^(e_i - 1) (p_i - 1)`.
    pub fn phi(&self) -> u64 {
        self.entries
            .iter()
            .fold(1u64, |acc, &(p, e)| acc * pow_u64(p, e as u64 - 1) * (p - 1))
    }

    /// Carmichael's lambda: the smallest `m` with `a^m = 1 mod n` for
    /// every `a` coprime to `n`. Always divides [`Factors::phi`].
    ///
    /// The factor of 2 gets the "2-block" adjustment (`lambda(2) = 1`,
    /// `lambda(4) = 2`, `lambda(2^e) = 2^(e-2)` for `e >= 3`) that makes
    /// `(Z/2^e Z)*` fail to be cyclic past `e = 2`; odd prime powers use
    /// the ordinary `phi(p^e)` since `(Z/p^e Z)*` is always cyclic there.
    pub fn carmichael(&self) -> u64 {
        let Some(&(p0, a0)) = self.entries.first() else {
            return 1;
        };
        let mut s = if p0 == 2 {
            if a0 >= 3 {
                1u64 << (a0 - 2)
            } else {
                1u64 << (a0 - 1)
            }
        } else {
            pow_u64(p0, a0 as u64 - 1) * (p0 - 1)
        };
        for &(p, a) in &self.entries[1..] {
            let phi_pk = pow_u64(p, a as u64 - 1) * (p - 1);
            s = lcm_i64(s as i64, phi_pk as i64) as u64;
        }
        s
    }

    /// Visit every divisor of the factored number, smallest factorization
    /// state first, in the mixed-radix odometer order the C
    /// implementation uses (incrementing the lowest prime's exponent
    /// fastest). `f` receives the divisor's own factorization and value;
    /// return [`ControlFlow::Break`] to stop early.
    pub fn forall_divs<B>(
        &self,
        mut f: impl FnMut(&Factors, u64) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        self.forall_divs_le(u64::MAX, &mut f)
    }

    /// As [`Factors::forall_divs`], but skips (without visiting) any
    /// divisor exceeding `d_max`.
    pub fn forall_divs_le<B>(
        &self,
        d_max: u64,
        mut f: impl FnMut(&Factors, u64) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        if d_max == 0 {
            return ControlFlow::Continue(());
        }
        let n = self.entries.len();
        let mut exps = vec![0u32; n];
        // Running p_i^(current exponent at i), so resetting position i is a
        // single division instead of replaying every increment.
        let mut pcontrib = vec![1u64; n];
        let mut d = 1u64;
        loop {
            let dfactors = Factors {
                entries: self
                    .entries
                    .iter()
                    .zip(&exps)
                    .filter(|(_, &e)| e > 0)
                    .map(|(&(p, _), &e)| (p, e))
                    .collect(),
            };
            f(&dfactors, d)?;
            let mut i = 0;
            loop {
                if i == n {
                    return ControlFlow::Continue(());
                }
                let (p, max_e) = self.entries[i];
                if exps[i] < max_e {
                    let next_d = d * p;
                    if next_d <= d_max {
                        exps[i] += 1;
                        pcontrib[i] *= p;
                        d = next_d;
                        break;
                    }
                }
                d /= pcontrib[i];
                pcontrib[i] = 1;
                exps[i] = 0;
                i += 1;
            }
        }
    }
}

/// Binomial coefficient `n choose k` via the multiplicative formula,
/// computed in `u128` to delay overflow and truncated back to `u64`.
fn binom(n: u64, k: u64) -> u64 {
    let k = k.min(n - k);
    let mut num: u128 = 1;
    for i in 0..k {
        num = num * (n - i) as u128 / (i + 1) as u128;
    }
    num as u64
}

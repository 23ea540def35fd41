//! # The Hybrid Dirichlet Table
//!
//! Storage for a multiplicative function `f` over `[1, x]`: `dense[k]`
//! holds `f(k)` pointwise for small `k ≤ y`, while `sparse[i]` holds the
//! prefix sum `F(⌊x/i⌋)` for each of the O(√x) distinct large quotients.
//! Choosing `y ≥ ⌊√x⌋` keeps both halves O(√x) long.
//!
//! ## References
//!
//! - `nut_Dirichlet_Table_init` and the `compute_*` family in the
//!   original C factorization library.

use crate::dirichlet::{isqrt, reduce};
use crate::matrix::{invert_lower_triangular, invert_lower_triangular_mod, Matrix};
use crate::modular::pow_u64;

/// A hybrid dense/sparse Dirichlet-series table over `[1, x]`.
#[derive(Debug, Clone)]
pub struct DiriTable {
    x: i64,
    y: i64,
    yinv: i64,
    buf: Vec<i64>,
}

impl DiriTable {
    /// Allocate a table for `x`, raising `y` to `⌊√x⌋` if the caller's
    /// hint is smaller.
    pub fn init(x: i64, y: i64) -> Self {
        debug_assert!(x >= 1, "DiriTable::init: x must be positive");
        let y = y.max(isqrt(x));
        let yinv = x / y + 1;
        let buf = vec![0i64; (y + yinv) as usize];
        Self { x, y, yinv, buf }
    }

    pub fn x(&self) -> i64 {
        self.x
    }

    pub fn y(&self) -> i64 {
        self.y
    }

    /// One past the largest valid sparse index.
    pub fn yinv(&self) -> i64 {
        self.yinv
    }

    /// `f(k)` (or a scratch value mid-computation) for `0 <= k <= y`.
    pub fn dense(&self, k: i64) -> i64 {
        debug_assert!((0..=self.y).contains(&k), "DiriTable::dense: {k} out of [0, {}]", self.y);
        self.buf[k as usize]
    }

    pub fn set_dense(&mut self, k: i64, v: i64) {
        debug_assert!((0..=self.y).contains(&k), "DiriTable::set_dense: {k} out of [0, {}]", self.y);
        self.buf[k as usize] = v;
    }

    /// `F(⌊x/i⌋)` for `1 <= i < y⁻¹`.
    pub fn sparse(&self, i: i64) -> i64 {
        debug_assert!((1..self.yinv).contains(&i), "DiriTable::sparse: {i} out of [1, {})", self.yinv);
        self.buf[(self.y + i) as usize]
    }

    pub fn set_sparse(&mut self, i: i64, v: i64) {
        debug_assert!((1..self.yinv).contains(&i), "DiriTable::set_sparse: {i} out of [1, {})", self.yinv);
        self.buf[(self.y + i) as usize] = v;
    }

    /// The quotient `⌊x/i⌋` a sparse index `i` stands for.
    pub fn v_at(&self, i: i64) -> i64 {
        self.x / i
    }

    /// Look up the table's value at quotient `q = ⌊x/idx⌋` — `idx` is the
    /// sparse index that produces `q` (typically `i * n` inside a
    /// hyperbola-sum loop); `local_prefix` supplies the dense-range
    /// answer when `q` falls inside `[0, y]`.
    pub(crate) fn prefix_at(&self, local_prefix: &[i64], q: i64, idx: i64) -> i64 {
        if q <= self.y {
            local_prefix[q as usize]
        } else {
            self.sparse(idx)
        }
    }

    /// Populate as the Dirichlet identity `I` (`I(1) = 1`, `I(n) = 0`
    /// otherwise); `F_I(v) = 1` for every `v >= 1`.
    pub fn compute_i(&mut self, m: i64) {
        for k in 0..=self.y {
            self.set_dense(k, if k == 1 { reduce(1, m) } else { 0 });
        }
        for i in 1..self.yinv {
            self.set_sparse(i, reduce(1, m));
        }
    }

    /// Populate as the constant function `u` (`u(n) = 1`); `U(v) = v`.
    pub fn compute_u(&mut self, m: i64) {
        self.set_dense(0, 0);
        for k in 1..=self.y {
            self.set_dense(k, reduce(1, m));
        }
        for i in 1..self.yinv {
            let v = self.v_at(i);
            self.set_sparse(i, reduce(v, m));
        }
    }

    /// Populate as the identity function `N` (`N(n) = n`); `N_sum(v) =
    /// v(v+1)/2`, computed in 128-bit intermediates since `v` can be as
    /// large as `x`.
    pub fn compute_n(&mut self, m: i64) {
        for k in 0..=self.y {
            self.set_dense(k, reduce(k, m));
        }
        for i in 1..self.yinv {
            let v = self.v_at(i) as i128;
            let triangular = v * (v + 1) / 2;
            let reduced = if m > 0 {
                triangular.rem_euclid(m as i128) as i64
            } else {
                triangular as i64
            };
            self.set_sparse(i, reduced);
        }
    }

    /// Populate as `N^k` (`N^k(n) = n^k`); the prefix sum `Σ_{t=1}^{v}
    /// t^k` is obtained by multiplying a Vandermonde vector `((v+1)^1 -
    /// 1, (v+1)^2 - 1, …)` by the inverse of the truncated Pascal
    /// triangle — see `crate::matrix`.
    pub fn compute_nk(&mut self, k: u32, m: i64) {
        let dim = (k + 1) as usize;
        let l = Matrix::pascal_lower_triangular(dim);

        for j in 0..=self.y {
            let val = if m > 0 {
                crate::modular::powmod_u64(j as u64, k as u64, m as u64) as i64
            } else {
                pow_u64(j as u64, k as u64) as i64
            };
            self.set_dense(j, val);
        }

        if m > 0 {
            let inv = invert_lower_triangular_mod(&l, m);
            for i in 1..self.yinv {
                let v = self.v_at(i);
                self.set_sparse(i, power_sum_mod(v, k, &inv, m));
            }
        } else {
            let (inv, denom) = invert_lower_triangular(&l);
            for i in 1..self.yinv {
                let v = self.v_at(i);
                self.set_sparse(i, power_sum_exact(v, k, &inv, denom));
            }
        }
    }

    /// Populate with the Möbius function `μ`, using a precomputed table
    /// of `μ(n)` for `n` in `[0, y]` (see [`crate::sieve::MobiusSieve`]).
    /// First materializes prefix sums into `dense`, then runs the
    /// hyperbola-style Mertens recurrence over the sparse slots from
    /// largest index to smallest (so any sparse value a recurrence needs
    /// is already final), and finally overwrites `dense` with the
    /// pointwise `μ` values the recurrence needed as scratch.
    pub fn compute_mertens(&mut self, mu: &[i8]) {
        debug_assert!(mu.len() > self.y as usize, "compute_mertens: mu table too short");

        let mut acc = 0i64;
        for k in 0..=self.y {
            if k >= 1 {
                acc += mu[k as usize] as i64;
            }
            self.set_dense(k, acc);
        }

        for i in (1..self.yinv).rev() {
            let v = self.v_at(i);
            let s = isqrt(v);
            let mut m_v = 1i64;
            for j in 2..=s {
                let vj = v / j;
                let mvj = if vj <= self.y { self.dense(vj) } else { self.sparse(i * j) };
                m_v -= mvj;
            }
            for j in 1..=s {
                let mj = self.dense(j);
                let mj_1 = self.dense(j - 1);
                m_v -= (mj - mj_1) * (v / j);
            }
            m_v += self.dense(s) * s;
            self.set_sparse(i, m_v);
        }

        for k in 0..=self.y {
            self.set_dense(k, mu[k as usize] as i64);
        }
    }

    /// Populate with `π`, the prime-counting function, Meissel–Mertens
    /// style: seed `dense[k] = k - 1`, `sparse[i] = ⌊x/i⌋ - 1` (both
    /// count "candidates other than 1"), then for each `p ≤ y`, if `p`
    /// is prime (recognised by `dense[p] != dense[p-1]`), subtract the
    /// correction `π(⌊v/p⌋) - π(p-1)` from every remaining position `v
    /// >= p²` — composites divisible by `p` get removed from the count
    /// exactly once, at their smallest prime factor.
    pub fn compute_pi(&mut self) {
        for k in 0..=self.y {
            self.set_dense(k, k - 1);
        }
        for i in 1..self.yinv {
            self.set_sparse(i, self.v_at(i) - 1);
        }

        for p in 2..=self.y {
            if self.dense(p) == self.dense(p - 1) {
                continue;
            }
            let pi_p_1 = self.dense(p - 1);
            let p2 = p * p;

            let mut i = 1i64;
            while i < self.yinv {
                let v = self.v_at(i);
                if v < p2 {
                    break;
                }
                let correction = self.prefix_at_pi(i * p, v / p) - pi_p_1;
                let new_v = self.sparse(i) - correction;
                self.set_sparse(i, new_v);
                i += 1;
            }
            for k in (p2..=self.y).rev() {
                let correction = self.dense(k / p) - pi_p_1;
                let new_v = self.dense(k) - correction;
                self.set_dense(k, new_v);
            }
        }
    }

    fn prefix_at_pi(&self, idx: i64, q: i64) -> i64 {
        if q <= self.y {
            self.dense(q)
        } else {
            self.sparse(idx)
        }
    }
}

fn power_sum_mod(v: i64, k: u32, inv: &Matrix, m: i64) -> i64 {
    let vp1 = (v + 1).rem_euclid(m);
    let mut powers = vec![0i64; (k + 1) as usize];
    let mut p = 1i64;
    for entry in powers.iter_mut() {
        p = ((p as i128 * vp1 as i128).rem_euclid(m as i128)) as i64;
        *entry = (p - 1).rem_euclid(m);
    }
    let mut sum = 0i128;
    for (j, &pw) in powers.iter().enumerate() {
        sum += inv.get(k as usize, j) as i128 * pw as i128;
    }
    (sum.rem_euclid(m as i128)) as i64
}

fn power_sum_exact(v: i64, k: u32, inv: &Matrix, denom: i64) -> i64 {
    let vp1 = v as i128 + 1;
    let mut powers = vec![0i128; (k + 1) as usize];
    let mut p = 1i128;
    for entry in powers.iter_mut() {
        p *= vp1;
        *entry = p - 1;
    }
    let mut sum = 0i128;
    for (j, &pw) in powers.iter().enumerate() {
        sum += inv.get(k as usize, j) as i128 * pw;
    }
    (sum / denom as i128) as i64
}

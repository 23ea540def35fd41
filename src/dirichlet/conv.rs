//! # Dirichlet Convolution and Division
//!
//! Builds a third table as the pointwise Dirichlet convolution (or
//! division) of two populated tables. The dense range is filled by a
//! linear ("Euler") sieve that visits each composite exactly once by
//! tracking, for every `n`, the largest power of `n`'s smallest prime
//! factor dividing it; the sparse range is filled by the hyperbola-sum
//! identity, splitting the O(x) divisor sum into two O(√x) pieces.
//!
//! ## References
//!
//! - `nut_Dirichlet_conv`, `nut_Dirichlet_div`, `nut_Dirichlet_dk` in the
//!   original C factorization library.
//! - The hyperbola method for Dirichlet prefix sums (see e.g. the
//!   min_25 sieve writeups this crate's sparse-index scheme follows).

use crate::dirichlet::{isqrt, radd, reduce, rmul, rsub, DiriTable};

/// Smallest prime factor and "largest power of the smallest prime
/// factor" for every `n` in `[0, y]`, built with a linear sieve so each
/// composite is visited exactly once.
fn spf_and_smallest_ppow(y: i64) -> (Vec<i64>, Vec<i64>) {
    let yi = y as usize;
    let mut spf = vec![0i64; yi + 1];
    let mut sppow = vec![0i64; yi + 1];
    let mut primes = Vec::new();
    for n in 2..=yi {
        if spf[n] == 0 {
            spf[n] = n as i64;
            sppow[n] = n as i64;
            primes.push(n as i64);
        }
        let mut j = 0;
        while j < primes.len() {
            let p = primes[j];
            if p > spf[n] {
                break;
            }
            let m = n as i64 * p;
            if m > y {
                break;
            }
            let idx = m as usize;
            spf[idx] = p;
            sppow[idx] = if p == spf[n] { sppow[n] * p } else { p };
            if p == spf[n] {
                break;
            }
            j += 1;
        }
    }
    (primes, sppow)
}

fn prefix_sums(t: &DiriTable, y: i64, m: i64) -> Vec<i64> {
    let mut out = vec![0i64; (y + 1) as usize];
    let mut acc = 0i64;
    for k in 1..=y {
        acc = radd(acc, t.dense(k), m);
        out[k as usize] = acc;
    }
    out
}

fn assert_compatible(a: &DiriTable, b: &DiriTable) {
    debug_assert_eq!(a.x(), b.x(), "Dirichlet tables must share x");
    debug_assert_eq!(a.y(), b.y(), "Dirichlet tables must share y");
    debug_assert_eq!(a.yinv(), b.yinv(), "Dirichlet tables must share y⁻¹");
}

/// Fill `h`'s dense range (`[0, y]`) with `(f ⋆ g)(n)`, using
/// multiplicativity of the convolution of two multiplicative functions:
/// once `n` is decomposed as `pk * rest` with `pk` the largest power of
/// `n`'s smallest prime factor, `h(n) = h(pk) * h(rest)` when `rest >
/// 1`, or the direct prime-power convolution sum `Σ f(p^i) g(p^{a-i})`
/// when `n = p^a` itself.
fn conv_dense(f: &DiriTable, g: &DiriTable, h: &mut DiriTable, m: i64) {
    let y = f.y();
    let (spf, sppow) = spf_and_smallest_ppow(y);
    h.set_dense(0, 0);
    if y >= 1 {
        h.set_dense(1, rmul(f.dense(1), g.dense(1), m));
    }
    for n in 2..=y {
        let p = spf[n as usize];
        let pk = sppow[n as usize];
        let rest = n / pk;
        let val = if rest == 1 {
            let mut a = 0u32;
            let mut t = pk;
            while t > 1 {
                t /= p;
                a += 1;
            }
            let mut sum = 0i64;
            let mut pi = 1i64;
            let mut pa_i = n;
            for _ in 0..=a {
                sum = radd(sum, rmul(f.dense(pi), g.dense(pa_i), m), m);
                pi *= p;
                pa_i /= p;
            }
            sum
        } else {
            rmul(h.dense(pk), h.dense(rest), m)
        };
        h.set_dense(n, val);
    }
}

/// General Dirichlet convolution `h = f ⋆ g`. `f`, `g`, and `h` must
/// share `(x, y, y⁻¹)`.
pub fn conv(f: &DiriTable, g: &DiriTable, h: &mut DiriTable, m: i64) {
    assert_compatible(f, g);
    assert_compatible(f, h);
    let y = f.y();
    let f_prefix = prefix_sums(f, y, m);
    let g_prefix = prefix_sums(g, y, m);

    for i in 1..f.yinv() {
        let v = f.v_at(i);
        let s = isqrt(v);
        let mut acc = 0i64;
        for n in 1..=s {
            let idx = i * n;
            let gvn = g.prefix_at(&g_prefix, v / n, idx);
            acc = radd(acc, rmul(f.dense(n), gvn, m), m);
            let fvn = f.prefix_at(&f_prefix, v / n, idx);
            acc = radd(acc, rmul(fvn, g.dense(n), m), m);
        }
        let fs = f_prefix[s as usize];
        let gs = g_prefix[s as usize];
        acc = rsub(acc, rmul(fs, gs, m), m);
        h.set_sparse(i, acc);
    }
    conv_dense(f, g, h, m);
}

/// Specialisation of [`conv`] for `g = u` (the constant function `1`),
/// whose prefix sum `U(v) = v` is closed-form: neither a `g`-prefix
/// scratch array nor the general Euler-sieve composition is needed —
/// `h(n) = Σ_{d|n} f(d)` falls out of a direct divisor-sum sieve.
pub fn conv_u(f: &DiriTable, h: &mut DiriTable, m: i64) {
    assert_compatible(f, h);
    let y = f.y();
    let f_prefix = prefix_sums(f, y, m);

    for i in 1..f.yinv() {
        let v = f.v_at(i);
        let s = isqrt(v);
        let mut acc = 0i64;
        for n in 1..=s {
            let idx = i * n;
            acc = radd(acc, rmul(f.dense(n), reduce(v / n, m), m), m);
            let fvn = f.prefix_at(&f_prefix, v / n, idx);
            acc = radd(acc, fvn, m);
        }
        let fs = f_prefix[s as usize];
        acc = rsub(acc, rmul(fs, reduce(s, m), m), m);
        h.set_sparse(i, acc);
    }

    h.set_dense(0, 0);
    for k in 1..=y {
        h.set_dense(k, 0);
    }
    for d in 1..=y {
        let fd = f.dense(d);
        if fd == 0 {
            continue;
        }
        let mut k = d;
        while k <= y {
            let new_v = radd(h.dense(k), fd, m);
            h.set_dense(k, new_v);
            k += d;
        }
    }
}

/// Specialisation of [`conv`] for `g = N` (`g(n) = n`), whose prefix sum
/// `N_sum(v) = v(v+1)/2` is likewise closed-form.
pub fn conv_n(f: &DiriTable, h: &mut DiriTable, m: i64) {
    assert_compatible(f, h);
    let y = f.y();
    let f_prefix = prefix_sums(f, y, m);

    for i in 1..f.yinv() {
        let v = f.v_at(i);
        let s = isqrt(v);
        let mut acc = 0i64;
        for n in 1..=s {
            let idx = i * n;
            acc = radd(acc, rmul(f.dense(n), triangular(v / n, m), m), m);
            let fvn = f.prefix_at(&f_prefix, v / n, idx);
            acc = radd(acc, rmul(fvn, reduce(n, m), m), m);
        }
        let fs = f_prefix[s as usize];
        acc = rsub(acc, rmul(fs, triangular(s, m), m), m);
        h.set_sparse(i, acc);
    }

    h.set_dense(0, 0);
    for k in 1..=y {
        h.set_dense(k, 0);
    }
    for d in 1..=y {
        let fd = f.dense(d);
        if fd == 0 {
            continue;
        }
        let mut k = d;
        let mut j = 1i64;
        while k <= y {
            let contrib = rmul(fd, reduce(j, m), m);
            let new_v = radd(h.dense(k), contrib, m);
            h.set_dense(k, new_v);
            k += d;
            j += 1;
        }
    }
}

fn triangular(v: i64, m: i64) -> i64 {
    let v128 = v as i128;
    let t = v128 * (v128 + 1) / 2;
    if m > 0 {
        t.rem_euclid(m as i128) as i64
    } else {
        t as i64
    }
}

/// Dirichlet division `h = f / g`, requiring `g(1) = 1`.
///
/// Dense range: the forward sieve recurrence `h(n) = f(n)`, then for
/// every `n` ascending and every multiple `n*j <= y` (`j >= 2`), subtract
/// `h(n) * g(j)` from `h(n*j)`.
///
/// Sparse range: traverses `i` from `y⁻¹ - 1` down to `1` (so `v =
/// ⌊x/i⌋` increases) and applies
/// `H(v) = F(v) + G(√v)·H(√v) - G(v)·h(1) - Σ_{n=2..√v} [g(n)H(v/n) +
/// G(v/n)h(n)]`,
/// the hyperbola identity for `F = Σ(g⋆h)` solved for the unknown `H(v)`
/// (the `n=1` term of the first sum is `H(v)` itself, pulled to the
/// left-hand side; the `n=1` term of the second sum is `G(v)·h(1)`,
/// subtracted on its own).
pub fn convdiv(f: &DiriTable, g: &DiriTable, h: &mut DiriTable, m: i64) {
    assert_compatible(f, g);
    assert_compatible(f, h);
    debug_assert_eq!(g.dense(1), reduce(1, m), "convdiv: g(1) must be 1");
    let y = f.y();

    for k in 0..=y {
        h.set_dense(k, f.dense(k));
    }
    for n in 1..=y {
        let hn = h.dense(n);
        if hn == 0 {
            continue;
        }
        let mut j = 2i64;
        while n * j <= y {
            let idx = n * j;
            let term = rmul(hn, g.dense(j), m);
            let new_v = rsub(h.dense(idx), term, m);
            h.set_dense(idx, new_v);
            j += 1;
        }
    }

    let f_prefix = prefix_sums(f, y, m);
    let g_prefix = prefix_sums(g, y, m);
    let h_prefix = prefix_sums(h, y, m);
    let h1 = h.dense(1);

    for i in (1..f.yinv()).rev() {
        let v = f.v_at(i);
        let s = isqrt(v);

        let big_f = f.prefix_at(&f_prefix, v, i);
        let big_g_v = g.prefix_at(&g_prefix, v, i);
        let gs = g_prefix[s as usize];
        let hs = h_prefix[s as usize];

        let mut val = big_f;
        val = radd(val, rmul(gs, hs, m), m);
        val = rsub(val, rmul(big_g_v, h1, m), m);

        for n in 2..=s {
            let idx = i * n;
            let hvn = h.prefix_at(&h_prefix, v / n, idx);
            let gvn = g.prefix_at(&g_prefix, v / n, idx);
            let gn = g.dense(n);
            let hn = h.dense(n);
            let term = radd(rmul(gn, hvn, m), rmul(gvn, hn, m), m);
            val = rsub(val, term, m);
        }
        h.set_sparse(i, val);
    }
}

/// `d_k = u^{⋆k}`, the k-fold convolution of the constant function with
/// itself, via binary exponentiation in the Dirichlet-convolution
/// monoid (identity `I`) with three rotating tables: an accumulator, the
/// current operand (`u` raised to the current power-of-two), and
/// scratch for squaring the operand.
pub fn dk(x: i64, y: i64, k: u32, m: i64) -> DiriTable {
    let mut acc = DiriTable::init(x, y);
    acc.compute_i(m);
    if k == 0 {
        return acc;
    }
    let mut operand = DiriTable::init(x, y);
    operand.compute_u(m);
    let mut square = DiriTable::init(x, y);

    let mut e = k;
    while e > 0 {
        if e & 1 == 1 {
            let mut next_acc = DiriTable::init(x, y);
            conv(&acc, &operand, &mut next_acc, m);
            acc = next_acc;
        }
        e >>= 1;
        if e > 0 {
            conv(&operand, &operand, &mut square, m);
            std::mem::swap(&mut operand, &mut square);
        }
    }
    acc
}

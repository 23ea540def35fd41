//! # Small Integer Matrix Helper
//!
//! The only matrix operation the rest of the crate needs: inverting a
//! small lower-triangular integer matrix to turn the power-sum Pascal
//! triangle into the Faulhaber coefficients `compute_nk` multiplies a
//! Vandermonde vector by.
//!
//! ## References
//!
//! - `nut_Matrix_inv_lower_tri` in the original C factorization library.

use crate::modular::{egcd_i64, lcm_i64, modinv_i64};

/// A dense row-major square integer matrix.
#[derive(Debug, Clone)]
pub struct Matrix {
    n: usize,
    data: Vec<i64>,
}

impl Matrix {
    pub fn zero(n: usize) -> Self {
        Self { n, data: vec![0; n * n] }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zero(n);
        for i in 0..n {
            m.set(i, i, 1);
        }
        m
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> i64 {
        debug_assert!(i < self.n && j < self.n, "Matrix::get: index out of bounds");
        self.data[i * self.n + j]
    }

    pub fn set(&mut self, i: usize, j: usize, v: i64) {
        debug_assert!(i < self.n && j < self.n, "Matrix::set: index out of bounds");
        self.data[i * self.n + j] = v;
    }

    /// The lower-triangular Pascal matrix `L[i][j] = C(i+1, j+1)` for `i, j
    /// < n`, whose inverse (times a common denominator) yields the
    /// Faulhaber coefficients expressing `Σ t^k` in terms of `x, x², …`.
    pub fn pascal_lower_triangular(n: usize) -> Self {
        let mut m = Self::zero(n);
        for i in 0..n {
            let mut c = 1i64;
            for j in 0..=i {
                m.set(i, j, c);
                // C(i+1, j+2) / C(i+1, j+1) = (i-j) / (j+2)
                c = c * (i as i64 - j as i64) / (j as i64 + 2);
            }
        }
        m
    }
}

/// Invert lower-triangular integer matrix `l` (no modulus), returning
/// `(inv_numer, denom)` with `l * inv_numer = denom * identity`.
///
/// Follows the original's scaling scheme: eliminate column `i` from every
/// row `j > i` by scaling row `j` (in both `l` and the accumulating
/// inverse) by `l[i][i] / gcd(l[i][i], l[j][i])`, then subtracting the
/// appropriately scaled row `i`. After elimination each row carries its
/// own denominator on the diagonal; the final pass normalizes every row
/// to a single common denominator (the lcm of the diagonal).
pub fn invert_lower_triangular(l: &Matrix) -> (Matrix, i64) {
    let n = l.n();
    let mut work = l.clone();
    let mut inv = Matrix::identity(n);

    for i in 0..n {
        for j in (i + 1)..n {
            let lji = work.get(j, i);
            if lji == 0 {
                continue;
            }
            let lii = work.get(i, i);
            let (g, _, _) = egcd_i64(lii, lji);
            let g = g.unsigned_abs() as i64;
            let scale_j = lii / g;
            let scale_i = lji / g;
            for k in 0..n {
                let new_work = work.get(j, k) * scale_j - work.get(i, k) * scale_i;
                work.set(j, k, new_work);
                let new_inv = inv.get(j, k) * scale_j - inv.get(i, k) * scale_i;
                inv.set(j, k, new_inv);
            }
        }
    }

    let mut denom = 1i64;
    for i in 0..n {
        denom = lcm_i64(denom, work.get(i, i));
    }
    for i in 0..n {
        let scale = denom / work.get(i, i);
        for k in 0..n {
            inv.set(i, k, inv.get(i, k) * scale);
        }
    }
    (inv, denom)
}

/// Modular variant: inverts `l` mod `m`, requiring `m` prime (or at least
/// every diagonal entry invertible mod `m`) so ordinary modular inverses
/// replace the gcd/common-denominator bookkeeping above.
pub fn invert_lower_triangular_mod(l: &Matrix, m: i64) -> Matrix {
    debug_assert!(m > 0, "invert_lower_triangular_mod: modulus must be positive");
    let n = l.n();
    let mut work = Matrix::zero(n);
    for i in 0..n {
        for j in 0..n {
            work.set(i, j, l.get(i, j).rem_euclid(m));
        }
    }
    let mut inv = Matrix::identity(n);

    for i in 0..n {
        let lii = work.get(i, i);
        let lii_inv = modinv_i64(lii, m);
        for j in (i + 1)..n {
            let lji = work.get(j, i);
            if lji == 0 {
                continue;
            }
            let factor = (lji * lii_inv).rem_euclid(m);
            for k in 0..n {
                let new_work = (work.get(j, k) - factor * work.get(i, k)).rem_euclid(m);
                work.set(j, k, new_work);
                let new_inv = (inv.get(j, k) - factor * inv.get(i, k)).rem_euclid(m);
                inv.set(j, k, new_inv);
            }
        }
    }
    for i in 0..n {
        let lii_inv = modinv_i64(work.get(i, i), m);
        for k in 0..n {
            let v = (inv.get(i, k) * lii_inv).rem_euclid(m);
            inv.set(i, k, v);
        }
    }
    inv
}

//! # ntcore — Number-Theory Computation Core
//!
//! A library of 64-bit number-theoretic building blocks: deterministic
//! primality, Pollard-rho and Lenstra ECF factoring, wheel and segmented
//! prime/factor sieves, and a Dirichlet-table engine for summing
//! multiplicative functions (`Σ f(n)` for `n ≤ x`) in sub-linear time via
//! the dense/sparse hybrid representation used by Meissel-Mertens prime
//! counting and "min_25"-style summation.
//!
//! ## Module Organization
//!
//! **Foundational:**
//! - [`modular`] — modular exponentiation, extended gcd, CRT, Tonelli-Shanks
//! - [`matrix`] — small lower-triangular integer matrix inversion
//!
//! **Factoring kernels:**
//! - [`primality`] — deterministic Miller-Rabin for all `n < 2^64`
//! - [`pollard`] — Pollard-rho with Brent cycle detection
//! - [`lenstra`] — Lenstra elliptic-curve factorization
//! - [`factor`] — heuristic dispatcher tying the above together
//! - [`factors`] — owned prime-factorization representation (`phi`, `sigma`, divisors)
//!
//! **Sieves:**
//! - [`sieve`] — mod-30 wheel sieves for primes, factor tables, and the
//!   standard multiplicative-function sieves; segmented ranges for
//!   parallel sieving
//!
//! **Dirichlet summation:**
//! - [`dirichlet`] — the hybrid dense/sparse table, its direct
//!   populations (`u`, `N`, `N^k`, Mertens, `π`), and convolution/division
//!   on top of two populated tables
//! - [`powerful`] — powerful-number DFS adjustment for Dirichlet sums
//!   that don't factor into a clean convolution
//!
//! ## Design Philosophy
//!
//! Every algorithm here is grounded in a specific routine from the
//! original C factorization library this crate generalizes from raw
//! `int64_t`/flexible-array-member APIs to owned Rust types — see each
//! module's doc comment for the specific function it tracks. Hot loops
//! (Pollard's cycle walk, the powerful-number DFS, the wheel sieve's
//! inner loop) prefer explicit iterative state over recursion.
//!
//! A function taking a `modulus: i64` parameter treats `0` as "no
//! modulus" (compute exactly, accepting `wrapping_*` overflow once values
//! exceed `2^63`) and any positive value as "reduce every intermediate
//! mod this".

pub mod dirichlet;
pub mod factor;
pub mod factors;
pub mod lenstra;
pub mod matrix;
pub mod modular;
pub mod pollard;
pub mod powerful;
pub mod primality;
pub mod sieve;

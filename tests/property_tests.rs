//! Property-based and end-to-end scenario tests spanning the sieve,
//! Dirichlet-table, and factoring modules.

use ntcore::dirichlet::conv::{conv, conv_n, conv_u, convdiv, dk};
use ntcore::dirichlet::DiriTable;
use ntcore::factor::{ChaChaRandomSource, FactorConfig};
use ntcore::powerful::{powerful_sum, PowerfulH};
use ntcore::sieve::{self, MobiusSieve};
use ntcore::{factor, factors::Factors};
use proptest::prelude::*;

fn small_x() -> impl Strategy<Value = i64> {
    50i64..=5_000
}

proptest! {
    #[test]
    fn prop_convolution_with_identity_is_noop(x in small_x()) {
        let mut i_table = DiriTable::init(x, 0);
        i_table.compute_i(0);
        let mut u_table = DiriTable::init(x, 0);
        u_table.compute_u(0);
        let mut h = DiriTable::init(x, 0);
        conv(&i_table, &u_table, &mut h, 0);
        for k in 0..=h.y() {
            prop_assert_eq!(h.dense(k), u_table.dense(k));
        }
        for idx in 1..h.yinv() {
            prop_assert_eq!(h.sparse(idx), u_table.sparse(idx));
        }
    }

    #[test]
    fn prop_conv_u_matches_general_conv(x in small_x()) {
        let mut u_table = DiriTable::init(x, 0);
        u_table.compute_u(0);
        let mut n_table = DiriTable::init(x, 0);
        n_table.compute_n(0);

        let mut general = DiriTable::init(x, 0);
        conv(&u_table, &n_table, &mut general, 0);

        let mut closed = DiriTable::init(x, 0);
        conv_n(&u_table, &mut closed, 0);

        for k in 0..=general.y() {
            prop_assert_eq!(general.dense(k), closed.dense(k));
        }
        for idx in 1..general.yinv() {
            prop_assert_eq!(general.sparse(idx), closed.sparse(idx));
        }
    }

    #[test]
    fn prop_convolution_then_division_round_trips(x in small_x()) {
        let mut u_table = DiriTable::init(x, 0);
        u_table.compute_u(0);
        let mut n_table = DiriTable::init(x, 0);
        n_table.compute_n(0);

        let mut f = DiriTable::init(x, 0);
        conv(&u_table, &n_table, &mut f, 0);

        let mut recovered = DiriTable::init(x, 0);
        convdiv(&f, &u_table, &mut recovered, 0);

        for k in 0..=n_table.y() {
            prop_assert_eq!(recovered.dense(k), n_table.dense(k));
        }
        for idx in 1..n_table.yinv() {
            prop_assert_eq!(recovered.sparse(idx), n_table.sparse(idx));
        }
    }

    #[test]
    fn prop_mertens_matches_brute_force_mobius_sum(x in 50i64..=3_000) {
        let mu = MobiusSieve::build(x as u64);
        let mut t = DiriTable::init(x, 0);
        let buf: Vec<i8> = (0..=t.y()).map(|n| mu.get(n as u64)).collect();
        t.compute_mertens(&buf);

        let expected: i64 = (1..=x).map(|n| mu.get(n as u64) as i64).sum();
        prop_assert_eq!(t.sparse(1), expected);
    }

    #[test]
    fn prop_pi_matches_brute_force_prime_count(x in 50i64..=5_000) {
        let composite = sieve::sieve_is_composite(x as u64);
        let mut t = DiriTable::init(x, 0);
        t.compute_pi();

        let expected: i64 = (2..=x)
            .filter(|&n| sieve::is_prime(n as u64, &composite))
            .count() as i64;
        prop_assert_eq!(t.sparse(1), expected);
    }

    #[test]
    fn prop_dk_matches_brute_force_divisor_tuple_count(x in 50i64..=3_000, k in 2u32..=4) {
        let t = dk(x, 0, k, 0);
        let factorizations = sieve::sieve_factorizations(x as u64);
        let expected: i64 = factorizations[1..].iter().map(|f| f.divtupcount(k as u64) as i64).sum();
        prop_assert_eq!(t.sparse(1), expected);
    }

    #[test]
    fn prop_factor_heuristic_product_matches_input(n in 2u64..=1_000_000) {
        let conf = FactorConfig::default();
        let primes = sieve::generate_primes(((n as f64).sqrt() as u64) + 2);
        let mut rng = ChaChaRandomSource::from_seed(n);
        let (fs, cofactor) = factor::factor_heuristic(n, &primes, &conf, &mut rng).unwrap();
        prop_assert_eq!(fs.prod() * cofactor, n);
    }
}

// ── Concrete end-to-end scenarios ──────────────────────────────────────

#[test]
fn pi_of_one_million_is_78498() {
    let mut t = DiriTable::init(1_000_000, 0);
    t.compute_pi();
    assert_eq!(t.sparse(1), 78_498);
}

#[test]
fn mertens_of_one_million_is_212() {
    let mut t = DiriTable::init(1_000_000, 0);
    let mu = MobiusSieve::build(t.y() as u64);
    let buf: Vec<i8> = (0..=t.y()).map(|n| mu.get(n as u64)).collect();
    t.compute_mertens(&buf);
    assert_eq!(t.sparse(1), 212);
}

#[test]
fn divisor_count_sum_of_1000_is_7069() {
    // D(x) = Σ_{n≤x} d(n): the classic "hyperbola method" test value.
    let t = dk(1000, 0, 2, 0);
    assert_eq!(t.sparse(1), 7069);
}

#[test]
fn powerful_number_sum_matches_brute_force_up_to_10000() {
    let x = 10_000u64;
    let primes = sieve::generate_primes((x as f64).sqrt() as u64 + 2);
    let mut g = DiriTable::init(x as i64, 0);
    g.compute_u(0);
    let h_table = [0i64, 0, 1, 1, 1, 1, 1, 1, 1, 1];
    let h = PowerfulH::Table(&h_table);
    let sum = powerful_sum(x, &primes, &h, &g, 0);

    let is_powerful = |mut n: u64| -> bool {
        let mut p = 2u64;
        while p * p <= n {
            if n % p == 0 {
                let mut e = 0;
                while n % p == 0 {
                    n /= p;
                    e += 1;
                }
                if e < 2 {
                    return false;
                }
            }
            p += 1;
        }
        n == 1
    };
    let expected: i64 = (1..=x).filter(|&n| is_powerful(n)).map(|n| (x / n) as i64).sum();
    assert_eq!(sum, expected);
}

#[test]
fn factors_a_batch_in_the_2_to_30_bit_range() {
    let conf = FactorConfig::default();
    let bound = 1u64 << 15;
    let primes = sieve::generate_primes(bound);
    let mut rng = ChaChaRandomSource::from_seed(0xC0FFEE);

    // Sample 256 odd candidates spread across [2^29, 2^30).
    let lo = 1u64 << 29;
    for i in 0..256u64 {
        let n = lo + i * 4001 + 1;
        let (fs, cofactor): (Factors, u64) =
            factor::factor_heuristic(n, &primes, &conf, &mut rng).unwrap();
        assert_eq!(fs.prod() * cofactor, n, "factorization of {n} did not reconstruct it");
    }
}

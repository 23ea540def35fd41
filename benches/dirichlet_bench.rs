//! Benchmarks for the Dirichlet-table engine: direct populations,
//! general convolution, and the powerful-number walker.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ntcore::dirichlet::conv::dk;
use ntcore::dirichlet::DiriTable;
use ntcore::powerful::{powerful_sum, PowerfulH};
use ntcore::sieve::generate_primes;

fn bench_compute_pi(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_pi");
    for &x in &[10_000i64, 100_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(x), &x, |b, &x| {
            b.iter(|| {
                let mut t = DiriTable::init(x, 0);
                t.compute_pi();
                black_box(t.sparse(1))
            });
        });
    }
    group.finish();
}

fn bench_compute_mertens(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_mertens");
    for &x in &[10_000i64, 100_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(x), &x, |b, &x| {
            b.iter(|| {
                let mut t = DiriTable::init(x, 0);
                let mu = ntcore::sieve::MobiusSieve::build(t.y() as u64);
                let buf: Vec<i8> = (0..=t.y()).map(|n| mu.get(n as u64)).collect();
                t.compute_mertens(&buf);
                black_box(t.sparse(1))
            });
        });
    }
    group.finish();
}

fn bench_dk_convolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("dk_convolution");
    for &k in &[2u32, 3, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| black_box(dk(200_000, 0, k, 0)));
        });
    }
    group.finish();
}

fn bench_powerful_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("powerful_sum");
    for &x in &[10_000u64, 100_000, 1_000_000] {
        let primes = generate_primes((x as f64).sqrt() as u64 + 2);
        let mut g = DiriTable::init(x as i64, 0);
        g.compute_u(0);
        let h_table = [0i64, 0, 1, 1, 1, 1, 1, 1, 1, 1];
        let h = PowerfulH::Table(&h_table);
        group.bench_with_input(BenchmarkId::from_parameter(x), &x, |b, &x| {
            b.iter(|| black_box(powerful_sum(x, &primes, &h, &g, 0)));
        });
    }
    group.finish();
}

criterion_group!(
    dirichlet,
    bench_compute_pi,
    bench_compute_mertens,
    bench_dk_convolution,
    bench_powerful_sum
);
criterion_main!(dirichlet);

//! Benchmarks for the deferred-reduction paths against their eager
//! equivalents.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use larc::{pair, G1Point, G2Point, Scalar};

fn bench_scalar_sums(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let xs: Vec<Scalar> = (0..1024).map(|_| Scalar::random(&mut rng)).collect();

    let mut group = c.benchmark_group("scalar_sum_1024");
    group.bench_function("deferred", |b| {
        b.iter(|| {
            let sum: Scalar = black_box(&xs).iter().sum();
            black_box(sum.normalize())
        })
    });
    group.bench_function("eager", |b| {
        b.iter(|| {
            let mut sum = Scalar::zero();
            for x in black_box(&xs) {
                sum = (sum + x).normalize();
            }
            black_box(sum)
        })
    });
    group.finish();
}

fn bench_inner_products(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let xs: Vec<Scalar> = (0..256).map(|_| Scalar::random(&mut rng)).collect();
    let ys: Vec<Scalar> = (0..256).map(|_| Scalar::random(&mut rng)).collect();

    let mut group = c.benchmark_group("inner_product_256");
    group.bench_function("deferred", |b| {
        b.iter(|| {
            let acc: larc::WideScalar = black_box(&xs)
                .iter()
                .zip(black_box(&ys))
                .map(|(x, y)| x * y)
                .sum();
            black_box(acc.normalize())
        })
    });
    group.bench_function("eager", |b| {
        b.iter(|| {
            let mut acc = Scalar::zero();
            for (x, y) in black_box(&xs).iter().zip(black_box(&ys)) {
                acc = (acc + (x * y).normalize()).normalize();
            }
            black_box(acc)
        })
    });
    group.finish();
}

fn bench_double_powers(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let a = G1Point::random(&mut rng).force();
    let b2 = G1Point::random(&mut rng).force();
    let x = Scalar::random(&mut rng);
    let y = Scalar::random(&mut rng);

    let mut group = c.benchmark_group("g1_double_power");
    group.bench_function("fused", |b| {
        b.iter(|| black_box(black_box(&a).pow(x) * black_box(&b2).pow(y)))
    });
    group.bench_function("separate", |b| {
        b.iter(|| black_box(black_box(&a).pow(x).force() * black_box(&b2).pow(y).force()))
    });
    group.finish();
}

fn bench_double_pairings(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(4);
    let a = G1Point::random(&mut rng).force();
    let b1 = G1Point::random(&mut rng).force();
    let c2 = G2Point::random(&mut rng).force();
    let d2 = G2Point::random(&mut rng).force();

    let mut group = c.benchmark_group("double_pairing");
    group.bench_function("fused", |b| {
        b.iter(|| black_box(pair(black_box(&a), black_box(&c2)) * pair(black_box(&b1), black_box(&d2))))
    });
    group.bench_function("separate", |b| {
        b.iter(|| {
            black_box(
                pair(black_box(&a), black_box(&c2)).force()
                    * pair(black_box(&b1), black_box(&d2)).force(),
            )
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_scalar_sums,
    bench_inner_products,
    bench_double_powers,
    bench_double_pairings
);
criterion_main!(benches);

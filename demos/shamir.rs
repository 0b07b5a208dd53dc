//! Shamir secret sharing over the scalar field.
//!
//! Splits a secret into `n` shares with threshold `t` and reconstructs it
//! from a subset via Lagrange interpolation at zero. The reconstruction
//! accumulates share-times-coefficient products in the double-width
//! accumulator, so the whole combination reduces once.

use larc::{RandomEngine, Scalar, WideScalar};

const THRESHOLD: usize = 3;
const SHARES: usize = 5;

/// Horner evaluation of the sharing polynomial.
fn evaluate(coeffs: &[Scalar], x: Scalar) -> Scalar {
    coeffs
        .iter()
        .rev()
        .fold(Scalar::zero(), |acc, c| (acc * x + c).normalize())
}

/// Lagrange coefficient at zero for abscissa `i` of `points`.
fn lagrange_at_zero(points: &[Scalar], i: usize) -> Scalar {
    let xi = points[i];
    let numerator: Scalar = points
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != i)
        .map(|(_, x)| *x)
        .product();
    let denominator: Scalar = points
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != i)
        .map(|(_, x)| x - xi)
        .product();
    (numerator * denominator.inverse()).normalize()
}

fn main() {
    let mut rng = RandomEngine::from_entropy();

    let secret = Scalar::random(&mut rng);

    // degree t-1 polynomial with the secret as constant term
    let mut coeffs = vec![secret];
    coeffs.extend((1..THRESHOLD).map(|_| Scalar::random(&mut rng)));

    let shares: Vec<(Scalar, Scalar)> = (1..=SHARES as u64)
        .map(|i| {
            let x = Scalar::from(i);
            (x, evaluate(&coeffs, x))
        })
        .collect();
    println!("split into {SHARES} shares, threshold {THRESHOLD}");

    // reconstruct from the first t shares with one final reduction
    let subset = &shares[..THRESHOLD];
    let points: Vec<Scalar> = subset.iter().map(|(x, _)| *x).collect();
    let combined: WideScalar = subset
        .iter()
        .enumerate()
        .map(|(i, (_, y))| y * lagrange_at_zero(&points, i))
        .sum();
    let reconstructed = combined.normalize();

    assert_eq!(reconstructed, secret, "reconstruction must match");
    println!("secret reconstructed from {THRESHOLD} shares");

    // too few shares yield an unrelated value
    let subset = &shares[..THRESHOLD - 1];
    let points: Vec<Scalar> = subset.iter().map(|(x, _)| *x).collect();
    let partial: WideScalar = subset
        .iter()
        .enumerate()
        .map(|(i, (_, y))| y * lagrange_at_zero(&points, i))
        .sum();
    assert_ne!(partial.normalize(), secret);
    println!("below-threshold reconstruction fails as expected");
}

//! The source group `G1`, written multiplicatively.
//!
//! Exponentiation is lazy: [`G1Point::pow`] returns a [`ScaledG1`] holding
//! the base and exponent unevaluated. Multiplying two pending
//! exponentiations runs both through one multi-scalar pass, and a product
//! over many of them fuses the factors pairwise, halving the number of
//! scalar-multiplication passes. [`ScaledG1::force`] evaluates a pending
//! exponentiation on demand; comparisons and serialization force
//! implicitly.

use core::iter::Product;
use std::borrow::Cow;

use ark_bls12_381::G1Projective;
use ark_ec::PrimeGroup;
use ark_ff::Zero;
use rand_core::RngCore;

use crate::backend::{bigint, curve};
use crate::errors::Error;
use crate::scalar::{impl_binop, Scalar};

/// Serialized width of a `G1` element: parity prefix plus the `x`
/// coordinate.
pub const G1_BYTES: usize = curve::G1_BYTES;

/// An element of `G1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct G1Point(pub(crate) G1Projective);

/// A pending exponentiation `base^exp` in `G1`.
#[derive(Clone, Debug)]
pub struct ScaledG1<'a> {
    base: Cow<'a, G1Point>,
    exp: Scalar,
}

impl G1Point {
    pub fn generator() -> G1Point {
        G1Point(G1Projective::generator())
    }

    pub fn identity() -> G1Point {
        G1Point(G1Projective::zero())
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    /// Uniform group element, left as a pending power of the generator.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> ScaledG1<'static> {
        G1Point::generator().into_pow(Scalar::random(rng))
    }

    /// Uniform group element excluding the identity.
    pub fn random_nonidentity<R: RngCore + ?Sized>(rng: &mut R) -> ScaledG1<'static> {
        G1Point::generator().into_pow(Scalar::random_nonzero(rng))
    }

    /// Defers `self^exp`; the scalar multiplication runs when the result
    /// is forced, possibly fused with a second pending power.
    pub fn pow(&self, exp: impl Into<Scalar>) -> ScaledG1<'_> {
        ScaledG1 {
            base: Cow::Borrowed(self),
            exp: exp.into(),
        }
    }

    /// Owning variant of [`G1Point::pow`] for bases that need to outlive
    /// their binding.
    pub fn into_pow(self, exp: impl Into<Scalar>) -> ScaledG1<'static> {
        ScaledG1 {
            base: Cow::Owned(self),
            exp: exp.into(),
        }
    }

    pub fn inverse(&self) -> G1Point {
        G1Point(-self.0)
    }

    pub fn to_bytes(&self) -> [u8; G1_BYTES] {
        curve::g1_to_bytes(&self.0)
    }

    pub fn from_bytes(bytes: &[u8; G1_BYTES]) -> Result<G1Point, Error> {
        curve::g1_from_bytes(bytes).map(G1Point)
    }

    fn mul_impl(a: &G1Point, b: &G1Point) -> G1Point {
        G1Point(a.0 + b.0)
    }

    fn div_impl(a: &G1Point, b: &G1Point) -> G1Point {
        G1Point(a.0 - b.0)
    }
}

impl_binop!(Mul, mul, G1Point, G1Point, G1Point, G1Point::mul_impl);
impl_binop!(Div, div, G1Point, G1Point, G1Point, G1Point::div_impl);

impl<'a> ScaledG1<'a> {
    /// Runs the deferred scalar multiplication.
    pub fn force(self) -> G1Point {
        let exp = bigint::to_u64x4(&self.exp.to_big());
        G1Point(curve::g1_mul(&self.base.0, exp))
    }

    /// Folds a further exponent into the pending one: `(b^x)^y = b^(xy)`.
    pub fn pow(self, exp: impl Into<Scalar>) -> ScaledG1<'a> {
        ScaledG1 {
            base: self.base,
            exp: (self.exp * exp.into()).normalize(),
        }
    }

    pub fn inverse(self) -> ScaledG1<'a> {
        ScaledG1 {
            base: self.base,
            exp: -self.exp,
        }
    }

    pub fn to_bytes(self) -> [u8; G1_BYTES] {
        self.force().to_bytes()
    }
}

/// Fuses both pending exponentiations into one two-point multi-scalar
/// pass.
impl<'a, 'b> core::ops::Mul<ScaledG1<'b>> for ScaledG1<'a> {
    type Output = G1Point;
    fn mul(self, rhs: ScaledG1<'b>) -> G1Point {
        G1Point(curve::g1_mul2(
            &self.base.0,
            bigint::to_u64x4(&self.exp.to_big()),
            &rhs.base.0,
            bigint::to_u64x4(&rhs.exp.to_big()),
        ))
    }
}

impl<'a> core::ops::Mul<G1Point> for ScaledG1<'a> {
    type Output = G1Point;
    fn mul(self, rhs: G1Point) -> G1Point {
        self.force() * rhs
    }
}

impl<'a> core::ops::Mul<ScaledG1<'a>> for G1Point {
    type Output = G1Point;
    fn mul(self, rhs: ScaledG1<'a>) -> G1Point {
        self * rhs.force()
    }
}

impl<'a> core::ops::Div<ScaledG1<'a>> for G1Point {
    type Output = G1Point;
    fn div(self, rhs: ScaledG1<'a>) -> G1Point {
        self / rhs.force()
    }
}

impl<'a, 'b> PartialEq<ScaledG1<'b>> for ScaledG1<'a> {
    fn eq(&self, other: &ScaledG1<'b>) -> bool {
        self.clone().force() == other.clone().force()
    }
}

impl<'a> PartialEq<G1Point> for ScaledG1<'a> {
    fn eq(&self, other: &G1Point) -> bool {
        self.clone().force() == *other
    }
}

impl<'a> PartialEq<ScaledG1<'a>> for G1Point {
    fn eq(&self, other: &ScaledG1<'a>) -> bool {
        *self == other.clone().force()
    }
}

impl<'a> From<ScaledG1<'a>> for G1Point {
    fn from(pending: ScaledG1<'a>) -> G1Point {
        pending.force()
    }
}

/// Pairwise fusion over a stream of pending exponentiations: each pair of
/// factors costs one two-point multi-scalar pass.
impl<'a> Product<ScaledG1<'a>> for G1Point {
    fn product<I: Iterator<Item = ScaledG1<'a>>>(mut iter: I) -> G1Point {
        let mut acc = G1Point::identity();
        loop {
            match (iter.next(), iter.next()) {
                (Some(a), Some(b)) => acc = acc * (a * b),
                (Some(a), None) => return acc * a.force(),
                (None, _) => return acc,
            }
        }
    }
}

impl Product<G1Point> for G1Point {
    fn product<I: Iterator<Item = G1Point>>(iter: I) -> G1Point {
        iter.fold(G1Point::identity(), |acc, p| acc * p)
    }
}

impl<'a> Product<&'a G1Point> for G1Point {
    fn product<I: Iterator<Item = &'a G1Point>>(iter: I) -> G1Point {
        iter.fold(G1Point::identity(), |acc, p| acc * p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pow_matches_repeated_multiplication() {
        let g = G1Point::generator();
        let mut cube = G1Point::identity();
        for _ in 0..3 {
            cube = cube * g;
        }
        assert_eq!(g.pow(3u64).force(), cube);
        assert_eq!(g.pow(0u64).force(), G1Point::identity());
    }

    #[test]
    fn fused_double_power_matches_separate_powers() {
        let mut rng = StdRng::seed_from_u64(43);
        let a = G1Point::random(&mut rng).force();
        let b = G1Point::random(&mut rng).force();
        let x = Scalar::random(&mut rng);
        let y = Scalar::random(&mut rng);

        let fused = a.pow(x) * b.pow(y);
        let separate = a.pow(x).force() * b.pow(y).force();
        assert_eq!(fused, separate);
    }

    #[test]
    fn product_of_pending_powers() {
        let mut rng = StdRng::seed_from_u64(47);
        let bases: Vec<G1Point> = (0..5).map(|_| G1Point::random(&mut rng).force()).collect();
        let exps: Vec<Scalar> = (0..5).map(|_| Scalar::random(&mut rng)).collect();

        let fused: G1Point = bases.iter().zip(exps.iter()).map(|(b, e)| b.pow(e)).product();
        let naive = bases
            .iter()
            .zip(exps.iter())
            .fold(G1Point::identity(), |acc, (b, e)| acc * b.pow(e).force());
        assert_eq!(fused, naive);
    }

    #[test]
    fn exponents_add_under_multiplication() {
        let mut rng = StdRng::seed_from_u64(151);
        let g = G1Point::generator();
        let a = Scalar::random(&mut rng);
        let b = Scalar::random(&mut rng);
        assert_eq!(g.pow(a + b).force(), g.pow(a) * g.pow(b));
    }

    #[test]
    fn exponent_folding_and_inversion() {
        let mut rng = StdRng::seed_from_u64(53);
        let g = G1Point::generator();
        let x = Scalar::random(&mut rng);
        let y = Scalar::random(&mut rng);

        assert_eq!(g.pow(x).pow(y), g.pow((x * y).normalize()));
        assert_eq!(g.pow(x) * g.pow(x).inverse(), G1Point::identity());
        assert_eq!(g.pow(x).force().inverse(), g.pow(-x).force());
    }

    #[test]
    fn division_cancels_multiplication() {
        let mut rng = StdRng::seed_from_u64(59);
        let a = G1Point::random(&mut rng).force();
        let b = G1Point::random(&mut rng).force();
        assert_eq!(a * b / b, a);
    }

    #[test]
    fn byte_round_trip() {
        let mut rng = StdRng::seed_from_u64(61);
        let p = G1Point::random(&mut rng).force();
        assert_eq!(
            G1Point::from_bytes(&p.to_bytes()).expect("valid encoding"),
            p
        );
        assert_eq!(
            G1Point::from_bytes(&G1Point::identity().to_bytes()).expect("identity"),
            G1Point::identity()
        );
    }
}

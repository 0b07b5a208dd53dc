//! The source group `G2`, written multiplicatively.
//!
//! Mirrors [`crate::g1`]: exponentiation is deferred through [`ScaledG2`]
//! and pairs of pending powers are fused into one multi-scalar pass. The
//! wire format is 97 bytes, a parity prefix followed by both coefficients
//! of the quadratic-extension `x` coordinate.

use core::iter::Product;
use std::borrow::Cow;

use ark_bls12_381::G2Projective;
use ark_ec::PrimeGroup;
use ark_ff::Zero;
use rand_core::RngCore;

use crate::backend::{bigint, curve};
use crate::errors::Error;
use crate::scalar::{impl_binop, Scalar};

/// Serialized width of a `G2` element.
pub const G2_BYTES: usize = curve::G2_BYTES;

/// An element of `G2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct G2Point(pub(crate) G2Projective);

/// A pending exponentiation `base^exp` in `G2`.
#[derive(Clone, Debug)]
pub struct ScaledG2<'a> {
    base: Cow<'a, G2Point>,
    exp: Scalar,
}

impl G2Point {
    pub fn generator() -> G2Point {
        G2Point(G2Projective::generator())
    }

    pub fn identity() -> G2Point {
        G2Point(G2Projective::zero())
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> ScaledG2<'static> {
        G2Point::generator().into_pow(Scalar::random(rng))
    }

    pub fn random_nonidentity<R: RngCore + ?Sized>(rng: &mut R) -> ScaledG2<'static> {
        G2Point::generator().into_pow(Scalar::random_nonzero(rng))
    }

    pub fn pow(&self, exp: impl Into<Scalar>) -> ScaledG2<'_> {
        ScaledG2 {
            base: Cow::Borrowed(self),
            exp: exp.into(),
        }
    }

    pub fn into_pow(self, exp: impl Into<Scalar>) -> ScaledG2<'static> {
        ScaledG2 {
            base: Cow::Owned(self),
            exp: exp.into(),
        }
    }

    pub fn inverse(&self) -> G2Point {
        G2Point(-self.0)
    }

    pub fn to_bytes(&self) -> [u8; G2_BYTES] {
        curve::g2_to_bytes(&self.0)
    }

    pub fn from_bytes(bytes: &[u8; G2_BYTES]) -> Result<G2Point, Error> {
        curve::g2_from_bytes(bytes).map(G2Point)
    }

    fn mul_impl(a: &G2Point, b: &G2Point) -> G2Point {
        G2Point(a.0 + b.0)
    }

    fn div_impl(a: &G2Point, b: &G2Point) -> G2Point {
        G2Point(a.0 - b.0)
    }
}

impl_binop!(Mul, mul, G2Point, G2Point, G2Point, G2Point::mul_impl);
impl_binop!(Div, div, G2Point, G2Point, G2Point, G2Point::div_impl);

impl<'a> ScaledG2<'a> {
    pub fn force(self) -> G2Point {
        let exp = bigint::to_u64x4(&self.exp.to_big());
        G2Point(curve::g2_mul(&self.base.0, exp))
    }

    pub fn pow(self, exp: impl Into<Scalar>) -> ScaledG2<'a> {
        ScaledG2 {
            base: self.base,
            exp: (self.exp * exp.into()).normalize(),
        }
    }

    pub fn inverse(self) -> ScaledG2<'a> {
        ScaledG2 {
            base: self.base,
            exp: -self.exp,
        }
    }

    pub fn to_bytes(self) -> [u8; G2_BYTES] {
        self.force().to_bytes()
    }
}

impl<'a, 'b> core::ops::Mul<ScaledG2<'b>> for ScaledG2<'a> {
    type Output = G2Point;
    fn mul(self, rhs: ScaledG2<'b>) -> G2Point {
        G2Point(curve::g2_mul2(
            &self.base.0,
            bigint::to_u64x4(&self.exp.to_big()),
            &rhs.base.0,
            bigint::to_u64x4(&rhs.exp.to_big()),
        ))
    }
}

impl<'a> core::ops::Mul<G2Point> for ScaledG2<'a> {
    type Output = G2Point;
    fn mul(self, rhs: G2Point) -> G2Point {
        self.force() * rhs
    }
}

impl<'a> core::ops::Mul<ScaledG2<'a>> for G2Point {
    type Output = G2Point;
    fn mul(self, rhs: ScaledG2<'a>) -> G2Point {
        self * rhs.force()
    }
}

impl<'a> core::ops::Div<ScaledG2<'a>> for G2Point {
    type Output = G2Point;
    fn div(self, rhs: ScaledG2<'a>) -> G2Point {
        self / rhs.force()
    }
}

impl<'a, 'b> PartialEq<ScaledG2<'b>> for ScaledG2<'a> {
    fn eq(&self, other: &ScaledG2<'b>) -> bool {
        self.clone().force() == other.clone().force()
    }
}

impl<'a> PartialEq<G2Point> for ScaledG2<'a> {
    fn eq(&self, other: &G2Point) -> bool {
        self.clone().force() == *other
    }
}

impl<'a> PartialEq<ScaledG2<'a>> for G2Point {
    fn eq(&self, other: &ScaledG2<'a>) -> bool {
        *self == other.clone().force()
    }
}

impl<'a> From<ScaledG2<'a>> for G2Point {
    fn from(pending: ScaledG2<'a>) -> G2Point {
        pending.force()
    }
}

impl<'a> Product<ScaledG2<'a>> for G2Point {
    fn product<I: Iterator<Item = ScaledG2<'a>>>(mut iter: I) -> G2Point {
        let mut acc = G2Point::identity();
        loop {
            match (iter.next(), iter.next()) {
                (Some(a), Some(b)) => acc = acc * (a * b),
                (Some(a), None) => return acc * a.force(),
                (None, _) => return acc,
            }
        }
    }
}

impl Product<G2Point> for G2Point {
    fn product<I: Iterator<Item = G2Point>>(iter: I) -> G2Point {
        iter.fold(G2Point::identity(), |acc, p| acc * p)
    }
}

impl<'a> Product<&'a G2Point> for G2Point {
    fn product<I: Iterator<Item = &'a G2Point>>(iter: I) -> G2Point {
        iter.fold(G2Point::identity(), |acc, p| acc * p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pow_matches_repeated_multiplication() {
        let g = G2Point::generator();
        let mut sq = G2Point::identity();
        for _ in 0..2 {
            sq = sq * g;
        }
        assert_eq!(g.pow(2u64).force(), sq);
    }

    #[test]
    fn fused_double_power_matches_separate_powers() {
        let mut rng = StdRng::seed_from_u64(67);
        let a = G2Point::random(&mut rng).force();
        let b = G2Point::random(&mut rng).force();
        let x = Scalar::random(&mut rng);
        let y = Scalar::random(&mut rng);
        assert_eq!(a.pow(x) * b.pow(y), a.pow(x).force() * b.pow(y).force());
    }

    #[test]
    fn exponents_add_under_multiplication() {
        let mut rng = StdRng::seed_from_u64(157);
        let g = G2Point::generator();
        let a = Scalar::random(&mut rng);
        let b = Scalar::random(&mut rng);
        assert_eq!(g.pow(a + b).force(), g.pow(a) * g.pow(b));
    }

    #[test]
    fn byte_round_trip_rejects_junk() {
        let mut rng = StdRng::seed_from_u64(71);
        let p = G2Point::random(&mut rng).force();
        assert_eq!(
            G2Point::from_bytes(&p.to_bytes()).expect("valid encoding"),
            p
        );

        let mut bad = p.to_bytes();
        bad[0] = 0x09;
        assert!(G2Point::from_bytes(&bad).is_err());
    }

    #[test]
    fn inverse_cancels() {
        let mut rng = StdRng::seed_from_u64(73);
        let p = G2Point::random(&mut rng).force();
        assert_eq!(p * p.inverse(), G2Point::identity());
    }
}

//! The pairing target group `GT` and pending pairings.
//!
//! [`pair`] does not compute anything: it returns a [`PendingPairing`]
//! holding both inputs. Multiplying two pending pairings, comparing them,
//! or folding many of them into a product runs a single multi-Miller loop
//! followed by one shared final exponentiation, which is where most of a
//! pairing's cost lives. [`PendingPairing::force`] evaluates a lone
//! pairing on demand.
//!
//! Comparison of two pending pairings never materializes either side: it
//! checks `e(a^-1, b) * e(c, d) == 1` with one fused loop.

use core::iter::Product;
use std::borrow::Cow;

use ark_bls12_381::Fq12;
use ark_ff::{One, Zero};
use tracing::instrument;

use crate::backend::{bigint, curve};
use crate::errors::Error;
use crate::g1::{G1Point, ScaledG1};
use crate::g2::{G2Point, ScaledG2};
use crate::scalar::{impl_binop, Scalar};

/// Serialized width of a `GT` element: twelve base-field coefficients.
pub const GT_BYTES: usize = curve::GT_BYTES;

/// An element of the pairing target group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gt(pub(crate) Fq12);

/// An unevaluated pairing `e(g1, g2)`.
#[derive(Clone, Debug)]
pub struct PendingPairing<'a, 'b> {
    g1: Cow<'a, G1Point>,
    g2: Cow<'b, G2Point>,
}

/// Anything usable as the `G1` side of a pairing: a point, a reference to
/// one, or a pending exponentiation (which is forced on the way in).
pub trait IntoG1Operand<'a> {
    fn into_operand(self) -> Cow<'a, G1Point>;
}

/// The `G2` side counterpart of [`IntoG1Operand`].
pub trait IntoG2Operand<'a> {
    fn into_operand(self) -> Cow<'a, G2Point>;
}

impl IntoG1Operand<'static> for G1Point {
    fn into_operand(self) -> Cow<'static, G1Point> {
        Cow::Owned(self)
    }
}

impl<'a> IntoG1Operand<'a> for &'a G1Point {
    fn into_operand(self) -> Cow<'a, G1Point> {
        Cow::Borrowed(self)
    }
}

impl IntoG1Operand<'static> for ScaledG1<'_> {
    fn into_operand(self) -> Cow<'static, G1Point> {
        Cow::Owned(self.force())
    }
}

impl IntoG1Operand<'static> for &ScaledG1<'_> {
    fn into_operand(self) -> Cow<'static, G1Point> {
        Cow::Owned(self.clone().force())
    }
}

impl IntoG2Operand<'static> for G2Point {
    fn into_operand(self) -> Cow<'static, G2Point> {
        Cow::Owned(self)
    }
}

impl<'a> IntoG2Operand<'a> for &'a G2Point {
    fn into_operand(self) -> Cow<'a, G2Point> {
        Cow::Borrowed(self)
    }
}

impl IntoG2Operand<'static> for ScaledG2<'_> {
    fn into_operand(self) -> Cow<'static, G2Point> {
        Cow::Owned(self.force())
    }
}

impl IntoG2Operand<'static> for &ScaledG2<'_> {
    fn into_operand(self) -> Cow<'static, G2Point> {
        Cow::Owned(self.clone().force())
    }
}

/// Defers the pairing `e(g1, g2)`.
pub fn pair<'a, 'b>(
    g1: impl IntoG1Operand<'a>,
    g2: impl IntoG2Operand<'b>,
) -> PendingPairing<'a, 'b> {
    PendingPairing {
        g1: g1.into_operand(),
        g2: g2.into_operand(),
    }
}

impl Gt {
    pub fn one() -> Gt {
        Gt(Fq12::one())
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn inverse(&self) -> Gt {
        Gt(curve::gt_inverse(&self.0))
    }

    pub fn pow(&self, exp: impl Into<Scalar>) -> Gt {
        Gt(curve::gt_pow(
            &self.0,
            bigint::to_u64x4(&exp.into().to_big()),
        ))
    }

    pub fn to_bytes(&self) -> [u8; GT_BYTES] {
        curve::gt_to_bytes(&self.0)
    }

    /// Parses the coefficient dump of a target-group element. Coefficients
    /// are range-checked and the zero element is rejected; full subgroup
    /// membership is the sender's obligation.
    pub fn from_bytes(bytes: &[u8; GT_BYTES]) -> Result<Gt, Error> {
        let x = curve::gt_from_bytes(bytes)?;
        if x.is_zero() {
            return Err(Error::InvalidPoint {
                group: "GT",
                reason: "zero is not a target-group element",
            });
        }
        Ok(Gt(x))
    }

    fn mul_impl(a: &Gt, b: &Gt) -> Gt {
        Gt(a.0 * b.0)
    }

    fn div_impl(a: &Gt, b: &Gt) -> Gt {
        Gt(a.0 * curve::gt_inverse(&b.0))
    }
}

impl_binop!(Mul, mul, Gt, Gt, Gt, Gt::mul_impl);
impl_binop!(Div, div, Gt, Gt, Gt, Gt::div_impl);

impl Product<Gt> for Gt {
    fn product<I: Iterator<Item = Gt>>(iter: I) -> Gt {
        iter.fold(Gt::one(), |acc, x| acc * x)
    }
}

impl<'a, 'b> PendingPairing<'a, 'b> {
    /// Runs the Miller loop and final exponentiation.
    #[instrument(level = "trace", skip_all)]
    pub fn force(self) -> Gt {
        Gt(curve::pairing_product(&[self.g1.0], &[self.g2.0]))
    }

    pub fn pow(self, exp: impl Into<Scalar>) -> Gt {
        self.force().pow(exp)
    }
}

/// Fuses both pairings into one double Miller loop with a shared final
/// exponentiation.
impl<'a, 'b, 'c, 'd> core::ops::Mul<PendingPairing<'c, 'd>> for PendingPairing<'a, 'b> {
    type Output = Gt;
    #[instrument(level = "trace", skip_all)]
    fn mul(self, rhs: PendingPairing<'c, 'd>) -> Gt {
        Gt(curve::pairing_product(
            &[self.g1.0, rhs.g1.0],
            &[self.g2.0, rhs.g2.0],
        ))
    }
}

impl<'a, 'b> core::ops::Mul<Gt> for PendingPairing<'a, 'b> {
    type Output = Gt;
    fn mul(self, rhs: Gt) -> Gt {
        self.force() * rhs
    }
}

impl<'a, 'b> core::ops::Mul<PendingPairing<'a, 'b>> for Gt {
    type Output = Gt;
    fn mul(self, rhs: PendingPairing<'a, 'b>) -> Gt {
        self * rhs.force()
    }
}

/// Equality without evaluating either side: `e(a, b) == e(c, d)` iff
/// `e(a^-1, b) * e(c, d)` is the identity, one fused loop in total.
impl<'a, 'b, 'c, 'd> PartialEq<PendingPairing<'c, 'd>> for PendingPairing<'a, 'b> {
    fn eq(&self, other: &PendingPairing<'c, 'd>) -> bool {
        curve::pairing_product(
            &[self.g1.inverse().0, other.g1.0],
            &[self.g2.0, other.g2.0],
        )
        .is_one()
    }
}

impl<'a, 'b> PartialEq<Gt> for PendingPairing<'a, 'b> {
    fn eq(&self, other: &Gt) -> bool {
        self.clone().force() == *other
    }
}

impl<'a, 'b> PartialEq<PendingPairing<'a, 'b>> for Gt {
    fn eq(&self, other: &PendingPairing<'a, 'b>) -> bool {
        *self == other.clone().force()
    }
}

impl<'a, 'b> From<PendingPairing<'a, 'b>> for Gt {
    fn from(pending: PendingPairing<'a, 'b>) -> Gt {
        pending.force()
    }
}

/// Folds any number of pending pairings into a single multi-Miller loop
/// with one final exponentiation.
impl<'a, 'b> Product<PendingPairing<'a, 'b>> for Gt {
    fn product<I: Iterator<Item = PendingPairing<'a, 'b>>>(iter: I) -> Gt {
        let mut lhs = Vec::new();
        let mut rhs = Vec::new();
        for pending in iter {
            lhs.push(pending.g1.0);
            rhs.push(pending.g2.0);
        }
        if lhs.is_empty() {
            return Gt::one();
        }
        Gt(curve::pairing_product(&lhs, &rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pairing_is_bilinear() {
        let mut rng = StdRng::seed_from_u64(79);
        let g1 = G1Point::generator();
        let g2 = G2Point::generator();
        let x = Scalar::random(&mut rng);

        // equality on pending pairings runs one fused loop
        assert_eq!(pair(g1.pow(x), &g2), pair(&g1, g2.pow(x)));
        assert_eq!(pair(&g1, &g2).force().pow(x), pair(g1.pow(x), &g2).force());
    }

    #[test]
    fn exponents_add_under_multiplication() {
        let mut rng = StdRng::seed_from_u64(163);
        let t = pair(G1Point::generator(), G2Point::generator()).force();
        let a = Scalar::random(&mut rng);
        let b = Scalar::random(&mut rng);
        assert_eq!(t.pow(a + b), t.pow(a) * t.pow(b));
    }

    #[test]
    fn seeded_scenario_distinguishes_blinded_pairings() {
        let mut rng = crate::random::RandomEngine::from_seed(b"test-seed");
        let g1 = G1Point::generator();
        let g2 = G2Point::generator();
        let x = Scalar::random(&mut rng);

        let base = pair(&g1, &g2).force();
        assert_eq!(pair(g1.pow(x), &g2), pair(&g1, g2.pow(x)));
        assert_ne!(pair(g1.pow(x), &g2).force(), base);
        assert_ne!(pair(&g1, g2.pow(x)).force(), base);
    }

    #[test]
    fn fused_product_matches_separate_pairings() {
        let mut rng = StdRng::seed_from_u64(83);
        let a = G1Point::random(&mut rng).force();
        let b = G1Point::random(&mut rng).force();
        let c = G2Point::random(&mut rng).force();
        let d = G2Point::random(&mut rng).force();

        let fused = pair(&a, &c) * pair(&b, &d);
        let separate = pair(&a, &c).force() * pair(&b, &d).force();
        assert_eq!(fused, separate);
    }

    #[test]
    fn many_way_product_shares_one_final_exponentiation() {
        let mut rng = StdRng::seed_from_u64(89);
        let pairs: Vec<(G1Point, G2Point)> = (0..4)
            .map(|_| {
                (
                    G1Point::random(&mut rng).force(),
                    G2Point::random(&mut rng).force(),
                )
            })
            .collect();

        let fused: Gt = pairs.iter().map(|(a, b)| pair(a, b)).product();
        let naive = pairs
            .iter()
            .fold(Gt::one(), |acc, (a, b)| acc * pair(a, b).force());
        assert_eq!(fused, naive);
    }

    #[test]
    fn identity_inverse_and_division() {
        let mut rng = StdRng::seed_from_u64(97);
        let x = pair(
            G1Point::random(&mut rng).force(),
            G2Point::random(&mut rng).force(),
        )
        .force();
        assert_eq!(x * x.inverse(), Gt::one());
        assert_eq!(x / x, Gt::one());
        assert!(Gt::one().is_one());
    }

    #[test]
    fn byte_round_trip_rejects_junk() {
        let x = pair(G1Point::generator(), G2Point::generator()).force();
        assert_eq!(Gt::from_bytes(&x.to_bytes()).expect("valid encoding"), x);

        let junk = [0xffu8; GT_BYTES];
        assert!(Gt::from_bytes(&junk).is_err());
        assert!(Gt::from_bytes(&[0u8; GT_BYTES]).is_err());
    }

    #[test]
    fn pairing_with_identity_is_one() {
        assert!(pair(G1Point::identity(), G2Point::generator())
            .force()
            .is_one());
        assert!(pair(G1Point::generator(), G2Point::identity())
            .force()
            .is_one());
    }
}

//! Double-width scalar accumulator.
//!
//! A [`WideScalar`] holds the unreduced product of two field elements in
//! fourteen radix-2^58 limbs. It exists so that sums of products can be
//! accumulated limb-wise and reduced once at the end; it carries the same
//! two range tags as [`Scalar`] and deliberately has no byte encoding of
//! its own. Anything leaving the accumulator goes through
//! [`WideScalar::normalize`] first.

use core::iter::{Product, Sum};
use core::ops::Neg;

use crate::backend::bigint::{self, DBig, HEAD_BITS, HEAD_BITS2, NLIMBS, NLIMBS2};
use crate::range::{LimbRange, UNIT};
use crate::scalar::{impl_binop, Scalar, REST_ENVELOPE};

/// Overflow envelope for the double-width head limb, whose canonical bound
/// is only `2^HEAD_BITS2`.
pub(crate) const WIDE_HEAD_ENVELOPE: LimbRange = {
    const SLACK: i64 = (1 << (63 - HEAD_BITS2)) - 1;
    LimbRange::new(-SLACK, SLACK)
};

/// Bit gap between a single-width head limb and a full rest limb; used to
/// re-express the head tag when the limb is embedded at a rest position.
const HEAD_GAP: u32 = (bigint::BASE_BITS - HEAD_BITS) as u32;

/// An unreduced double-width field value.
#[derive(Clone, Copy, Debug)]
pub struct WideScalar {
    limbs: DBig,
    head: LimbRange,
    rest: LimbRange,
}

impl WideScalar {
    pub fn zero() -> WideScalar {
        WideScalar {
            limbs: [0; NLIMBS2],
            head: UNIT,
            rest: UNIT,
        }
    }

    /// Wraps a fresh comba product; its rest limbs are canonical by
    /// construction, only the head tag is inherited from the operands.
    pub(crate) fn from_product(limbs: DBig, head: LimbRange) -> WideScalar {
        WideScalar {
            limbs,
            head,
            rest: UNIT,
        }
    }

    /// Reduces to a canonical single-width element.
    pub fn normalize(&self) -> Scalar {
        let mut limbs = self.limbs;
        bigint::dnorm(&mut limbs);
        Scalar::from_canonical(bigint::dmod(&limbs, &bigint::P))
    }

    pub fn is_zero(&self) -> bool {
        self.normalize().is_zero()
    }

    fn normalize_rests(&mut self) {
        bigint::dnorm(&mut self.limbs);
        self.head = self.head + self.rest.shrink(HEAD_BITS2 as u32);
        self.rest = UNIT;
    }

    fn add_impl(a: &WideScalar, b: &WideScalar) -> WideScalar {
        let mut a = *a;
        let mut b = *b;
        loop {
            let head = a.head + b.head;
            let rest = a.rest + b.rest;
            if !WIDE_HEAD_ENVELOPE.contains(head) {
                if a.head.magnitude() >= b.head.magnitude() {
                    a = WideScalar::from(a.normalize());
                } else {
                    b = WideScalar::from(b.normalize());
                }
            } else if !REST_ENVELOPE.contains(rest) {
                if a.rest.magnitude() >= b.rest.magnitude() {
                    a.normalize_rests();
                } else {
                    b.normalize_rests();
                }
            } else {
                let mut limbs = a.limbs;
                for (l, r) in limbs.iter_mut().zip(b.limbs.iter()) {
                    *l += r;
                }
                return WideScalar { limbs, head, rest };
            }
        }
    }

    fn sub_impl(a: &WideScalar, b: &WideScalar) -> WideScalar {
        WideScalar::add_impl(a, &b.neg_impl())
    }

    fn neg_impl(&self) -> WideScalar {
        WideScalar::from(-self.normalize())
    }

    fn mul_impl(a: &WideScalar, b: &WideScalar) -> WideScalar {
        a.normalize() * b.normalize()
    }

    fn mul_scalar(a: &WideScalar, b: &Scalar) -> WideScalar {
        a.normalize() * b
    }

    fn add_scalar(a: &WideScalar, b: &Scalar) -> WideScalar {
        WideScalar::add_impl(a, &WideScalar::from(*b))
    }

    fn radd_scalar(a: &Scalar, b: &WideScalar) -> WideScalar {
        WideScalar::add_impl(&WideScalar::from(*a), b)
    }

    fn sub_scalar(a: &WideScalar, b: &Scalar) -> WideScalar {
        WideScalar::sub_impl(a, &WideScalar::from(*b))
    }

    fn rsub_scalar(a: &Scalar, b: &WideScalar) -> WideScalar {
        WideScalar::sub_impl(&WideScalar::from(*a), b)
    }
}

impl From<Scalar> for WideScalar {
    /// Zero-extends into the double width. The single-width head limb now
    /// sits at a rest position, so its tag is folded into the rest tag at
    /// the coarser bound.
    fn from(s: Scalar) -> WideScalar {
        let mut limbs = [0i64; NLIMBS2];
        limbs[..NLIMBS].copy_from_slice(&s.limbs);
        WideScalar {
            limbs,
            head: UNIT,
            rest: s.rest.union(s.head.shrink(HEAD_GAP)),
        }
    }
}

impl From<&Scalar> for WideScalar {
    fn from(s: &Scalar) -> WideScalar {
        WideScalar::from(*s)
    }
}

impl From<WideScalar> for Scalar {
    fn from(w: WideScalar) -> Scalar {
        w.normalize()
    }
}

impl_binop!(Add, add, WideScalar, WideScalar, WideScalar, WideScalar::add_impl);
impl_binop!(Sub, sub, WideScalar, WideScalar, WideScalar, WideScalar::sub_impl);
impl_binop!(Mul, mul, WideScalar, WideScalar, WideScalar, WideScalar::mul_impl);
impl_binop!(Add, add, WideScalar, Scalar, WideScalar, WideScalar::add_scalar);
impl_binop!(Add, add, Scalar, WideScalar, WideScalar, WideScalar::radd_scalar);
impl_binop!(Sub, sub, WideScalar, Scalar, WideScalar, WideScalar::sub_scalar);
impl_binop!(Sub, sub, Scalar, WideScalar, WideScalar, WideScalar::rsub_scalar);
impl_binop!(Mul, mul, WideScalar, Scalar, WideScalar, WideScalar::mul_scalar);

impl Neg for WideScalar {
    type Output = WideScalar;
    fn neg(self) -> WideScalar {
        self.neg_impl()
    }
}

impl Neg for &WideScalar {
    type Output = WideScalar;
    fn neg(self) -> WideScalar {
        self.neg_impl()
    }
}

impl PartialEq for WideScalar {
    fn eq(&self, other: &WideScalar) -> bool {
        self.normalize() == other.normalize()
    }
}

impl Eq for WideScalar {}

impl PartialEq<Scalar> for WideScalar {
    fn eq(&self, other: &Scalar) -> bool {
        self.normalize() == *other
    }
}

impl PartialEq<WideScalar> for Scalar {
    fn eq(&self, other: &WideScalar) -> bool {
        *self == other.normalize()
    }
}

impl Sum for WideScalar {
    fn sum<I: Iterator<Item = WideScalar>>(iter: I) -> WideScalar {
        iter.fold(WideScalar::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a WideScalar> for WideScalar {
    fn sum<I: Iterator<Item = &'a WideScalar>>(iter: I) -> WideScalar {
        iter.fold(WideScalar::zero(), |acc, x| acc + x)
    }
}

impl Product for WideScalar {
    fn product<I: Iterator<Item = WideScalar>>(iter: I) -> WideScalar {
        iter.fold(WideScalar::from(Scalar::one()), |acc, x| acc * x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::PrimeField;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn oracle(s: &Scalar) -> Fr {
        Fr::from_be_bytes_mod_order(&s.to_bytes())
    }

    #[test]
    fn inner_product_with_one_final_reduction() {
        let mut rng = StdRng::seed_from_u64(31);
        let xs: Vec<Scalar> = (0..64).map(|_| Scalar::random(&mut rng)).collect();
        let ys: Vec<Scalar> = (0..64).map(|_| Scalar::random(&mut rng)).collect();

        let deferred: WideScalar = xs.iter().zip(ys.iter()).map(|(x, y)| x * y).sum();
        let expected = xs
            .iter()
            .zip(ys.iter())
            .map(|(x, y)| oracle(x) * oracle(y))
            .sum::<Fr>();
        assert_eq!(oracle(&deferred.normalize()), expected);
    }

    #[test]
    fn mixed_width_arithmetic() {
        let mut rng = StdRng::seed_from_u64(37);
        let a = Scalar::random(&mut rng);
        let b = Scalar::random(&mut rng);
        let c = Scalar::random(&mut rng);

        let w = a * b;
        assert_eq!(oracle(&(w + c).normalize()), oracle(&a) * oracle(&b) + oracle(&c));
        assert_eq!(oracle(&(w - c).normalize()), oracle(&a) * oracle(&b) - oracle(&c));
        assert_eq!(
            oracle(&(w * c).normalize()),
            oracle(&a) * oracle(&b) * oracle(&c)
        );
        assert_eq!(w, a * b);
        assert_eq!(c - w + w, WideScalar::from(c));
    }

    #[test]
    fn wide_compares_against_single_width() {
        let a = Scalar::from(6u64);
        let w = Scalar::from(2u64) * Scalar::from(3u64);
        assert_eq!(w, a);
        assert_eq!(a, w);
        assert!(WideScalar::zero().is_zero());
    }

    #[test]
    fn negation_round_trips() {
        let mut rng = StdRng::seed_from_u64(41);
        let a = Scalar::random(&mut rng);
        let b = Scalar::random(&mut rng);
        let w = a * b;
        assert_eq!((w + -w).normalize(), Scalar::zero());
    }
}

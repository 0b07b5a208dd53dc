//! Deferred-reduction scalar field elements.
//!
//! A [`Scalar`] is an element of the BLS12-381 scalar field stored in
//! redundant radix-2^58 limbs together with two [`LimbRange`] tags that
//! bound how far each limb may have drifted from canonical. Additions,
//! subtractions and small constant scalings just operate limb-wise and add
//! the tags; a reduction is performed only when the tags show the next
//! operation could overflow a limb. Long chains of linear operations
//! therefore cost one modular reduction instead of one per step.
//!
//! Values are kept nonnegative: negation and subtraction go through the
//! canonical complement `p - x`, so only upward drift has to be tracked at
//! the limb level.
//!
//! Multiplying two scalars yields a [`WideScalar`], which keeps the
//! double-width product unreduced so that sums of products (inner products,
//! Lagrange combinations) can also share a single final reduction.

use core::iter::{Product, Sum};
use core::ops::Neg;

use rand_core::RngCore;

use crate::backend::bigint::{self, Big, BASE_BITS, BASE_MASK, HEAD_BITS};
use crate::errors::Error;
use crate::range::{LimbRange, UNIT};
use crate::wide::{WideScalar, WIDE_HEAD_ENVELOPE};

/// Overflow envelope for the non-head limbs: tags must stay within
/// `+-((1 << (63 - BASE_BITS)) - 1)` multiples of the canonical bound so a
/// limb never leaves `i64`.
pub(crate) const REST_ENVELOPE: LimbRange = {
    const SLACK: i64 = (1 << (63 - BASE_BITS)) - 1;
    LimbRange::new(-SLACK, SLACK)
};

/// Overflow envelope for the head limb, whose canonical bound is only
/// `2^HEAD_BITS`.
pub(crate) const HEAD_ENVELOPE: LimbRange = {
    const SLACK: i64 = (1 << (63 - HEAD_BITS)) - 1;
    LimbRange::new(-SLACK, SLACK)
};

/// Serialized width of a scalar: 48 bytes, big-endian.
pub const SCALAR_BYTES: usize = bigint::SCALAR_BYTES;

/// Bytes of message payload one field element can carry.
const MESSAGE_UNIT: usize = 31;
/// Offset of the payload-length byte inside a 48-byte block.
const MARKER_INDEX: usize = SCALAR_BYTES - MESSAGE_UNIT - 1;

/// An element of the scalar field in deferred-reduction form.
#[derive(Clone, Copy, Debug)]
pub struct Scalar {
    pub(crate) limbs: Big,
    /// Range tag of the head limb, in multiples of `2^HEAD_BITS`.
    pub(crate) head: LimbRange,
    /// Shared range tag of all other limbs, in multiples of `2^BASE_BITS`.
    pub(crate) rest: LimbRange,
}

/// Generates the four owned/borrowed operand combinations of a binary
/// operator from one `(&lhs, &rhs) -> out` function.
macro_rules! impl_binop {
    ($trait:ident, $method:ident, $lhs:ty, $rhs:ty, $out:ty, $func:path) => {
        impl core::ops::$trait<$rhs> for $lhs {
            type Output = $out;
            fn $method(self, rhs: $rhs) -> $out {
                $func(&self, &rhs)
            }
        }
        impl core::ops::$trait<&$rhs> for $lhs {
            type Output = $out;
            fn $method(self, rhs: &$rhs) -> $out {
                $func(&self, rhs)
            }
        }
        impl core::ops::$trait<$rhs> for &$lhs {
            type Output = $out;
            fn $method(self, rhs: $rhs) -> $out {
                $func(self, &rhs)
            }
        }
        impl core::ops::$trait<&$rhs> for &$lhs {
            type Output = $out;
            fn $method(self, rhs: &$rhs) -> $out {
                $func(self, rhs)
            }
        }
    };
}
pub(crate) use impl_binop;

impl Scalar {
    pub const fn zero() -> Scalar {
        Scalar::from_canonical(bigint::ZERO)
    }

    pub const fn one() -> Scalar {
        Scalar::from_canonical(bigint::ONE)
    }

    /// Wraps fully reduced limbs.
    pub(crate) const fn from_canonical(limbs: Big) -> Scalar {
        Scalar {
            limbs,
            head: UNIT,
            rest: UNIT,
        }
    }

    /// Uniform element of the field.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Scalar {
        Scalar::from_canonical(bigint::random_below(rng, &bigint::P))
    }

    /// Uniform element of the field excluding zero; useful for secrets that
    /// must be invertible.
    pub fn random_nonzero<R: RngCore + ?Sized>(rng: &mut R) -> Scalar {
        let mut limbs = bigint::random_below(rng, &bigint::P_MINUS_1);
        bigint::inc(&mut limbs, 1);
        Scalar::from_canonical(limbs)
    }

    /// Parses the canonical 48-byte big-endian encoding. Encodings at or
    /// above the modulus are rejected so every element has exactly one
    /// accepted form.
    pub fn from_bytes(bytes: &[u8; SCALAR_BYTES]) -> Result<Scalar, Error> {
        let limbs = bigint::parse_bytes48(bytes);
        if bigint::comp(&limbs, &bigint::P) >= 0 {
            return Err(Error::ScalarOutOfRange);
        }
        Ok(Scalar::from_canonical(limbs))
    }

    /// Canonical 48-byte big-endian encoding.
    pub fn to_bytes(&self) -> [u8; SCALAR_BYTES] {
        bigint::to_bytes48(&self.normalize().limbs)
    }

    /// Reduces 64 bytes of uniform input into the field; the 128 bits of
    /// headroom over the modulus keep the output statistically uniform.
    pub(crate) fn from_wide_bytes(bytes: &[u8; 64]) -> Scalar {
        let wide = bigint::from_bytes_wide(bytes);
        Scalar::from_canonical(bigint::dmod(&wide, &bigint::P))
    }

    /// Fully reduces to the canonical representative in `[0, p)`.
    pub fn normalize(&self) -> Scalar {
        let mut x = *self;
        x.normalize_rests();
        Scalar::from_canonical(bigint::reduce(&x.limbs))
    }

    /// Carry-propagates the rest limbs into the head without reducing
    /// modulo `p`. Cheap, and resets the rest tag to canonical.
    pub(crate) fn normalize_rests(&mut self) {
        bigint::norm(&mut self.limbs);
        self.head = self.head + self.rest.shrink(HEAD_BITS as u32);
        self.rest = UNIT;
    }

    /// Canonical limbs, for handing to the curve backend as an exponent.
    pub(crate) fn to_big(&self) -> Big {
        self.normalize().limbs
    }

    pub fn is_zero(&self) -> bool {
        bigint::is_zero(&self.normalize().limbs)
    }

    /// Multiplicative inverse. Panics on zero, which is a caller bug for
    /// every protocol this engine serves.
    pub fn inverse(&self) -> Scalar {
        let n = self.normalize();
        assert!(!bigint::is_zero(&n.limbs), "inverse of the zero scalar");
        Scalar::from_canonical(bigint::invmodp(&n.limbs))
    }

    fn add_impl(a: &Scalar, b: &Scalar) -> Scalar {
        let mut a = *a;
        let mut b = *b;
        loop {
            let head = a.head + b.head;
            let rest = a.rest + b.rest;
            if !HEAD_ENVELOPE.contains(head) {
                if a.head.magnitude() >= b.head.magnitude() {
                    a = a.normalize();
                } else {
                    b = b.normalize();
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
                return Scalar { limbs, head, rest };
            }
        }
    }

    fn sub_impl(a: &Scalar, b: &Scalar) -> Scalar {
        Scalar::add_impl(a, &b.neg_impl())
    }

    fn neg_impl(&self) -> Scalar {
        let n = self.normalize();
        Scalar::from_canonical(bigint::modneg(&n.limbs))
    }

    /// Limb-wise scaling by a small constant. The constant must fit the
    /// rest envelope; anything larger belongs in a full multiplication.
    fn scale(&self, c: i64) -> Scalar {
        if c < 0 {
            return self.scale(-c).neg_impl();
        }
        assert!(
            c <= REST_ENVELOPE.max(),
            "scale constant {c} exceeds the deferred per-limb bound"
        );
        let mut x = *self;
        loop {
            let head = x.head.scale(c);
            let rest = x.rest.scale(c);
            if !HEAD_ENVELOPE.contains(head) {
                x = x.normalize();
            } else if !REST_ENVELOPE.contains(rest) {
                x.normalize_rests();
            } else {
                let mut limbs = x.limbs;
                for l in limbs.iter_mut() {
                    *l *= c;
                }
                return Scalar { limbs, head, rest };
            }
        }
    }

    /// Full product, left unreduced at double width.
    fn mul_impl(a: &Scalar, b: &Scalar) -> WideScalar {
        let mut a = *a;
        let mut b = *b;
        // the column accumulator needs canonical rest limbs
        if !UNIT.contains(a.rest) {
            a.normalize_rests();
        }
        if !UNIT.contains(b.rest) {
            b.normalize_rests();
        }
        loop {
            // one extra unit covers the column carries folded into the top limb
            let head = a.head * b.head + UNIT;
            if WIDE_HEAD_ENVELOPE.contains(head) {
                return WideScalar::from_product(bigint::mul(&a.limbs, &b.limbs), head);
            }
            if a.head.magnitude() >= b.head.magnitude() {
                a = a.normalize();
            } else {
                b = b.normalize();
            }
        }
    }

    fn div_impl(a: &Scalar, b: &Scalar) -> WideScalar {
        Scalar::mul_impl(a, &b.inverse())
    }

    /// Packs an arbitrary byte message into field elements, 31 payload
    /// bytes per element with a length marker, so any message survives a
    /// trip through scalar arithmetic-free protocols unchanged.
    pub fn encode_message(message: &[u8]) -> Vec<Scalar> {
        message
            .chunks(MESSAGE_UNIT)
            .map(|chunk| {
                let mut block = [0u8; SCALAR_BYTES];
                block[MARKER_INDEX] = chunk.len() as u8;
                block[MARKER_INDEX + 1..MARKER_INDEX + 1 + chunk.len()].copy_from_slice(chunk);
                // marker <= 31 keeps the block numerically far below p
                Scalar::from_bytes(&block).expect("message block below the modulus")
            })
            .collect()
    }

    /// Reassembles a message packed by [`Scalar::encode_message`].
    pub fn decode_message(blocks: &[Scalar]) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(blocks.len() * MESSAGE_UNIT);
        for block in blocks {
            let bytes = block.to_bytes();
            if bytes[..MARKER_INDEX].iter().any(|&b| b != 0) {
                return Err(Error::MalformedMessage("nonzero leading bytes"));
            }
            let len = bytes[MARKER_INDEX] as usize;
            if len == 0 || len > MESSAGE_UNIT {
                return Err(Error::MalformedMessage("payload length out of range"));
            }
            if bytes[MARKER_INDEX + 1 + len..].iter().any(|&b| b != 0) {
                return Err(Error::MalformedMessage("nonzero trailing bytes"));
            }
            out.extend_from_slice(&bytes[MARKER_INDEX + 1..MARKER_INDEX + 1 + len]);
        }
        Ok(out)
    }
}

impl_binop!(Add, add, Scalar, Scalar, Scalar, Scalar::add_impl);
impl_binop!(Sub, sub, Scalar, Scalar, Scalar, Scalar::sub_impl);
impl_binop!(Mul, mul, Scalar, Scalar, WideScalar, Scalar::mul_impl);
impl_binop!(Div, div, Scalar, Scalar, WideScalar, Scalar::div_impl);

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        self.neg_impl()
    }
}

impl Neg for &Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        self.neg_impl()
    }
}

impl core::ops::Mul<i64> for Scalar {
    type Output = Scalar;
    fn mul(self, c: i64) -> Scalar {
        self.scale(c)
    }
}

impl core::ops::Mul<i64> for &Scalar {
    type Output = Scalar;
    fn mul(self, c: i64) -> Scalar {
        self.scale(c)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Scalar {
        let mut limbs = bigint::ZERO;
        limbs[0] = (v & BASE_MASK as u64) as i64;
        limbs[1] = (v >> BASE_BITS) as i64;
        Scalar::from_canonical(limbs)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Scalar {
        let abs = Scalar::from(v.unsigned_abs());
        if v < 0 {
            -abs
        } else {
            abs
        }
    }
}

impl From<&Scalar> for Scalar {
    fn from(s: &Scalar) -> Scalar {
        *s
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Scalar) -> bool {
        self.normalize().limbs == other.normalize().limbs
    }
}

impl Eq for Scalar {}

impl Sum for Scalar {
    fn sum<I: Iterator<Item = Scalar>>(iter: I) -> Scalar {
        // plain folding: the range tags batch the intermediate reductions
        iter.fold(Scalar::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Scalar> for Scalar {
    fn sum<I: Iterator<Item = &'a Scalar>>(iter: I) -> Scalar {
        iter.fold(Scalar::zero(), |acc, x| acc + x)
    }
}

impl Product for Scalar {
    fn product<I: Iterator<Item = Scalar>>(iter: I) -> Scalar {
        iter.fold(Scalar::one(), |acc, x| (acc * x).normalize())
    }
}

impl<'a> Product<&'a Scalar> for Scalar {
    fn product<I: Iterator<Item = &'a Scalar>>(iter: I) -> Scalar {
        iter.fold(Scalar::one(), |acc, x| (acc * x).normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::{Field, PrimeField};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Independent model of the field for cross-checking.
    fn oracle(s: &Scalar) -> Fr {
        Fr::from_be_bytes_mod_order(&s.to_bytes())
    }

    #[test]
    fn byte_round_trip_and_range_check() {
        let mut rng = StdRng::seed_from_u64(7);
        let x = Scalar::random(&mut rng);
        let back = Scalar::from_bytes(&x.to_bytes()).expect("canonical bytes");
        assert_eq!(back, x);

        assert_eq!(
            Scalar::from_bytes(&[0u8; SCALAR_BYTES]).expect("zero"),
            Scalar::zero()
        );
        let modulus = bigint::to_bytes48(&bigint::P);
        assert_eq!(Scalar::from_bytes(&modulus), Err(Error::ScalarOutOfRange));
    }

    #[test]
    fn arithmetic_matches_the_oracle() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..32 {
            let a = Scalar::random(&mut rng);
            let b = Scalar::random(&mut rng);
            assert_eq!(oracle(&(a + b)), oracle(&a) + oracle(&b));
            assert_eq!(oracle(&(a - b)), oracle(&a) - oracle(&b));
            assert_eq!(
                oracle(&(a * b).normalize()),
                oracle(&a) * oracle(&b),
                "product must reduce to the oracle value"
            );
            assert_eq!(oracle(&-a), -oracle(&a));
        }
    }

    #[test]
    fn deferred_sum_equals_eager_sum() {
        let mut rng = StdRng::seed_from_u64(13);
        let xs: Vec<Scalar> = (0..1000).map(|_| Scalar::random(&mut rng)).collect();

        let deferred: Scalar = xs.iter().sum();
        let mut eager = Scalar::zero();
        for x in &xs {
            eager = (eager + x).normalize();
        }
        assert_eq!(deferred, eager);

        let expected = xs.iter().map(oracle).sum::<Fr>();
        assert_eq!(oracle(&deferred), expected);
    }

    #[test]
    fn long_scaling_chains_stay_correct() {
        let mut rng = StdRng::seed_from_u64(17);
        let x = Scalar::random(&mut rng);
        let mut deferred = x;
        let mut expected = oracle(&x);
        for c in [3i64, -7, 31, 1, -31, 5] {
            deferred = deferred * c;
            expected *= Fr::from(c);
        }
        assert_eq!(oracle(&deferred), expected);
    }

    #[test]
    #[should_panic(expected = "scale constant")]
    fn oversized_scale_constant_panics() {
        let _ = Scalar::one() * 32i64;
    }

    #[test]
    fn inverse_and_division() {
        let mut rng = StdRng::seed_from_u64(19);
        let a = Scalar::random_nonzero(&mut rng);
        let b = Scalar::random_nonzero(&mut rng);
        assert_eq!((a * a.inverse()).normalize(), Scalar::one());
        assert_eq!(
            oracle(&(a / b).normalize()),
            oracle(&a) * oracle(&b).inverse().expect("nonzero")
        );
    }

    #[test]
    #[should_panic(expected = "inverse of the zero scalar")]
    fn zero_has_no_inverse() {
        let _ = Scalar::zero().inverse();
    }

    #[test]
    fn small_integer_conversions() {
        assert_eq!(Scalar::from(0u64), Scalar::zero());
        assert_eq!(Scalar::from(1u64), Scalar::one());
        assert_eq!(Scalar::from(-1i64) + Scalar::one(), Scalar::zero());
        let big = u64::MAX;
        assert_eq!(oracle(&Scalar::from(big)), Fr::from(big));
    }

    #[test]
    fn nonzero_sampling_never_returns_zero() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..64 {
            assert!(!Scalar::random_nonzero(&mut rng).is_zero());
        }
    }

    #[test]
    fn message_codec_round_trip() {
        let message = b"attributes: name, birthdate, and a block-spanning suffix!";
        let blocks = Scalar::encode_message(message);
        assert_eq!(blocks.len(), (message.len() + 30) / 31);
        let decoded = Scalar::decode_message(&blocks).expect("well-formed blocks");
        assert_eq!(decoded, message);

        assert!(Scalar::encode_message(b"").is_empty());
        assert_eq!(Scalar::decode_message(&[]).expect("empty"), Vec::<u8>::new());
    }

    #[test]
    fn message_codec_handles_block_aligned_input() {
        let aligned = [0xabu8; 62];
        let blocks = Scalar::encode_message(&aligned);
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            Scalar::decode_message(&blocks).expect("aligned blocks"),
            aligned
        );
    }

    #[test]
    fn arbitrary_scalars_are_not_message_blocks() {
        let mut rng = StdRng::seed_from_u64(29);
        let garbage = Scalar::random(&mut rng);
        assert!(Scalar::decode_message(&[garbage]).is_err());
        assert_eq!(
            Scalar::decode_message(&[Scalar::zero()]),
            Err(Error::MalformedMessage("payload length out of range"))
        );
    }
}

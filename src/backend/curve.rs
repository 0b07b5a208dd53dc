//! Arkworks-backed BLS12-381 group operations.
//!
//! The engine front end keeps its own scalar representation, so everything
//! crossing into this module arrives either as raw points or as canonical
//! little-endian 64-bit words ready for `BigInt<4>` exponents. The module
//! owns the fixed-width wire formats: 49-byte compressed `G1`, 97-byte
//! compressed `G2` and the 576-byte coefficient dump of a target-group
//! element.
//!
//! Compressed points use a parity prefix (`0x02` even `y`, `0x03` odd `y`)
//! followed by the big-endian `x` coordinate; the identity is encoded as an
//! all-zero buffer. Decoding performs full validation: coordinate range,
//! curve membership, and the prime-order subgroup check.

use ark_bls12_381::{
    Bls12_381, Fq, Fq12, Fq2, Fq6, G1Affine, G1Projective, G2Affine, G2Projective,
};
use ark_ec::pairing::Pairing;
use ark_ec::scalar_mul::variable_base::VariableBaseMSM;
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::{BigInt, BigInteger, Field, One, PrimeField, Zero};

use crate::errors::Error;

/// Base-field element width on the wire.
const FQ_BYTES: usize = 48;
pub(crate) const G1_BYTES: usize = 1 + FQ_BYTES;
pub(crate) const G2_BYTES: usize = 1 + 2 * FQ_BYTES;
pub(crate) const GT_BYTES: usize = 12 * FQ_BYTES;

const EVEN_PREFIX: u8 = 0x02;
const ODD_PREFIX: u8 = 0x03;

pub(crate) fn fr_bigint(words: [u64; 4]) -> BigInt<4> {
    BigInt::new(words)
}

pub(crate) fn g1_mul(base: &G1Projective, exp: [u64; 4]) -> G1Projective {
    base.mul_bigint(fr_bigint(exp))
}

pub(crate) fn g2_mul(base: &G2Projective, exp: [u64; 4]) -> G2Projective {
    base.mul_bigint(fr_bigint(exp))
}

/// `a^x * b^y` in one multi-scalar pass.
pub(crate) fn g1_mul2(
    a: &G1Projective,
    x: [u64; 4],
    b: &G1Projective,
    y: [u64; 4],
) -> G1Projective {
    let bases = G1Projective::normalize_batch(&[*a, *b]);
    G1Projective::msm_bigint(&bases, &[fr_bigint(x), fr_bigint(y)])
}

pub(crate) fn g2_mul2(
    a: &G2Projective,
    x: [u64; 4],
    b: &G2Projective,
    y: [u64; 4],
) -> G2Projective {
    let bases = G2Projective::normalize_batch(&[*a, *b]);
    G2Projective::msm_bigint(&bases, &[fr_bigint(x), fr_bigint(y)])
}

fn fq_to_bytes(x: &Fq) -> [u8; FQ_BYTES] {
    let mut out = [0u8; FQ_BYTES];
    out.copy_from_slice(&x.into_bigint().to_bytes_be());
    out
}

/// Strict base-field decode: rejects values at or above the field
/// characteristic instead of wrapping them.
fn fq_from_bytes(bytes: &[u8], group: &'static str) -> Result<Fq, Error> {
    let modulus = Fq::MODULUS.to_bytes_be();
    if bytes >= modulus.as_slice() {
        return Err(Error::InvalidPoint {
            group,
            reason: "coordinate not below the base-field modulus",
        });
    }
    Ok(Fq::from_be_bytes_mod_order(bytes))
}

fn fq_is_odd(x: &Fq) -> bool {
    x.into_bigint().is_odd()
}

/// Sign convention for `Fq2`: parity of `c0`, falling back to `c1` when
/// `c0` is zero.
fn fq2_is_odd(x: &Fq2) -> bool {
    if x.c0.is_zero() {
        fq_is_odd(&x.c1)
    } else {
        fq_is_odd(&x.c0)
    }
}

pub(crate) fn g1_to_bytes(point: &G1Projective) -> [u8; G1_BYTES] {
    let mut out = [0u8; G1_BYTES];
    let affine = point.into_affine();
    if affine.is_zero() {
        return out;
    }
    out[0] = if fq_is_odd(&affine.y) {
        ODD_PREFIX
    } else {
        EVEN_PREFIX
    };
    out[1..].copy_from_slice(&fq_to_bytes(&affine.x));
    out
}

pub(crate) fn g1_from_bytes(bytes: &[u8; G1_BYTES]) -> Result<G1Projective, Error> {
    const GROUP: &str = "G1";
    if bytes.iter().all(|&b| b == 0) {
        return Ok(G1Projective::zero());
    }
    if bytes[0] != EVEN_PREFIX && bytes[0] != ODD_PREFIX {
        return Err(Error::InvalidPoint {
            group: GROUP,
            reason: "unknown compression prefix",
        });
    }
    let x = fq_from_bytes(&bytes[1..], GROUP)?;
    let mut point = G1Affine::get_point_from_x_unchecked(x, false).ok_or(Error::InvalidPoint {
        group: GROUP,
        reason: "x coordinate is not on the curve",
    })?;
    if fq_is_odd(&point.y) != (bytes[0] == ODD_PREFIX) {
        point = -point;
    }
    if !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(Error::InvalidPoint {
            group: GROUP,
            reason: "point is outside the prime-order subgroup",
        });
    }
    Ok(point.into_group())
}

pub(crate) fn g2_to_bytes(point: &G2Projective) -> [u8; G2_BYTES] {
    let mut out = [0u8; G2_BYTES];
    let affine = point.into_affine();
    if affine.is_zero() {
        return out;
    }
    out[0] = if fq2_is_odd(&affine.y) {
        ODD_PREFIX
    } else {
        EVEN_PREFIX
    };
    out[1..1 + FQ_BYTES].copy_from_slice(&fq_to_bytes(&affine.x.c0));
    out[1 + FQ_BYTES..].copy_from_slice(&fq_to_bytes(&affine.x.c1));
    out
}

pub(crate) fn g2_from_bytes(bytes: &[u8; G2_BYTES]) -> Result<G2Projective, Error> {
    const GROUP: &str = "G2";
    if bytes.iter().all(|&b| b == 0) {
        return Ok(G2Projective::zero());
    }
    if bytes[0] != EVEN_PREFIX && bytes[0] != ODD_PREFIX {
        return Err(Error::InvalidPoint {
            group: GROUP,
            reason: "unknown compression prefix",
        });
    }
    let c0 = fq_from_bytes(&bytes[1..1 + FQ_BYTES], GROUP)?;
    let c1 = fq_from_bytes(&bytes[1 + FQ_BYTES..], GROUP)?;
    let x = Fq2::new(c0, c1);
    let mut point = G2Affine::get_point_from_x_unchecked(x, false).ok_or(Error::InvalidPoint {
        group: GROUP,
        reason: "x coordinate is not on the curve",
    })?;
    if fq2_is_odd(&point.y) != (bytes[0] == ODD_PREFIX) {
        point = -point;
    }
    if !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(Error::InvalidPoint {
            group: GROUP,
            reason: "point is outside the prime-order subgroup",
        });
    }
    Ok(point.into_group())
}

/// Product of pairings `e(a_i, b_i)` with one shared final exponentiation.
pub(crate) fn pairing_product(g1: &[G1Projective], g2: &[G2Projective]) -> Fq12 {
    debug_assert_eq!(g1.len(), g2.len());
    let lhs = G1Projective::normalize_batch(g1);
    let rhs = G2Projective::normalize_batch(g2);
    let miller = Bls12_381::multi_miller_loop(lhs, rhs);
    Bls12_381::final_exponentiation(miller)
        .expect("final exponentiation of a Miller loop output")
        .0
}

pub(crate) fn gt_pow(base: &Fq12, exp: [u64; 4]) -> Fq12 {
    base.pow(exp)
}

pub(crate) fn gt_inverse(base: &Fq12) -> Fq12 {
    // target-group elements are roots of unity, never zero
    base.inverse().expect("inverse of a unit")
}

/// Dumps the twelve `Fq` coefficients of a target-group element, tower
/// order `c0.c0.c0` through `c1.c2.c1`, each 48 bytes big-endian.
pub(crate) fn gt_to_bytes(x: &Fq12) -> [u8; GT_BYTES] {
    let mut out = [0u8; GT_BYTES];
    let coeffs = [
        x.c0.c0.c0, x.c0.c0.c1, x.c0.c1.c0, x.c0.c1.c1, x.c0.c2.c0, x.c0.c2.c1, x.c1.c0.c0,
        x.c1.c0.c1, x.c1.c1.c0, x.c1.c1.c1, x.c1.c2.c0, x.c1.c2.c1,
    ];
    for (chunk, coeff) in out.chunks_exact_mut(FQ_BYTES).zip(coeffs.iter()) {
        chunk.copy_from_slice(&fq_to_bytes(coeff));
    }
    out
}

pub(crate) fn gt_from_bytes(bytes: &[u8; GT_BYTES]) -> Result<Fq12, Error> {
    const GROUP: &str = "GT";
    let mut coeffs = [Fq::zero(); 12];
    for (coeff, chunk) in coeffs.iter_mut().zip(bytes.chunks_exact(FQ_BYTES)) {
        *coeff = fq_from_bytes(chunk, GROUP)?;
    }
    Ok(Fq12::new(
        Fq6::new(
            Fq2::new(coeffs[0], coeffs[1]),
            Fq2::new(coeffs[2], coeffs[3]),
            Fq2::new(coeffs[4], coeffs[5]),
        ),
        Fq6::new(
            Fq2::new(coeffs[6], coeffs[7]),
            Fq2::new(coeffs[8], coeffs[9]),
            Fq2::new(coeffs[10], coeffs[11]),
        ),
    ))
}

/// Maps 64 bytes of digest output onto the curve: reduce into the base
/// field, walk `x` upward until it lifts to a point, pick the even-parity
/// lift, then clear the cofactor into the prime-order subgroup.
pub(crate) fn hash_to_g1(digest: &[u8; 64]) -> G1Projective {
    let mut x = Fq::from_be_bytes_mod_order(digest);
    loop {
        if let Some(mut point) = G1Affine::get_point_from_x_unchecked(x, false) {
            if fq_is_odd(&point.y) {
                point = -point;
            }
            return point.clear_cofactor().into_group();
        }
        x += Fq::one();
    }
}

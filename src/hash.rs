//! Transcript hashing into scalars and curve points.
//!
//! [`Hasher`] wraps BLAKE3 and absorbs any mix of engine values and raw
//! bytes through the [`Absorb`] trait. Finalization draws 64 bytes from
//! the extendable output, wide enough that reduction into the scalar field
//! or the base field stays statistically uniform.
//!
//! Pending exponentiations are forced before absorption so that a value
//! hashes the same whether or not it was ever materialized.

use tracing::instrument;

use crate::g1::G1Point;
use crate::g1::ScaledG1;
use crate::g2::{G2Point, ScaledG2};
use crate::gt::Gt;
use crate::scalar::Scalar;
use crate::wide::WideScalar;
use crate::backend::curve;

mod private {
    pub trait Sealed {}
}

/// A value with a canonical transcript encoding.
pub trait Absorb: private::Sealed {
    #[doc(hidden)]
    fn absorb_into(&self, inner: &mut blake3::Hasher);
}

/// Incremental transcript hasher.
#[derive(Clone, Debug, Default)]
pub struct Hasher {
    inner: blake3::Hasher,
}

impl Hasher {
    pub fn new() -> Hasher {
        Hasher::default()
    }

    /// Builder-style absorption, for one-liner transcripts.
    pub fn chain<T: Absorb + ?Sized>(mut self, value: &T) -> Hasher {
        self.absorb(value);
        self
    }

    pub fn absorb<T: Absorb + ?Sized>(&mut self, value: &T) {
        value.absorb_into(&mut self.inner);
    }

    /// 64 bytes of extendable output.
    pub fn finalize_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        self.inner.finalize_xof().fill(&mut out);
        out
    }

    /// Uniform scalar derived from the transcript.
    #[instrument(level = "trace", skip_all)]
    pub fn finalize_scalar(&self) -> Scalar {
        Scalar::from_wide_bytes(&self.finalize_bytes())
    }

    /// Transcript-derived point of `G1` with unknown discrete logarithm:
    /// the digest picks a base-field abscissa which is walked to the next
    /// curve point and pushed into the prime-order subgroup.
    #[instrument(level = "trace", skip_all)]
    pub fn finalize_g1(&self) -> G1Point {
        G1Point(curve::hash_to_g1(&self.finalize_bytes()))
    }
}

impl private::Sealed for u8 {}
impl Absorb for u8 {
    fn absorb_into(&self, inner: &mut blake3::Hasher) {
        inner.update(&[*self]);
    }
}

impl private::Sealed for u64 {}
impl Absorb for u64 {
    fn absorb_into(&self, inner: &mut blake3::Hasher) {
        inner.update(&self.to_be_bytes());
    }
}

impl private::Sealed for Scalar {}
impl Absorb for Scalar {
    fn absorb_into(&self, inner: &mut blake3::Hasher) {
        inner.update(&self.to_bytes());
    }
}

impl private::Sealed for WideScalar {}
impl Absorb for WideScalar {
    fn absorb_into(&self, inner: &mut blake3::Hasher) {
        inner.update(&self.normalize().to_bytes());
    }
}

impl private::Sealed for G1Point {}
impl Absorb for G1Point {
    fn absorb_into(&self, inner: &mut blake3::Hasher) {
        inner.update(&self.to_bytes());
    }
}

impl private::Sealed for G2Point {}
impl Absorb for G2Point {
    fn absorb_into(&self, inner: &mut blake3::Hasher) {
        inner.update(&self.to_bytes());
    }
}

impl private::Sealed for Gt {}
impl Absorb for Gt {
    fn absorb_into(&self, inner: &mut blake3::Hasher) {
        inner.update(&self.to_bytes());
    }
}

impl private::Sealed for ScaledG1<'_> {}
impl Absorb for ScaledG1<'_> {
    fn absorb_into(&self, inner: &mut blake3::Hasher) {
        inner.update(&self.clone().force().to_bytes());
    }
}

impl private::Sealed for ScaledG2<'_> {}
impl Absorb for ScaledG2<'_> {
    fn absorb_into(&self, inner: &mut blake3::Hasher) {
        inner.update(&self.clone().force().to_bytes());
    }
}

impl<T: Absorb> private::Sealed for [T] {}
impl<T: Absorb> Absorb for [T] {
    /// Length-prefixed so adjacent slices cannot alias each other.
    fn absorb_into(&self, inner: &mut blake3::Hasher) {
        inner.update(&(self.len() as u64).to_be_bytes());
        for item in self {
            item.absorb_into(inner);
        }
    }
}

impl<T: Absorb, const N: usize> private::Sealed for [T; N] {}
impl<T: Absorb, const N: usize> Absorb for [T; N] {
    fn absorb_into(&self, inner: &mut blake3::Hasher) {
        for item in self {
            item.absorb_into(inner);
        }
    }
}

impl<T: Absorb> private::Sealed for Vec<T> {}
impl<T: Absorb> Absorb for Vec<T> {
    fn absorb_into(&self, inner: &mut blake3::Hasher) {
        self.as_slice().absorb_into(inner);
    }
}

impl<T: Absorb + ?Sized> private::Sealed for &T {}
impl<T: Absorb + ?Sized> Absorb for &T {
    fn absorb_into(&self, inner: &mut blake3::Hasher) {
        (**self).absorb_into(inner);
    }
}

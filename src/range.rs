//! Interval arithmetic for limb range tags.
//!
//! Every redundant-limb value carries two [`LimbRange`] tags: one for the
//! head limb, one shared by all rest limbs. A tag counts **multiples of the
//! canonical per-limb bound** the limb is guaranteed to lie in, so a
//! canonical value is tagged `[0, 1]` (at least zero, below one bound).
//! Arithmetic on values maps to interval arithmetic on tags, and an
//! operation is allowed exactly when the resulting tag stays inside the
//! per-limb overflow envelope.

use core::ops::{Add, Mul, Neg, Sub};

/// A closed interval `[min, max]` of multiples of a canonical limb bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LimbRange {
    min: i64,
    max: i64,
}

/// Tag of a canonical (fully reduced) value: `0 <= limb < bound`.
pub(crate) const UNIT: LimbRange = LimbRange::new(0, 1);

impl LimbRange {
    pub(crate) const fn new(min: i64, max: i64) -> Self {
        LimbRange { min, max }
    }

    pub(crate) const fn max(self) -> i64 {
        self.max
    }

    /// Interval inclusion: does `self` cover every point of `inner`?
    pub(crate) fn contains(self, inner: LimbRange) -> bool {
        self.min <= inner.min && inner.max <= self.max
    }

    /// Smallest interval covering both operands.
    pub(crate) fn union(self, other: LimbRange) -> LimbRange {
        LimbRange::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Scale by an integer constant; negative constants flip the interval.
    pub(crate) fn scale(self, c: i64) -> LimbRange {
        if c < 0 {
            (-self).scale(-c)
        } else {
            LimbRange::new(self.min * c, self.max * c)
        }
    }

    /// Divide the interval by `2^bits`, rounding outward, for re-expressing
    /// a tag in units of a coarser limb bound.
    pub(crate) fn shrink(self, bits: u32) -> LimbRange {
        // min rounds toward -inf (arithmetic shift), max toward +inf
        LimbRange::new(self.min >> bits, -((-self.max) >> bits))
    }

    /// Largest absolute endpoint; decides which operand of a binary
    /// operation is cheaper to leave untouched.
    pub(crate) fn magnitude(self) -> i64 {
        self.min.abs().max(self.max.abs())
    }
}

impl Neg for LimbRange {
    type Output = LimbRange;

    fn neg(self) -> LimbRange {
        LimbRange::new(-self.max, -self.min)
    }
}

impl Add for LimbRange {
    type Output = LimbRange;

    fn add(self, rhs: LimbRange) -> LimbRange {
        LimbRange::new(self.min + rhs.min, self.max + rhs.max)
    }
}

impl Sub for LimbRange {
    type Output = LimbRange;

    fn sub(self, rhs: LimbRange) -> LimbRange {
        self + -rhs
    }
}

impl Mul for LimbRange {
    type Output = LimbRange;

    /// Tag of a limb-wise product: min/max over the four corner products.
    fn mul(self, rhs: LimbRange) -> LimbRange {
        let corners = [
            self.min * rhs.min,
            self.min * rhs.max,
            self.max * rhs.min,
            self.max * rhs.max,
        ];
        let mut min = corners[0];
        let mut max = corners[0];
        for &c in &corners[1..] {
            min = min.min(c);
            max = max.max(c);
        }
        LimbRange::new(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_addition_and_negation() {
        let a = LimbRange::new(0, 3);
        let b = LimbRange::new(-1, 2);
        assert_eq!(a + b, LimbRange::new(-1, 5));
        assert_eq!(-a, LimbRange::new(-3, 0));
        assert_eq!(a - b, LimbRange::new(-2, 4));
    }

    #[test]
    fn product_takes_corner_extremes() {
        let a = LimbRange::new(-2, 3);
        let b = LimbRange::new(-5, 4);
        // corners: 10, -8, -15, 12
        assert_eq!(a * b, LimbRange::new(-15, 12));
        assert_eq!(UNIT * UNIT, LimbRange::new(0, 1));
    }

    #[test]
    fn scaling_flips_on_negative_constants() {
        let a = LimbRange::new(0, 3);
        assert_eq!(a.scale(4), LimbRange::new(0, 12));
        assert_eq!(a.scale(-4), LimbRange::new(-12, 0));
        assert_eq!(a.scale(0), LimbRange::new(0, 0));
    }

    #[test]
    fn containment_and_union() {
        let env = LimbRange::new(-31, 31);
        assert!(env.contains(UNIT));
        assert!(env.contains(env));
        assert!(!env.contains(LimbRange::new(-31, 32)));
        assert_eq!(
            UNIT.union(LimbRange::new(-2, 0)),
            LimbRange::new(-2, 1)
        );
    }

    #[test]
    fn shrink_rounds_outward() {
        assert_eq!(LimbRange::new(0, 1).shrink(22), LimbRange::new(0, 1));
        assert_eq!(LimbRange::new(5, 9).shrink(2), LimbRange::new(1, 3));
        assert_eq!(LimbRange::new(-5, -1).shrink(2), LimbRange::new(-2, 0));
        assert_eq!(LimbRange::new(0, 4096).shrink(12), LimbRange::new(0, 1));
    }
}

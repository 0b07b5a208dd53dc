//! larc: deferred-reduction scalar and pairing arithmetic over BLS12-381.
//!
//! # Overview
//!
//! larc is an arithmetic engine for pairing-based protocols (anonymous
//! credentials, threshold signatures, secret sharing). Its distinguishing
//! feature is that expensive normalization work is deferred and batched:
//!
//! - [`Scalar`] keeps field elements in redundant radix-2^58 limbs with
//!   runtime range tags; chains of additions, subtractions and small
//!   scalings run limb-wise and share one modular reduction.
//! - [`WideScalar`] accumulates unreduced double-width products, so inner
//!   products and Lagrange combinations also reduce exactly once.
//! - [`G1Point::pow`] and [`G2Point::pow`] return pending exponentiations
//!   ([`ScaledG1`], [`ScaledG2`]); adjacent pairs are fused into a single
//!   two-point multi-scalar pass.
//! - [`pair`] returns a [`PendingPairing`]; products and comparisons of
//!   pending pairings share one multi-Miller loop and one final
//!   exponentiation.
//!
//! Laziness is invisible in results: forcing is automatic at comparisons,
//! serialization and hashing, and every deferred form evaluates to the
//! same canonical value as its eager counterpart.
//!
//! # Architecture
//!
//! - [`scalar`] / [`wide`] — the deferred field representation and its
//!   double-width accumulator, steered by the range tags in `range`.
//! - [`g1`] / [`g2`] / [`gt`] — the three pairing groups, written
//!   multiplicatively, with lazy exponentiation and pairing fusion.
//! - [`hash`] — BLAKE3 transcript hashing into scalars and `G1` points.
//! - [`random`] — a seedable ChaCha20 randomness engine.
//! - [`bytes`] / `serde_impl` — fixed-width wire encodings (48-byte
//!   scalars, 49-byte `G1`, 97-byte `G2`, 576-byte `GT`), composite
//!   buffers, and serde support on top of them.
//! - `backend` — radix-2^58 big-integer primitives and the arkworks
//!   BLS12-381 bindings everything above compiles down to.
//!
//! # Quick Example
//!
//! ```rust
//! use larc::{pair, G1Point, G2Point, RandomEngine, Scalar};
//!
//! let mut rng = RandomEngine::from_seed(b"test-seed");
//! let x = Scalar::random(&mut rng);
//!
//! let g1 = G1Point::generator();
//! let g2 = G2Point::generator();
//!
//! // e(g1^x, g2) == e(g1, g2^x); the comparison runs one fused
//! // double Miller loop and never materializes either side.
//! assert_eq!(pair(g1.pow(x), &g2), pair(&g1, g2.pow(x)));
//!
//! // sums of scalars reduce once at the end
//! let xs: Vec<Scalar> = (0..100).map(|_| Scalar::random(&mut rng)).collect();
//! let sum: Scalar = xs.iter().sum();
//! assert_eq!(sum.to_bytes().len(), 48);
//! ```

mod backend;
pub mod bytes;
pub mod errors;
pub mod g1;
pub mod g2;
pub mod gt;
pub mod hash;
pub mod random;
mod range;
pub mod scalar;
mod serde_impl;
pub mod wide;

pub use bytes::{Encoded, Reader, Writer};
pub use errors::Error;
pub use g1::{G1Point, ScaledG1, G1_BYTES};
pub use g2::{G2Point, ScaledG2, G2_BYTES};
pub use gt::{pair, Gt, IntoG1Operand, IntoG2Operand, PendingPairing, GT_BYTES};
pub use hash::{Absorb, Hasher};
pub use random::RandomEngine;
pub use scalar::{Scalar, SCALAR_BYTES};
pub use wide::WideScalar;

//! Low-level arithmetic backends.
//!
//! [`bigint`] holds the radix-2^58 signed-limb machinery the deferred
//! scalar representation is built on; [`curve`] wraps the arkworks
//! BLS12-381 groups and owns the fixed-width wire formats.

pub(crate) mod bigint;
pub(crate) mod curve;

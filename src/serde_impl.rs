//! Serde support for the element types.
//!
//! Elements serialize as their fixed-width byte encodings, so the serde
//! form matches the wire form byte for byte and deserialization inherits
//! the full validation of the `from_bytes` parsers. The double-width
//! accumulator is intentionally not serializable; normalize it first.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::g1::G1Point;
use crate::g2::G2Point;
use crate::gt::Gt;
use crate::scalar::Scalar;

macro_rules! impl_serde_bytes {
    ($ty:ty, $size:expr, $name:literal) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_bytes(&self.to_bytes())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let bytes = Vec::<u8>::deserialize(deserializer)?;
                let array: [u8; $size] = bytes.as_slice().try_into().map_err(|_| {
                    D::Error::custom(concat!($name, " encoding has the wrong length"))
                })?;
                <$ty>::from_bytes(&array).map_err(D::Error::custom)
            }
        }
    };
}

impl_serde_bytes!(Scalar, crate::scalar::SCALAR_BYTES, "scalar");
impl_serde_bytes!(G1Point, crate::g1::G1_BYTES, "G1");
impl_serde_bytes!(G2Point, crate::g2::G2_BYTES, "G2");
impl_serde_bytes!(Gt, crate::gt::GT_BYTES, "GT");

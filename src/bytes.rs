//! Fixed-width composite buffers.
//!
//! Every engine element has a fixed serialized width, so composite
//! messages are plain concatenations: [`Writer`] appends elements,
//! [`Reader`] takes them back in order and verifies that the buffer is
//! consumed exactly. The [`Encoded`] trait ties each element type to its
//! width.

use crate::errors::Error;
use crate::g1::{G1Point, G1_BYTES};
use crate::g2::{G2Point, G2_BYTES};
use crate::gt::{Gt, GT_BYTES};
use crate::scalar::{Scalar, SCALAR_BYTES};

mod private {
    pub trait Sealed {}
}

/// An element with a fixed-width byte encoding.
pub trait Encoded: Sized + private::Sealed {
    /// Serialized width in bytes.
    const SIZE: usize;

    fn write_to(&self, buf: &mut Vec<u8>);

    /// Parses from a slice of exactly [`Encoded::SIZE`] bytes.
    fn read_from(bytes: &[u8]) -> Result<Self, Error>;
}

impl private::Sealed for Scalar {}
impl Encoded for Scalar {
    const SIZE: usize = SCALAR_BYTES;

    fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_bytes());
    }

    fn read_from(bytes: &[u8]) -> Result<Scalar, Error> {
        Scalar::from_bytes(bytes.try_into().expect("sized slice"))
    }
}

impl private::Sealed for G1Point {}
impl Encoded for G1Point {
    const SIZE: usize = G1_BYTES;

    fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_bytes());
    }

    fn read_from(bytes: &[u8]) -> Result<G1Point, Error> {
        G1Point::from_bytes(bytes.try_into().expect("sized slice"))
    }
}

impl private::Sealed for G2Point {}
impl Encoded for G2Point {
    const SIZE: usize = G2_BYTES;

    fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_bytes());
    }

    fn read_from(bytes: &[u8]) -> Result<G2Point, Error> {
        G2Point::from_bytes(bytes.try_into().expect("sized slice"))
    }
}

impl private::Sealed for Gt {}
impl Encoded for Gt {
    const SIZE: usize = GT_BYTES;

    fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_bytes());
    }

    fn read_from(bytes: &[u8]) -> Result<Gt, Error> {
        Gt::from_bytes(bytes.try_into().expect("sized slice"))
    }
}

/// Serializer for sequences of fixed-width elements.
#[derive(Clone, Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Writer {
        Writer::default()
    }

    pub fn append<T: Encoded>(&mut self, value: &T) -> &mut Writer {
        value.write_to(&mut self.buf);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a buffer written by [`Writer`].
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Reader<'a> {
        Reader { buf, pos: 0 }
    }

    /// Reads the next element, advancing the cursor by its width.
    pub fn take<T: Encoded>(&mut self) -> Result<T, Error> {
        let end = self.pos + T::SIZE;
        if end > self.buf.len() {
            return Err(Error::LengthMismatch {
                expected: end,
                actual: self.buf.len(),
            });
        }
        let value = T::read_from(&self.buf[self.pos..end])?;
        self.pos = end;
        Ok(value)
    }

    /// Succeeds only if the whole buffer has been consumed; trailing bytes
    /// are as much a framing error as missing ones.
    pub fn finish(self) -> Result<(), Error> {
        if self.pos != self.buf.len() {
            return Err(Error::LengthMismatch {
                expected: self.pos,
                actual: self.buf.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn heterogeneous_round_trip() {
        let mut rng = StdRng::seed_from_u64(107);
        let x = Scalar::random(&mut rng);
        let p = G1Point::random(&mut rng).force();
        let q = G2Point::random(&mut rng).force();

        let mut writer = Writer::new();
        writer.append(&x).append(&p).append(&q);
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), SCALAR_BYTES + G1_BYTES + G2_BYTES);

        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.take::<Scalar>().expect("scalar"), x);
        assert_eq!(reader.take::<G1Point>().expect("g1"), p);
        assert_eq!(reader.take::<G2Point>().expect("g2"), q);
        reader.finish().expect("fully consumed");
    }

    #[test]
    fn truncated_buffer_is_rejected() {
        let mut writer = Writer::new();
        writer.append(&Scalar::one());
        let mut bytes = writer.into_bytes();
        bytes.pop();

        let mut reader = Reader::new(&bytes);
        assert_eq!(
            reader.take::<Scalar>(),
            Err(Error::LengthMismatch {
                expected: SCALAR_BYTES,
                actual: SCALAR_BYTES - 1,
            })
        );
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut writer = Writer::new();
        writer.append(&Scalar::one());
        let mut bytes = writer.into_bytes();
        bytes.push(0);

        let mut reader = Reader::new(&bytes);
        reader.take::<Scalar>().expect("scalar");
        assert!(reader.finish().is_err());
    }
}

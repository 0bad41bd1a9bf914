//! Unsigned integers.
//!
//! The only integer in a Basic Constraints extension is the path length
//! constraint which is declared as `INTEGER (0..MAX)`. So this module only
//! deals with non-negative integers.

use std::io;
use bytes::Bytes;
use smallvec::SmallVec;
use crate::decode::{Constructed, DecodeError, Pos, Primitive, Source};
use crate::encode::PrimitiveContent;
use crate::tag::Tag;


//------------ Unsigned ------------------------------------------------------

/// A DER encoded unsigned integer.
///
/// As integers are variable length, this type is just a simple wrapper atop
/// the underlying `Bytes` value containing the raw content. It guarantees
/// that the wrapped integer is greater or equal to 0 and that it is encoded
/// in the smallest possible number of octets.
///
/// If the range of a native type is enough, you can also decode straight
/// into it via [`u32_from_primitive`][Self::u32_from_primitive].
///
/// # Encoding
///
/// An INTEGER is encoded as a primitive value with the content octets
/// providing a variable-length, big-endian, two’s complement byte sequence of
/// that integer. Thus, the most-significant bit of the first octet serves as
/// the sign bit and, for an unsigned integer, has to be unset.
///
/// Both BER and DER require the shortest possible encoding: the first nine
/// bits of a multi-octet integer must not all be the same.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Unsigned(Bytes);

/// # Decoding
impl Unsigned {
    /// Takes a mandatory unsigned integer from a constructed value.
    pub fn take_from<S: Source>(
        cons: &mut Constructed<S>
    ) -> Result<Self, DecodeError> {
        cons.take_primitive_if(Tag::INTEGER, Self::from_primitive)
    }

    /// Takes an optional unsigned integer from a constructed value.
    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>
    ) -> Result<Option<Self>, DecodeError> {
        cons.take_opt_primitive_if(Tag::INTEGER, Self::from_primitive)
    }

    /// Decodes the content of a primitive value.
    pub fn from_primitive<S: Source>(
        prim: &mut Primitive<S>
    ) -> Result<Self, DecodeError> {
        let start = prim.pos();
        let content = prim.take_all()?;
        Self::check_head(&content, start)?;
        Ok(Unsigned(content))
    }

    /// Decodes the content of a primitive value into a `u32`.
    ///
    /// Values that are well-formed but too large for a `u32` result in a
    /// malformed error.
    pub fn u32_from_primitive<S: Source>(
        prim: &mut Primitive<S>
    ) -> Result<u32, DecodeError> {
        let start = prim.pos();
        let res = Self::from_primitive(prim)?;
        match res.to_u32() {
            Some(res) => Ok(res),
            None => Err(DecodeError::malformed(
                "integer out of range", start
            ))
        }
    }

    /// Checks that the content octets of an unsigned integer are valid.
    ///
    /// There has to be at least one octet, the first nine bits must not all
    /// be the same, and the sign bit must not be set.
    fn check_head(content: &[u8], pos: Pos) -> Result<(), DecodeError> {
        match (content.first(), content.get(1).map(|x| x & 0x80 != 0)) {
            (None, _) => {
                Err(DecodeError::malformed("empty integer", pos))
            }
            (Some(0), Some(false)) | (Some(0xFF), Some(true)) => {
                Err(DecodeError::malformed("non-minimal integer", pos))
            }
            (Some(first), _) if first & 0x80 != 0 => {
                Err(DecodeError::malformed(
                    "negative value for unsigned integer", pos
                ))
            }
            _ => Ok(())
        }
    }
}

/// # Access to the Value
impl Unsigned {
    /// Returns the content octets.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Converts the value into a `u32` if it fits.
    pub fn to_u32(&self) -> Option<u32> {
        let octets = match self.0.split_first() {
            // A leading zero only ever makes room for the sign bit.
            Some((0, tail)) if !tail.is_empty() => tail,
            _ => self.0.as_ref(),
        };
        if octets.len() > 4 {
            return None
        }
        Some(octets.iter().fold(0u32, |res, &octet| {
            (res << 8) | u32::from(octet)
        }))
    }
}


//--- From

impl From<u32> for Unsigned {
    fn from(n: u32) -> Self {
        Unsigned(Bytes::copy_from_slice(&u32_octets(n)))
    }
}


//--- PrimitiveContent

impl PrimitiveContent for Unsigned {
    const TAG: Tag = Tag::INTEGER;

    fn encoded_len(&self) -> usize {
        self.0.len()
    }

    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(self.0.as_ref())
    }
}

impl PrimitiveContent for u32 {
    const TAG: Tag = Tag::INTEGER;

    fn encoded_len(&self) -> usize {
        u32_octets(*self).len()
    }

    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(&u32_octets(*self))
    }
}


//------------ Helper Functions ----------------------------------------------

/// Returns the minimal content octets of a non-negative integer.
///
/// A zero octet is prepended if the most significant bit of the first
/// octet would otherwise be set.
fn u32_octets(n: u32) -> SmallVec<[u8; 5]> {
    let octets = n.to_be_bytes();
    let start = octets.iter().position(|&x| x != 0).unwrap_or(3);
    let mut res = SmallVec::new();
    if octets[start] & 0x80 != 0 {
        res.push(0);
    }
    res.extend_from_slice(&octets[start..]);
    res
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::{DecodeError, SliceSource};
    use crate::encode::Values;
    use crate::mode::Mode;
    use super::*;

    fn u32_from(data: &[u8], mode: Mode) -> Result<u32, DecodeError> {
        mode.decode(SliceSource::new(data), |cons| {
            cons.take_primitive_if(Tag::INTEGER, Unsigned::u32_from_primitive)
        })
    }

    #[test]
    fn decode_u32() {
        for mode in [Mode::Ber, Mode::Der] {
            assert_eq!(u32_from(b"\x02\x01\x00", mode).unwrap(), 0);
            assert_eq!(u32_from(b"\x02\x01\x12", mode).unwrap(), 0x12);
            assert_eq!(u32_from(b"\x02\x01\x7f", mode).unwrap(), 0x7f);
            assert_eq!(u32_from(b"\x02\x02\x00\x80", mode).unwrap(), 0x80);
            assert_eq!(
                u32_from(b"\x02\x02\x12\x34", mode).unwrap(), 0x1234
            );
            assert_eq!(
                u32_from(b"\x02\x04\x7f\xff\xff\xff", mode).unwrap(),
                0x7fff_ffff
            );
            assert_eq!(
                u32_from(b"\x02\x05\x00\xff\xff\xff\xff", mode).unwrap(),
                u32::MAX
            );

            // Empty.
            assert!(u32_from(b"\x02\x00", mode).is_err());
            // Negative.
            assert!(u32_from(b"\x02\x01\x80", mode).is_err());
            assert!(u32_from(b"\x02\x01\xff", mode).is_err());
            // Redundant leading octets.
            assert!(u32_from(b"\x02\x02\x00\x05", mode).is_err());
            assert!(u32_from(b"\x02\x02\xff\x80", mode).is_err());
            // Too large.
            assert!(u32_from(b"\x02\x05\x01\x00\x00\x00\x00", mode).is_err());
            // Constructed.
            assert!(u32_from(b"\x22\x03\x02\x01\x00", mode).is_err());
        }
    }

    #[test]
    fn take_opt_from() {
        let res = Mode::Der.decode(
            SliceSource::new(b"\x01\x01\xff"), |cons| {
                let int = Unsigned::take_opt_from(cons)?;
                cons.take_bool()?;
                Ok(int)
            }
        ).unwrap();
        assert_eq!(res, None);
    }

    #[test]
    fn encode_u32() {
        fn step(n: u32, content: &[u8]) {
            assert_eq!(n.to_encoded_bytes().as_ref(), content);
            assert_eq!(Unsigned::from(n).as_slice(), content);
            assert_eq!(Unsigned::from(n).to_u32(), Some(n));
            let mut encoded = vec![0x02, content.len() as u8];
            encoded.extend_from_slice(content);
            assert_eq!(n.encode().to_vec(), encoded);
        }

        step(0, b"\x00");
        step(3, b"\x03");
        step(0x7f, b"\x7f");
        step(0x80, b"\x00\x80");
        step(0x1234, b"\x12\x34");
        step(0x7fff_ffff, b"\x7f\xff\xff\xff");
        step(u32::MAX, b"\x00\xff\xff\xff\xff");
    }
}

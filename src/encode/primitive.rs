//! Encoding of primitive values.
//!
//! This is an internal module. Its public types are re-exported by the
//! parent.

use std::io;
use bytes::Bytes;
use crate::tag::Tag;
use super::values::{Values, total_encoded_len, write_header};


//------------ PrimitiveContent ----------------------------------------------

/// A type that is encoded as a primitive value.
///
/// This trait should be implemented for types that use primitive encoding.
/// It defines, how the content octets of a single primitive value containing
/// a value of the type are to be created. As a consequence, these types
/// gain the [`encode`][Self::encode] and [`encode_as`][Self::encode_as]
/// methods from their implementation of this trait.
///
/// Since the content is always produced in DER, there is no mode argument
/// to any of the methods.
pub trait PrimitiveContent: Sized {
    /// The natural tag of an encoded value of this type.
    const TAG: Tag;

    /// The length of the encoded content.
    fn encoded_len(&self) -> usize;

    /// Writes the encoded content to a writer.
    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error>;

    /// Encodes the content to bytes.
    fn to_encoded_bytes(&self) -> Bytes {
        let mut target = Vec::with_capacity(self.encoded_len());
        match self.write_encoded(&mut target) {
            Ok(()) => target.into(),
            Err(err) => unreachable!("writing to a vec failed: {}", err)
        }
    }

    /// Returns a value encoder for this content using the natural tag.
    fn encode(self) -> Primitive<Self> {
        self.encode_as(Self::TAG)
    }

    /// Returns a value encoder for this content using the given tag.
    fn encode_as(self, tag: Tag) -> Primitive<Self> {
        Primitive { tag, prim: self }
    }
}


//--- Native types

impl PrimitiveContent for bool {
    const TAG: Tag = Tag::BOOLEAN;

    fn encoded_len(&self) -> usize {
        1
    }

    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(if *self { &[0xFF] } else { &[0] })
    }
}

/// Raw octets encode as an OCTET STRING.
impl PrimitiveContent for &'_ [u8] {
    const TAG: Tag = Tag::OCTET_STRING;

    fn encoded_len(&self) -> usize {
        self.len()
    }

    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(self)
    }
}


//------------ Primitive -----------------------------------------------------

/// A value encoder for primitively encoded types.
///
/// This type is returned by [`PrimitiveContent::encode`] and
/// [`PrimitiveContent::encode_as`].
#[derive(Clone, Debug)]
pub struct Primitive<P> {
    /// The tag for this value.
    tag: Tag,

    /// The primitive content.
    prim: P
}

impl<P: PrimitiveContent> Values for Primitive<P> {
    fn encoded_len(&self) -> usize {
        total_encoded_len(self.tag, self.prim.encoded_len())
    }

    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error> {
        write_header(target, self.tag, false, self.prim.encoded_len())?;
        self.prim.write_encoded(target)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_bool() {
        assert_eq!(true.encode().to_vec(), b"\x01\x01\xff");
        assert_eq!(false.encode().to_vec(), b"\x01\x01\x00");
        assert_eq!(true.to_encoded_bytes().as_ref(), b"\xff");
    }

    #[test]
    fn encode_octets() {
        assert_eq!(b"ab".as_ref().encode().to_vec(), b"\x04\x02ab");
        assert_eq!(
            b"".as_ref().encode_as(Tag::NULL).to_vec(),
            b"\x05\x00"
        );
    }
}

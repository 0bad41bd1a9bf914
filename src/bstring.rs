//! Bit strings.

use std::io;
use bytes::Bytes;
use crate::decode::{Constructed, Content, DecodeError, Source};
use crate::encode::PrimitiveContent;
use crate::tag::Tag;


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike OCTET STRINGs, they do not
/// need to contain a multiple of eight bits. They are used by the legacy
/// form of the Basic Constraints extension to carry the subject type as a
/// set of named bits.
///
/// There are two types of methods for accessing the data in a bit string.
/// Methods starting with `bit` operate on the individual bits while those
/// prefixed with `octet` access entire octets and ignore the fact that there
/// may be unused bits in the final octet.
///
/// # Encoding
///
/// The first octet of the content contains the number of unused bits in the
/// last octet and the following octets contain the bits with the first bit
/// in the most significant bit of the octet. If there are no bits at all,
/// the number of unused bits has to be zero. With DER, the unused bits
/// themselves have to be zero, too.
///
/// BER also allows a constructed form which this type does not implement.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BitString {
    /// The number of unused bits in the last byte.
    unused: u8,

    /// The bytes of the bit string.
    bits: Bytes,
}

impl BitString {
    /// Creates a new bit string.
    ///
    /// Returns `None` if `unused` is larger than seven or if there are
    /// unused bits but no octets.
    pub fn new(unused: u8, bits: Bytes) -> Option<Self> {
        if unused > 7 || (bits.is_empty() && unused != 0) {
            None
        }
        else {
            Some(BitString { unused, bits })
        }
    }

    /// Returns the value of the given bit.
    ///
    /// Bits beyond the end of the string, including the unused bits of the
    /// last octet, are always unset.
    pub fn bit(&self, bit: usize) -> bool {
        if bit >= self.bit_len() {
            return false
        }
        match self.bits.get(bit >> 3) {
            Some(octet) => octet & (0x80 >> (bit & 7)) != 0,
            None => false
        }
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        (self.bits.len() << 3) - usize::from(self.unused)
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the number of octets in the bit string.
    pub fn octet_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns a slice of the octets in the bit string if available.
    pub fn octet_slice(&self) -> &[u8] {
        self.bits.as_ref()
    }
}

/// # Decoding
impl BitString {
    /// Takes a single bit string value from constructed content.
    pub fn take_from<S: Source>(
        cons: &mut Constructed<S>
    ) -> Result<Self, DecodeError> {
        cons.take_value_if(Tag::BIT_STRING, Self::from_content)
    }

    /// Takes an optional bit string value from constructed content.
    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>
    ) -> Result<Option<Self>, DecodeError> {
        cons.take_opt_value_if(Tag::BIT_STRING, Self::from_content)
    }

    /// Parses the content octets of a bit string value.
    pub fn from_content<S: Source>(
        content: &mut Content<S>
    ) -> Result<Self, DecodeError> {
        let mode = content.mode();
        let prim = match content {
            Content::Primitive(prim) => prim,
            Content::Constructed(inner) => {
                return Err(DecodeError::unimplemented(
                    "constructed bit string", inner.pos()
                ))
            }
        };
        let start = prim.pos();
        let unused = match prim.remaining() {
            0 => return Err(prim.content_err("empty bit string")),
            _ => prim.take_u8()?
        };
        let bits = prim.take_all()?;
        let last = match bits.last() {
            Some(last) => *last,
            None if unused == 0 => return Ok(BitString { unused, bits }),
            None => {
                return Err(DecodeError::malformed(
                    "unused bits in empty bit string", start
                ))
            }
        };
        if unused > 7 {
            return Err(DecodeError::malformed(
                "invalid number of unused bits", start
            ))
        }
        if mode.is_restricted() && last & ((1u8 << unused) - 1) != 0 {
            return Err(DecodeError::malformed(
                "unused bits not zero in DER", start
            ))
        }
        Ok(BitString { unused, bits })
    }
}


//--- PrimitiveContent

impl PrimitiveContent for &'_ BitString {
    const TAG: Tag = Tag::BIT_STRING;

    fn encoded_len(&self) -> usize {
        self.bits.len() + 1
    }

    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(&[self.unused])?;
        target.write_all(self.bits.as_ref())
    }
}


//============ Tests =========================================================

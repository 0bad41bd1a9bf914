//! The identifier octets of an encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, io};
use crate::decode::{DecodeError, Source};


//------------ Tag -----------------------------------------------------------

/// The tag of an encoded value.
///
/// Each encoded value starts with a sequence of one or more octets called
/// the _identifier octets._ They encode both the tag of the value as well as
/// whether the value uses primitive or constructed encoding. The `Tag` type
/// represents the tag only. The distinction between primitive and
/// constructed encoding is captured by the decoder types
/// [`Primitive`][crate::decode::Primitive] and
/// [`Constructed`][crate::decode::Constructed] instead.
///
/// # Limitations
///
/// We can only decode up to four identifier octets. That is, we only support
/// tag numbers between 0 and 0x1f_ffff. Anything larger results in an
/// unimplemented error.
//
//  The tag is stored as the identifier octets with the constructed bit
//  always cleared.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Tag([u8; 4]);

impl Tag {
    /// The mask for checking the class.
    const CLASS_MASK: u8 = 0xc0;

    /// The mask for checking whether the value is constructed.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The bits of the first octet marking a multi-octet tag number.
    const SINGLEBYTE_DATA_MASK: u8 = 0x1f;

    /// The bits of subsequent octets carrying tag number data.
    const MULTIBYTE_DATA_MASK: u8 = 0x7f;

    /// The bit marking that more identifier octets follow.
    const LAST_OCTET_MASK: u8 = 0x80;

    /// The maximum number of identifier octets we support.
    const MAX_LEN: usize = 4;

    /// The class value of the ‘universal’ class.
    const UNIVERSAL: u8 = 0x00;

    /// The class value of the ‘application’ class.
    const APPLICATION: u8 = 0x40;

    /// The class value of the ‘context-specific’ class.
    const CONTEXT_SPECIFIC: u8 = 0x80;

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Tag([1, 0, 0, 0]);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Tag([2, 0, 0, 0]);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Tag([3, 0, 0, 0]);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Tag([4, 0, 0, 0]);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Tag([5, 0, 0, 0]);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Tag([6, 0, 0, 0]);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Tag([16, 0, 0, 0]);
}

impl Tag {
    /// Returns the number of the tag.
    pub fn number(self) -> u32 {
        if (Tag::SINGLEBYTE_DATA_MASK & self.0[0])
            != Tag::SINGLEBYTE_DATA_MASK
        {
            return u32::from(Tag::SINGLEBYTE_DATA_MASK & self.0[0])
        }
        let mut res = 0;
        for &octet in &self.0[1..] {
            res = (res << 7) | u32::from(octet & Tag::MULTIBYTE_DATA_MASK);
            if octet & Tag::LAST_OCTET_MASK == 0 {
                break
            }
        }
        res
    }

    /// Looks at the identifier octets at the start of a source.
    ///
    /// Returns the tag, whether the value is constructed, and the number of
    /// identifier octets. Returns `Ok(None)` if the source is empty. Nothing
    /// is consumed.
    fn peek<S: Source>(
        source: &mut S
    ) -> Result<Option<(Self, bool, usize)>, DecodeError> {
        source.request(Tag::MAX_LEN);
        let slice = source.slice();
        let first = match slice.first() {
            Some(first) => *first,
            None => return Ok(None)
        };
        let constructed = first & Tag::CONSTRUCTED_MASK != 0;
        let mut data = [first & !Tag::CONSTRUCTED_MASK, 0, 0, 0];
        if (data[0] & Tag::SINGLEBYTE_DATA_MASK)
            != Tag::SINGLEBYTE_DATA_MASK
        {
            return Ok(Some((Tag(data), constructed, 1)))
        }
        for (i, item) in data.iter_mut().enumerate().skip(1) {
            let octet = match slice.get(i) {
                Some(octet) => *octet,
                None => {
                    return Err(source.content_err("unexpected end of data"))
                }
            };
            *item = octet;
            if octet & Tag::LAST_OCTET_MASK == 0 {
                return Ok(Some((Tag(data), constructed, i + 1)))
            }
        }
        Err(DecodeError::unimplemented("tag number too large", source.pos()))
    }

    /// Takes a tag from the beginning of a source.
    ///
    /// Upon success, returns both the tag and whether the value is
    /// constructed. If there are no more octets available in the source,
    /// an error is returned.
    pub fn take_from<S: Source>(
        source: &mut S,
    ) -> Result<(Self, bool), DecodeError> {
        match Self::take_opt_from(source)? {
            Some(res) => Ok(res),
            None => Err(source.content_err("unexpected end of data"))
        }
    }

    /// Takes a tag from the beginning of a source if there is one.
    ///
    /// Returns `Ok(None)` if the source is empty.
    pub fn take_opt_from<S: Source>(
        source: &mut S,
    ) -> Result<Option<(Self, bool)>, DecodeError> {
        match Self::peek(source)? {
            Some((tag, constructed, len)) => {
                source.advance(len)?;
                Ok(Some((tag, constructed)))
            }
            None => Ok(None)
        }
    }

    /// Takes a tag from the beginning of a source if it matches this tag.
    ///
    /// If there is no more data available in the source or if the tag is
    /// something else, returns `Ok(None)` and consumes nothing. If the tag
    /// matches `self`, returns whether the value is constructed.
    pub fn take_from_if<S: Source>(
        self,
        source: &mut S,
    ) -> Result<Option<bool>, DecodeError> {
        match Self::peek(source)? {
            Some((tag, constructed, len)) if tag == self => {
                source.advance(len)?;
                Ok(Some(constructed))
            }
            _ => Ok(None)
        }
    }

    /// Returns the number of octets of the encoded form of the tag.
    pub fn encoded_len(self) -> usize {
        if (Tag::SINGLEBYTE_DATA_MASK & self.0[0])
            != Tag::SINGLEBYTE_DATA_MASK
        {
            return 1
        }
        self.0[1..].iter().position(|octet| {
            octet & Tag::LAST_OCTET_MASK == 0
        }).map(|idx| idx + 2).unwrap_or(Tag::MAX_LEN)
    }

    /// Encodes the tag into a target.
    ///
    /// If `constructed` is `true`, the encoded tag will signal a value in
    /// constructed encoding and primitive encoding otherwise.
    pub fn write_encoded<W: io::Write>(
        self,
        constructed: bool,
        target: &mut W
    ) -> Result<(), io::Error> {
        let mut buf = self.0;
        if constructed {
            buf[0] |= Tag::CONSTRUCTED_MASK
        }
        target.write_all(&buf[..self.encoded_len()])
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::BOOLEAN => f.write_str("BOOLEAN"),
            Tag::INTEGER => f.write_str("INTEGER"),
            Tag::BIT_STRING => f.write_str("BIT STRING"),
            Tag::OCTET_STRING => f.write_str("OCTET STRING"),
            Tag::NULL => f.write_str("NULL"),
            Tag::OID => f.write_str("OBJECT IDENTIFIER"),
            Tag::SEQUENCE => f.write_str("SEQUENCE"),
            tag => {
                match tag.0[0] & Tag::CLASS_MASK {
                    Tag::UNIVERSAL => f.write_str("[UNIVERSAL ")?,
                    Tag::APPLICATION => f.write_str("[APPLICATION ")?,
                    Tag::CONTEXT_SPECIFIC => f.write_str("[")?,
                    _ => f.write_str("[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number())
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//============ Tests =========================================================

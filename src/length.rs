//! The length octets.
//!
//! This is a private module. The [`Length`] defined herein is not
//! publicly exposed.

use std::io;
use crate::mode::Mode;
use crate::decode::{DecodeError, Source};


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-value marker.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets.
///
/// Under DER, a definite length must be encoded in the minimum number of
/// octets and the indefinite form is not allowed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Length {
    /// A length value in definite form.
    Definite(usize),

    /// A length value in indefinite form.
    Indefinite,
}

impl Length {
    /// Takes a length value from the beginning of a source.
    pub fn take_from<S: Source>(
        source: &mut S,
        mode: Mode,
    ) -> Result<Self, DecodeError> {
        match source.take_u8()? {
            // Bit 7 clear: other bits are the length
            n if (n & 0x80) == 0 => Ok(Length::Definite(n as usize)),

            // Bit 7 set: other bits are the number of octets that
            // encode the length. Unless they are all 0, in which case this
            // is the indefinite form.
            0x80 => {
                if mode.is_restricted() {
                    Err(source.content_err("indefinite length in DER"))
                }
                else {
                    Ok(Length::Indefinite)
                }
            }

            // 0xFF is reserved.
            0xFF => Err(source.content_err("illegal length octets")),

            n => {
                let count = (n & 0x7F) as usize;
                let first = source.take_u8()?;
                if mode.is_restricted()
                    && (first == 0 || (count == 1 && first < 0x80))
                {
                    return Err(source.content_err(
                        "non-minimal length in DER"
                    ))
                }
                let mut len = first as usize;
                for _ in 1..count {
                    if len > (usize::MAX >> 8) {
                        return Err(DecodeError::unimplemented(
                            "excessive length", source.pos()
                        ))
                    }
                    len = (len << 8) | (source.take_u8()? as usize);
                }
                Ok(Length::Definite(len))
            }
        }
    }

    /// Returns the length if it is definite.
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    /// Returns the number of octets of the encoded form of the length.
    pub fn encoded_len(self) -> usize {
        match self {
            Length::Indefinite => 1,
            Length::Definite(len) => {
                if len > 0x7F {
                    Self::start_idx(len).map(|idx| {
                        std::mem::size_of::<usize>() - idx + 1
                    }).unwrap_or(1)
                }
                else {
                    1
                }
            }
        }
    }

    /// Writes the encoded length to a target.
    pub fn write_encoded<W: io::Write>(
        self,
        target: &mut W
    ) -> Result<(), io::Error> {
        match self {
            Length::Indefinite => target.write_all(b"\x80"),
            Length::Definite(len) => {
                match Self::start_idx(len) {
                    Some(idx) if len > 0x7F => {
                        let octets = len.to_be_bytes();
                        let tail = octets.get(idx..).unwrap_or_default();
                        target.write_all(&[0x80 | tail.len() as u8])?;
                        target.write_all(tail)
                    }
                    _ => target.write_all(&[len as u8])
                }
            }
        }
    }

    /// Returns the index of the first non-zero octet of `len`.
    ///
    /// Returns `None` if `len` is zero.
    fn start_idx(len: usize) -> Option<usize> {
        len.to_be_bytes().iter().position(|&octet| octet != 0)
    }
}


//============ Tests =========================================================

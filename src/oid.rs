//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object
//! identifiers as well as the constants for the two object identifiers
//! used by the Basic Constraints extension.

use std::{fmt, hash, io};
use bytes::Bytes;
use crate::decode::{Constructed, DecodeError, Primitive, Source};
use crate::encode::PrimitiveContent;
use crate::tag::Tag;


//------------ Constants -----------------------------------------------------

/// The object identifier of the Basic Constraints extension.
///
/// This is `id-ce-basicConstraints`, 2.5.29.19, defined in RFC 5280.
pub const CE_BASIC_CONSTRAINTS: ConstOid = Oid(&[85, 29, 19]);

/// The object identifier of the legacy Basic Constraints extension.
///
/// This is 2.5.29.10 which was used by the 1993 edition of X.509 before
/// it was deprecated.
pub const CE_BASIC_CONSTRAINTS_LEGACY: ConstOid = Oid(&[85, 29, 10]);


//------------ Oid -----------------------------------------------------------

/// An object identifier.
///
/// Object identifiers are globally unique, hierarchical values that are
/// used to identify objects or their type. When written, they are presented
/// as a sequence of integers separated by dots such as ‘2.5.29.19’ or with
/// the integers separated by white space and enclosed in curly braces such
/// as ‘{ 2 5 29 19 }’.
///
/// This type keeps an object identifier in its encoded form, i.e., as the
/// content octets of its primitive value, in a value of type `T`. This way
/// static identifiers can be kept as `&'static [u8]`, and decoded ones as
/// `Bytes` without copying.
///
/// Values of different `T` compare equal if they contain the same octets.
#[derive(Clone, Debug)]
pub struct Oid<T: AsRef<[u8]> = Bytes>(pub T);

/// A type alias for `Oid<&'static [u8]>`.
///
/// This is useful when defining object identifier constants.
pub type ConstOid = Oid<&'static [u8]>;


/// # Decoding
impl Oid<Bytes> {
    /// Takes an object identifier from the beginning of a value.
    pub fn take_from<S: Source>(
        cons: &mut Constructed<S>
    ) -> Result<Self, DecodeError> {
        cons.take_primitive_if(Tag::OID, Self::from_primitive)
    }

    /// Takes an optional object identifier from the beginning of a value.
    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>
    ) -> Result<Option<Self>, DecodeError> {
        cons.take_opt_primitive_if(Tag::OID, Self::from_primitive)
    }

    /// Decodes the content of a primitive value.
    ///
    /// The content has to be a non-empty sequence of sub-identifiers, each
    /// in the shortest possible base 128 form.
    pub fn from_primitive<S: Source>(
        prim: &mut Primitive<S>
    ) -> Result<Self, DecodeError> {
        let start = prim.pos();
        let content = prim.take_all()?;
        if content.is_empty() {
            return Err(DecodeError::malformed(
                "empty object identifier", start
            ))
        }
        if content.last().map(|x| x & 0x80 != 0).unwrap_or(false) {
            return Err(DecodeError::malformed(
                "truncated object identifier component", start
            ))
        }
        let mut at_start = true;
        for &octet in content.iter() {
            if at_start && octet == 0x80 {
                return Err(DecodeError::malformed(
                    "non-minimal object identifier component", start
                ))
            }
            at_start = octet & 0x80 == 0;
        }
        Ok(Oid(content))
    }
}

impl<T: AsRef<[u8]>> Oid<T> {
    /// Returns the content octets of the object identifier.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns an iterator over the sub-identifiers.
    ///
    /// Sub-identifiers that don’t fit into a `u64` are returned as `None`.
    /// The first sub-identifier encodes the first two components of the
    /// dotted representation.
    fn sub_identifiers(&self) -> impl Iterator<Item = Option<u64>> + '_ {
        self.as_slice().split_inclusive(|x| x & 0x80 == 0).map(|octets| {
            octets.iter().try_fold(0u64, |res, &octet| {
                res.checked_mul(128).map(|res| res | u64::from(octet & 0x7F))
            })
        })
    }
}


//--- AsRef

impl<T: AsRef<[u8]>> AsRef<[u8]> for Oid<T> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- PartialEq and Eq

impl<T: AsRef<[u8]>, U: AsRef<[u8]>> PartialEq<Oid<U>> for Oid<T> {
    fn eq(&self, other: &Oid<U>) -> bool {
        self.0.as_ref() == other.0.as_ref()
    }
}

impl<T: AsRef<[u8]>> Eq for Oid<T> { }


//--- Hash

impl<T: AsRef<[u8]>> hash::Hash for Oid<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.as_ref().hash(state)
    }
}


//--- Display

impl<T: AsRef<[u8]>> fmt::Display for Oid<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for sub in self.sub_identifiers() {
            match (first, sub) {
                (true, Some(sub)) => {
                    let top = (sub / 40).min(2);
                    write!(f, "{}.{}", top, sub - top * 40)?;
                }
                (false, Some(sub)) => write!(f, ".{}", sub)?,
                (true, None) => f.write_str("2.(large)")?,
                (false, None) => f.write_str(".(large)")?,
            }
            first = false;
        }
        Ok(())
    }
}


//--- PrimitiveContent

impl<T: AsRef<[u8]>> PrimitiveContent for &'_ Oid<T> {
    const TAG: Tag = Tag::OID;

    fn encoded_len(&self) -> usize {
        self.0.as_ref().len()
    }

    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(self.0.as_ref())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::SliceSource;
    use crate::encode::Values;
    use crate::mode::Mode;
    use super::*;

    fn take(data: &[u8]) -> Result<Oid, DecodeError> {
        Mode::Der.decode(SliceSource::new(data), Oid::take_from)
    }

    #[test]
    fn decode() {
        assert_eq!(
            take(b"\x06\x03\x55\x1d\x13").unwrap(), CE_BASIC_CONSTRAINTS
        );
        assert_eq!(
            take(b"\x06\x03\x55\x1d\x0a").unwrap(),
            CE_BASIC_CONSTRAINTS_LEGACY
        );
        assert_ne!(
            take(b"\x06\x03\x55\x1d\x0f").unwrap(), CE_BASIC_CONSTRAINTS
        );
        assert!(take(b"\x06\x00").is_err());
        assert!(take(b"\x06\x02\x55\x9d").is_err());
        assert!(take(b"\x06\x03\x55\x80\x01").is_err());
        assert!(take(b"\x26\x03\x55\x1d\x13").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(CE_BASIC_CONSTRAINTS.to_string(), "2.5.29.19");
        assert_eq!(CE_BASIC_CONSTRAINTS_LEGACY.to_string(), "2.5.29.10");
        assert_eq!(
            Oid(b"\x2a\x86\x48\x86\xf7\x0d".as_ref()).to_string(),
            "1.2.840.113549"
        );
        assert_eq!(Oid(b"\x88\x37".as_ref()).to_string(), "2.999");
    }

    #[test]
    fn encode() {
        assert_eq!(
            (&CE_BASIC_CONSTRAINTS).encode().to_vec(),
            b"\x06\x03\x55\x1d\x13"
        );
    }
}

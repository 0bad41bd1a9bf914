//! The Basic Constraints certificate extension.
//!
//! The extension identifies whether the subject of a certificate is a
//! certification authority and, optionally, how many non-self-issued
//! intermediate certificates may follow it in a certification path.
//!
//! Two forms of the extension exist, distinguished by their object
//! identifier, and described by [`Variant`]. The current form is defined in
//! RFC 5280, section 4.2.1.9:
//!
//! ```text
//! BasicConstraints ::= SEQUENCE {
//!      cA                      BOOLEAN DEFAULT FALSE,
//!      pathLenConstraint       INTEGER (0..MAX) OPTIONAL }
//! ```
//!
//! The legacy form stems from the 1993 edition of X.509:
//!
//! ```text
//! BasicConstraintsSyntax ::= SEQUENCE {
//!      subjectType             BIT STRING { cA (0), endEntity (1) },
//!      pathLenConstraint       INTEGER (0..MAX) OPTIONAL,
//!      subtreesConstraint      SEQUENCE OF SEQUENCE OPTIONAL }
//! ```
//!
//! Values are only ever encoded in the current form.
//!
//! The [`encode`] and [`decode`] functions convert between the fields and
//! the encoded extension value. The [`BasicConstraintsExtension`] type
//! combines the raw value of an extension with its lazily decoded content.

use std::{error, fmt};
use bytes::Bytes;
use crate::bstring::BitString;
use crate::captured::Captured;
use crate::decode::{Constructed, DecodeError, SliceSource, Source};
use crate::encode::{self, PrimitiveContent, Values};
use crate::ext::Extension;
use crate::int::Unsigned;
use crate::mode::Mode;
use crate::oid::{self, ConstOid, Oid};
use crate::tag::Tag;


//------------ Variant -------------------------------------------------------

/// The form of a Basic Constraints extension value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Variant {
    /// The X.509 (1993) form identified by 2.5.29.10.
    Legacy,

    /// The RFC 5280 form identified by 2.5.29.19.
    V2,
}

impl Variant {
    /// Returns the variant identified by an extension’s object identifier.
    ///
    /// Returns `None` if the object identifier isn’t one of the two used
    /// for the Basic Constraints extension.
    pub fn from_oid<T: AsRef<[u8]>>(id: &Oid<T>) -> Option<Self> {
        if *id == oid::CE_BASIC_CONSTRAINTS {
            Some(Variant::V2)
        }
        else if *id == oid::CE_BASIC_CONSTRAINTS_LEGACY {
            Some(Variant::Legacy)
        }
        else {
            None
        }
    }

    /// Returns the object identifier of the variant.
    pub fn oid(self) -> ConstOid {
        match self {
            Variant::Legacy => oid::CE_BASIC_CONSTRAINTS_LEGACY,
            Variant::V2 => oid::CE_BASIC_CONSTRAINTS,
        }
    }
}


//------------ BasicConstraints ----------------------------------------------

/// The content of a Basic Constraints extension.
///
/// The path length constraint is kept as a flag and an integer. If the
/// flag is not set, the integer is always zero. Otherwise it is never
/// negative.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct BasicConstraints {
    ca: bool,
    has_path_len_constraint: bool,
    path_len_constraint: i32,
}

impl BasicConstraints {
    /// Creates a new value from its fields.
    ///
    /// If `has_path_len_constraint` is `false`, `path_len_constraint` is
    /// ignored and stored as zero. Otherwise it must not be negative.
    pub fn new(
        ca: bool,
        has_path_len_constraint: bool,
        path_len_constraint: i32,
    ) -> Result<Self, PathLenOutOfRange> {
        if !has_path_len_constraint {
            return Ok(BasicConstraints {
                ca,
                has_path_len_constraint,
                path_len_constraint: 0,
            })
        }
        if path_len_constraint < 0 {
            return Err(PathLenOutOfRange(path_len_constraint))
        }
        Ok(BasicConstraints {
            ca, has_path_len_constraint, path_len_constraint
        })
    }

    /// Returns whether the subject is a certification authority.
    pub fn ca(&self) -> bool {
        self.ca
    }

    /// Returns whether a path length constraint is present.
    pub fn has_path_len_constraint(&self) -> bool {
        self.has_path_len_constraint
    }

    /// Returns the path length constraint.
    ///
    /// This is zero if there is no constraint.
    pub fn path_len_constraint(&self) -> i32 {
        self.path_len_constraint
    }

    /// Returns the path length constraint if present.
    pub fn path_len(&self) -> Option<u32> {
        if self.has_path_len_constraint {
            u32::try_from(self.path_len_constraint).ok()
        }
        else {
            None
        }
    }

    /// Creates a value from decoded fields.
    fn from_decoded(ca: bool, path_len: Option<i32>) -> Self {
        BasicConstraints {
            ca,
            has_path_len_constraint: path_len.is_some(),
            path_len_constraint: path_len.unwrap_or(0),
        }
    }
}

/// # Decoding
///
impl BasicConstraints {
    /// Decodes an extension value in the given variant using DER.
    pub fn decode(variant: Variant, data: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_in_mode(variant, data, Mode::Der)
    }

    /// Decodes an extension value in the given variant and mode.
    ///
    /// Decoding in [`Mode::Ber`] accepts an explicitly encoded FALSE for
    /// the cA field and the other relaxations BER allows.
    pub fn decode_in_mode(
        variant: Variant,
        data: &[u8],
        mode: Mode,
    ) -> Result<Self, DecodeError> {
        mode.decode(SliceSource::new(data), |cons| {
            Self::take_from(cons, variant)
        })
    }

    /// Takes an extension value in the given variant from a constructed
    /// value.
    pub fn take_from<S: Source>(
        cons: &mut Constructed<S>,
        variant: Variant,
    ) -> Result<Self, DecodeError> {
        match variant {
            Variant::Legacy => Self::take_legacy(cons),
            Variant::V2 => Self::take_v2(cons),
        }
    }

    fn take_v2<S: Source>(
        cons: &mut Constructed<S>
    ) -> Result<Self, DecodeError> {
        cons.take_sequence(|cons| {
            let ca = cons.take_default_bool(false)?;
            let path_len = Self::take_opt_path_len(cons)?;
            Ok(Self::from_decoded(ca, path_len))
        })
    }

    fn take_legacy<S: Source>(
        cons: &mut Constructed<S>
    ) -> Result<Self, DecodeError> {
        cons.take_sequence(|cons| {
            let subject_type = BitString::take_from(cons)?;
            let path_len = Self::take_opt_path_len(cons)?;

            // subtreesConstraint has no place in our fields. Check that it
            // is a SEQUENCE OF SEQUENCE and move on.
            cons.take_opt_sequence(|cons| {
                while let Some(()) = cons.take_opt_sequence(|cons| {
                    cons.skip_all()
                })? { }
                Ok(())
            })?;
            Ok(Self::from_decoded(subject_type.bit(0), path_len))
        })
    }

    /// Takes the optional path length constraint.
    ///
    /// Values larger than `i32::MAX` are rejected.
    fn take_opt_path_len<S: Source>(
        cons: &mut Constructed<S>
    ) -> Result<Option<i32>, DecodeError> {
        let start = cons.pos();
        let len = match cons.take_opt_primitive_if(
            Tag::INTEGER, Unsigned::u32_from_primitive
        )? {
            Some(len) => len,
            None => return Ok(None)
        };
        match i32::try_from(len) {
            Ok(len) => Ok(Some(len)),
            Err(_) => Err(DecodeError::malformed(
                "path length constraint out of range", start
            ))
        }
    }
}

/// # Encoding
///
impl BasicConstraints {
    /// Returns a value encoder for the extension value.
    ///
    /// The value is always encoded in the current form.
    pub fn encode(&self) -> impl Values {
        encode::sequence((
            self.ca.then(|| true.encode()),
            self.path_len().map(|len| len.encode()),
        ))
    }

    /// Returns the DER encoded extension value.
    pub fn to_captured(&self) -> Captured {
        self.encode().to_captured()
    }
}


//------------ Functions -----------------------------------------------------

/// Encodes the value of a Basic Constraints extension.
///
/// Returns an error if `has_path_len_constraint` is `true` and
/// `path_len_constraint` is negative. Nothing is encoded in this case.
pub fn encode(
    ca: bool,
    has_path_len_constraint: bool,
    path_len_constraint: i32,
) -> Result<Captured, PathLenOutOfRange> {
    BasicConstraints::new(
        ca, has_path_len_constraint, path_len_constraint
    ).map(|value| value.to_captured())
}

/// Decodes the DER encoded value of a Basic Constraints extension.
pub fn decode(
    variant: Variant,
    data: &[u8]
) -> Result<BasicConstraints, DecodeError> {
    BasicConstraints::decode(variant, data)
}


//------------ BasicConstraintsExtension -------------------------------------

/// A Basic Constraints extension.
///
/// The extension keeps its raw value and decodes it when any of its fields
/// are accessed for the first time. A successfully decoded value is kept.
/// If decoding fails, the error is returned and the next access will try
/// again.
///
/// The critical flag is carried along but not interpreted.
#[derive(Clone, Debug)]
pub struct BasicConstraintsExtension {
    variant: Variant,
    critical: bool,
    value: Bytes,
    state: State,
}

/// The decoding state of an extension’s value.
#[derive(Clone, Copy, Debug)]
enum State {
    Encoded,
    Decoded(BasicConstraints),
}

impl BasicConstraintsExtension {
    /// Creates a new extension from its fields.
    ///
    /// The extension uses the current form.
    pub fn new(
        ca: bool,
        has_path_len_constraint: bool,
        path_len_constraint: i32,
        critical: bool,
    ) -> Result<Self, PathLenOutOfRange> {
        let decoded = BasicConstraints::new(
            ca, has_path_len_constraint, path_len_constraint
        )?;
        Ok(BasicConstraintsExtension {
            variant: Variant::V2,
            critical,
            value: decoded.to_captured().into_bytes(),
            state: State::Decoded(decoded),
        })
    }

    /// Creates a new extension from an encoded value.
    ///
    /// The value is assumed to be in the current form. It is not decoded
    /// until its fields are accessed.
    pub fn from_value(value: Bytes, critical: bool) -> Self {
        BasicConstraintsExtension {
            variant: Variant::V2,
            critical,
            value,
            state: State::Encoded,
        }
    }

    /// Creates a value from a generic extension.
    ///
    /// The variant is determined by the extension’s object identifier.
    /// Returns `None` if that is not a Basic Constraints identifier.
    pub fn from_extension(ext: &Extension) -> Option<Self> {
        Variant::from_oid(ext.oid()).map(|variant| {
            BasicConstraintsExtension {
                variant,
                critical: ext.is_critical(),
                value: ext.value().clone(),
                state: State::Encoded,
            }
        })
    }

    /// Replaces the raw value.
    ///
    /// The new value will be decoded on next access.
    pub fn set_value(&mut self, value: Bytes) {
        self.value = value;
        self.state = State::Encoded;
    }

    /// Returns the variant of the extension value.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns whether the extension is marked as critical.
    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// Returns the raw value of the extension.
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Returns whether the value has been decoded already.
    pub fn is_decoded(&self) -> bool {
        matches!(self.state, State::Decoded(_))
    }

    /// Returns the decoded value, decoding it if necessary.
    pub fn decoded(&mut self) -> Result<BasicConstraints, DecodeError> {
        if let State::Decoded(res) = self.state {
            return Ok(res)
        }
        let res = BasicConstraints::decode(self.variant, self.value.as_ref())?;
        self.state = State::Decoded(res);
        Ok(res)
    }

    /// Returns whether the subject is a certification authority.
    pub fn ca(&mut self) -> Result<bool, DecodeError> {
        self.decoded().map(|res| res.ca())
    }

    /// Returns whether a path length constraint is present.
    pub fn has_path_len_constraint(&mut self) -> Result<bool, DecodeError> {
        self.decoded().map(|res| res.has_path_len_constraint())
    }

    /// Returns the path length constraint or zero if there is none.
    pub fn path_len_constraint(&mut self) -> Result<i32, DecodeError> {
        self.decoded().map(|res| res.path_len_constraint())
    }

    /// Converts the value into a generic extension.
    pub fn to_extension(&self) -> Extension {
        Extension::new(
            Oid(Bytes::from_static(self.variant.oid().0)),
            self.critical,
            self.value.clone(),
        )
    }
}


//--- Default

impl Default for BasicConstraintsExtension {
    fn default() -> Self {
        let decoded = BasicConstraints::default();
        BasicConstraintsExtension {
            variant: Variant::V2,
            critical: false,
            value: decoded.to_captured().into_bytes(),
            state: State::Decoded(decoded),
        }
    }
}


//------------ PathLenOutOfRange ---------------------------------------------

/// A negative path length constraint was given.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PathLenOutOfRange(i32);

impl PathLenOutOfRange {
    /// Returns the rejected value.
    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PathLenOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "path length constraint must not be negative (got {})",
            self.0
        )
    }
}

impl error::Error for PathLenOutOfRange { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::ErrorKind;
    use super::*;

    fn fields(value: BasicConstraints) -> (bool, bool, i32) {
        (
            value.ca(),
            value.has_path_len_constraint(),
            value.path_len_constraint()
        )
    }

    fn v2(data: &[u8]) -> Result<(bool, bool, i32), DecodeError> {
        decode(Variant::V2, data).map(fields)
    }

    fn legacy(data: &[u8]) -> Result<(bool, bool, i32), DecodeError> {
        decode(Variant::Legacy, data).map(fields)
    }

    #[test]
    fn encode_canonical() {
        assert_eq!(encode(false, false, 0).unwrap().as_slice(), b"\x30\x00");
        assert_eq!(
            encode(true, false, 0).unwrap().as_slice(),
            b"\x30\x03\x01\x01\xff"
        );
        assert_eq!(
            encode(false, true, 3).unwrap().as_slice(),
            b"\x30\x03\x02\x01\x03"
        );
        assert_eq!(
            encode(true, true, 0).unwrap().as_slice(),
            b"\x30\x06\x01\x01\xff\x02\x01\x00"
        );
        assert_eq!(
            encode(true, true, 128).unwrap().as_slice(),
            b"\x30\x07\x01\x01\xff\x02\x02\x00\x80"
        );
        assert_eq!(
            encode(false, true, i32::MAX).unwrap().as_slice(),
            b"\x30\x06\x02\x04\x7f\xff\xff\xff"
        );

        // The path length is ignored without the flag.
        assert_eq!(
            encode(false, false, 12).unwrap().as_slice(), b"\x30\x00"
        );
        assert_eq!(
            encode(true, false, -5).unwrap(), encode(true, false, 0).unwrap()
        );
    }

    #[test]
    fn encode_negative() {
        assert_eq!(
            encode(false, true, -1).unwrap_err(), PathLenOutOfRange(-1)
        );
        assert_eq!(
            encode(true, true, i32::MIN).unwrap_err().value(), i32::MIN
        );
        assert!(BasicConstraints::new(true, true, -1).is_err());
        assert!(BasicConstraintsExtension::new(true, true, -1, true).is_err());
    }

    #[test]
    fn round_trip() {
        for &ca in &[false, true] {
            for &len in &[
                0, 1, 3, 127, 128, 255, 256, 0x7fff, 0x8000, i32::MAX
            ] {
                for &has in &[false, true] {
                    let encoded = encode(ca, has, len).unwrap();
                    let expected = (ca, has, if has { len } else { 0 });
                    assert_eq!(v2(encoded.as_slice()).unwrap(), expected);
                    assert_eq!(
                        encoded.decode(|cons| {
                            BasicConstraints::take_from(cons, Variant::V2)
                        }).map(fields).unwrap(),
                        expected
                    );
                }
            }
        }
    }

    #[test]
    fn decode_v2() {
        assert_eq!(v2(b"\x30\x00").unwrap(), (false, false, 0));
        assert_eq!(v2(b"\x30\x03\x01\x01\xff").unwrap(), (true, false, 0));
        assert_eq!(v2(b"\x30\x03\x02\x01\x03").unwrap(), (false, true, 3));
        assert_eq!(
            v2(b"\x30\x06\x01\x01\xff\x02\x01\x00").unwrap(), (true, true, 0)
        );
        assert_eq!(
            v2(b"\x30\x07\x01\x01\xff\x02\x02\x00\x80").unwrap(),
            (true, true, 128)
        );
    }

    #[test]
    fn decode_idempotent() {
        let data = b"\x30\x06\x01\x01\xff\x02\x01\x07";
        assert_eq!(
            decode(Variant::V2, data).unwrap(),
            decode(Variant::V2, data).unwrap()
        );
    }

    #[test]
    fn decode_truncated() {
        let data = b"\x30\x06\x01\x01\xff\x02\x01\x00";
        for len in 0..data.len() {
            assert_eq!(
                v2(&data[..len]).unwrap_err().kind(), ErrorKind::Malformed
            );
        }
    }

    #[test]
    fn decode_failures() {
        // Negative path length.
        assert!(v2(b"\x30\x03\x02\x01\xff").is_err());
        assert!(v2(b"\x30\x03\x02\x01\x80").is_err());
        // Non-minimal path length.
        assert!(v2(b"\x30\x04\x02\x02\x00\x03").is_err());
        // Path length larger than i32::MAX.
        assert!(v2(b"\x30\x06\x02\x04\x80\x00\x00\x00").is_err());
        assert!(v2(b"\x30\x07\x02\x05\x00\x80\x00\x00\x00").is_err());
        // Empty integer.
        assert!(v2(b"\x30\x02\x02\x00").is_err());
        // Wrong order.
        assert!(v2(b"\x30\x06\x02\x01\x00\x01\x01\xff").is_err());
        // Unknown field.
        assert!(v2(b"\x30\x02\x05\x00").is_err());
        // Wrong outer tag.
        assert!(v2(b"\x31\x00").is_err());
        // Trailing data.
        assert!(v2(b"\x30\x00\x00").is_err());
        // Declared length beyond the data.
        assert!(v2(b"\x30\x05\x01\x01\xff").is_err());
        // Non-DER boolean.
        assert!(v2(b"\x30\x03\x01\x01\x01").is_err());
        // Empty input.
        assert!(v2(b"").is_err());
    }

    #[test]
    fn decode_explicit_false() {
        let data = b"\x30\x03\x01\x01\x00";
        assert!(v2(data).is_err());
        assert_eq!(
            BasicConstraints::decode_in_mode(Variant::V2, data, Mode::Ber)
                .map(fields).unwrap(),
            (false, false, 0)
        );
    }

    #[test]
    fn decode_legacy() {
        // cA bit set.
        assert_eq!(
            legacy(b"\x30\x04\x03\x02\x07\x80").unwrap(), (true, false, 0)
        );
        // endEntity bit set.
        assert_eq!(
            legacy(b"\x30\x04\x03\x02\x06\x40").unwrap(), (false, false, 0)
        );
        // No bits at all.
        assert_eq!(
            legacy(b"\x30\x03\x03\x01\x00").unwrap(), (false, false, 0)
        );
        // With path length.
        assert_eq!(
            legacy(b"\x30\x07\x03\x02\x07\x80\x02\x01\x05").unwrap(),
            (true, true, 5)
        );
        // With subtrees constraint.
        assert_eq!(
            legacy(
                b"\x30\x0f\x03\x02\x07\x80\x02\x01\x00\
                  \x30\x06\x30\x00\x30\x02\x05\x00"
            ).unwrap(),
            (true, true, 0)
        );

        // Missing subject type.
        assert!(legacy(b"\x30\x00").is_err());
        // The current form is not valid legacy.
        assert!(legacy(b"\x30\x03\x01\x01\xff").is_err());
        // Subtrees that aren’t sequences.
        assert!(legacy(b"\x30\x08\x03\x02\x07\x80\x30\x02\x05\x00").is_err());
        // Negative path length.
        assert!(legacy(b"\x30\x07\x03\x02\x07\x80\x02\x01\xfe").is_err());
    }

    #[test]
    fn decode_legacy_truncated() {
        let data = b"\x30\x0f\x03\x02\x07\x80\x02\x01\x00\
                     \x30\x06\x30\x00\x30\x02\x05\x00";
        assert!(legacy(data).is_ok());
        for len in 0..data.len() {
            assert_eq!(
                legacy(&data[..len]).unwrap_err().kind(), ErrorKind::Malformed
            );
        }
    }

    #[test]
    fn variant_oid() {
        assert_eq!(
            Variant::from_oid(&oid::CE_BASIC_CONSTRAINTS), Some(Variant::V2)
        );
        assert_eq!(
            Variant::from_oid(&oid::CE_BASIC_CONSTRAINTS_LEGACY),
            Some(Variant::Legacy)
        );
        assert_eq!(Variant::from_oid(&Oid(b"\x55\x1d\x0f".as_ref())), None);
        assert_eq!(Variant::V2.oid(), oid::CE_BASIC_CONSTRAINTS);
        assert_eq!(Variant::Legacy.oid(), oid::CE_BASIC_CONSTRAINTS_LEGACY);
    }

    #[test]
    fn extension_lazy_decoding() {
        let mut ext = BasicConstraintsExtension::from_value(
            Bytes::from_static(b"\x30\x06\x01\x01\xff\x02\x01\x02"), true
        );
        assert!(!ext.is_decoded());
        assert!(ext.ca().unwrap());
        assert!(ext.is_decoded());
        assert!(ext.has_path_len_constraint().unwrap());
        assert_eq!(ext.path_len_constraint().unwrap(), 2);
        assert!(ext.is_critical());
        assert_eq!(ext.variant(), Variant::V2);

        ext.set_value(Bytes::from_static(b"\x30\x00"));
        assert!(!ext.is_decoded());
        assert!(!ext.ca().unwrap());

        let mut ext = BasicConstraintsExtension::from_value(
            Bytes::from_static(b"\x30\x03\x02\x01\xff"), false
        );
        assert!(ext.ca().is_err());
        assert!(!ext.is_decoded());
        assert!(ext.decoded().is_err());
    }

    #[test]
    fn extension_new() {
        let mut ext = BasicConstraintsExtension::new(
            true, true, 3, true
        ).unwrap();
        assert!(ext.is_decoded());
        assert_eq!(ext.value().as_ref(), b"\x30\x06\x01\x01\xff\x02\x01\x03");
        assert_eq!(
            fields(ext.decoded().unwrap()), (true, true, 3)
        );

        let mut ext = BasicConstraintsExtension::default();
        assert_eq!(ext.value().as_ref(), b"\x30\x00");
        assert_eq!(fields(ext.decoded().unwrap()), (false, false, 0));
        assert!(!ext.is_critical());
    }

    #[test]
    fn extension_conversion() {
        let ext = Extension::decode(
            Bytes::from_static(
                b"\x30\x0f\x06\x03\x55\x1d\x13\x01\x01\xff\
                  \x04\x05\x30\x03\x01\x01\xff"
            ),
            Mode::Der
        ).unwrap();
        let mut basic = BasicConstraintsExtension::from_extension(
            &ext
        ).unwrap();
        assert_eq!(basic.variant(), Variant::V2);
        assert!(basic.is_critical());
        assert!(basic.ca().unwrap());
        assert_eq!(basic.to_extension(), ext);

        let ext = Extension::new(
            Oid(Bytes::from_static(oid::CE_BASIC_CONSTRAINTS_LEGACY.0)),
            false,
            Bytes::from_static(b"\x30\x07\x03\x02\x07\x80\x02\x01\x01")
        );
        let mut basic = BasicConstraintsExtension::from_extension(
            &ext
        ).unwrap();
        assert_eq!(basic.variant(), Variant::Legacy);
        assert_eq!(fields(basic.decoded().unwrap()), (true, true, 1));
        assert_eq!(basic.to_extension(), ext);

        let ext = Extension::new(
            Oid(Bytes::from_static(b"\x55\x1d\x0f")),
            true,
            Bytes::from_static(b"\x03\x02\x05\xa0")
        );
        assert!(BasicConstraintsExtension::from_extension(&ext).is_none());
    }
}

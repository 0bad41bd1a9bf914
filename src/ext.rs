//! Undecoded certificate extensions.

use bytes::Bytes;
use crate::decode::{BytesSource, Constructed, DecodeError, Source};
use crate::encode::{self, PrimitiveContent, Values};
use crate::mode::Mode;
use crate::oid::Oid;
use crate::tag::Tag;


//------------ Extension -----------------------------------------------------

/// A single certificate extension in its undecoded form.
///
/// The value of the extension is kept as the raw content of its OCTET
/// STRING. Interpreting it is left to the type responsible for the
/// extension identified by [`oid`][Self::oid], such as
/// [`BasicConstraintsExtension`][crate::basic::BasicConstraintsExtension].
///
/// ```text
/// Extension  ::=  SEQUENCE  {
///      extnID      OBJECT IDENTIFIER,
///      critical    BOOLEAN DEFAULT FALSE,
///      extnValue   OCTET STRING  }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Extension {
    oid: Oid,
    critical: bool,
    value: Bytes,
}

impl Extension {
    /// Creates a new extension from its components.
    pub fn new(oid: Oid, critical: bool, value: Bytes) -> Self {
        Extension { oid, critical, value }
    }

    /// Returns the object identifier of the extension.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Returns whether the extension is marked as critical.
    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// Returns the raw extension value.
    ///
    /// This is the content of the `extnValue` OCTET STRING.
    pub fn value(&self) -> &Bytes {
        &self.value
    }
}

/// # Decoding and Encoding
impl Extension {
    /// Decodes an extension from a bytes value.
    ///
    /// The data has to contain exactly one encoded extension.
    pub fn decode(data: Bytes, mode: Mode) -> Result<Self, DecodeError> {
        mode.decode(BytesSource::new(data), Self::take_from)
    }

    /// Takes an extension from the beginning of a constructed value.
    pub fn take_from<S: Source>(
        cons: &mut Constructed<S>
    ) -> Result<Self, DecodeError> {
        cons.take_sequence(|cons| {
            let oid = Oid::take_from(cons)?;
            let critical = cons.take_default_bool(false)?;
            let value = cons.take_primitive_if(
                Tag::OCTET_STRING, |prim| prim.take_all()
            )?;
            Ok(Extension { oid, critical, value })
        })
    }

    /// Returns a value encoder for the extension.
    ///
    /// The critical flag is left out if it is not set.
    pub fn encode(&self) -> impl Values + '_ {
        encode::sequence((
            (&self.oid).encode(),
            self.critical.then(|| true.encode()),
            self.value.as_ref().encode(),
        ))
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::oid;
    use super::*;

    const CRITICAL_CA: &[u8] =
        b"\x30\x0f\x06\x03\x55\x1d\x13\x01\x01\xff\x04\x05\x30\x03\x01\x01\xff";

    #[test]
    fn decode() {
        let ext = Extension::decode(
            Bytes::from_static(CRITICAL_CA), Mode::Der
        ).unwrap();
        assert_eq!(ext.oid(), &oid::CE_BASIC_CONSTRAINTS);
        assert!(ext.is_critical());
        assert_eq!(ext.value().as_ref(), b"\x30\x03\x01\x01\xff");

        let ext = Extension::decode(
            Bytes::from_static(b"\x30\x09\x06\x03\x55\x1d\x0a\x04\x02\x30\x00"),
            Mode::Der
        ).unwrap();
        assert_eq!(ext.oid(), &oid::CE_BASIC_CONSTRAINTS_LEGACY);
        assert!(!ext.is_critical());
        assert_eq!(ext.value().as_ref(), b"\x30\x00");
    }

    #[test]
    fn decode_failures() {
        // Explicit critical FALSE.
        let data = Bytes::from_static(
            b"\x30\x0c\x06\x03\x55\x1d\x13\x01\x01\x00\x04\x02\x30\x00"
        );
        assert!(Extension::decode(data.clone(), Mode::Der).is_err());
        assert!(!Extension::decode(data, Mode::Ber).unwrap().is_critical());

        // Missing value.
        assert!(Extension::decode(
            Bytes::from_static(b"\x30\x05\x06\x03\x55\x1d\x13"), Mode::Der
        ).is_err());

        // Truncated.
        for len in 0..CRITICAL_CA.len() {
            assert!(Extension::decode(
                Bytes::copy_from_slice(&CRITICAL_CA[..len]), Mode::Der
            ).is_err());
        }
    }

    #[test]
    fn encode() {
        let ext = Extension::decode(
            Bytes::from_static(CRITICAL_CA), Mode::Der
        ).unwrap();
        assert_eq!(ext.encode().to_vec(), CRITICAL_CA);

        let ext = Extension::new(
            Oid(Bytes::from_static(oid::CE_BASIC_CONSTRAINTS.0)),
            false,
            Bytes::from_static(b"\x30\x00")
        );
        assert_eq!(
            ext.encode().to_vec(),
            b"\x30\x09\x06\x03\x55\x1d\x13\x04\x02\x30\x00"
        );
    }
}

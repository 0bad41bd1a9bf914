//! Captured encoded data.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use crate::decode::{BytesSource, Constructed, DecodeError};
use crate::encode::Values;
use crate::mode::Mode;


//------------ Captured ------------------------------------------------------

/// A wrapper for encoded data.
///
/// This type keeps a sequence of encoded values together with the mode
/// they are encoded in. It is what the encoders hand out as their final
/// result and it can be decoded again via [`decode`][Self::decode].
///
/// Since it implements [`Values`], a captured value can also be placed
/// into a larger encoding as is.
#[derive(Clone, Eq, PartialEq)]
pub struct Captured {
    bytes: Bytes,
    mode: Mode,
}

impl Captured {
    /// Creates a captured value from its components.
    pub fn new(bytes: Bytes, mode: Mode) -> Self {
        Captured { bytes, mode }
    }

    /// Creates a captured value by encoding data.
    ///
    /// The function takes a value encoder and stores its DER encoding.
    pub fn from_values<V: Values>(values: V) -> Self {
        values.to_captured()
    }

    /// Returns the mode the data is encoded in.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Decodes the captured data.
    ///
    /// The closure `op` receives a constructed value spanning the captured
    /// data and has to consume all of it.
    pub fn decode<F, T>(&self, op: F) -> Result<T, DecodeError>
    where F: FnOnce(&mut Constructed<BytesSource>) -> Result<T, DecodeError> {
        self.mode.decode(BytesSource::new(self.bytes.clone()), op)
    }

    /// Returns a bytes slice with the raw data.
    pub fn as_slice(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    /// Converts the captured values into the underlying bytes value.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}


//--- AsRef

impl AsRef<[u8]> for Captured {
    fn as_ref(&self) -> &[u8] {
        self.bytes.as_ref()
    }
}


//--- Values

impl Values for Captured {
    fn encoded_len(&self) -> usize {
        self.bytes.len()
    }

    fn write_encoded<W: std::io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), std::io::Error> {
        target.write_all(self.bytes.as_ref())
    }
}


//--- Debug

impl fmt::Debug for Captured {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, &v) in self.bytes.iter().enumerate() {
            write!(f, "{}{:02x}", if i == 0 { "" } else { " " }, v)?;
        }
        write!(f, "]")
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::encode::{sequence, PrimitiveContent};
    use super::*;

    #[test]
    fn capture_and_decode() {
        let captured = Captured::from_values(sequence(true.encode()));
        assert_eq!(captured.mode(), Mode::Der);
        assert_eq!(captured.as_slice(), b"\x30\x03\x01\x01\xff");
        assert_eq!(format!("{:?}", captured), "[30 03 01 01 ff]");
        assert!(
            captured.decode(|cons| cons.take_sequence(|cons| {
                cons.take_bool()
            })).unwrap()
        );
        assert_eq!(captured.to_vec(), b"\x30\x03\x01\x01\xff");
        assert_eq!(
            captured.into_bytes(),
            Bytes::from_static(b"\x30\x03\x01\x01\xff")
        );
    }
}

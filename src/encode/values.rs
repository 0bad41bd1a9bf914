//! Everything related to the `Values` trait.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use std::io;
use crate::captured::Captured;
use crate::length::Length;
use crate::mode::Mode;
use crate::tag::Tag;


//------------ Values --------------------------------------------------------

/// A type that is a value encoder.
///
/// Value encoders know how to encode themselves into a sequence of DER
/// encoded values. While you can impl this trait for your type manually,
/// in practice it is often easier to define a method called `encode` and
/// let it return some dedicated value encoder type constructed from the
/// types provided by this module.
pub trait Values {
    /// Returns the length of the encoded values.
    fn encoded_len(&self) -> usize;

    /// Encodes the values and writes them to `target`.
    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error>;


    //--- Provided methods

    /// Encodes the values into a new vec.
    fn to_vec(&self) -> Vec<u8> {
        let mut target = Vec::with_capacity(self.encoded_len());
        infallible(self.write_encoded(&mut target));
        target
    }

    /// Captures the encoded values in DER mode.
    fn to_captured(&self) -> Captured {
        Captured::new(self.to_vec().into(), Mode::Der)
    }
}


//--- Blanket impls

impl<T: Values> Values for &'_ T {
    fn encoded_len(&self) -> usize {
        (*self).encoded_len()
    }

    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error> {
        (*self).write_encoded(target)
    }
}


//--- Impls for Tuples

/// Implements `Values` for a tuple.
///
/// Elements are written in order. Each invocation gets the type
/// parameters and the element indexes of one tuple.
macro_rules! tupl_impl {
    ( $( $t:ident $i:tt ),* ) => {
        impl<$( $t: Values ),*> Values for ($( $t, )*) {
            fn encoded_len(&self) -> usize {
                0 $( + self.$i.encoded_len() )*
            }

            fn write_encoded<W: io::Write>(
                &self,
                target: &mut W
            ) -> Result<(), io::Error> {
                $( self.$i.write_encoded(target)?; )*
                Ok(())
            }
        }
    }
}

tupl_impl!(T0 0);
tupl_impl!(T0 0, T1 1);
tupl_impl!(T0 0, T1 1, T2 2);
tupl_impl!(T0 0, T1 1, T2 2, T3 3);
tupl_impl!(T0 0, T1 1, T2 2, T3 3, T4 4);

/// The empty tuple encodes as nothing.
impl Values for () {
    fn encoded_len(&self) -> usize {
        0
    }

    fn write_encoded<W: io::Write>(
        &self,
        _target: &mut W
    ) -> Result<(), io::Error> {
        Ok(())
    }
}


//--- Impl for Option

/// Encoding of an optional value.
///
/// This implementation encodes `None` as nothing, i.e., as an OPTIONAL
/// in ASN.1 parlance. It is also how a DEFAULT value is left out.
impl<V: Values> Values for Option<V> {
    fn encoded_len(&self) -> usize {
        match self {
            Some(v) => v.encoded_len(),
            None => 0
        }
    }

    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error> {
        match self {
            Some(v) => v.write_encoded(target),
            None => Ok(())
        }
    }
}


//------------ Constructed ---------------------------------------------------

/// A value encoder for a single constructed value.
///
/// The value always uses the definite length form.
pub struct Constructed<V> {
    /// The tag of the value.
    tag: Tag,

    /// A value encoder for the content of the value.
    inner: V,
}

impl<V> Constructed<V> {
    /// Creates a new constructed value encoder from a tag and content.
    ///
    /// The returned value will encode as a single constructed value with
    /// the given tag and whatever `inner` encodes to as its content.
    pub fn new(tag: Tag, inner: V) -> Self {
        Constructed { tag, inner }
    }
}

impl<V: Values> Values for Constructed<V> {
    fn encoded_len(&self) -> usize {
        total_encoded_len(self.tag, self.inner.encoded_len())
    }

    fn write_encoded<W: io::Write>(
        &self,
        target: &mut W
    ) -> Result<(), io::Error> {
        write_header(target, self.tag, true, self.inner.encoded_len())?;
        self.inner.write_encoded(target)
    }
}


//------------ Helper Functions ----------------------------------------------

/// Returns a value encoder for a SEQUENCE containing `inner`.
pub fn sequence<V: Values>(inner: V) -> Constructed<V> {
    Constructed::new(Tag::SEQUENCE, inner)
}

/// Returns the length for a value of the given tag and content length.
pub fn total_encoded_len(tag: Tag, content_l: usize) -> usize {
    tag.encoded_len() + Length::Definite(content_l).encoded_len() + content_l
}

/// Writes the header of a value.
///
/// The header is the tag and length octets.
pub fn write_header<W: io::Write>(
    target: &mut W,
    tag: Tag,
    constructed: bool,
    content_length: usize
) -> Result<(), io::Error> {
    tag.write_encoded(constructed, target)?;
    Length::Definite(content_length).write_encoded(target)
}

/// Unwraps the result of writing to a vec.
///
/// Writing to a vec never fails, so an error here is a bug.
fn infallible<T>(res: Result<T, io::Error>) -> T {
    match res {
        Ok(res) => res,
        Err(err) => unreachable!("writing to a vec failed: {}", err)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::encode::PrimitiveContent;
    use super::*;

    #[test]
    fn encode_sequence() {
        assert_eq!(().encoded_len(), 0);
        assert!(().to_vec().is_empty());
        assert_eq!(sequence(()).to_vec(), b"\x30\x00");
        assert_eq!(
            sequence((true.encode(), None::<crate::encode::Primitive<bool>>))
                .to_vec(),
            b"\x30\x03\x01\x01\xff"
        );
        assert_eq!(
            sequence(sequence((false.encode(),))).to_vec(),
            b"\x30\x05\x30\x03\x01\x01\x00"
        );
    }

    #[test]
    fn long_content() {
        let content = vec![0u8; 0x80];
        let encoder = sequence(content.as_slice().encode());
        let res = encoder.to_vec();
        assert_eq!(res.len(), encoder.encoded_len());
        assert_eq!(&res[..6], b"\x30\x81\x83\x04\x81\x80");
    }
}

//! Encoding data in DER.
//!
//! Encoding is done using helper types called _encoders_ that represent the
//! structure of the encoding. These types implement the trait [`Values`]. A
//! type that can be encoded typically provides a method named `encode` that
//! produces a value of its encoder type representing the value’s encoding.
//!
//! The [`Values`] type can then be used to simply write the encoding to
//! anything that implements the standard library’s `io::Write` trait or to
//! produce a [`Captured`][crate::Captured] value.
//!
//! The trait [`PrimitiveContent`] helps with producing encoders for types
//! that use the primitive encoding. Through this trait the types can declare
//! how their content is encoded and receive an automatic encoder type based
//! on that.
//!
//! All encoders produce DER: lengths are always definite and in their
//! shortest form, and values declared OPTIONAL or with a DEFAULT are left
//! out by encoding them as `None`.

pub use self::primitive::{PrimitiveContent, Primitive};
pub use self::values::{
    Values, Constructed, sequence, total_encoded_len, write_header,
};

mod primitive;
mod values;

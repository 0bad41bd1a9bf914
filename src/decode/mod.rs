//! Parsing data in BER and DER.
//!
//! This modules provides the means to parse encoded data. Decoding happens
//! atop a [`Source`] which provides access to the raw octets. Typically,
//! you will use [`Mode::decode`][crate::Mode::decode] which hands a
//! [`Constructed`] spanning the whole source to a closure. Within that
//! closure you take the values you expect out of it one by one, each
//! through another closure that processes the value’s content.
//!
//! Every problem with the data is reported as a [`DecodeError`]. Decoding
//! never reads past the end of the data and never panics on malformed
//! input.

pub use self::content::{Constructed, Content, Primitive};
pub use self::error::{DecodeError, ErrorKind};
pub use self::source::{BytesSource, LimitedSource, Pos, SliceSource, Source};

mod content;
mod error;
mod source;

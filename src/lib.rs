//! Encoding and decoding of the X.509 Basic Constraints extension.
//!
//! The Basic Constraints extension states whether the subject of a
//! certificate is a certification authority and how long a certification
//! path below it may become. This crate converts between these fields and
//! the DER encoded extension value in both directions, accepting both the
//! current form of the extension and its legacy predecessor. See the
//! [`basic`] module for the details.
//!
//! ```
//! use bcder_basic_constraints::{basic, Variant};
//!
//! let encoded = basic::encode(true, true, 0).unwrap();
//! assert_eq!(encoded.as_slice(), b"\x30\x06\x01\x01\xff\x02\x01\x00");
//!
//! let decoded = basic::decode(Variant::V2, encoded.as_slice()).unwrap();
//! assert!(decoded.ca());
//! assert_eq!(decoded.path_len(), Some(0));
//! ```
//!
//! The remaining modules contain a small library for handling data encoded
//! in BER and DER that the codec is built upon. Decoding is described in
//! the [`decode`] module, encoding in the [`encode`] module.

pub use self::basic::{
    BasicConstraints, BasicConstraintsExtension, PathLenOutOfRange, Variant,
};
pub use self::bstring::BitString;
pub use self::captured::Captured;
pub use self::ext::Extension;
pub use self::int::Unsigned;
pub use self::mode::Mode;
pub use self::oid::{ConstOid, Oid};
pub use self::tag::Tag;

#[macro_use] pub mod debug;

pub mod basic;
pub mod decode;
pub mod encode;
pub mod ext;

pub mod bstring;
pub mod int;
pub mod oid;
pub mod tag;

mod captured;
mod length;
mod mode;

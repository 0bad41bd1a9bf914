//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt};
use std::borrow::Cow;
use super::source::Pos;


//------------ ErrorKind -----------------------------------------------------

/// The kind of a decoding error.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The data wasn’t correctly encoded.
    Malformed,

    /// The data uses an encoding that isn’t supported.
    ///
    /// This differs from `Malformed` in that the data may well be correctly
    /// encoded. Examples are indefinite length values or tag numbers that
    /// need more than four identifier octets.
    Unimplemented,
}


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// Since all sources are in-memory, the only errors are those about the
/// data itself. Whenever such an error is returned, nothing that was
/// decoded so far may be used.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeError {
    /// What kind of error this is.
    kind: ErrorKind,

    /// A description of what went wrong.
    msg: Cow<'static, str>,

    /// The position in the source where the problem was detected.
    pos: Pos,
}

impl DecodeError {
    fn new(kind: ErrorKind, msg: Cow<'static, str>, pos: Pos) -> Self {
        xerr!(DecodeError { kind, msg, pos })
    }

    /// Creates an error for data that wasn’t correctly encoded.
    pub fn malformed(
        msg: impl Into<Cow<'static, str>>, pos: Pos
    ) -> Self {
        Self::new(ErrorKind::Malformed, msg.into(), pos)
    }

    /// Creates an error for an encoding that isn’t supported.
    pub fn unimplemented(
        msg: impl Into<Cow<'static, str>>, pos: Pos
    ) -> Self {
        Self::new(ErrorKind::Unimplemented, msg.into(), pos)
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message of the error.
    pub fn message(&self) -> &str {
        self.msg.as_ref()
    }

    /// Returns the position in the source where the error was detected.
    pub fn pos(&self) -> Pos {
        self.pos
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ErrorKind::Malformed => {
                write!(f, "{} (at position {})", self.msg, self.pos)
            }
            ErrorKind::Unimplemented => {
                write!(f, "unimplemented: {} (at position {})",
                    self.msg, self.pos
                )
            }
        }
    }
}

impl error::Error for DecodeError { }

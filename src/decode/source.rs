//! The source for decoding data.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{cmp, fmt, mem, ops};
use std::borrow::Cow;
use bytes::Bytes;
use super::error::DecodeError;


//------------ Source --------------------------------------------------------

/// A view into a sequence of octets.
///
/// Sources form the foundation of decoding. They provide the raw octets to
/// decoders. All sources are in-memory. Reading happens in two steps: you
/// first look at the data via [`slice`][Self::slice] and then mark the
/// octets you have processed as consumed via
/// [`advance`][Self::advance]. The position of the source only ever moves
/// forward.
pub trait Source {
    /// Returns the current logical position of the source.
    fn pos(&self) -> Pos;

    /// Requests that at least `len` octets are available.
    ///
    /// Returns the number of octets actually available. This may be less
    /// than `len` if the source has ended or more than `len` if more data
    /// happens to be available.
    fn request(&mut self, len: usize) -> usize;

    /// Returns a slice of the currently available octets.
    fn slice(&self) -> &[u8];

    /// Returns a bytes value containing the first `len` available octets.
    ///
    /// Returns `None` if less than `len` octets are available. The octets
    /// are not consumed.
    fn bytes(&self, len: usize) -> Option<Bytes>;

    /// Marks `len` octets as consumed.
    ///
    /// Returns an error if less than `len` octets are available.
    fn advance(&mut self, len: usize) -> Result<(), DecodeError>;


    //--- Provided methods

    /// Takes a single octet from the source.
    ///
    /// If there aren’t any more octets available from the source, returns
    /// a malformed error.
    fn take_u8(&mut self) -> Result<u8, DecodeError> {
        self.request(1);
        let res = match self.slice().first() {
            Some(res) => *res,
            None => return Err(self.content_err("unexpected end of data"))
        };
        self.advance(1)?;
        Ok(res)
    }

    /// Takes exactly `len` octets from the source.
    fn take_bytes(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        self.request(len);
        let res = match self.bytes(len) {
            Some(res) => res,
            None => return Err(self.content_err("unexpected end of data"))
        };
        self.advance(len)?;
        Ok(res)
    }

    /// Returns a malformed error at the current position of the source.
    fn content_err(
        &self, msg: impl Into<Cow<'static, str>>
    ) -> DecodeError {
        DecodeError::malformed(msg, self.pos())
    }
}


//------------ SliceSource ---------------------------------------------------

/// A source atop a borrowed bytes slice.
#[derive(Clone, Copy, Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        SliceSource { data, pos: 0 }
    }

    /// Returns the octets not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        self.data
    }
}

impl<'a> Source for SliceSource<'a> {
    fn pos(&self) -> Pos {
        self.pos.into()
    }

    fn request(&mut self, _len: usize) -> usize {
        self.data.len()
    }

    fn slice(&self) -> &[u8] {
        self.data
    }

    fn bytes(&self, len: usize) -> Option<Bytes> {
        self.data.get(..len).map(Bytes::copy_from_slice)
    }

    fn advance(&mut self, len: usize) -> Result<(), DecodeError> {
        match self.data.get(len..) {
            Some(tail) => {
                self.data = tail;
                self.pos += len;
                Ok(())
            }
            None => Err(self.content_err("unexpected end of data"))
        }
    }
}


//------------ BytesSource ---------------------------------------------------

/// A source atop a shared bytes value.
///
/// Taking octets from this source does not copy them.
#[derive(Clone, Debug)]
pub struct BytesSource {
    data: Bytes,
    pos: usize,
}

impl BytesSource {
    pub fn new(data: Bytes) -> Self {
        BytesSource { data, pos: 0 }
    }

    /// Returns the octets not yet consumed.
    pub fn remaining(&self) -> &Bytes {
        &self.data
    }
}

impl Source for BytesSource {
    fn pos(&self) -> Pos {
        self.pos.into()
    }

    fn request(&mut self, _len: usize) -> usize {
        self.data.len()
    }

    fn slice(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn bytes(&self, len: usize) -> Option<Bytes> {
        if len <= self.data.len() {
            Some(self.data.slice(..len))
        }
        else {
            None
        }
    }

    fn advance(&mut self, len: usize) -> Result<(), DecodeError> {
        if len > self.data.len() {
            return Err(self.content_err("unexpected end of data"))
        }
        bytes::Buf::advance(&mut self.data, len);
        self.pos += len;
        Ok(())
    }
}


//------------ LimitedSource -------------------------------------------------

/// A source that can be limited to a certain number of octets.
///
/// This type wraps another source and allows access to a limited number
/// of octets only. The limit is changed while descending into and
/// returning from nested values, so the type of the source stays the same
/// at every level of nesting.
///
/// A limit of `None` means no limit.
#[derive(Clone, Debug)]
pub struct LimitedSource<S> {
    source: S,
    limit: Option<usize>,
}

impl<S> LimitedSource<S> {
    /// Creates a new limited source without a limit.
    pub fn new(source: S) -> Self {
        LimitedSource { source, limit: None }
    }

    /// Returns the current limit.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Unconditionally sets a new limit.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit
    }

    /// Converts the limited source back into the underlying source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: Source> LimitedSource<S> {
    /// Reduces the limit to `limit` octets.
    ///
    /// Returns the previous limit. Fails if `limit` exceeds the current
    /// limit, i.e., if a nested value claims to be longer than the value
    /// enclosing it.
    pub fn limit_further(
        &mut self, limit: usize
    ) -> Result<Option<usize>, DecodeError> {
        if let Some(current) = self.limit {
            if limit > current {
                return Err(self.content_err(
                    "value exceeds its enclosing value"
                ))
            }
        }
        Ok(mem::replace(&mut self.limit, Some(limit)))
    }
}

impl<S: Source> Source for LimitedSource<S> {
    fn pos(&self) -> Pos {
        self.source.pos()
    }

    fn request(&mut self, len: usize) -> usize {
        match self.limit {
            Some(limit) => {
                cmp::min(self.source.request(cmp::min(len, limit)), limit)
            }
            None => self.source.request(len)
        }
    }

    fn slice(&self) -> &[u8] {
        let res = self.source.slice();
        match self.limit {
            Some(limit) => res.get(..limit).unwrap_or(res),
            None => res
        }
    }

    fn bytes(&self, len: usize) -> Option<Bytes> {
        match self.limit {
            Some(limit) if len > limit => None,
            _ => self.source.bytes(len)
        }
    }

    fn advance(&mut self, len: usize) -> Result<(), DecodeError> {
        if let Some(limit) = self.limit {
            if len > limit {
                return Err(self.content_err("unexpected end of value"))
            }
        }
        self.source.advance(len)?;
        if let Some(limit) = self.limit.as_mut() {
            *limit -= len
        }
        Ok(())
    }
}


//------------ Pos -----------------------------------------------------------

/// The logical position within a source.
///
/// Values of this type can only be used for diagnostics. They can not be used
/// to determine how far a source has been advanced since it was created. This
/// is why we used a newtype.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Pos(usize);

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl ops::Add for Pos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Pos(self.0 + rhs.0)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


//============ Tests =========================================================

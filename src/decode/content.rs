//! Parsing encoded values.
//!
//! This is a private module. Its public types are re-exported by the
//! parent.

use std::borrow::Cow;
use bytes::Bytes;
use crate::length::Length;
use crate::mode::Mode;
use crate::tag::Tag;
use super::error::DecodeError;
use super::source::{LimitedSource, Pos, Source};


//------------ Content -------------------------------------------------------

/// The content octets of an encoded value.
///
/// A value is either primitive, containing actual octets of an actual value,
/// or constructed, in which case its content contains additional encoded
/// values. This enum is useful for cases where a certain type may be encoded
/// as either a primitive value or a complex constructed value.
///
/// Note that this type represents the content octets only, i.e., it does not
/// contain the tag of the value.
pub enum Content<'a, S: 'a> {
    /// The value is a primitive value.
    Primitive(Primitive<'a, S>),

    /// The value is a constructed value.
    Constructed(Constructed<'a, S>)
}

impl<'a, S: Source + 'a> Content<'a, S> {
    /// Checks that the content has been parsed completely.
    fn exhausted(&mut self) -> Result<(), DecodeError> {
        match self {
            Content::Primitive(inner) => inner.exhausted(),
            Content::Constructed(inner) => inner.exhausted()
        }
    }

    /// Returns the encoding mode used by the value.
    pub fn mode(&self) -> Mode {
        match self {
            Content::Primitive(inner) => inner.mode(),
            Content::Constructed(inner) => inner.mode()
        }
    }

    /// Returns whether this value is a primitive value.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Content::Primitive(_))
    }

    /// Returns whether this value is a constructed value.
    pub fn is_constructed(&self) -> bool {
        matches!(self, Content::Constructed(_))
    }

    /// Converts a reference into one to a primitive value or errors out.
    pub fn as_primitive(
        &mut self
    ) -> Result<&mut Primitive<'a, S>, DecodeError> {
        match self {
            Content::Primitive(inner) => Ok(inner),
            Content::Constructed(inner) => {
                Err(inner.content_err("expected primitive value"))
            }
        }
    }

    /// Converts a reference into one to a constructed value or errors out.
    pub fn as_constructed(
        &mut self
    ) -> Result<&mut Constructed<'a, S>, DecodeError> {
        match self {
            Content::Primitive(inner) => {
                Err(inner.content_err("expected constructed value"))
            }
            Content::Constructed(inner) => Ok(inner),
        }
    }

    /// Skips over the remaining content octets without looking at them.
    pub fn skip_all(&mut self) -> Result<(), DecodeError> {
        match self {
            Content::Primitive(inner) => inner.skip_all(),
            Content::Constructed(inner) => inner.skip_all(),
        }
    }
}


//------------ Primitive -----------------------------------------------------

/// The content octets of a primitive value.
///
/// You will receive a reference to a value of this type through a closure,
/// possibly wrapped in a `Content` value. Your task will be to read out all
/// the octets of the value before returning from the closure or produce an
/// error if the value isn’t correctly encoded. If you read less octets than
/// are available, whoever called the closure will produce an error after
/// you returned. Thus, you can read as many octets as you expect and not
/// bother to check whether that was all available octets.
///
/// Methods prefixed with `to_` convert the content to a certain type. They
/// honour the decoding mode and enforce the stricter DER rules where
/// appropriate.
pub struct Primitive<'a, S: 'a> {
    /// The underlying source limited to the length of the value.
    source: &'a mut LimitedSource<S>,

    /// The decoding mode to operate in.
    mode: Mode,
}

impl<'a, S: 'a> Primitive<'a, S> {
    /// Creates a new primitive from the given source and mode.
    fn new(source: &'a mut LimitedSource<S>, mode: Mode) -> Self {
        Primitive { source, mode }
    }

    /// Returns the current decoding mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the number of remaining octets.
    pub fn remaining(&self) -> usize {
        self.source.limit().unwrap_or(0)
    }
}

impl<'a, S: Source + 'a> Primitive<'a, S> {
    /// Returns the current position in the source.
    pub fn pos(&self) -> Pos {
        self.source.pos()
    }

    /// Returns a malformed error at the current position.
    pub fn content_err(
        &self, msg: impl Into<Cow<'static, str>>
    ) -> DecodeError {
        self.source.content_err(msg)
    }

    /// Takes a single octet from the content.
    pub fn take_u8(&mut self) -> Result<u8, DecodeError> {
        self.source.take_u8()
    }

    /// Takes all remaining content octets.
    pub fn take_all(&mut self) -> Result<Bytes, DecodeError> {
        let len = self.remaining();
        self.source.take_bytes(len)
    }

    /// Skips over all remaining content octets.
    pub fn skip_all(&mut self) -> Result<(), DecodeError> {
        skip_rest(self.source)
    }

    /// Converts the content into a boolean value.
    ///
    /// The content must consist of exactly one octet. In DER mode, this
    /// octet must be either 0 for false or 0xFF for true. In BER mode, any
    /// non-zero value is true.
    pub fn to_bool(&mut self) -> Result<bool, DecodeError> {
        if self.remaining() != 1 {
            return Err(self.content_err("invalid boolean"))
        }
        let res = self.take_u8()?;
        match (self.mode, res) {
            (Mode::Ber, res) => Ok(res != 0),
            (Mode::Der, 0) => Ok(false),
            (Mode::Der, 0xFF) => Ok(true),
            (Mode::Der, _) => Err(self.content_err("invalid boolean")),
        }
    }

    /// Checks that the content has been consumed completely.
    fn exhausted(&mut self) -> Result<(), DecodeError> {
        check_exhausted(self.source)
    }
}


//------------ Constructed ---------------------------------------------------

/// The content octets of a constructed value.
///
/// You will only ever receive a mutable reference to a value of this type
/// as an argument to a closure provided to some function. The closure will
/// have to process all content of the constructed value.
///
/// Since constructed values consist of a sequence of values, the methods
/// allow you to process these values one by one. The most basic of these
/// are [`take_value_if`][Self::take_value_if] and
/// [`take_opt_value_if`][Self::take_opt_value_if] which process exactly one
/// value or up to one value with the given tag. More convenient are the
/// methods for specific types such as
/// [`take_sequence`][Self::take_sequence] or
/// [`take_opt_bool`][Self::take_opt_bool].
///
/// Optional values are detected by looking at the tag of the next value
/// only. If it doesn’t match, nothing is consumed.
pub struct Constructed<'a, S: 'a> {
    /// The underlying source limited to the length of the value.
    ///
    /// At the outermost level, the source is not limited at all.
    source: &'a mut LimitedSource<S>,

    /// The decoding mode to operate in.
    mode: Mode,
}

impl<'a, S: 'a> Constructed<'a, S> {
    /// Creates a new source from the given components.
    fn new(source: &'a mut LimitedSource<S>, mode: Mode) -> Self {
        Constructed { source, mode }
    }

    /// Returns the encoding mode used by the value.
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl<'a, S: Source + 'a> Constructed<'a, S> {
    /// Decodes a source in the given mode.
    ///
    /// The closure `op` receives a constructed value spanning the whole
    /// source and has to process all of it.
    pub fn decode<F, T>(
        source: S, mode: Mode, op: F
    ) -> Result<T, DecodeError>
    where F: FnOnce(&mut Constructed<S>) -> Result<T, DecodeError> {
        let mut source = LimitedSource::new(source);
        let mut cons = Constructed::new(&mut source, mode);
        let res = op(&mut cons)?;
        cons.exhausted()?;
        Ok(res)
    }

    /// Returns the current position in the source.
    pub fn pos(&self) -> Pos {
        self.source.pos()
    }

    /// Returns a malformed error at the current position.
    pub fn content_err(
        &self, msg: impl Into<Cow<'static, str>>
    ) -> DecodeError {
        self.source.content_err(msg)
    }

    /// Checks that all content has been consumed.
    fn exhausted(&mut self) -> Result<(), DecodeError> {
        check_exhausted(self.source)
    }

    /// Skips over all remaining content without looking at it.
    ///
    /// Since the nested values are not parsed, this will not check that
    /// they are correctly encoded.
    pub fn skip_all(&mut self) -> Result<(), DecodeError> {
        skip_rest(self.source)
    }
}

/// # Processing Contained Values
///
/// The methods in this section each process one value of the constructed
/// value’s content.
impl<'a, S: Source + 'a> Constructed<'a, S> {
    /// Process one value of content.
    ///
    /// If `expected` is some tag, only a value with this tag is processed.
    /// Otherwise any value is. If there is no next value or if its tag
    /// doesn’t match, returns `Ok(None)` without consuming anything.
    ///
    /// The closure receives the tag and content of the value. Upon its
    /// return, the content has to have been consumed completely.
    fn process_next_value<F, T>(
        &mut self, expected: Option<Tag>, op: F
    ) -> Result<Option<T>, DecodeError>
    where F: FnOnce(Tag, &mut Content<S>) -> Result<T, DecodeError> {
        let (tag, constructed) = match expected {
            Some(expected) => match expected.take_from_if(self.source)? {
                Some(constructed) => (expected, constructed),
                None => return Ok(None)
            }
            None => match Tag::take_opt_from(self.source)? {
                Some(res) => res,
                None => return Ok(None)
            }
        };
        let start = self.pos();
        let len = match Length::take_from(self.source, self.mode)?.definite() {
            Some(len) => len,
            None => {
                return Err(DecodeError::unimplemented(
                    "indefinite length values", start
                ))
            }
        };
        let outer = self.source.limit_further(len)?;
        let res = {
            let mut content = if constructed {
                Content::Constructed(
                    Constructed::new(&mut *self.source, self.mode)
                )
            }
            else {
                Content::Primitive(
                    Primitive::new(&mut *self.source, self.mode)
                )
            };
            let res = op(tag, &mut content)?;
            content.exhausted()?;
            res
        };
        self.source.set_limit(outer.map(|limit| limit - len));
        Ok(Some(res))
    }

    /// Makes sure a mandatory value was present.
    fn mandatory<T>(
        &self, res: Option<T>, expected: Tag
    ) -> Result<T, DecodeError> {
        match res {
            Some(res) => Ok(res),
            None => Err(self.content_err(format!("expected {}", expected)))
        }
    }

    /// Processes a mandatory value with the given tag.
    ///
    /// If the next value has the tag `expected`, its content is being given
    /// to the closure which has to process it completely and return
    /// whatever is being returned by the method. If there is no next value,
    /// or if it has a different tag, returns a malformed error.
    pub fn take_value_if<F, T>(
        &mut self, expected: Tag, op: F
    ) -> Result<T, DecodeError>
    where F: FnOnce(&mut Content<S>) -> Result<T, DecodeError> {
        let res = self.take_opt_value_if(expected, op)?;
        self.mandatory(res, expected)
    }

    /// Processes an optional value with the given tag.
    ///
    /// If the next value has the tag `expected`, its content is being given
    /// to the closure which has to process it completely and return
    /// whatever is to be returned by the method. If there is no next value
    /// or if it has a different tag, returns `Ok(None)`.
    pub fn take_opt_value_if<F, T>(
        &mut self, expected: Tag, op: F
    ) -> Result<Option<T>, DecodeError>
    where F: FnOnce(&mut Content<S>) -> Result<T, DecodeError> {
        self.process_next_value(Some(expected), |_, content| op(content))
    }

    /// Processes an optional value with any tag.
    ///
    /// The closure receives both the tag and the content of the value.
    pub fn take_opt_value<F, T>(
        &mut self, op: F
    ) -> Result<Option<T>, DecodeError>
    where F: FnOnce(Tag, &mut Content<S>) -> Result<T, DecodeError> {
        self.process_next_value(None, op)
    }

    /// Processes a mandatory constructed value with the given tag.
    pub fn take_constructed_if<F, T>(
        &mut self, expected: Tag, op: F
    ) -> Result<T, DecodeError>
    where F: FnOnce(&mut Constructed<S>) -> Result<T, DecodeError> {
        let res = self.take_opt_constructed_if(expected, op)?;
        self.mandatory(res, expected)
    }

    /// Processes an optional constructed value with the given tag.
    ///
    /// If the next value has the right tag but is primitive, returns a
    /// malformed error.
    pub fn take_opt_constructed_if<F, T>(
        &mut self, expected: Tag, op: F
    ) -> Result<Option<T>, DecodeError>
    where F: FnOnce(&mut Constructed<S>) -> Result<T, DecodeError> {
        self.take_opt_value_if(expected, |content| {
            op(content.as_constructed()?)
        })
    }

    /// Processes a mandatory primitive value with the given tag.
    pub fn take_primitive_if<F, T>(
        &mut self, expected: Tag, op: F
    ) -> Result<T, DecodeError>
    where F: FnOnce(&mut Primitive<S>) -> Result<T, DecodeError> {
        let res = self.take_opt_primitive_if(expected, op)?;
        self.mandatory(res, expected)
    }

    /// Processes an optional primitive value with the given tag.
    ///
    /// If the next value has the right tag but is constructed, returns a
    /// malformed error.
    pub fn take_opt_primitive_if<F, T>(
        &mut self, expected: Tag, op: F
    ) -> Result<Option<T>, DecodeError>
    where F: FnOnce(&mut Primitive<S>) -> Result<T, DecodeError> {
        self.take_opt_value_if(expected, |content| {
            op(content.as_primitive()?)
        })
    }

    /// Processes a mandatory SEQUENCE value.
    pub fn take_sequence<F, T>(&mut self, op: F) -> Result<T, DecodeError>
    where F: FnOnce(&mut Constructed<S>) -> Result<T, DecodeError> {
        self.take_constructed_if(Tag::SEQUENCE, op)
    }

    /// Processes an optional SEQUENCE value.
    pub fn take_opt_sequence<F, T>(
        &mut self, op: F
    ) -> Result<Option<T>, DecodeError>
    where F: FnOnce(&mut Constructed<S>) -> Result<T, DecodeError> {
        self.take_opt_constructed_if(Tag::SEQUENCE, op)
    }

    /// Processes a mandatory BOOLEAN value.
    pub fn take_bool(&mut self) -> Result<bool, DecodeError> {
        self.take_primitive_if(Tag::BOOLEAN, |prim| prim.to_bool())
    }

    /// Processes an optional BOOLEAN value.
    pub fn take_opt_bool(&mut self) -> Result<Option<bool>, DecodeError> {
        self.take_opt_primitive_if(Tag::BOOLEAN, |prim| prim.to_bool())
    }

    /// Processes a BOOLEAN value declared with a DEFAULT.
    ///
    /// If the value is missing, returns `default`. In DER mode, a value
    /// that is present and equal to `default` is a malformed error since
    /// DER requires such values to be left out. BER mode accepts them.
    pub fn take_default_bool(
        &mut self, default: bool
    ) -> Result<bool, DecodeError> {
        let start = self.pos();
        match self.take_opt_bool()? {
            Some(value) if value == default && self.mode.is_restricted() => {
                Err(DecodeError::malformed(
                    "explicitly encoded DEFAULT value", start
                ))
            }
            Some(value) => Ok(value),
            None => Ok(default),
        }
    }
}


//------------ Helper Functions ----------------------------------------------

/// Checks that a limited source has been fully consumed.
///
/// If there is no limit, the underlying source must have ended.
fn check_exhausted<S: Source>(
    source: &mut LimitedSource<S>
) -> Result<(), DecodeError> {
    match source.limit() {
        Some(0) => Ok(()),
        Some(_) => {
            if source.request(1) == 0 {
                Err(source.content_err("unexpected end of data"))
            }
            else {
                Err(source.content_err("trailing data"))
            }
        }
        None => {
            if source.request(1) == 0 {
                Ok(())
            }
            else {
                Err(source.content_err("trailing data"))
            }
        }
    }
}

/// Skips over everything up to the limit of a source.
fn skip_rest<S: Source>(
    source: &mut LimitedSource<S>
) -> Result<(), DecodeError> {
    let len = match source.limit() {
        Some(len) => len,
        None => source.request(usize::MAX),
    };
    if source.request(len) < len {
        return Err(source.content_err("unexpected end of data"))
    }
    source.advance(len)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::{ErrorKind, SliceSource};
    use super::*;

    fn decode<'d, F, T>(
        data: &'d [u8], mode: Mode, op: F
    ) -> Result<T, DecodeError>
    where
        F: FnOnce(&mut Constructed<SliceSource<'d>>)
            -> Result<T, DecodeError>
    {
        Constructed::decode(SliceSource::new(data), mode, op)
    }

    #[test]
    fn take_sequence() {
        assert_eq!(
            decode(b"\x30\x03\x01\x01\xff", Mode::Der, |cons| {
                cons.take_sequence(|cons| cons.take_bool())
            }).unwrap(),
            true
        );

        // Trailing data after the sequence.
        assert!(decode(b"\x30\x00\x00", Mode::Der, |cons| {
            cons.take_sequence(|_| Ok(()))
        }).is_err());

        // Trailing data inside the sequence.
        assert!(decode(b"\x30\x03\x01\x01\xff", Mode::Der, |cons| {
            cons.take_sequence(|_| Ok(()))
        }).is_err());

        // Sequence is primitive.
        assert!(decode(b"\x10\x00", Mode::Der, |cons| {
            cons.take_sequence(|_| Ok(()))
        }).is_err());

        // Missing sequence.
        assert!(decode(b"", Mode::Der, |cons| {
            cons.take_sequence(|_| Ok(()))
        }).is_err());
    }

    #[test]
    fn truncated() {
        let data = b"\x30\x06\x01\x01\xff\x02\x01\x00";
        for len in 0..data.len() {
            assert!(decode(&data[..len], Mode::Der, |cons| {
                cons.take_sequence(|cons| {
                    cons.take_bool()?;
                    cons.take_primitive_if(Tag::INTEGER, |prim| {
                        prim.take_all()
                    })
                })
            }).is_err());
        }
    }

    #[test]
    fn nested_length_exceeds_outer() {
        // The boolean claims two octets but the sequence only has one left.
        let err = decode(b"\x30\x03\x01\x02\xff\x00", Mode::Der, |cons| {
            cons.take_sequence(|cons| {
                cons.take_primitive_if(Tag::BOOLEAN, |prim| prim.take_all())
            })
        }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn optional_values() {
        let res = decode(b"\x30\x03\x02\x01\x05", Mode::Der, |cons| {
            cons.take_sequence(|cons| {
                let flag = cons.take_opt_bool()?;
                let int = cons.take_opt_primitive_if(Tag::INTEGER, |prim| {
                    prim.take_u8()
                })?;
                Ok((flag, int))
            })
        }).unwrap();
        assert_eq!(res, (None, Some(5)));
    }

    #[test]
    fn booleans() {
        let take = |data: &[u8], mode| decode(data, mode, |cons| {
            cons.take_bool()
        });
        assert_eq!(take(b"\x01\x01\x00", Mode::Der).unwrap(), false);
        assert_eq!(take(b"\x01\x01\xff", Mode::Der).unwrap(), true);
        assert!(take(b"\x01\x01\x01", Mode::Der).is_err());
        assert_eq!(take(b"\x01\x01\x01", Mode::Ber).unwrap(), true);
        assert!(take(b"\x01\x00", Mode::Ber).is_err());
        assert!(take(b"\x01\x02\xff\xff", Mode::Ber).is_err());
    }

    #[test]
    fn default_bool() {
        let take = |data: &[u8], mode| decode(data, mode, |cons| {
            cons.take_default_bool(false)
        });
        assert_eq!(take(b"", Mode::Der).unwrap(), false);
        assert_eq!(take(b"\x01\x01\xff", Mode::Der).unwrap(), true);
        assert!(take(b"\x01\x01\x00", Mode::Der).is_err());
        assert_eq!(take(b"\x01\x01\x00", Mode::Ber).unwrap(), false);
    }

    #[test]
    fn indefinite_length() {
        let err = decode(b"\x30\x80\x00\x00", Mode::Ber, |cons| {
            cons.take_sequence(|_| Ok(()))
        }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unimplemented);
        assert!(decode(b"\x30\x80\x00\x00", Mode::Der, |cons| {
            cons.take_sequence(|_| Ok(()))
        }).is_err());
    }

    #[test]
    fn skip_values() {
        let data = b"\x30\x08\x30\x02\x05\x00\x04\x02ab";
        decode(data, Mode::Der, |cons| {
            cons.take_sequence(|cons| {
                while cons.take_opt_value(|tag, content| {
                    assert!(
                        (tag == Tag::SEQUENCE && content.is_constructed())
                        || (tag == Tag::OCTET_STRING
                            && content.is_primitive())
                    );
                    content.skip_all()
                })?.is_some() { }
                Ok(())
            })
        }).unwrap();
    }
}

//! The decoding mode.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::{Constructed, DecodeError, Source};


//------------ Mode ----------------------------------------------------------

/// The set of encoding rules to apply when decoding.
///
/// Certificate extensions are supposed to be DER encoded, so that is the
/// default. Since plenty of certificates out there contain data that is
/// only valid BER, decoding can be relaxed by choosing [`Mode::Ber`].
///
/// Encoding always produces DER, which is also valid BER.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules, allowing alternative encodings
    /// for some types such as any non-zero octet for a true BOOLEAN,
    /// explicitly encoded DEFAULT values, or length octets that are longer
    /// than necessary.
    Ber,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length values and require the
    /// shortest possible encoding. Additional rules apply to some types.
    #[default]
    Der,
}

impl Mode {
    /// Decodes a source using this mode.
    ///
    /// The closure `op` receives a constructed value spanning the entire
    /// source. It must process all of it, otherwise a trailing data error
    /// is returned.
    pub fn decode<S, F, T>(self, source: S, op: F) -> Result<T, DecodeError>
    where
        S: Source,
        F: FnOnce(&mut Constructed<S>) -> Result<T, DecodeError>,
    {
        Constructed::decode(source, self, op)
    }

    /// Returns whether the mode imposes the DER restrictions.
    pub fn is_restricted(self) -> bool {
        matches!(self, Mode::Der)
    }
}

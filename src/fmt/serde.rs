/*!
Shared helpers for the `serde` implementations in this crate.

Offsets and zone identifiers serialize as their canonical identifier strings.
Timestamps and durations serialize as a two element sequence of whole seconds
and nanoseconds, since this crate has no calendar formatting of its own.
*/

use serde::{de, ser::SerializeTuple};

/// Serializes a `(seconds, nanoseconds)` pair as a two element tuple.
pub(crate) fn serialize_pair<S: serde::Serializer>(
    se: S,
    seconds: i64,
    nanoseconds: i64,
) -> Result<S::Ok, S::Error> {
    let mut tuple = se.serialize_tuple(2)?;
    tuple.serialize_element(&seconds)?;
    tuple.serialize_element(&nanoseconds)?;
    tuple.end()
}

/// A visitor for a two element sequence of integers that builds a value with
/// a fallible constructor.
pub(crate) struct PairVisitor<T> {
    pub(crate) expecting: &'static str,
    pub(crate) make: fn(i64, i64) -> Result<T, crate::Error>,
}

impl<'de, T> de::Visitor<'de> for PairVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.expecting)
    }

    #[inline]
    fn visit_seq<A: de::SeqAccess<'de>>(
        self,
        mut seq: A,
    ) -> Result<T, A::Error> {
        let first: i64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let second: i64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        (self.make)(first, second).map_err(de::Error::custom)
    }
}

/// A visitor for a string that builds a value with a fallible parser.
pub(crate) struct StrVisitor<T> {
    pub(crate) expecting: &'static str,
    pub(crate) parse: fn(&str) -> Result<T, crate::Error>,
}

impl<'de, T> de::Visitor<'de> for StrVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.expecting)
    }

    #[inline]
    fn visit_str<E: de::Error>(self, value: &str) -> Result<T, E> {
        (self.parse)(value).map_err(de::Error::custom)
    }

    #[inline]
    fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<T, E> {
        let value = core::str::from_utf8(value).map_err(|_| {
            de::Error::invalid_value(de::Unexpected::Bytes(value), &self)
        })?;
        self.visit_str(value)
    }
}

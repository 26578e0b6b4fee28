/*!
Encoding values of this crate for persistence.

The [`wire`] module provides a compact binary format in which every record
starts with a one byte type tag. The tag space is shared with value types
that this crate doesn't define (like calendar dates), so that records
written by a larger system can be read here and vice versa, as long as they
only use the tags this crate understands.

When the `serde` crate feature is enabled, offsets, zone identifiers,
timestamps and durations also implement `Serialize` and `Deserialize`.
Offsets and zone identifiers use their canonical identifier strings.
*/

#[cfg(feature = "serde")]
pub(crate) mod serde;
pub mod wire;

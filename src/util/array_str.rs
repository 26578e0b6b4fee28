/// A tiny fixed capacity string stored inline.
///
/// This is used for canonical offset identifiers, which are never longer than
/// `±HH:MM:SS`. Storing them inline keeps `ZoneOffset` a `Copy` type whose
/// constants can be built at compile time.
///
/// `N` must be less than `256` so that the length fits in a `u8`.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub(crate) struct ArrayStr<const N: usize> {
    /// The ASCII bytes that make up the string.
    ///
    /// Only the `0..self.len` sub-slice is meaningful. Bytes after it are
    /// always zero, which makes the derived `Eq` and `Hash` impls agree with
    /// string equality.
    bytes: [u8; N],
    /// The number of bytes used by the string in `bytes`.
    len: u8,
}

impl<const N: usize> ArrayStr<N> {
    /// Creates a new empty fixed capacity string.
    pub(crate) const fn empty() -> ArrayStr<N> {
        ArrayStr { bytes: [0; N], len: 0 }
    }

    /// Appends the given ASCII byte to the end of this string.
    ///
    /// # Panics
    ///
    /// When the byte is not ASCII or when the capacity is exceeded. In a
    /// const context, this results in a compile error.
    pub(crate) const fn push_ascii(mut self, byte: u8) -> ArrayStr<N> {
        assert!(byte.is_ascii(), "ArrayStr only supports ASCII");
        assert!(N <= u8::MAX as usize, "size of ArrayStr is too big");
        self.bytes[self.len as usize] = byte;
        self.len += 1;
        self
    }

    /// Returns this array string as a string slice.
    pub(crate) fn as_str(&self) -> &str {
        // OK because only ASCII bytes are ever pushed.
        core::str::from_utf8(&self.bytes[..usize::from(self.len)]).unwrap()
    }
}

impl<const N: usize> core::fmt::Debug for ArrayStr<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> core::fmt::Display for ArrayStr<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self.as_str(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push() {
        const PLUS_FIVE: ArrayStr<9> = ArrayStr::empty()
            .push_ascii(b'+')
            .push_ascii(b'0')
            .push_ascii(b'5');
        assert_eq!(PLUS_FIVE.as_str(), "+05");
        assert_eq!(PLUS_FIVE.to_string(), "+05");
        assert_eq!(ArrayStr::<9>::empty().as_str(), "");
    }

    #[test]
    fn equality_ignores_capacity_tail() {
        let a = ArrayStr::<9>::empty().push_ascii(b'Z');
        let b = ArrayStr::<9>::empty().push_ascii(b'Z');
        assert_eq!(a, b);
        assert_ne!(a, b.push_ascii(b'Z'));
    }

    #[test]
    #[should_panic]
    fn capacity_exceeded() {
        let _ = ArrayStr::<1>::empty().push_ascii(b'a').push_ascii(b'b');
    }
}

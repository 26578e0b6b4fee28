use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    Decode { what: &'static str },
    DurationOutOfRange { seconds: i64, nanoseconds: i32 },
    Encode { what: &'static str },
    InvalidUtf8,
    RegionIdTooLong { len: usize },
    UnexpectedOffset,
    UnknownDecodeType { tag: u8 },
    UnknownEncodeType { tag: u8, value: &'static str },
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Wire(err).into()
    }
}

impl error::IntoError for Error {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::Error::*;

        match *self {
            Decode { what } => write!(f, "failed to decode {what}"),
            DurationOutOfRange { seconds, nanoseconds } => write!(
                f,
                "duration of {seconds} seconds and {nanoseconds} \
                 nanoseconds is out of range",
            ),
            Encode { what } => write!(f, "failed to encode {what}"),
            InvalidUtf8 => {
                f.write_str("region identifier is not valid UTF-8")
            }
            RegionIdTooLong { len } => write!(
                f,
                "region identifier of length {len} exceeds the \
                 maximum encodable length of {max}",
                max = u16::MAX,
            ),
            UnexpectedOffset => f.write_str(
                "expected region identifier, but found \
                 an offset identifier",
            ),
            UnknownDecodeType { tag } => write!(
                f,
                "stream corrupted: unknown serialized type tag {tag}",
            ),
            UnknownEncodeType { tag, value } => write!(
                f,
                "invalid class: unknown serialized type tag {tag} \
                 for {value} value",
            ),
        }
    }
}

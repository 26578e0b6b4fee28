use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    InvalidLength { id: Box<str> },
    MissingColon { id: Box<str> },
    MissingSign { id: Box<str> },
    NonNumeric { id: Box<str> },
    OutOfRange { seconds: i64 },
    SignMismatch { hours: i8, minutes: i8, seconds: i8 },
}

impl Error {
    pub(crate) fn invalid_length(id: &str) -> Error {
        Error::InvalidLength { id: id.into() }
    }

    pub(crate) fn missing_colon(id: &str) -> Error {
        Error::MissingColon { id: id.into() }
    }

    pub(crate) fn missing_sign(id: &str) -> Error {
        Error::MissingSign { id: id.into() }
    }

    pub(crate) fn non_numeric(id: &str) -> Error {
        Error::NonNumeric { id: id.into() }
    }
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::TzOffset(err).into()
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
            InvalidLength { ref id } => write!(
                f,
                "invalid time zone offset `{}`: expected one of \
                 `Z`, `±h`, `±hh`, `±hhmm`, `±hh:mm`, \
                 `±hhmmss` or `±hh:mm:ss`",
                id.escape_debug(),
            ),
            MissingColon { ref id } => write!(
                f,
                "invalid time zone offset `{}`: \
                 expected `:` separator between components",
                id.escape_debug(),
            ),
            MissingSign { ref id } => write!(
                f,
                "invalid time zone offset `{}`: \
                 expected `+` or `-` as the first character",
                id.escape_debug(),
            ),
            NonNumeric { ref id } => write!(
                f,
                "invalid time zone offset `{}`: \
                 expected exactly two ASCII digits for each component",
                id.escape_debug(),
            ),
            OutOfRange { seconds } => write!(
                f,
                "time zone offset total seconds {seconds} is not in the \
                 valid range of -64800..=64800 (-18:00 to +18:00)",
            ),
            SignMismatch { hours, minutes, seconds } => write!(
                f,
                "time zone offset components \
                 (hours={hours}, minutes={minutes}, seconds={seconds}) \
                 must not have mixed signs",
            ),
        }
    }
}

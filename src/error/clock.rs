use crate::{error, SignedDuration};

#[derive(Clone, Debug)]
pub(crate) enum Error {
    InvalidTick { duration: SignedDuration },
    NegativeTick,
    OffsetOverflow,
    TickOverflow,
    TruncateOverflow { millis: i64 },
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Clock(err).into()
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
            InvalidTick { duration } => write!(
                f,
                "invalid tick duration {duration:?}: it must either be \
                 a whole number of milliseconds or divide evenly \
                 into one second",
            ),
            NegativeTick => {
                f.write_str("tick duration for clock must not be negative")
            }
            OffsetOverflow => f.write_str(
                "adding duration to the reading of an offset clock overflowed",
            ),
            TickOverflow => f.write_str(
                "tick duration for clock overflows a 64-bit \
                 number of nanoseconds",
            ),
            TruncateOverflow { millis } => write!(
                f,
                "truncating clock reading of {millis} milliseconds \
                 down to a tick boundary overflowed",
            ),
        }
    }
}

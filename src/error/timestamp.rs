use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    OverflowAddDuration,
    OverflowMilliseconds,
    OverflowNanoseconds,
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Timestamp(err).into()
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
            OverflowAddDuration => f.write_str(
                "adding duration to timestamp overflowed \
                 the supported range of timestamps",
            ),
            OverflowMilliseconds => f.write_str(
                "converting to a 64-bit number of milliseconds overflowed",
            ),
            OverflowNanoseconds => f.write_str(
                "converting to a 64-bit number of nanoseconds overflowed",
            ),
        }
    }
}

use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    DuplicateRegion { id: Box<str> },
    InvalidPrefix { prefix: Box<str> },
    InvalidPrefixedOffset { id: Box<str> },
    InvalidRegionId { id: Box<str> },
    UnknownRegion { id: Box<str> },
    UnsortedTransitions { index: usize },
}

impl Error {
    pub(crate) fn duplicate_region(id: &str) -> Error {
        Error::DuplicateRegion { id: id.into() }
    }

    pub(crate) fn invalid_prefix(prefix: &str) -> Error {
        Error::InvalidPrefix { prefix: prefix.into() }
    }

    pub(crate) fn invalid_prefixed_offset(id: &str) -> Error {
        Error::InvalidPrefixedOffset { id: id.into() }
    }

    pub(crate) fn invalid_region_id(id: &str) -> Error {
        Error::InvalidRegionId { id: id.into() }
    }

    pub(crate) fn unknown_region(id: &str) -> Error {
        Error::UnknownRegion { id: id.into() }
    }
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::TzZone(err).into()
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
            DuplicateRegion { ref id } => write!(
                f,
                "unable to register rules provider since region `{id}` \
                 is already provided by another registered provider",
            ),
            InvalidPrefix { ref prefix } => write!(
                f,
                "invalid zone prefix `{}`: expected one of \
                 `UTC`, `GMT`, `UT` or the empty string",
                prefix.escape_debug(),
            ),
            InvalidPrefixedOffset { ref id } => write!(
                f,
                "invalid offset-based zone identifier `{}`",
                id.escape_debug(),
            ),
            InvalidRegionId { ref id } => write!(
                f,
                "invalid region-based zone identifier `{}`: expected \
                 at least two characters, an ASCII letter first and \
                 only ASCII letters, digits or one of `~/._+-` after that",
                id.escape_debug(),
            ),
            UnknownRegion { ref id } => write!(
                f,
                "unknown time zone region `{}`: \
                 no registered rules provider has rules for it",
                id.escape_debug(),
            ),
            UnsortedTransitions { index } => write!(
                f,
                "zone rules transition at index {index} does not \
                 occur strictly after the previous transition",
            ),
        }
    }
}

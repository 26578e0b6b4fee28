use std::sync::Arc;

pub(crate) mod clock;
pub(crate) mod timestamp;
pub(crate) mod tz;
pub(crate) mod wire;

/// An error that can occur in this crate.
///
/// Most errors come from validating untrusted input: a malformed offset
/// string, a region identifier with an illegal character or a time zone
/// offset that is out of range. Other errors exist as well:
///
/// * A region identifier that isn't known to any registered rules provider.
/// * An invalid clock configuration, such as a tick duration that doesn't
/// divide evenly into one second.
/// * Arithmetic overflow when composing clocks.
/// * An unrecognized type tag in the wire format, or an I/O error while
/// reading or writing it.
///
/// # Introspection is limited
///
/// Other than implementing the [`std::error::Error`] trait, the
/// [`core::fmt::Debug`] trait and the [`core::fmt::Display`] trait, this
/// error type provides a handful of predicates like [`Error::is_range`] and
/// [`Error::is_invalid_format`]. The predicates always inspect the root cause
/// of an error, so wrapping an error with more context never changes which
/// predicates return `true`.
///
/// # Design
///
/// This crate follows the "One True God Error Type Pattern," where only one
/// error type exists for a variety of different operations. Finer grained
/// error types compose poorly. For example, parsing a `ZoneId` can fail
/// because of a bad region name, an unknown region or a bad offset.
#[derive(Clone)]
pub struct Error {
    /// The internal representation of an error.
    ///
    /// This is in an `Arc` to make an `Error` cloneable. It could otherwise
    /// be automatically cloneable, but it embeds a `std::io::Error`, which
    /// isn't cloneable.
    ///
    /// This also makes clones cheap, and makes the size of an error equal to
    /// one word.
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Creates a new error value from `core::fmt::Arguments`.
    ///
    /// It is expected to use [`format_args!`](format_args) from
    /// Rust's standard library (available in `core`) to create a
    /// `core::fmt::Arguments`.
    ///
    /// This is mostly useful for implementations of
    /// [`InstantSource`](crate::clock::InstantSource) or
    /// [`ZoneRulesProvider`](crate::tz::ZoneRulesProvider) that need to
    /// report their own failures.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::Error;
    ///
    /// let err = Error::from_args(format_args!("time server unreachable"));
    /// assert_eq!(err.to_string(), "time server unreachable");
    /// ```
    pub fn from_args<'a>(message: core::fmt::Arguments<'a>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::from_args(message)))
    }

    /// Returns true when this error originated from malformed textual input.
    ///
    /// For example, an offset string like `+5:00`, a region identifier
    /// like `X` or a wire encoded region whose bytes aren't UTF-8.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::tz::{ZoneId, ZoneOffset};
    ///
    /// assert!(ZoneOffset::parse("+5:00").unwrap_err().is_invalid_format());
    /// assert!(ZoneId::parse("X").unwrap_err().is_invalid_format());
    /// ```
    pub fn is_invalid_format(&self) -> bool {
        use self::{
            tz::{offset::Error as OffsetError, zone::Error as ZoneError},
            wire::Error as WireError,
            ErrorKind::*,
        };

        matches!(
            *self.root().kind(),
            TzOffset(
                OffsetError::InvalidLength { .. }
                    | OffsetError::MissingSign { .. }
                    | OffsetError::MissingColon { .. }
                    | OffsetError::NonNumeric { .. }
            ) | TzZone(ZoneError::InvalidRegionId { .. })
                | Wire(WireError::InvalidUtf8 | WireError::UnexpectedOffset)
        )
    }

    /// Returns true when this error originated as a result of a value being
    /// out of its supported range.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::{civil::Month, tz::ZoneOffset};
    ///
    /// assert!(ZoneOffset::parse("+19:00").unwrap_err().is_range());
    /// assert!(ZoneOffset::from_seconds(64_801).unwrap_err().is_range());
    /// assert!(Month::new(13).unwrap_err().is_range());
    /// ```
    pub fn is_range(&self) -> bool {
        use self::{
            tz::offset::Error as OffsetError, wire::Error as WireError,
            ErrorKind::*,
        };

        matches!(
            *self.root().kind(),
            Bounds(_)
                | TzOffset(
                    OffsetError::SignMismatch { .. }
                        | OffsetError::OutOfRange { .. }
                )
                | Wire(WireError::DurationOutOfRange { .. })
        )
    }

    /// Returns true when this error originated as a result of an invalid
    /// configuration of parameters to a function call.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::{clock::Clock, SignedDuration};
    ///
    /// let tick = SignedDuration::from_nanos(3_000_001);
    /// let err = Clock::tick(Clock::system_utc(), tick).unwrap_err();
    /// assert!(err.is_invalid_parameter());
    /// ```
    pub fn is_invalid_parameter(&self) -> bool {
        use self::{
            clock::Error as ClockError, tz::zone::Error as ZoneError,
            ErrorKind::*,
        };

        matches!(
            *self.root().kind(),
            Clock(
                ClockError::NegativeTick | ClockError::InvalidTick { .. }
            ) | TzZone(
                ZoneError::InvalidPrefix { .. }
                    | ZoneError::DuplicateRegion { .. }
                    | ZoneError::UnsortedTransitions { .. }
            )
        )
    }

    /// Returns true when this error originated from a region identifier that
    /// is syntactically valid but unknown to every registered rules provider.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::tz::ZoneId;
    ///
    /// let err = ZoneId::parse("Mars/Olympus_Mons").unwrap_err();
    /// assert!(err.is_unknown_region());
    /// ```
    pub fn is_unknown_region(&self) -> bool {
        use self::{tz::zone::Error as ZoneError, ErrorKind::*};

        matches!(*self.root().kind(), TzZone(ZoneError::UnknownRegion { .. }))
    }

    /// Returns true when this error originated from arithmetic overflow.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::{SignedDuration, Timestamp};
    ///
    /// let err = Timestamp::MAX
    ///     .checked_add(SignedDuration::from_secs(1))
    ///     .unwrap_err();
    /// assert!(err.is_overflow());
    /// ```
    pub fn is_overflow(&self) -> bool {
        use self::{clock::Error as ClockError, ErrorKind::*};

        matches!(
            *self.root().kind(),
            Timestamp(_)
                | Clock(
                    ClockError::OffsetOverflow
                        | ClockError::TickOverflow
                        | ClockError::TruncateOverflow { .. }
                )
        )
    }

    /// Returns true when this error originated from trying to encode a value
    /// with a wire tag that this crate has no writer for.
    ///
    /// This is deliberately distinct from [`Error::is_unknown_decode_type`].
    /// An unknown tag while encoding is a programming error on the caller's
    /// side, while an unknown tag while decoding indicates corrupt input.
    pub fn is_unknown_encode_type(&self) -> bool {
        use self::{wire::Error as WireError, ErrorKind::*};

        matches!(*self.root().kind(), Wire(WireError::UnknownEncodeType { .. }))
    }

    /// Returns true when this error originated from reading a wire tag that
    /// this crate has no reader for.
    pub fn is_unknown_decode_type(&self) -> bool {
        use self::{wire::Error as WireError, ErrorKind::*};

        matches!(*self.root().kind(), Wire(WireError::UnknownDecodeType { .. }))
    }

    /// Returns true when this error originated from an I/O failure while
    /// reading or writing the wire format.
    pub fn is_io(&self) -> bool {
        matches!(*self.root().kind(), ErrorKind::IO(_))
    }
}

impl Error {
    /// Creates a new error from the bounds checking layer.
    pub(crate) fn bounds(err: crate::util::b::BoundsError) -> Error {
        Error::from(ErrorKind::Bounds(err))
    }

    /// A convenience constructor for building an I/O error.
    ///
    /// This returns an error that is just a simple wrapper around the
    /// `std::io::Error` type. In general, callers should always attach some
    /// kind of context to this error (like which value was being decoded).
    #[inline(never)]
    #[cold]
    pub(crate) fn io(err: std::io::Error) -> Error {
        Error::from(ErrorKind::IO(IOError { err }))
    }

    pub(crate) fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }
        let inner = err.inner.as_mut().unwrap();
        assert!(inner.cause.is_none(), "cause of consequence must be `None`");
        // OK because we just created this error so the Arc
        // has one reference.
        Arc::get_mut(inner).unwrap().cause = Some(self);
        err
    }

    /// Returns the root error in this chain.
    fn root(&self) -> &Error {
        // OK because `Error::chain` is guaranteed to return a non-empty
        // iterator.
        self.chain().last().unwrap()
    }

    /// Returns a chain of error values.
    ///
    /// This starts with the most recent error added to the chain. That is,
    /// the highest level context. The last error in the chain is always the
    /// "root" cause. That is, the error closest to the point where something
    /// has gone wrong.
    ///
    /// The iterator returned is guaranteed to yield at least one error.
    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    /// Returns the kind of this error.
    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f
                    .debug_struct("Error")
                    .field("kind", &"None")
                    .finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

/// The underlying kind of a [`Error`].
#[derive(Debug)]
enum ErrorKind {
    Adhoc(AdhocError),
    Bounds(crate::util::b::BoundsError),
    Clock(self::clock::Error),
    IO(IOError),
    Timestamp(self::timestamp::Error),
    TzOffset(self::tz::offset::Error),
    TzZone(self::tz::zone::Error),
    Unknown,
    Wire(self::wire::Error),
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match *self {
            Adhoc(ref msg) => core::fmt::Display::fmt(msg, f),
            Bounds(ref err) => core::fmt::Display::fmt(err, f),
            Clock(ref err) => core::fmt::Display::fmt(err, f),
            IO(ref err) => core::fmt::Display::fmt(err, f),
            Timestamp(ref err) => core::fmt::Display::fmt(err, f),
            TzOffset(ref err) => core::fmt::Display::fmt(err, f),
            TzZone(ref err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown zoneclock error"),
            Wire(ref err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { inner: Some(Arc::new(ErrorInner { kind, cause: None })) }
    }
}

/// A generic error message.
///
/// This is only used to support the `Error::from_args` public API, which
/// permits users to manifest their own `Error` values from an arbitrary
/// message.
struct AdhocError {
    message: Box<str>,
}

impl AdhocError {
    fn from_args<'a>(message: core::fmt::Arguments<'a>) -> AdhocError {
        let message = message.to_string().into_boxed_str();
        AdhocError { message }
    }
}

impl std::error::Error for AdhocError {}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.message, f)
    }
}

impl core::fmt::Debug for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.message, f)
    }
}

/// A `std::io::Error`.
struct IOError {
    err: std::io::Error,
}

impl std::error::Error for IOError {}

impl core::fmt::Display for IOError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl core::fmt::Debug for IOError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("IOError").field("err", &self.err).finish()
    }
}

/// A simple trait to encapsulate automatic conversion to `Error`.
///
/// This trait basically exists to make `Error::context` work without needing
/// to rely on public `From` impls.
pub(crate) trait IntoError {
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

/// A trait for contextualizing error values.
///
/// This makes it easy to contextualize either `Error` or `Result<T, Error>`.
/// Specifically, in the latter case, it absolves one of the need to call
/// `map_err` everywhere one wants to add context to an error.
///
/// This trick was borrowed from `anyhow`.
pub(crate) trait ErrorContext<T, E> {
    /// Contextualize the given consequent error with this (`self`) error as
    /// the cause.
    ///
    /// This is equivalent to saying that "consequent is caused by self."
    ///
    /// Note that if an `Error` is given for `kind`, then this panics if it has
    /// a cause. (Because the cause would otherwise be dropped. An error causal
    /// chain is just a linked list, not a tree.)
    fn context(self, consequent: impl IntoError) -> Result<T, Error>;

    /// Like `context`, but hides error construction within a closure.
    ///
    /// This is useful if the creation of the consequent error is not otherwise
    /// guarded and when error construction is potentially "costly" (i.e., it
    /// allocates). The closure avoids paying the cost of contextual error
    /// creation in the happy path.
    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error>;
}

impl<T, E> ErrorContext<T, E> for Result<T, E>
where
    E: IntoError,
{
    fn context(self, consequent: impl IntoError) -> Result<T, Error> {
        self.map_err(|err| {
            err.into_error().context_impl(consequent.into_error())
        })
    }

    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error> {
        self.map_err(|err| {
            err.into_error().context_impl(consequent().into_error())
        })
    }
}

/*!
Crate-private logging macros.

Each macro forwards to the corresponding macro in the `log` crate when the
`logging` feature is enabled, and expands to nothing otherwise. That way call
sites never need their own `cfg` attributes, and a build without the feature
doesn't even evaluate the message arguments.

Only `warn!`, `debug!` and `trace!` are defined since nothing in this crate
reports at the other levels:

* `warn!` is for recoverable surprises in the environment, like a `TZ`
value that doesn't name a zone.
* `debug!` is for rare state changes, like registering a rules provider.
* `trace!` is for hot paths, like populating the offset caches.
*/

macro_rules! log_enabled {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            $($tt)*
        }
    }
}

macro_rules! warn {
    ($($tt:tt)*) => { log_enabled!(log::warn!($($tt)*)) }
}

macro_rules! debug {
    ($($tt:tt)*) => { log_enabled!(log::debug!($($tt)*)) }
}

macro_rules! trace {
    ($($tt:tt)*) => { log_enabled!(log::trace!($($tt)*)) }
}

//! Logging shims.
//! Forwards to `tracing` when the feature is on, expands to nothing otherwise.
//!
//! The no-op macros carry their own names and are renamed on export, as a local `warn` macro
//! would clash with the built-in `#[warn]` attribute.

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub(crate) use tracing::{debug, info, warn};

#[cfg(not(feature = "tracing"))]
macro_rules! debug_noop {
    ($($t: tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! info_noop {
    ($($t: tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_noop {
    ($($t: tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use debug_noop as debug;

#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use info_noop as info;

#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use warn_noop as warn;

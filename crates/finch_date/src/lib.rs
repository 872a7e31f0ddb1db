//! Numeric date/time arithmetic over the ECMAScript millisecond
//! timeline.
//!
//! The scalar representation is a plain `f64` counting milliseconds
//! from the Unix epoch, with NaN as the sentinel for unrepresentable
//! or uncomputed instants. Everything else — calendar decomposition,
//! leap years, local-time adjustment, string parsing and formatting,
//! and the value-coercion glue binding instants to host objects — is
//! derived from that scalar.

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod calendar;
pub mod format;
pub mod locale;
pub mod object;
pub mod parse;
pub mod zone;

pub use object::{Date, Value};
pub use zone::{FixedZone, TimeZone, Utc};

/// Milliseconds since the Unix epoch, possibly fractional.
pub type Instant = f64;

/// The invalid instant. Propagates through arithmetic the way NaN
/// does.
pub const INVALID_TIME: Instant = ::std::f64::NAN;

/// True if `t` is the invalid instant.
pub fn is_invalid(t: Instant) -> bool {
    t.is_nan()
}

/// Broken-down calendar time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeParts {
    /// Proleptic year; can be negative, up to roughly ±282 000.
    pub year: i32,
    /// 0 (January) to 11 (December).
    pub month: i32,
    /// Day of month, 1 to 31.
    pub day: i32,
    pub hour: i32,
    pub min: i32,
    pub sec: i32,
    pub msec: i32,
    /// 0 (Sunday) to 6 (Saturday).
    pub weekday: i32,
}

/// Errors surfaced to the embedding engine.
///
/// The engine maps these onto its own exception machinery; here they
/// are ordinary values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateError {
    /// A string conversion was requested for the invalid instant.
    InvalidDate,
}

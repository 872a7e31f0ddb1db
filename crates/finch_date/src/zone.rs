//! Host timezone plumbing and the local-time transforms.
//!
//! The engine never ships a zoneinfo database: the embedder supplies a
//! standard offset and a DST predicate, and everything else is derived
//! here.

use std::time::{SystemTime, UNIX_EPOCH};

use calendar::{self, MS_PER_HOUR};

use ::{Instant, TimeParts};

/// Host-supplied timezone data.
pub trait TimeZone {
    /// Standard offset from UTC in seconds, positive east. Fixed
    /// across instants; DST rides on top via `dst_active`.
    fn standard_offset_seconds(&self) -> i32;

    /// True if daylight saving is in force at instant `t`.
    fn dst_active(&self, t: Instant) -> bool;

    /// Short zone designation, for the time-string suffix.
    fn name(&self) -> &str;

    /// Best-effort host date parser, consulted between the strict and
    /// permissive built-in string strategies. Month is 1-based, like
    /// all raw parse output. Most hosts have nothing to offer here.
    fn parse_hint(&self, _input: &str) -> Option<TimeParts> {
        None
    }
}

/// UTC: zero offset, never DST.
#[derive(Clone, Copy, Debug, Default)]
pub struct Utc;

impl TimeZone for Utc {
    fn standard_offset_seconds(&self) -> i32 {
        0
    }

    fn dst_active(&self, _t: Instant) -> bool {
        false
    }

    fn name(&self) -> &str {
        "UTC"
    }
}

/// A fixed standard offset with a static DST flag, for embedders
/// without zone rules.
#[derive(Clone, Debug)]
pub struct FixedZone {
    pub offset_seconds: i32,
    pub dst: bool,
    pub name: String,
}

impl TimeZone for FixedZone {
    fn standard_offset_seconds(&self) -> i32 {
        self.offset_seconds
    }

    fn dst_active(&self, _t: Instant) -> bool {
        self.dst
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Milliseconds to add to UTC to obtain standard local time.
pub fn local_tza<Z: TimeZone + ?Sized>(zone: &Z) -> i64 {
    zone.standard_offset_seconds() as i64 * 1000
}

/// The daylight-saving adjustment at `t`: one hour when the host
/// reports DST in force, zero otherwise.
pub fn daylight_saving_ta<Z: TimeZone + ?Sized>(zone: &Z, t: Instant) -> i64 {
    if zone.dst_active(t) {
        MS_PER_HOUR
    } else {
        0
    }
}

pub fn local_time<Z: TimeZone + ?Sized>(zone: &Z, t: Instant) -> Instant {
    t + (local_tza(zone) + daylight_saving_ta(zone, t)) as f64
}

/// Inverse of `local_time`. DST is probed at the pre-adjusted instant
/// so that `utc(local_time(t)) == t` away from DST transitions; near a
/// transition the relation is inexact by construction.
pub fn utc<Z: TimeZone + ?Sized>(zone: &Z, t: Instant) -> Instant {
    let tza = local_tza(zone);
    t - tza as f64 - daylight_saving_ta(zone, t - tza as f64) as f64
}

/// Break an instant into local calendar parts.
pub fn localtime<Z: TimeZone + ?Sized>(zone: &Z, t: Instant) -> TimeParts {
    calendar::gmtime(local_time(zone, t))
}

/// Rebuild the instant for local calendar parts.
pub fn mktime_local<Z: TimeZone + ?Sized>(zone: &Z, tp: &TimeParts) -> Instant {
    utc(zone, calendar::mktime_utc(tp))
}

/// Minutes west of UTC, standard offset only. The sign convention is
/// the one `getTimezoneOffset` exposes: positive for zones behind UTC.
pub fn tz_offset_minutes<Z: TimeZone + ?Sized>(zone: &Z) -> i32 {
    -(zone.standard_offset_seconds() / 60)
}

/// Current wall-clock instant in milliseconds since the epoch.
pub fn now() -> Instant {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => {
            elapsed.as_secs() as f64 * 1000.0 + elapsed.subsec_nanos() as f64 / 1_000_000.0
        }
        // A clock set before 1970 still yields a well-formed instant.
        Err(err) => {
            let before = err.duration();
            -(before.as_secs() as f64 * 1000.0 + before.subsec_nanos() as f64 / 1_000_000.0)
        }
    }
}

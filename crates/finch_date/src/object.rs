//! Value coercion and the date object surface.
//!
//! The engine's value system stays opaque here: a host value reaches
//! this module already reduced to the `Value` shape, and a date object
//! is represented by the numeric slot the engine stores behind it.
//! The engine's builtin bindings forward each method onto `Date`.

use calendar;
use format;
use locale;
use parse;
use zone::{self, TimeZone};

use ::{is_invalid, DateError, Instant, TimeParts, INVALID_TIME};

/// A host value reduced to what date coercion can see.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Str(String),
    /// An object, carrying the primitive its `valueOf` yields.
    Object(Box<Value>),
}

/// Reduce a host value to an instant.
///
/// Numbers truncate toward zero, with the infinities mapping to the
/// invalid instant. Booleans read as 0 and 1. Strings must be nothing
/// but a base-10 integer; trailing text invalidates them. Objects
/// recurse on their primitive. Every failure is the invalid instant.
pub fn value_to_instant(value: &Value) -> Instant {
    match *value {
        Value::Number(n) => {
            let t = n.trunc();
            if t.is_infinite() {
                INVALID_TIME
            } else {
                t
            }
        }
        Value::Bool(b) => {
            if b {
                1.0
            } else {
                0.0
            }
        }
        Value::Str(ref s) => int_string_to_instant(s),
        Value::Object(ref primitive) => value_to_instant(primitive),
    }
}

fn int_string_to_instant(s: &str) -> Instant {
    let bytes = s.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    let negative = if pos < bytes.len() && bytes[pos] == b'-' {
        pos += 1;
        true
    } else {
        if pos < bytes.len() && bytes[pos] == b'+' {
            pos += 1;
        }
        false
    };
    let mut value: i64 = 0;
    let mut digits = 0;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        value = value
            .saturating_mul(10)
            .saturating_add((bytes[pos] - b'0') as i64);
        pos += 1;
        digits += 1;
    }
    if pos != bytes.len() || (digits == 0 && !s.is_empty()) {
        return INVALID_TIME;
    }
    let value = if negative { -value } else { value };
    value as f64
}

/// Field positions within the `(year, month, date, hours, minutes,
/// seconds, ms)` argument tuple.
const FIELDS: usize = 7;
pub const FIELD_YEAR: usize = 0;
pub const FIELD_MONTH: usize = 1;
pub const FIELD_DATE: usize = 2;
pub const FIELD_HOURS: usize = 3;
pub const FIELD_MINUTES: usize = 4;
pub const FIELD_SECONDS: usize = 5;
pub const FIELD_MSEC: usize = 6;

/// Overlay the supplied fields onto broken-down `base` parts, then
/// rebuild an instant.
fn patch_parts(mut tp: TimeParts, patch: &[Instant; FIELDS]) -> TimeParts {
    {
        let slots: [&mut i32; FIELDS] = [
            &mut tp.year,
            &mut tp.month,
            &mut tp.day,
            &mut tp.hour,
            &mut tp.min,
            &mut tp.sec,
            &mut tp.msec,
        ];
        for (index, value) in patch.iter().enumerate() {
            if !is_invalid(*value) {
                *slots[index] = *value as i32;
            }
        }
    }
    tp
}

fn rebuild_utc(base: Option<Instant>, patch: &[Instant; FIELDS]) -> Instant {
    let tp = patch_parts(
        base.map(calendar::gmtime).unwrap_or_default(),
        patch,
    );
    calendar::mktime_utc(&tp)
}

fn rebuild_local<Z: TimeZone + ?Sized>(
    zone: &Z,
    base: Option<Instant>,
    patch: &[Instant; FIELDS],
) -> Instant {
    let tp = patch_parts(
        base.map(|t| zone::localtime(zone, t)).unwrap_or_default(),
        patch,
    );
    zone::mktime_local(zone, &tp)
}

/// The numeric slot behind a date object.
#[derive(Clone, Copy, Debug)]
pub struct Date {
    time: Instant,
}

impl Date {
    pub fn new(time: Instant) -> Date {
        Date { time }
    }

    /// Constructor dispatch.
    ///
    /// No arguments reads the wall clock; a single string argument is
    /// parsed; any other single argument is coerced; two or more
    /// arguments name local calendar fields, with a missing day
    /// defaulting to 1 and two-digit years lifted into the 1900s.
    pub fn construct<Z: TimeZone + ?Sized>(zone: &Z, args: &[Value]) -> Date {
        let time = match args.len() {
            0 => zone::now(),
            1 => match args[0] {
                Value::Str(ref s) => parse::time_from_string(s, zone),
                ref other => value_to_instant(other),
            },
            _ => Date::from_fields(zone, args),
        };
        Date::new(time)
    }

    fn from_fields<Z: TimeZone + ?Sized>(zone: &Z, args: &[Value]) -> Instant {
        let mut fields = [0.0; FIELDS];
        for (index, arg) in args.iter().take(FIELDS).enumerate() {
            let value = value_to_instant(arg);
            if is_invalid(value) {
                return INVALID_TIME;
            }
            fields[index] = value;
        }
        if fields[FIELD_DATE] == 0.0 {
            fields[FIELD_DATE] = 1.0;
        }
        if fields[FIELD_YEAR] >= 0.0 && fields[FIELD_YEAR] <= 99.0 {
            fields[FIELD_YEAR] += 1900.0;
        }
        zone::utc(zone, rebuild_utc(None, &fields))
    }

    /// The constructor invoked as a plain function: arguments are
    /// ignored and the current local time is rendered as a string.
    pub fn call_as_function<Z: TimeZone + ?Sized>(zone: &Z) -> String {
        let now = zone::now();
        format::full_str(&zone::localtime(zone, now), Some(zone))
    }

    pub fn get_time(&self) -> Instant {
        self.time
    }

    pub fn value_of(&self) -> Instant {
        self.time
    }

    /// Replace the slot wholesale.
    pub fn set_time(&mut self, args: &[Value]) -> Instant {
        self.time = match args.first() {
            Some(arg) => value_to_instant(arg),
            None => INVALID_TIME,
        };
        self.time
    }

    /// Minutes west of UTC for the host zone; meaningful even when the
    /// instant is invalid.
    pub fn get_timezone_offset<Z: TimeZone + ?Sized>(&self, zone: &Z) -> f64 {
        zone::tz_offset_minutes(zone) as f64
    }

    /// Coerce up to `FIELDS - start` arguments and overlay them onto
    /// the broken-down current instant, starting at field `start`.
    /// Any coercion failure, or an already-invalid instant, leaves the
    /// slot invalid.
    fn set_part<Z: TimeZone + ?Sized>(
        &mut self,
        zone: &Z,
        args: &[Value],
        start: usize,
        local: bool,
    ) -> Instant {
        let mut time = INVALID_TIME;
        if !args.is_empty() && !is_invalid(self.time) {
            let mut patch = [INVALID_TIME; FIELDS];
            let mut last = INVALID_TIME;
            for (index, arg) in args.iter().enumerate() {
                if index + start >= FIELDS {
                    break;
                }
                last = value_to_instant(arg);
                if is_invalid(last) {
                    break;
                }
                patch[index + start] = last;
            }
            if !is_invalid(last) {
                time = if local {
                    rebuild_local(zone, Some(self.time), &patch)
                } else {
                    rebuild_utc(Some(self.time), &patch)
                };
            }
        }
        self.time = time;
        time
    }

    fn get_part<Z: TimeZone + ?Sized>(&self, zone: Option<&Z>, field: fn(&TimeParts) -> i32) -> f64 {
        if is_invalid(self.time) {
            return INVALID_TIME;
        }
        let tp = match zone {
            Some(zone) => zone::localtime(zone, self.time),
            None => calendar::gmtime(self.time),
        };
        field(&tp) as f64
    }

    fn valid_for_string(&self) -> Result<(), DateError> {
        if is_invalid(self.time) {
            Err(DateError::InvalidDate)
        } else {
            Ok(())
        }
    }

    /// `YYYY-MM-DDTHH:MM:SS.sssZ`, always UTC.
    pub fn to_iso_string(&self) -> Result<String, DateError> {
        self.valid_for_string()?;
        Ok(format::iso(&calendar::gmtime(self.time)))
    }

    pub fn to_json(&self) -> Result<String, DateError> {
        self.to_iso_string()
    }

    pub fn to_string<Z: TimeZone + ?Sized>(&self, zone: &Z) -> Result<String, DateError> {
        self.valid_for_string()?;
        Ok(format::full_str(&zone::localtime(zone, self.time), Some(zone)))
    }

    pub fn to_date_string<Z: TimeZone + ?Sized>(&self, zone: &Z) -> Result<String, DateError> {
        self.valid_for_string()?;
        Ok(format::date_str(&zone::localtime(zone, self.time)))
    }

    pub fn to_time_string<Z: TimeZone + ?Sized>(&self, zone: &Z) -> Result<String, DateError> {
        self.valid_for_string()?;
        Ok(format::time_str(&zone::localtime(zone, self.time), Some(zone)))
    }

    pub fn to_utc_string(&self) -> Result<String, DateError> {
        self.valid_for_string()?;
        Ok(format::full_str(&calendar::gmtime(self.time), None::<&zone::Utc>))
    }

    pub fn to_locale_string<Z: TimeZone + ?Sized>(&self, zone: &Z) -> Result<String, DateError> {
        self.valid_for_string()?;
        let tp = zone::localtime(zone, self.time);
        Ok(locale::with_user_locale(|_| format::locale_full(&tp)))
    }

    pub fn to_locale_date_string<Z: TimeZone + ?Sized>(
        &self,
        zone: &Z,
    ) -> Result<String, DateError> {
        self.valid_for_string()?;
        let tp = zone::localtime(zone, self.time);
        Ok(locale::with_user_locale(|_| format::locale_date(&tp)))
    }

    pub fn to_locale_time_string<Z: TimeZone + ?Sized>(
        &self,
        zone: &Z,
    ) -> Result<String, DateError> {
        self.valid_for_string()?;
        let tp = zone::localtime(zone, self.time);
        Ok(locale::with_user_locale(|_| format::locale_time(&tp)))
    }
}

/// Current wall-clock instant.
pub fn now() -> Instant {
    zone::now()
}

/// Parse a date string against the host zone.
pub fn parse_string<Z: TimeZone + ?Sized>(input: &str, zone: &Z) -> Instant {
    parse::time_from_string(input, zone)
}

/// Build a UTC instant from calendar-field arguments, with the same
/// defaults and two-digit-year lifting as the constructor.
pub fn utc_from(args: &[Value]) -> Instant {
    if args.is_empty() {
        return INVALID_TIME;
    }
    let mut fields = [0.0; FIELDS];
    for (index, arg) in args.iter().take(FIELDS).enumerate() {
        let value = value_to_instant(arg);
        if is_invalid(value) {
            return INVALID_TIME;
        }
        fields[index] = value;
    }
    if fields[FIELD_DATE] == 0.0 {
        fields[FIELD_DATE] = 1.0;
    }
    if fields[FIELD_YEAR] >= 0.0 && fields[FIELD_YEAR] <= 99.0 {
        fields[FIELD_YEAR] += 1900.0;
    }
    rebuild_utc(None, &fields)
}

macro_rules! field_getters {
    ( $( $get: ident / $get_utc: ident => $field: ident; )* ) => {
        impl Date {
            $(
                pub fn $get<Z: TimeZone + ?Sized>(&self, zone: &Z) -> f64 {
                    self.get_part(Some(zone), |tp| tp.$field)
                }

                pub fn $get_utc(&self) -> f64 {
                    self.get_part(None::<&::zone::Utc>, |tp| tp.$field)
                }
            )*
        }
    }
}

field_getters! {
    get_full_year / get_utc_full_year => year;
    get_month / get_utc_month => month;
    get_date / get_utc_date => day;
    get_day / get_utc_day => weekday;
    get_hours / get_utc_hours => hour;
    get_minutes / get_utc_minutes => min;
    get_seconds / get_utc_seconds => sec;
    get_milliseconds / get_utc_milliseconds => msec;
}

macro_rules! field_setters {
    ( $( $set: ident / $set_utc: ident => $start: expr; )* ) => {
        impl Date {
            $(
                pub fn $set<Z: TimeZone + ?Sized>(&mut self, zone: &Z, args: &[Value]) -> Instant {
                    self.set_part(zone, args, $start, true)
                }

                pub fn $set_utc(&mut self, args: &[Value]) -> Instant {
                    self.set_part(&::zone::Utc, args, $start, false)
                }
            )*
        }
    }
}

field_setters! {
    set_full_year / set_utc_full_year => FIELD_YEAR;
    set_month / set_utc_month => FIELD_MONTH;
    set_date / set_utc_date => FIELD_DATE;
    set_hours / set_utc_hours => FIELD_HOURS;
    set_minutes / set_utc_minutes => FIELD_MINUTES;
    set_seconds / set_utc_seconds => FIELD_SECONDS;
    set_milliseconds / set_utc_milliseconds => FIELD_MSEC;
}

#[cfg(test)]
mod tests {
    use super::*;
    use calendar::{make_date, make_day, make_time};
    use zone::{FixedZone, Utc};

    fn utc_instant(year: i64, month: i64, day: i64, h: i64, m: i64, s: i64, ms: i64) -> f64 {
        make_date(make_day(year, month, day), make_time(h, m, s, ms)) as f64
    }

    #[test]
    fn coercion_rules() {
        assert_eq!(value_to_instant(&Value::Number(12.9)), 12.0);
        assert_eq!(value_to_instant(&Value::Number(-12.9)), -12.0);
        assert!(is_invalid(value_to_instant(&Value::Number(
            ::std::f64::INFINITY
        ))));
        assert!(is_invalid(value_to_instant(&Value::Number(::std::f64::NAN))));
        assert_eq!(value_to_instant(&Value::Bool(true)), 1.0);
        assert_eq!(value_to_instant(&Value::Bool(false)), 0.0);
        assert_eq!(value_to_instant(&Value::Str("123".to_string())), 123.0);
        assert_eq!(value_to_instant(&Value::Str(" -5".to_string())), -5.0);
        assert!(is_invalid(value_to_instant(&Value::Str("12px".to_string()))));
        assert_eq!(
            value_to_instant(&Value::Object(Box::new(Value::Number(7.0)))),
            7.0
        );
    }

    #[test]
    fn construct_without_arguments_reads_the_clock() {
        let before = now();
        let date = Date::construct(&Utc, &[]);
        let after = now();
        assert!(date.get_time() >= before && date.get_time() <= after);
    }

    #[test]
    fn construct_from_number_and_string() {
        let date = Date::construct(&Utc, &[Value::Number(86_400_000.0)]);
        assert_eq!(date.get_time(), 86_400_000.0);

        let date = Date::construct(&Utc, &[Value::Str("1970-01-02T00:00:00.000Z".to_string())]);
        assert_eq!(date.get_time(), 86_400_000.0);
    }

    #[test]
    fn construct_lifts_two_digit_years() {
        let date = Date::construct(&Utc, &[Value::Number(99.0), Value::Number(0.0), Value::Number(1.0)]);
        assert_eq!(date.get_time(), utc_instant(1999, 0, 1, 0, 0, 0, 0));
        assert_eq!(date.get_time(), 915_148_800_000.0);
    }

    #[test]
    fn construct_defaults_missing_day_to_one() {
        let date = Date::construct(&Utc, &[Value::Number(2016.0), Value::Number(1.0)]);
        assert_eq!(date.get_time(), utc_instant(2016, 1, 1, 0, 0, 0, 0));
    }

    #[test]
    fn construct_fields_are_local() {
        let moscow = FixedZone {
            offset_seconds: 3 * 3600,
            dst: false,
            name: "MSK".to_string(),
        };
        let date = Date::construct(
            &moscow,
            &[Value::Number(1970.0), Value::Number(0.0), Value::Number(1.0)],
        );
        assert_eq!(date.get_time(), -3.0 * 3_600_000.0);
    }

    #[test]
    fn getters_split_fields() {
        let date = Date::new(utc_instant(2015, 2, 5, 10, 20, 30, 400));
        assert_eq!(date.get_utc_full_year(), 2015.0);
        assert_eq!(date.get_utc_month(), 2.0);
        assert_eq!(date.get_utc_date(), 5.0);
        assert_eq!(date.get_utc_hours(), 10.0);
        assert_eq!(date.get_utc_minutes(), 20.0);
        assert_eq!(date.get_utc_seconds(), 30.0);
        assert_eq!(date.get_utc_milliseconds(), 400.0);
        assert_eq!(date.get_utc_day(), 4.0);

        let moscow = FixedZone {
            offset_seconds: 3 * 3600,
            dst: false,
            name: "MSK".to_string(),
        };
        assert_eq!(date.get_hours(&moscow), 13.0);
        assert_eq!(date.get_full_year(&moscow), 2015.0);
    }

    #[test]
    fn setters_patch_single_fields() {
        let mut date = Date::new(utc_instant(2015, 2, 5, 10, 20, 30, 400));
        let updated = date.set_utc_minutes(&[Value::Number(59.0)]);
        assert_eq!(updated, utc_instant(2015, 2, 5, 10, 59, 30, 400));
        assert_eq!(date.get_utc_minutes(), 59.0);
        // The other fields kept their values.
        assert_eq!(date.get_utc_seconds(), 30.0);
    }

    #[test]
    fn setters_take_positional_runs() {
        let mut date = Date::new(0.0);
        date.set_utc_hours(&[
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(3.0),
            Value::Number(4.0),
        ]);
        assert_eq!(date.get_time(), utc_instant(1970, 0, 1, 1, 2, 3, 4));
    }

    #[test]
    fn invalid_inputs_poison_the_slot() {
        let mut date = Date::new(0.0);
        date.set_utc_seconds(&[Value::Str("nope".to_string())]);
        assert!(is_invalid(date.get_time()));
        assert!(is_invalid(date.get_utc_full_year()));

        // Setting fields of an invalid date keeps it invalid.
        date.set_utc_seconds(&[Value::Number(10.0)]);
        assert!(is_invalid(date.get_time()));

        // Only set_time revives it.
        date.set_time(&[Value::Number(1_000.0)]);
        assert_eq!(date.get_time(), 1_000.0);
    }

    #[test]
    fn string_conversions_demand_a_valid_instant() {
        let date = Date::new(INVALID_TIME);
        assert_eq!(date.to_iso_string(), Err(DateError::InvalidDate));
        assert_eq!(date.to_string(&Utc), Err(DateError::InvalidDate));
        assert_eq!(date.to_locale_string(&Utc), Err(DateError::InvalidDate));

        let epoch = Date::new(0.0);
        assert_eq!(epoch.to_iso_string().unwrap(), "1970-01-01T00:00:00.000Z");
        assert_eq!(epoch.to_json().unwrap(), "1970-01-01T00:00:00.000Z");
        assert_eq!(epoch.to_utc_string().unwrap(), "Thu Jan 01 1970 00:00:00 GMT");
    }

    #[test]
    fn locale_strings_render_under_the_user_locale() {
        let epoch = Date::new(0.0);
        assert_eq!(
            epoch.to_locale_string(&Utc).unwrap(),
            "Thu Jan 01 00:00:00 1970"
        );
        assert_eq!(epoch.to_locale_date_string(&Utc).unwrap(), "01/01/70");
        assert_eq!(epoch.to_locale_time_string(&Utc).unwrap(), "00:00:00");
    }

    #[test]
    fn timezone_offset_minutes() {
        let ny = FixedZone {
            offset_seconds: -5 * 3600,
            dst: false,
            name: "EST".to_string(),
        };
        assert_eq!(Date::new(0.0).get_timezone_offset(&ny), 300.0);
    }

    #[test]
    fn utc_builder() {
        assert_eq!(
            utc_from(&[Value::Number(2016.0), Value::Number(1.0), Value::Number(29.0)]),
            utc_instant(2016, 1, 29, 0, 0, 0, 0)
        );
        assert_eq!(
            utc_from(&[Value::Number(99.0), Value::Number(0.0)]),
            utc_instant(1999, 0, 1, 0, 0, 0, 0)
        );
        assert!(is_invalid(utc_from(&[])));
        assert!(is_invalid(utc_from(&[Value::Str("x".to_string())])));
    }

    #[test]
    fn call_as_function_renders_now() {
        let rendered = Date::call_as_function(&Utc);
        assert!(rendered.contains("GMT"));
    }
}

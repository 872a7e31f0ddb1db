//! Broken-down time to strings.

use zone::TimeZone;

use ::TimeParts;

/// English three-letter names; string output is locale-independent
/// except for the explicit locale renditions at the bottom.
pub static WEEKDAY_NAMES: [&'static str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub static MONTH_NAMES: [&'static str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Years outside [0, 9999] render as a sign and six digits.
fn wide_year(year: i32) -> String {
    if year > 9999 || year < 0 {
        format!(
            "{}{:06}",
            if year < 0 { '-' } else { '+' },
            year.abs()
        )
    } else {
        format!("{:04}", year)
    }
}

/// `YYYY-MM-DDTHH:MM:SS.sssZ`, over UTC parts.
pub fn iso(tp: &TimeParts) -> String {
    format!(
        "{}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        wide_year(tp.year),
        tp.month + 1,
        tp.day,
        tp.hour,
        tp.min,
        tp.sec,
        tp.msec
    )
}

/// `Www Mmm DD YYYY`.
pub fn date_str(tp: &TimeParts) -> String {
    format!(
        "{} {} {:02} {}",
        WEEKDAY_NAMES[tp.weekday as usize],
        MONTH_NAMES[tp.month as usize],
        tp.day,
        wide_year(tp.year)
    )
}

/// `HH:MM:SS GMT`, with a `±HHMM (NAME)` suffix when a zone with a
/// nonzero offset is supplied.
pub fn time_str<Z: TimeZone + ?Sized>(tp: &TimeParts, zone: Option<&Z>) -> String {
    let mut out = format!("{:02}:{:02}:{:02} GMT", tp.hour, tp.min, tp.sec);
    if let Some(zone) = zone {
        let offset = zone.standard_offset_seconds();
        if offset != 0 {
            out.push_str(&format!(
                "{}{:02}00 ({})",
                if offset >= 0 { '+' } else { '-' },
                offset.abs() / 3600,
                zone.name()
            ));
        }
    }
    out
}

/// Date and time, space-separated.
pub fn full_str<Z: TimeZone + ?Sized>(tp: &TimeParts, zone: Option<&Z>) -> String {
    format!("{} {}", date_str(tp), time_str(tp, zone))
}

/// `%c`-shaped: weekday, month, day, clock, year.
pub fn locale_full(tp: &TimeParts) -> String {
    format!(
        "{} {} {:02} {:02}:{:02}:{:02} {}",
        WEEKDAY_NAMES[tp.weekday as usize],
        MONTH_NAMES[tp.month as usize],
        tp.day,
        tp.hour,
        tp.min,
        tp.sec,
        wide_year(tp.year)
    )
}

/// `%x`-shaped: `MM/DD/YY`.
pub fn locale_date(tp: &TimeParts) -> String {
    format!(
        "{:02}/{:02}/{:02}",
        tp.month + 1,
        tp.day,
        (tp.year % 100).abs()
    )
}

/// `%X`-shaped: `HH:MM:SS`.
pub fn locale_time(tp: &TimeParts) -> String {
    format!("{:02}:{:02}:{:02}", tp.hour, tp.min, tp.sec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calendar::gmtime;
    use zone::{FixedZone, Utc};

    #[test]
    fn iso_of_epoch() {
        assert_eq!(iso(&gmtime(0.0)), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn iso_wide_years() {
        use calendar::{make_date, make_day, make_time};
        let far = make_date(make_day(275_000, 0, 1), make_time(0, 0, 0, 0)) as f64;
        assert_eq!(iso(&gmtime(far)), "+275000-01-01T00:00:00.000Z");
        let early = make_date(make_day(-1, 11, 31), make_time(23, 59, 59, 999)) as f64;
        assert_eq!(iso(&gmtime(early)), "-000001-12-31T23:59:59.999Z");
    }

    #[test]
    fn epoch_date_and_time_strings() {
        let tp = gmtime(0.0);
        assert_eq!(date_str(&tp), "Thu Jan 01 1970");
        assert_eq!(time_str(&tp, Some(&Utc)), "00:00:00 GMT");
        assert_eq!(full_str(&tp, Some(&Utc)), "Thu Jan 01 1970 00:00:00 GMT");
    }

    #[test]
    fn nonzero_offset_gets_a_suffix() {
        let zone = FixedZone {
            offset_seconds: -5 * 3600,
            dst: false,
            name: "EST".to_string(),
        };
        let tp = gmtime(0.0);
        assert_eq!(time_str(&tp, Some(&zone)), "00:00:00 GMT-0500 (EST)");
    }

    #[test]
    fn locale_shapes() {
        let tp = gmtime(0.0);
        assert_eq!(locale_full(&tp), "Thu Jan 01 00:00:00 1970");
        assert_eq!(locale_date(&tp), "01/01/70");
        assert_eq!(locale_time(&tp), "00:00:00");
    }
}

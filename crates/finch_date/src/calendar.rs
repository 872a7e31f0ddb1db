//! The calendar kernel: deterministic mappings between the
//! millisecond timeline and broken-down calendar components, per the
//! ECMA-262 date arithmetic.
//!
//! Computations run on `i64` once an instant has been floored onto a
//! whole-millisecond grid. All modular reductions are euclidean so
//! that instants before the epoch decompose into the same field ranges
//! as instants after it.

use ::{Instant, TimeParts};

pub const MS_PER_DAY: i64 = 86_400_000;
pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_SECOND: i64 = 1_000;

const HOURS_PER_DAY: i64 = 24;
const MINUTES_PER_HOUR: i64 = 60;
const SECONDS_PER_MINUTE: i64 = 60;

/// Cumulative days before each month in a common year, with the
/// year-total sentinel at the end.
const FIRST_DAYS: [i64; 13] = [
    0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365,
];

/// Day number containing the instant `t`.
pub fn day(t: Instant) -> i64 {
    (t / MS_PER_DAY as f64).floor() as i64
}

pub fn days_in_year(y: i64) -> i64 {
    if (y % 4 == 0 && y % 100 != 0) || y % 400 == 0 {
        366
    } else {
        365
    }
}

pub fn in_leap_year(y: i64) -> bool {
    days_in_year(y) == 366
}

/// Day number of January 1 of year `y`.
pub fn day_from_year(y: i64) -> i64 {
    365 * (y - 1970) + (y - 1969).div_euclid(4) - (y - 1901).div_euclid(100)
        + (y - 1601).div_euclid(400)
}

pub fn time_from_year(y: i64) -> i64 {
    MS_PER_DAY * day_from_year(y)
}

/// The unique year `y` with `time_from_year(y) <= t < time_from_year(y + 1)`.
///
/// Bisection between the bounds obtained by treating every year as
/// 366-day and as 365-day respectively.
pub fn year_from_time(t: Instant) -> i64 {
    let mut first = (t / MS_PER_DAY as f64 / 366.0).floor() as i64 + 1970;
    let mut last = (t / MS_PER_DAY as f64 / 365.0).floor() as i64 + 1970;

    if last < first {
        ::std::mem::swap(&mut first, &mut last);
    }

    while last > first {
        let middle = (last + first) / 2;
        if time_from_year(middle) as f64 > t {
            last = middle - 1;
        } else {
            if time_from_year(middle + 1) as f64 > t {
                first = middle;
                break;
            }
            first = middle + 1;
        }
    }

    first
}

pub fn day_within_year(t: Instant, year: i64) -> i64 {
    day(t) - day_from_year(year)
}

/// Cumulative-days table, adjusted for a leap year.
fn first_days(leap: bool) -> [i64; 13] {
    let mut days = FIRST_DAYS;
    if leap {
        for slot in days.iter_mut().skip(2) {
            *slot += 1;
        }
    }
    days
}

/// Month index of `t`, given its `year` as computed by
/// `year_from_time`. -1 if the pair is inconsistent.
pub fn month_from_time(t: Instant, year: i64) -> i32 {
    let dwy = day_within_year(t, year);
    let days = first_days(in_leap_year(year));
    for month in 0..12 {
        if dwy >= days[month] && dwy < days[month + 1] {
            return month as i32;
        }
    }
    -1
}

/// Day-of-month of `t`, given its `year`.
pub fn date_from_time(t: Instant, year: i64) -> i32 {
    let month = month_from_time(t, year);
    if month < 0 {
        return -1;
    }
    let days = first_days(in_leap_year(year));
    (day_within_year(t, year) - days[month as usize] + 1) as i32
}

/// 0 = Sunday .. 6 = Saturday. The epoch fell on a Thursday.
pub fn week_day(t: Instant) -> i32 {
    (day(t) + 4).rem_euclid(7) as i32
}

pub fn hour_from_time(t: Instant) -> i32 {
    ((t / MS_PER_HOUR as f64).floor() as i64).rem_euclid(HOURS_PER_DAY) as i32
}

pub fn min_from_time(t: Instant) -> i32 {
    ((t / MS_PER_MINUTE as f64).floor() as i64).rem_euclid(MINUTES_PER_HOUR) as i32
}

pub fn sec_from_time(t: Instant) -> i32 {
    ((t / MS_PER_SECOND as f64).floor() as i64).rem_euclid(SECONDS_PER_MINUTE) as i32
}

pub fn ms_from_time(t: Instant) -> i32 {
    (t as i64).rem_euclid(MS_PER_SECOND) as i32
}

/// Milliseconds within a day from clock components.
pub fn make_time(hour: i64, min: i64, sec: i64, ms: i64) -> i64 {
    ((hour * MINUTES_PER_HOUR + min) * SECONDS_PER_MINUTE + sec) * MS_PER_SECOND + ms
}

/// Day number from calendar components. `month` may fall outside
/// 0..=11; whole years are carried into `year` by flooring.
pub fn make_day(year: i64, month: i64, date: i64) -> i64 {
    let year = year + month.div_euclid(12);
    let month = month.rem_euclid(12) as usize;

    let yday = time_from_year(year) / MS_PER_DAY;
    let days = first_days(in_leap_year(year));

    yday + days[month] + date - 1
}

pub fn make_date(day: i64, time: i64) -> i64 {
    day * MS_PER_DAY + time
}

/// Break an instant into UTC calendar parts.
pub fn gmtime(t: Instant) -> TimeParts {
    let year = year_from_time(t);
    TimeParts {
        year: year as i32,
        month: month_from_time(t, year),
        day: date_from_time(t, year),
        hour: hour_from_time(t),
        min: min_from_time(t),
        sec: sec_from_time(t),
        msec: ms_from_time(t),
        weekday: week_day(t),
    }
}

/// Rebuild the instant for UTC calendar parts. Inverse of `gmtime`
/// for in-range fields.
pub fn mktime_utc(tp: &TimeParts) -> Instant {
    make_date(
        make_day(tp.year as i64, tp.month as i64, tp.day as i64),
        make_time(tp.hour as i64, tp.min as i64, tp.sec as i64, tp.msec as i64),
    ) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_years() {
        assert_eq!(days_in_year(1970), 365);
        assert_eq!(days_in_year(2016), 366);
        assert_eq!(days_in_year(1900), 365);
        assert_eq!(days_in_year(2000), 366);
        assert_eq!(days_in_year(-4), 366);
        assert_eq!(days_in_year(-100), 365);
    }

    #[test]
    fn epoch_decomposition() {
        assert_eq!(year_from_time(0.0), 1970);
        assert_eq!(week_day(0.0), 4);
        let tp = gmtime(0.0);
        assert_eq!(
            tp,
            TimeParts {
                year: 1970,
                month: 0,
                day: 1,
                hour: 0,
                min: 0,
                sec: 0,
                msec: 0,
                weekday: 4,
            }
        );
    }

    #[test]
    fn leap_day_numbering() {
        assert_eq!(make_day(2016, 1, 29), 16_860);
        let t = make_date(make_day(2016, 1, 29), 0) as f64;
        let tp = gmtime(t);
        assert_eq!((tp.year, tp.month, tp.day), (2016, 1, 29));
    }

    #[test]
    fn month_overflow_carries_into_year() {
        assert_eq!(make_day(2015, 12, 1), make_day(2016, 0, 1));
        assert_eq!(make_day(2016, -1, 1), make_day(2015, 11, 1));
    }

    #[test]
    fn pre_epoch_fields_stay_in_range() {
        // One millisecond before the epoch.
        let t = -1.0;
        let tp = gmtime(t);
        assert_eq!(
            (tp.year, tp.month, tp.day, tp.hour, tp.min, tp.sec, tp.msec),
            (1969, 11, 31, 23, 59, 59, 999)
        );
        assert_eq!(tp.weekday, 3);
    }

    #[test]
    fn gmtime_inverts_mktime() {
        let years = [
            1i64, 4, 100, 400, 1600, 1899, 1969, 1970, 2016, 9999, 10_000, 275_000,
        ];
        for &year in years.iter() {
            for month in 0..12i64 {
                let days = first_days(in_leap_year(year));
                let last = days[month as usize + 1] - days[month as usize];
                for &date in [1, 15, last].iter() {
                    let t = make_date(make_day(year, month, date), make_time(13, 59, 31, 250)) as f64;
                    let tp = gmtime(t);
                    assert_eq!(
                        (
                            tp.year as i64,
                            tp.month as i64,
                            tp.day as i64,
                            tp.hour,
                            tp.min,
                            tp.sec,
                            tp.msec
                        ),
                        (year, month, date, 13, 59, 31, 250),
                        "year {} month {} date {}",
                        year,
                        month,
                        date
                    );
                    assert_eq!(mktime_utc(&tp), t);
                }
            }
        }
    }
}

//! String to broken-down time.
//!
//! Strategies are tried in order, first success wins: the strict ISO
//! shape, the host's parse hint, the `Www Mmm DD YYYY HH:MM:SS GMT±N`
//! shape, and last a deterministic permissive grammar over separated
//! dates. Every strategy reports a 1-based month; the shared
//! validation below shifts it down and range-checks the fields.

use calendar;
use format::MONTH_NAMES;
use zone::{self, TimeZone};

use ::{Instant, TimeParts, INVALID_TIME};

/// Sentinel: the input named no timezone.
const NO_TZ: i32 = 0x7FFF_FFFF;

/// Inputs longer than this cannot be a date.
const MAX_INPUT: usize = 100;

fn to_i32(value: i64) -> i32 {
    if value > ::std::i32::MAX as i64 {
        ::std::i32::MAX
    } else if value < ::std::i32::MIN as i64 {
        ::std::i32::MIN
    } else {
        value as i32
    }
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Scanner<'a> {
        Scanner { text, pos: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    fn skip_ws(&mut self) {
        while self.pos < self.text.len() && self.bytes()[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.pos < self.text.len() && self.bytes()[self.pos] == byte {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// `%d`-style signed decimal: leading whitespace, optional sign,
    /// at least one digit. Saturates instead of overflowing.
    fn int(&mut self) -> Option<i64> {
        self.skip_ws();
        let mark = self.pos;
        let negative = if self.eat(b'-') {
            true
        } else {
            self.eat(b'+');
            false
        };
        let mut value: i64 = 0;
        let mut digits = 0;
        while self.pos < self.text.len() && self.bytes()[self.pos].is_ascii_digit() {
            value = value
                .saturating_mul(10)
                .saturating_add((self.bytes()[self.pos] - b'0') as i64);
            self.pos += 1;
            digits += 1;
        }
        if digits == 0 {
            self.pos = mark;
            return None;
        }
        Some(if negative { -value } else { value })
    }

    /// A run of ASCII letters.
    fn word(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let start = self.pos;
        while self.pos < self.text.len() && self.bytes()[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(&self.text[start..self.pos])
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_ws();
        self.pos == self.text.len()
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }
}

fn parts(year: i64, month: i64, day: i64) -> TimeParts {
    TimeParts {
        year: to_i32(year),
        month: to_i32(month),
        day: to_i32(day),
        ..TimeParts::default()
    }
}

/// `YYYY-MM-DDTHH:MM:SS.sssZ`. Wide years carry an explicit sign.
fn parse_iso(input: &str) -> Option<(TimeParts, i32)> {
    let mut sc = Scanner::new(input);
    let year = sc.int()?;
    if !sc.eat(b'-') {
        return None;
    }
    let month = sc.int()?;
    if !sc.eat(b'-') {
        return None;
    }
    let day = sc.int()?;
    if !sc.eat(b'T') {
        return None;
    }
    let hour = sc.int()?;
    if !sc.eat(b':') {
        return None;
    }
    let min = sc.int()?;
    if !sc.eat(b':') {
        return None;
    }
    let sec = sc.int()?;
    if !sc.eat(b'.') {
        return None;
    }
    let msec = sc.int()?;

    let mut tp = parts(year, month, day);
    tp.hour = to_i32(hour);
    tp.min = to_i32(min);
    tp.sec = to_i32(sec);
    tp.msec = to_i32(msec);
    Some((tp, 0))
}

/// 1-based month index by English three-letter prefix.
fn month_by_name(word: &str) -> Option<i32> {
    for (index, name) in MONTH_NAMES.iter().enumerate() {
        if word.starts_with(name) {
            return Some(index as i32 + 1);
        }
    }
    None
}

/// `Www Mmm DD YYYY [HH:MM:SS [GMT[±N]]]`. The weekday token is not
/// checked against the date.
fn parse_rfc(input: &str) -> Option<(TimeParts, i32)> {
    let mut sc = Scanner::new(input);
    sc.word()?;
    let month = month_by_name(sc.word()?)?;
    let day = sc.int()?;
    let year = sc.int()?;

    let mut tp = parts(year, month as i64, day);
    let mut tz = NO_TZ;

    if !sc.at_end() {
        tp.hour = to_i32(sc.int()?);
        if !sc.eat(b':') {
            return None;
        }
        tp.min = to_i32(sc.int()?);
        if !sc.eat(b':') {
            return None;
        }
        tp.sec = to_i32(sc.int()?);

        if !sc.at_end() {
            let marker = sc.word()?;
            if let Some(offset) = sc.int() {
                tz = to_i32(offset);
            } else if marker == "GMT" {
                tz = 0;
            }
        }
    }

    Some((tp, tz))
}

#[derive(Clone, Copy)]
enum FieldOrder {
    MonthDayYear,
    DayMonthYear,
    YearMonthDay,
}

fn date_with_separator(input: &str, sep: u8, order: FieldOrder) -> Option<(TimeParts, &str)> {
    let mut sc = Scanner::new(input);
    let a = sc.int()?;
    if !sc.eat(sep) {
        return None;
    }
    let b = sc.int()?;
    if !sc.eat(sep) {
        return None;
    }
    let c = sc.int()?;

    let (year, month, day) = match order {
        FieldOrder::MonthDayYear => (c, a, b),
        FieldOrder::DayMonthYear => (c, b, a),
        FieldOrder::YearMonthDay => (a, b, c),
    };
    Some((parts(year, month, day), sc.rest()))
}

/// Permissive last resort: a separated date, then optionally `HH:MM`,
/// `:SS` and a trailing `GMT±N`. Unlike the other strategies, any
/// leftover the grammar cannot account for rejects the input.
fn parse_permissive(input: &str) -> Option<(TimeParts, i32)> {
    let (mut tp, rest) = date_with_separator(input, b'/', FieldOrder::MonthDayYear)
        .or_else(|| date_with_separator(input, b'.', FieldOrder::DayMonthYear))
        .or_else(|| date_with_separator(input, b'-', FieldOrder::YearMonthDay))?;

    let mut tz = NO_TZ;
    let mut sc = Scanner::new(rest);
    if sc.at_end() {
        return Some((tp, tz));
    }

    tp.hour = to_i32(sc.int()?);
    if !sc.eat(b':') {
        return None;
    }
    tp.min = to_i32(sc.int()?);
    if sc.eat(b':') {
        tp.sec = to_i32(sc.int()?);
    }
    if sc.at_end() {
        return Some((tp, tz));
    }

    let marker = sc.word()?;
    if let Some(offset) = sc.int() {
        tz = to_i32(offset);
    } else if marker == "GMT" {
        tz = 0;
    }
    if !sc.at_end() {
        return None;
    }
    Some((tp, tz))
}

/// Parse `input`, falling back to the host zone's offset when the
/// string names none. Yields the invalid instant on any failure.
pub fn time_from_string<Z: TimeZone + ?Sized>(input: &str, zone: &Z) -> Instant {
    if input.len() > MAX_INPUT {
        return INVALID_TIME;
    }

    let parsed = parse_iso(input)
        .or_else(|| zone.parse_hint(input).map(|tp| (tp, NO_TZ)))
        .or_else(|| parse_rfc(input))
        .or_else(|| parse_permissive(input));

    let (mut tp, mut tz) = match parsed {
        Some(found) => found,
        None => {
            debug!(target: "date", "no strategy matched {:?}", input);
            return INVALID_TIME;
        }
    };

    // Raw parse output carries a 1-based month.
    tp.month -= 1;

    let mut valid = tp.day >= 1 && tp.day <= 31;
    valid &= tp.month >= 0 && tp.month <= 11;
    valid &= tp.hour >= 0 && tp.hour <= 23;
    valid &= tp.min >= 0 && tp.min <= 59;
    valid &= tp.sec >= 0 && tp.sec <= 59;

    if tz != NO_TZ && tz > 12 {
        // An hhmm offset collapses to whole hours.
        tz /= 100;
    }
    valid &= tz == NO_TZ || tz.abs() <= 12;

    if !valid {
        debug!(target: "date", "rejecting {:?}: fields out of range", input);
        return INVALID_TIME;
    }

    let time = calendar::mktime_utc(&tp);
    let tz_ms = if tz == NO_TZ {
        zone::local_tza(zone)
    } else {
        tz as i64 * calendar::MS_PER_HOUR
    };
    time - tz_ms as f64
}

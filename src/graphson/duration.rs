//! ISO-8601 durations.
//!
//! Carried on the wire under `gx:Duration` as text such as `P2DT3H`.
//! The grammar accepted is `[-]P[nY][nM][nW][nD][T[nH][nM][n[.f]S]]`; years fold
//! into months, weeks into days, hours and minutes into seconds.

use std::fmt;
use std::str::FromStr;

use super::error::GraphSONError;
use super::tag;

const SECONDS_PER_DAY: i64 = 86_400;
const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// A calendar-aware duration.
///
/// Only durations whose non-zero fields share one sign, with `nanoseconds`
/// under one second, have a text form. See [`Duration::is_uniform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Duration {
    /// Months (years are stored as 12 months)
    pub months: i64,
    /// Days (weeks are stored as 7 days)
    pub days: i64,
    /// Seconds (hours and minutes fold in here)
    pub seconds: i64,
    /// Sub-second nanoseconds
    pub nanoseconds: i32,
}

impl Duration {
    /// Create a new duration.
    ///
    /// Whole seconds in `nanoseconds` carry into `seconds`, and the two end up
    /// with the same sign.
    pub fn new(months: i64, days: i64, seconds: i64, nanoseconds: i32) -> Self {
        let total = seconds as i128 * NANOS_PER_SECOND as i128 + nanoseconds as i128;
        let seconds = total / NANOS_PER_SECOND as i128;
        let seconds = i64::try_from(seconds).unwrap_or(if total < 0 { i64::MIN } else { i64::MAX });
        Self {
            months,
            days,
            seconds,
            nanoseconds: (total % NANOS_PER_SECOND as i128) as i32,
        }
    }

    /// Create from seconds.
    pub fn from_seconds(seconds: i64) -> Self {
        Self::new(0, 0, seconds, 0)
    }

    /// Create from days.
    pub fn from_days(days: i64) -> Self {
        Self::new(0, days, 0, 0)
    }

    /// Create from months.
    pub fn from_months(months: i64) -> Self {
        Self::new(months, 0, 0, 0)
    }

    /// Check if every field is zero.
    pub fn is_zero(&self) -> bool {
        self.months == 0 && self.days == 0 && self.seconds == 0 && self.nanoseconds == 0
    }

    /// Check that every non-zero field has the same sign and `nanoseconds`
    /// is under one second.
    pub fn is_uniform(&self) -> bool {
        if self.nanoseconds.unsigned_abs() >= NANOS_PER_SECOND as u32 {
            return false;
        }
        let signs = [
            self.months.signum(),
            self.days.signum(),
            self.seconds.signum(),
            self.nanoseconds.signum() as i64,
        ];
        !(signs.contains(&1) && signs.contains(&-1))
    }

    fn is_negative(&self) -> bool {
        self.months < 0 || self.days < 0 || self.seconds < 0 || self.nanoseconds < 0
    }

    /// Convert to a fixed-length duration.
    ///
    /// Returns `None` when the duration has a month component, since months
    /// have no fixed length.
    pub fn to_chrono(&self) -> Option<chrono::Duration> {
        if self.months != 0 {
            return None;
        }
        Some(
            chrono::Duration::days(self.days)
                + chrono::Duration::seconds(self.seconds)
                + chrono::Duration::nanoseconds(self.nanoseconds as i64),
        )
    }

    /// Format as ISO-8601 text.
    pub fn to_iso(&self) -> String {
        if self.is_zero() {
            return "PT0S".to_string();
        }

        let mut out = String::new();
        if self.is_negative() {
            out.push('-');
        }
        out.push('P');

        let months = self.months.unsigned_abs();
        let days = self.days.unsigned_abs();
        if months >= 12 {
            out.push_str(&format!("{}Y", months / 12));
        }
        if months % 12 != 0 {
            out.push_str(&format!("{}M", months % 12));
        }
        if days != 0 {
            out.push_str(&format!("{}D", days));
        }

        let seconds = self.seconds.unsigned_abs();
        let nanos = self.nanoseconds.unsigned_abs();
        if seconds != 0 || nanos != 0 {
            out.push('T');
            let hours = seconds / 3600;
            let minutes = (seconds % 3600) / 60;
            let secs = seconds % 60;
            if hours != 0 {
                out.push_str(&format!("{}H", hours));
            }
            if minutes != 0 {
                out.push_str(&format!("{}M", minutes));
            }
            if secs != 0 || nanos != 0 {
                if nanos == 0 {
                    out.push_str(&format!("{}S", secs));
                } else {
                    let fraction = format!("{:09}", nanos);
                    out.push_str(&format!("{}.{}S", secs, fraction.trim_end_matches('0')));
                }
            }
        }

        out
    }

    /// Parse ISO-8601 duration text.
    pub fn parse(text: &str) -> Result<Self, GraphSONError> {
        let malformed =
            |msg: &str| GraphSONError::malformed(tag::DURATION, format!("{}: {:?}", msg, text));

        let (negative, rest) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let rest = rest
            .strip_prefix('P')
            .ok_or_else(|| malformed("missing 'P' designator"))?;

        let (date_part, time_part) = match rest.split_once('T') {
            Some((date, time)) => {
                if time.is_empty() {
                    return Err(malformed("empty time section"));
                }
                (date, Some(time))
            }
            None => (rest, None),
        };

        let mut months: i64 = 0;
        let mut days: i64 = 0;
        let mut seconds: i64 = 0;
        let mut nanos: i64 = 0;
        let mut components = 0;

        for (number, unit) in components_of(date_part).map_err(|m| malformed(m))? {
            let n = whole(number).ok_or_else(|| malformed("invalid date component"))?;
            let added = match unit {
                'Y' => n.checked_mul(12).and_then(|m| months.checked_add(m)).map(|m| months = m),
                'M' => months.checked_add(n).map(|m| months = m),
                'W' => n.checked_mul(7).and_then(|d| days.checked_add(d)).map(|d| days = d),
                'D' => days.checked_add(n).map(|d| days = d),
                _ => return Err(malformed("unexpected date designator")),
            };
            added.ok_or_else(|| malformed("component out of range"))?;
            components += 1;
        }

        if let Some(time) = time_part {
            for (number, unit) in components_of(time).map_err(|m| malformed(m))? {
                let added = match unit {
                    'H' => whole(number)
                        .and_then(|n| n.checked_mul(3600))
                        .and_then(|s| seconds.checked_add(s))
                        .map(|s| seconds = s),
                    'M' => whole(number)
                        .and_then(|n| n.checked_mul(60))
                        .and_then(|s| seconds.checked_add(s))
                        .map(|s| seconds = s),
                    'S' => fractional(number).and_then(|(s, ns)| {
                        nanos = ns;
                        seconds.checked_add(s).map(|s| seconds = s)
                    }),
                    _ => return Err(malformed("unexpected time designator")),
                };
                added.ok_or_else(|| malformed("invalid time component"))?;
                components += 1;
            }
        }

        if components == 0 {
            return Err(malformed("no components"));
        }

        let sign = if negative { -1 } else { 1 };
        Ok(Self {
            months: months * sign,
            days: days * sign,
            seconds: seconds * sign,
            nanoseconds: (nanos * sign) as i32,
        })
    }
}

/// Split `3Y2M` style text into `(number, designator)` pairs.
fn components_of(section: &str) -> Result<Vec<(&str, char)>, &'static str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in section.char_indices() {
        if c.is_ascii_alphabetic() {
            if i == start {
                return Err("designator without a number");
            }
            out.push((&section[start..i], c));
            start = i + 1;
        }
    }
    if start != section.len() {
        return Err("number without a designator");
    }
    Ok(out)
}

fn whole(number: &str) -> Option<i64> {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

/// Parse `12.5` (or `12,5`) into whole seconds and nanoseconds.
fn fractional(number: &str) -> Option<(i64, i64)> {
    let number = number.replace(',', ".");
    let (int_part, frac_part) = match number.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (number, String::new()),
    };
    let secs = whole(&int_part)?;
    if frac_part.is_empty() {
        return Some((secs, 0));
    }
    if frac_part.len() > 9 || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let nanos = format!("{:0<9}", frac_part).parse::<i64>().ok()?;
    Some((secs, nanos))
}

impl FromStr for Duration {
    type Err = GraphSONError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

impl From<chrono::Duration> for Duration {
    fn from(d: chrono::Duration) -> Self {
        let total = d.num_seconds();
        let nanos = d.subsec_nanos();
        Self {
            months: 0,
            days: total / SECONDS_PER_DAY,
            seconds: total % SECONDS_PER_DAY,
            nanoseconds: nanos,
        }
    }
}

impl From<std::time::Duration> for Duration {
    fn from(d: std::time::Duration) -> Self {
        let total = d.as_secs() as i64;
        Self {
            months: 0,
            days: total / SECONDS_PER_DAY,
            seconds: total % SECONDS_PER_DAY,
            nanoseconds: d.subsec_nanos() as i32,
        }
    }
}

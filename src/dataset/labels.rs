//! Natural orderings for the time-like categorical labels.

use chrono::{Datelike, NaiveDate, NaiveTime};

/// Canonical weekday order used by the day-of-week projection and picker.
pub const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Hour of day (0-23) encoded by a 12-hour label such as `"09 AM"` or `"12PM"`.
///
/// `12 AM` is midnight (0) and `12 PM` is noon (12). A minutes part
/// (`"09:00 AM"`) is accepted and ignored.
pub fn hour_of_day(label: &str) -> Option<u32> {
    let upper = label.trim().to_ascii_uppercase();
    let (numeral, pm) = if let Some(rest) = upper.strip_suffix("AM") {
        (rest, false)
    } else if let Some(rest) = upper.strip_suffix("PM") {
        (rest, true)
    } else {
        return None;
    };

    let numeral = numeral.trim();
    let numeral = numeral.split(':').next().unwrap_or(numeral);
    let hour: u32 = numeral.parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }

    Some(hour % 12 + if pm { 12 } else { 0 })
}

/// Calendar month (1-12) of a label: full name, three-letter abbreviation, or numeral.
pub fn month_ordinal(label: &str) -> Option<u32> {
    let lower = label.trim().to_ascii_lowercase();
    if let Ok(n) = lower.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    if lower.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| *m == lower || (lower.len() == 3 && m.starts_with(&lower)))
        .map(|i| i as u32 + 1)
}

/// Position of a weekday name in [`WEEKDAYS`], case-insensitive.
pub fn weekday_index(label: &str) -> Option<usize> {
    let label = label.trim();
    WEEKDAYS.iter().position(|d| d.eq_ignore_ascii_case(label))
}

/// Sorts items by the ordinal their label encodes; unparseable labels go last, by label.
pub fn sort_by_ordinal<T>(
    items: &mut [T],
    label: impl Fn(&T) -> &str,
    ordinal: impl Fn(&str) -> Option<u32>,
) {
    items.sort_by(|a, b| {
        let (la, lb) = (label(a), label(b));
        match (ordinal(la), ordinal(lb)) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| la.cmp(lb)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => la.cmp(lb),
        }
    });
}

/// Weekday position as an ordinal, for use with [`sort_by_ordinal`].
pub fn weekday_ordinal(label: &str) -> Option<u32> {
    weekday_index(label).map(|i| i as u32)
}

/// 12-hour bucket label for a clock time, e.g. `"09 AM"`.
pub fn hour_label(time: NaiveTime) -> String {
    time.format("%I %p").to_string()
}

pub fn weekday_label(date: NaiveDate) -> &'static str {
    WEEKDAYS[date.weekday().num_days_from_sunday() as usize]
}

pub fn month_label(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

//! Categorical chart projections: routes, travel peaks and disruption reasons.

use std::collections::HashMap;

use super::types::{CategoryCount, TravelPeaks};
use super::utility::{count_by, labelled, ranked};
use crate::dataset::labels::{WEEKDAYS, hour_of_day, month_ordinal, sort_by_ordinal, weekday_index};
use crate::dataset::Dimension;
use crate::filter::FilteredSubset;

/// Number of routes shown when no other limit is configured.
pub const DEFAULT_TOP_ROUTES: usize = 10;

/// The `limit` most frequent routes, most frequent first; ties by route label.
pub fn popular_routes(subset: &FilteredSubset, limit: usize) -> Vec<CategoryCount> {
    let dictionary = subset.store().dictionary(Dimension::Route);
    let mut rows = ranked(count_by(subset.iter(), Dimension::Route), dictionary);
    rows.truncate(limit);
    rows
}

pub fn travel_peaks(subset: &FilteredSubset) -> TravelPeaks {
    TravelPeaks {
        by_hour: by_hour(subset),
        by_day: by_day(subset),
        by_month: by_month(subset),
    }
}

fn by_hour(subset: &FilteredSubset) -> Vec<CategoryCount> {
    let dictionary = subset.store().dictionary(Dimension::HourBucket);
    let mut rows = labelled(count_by(subset.iter(), Dimension::HourBucket), dictionary);
    sort_by_ordinal(&mut rows, |r| r.label.as_str(), hour_of_day);
    rows
}

/// Seven rows, Sunday..Saturday, zero-filled. Non-weekday labels are ignored.
fn by_day(subset: &FilteredSubset) -> Vec<CategoryCount> {
    let dictionary = subset.store().dictionary(Dimension::DayOfWeek);
    let mut totals = [0u64; 7];
    for (code, count) in count_by(subset.iter(), Dimension::DayOfWeek) {
        if let Some(i) = weekday_index(dictionary.label(code)) {
            totals[i] += count;
        }
    }

    WEEKDAYS
        .iter()
        .zip(totals)
        .map(|(day, count)| CategoryCount::new(*day, count))
        .collect()
}

fn by_month(subset: &FilteredSubset) -> Vec<CategoryCount> {
    let dictionary = subset.store().dictionary(Dimension::Month);
    let mut rows = labelled(count_by(subset.iter(), Dimension::Month), dictionary);
    sort_by_ordinal(&mut rows, |r| r.label.as_str(), month_ordinal);
    rows
}

/// Reasons recorded on delayed journeys, most frequent first.
pub fn delay_reasons(subset: &FilteredSubset) -> Vec<CategoryCount> {
    reasons(subset, |delayed, _| delayed)
}

/// Reasons recorded on cancelled journeys, most frequent first.
///
/// Cancellations share the delay-reason column.
pub fn cancellation_reasons(subset: &FilteredSubset) -> Vec<CategoryCount> {
    reasons(subset, |_, cancelled| cancelled)
}

fn reasons(subset: &FilteredSubset, keep: impl Fn(bool, bool) -> bool) -> Vec<CategoryCount> {
    let dictionary = subset.store().dictionary(Dimension::DelayReason);
    let counts: HashMap<_, _> = count_by(
        subset.iter().filter(|j| keep(j.is_delayed, j.is_cancelled)),
        Dimension::DelayReason,
    );
    ranked(counts, dictionary)
}

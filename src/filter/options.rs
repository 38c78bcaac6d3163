use chrono::NaiveDate;
use serde::Serialize;

use super::criteria::ALL;
use crate::dataset::labels::{hour_of_day, sort_by_ordinal, weekday_ordinal};
use crate::dataset::{Dimension, RecordStore};

/// Choices offered by each picker: the values present in the data, `"All"` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    pub hours: Vec<String>,
    pub days: Vec<String>,
    pub departures: Vec<String>,
    pub arrivals: Vec<String>,
}

impl FilterOptions {
    pub fn from_store(store: &RecordStore) -> Self {
        let span = store.date_span();

        let mut hours = labels(store, Dimension::HourBucket);
        sort_by_ordinal(&mut hours, |h| h.as_str(), hour_of_day);

        let mut days = labels(store, Dimension::DayOfWeek);
        sort_by_ordinal(&mut days, |d| d.as_str(), weekday_ordinal);

        let mut departures = labels(store, Dimension::DepartureStation);
        departures.sort();

        let mut arrivals = labels(store, Dimension::ArrivalStation);
        arrivals.sort();

        Self {
            date_min: span.map(|(min, _)| min),
            date_max: span.map(|(_, max)| max),
            hours: with_sentinel(hours),
            days: with_sentinel(days),
            departures: with_sentinel(departures),
            arrivals: with_sentinel(arrivals),
        }
    }
}

fn labels(store: &RecordStore, dimension: Dimension) -> Vec<String> {
    store
        .dictionary(dimension)
        .iter()
        .map(|(_, label)| label.to_string())
        .collect()
}

fn with_sentinel(values: Vec<String>) -> Vec<String> {
    std::iter::once(ALL.to_string()).chain(values).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::JourneyRecord;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_options_are_ordered_with_sentinel_first() {
        let store = RecordStore::from_records(vec![
            JourneyRecord {
                hour_bucket: Some("10 AM".into()),
                day_of_week: Some("Tuesday".into()),
                departure_station: Some("York".into()),
                arrival_station: Some("Leeds".into()),
                ..JourneyRecord::new(date(11))
            },
            JourneyRecord {
                hour_bucket: Some("09 AM".into()),
                day_of_week: Some("Sunday".into()),
                departure_station: Some("Bristol Temple Meads".into()),
                ..JourneyRecord::new(date(9))
            },
        ]);

        let options = FilterOptions::from_store(&store);
        assert_eq!(options.date_min, Some(date(9)));
        assert_eq!(options.date_max, Some(date(11)));
        assert_eq!(options.hours, vec!["All", "09 AM", "10 AM"]);
        assert_eq!(options.days, vec!["All", "Sunday", "Tuesday"]);
        assert_eq!(options.departures, vec!["All", "Bristol Temple Meads", "York"]);
        assert_eq!(options.arrivals, vec!["All", "Leeds"]);
    }

    #[test]
    fn test_options_for_empty_store() {
        let options = FilterOptions::from_store(&RecordStore::default());
        assert_eq!(options.date_min, None);
        assert_eq!(options.hours, vec!["All"]);
    }
}

use tracing::debug;

use super::criteria::FilterCriteria;
use crate::dataset::{Journey, RecordStore};

/// Records of a [`RecordStore`] that passed a [`FilterCriteria`], in store order.
///
/// Holds indices only; journeys are borrowed from the store.
#[derive(Debug, Clone)]
pub struct FilteredSubset<'a> {
    store: &'a RecordStore,
    indices: Vec<usize>,
}

impl<'a> FilteredSubset<'a> {
    pub fn store(&self) -> &'a RecordStore {
        self.store
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Journey> + '_ {
        let journeys = self.store.journeys();
        self.indices.iter().map(move |&i| &journeys[i])
    }
}

/// Applies `criteria` to every record of `store`.
pub fn apply<'a>(store: &'a RecordStore, criteria: &FilterCriteria) -> FilteredSubset<'a> {
    let indices: Vec<usize> = store
        .journeys()
        .iter()
        .enumerate()
        .filter(|(_, journey)| criteria.matches(journey))
        .map(|(i, _)| i)
        .collect();

    debug!(total = store.len(), matched = indices.len(), "Filter applied");
    FilteredSubset { store, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dimension, JourneyRecord};
    use crate::filter::criteria::{DateRange, RawSelection, Selection};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn record(d: u32, hour: &str, day: &str, from: &str, to: &str) -> JourneyRecord {
        JourneyRecord {
            hour_bucket: Some(hour.into()),
            day_of_week: Some(day.into()),
            departure_station: Some(from.into()),
            arrival_station: Some(to.into()),
            ..JourneyRecord::new(date(d))
        }
    }

    fn store() -> RecordStore {
        RecordStore::from_records(vec![
            record(1, "08 AM", "Wednesday", "York", "Leeds"),
            record(2, "09 AM", "Thursday", "Leeds", "York"),
            record(3, "08 AM", "Friday", "York", "Durham"),
            record(4, "05 PM", "Saturday", "Durham", "York"),
            JourneyRecord::new(date(5)),
        ])
    }

    fn raw(f: impl FnOnce(&mut RawSelection)) -> RawSelection {
        let mut raw = RawSelection::default();
        f(&mut raw);
        raw
    }

    #[test]
    fn test_all_criteria_returns_everything_in_order() {
        let store = store();
        let subset = apply(&store, &FilterCriteria::all_for(&store));

        assert_eq!(subset.indices(), &[0, 1, 2, 3, 4]);
        let dates: Vec<_> = subset.iter().map(|j| j.journey_date).collect();
        assert_eq!(dates, store.journey_dates().collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_store_gives_empty_subset() {
        let store = RecordStore::default();
        let subset = apply(&store, &FilterCriteria::all_for(&store));
        assert!(subset.is_empty());
    }

    #[test]
    fn test_predicates_are_anded() {
        let store = store();
        let selection = raw(|r| {
            r.hours = vec!["08 AM".into()];
            r.departures = vec!["York".into()];
            r.arrivals = vec!["Durham".into()];
        })
        .with_default_dates(&store);
        let criteria = FilterCriteria::resolve(&store, &selection).unwrap();

        assert_eq!(apply(&store, &criteria).indices(), &[2]);
    }

    #[test]
    fn test_date_range_bounds() {
        let store = store();
        let criteria = FilterCriteria {
            date_range: DateRange::new(date(2), date(3)).unwrap(),
            ..FilterCriteria::all_for(&store)
        };
        assert_eq!(apply(&store, &criteria).indices(), &[1, 2]);
    }

    #[test]
    fn test_missing_values_fail_specific_selection() {
        let store = store();
        let selection = raw(|r| r.days = vec!["Wednesday".into(), "Saturday".into()])
            .with_default_dates(&store);
        let criteria = FilterCriteria::resolve(&store, &selection).unwrap();

        assert_eq!(apply(&store, &criteria).indices(), &[0, 3]);
    }

    #[test]
    fn test_unknown_station_matches_nothing() {
        let store = store();
        let selection = raw(|r| r.departures = vec!["Atlantis".into()]).with_default_dates(&store);
        let criteria = FilterCriteria::resolve(&store, &selection).unwrap();

        assert!(apply(&store, &criteria).is_empty());
    }

    #[test]
    fn test_sound_and_complete() {
        let store = store();
        let criteria = FilterCriteria {
            hour_buckets: Selection::resolve(&store, Dimension::HourBucket, &["08 AM".to_string()])
                .unwrap(),
            ..FilterCriteria::all_for(&store)
        };
        let subset = apply(&store, &criteria);

        for (i, journey) in store.journeys().iter().enumerate() {
            assert_eq!(subset.indices().contains(&i), criteria.matches(journey));
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let store = store();
        let selection = raw(|r| r.arrivals = vec!["York".into()]).with_default_dates(&store);
        let criteria = FilterCriteria::resolve(&store, &selection).unwrap();

        let first = apply(&store, &criteria);
        let second = apply(&store, &criteria);
        assert_eq!(first.indices(), second.indices());
        assert_eq!(first.indices(), &[1, 3]);
    }
}

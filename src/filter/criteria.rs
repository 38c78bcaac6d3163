//! Filter criteria and their construction from raw picker selections.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::dataset::{CategoryCode, Dimension, Journey, RecordStore};
use crate::error::ValidationError;

/// Sentinel label meaning "no restriction on this dimension".
pub const ALL: &str = "All";

/// Inclusive journey-date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvertedDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds a range from picker bounds; both must be present.
    pub fn from_bounds(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Err(ValidationError::IncompleteDateRange),
        }
    }

    /// Every representable date.
    pub fn unbounded() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Selected values for one categorical dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Only(BTreeSet<CategoryCode>),
}

impl Selection {
    pub fn matches(&self, code: Option<CategoryCode>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(codes) => code.is_some_and(|c| codes.contains(&c)),
        }
    }

    /// Resolves picker labels against the store's dictionary for `dimension`.
    ///
    /// Exactly `["All"]` means no restriction. `"All"` together with other
    /// labels is rejected. Labels that never occur in the data are dropped,
    /// so they match nothing; an empty list matches nothing as well.
    pub fn resolve(
        store: &RecordStore,
        dimension: Dimension,
        labels: &[String],
    ) -> Result<Self, ValidationError> {
        let has_sentinel = labels.iter().any(|l| l == ALL);
        if has_sentinel {
            return if labels.iter().all(|l| l == ALL) {
                Ok(Selection::All)
            } else {
                Err(ValidationError::MixedSentinel { dimension })
            };
        }

        let dictionary = store.dictionary(dimension);
        let mut codes = BTreeSet::new();
        for label in labels {
            match dictionary.lookup(label) {
                Some(code) => {
                    codes.insert(code);
                }
                None => debug!(%dimension, label = %label, "Selected value not present in dataset"),
            }
        }
        Ok(Selection::Only(codes))
    }
}

/// Raw selections as collected by a picker UI, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSelection {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub hours: Vec<String>,
    pub days: Vec<String>,
    pub departures: Vec<String>,
    pub arrivals: Vec<String>,
}

impl Default for RawSelection {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            hours: vec![ALL.to_string()],
            days: vec![ALL.to_string()],
            departures: vec![ALL.to_string()],
            arrivals: vec![ALL.to_string()],
        }
    }
}

impl RawSelection {
    /// Fills an untouched date picker (no bounds at all) with the dataset's span.
    ///
    /// An empty store has no span and gets the unbounded range. A single given
    /// bound is left alone so that validation can reject it.
    pub fn with_default_dates(mut self, store: &RecordStore) -> Self {
        if self.start.is_none() && self.end.is_none() {
            let (min, max) = store.date_span().unwrap_or_else(|| {
                let range = DateRange::unbounded();
                (range.start, range.end)
            });
            self.start = Some(min);
            self.end = Some(max);
        }
        self
    }
}

/// Validated predicates applied by [`apply`](super::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub hour_buckets: Selection,
    pub days_of_week: Selection,
    pub departure_stations: Selection,
    pub arrival_stations: Selection,
}

impl FilterCriteria {
    /// Criteria that keep every record of `store`.
    pub fn all_for(store: &RecordStore) -> Self {
        let date_range = store
            .date_span()
            .and_then(|(min, max)| DateRange::new(min, max).ok())
            .unwrap_or_else(DateRange::unbounded);

        Self {
            date_range,
            hour_buckets: Selection::All,
            days_of_week: Selection::All,
            departure_stations: Selection::All,
            arrival_stations: Selection::All,
        }
    }

    pub fn resolve(store: &RecordStore, raw: &RawSelection) -> Result<Self, ValidationError> {
        Ok(Self {
            date_range: DateRange::from_bounds(raw.start, raw.end)?,
            hour_buckets: Selection::resolve(store, Dimension::HourBucket, &raw.hours)?,
            days_of_week: Selection::resolve(store, Dimension::DayOfWeek, &raw.days)?,
            departure_stations: Selection::resolve(
                store,
                Dimension::DepartureStation,
                &raw.departures,
            )?,
            arrival_stations: Selection::resolve(store, Dimension::ArrivalStation, &raw.arrivals)?,
        })
    }

    /// True when `journey` passes every predicate.
    pub fn matches(&self, journey: &Journey) -> bool {
        self.date_range.contains(journey.journey_date)
            && self.hour_buckets.matches(journey.code(Dimension::HourBucket))
            && self.days_of_week.matches(journey.code(Dimension::DayOfWeek))
            && self
                .departure_stations
                .matches(journey.code(Dimension::DepartureStation))
            && self
                .arrival_stations
                .matches(journey.code(Dimension::ArrivalStation))
    }
}

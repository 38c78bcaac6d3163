//! The immutable journey dataset.
//!
//! [`RecordStore`] holds every loaded [`Journey`] together with one closed
//! [`Dictionary`] per categorical column. [`loader`] turns CSV into a store,
//! and [`DatasetCell`] is the single-assignment holder for the process-wide
//! copy.

mod dictionary;
pub mod labels;
pub mod loader;
pub mod source;
mod types;

pub use dictionary::{CategoryCode, Dictionary};
pub use loader::{LoadSummary, load, load_from_bytes, load_from_reader};
pub use source::DataSource;
pub use types::{Dimension, Journey, JourneyRecord};

use chrono::NaiveDate;
use std::sync::{Arc, OnceLock};

use crate::error::ValidationError;

#[derive(Debug, Default)]
pub struct RecordStore {
    journeys: Vec<Journey>,
    dictionaries: [Dictionary; Dimension::COUNT],
}

impl RecordStore {
    pub fn from_records(records: impl IntoIterator<Item = JourneyRecord>) -> Self {
        let mut builder = RecordStoreBuilder::default();
        for record in records {
            builder.push(&record);
        }
        builder.build()
    }

    pub fn len(&self) -> usize {
        self.journeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty()
    }

    pub fn journeys(&self) -> &[Journey] {
        &self.journeys
    }

    pub fn get(&self, index: usize) -> Option<&Journey> {
        self.journeys.get(index)
    }

    pub fn dictionary(&self, dimension: Dimension) -> &Dictionary {
        &self.dictionaries[dimension.slot()]
    }

    pub fn label(&self, dimension: Dimension, code: CategoryCode) -> &str {
        self.dictionary(dimension).label(code)
    }

    /// Label of `journey`'s value in `dimension`, if present.
    pub fn label_of(&self, journey: &Journey, dimension: Dimension) -> Option<&str> {
        journey.code(dimension).map(|c| self.label(dimension, c))
    }

    /// Earliest and latest journey date, or `None` for an empty store.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.journey_dates().min()?;
        let max = self.journey_dates().max()?;
        Some((min, max))
    }

    pub fn journey_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.journeys.iter().map(|j| j.journey_date)
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.journeys.iter().map(|j| j.price)
    }

    pub fn codes(&self, dimension: Dimension) -> impl Iterator<Item = Option<CategoryCode>> + '_ {
        self.journeys.iter().map(move |j| j.code(dimension))
    }
}

/// Interns [`JourneyRecord`]s into a [`RecordStore`].
#[derive(Debug, Default)]
pub struct RecordStoreBuilder {
    store: RecordStore,
}

impl RecordStoreBuilder {
    pub fn push(&mut self, record: &JourneyRecord) {
        let mut codes = [None; Dimension::COUNT];
        for dimension in Dimension::ALL {
            codes[dimension.slot()] = record
                .label(dimension)
                .map(|label| self.store.dictionaries[dimension.slot()].intern(label));
        }

        self.store.journeys.push(Journey {
            journey_date: record.journey_date,
            price: record.price,
            is_delayed: record.is_delayed,
            is_cancelled: record.is_cancelled,
            refund_requested: record.refund_requested,
            codes,
        });
    }

    pub fn build(self) -> RecordStore {
        self.store
    }
}

/// Single-assignment holder for the session's dataset.
///
/// Initialized once after loading; read-only afterwards. Consumers receive
/// the `Arc` handle explicitly rather than reaching back into the cell.
#[derive(Debug, Default)]
pub struct DatasetCell {
    inner: OnceLock<Arc<RecordStore>>,
}

impl DatasetCell {
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    pub fn init(&self, store: RecordStore) -> Result<Arc<RecordStore>, ValidationError> {
        let store = Arc::new(store);
        self.inner
            .set(store.clone())
            .map_err(|_| ValidationError::AlreadyInitialized)?;
        Ok(store)
    }

    pub fn get(&self) -> Option<Arc<RecordStore>> {
        self.inner.get().cloned()
    }
}

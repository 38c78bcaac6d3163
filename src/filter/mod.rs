//! Selection of journeys by date range, hour bucket, weekday and station.

pub mod criteria;
mod engine;
pub mod options;

pub use criteria::{ALL, DateRange, FilterCriteria, RawSelection, Selection};
pub use engine::{FilteredSubset, apply};
pub use options::FilterOptions;

//! Aggregation of a filtered journey subset into dashboard figures.
//!
//! Every function here is total: an empty subset yields zero KPIs, empty
//! projections and a zero-filled weekday series.

pub mod kpi;
pub mod pivot;
pub mod projections;
pub mod types;
pub mod utility;

pub use kpi::compute_kpis;
pub use pivot::revenue_pivot;
pub use projections::{
    DEFAULT_TOP_ROUTES, cancellation_reasons, delay_reasons, popular_routes, travel_peaks,
};
pub use types::{
    CategoryCount, ClassSeries, DashboardView, KpiBundle, KpiDisplay, RevenuePivot, TravelPeaks,
};

use crate::filter::FilteredSubset;

/// Computes the KPI bundle and all five tab projections for `subset`.
pub fn aggregate(subset: &FilteredSubset, top_routes: usize) -> DashboardView {
    DashboardView {
        kpis: compute_kpis(subset),
        popular_routes: popular_routes(subset, top_routes),
        travel_peaks: travel_peaks(subset),
        delay_reasons: delay_reasons(subset),
        cancellation_reasons: cancellation_reasons(subset),
        revenue_pivot: revenue_pivot(subset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{JourneyRecord, RecordStore};
    use crate::filter::{FilterCriteria, RawSelection, apply};
    use chrono::NaiveDate;

    fn pairs(rows: &[CategoryCount]) -> Vec<(&str, u64)> {
        rows.iter().map(|r| (r.label.as_str(), r.count)).collect()
    }

    fn three_journeys() -> RecordStore {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        RecordStore::from_records(vec![
            JourneyRecord {
                route: Some("A-B".into()),
                departure_station: Some("A".into()),
                price: 100.0,
                ..JourneyRecord::new(date)
            },
            JourneyRecord {
                route: Some("A-B".into()),
                departure_station: Some("A".into()),
                price: 50.0,
                is_delayed: true,
                delay_reason: Some("Signal Fault".into()),
                ..JourneyRecord::new(date)
            },
            JourneyRecord {
                route: Some("C-D".into()),
                departure_station: Some("C".into()),
                price: 200.0,
                ..JourneyRecord::new(date)
            },
        ])
    }

    #[test]
    fn test_three_journey_scenario() {
        let store = three_journeys();
        let subset = apply(&store, &FilterCriteria::all_for(&store));
        let view = aggregate(&subset, DEFAULT_TOP_ROUTES);

        assert_eq!(view.kpis.total_journeys, 3);
        assert_eq!(view.kpis.revenue_display(), 350);
        assert_eq!(view.kpis.total_delayed, 1);
        assert_eq!(pairs(&view.popular_routes), vec![("A-B", 2), ("C-D", 1)]);
        assert_eq!(pairs(&view.delay_reasons), vec![("Signal Fault", 1)]);
        assert!(view.cancellation_reasons.is_empty());
    }

    #[test]
    fn test_unmatched_station_gives_zeroed_view() {
        let store = three_journeys();
        let raw = RawSelection {
            departures: vec!["Z".to_string()],
            ..RawSelection::default()
        }
        .with_default_dates(&store);
        let criteria = FilterCriteria::resolve(&store, &raw).unwrap();
        let view = aggregate(&apply(&store, &criteria), DEFAULT_TOP_ROUTES);

        assert_eq!(view.kpis, KpiBundle::default());
        assert!(view.popular_routes.is_empty());
        assert!(view.travel_peaks.by_hour.is_empty());
        assert!(view.travel_peaks.by_month.is_empty());
        assert_eq!(view.travel_peaks.by_day.len(), 7);
        assert!(view.travel_peaks.by_day.iter().all(|d| d.count == 0));
        assert!(view.delay_reasons.is_empty());
        assert!(view.cancellation_reasons.is_empty());
        assert!(view.revenue_pivot.is_empty());
    }
}

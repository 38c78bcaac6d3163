use super::types::KpiBundle;
use crate::filter::FilteredSubset;

/// Computes the headline counters over `subset`.
///
/// Refund requests are counted from the normalized flag, so source values
/// other than `Yes` never contribute.
pub fn compute_kpis(subset: &FilteredSubset) -> KpiBundle {
    let mut kpis = KpiBundle::default();

    for journey in subset.iter() {
        kpis.total_journeys += 1;
        kpis.total_revenue += journey.price;

        if journey.is_delayed {
            kpis.total_delayed += 1;
        }

        if journey.is_cancelled {
            kpis.total_cancelled += 1;
        }

        if journey.refund_requested {
            kpis.total_refund_requests += 1;
        }
    }

    kpis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{JourneyRecord, RecordStore, load_from_bytes};
    use crate::filter::{FilterCriteria, apply};
    use chrono::NaiveDate;

    #[test]
    fn test_kpis_count_flags_and_sum_prices() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let store = RecordStore::from_records(vec![
            JourneyRecord {
                price: 10.25,
                is_delayed: true,
                refund_requested: true,
                ..JourneyRecord::new(date)
            },
            JourneyRecord {
                price: 5.5,
                is_cancelled: true,
                ..JourneyRecord::new(date)
            },
            JourneyRecord {
                price: 1.0,
                ..JourneyRecord::new(date)
            },
        ]);
        let subset = apply(&store, &FilterCriteria::all_for(&store));

        let kpis = compute_kpis(&subset);
        assert_eq!(kpis.total_journeys, 3);
        assert_eq!(kpis.total_revenue, 16.75);
        assert_eq!(kpis.revenue_display(), 16);
        assert_eq!(kpis.total_delayed, 1);
        assert_eq!(kpis.total_cancelled, 1);
        assert_eq!(kpis.total_refund_requests, 1);
    }

    #[test]
    fn test_unrecognized_refund_value_is_not_refunded() {
        let csv = "\
Date of Journey,Departure Station,Arrival Destination,Price,Is_Delayed,Is_Cancelled,Refund Request,Ticket Type,Ticket Class
2024-01-01,York,Leeds,10,False,False,Maybe,Advance,Standard
2024-01-01,York,Leeds,10,False,False,Yes,Advance,Standard
2024-01-01,York,Leeds,10,False,False,yes,Advance,Standard
";
        let (store, summary) = load_from_bytes(csv.as_bytes()).unwrap();
        let subset = apply(&store, &FilterCriteria::all_for(&store));

        assert_eq!(summary.unrecognized_refund_values, 2);
        assert_eq!(compute_kpis(&subset).total_refund_requests, 1);
    }

    #[test]
    fn test_empty_subset_is_all_zero() {
        let store = RecordStore::default();
        let subset = apply(&store, &FilterCriteria::all_for(&store));
        assert_eq!(compute_kpis(&subset), KpiBundle::default());
    }
}

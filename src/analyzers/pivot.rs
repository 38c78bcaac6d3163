use std::collections::HashMap;

use super::types::RevenuePivot;
use crate::dataset::{CategoryCode, Dimension};
use crate::filter::FilteredSubset;

/// Sums ticket prices per (ticket type, ticket class).
///
/// Journeys lacking either value are left out. Rows and columns are the
/// types and classes that occur in `subset`, sorted by label; absent
/// combinations are `0.0`.
pub fn revenue_pivot(subset: &FilteredSubset) -> RevenuePivot {
    let store = subset.store();
    let mut sums: HashMap<(CategoryCode, CategoryCode), f64> = HashMap::new();

    for journey in subset.iter() {
        if let (Some(ticket_type), Some(ticket_class)) = (
            journey.code(Dimension::TicketType),
            journey.code(Dimension::TicketClass),
        ) {
            *sums.entry((ticket_type, ticket_class)).or_insert(0.0) += journey.price;
        }
    }

    let axis = |dimension: Dimension, pick: fn(&(CategoryCode, CategoryCode)) -> CategoryCode| {
        let mut codes: Vec<CategoryCode> = sums.keys().map(pick).collect();
        codes.sort_by(|a, b| store.label(dimension, *a).cmp(store.label(dimension, *b)));
        codes.dedup();
        codes
    };
    let types = axis(Dimension::TicketType, |k| k.0);
    let classes = axis(Dimension::TicketClass, |k| k.1);

    let cells = types
        .iter()
        .map(|t| {
            classes
                .iter()
                .map(|c| sums.get(&(*t, *c)).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    RevenuePivot {
        ticket_types: types
            .iter()
            .map(|c| store.label(Dimension::TicketType, *c).to_string())
            .collect(),
        ticket_classes: classes
            .iter()
            .map(|c| store.label(Dimension::TicketClass, *c).to_string())
            .collect(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{JourneyRecord, RecordStore};
    use crate::filter::{FilterCriteria, apply};
    use chrono::NaiveDate;

    fn ticket(ticket_type: Option<&str>, ticket_class: Option<&str>, price: f64) -> JourneyRecord {
        JourneyRecord {
            ticket_type: ticket_type.map(String::from),
            ticket_class: ticket_class.map(String::from),
            price,
            ..JourneyRecord::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        }
    }

    #[test]
    fn test_pivot_fills_missing_combinations() {
        let store = RecordStore::from_records(vec![
            ticket(Some("Off-Peak"), Some("Standard"), 10.0),
            ticket(Some("Advance"), Some("Standard"), 4.5),
            ticket(Some("Advance"), Some("First Class"), 30.0),
            ticket(Some("Advance"), Some("Standard"), 2.0),
        ]);
        let subset = apply(&store, &FilterCriteria::all_for(&store));
        let pivot = revenue_pivot(&subset);

        assert_eq!(pivot.ticket_types, vec!["Advance", "Off-Peak"]);
        assert_eq!(pivot.ticket_classes, vec!["First Class", "Standard"]);
        assert_eq!(pivot.cells, vec![vec![30.0, 6.5], vec![0.0, 10.0]]);
        assert!(pivot.cells.iter().all(|row| row.len() == pivot.ticket_classes.len()));
    }

    #[test]
    fn test_pivot_total_matches_priced_journeys_with_both_keys() {
        let store = RecordStore::from_records(vec![
            ticket(Some("Anytime"), Some("Standard"), 12.25),
            ticket(Some("Anytime"), None, 99.0),
            ticket(None, Some("Standard"), 50.0),
            ticket(Some("Advance"), Some("First Class"), 7.5),
        ]);
        let subset = apply(&store, &FilterCriteria::all_for(&store));
        let pivot = revenue_pivot(&subset);

        let expected: f64 = subset
            .iter()
            .filter(|j| {
                j.code(Dimension::TicketType).is_some() && j.code(Dimension::TicketClass).is_some()
            })
            .map(|j| j.price)
            .sum();
        assert_eq!(pivot.total(), expected);
        assert_eq!(pivot.total(), 19.75);
    }

    #[test]
    fn test_pivot_of_empty_subset_is_empty() {
        let store = RecordStore::default();
        let subset = apply(&store, &FilterCriteria::all_for(&store));
        let pivot = revenue_pivot(&subset);

        assert!(pivot.is_empty());
        assert!(pivot.ticket_classes.is_empty());
        assert!(pivot.cells.is_empty());
    }
}

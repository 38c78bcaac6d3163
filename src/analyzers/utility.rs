use std::collections::HashMap;

use super::types::CategoryCount;
use crate::dataset::{CategoryCode, Dictionary, Dimension, Journey};

/// Counts journeys per value of `dimension`. Missing values are not counted.
pub fn count_by<'a>(
    journeys: impl Iterator<Item = &'a Journey>,
    dimension: Dimension,
) -> HashMap<CategoryCode, u64> {
    let mut counts = HashMap::new();
    for code in journeys.filter_map(|j| j.code(dimension)) {
        *counts.entry(code).or_insert(0) += 1;
    }
    counts
}

/// Labels `counts` and orders them by count descending, then label ascending.
pub fn ranked(counts: HashMap<CategoryCode, u64>, dictionary: &Dictionary) -> Vec<CategoryCount> {
    let mut rows = labelled(counts, dictionary);
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    rows
}

/// Labels `counts` without imposing an order.
pub fn labelled(counts: HashMap<CategoryCode, u64>, dictionary: &Dictionary) -> Vec<CategoryCount> {
    counts
        .into_iter()
        .map(|(code, count)| CategoryCount::new(dictionary.label(code), count))
        .collect()
}

/// Formats an integer with comma thousands separators: `1234567` -> `"1,234,567"`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole-unit currency amount, truncated: `1234.99` -> `"$1,234"`.
pub fn format_currency(amount: f64) -> String {
    format!("${}", format_thousands(amount.max(0.0).trunc() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(12_345), "12,345");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_currency_truncates() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(350.0), "$350");
        assert_eq!(format_currency(1_234.99), "$1,234");
    }

    #[test]
    fn test_ranked_breaks_ties_by_label() {
        let mut dictionary = Dictionary::default();
        let weather = dictionary.intern("Weather");
        let signal = dictionary.intern("Signal Failure");
        let staff = dictionary.intern("Staffing");

        let counts = HashMap::from([(weather, 2), (signal, 2), (staff, 5)]);
        let rows = ranked(counts, &dictionary);

        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Staffing", "Signal Failure", "Weather"]);
    }
}

//! Data types produced by the aggregation pipeline.

use serde::Serialize;

use super::utility::{format_currency, format_thousands};

/// Headline counters for the filtered journeys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiBundle {
    pub total_journeys: u64,
    pub total_revenue: f64,
    pub total_delayed: u64,
    pub total_cancelled: u64,
    pub total_refund_requests: u64,
}

impl KpiBundle {
    /// Revenue truncated to whole currency units.
    pub fn revenue_display(&self) -> u64 {
        self.total_revenue.max(0.0).trunc() as u64
    }

    pub fn formatted(&self) -> KpiDisplay {
        KpiDisplay {
            total_journeys: format_thousands(self.total_journeys),
            total_revenue: format_currency(self.total_revenue),
            total_delayed: format_thousands(self.total_delayed),
            total_cancelled: format_thousands(self.total_cancelled),
            total_refund_requests: format_thousands(self.total_refund_requests),
        }
    }
}

/// [`KpiBundle`] rendered for metric widgets, e.g. `"12,345"` and `"$1,234"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiDisplay {
    pub total_journeys: String,
    pub total_revenue: String,
    pub total_delayed: String,
    pub total_cancelled: String,
    pub total_refund_requests: String,
}

/// One bar of a categorical chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Journey counts over time buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TravelPeaks {
    /// Present hour buckets in clock order.
    pub by_hour: Vec<CategoryCount>,
    /// Always seven entries, Sunday through Saturday.
    pub by_day: Vec<CategoryCount>,
    /// Present months in calendar order.
    pub by_month: Vec<CategoryCount>,
}

/// Summed ticket revenue by ticket type (rows) and ticket class (columns).
///
/// `cells[row][column]`; every row has a value for every column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenuePivot {
    pub ticket_types: Vec<String>,
    pub ticket_classes: Vec<String>,
    pub cells: Vec<Vec<f64>>,
}

/// One chart series of a [`RevenuePivot`]: a ticket class across ticket types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSeries {
    pub ticket_class: String,
    pub points: Vec<(String, f64)>,
}

impl RevenuePivot {
    pub fn is_empty(&self) -> bool {
        self.ticket_types.is_empty()
    }

    pub fn value(&self, ticket_type: &str, ticket_class: &str) -> Option<f64> {
        let row = self.ticket_types.iter().position(|t| t == ticket_type)?;
        let column = self.ticket_classes.iter().position(|c| c == ticket_class)?;
        Some(self.cells[row][column])
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    pub fn series(&self) -> Vec<ClassSeries> {
        self.ticket_classes
            .iter()
            .enumerate()
            .map(|(column, class)| ClassSeries {
                ticket_class: class.clone(),
                points: self
                    .ticket_types
                    .iter()
                    .zip(&self.cells)
                    .map(|(ticket_type, row)| (ticket_type.clone(), row[column]))
                    .collect(),
            })
            .collect()
    }
}

/// Everything one dashboard refresh displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub kpis: KpiBundle,
    pub popular_routes: Vec<CategoryCount>,
    pub travel_peaks: TravelPeaks,
    pub delay_reasons: Vec<CategoryCount>,
    pub cancellation_reasons: Vec<CategoryCount>,
    pub revenue_pivot: RevenuePivot,
}

//! Output formatting and persistence for dashboard results.
//!
//! Supports pretty-printing, structured logging, JSON reports and CSV export
//! of a filtered subset.

use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::DashboardView;
use crate::dataset::Dimension;
use crate::filter::FilteredSubset;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logs the KPIs and every projection of `view` as structured events.
pub fn log_view(view: &DashboardView) {
    let formatted = view.kpis.formatted();
    info!(
        total_journeys = %formatted.total_journeys,
        total_revenue = %formatted.total_revenue,
        total_delayed = %formatted.total_delayed,
        total_cancelled = %formatted.total_cancelled,
        total_refund_requests = %formatted.total_refund_requests,
        "KPIs"
    );

    for (rank, route) in view.popular_routes.iter().enumerate() {
        info!(rank = rank + 1, route = %route.label, journeys = route.count, "Popular route");
    }
    for hour in &view.travel_peaks.by_hour {
        info!(hour = %hour.label, journeys = hour.count, "Travel by hour");
    }
    for day in &view.travel_peaks.by_day {
        info!(day = %day.label, journeys = day.count, "Travel by day");
    }
    for month in &view.travel_peaks.by_month {
        info!(month = %month.label, journeys = month.count, "Travel by month");
    }
    for reason in &view.delay_reasons {
        info!(reason = %reason.label, journeys = reason.count, "Delay reason");
    }
    for reason in &view.cancellation_reasons {
        info!(reason = %reason.label, journeys = reason.count, "Cancellation reason");
    }
    for series in view.revenue_pivot.series() {
        for (ticket_type, revenue) in &series.points {
            info!(
                ticket_class = %series.ticket_class,
                ticket_type = %ticket_type,
                revenue,
                "Revenue"
            );
        }
    }
}

/// Writes `view` as JSON to `path`, gzip-compressed when `gzip` is set.
pub fn write_report(path: &Path, view: &DashboardView, gzip: bool) -> Result<()> {
    let json = serde_json::to_vec_pretty(view)?;
    let mut file = BufWriter::new(File::create(path)?);

    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(&json)?;
        encoder.finish()?.flush()?;
    } else {
        file.write_all(&json)?;
        file.flush()?;
    }

    debug!(path = %path.display(), gzip, bytes = json.len(), "Report written");
    Ok(())
}

/// One exported journey, using the same headers the loader reads.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Date of Journey")]
    date_of_journey: String,
    #[serde(rename = "Hour_AM_PM")]
    hour: Option<&'a str>,
    #[serde(rename = "Day_of_Week")]
    day_of_week: Option<&'a str>,
    #[serde(rename = "Month")]
    month: Option<&'a str>,
    #[serde(rename = "Departure Station")]
    departure_station: Option<&'a str>,
    #[serde(rename = "Arrival Destination")]
    arrival_station: Option<&'a str>,
    #[serde(rename = "Route")]
    route: Option<&'a str>,
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "Is_Delayed")]
    is_delayed: bool,
    #[serde(rename = "Is_Cancelled")]
    is_cancelled: bool,
    #[serde(rename = "Reason_for_Delay")]
    delay_reason: Option<&'a str>,
    #[serde(rename = "Refund Request")]
    refund_request: &'static str,
    #[serde(rename = "Ticket Type")]
    ticket_type: Option<&'a str>,
    #[serde(rename = "Ticket Class")]
    ticket_class: Option<&'a str>,
}

/// Writes the journeys of `subset` to a CSV file at `path`.
///
/// The file can be loaded back as a dataset. Returns the number of rows written.
pub fn write_subset_csv(path: &Path, subset: &FilteredSubset) -> Result<usize> {
    let store = subset.store();
    let mut writer = csv::WriterBuilder::new().from_path(path)?;

    let mut rows = 0;
    for journey in subset.iter() {
        let label = |dimension| store.label_of(journey, dimension);
        writer.serialize(ExportRow {
            date_of_journey: journey.journey_date.format("%Y-%m-%d").to_string(),
            hour: label(Dimension::HourBucket),
            day_of_week: label(Dimension::DayOfWeek),
            month: label(Dimension::Month),
            departure_station: label(Dimension::DepartureStation),
            arrival_station: label(Dimension::ArrivalStation),
            route: label(Dimension::Route),
            price: journey.price,
            is_delayed: journey.is_delayed,
            is_cancelled: journey.is_cancelled,
            delay_reason: label(Dimension::DelayReason),
            refund_request: if journey.refund_requested { "Yes" } else { "No" },
            ticket_type: label(Dimension::TicketType),
            ticket_class: label(Dimension::TicketClass),
        })?;
        rows += 1;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows, "Subset exported");
    Ok(rows)
}

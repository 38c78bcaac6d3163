//! CSV ingestion of the journey table.
//!
//! Accepts both the cleaned export (with `Route`, `Hour_AM_PM`, `Day_of_Week`,
//! `Month`, `Is_Delayed`, `Is_Cancelled`, `Reason_for_Delay`) and the raw
//! ticket table, rebuilding the derived columns from their base columns when
//! they are absent.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::{debug, info, warn};

use super::labels::{hour_label, month_label, weekday_label};
use super::source::DataSource;
use super::types::JourneyRecord;
use super::{RecordStore, RecordStoreBuilder};
use crate::error::DataLoadError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

const REQUIRED_COLUMNS: [&str; 7] = [
    "Date of Journey",
    "Departure Station",
    "Arrival Destination",
    "Price",
    "Ticket Type",
    "Ticket Class",
    "Refund Request",
];

#[derive(Debug, Deserialize)]
struct RawJourney {
    #[serde(rename = "Date of Journey")]
    date_of_journey: String,
    #[serde(rename = "Departure Time", default)]
    departure_time: Option<String>,
    #[serde(rename = "Hour_AM_PM", default)]
    hour_am_pm: Option<String>,
    #[serde(rename = "Day_of_Week", default)]
    day_of_week: Option<String>,
    #[serde(rename = "Month", default)]
    month: Option<String>,
    #[serde(rename = "Departure Station", default)]
    departure_station: Option<String>,
    #[serde(rename = "Arrival Destination", default)]
    arrival_destination: Option<String>,
    #[serde(rename = "Route", default)]
    route: Option<String>,
    #[serde(rename = "Price")]
    price: String,
    #[serde(rename = "Is_Delayed", default)]
    is_delayed: Option<String>,
    #[serde(rename = "Is_Cancelled", default)]
    is_cancelled: Option<String>,
    #[serde(rename = "Journey Status", default)]
    journey_status: Option<String>,
    #[serde(rename = "Reason_for_Delay", default)]
    reason_for_delay: Option<String>,
    #[serde(rename = "Reason for Delay", default)]
    raw_reason_for_delay: Option<String>,
    #[serde(rename = "Refund Request", default)]
    refund_request: Option<String>,
    #[serde(rename = "Ticket Type", default)]
    ticket_type: Option<String>,
    #[serde(rename = "Ticket Class", default)]
    ticket_class: Option<String>,
}

/// What the loader did besides producing records.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LoadSummary {
    pub rows: usize,
    /// `Refund Request` values other than `Yes`/`No`, counted as not refunded.
    pub unrecognized_refund_values: usize,
    /// Columns absent from the source and rebuilt from their base columns.
    pub derived_columns: Vec<&'static str>,
}

/// Loads and normalizes the journey table from `source`.
#[tracing::instrument(skip_all, fields(source = %source))]
pub async fn load(source: &DataSource) -> Result<(RecordStore, LoadSummary), DataLoadError> {
    let bytes = source.read_bytes().await?;
    debug!(bytes = bytes.len(), "Dataset bytes read");

    let (store, summary) = load_from_bytes(&bytes)?;
    info!(
        rows = summary.rows,
        unrecognized_refund_values = summary.unrecognized_refund_values,
        derived_columns = ?summary.derived_columns,
        "Dataset loaded"
    );
    Ok((store, summary))
}

/// Parses CSV bytes, transparently decompressing gzip input.
pub fn load_from_bytes(bytes: &[u8]) -> Result<(RecordStore, LoadSummary), DataLoadError> {
    if bytes.starts_with(&GZIP_MAGIC) {
        debug!("Gzip input detected");
        load_from_reader(GzDecoder::new(bytes))
    } else {
        load_from_reader(bytes)
    }
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<(RecordStore, LoadSummary), DataLoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut summary = LoadSummary {
        derived_columns: check_columns(&headers)?,
        ..Default::default()
    };

    let mut builder = RecordStoreBuilder::default();
    for result in rdr.records() {
        let record = result?;
        let row = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(summary.rows + 2);
        let raw: RawJourney = record.deserialize(Some(&headers))?;
        let journey = normalize(raw, row, &mut summary)?;
        builder.push(&journey);
        summary.rows += 1;
    }

    if summary.unrecognized_refund_values > 0 {
        warn!(
            count = summary.unrecognized_refund_values,
            "Unrecognized refund request values treated as not refunded"
        );
    }

    Ok((builder.build(), summary))
}

/// Fails on absent required columns and lists the derived columns that must be rebuilt.
fn check_columns(headers: &csv::StringRecord) -> Result<Vec<&'static str>, DataLoadError> {
    let has = |name: &str| headers.iter().any(|h| h == name);

    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !has(**c))
        .map(|c| c.to_string())
        .collect();

    for flag in ["Is_Delayed", "Is_Cancelled"] {
        if !has(flag) && !has("Journey Status") {
            missing.push(flag.to_string());
        }
    }

    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns(missing));
    }

    let derived = ["Route", "Hour_AM_PM", "Day_of_Week", "Month", "Is_Delayed", "Is_Cancelled"]
        .into_iter()
        .filter(|c| !has(*c))
        .collect();
    Ok(derived)
}

fn normalize(
    raw: RawJourney,
    row: usize,
    summary: &mut LoadSummary,
) -> Result<JourneyRecord, DataLoadError> {
    let journey_date = parse_date(&raw.date_of_journey)
        .ok_or_else(|| invalid(row, "Date of Journey", &raw.date_of_journey))?;

    let price = raw
        .price
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| invalid(row, "Price", &raw.price))?;

    let departure_station = present(raw.departure_station);
    let arrival_station = present(raw.arrival_destination);
    let route = present(raw.route).or_else(|| match (&departure_station, &arrival_station) {
        (Some(from), Some(to)) => Some(format!("{from} - {to}")),
        _ => None,
    });

    let hour_bucket = match (present(raw.hour_am_pm), present(raw.departure_time)) {
        (Some(bucket), _) => Some(bucket),
        (None, Some(time)) => {
            let parsed = parse_time(&time).ok_or_else(|| invalid(row, "Departure Time", &time))?;
            Some(hour_label(parsed))
        }
        (None, None) => None,
    };

    let status = present(raw.journey_status);
    let is_delayed = flag(raw.is_delayed, status.as_deref(), "Delayed", row, "Is_Delayed")?;
    let is_cancelled = flag(raw.is_cancelled, status.as_deref(), "Cancelled", row, "Is_Cancelled")?;

    let refund_requested = match present(raw.refund_request).as_deref() {
        Some("Yes") => true,
        Some("No") => false,
        other => {
            debug!(row, value = ?other, "Refund request value not recognized");
            summary.unrecognized_refund_values += 1;
            false
        }
    };

    Ok(JourneyRecord {
        journey_date,
        hour_bucket,
        day_of_week: present(raw.day_of_week).or_else(|| Some(weekday_label(journey_date).to_string())),
        month: present(raw.month).or_else(|| Some(month_label(journey_date))),
        departure_station,
        arrival_station,
        route,
        price,
        is_delayed,
        is_cancelled,
        delay_reason: present(raw.reason_for_delay).or_else(|| present(raw.raw_reason_for_delay)),
        refund_requested,
        ticket_type: present(raw.ticket_type),
        ticket_class: present(raw.ticket_class),
    })
}

/// Reads an explicit boolean column, falling back to `Journey Status == status_value`.
fn flag(
    explicit: Option<String>,
    status: Option<&str>,
    status_value: &str,
    row: usize,
    column: &'static str,
) -> Result<bool, DataLoadError> {
    match present(explicit) {
        Some(value) => parse_bool(&value).ok_or_else(|| invalid(row, column, &value)),
        None => Ok(status == Some(status_value)),
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn invalid(row: usize, column: &'static str, value: &str) -> DataLoadError {
    DataLoadError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .ok()
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

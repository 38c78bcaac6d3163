//! Record types held by the [`RecordStore`](super::RecordStore).

use chrono::NaiveDate;
use serde::Serialize;

use super::dictionary::CategoryCode;

/// Categorical columns of a journey, each backed by its own dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    HourBucket,
    DayOfWeek,
    Month,
    DepartureStation,
    ArrivalStation,
    Route,
    DelayReason,
    TicketType,
    TicketClass,
}

impl Dimension {
    pub const COUNT: usize = 9;

    pub const ALL: [Dimension; Dimension::COUNT] = [
        Dimension::HourBucket,
        Dimension::DayOfWeek,
        Dimension::Month,
        Dimension::DepartureStation,
        Dimension::ArrivalStation,
        Dimension::Route,
        Dimension::DelayReason,
        Dimension::TicketType,
        Dimension::TicketClass,
    ];

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HourBucket => write!(f, "hour"),
            Self::DayOfWeek => write!(f, "day of week"),
            Self::Month => write!(f, "month"),
            Self::DepartureStation => write!(f, "departure station"),
            Self::ArrivalStation => write!(f, "arrival station"),
            Self::Route => write!(f, "route"),
            Self::DelayReason => write!(f, "delay reason"),
            Self::TicketType => write!(f, "ticket type"),
            Self::TicketClass => write!(f, "ticket class"),
        }
    }
}

/// A normalized journey with plain labels, before interning into a store.
///
/// Missing categorical values are `None`; empty strings never reach here.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyRecord {
    pub journey_date: NaiveDate,
    pub hour_bucket: Option<String>,
    pub day_of_week: Option<String>,
    pub month: Option<String>,
    pub departure_station: Option<String>,
    pub arrival_station: Option<String>,
    pub route: Option<String>,
    pub price: f64,
    pub is_delayed: bool,
    pub is_cancelled: bool,
    pub delay_reason: Option<String>,
    pub refund_requested: bool,
    pub ticket_type: Option<String>,
    pub ticket_class: Option<String>,
}

impl JourneyRecord {
    /// A journey on `journey_date` with no categorical values, zero price and no flags set.
    pub fn new(journey_date: NaiveDate) -> Self {
        Self {
            journey_date,
            hour_bucket: None,
            day_of_week: None,
            month: None,
            departure_station: None,
            arrival_station: None,
            route: None,
            price: 0.0,
            is_delayed: false,
            is_cancelled: false,
            delay_reason: None,
            refund_requested: false,
            ticket_type: None,
            ticket_class: None,
        }
    }

    pub(crate) fn label(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::HourBucket => self.hour_bucket.as_deref(),
            Dimension::DayOfWeek => self.day_of_week.as_deref(),
            Dimension::Month => self.month.as_deref(),
            Dimension::DepartureStation => self.departure_station.as_deref(),
            Dimension::ArrivalStation => self.arrival_station.as_deref(),
            Dimension::Route => self.route.as_deref(),
            Dimension::DelayReason => self.delay_reason.as_deref(),
            Dimension::TicketType => self.ticket_type.as_deref(),
            Dimension::TicketClass => self.ticket_class.as_deref(),
        }
    }
}

/// An interned journey row as stored in a [`RecordStore`](super::RecordStore).
#[derive(Debug, Clone, PartialEq)]
pub struct Journey {
    pub journey_date: NaiveDate,
    pub price: f64,
    pub is_delayed: bool,
    pub is_cancelled: bool,
    pub refund_requested: bool,
    pub(crate) codes: [Option<CategoryCode>; Dimension::COUNT],
}

impl Journey {
    /// The interned value of a categorical column, `None` when missing.
    pub fn code(&self, dimension: Dimension) -> Option<CategoryCode> {
        self.codes[dimension.slot()]
    }
}

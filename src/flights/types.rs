use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Date format used on the wire and in form input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day format used for departure and arrival.
pub const TIME_FORMAT: &str = "%H:%M";

/// Longest searchable date range, inclusive of both ends.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Haul category derived from the searched cities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    ShortHaul,
    MediumHaul,
    LongHaul,
}

impl RouteType {
    /// Inclusive base fare range in whole currency units.
    pub fn base_fare_range(self) -> (u32, u32) {
        match self {
            RouteType::ShortHaul => (150, 400),
            RouteType::MediumHaul => (300, 700),
            RouteType::LongHaul => (500, 1200),
        }
    }

    /// Inclusive range of whole flight hours.
    pub fn duration_hours_range(self) -> (u32, u32) {
        match self {
            RouteType::ShortHaul => (1, 3),
            RouteType::MediumHaul => (3, 6),
            RouteType::LongHaul => (6, 15),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouteType::ShortHaul => "short_haul",
            RouteType::MediumHaul => "medium_haul",
            RouteType::LongHaul => "long_haul",
        }
    }
}

/// One synthesized flight observation.
///
/// Field declaration order is the column order of CSV exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub date: NaiveDate,
    pub airline: String,
    pub flight_number: String,
    pub aircraft: String,
    #[serde(with = "hhmm")]
    pub departure_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub arrival_time: NaiveTime,
    pub duration_minutes: u32,
    pub price: u32,
    pub route: String,
    #[serde(rename = "from_city")]
    pub origin: String,
    #[serde(rename = "to_city")]
    pub destination: String,
    #[serde(with = "weekday_serde")]
    pub day_of_week: Weekday,
    pub route_type: RouteType,
}

impl FlightRecord {
    /// Route label in the `origin → destination` form shown in charts.
    pub fn route_label(origin: &str, destination: &str) -> String {
        format!("{} → {}", origin, destination)
    }

    /// Human readable duration, e.g. `2h 15m`.
    pub fn duration_display(&self) -> String {
        format!("{}h {}m", self.duration_minutes / 60, self.duration_minutes % 60)
    }
}

/// User-supplied search parameters, validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    pub origin: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Raw search form as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub from_city: String,
    #[serde(default)]
    pub to_city: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

impl SearchCriteria {
    /// Validate already-typed criteria.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let origin = origin.into().trim().to_string();
        let destination = destination.into().trim().to_string();

        if origin.is_empty() {
            return Err(ValidationError::MissingField {
                field: "from_city".to_string(),
            });
        }
        if destination.is_empty() {
            return Err(ValidationError::MissingField {
                field: "to_city".to_string(),
            });
        }
        if start_date > end_date {
            return Err(ValidationError::InvertedRange {
                start: start_date.format(DATE_FORMAT).to_string(),
                end: end_date.format(DATE_FORMAT).to_string(),
            });
        }

        let days = (end_date - start_date).num_days() + 1;
        if days > MAX_RANGE_DAYS {
            return Err(ValidationError::RangeTooLong {
                days,
                max_days: MAX_RANGE_DAYS,
            });
        }

        Ok(Self {
            origin,
            destination,
            start_date,
            end_date,
        })
    }

    /// Number of calendar days covered, inclusive of both ends.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Every calendar day in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start_date
            .iter_days()
            .take(self.day_count().max(0) as usize)
    }
}

impl TryFrom<SearchForm> for SearchCriteria {
    type Error = ValidationError;

    fn try_from(form: SearchForm) -> Result<Self, Self::Error> {
        // Every field must be present before any of them is parsed.
        for (field, value) in [
            ("from_city", &form.from_city),
            ("to_city", &form.to_city),
            ("start_date", &form.start_date),
            ("end_date", &form.end_date),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField {
                    field: field.to_string(),
                });
            }
        }

        let start_date = parse_date("start_date", &form.start_date)?;
        let end_date = parse_date("end_date", &form.end_date)?;

        SearchCriteria::new(form.from_city, form.to_city, start_date, end_date)
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            field: field.to_string(),
            value: value.to_string(),
        }
    })
}

/// English name for a weekday, as used in charts and insight text.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

mod hhmm {
    use super::*;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

mod weekday_serde {
    use super::*;

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(super::weekday_name(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Weekday>().map_err(|_| {
            serde::de::Error::custom(format!("unknown weekday '{}'", raw))
        })
    }
}

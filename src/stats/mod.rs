//! Summary statistics over a flight record collection.
//!
//! [`summarize`] is a pure function: the same records in any order produce
//! the same [`StatisticsSummary`]. Prices are summed as integers so averages
//! do not depend on iteration order.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::flights::{weekday_name, FlightRecord};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A single day's headline price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPrice {
    pub date: NaiveDate,
    pub price: u32,
}

/// Average fare for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayAverage {
    pub weekday: String,
    pub average_price: f64,
    pub flights: usize,
}

/// Number of flights on a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCount {
    pub route: String,
    pub flights: usize,
}

/// Number of flights operated by an airline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineCount {
    pub airline: String,
    pub flights: usize,
}

/// One point of the chronological price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPrice {
    pub date: NaiveDate,
    pub min_price: u32,
    pub average_price: f64,
    pub max_price: u32,
    pub flights: usize,
}

/// First and last flight date covered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Derived, read-only view over a flight record collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub total_flights: usize,
    pub average_price: f64,
    pub min_price: Option<u32>,
    pub max_price: Option<u32>,
    /// Date of the cheapest record; ties go to the earliest date.
    pub cheapest_day: Option<DayPrice>,
    /// Date of the most expensive record; ties go to the earliest date.
    pub most_expensive_day: Option<DayPrice>,
    pub cheapest_weekday: Option<WeekdayAverage>,
    pub most_expensive_weekday: Option<WeekdayAverage>,
    /// Sorted by descending count, then route name.
    pub route_counts: Vec<RouteCount>,
    /// Sorted by descending count, then airline name.
    pub airline_counts: Vec<AirlineCount>,
    /// Monday through Sunday, only weekdays that have flights.
    pub weekday_averages: Vec<WeekdayAverage>,
    pub price_series: Vec<DailyPrice>,
    pub date_range: Option<DateRange>,
}

impl StatisticsSummary {
    /// Whether the summary was computed over an empty collection.
    pub fn is_empty(&self) -> bool {
        self.total_flights == 0
    }

    /// Up to `n` most frequent routes.
    pub fn top_routes(&self, n: usize) -> Vec<String> {
        self.route_counts
            .iter()
            .take(n)
            .map(|r| r.route.clone())
            .collect()
    }
}

/// Compute the statistics summary for a record collection.
pub fn summarize(records: &[FlightRecord]) -> StatisticsSummary {
    if records.is_empty() {
        return StatisticsSummary::default();
    }

    let total_price: u64 = records.iter().map(|r| u64::from(r.price)).sum();
    let total_flights = records.len();

    let cheapest_day = records
        .iter()
        .min_by_key(|r| (r.price, r.date))
        .map(|r| DayPrice {
            date: r.date,
            price: r.price,
        });
    let most_expensive_day = records
        .iter()
        .min_by_key(|r| (std::cmp::Reverse(r.price), r.date))
        .map(|r| DayPrice {
            date: r.date,
            price: r.price,
        });

    let weekday_averages = weekday_averages(records);
    let cheapest_weekday = pick_weekday(&weekday_averages, |candidate, best| candidate < best);
    let most_expensive_weekday =
        pick_weekday(&weekday_averages, |candidate, best| candidate > best);

    let price_series = price_series(records);
    let date_range = match (price_series.first(), price_series.last()) {
        (Some(first), Some(last)) => Some(DateRange {
            start: first.date,
            end: last.date,
        }),
        _ => None,
    };

    StatisticsSummary {
        total_flights,
        average_price: total_price as f64 / total_flights as f64,
        min_price: cheapest_day.as_ref().map(|d| d.price),
        max_price: most_expensive_day.as_ref().map(|d| d.price),
        cheapest_day,
        most_expensive_day,
        cheapest_weekday,
        most_expensive_weekday,
        route_counts: ranked_counts(records.iter().map(|r| r.route.as_str()))
            .into_iter()
            .map(|(route, flights)| RouteCount { route, flights })
            .collect(),
        airline_counts: ranked_counts(records.iter().map(|r| r.airline.as_str()))
            .into_iter()
            .map(|(airline, flights)| AirlineCount { airline, flights })
            .collect(),
        weekday_averages,
        price_series,
        date_range,
    }
}

/// Round to two decimal places for display and key statistics.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn weekday_averages(records: &[FlightRecord]) -> Vec<WeekdayAverage> {
    let mut totals: HashMap<Weekday, (u64, usize)> = HashMap::new();
    for record in records {
        let entry = totals.entry(record.day_of_week).or_insert((0, 0));
        entry.0 += u64::from(record.price);
        entry.1 += 1;
    }

    WEEK.iter()
        .filter_map(|day| {
            totals.get(day).map(|(sum, count)| WeekdayAverage {
                weekday: weekday_name(*day).to_string(),
                average_price: *sum as f64 / *count as f64,
                flights: *count,
            })
        })
        .collect()
}

// Ties keep the earlier weekday since only a strict improvement replaces it.
fn pick_weekday<F>(averages: &[WeekdayAverage], better: F) -> Option<WeekdayAverage>
where
    F: Fn(f64, f64) -> bool,
{
    let mut best: Option<&WeekdayAverage> = None;
    for candidate in averages {
        match best {
            Some(current) if !better(candidate.average_price, current.average_price) => {}
            _ => best = Some(candidate),
        }
    }
    best.cloned()
}

fn price_series(records: &[FlightRecord]) -> Vec<DailyPrice> {
    let mut by_date: BTreeMap<NaiveDate, (u32, u32, u64, usize)> = BTreeMap::new();
    for record in records {
        let entry = by_date
            .entry(record.date)
            .or_insert((u32::MAX, 0, 0, 0));
        entry.0 = entry.0.min(record.price);
        entry.1 = entry.1.max(record.price);
        entry.2 += u64::from(record.price);
        entry.3 += 1;
    }

    by_date
        .into_iter()
        .map(|(date, (min, max, sum, count))| DailyPrice {
            date,
            min_price: min,
            average_price: sum as f64 / count as f64,
            max_price: max,
            flights: count,
        })
        .collect()
}

fn ranked_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    // Stable sort keeps the alphabetical order from the BTreeMap within ties.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

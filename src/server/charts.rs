//! Plotly figure specifications for the dashboard charts.

use serde::Serialize;
use serde_json::{json, Value};

use crate::flights::{FlightRecord, DATE_FORMAT};
use crate::stats::{round2, StatisticsSummary};

const WEEK_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Routes shown on the popular-routes chart.
pub const TOP_ROUTES: usize = 10;

/// The three dashboard figures.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpecs {
    pub price_trend: Value,
    pub popular_routes: Value,
    pub demand_by_day: Value,
}

/// Build every chart for a record set and its summary.
pub fn build_charts(records: &[FlightRecord], summary: &StatisticsSummary) -> ChartSpecs {
    ChartSpecs {
        price_trend: price_trend(records),
        popular_routes: popular_routes(summary),
        demand_by_day: demand_by_day(summary),
    }
}

fn layout(title: &str, x_title: &str, y_title: &str) -> Value {
    json!({
        "title": title,
        "xaxis": {"title": x_title},
        "yaxis": {"title": y_title},
        "template": "plotly_dark",
        "height": 400,
    })
}

fn price_trend(records: &[FlightRecord]) -> Value {
    let mut points: Vec<(String, u32)> = records
        .iter()
        .map(|r| (r.date.format(DATE_FORMAT).to_string(), r.price))
        .collect();
    points.sort();
    let (x, y): (Vec<String>, Vec<u32>) = points.into_iter().unzip();

    json!({
        "data": [{
            "type": "scatter",
            "mode": "lines+markers",
            "name": "Price Trend",
            "x": x,
            "y": y,
            "line": {"color": "#007bff", "width": 3},
            "marker": {"size": 8},
        }],
        "layout": layout("Flight Price Trend Over Time", "Date", "Price ($)"),
    })
}

fn popular_routes(summary: &StatisticsSummary) -> Value {
    let top = summary.route_counts.iter().take(TOP_ROUTES);
    let (x, y): (Vec<String>, Vec<usize>) = top.map(|r| (r.route.clone(), r.flights)).unzip();

    let mut layout = layout("Most Popular Routes", "Route", "Number of Flights");
    layout["xaxis"]["tickangle"] = json!(-45);

    json!({
        "data": [{
            "type": "bar",
            "x": x,
            "y": y,
            "marker": {"color": "#28a745"},
        }],
        "layout": layout,
    })
}

fn demand_by_day(summary: &StatisticsSummary) -> Value {
    // Every weekday keeps its slot; days without flights plot as gaps.
    let y: Vec<Option<f64>> = WEEK_NAMES
        .iter()
        .map(|day| {
            summary
                .weekday_averages
                .iter()
                .find(|w| w.weekday == *day)
                .map(|w| round2(w.average_price))
        })
        .collect();

    json!({
        "data": [{
            "type": "bar",
            "x": WEEK_NAMES,
            "y": y,
            "marker": {"color": "#ffc107"},
        }],
        "layout": layout("Average Price by Day of Week", "Day of Week", "Average Price ($)"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flights::{FlightSynthesizer, SearchCriteria};
    use crate::stats::summarize;
    use chrono::NaiveDate;

    fn sample() -> (Vec<FlightRecord>, StatisticsSummary) {
        let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let criteria =
            SearchCriteria::new("Boston", "Denver", date("2024-05-01"), date("2024-05-03"))
                .unwrap();
        let records = FlightSynthesizer::seeded(4).generate(&criteria, date("2024-04-01"));
        let summary = summarize(&records);
        (records, summary)
    }

    #[test]
    fn test_price_trend_has_one_point_per_record() {
        let (records, summary) = sample();
        let charts = build_charts(&records, &summary);
        let trace = &charts.price_trend["data"][0];
        assert_eq!(trace["x"].as_array().unwrap().len(), records.len());
        assert_eq!(trace["mode"], "lines+markers");
        assert_eq!(charts.price_trend["layout"]["height"], 400);
    }

    #[test]
    fn test_demand_by_day_keeps_all_weekdays() {
        let (records, summary) = sample();
        let charts = build_charts(&records, &summary);
        let trace = &charts.demand_by_day["data"][0];
        assert_eq!(trace["x"].as_array().unwrap().len(), 7);
        // 2024-05-01..03 is Wednesday to Friday.
        assert!(trace["y"][0].is_null());
        assert!(trace["y"][2].is_number());
        assert!(trace["y"][5].is_null());
    }

    #[test]
    fn test_popular_routes_chart() {
        let (records, summary) = sample();
        let charts = build_charts(&records, &summary);
        let trace = &charts.popular_routes["data"][0];
        assert_eq!(trace["x"][0], "Boston → Denver");
        assert_eq!(trace["y"][0], records.len());
        assert_eq!(charts.popular_routes["layout"]["xaxis"]["tickangle"], -45);
    }
}

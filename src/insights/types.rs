use serde::{Deserialize, Serialize};

use crate::stats::{round2, StatisticsSummary};

/// Headline numbers quoted alongside the insight text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyStatistics {
    pub avg_price: f64,
    /// Weekday name with the lowest average fare.
    pub cheapest_day: String,
    /// Weekday name with the highest average fare.
    pub most_expensive_day: String,
    pub total_flights: usize,
}

/// Natural-language summary and recommendations for a flight search.
///
/// AI-derived and fallback results share this exact shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightResult {
    pub popular_routes: Vec<String>,
    pub price_insights: String,
    pub demand_patterns: String,
    pub recommendations: Vec<String>,
    pub key_statistics: KeyStatistics,
}

/// Where an [`InsightResult`] came from.
///
/// Callers that only render insights use [`InsightOutcome::into_result`];
/// the distinction exists for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub enum InsightOutcome {
    /// Parsed from the AI service response.
    Generated(InsightResult),
    /// Static text computed locally.
    Fallback(InsightResult),
}

impl InsightOutcome {
    /// Collapse to the shared result shape.
    pub fn into_result(self) -> InsightResult {
        match self {
            InsightOutcome::Generated(result) | InsightOutcome::Fallback(result) => result,
        }
    }

    pub fn result(&self) -> &InsightResult {
        match self {
            InsightOutcome::Generated(result) | InsightOutcome::Fallback(result) => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, InsightOutcome::Fallback(_))
    }
}

impl KeyStatistics {
    /// Key statistics taken from a summary.
    pub fn from_summary(summary: &StatisticsSummary) -> Self {
        Self {
            avg_price: round2(summary.average_price),
            cheapest_day: summary
                .cheapest_weekday
                .as_ref()
                .map(|w| w.weekday.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            most_expensive_day: summary
                .most_expensive_weekday
                .as_ref()
                .map(|w| w.weekday.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            total_flights: summary.total_flights,
        }
    }
}

/// Insight payload as returned by the model; every field is optional so
/// partial answers can be completed from the fallback.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PartialInsights {
    #[serde(default)]
    pub popular_routes: Option<Vec<String>>,
    #[serde(default)]
    pub price_insights: Option<String>,
    #[serde(default)]
    pub demand_patterns: Option<String>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
    #[serde(default)]
    pub key_statistics: Option<PartialKeyStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PartialKeyStatistics {
    #[serde(default)]
    pub avg_price: Option<f64>,
    #[serde(default)]
    pub cheapest_day: Option<String>,
    #[serde(default)]
    pub most_expensive_day: Option<String>,
    #[serde(default)]
    pub total_flights: Option<f64>,
}

impl PartialInsights {
    /// Fill missing or blank fields from `base`.
    pub fn complete_with(self, base: InsightResult) -> InsightResult {
        let key = self.key_statistics.unwrap_or_default();

        InsightResult {
            popular_routes: non_empty_list(self.popular_routes).unwrap_or(base.popular_routes),
            price_insights: non_blank(self.price_insights).unwrap_or(base.price_insights),
            demand_patterns: non_blank(self.demand_patterns).unwrap_or(base.demand_patterns),
            recommendations: non_empty_list(self.recommendations)
                .unwrap_or(base.recommendations),
            key_statistics: KeyStatistics {
                avg_price: key
                    .avg_price
                    .filter(|p| p.is_finite())
                    .unwrap_or(base.key_statistics.avg_price),
                cheapest_day: non_blank(key.cheapest_day)
                    .unwrap_or(base.key_statistics.cheapest_day),
                most_expensive_day: non_blank(key.most_expensive_day)
                    .unwrap_or(base.key_statistics.most_expensive_day),
                total_flights: key
                    .total_flights
                    .filter(|n| n.is_finite() && *n >= 0.0)
                    .map(|n| n as usize)
                    .unwrap_or(base.key_statistics.total_flights),
            },
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn non_empty_list(value: Option<Vec<String>>) -> Option<Vec<String>> {
    value
        .map(|items| {
            items
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|items| !items.is_empty())
}

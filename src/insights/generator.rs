use serde_json::{json, Map, Value};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::fallback::fallback_insights;
use super::types::{InsightOutcome, InsightResult, PartialInsights};
use crate::config::Config;
use crate::error::{OpenAiError, OpenAiResult};
use crate::openai::{ChatCompletionRequest, Message, OpenAiClient};
use crate::prompts::{ANALYSIS_REQUEST_PREFIX, FLIGHT_ANALYST_PROMPT};
use crate::stats::{round2, StatisticsSummary};

const TOP_N: usize = 5;

/// Sampling temperature for analysis requests.
pub const INSIGHT_TEMPERATURE: f64 = 0.7;

/// Completion cap; a full insight object fits well inside it.
pub const INSIGHT_MAX_TOKENS: u32 = 1000;

/// Produces insights from statistics, via OpenAI when configured.
///
/// Every failure on the AI path collapses into the static fallback, so
/// callers always receive a complete [`InsightResult`].
#[derive(Debug, Clone)]
pub struct InsightGenerator {
    client: Option<OpenAiClient>,
    model: String,
}

impl InsightGenerator {
    /// Create a generator from configuration
    pub fn new(config: &Config) -> Self {
        let client = match OpenAiClient::new(&config.openai, config.request.clone()) {
            Ok(client) => {
                info!(base_url = %client.base_url(), model = %config.openai.model, "OpenAI insights enabled");
                Some(client)
            }
            Err(OpenAiError::MissingCredentials) => {
                warn!("OPENAI_API_KEY not set, insights will use static fallback");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to build OpenAI client, insights will use static fallback");
                None
            }
        };

        Self {
            client,
            model: config.openai.model.clone(),
        }
    }

    /// Create a generator that never calls the AI service
    pub fn fallback_only() -> Self {
        Self {
            client: None,
            model: String::new(),
        }
    }

    /// Whether an AI client is configured
    pub fn is_ai_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Generate insights for a statistics summary.
    pub async fn generate(&self, summary: &StatisticsSummary) -> InsightOutcome {
        let Some(client) = &self.client else {
            debug!("No OpenAI client configured, using fallback insights");
            return InsightOutcome::Fallback(fallback_insights(summary));
        };

        if summary.is_empty() {
            return InsightOutcome::Fallback(fallback_insights(summary));
        }

        let start = Instant::now();
        match self.request_insights(client, summary).await {
            Ok(result) => {
                info!(
                    latency_ms = start.elapsed().as_millis(),
                    total_flights = summary.total_flights,
                    "Generated AI insights"
                );
                InsightOutcome::Generated(result)
            }
            Err(e) => {
                warn!(error = %e, "AI insights unavailable, using fallback");
                InsightOutcome::Fallback(fallback_insights(summary))
            }
        }
    }

    async fn request_insights(
        &self,
        client: &OpenAiClient,
        summary: &StatisticsSummary,
    ) -> OpenAiResult<InsightResult> {
        let request = ChatCompletionRequest::new(&self.model, build_messages(summary))
            .with_json_output()
            .with_temperature(INSIGHT_TEMPERATURE)
            .with_max_tokens(INSIGHT_MAX_TOKENS);

        let response = client.chat_completion(&request).await?;
        let content = response
            .first_content()
            .ok_or_else(|| OpenAiError::InvalidResponse {
                message: "Completion has no message content".to_string(),
            })?;

        parse_insights(content, summary)
    }
}

/// Build the system and user messages for an analysis request.
pub fn build_messages(summary: &StatisticsSummary) -> Vec<Message> {
    let data = analysis_summary(summary);
    let rendered = serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());

    vec![
        Message::system(FLIGHT_ANALYST_PROMPT),
        Message::user(format!("{} {}", ANALYSIS_REQUEST_PREFIX, rendered)),
    ]
}

/// Compact view of the statistics embedded in the prompt.
pub fn analysis_summary(summary: &StatisticsSummary) -> Value {
    let counts = |pairs: Vec<(String, usize)>| -> Map<String, Value> {
        pairs
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect()
    };

    let popular_routes = counts(
        summary
            .route_counts
            .iter()
            .take(TOP_N)
            .map(|r| (r.route.clone(), r.flights))
            .collect(),
    );
    let top_airlines = counts(
        summary
            .airline_counts
            .iter()
            .take(TOP_N)
            .map(|a| (a.airline.clone(), a.flights))
            .collect(),
    );
    let flights_by_day = counts(
        summary
            .weekday_averages
            .iter()
            .map(|w| (w.weekday.clone(), w.flights))
            .collect(),
    );
    let avg_price_by_day: Map<String, Value> = summary
        .weekday_averages
        .iter()
        .map(|w| (w.weekday.clone(), json!(round2(w.average_price))))
        .collect();

    json!({
        "total_flights": summary.total_flights,
        "price_range": {
            "min": summary.min_price,
            "max": summary.max_price,
            "avg": round2(summary.average_price),
        },
        "most_popular_routes": popular_routes,
        "flights_by_day": flights_by_day,
        "avg_price_by_day": avg_price_by_day,
        "top_airlines": top_airlines,
        "date_range": summary.date_range.as_ref().map(|r| json!({
            "start": r.start.to_string(),
            "end": r.end.to_string(),
        })),
    })
}

/// Parse a model completion into a complete insight result.
pub fn parse_insights(content: &str, summary: &StatisticsSummary) -> OpenAiResult<InsightResult> {
    let json = extract_json_from_completion(content)
        .map_err(|message| OpenAiError::InvalidResponse { message })?;

    let partial: PartialInsights =
        serde_json::from_str(json).map_err(|e| OpenAiError::InvalidResponse {
            message: format!("Insight JSON did not match the expected shape: {}", e),
        })?;

    Ok(partial.complete_with(fallback_insights(summary)))
}

/// Extract JSON from a completion string, handling markdown code blocks.
fn extract_json_from_completion(completion: &str) -> Result<&str, String> {
    let trimmed = completion.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed);
    }

    if completion.contains("```json") {
        return completion
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "Found ```json block but content was empty or malformed".to_string());
    }

    if completion.contains("```") {
        return completion
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "Found ``` block but content was empty or malformed".to_string());
    }

    Err(format!(
        "No JSON found in response. First 100 chars: '{}'",
        completion.chars().take(100).collect::<String>()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flights::{FlightSynthesizer, SearchCriteria};
    use crate::stats::summarize;
    use chrono::NaiveDate;

    fn sample_summary() -> StatisticsSummary {
        let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let criteria =
            SearchCriteria::new("Boston", "Denver", date("2024-05-01"), date("2024-05-14"))
                .unwrap();
        summarize(&FlightSynthesizer::seeded(3).generate(&criteria, date("2024-04-01")))
    }

    #[test]
    fn test_extract_json_variants() {
        assert_eq!(extract_json_from_completion(" {\"a\":1} "), Ok("{\"a\":1}"));
        assert_eq!(
            extract_json_from_completion("Here:\n```json\n{\"a\":1}\n```"),
            Ok("{\"a\":1}")
        );
        assert_eq!(
            extract_json_from_completion("```\n{\"a\":1}\n```"),
            Ok("{\"a\":1}")
        );
        assert!(extract_json_from_completion("no json here").is_err());
    }

    #[test]
    fn test_parse_complete_payload() {
        let summary = sample_summary();
        let content = r#"{
            "popular_routes": ["Boston → Denver"],
            "price_insights": "Fares are stable.",
            "demand_patterns": "Demand peaks on Fridays.",
            "recommendations": ["Fly Tuesday"],
            "key_statistics": {
                "avg_price": 321.5,
                "cheapest_day": "Tuesday",
                "most_expensive_day": "Sunday",
                "total_flights": 60
            }
        }"#;

        let result = parse_insights(content, &summary).unwrap();
        assert_eq!(result.price_insights, "Fares are stable.");
        assert_eq!(result.recommendations, vec!["Fly Tuesday".to_string()]);
        assert_eq!(result.key_statistics.avg_price, 321.5);
        assert_eq!(result.key_statistics.total_flights, 60);
    }

    #[test]
    fn test_parse_partial_payload_is_completed() {
        let summary = sample_summary();
        let fallback = fallback_insights(&summary);

        let result = parse_insights(
            r#"{"price_insights": "Only this.", "recommendations": []}"#,
            &summary,
        )
        .unwrap();

        assert_eq!(result.price_insights, "Only this.");
        assert_eq!(result.demand_patterns, fallback.demand_patterns);
        assert_eq!(result.recommendations, fallback.recommendations);
        assert_eq!(result.key_statistics, fallback.key_statistics);
        assert_eq!(result.popular_routes, fallback.popular_routes);
    }

    #[test]
    fn test_parse_wrong_shape_is_error() {
        let summary = sample_summary();
        let err = parse_insights(r#"{"recommendations": "not a list"}"#, &summary).unwrap_err();
        assert!(matches!(err, OpenAiError::InvalidResponse { .. }));
    }

    #[test]
    fn test_build_messages_embeds_summary() {
        let summary = sample_summary();
        let messages = build_messages(&summary);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, FLIGHT_ANALYST_PROMPT);
        assert!(messages[1].content.starts_with(ANALYSIS_REQUEST_PREFIX));
        assert!(messages[1]
            .content
            .contains(&format!("\"total_flights\": {}", summary.total_flights)));
        assert!(messages[1].content.contains("Boston → Denver"));
    }

    #[test]
    fn test_analysis_summary_limits_top_lists() {
        let summary = sample_summary();
        let data = analysis_summary(&summary);
        assert!(data["top_airlines"].as_object().unwrap().len() <= TOP_N);
        assert_eq!(data["date_range"]["start"], "2024-05-01");
        assert_eq!(data["date_range"]["end"], "2024-05-14");
    }

    #[tokio::test]
    async fn test_fallback_only_generator() {
        let generator = InsightGenerator::fallback_only();
        assert!(!generator.is_ai_enabled());

        let summary = sample_summary();
        let outcome = generator.generate(&summary).await;
        assert!(outcome.is_fallback());
        assert_eq!(outcome.into_result(), fallback_insights(&summary));
    }

    #[test]
    fn test_generator_without_key_is_fallback_only() {
        let generator = InsightGenerator::new(&Config::default());
        assert!(!generator.is_ai_enabled());
    }
}

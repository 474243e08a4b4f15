use super::types::{InsightResult, KeyStatistics};
use crate::stats::StatisticsSummary;

/// Deterministic insights computed without the AI service.
pub fn fallback_insights(summary: &StatisticsSummary) -> InsightResult {
    let (Some(cheapest), Some(priciest)) = (
        summary.cheapest_weekday.as_ref(),
        summary.most_expensive_weekday.as_ref(),
    ) else {
        return empty_insights();
    };

    let price_insights = format!(
        "Average flight price is ${:.2}. Prices range from ${} to ${}. \
         The cheapest flights are typically found on {}s (${:.2} avg), \
         while {}s tend to be most expensive (${:.2} avg).",
        summary.average_price,
        summary.min_price.unwrap_or_default(),
        summary.max_price.unwrap_or_default(),
        cheapest.weekday,
        cheapest.average_price,
        priciest.weekday,
        priciest.average_price,
    );

    let demand_patterns = format!(
        "Analysis of {} flights shows varying demand patterns throughout the week. {}",
        summary.total_flights,
        weekend_comparison(summary)
    );

    InsightResult {
        popular_routes: summary.top_routes(3),
        price_insights,
        demand_patterns,
        recommendations: vec![
            format!("Consider flying on {}s for the best prices", cheapest.weekday),
            format!("Avoid {}s if looking for budget options", priciest.weekday),
            "Book in advance for better pricing options".to_string(),
            "Compare different airlines for the same route".to_string(),
        ],
        key_statistics: KeyStatistics::from_summary(summary),
    }
}

/// Compare flight-weighted weekend and weekday fares.
fn weekend_comparison(summary: &StatisticsSummary) -> String {
    let (mut weekend, mut weekday) = ((0.0, 0usize), (0.0, 0usize));
    for day in &summary.weekday_averages {
        let group = if is_weekend(&day.weekday) { &mut weekend } else { &mut weekday };
        group.0 += day.average_price * day.flights as f64;
        group.1 += day.flights;
    }

    if weekend.1 == 0 || weekday.1 == 0 {
        return "This period does not cover both weekdays and weekends, so they cannot be compared."
            .to_string();
    }

    let weekend_avg = weekend.0 / weekend.1 as f64;
    let weekday_avg = weekday.0 / weekday.1 as f64;
    let averages = format!("(${:.2} vs ${:.2} avg)", weekend_avg, weekday_avg);
    if (weekend_avg - weekday_avg).abs() < 0.005 {
        format!("Weekend and weekday fares are about the same in this period {}.", averages)
    } else if weekend_avg > weekday_avg {
        format!("Weekend flights generally carry higher fares than weekday flights in this period {}.", averages)
    } else {
        format!("Weekday flights generally carry higher fares than weekend flights in this period {}.", averages)
    }
}

fn is_weekend(weekday: &str) -> bool {
    matches!(weekday, "Saturday" | "Sunday")
}

fn empty_insights() -> InsightResult {
    InsightResult {
        popular_routes: Vec::new(),
        price_insights: "No flight data available for analysis.".to_string(),
        demand_patterns: "Unable to analyze demand patterns without data.".to_string(),
        recommendations: vec!["Please try a different search criteria.".to_string()],
        key_statistics: KeyStatistics {
            avg_price: 0.0,
            cheapest_day: "Unknown".to_string(),
            most_expensive_day: "Unknown".to_string(),
            total_flights: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::WeekdayAverage;

    fn day(weekday: &str, average_price: f64, flights: usize) -> WeekdayAverage {
        WeekdayAverage {
            weekday: weekday.to_string(),
            average_price,
            flights,
        }
    }

    fn summary_with(weekday_averages: Vec<WeekdayAverage>) -> StatisticsSummary {
        let cheapest = weekday_averages
            .iter()
            .min_by(|a, b| a.average_price.total_cmp(&b.average_price))
            .cloned();
        let priciest = weekday_averages
            .iter()
            .max_by(|a, b| a.average_price.total_cmp(&b.average_price))
            .cloned();
        StatisticsSummary {
            total_flights: weekday_averages.iter().map(|d| d.flights).sum(),
            cheapest_weekday: cheapest,
            most_expensive_weekday: priciest,
            weekday_averages,
            ..StatisticsSummary::default()
        }
    }

    #[test]
    fn test_weekend_premium_uses_group_averages() {
        // Sunday is the cheapest single day, yet weekends cost more overall.
        let summary = summary_with(vec![
            day("Monday", 200.0, 5),
            day("Tuesday", 210.0, 5),
            day("Saturday", 400.0, 5),
            day("Sunday", 150.0, 5),
        ]);
        assert_eq!(summary.cheapest_weekday.as_ref().unwrap().weekday, "Sunday");

        let result = fallback_insights(&summary);
        assert!(result.demand_patterns.contains(
            "Weekend flights generally carry higher fares than weekday flights in this period ($275.00 vs $205.00 avg)."
        ));
    }

    #[test]
    fn test_weekday_premium_is_weighted_by_flights() {
        // Unweighted the weekday mean would be 300; weighted it is 420.
        let summary = summary_with(vec![
            day("Monday", 500.0, 8),
            day("Wednesday", 100.0, 2),
            day("Saturday", 320.0, 4),
        ]);

        let result = fallback_insights(&summary);
        assert!(result.demand_patterns.contains(
            "Weekday flights generally carry higher fares than weekend flights in this period ($320.00 vs $420.00 avg)."
        ));
    }

    #[test]
    fn test_single_group_is_not_compared() {
        let summary = summary_with(vec![day("Tuesday", 180.0, 4), day("Wednesday", 190.0, 4)]);
        let result = fallback_insights(&summary);
        assert!(result
            .demand_patterns
            .ends_with("This period does not cover both weekdays and weekends, so they cannot be compared."));
    }

    #[test]
    fn test_equal_groups() {
        let summary = summary_with(vec![day("Friday", 250.0, 3), day("Sunday", 250.0, 3)]);
        let result = fallback_insights(&summary);
        assert!(result.demand_patterns.contains("Weekend and weekday fares are about the same"));
    }
}

//! HTML rendering for the search form and dashboard pages.

use std::fmt::Write;

use serde::Serialize;

use super::charts::ChartSpecs;
use crate::dashboard::{ids, record_cells, TABLE_COLUMNS};
use crate::flights::{FlightRecord, SearchForm};
use crate::insights::InsightResult;
use crate::stats::StatisticsSummary;

const BOOTSTRAP_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css";
const BOOTSTRAP_JS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js";
const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// Everything shown on the dashboard page.
#[derive(Debug)]
pub struct DashboardPage<'a> {
    pub search: &'a SearchForm,
    pub records: &'a [FlightRecord],
    pub summary: &'a StatisticsSummary,
    pub insights: &'a InsightResult,
    pub charts: &'a ChartSpecs,
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

/// Serialize a value for a `<script type="application/json">` block.
pub fn embed_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

fn layout(title: &str, body: &str, scripts: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en" data-bs-theme="dark">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="{css}">
</head>
<body>
<nav class="navbar navbar-expand-lg bg-body-tertiary mb-4">
  <div class="container"><a class="navbar-brand" href="/">Flight Insights</a></div>
</nav>
<main class="container">
{body}
</main>
<div id="{toasts}" class="toast-container position-fixed bottom-0 end-0 p-3"></div>
<script src="{bootstrap}"></script>
{scripts}
</body>
</html>
"#,
        title = escape_html(title),
        css = BOOTSTRAP_CSS,
        body = body,
        toasts = ids::TOAST_CONTAINER,
        bootstrap = BOOTSTRAP_JS,
        scripts = scripts,
    )
}

/// The search form, optionally with a flash message above it.
pub fn render_index(flash: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(message) = flash {
        let _ = write!(
            body,
            r#"<div class="alert alert-danger alert-dismissible" role="alert">{}<button type="button" class="btn-close" data-bs-dismiss="alert" aria-label="Close"></button></div>"#,
            escape_html(message)
        );
    }

    body.push_str(
        r#"<div class="row justify-content-center">
<div class="col-lg-8">
<h1 class="mb-3">Flight Price Analysis</h1>
<p class="text-body-secondary">Explore fare trends, popular routes and demand patterns for any route and date range.</p>
<form method="post" action="/dashboard" class="card card-body">
  <div class="row g-3">
    <div class="col-md-6"><label class="form-label" for="from_city">From</label>
      <input class="form-control" id="from_city" name="from_city" placeholder="New York" required></div>
    <div class="col-md-6"><label class="form-label" for="to_city">To</label>
      <input class="form-control" id="to_city" name="to_city" placeholder="Los Angeles" required></div>
    <div class="col-md-6"><label class="form-label" for="start_date">Start date</label>
      <input class="form-control" type="date" id="start_date" name="start_date" required></div>
    <div class="col-md-6"><label class="form-label" for="end_date">End date</label>
      <input class="form-control" type="date" id="end_date" name="end_date" required></div>
  </div>
  <button class="btn btn-primary mt-3" type="submit">Analyze Flights</button>
</form>
</div>
</div>"#,
    );

    layout("Flight Insights", &body, "")
}

/// The full dashboard page.
pub fn render_dashboard(page: &DashboardPage<'_>) -> String {
    let mut body = String::new();
    let stats = &page.insights.key_statistics;

    let _ = write!(
        body,
        r#"<div class="d-flex flex-wrap justify-content-between align-items-center mb-4">
<div><h1 class="h3 mb-1">{from} → {to}</h1><p class="text-body-secondary mb-0">{start} to {end}</p></div>
<div class="btn-group">
<button id="{refresh}" class="btn btn-outline-info" data-bs-toggle="tooltip" title="Ask for a fresh analysis of this data">Refresh Insights</button>
<button id="{export}" class="btn btn-outline-success" data-bs-toggle="tooltip" title="Download the table as CSV">Export CSV</button>
</div>
</div>
"#,
        from = escape_html(&page.search.from_city),
        to = escape_html(&page.search.to_city),
        start = escape_html(&page.search.start_date),
        end = escape_html(&page.search.end_date),
        refresh = ids::REFRESH_BUTTON,
        export = ids::EXPORT_BUTTON,
    );

    body.push_str(r#"<div class="row g-3 mb-4">"#);
    for (label, id, value) in [
        ("Total Flights", ids::STAT_TOTAL_FLIGHTS, stats.total_flights.to_string()),
        ("Average Price", ids::STAT_AVG_PRICE, format!("${:.2}", stats.avg_price)),
        ("Cheapest Day", ids::STAT_CHEAPEST_DAY, stats.cheapest_day.clone()),
        ("Most Expensive Day", ids::STAT_MOST_EXPENSIVE_DAY, stats.most_expensive_day.clone()),
    ] {
        let _ = write!(
            body,
            r#"<div class="col-md-3"><div class="card card-body"><div class="text-body-secondary small">{}</div><div class="fs-4" id="{}">{}</div></div></div>"#,
            label,
            id,
            escape_html(&value)
        );
    }
    body.push_str("</div>\n");

    if let (Some(cheapest), Some(priciest)) =
        (&page.summary.cheapest_day, &page.summary.most_expensive_day)
    {
        let _ = write!(
            body,
            r#"<p class="text-body-secondary">Lowest fare ${} on {}, highest ${} on {}.</p>"#,
            cheapest.price, cheapest.date, priciest.price, priciest.date
        );
    }

    let _ = write!(
        body,
        r#"<div class="row g-3 mb-4">
<div class="col-12"><div class="card card-body"><div id="{}"></div></div></div>
<div class="col-lg-6"><div class="card card-body"><div id="{}"></div></div></div>
<div class="col-lg-6"><div class="card card-body"><div id="{}"></div></div></div>
</div>
"#,
        ids::PRICE_TREND_CHART,
        ids::POPULAR_ROUTES_CHART,
        ids::DEMAND_BY_DAY_CHART,
    );

    render_insights(&mut body, page.insights);
    render_table(&mut body, page.records);

    let _ = write!(
        body,
        r#"<script type="application/json" id="{}">{}</script>
<script type="application/json" id="{}">{}</script>
"#,
        ids::FLIGHT_DATA_JSON,
        embed_json(&page.records),
        ids::CHART_SPECS_JSON,
        embed_json(page.charts),
    );

    let scripts = format!(
        "<script src=\"{}\"></script>\n<script src=\"/static/dashboard.js\"></script>",
        PLOTLY_JS
    );

    layout("Flight Dashboard", &body, &scripts)
}

fn render_insights(body: &mut String, insights: &InsightResult) {
    let _ = write!(
        body,
        r#"<div class="row g-3 mb-4">
<div class="col-lg-6"><div class="card card-body"><h2 class="h5">Price Insights</h2><p id="{}">{}</p>
<h2 class="h5">Demand Patterns</h2><p id="{}">{}</p></div></div>
<div class="col-lg-6"><div class="card card-body"><h2 class="h5">Recommendations</h2><ul id="{}">"#,
        ids::PRICE_INSIGHTS,
        escape_html(&insights.price_insights),
        ids::DEMAND_PATTERNS,
        escape_html(&insights.demand_patterns),
        ids::RECOMMENDATIONS,
    );
    for item in &insights.recommendations {
        let _ = write!(body, "<li>{}</li>", escape_html(item));
    }
    let _ = write!(
        body,
        r#"</ul><h2 class="h5">Popular Routes</h2><ul id="{}">"#,
        ids::POPULAR_ROUTES
    );
    for route in &insights.popular_routes {
        let _ = write!(body, "<li>{}</li>", escape_html(route));
    }
    body.push_str("</ul></div></div>\n</div>\n");
}

fn render_table(body: &mut String, records: &[FlightRecord]) {
    let _ = write!(
        body,
        r#"<div class="card card-body mb-4"><div class="d-flex justify-content-between"><h2 class="h5">Flights</h2><div id="{}"></div></div>
<div class="table-responsive"><table id="{}" class="table table-sm table-hover"><thead><tr>"#,
        ids::RESET_FILTER_SLOT,
        ids::FLIGHTS_TABLE,
    );
    for (index, column) in TABLE_COLUMNS.iter().enumerate() {
        let _ = write!(
            body,
            r#"<th data-column="{}" role="button">{}</th>"#,
            index, column
        );
    }
    body.push_str("</tr></thead><tbody>");
    for record in records {
        body.push_str("<tr>");
        for cell in record_cells(record) {
            let _ = write!(body, "<td>{}</td>", escape_html(&cell));
        }
        body.push_str("</tr>");
    }
    body.push_str("</tbody></table></div></div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::fallback_insights;
    use crate::server::charts::build_charts;
    use crate::stats::summarize;

    #[test]
    fn test_escape_html() {
        let escaped = escape_html(r#"<script>alert("x") & 'y'</script>"#);
        assert!(escaped.starts_with("&lt;script&gt;alert(&quot;x&quot;) &amp; "));
        assert!(escaped.ends_with("&lt;/script&gt;"));
        for raw in ['<', '>', '"', '\''] {
            assert!(!escaped.contains(raw), "unescaped {:?} in {}", raw, escaped);
        }
        assert_eq!(escape_html("Portland → San Diego"), "Portland → San Diego");
    }

    #[test]
    fn test_search_term_quotes_are_escaped() {
        let search = SearchForm {
            from_city: r#"" onfocus="alert(1)"#.to_string(),
            to_city: "' autofocus='".to_string(),
            start_date: "2024-05-01".to_string(),
            end_date: "2024-05-02".to_string(),
        };
        let summary = summarize(&[]);
        let insights = fallback_insights(&summary);
        let charts = build_charts(&[], &summary);
        let html = render_dashboard(&DashboardPage {
            search: &search,
            records: &[],
            summary: &summary,
            insights: &insights,
            charts: &charts,
        });

        assert!(!html.contains(r#"" onfocus=""#));
        assert!(!html.contains("' autofocus='"));
        assert!(html.contains("&quot; onfocus=&quot;alert(1)"));
    }

    #[test]
    fn test_embed_json_breaks_script_close() {
        let embedded = embed_json(&vec!["</script><b>"]);
        assert!(!embedded.contains("</script>"));
        assert!(embedded.contains("<\\/script>"));
    }

    #[test]
    fn test_index_with_flash() {
        let html = render_index(Some("Invalid <date>"));
        assert!(html.contains("Invalid &lt;date&gt;"));
        assert!(html.contains(r#"action="/dashboard""#));
        assert!(!render_index(None).contains("alert-danger"));
    }

    #[test]
    fn test_dashboard_escapes_search_terms() {
        let search = SearchForm {
            from_city: "<b>Boston</b>".to_string(),
            to_city: "Denver".to_string(),
            start_date: "2024-05-01".to_string(),
            end_date: "2024-05-02".to_string(),
        };
        let summary = summarize(&[]);
        let insights = fallback_insights(&summary);
        let charts = build_charts(&[], &summary);
        let html = render_dashboard(&DashboardPage {
            search: &search,
            records: &[],
            summary: &summary,
            insights: &insights,
            charts: &charts,
        });

        assert!(html.contains("&lt;b&gt;Boston&lt;/b&gt;"));
        assert!(!html.contains("<b>Boston</b>"));
        assert!(html.contains(ids::REFRESH_BUTTON));
        assert!(html.contains("/static/dashboard.js"));
    }
}

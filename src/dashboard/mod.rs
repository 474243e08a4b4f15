//! Client-side dashboard behaviour.
//!
//! [`DashboardController`] owns the page state and applies user events to
//! it: refresh, export, chart clicks, filter reset, resize. The browser
//! script served at `/static/dashboard.js` performs the same wiring against
//! the DOM using the element ids in [`ids`].

mod controller;
mod table;
mod toast;
mod transport;

pub use controller::*;
pub use table::*;
pub use toast::*;
pub use transport::*;

/// DOM element ids shared by the renderer and the browser script.
pub mod ids {
    pub const REFRESH_BUTTON: &str = "refresh-insights-btn";
    pub const EXPORT_BUTTON: &str = "export-csv-btn";
    pub const FLIGHTS_TABLE: &str = "flights-table";
    pub const RESET_FILTER_SLOT: &str = "reset-filter-slot";
    pub const TOAST_CONTAINER: &str = "toast-container";

    pub const PRICE_TREND_CHART: &str = "price-trend-chart";
    pub const POPULAR_ROUTES_CHART: &str = "popular-routes-chart";
    pub const DEMAND_BY_DAY_CHART: &str = "demand-by-day-chart";

    pub const PRICE_INSIGHTS: &str = "price-insights";
    pub const DEMAND_PATTERNS: &str = "demand-patterns";
    pub const RECOMMENDATIONS: &str = "recommendations-list";
    pub const POPULAR_ROUTES: &str = "popular-routes-list";

    pub const STAT_TOTAL_FLIGHTS: &str = "stat-total-flights";
    pub const STAT_AVG_PRICE: &str = "stat-avg-price";
    pub const STAT_CHEAPEST_DAY: &str = "stat-cheapest-day";
    pub const STAT_MOST_EXPENSIVE_DAY: &str = "stat-most-expensive-day";

    pub const FLIGHT_DATA_JSON: &str = "flight-data";
    pub const CHART_SPECS_JSON: &str = "chart-specs";

    /// Elements that carry a tooltip.
    pub const TOOLTIP_ELEMENTS: [&str; 2] = [REFRESH_BUTTON, EXPORT_BUTTON];
}

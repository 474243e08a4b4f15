use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::ids;
use super::table::{SortOrder, TableView, TABLE_COLUMNS};
use super::toast::{Toast, ToastLevel};
use super::transport::RefreshTransport;
use crate::error::ClientResult;
use crate::export::{to_csv, CSV_CONTENT_TYPE, CSV_FILE_NAME};
use crate::flights::FlightRecord;
use crate::insights::{InsightResult, KeyStatistics};
use crate::stats::{summarize, StatisticsSummary};

/// Label of the control injected while the table is filtered.
pub const RESET_FILTER_LABEL: &str = "Reset Filter";

/// Fixed chart height in pixels.
pub const CHART_HEIGHT: u32 = 400;

/// Narrowest width charts are laid out at.
pub const MIN_CHART_WIDTH: u32 = 320;

const CHART_PADDING: u32 = 48;

/// Charts on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    PriceTrend,
    PopularRoutes,
    DemandByDay,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [
        ChartKind::PriceTrend,
        ChartKind::PopularRoutes,
        ChartKind::DemandByDay,
    ];

    /// DOM id of the chart container.
    pub fn element_id(self) -> &'static str {
        match self {
            ChartKind::PriceTrend => ids::PRICE_TREND_CHART,
            ChartKind::PopularRoutes => ids::POPULAR_ROUTES_CHART,
            ChartKind::DemandByDay => ids::DEMAND_BY_DAY_CHART,
        }
    }
}

/// Computed size of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub chart: ChartKind,
    pub width: u32,
    pub height: u32,
}

/// The transient control that clears a table filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetControl {
    pub label: String,
    pub filter: String,
}

/// A file handed to the browser for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub content_type: String,
    pub contents: String,
}

/// What a chart click did to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartClickEffect {
    Filtered { visible: usize },
    Highlighted { matched: usize },
    Ignored,
}

/// Result of a refresh action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated,
    Failed,
    /// A refresh was already in flight.
    Ignored,
}

/// Everything the page shows, owned in one place.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub records: Vec<FlightRecord>,
    pub summary: StatisticsSummary,
    pub insights: InsightResult,
    pub table: TableView,
    /// Column and direction of the last header sort.
    pub sorted_by: Option<(usize, SortOrder)>,
    pub refresh_enabled: bool,
    pub reset_control: Option<ResetControl>,
    pub toasts: Vec<Toast>,
    pub tooltips: Vec<&'static str>,
    pub chart_layouts: Vec<ChartLayout>,
}

impl DashboardState {
    pub fn new(records: Vec<FlightRecord>, insights: InsightResult) -> Self {
        let summary = summarize(&records);
        let table = TableView::from_records(&records);
        Self {
            records,
            summary,
            insights,
            table,
            sorted_by: None,
            refresh_enabled: true,
            reset_control: None,
            toasts: Vec::new(),
            tooltips: Vec::new(),
            chart_layouts: Vec::new(),
        }
    }

    /// Statistic values currently shown in the headline cards.
    pub fn displayed_statistics(&self) -> &KeyStatistics {
        &self.insights.key_statistics
    }
}

/// Drives dashboard state in response to user events.
///
/// Handlers take `&mut self`, so a refresh cannot be re-entered while one
/// is awaiting the transport.
pub struct DashboardController<T: RefreshTransport> {
    state: DashboardState,
    transport: T,
}

impl<T: RefreshTransport> DashboardController<T> {
    pub fn new(state: DashboardState, transport: T) -> Self {
        Self { state, transport }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Wire tooltips and lay charts out for the initial viewport.
    pub fn initialize(&mut self, viewport_width: u32) {
        self.state.tooltips = ids::TOOLTIP_ELEMENTS.to_vec();
        self.on_resize(viewport_width);
        debug!(
            tooltips = self.state.tooltips.len(),
            rows = self.state.table.rows().len(),
            "Dashboard initialized"
        );
    }

    /// Refresh insights through the transport.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        if !self.begin_refresh() {
            return RefreshOutcome::Ignored;
        }
        let result = self.transport.refresh(&self.state.records).await;
        self.complete_refresh(result)
    }

    /// Disable the refresh control. Returns false if it already was.
    pub fn begin_refresh(&mut self) -> bool {
        if !self.state.refresh_enabled {
            debug!("Refresh already in progress");
            return false;
        }
        self.state.refresh_enabled = false;
        true
    }

    /// Apply a refresh response and re-enable the control.
    pub fn complete_refresh(&mut self, result: ClientResult<InsightResult>) -> RefreshOutcome {
        self.state.refresh_enabled = true;

        match result {
            Ok(insights) => {
                self.state.insights = insights;
                self.push_toast(ToastLevel::Success, "Insights refreshed successfully!");
                info!("Insights refreshed");
                RefreshOutcome::Updated
            }
            Err(e) => {
                warn!(error = %e, "Insight refresh failed");
                self.push_toast(ToastLevel::Error, "Failed to refresh insights");
                RefreshOutcome::Failed
            }
        }
    }

    /// React to a click on a chart point labelled `label`.
    pub fn on_chart_click(&mut self, chart: ChartKind, label: &str) -> ChartClickEffect {
        match chart {
            ChartKind::PopularRoutes => {
                let visible = self.state.table.filter(label);
                self.state.reset_control = Some(ResetControl {
                    label: RESET_FILTER_LABEL.to_string(),
                    filter: label.to_string(),
                });
                ChartClickEffect::Filtered { visible }
            }
            ChartKind::PriceTrend => {
                let matched = self.state.table.highlight(label);
                ChartClickEffect::Highlighted { matched }
            }
            ChartKind::DemandByDay => ChartClickEffect::Ignored,
        }
    }

    /// Restore every row and remove the reset control.
    pub fn on_reset_filter(&mut self) {
        self.state.table.reset();
        self.state.reset_control = None;
    }

    /// Sort the table by a clicked column header.
    ///
    /// The first click on a column sorts ascending, a repeat click flips the
    /// direction. Returns `None` for a column the table does not have.
    pub fn on_header_click(&mut self, column: usize) -> Option<SortOrder> {
        if column >= TABLE_COLUMNS.len() {
            debug!(column, "Ignoring click on unknown column");
            return None;
        }
        let order = match self.state.sorted_by {
            Some((current, SortOrder::Ascending)) if current == column => SortOrder::Descending,
            _ => SortOrder::Ascending,
        };
        self.state.table.sort_by_column(column, order);
        self.state.sorted_by = Some((column, order));
        Some(order)
    }

    /// Serialize the in-memory records for download.
    pub fn on_export(&mut self) -> Option<Download> {
        match to_csv(&self.state.records) {
            Ok(contents) => {
                self.push_toast(ToastLevel::Success, "Data exported successfully!");
                Some(Download {
                    filename: CSV_FILE_NAME.to_string(),
                    content_type: CSV_CONTENT_TYPE.to_string(),
                    contents,
                })
            }
            Err(e) => {
                warn!(error = %e, "CSV export failed");
                self.push_toast(ToastLevel::Error, "Failed to export data");
                None
            }
        }
    }

    /// Re-layout charts for a new viewport width.
    pub fn on_resize(&mut self, viewport_width: u32) {
        let width = viewport_width
            .saturating_sub(CHART_PADDING)
            .max(MIN_CHART_WIDTH);
        self.state.chart_layouts = ChartKind::ALL
            .iter()
            .map(|&chart| ChartLayout {
                chart,
                width,
                height: CHART_HEIGHT,
            })
            .collect();
    }

    /// Drop toasts whose lifetime has passed.
    pub fn prune_toasts(&mut self, now: DateTime<Utc>) {
        self.state.toasts.retain(|t| !t.is_expired(now));
    }

    fn push_toast(&mut self, level: ToastLevel, message: &str) {
        self.state.toasts.push(Toast::new(level, message));
    }
}

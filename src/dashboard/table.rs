use std::cmp::Ordering;

use crate::flights::{FlightRecord, DATE_FORMAT, TIME_FORMAT};

/// Column headings of the flights table, in display order.
pub const TABLE_COLUMNS: [&str; 8] = [
    "Date",
    "Airline",
    "Flight",
    "Route",
    "Departure",
    "Arrival",
    "Duration",
    "Price",
];

/// Cell text for one record, matching [`TABLE_COLUMNS`].
pub fn record_cells(record: &FlightRecord) -> Vec<String> {
    vec![
        record.date.format(DATE_FORMAT).to_string(),
        record.airline.clone(),
        record.flight_number.clone(),
        record.route.clone(),
        record.departure_time.format(TIME_FORMAT).to_string(),
        record.arrival_time.format(TIME_FORMAT).to_string(),
        record.duration_display(),
        format!("${}", record.price),
    ]
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub visible: bool,
    pub highlighted: bool,
}

impl TableRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells,
            visible: true,
            highlighted: false,
        }
    }

    /// Literal, case-sensitive substring match against any cell.
    pub fn contains(&self, needle: &str) -> bool {
        self.cells.iter().any(|cell| cell.contains(needle))
    }
}

/// Sort direction for [`TableView::sort_by_column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Row visibility and highlight state of the flights table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    rows: Vec<TableRow>,
}

impl TableView {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    pub fn from_records(records: &[FlightRecord]) -> Self {
        Self::new(records.iter().map(|r| TableRow::new(record_cells(r))).collect())
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(|r| r.visible)
    }

    pub fn highlighted_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(|r| r.highlighted)
    }

    /// Show only rows containing `needle`. Returns the number left visible.
    pub fn filter(&mut self, needle: &str) -> usize {
        for row in &mut self.rows {
            row.visible = row.contains(needle);
        }
        self.visible_rows().count()
    }

    /// Highlight rows containing `needle` without hiding the rest.
    pub fn highlight(&mut self, needle: &str) -> usize {
        for row in &mut self.rows {
            row.highlighted = row.contains(needle);
        }
        self.highlighted_rows().count()
    }

    /// Show every row and clear highlights.
    pub fn reset(&mut self) {
        for row in &mut self.rows {
            row.visible = true;
            row.highlighted = false;
        }
    }

    /// Sort rows by a column. Cells that both parse as numbers (after
    /// stripping a leading `$`) compare numerically, others as text.
    pub fn sort_by_column(&mut self, column: usize, order: SortOrder) {
        self.rows.sort_by(|a, b| {
            let ordering = compare_cells(a.cells.get(column), b.cells.get(column));
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
    }
}

fn compare_cells(a: Option<&String>, b: Option<&String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match (numeric(a), numeric(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.cmp(b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn numeric(cell: &str) -> Option<f64> {
    cell.trim().trim_start_matches('$').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> TableRow {
        TableRow::new(cells.iter().map(|c| c.to_string()).collect())
    }

    fn sample() -> TableView {
        TableView::new(vec![
            row(&["2024-05-01", "Delta", "JFK-LAX", "$250"]),
            row(&["2024-05-02", "United", "ORD-SFO", "$99"]),
            row(&["2024-05-02", "Delta", "JFK-LAX", "$1200"]),
        ])
    }

    #[test]
    fn test_filter_hides_non_matching_rows() {
        let mut table = sample();
        assert_eq!(table.filter("JFK-LAX"), 2);
        assert!(!table.rows()[1].visible);

        table.reset();
        assert_eq!(table.visible_rows().count(), 3);
    }

    #[test]
    fn test_filter_is_literal_and_case_sensitive() {
        let mut table = sample();
        assert_eq!(table.filter("jfk-lax"), 0);
        assert_eq!(table.filter("JFK.LAX"), 0);
        assert_eq!(table.filter("SFO"), 1);
    }

    #[test]
    fn test_highlight_keeps_rows_visible() {
        let mut table = sample();
        assert_eq!(table.highlight("2024-05-02"), 2);
        assert_eq!(table.visible_rows().count(), 3);

        table.reset();
        assert_eq!(table.highlighted_rows().count(), 0);
    }

    #[test]
    fn test_sort_numeric_and_text_columns() {
        let mut table = sample();
        table.sort_by_column(3, SortOrder::Ascending);
        let prices: Vec<&str> = table.rows().iter().map(|r| r.cells[3].as_str()).collect();
        assert_eq!(prices, vec!["$99", "$250", "$1200"]);

        table.sort_by_column(1, SortOrder::Descending);
        assert_eq!(table.rows()[0].cells[1], "United");
    }
}

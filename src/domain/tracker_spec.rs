// The rendered instruction set handed to a sink
use super::schema::{column_letter, Rgb, Status, TrackerRow, STATUS_COLUMN};

pub const TRACKER_SHEET_NAME: &str = "Job Applications";
pub const DASHBOARD_SHEET_NAME: &str = "Dashboard";

/// First data row, zero-based. Row 0 is the header.
pub const FIRST_DATA_ROW: u32 = 1;

/// One header cell: position, label, width hints.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub index: u16,
    pub label: &'static str,
    pub width_chars: f64,
    pub width_px: u32,
}

/// Header row layout plus the bold/freeze directives that go with it.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLayout {
    pub cells: Vec<HeaderCell>,
    pub bold: bool,
    pub frozen_rows: u32,
}

/// The single dropdown rule on the status column. The data span is
/// open-ended; each sink substitutes its own large row bound.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRule {
    pub column: u16,
    pub allowed: Vec<&'static str>,
    pub allow_blank: bool,
    pub first_data_row: u32,
}

/// One conditional-format rule: rows whose status cell equals `status` get
/// `fill` across all 12 columns. At most one rule can match a given row
/// since the status cell holds a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightRule {
    pub status: Status,
    pub fill: Rgb,
    pub first_column: u16,
    pub last_column: u16,
    pub first_data_row: u32,
}

impl HighlightRule {
    /// The custom formula understood by both backends, anchored on the
    /// status column of the rule's first data row.
    pub fn formula(&self) -> String {
        format!(
            "=${}{}=\"{}\"",
            column_letter(STATUS_COLUMN),
            self.first_data_row + 1,
            self.status.as_str()
        )
    }

    /// Whether this rule would fire for a row carrying `status_value`.
    pub fn matches(&self, status_value: &str) -> bool {
        self.status.as_str() == status_value
    }
}

/// What a dashboard card counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricFilter {
    /// Any non-blank status cell (the "Total Applied" card).
    NonBlank,
    /// Status cells equal to this value.
    Status(Status),
}

/// Anchor cell on the dashboard sheet, zero-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPos {
    pub row: u32,
    pub col: u16,
}

/// One dashboard card: a label cell with a count formula beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub label: &'static str,
    pub filter: MetricFilter,
    pub anchor: GridPos,
}

impl MetricCard {
    /// Pure count-by-filter over the status column. This is the value the
    /// sheet formula computes once bound to real data.
    pub fn evaluate(&self, rows: &[TrackerRow]) -> usize {
        rows.iter()
            .filter(|row| match self.filter {
                MetricFilter::NonBlank => !row.status().is_empty(),
                MetricFilter::Status(status) => row.status() == status.as_str(),
            })
            .count()
    }
}

/// Chart descriptors for the dashboard. Both source their data from fixed
/// tracker columns starting at the first data row; range endpoints are a
/// backend-chosen large constant, never a measured last row.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    /// Pie chart over the status column with percentage labels; the series
    /// is named by the column's header cell.
    StatusBreakdown {
        title: &'static str,
        source_column: u16,
        show_percentages: bool,
        anchor: GridPos,
    },
    /// Line chart of the row-index column against the date-applied column.
    ApplicationsOverTime {
        title: &'static str,
        category_column: u16,
        value_column: u16,
        x_axis: &'static str,
        y_axis: &'static str,
        anchor: GridPos,
    },
}

impl ChartSpec {
    pub fn anchor(&self) -> GridPos {
        match *self {
            ChartSpec::StatusBreakdown { anchor, .. } => anchor,
            ChartSpec::ApplicationsOverTime { anchor, .. } => anchor,
        }
    }

    /// Columns the chart reads from, for range checks.
    pub fn source_columns(&self) -> Vec<u16> {
        match *self {
            ChartSpec::StatusBreakdown { source_column, .. } => vec![source_column],
            ChartSpec::ApplicationsOverTime {
                category_column,
                value_column,
                ..
            } => vec![category_column, value_column],
        }
    }
}

/// The dashboard section: six cards in a two-column grid plus two charts.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSpec {
    pub sheet_name: &'static str,
    pub cards: Vec<MetricCard>,
    pub charts: Vec<ChartSpec>,
}

/// The complete, internally consistent instruction set for one tracker.
/// Built in full before any instruction is handed to a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSpec {
    pub sheet_name: &'static str,
    pub header: HeaderLayout,
    pub validation: ValidationRule,
    pub highlights: Vec<HighlightRule>,
    pub dashboard: Option<DashboardSpec>,
    pub seed_rows: Vec<TrackerRow>,
}

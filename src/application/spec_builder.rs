// Tracker spec builder - renders the fixed schema into sink instructions
use crate::domain::schema::{sample_rows, Status, TrackerRow, COLUMNS, COLUMN_COUNT, STATUS_COLUMN};
use crate::domain::tracker_spec::{
    ChartSpec, DashboardSpec, GridPos, HeaderCell, HeaderLayout, HighlightRule, MetricCard,
    MetricFilter, TrackerSpec, ValidationRule, DASHBOARD_SHEET_NAME, FIRST_DATA_ROW,
    TRACKER_SHEET_NAME,
};

/// Pure, deterministic builder: same schema in, same instruction set out,
/// every invocation. Holds no state beyond the two presentation toggles.
#[derive(Debug, Clone)]
pub struct TrackerSpecBuilder {
    include_dashboard: bool,
    include_seed_rows: bool,
}

impl TrackerSpecBuilder {
    pub fn new() -> Self {
        Self {
            include_dashboard: true,
            include_seed_rows: false,
        }
    }

    pub fn with_dashboard(mut self, include: bool) -> Self {
        self.include_dashboard = include;
        self
    }

    pub fn with_seed_rows(mut self, include: bool) -> Self {
        self.include_seed_rows = include;
        self
    }

    /// Header row: one cell per schema column, in schema order, plus the
    /// bold and freeze directives.
    pub fn header_layout(&self) -> HeaderLayout {
        let cells = COLUMNS
            .iter()
            .enumerate()
            .map(|(index, column)| HeaderCell {
                index: index as u16,
                label: column.label,
                width_chars: column.width_chars,
                width_px: column.width_px,
            })
            .collect();
        HeaderLayout {
            cells,
            bold: true,
            frozen_rows: 1,
        }
    }

    /// The single dropdown rule on the status column. Never covers the
    /// header row; blanks stay permitted.
    pub fn validation_rule(&self) -> ValidationRule {
        ValidationRule {
            column: STATUS_COLUMN,
            allowed: Status::ALL.iter().map(|s| s.as_str()).collect(),
            allow_blank: true,
            first_data_row: FIRST_DATA_ROW,
        }
    }

    /// One rule per status, spanning all 12 columns. A row matches at most
    /// one rule; blank or out-of-domain values match none.
    pub fn row_highlight_rules(&self) -> Vec<HighlightRule> {
        Status::ALL
            .iter()
            .map(|&status| HighlightRule {
                status,
                fill: status.color(),
                first_column: 0,
                last_column: COLUMN_COUNT as u16 - 1,
                first_data_row: FIRST_DATA_ROW,
            })
            .collect()
    }

    /// Six cards in a 2-column, 3-row grid. Order and positions are fixed
    /// so regeneration is idempotent.
    pub fn dashboard_metrics(&self) -> Vec<MetricCard> {
        let filters: [(&'static str, MetricFilter); 6] = [
            ("Total Applied", MetricFilter::NonBlank),
            (
                "Interviews Scheduled",
                MetricFilter::Status(Status::InterviewScheduled),
            ),
            ("Offers", MetricFilter::Status(Status::Offer)),
            ("Rejected", MetricFilter::Status(Status::Rejected)),
            ("No Response", MetricFilter::Status(Status::NoResponse)),
            ("On Hold", MetricFilter::Status(Status::OnHold)),
        ];
        filters
            .into_iter()
            .enumerate()
            .map(|(i, (label, filter))| MetricCard {
                label,
                filter,
                anchor: GridPos {
                    row: 1 + (i as u32 / 2) * 2,
                    col: 1 + (i as u16 % 2) * 3,
                },
            })
            .collect()
    }

    /// The two dashboard charts, anchored below the card grid.
    pub fn charts(&self) -> Vec<ChartSpec> {
        vec![
            ChartSpec::StatusBreakdown {
                title: "Application Status",
                source_column: STATUS_COLUMN,
                show_percentages: true,
                anchor: GridPos { row: 8, col: 0 },
            },
            ChartSpec::ApplicationsOverTime {
                title: "Applications Over Time",
                category_column: 4, // Date Applied
                value_column: 0,    // row index
                x_axis: "Date",
                y_axis: "Count",
                anchor: GridPos { row: 8, col: 7 },
            },
        ]
    }

    /// Assemble the full instruction set. Everything is built before the
    /// spec is handed to a sink, so a sink applying instructions out of
    /// order can never observe a partial spec.
    pub fn build(&self) -> TrackerSpec {
        let seed_rows: Vec<TrackerRow> = if self.include_seed_rows {
            sample_rows()
        } else {
            Vec::new()
        };
        let dashboard = self.include_dashboard.then(|| DashboardSpec {
            sheet_name: DASHBOARD_SHEET_NAME,
            cards: self.dashboard_metrics(),
            charts: self.charts(),
        });
        TrackerSpec {
            sheet_name: TRACKER_SHEET_NAME,
            header: self.header_layout(),
            validation: self.validation_rule(),
            highlights: self.row_highlight_rules(),
            dashboard,
            seed_rows,
        }
    }
}

impl Default for TrackerSpecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn row_with_status(status: &str) -> TrackerRow {
        let mut cells: [String; COLUMN_COUNT] = Default::default();
        cells[STATUS_COLUMN as usize] = status.to_string();
        TrackerRow { cells }
    }

    #[test]
    fn test_header_layout_has_twelve_labels_in_order() {
        let layout = TrackerSpecBuilder::new().header_layout();
        let labels: Vec<&str> = layout.cells.iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            vec![
                "#",
                "Company Name",
                "Job Title",
                "Job Location",
                "Date Applied",
                "Job Posting Link",
                "Resume Link",
                "Cover Letter Link",
                "Application Status",
                "Follow-Up Date",
                "Response Received?",
                "Notes",
            ]
        );
        let positions: HashSet<u16> = layout.cells.iter().map(|c| c.index).collect();
        assert_eq!(positions.len(), 12);
        assert!(layout.bold);
        assert_eq!(layout.frozen_rows, 1);
    }

    #[test]
    fn test_one_highlight_rule_per_status() {
        let rules = TrackerSpecBuilder::new().row_highlight_rules();
        assert_eq!(rules.len(), 7);
        let statuses: HashSet<Status> = rules.iter().map(|r| r.status).collect();
        assert_eq!(statuses.len(), 7);
        for rule in &rules {
            assert_eq!(rule.first_column, 0);
            assert_eq!(rule.last_column, 11);
            assert_eq!(rule.first_data_row, FIRST_DATA_ROW);
            assert_eq!(rule.fill, rule.status.color());
        }
    }

    #[test]
    fn test_validation_allow_list_equals_status_domain() {
        let rule = TrackerSpecBuilder::new().validation_rule();
        let allowed: HashSet<&str> = rule.allowed.iter().copied().collect();
        let domain: HashSet<&str> = Status::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(allowed, domain);
        assert!(rule.allow_blank);
        assert_eq!(rule.column, STATUS_COLUMN);
        assert_eq!(rule.first_data_row, 1, "rule must not cover the header");
    }

    #[test]
    fn test_blank_and_unknown_statuses_match_no_rule() {
        let rules = TrackerSpecBuilder::new().row_highlight_rules();
        assert!(!rules.iter().any(|r| r.matches("")));
        assert!(!rules.iter().any(|r| r.matches("Ghosted")));
        assert!(rules.iter().any(|r| r.matches("Followed Up")));
    }

    #[test]
    fn test_metrics_count_by_status_filter() {
        let rows = vec![
            row_with_status("Applied"),
            row_with_status("Applied"),
            row_with_status("Offer"),
        ];
        let cards = TrackerSpecBuilder::new().dashboard_metrics();
        assert_eq!(cards.len(), 6);
        for card in &cards {
            let expected = match card.label {
                "Total Applied" => 3,
                "Offers" => 1,
                _ => 0,
            };
            assert_eq!(card.evaluate(&rows), expected, "{}", card.label);
        }
    }

    #[test]
    fn test_metric_grid_positions_are_stable() {
        let cards = TrackerSpecBuilder::new().dashboard_metrics();
        let anchors: Vec<(u32, u16)> = cards.iter().map(|c| (c.anchor.row, c.anchor.col)).collect();
        assert_eq!(anchors, vec![(1, 1), (1, 4), (3, 1), (3, 4), (5, 1), (5, 4)]);
    }

    #[test]
    fn test_charts_stay_inside_the_schema_columns() {
        for chart in TrackerSpecBuilder::new().charts() {
            for col in chart.source_columns() {
                assert!((col as usize) < crate::domain::schema::COLUMN_COUNT);
            }
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = TrackerSpecBuilder::new().with_seed_rows(true);
        assert_eq!(builder.build(), builder.build());

        let bare = TrackerSpecBuilder::new().with_dashboard(false).build();
        assert!(bare.dashboard.is_none());
        assert!(bare.seed_rows.is_empty());
    }
}

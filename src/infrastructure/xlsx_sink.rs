// Local workbook sink backed by rust_xlsxwriter
use crate::application::sink::{Artifact, SinkError, TrackerSink};
use crate::domain::schema::{column_letter, STATUS_COLUMN};
use crate::domain::tracker_spec::{
    ChartSpec, DashboardSpec, MetricCard, MetricFilter, TrackerSpec, FIRST_DATA_ROW,
};
use async_trait::async_trait;
use rust_xlsxwriter::{
    Chart, ChartDataLabel, ChartType, Color, ConditionalFormatFormula, DataValidation, Format,
    Formula, Workbook, XlsxError,
};
use std::path::PathBuf;

/// Last grid row of an xlsx sheet, zero-based. Validation and highlight
/// rules run to the bottom of the sheet, as the format allows.
const LAST_GRID_ROW: u32 = 1_048_575;

/// Chart source ranges stop here instead; trailing blank rows are expected
/// when the tracker is sparsely populated.
const CHART_ROW_BOUND: u32 = 999;

pub struct XlsxWorkbookSink {
    output_path: PathBuf,
}

impl XlsxWorkbookSink {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }
}

#[async_trait]
impl TrackerSink for XlsxWorkbookSink {
    async fn materialize(&self, spec: &TrackerSpec) -> Result<Artifact, SinkError> {
        let mut workbook = Workbook::new();
        write_tracker_sheet(&mut workbook, spec).map_err(workbook_error)?;
        if let Some(dashboard) = &spec.dashboard {
            write_dashboard_sheet(&mut workbook, spec, dashboard).map_err(workbook_error)?;
        }
        workbook.save(&self.output_path).map_err(workbook_error)?;

        tracing::info!("wrote workbook to {}", self.output_path.display());
        Ok(Artifact::LocalFile(self.output_path.clone()))
    }
}

fn workbook_error(error: XlsxError) -> SinkError {
    SinkError::Workbook(error.to_string())
}

fn write_tracker_sheet(workbook: &mut Workbook, spec: &TrackerSpec) -> Result<(), XlsxError> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(spec.sheet_name)?;

    let header_format = Format::new().set_bold();
    for cell in &spec.header.cells {
        if spec.header.bold {
            sheet.write_string_with_format(0, cell.index, cell.label, &header_format)?;
        } else {
            sheet.write_string(0, cell.index, cell.label)?;
        }
        sheet.set_column_width(cell.index, cell.width_chars)?;
    }

    let validation = DataValidation::new()
        .allow_list_strings(&spec.validation.allowed)?
        .ignore_blank(spec.validation.allow_blank);
    sheet.add_data_validation(
        spec.validation.first_data_row,
        spec.validation.column,
        LAST_GRID_ROW,
        spec.validation.column,
        &validation,
    )?;

    for rule in &spec.highlights {
        let fill = Format::new().set_background_color(Color::RGB(rule.fill.to_hex()));
        let conditional = ConditionalFormatFormula::new()
            .set_rule(Formula::new(rule.formula()))
            .set_format(fill);
        sheet.add_conditional_format(
            rule.first_data_row,
            rule.first_column,
            LAST_GRID_ROW,
            rule.last_column,
            &conditional,
        )?;
    }

    for (offset, row) in spec.seed_rows.iter().enumerate() {
        let row_index = FIRST_DATA_ROW + offset as u32;
        for (col, value) in row.cells.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            match value.parse::<f64>() {
                Ok(number) => {
                    sheet.write_number(row_index, col as u16, number)?;
                }
                Err(_) => {
                    sheet.write_string(row_index, col as u16, value)?;
                }
            }
        }
    }

    if spec.header.frozen_rows > 0 {
        sheet.set_freeze_panes(spec.header.frozen_rows, 0)?;
    }

    Ok(())
}

fn write_dashboard_sheet(
    workbook: &mut Workbook,
    spec: &TrackerSpec,
    dashboard: &DashboardSpec,
) -> Result<(), XlsxError> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(dashboard.sheet_name)?;

    let label_format = Format::new().set_bold();
    for card in &dashboard.cards {
        sheet.write_string_with_format(card.anchor.row, card.anchor.col, card.label, &label_format)?;
        sheet.write_formula(
            card.anchor.row + 1,
            card.anchor.col,
            Formula::new(metric_formula(card, spec.sheet_name)),
        )?;
    }

    for chart_spec in &dashboard.charts {
        let chart = build_chart(chart_spec, spec.sheet_name);
        let anchor = chart_spec.anchor();
        sheet.insert_chart(anchor.row, anchor.col, &chart)?;
    }

    Ok(())
}

fn metric_formula(card: &MetricCard, sheet_name: &str) -> String {
    let letter = column_letter(STATUS_COLUMN);
    let status_range = format!(
        "'{sheet_name}'!{letter}{}:{letter}{}",
        FIRST_DATA_ROW + 1,
        LAST_GRID_ROW + 1
    );
    match card.filter {
        MetricFilter::NonBlank => format!("=COUNTA({status_range})"),
        MetricFilter::Status(status) => {
            format!("=COUNTIF({status_range},\"{}\")", status.as_str())
        }
    }
}

fn build_chart(chart_spec: &ChartSpec, sheet_name: &'static str) -> Chart {
    match *chart_spec {
        ChartSpec::StatusBreakdown {
            title,
            source_column,
            show_percentages,
            ..
        } => {
            let mut chart = Chart::new(ChartType::Pie);
            chart.title().set_name(title);
            let series = chart.add_series();
            series
                .set_categories((
                    sheet_name,
                    FIRST_DATA_ROW,
                    source_column,
                    CHART_ROW_BOUND,
                    source_column,
                ))
                .set_values((
                    sheet_name,
                    FIRST_DATA_ROW,
                    source_column,
                    CHART_ROW_BOUND,
                    source_column,
                ))
                .set_name((sheet_name, 0, source_column));
            if show_percentages {
                series.set_data_label(ChartDataLabel::new().show_percentage());
            }
            chart
        }
        ChartSpec::ApplicationsOverTime {
            title,
            category_column,
            value_column,
            x_axis,
            y_axis,
            ..
        } => {
            let mut chart = Chart::new(ChartType::Line);
            chart.title().set_name(title);
            chart.x_axis().set_name(x_axis);
            chart.y_axis().set_name(y_axis);
            chart
                .add_series()
                .set_categories((
                    sheet_name,
                    FIRST_DATA_ROW,
                    category_column,
                    CHART_ROW_BOUND,
                    category_column,
                ))
                .set_values((
                    sheet_name,
                    FIRST_DATA_ROW,
                    value_column,
                    CHART_ROW_BOUND,
                    value_column,
                ));
            chart
        }
    }
}

// Remote spreadsheet sink: one create call, one batched update
use crate::application::sink::{Artifact, SinkError, TrackerSink};
use crate::domain::schema::{column_letter, STATUS_COLUMN};
use crate::domain::tracker_spec::{
    ChartSpec, MetricCard, MetricFilter, TrackerSpec, FIRST_DATA_ROW,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;

const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

/// Exclusive end row for remote data ranges. The API favors bounded ranges;
/// a thousand rows is plenty for one job search.
const REMOTE_ROW_BOUND: u32 = 1_000;

pub struct SheetsApiSink {
    credentials_path: Option<PathBuf>,
    document_name: String,
}

/// Credential bundle: a ready-to-use bearer token, plus an optional endpoint
/// override used by tests.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    token: String,
    #[serde(default)]
    endpoint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateSpreadsheetResponse {
    #[serde(rename = "spreadsheetId")]
    spreadsheet_id: String,
    #[serde(rename = "spreadsheetUrl")]
    spreadsheet_url: String,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    #[serde(rename = "sheetId")]
    sheet_id: i64,
}

impl SheetsApiSink {
    pub fn new(credentials_path: Option<PathBuf>, document_name: String) -> Self {
        Self {
            credentials_path,
            document_name,
        }
    }

    /// Read and parse the credential bundle. Runs before any network I/O:
    /// with no usable credentials the sink never touches the wire.
    fn load_credentials(&self) -> Result<CredentialsFile, SinkError> {
        let path = self
            .credentials_path
            .as_ref()
            .ok_or(SinkError::CredentialsRequired)?;
        let raw = std::fs::read_to_string(path).map_err(|e| SinkError::CredentialsUnreadable {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| SinkError::CredentialsUnreadable {
            path: path.clone(),
            reason: e.to_string(),
        })
    }

    async fn create_document(
        &self,
        client: &reqwest::Client,
        base: &str,
        token: &str,
        tracker_sheet_name: &str,
    ) -> Result<CreateSpreadsheetResponse, SinkError> {
        let url = format!("{base}/v4/spreadsheets");
        let body = json!({
            "properties": { "title": self.document_name },
            "sheets": [{ "properties": { "sheetId": 0, "title": tracker_sheet_name } }],
        });

        let response = client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_rejected(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))
    }

    async fn apply_batch(
        &self,
        client: &reqwest::Client,
        base: &str,
        token: &str,
        spreadsheet_id: &str,
        requests: Vec<Value>,
    ) -> Result<(), SinkError> {
        let url = format!("{base}/v4/spreadsheets/{spreadsheet_id}:batchUpdate");
        let response = client
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_rejected(response).await);
        }

        Ok(())
    }
}

async fn api_rejected(response: reqwest::Response) -> SinkError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    SinkError::ApiRejected { status, message }
}

#[async_trait]
impl TrackerSink for SheetsApiSink {
    async fn materialize(&self, spec: &TrackerSpec) -> Result<Artifact, SinkError> {
        let credentials = self.load_credentials()?;
        let base = credentials
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
            .to_string();
        let client = reqwest::Client::new();

        let created = self
            .create_document(&client, &base, &credentials.token, spec.sheet_name)
            .await?;
        let sheet_id = created
            .sheets
            .first()
            .map(|s| s.properties.sheet_id)
            .unwrap_or(0);

        let requests = build_requests(spec, sheet_id);
        tracing::debug!("applying {} batched requests to {}", requests.len(), created.spreadsheet_id);
        self.apply_batch(&client, &base, &credentials.token, &created.spreadsheet_id, requests)
            .await?;

        tracing::info!("created remote tracker at {}", created.spreadsheet_url);
        Ok(Artifact::RemoteDocument {
            url: created.spreadsheet_url,
        })
    }
}

/// Render the whole instruction set as one batchUpdate request list.
/// Requests in a batch apply in order, so the dashboard sheet is added
/// before anything refers to it.
fn build_requests(spec: &TrackerSpec, sheet_id: i64) -> Vec<Value> {
    let mut requests = Vec::new();

    let header_values: Vec<Value> = spec
        .header
        .cells
        .iter()
        .map(|cell| {
            json!({
                "userEnteredValue": { "stringValue": cell.label },
                "userEnteredFormat": { "textFormat": { "bold": spec.header.bold } },
            })
        })
        .collect();
    requests.push(json!({ "updateCells": {
        "rows": [{ "values": header_values }],
        "fields": "userEnteredValue,userEnteredFormat.textFormat.bold",
        "start": { "sheetId": sheet_id, "rowIndex": 0, "columnIndex": 0 },
    }}));

    for cell in &spec.header.cells {
        requests.push(json!({ "updateDimensionProperties": {
            "range": {
                "sheetId": sheet_id,
                "dimension": "COLUMNS",
                "startIndex": cell.index,
                "endIndex": cell.index + 1,
            },
            "properties": { "pixelSize": cell.width_px },
            "fields": "pixelSize",
        }}));
    }

    let allowed: Vec<Value> = spec
        .validation
        .allowed
        .iter()
        .map(|value| json!({ "userEnteredValue": value }))
        .collect();
    requests.push(json!({ "setDataValidation": {
        "range": {
            "sheetId": sheet_id,
            "startRowIndex": spec.validation.first_data_row,
            "endRowIndex": REMOTE_ROW_BOUND,
            "startColumnIndex": spec.validation.column,
            "endColumnIndex": spec.validation.column + 1,
        },
        "rule": {
            "condition": { "type": "ONE_OF_LIST", "values": allowed },
            "strict": true,
            "showCustomUi": true,
        },
    }}));

    for rule in &spec.highlights {
        requests.push(json!({ "addConditionalFormatRule": { "index": 0, "rule": {
            "ranges": [{
                "sheetId": sheet_id,
                "startRowIndex": rule.first_data_row,
                "endRowIndex": REMOTE_ROW_BOUND,
                "startColumnIndex": rule.first_column,
                "endColumnIndex": rule.last_column + 1,
            }],
            "booleanRule": {
                "condition": {
                    "type": "CUSTOM_FORMULA",
                    "values": [{ "userEnteredValue": rule.formula() }],
                },
                "format": { "backgroundColor": {
                    "red": rule.fill.red,
                    "green": rule.fill.green,
                    "blue": rule.fill.blue,
                }},
            },
        }}}));
    }

    requests.push(json!({ "updateSheetProperties": {
        "properties": {
            "sheetId": sheet_id,
            "gridProperties": { "frozenRowCount": spec.header.frozen_rows },
        },
        "fields": "gridProperties.frozenRowCount",
    }}));

    if !spec.seed_rows.is_empty() {
        let rows: Vec<Value> = spec
            .seed_rows
            .iter()
            .map(|row| json!({ "values": row.cells.iter().map(|c| cell_value(c)).collect::<Vec<Value>>() }))
            .collect();
        requests.push(json!({ "updateCells": {
            "rows": rows,
            "fields": "userEnteredValue",
            "start": { "sheetId": sheet_id, "rowIndex": FIRST_DATA_ROW, "columnIndex": 0 },
        }}));
    }

    if let Some(dashboard) = &spec.dashboard {
        let dashboard_id = sheet_id + 1;
        requests.push(json!({ "addSheet": {
            "properties": { "sheetId": dashboard_id, "title": dashboard.sheet_name },
        }}));

        for card in &dashboard.cards {
            requests.push(json!({ "updateCells": {
                "rows": [
                    { "values": [{
                        "userEnteredValue": { "stringValue": card.label },
                        "userEnteredFormat": { "textFormat": { "bold": true } },
                    }] },
                    { "values": [{
                        "userEnteredValue": { "formulaValue": metric_formula(card, spec.sheet_name) },
                    }] },
                ],
                "fields": "userEnteredValue,userEnteredFormat.textFormat.bold",
                "start": {
                    "sheetId": dashboard_id,
                    "rowIndex": card.anchor.row,
                    "columnIndex": card.anchor.col,
                },
            }}));
        }

        for chart in &dashboard.charts {
            requests.push(chart_request(chart, sheet_id, dashboard_id));
        }
    }

    requests
}

fn cell_value(cell: &str) -> Value {
    match cell.parse::<f64>() {
        Ok(number) => json!({ "userEnteredValue": { "numberValue": number } }),
        Err(_) => json!({ "userEnteredValue": { "stringValue": cell } }),
    }
}

fn metric_formula(card: &MetricCard, sheet_name: &str) -> String {
    let letter = column_letter(STATUS_COLUMN);
    let status_range = format!(
        "'{sheet_name}'!{letter}{}:{letter}{}",
        FIRST_DATA_ROW + 1,
        REMOTE_ROW_BOUND
    );
    match card.filter {
        MetricFilter::NonBlank => format!("=COUNTA({status_range})"),
        MetricFilter::Status(status) => {
            format!("=COUNTIF({status_range},\"{}\")", status.as_str())
        }
    }
}

fn chart_request(chart: &ChartSpec, data_sheet_id: i64, dashboard_id: i64) -> Value {
    let grid = |start_row: u32, col: u16| {
        json!({
            "sheetId": data_sheet_id,
            "startRowIndex": start_row,
            "endRowIndex": REMOTE_ROW_BOUND,
            "startColumnIndex": col,
            "endColumnIndex": col + 1,
        })
    };

    let (chart_spec, anchor) = match *chart {
        ChartSpec::StatusBreakdown {
            title,
            source_column,
            anchor,
            ..
        } => (
            json!({
                "title": title,
                "pieChart": {
                    "legendPosition": "RIGHT_LEGEND",
                    "domain": { "sourceRange": { "sources": [grid(FIRST_DATA_ROW, source_column)] } },
                    // Row 0 included so the header cell names the series
                    "series": { "sourceRange": { "sources": [grid(0, source_column)] } },
                },
            }),
            anchor,
        ),
        ChartSpec::ApplicationsOverTime {
            title,
            category_column,
            value_column,
            x_axis,
            y_axis,
            anchor,
        } => (
            json!({
                "title": title,
                "basicChart": {
                    "chartType": "LINE",
                    "headerCount": 1,
                    "axis": [
                        { "position": "BOTTOM_AXIS", "title": x_axis },
                        { "position": "LEFT_AXIS", "title": y_axis },
                    ],
                    "domains": [{ "domain": { "sourceRange": { "sources": [grid(0, category_column)] } } }],
                    "series": [{
                        "series": { "sourceRange": { "sources": [grid(0, value_column)] } },
                        "targetAxis": "LEFT_AXIS",
                    }],
                },
            }),
            anchor,
        ),
    };

    json!({ "addChart": { "chart": {
        "spec": chart_spec,
        "position": { "overlayPosition": { "anchorCell": {
            "sheetId": dashboard_id,
            "rowIndex": anchor.row,
            "columnIndex": anchor.col,
        }}},
    }}})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::spec_builder::TrackerSpecBuilder;
    use std::io::Write;

    fn request_kinds(requests: &[Value]) -> Vec<&str> {
        requests
            .iter()
            .map(|r| {
                r.as_object()
                    .and_then(|o| o.keys().next())
                    .map(String::as_str)
                    .unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_missing_credentials_is_an_idempotent_no_op() {
        let spec = TrackerSpecBuilder::new().build();
        let sink = SheetsApiSink::new(None, "Job Tracker".to_string());

        for _ in 0..2 {
            let error = sink.materialize(&spec).await.unwrap_err();
            assert!(matches!(error, SinkError::CredentialsRequired));
        }
    }

    #[tokio::test]
    async fn test_unreadable_credentials_are_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();

        let spec = TrackerSpecBuilder::new().build();
        let sink = SheetsApiSink::new(Some(file.path().to_path_buf()), "Job Tracker".to_string());
        let error = sink.materialize(&spec).await.unwrap_err();
        assert!(matches!(error, SinkError::CredentialsUnreadable { .. }));
    }

    #[test]
    fn test_batch_covers_the_whole_instruction_set() {
        let spec = TrackerSpecBuilder::new().build();
        let requests = build_requests(&spec, 0);
        let kinds = request_kinds(&requests);

        assert_eq!(
            kinds.iter().filter(|k| **k == "addConditionalFormatRule").count(),
            7
        );
        assert_eq!(kinds.iter().filter(|k| **k == "setDataValidation").count(), 1);
        assert_eq!(
            kinds.iter().filter(|k| **k == "updateDimensionProperties").count(),
            12
        );
        assert_eq!(kinds.iter().filter(|k| **k == "addSheet").count(), 1);
        assert_eq!(kinds.iter().filter(|k| **k == "addChart").count(), 2);
        assert!(kinds.contains(&"updateSheetProperties"));
        // 1 header + 12 widths + 1 validation + 7 highlights + 1 freeze
        // + 1 addSheet + 6 cards + 2 charts
        assert_eq!(requests.len(), 31);
    }

    #[test]
    fn test_basic_tracker_batch_has_no_dashboard_requests() {
        let spec = TrackerSpecBuilder::new().with_dashboard(false).build();
        let requests = build_requests(&spec, 0);
        let kinds = request_kinds(&requests);
        assert!(!kinds.contains(&"addSheet"));
        assert!(!kinds.contains(&"addChart"));
        assert_eq!(requests.len(), 22);
    }

    #[test]
    fn test_highlight_requests_span_all_twelve_columns() {
        let spec = TrackerSpecBuilder::new().build();
        for request in build_requests(&spec, 0) {
            let Some(rule) = request.pointer("/addConditionalFormatRule/rule") else {
                continue;
            };
            let range = &rule["ranges"][0];
            assert_eq!(range["startRowIndex"], 1);
            assert_eq!(range["startColumnIndex"], 0);
            assert_eq!(range["endColumnIndex"], 12);
        }
    }

    #[test]
    fn test_metric_formula_uses_the_remote_bound() {
        let spec = TrackerSpecBuilder::new().build();
        let card = &spec.dashboard.as_ref().unwrap().cards[0];
        assert_eq!(
            metric_formula(card, spec.sheet_name),
            "=COUNTA('Job Applications'!I2:I1000)"
        );
    }
}

// Main entry point - Configuration, spec building, sink selection
mod application;
mod domain;
mod infrastructure;
mod presentation;

use clap::Parser;

use crate::application::sink::{Artifact, TrackerSink};
use crate::application::spec_builder::TrackerSpecBuilder;
use crate::infrastructure::config::{load_tracker_config, Backend};
use crate::infrastructure::sheets_sink::SheetsApiSink;
use crate::infrastructure::xlsx_sink::XlsxWorkbookSink;
use crate::presentation::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let file_config = load_tracker_config()?;
    let config = cli.into_config(file_config);

    // The spec is built in full before the sink sees any of it
    let spec = TrackerSpecBuilder::new()
        .with_dashboard(config.include_dashboard)
        .with_seed_rows(config.seed_rows)
        .build();

    let sink: Box<dyn TrackerSink> = match config.backend {
        Backend::Local => Box::new(XlsxWorkbookSink::new(config.output_path.clone())),
        Backend::Remote => Box::new(SheetsApiSink::new(
            config.credentials_path.clone(),
            config.document_name.clone(),
        )),
    };

    match sink.materialize(&spec).await? {
        Artifact::LocalFile(path) => {
            println!("Job tracker created successfully: {}", path.display());
        }
        Artifact::RemoteDocument { url } => {
            println!("Job tracker created successfully: {url}");
        }
    }

    Ok(())
}

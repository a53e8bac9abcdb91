// CLI surface: explicit flags instead of interactive prompts
use crate::infrastructure::config::{
    AppConfig, Backend, TrackerConfig, DEFAULT_DOCUMENT_NAME, DEFAULT_OUTPUT_FILE,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "job-tracker-sheets",
    about = "Generate a job-application tracking spreadsheet",
    version
)]
pub struct Cli {
    /// Where to materialize the tracker
    #[arg(long, value_enum, default_value = "local")]
    pub backend: BackendArg,

    /// Output path for the local workbook
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Credentials JSON file for the remote backend
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Title for the remote document
    #[arg(long)]
    pub document_name: Option<String>,

    /// Skip the dashboard sheet (cards and charts)
    #[arg(long)]
    pub no_dashboard: bool,

    /// Write a few demonstration rows into the tracker
    #[arg(long)]
    pub seed_rows: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Local,
    Remote,
}

impl Cli {
    /// Merge flags over the file config over the built-in defaults.
    pub fn into_config(self, file: TrackerConfig) -> AppConfig {
        let defaults = file.tracker;
        AppConfig {
            backend: match self.backend {
                BackendArg::Local => Backend::Local,
                BackendArg::Remote => Backend::Remote,
            },
            output_path: self
                .output
                .or(defaults.output_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE)),
            credentials_path: self.credentials.or(defaults.credentials_file),
            document_name: self
                .document_name
                .or(defaults.document_name)
                .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string()),
            include_dashboard: !self.no_dashboard,
            seed_rows: self.seed_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["job-tracker-sheets"]).unwrap();
        let config = cli.into_config(TrackerConfig::default());
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.output_path, PathBuf::from("Job_Tracker.xlsx"));
        assert_eq!(config.document_name, "Job Tracker");
        assert!(config.credentials_path.is_none());
        assert!(config.include_dashboard);
        assert!(!config.seed_rows);
    }

    #[test]
    fn test_flags_override_file_config() {
        let cli = Cli::try_parse_from([
            "job-tracker-sheets",
            "--backend",
            "remote",
            "--credentials",
            "creds.json",
            "--document-name",
            "Search 2026",
            "--no-dashboard",
        ])
        .unwrap();

        let mut file = TrackerConfig::default();
        file.tracker.document_name = Some("From File".to_string());
        file.tracker.credentials_file = Some(PathBuf::from("file-creds.json"));

        let config = cli.into_config(file);
        assert_eq!(config.backend, Backend::Remote);
        assert_eq!(config.credentials_path, Some(PathBuf::from("creds.json")));
        assert_eq!(config.document_name, "Search 2026");
        assert!(!config.include_dashboard);
    }

    #[test]
    fn test_file_config_fills_gaps() {
        let cli = Cli::try_parse_from(["job-tracker-sheets", "--backend", "remote"]).unwrap();
        let mut file = TrackerConfig::default();
        file.tracker.credentials_file = Some(PathBuf::from("file-creds.json"));

        let config = cli.into_config(file);
        assert_eq!(
            config.credentials_path,
            Some(PathBuf::from("file-creds.json"))
        );
    }
}

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_FILE: &str = "Job_Tracker.xlsx";
pub const DEFAULT_DOCUMENT_NAME: &str = "Job Tracker";

/// Which sink materializes the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Local,
    Remote,
}

/// Resolved run configuration: CLI flags merged over the optional config
/// file merged over the built-in defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: Backend,
    pub output_path: PathBuf,
    pub credentials_path: Option<PathBuf>,
    pub document_name: String,
    pub include_dashboard: bool,
    pub seed_rows: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TrackerConfig {
    #[serde(default)]
    pub tracker: TrackerDefaults,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TrackerDefaults {
    pub output_file: Option<PathBuf>,
    pub document_name: Option<String>,
    pub credentials_file: Option<PathBuf>,
}

/// Load `config/tracker.toml` if present; an absent file yields defaults.
pub fn load_tracker_config() -> anyhow::Result<TrackerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/tracker").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

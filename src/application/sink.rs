// Sink trait for materializing a tracker spec
use crate::domain::tracker_spec::TrackerSpec;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Where the materialized tracker ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    LocalFile(PathBuf),
    RemoteDocument { url: String },
}

/// Failures a sink can report. Callers can tell "no credentials" apart from
/// "the API rejected the batch" apart from "network unreachable".
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("the remote backend requires a credentials file; none was supplied")]
    CredentialsRequired,

    #[error("credentials file {path} could not be read: {reason}")]
    CredentialsUnreadable { path: PathBuf, reason: String },

    #[error("remote API rejected the request (HTTP {status}): {message}")]
    ApiRejected { status: u16, message: String },

    #[error("network error talking to the remote API: {0}")]
    Network(String),

    #[error("failed to write workbook: {0}")]
    Workbook(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A sink turns the abstract instruction set into a concrete spreadsheet
/// artifact. The spec is complete before `materialize` is called; sinks may
/// apply its instructions in any order they like.
#[async_trait]
pub trait TrackerSink: Send + Sync {
    async fn materialize(&self, spec: &TrackerSpec) -> Result<Artifact, SinkError>;
}

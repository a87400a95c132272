//! Error types emitted by the Carefinder CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use carefinder_core::{QueryError, RankingError};
use carefinder_data::{DatasetError, ProviderBuildError};
use thiserror::Error;

/// Errors emitted by the Carefinder CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the command-line flag.
        field: &'static str,
        /// Environment variable that also supplies the value.
        env: &'static str,
    },
    /// An option holds a value outside its accepted range.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        /// Name of the command-line flag.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Name of the command-line flag.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Name of the command-line flag.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Name of the command-line flag.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The facility dataset could not be loaded.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// The service or preferences were rejected.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// Constructing an HTTP maps provider failed.
    #[error("failed to build maps provider for {base_url:?}: {source}")]
    BuildProvider {
        /// Base URL the provider was configured with.
        base_url: String,
        /// Underlying construction error.
        #[source]
        source: ProviderBuildError,
    },
    /// A ranking stage left no facilities to recommend.
    #[error(transparent)]
    NotFound(#[from] RankingError),
    /// Serialising the recommendations failed.
    #[error("failed to serialise recommendations: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the recommendations failed.
    #[error("failed to write recommendations: {0}")]
    WriteOutput(#[source] std::io::Error),
}

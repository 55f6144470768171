//! Error types emitted by the hazard CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use hazard_core::{FetchError, HazardExportError, RegionError, TransportError};
use hazard_data::ClientBuildError;
use thiserror::Error;

/// Errors emitted by the hazard CLI.
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
        /// Argument name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The pagination strategy name is not recognised.
    #[error("unknown strategy `{value}` (expected `offset` or `links`)")]
    UnknownStrategy {
        /// Value as configured.
        value: String,
    },
    /// A numeric option was zero where a positive value is required.
    #[error("--{field} must be greater than zero")]
    ZeroValue {
        /// Argument name.
        field: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Argument name.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Argument name.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Argument name.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening an input feature collection failed.
    #[error("failed to open feature collection at {path:?}: {source}")]
    OpenInput {
        /// Input path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// An input file is not a GeoJSON feature collection.
    #[error("failed to parse feature collection at {path:?}: {source}")]
    ParseInput {
        /// Input path.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The bounding box option is malformed or invalid.
    #[error("invalid --bbox: {0}")]
    InvalidBoundingBox(#[from] RegionError),
    /// The requested feature index is past the end of the collection.
    #[error("feature index {index} is out of range for a collection of {len} features")]
    FeatureIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Collection length.
        len: usize,
    },
    /// Constructing the HTTP client failed.
    #[error("failed to build feature API client for {base_url:?}: {source}")]
    BuildClient {
        /// Configured base URL.
        base_url: String,
        /// Underlying failure.
        #[source]
        source: ClientBuildError,
    },
    /// The paginated fetch failed.
    #[error("failed to fetch collection {collection:?}: {source}")]
    Fetch {
        /// Collection identifier.
        collection: String,
        /// Underlying failure.
        #[source]
        source: FetchError,
    },
    /// The tiles availability probe failed.
    #[error("failed to probe tiles for {collection:?}: {source}")]
    ProbeTiles {
        /// Collection identifier.
        collection: String,
        /// Underlying failure.
        #[source]
        source: TransportError,
    },
    /// Exporting a feature failed.
    #[error(transparent)]
    Export(#[from] HazardExportError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output to a file failed.
    #[error("failed to write output to {path:?}: {source}")]
    WriteOutputFile {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// Writing command output to stdout failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

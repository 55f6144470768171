//! Command-line interface for fetching and preparing hazard datasets.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};

mod error;
mod export;
mod fetch;
mod fs;
mod input;
mod inspect;
mod select;
mod tiles;

pub use error::CliError;

use export::ExportCsvArgs;
use fetch::FetchArgs;
use inspect::InspectArgs;
use select::SelectArgs;
use tiles::TilesArgs;

/// Server used when no base URL is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

pub(crate) const ARG_API_BASE_URL: &str = "api-base-url";
pub(crate) const ARG_BBOX: &str = "bbox";
pub(crate) const ARG_COLLECTION: &str = "collection";
pub(crate) const ARG_FEATURE_INDEX: &str = "feature-index";
pub(crate) const ARG_INPUT: &str = "input";
pub(crate) const ARG_MAX_REQUESTS: &str = "max-requests";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_PAGE_SIZE: &str = "page-size";
pub(crate) const ARG_PROBE: &str = "probe";
pub(crate) const ARG_STRATEGY: &str = "strategy";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";

pub(crate) const ENV_FETCH_COLLECTION: &str = "HAZARD_CMDS_FETCH_COLLECTION";
pub(crate) const ENV_SELECT_INPUT: &str = "HAZARD_CMDS_SELECT_INPUT";
pub(crate) const ENV_EXPORT_CSV_INPUT: &str = "HAZARD_CMDS_EXPORT_CSV_INPUT";
pub(crate) const ENV_INSPECT_INPUT: &str = "HAZARD_CMDS_INSPECT_INPUT";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments, configuration or the selected
/// command fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_with(cli.command, &mut stdout)
}

fn run_with(command: Command, stdout: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Fetch(args) => fetch::run_fetch(args, stdout),
        Command::Select(args) => select::run_select(args, stdout),
        Command::ExportCsv(args) => export::run_export_csv(args, stdout),
        Command::Inspect(args) => inspect::run_inspect(args, stdout),
        Command::Tiles(args) => tiles::run_tiles(args, stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "hazard",
    about = "Fetch and prepare hazard point datasets from an OGC API Features server",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download every feature of a collection.
    Fetch(FetchArgs),
    /// Keep the features inside a bounding box.
    Select(SelectArgs),
    /// Export one feature's properties as CSV.
    ExportCsv(ExportCsvArgs),
    /// Show popup rows and the run-up curve for one feature.
    Inspect(InspectArgs),
    /// List the served datasets and their vector tile endpoints.
    Tiles(TilesArgs),
}

/// Write `payload` to `path`, or to `stdout` when no path is configured.
pub(crate) fn emit(
    path: Option<&Utf8Path>,
    payload: &[u8],
    stdout: &mut dyn Write,
) -> Result<(), CliError> {
    match path {
        Some(target) => fs::write_utf8_file(target, payload).map_err(|source| {
            CliError::WriteOutputFile {
                path: target.to_path_buf(),
                source,
            }
        }),
        None => stdout
            .write_all(payload)
            .and_then(|()| stdout.write_all(b"\n"))
            .map_err(CliError::WriteOutput),
    }
}

#[cfg(test)]
mod tests;

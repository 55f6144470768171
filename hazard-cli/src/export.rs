//! `export-csv` command: one feature's properties as a CSV download.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use hazard_core::hazard::{csv_file_name, properties_csv};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::input::{load_collection, take_feature};
use crate::{ARG_FEATURE_INDEX, ARG_INPUT, ARG_OUTPUT, CliError, ENV_EXPORT_CSV_INPUT, fs};

/// CLI arguments for the `export-csv` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Write a header row of property names and a single row of \
                 values for one feature of a saved collection. Without \
                 --output the file is named after the feature id, e.g. \
                 hazard_point_42.csv, next to the input file.",
    about = "Export one feature's properties as CSV"
)]
#[ortho_config(prefix = "HAZARD")]
pub(crate) struct ExportCsvArgs {
    /// GeoJSON file written by `hazard fetch`.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Zero-based position of the feature in the collection.
    #[arg(long = ARG_FEATURE_INDEX, value_name = "n")]
    #[serde(default)]
    pub(crate) feature_index: Option<usize>,
    /// Destination file. Use `-` for stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl ExportCsvArgs {
    pub(crate) fn into_config(self) -> Result<ExportCsvConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ExportCsvConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExportCsvConfig {
    pub(crate) input: Utf8PathBuf,
    pub(crate) feature_index: usize,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<ExportCsvArgs> for ExportCsvConfig {
    type Error = CliError;

    fn try_from(args: ExportCsvArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_EXPORT_CSV_INPUT,
        })?;
        Ok(Self {
            input,
            feature_index: args.feature_index.unwrap_or_default(),
            output: args.output,
        })
    }
}

pub(crate) fn run_export_csv(args: ExportCsvArgs, stdout: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_export_csv_with_config(&config, stdout)
}

pub(crate) fn run_export_csv_with_config(
    config: &ExportCsvConfig,
    stdout: &mut dyn Write,
) -> Result<(), CliError> {
    let collection = load_collection(&config.input, ARG_INPUT)?;
    let feature = take_feature(collection, config.feature_index)?;
    let csv = properties_csv(&feature)?;

    let target = match &config.output {
        Some(path) if path.as_str() == "-" => {
            return stdout
                .write_all(csv.as_bytes())
                .map_err(CliError::WriteOutput);
        }
        Some(path) => path.clone(),
        None => config
            .input
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .map_or_else(
                || Utf8PathBuf::from(csv_file_name(&feature)),
                |dir| dir.join(csv_file_name(&feature)),
            ),
    };
    fs::write_utf8_file(&target, csv.as_bytes()).map_err(|source| CliError::WriteOutputFile {
        path: target.clone(),
        source,
    })?;
    info!("exported feature {} to {target}", config.feature_index);
    Ok(())
}

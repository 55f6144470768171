//! `inspect` command: popup rows and run-up data for one feature.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use hazard_core::hazard::{popup_rows, runup_curve, runup_variants};
use hazard_core::{Dataset, Feature, PopupRow, RunupPoint, RunupVariant};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::input::{load_collection, take_feature};
use crate::{
    ARG_COLLECTION, ARG_FEATURE_INDEX, ARG_INPUT, ARG_OUTPUT, CliError, ENV_INSPECT_INPUT, emit,
};

/// CLI arguments for the `inspect` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Print, as JSON, the property rows a map popup would show \
                 for one feature together with its run-up height curve and \
                 the alternative 500-year estimates. Priority properties \
                 and the combined Location row come from the catalogued \
                 dataset named by --collection.",
    about = "Show popup rows and the run-up curve for one feature"
)]
#[ortho_config(prefix = "HAZARD")]
pub(crate) struct InspectArgs {
    /// GeoJSON file written by `hazard fetch`.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Zero-based position of the feature in the collection.
    #[arg(long = ARG_FEATURE_INDEX, value_name = "n")]
    #[serde(default)]
    pub(crate) feature_index: Option<usize>,
    /// Catalogued collection the feature belongs to.
    #[arg(long = ARG_COLLECTION, value_name = "id")]
    #[serde(default)]
    pub(crate) collection: Option<String>,
    /// Write the report here instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl InspectArgs {
    pub(crate) fn into_config(self) -> Result<InspectConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        InspectConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InspectConfig {
    pub(crate) input: Utf8PathBuf,
    pub(crate) feature_index: usize,
    pub(crate) collection: Option<String>,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<InspectArgs> for InspectConfig {
    type Error = CliError;

    fn try_from(args: InspectArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_INSPECT_INPUT,
        })?;
        Ok(Self {
            input,
            feature_index: args.feature_index.unwrap_or_default(),
            collection: args.collection,
            output: args.output,
        })
    }
}

/// Everything a popup and its chart need for one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct FeatureReport {
    pub(crate) rows: Vec<PopupRow>,
    pub(crate) runup: Vec<RunupPoint>,
    pub(crate) variants: Vec<RunupVariant>,
}

impl FeatureReport {
    pub(crate) fn build(feature: &Feature, dataset: Option<&Dataset>) -> Self {
        Self {
            rows: dataset.map_or_else(
                || popup_rows(feature, &[]),
                |dataset| dataset.popup_rows(feature),
            ),
            runup: runup_curve(feature),
            variants: runup_variants(feature),
        }
    }
}

pub(crate) fn run_inspect(args: InspectArgs, stdout: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_inspect_with_config(&config, stdout)
}

pub(crate) fn run_inspect_with_config(
    config: &InspectConfig,
    stdout: &mut dyn Write,
) -> Result<(), CliError> {
    let collection = load_collection(&config.input, ARG_INPUT)?;
    let feature = take_feature(collection, config.feature_index)?;
    let dataset = config.collection.as_deref().and_then(Dataset::find);
    let report = FeatureReport::build(&feature, dataset);
    let payload = serde_json::to_vec_pretty(&report).map_err(CliError::SerialiseOutput)?;
    emit(config.output.as_deref(), &payload, stdout)
}

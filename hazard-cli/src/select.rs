//! `select` command: keep the features inside a bounding box.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use hazard_core::{BoundingBox, select_within};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::input::load_collection;
use crate::{ARG_BBOX, ARG_INPUT, ARG_OUTPUT, CliError, ENV_SELECT_INPUT, emit};

/// CLI arguments for the `select` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Filter a saved feature collection down to the features \
                 located inside a bounding box. Locations come from the \
                 Longitude and Latitude properties, falling back to Point \
                 geometry. The default box covers mainland Norway with a \
                 buffer.",
    about = "Keep the features inside a bounding box"
)]
#[ortho_config(prefix = "HAZARD")]
pub(crate) struct SelectArgs {
    /// GeoJSON file written by `hazard fetch`.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Box as `min_lon,min_lat,max_lon,max_lat`.
    #[arg(long = ARG_BBOX, value_name = "box", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) bbox: Option<String>,
    /// Write the selection here instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl SelectArgs {
    pub(crate) fn into_config(self) -> Result<SelectConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SelectConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SelectConfig {
    pub(crate) input: Utf8PathBuf,
    pub(crate) bbox: BoundingBox,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<SelectArgs> for SelectConfig {
    type Error = CliError;

    fn try_from(args: SelectArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_SELECT_INPUT,
        })?;
        let bbox = match args.bbox {
            Some(raw) => raw.parse::<BoundingBox>()?,
            None => BoundingBox::norway_buffered(),
        };
        Ok(Self {
            input,
            bbox,
            output: args.output,
        })
    }
}

pub(crate) fn run_select(args: SelectArgs, stdout: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_select_with_config(&config, stdout)
}

pub(crate) fn run_select_with_config(
    config: &SelectConfig,
    stdout: &mut dyn Write,
) -> Result<(), CliError> {
    let collection = load_collection(&config.input, ARG_INPUT)?;
    let selection = select_within(&collection, &config.bbox);
    info!(
        "kept {} of {} features inside {}",
        selection.collection.len(),
        collection.len(),
        config.bbox
    );
    let payload =
        serde_json::to_vec_pretty(&selection.collection).map_err(CliError::SerialiseOutput)?;
    emit(config.output.as_deref(), &payload, stdout)
}

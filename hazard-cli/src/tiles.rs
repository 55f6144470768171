//! `tiles` command: the dataset catalogue resolved against a server.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use hazard_core::{CATALOGUE, TileSourceDescriptor};
use hazard_data::FeatureApiClient;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_API_BASE_URL, ARG_OUTPUT, ARG_PROBE, CliError, DEFAULT_API_BASE_URL, emit};

/// CLI arguments for the `tiles` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Print the catalogued datasets as vector tile source \
                 definitions for the given server. With --probe each \
                 collection's tileset listing is requested and the result \
                 is reported as `available`.",
    about = "List the served datasets and their vector tile endpoints"
)]
#[ortho_config(prefix = "HAZARD")]
pub(crate) struct TilesArgs {
    /// Base URL of the feature API server.
    #[arg(long = ARG_API_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) api_base_url: Option<String>,
    /// Check which collections publish tiles.
    #[arg(long = ARG_PROBE, num_args = 0..=1, default_missing_value = "true", value_name = "bool")]
    #[serde(default)]
    pub(crate) probe: Option<bool>,
    /// Write the listing here instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TilesArgs {
    pub(crate) fn into_config(self) -> Result<TilesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(TilesConfig::from(merged))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TilesConfig {
    pub(crate) api_base_url: String,
    pub(crate) probe: bool,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl From<TilesArgs> for TilesConfig {
    fn from(args: TilesArgs) -> Self {
        Self {
            api_base_url: args
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned()),
            probe: args.probe.unwrap_or(false),
            output: args.output,
        }
    }
}

/// A tile source with the optional probe result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct TileListing {
    #[serde(flatten)]
    pub(crate) source: TileSourceDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) available: Option<bool>,
}

pub(crate) fn run_tiles(args: TilesArgs, stdout: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_tiles_with_config(&config, stdout)
}

pub(crate) fn run_tiles_with_config(
    config: &TilesConfig,
    stdout: &mut dyn Write,
) -> Result<(), CliError> {
    let listings = build_listings(config)?;
    let payload = serde_json::to_vec_pretty(&listings).map_err(CliError::SerialiseOutput)?;
    emit(config.output.as_deref(), &payload, stdout)
}

fn build_listings(config: &TilesConfig) -> Result<Vec<TileListing>, CliError> {
    let client = if config.probe {
        Some(
            FeatureApiClient::new(config.api_base_url.as_str()).map_err(|source| {
                CliError::BuildClient {
                    base_url: config.api_base_url.clone(),
                    source,
                }
            })?,
        )
    } else {
        None
    };

    CATALOGUE
        .iter()
        .map(|dataset| {
            let available = client
                .as_ref()
                .map(|client| {
                    client
                        .tiles_available(dataset.collection_id)
                        .map_err(|source| CliError::ProbeTiles {
                            collection: dataset.collection_id.to_owned(),
                            source,
                        })
                })
                .transpose()?;
            if available == Some(false) {
                info!("{} does not publish tiles", dataset.collection_id);
            }
            Ok(TileListing {
                source: dataset.tile_source(&config.api_base_url),
                available,
            })
        })
        .collect()
}

//! `fetch` command: download a whole collection into one GeoJSON document.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use hazard_core::fetch::{DEFAULT_PAGE_SIZE, MAX_REQUESTS};
use hazard_core::{FetchLimits, FetchOutcome, FetchRequest, PageFetchStrategy};
use hazard_data::{DEFAULT_TIMEOUT, FeatureApiClient, HttpPageSourceConfig};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_API_BASE_URL, ARG_COLLECTION, ARG_MAX_REQUESTS, ARG_OUTPUT, ARG_PAGE_SIZE, ARG_STRATEGY,
    ARG_TIMEOUT_SECS, CliError, DEFAULT_API_BASE_URL, ENV_FETCH_COLLECTION, emit,
};

const STRATEGY_OFFSET: &str = "offset";
const STRATEGY_LINKS: &str = "links";

/// CLI arguments for the `fetch` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Walk every page of a collection's item listing and write \
                 the concatenated features as a single GeoJSON \
                 FeatureCollection. Pages are requested one at a time and \
                 the walk stops at an empty or short page, when no next \
                 link remains, or at the request ceiling.",
    about = "Download every feature of a collection"
)]
#[ortho_config(prefix = "HAZARD")]
pub(crate) struct FetchArgs {
    /// Collection identifier, e.g. `points`.
    #[arg(value_name = "collection")]
    #[serde(default)]
    pub(crate) collection: Option<String>,
    /// Base URL of the feature API server.
    #[arg(long = ARG_API_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) api_base_url: Option<String>,
    /// Pagination style: `offset` (default) or `links`.
    #[arg(long = ARG_STRATEGY, value_name = "name")]
    #[serde(default)]
    pub(crate) strategy: Option<String>,
    /// Page size requested by the `links` strategy.
    #[arg(long = ARG_PAGE_SIZE, value_name = "n")]
    #[serde(default)]
    pub(crate) page_size: Option<u32>,
    /// Maximum number of page requests before giving up.
    #[arg(long = ARG_MAX_REQUESTS, value_name = "n")]
    #[serde(default)]
    pub(crate) max_requests: Option<u32>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Write the collection here instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl FetchArgs {
    pub(crate) fn into_config(self) -> Result<FetchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FetchConfig::try_from(merged)
    }
}

/// Resolved `fetch` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FetchConfig {
    pub(crate) collection: String,
    pub(crate) api_base_url: String,
    pub(crate) strategy: PageFetchStrategy,
    pub(crate) max_requests: u32,
    pub(crate) timeout: Duration,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl FetchConfig {
    fn request(&self) -> Result<FetchRequest, CliError> {
        let request = FetchRequest::new(
            self.api_base_url.as_str(),
            self.collection.as_str(),
            self.strategy,
        )
        .map_err(|source| CliError::Fetch {
            collection: self.collection.clone(),
            source,
        })?;
        Ok(request.with_limits(FetchLimits::default().with_max_requests(self.max_requests)))
    }
}

impl TryFrom<FetchArgs> for FetchConfig {
    type Error = CliError;

    fn try_from(args: FetchArgs) -> Result<Self, Self::Error> {
        let collection = args
            .collection
            .filter(|value| !value.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_COLLECTION,
                env: ENV_FETCH_COLLECTION,
            })?;
        let page_size = positive(args.page_size.unwrap_or(DEFAULT_PAGE_SIZE), ARG_PAGE_SIZE)?;
        let strategy = parse_strategy(args.strategy.as_deref(), page_size)?;
        let max_requests = positive(args.max_requests.unwrap_or(MAX_REQUESTS), ARG_MAX_REQUESTS)?;
        let timeout = match args.timeout_secs {
            Some(secs) => Duration::from_secs(positive(secs, ARG_TIMEOUT_SECS)?),
            None => DEFAULT_TIMEOUT,
        };
        Ok(Self {
            collection,
            api_base_url: args
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned()),
            strategy,
            max_requests,
            timeout,
            output: args.output,
        })
    }
}

fn positive<T: Default + PartialEq>(value: T, field: &'static str) -> Result<T, CliError> {
    if value == T::default() {
        Err(CliError::ZeroValue { field })
    } else {
        Ok(value)
    }
}

fn parse_strategy(value: Option<&str>, page_size: u32) -> Result<PageFetchStrategy, CliError> {
    match value.map(str::trim) {
        None | Some(STRATEGY_OFFSET) => Ok(PageFetchStrategy::OffsetIncrement),
        Some(STRATEGY_LINKS) => Ok(PageFetchStrategy::link_following(page_size)),
        Some(other) => Err(CliError::UnknownStrategy {
            value: other.to_owned(),
        }),
    }
}

pub(crate) fn run_fetch(args: FetchArgs, stdout: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_fetch_with_config(&config, stdout)
}

pub(crate) fn run_fetch_with_config(
    config: &FetchConfig,
    stdout: &mut dyn Write,
) -> Result<(), CliError> {
    let outcome = execute_fetch(config)?;
    let payload =
        serde_json::to_vec_pretty(&outcome.collection).map_err(CliError::SerialiseOutput)?;
    emit(config.output.as_deref(), &payload, stdout)?;
    info!(
        "wrote {} features of {} from {} requests{}",
        outcome.collection.len(),
        config.collection,
        outcome.requests,
        if outcome.is_complete() { "" } else { " (truncated)" }
    );
    Ok(())
}

fn execute_fetch(config: &FetchConfig) -> Result<FetchOutcome, CliError> {
    let request = config.request()?;
    let transport = HttpPageSourceConfig::default().with_timeout(config.timeout);
    let client = FeatureApiClient::with_config(request.base_url(), transport).map_err(
        |source| CliError::BuildClient {
            base_url: config.api_base_url.clone(),
            source,
        },
    )?;
    client.fetch(&request).map_err(|source| CliError::Fetch {
        collection: config.collection.clone(),
        source,
    })
}

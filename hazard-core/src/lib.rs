//! Core domain types for the hazard atlas.
//!
//! Responsibilities:
//! - Model GeoJSON features and collections without interpreting them.
//! - Accumulate paginated item listings into one collection.
//! - Describe the served datasets and their tile endpoints.
//! - Derive presentation data (popup rows, run-up curves, CSV rows).
//!
//! Boundaries:
//! - No network I/O lives here; transports implement [`PageSource`].
//! - No global mutable state. Each fetch owns its accumulator.

#![forbid(unsafe_code)]

pub mod catalogue;
mod feature;
pub mod fetch;
pub mod hazard;
pub mod region;
mod source;

#[doc(hidden)]
pub mod test_support;

pub use catalogue::{CATALOGUE, Dataset, GeometryKind, MapFocus, TileSourceDescriptor, probe_tiles};
pub use feature::{Feature, FeatureCollection};
pub use fetch::{
    FetchError, FetchLimits, FetchOutcome, FetchRequest, FetchWarning, PageFetchStrategy,
    fetch_all,
};
pub use hazard::{HazardExportError, PopupRow, RunupPoint, RunupVariant};
pub use region::{BoundingBox, RegionError, RegionSelection, select_within};
pub use source::{PageSource, TransportError, trim_base_url};

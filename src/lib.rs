//! Facade crate for the hazard atlas.
//!
//! This crate re-exports the core domain types and, behind the default
//! `http` feature, the reqwest-backed feature API client.
//!
//! ```
//! use hazard_atlas::{BoundingBox, Dataset, FetchRequest, PageFetchStrategy};
//!
//! let request = FetchRequest::new("http://localhost:5000", "points", PageFetchStrategy::default())?;
//! assert_eq!(
//!     request.offset_url(0),
//!     "http://localhost:5000/collections/points/items?offset=0"
//! );
//! assert!(Dataset::find("points").is_some());
//! assert!(BoundingBox::default().contains(10.75, 59.91));
//! # Ok::<(), hazard_atlas::FetchError>(())
//! ```

#![forbid(unsafe_code)]

pub use hazard_core::{
    BoundingBox, CATALOGUE, Dataset, Feature, FeatureCollection, FetchError, FetchLimits,
    FetchOutcome, FetchRequest, FetchWarning, GeometryKind, HazardExportError, MapFocus,
    PageFetchStrategy, PageSource, PopupRow, RegionError, RegionSelection, RunupPoint,
    RunupVariant, TileSourceDescriptor, TransportError, fetch_all, probe_tiles, select_within,
};
pub use hazard_core::hazard;

#[cfg(feature = "http")]
pub use hazard_data::{ClientBuildError, FeatureApiClient, HttpPageSource, HttpPageSourceConfig};

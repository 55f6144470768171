//! The datasets served by the feature API and their vector tile sources.
//!
//! Each [`Dataset`] records what a renderer needs to add the layer: the
//! collection id used in URLs, the layer name inside the Mapbox Vector Tile
//! payload, the zoom range and the data bounds.

use log::{debug, info};
use serde::Serialize;

use crate::feature::Feature;
use crate::hazard::{PopupRow, located_popup_rows, popup_rows};
use crate::source::{PageSource, TransportError, trim_base_url};

/// Geometry type carried by a dataset's features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    /// Point features, drawn as circles.
    Point,
    /// Polygon features, drawn as fills with outlines.
    Polygon,
}

/// A camera position a viewer can jump to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapFocus {
    /// `[longitude, latitude]`.
    pub center: [f64; 2],
    /// Zoom level.
    pub zoom: f64,
}

/// Static description of one served collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dataset {
    /// Collection identifier used in API paths.
    pub collection_id: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// Layer name inside the vector tiles.
    pub source_layer: &'static str,
    /// Geometry of the features.
    pub geometry: GeometryKind,
    /// Lowest zoom level with tiles.
    pub min_zoom: u8,
    /// Highest zoom level with tiles.
    pub max_zoom: u8,
    /// Data extent as `[min_lon, min_lat, max_lon, max_lat]`.
    pub bounds: [f64; 4],
    /// Properties shown first in popups, in this order.
    pub priority_properties: &'static [&'static str],
    /// Collapse `Longitude` and `Latitude` into one `Location` popup row.
    pub location_row: bool,
    /// Where a "fly to" control should take the viewer.
    pub focus: MapFocus,
}

/// Every dataset the viewer overlays.
pub const CATALOGUE: &[Dataset] = &[
    Dataset {
        collection_id: "hazardglobal",
        title: "Global Hazard Points",
        source_layer: "globalhazardpoints",
        geometry: GeometryKind::Point,
        min_zoom: 0,
        max_zoom: 15,
        bounds: [-180.0, -90.0, 180.0, 90.0],
        priority_properties: &[],
        location_row: false,
        focus: MapFocus {
            center: [0.0, 20.0],
            zoom: 2.0,
        },
    },
    Dataset {
        collection_id: "points",
        title: "Norway Hazard Points",
        source_layer: "points",
        geometry: GeometryKind::Point,
        min_zoom: 0,
        max_zoom: 15,
        bounds: crate::region::NORWAY_BUFFERED,
        priority_properties: &["Magnitude", "Year"],
        location_row: true,
        focus: MapFocus {
            center: [10.7522, 59.9139],
            zoom: 5.0,
        },
    },
    Dataset {
        collection_id: "hyderabad",
        title: "Hyderabad Wards",
        source_layer: "greater_hyderabad_municipal_corporation_ward_Boundaries",
        geometry: GeometryKind::Polygon,
        min_zoom: 0,
        max_zoom: 16,
        bounds: [78.23792, 17.290806, 78.621705, 17.561844],
        priority_properties: &["ward_lgd_name", "townname", "state"],
        location_row: false,
        focus: MapFocus {
            center: [78.483582, 17.426649],
            zoom: 10.0,
        },
    },
];

impl Dataset {
    /// Look up a dataset by collection id.
    ///
    /// # Examples
    /// ```
    /// use hazard_core::Dataset;
    ///
    /// let wards = Dataset::find("hyderabad").expect("catalogued");
    /// assert_eq!(wards.max_zoom, 16);
    /// assert!(Dataset::find("unknown").is_none());
    /// ```
    #[must_use]
    pub fn find(collection_id: &str) -> Option<&'static Self> {
        CATALOGUE
            .iter()
            .find(|dataset| dataset.collection_id == collection_id)
    }

    /// Popup rows for one of this dataset's features.
    #[must_use]
    pub fn popup_rows(&self, feature: &Feature) -> Vec<PopupRow> {
        if self.location_row {
            located_popup_rows(feature, self.priority_properties)
        } else {
            popup_rows(feature, self.priority_properties)
        }
    }

    /// Vector tile URL template with `{z}`, `{y}` and `{x}` placeholders.
    #[must_use]
    pub fn tile_url_template(&self, base_url: &str) -> String {
        format!(
            "{}/collections/{}/tiles/WebMercatorQuad/{{z}}/{{y}}/{{x}}?f=mvt",
            trim_base_url(base_url),
            self.collection_id
        )
    }

    /// The collection's tileset listing, used to check tile support.
    #[must_use]
    pub fn tiles_url(&self, base_url: &str) -> String {
        tiles_url(base_url, self.collection_id)
    }

    /// Resolve the dataset against a server into a renderer-ready descriptor.
    #[must_use]
    pub fn tile_source(&self, base_url: &str) -> TileSourceDescriptor {
        TileSourceDescriptor {
            collection_id: self.collection_id.to_owned(),
            title: self.title.to_owned(),
            source_layer: self.source_layer.to_owned(),
            geometry: self.geometry,
            tiles: vec![self.tile_url_template(base_url)],
            minzoom: self.min_zoom,
            maxzoom: self.max_zoom,
            bounds: self.bounds,
            focus: self.focus,
        }
    }
}

/// A dataset resolved against one server, shaped like a vector source
/// definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileSourceDescriptor {
    /// Collection identifier.
    pub collection_id: String,
    /// Human-readable title.
    pub title: String,
    /// Layer name inside the tiles.
    #[serde(rename = "source-layer")]
    pub source_layer: String,
    /// Geometry of the features.
    pub geometry: GeometryKind,
    /// Tile URL templates.
    pub tiles: Vec<String>,
    /// Lowest zoom level with tiles.
    pub minzoom: u8,
    /// Highest zoom level with tiles.
    pub maxzoom: u8,
    /// Data extent.
    pub bounds: [f64; 4],
    /// Suggested camera position.
    pub focus: MapFocus,
}

fn tiles_url(base_url: &str, collection_id: &str) -> String {
    format!(
        "{}/collections/{collection_id}/tiles",
        trim_base_url(base_url)
    )
}

/// Check whether the server publishes tiles for `collection_id`.
///
/// Returns `Ok(false)` when the server answers with an error status, so a
/// caller can skip the layer.
///
/// # Errors
///
/// Timeouts and network failures are propagated unchanged.
pub async fn probe_tiles<S: PageSource + ?Sized>(
    source: &S,
    base_url: &str,
    collection_id: &str,
) -> Result<bool, TransportError> {
    let url = tiles_url(base_url, collection_id);
    debug!("probing {url}");
    match source.fetch(&url).await {
        Ok(_) => Ok(true),
        Err(TransportError::Http { status, .. }) => {
            info!("tiles endpoint for {collection_id} unavailable (status {status})");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

//! Filter feature collections to an axis-aligned lon/lat box.
//!
//! Coordinates are read from the `Longitude` and `Latitude` properties that
//! the hazard datasets carry, falling back to `Point` geometry. Boundary
//! points count as inside.

use std::fmt;
use std::str::FromStr;

use geo::{Coord, Intersects, Rect};
use log::{debug, warn};
use thiserror::Error;

use crate::{Feature, FeatureCollection};

/// Norway with roughly a 100 km buffer: `[min_lon, min_lat, max_lon, max_lat]`.
pub const NORWAY_BUFFERED: [f64; 4] = [3.0, 56.0, 32.0, 72.0];

/// Errors raised while constructing or parsing a [`BoundingBox`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    /// A bound was NaN or infinite.
    #[error("bounding box values must be finite")]
    NonFinite,
    /// A minimum exceeded its maximum.
    #[error("bounding box is inverted: min ({min}) exceeds max ({max}) on the {axis} axis")]
    Inverted {
        /// `"longitude"` or `"latitude"`.
        axis: &'static str,
        /// Offending minimum.
        min: f64,
        /// Offending maximum.
        max: f64,
    },
    /// The textual form did not hold four comma-separated numbers.
    #[error("expected `min_lon,min_lat,max_lon,max_lat`, got `{input}`")]
    Malformed {
        /// Input as given.
        input: String,
    },
}

/// Inclusive WGS84 bounding box (`x = longitude`, `y = latitude`).
///
/// Regions crossing the antimeridian are not modelled.
///
/// # Examples
/// ```
/// use hazard_core::BoundingBox;
///
/// let norway = BoundingBox::norway_buffered();
/// assert!(norway.contains(10.75, 59.91));
/// assert!(norway.contains(3.0, 72.0));
/// assert!(!norway.contains(-0.12, 51.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox(Rect<f64>);

impl BoundingBox {
    /// Construct a box from its four bounds.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NonFinite`] for NaN or infinite bounds and
    /// [`RegionError::Inverted`] when a minimum exceeds its maximum.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self, RegionError> {
        if ![min_lon, min_lat, max_lon, max_lat]
            .iter()
            .all(|value| value.is_finite())
        {
            return Err(RegionError::NonFinite);
        }
        if min_lon > max_lon {
            return Err(RegionError::Inverted {
                axis: "longitude",
                min: min_lon,
                max: max_lon,
            });
        }
        if min_lat > max_lat {
            return Err(RegionError::Inverted {
                axis: "latitude",
                min: min_lat,
                max: max_lat,
            });
        }
        Ok(Self(Rect::new(
            Coord { x: min_lon, y: min_lat },
            Coord { x: max_lon, y: max_lat },
        )))
    }

    /// The buffered Norway box used to derive the `points` dataset.
    #[must_use]
    pub fn norway_buffered() -> Self {
        let [min_lon, min_lat, max_lon, max_lat] = NORWAY_BUFFERED;
        Self(Rect::new(
            Coord { x: min_lon, y: min_lat },
            Coord { x: max_lon, y: max_lat },
        ))
    }

    /// Whether the point lies inside the box or on its edge.
    #[must_use]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.0.intersects(&Coord { x: lon, y: lat })
    }

    /// Bounds as `[min_lon, min_lat, max_lon, max_lat]`.
    #[must_use]
    pub fn as_array(&self) -> [f64; 4] {
        let (min, max) = (self.0.min(), self.0.max());
        [min.x, min.y, max.x, max.y]
    }

    /// Borrow the underlying rectangle.
    #[must_use]
    pub const fn rect(&self) -> &Rect<f64> {
        &self.0
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::norway_buffered()
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [min_lon, min_lat, max_lon, max_lat] = self.as_array();
        write!(f, "{min_lon},{min_lat},{max_lon},{max_lat}")
    }
}

impl FromStr for BoundingBox {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RegionError::Malformed {
            input: s.to_owned(),
        };
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| malformed())?;
        match values.as_slice() {
            &[min_lon, min_lat, max_lon, max_lat] => Self::new(min_lon, min_lat, max_lon, max_lat),
            _ => Err(malformed()),
        }
    }
}

/// Result of [`select_within`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSelection {
    /// Features inside the box, in input order.
    pub collection: FeatureCollection,
    /// Features dropped because no usable coordinate was found.
    pub skipped: usize,
}

/// Keep the features whose location falls inside `bbox`.
///
/// Top-level members of the input such as `name` and `crs` carry over to the
/// selection, except `bbox`, which described the unfiltered extent.
///
/// # Examples
/// ```
/// use hazard_core::{BoundingBox, FeatureCollection, select_within};
/// use hazard_core::test_support::sample_features;
///
/// let input = FeatureCollection::new(sample_features(0, 5));
/// let selection = select_within(&input, &BoundingBox::norway_buffered());
/// assert_eq!(selection.collection.len(), 5);
/// assert_eq!(selection.skipped, 0);
/// ```
#[must_use]
pub fn select_within(collection: &FeatureCollection, bbox: &BoundingBox) -> RegionSelection {
    let members = collection
        .members()
        .iter()
        .filter(|(key, _)| key.as_str() != "bbox")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    let mut selection = RegionSelection {
        collection: FeatureCollection::default().with_members(members),
        skipped: 0,
    };
    for feature in collection {
        match feature_location(feature) {
            Some(location) if bbox.contains(location.x, location.y) => {
                selection.collection.push(feature.clone());
            }
            Some(_) => {}
            None => selection.skipped += 1,
        }
    }
    if selection.skipped > 0 {
        warn!(
            "skipped {} features without usable coordinates",
            selection.skipped
        );
    }
    debug!(
        "selected {} of {} features within {bbox}",
        selection.collection.len(),
        collection.len()
    );
    selection
}

fn feature_location(feature: &Feature) -> Option<Coord<f64>> {
    let lon = feature.property("Longitude").and_then(serde_json::Value::as_f64);
    let lat = feature.property("Latitude").and_then(serde_json::Value::as_f64);
    match (lon, lat) {
        (Some(x), Some(y)) => Some(Coord { x, y }),
        _ => feature.point_coordinates(),
    }
}

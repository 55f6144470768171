//! GeoJSON features and feature collections.
//!
//! A [`Feature`] is kept as an opaque JSON value: pagination concatenates
//! features and never inspects them. The few accessors here exist for the
//! region and popup helpers, which read `properties` and Point geometry.

use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single GeoJSON feature as returned by the feature API.
///
/// # Examples
/// ```
/// use hazard_core::Feature;
/// use serde_json::json;
///
/// let feature = Feature::new(json!({
///     "type": "Feature",
///     "geometry": { "type": "Point", "coordinates": [10.75, 59.91] },
///     "properties": { "Magnitude": 7.1 }
/// }));
/// assert_eq!(feature.property("Magnitude"), Some(&json!(7.1)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feature(Value);

impl Feature {
    /// Wrap a raw JSON value.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the raw JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume the feature and return the raw JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// The `properties` object, if present.
    #[must_use]
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.0.get("properties").and_then(Value::as_object)
    }

    /// A single property by key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties().and_then(|props| props.get(key))
    }

    /// Feature identifier: the top-level `id`, else `properties.id`.
    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        self.0
            .get("id")
            .filter(|value| !value.is_null())
            .or_else(|| self.property("id").filter(|value| !value.is_null()))
    }

    /// Coordinates of a `Point` geometry as `x = longitude`, `y = latitude`.
    #[must_use]
    pub fn point_coordinates(&self) -> Option<Coord<f64>> {
        let geometry = self.0.get("geometry")?;
        if geometry.get("type").and_then(Value::as_str) != Some("Point") {
            return None;
        }
        let coordinates = geometry.get("coordinates")?.as_array()?;
        let x = coordinates.first()?.as_f64()?;
        let y = coordinates.get(1)?.as_f64()?;
        Some(Coord { x, y })
    }
}

impl From<Value> for Feature {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
enum CollectionType {
    #[default]
    FeatureCollection,
}

/// An ordered GeoJSON `FeatureCollection`.
///
/// Serialises as `{ "type": "FeatureCollection", "features": [...] }` so the
/// output can be handed directly to a map renderer as a source. Any other
/// top-level members read from a document, such as `name` or `crs`, are kept
/// and written back between `type` and `features`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    kind: CollectionType,
    #[serde(flatten)]
    members: Map<String, Value>,
    #[serde(default)]
    features: Vec<Feature>,
}

impl FeatureCollection {
    /// Build a collection from features in the given order.
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionType::FeatureCollection,
            members: Map::new(),
            features,
        }
    }

    /// Replace the top-level members other than `type` and `features`.
    #[must_use]
    pub fn with_members(mut self, members: Map<String, Value>) -> Self {
        self.members = members;
        self
    }

    /// Top-level members other than `type` and `features`, in document order.
    #[must_use]
    pub const fn members(&self) -> &Map<String, Value> {
        &self.members
    }

    /// A single top-level member such as `crs`.
    #[must_use]
    pub fn member(&self, key: &str) -> Option<&Value> {
        self.members.get(key)
    }

    /// Features in arrival order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Consume the collection and return its features.
    #[must_use]
    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }

    /// Number of features held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Append a feature, preserving order.
    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Iterate over the features in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }
}

impl Extend<Feature> for FeatureCollection {
    fn extend<I: IntoIterator<Item = Feature>>(&mut self, iter: I) {
        self.features.extend(iter);
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

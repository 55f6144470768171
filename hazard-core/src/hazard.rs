//! Presentation data derived from hazard point properties.
//!
//! Covers the property table shown in a popup, the run-up height curve over
//! annual recurrence intervals (ARI), and the single-feature CSV download.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::Feature;

/// Properties never shown in popups.
pub const HIDDEN_PROPERTIES: [&str; 2] = ["id", "fid"];

/// Label of the row that merges `Longitude` and `Latitude`.
pub const LOCATION_LABEL: &str = "Location";

const LOCATION_KEYS: [&str; 2] = ["Longitude", "Latitude"];

/// Return periods, in years, plotted on the run-up curve.
pub const RETURN_PERIODS: [u32; 7] = [10, 50, 100, 200, 500, 1000, 2500];

/// Alternative 500-year estimates and their legend labels.
pub const RUNUP_VARIANTS: [(&str, &str); 4] = [
    ("ari500LL", "sigma=0.5"),
    ("ari500ZL", "sigma=0.0"),
    ("ari500M", "Lower 95%"),
    ("ari500P", "Upper 95%"),
];

/// One `key: value` line of a popup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupRow {
    /// Property name.
    pub key: String,
    /// Property value rendered as text.
    pub value: String,
}

/// A sample on the run-up curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunupPoint {
    /// Return period in years.
    pub return_period: u32,
    /// Run-up height in metres.
    pub height: f64,
}

/// A labelled single-point estimate drawn next to the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunupVariant {
    /// Property the value came from.
    pub key: &'static str,
    /// Legend label.
    pub label: &'static str,
    /// The estimate, always at the 500-year period.
    pub point: RunupPoint,
}

/// Errors raised while exporting a feature.
#[derive(Debug, Error)]
pub enum HazardExportError {
    /// The feature has no `properties` object.
    #[error("feature has no properties to export")]
    MissingProperties,
    /// The CSV writer failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    /// The CSV buffer could not be recovered from the writer.
    #[error("failed to flush CSV buffer: {0}")]
    Flush(String),
}

/// Build popup rows for `feature`.
///
/// Properties named in `priority` come first, in that order, when present
/// and non-null. The remaining properties follow in feature order. `id` and
/// `fid` are never shown.
///
/// # Examples
/// ```
/// use hazard_core::Feature;
/// use hazard_core::hazard::popup_rows;
/// use serde_json::json;
///
/// let feature = Feature::new(json!({
///     "properties": {"fid": 3, "Year": 1755, "Magnitude": 8.7}
/// }));
/// let keys: Vec<_> = popup_rows(&feature, &["Magnitude"])
///     .into_iter()
///     .map(|row| row.key)
///     .collect();
/// assert_eq!(keys, ["Magnitude", "Year"]);
/// ```
#[must_use]
pub fn popup_rows(feature: &Feature, priority: &[&str]) -> Vec<PopupRow> {
    build_popup_rows(feature, priority, false)
}

/// Build popup rows with the coordinates shown as one `Location` row.
///
/// The row follows the priority rows and reads `lon, lat` to four decimal
/// places. It is omitted unless both values are numeric. The raw
/// `Longitude` and `Latitude` properties are never listed separately.
///
/// # Examples
/// ```
/// use hazard_core::Feature;
/// use hazard_core::hazard::located_popup_rows;
/// use serde_json::json;
///
/// let feature = Feature::new(json!({
///     "properties": {"Longitude": 10.75221, "Latitude": 59.9139, "Year": 1755}
/// }));
/// let rows = located_popup_rows(&feature, &["Year"]);
/// assert_eq!(rows[1].key, "Location");
/// assert_eq!(rows[1].value, "10.7522, 59.9139");
/// assert_eq!(rows.len(), 2);
/// ```
#[must_use]
pub fn located_popup_rows(feature: &Feature, priority: &[&str]) -> Vec<PopupRow> {
    build_popup_rows(feature, priority, true)
}

fn build_popup_rows(feature: &Feature, priority: &[&str], merge_location: bool) -> Vec<PopupRow> {
    let Some(properties) = feature.properties() else {
        return Vec::new();
    };
    let leading = priority
        .iter()
        .filter(|key| is_listed(key, merge_location))
        .filter_map(|key| {
            properties
                .get(*key)
                .filter(|value| !value.is_null())
                .map(|value| row(key, value))
        });
    let location = if merge_location {
        location_row(properties)
    } else {
        None
    };
    let rest = properties
        .iter()
        .filter(|(key, _)| is_listed(key, merge_location) && !priority.contains(&key.as_str()))
        .map(|(key, value)| row(key, value));

    leading.chain(location).chain(rest).collect()
}

fn location_row(properties: &Map<String, Value>) -> Option<PopupRow> {
    let lon = properties.get("Longitude").and_then(Value::as_f64)?;
    let lat = properties.get("Latitude").and_then(Value::as_f64)?;
    Some(PopupRow {
        key: LOCATION_LABEL.to_owned(),
        value: format!("{lon:.4}, {lat:.4}"),
    })
}

fn is_visible(key: &str) -> bool {
    !HIDDEN_PROPERTIES.contains(&key)
}

fn is_listed(key: &str, merge_location: bool) -> bool {
    is_visible(key) && !(merge_location && LOCATION_KEYS.contains(&key))
}

fn row(key: &str, value: &Value) -> PopupRow {
    PopupRow {
        key: key.to_owned(),
        value: display_value(value),
    }
}

/// Render a property value the way it appears in tables and CSV cells.
///
/// Strings are shown without quotes; other values use their JSON text.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// The run-up height at each of [`RETURN_PERIODS`].
///
/// Missing or non-numeric values read as `0.0` so the curve always has
/// seven samples.
#[must_use]
pub fn runup_curve(feature: &Feature) -> Vec<RunupPoint> {
    RETURN_PERIODS
        .iter()
        .map(|&return_period| RunupPoint {
            return_period,
            height: feature
                .property(&format!("ari{return_period}"))
                .and_then(numeric)
                .unwrap_or(0.0),
        })
        .collect()
}

/// The alternative 500-year estimates present on `feature`.
///
/// Variants whose value is not numeric are omitted.
#[must_use]
pub fn runup_variants(feature: &Feature) -> Vec<RunupVariant> {
    RUNUP_VARIANTS
        .iter()
        .filter_map(|&(key, label)| {
            let height = feature.property(key).and_then(numeric)?;
            Some(RunupVariant {
                key,
                label,
                point: RunupPoint {
                    return_period: 500,
                    height,
                },
            })
        })
        .collect()
}

fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|height| height.is_finite())
}

/// Write every property of `feature` as a two-record CSV document.
///
/// The header lists all property keys in feature order, including `id`.
///
/// # Errors
///
/// Returns [`HazardExportError::MissingProperties`] when the feature has no
/// `properties` object, or the writer error when encoding fails.
pub fn properties_csv(feature: &Feature) -> Result<String, HazardExportError> {
    let properties = feature
        .properties()
        .ok_or(HazardExportError::MissingProperties)?;
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(properties.keys())?;
    writer.write_record(properties.values().map(display_value))?;
    let bytes = writer
        .into_inner()
        .map_err(|err| HazardExportError::Flush(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| HazardExportError::Flush(err.to_string()))
}

/// Download name for the CSV of `feature`: `hazard_point_{id}.csv`.
///
/// Features without an id fall back to `hazard_point.csv`. Path
/// separators, control characters and `..` in the id are replaced with `_`
/// so the name always stays a single path component.
#[must_use]
pub fn csv_file_name(feature: &Feature) -> String {
    feature.id().map_or_else(
        || "hazard_point.csv".to_owned(),
        |id| format!("hazard_point_{}.csv", file_name_safe(&display_value(id))),
    )
}

fn file_name_safe(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if matches!(c, '/' | '\\') || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
        .replace("..", "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn hazard_point() -> Feature {
        Feature::new(json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [5.32, 60.39]},
            "properties": {
                "id": 42,
                "fid": 7,
                "name": "Bergen, outer",
                "ari10": 0.4,
                "ari50": "1.1",
                "ari100": 1.9,
                "ari500": 3.2,
                "ari2500": null,
                "ari500LL": 2.8,
                "ari500P": 4.5,
                "ari500M": "n/a"
            }
        }))
    }

    #[rstest]
    fn popup_hides_identifiers(hazard_point: Feature) {
        let rows = popup_rows(&hazard_point, &[]);
        assert!(rows.iter().all(|row| row.key != "id" && row.key != "fid"));
        assert_eq!(rows.first().map(|row| row.key.as_str()), Some("name"));
        assert_eq!(
            rows.first().map(|row| row.value.as_str()),
            Some("Bergen, outer")
        );
    }

    #[rstest]
    fn priority_properties_lead_in_given_order() {
        let ward = Feature::new(json!({
            "properties": {"area": 3.1, "state": "Telangana", "ward_lgd_name": "Ameerpet", "townname": null}
        }));

        let rows = popup_rows(&ward, &["ward_lgd_name", "townname", "state"]);

        let keys: Vec<_> = rows.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, ["ward_lgd_name", "state", "area"]);
    }

    #[rstest]
    fn location_row_follows_priority_and_replaces_coordinates() {
        let quake = Feature::new(json!({
            "properties": {
                "id": 9,
                "Longitude": -9.14,
                "Latitude": 38.71,
                "Year": 1755,
                "Magnitude": 8.7,
                "ari100": 1.5
            }
        }));

        let rows = located_popup_rows(&quake, &["Magnitude", "Year"]);

        let keys: Vec<_> = rows.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, ["Magnitude", "Year", LOCATION_LABEL, "ari100"]);
        assert_eq!(
            rows.get(2).map(|row| row.value.as_str()),
            Some("-9.1400, 38.7100")
        );
    }

    #[rstest]
    #[case(json!({"Longitude": "east", "Latitude": 38.71, "Year": 1755}))]
    #[case(json!({"Latitude": 38.71, "Year": 1755}))]
    fn location_row_needs_both_numeric_coordinates(#[case] properties: serde_json::Value) {
        let feature = Feature::new(json!({"properties": properties}));

        let keys: Vec<_> = located_popup_rows(&feature, &["Year"])
            .into_iter()
            .map(|row| row.key)
            .collect();

        assert_eq!(keys, ["Year"]);
    }

    #[rstest]
    fn feature_without_properties_has_no_rows() {
        assert!(popup_rows(&Feature::new(json!({"type": "Feature"})), &["Year"]).is_empty());
    }

    #[rstest]
    fn curve_has_a_sample_per_return_period(hazard_point: Feature) {
        let heights: Vec<_> = runup_curve(&hazard_point)
            .iter()
            .map(|point| (point.return_period, point.height))
            .collect();
        assert_eq!(
            heights,
            [
                (10, 0.4),
                (50, 1.1),
                (100, 1.9),
                (200, 0.0),
                (500, 3.2),
                (1000, 0.0),
                (2500, 0.0),
            ]
        );
    }

    #[rstest]
    fn variants_skip_missing_and_non_numeric_values(hazard_point: Feature) {
        let labels: Vec<_> = runup_variants(&hazard_point)
            .iter()
            .map(|variant| (variant.label, variant.point.height))
            .collect();
        assert_eq!(labels, [("sigma=0.5", 2.8), ("Upper 95%", 4.5)]);
    }

    #[rstest]
    fn csv_quotes_values_containing_commas(hazard_point: Feature) {
        let csv = properties_csv(&hazard_point).expect("export should succeed");
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,fid,name,ari10,ari50,ari100,ari500,ari2500,ari500LL,ari500P,ari500M")
        );
        assert_eq!(
            lines.next(),
            Some("42,7,\"Bergen, outer\",0.4,1.1,1.9,3.2,null,2.8,4.5,n/a")
        );
        assert_eq!(lines.next(), None);
    }

    #[rstest]
    fn csv_requires_properties() {
        let err = properties_csv(&Feature::new(json!({"type": "Feature"})))
            .expect_err("export should fail");
        assert!(matches!(err, HazardExportError::MissingProperties));
    }

    #[rstest]
    #[case(json!({"id": 42, "properties": {}}), "hazard_point_42.csv")]
    #[case(json!({"properties": {"id": "NO-17"}}), "hazard_point_NO-17.csv")]
    #[case(json!({"properties": {}}), "hazard_point.csv")]
    #[case(json!({"id": "a/b"}), "hazard_point_a_b.csv")]
    #[case(json!({"id": "../x"}), "hazard_point___x.csv")]
    #[case(json!({"id": "..\\..\\evil"}), "hazard_point_____evil.csv")]
    fn csv_file_name_uses_feature_id(#[case] raw: Value, #[case] expected: &str) {
        assert_eq!(csv_file_name(&Feature::new(raw)), expected);
    }
}

//! Loading feature collections saved by `hazard fetch`.

use camino::Utf8Path;
use hazard_core::{Feature, FeatureCollection};
use log::debug;

use crate::{CliError, fs};

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read a GeoJSON feature collection from `path`.
pub(crate) fn load_collection(
    path: &Utf8Path,
    field: &'static str,
) -> Result<FeatureCollection, CliError> {
    require_existing(path, field)?;
    let reader = fs::open_utf8_reader(path).map_err(|source| CliError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    let collection: FeatureCollection =
        serde_json::from_reader(reader).map_err(|source| CliError::ParseInput {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("loaded {} features from {path}", collection.len());
    Ok(collection)
}

/// Take the feature at `index`, failing when the collection is shorter.
pub(crate) fn take_feature(
    collection: FeatureCollection,
    index: usize,
) -> Result<Feature, CliError> {
    let len = collection.len();
    collection
        .into_features()
        .into_iter()
        .nth(index)
        .ok_or(CliError::FeatureIndexOutOfRange { index, len })
}

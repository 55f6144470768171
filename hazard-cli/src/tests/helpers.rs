//! Test helpers for writing feature collections and serving a mock API.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// A temporary directory addressed through UTF-8 paths.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    pub(super) fn write_json(&self, relative: &str, document: &Value) -> Utf8PathBuf {
        let path = self.path(relative);
        let bytes = serde_json::to_vec(document).expect("serialise fixture");
        write_utf8(&path, &bytes);
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture file");
}

pub(super) fn read_utf8(path: &Utf8Path) -> String {
    std::fs::read_to_string(path.as_std_path()).expect("read output file")
}

/// A hazard point with location and run-up properties.
pub(super) fn hazard_point(id: u64, lon: f64, lat: f64) -> Value {
    json!({
        "type": "Feature",
        "id": id,
        "geometry": {"type": "Point", "coordinates": [lon, lat]},
        "properties": {
            "id": id,
            "Longitude": lon,
            "Latitude": lat,
            "Year": 2004,
            "Magnitude": 9.1,
            "ari10": 0.4,
            "ari50": 1.1,
            "ari100": 1.6,
            "ari200": 2.2,
            "ari500": 3.0,
            "ari1000": 3.7,
            "ari2500": 4.8,
            "ari500P": 4.1,
        },
    })
}

/// Oslo and Bergen inside Norway, London outside it.
pub(super) fn mixed_collection() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            hazard_point(1, 10.7522, 59.9139),
            hazard_point(2, -0.1276, 51.5072),
            hazard_point(3, 5.3221, 60.3913),
        ],
    })
}

/// A mock server and the runtime that hosts it.
///
/// The server is declared first so it shuts down before its runtime.
pub(super) struct MockApi {
    server: MockServer,
    runtime: Runtime,
}

impl MockApi {
    pub(super) fn start() -> Self {
        let runtime = Runtime::new().expect("failed to build Tokio runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub(super) fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub(super) fn uri(&self) -> String {
        self.server.uri()
    }
}

//! Test helpers for preparing CLI workspaces and artefacts.

use camino::{Utf8Path, Utf8PathBuf};
use saferoute_data::lights::{parse_ascii_grid, write_lights_artefact};
use tempfile::TempDir;

/// 3x2 grid covering longitudes 77.0..78.5 and latitudes 12.0..13.0.
///
/// The cell containing central Bengaluru (12.97, 77.59) reads 30.
pub(super) const CITY_GRID: &str = "\
ncols 3
nrows 2
xllcorner 77.0
yllcorner 12.0
cellsize 0.5
NODATA_value -9999
12 30 -9999
6 0 -9999
";

pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    saferoute_fs::ensure_parent_dir(path).expect("create parent directory");
    std::fs::write(path, contents).expect("write file");
}

/// Write [`CITY_GRID`] as a lights artefact at `path`.
pub(super) fn write_city_lights(path: &Utf8Path) {
    let grid = parse_ascii_grid(CITY_GRID.as_bytes()).expect("parse grid");
    write_lights_artefact(path, &grid).expect("write lights artefact");
}

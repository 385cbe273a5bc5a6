//! Banner asset loading.

use std::{fs, path::Path};

use crate::AssetError;

/// Read the banner file as UTF-8.
///
/// Called once per session, so an edited file shows up for new
/// connections without a restart.
pub fn load_banner(path: &Path) -> Result<String, AssetError> {
    fs::read_to_string(path)
        .map_err(|source| AssetError::ResourceUnavailable { path: path.to_path_buf(), source })
}

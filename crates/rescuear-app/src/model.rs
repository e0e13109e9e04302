//! Model asset probing.

use std::path::Path;

use rescuear_pose::domain::model::ModelHandle;
use tracing::{info, warn};

/// Looks for the model asset at `path`.
///
/// A missing asset is not fatal: the session runs without a model and pose
/// commands are logged and ignored.
#[must_use]
pub fn locate_model(path: &Path) -> Option<ModelHandle> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            let handle = ModelHandle::new(name);
            info!(path = %path.display(), asset_id = %handle.asset_id, "model asset loaded");
            Some(handle)
        }
        Ok(_) => {
            warn!(path = %path.display(), "model path is not a file; continuing without model");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "model asset unavailable; continuing without model");
            None
        }
    }
}

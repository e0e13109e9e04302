//! Model asset handle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle to a loaded 3D model. The renderer owns the actual asset;
/// the core only needs to know whether one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelHandle {
    /// Identifier the renderer uses for the loaded asset.
    pub asset_id: Uuid,
    /// Human-readable asset name for logs.
    pub name: String,
}

impl ModelHandle {
    /// Wraps a freshly loaded asset.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            asset_id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

use std::path::Path;

use geolayer_input::LayerAction;
use geolayer_viewmodel::{Catalog, CatalogError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Errors from saving, loading or restoring layer state.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// UI state of one layer, keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerState {
    pub name: String,
    pub enabled: bool,
    pub shown: bool,
    pub legend_visible: bool,
}

/// Content-addressed record of every layer's flags at one moment.
///
/// The hash is SHA-256 over the JSON encoding of `layers`, so edits to a
/// saved file are detected on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStateSnapshot {
    pub layers: Vec<LayerState>,
    pub hash: String,
}

impl LayerStateSnapshot {
    /// Record the current flags of every layer in catalog order.
    pub fn capture(catalog: &Catalog) -> Result<Self, SnapshotError> {
        let layers: Vec<LayerState> = catalog
            .layers()
            .iter()
            .map(|l| LayerState {
                name: l.name().to_string(),
                enabled: l.is_enabled(),
                shown: l.is_shown(),
                legend_visible: l.is_legend_visible(),
            })
            .collect();
        let hash = content_hash(&layers)?;
        Ok(Self { layers, hash })
    }

    /// Recompute the hash and compare.
    pub fn verify(&self) -> bool {
        content_hash(&self.layers).is_ok_and(|h| h == self.hash)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        serde_json::to_writer_pretty(std::fs::File::create(path)?, self)?;
        tracing::debug!(path = %path.display(), layers = self.layers.len(), "layer state saved");
        Ok(())
    }

    /// Load and verify. A snapshot that fails verification is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let snap: Self = serde_json::from_reader(std::fs::File::open(path.as_ref())?)?;
        let actual = content_hash(&snap.layers)?;
        if actual != snap.hash {
            return Err(SnapshotError::IntegrityMismatch {
                expected: snap.hash,
                actual,
            });
        }
        Ok(snap)
    }

    /// Drive each named layer to its recorded state through the view-model.
    /// Names missing from the catalog are skipped. Returns how many layers
    /// were restored.
    pub fn restore(&self, catalog: &mut Catalog) -> Result<usize, SnapshotError> {
        let mut restored = 0;
        for state in &self.layers {
            let Some(layer) = catalog.find_by_name(&state.name) else {
                tracing::warn!(layer = %state.name, "layer in snapshot not in catalog");
                continue;
            };
            let id = layer.id();
            let legend_differs = layer.is_legend_visible() != state.legend_visible;

            if state.enabled {
                catalog.apply(id, LayerAction::Enable)?;
                let shown = if state.shown {
                    LayerAction::Show
                } else {
                    LayerAction::Hide
                };
                catalog.apply(id, shown)?;
            } else {
                catalog.apply(id, LayerAction::Disable)?;
            }
            if legend_differs {
                catalog.apply(id, LayerAction::ToggleLegend)?;
            }
            restored += 1;
        }
        Ok(restored)
    }
}

fn content_hash(layers: &[LayerState]) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(layers)?;
    Ok(sha256_hex(&bytes))
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

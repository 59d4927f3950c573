//! Persistence: catalog configuration files and verifiable layer-state snapshots.
//!
//! # Invariants
//! - Restoring state goes through the view-model; engines and analytics see
//!   ordinary transitions.
//! - Snapshots are content-addressed and fail closed on a hash mismatch.

pub mod config;
mod snapshot;

pub use config::{CatalogConfig, ConfigError, DegreeRectangle, LayerConfig};
pub use snapshot::{LayerState, LayerStateSnapshot, SnapshotError};

pub fn crate_info() -> &'static str {
    "geolayer-persist v0.1.0"
}

//! Developer tooling: catalog inspector.
//!
//! # Invariants
//! - Tools are read-only; they never change layer or engine state.

mod inspector;

pub use inspector::{CatalogInspector, CatalogSummary, LayerDetails};

pub fn crate_info() -> &'static str {
    "geolayer-tools v0.1.0"
}

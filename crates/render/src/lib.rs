//! Rendering adapter: engine-agnostic layer interface with globe and tile-map facades.
//!
//! # Invariants
//! - Renderers never touch view-model state; they only react to calls.
//! - A layer must be enabled on an engine before it can be shown or hidden there.
//!
//! The facades track engine-side state only. Actual drawing, tile fetching and
//! camera interpolation belong to the host engines behind this trait.

mod globe;
mod renderer;
mod tilemap;

pub use globe::{CameraFlight, DEFAULT_FLIGHT_DURATION, GlobeRenderer};
pub use renderer::{EngineKind, EngineLayerState, LayerRef, LayerRenderer, RenderError};
pub use tilemap::TileMapRenderer;

pub fn crate_info() -> &'static str {
    "geolayer-render v0.1.0"
}

//! Layer view-model: per-layer UI state kept in step with the active map engines.
//!
//! # Invariants
//! - Flag changes run their transition synchronously, on the caller's stack.
//! - A shown layer is an enabled layer: disabling hides first, and showing a
//!   disabled layer is refused before the flag changes.
//! - Writing a flag's current value is not a transition.
//! - Engine errors propagate. Zoom guards report a skip instead.

pub mod catalog;
pub mod context;
pub mod layer;
pub mod observable;

pub use catalog::{ActionOutcome, Catalog, CatalogError};
pub use context::{LayerContext, NowViewing};
pub use layer::{
    LayerCapabilities, LayerError, LayerInfo, LayerViewModel, MAX_ZOOM_WIDTH, ZoomOutcome,
    ZoomSkip,
};
pub use observable::{Observable, SubscriptionId};

//! Shared geographic types for the geolayer workspace.

mod types;

pub use types::{EPSILON3, ExtentError, LatLng, LatLngBounds, LayerId, Rectangle};

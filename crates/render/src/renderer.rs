use geolayer_common::{LayerId, Rectangle};

/// Which kind of engine a renderer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// 3D globe with a tweened camera.
    Globe,
    /// 2D tile map with a bounds-fitted viewport.
    TileMap,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Globe => f.write_str("globe"),
            Self::TileMap => f.write_str("tile-map"),
        }
    }
}

/// What a renderer is told about the layer it is acting on.
#[derive(Debug, Clone, Copy)]
pub struct LayerRef<'a> {
    pub id: LayerId,
    pub name: &'a str,
    pub rectangle: Option<Rectangle>,
}

/// Per-layer state as an engine sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineLayerState {
    pub enabled: bool,
    pub shown: bool,
}

/// Errors raised by engines. The view-model propagates them untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("{engine}: layer {layer} is already enabled")]
    AlreadyEnabled { engine: EngineKind, layer: LayerId },
    #[error("{engine}: layer {layer} is not enabled")]
    NotEnabled { engine: EngineKind, layer: LayerId },
    #[error("{engine}: invalid zoom target {rectangle}")]
    InvalidTarget {
        engine: EngineKind,
        rectangle: Rectangle,
    },
}

/// Engine-agnostic interface for displaying layers. One implementation per engine.
///
/// Calls arrive synchronously from layer state transitions. Engines own their
/// per-layer resources; the view-model only tells them what changed.
pub trait LayerRenderer {
    fn kind(&self) -> EngineKind;

    /// Allocate engine resources for the layer.
    fn enable(&mut self, layer: &LayerRef<'_>) -> Result<(), RenderError>;

    /// Release engine resources for the layer.
    fn disable(&mut self, layer: &LayerRef<'_>) -> Result<(), RenderError>;

    /// Make an enabled layer visible.
    fn show(&mut self, layer: &LayerRef<'_>) -> Result<(), RenderError>;

    /// Hide an enabled layer without releasing it.
    fn hide(&mut self, layer: &LayerRef<'_>) -> Result<(), RenderError>;

    /// Move the camera or viewport so `rectangle` fills the view.
    fn zoom_to(&mut self, rectangle: &Rectangle) -> Result<(), RenderError>;

    /// The engine's view of a layer, `None` if it was never enabled here.
    fn layer_state(&self, id: LayerId) -> Option<EngineLayerState>;

    /// Where the camera was last sent, if anywhere.
    fn camera_target(&self) -> Option<Rectangle>;

    /// Human-readable dump of engine state.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_kind_display() {
        assert_eq!(EngineKind::Globe.to_string(), "globe");
        assert_eq!(EngineKind::TileMap.to_string(), "tile-map");
    }

    #[test]
    fn render_error_mentions_engine() {
        let err = RenderError::NotEnabled {
            engine: EngineKind::TileMap,
            layer: LayerId::new(),
        };
        assert!(err.to_string().starts_with("tile-map:"));
    }
}

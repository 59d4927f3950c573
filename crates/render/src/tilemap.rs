use std::collections::BTreeMap;

use geolayer_common::{LatLngBounds, LayerId, Rectangle};

use crate::renderer::{EngineKind, EngineLayerState, LayerRef, LayerRenderer, RenderError};

#[derive(Debug, Clone)]
struct TileLayer {
    name: String,
    shown: bool,
}

/// 2D tile map facade: a stack of tile layers and a bounds-fitted viewport.
#[derive(Debug)]
pub struct TileMapRenderer {
    layers: BTreeMap<LayerId, TileLayer>,
    view: LatLngBounds,
    fitted: Option<LatLngBounds>,
}

impl Default for TileMapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TileMapRenderer {
    pub fn new() -> Self {
        Self {
            layers: BTreeMap::new(),
            view: Rectangle::MAX_VALUE.to_lat_lng_bounds(),
            fitted: None,
        }
    }

    /// Fit the viewport to `bounds`.
    pub fn fit_bounds(&mut self, bounds: LatLngBounds) {
        tracing::debug!(
            sw_lat = bounds.south_west.lat,
            sw_lng = bounds.south_west.lng,
            ne_lat = bounds.north_east.lat,
            ne_lng = bounds.north_east.lng,
            "tile map: fit bounds"
        );
        self.view = bounds;
        self.fitted = Some(bounds);
    }

    /// Current viewport.
    pub fn view(&self) -> LatLngBounds {
        self.view
    }

    /// Number of tile layers on the map.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut TileLayer, RenderError> {
        self.layers.get_mut(&id).ok_or(RenderError::NotEnabled {
            engine: EngineKind::TileMap,
            layer: id,
        })
    }
}

impl LayerRenderer for TileMapRenderer {
    fn kind(&self) -> EngineKind {
        EngineKind::TileMap
    }

    fn enable(&mut self, layer: &LayerRef<'_>) -> Result<(), RenderError> {
        if self.layers.contains_key(&layer.id) {
            return Err(RenderError::AlreadyEnabled {
                engine: EngineKind::TileMap,
                layer: layer.id,
            });
        }
        tracing::debug!(layer = %layer.name, "tile map: enable");
        self.layers.insert(
            layer.id,
            TileLayer {
                name: layer.name.to_string(),
                shown: false,
            },
        );
        Ok(())
    }

    fn disable(&mut self, layer: &LayerRef<'_>) -> Result<(), RenderError> {
        tracing::debug!(layer = %layer.name, "tile map: disable");
        self.layers
            .remove(&layer.id)
            .map(|_| ())
            .ok_or(RenderError::NotEnabled {
                engine: EngineKind::TileMap,
                layer: layer.id,
            })
    }

    fn show(&mut self, layer: &LayerRef<'_>) -> Result<(), RenderError> {
        tracing::debug!(layer = %layer.name, "tile map: show");
        self.layer_mut(layer.id)?.shown = true;
        Ok(())
    }

    fn hide(&mut self, layer: &LayerRef<'_>) -> Result<(), RenderError> {
        tracing::debug!(layer = %layer.name, "tile map: hide");
        self.layer_mut(layer.id)?.shown = false;
        Ok(())
    }

    fn zoom_to(&mut self, rectangle: &Rectangle) -> Result<(), RenderError> {
        self.fit_bounds(rectangle.to_lat_lng_bounds());
        Ok(())
    }

    fn layer_state(&self, id: LayerId) -> Option<EngineLayerState> {
        self.layers.get(&id).map(|l| EngineLayerState {
            enabled: true,
            shown: l.shown,
        })
    }

    fn camera_target(&self) -> Option<Rectangle> {
        self.fitted.map(|b| b.to_rectangle())
    }

    fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Tile map (layers={}) ===\n", self.layers.len()));
        out.push_str(&format!(
            "View: sw=({:.3}, {:.3}) ne=({:.3}, {:.3})\n",
            self.view.south_west.lat,
            self.view.south_west.lng,
            self.view.north_east.lat,
            self.view.north_east.lng
        ));
        for (id, layer) in &self.layers {
            out.push_str(&format!(
                "  [{}] {} shown={}\n",
                id.short(),
                layer.name,
                layer.shown
            ));
        }
        out
    }
}

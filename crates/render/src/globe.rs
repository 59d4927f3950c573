use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use geolayer_common::{LayerId, Rectangle};

use crate::renderer::{EngineKind, EngineLayerState, LayerRef, LayerRenderer, RenderError};

/// Default camera flight duration.
pub const DEFAULT_FLIGHT_DURATION: Duration = Duration::from_secs(3);

/// A pending camera tween towards a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFlight {
    pub destination: Rectangle,
    pub duration: Duration,
}

impl CameraFlight {
    pub fn to_rectangle(destination: Rectangle, duration: Duration) -> Self {
        Self {
            destination,
            duration,
        }
    }
}

#[derive(Debug, Clone)]
struct GlobeLayer {
    name: String,
    shown: bool,
}

/// 3D globe facade: a scene of imagery layers and a queue of camera tweens.
#[derive(Debug)]
pub struct GlobeRenderer {
    layers: BTreeMap<LayerId, GlobeLayer>,
    tweens: VecDeque<CameraFlight>,
    camera: Rectangle,
    target: Option<Rectangle>,
    flight_duration: Duration,
}

impl Default for GlobeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobeRenderer {
    pub fn new() -> Self {
        Self::with_flight_duration(DEFAULT_FLIGHT_DURATION)
    }

    pub fn with_flight_duration(flight_duration: Duration) -> Self {
        Self {
            layers: BTreeMap::new(),
            tweens: VecDeque::new(),
            camera: Rectangle::MAX_VALUE,
            target: None,
            flight_duration,
        }
    }

    /// Tweens added to the scene and not yet completed.
    pub fn pending_flights(&self) -> impl Iterator<Item = &CameraFlight> {
        self.tweens.iter()
    }

    /// Finish every pending tween. The camera ends at the last destination.
    pub fn complete_flights(&mut self) -> usize {
        let n = self.tweens.len();
        while let Some(flight) = self.tweens.pop_front() {
            self.camera = flight.destination;
        }
        n
    }

    /// Current camera view.
    pub fn camera(&self) -> Rectangle {
        self.camera
    }

    /// Number of layers with live globe resources.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut GlobeLayer, RenderError> {
        self.layers.get_mut(&id).ok_or(RenderError::NotEnabled {
            engine: EngineKind::Globe,
            layer: id,
        })
    }
}

impl LayerRenderer for GlobeRenderer {
    fn kind(&self) -> EngineKind {
        EngineKind::Globe
    }

    fn enable(&mut self, layer: &LayerRef<'_>) -> Result<(), RenderError> {
        if self.layers.contains_key(&layer.id) {
            return Err(RenderError::AlreadyEnabled {
                engine: EngineKind::Globe,
                layer: layer.id,
            });
        }
        tracing::debug!(layer = %layer.name, "globe: enable");
        self.layers.insert(
            layer.id,
            GlobeLayer {
                name: layer.name.to_string(),
                shown: false,
            },
        );
        Ok(())
    }

    fn disable(&mut self, layer: &LayerRef<'_>) -> Result<(), RenderError> {
        tracing::debug!(layer = %layer.name, "globe: disable");
        self.layers
            .remove(&layer.id)
            .map(|_| ())
            .ok_or(RenderError::NotEnabled {
                engine: EngineKind::Globe,
                layer: layer.id,
            })
    }

    fn show(&mut self, layer: &LayerRef<'_>) -> Result<(), RenderError> {
        tracing::debug!(layer = %layer.name, "globe: show");
        self.layer_mut(layer.id)?.shown = true;
        Ok(())
    }

    fn hide(&mut self, layer: &LayerRef<'_>) -> Result<(), RenderError> {
        tracing::debug!(layer = %layer.name, "globe: hide");
        self.layer_mut(layer.id)?.shown = false;
        Ok(())
    }

    fn zoom_to(&mut self, rectangle: &Rectangle) -> Result<(), RenderError> {
        if !(rectangle.width() > 0.0 && rectangle.height() > 0.0) {
            return Err(RenderError::InvalidTarget {
                engine: EngineKind::Globe,
                rectangle: *rectangle,
            });
        }
        let flight = CameraFlight::to_rectangle(*rectangle, self.flight_duration);
        tracing::debug!(destination = %rectangle, "globe: camera flight queued");
        self.tweens.push_back(flight);
        self.target = Some(*rectangle);
        Ok(())
    }

    fn layer_state(&self, id: LayerId) -> Option<EngineLayerState> {
        self.layers.get(&id).map(|l| EngineLayerState {
            enabled: true,
            shown: l.shown,
        })
    }

    fn camera_target(&self) -> Option<Rectangle> {
        self.target
    }

    fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Globe (layers={}, pending flights={}) ===\n",
            self.layers.len(),
            self.tweens.len()
        ));
        let center = self.camera.center();
        out.push_str(&format!(
            "Camera: {} center=({:.3}, {:.3})\n",
            self.camera,
            center.x.to_degrees(),
            center.y.to_degrees()
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

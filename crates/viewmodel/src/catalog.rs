use geolayer_common::LayerId;
use geolayer_input::{LayerAction, LayerCommand};
use geolayer_render::LayerRenderer;

use crate::context::LayerContext;
use crate::layer::{LayerError, LayerViewModel, ZoomOutcome};

/// Errors from catalog operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("no layer named `{0}`")]
    UnknownLayer(String),
    #[error("layer {0} not found")]
    LayerNotFound(LayerId),
    #[error("layer `{name}`: {source}")]
    Layer {
        name: String,
        #[source]
        source: LayerError,
    },
}

/// What applying an action did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionOutcome {
    Enabled(bool),
    Shown(bool),
    LegendVisible(bool),
    Zoom(ZoomOutcome),
}

impl std::fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enabled(v) => write!(f, "enabled={v}"),
            Self::Shown(v) => write!(f, "shown={v}"),
            Self::LegendVisible(v) => write!(f, "legend_visible={v}"),
            Self::Zoom(ZoomOutcome::Flown(r)) => write!(f, "zoomed to {r}"),
            Self::Zoom(ZoomOutcome::Skipped(why)) => write!(f, "zoom skipped: {why:?}"),
        }
    }
}

/// The layers a user can manage, plus the context they share.
///
/// Layers keep insertion order. Names are not required to be unique; lookups
/// by name return the first match.
#[derive(Debug, Default)]
pub struct Catalog {
    layers: Vec<LayerViewModel>,
    context: LayerContext,
}

impl Catalog {
    pub fn new(context: LayerContext) -> Self {
        Self {
            layers: Vec::new(),
            context,
        }
    }

    /// Add a layer and return its id.
    pub fn add(&mut self, layer: LayerViewModel) -> LayerId {
        let id = layer.id();
        tracing::debug!(layer = %layer.name(), id = %id.short(), "layer added to catalog");
        self.layers.push(layer);
        id
    }

    /// Remove a layer. It leaves the now-viewing collection; engines are not told.
    pub fn remove(&mut self, id: LayerId) -> Result<LayerViewModel, CatalogError> {
        let idx = self.index_of(id)?;
        let layer = self.layers.remove(idx);
        self.context.now_viewing_mut().remove(id);
        tracing::debug!(layer = %layer.name(), "layer removed from catalog");
        Ok(layer)
    }

    pub fn get(&self, id: LayerId) -> Option<&LayerViewModel> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut LayerViewModel> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&LayerViewModel> {
        self.layers.iter().find(|l| l.name() == name)
    }

    pub fn layers(&self) -> &[LayerViewModel] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn context(&self) -> &LayerContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut LayerContext {
        &mut self.context
    }

    /// Enabled layers in now-viewing order.
    pub fn now_viewing(&self) -> Vec<&LayerViewModel> {
        self.context
            .now_viewing()
            .iter()
            .filter_map(|id| self.get(*id))
            .collect()
    }

    /// Attach an engine, bringing it up to date with every enabled layer first.
    pub fn attach_renderer(&mut self, mut renderer: Box<dyn LayerRenderer>) -> Result<(), CatalogError> {
        for layer in self.layers.iter().filter(|l| l.is_enabled()) {
            layer
                .sync_renderer(renderer.as_mut())
                .map_err(|source| CatalogError::Layer {
                    name: layer.name().to_string(),
                    source,
                })?;
        }
        self.context.push_renderer(renderer);
        Ok(())
    }

    /// Apply a UI action to one layer.
    pub fn apply(&mut self, id: LayerId, action: LayerAction) -> Result<ActionOutcome, CatalogError> {
        let idx = self.index_of(id)?;
        let layer = &mut self.layers[idx];
        let ctx = &mut self.context;
        let result = match action {
            LayerAction::Enable => layer
                .set_enabled(ctx, true)
                .map(|()| ActionOutcome::Enabled(true)),
            LayerAction::Disable => layer
                .set_enabled(ctx, false)
                .map(|()| ActionOutcome::Enabled(false)),
            LayerAction::ToggleEnabled => layer.toggle_enabled(ctx).map(ActionOutcome::Enabled),
            LayerAction::Show => layer
                .set_shown(ctx, true)
                .map(|()| ActionOutcome::Shown(true)),
            LayerAction::Hide => layer
                .set_shown(ctx, false)
                .map(|()| ActionOutcome::Shown(false)),
            LayerAction::ToggleShown => layer.toggle_shown(ctx).map(ActionOutcome::Shown),
            LayerAction::ToggleLegend => Ok(ActionOutcome::LegendVisible(
                layer.toggle_legend_visible(),
            )),
            LayerAction::ZoomTo => layer.zoom_to(ctx).map(ActionOutcome::Zoom),
        };
        result.map_err(|source| CatalogError::Layer {
            name: layer.name().to_string(),
            source,
        })
    }

    /// Resolve the command's target by name and apply it.
    pub fn execute(&mut self, command: &LayerCommand) -> Result<ActionOutcome, CatalogError> {
        let _span = tracing::info_span!("layer_command", command = %command).entered();
        let id = self
            .find_by_name(&command.target)
            .map(|l| l.id())
            .ok_or_else(|| CatalogError::UnknownLayer(command.target.clone()))?;
        let outcome = self.apply(id, command.action)?;
        tracing::debug!(%outcome, "command applied");
        Ok(outcome)
    }

    fn index_of(&self, id: LayerId) -> Result<usize, CatalogError> {
        self.layers
            .iter()
            .position(|l| l.id() == id)
            .ok_or(CatalogError::LayerNotFound(id))
    }
}

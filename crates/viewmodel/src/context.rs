use geolayer_common::LayerId;
use geolayer_render::{EngineKind, LayerRenderer};

/// The ordered set of currently enabled layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NowViewing {
    items: Vec<LayerId>,
}

impl NowViewing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` unless already present. Returns true if it was added.
    pub fn add(&mut self, id: LayerId) -> bool {
        if self.items.contains(&id) {
            return false;
        }
        self.items.push(id);
        true
    }

    /// Returns true if `id` was present.
    pub fn remove(&mut self, id: LayerId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| *i != id);
        self.items.len() != before
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.items.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayerId> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Shared state every layer operation runs against: the active engines and
/// the now-viewing collection.
///
/// Layers borrow the context mutably per operation and never own it.
#[derive(Default)]
pub struct LayerContext {
    renderers: Vec<Box<dyn LayerRenderer>>,
    now_viewing: NowViewing,
}

impl LayerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`LayerContext::push_renderer`].
    pub fn with_renderer(mut self, renderer: impl LayerRenderer + 'static) -> Self {
        self.push_renderer(Box::new(renderer));
        self
    }

    /// Append an engine. Engines receive calls in the order they were added.
    pub fn push_renderer(&mut self, renderer: Box<dyn LayerRenderer>) {
        tracing::debug!(engine = %renderer.kind(), "renderer attached");
        self.renderers.push(renderer);
    }

    /// Detach the first engine of `kind`.
    pub fn remove_renderer(&mut self, kind: EngineKind) -> Option<Box<dyn LayerRenderer>> {
        let idx = self.renderers.iter().position(|r| r.kind() == kind)?;
        tracing::debug!(engine = %kind, "renderer detached");
        Some(self.renderers.remove(idx))
    }

    pub fn renderers(&self) -> impl Iterator<Item = &dyn LayerRenderer> {
        self.renderers.iter().map(|r| r.as_ref())
    }

    pub fn renderers_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn LayerRenderer>> {
        self.renderers.iter_mut()
    }

    /// First engine of `kind`, if attached.
    pub fn renderer(&self, kind: EngineKind) -> Option<&dyn LayerRenderer> {
        self.renderers().find(|r| r.kind() == kind)
    }

    pub fn has_renderer(&self, kind: EngineKind) -> bool {
        self.renderer(kind).is_some()
    }

    pub fn renderer_count(&self) -> usize {
        self.renderers.len()
    }

    pub fn now_viewing(&self) -> &NowViewing {
        &self.now_viewing
    }

    pub fn now_viewing_mut(&mut self) -> &mut NowViewing {
        &mut self.now_viewing
    }
}

impl std::fmt::Debug for LayerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<EngineKind> = self.renderers.iter().map(|r| r.kind()).collect();
        f.debug_struct("LayerContext")
            .field("renderers", &kinds)
            .field("now_viewing", &self.now_viewing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geolayer_render::{GlobeRenderer, TileMapRenderer};

    #[test]
    fn now_viewing_has_no_duplicates() {
        let mut nv = NowViewing::new();
        let a = LayerId::new();
        let b = LayerId::new();
        assert!(nv.add(a));
        assert!(!nv.add(a));
        assert!(nv.add(b));
        assert_eq!(nv.iter().copied().collect::<Vec<_>>(), vec![a, b]);

        assert!(nv.remove(a));
        assert!(!nv.remove(a));
        assert!(!nv.contains(a));
        assert_eq!(nv.len(), 1);
    }

    #[test]
    fn renderers_keep_attachment_order() {
        let ctx = LayerContext::new()
            .with_renderer(TileMapRenderer::new())
            .with_renderer(GlobeRenderer::new());
        let kinds: Vec<_> = ctx.renderers().map(|r| r.kind()).collect();
        assert_eq!(kinds, vec![EngineKind::TileMap, EngineKind::Globe]);
        assert!(ctx.has_renderer(EngineKind::Globe));
    }

    #[test]
    fn remove_renderer_by_kind() {
        let mut ctx = LayerContext::new().with_renderer(GlobeRenderer::new());
        assert!(ctx.remove_renderer(EngineKind::TileMap).is_none());
        assert!(ctx.remove_renderer(EngineKind::Globe).is_some());
        assert_eq!(ctx.renderer_count(), 0);
    }

    #[test]
    fn debug_lists_engine_kinds() {
        let ctx = LayerContext::new().with_renderer(GlobeRenderer::new());
        assert!(format!("{ctx:?}").contains("Globe"));
    }
}

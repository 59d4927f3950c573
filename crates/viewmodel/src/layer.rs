use std::sync::Arc;
use std::time::Instant;

use geolayer_analytics::{AnalyticsAction, AnalyticsEvent, AnalyticsSink};
use geolayer_common::{EPSILON3, LayerId, Rectangle};
use geolayer_render::{LayerRef, LayerRenderer, RenderError};
use serde::{Deserialize, Serialize};

use crate::context::LayerContext;
use crate::observable::{Observable, SubscriptionId};

/// Widest longitudinal span, in radians, that `zoom_to` will fly to.
pub const MAX_ZOOM_WIDTH: f64 = 3.14;

const IMAGE_LEGEND_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".gif"];

/// Descriptive, non-observable layer properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Extent in radians. Defaults to the whole world.
    #[serde(default = "world_rectangle")]
    pub rectangle: Option<Rectangle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_custodian: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_url: Option<String>,
}

fn world_rectangle() -> Option<Rectangle> {
    Some(Rectangle::MAX_VALUE)
}

impl LayerInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            rectangle: world_rectangle(),
            legend_url: None,
            data_url_type: None,
            data_url: None,
            data_custodian: None,
            metadata_url: None,
        }
    }

    pub fn with_rectangle(mut self, rectangle: Rectangle) -> Self {
        self.rectangle = Some(rectangle);
        self
    }

    pub fn with_legend_url(mut self, url: impl Into<String>) -> Self {
        self.legend_url = Some(url.into());
        self
    }
}

/// What the containing list UI may offer for a layer type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerCapabilities {
    #[serde(default)]
    pub supports_reordering: bool,
    #[serde(default)]
    pub supports_opacity: bool,
}

/// Errors from layer operations. Engine failures pass through unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayerError {
    #[error("cannot show `{0}` while it is disabled")]
    NotEnabled(String),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Why a zoom did not happen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomSkip {
    /// The layer is not both enabled and shown.
    NotVisible,
    /// The layer has no extent.
    NoRectangle,
    /// The extent spans more than [`MAX_ZOOM_WIDTH`] radians of longitude.
    TooWide { width: f64 },
}

/// Result of [`LayerViewModel::zoom_to`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomOutcome {
    /// Every engine was sent to this (possibly padded) rectangle.
    Flown(Rectangle),
    Skipped(ZoomSkip),
}

/// View-model for one geospatial layer.
///
/// Tracks the enabled/shown/legend-visible flags, keeps the engines in the
/// [`LayerContext`] in step with them, and reports usage to an analytics sink.
/// Every mutating operation borrows the context for its duration.
pub struct LayerViewModel {
    id: LayerId,
    info: LayerInfo,
    capabilities: LayerCapabilities,
    is_enabled: Observable<bool>,
    is_shown: Observable<bool>,
    is_legend_visible: Observable<bool>,
    enabled_at: Option<Instant>,
    shown_at: Option<Instant>,
    analytics: Arc<dyn AnalyticsSink>,
}

impl LayerViewModel {
    pub fn new(info: LayerInfo, analytics: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            id: LayerId::new(),
            info,
            capabilities: LayerCapabilities::default(),
            is_enabled: Observable::new(false),
            is_shown: Observable::new(false),
            is_legend_visible: Observable::new(true),
            enabled_at: None,
            shown_at: None,
            analytics,
        }
    }

    pub fn with_capabilities(mut self, capabilities: LayerCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn info(&self) -> &LayerInfo {
        &self.info
    }

    /// Direct access to descriptive properties. These carry no side effects.
    pub fn info_mut(&mut self) -> &mut LayerInfo {
        &mut self.info
    }

    pub fn rectangle(&self) -> Option<Rectangle> {
        self.info.rectangle
    }

    pub fn is_enabled(&self) -> bool {
        *self.is_enabled.get()
    }

    pub fn is_shown(&self) -> bool {
        *self.is_shown.get()
    }

    pub fn is_legend_visible(&self) -> bool {
        *self.is_legend_visible.get()
    }

    pub fn supports_reordering(&self) -> bool {
        self.capabilities.supports_reordering
    }

    pub fn supports_opacity(&self) -> bool {
        self.capabilities.supports_opacity
    }

    pub fn capabilities(&self) -> LayerCapabilities {
        self.capabilities
    }

    /// True iff the legend URL is a non-empty string.
    pub fn has_legend(&self) -> bool {
        self.info.legend_url.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// True iff the legend URL names a png/jpg/jpeg/gif file, any case.
    pub fn legend_is_image(&self) -> bool {
        let Some(url) = self.info.legend_url.as_deref() else {
            return false;
        };
        let url = url.to_ascii_lowercase();
        IMAGE_LEGEND_EXTENSIONS.iter().any(|ext| url.ends_with(ext))
    }

    /// Observe `is_enabled`. Runs after engines and now-viewing were updated.
    pub fn subscribe_enabled(&mut self, callback: impl FnMut(&bool) + 'static) -> SubscriptionId {
        self.is_enabled.subscribe(callback)
    }

    /// Observe `is_shown`. Runs after engines were updated.
    pub fn subscribe_shown(&mut self, callback: impl FnMut(&bool) + 'static) -> SubscriptionId {
        self.is_shown.subscribe(callback)
    }

    pub fn subscribe_legend_visible(
        &mut self,
        callback: impl FnMut(&bool) + 'static,
    ) -> SubscriptionId {
        self.is_legend_visible.subscribe(callback)
    }

    /// Remove a subscription from whichever flag holds it.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.is_enabled.unsubscribe(id)
            || self.is_shown.unsubscribe(id)
            || self.is_legend_visible.unsubscribe(id)
    }

    /// Flip `is_enabled` and return the new value.
    pub fn toggle_enabled(&mut self, ctx: &mut LayerContext) -> Result<bool, LayerError> {
        let value = !self.is_enabled();
        self.set_enabled(ctx, value)?;
        Ok(value)
    }

    /// Flip `is_shown` and return the new value.
    pub fn toggle_shown(&mut self, ctx: &mut LayerContext) -> Result<bool, LayerError> {
        let value = !self.is_shown();
        self.set_shown(ctx, value)?;
        Ok(value)
    }

    /// Flip `is_legend_visible` and return the new value.
    pub fn toggle_legend_visible(&mut self) -> bool {
        let value = !self.is_legend_visible();
        self.set_legend_visible(value);
        value
    }

    /// Assign `is_enabled`, running the transition if it changed.
    ///
    /// Enabling allocates the layer on every engine and shows it if hidden.
    /// Disabling hides a shown layer first, then releases it. If an engine
    /// fails the flag keeps its new value and the error is returned.
    pub fn set_enabled(&mut self, ctx: &mut LayerContext, value: bool) -> Result<(), LayerError> {
        if self.is_enabled.replace(value).is_none() {
            return Ok(());
        }
        tracing::debug!(layer = %self.info.name, enabled = value, "enabled changed");
        if value {
            self.on_enabled(ctx)?;
        } else {
            self.on_disabled(ctx)?;
        }
        self.is_enabled.notify();
        Ok(())
    }

    /// Assign `is_shown`, running the transition if it changed.
    ///
    /// Showing a disabled layer is refused with [`LayerError::NotEnabled`]
    /// and leaves the flag untouched.
    pub fn set_shown(&mut self, ctx: &mut LayerContext, value: bool) -> Result<(), LayerError> {
        if value && !self.is_enabled() {
            return Err(LayerError::NotEnabled(self.info.name.clone()));
        }
        if self.is_shown.replace(value).is_none() {
            return Ok(());
        }
        tracing::debug!(layer = %self.info.name, shown = value, "shown changed");
        if value {
            self.on_shown(ctx)?;
        } else {
            self.on_hidden(ctx)?;
        }
        self.is_shown.notify();
        Ok(())
    }

    /// Assign `is_legend_visible`. Only observers react.
    pub fn set_legend_visible(&mut self, value: bool) {
        self.is_legend_visible.set(value);
    }

    /// Fly every engine to this layer's extent.
    ///
    /// Skips unless the layer is enabled, shown and has a rectangle. Extents
    /// thinner than [`EPSILON3`] are padded; extents wider than
    /// [`MAX_ZOOM_WIDTH`] are refused with a warning.
    pub fn zoom_to(&self, ctx: &mut LayerContext) -> Result<ZoomOutcome, LayerError> {
        if !self.is_enabled() || !self.is_shown() {
            return Ok(ZoomOutcome::Skipped(ZoomSkip::NotVisible));
        }
        let Some(rectangle) = self.info.rectangle else {
            return Ok(ZoomOutcome::Skipped(ZoomSkip::NoRectangle));
        };

        let target = rectangle.padded(EPSILON3);
        let width = target.width();
        if width > MAX_ZOOM_WIDTH {
            tracing::warn!(
                layer = %self.info.name,
                width,
                "extent is too wide to zoom to"
            );
            return Ok(ZoomOutcome::Skipped(ZoomSkip::TooWide { width }));
        }

        for renderer in ctx.renderers_mut() {
            renderer.zoom_to(&target)?;
        }
        self.emit(AnalyticsAction::ZoomTo, None);
        Ok(ZoomOutcome::Flown(target))
    }

    /// Replay this layer's current state onto an engine that joined late.
    /// Fires no analytics.
    pub fn sync_renderer(&self, renderer: &mut dyn LayerRenderer) -> Result<(), LayerError> {
        if !self.is_enabled() {
            return Ok(());
        }
        let layer = self.layer_ref();
        renderer.enable(&layer)?;
        if self.is_shown() {
            renderer.show(&layer)?;
        }
        Ok(())
    }

    fn layer_ref(&self) -> LayerRef<'_> {
        LayerRef {
            id: self.id,
            name: &self.info.name,
            rectangle: self.info.rectangle,
        }
    }

    fn on_enabled(&mut self, ctx: &mut LayerContext) -> Result<(), LayerError> {
        let layer = self.layer_ref();
        for renderer in ctx.renderers_mut() {
            renderer.enable(&layer)?;
        }
        if !self.is_shown() {
            self.set_shown(ctx, true)?;
        }
        ctx.now_viewing_mut().add(self.id);
        self.enabled_at = Some(Instant::now());
        self.emit(AnalyticsAction::Added, None);
        Ok(())
    }

    fn on_disabled(&mut self, ctx: &mut LayerContext) -> Result<(), LayerError> {
        if self.is_shown() {
            self.set_shown(ctx, false)?;
        }
        let layer = self.layer_ref();
        for renderer in ctx.renderers_mut() {
            renderer.disable(&layer)?;
        }
        ctx.now_viewing_mut().remove(self.id);
        let duration = self.enabled_at.map(|t| t.elapsed().as_secs_f64());
        self.emit(AnalyticsAction::Removed, duration);
        Ok(())
    }

    fn on_shown(&mut self, ctx: &mut LayerContext) -> Result<(), LayerError> {
        let layer = self.layer_ref();
        for renderer in ctx.renderers_mut() {
            renderer.show(&layer)?;
        }
        self.shown_at = Some(Instant::now());
        self.emit(AnalyticsAction::Shown, None);
        Ok(())
    }

    fn on_hidden(&mut self, ctx: &mut LayerContext) -> Result<(), LayerError> {
        let layer = self.layer_ref();
        for renderer in ctx.renderers_mut() {
            renderer.hide(&layer)?;
        }
        let duration = self
            .shown_at
            .or(self.enabled_at)
            .map(|t| t.elapsed().as_secs_f64());
        self.emit(AnalyticsAction::Hidden, duration);
        Ok(())
    }

    fn emit(&self, action: AnalyticsAction, value: Option<f64>) {
        self.analytics
            .record(AnalyticsEvent::data_source(action, self.info.name.clone(), value));
    }
}

impl std::fmt::Debug for LayerViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerViewModel")
            .field("id", &self.id)
            .field("name", &self.info.name)
            .field("is_enabled", &self.is_enabled())
            .field("is_shown", &self.is_shown())
            .field("is_legend_visible", &self.is_legend_visible())
            .finish_non_exhaustive()
    }
}

//! Catalog configuration files.
//!
//! ```yaml
//! layers:
//!   - name: Coastline
//!     rectangle_degrees: { west: 110.0, south: -45.0, east: 155.0, north: -10.0 }
//!     legend_url: http://example.com/coast.png
//!     supports_opacity: true
//!     enabled: true
//!   - name: World
//! ```
//!
//! JSON and YAML are accepted, picked by file extension. `rectangle` is in
//! radians; `rectangle_degrees`, when present, takes precedence over it.

use std::path::Path;
use std::sync::Arc;

use geolayer_analytics::AnalyticsSink;
use geolayer_common::{ExtentError, Rectangle};
use geolayer_input::LayerAction;
use geolayer_viewmodel::{
    Catalog, CatalogError, LayerCapabilities, LayerContext, LayerInfo, LayerViewModel,
};
use serde::{Deserialize, Serialize};

/// Errors from loading or applying a catalog configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported config format `{0}` (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
    #[error("layer `{layer}`: {source}")]
    Extent {
        layer: String,
        #[source]
        source: ExtentError,
    },
    #[error("layer `{0}` is shown but not enabled")]
    ShownWithoutEnabled(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Extent written in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegreeRectangle {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

/// One layer entry: descriptive info, capabilities and initial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    #[serde(flatten)]
    pub info: LayerInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rectangle_degrees: Option<DegreeRectangle>,
    #[serde(flatten)]
    pub capabilities: LayerCapabilities,
    #[serde(default)]
    pub enabled: bool,
    /// Defaults to `enabled`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shown: Option<bool>,
    #[serde(default = "default_legend_visible")]
    pub legend_visible: bool,
}

fn default_legend_visible() -> bool {
    true
}

impl LayerConfig {
    /// The layer's extent after resolving degrees and validating ranges.
    pub fn resolved_rectangle(&self) -> Result<Option<Rectangle>, ConfigError> {
        let extent_error = |source| ConfigError::Extent {
            layer: self.info.name.clone(),
            source,
        };
        if let Some(d) = self.rectangle_degrees {
            return Rectangle::from_degrees(d.west, d.south, d.east, d.north)
                .map(Some)
                .map_err(extent_error);
        }
        match self.info.rectangle {
            Some(r) => Rectangle::new(r.west, r.south, r.east, r.north)
                .map(Some)
                .map_err(extent_error),
            None => Ok(None),
        }
    }
}

/// A whole catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
}

impl CatalogConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let text = std::fs::read_to_string(path)?;
        let config = match ext.as_str() {
            "json" => Self::from_json_str(&text)?,
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        tracing::info!(path = %path.display(), layers = config.layers.len(), "catalog config loaded");
        Ok(config)
    }

    /// Write as pretty JSON or YAML, by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let text = match ext.as_str() {
            "json" => serde_json::to_string_pretty(self)?,
            "yaml" | "yml" => serde_yaml::to_string(self)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Build a catalog, then bring each layer to its configured state through
    /// the view-model so engines and analytics see the usual transitions.
    pub fn build_catalog(
        &self,
        context: LayerContext,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Result<Catalog, ConfigError> {
        let mut catalog = Catalog::new(context);
        let mut initial = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let shown = layer.shown.unwrap_or(layer.enabled);
            if shown && !layer.enabled {
                return Err(ConfigError::ShownWithoutEnabled(layer.info.name.clone()));
            }
            let mut info = layer.info.clone();
            info.rectangle = layer.resolved_rectangle()?;
            let vm = LayerViewModel::new(info, Arc::clone(&analytics))
                .with_capabilities(layer.capabilities);
            initial.push((catalog.add(vm), layer.enabled, shown, layer.legend_visible));
        }

        for (id, enabled, shown, legend_visible) in initial {
            if enabled {
                catalog.apply(id, LayerAction::Enable)?;
                if !shown {
                    catalog.apply(id, LayerAction::Hide)?;
                }
            }
            if !legend_visible {
                catalog.apply(id, LayerAction::ToggleLegend)?;
            }
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geolayer_analytics::{AnalyticsAction, NullSink, RecordingSink};
    use geolayer_render::GlobeRenderer;

    const YAML: &str = r#"
layers:
  - name: Coastline
    rectangle_degrees: { west: 110.0, south: -45.0, east: 155.0, north: -10.0 }
    legend_url: http://example.com/coast.png
    supports_opacity: true
    enabled: true
  - name: Rivers
    enabled: true
    shown: false
    legend_visible: false
  - name: Unbounded
    rectangle: null
"#;

    #[test]
    fn parse_yaml_defaults() {
        let config = CatalogConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.layers.len(), 3);

        let coast = &config.layers[0];
        assert!(coast.capabilities.supports_opacity);
        assert!(!coast.capabilities.supports_reordering);
        assert!(coast.legend_visible);
        assert_eq!(coast.shown, None);

        let rivers = &config.layers[1];
        assert_eq!(rivers.info.rectangle, Some(Rectangle::MAX_VALUE));
        assert_eq!(config.layers[2].info.rectangle, None);
    }

    #[test]
    fn parse_json_radians() {
        let config = CatalogConfig::from_json_str(
            r#"{"layers": [{"name": "A", "rectangle": {"west": 0.1, "south": 0.1, "east": 0.2, "north": 0.2}}]}"#,
        )
        .unwrap();
        let r = config.layers[0].resolved_rectangle().unwrap().unwrap();
        assert_eq!(r.west, 0.1);
        assert!(!config.layers[0].enabled);
    }

    #[test]
    fn degrees_override_and_validate() {
        let config = CatalogConfig::from_yaml_str(YAML).unwrap();
        let r = config.layers[0].resolved_rectangle().unwrap().unwrap();
        assert!((r.west - 110f64.to_radians()).abs() < 1e-12);

        let bad = CatalogConfig::from_yaml_str(
            "layers:\n  - name: Bad\n    rectangle_degrees: { west: 0, south: 10, east: 1, north: 5 }\n",
        )
        .unwrap();
        assert!(matches!(
            bad.layers[0].resolved_rectangle(),
            Err(ConfigError::Extent { .. })
        ));
    }

    #[test]
    fn build_catalog_applies_initial_state() {
        let config = CatalogConfig::from_yaml_str(YAML).unwrap();
        let sink = Arc::new(RecordingSink::new());
        let catalog = config
            .build_catalog(LayerContext::new().with_renderer(GlobeRenderer::new()), sink.clone())
            .unwrap();

        let coast = catalog.find_by_name("Coastline").unwrap();
        assert!(coast.is_enabled() && coast.is_shown());
        assert!(coast.supports_opacity());

        let rivers = catalog.find_by_name("Rivers").unwrap();
        assert!(rivers.is_enabled());
        assert!(!rivers.is_shown());
        assert!(!rivers.is_legend_visible());

        let unbounded = catalog.find_by_name("Unbounded").unwrap();
        assert!(!unbounded.is_enabled());
        assert_eq!(unbounded.rectangle(), None);

        assert_eq!(catalog.now_viewing().len(), 2);
        assert_eq!(
            sink.actions()
                .iter()
                .filter(|a| **a == AnalyticsAction::Added)
                .count(),
            2
        );
    }

    #[test]
    fn shown_without_enabled_is_rejected() {
        let config =
            CatalogConfig::from_yaml_str("layers:\n  - name: Ghost\n    shown: true\n").unwrap();
        let err = config
            .build_catalog(LayerContext::new(), Arc::new(NullSink))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ShownWithoutEnabled(name) if name == "Ghost"));
    }

    #[test]
    fn load_and_save_by_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let config = CatalogConfig::from_yaml_str(YAML).unwrap();

        let json = tmp.path().join("catalog.json");
        config.save(&json).unwrap();
        assert_eq!(CatalogConfig::load(&json).unwrap(), config);

        let yaml = tmp.path().join("catalog.yml");
        config.save(&yaml).unwrap();
        assert_eq!(CatalogConfig::load(&yaml).unwrap(), config);

        let toml = tmp.path().join("catalog.toml");
        std::fs::write(&toml, "").unwrap();
        assert!(matches!(
            CatalogConfig::load(&toml),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"
        ));
    }
}

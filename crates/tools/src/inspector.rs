use geolayer_common::LayerId;
use geolayer_render::EngineKind;
use geolayer_viewmodel::Catalog;

/// Catalog inspector for developer tooling.
///
/// Read-only queries against a catalog for debugging and CLI output.
pub struct CatalogInspector;

impl CatalogInspector {
    /// Produce a summary of the catalog.
    pub fn summary(catalog: &Catalog) -> CatalogSummary {
        let layers = catalog.layers();
        CatalogSummary {
            layer_count: layers.len(),
            enabled: layers.iter().filter(|l| l.is_enabled()).count(),
            shown: layers.iter().filter(|l| l.is_shown()).count(),
            now_viewing: catalog.context().now_viewing().len(),
            engines: catalog.context().renderers().map(|r| r.kind()).collect(),
        }
    }

    /// Details for one layer, including how each engine sees it.
    pub fn inspect_layer(catalog: &Catalog, id: LayerId) -> Option<LayerDetails> {
        catalog.get(id).map(|layer| LayerDetails {
            id,
            name: layer.name().to_string(),
            enabled: layer.is_enabled(),
            shown: layer.is_shown(),
            legend_visible: layer.is_legend_visible(),
            has_legend: layer.has_legend(),
            legend_is_image: layer.legend_is_image(),
            rectangle: layer.rectangle().map(|r| {
                [
                    r.west.to_degrees(),
                    r.south.to_degrees(),
                    r.east.to_degrees(),
                    r.north.to_degrees(),
                ]
            }),
            engines: catalog
                .context()
                .renderers()
                .map(|r| (r.kind(), r.layer_state(id).is_some_and(|s| s.shown)))
                .collect(),
        })
    }

    /// List all layer ids in catalog order.
    pub fn list_layers(catalog: &Catalog) -> Vec<LayerId> {
        catalog.layers().iter().map(|l| l.id()).collect()
    }
}

/// Summary of catalog state for the inspector.
#[derive(Debug, Clone)]
pub struct CatalogSummary {
    pub layer_count: usize,
    pub enabled: usize,
    pub shown: usize,
    pub now_viewing: usize,
    pub engines: Vec<EngineKind>,
}

impl std::fmt::Display for CatalogSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let engines: Vec<String> = self.engines.iter().map(|e| e.to_string()).collect();
        write!(
            f,
            "Catalog: layers={} enabled={} shown={} now_viewing={} engines=[{}]",
            self.layer_count,
            self.enabled,
            self.shown,
            self.now_viewing,
            engines.join(", ")
        )
    }
}

/// Detailed info about a single layer.
#[derive(Debug, Clone)]
pub struct LayerDetails {
    pub id: LayerId,
    pub name: String,
    pub enabled: bool,
    pub shown: bool,
    pub legend_visible: bool,
    pub has_legend: bool,
    pub legend_is_image: bool,
    /// West, south, east, north in degrees.
    pub rectangle: Option<[f64; 4]>,
    /// Engine kind and whether the layer is visible there.
    pub engines: Vec<(EngineKind, bool)>,
}

impl std::fmt::Display for LayerDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Layer [{}] {} enabled={} shown={} legend={}",
            self.id.short(),
            self.name,
            self.enabled,
            self.shown,
            match (self.has_legend, self.legend_is_image, self.legend_visible) {
                (false, _, _) => "none",
                (true, _, false) => "hidden",
                (true, true, true) => "image",
                (true, false, true) => "link",
            }
        )?;
        match self.rectangle {
            Some([w, s, e, n]) => write!(f, " extent=({w:.2}, {s:.2}, {e:.2}, {n:.2})")?,
            None => write!(f, " extent=none")?,
        }
        for (engine, visible) in &self.engines {
            write!(f, " {engine}={}", if *visible { "visible" } else { "-" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geolayer_analytics::NullSink;
    use geolayer_input::LayerAction;
    use geolayer_render::{GlobeRenderer, TileMapRenderer};
    use geolayer_viewmodel::{LayerContext, LayerInfo, LayerViewModel};
    use std::sync::Arc;

    fn catalog() -> Catalog {
        let ctx = LayerContext::new()
            .with_renderer(GlobeRenderer::new())
            .with_renderer(TileMapRenderer::new());
        let mut catalog = Catalog::new(ctx);
        catalog.add(LayerViewModel::new(
            LayerInfo::new("Coastline").with_legend_url("http://x/coast.png"),
            Arc::new(NullSink),
        ));
        catalog.add(LayerViewModel::new(LayerInfo::new("Rivers"), Arc::new(NullSink)));
        catalog
    }

    #[test]
    fn summary_empty_catalog() {
        let catalog = Catalog::new(LayerContext::new());
        let summary = CatalogInspector::summary(&catalog);
        assert_eq!(summary.layer_count, 0);
        assert!(summary.engines.is_empty());
    }

    #[test]
    fn summary_counts_states() {
        let mut catalog = catalog();
        let ids = CatalogInspector::list_layers(&catalog);
        catalog.apply(ids[0], LayerAction::Enable).unwrap();

        let summary = CatalogInspector::summary(&catalog);
        assert_eq!(summary.layer_count, 2);
        assert_eq!(summary.enabled, 1);
        assert_eq!(summary.shown, 1);
        assert_eq!(summary.now_viewing, 1);
        assert_eq!(
            summary.to_string(),
            "Catalog: layers=2 enabled=1 shown=1 now_viewing=1 engines=[globe, tile-map]"
        );
    }

    #[test]
    fn inspect_layer_found() {
        let mut catalog = catalog();
        let id = CatalogInspector::list_layers(&catalog)[0];
        catalog.apply(id, LayerAction::Enable).unwrap();

        let details = CatalogInspector::inspect_layer(&catalog, id).unwrap();
        assert!(details.has_legend && details.legend_is_image);
        assert_eq!(
            details.engines,
            vec![(EngineKind::Globe, true), (EngineKind::TileMap, true)]
        );
        let text = details.to_string();
        assert!(text.contains("Coastline"));
        assert!(text.contains("legend=image"));
        assert!(text.contains("extent=(-180.00, -90.00, 180.00, 90.00)"));
        assert!(text.contains("globe=visible"));
    }

    #[test]
    fn inspect_layer_not_found() {
        let catalog = catalog();
        assert!(CatalogInspector::inspect_layer(&catalog, LayerId::new()).is_none());
    }

    #[test]
    fn disabled_layer_is_invisible_everywhere() {
        let catalog = catalog();
        let id = CatalogInspector::list_layers(&catalog)[1];
        let details = CatalogInspector::inspect_layer(&catalog, id).unwrap();
        assert!(details.engines.iter().all(|(_, visible)| !visible));
        assert!(details.to_string().contains("legend=none"));
    }
}

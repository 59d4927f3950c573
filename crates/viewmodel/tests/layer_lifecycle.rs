//! End-to-end layer lifecycle across both engines.

use std::sync::Arc;

use geolayer_analytics::{AnalyticsAction, RecordingSink};
use geolayer_common::{EPSILON3, Rectangle};
use geolayer_input::LayerCommand;
use geolayer_render::{EngineKind, GlobeRenderer, TileMapRenderer};
use geolayer_viewmodel::{
    ActionOutcome, Catalog, LayerContext, LayerInfo, LayerViewModel, ZoomOutcome, ZoomSkip,
};

fn setup() -> (Catalog, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let ctx = LayerContext::new()
        .with_renderer(GlobeRenderer::new())
        .with_renderer(TileMapRenderer::new());
    let mut catalog = Catalog::new(ctx);

    let coast = Rectangle::from_degrees(110.0, -45.0, 155.0, -10.0).unwrap();
    catalog.add(LayerViewModel::new(
        LayerInfo::new("Coastline")
            .with_rectangle(coast)
            .with_legend_url("http://example.com/coast.png"),
        sink.clone(),
    ));
    let gauge = Rectangle::from_degrees(149.1, -35.3, 149.1, -35.3).unwrap();
    catalog.add(LayerViewModel::new(
        LayerInfo::new("Gauge").with_rectangle(gauge),
        sink.clone(),
    ));
    catalog.add(LayerViewModel::new(LayerInfo::new("World"), sink.clone()));
    (catalog, sink)
}

fn run(catalog: &mut Catalog, command: &str) -> ActionOutcome {
    let command: LayerCommand = command.parse().unwrap();
    catalog.execute(&command).unwrap()
}

#[test]
fn enable_zoom_disable_round_trip() {
    let (mut catalog, sink) = setup();

    run(&mut catalog, "enable:Coastline");
    let coast = catalog.find_by_name("Coastline").unwrap();
    assert!(coast.is_shown());
    assert!(coast.has_legend());
    assert!(coast.legend_is_image());
    let id = coast.id();
    for engine in catalog.context().renderers() {
        assert!(engine.layer_state(id).unwrap().shown);
    }

    let ActionOutcome::Zoom(ZoomOutcome::Flown(target)) = run(&mut catalog, "zoom:Coastline")
    else {
        panic!("expected a flight");
    };
    let globe = catalog.context().renderer(EngineKind::Globe).unwrap();
    assert_eq!(globe.camera_target(), Some(target));
    let map = catalog.context().renderer(EngineKind::TileMap).unwrap();
    let fitted = map.camera_target().unwrap();
    assert!((fitted.south - target.south).abs() < 1e-9);

    run(&mut catalog, "disable:Coastline");
    assert!(catalog.now_viewing().is_empty());
    assert_eq!(
        sink.actions(),
        vec![
            AnalyticsAction::Shown,
            AnalyticsAction::Added,
            AnalyticsAction::ZoomTo,
            AnalyticsAction::Hidden,
            AnalyticsAction::Removed,
        ]
    );
    let removed = sink.last(AnalyticsAction::Removed).unwrap();
    assert_eq!(removed.label, "Coastline");
    assert!(removed.value.unwrap() >= 0.0);
}

#[test]
fn point_layers_get_padded_and_world_layers_refused() {
    let (mut catalog, _) = setup();
    run(&mut catalog, "enable:Gauge");
    run(&mut catalog, "enable:World");

    let ActionOutcome::Zoom(ZoomOutcome::Flown(target)) = run(&mut catalog, "zoom:Gauge") else {
        panic!("expected a flight");
    };
    assert!((target.width() - 2.0 * EPSILON3).abs() < 1e-9);
    assert!((target.height() - 2.0 * EPSILON3).abs() < 1e-9);

    let outcome = run(&mut catalog, "zoom:World");
    assert!(matches!(
        outcome,
        ActionOutcome::Zoom(ZoomOutcome::Skipped(ZoomSkip::TooWide { .. }))
    ));
    // the refused zoom leaves the previous target in place
    let globe = catalog.context().renderer(EngineKind::Globe).unwrap();
    assert_eq!(globe.camera_target(), Some(target));
}

#[test]
fn now_viewing_follows_enable_order() {
    let (mut catalog, _) = setup();
    run(&mut catalog, "enable:World");
    run(&mut catalog, "enable:Coastline");
    run(&mut catalog, "toggle-enabled:Gauge");

    let names: Vec<&str> = catalog.now_viewing().iter().map(|l| l.name()).collect();
    assert_eq!(names, vec!["World", "Coastline", "Gauge"]);

    run(&mut catalog, "toggle-enabled:Coastline");
    let names: Vec<&str> = catalog.now_viewing().iter().map(|l| l.name()).collect();
    assert_eq!(names, vec!["World", "Gauge"]);
}

#[test]
fn hidden_layers_stay_enabled_on_engines() {
    let (mut catalog, sink) = setup();
    run(&mut catalog, "enable:Coastline");
    sink.drain();
    run(&mut catalog, "hide:Coastline");

    let coast = catalog.find_by_name("Coastline").unwrap();
    assert!(coast.is_enabled());
    assert!(!coast.is_shown());
    let id = coast.id();
    for engine in catalog.context().renderers() {
        let state = engine.layer_state(id).unwrap();
        assert!(state.enabled && !state.shown);
    }
    assert_eq!(sink.actions(), vec![AnalyticsAction::Hidden]);
    assert!(sink.events()[0].value.unwrap() >= 0.0);
}

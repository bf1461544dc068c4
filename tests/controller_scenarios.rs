use mapstate::{
    AnyMeta, IconPreset, JsonFilePreferences, LatLng, LayerKind, MapContainer, MapController, MapError,
    MarkerOptions, MemoryPreferences, Polyline, PolylineOptions, PreferenceStore,
    TileLayerDefinition,
};
use serde_json::json;
use std::{cell::RefCell, rc::Rc};

fn initialized() -> MapController {
    let mut controller = MapController::new(MemoryPreferences::new());
    controller.initialize(MapContainer::new("map").with_size(800.0, 600.0));
    controller
}

#[test]
fn every_tile_layer_round_trips_through_preferences() {
    let mut controller = initialized();

    for definition in TileLayerDefinition::all() {
        controller.change_tile_layer(definition.id).unwrap();

        assert_eq!(controller.current_tile_layer().get().as_str(), definition.id);
        assert_eq!(
            controller.preferences().get("tile_layer").as_deref(),
            Some(definition.id)
        );
        assert_eq!(controller.map().unwrap().count_of_kind(LayerKind::Tile), 1);
    }
}

#[test]
fn fresh_preferences_select_osm() {
    let controller = initialized();
    assert_eq!(controller.current_tile_layer().get().as_str(), "osm");
    assert_eq!(controller.active_tile_definition().name, "OpenStreetMap");
}

#[test]
fn tile_choice_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let mut first: MapController<AnyMeta, AnyMeta, AnyMeta, JsonFilePreferences> =
        MapController::new(JsonFilePreferences::open(&path).unwrap());
    first.initialize(MapContainer::new("map"));
    first.change_tile_layer("cartodb_light").unwrap();
    drop(first);

    let mut second: MapController<AnyMeta, AnyMeta, AnyMeta, JsonFilePreferences> =
        MapController::new(JsonFilePreferences::open(&path).unwrap());
    second.initialize(MapContainer::new("map"));
    assert_eq!(second.current_tile_layer().get().as_str(), "cartodb_light");
}

#[test]
fn source_marker_add_and_remove() {
    let mut controller = initialized();

    let id = controller
        .add_marker(9.9, 78.0, MarkerOptions::default().with_icon(IconPreset::Source))
        .unwrap();
    assert_eq!(controller.markers().len(), 1);
    assert_eq!(controller.markers().get(0).unwrap().id, id);
    assert_eq!(controller.marker(id).unwrap().preset(), IconPreset::Source);
    assert_eq!(controller.marker(id).unwrap().position(), LatLng::new(9.9, 78.0));

    controller.remove_marker(id).unwrap();
    assert!(controller.markers().is_empty());
    assert!(!controller.map().unwrap().has_layer(id));

    // second removal of the same id is a no-op
    controller.remove_marker(id).unwrap();
}

#[test]
fn polyline_defaults_and_view_fit() {
    let mut controller = initialized();

    let id = controller
        .add_polylines(
            &[vec![[9.9, 78.0], [10.0, 78.1]]],
            PolylineOptions::default(),
            None,
        )
        .unwrap();
    assert_eq!(controller.polylines().len(), 1);

    let map = controller.map().unwrap();
    let style = map.layer::<Polyline>(id).unwrap().style();
    assert_eq!(style.color, "#2563eb");
    assert_eq!(style.weight, 5.0);
    assert_eq!(style.opacity, 0.7);
    assert_eq!(style.smooth_factor, 1.0);

    let visible = map.viewport().bounds();
    assert!(visible.contains(&LatLng::new(9.9, 78.0)));
    assert!(visible.contains(&LatLng::new(10.0, 78.1)));
}

#[test]
fn polyline_overrides_are_kept() {
    let mut controller = initialized();
    let id = controller
        .add_polylines(
            &[vec![[9.9, 78.0], [10.0, 78.1]]],
            PolylineOptions::default().color("#ff0000").weight(2.0),
            Some(json!({ "route": "A" })),
        )
        .unwrap();

    let style = controller
        .map()
        .unwrap()
        .layer::<Polyline>(id)
        .unwrap()
        .style()
        .clone();
    assert_eq!(style.color, "#ff0000");
    assert_eq!(style.weight, 2.0);
    assert_eq!(style.opacity, 0.7);
    assert_eq!(
        controller.polylines().get(0).unwrap().meta,
        Some(json!({ "route": "A" }))
    );
}

#[test]
fn clear_all_layers_empties_every_kind() {
    let mut controller = initialized();

    for i in 0..3 {
        controller
            .add_marker(9.0 + i as f64 * 0.1, 78.0, MarkerOptions::default())
            .unwrap();
    }
    for _ in 0..2 {
        controller
            .add_polylines(&[vec![[9.9, 78.0], [10.0, 78.1]]], PolylineOptions::default(), None)
            .unwrap();
    }
    controller
        .add_geojson(
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [78.0, 9.9] },
                    "properties": { "color": "#10b981" }
                }]
            }),
            Default::default(),
            None,
        )
        .unwrap();

    controller.clear_all_layers().unwrap();

    assert!(controller.markers().is_empty());
    assert!(controller.polylines().is_empty());
    assert!(controller.geojsons().is_empty());

    let map = controller.map().unwrap();
    assert_eq!(map.count_of_kind(LayerKind::Marker), 0);
    assert_eq!(map.count_of_kind(LayerKind::Polyline), 0);
    assert_eq!(map.count_of_kind(LayerKind::GeoJson), 0);
    assert_eq!(map.count_of_kind(LayerKind::Tile), 1);
}

#[test]
fn unknown_tile_layer_is_rejected() {
    let mut controller = initialized();
    controller.change_tile_layer("cartodb_dark").unwrap();

    let err = controller.change_tile_layer("unknown_id").unwrap_err();
    assert!(matches!(err, MapError::UnknownTileLayer(_)));
    assert_eq!(err.to_string(), "Unknown tile layer: unknown_id");

    assert_eq!(controller.current_tile_layer().get().as_str(), "cartodb_dark");
    assert_eq!(
        controller.preferences().get("tile_layer").as_deref(),
        Some("cartodb_dark")
    );
}

#[test]
fn subscribers_see_list_changes() {
    let mut controller = initialized();
    let lengths = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&lengths);
    controller
        .markers_mut()
        .subscribe(move |markers, _| sink.borrow_mut().push(markers.len()));

    let id = controller
        .add_marker(9.9, 78.0, MarkerOptions::default())
        .unwrap();
    controller
        .add_marker(10.0, 78.1, MarkerOptions::default())
        .unwrap();
    controller.remove_marker(id).unwrap();
    controller.clear_markers().unwrap();

    assert_eq!(*lengths.borrow(), vec![1, 2, 1, 0]);
}

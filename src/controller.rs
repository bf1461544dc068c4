//! Binds the headless map to observable UI state
//!
//! `MapController` is the single writer of both the map's layers and the
//! reactive lists that mirror them. Every tracked record names a layer that
//! is live on the map, and removals update both sides together.

use crate::{
    core::{
        config::ControllerConfig,
        geo::{LatLng, Point},
        map::{Map, MapContainer, MapOptions},
    },
    data::geojson::{GeoJsonLayer, GeoJsonOptions},
    layers::{
        base::{LayerId, LayerTrait},
        marker::{Marker, MarkerOptions},
        tile::TileLayer,
        vector::{Polyline, PolylineOptions},
    },
    preferences::{MemoryPreferences, PreferenceStore},
    reactive::{Reactive, ReactiveList},
    tiles::registry::{TileLayerDefinition, TileLayerId},
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// A tracked overlay: the map-assigned id plus the caller's payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord<M> {
    pub id: LayerId,
    pub meta: Option<M>,
}

/// Default payload type for callers that do not need a typed one
pub type AnyMeta = serde_json::Value;

pub struct MapController<
    MM = AnyMeta,
    PM = AnyMeta,
    GM = AnyMeta,
    P: PreferenceStore = MemoryPreferences,
> {
    config: ControllerConfig,
    preferences: P,
    map: Option<Map>,
    active_tile_layer: Option<LayerId>,
    /// Highest layer id any map of this controller handed out
    last_layer_id: LayerId,
    current_tile_layer: Reactive<TileLayerId>,
    markers: ReactiveList<LayerRecord<MM>>,
    polylines: ReactiveList<LayerRecord<PM>>,
    geojsons: ReactiveList<LayerRecord<GM>>,
}

impl<MM, PM, GM, P: PreferenceStore> MapController<MM, PM, GM, P> {
    pub fn new(preferences: P) -> Self {
        Self::build(ControllerConfig::default(), preferences)
    }

    pub fn with_config(config: ControllerConfig, preferences: P) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, preferences))
    }

    fn build(config: ControllerConfig, preferences: P) -> Self {
        let stored = Self::stored_tile_layer(&config, &preferences);
        Self {
            config,
            preferences,
            map: None,
            active_tile_layer: None,
            last_layer_id: LayerId::UNASSIGNED,
            current_tile_layer: Reactive::new(stored),
            markers: ReactiveList::new(),
            polylines: ReactiveList::new(),
            geojsons: ReactiveList::new(),
        }
    }

    /// Last used tile layer, or the configured fallback when the stored
    /// value is missing or no longer registered
    fn stored_tile_layer(config: &ControllerConfig, preferences: &P) -> TileLayerId {
        match preferences.get(&config.preference_key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::debug!("ignoring unknown stored tile layer '{}'", raw);
                config.fallback_tile_layer_id()
            }),
            None => config.fallback_tile_layer_id(),
        }
    }

    /// Creates the map inside `container` with the stored tile layer
    ///
    /// Calling this again tears the previous map down first, dropping its
    /// layers and emptying every tracked list.
    pub fn initialize(&mut self, container: MapContainer) {
        if self.map.is_some() {
            log::warn!("map re-initialized; disposing the previous instance");
            self.teardown();
        }

        let mut map = Map::new(
            container,
            self.config.container_size,
            MapOptions::from(&self.config),
        );
        map.resume_layer_ids(self.last_layer_id);
        map.set_view(self.config.default_center, self.config.default_zoom);

        let tile_id = Self::stored_tile_layer(&self.config, &self.preferences);
        self.active_tile_layer = Some(map.add_layer(Box::new(TileLayer::new(tile_id))));
        self.map = Some(map);
        self.current_tile_layer.set(tile_id);

        log::info!("map initialized with tile layer '{}'", tile_id);
    }

    /// Drops the map and every tracked record
    pub fn teardown(&mut self) {
        if let Some(mut map) = self.map.take() {
            self.last_layer_id = map.last_layer_id();
            let removed = map.clear_layers();
            log::debug!("disposed map with {} layers", removed);
        }
        self.active_tile_layer = None;
        self.markers.take_all();
        self.polylines.take_all();
        self.geojsons.take_all();
    }

    pub fn is_initialized(&self) -> bool {
        self.map.is_some()
    }

    pub fn map(&self) -> Result<&Map> {
        self.map.as_ref().ok_or(MapError::NotInitialized)
    }

    /// Resizes the map after the host container was laid out
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        let map = self.map.as_mut().ok_or(MapError::NotInitialized)?;
        map.set_size(Point::new(width, height));
        Ok(())
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn preferences(&self) -> &P {
        &self.preferences
    }

    pub fn current_tile_layer(&self) -> &Reactive<TileLayerId> {
        &self.current_tile_layer
    }

    /// Subscribable handle on the current tile layer
    pub fn current_tile_layer_mut(&mut self) -> &mut Reactive<TileLayerId> {
        &mut self.current_tile_layer
    }

    pub fn active_tile_definition(&self) -> &'static TileLayerDefinition {
        self.current_tile_layer.get().definition()
    }

    /// Switches the basemap and remembers the choice
    ///
    /// Unknown ids are rejected before anything changes. Without a map this
    /// is a no-op.
    pub fn change_tile_layer(&mut self, id: &str) -> Result<()> {
        let tile_id: TileLayerId = id.parse()?;

        let Some(map) = self.map.as_mut() else {
            log::debug!("change_tile_layer('{}') before initialize; ignored", id);
            return Ok(());
        };

        if let Some(previous) = self.active_tile_layer.take() {
            map.remove_layer(previous);
        }
        self.active_tile_layer = Some(map.add_layer(Box::new(TileLayer::new(tile_id))));
        self.current_tile_layer.set(tile_id);

        if let Err(e) = self
            .preferences
            .set(&self.config.preference_key, tile_id.as_str())
        {
            log::warn!("failed to persist tile layer '{}': {}", tile_id, e);
        }

        log::info!("tile layer changed to '{}'", tile_id);
        Ok(())
    }

    /// One zoom step in; returns whether the view changed
    pub fn zoom_in(&mut self) -> bool {
        self.map.as_mut().map_or(false, Map::zoom_in)
    }

    /// One zoom step out; returns whether the view changed
    pub fn zoom_out(&mut self) -> bool {
        self.map.as_mut().map_or(false, Map::zoom_out)
    }

    pub fn markers(&self) -> &ReactiveList<LayerRecord<MM>> {
        &self.markers
    }

    pub fn markers_mut(&mut self) -> &mut ReactiveList<LayerRecord<MM>> {
        &mut self.markers
    }

    pub fn polylines(&self) -> &ReactiveList<LayerRecord<PM>> {
        &self.polylines
    }

    pub fn polylines_mut(&mut self) -> &mut ReactiveList<LayerRecord<PM>> {
        &mut self.polylines
    }

    pub fn geojsons(&self) -> &ReactiveList<LayerRecord<GM>> {
        &self.geojsons
    }

    pub fn geojsons_mut(&mut self) -> &mut ReactiveList<LayerRecord<GM>> {
        &mut self.geojsons
    }

    /// Places a marker and tracks it; returns the marker's layer id
    pub fn add_marker(
        &mut self,
        latitude: f64,
        longitude: f64,
        options: MarkerOptions<MM>,
    ) -> Result<LayerId> {
        let map = self.map.as_mut().ok_or(MapError::NotInitialized)?;

        let position = LatLng::new(latitude, longitude);
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "marker at ({}, {}) is out of range",
                latitude, longitude
            )));
        }

        let marker = Marker::with_icon(position, options.icon.unwrap_or_default());
        let id = map.add_layer(Box::new(marker));
        self.markers.push(LayerRecord {
            id,
            meta: options.meta,
        });
        Ok(id)
    }

    /// Borrows a tracked marker
    pub fn marker(&self, id: LayerId) -> Option<&Marker> {
        self.map.as_ref()?.layer::<Marker>(id)
    }

    /// Removes a tracked marker; ids that are not tracked markers are ignored
    pub fn remove_marker(&mut self, id: LayerId) -> Result<()> {
        let map = self.map.as_mut().ok_or(MapError::NotInitialized)?;
        if self.markers.remove_first(|record| record.id == id).is_some() {
            map.remove_layer(id);
        }
        Ok(())
    }

    pub fn clear_markers(&mut self) -> Result<()> {
        let map = self.map.as_mut().ok_or(MapError::NotInitialized)?;
        for record in self.markers.take_all() {
            map.remove_layer(record.id);
        }
        Ok(())
    }

    /// Draws `[lat, lng]` line strings as one layer and fits the view to it
    pub fn add_polylines(
        &mut self,
        points: &[Vec<[f64; 2]>],
        options: PolylineOptions,
        meta: Option<PM>,
    ) -> Result<LayerId> {
        let map = self.map.as_mut().ok_or(MapError::NotInitialized)?;

        let polyline = Polyline::new(points, options.resolve())?;
        let bounds = polyline.bounds();
        let id = map.add_layer(Box::new(polyline));
        self.polylines.push(LayerRecord { id, meta });

        if let Some(bounds) = bounds {
            map.fit_bounds(&bounds);
        }
        Ok(id)
    }

    pub fn clear_polylines(&mut self) -> Result<()> {
        let map = self.map.as_mut().ok_or(MapError::NotInitialized)?;
        for record in self.polylines.take_all() {
            map.remove_layer(record.id);
        }
        Ok(())
    }

    /// Renders GeoJSON styled from each feature's properties
    pub fn add_geojson(
        &mut self,
        data: serde_json::Value,
        options: GeoJsonOptions,
        meta: Option<GM>,
    ) -> Result<LayerId> {
        let map = self.map.as_mut().ok_or(MapError::NotInitialized)?;

        let layer = GeoJsonLayer::from_value(data)?;
        let bounds = layer.compute_bounds();
        let id = map.add_layer(Box::new(layer));
        self.geojsons.push(LayerRecord { id, meta });

        if let (true, Some(bounds)) = (options.fit_bounds, bounds) {
            map.fit_bounds(&bounds);
        }
        Ok(id)
    }

    pub fn clear_geojsons(&mut self) -> Result<()> {
        let map = self.map.as_mut().ok_or(MapError::NotInitialized)?;
        for record in self.geojsons.take_all() {
            map.remove_layer(record.id);
        }
        Ok(())
    }

    /// Clears markers, then polylines, then GeoJSON
    pub fn clear_all_layers(&mut self) -> Result<()> {
        self.clear_markers()?;
        self.clear_polylines()?;
        self.clear_geojsons()
    }
}

impl<MM, PM, GM, P: PreferenceStore + Default> Default for MapController<MM, PM, GM, P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

use crate::{
    core::{
        config::ControllerConfig,
        constants::{DEFAULT_ZOOM_DELTA, FIT_BOUNDS_PADDING, MAX_ZOOM, MIN_ZOOM},
        events::{EventManager, MapEvent},
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    layers::{
        base::{LayerId, LayerKind, LayerTrait},
        manager::LayerManager,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// Whether the host should draw +/- zoom buttons
    pub zoom_control: bool,
    pub zoom_delta: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub fit_bounds_padding: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            zoom_control: true,
            zoom_delta: DEFAULT_ZOOM_DELTA,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            fit_bounds_padding: FIT_BOUNDS_PADDING,
        }
    }
}

impl From<&ControllerConfig> for MapOptions {
    fn from(config: &ControllerConfig) -> Self {
        Self {
            zoom_control: false,
            zoom_delta: config.zoom_delta,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            fit_bounds_padding: config.fit_bounds_padding,
        }
    }
}

/// UI element the map is mounted in
#[derive(Debug, Clone, PartialEq)]
pub struct MapContainer {
    pub id: String,
    /// Size in pixels, `None` when the host has not laid it out yet
    pub size: Option<Point>,
}

impl MapContainer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            size: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Point::new(width, height));
        self
    }
}

/// Headless map: owns the layers and the view, leaves drawing to the host
pub struct Map {
    container: MapContainer,
    viewport: Viewport,
    layer_manager: LayerManager,
    event_manager: EventManager,
    options: MapOptions,
}

impl Map {
    pub fn new(container: MapContainer, default_size: Point, options: MapOptions) -> Self {
        let size = container.size.unwrap_or(default_size);
        let mut viewport = Viewport::new(LatLng::default(), options.min_zoom, size);
        viewport.set_zoom_limits(options.min_zoom, options.max_zoom);

        Self {
            container,
            viewport,
            layer_manager: LayerManager::new(),
            event_manager: EventManager::new(),
            options,
        }
    }

    pub fn container(&self) -> &MapContainer {
        &self.container
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Resizes the view, e.g. after the host container was laid out
    pub fn set_size(&mut self, size: Point) {
        self.viewport.set_size(size);
        self.container.size = Some(size);
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        let old_center = self.viewport.center;
        let old_zoom = self.viewport.zoom;

        self.viewport.set_center(center);
        self.viewport.set_zoom(zoom);

        if self.viewport.center != old_center || self.viewport.zoom != old_zoom {
            self.emit_view_changed();
        }
    }

    /// Steps zoom in by the configured delta; returns whether the view changed
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(self.options.zoom_delta)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(-self.options.zoom_delta)
    }

    fn zoom_by(&mut self, delta: f64) -> bool {
        let changed = self.viewport.zoom_by(delta);
        if changed {
            self.emit_view_changed();
        }
        changed
    }

    /// Moves and zooms the view so `bounds` is fully visible
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        self.viewport
            .fit_bounds(bounds, Some(self.options.fit_bounds_padding));
        self.emit_view_changed();
    }

    /// Adds a layer and returns the id the map stamped on it
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> LayerId {
        let kind = layer.kind();
        let caps_zoom = layer.max_zoom().is_some();
        let layer_id = self.layer_manager.add_layer(layer);

        log::debug!("added {} layer {}", kind, layer_id);
        self.event_manager.emit(MapEvent::LayerAdd { layer_id, kind });
        if caps_zoom {
            self.refresh_zoom_limits();
        }
        layer_id
    }

    /// Removes a layer; unknown ids are ignored
    pub fn remove_layer(&mut self, layer_id: LayerId) -> Option<Box<dyn LayerTrait>> {
        let layer = self.layer_manager.remove_layer(layer_id)?;
        let kind = layer.kind();

        log::debug!("removed {} layer {}", kind, layer_id);
        self.event_manager
            .emit(MapEvent::LayerRemove { layer_id, kind });
        if layer.max_zoom().is_some() {
            self.refresh_zoom_limits();
        }
        Some(layer)
    }

    /// Removes every layer
    pub fn clear_layers(&mut self) -> usize {
        let removed = self.layer_manager.drain();
        for layer in &removed {
            self.event_manager.emit(MapEvent::LayerRemove {
                layer_id: layer.id(),
                kind: layer.kind(),
            });
        }
        self.refresh_zoom_limits();
        removed.len()
    }

    /// Highest id this map has stamped so far
    pub fn last_layer_id(&self) -> LayerId {
        self.layer_manager.last_id()
    }

    /// Makes new layers get ids above `last`
    pub(crate) fn resume_layer_ids(&mut self, last: LayerId) {
        self.layer_manager.resume_after(last);
    }

    pub fn has_layer(&self, layer_id: LayerId) -> bool {
        self.layer_manager.contains(layer_id)
    }

    pub fn get_layer(&self, layer_id: LayerId) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    /// Borrows a layer as its concrete type
    pub fn layer<T: LayerTrait + 'static>(&self, layer_id: LayerId) -> Option<&T> {
        self.layer_manager
            .get_layer(layer_id)
            .and_then(|layer| layer.as_any().downcast_ref::<T>())
    }

    pub fn for_each_layer<F>(&self, f: F)
    where
        F: FnMut(&dyn LayerTrait),
    {
        self.layer_manager.for_each_layer(f);
    }

    /// Layer ids in the order they were added
    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layer_manager.layer_ids()
    }

    pub fn layer_count(&self) -> usize {
        self.layer_manager.len()
    }

    pub fn count_of_kind(&self, kind: LayerKind) -> usize {
        self.layer_manager.count_of_kind(kind)
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    /// The deepest zoom is the map option capped by the deepest layer
    fn refresh_zoom_limits(&mut self) {
        let mut layer_max: Option<f64> = None;
        self.layer_manager.for_each_layer(|layer| {
            if let Some(max) = layer.max_zoom() {
                layer_max = Some(layer_max.map_or(max, |current| current.max(max)));
            }
        });

        let max_zoom = layer_max.map_or(self.options.max_zoom, |max| max.min(self.options.max_zoom));
        self.viewport.set_zoom_limits(self.options.min_zoom, max_zoom);
    }

    fn emit_view_changed(&mut self) {
        self.event_manager.emit(MapEvent::ViewChanged {
            center: self.viewport.center,
            zoom: self.viewport.zoom,
        });
    }
}

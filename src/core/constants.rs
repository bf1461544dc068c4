//! Controller defaults and Leaflet-derived magic numbers.
//! Keeping them in a single place makes it easier to tweak them.

/// Latitude the map opens on before any layer moves it.
pub const DEFAULT_CENTER_LAT: f64 = 9.9178343;

/// Longitude the map opens on before any layer moves it.
pub const DEFAULT_CENTER_LNG: f64 = 78.0815385;

/// Zoom the map opens on.
pub const DEFAULT_ZOOM: f64 = 11.0;

/// Programmatic +/- zoom step when calling `zoom_in/zoom_out`.
pub const DEFAULT_ZOOM_DELTA: f64 = 1.0;

/// Widest zoom range any registered tile provider serves.
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 20.0;

/// Viewport size used when the container does not report one.
pub const DEFAULT_CONTAINER_SIZE: (f64, f64) = (800.0, 600.0);

/// Padding in pixels kept around shapes when fitting the view to them.
pub const FIT_BOUNDS_PADDING: f64 = 20.0;

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Preference slot holding the last used tile layer id.
pub const TILE_LAYER_PREFERENCE_KEY: &str = "tile_layer";

/// Tile layer used when no usable preference is stored.
pub const FALLBACK_TILE_LAYER: &str = "osm";

/// Marker icon size in pixels.
pub const MARKER_ICON_SIZE: (u32, u32) = (32, 32);

/// Anchor inside the icon (hot-spot): bottom centre.
pub const MARKER_ICON_ANCHOR: (u32, u32) = (16, 32);

/// Polyline stroke defaults.
pub const DEFAULT_POLYLINE_COLOR: &str = "#2563eb";
pub const DEFAULT_POLYLINE_WEIGHT: f64 = 5.0;
pub const DEFAULT_POLYLINE_OPACITY: f64 = 0.7;
pub const DEFAULT_SMOOTH_FACTOR: f64 = 1.0;

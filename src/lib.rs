//! # mapstate
//!
//! Keeps a Leaflet-style map and the UI state describing it in step.
//!
//! [`MapController`] owns a headless [`Map`] plus observable lists of the
//! markers, polylines and GeoJSON shapes drawn on it, and remembers the
//! chosen basemap through a [`PreferenceStore`].

pub mod controller;
pub mod core;
pub mod data;
pub mod layers;
pub mod preferences;
pub mod prelude;
pub mod reactive;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use controller::{AnyMeta, LayerRecord, MapController};

pub use crate::core::{
    config::ControllerConfig,
    events::MapEvent,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{Map, MapContainer, MapOptions},
    viewport::Viewport,
};

pub use layers::{
    base::{LayerId, LayerKind, LayerTrait},
    marker::{Icon, IconPreset, Marker, MarkerOptions},
    tile::TileLayer,
    vector::{Polyline, PolylineOptions, PolylineStyle},
};

pub use data::geojson::{FeatureStyle, GeoJson, GeoJsonFeature, GeoJsonLayer, GeoJsonOptions};

pub use preferences::{JsonFilePreferences, MemoryPreferences, PreferenceStore};

#[cfg(feature = "wasm")]
pub use preferences::LocalStoragePreferences;

pub use reactive::{ListChange, Reactive, ReactiveList, SubscriptionId};

pub use tiles::registry::{TileLayerDefinition, TileLayerId};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Map is not initialized")]
    NotInitialized,

    #[error("Unknown tile layer: {0}")]
    UnknownTileLayer(String),

    #[error("Empty geometry: {0}")]
    EmptyGeometry(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Preference storage error: {0}")]
    Preferences(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger`, honouring `RUST_LOG`; repeated calls are ignored
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}

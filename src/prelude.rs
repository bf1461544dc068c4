//! Prelude module for common mapstate types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapstate::prelude::*;`

pub use crate::core::{
    config::ControllerConfig,
    events::MapEvent,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{Map, MapContainer, MapOptions},
    viewport::Viewport,
};

pub use crate::controller::{LayerRecord, MapController};

pub use crate::layers::{
    base::{LayerId, LayerKind, LayerTrait},
    marker::{IconPreset, Marker, MarkerOptions},
    tile::TileLayer,
    vector::{Polyline, PolylineOptions},
};

pub use crate::data::geojson::{GeoJson, GeoJsonLayer, GeoJsonOptions};

pub use crate::preferences::{JsonFilePreferences, MemoryPreferences, PreferenceStore};

pub use crate::reactive::{ListChange, Reactive, ReactiveList};

pub use crate::tiles::registry::{TileLayerDefinition, TileLayerId};

pub use crate::{Error as MapError, Result};

pub use std::collections::VecDeque;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

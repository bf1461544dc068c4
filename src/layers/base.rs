use crate::{core::geo::LatLngBounds, MapError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identifier the map assigns to a layer when it is added
///
/// Ids come from a per-map counter that starts at 1; `LayerId::UNASSIGNED`
/// marks a layer that has not been added to a map yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(u64);

impl LayerId {
    pub const UNASSIGNED: LayerId = LayerId(0);

    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LayerId {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(LayerId)
            .map_err(|e| MapError::ParseError(format!("invalid layer id '{}': {}", s, e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Tile,
    Marker,
    Polyline,
    GeoJson,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Tile => write!(f, "tile"),
            LayerKind::Marker => write!(f, "marker"),
            LayerKind::Polyline => write!(f, "polyline"),
            LayerKind::GeoJson => write!(f, "geojson"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: LayerId,
    pub name: String,
    pub kind: LayerKind,
    pub opacity: f32,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: LayerId::UNASSIGNED,
            name: name.into(),
            kind,
            opacity: 1.0,
            visible: true,
        }
    }
}

/// Common interface of everything the map can hold
pub trait LayerTrait {
    fn id(&self) -> LayerId;

    /// Called by the map when the layer is added
    fn set_id(&mut self, id: LayerId);

    fn name(&self) -> &str;

    fn kind(&self) -> LayerKind;

    fn opacity(&self) -> f32;

    fn set_opacity(&mut self, opacity: f32);

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    /// Geographic extent, `None` for layers that cover the whole world
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    /// Deepest zoom this layer can serve, if it limits the map
    fn max_zoom(&self) -> Option<f64> {
        None
    }

    /// Layer-specific options as JSON, for inspection and debugging
    fn options(&self) -> serde_json::Value;

    fn as_any(&self) -> &dyn std::any::Any;

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

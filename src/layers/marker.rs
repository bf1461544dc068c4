use crate::{
    core::{
        constants::{MARKER_ICON_ANCHOR, MARKER_ICON_SIZE},
        geo::{LatLng, LatLngBounds},
    },
    layers::base::{LayerKind, LayerProperties, LayerTrait},
};
use serde::{Deserialize, Serialize};

/// Image drawn for a marker, anchored at a pixel inside the image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    pub url: String,
    pub size: (u32, u32),
    /// Pixel of the image placed on the marker position
    pub anchor: (u32, u32),
}

/// The fixed icon set markers can pick from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconPreset {
    Source,
    Destination,
    #[default]
    #[serde(other)]
    Default,
}

impl IconPreset {
    /// Resolves a symbolic name; anything unrecognised is the default icon
    pub fn from_name(name: &str) -> Self {
        match name {
            "source" => IconPreset::Source,
            "destination" => IconPreset::Destination,
            _ => IconPreset::Default,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            IconPreset::Source => "marker_source.svg",
            IconPreset::Destination => "marker_destination.svg",
            IconPreset::Default => "marker.svg",
        }
    }

    pub fn icon(&self) -> Icon {
        Icon {
            url: self.file_name().to_string(),
            size: MARKER_ICON_SIZE,
            anchor: MARKER_ICON_ANCHOR,
        }
    }
}

/// Options accepted by `MapController::add_marker`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerOptions<M> {
    pub icon: Option<IconPreset>,
    pub meta: Option<M>,
}

impl<M> Default for MarkerOptions<M> {
    fn default() -> Self {
        Self {
            icon: None,
            meta: None,
        }
    }
}

impl<M> MarkerOptions<M> {
    pub fn with_icon(mut self, icon: IconPreset) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_meta(mut self, meta: M) -> Self {
        self.meta = Some(meta);
        self
    }
}

pub struct Marker {
    properties: LayerProperties,
    position: LatLng,
    preset: IconPreset,
    icon: Icon,
}

impl Marker {
    pub fn new(position: LatLng) -> Self {
        Self::with_icon(position, IconPreset::Default)
    }

    pub fn with_icon(position: LatLng, preset: IconPreset) -> Self {
        Self {
            properties: LayerProperties::new("Marker", LayerKind::Marker),
            position,
            preset,
            icon: preset.icon(),
        }
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn set_position(&mut self, position: LatLng) {
        self.position = position;
    }

    pub fn preset(&self) -> IconPreset {
        self.preset
    }

    pub fn icon(&self) -> &Icon {
        &self.icon
    }
}

impl LayerTrait for Marker {
    crate::impl_layer_trait!(properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "position": {
                "lat": self.position.lat,
                "lng": self.position.lng
            },
            "icon": self.icon,
        })
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(LatLngBounds::new(self.position, self.position))
    }
}

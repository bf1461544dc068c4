//! The fixed set of basemap providers the map can switch between

use crate::{
    core::{constants::FALLBACK_TILE_LAYER, geo::TileCoord},
    prelude::HashMap,
    MapError,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Subdomains substituted for `{s}`, chosen by tile position
const SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

/// Static description of a raster basemap
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` and `{r}` placeholders
    pub url: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
}

static TILE_LAYERS: [TileLayerDefinition; 6] = [
    TileLayerDefinition {
        id: "osm",
        name: "OpenStreetMap",
        description: "Standard OSM tiles",
        url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
        attribution: "&copy; <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a>",
        max_zoom: 19,
    },
    TileLayerDefinition {
        id: "osm_hot",
        name: "OSM Humanitarian",
        description: "HOT humanitarian style",
        url: "https://tile-{s}.openstreetmap.fr/hot/{z}/{x}/{y}.png",
        attribution: "&copy; <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a>, Tiles courtesy of <a href=\"http://hot.openstreetmap.org/\">HOT</a>",
        max_zoom: 19,
    },
    TileLayerDefinition {
        id: "cartodb_light",
        name: "CartoDB Light",
        description: "Clean light-grey basemap",
        url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
        attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>",
        max_zoom: 19,
    },
    TileLayerDefinition {
        id: "cartodb_dark",
        name: "CartoDB Dark",
        description: "Dark matter basemap",
        url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
        attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>",
        max_zoom: 19,
    },
    TileLayerDefinition {
        id: "esri_world",
        name: "ESRI Satellite",
        description: "World imagery from ESRI",
        url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
        attribution: "Tiles &copy; Esri &mdash; Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community",
        max_zoom: 18,
    },
    TileLayerDefinition {
        id: "stadia_toner",
        name: "Stadia Toner",
        description: "High-contrast black & white",
        url: "https://tiles.stadiamaps.com/tiles/stamen_toner/{z}/{x}/{y}{r}.png",
        attribution: "&copy; <a href=\"https://stadiamaps.com/\">Stadia Maps</a>, &copy; <a href=\"https://stamen.com\">Stamen Design</a>, &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a>",
        max_zoom: 20,
    },
];

static REGISTRY: Lazy<HashMap<&'static str, &'static TileLayerDefinition>> =
    Lazy::new(|| TILE_LAYERS.iter().map(|def| (def.id, def)).collect());

impl TileLayerDefinition {
    /// Every preset, in picker order
    pub fn all() -> &'static [TileLayerDefinition] {
        &TILE_LAYERS
    }

    pub fn lookup(id: &str) -> Option<&'static TileLayerDefinition> {
        REGISTRY.get(id).copied()
    }

    /// Expands the URL template for one tile
    pub fn tile_url(&self, coord: TileCoord, retina: bool) -> String {
        let subdomain = SUBDOMAINS[((coord.x as usize) + (coord.y as usize)) % SUBDOMAINS.len()];
        self.url
            .replace("{s}", subdomain)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
            .replace("{r}", if retina { "@2x" } else { "" })
    }
}

/// Id of a registered tile layer
///
/// Only ids present in the registry can be constructed, so looking up the
/// definition never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileLayerId(&'static TileLayerDefinition);

impl TileLayerId {
    /// The layer used when nothing else is configured
    pub fn fallback() -> Self {
        match TileLayerDefinition::lookup(FALLBACK_TILE_LAYER) {
            Some(def) => TileLayerId(def),
            None => TileLayerId(&TILE_LAYERS[0]),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.0.id
    }

    pub fn definition(&self) -> &'static TileLayerDefinition {
        self.0
    }
}

impl Default for TileLayerId {
    fn default() -> Self {
        Self::fallback()
    }
}

impl FromStr for TileLayerId {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TileLayerDefinition::lookup(s)
            .map(TileLayerId)
            .ok_or_else(|| MapError::UnknownTileLayer(s.to_string()))
    }
}

impl fmt::Display for TileLayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TileLayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TileLayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_and_zoom_limits() {
        let ids: Vec<_> = TileLayerDefinition::all().iter().map(|d| d.id).collect();
        assert_eq!(
            ids,
            ["osm", "osm_hot", "cartodb_light", "cartodb_dark", "esri_world", "stadia_toner"]
        );

        assert_eq!(TileLayerDefinition::lookup("esri_world").unwrap().max_zoom, 18);
        assert_eq!(TileLayerDefinition::lookup("stadia_toner").unwrap().max_zoom, 20);
        assert_eq!(TileLayerDefinition::lookup("osm").unwrap().max_zoom, 19);
    }

    #[test]
    fn test_parse_known_and_unknown_ids() {
        let id: TileLayerId = "cartodb_dark".parse().unwrap();
        assert_eq!(id.as_str(), "cartodb_dark");
        assert_eq!(id.definition().name, "CartoDB Dark");

        let err = "unknown_id".parse::<TileLayerId>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown tile layer: unknown_id");
    }

    #[test]
    fn test_fallback_is_osm() {
        assert_eq!(TileLayerId::fallback().as_str(), "osm");
        assert_eq!(TileLayerId::default(), TileLayerId::fallback());
    }

    #[test]
    fn test_tile_url_expansion() {
        let coord = TileCoord::new(1468, 955, 11);

        let osm = TileLayerDefinition::lookup("osm").unwrap();
        assert_eq!(
            osm.tile_url(coord, false),
            "https://tile.openstreetmap.org/11/1468/955.png"
        );

        let light = TileLayerDefinition::lookup("cartodb_light").unwrap();
        assert_eq!(
            light.tile_url(coord, true),
            "https://c.basemaps.cartocdn.com/light_all/11/1468/955@2x.png"
        );

        let esri = TileLayerDefinition::lookup("esri_world").unwrap();
        assert!(esri.tile_url(coord, false).ends_with("/tile/11/955/1468"));
    }

    #[test]
    fn test_id_serde() {
        let id: TileLayerId = serde_json::from_str("\"osm_hot\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"osm_hot\"");
        assert!(serde_json::from_str::<TileLayerId>("\"nope\"").is_err());
    }
}

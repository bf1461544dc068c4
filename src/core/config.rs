//! Configuration for the map controller
//!
//! Every field has a default, so a partial JSON document only overrides
//! what it names.

use crate::{
    core::{
        constants::{
            DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG, DEFAULT_CONTAINER_SIZE, DEFAULT_ZOOM,
            DEFAULT_ZOOM_DELTA, FALLBACK_TILE_LAYER, FIT_BOUNDS_PADDING, MAX_ZOOM, MIN_ZOOM,
            TILE_LAYER_PREFERENCE_KEY,
        },
        geo::{LatLng, Point},
    },
    tiles::registry::TileLayerId,
    MapError, Result,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Where the map is centred on initialization
    pub default_center: LatLng,
    pub default_zoom: f64,
    /// Viewport size used when the container does not report one
    pub container_size: Point,
    /// Tile layer picked when the stored preference is absent or unknown
    pub fallback_tile_layer: String,
    /// Preference slot holding the last used tile layer
    pub preference_key: String,
    /// Padding in pixels kept around shapes when fitting the view to them
    pub fit_bounds_padding: f64,
    pub zoom_delta: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            default_center: LatLng::new(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG),
            default_zoom: DEFAULT_ZOOM,
            container_size: Point::new(DEFAULT_CONTAINER_SIZE.0, DEFAULT_CONTAINER_SIZE.1),
            fallback_tile_layer: FALLBACK_TILE_LAYER.to_string(),
            preference_key: TILE_LAYER_PREFERENCE_KEY.to_string(),
            fit_bounds_padding: FIT_BOUNDS_PADDING,
            zoom_delta: DEFAULT_ZOOM_DELTA,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl ControllerConfig {
    /// Parses and validates a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the controller could not honour
    pub fn validate(&self) -> Result<()> {
        if !self.default_center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "default center {:?} is out of range",
                self.default_center
            )));
        }
        for (name, value) in [
            ("default_zoom", self.default_zoom),
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("zoom_delta", self.zoom_delta),
            ("fit_bounds_padding", self.fit_bounds_padding),
        ] {
            if !value.is_finite() {
                return Err(MapError::Config(format!("{} must be finite, got {}", name, value)));
            }
        }
        if !(self.container_size.x.is_finite() && self.container_size.y.is_finite()) {
            return Err(MapError::Config(format!(
                "container_size {:?} must be finite",
                self.container_size
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_delta <= 0.0 {
            return Err(MapError::Config(format!(
                "zoom_delta must be positive, got {}",
                self.zoom_delta
            )));
        }
        self.fallback_tile_layer.parse::<TileLayerId>()?;
        Ok(())
    }

    /// Fallback tile layer as a registry id
    ///
    /// A config that skipped `validate` may name an unknown layer; the
    /// registry default is used then.
    pub fn fallback_tile_layer_id(&self) -> TileLayerId {
        self.fallback_tile_layer
            .parse()
            .unwrap_or_else(|_| TileLayerId::fallback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.default_center, LatLng::new(9.9178343, 78.0815385));
        assert_eq!(config.default_zoom, 11.0);
        assert_eq!(config.fallback_tile_layer, "osm");
        assert_eq!(config.preference_key, "tile_layer");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ControllerConfig::from_json_str(
            r#"{ "default_zoom": 5.0, "fallback_tile_layer": "cartodb_dark" }"#,
        )
        .unwrap();

        assert_eq!(config.default_zoom, 5.0);
        assert_eq!(config.fallback_tile_layer_id().as_str(), "cartodb_dark");
        assert_eq!(config.preference_key, "tile_layer");
    }

    #[test]
    fn test_rejects_unknown_fallback() {
        let result = ControllerConfig::from_json_str(r#"{ "fallback_tile_layer": "nope" }"#);
        assert!(matches!(result, Err(MapError::UnknownTileLayer(id)) if id == "nope"));
    }

    #[test]
    fn test_rejects_non_finite_zoom() {
        for field in ["default_zoom", "min_zoom", "max_zoom", "zoom_delta"] {
            let mut config = ControllerConfig::default();
            match field {
                "default_zoom" => config.default_zoom = f64::NAN,
                "min_zoom" => config.min_zoom = f64::NAN,
                "max_zoom" => config.max_zoom = f64::INFINITY,
                _ => config.zoom_delta = f64::NAN,
            }
            assert!(
                matches!(config.validate(), Err(MapError::Config(ref msg)) if msg.starts_with(field)),
                "{} was accepted",
                field
            );
        }
    }

    #[test]
    fn test_rejects_inverted_zoom_range() {
        let result = ControllerConfig::from_json_str(r#"{ "min_zoom": 12.0, "max_zoom": 3.0 }"#);
        assert!(matches!(result, Err(MapError::Config(_))));
    }
}

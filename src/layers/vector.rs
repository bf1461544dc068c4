use crate::{
    core::{
        constants::{
            DEFAULT_POLYLINE_COLOR, DEFAULT_POLYLINE_OPACITY, DEFAULT_POLYLINE_WEIGHT,
            DEFAULT_SMOOTH_FACTOR,
        },
        geo::{LatLng, LatLngBounds},
        viewport::Viewport,
    },
    layers::base::{LayerKind, LayerProperties, LayerTrait},
    MapError, Result,
};
use geo::{BoundingRect, Simplify};
use geo_types::{LineString, MultiLineString};
use serde::{Deserialize, Serialize};

/// Caller overrides for polyline styling; unset fields use the defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolylineOptions {
    pub color: Option<String>,
    pub weight: Option<f64>,
    pub opacity: Option<f64>,
    pub smooth_factor: Option<f64>,
}

impl PolylineOptions {
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn smooth_factor(mut self, smooth_factor: f64) -> Self {
        self.smooth_factor = Some(smooth_factor);
        self
    }

    /// Fills every unset field with its default
    pub fn resolve(&self) -> PolylineStyle {
        PolylineStyle {
            color: self
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_POLYLINE_COLOR.to_string()),
            weight: self.weight.unwrap_or(DEFAULT_POLYLINE_WEIGHT),
            opacity: self.opacity.unwrap_or(DEFAULT_POLYLINE_OPACITY),
            smooth_factor: self.smooth_factor.unwrap_or(DEFAULT_SMOOTH_FACTOR),
        }
    }
}

/// Resolved stroke style of a polyline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolylineStyle {
    pub color: String,
    /// Stroke width in pixels
    pub weight: f64,
    pub opacity: f64,
    /// How many pixels of simplification are allowed when drawing
    pub smooth_factor: f64,
}

impl Default for PolylineStyle {
    fn default() -> Self {
        PolylineOptions::default().resolve()
    }
}

/// One or more connected line strings drawn as a single layer
pub struct Polyline {
    properties: LayerProperties,
    lines: MultiLineString<f64>,
    style: PolylineStyle,
}

impl Polyline {
    /// Builds a polyline from `[lat, lng]` rings; empty rings are dropped
    pub fn new(points: &[Vec<[f64; 2]>], style: PolylineStyle) -> Result<Self> {
        let mut lines = Vec::with_capacity(points.len());
        for ring in points {
            if ring.is_empty() {
                continue;
            }
            let mut coords = Vec::with_capacity(ring.len());
            for pair in ring {
                let lat_lng = LatLng::from(*pair);
                if !lat_lng.is_valid() {
                    return Err(MapError::InvalidCoordinates(format!(
                        "polyline point [{}, {}] is out of range",
                        pair[0], pair[1]
                    )));
                }
                coords.push(geo_types::Coord::from(lat_lng));
            }
            lines.push(LineString::new(coords));
        }

        if lines.is_empty() {
            return Err(MapError::EmptyGeometry(
                "polyline needs at least one point".to_string(),
            ));
        }

        Ok(Self {
            properties: LayerProperties::new("Polyline", LayerKind::Polyline),
            lines: MultiLineString::new(lines),
            style,
        })
    }

    pub fn style(&self) -> &PolylineStyle {
        &self.style
    }

    /// The rings as `LatLng` sequences, in input order
    pub fn lat_lngs(&self) -> Vec<Vec<LatLng>> {
        self.lines
            .iter()
            .map(|line| line.coords().map(|c| LatLng::from(*c)).collect())
            .collect()
    }

    /// Rings simplified the way they would be drawn at `zoom`
    ///
    /// The tolerance is `smooth_factor` screen pixels converted to degrees
    /// at that zoom.
    pub fn simplified_lat_lngs(&self, zoom: f64) -> Vec<Vec<LatLng>> {
        let tolerance = self.style.smooth_factor.max(0.0) * 360.0 / Viewport::scale(zoom);
        self.lines
            .iter()
            .map(|line| {
                line.simplify(&tolerance)
                    .coords()
                    .map(|c| LatLng::from(*c))
                    .collect()
            })
            .collect()
    }
}

impl LayerTrait for Polyline {
    crate::impl_layer_trait!(properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "style": self.style,
            "rings": self.lines.0.len(),
        })
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        self.lines.bounding_rect().map(LatLngBounds::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style() {
        let style = PolylineOptions::default().resolve();
        assert_eq!(style.color, "#2563eb");
        assert_eq!(style.weight, 5.0);
        assert_eq!(style.opacity, 0.7);
        assert_eq!(style.smooth_factor, 1.0);
    }

    #[test]
    fn test_overrides_are_per_field() {
        let style = PolylineOptions::default().color("#ff0000").weight(2.0).resolve();
        assert_eq!(style.color, "#ff0000");
        assert_eq!(style.weight, 2.0);
        assert_eq!(style.opacity, 0.7);
    }

    #[test]
    fn test_options_deserialize_camel_case() {
        let options: PolylineOptions =
            serde_json::from_str(r#"{ "smoothFactor": 3.0, "opacity": 0.5 }"#).unwrap();
        let style = options.resolve();
        assert_eq!(style.smooth_factor, 3.0);
        assert_eq!(style.opacity, 0.5);
        assert_eq!(style.color, "#2563eb");
    }

    #[test]
    fn test_bounds_cover_all_rings() {
        let polyline = Polyline::new(
            &[
                vec![[9.9, 78.0], [10.0, 78.1]],
                vec![[9.5, 78.3]],
            ],
            PolylineStyle::default(),
        )
        .unwrap();

        let bounds = polyline.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(9.5, 78.0));
        assert_eq!(bounds.north_east, LatLng::new(10.0, 78.3));
        assert_eq!(polyline.lat_lngs()[0][1], LatLng::new(10.0, 78.1));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            Polyline::new(&[], PolylineStyle::default()),
            Err(MapError::EmptyGeometry(_))
        ));
        assert!(matches!(
            Polyline::new(&[Vec::new()], PolylineStyle::default()),
            Err(MapError::EmptyGeometry(_))
        ));
    }

    #[test]
    fn test_out_of_range_point_is_rejected() {
        let result = Polyline::new(&[vec![[120.0, 78.0]]], PolylineStyle::default());
        assert!(matches!(result, Err(MapError::InvalidCoordinates(_))));
    }

    #[test]
    fn test_simplification_drops_collinear_points() {
        let polyline = Polyline::new(
            &[vec![[10.0, 78.0], [10.0, 78.05], [10.0, 78.1]]],
            PolylineStyle::default(),
        )
        .unwrap();

        let simplified = polyline.simplified_lat_lngs(11.0);
        assert_eq!(simplified[0].len(), 2);
        assert_eq!(polyline.lat_lngs()[0].len(), 3);
    }
}

use crate::{
    core::geo::LatLngBounds,
    layers::base::{LayerKind, LayerProperties, LayerTrait},
    MapError, Result,
};
use geo::BoundingRect;
use serde::{Deserialize, Serialize};

/// GeoJSON position, stored as `[lng, lat]` like the format itself
///
/// A trailing altitude is accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> std::result::Result<Self, Self::Error> {
        match values.as_slice() {
            [lng, lat, ..] => Ok(Self { lng: *lng, lat: *lat }),
            _ => Err(format!("position needs two numbers, got {}", values.len())),
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(position: Position) -> Self {
        [position.lng, position.lat]
    }
}

impl From<&Position> for geo_types::Coord<f64> {
    fn from(position: &Position) -> Self {
        geo_types::coord! { x: position.lng, y: position.lat }
    }
}

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point { coordinates: Position },
    LineString { coordinates: Vec<Position> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPoint { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<GeoJsonGeometry> },
}

fn line_string(positions: &[Position]) -> geo_types::LineString<f64> {
    positions.iter().map(geo_types::Coord::from).collect()
}

fn polygon(rings: &[Vec<Position>]) -> geo_types::Polygon<f64> {
    let mut rings = rings.iter().map(|ring| line_string(ring));
    let exterior = rings.next().unwrap_or_else(|| geo_types::LineString::new(Vec::new()));
    geo_types::Polygon::new(exterior, rings.collect())
}

impl GeoJsonGeometry {
    /// Converts to geo-types so geo's algorithms can run on it
    pub fn to_geo(&self) -> geo_types::Geometry<f64> {
        use geo_types::Geometry;

        match self {
            GeoJsonGeometry::Point { coordinates } => {
                Geometry::Point(geo_types::Point::from(geo_types::Coord::from(coordinates)))
            }
            GeoJsonGeometry::LineString { coordinates } => {
                Geometry::LineString(line_string(coordinates))
            }
            GeoJsonGeometry::Polygon { coordinates } => Geometry::Polygon(polygon(coordinates)),
            GeoJsonGeometry::MultiPoint { coordinates } => Geometry::MultiPoint(
                coordinates
                    .iter()
                    .map(|p| geo_types::Point::from(geo_types::Coord::from(p)))
                    .collect(),
            ),
            GeoJsonGeometry::MultiLineString { coordinates } => Geometry::MultiLineString(
                geo_types::MultiLineString::new(
                    coordinates.iter().map(|line| line_string(line)).collect(),
                ),
            ),
            GeoJsonGeometry::MultiPolygon { coordinates } => Geometry::MultiPolygon(
                geo_types::MultiPolygon::new(coordinates.iter().map(|p| polygon(p)).collect()),
            ),
            GeoJsonGeometry::GeometryCollection { geometries } => Geometry::GeometryCollection(
                geo_types::GeometryCollection::new_from(
                    geometries.iter().map(GeoJsonGeometry::to_geo).collect(),
                ),
            ),
        }
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.to_geo().bounding_rect().map(LatLngBounds::from)
    }
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
}

impl GeoJsonFeature {
    fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref().and_then(|props| props.get(key))
    }

    /// Style read from this feature's own properties
    pub fn style(&self) -> FeatureStyle {
        FeatureStyle {
            color: self.property("color").and_then(|v| v.as_str()).map(str::to_string),
            fill_color: self
                .property("fillColor")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            fill_opacity: self.property("fillOpacity").and_then(|v| v.as_f64()),
            fill: self.property("fill").and_then(|v| v.as_bool()),
            fill_rule: self
                .property("fillRule")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        }
    }
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection(Vec<GeoJsonFeature>),
    Geometry(GeoJsonGeometry),
}

impl GeoJson {
    /// Parses any GeoJSON object, or a bare array of features
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if value.is_array() {
            let features = serde_json::from_value(value).map_err(invalid)?;
            return Ok(GeoJson::FeatureCollection(features));
        }

        let kind = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| MapError::ParseError("Invalid GeoJSON: missing \"type\"".to_string()))?;

        match kind {
            "FeatureCollection" => {
                #[derive(Deserialize)]
                struct Collection {
                    features: Vec<GeoJsonFeature>,
                }
                let collection: Collection = serde_json::from_value(value).map_err(invalid)?;
                Ok(GeoJson::FeatureCollection(collection.features))
            }
            "Feature" => Ok(GeoJson::Feature(
                serde_json::from_value(value).map_err(invalid)?,
            )),
            _ => Ok(GeoJson::Geometry(
                serde_json::from_value(value).map_err(invalid)?,
            )),
        }
    }

    pub fn from_str(geojson_str: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(geojson_str).map_err(invalid)?;
        Self::from_value(value)
    }

    /// Every feature, wrapping a bare geometry in a property-less feature
    pub fn into_features(self) -> Vec<GeoJsonFeature> {
        match self {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection(features) => features,
            GeoJson::Geometry(geometry) => vec![GeoJsonFeature {
                id: None,
                geometry: Some(geometry),
                properties: None,
            }],
        }
    }
}

fn invalid(err: serde_json::Error) -> MapError {
    MapError::ParseError(format!("Invalid GeoJSON: {}", err))
}

/// Path style taken from a feature's `properties`
///
/// Fields the feature does not set stay `None`, leaving the renderer's
/// own default in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    pub color: Option<String>,
    pub fill_color: Option<String>,
    pub fill_opacity: Option<f64>,
    pub fill: Option<bool>,
    pub fill_rule: Option<String>,
}

/// Options accepted by `MapController::add_geojson`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeoJsonOptions {
    /// Refit the view to the new shape after adding it
    pub fit_bounds: bool,
}

impl Default for GeoJsonOptions {
    fn default() -> Self {
        Self { fit_bounds: true }
    }
}

/// GeoJSON layer for displaying geographic data
pub struct GeoJsonLayer {
    properties: LayerProperties,
    features: Vec<GeoJsonFeature>,
    styles: Vec<FeatureStyle>,
}

impl GeoJsonLayer {
    pub fn new(data: GeoJson) -> Self {
        let features = data.into_features();
        let styles = features.iter().map(GeoJsonFeature::style).collect();
        Self {
            properties: LayerProperties::new("GeoJSON", LayerKind::GeoJson),
            features,
            styles,
        }
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(Self::new(GeoJson::from_value(value)?))
    }

    pub fn features(&self) -> &[GeoJsonFeature] {
        &self.features
    }

    /// Each feature paired with the style its properties ask for
    pub fn styled_features(&self) -> impl Iterator<Item = (&GeoJsonFeature, &FeatureStyle)> {
        self.features.iter().zip(self.styles.iter())
    }

    /// Bounding box of all features, `None` when nothing has coordinates
    pub fn compute_bounds(&self) -> Option<LatLngBounds> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .filter_map(GeoJsonGeometry::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

impl LayerTrait for GeoJsonLayer {
    crate::impl_layer_trait!(properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "features": self.features.len(),
            "styles": self.styles,
        })
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        self.compute_bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use serde_json::json;

    fn sample_collection() -> serde_json::Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {
                        "color": "#ff0000",
                        "fillColor": "#00ff00",
                        "fillOpacity": 0.3,
                        "fill": true,
                        "fillRule": "evenodd"
                    },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[78.0, 9.9], [78.1, 9.9], [78.1, 10.0], [78.0, 9.9]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "color": "#0000ff" },
                    "geometry": { "type": "Point", "coordinates": [78.3, 9.5, 12.0] }
                }
            ]
        })
    }

    #[test]
    fn test_style_comes_from_each_feature() {
        let layer = GeoJsonLayer::from_value(sample_collection()).unwrap();
        let styles: Vec<_> = layer.styled_features().map(|(_, s)| s.clone()).collect();

        assert_eq!(styles[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(styles[0].fill_color.as_deref(), Some("#00ff00"));
        assert_eq!(styles[0].fill_opacity, Some(0.3));
        assert_eq!(styles[0].fill, Some(true));
        assert_eq!(styles[0].fill_rule.as_deref(), Some("evenodd"));

        assert_eq!(styles[1].color.as_deref(), Some("#0000ff"));
        assert_eq!(styles[1].fill_color, None);
    }

    #[test]
    fn test_bounds_span_all_features() {
        let layer = GeoJsonLayer::from_value(sample_collection()).unwrap();
        let bounds = layer.bounds().unwrap();

        assert_eq!(bounds.south_west, LatLng::new(9.5, 78.0));
        assert_eq!(bounds.north_east, LatLng::new(10.0, 78.3));
    }

    #[test]
    fn test_bare_geometry_and_feature() {
        let geometry = GeoJson::from_value(json!({
            "type": "LineString",
            "coordinates": [[78.0, 9.9], [78.1, 10.0]]
        }))
        .unwrap();
        assert!(matches!(geometry, GeoJson::Geometry(GeoJsonGeometry::LineString { .. })));
        assert_eq!(geometry.into_features().len(), 1);

        let feature = GeoJson::from_str(
            r#"{ "type": "Feature", "properties": null, "geometry": { "type": "Point", "coordinates": [1.0, 2.0] } }"#,
        )
        .unwrap();
        let features = feature.into_features();
        assert_eq!(features[0].style(), FeatureStyle::default());
    }

    #[test]
    fn test_feature_array_is_a_collection() {
        let value = json!([
            { "type": "Feature", "properties": {}, "geometry": null }
        ]);
        let layer = GeoJsonLayer::from_value(value).unwrap();
        assert_eq!(layer.features().len(), 1);
        assert!(layer.bounds().is_none());
    }

    #[test]
    fn test_invalid_geojson() {
        assert!(matches!(
            GeoJson::from_value(json!({ "features": [] })),
            Err(MapError::ParseError(_))
        ));
        assert!(matches!(
            GeoJson::from_value(json!({ "type": "Point", "coordinates": [1.0] })),
            Err(MapError::ParseError(_))
        ));
    }
}

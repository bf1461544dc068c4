use crate::{
    core::geo::TileCoord,
    layers::base::{LayerKind, LayerProperties, LayerTrait},
    tiles::registry::{TileLayerDefinition, TileLayerId},
};

/// Raster basemap layer built from a registry preset
///
/// Tile download and drawing belong to the rendering host; this layer only
/// carries the URL template, attribution and zoom ceiling.
pub struct TileLayer {
    properties: LayerProperties,
    source: TileLayerId,
    detect_retina: bool,
}

impl TileLayer {
    pub fn new(source: TileLayerId) -> Self {
        Self {
            properties: LayerProperties::new(source.definition().name, LayerKind::Tile),
            source,
            detect_retina: false,
        }
    }

    pub fn with_retina(mut self, detect_retina: bool) -> Self {
        self.detect_retina = detect_retina;
        self
    }

    pub fn source(&self) -> TileLayerId {
        self.source
    }

    pub fn definition(&self) -> &'static TileLayerDefinition {
        self.source.definition()
    }

    pub fn attribution(&self) -> &'static str {
        self.definition().attribution
    }

    pub fn tile_url(&self, coord: TileCoord) -> String {
        self.definition().tile_url(coord, self.detect_retina)
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(properties);

    fn options(&self) -> serde_json::Value {
        let def = self.definition();
        serde_json::json!({
            "source": def.id,
            "url": def.url,
            "attribution": def.attribution,
            "maxZoom": def.max_zoom,
            "detectRetina": self.detect_retina,
        })
    }

    fn max_zoom(&self) -> Option<f64> {
        Some(self.definition().max_zoom as f64)
    }
}

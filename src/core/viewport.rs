use crate::core::{
    constants::TILE_SIZE,
    geo::{LatLng, LatLngBounds, Point},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Largest sine of latitude the projection accepts before it diverges
const MAX_SIN_LAT: f64 = 0.9999;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom,
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = center;
    }

    /// Sets the zoom level, clamping to the allowed range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits and pulls the current zoom inside them
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Changes zoom by `delta` and returns whether the zoom actually moved
    pub fn zoom_by(&mut self, delta: f64) -> bool {
        let old_zoom = self.zoom;
        self.set_zoom(self.zoom + delta);
        (self.zoom - old_zoom).abs() > f64::EPSILON
    }

    /// World size in pixels at `zoom`
    pub fn scale(zoom: f64) -> f64 {
        TILE_SIZE as f64 * 2_f64.powf(zoom)
    }

    /// Projects a coordinate to absolute spherical-mercator pixels
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let scale = Self::scale(zoom.unwrap_or(self.zoom));
        let sin_lat = lat_lng.lat.to_radians().sin().clamp(-MAX_SIN_LAT, MAX_SIN_LAT);

        let x = (lat_lng.lng + 180.0) / 360.0 * scale;
        let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * scale;
        Point::new(x, y)
    }

    /// Inverse of [`Viewport::project`]
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let scale = Self::scale(zoom.unwrap_or(self.zoom));

        let lng = pixel.x / scale * 360.0 - 180.0;
        let n = PI - 2.0 * PI * pixel.y / scale;
        let lat = n.sinh().atan().to_degrees();
        LatLng::new(lat, lng)
    }

    /// Geographical area currently visible
    pub fn bounds(&self) -> LatLngBounds {
        let center_px = self.project(&self.center, None);
        let half_w = self.size.x / 2.0;
        let half_h = self.size.y / 2.0;

        let north_west = self.unproject(&Point::new(center_px.x - half_w, center_px.y - half_h), None);
        let south_east = self.unproject(&Point::new(center_px.x + half_w, center_px.y + half_h), None);

        LatLngBounds::new(
            LatLng::new(south_east.lat, north_west.lng),
            LatLng::new(north_west.lat, south_east.lng),
        )
    }

    /// Fits the viewport to contain the given bounds
    ///
    /// Picks the highest integer zoom at which the bounds, plus `padding`
    /// pixels on every side, fit in the viewport, then centres on them.
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: Option<f64>) {
        let padding = padding.unwrap_or(0.0).max(0.0);
        let available = Point::new(
            (self.size.x - 2.0 * padding).max(1.0),
            (self.size.y - 2.0 * padding).max(1.0),
        );

        let north_west = LatLng::new(bounds.north_east.lat, bounds.south_west.lng);
        let south_east = LatLng::new(bounds.south_west.lat, bounds.north_east.lng);

        let mut best_zoom = self.min_zoom.ceil();
        let mut test_zoom = best_zoom;
        while test_zoom <= self.max_zoom {
            let nw = self.project(&north_west, Some(test_zoom));
            let se = self.project(&south_east, Some(test_zoom));

            if (se.x - nw.x).abs() <= available.x && (se.y - nw.y).abs() <= available.y {
                best_zoom = test_zoom;
            } else {
                break;
            }
            test_zoom += 1.0;
        }

        self.set_zoom(best_zoom);

        // Centre on the projected midpoint so the shape sits in the middle on screen
        let nw = self.project(&north_west, None);
        let se = self.project(&south_east, None);
        let midpoint = Point::new((nw.x + se.x) / 2.0, (nw.y + se.y) / 2.0);
        self.center = self.unproject(&midpoint, None);

        log::debug!(
            "fit bounds SW({:.5}, {:.5}) NE({:.5}, {:.5}) -> zoom {}",
            bounds.south_west.lat,
            bounds.south_west.lng,
            bounds.north_east.lat,
            bounds.north_east.lng,
            self.zoom
        );
    }
}

//! Mapping station coordinates onto the map viewport.

use serde::Serialize;
use std::f64::consts::PI;

pub const DEFAULT_CENTER: (f64, f64) = (-71.09415, 42.36027);
pub const DEFAULT_ZOOM: f64 = 12.0;
pub const MIN_ZOOM: f64 = 5.0;
pub const MAX_ZOOM: f64 = 18.0;

const TILE_SIZE: f64 = 512.0;
const MAX_LATITUDE: f64 = 85.051129;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Anything that can place a longitude/latitude on screen.
pub trait Projector {
    fn project(&self, lon: f64, lat: f64) -> ScreenPoint;
}

/// A Web Mercator viewport of `width` x `height` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    center: (f64, f64),
    zoom: f64,
    width: f64,
    height: f64,
}

impl WebMercator {
    pub fn new(center: (f64, f64), zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan_to(&mut self, center: (f64, f64)) {
        self.center = center;
    }

    pub fn zoom_to(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    fn world_point(&self, lon: f64, lat: f64) -> ScreenPoint {
        let size = self.world_size();
        let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let x = (lon + 180.0) / 360.0 * size;
        let y = (180.0 - (180.0 / PI) * (PI / 4.0 + lat * PI / 360.0).tan().ln()) / 360.0 * size;
        ScreenPoint { x, y }
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM, 1024.0, 768.0)
    }
}

impl Projector for WebMercator {
    fn project(&self, lon: f64, lat: f64) -> ScreenPoint {
        let point = self.world_point(lon, lat);
        let origin = self.world_point(self.center.0, self.center.1);
        ScreenPoint {
            x: point.x - origin.x + self.width / 2.0,
            y: point.y - origin.y + self.height / 2.0,
        }
    }
}

use serde::{Deserialize, Serialize};

/// A position on the rendering surface, in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasPoint {
    /// Horizontal position, growing to the right.
    pub x: f64,
    /// Vertical position, growing downwards.
    pub y: f64,
}

/// A continuous position in raster-pixel space.
///
/// Integer values are pixel corners; `(0.5, 0.5)` is the centre of the first pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Column.
    pub x: f64,
    /// Row.
    pub y: f64,
}

/// A position in the raster's geographic (model) coordinate system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Easting or longitude.
    pub x: f64,
    /// Northing or latitude.
    pub y: f64,
}

impl CanvasPoint {
    /// Create a new canvas point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl PixelPoint {
    /// Create a new pixel point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl GeoPoint {
    /// Create a new geographic point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

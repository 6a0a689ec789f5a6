use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, ViewerError},
    geotransform::GeoTransform,
    point::{CanvasPoint, GeoPoint},
    viewport::ViewportSnapshot,
};

/// A user placed location.
///
/// Only the geographic coordinate is stored. Canvas positions are derived
/// from it on every redraw.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    /// Geographic position of the mark.
    pub geo: GeoPoint,
}

/// Appearance of a location marker, in canvas pixels.
///
/// The glyph keeps the same size at every zoom level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerStyle {
    /// Half length of each cross arm.
    pub arm: f64,
    /// Distance between the cross tips and the ring.
    pub ring_padding: f64,
    /// Stroke width of the cross.
    pub cross_width: u32,
    /// Stroke width of the ring.
    pub ring_width: u32,
    /// RGB color of the glyph.
    pub color: [u8; 3],
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            arm: 10.0,
            ring_padding: 2.0,
            cross_width: 3,
            ring_width: 2,
            color: [255, 0, 0],
        }
    }
}

impl MarkerStyle {
    /// Radius of the ring around the cross.
    pub fn ring_radius(&self) -> f64 {
        self.arm + self.ring_padding
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arm > 0.0 && self.arm.is_finite()) {
            return Err(ConfigError::InvalidValue(
                "marker.arm",
                format!("{} must be positive", self.arm),
            ));
        }
        if !(self.ring_padding >= 0.0 && self.ring_padding.is_finite()) {
            return Err(ConfigError::InvalidValue(
                "marker.ring_padding",
                format!("{} must not be negative", self.ring_padding),
            ));
        }
        if self.cross_width == 0 || self.ring_width == 0 {
            return Err(ConfigError::InvalidValue(
                "marker",
                "stroke widths must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Canvas geometry of one marker: two crossing segments and a ring.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MarkerGlyph {
    /// Endpoints of the horizontal arm.
    pub horizontal: (CanvasPoint, CanvasPoint),
    /// Endpoints of the vertical arm.
    pub vertical: (CanvasPoint, CanvasPoint),
    /// Centre of the ring, also the marked location.
    pub center: CanvasPoint,
    /// Radius of the ring.
    pub radius: f64,
}

impl MarkerGlyph {
    /// Lay out a marker centred on `center`.
    pub fn at(center: CanvasPoint, style: &MarkerStyle) -> Self {
        let CanvasPoint { x, y } = center;
        Self {
            horizontal: (
                CanvasPoint::new(x - style.arm, y),
                CanvasPoint::new(x + style.arm, y),
            ),
            vertical: (
                CanvasPoint::new(x, y - style.arm),
                CanvasPoint::new(x, y + style.arm),
            ),
            center,
            radius: style.ring_radius(),
        }
    }
}

/// The persistent list of marks of the loaded raster.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkerStore {
    marks: Vec<Mark>,
}

impl MarkerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mark at a geographic location.
    ///
    /// The location must fall inside the raster. On success the mark is
    /// appended and its canvas position under `viewport` is returned.
    ///
    /// # Errors
    ///
    /// * [`ViewerError::SingularTransform`] if `transform` cannot be inverted.
    /// * [`ViewerError::OutOfBounds`] if the location is outside the raster.
    ///
    /// The store is left unchanged on error.
    pub fn add(
        &mut self,
        geo: GeoPoint,
        transform: &GeoTransform,
        viewport: &ViewportSnapshot,
    ) -> Result<CanvasPoint, ViewerError> {
        let pixel = transform.geo_to_pixel(geo)?;
        if !viewport.contains_raster_pixel(pixel) {
            return Err(ViewerError::OutOfBounds {
                pixel_x: pixel.x,
                pixel_y: pixel.y,
            });
        }

        self.marks.push(Mark { geo });

        Ok(viewport.raster_pixel_to_canvas(pixel))
    }

    /// Canvas positions of every mark under `viewport`, in insertion order.
    ///
    /// Each position is derived from the stored geographic coordinate.
    pub fn redraw_all(
        &self,
        viewport: &ViewportSnapshot,
        transform: &GeoTransform,
    ) -> Result<Vec<CanvasPoint>, ViewerError> {
        self.marks
            .iter()
            .map(|mark| {
                let pixel = transform.geo_to_pixel(mark.geo)?;
                Ok(viewport.raster_pixel_to_canvas(pixel))
            })
            .collect()
    }

    /// Remove every mark.
    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Number of marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Whether there are no marks.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// The marks, in insertion order.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Iterate over the marks.
    pub fn iter(&self) -> std::slice::Iter<'_, Mark> {
        self.marks.iter()
    }
}

impl<'a> IntoIterator for &'a MarkerStore {
    type Item = &'a Mark;
    type IntoIter = std::slice::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

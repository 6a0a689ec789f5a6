use geoview_image::ImageSize;
use serde::{Deserialize, Serialize};

use crate::{
    error::ViewerError,
    point::{GeoPoint, PixelPoint},
};

/// Affine coefficients mapping raster pixels to geographic coordinates.
///
/// ```text
/// geo_x = origin_x + col * pixel_width + row * row_rotation
/// geo_y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// For north-up rasters both rotations are zero and `pixel_height` is negative.
///
/// # Example
///
/// ```
/// use geoview::{GeoTransform, PixelPoint};
///
/// let gt = GeoTransform::north_up(-10.0, 60.0, 0.01, -0.01);
/// let geo = gt.pixel_to_geo(PixelPoint::new(100.0, 200.0));
/// assert!((geo.x - (-9.0)).abs() < 1e-12);
/// assert!((geo.y - 58.0).abs() < 1e-12);
///
/// let px = gt.geo_to_pixel(geo).unwrap();
/// assert!((px.x - 100.0).abs() < 1e-9);
/// assert!((px.y - 200.0).abs() < 1e-9);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// Geographic X of the upper-left corner of the raster.
    pub origin_x: f64,
    /// X extent of one column step.
    pub pixel_width: f64,
    /// X extent of one row step.
    pub row_rotation: f64,
    /// Geographic Y of the upper-left corner of the raster.
    pub origin_y: f64,
    /// Y extent of one column step.
    pub col_rotation: f64,
    /// Y extent of one row step, usually negative.
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Pixel and geographic coordinates coincide.
    pub const IDENTITY: Self = Self::from_gdal([0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Create from the GDAL ordered array
    /// `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`.
    pub const fn from_gdal(coefficients: [f64; 6]) -> Self {
        let [origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height] =
            coefficients;
        Self {
            origin_x,
            pixel_width,
            row_rotation,
            origin_y,
            col_rotation,
            pixel_height,
        }
    }

    /// Convert to the GDAL ordered array.
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Create a transform without rotation.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self::from_gdal([origin_x, pixel_width, 0.0, origin_y, 0.0, pixel_height])
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation
    }

    /// Whether [`GeoTransform::geo_to_pixel`] is defined.
    pub fn is_invertible(&self) -> bool {
        self.determinant() != 0.0
    }

    /// True when rows run exactly north to south.
    pub fn is_north_up(&self) -> bool {
        self.row_rotation == 0.0 && self.col_rotation == 0.0 && self.pixel_height < 0.0
    }

    /// Map a continuous pixel position to geographic coordinates.
    pub fn pixel_to_geo(&self, pixel: PixelPoint) -> GeoPoint {
        GeoPoint {
            x: self.origin_x + pixel.x * self.pixel_width + pixel.y * self.row_rotation,
            y: self.origin_y + pixel.x * self.col_rotation + pixel.y * self.pixel_height,
        }
    }

    /// Map geographic coordinates back to a continuous pixel position.
    ///
    /// Solves the 2x2 linear system with Cramer's rule.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::SingularTransform`] when the determinant is exactly zero.
    pub fn geo_to_pixel(&self, geo: GeoPoint) -> Result<PixelPoint, ViewerError> {
        let det = self.determinant();
        if det == 0.0 {
            return Err(ViewerError::SingularTransform);
        }

        let dx = geo.x - self.origin_x;
        let dy = geo.y - self.origin_y;

        Ok(PixelPoint {
            x: (self.pixel_height * dx - self.row_rotation * dy) / det,
            y: (-self.col_rotation * dx + self.pixel_width * dy) / det,
        })
    }

    /// Geographic envelope `(min, max)` of a raster of the given size.
    pub fn bounds(&self, size: ImageSize) -> (GeoPoint, GeoPoint) {
        let (w, h) = (size.width as f64, size.height as f64);
        let corners = [
            self.pixel_to_geo(PixelPoint::new(0.0, 0.0)),
            self.pixel_to_geo(PixelPoint::new(w, 0.0)),
            self.pixel_to_geo(PixelPoint::new(0.0, h)),
            self.pixel_to_geo(PixelPoint::new(w, h)),
        ];

        corners.iter().skip(1).fold(
            (corners[0], corners[0]),
            |(min, max), c| {
                (
                    GeoPoint::new(min.x.min(c.x), min.y.min(c.y)),
                    GeoPoint::new(max.x.max(c.x), max.y.max(c.y)),
                )
            },
        )
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(coefficients: [f64; 6]) -> Self {
        Self::from_gdal(coefficients)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::GeoTransform;
    use crate::{
        error::ViewerError,
        point::{GeoPoint, PixelPoint},
    };

    const EPSILON: f64 = 1e-9;

    fn transforms() -> Vec<GeoTransform> {
        vec![
            GeoTransform::IDENTITY,
            GeoTransform::north_up(500_000.0, 4_100_000.0, 30.0, -30.0),
            GeoTransform::north_up(-180.0, 90.0, 0.1, -0.1),
            GeoTransform::from_gdal([100.0, 2.0, 0.5, 200.0, 0.25, -3.0]),
            GeoTransform::from_gdal([-3.5, 1e-4, -2e-5, 40.2, 3e-5, -1e-4]),
        ]
    }

    #[test]
    fn gdal_roundtrip() {
        let coefficients = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let gt = GeoTransform::from_gdal(coefficients);
        assert_eq!(gt.origin_x, 1.0);
        assert_eq!(gt.row_rotation, 3.0);
        assert_eq!(gt.col_rotation, 5.0);
        assert_eq!(gt.to_gdal(), coefficients);
    }

    #[test]
    fn forward_north_up() {
        let gt = GeoTransform::north_up(500_000.0, 4_100_000.0, 30.0, -30.0);
        let geo = gt.pixel_to_geo(PixelPoint::new(10.0, 20.0));
        assert_relative_eq!(geo.x, 500_300.0);
        assert_relative_eq!(geo.y, 4_099_400.0);
    }

    #[test]
    fn forward_with_rotation() {
        let gt = GeoTransform::from_gdal([100.0, 2.0, 0.5, 200.0, 0.25, -3.0]);
        let geo = gt.pixel_to_geo(PixelPoint::new(4.0, 2.0));
        assert_relative_eq!(geo.x, 100.0 + 8.0 + 1.0);
        assert_relative_eq!(geo.y, 200.0 + 1.0 - 6.0);
    }

    #[test]
    fn pixel_geo_pixel_roundtrip() -> Result<(), ViewerError> {
        for gt in transforms() {
            for &(x, y) in &[(0.0, 0.0), (0.5, 0.5), (99.9, 0.1), (37.25, 81.75), (1e3, 2e3)] {
                let px = PixelPoint::new(x, y);
                let back = gt.geo_to_pixel(gt.pixel_to_geo(px))?;
                assert_relative_eq!(back.x, px.x, epsilon = EPSILON);
                assert_relative_eq!(back.y, px.y, epsilon = EPSILON);
            }
        }
        Ok(())
    }

    #[test]
    fn singular_transform() {
        // pixel_width * pixel_height == row_rotation * col_rotation
        let gt = GeoTransform::from_gdal([0.0, 2.0, 4.0, 0.0, 1.0, 2.0]);
        assert_eq!(gt.determinant(), 0.0);
        assert!(!gt.is_invertible());
        assert!(matches!(
            gt.geo_to_pixel(GeoPoint::new(1.0, 1.0)),
            Err(ViewerError::SingularTransform)
        ));
    }

    #[test]
    fn tiny_determinant_is_still_invertible() -> Result<(), ViewerError> {
        let gt = GeoTransform::north_up(0.0, 0.0, 1e-9, -1e-9);
        assert!(gt.is_invertible());
        let px = gt.geo_to_pixel(GeoPoint::new(5e-9, -2e-9))?;
        assert_relative_eq!(px.x, 5.0, epsilon = 1e-6);
        assert_relative_eq!(px.y, 2.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn north_up_detection() {
        assert!(GeoTransform::north_up(0.0, 0.0, 1.0, -1.0).is_north_up());
        assert!(!GeoTransform::IDENTITY.is_north_up());
        assert!(!GeoTransform::from_gdal([0.0, 1.0, 0.1, 0.0, 0.0, -1.0]).is_north_up());
    }

    #[test]
    fn bounds_north_up() {
        let gt = GeoTransform::north_up(10.0, 50.0, 0.5, -0.25);
        let (min, max) = gt.bounds([4, 8].into());
        assert_relative_eq!(min.x, 10.0);
        assert_relative_eq!(max.x, 12.0);
        assert_relative_eq!(min.y, 48.0);
        assert_relative_eq!(max.y, 50.0);
    }
}

use std::path::PathBuf;

use crate::error::IoError;

/// `ModelPixelScaleTag`: `(ScaleX, ScaleY, ScaleZ)`.
pub const MODEL_PIXEL_SCALE_TAG: u16 = 33550;
/// `ModelTiepointTag`: sequences of `(I, J, K, X, Y, Z)`.
pub const MODEL_TIEPOINT_TAG: u16 = 33922;
/// `ModelTransformationTag`: a row-major 4x4 matrix.
pub const MODEL_TRANSFORMATION_TAG: u16 = 34264;
/// `GeoKeyDirectoryTag`: the GeoKey header and entries.
pub const GEO_KEY_DIRECTORY_TAG: u16 = 34735;

const GT_RASTER_TYPE_GEO_KEY: u32 = 1025;
const GEOGRAPHIC_TYPE_GEO_KEY: u32 = 2048;
const PROJECTED_CS_TYPE_GEO_KEY: u32 = 3072;

const RASTER_PIXEL_IS_POINT: u32 = 2;
const USER_DEFINED: u32 = 32767;

/// Coefficients used when a raster carries no georeferencing at all.
///
/// Pixel and geographic coordinates coincide, with rows growing downwards.
pub const IDENTITY_COEFFICIENTS: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// How raster samples relate to the model space grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RasterSpace {
    /// A sample covers the whole pixel area; tiepoints refer to pixel corners.
    #[default]
    PixelIsArea,
    /// A sample is located at the pixel centre.
    PixelIsPoint,
}

/// Where the geotransform of a decoded raster came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeoReferencing {
    /// The `ModelTransformationTag` matrix.
    ModelTransformation,
    /// The first `ModelTiepointTag` together with the `ModelPixelScaleTag`.
    TiepointScale,
    /// A world file sidecar next to the raster.
    WorldFile(PathBuf),
    /// No georeferencing was found; the identity transform is used.
    Missing,
}

/// The GeoKeys the viewer cares about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeoKeys {
    /// Raster type from `GTRasterTypeGeoKey`.
    pub raster_space: RasterSpace,
    /// EPSG code from `ProjectedCSTypeGeoKey` or `GeographicTypeGeoKey`.
    pub epsg: Option<u16>,
}

/// Build GDAL ordered coefficients from a `ModelTransformationTag`.
///
/// # Arguments
///
/// * `matrix` - The 16 values of the row-major 4x4 model transformation.
///
/// # Returns
///
/// The coefficients `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`.
pub fn coefficients_from_model_transformation(matrix: &[f64]) -> Result<[f64; 6], IoError> {
    if matrix.len() < 16 {
        return Err(IoError::InvalidGeoTags(format!(
            "ModelTransformationTag holds {} values, expected 16",
            matrix.len()
        )));
    }

    Ok([
        matrix[3], matrix[0], matrix[1], matrix[7], matrix[4], matrix[5],
    ])
}

/// Build GDAL ordered coefficients from the first tiepoint and the pixel scale.
///
/// The model Y axis points north while raster rows grow southwards, hence the
/// negated Y scale.
///
/// # Arguments
///
/// * `tiepoints` - The `ModelTiepointTag` values, `(I, J, K, X, Y, Z)` per point.
/// * `scale` - The `ModelPixelScaleTag` values, `(ScaleX, ScaleY, ScaleZ)`.
pub fn coefficients_from_tiepoint_scale(
    tiepoints: &[f64],
    scale: &[f64],
) -> Result<[f64; 6], IoError> {
    if tiepoints.len() < 6 {
        return Err(IoError::InvalidGeoTags(format!(
            "ModelTiepointTag holds {} values, expected at least 6",
            tiepoints.len()
        )));
    }
    if scale.len() < 2 {
        return Err(IoError::InvalidGeoTags(format!(
            "ModelPixelScaleTag holds {} values, expected at least 2",
            scale.len()
        )));
    }

    let (i, j, x, y) = (tiepoints[0], tiepoints[1], tiepoints[3], tiepoints[4]);
    let (sx, sy) = (scale[0], scale[1]);

    Ok([x - i * sx, sx, 0.0, y + j * sy, 0.0, -sy])
}

/// Move the origin half a pixel up-left so that pixel centres land on the model points.
pub fn shift_pixel_is_point(coefficients: [f64; 6]) -> [f64; 6] {
    let [ox, pw, rr, oy, cr, ph] = coefficients;
    [ox - 0.5 * pw - 0.5 * rr, pw, rr, oy - 0.5 * cr - 0.5 * ph, cr, ph]
}

/// Parse the raster type and EPSG code from a `GeoKeyDirectoryTag`.
///
/// Only keys stored inline (TIFF tag location `0`) are read, which is how
/// every short valued key is encoded.
pub fn parse_geokey_directory(directory: &[u32]) -> Result<GeoKeys, IoError> {
    if directory.len() < 4 {
        return Err(IoError::InvalidGeoTags(
            "GeoKeyDirectoryTag header is truncated".to_string(),
        ));
    }

    let num_keys = directory[3] as usize;
    if directory.len() < 4 + num_keys * 4 {
        return Err(IoError::InvalidGeoTags(format!(
            "GeoKeyDirectoryTag declares {} keys but holds {} values",
            num_keys,
            directory.len()
        )));
    }

    let mut keys = GeoKeys::default();
    let mut geographic = None;
    let mut projected = None;

    for entry in directory[4..4 + num_keys * 4].chunks_exact(4) {
        let (key_id, location, value) = (entry[0], entry[1], entry[3]);
        if location != 0 {
            continue;
        }
        match key_id {
            GT_RASTER_TYPE_GEO_KEY if value == RASTER_PIXEL_IS_POINT => {
                keys.raster_space = RasterSpace::PixelIsPoint;
            }
            GEOGRAPHIC_TYPE_GEO_KEY if value != USER_DEFINED => geographic = Some(value),
            PROJECTED_CS_TYPE_GEO_KEY if value != USER_DEFINED => projected = Some(value),
            _ => {}
        }
    }

    keys.epsg = projected
        .or(geographic)
        .and_then(|code| u16::try_from(code).ok());

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiepoint_scale_north_up() -> Result<(), IoError> {
        let tiepoints = [0.0, 0.0, 0.0, 500_000.0, 4_000_000.0, 0.0];
        let scale = [30.0, 30.0, 0.0];
        let gt = coefficients_from_tiepoint_scale(&tiepoints, &scale)?;
        assert_eq!(gt, [500_000.0, 30.0, 0.0, 4_000_000.0, 0.0, -30.0]);
        Ok(())
    }

    #[test]
    fn tiepoint_not_at_origin() -> Result<(), IoError> {
        // pixel (10, 20) is tied to (110, 180)
        let tiepoints = [10.0, 20.0, 0.0, 110.0, 180.0, 0.0];
        let gt = coefficients_from_tiepoint_scale(&tiepoints, &[2.0, 0.5])?;
        assert_eq!(gt, [90.0, 2.0, 0.0, 190.0, 0.0, -0.5]);
        Ok(())
    }

    #[test]
    fn tiepoint_too_short() {
        let res = coefficients_from_tiepoint_scale(&[0.0; 5], &[1.0, 1.0]);
        assert!(matches!(res, Err(IoError::InvalidGeoTags(_))));
    }

    #[test]
    fn model_transformation_with_rotation() -> Result<(), IoError> {
        #[rustfmt::skip]
        let matrix = [
            2.0, 0.5, 0.0, 100.0,
            0.25, -3.0, 0.0, 200.0,
            0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        let gt = coefficients_from_model_transformation(&matrix)?;
        assert_eq!(gt, [100.0, 2.0, 0.5, 200.0, 0.25, -3.0]);
        Ok(())
    }

    #[test]
    fn pixel_is_point_shift() {
        let gt = shift_pixel_is_point([100.0, 2.0, 0.0, 50.0, 0.0, -2.0]);
        assert_eq!(gt, [99.0, 2.0, 0.0, 51.0, 0.0, -2.0]);
    }

    #[test]
    fn geokeys_projected_point() -> Result<(), IoError> {
        #[rustfmt::skip]
        let directory = [
            1, 1, 0, 3,
            1024, 0, 1, 1,
            1025, 0, 1, 2,
            3072, 0, 1, 32633,
        ];
        let keys = parse_geokey_directory(&directory)?;
        assert_eq!(keys.raster_space, RasterSpace::PixelIsPoint);
        assert_eq!(keys.epsg, Some(32633));
        Ok(())
    }

    #[test]
    fn geokeys_geographic_user_defined_projection() -> Result<(), IoError> {
        #[rustfmt::skip]
        let directory = [
            1, 1, 0, 3,
            1025, 0, 1, 1,
            2048, 0, 1, 4326,
            3072, 0, 1, 32767,
        ];
        let keys = parse_geokey_directory(&directory)?;
        assert_eq!(keys.raster_space, RasterSpace::PixelIsArea);
        assert_eq!(keys.epsg, Some(4326));
        Ok(())
    }

    #[test]
    fn geokeys_truncated() {
        let res = parse_geokey_directory(&[1, 1, 0, 2, 1025, 0, 1, 2]);
        assert!(matches!(res, Err(IoError::InvalidGeoTags(_))));
    }
}

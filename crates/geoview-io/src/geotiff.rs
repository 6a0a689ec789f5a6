use std::{
    fs,
    io::{Cursor, Read, Seek},
    path::Path,
};

use geoview_image::{normalize::normalize_to_display, Gray8, Image, ImageError, ImageSize};
use tiff::{
    decoder::{Decoder, DecodingResult},
    encoder::{colortype, TiffEncoder},
    tags::Tag,
};

use crate::{
    error::IoError,
    georef::{
        coefficients_from_model_transformation, coefficients_from_tiepoint_scale,
        parse_geokey_directory, shift_pixel_is_point, GeoKeys, GeoReferencing, RasterSpace,
        GEO_KEY_DIRECTORY_TAG, IDENTITY_COEFFICIENTS, MODEL_PIXEL_SCALE_TAG, MODEL_TIEPOINT_TAG,
        MODEL_TRANSFORMATION_TAG,
    },
    world_file::{find_sidecar, read_world_file},
};

/// The first band of a raster in its native sample type.
#[derive(Clone, Debug, PartialEq)]
pub enum RasterBand {
    /// 8-bit unsigned samples
    U8(Image<u8, 1>),
    /// 16-bit unsigned samples
    U16(Image<u16, 1>),
    /// 32-bit unsigned samples
    U32(Image<u32, 1>),
    /// 8-bit signed samples
    I8(Image<i8, 1>),
    /// 16-bit signed samples
    I16(Image<i16, 1>),
    /// 32-bit signed samples
    I32(Image<i32, 1>),
    /// single precision floating point samples
    F32(Image<f32, 1>),
    /// double precision floating point samples
    F64(Image<f64, 1>),
}

impl RasterBand {
    /// Get the size of the band in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            RasterBand::U8(img) => img.size(),
            RasterBand::U16(img) => img.size(),
            RasterBand::U32(img) => img.size(),
            RasterBand::I8(img) => img.size(),
            RasterBand::I16(img) => img.size(),
            RasterBand::I32(img) => img.size(),
            RasterBand::F32(img) => img.size(),
            RasterBand::F64(img) => img.size(),
        }
    }

    /// Bring the band into the 8-bit display range.
    ///
    /// 8-bit bands are used as they are, every other sample type is min-max scaled.
    pub fn to_display(&self) -> Result<Gray8, ImageError> {
        match self {
            RasterBand::U8(img) => Ok(img.clone()),
            RasterBand::U16(img) => normalize_to_display(img),
            RasterBand::U32(img) => normalize_to_display(img),
            RasterBand::I8(img) => normalize_to_display(img),
            RasterBand::I16(img) => normalize_to_display(img),
            RasterBand::I32(img) => normalize_to_display(img),
            RasterBand::F32(img) => normalize_to_display(img),
            RasterBand::F64(img) => normalize_to_display(img),
        }
    }
}

/// A decoded raster: the first band plus everything needed to georeference it.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedRaster {
    /// The first band in its native sample type.
    pub band: RasterBand,
    /// GDAL ordered affine coefficients mapping pixel to model coordinates.
    pub geo_transform: [f64; 6],
    /// Where `geo_transform` came from.
    pub georeferencing: GeoReferencing,
    /// Raster type declared by the GeoKeys.
    pub raster_space: RasterSpace,
    /// EPSG code of the model space, if declared.
    pub epsg: Option<u16>,
}

/// Read a GeoTIFF file and return its first band and georeferencing.
///
/// When the file carries no georeferencing tags a world file sidecar
/// (`.tfw`, `.tifw`, `.wld`) is used if present.
///
/// # Arguments
///
/// * `file_path` - The path to the GeoTIFF image.
pub fn read_geotiff(file_path: impl AsRef<Path>) -> Result<DecodedRaster, IoError> {
    let file_path = file_path.as_ref().to_owned();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    if file_path.extension().map_or(true, |ext| {
        !ext.eq_ignore_ascii_case("tiff") && !ext.eq_ignore_ascii_case("tif")
    }) {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let tiff_data = fs::File::open(&file_path)?;
    decode_geotiff_impl(tiff_data, Some(&file_path))
}

/// Decode a GeoTIFF held in memory.
///
/// # Arguments
///
/// * `src` - Raw bytes of the TIFF file.
pub fn decode_geotiff(src: &[u8]) -> Result<DecodedRaster, IoError> {
    decode_geotiff_impl(Cursor::new(src), None)
}

fn decode_geotiff_impl<R: Read + Seek>(
    reader: R,
    file_path: Option<&Path>,
) -> Result<DecodedRaster, IoError> {
    let mut decoder = Decoder::new(reader)?;

    let (width, height) = decoder.dimensions()?;
    let size = ImageSize {
        width: width as usize,
        height: height as usize,
    };

    let keys = match find_u32_tag(&mut decoder, GEO_KEY_DIRECTORY_TAG)? {
        Some(directory) => parse_geokey_directory(&directory)?,
        None => GeoKeys::default(),
    };

    let (geo_transform, georeferencing) = match read_model_coefficients(&mut decoder)? {
        Some((coefficients, source)) => {
            let coefficients = match keys.raster_space {
                RasterSpace::PixelIsPoint => shift_pixel_is_point(coefficients),
                RasterSpace::PixelIsArea => coefficients,
            };
            (coefficients, source)
        }
        None => match file_path.and_then(find_sidecar) {
            Some(sidecar) => (read_world_file(&sidecar)?, GeoReferencing::WorldFile(sidecar)),
            None => {
                log::warn!("raster has no georeferencing, using the identity transform");
                (IDENTITY_COEFFICIENTS, GeoReferencing::Missing)
            }
        },
    };

    let num_channels = decoder
        .colortype()
        .ok()
        .and_then(|ct| extract_channels_from_tiff_colortype(&ct));

    let band = match decoder.read_image()? {
        DecodingResult::U8(data) => RasterBand::U8(first_band(data, size, num_channels)?),
        DecodingResult::U16(data) => RasterBand::U16(first_band(data, size, num_channels)?),
        DecodingResult::U32(data) => RasterBand::U32(first_band(data, size, num_channels)?),
        DecodingResult::I8(data) => RasterBand::I8(first_band(data, size, num_channels)?),
        DecodingResult::I16(data) => RasterBand::I16(first_band(data, size, num_channels)?),
        DecodingResult::I32(data) => RasterBand::I32(first_band(data, size, num_channels)?),
        DecodingResult::F32(data) => RasterBand::F32(first_band(data, size, num_channels)?),
        DecodingResult::F64(data) => RasterBand::F64(first_band(data, size, num_channels)?),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(IoError::TiffDecodingError(
                tiff::TiffError::UnsupportedError(
                    tiff::TiffUnsupportedError::UnknownInterpretation,
                ),
            ))
        }
    };

    log::debug!(
        "decoded {} raster, georeferencing: {:?}, epsg: {:?}",
        size,
        georeferencing,
        keys.epsg
    );

    Ok(DecodedRaster {
        band,
        geo_transform,
        georeferencing,
        raster_space: keys.raster_space,
        epsg: keys.epsg,
    })
}

/// Read the model transformation, or the tiepoint and pixel scale pair.
fn read_model_coefficients<R: Read + Seek>(
    decoder: &mut Decoder<R>,
) -> Result<Option<([f64; 6], GeoReferencing)>, IoError> {
    if let Some(matrix) = find_f64_tag(decoder, MODEL_TRANSFORMATION_TAG)? {
        let coefficients = coefficients_from_model_transformation(&matrix)?;
        return Ok(Some((coefficients, GeoReferencing::ModelTransformation)));
    }

    let tiepoints = find_f64_tag(decoder, MODEL_TIEPOINT_TAG)?;
    let scale = find_f64_tag(decoder, MODEL_PIXEL_SCALE_TAG)?;
    match (tiepoints, scale) {
        (Some(tiepoints), Some(scale)) => {
            let coefficients = coefficients_from_tiepoint_scale(&tiepoints, &scale)?;
            Ok(Some((coefficients, GeoReferencing::TiepointScale)))
        }
        (Some(tiepoints), None) => {
            // ground control points only, which would need a fitted transform
            log::warn!(
                "ignoring {} tiepoints without a pixel scale",
                tiepoints.len() / 6
            );
            Ok(None)
        }
        _ => Ok(None),
    }
}

fn find_f64_tag<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    tag: u16,
) -> Result<Option<Vec<f64>>, IoError> {
    Ok(decoder
        .find_tag(Tag::from_u16_exhaustive(tag))?
        .map(|value| value.into_f64_vec())
        .transpose()?)
}

fn find_u32_tag<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    tag: u16,
) -> Result<Option<Vec<u32>>, IoError> {
    Ok(decoder
        .find_tag(Tag::from_u16_exhaustive(tag))?
        .map(|value| value.into_u32_vec())
        .transpose()?)
}

/// Keep the first sample of every interleaved pixel.
fn first_band<T: Copy>(
    data: Vec<T>,
    size: ImageSize,
    num_channels: Option<usize>,
) -> Result<Image<T, 1>, IoError> {
    if size.area() == 0 {
        return Err(IoError::UnsupportedSampleLayout("raster has no pixels".to_string()));
    }

    let num_channels = num_channels.unwrap_or(data.len() / size.area());
    if num_channels == 0 || data.len() != size.area() * num_channels {
        return Err(IoError::UnsupportedSampleLayout(format!(
            "{} samples for {} with {} channels",
            data.len(),
            size,
            num_channels
        )));
    }

    if num_channels == 1 {
        return Ok(Image::new(size, data)?);
    }

    let band = data.into_iter().step_by(num_channels).collect();
    Ok(Image::new(size, band)?)
}

fn extract_channels_from_tiff_colortype(colortype: &tiff::ColorType) -> Option<usize> {
    match colortype {
        tiff::ColorType::Gray(_) => Some(1),
        tiff::ColorType::RGB(_) => Some(3),
        tiff::ColorType::GrayA(_) => Some(2),
        tiff::ColorType::RGBA(_) => Some(4),
        tiff::ColorType::CMYK(_) => Some(4),
        _ => None,
    }
}

/// Write an 8-bit band as a georeferenced GeoTIFF.
///
/// North-up coefficients are stored as a tiepoint and pixel scale, rotated
/// ones as a model transformation matrix.
///
/// # Arguments
///
/// * `file_path` - The path to the GeoTIFF image.
/// * `image` - The Gray8 band to write.
/// * `geo_transform` - GDAL ordered affine coefficients.
pub fn write_geotiff_mono8(
    file_path: impl AsRef<Path>,
    image: &Gray8,
    geo_transform: [f64; 6],
) -> Result<(), IoError> {
    let file = fs::File::create(file_path)?;
    let mut encoder = TiffEncoder::new(file)?;
    let mut tiff_image =
        encoder.new_image::<colortype::Gray8>(image.width() as u32, image.height() as u32)?;

    let [ox, pw, rr, oy, cr, ph] = geo_transform;
    if rr == 0.0 && cr == 0.0 && ph < 0.0 {
        let tiepoint = [0.0, 0.0, 0.0, ox, oy, 0.0];
        let scale = [pw, -ph, 0.0];
        tiff_image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(MODEL_TIEPOINT_TAG), &tiepoint[..])?;
        tiff_image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE_TAG), &scale[..])?;
    } else {
        #[rustfmt::skip]
        let matrix = [
            pw, rr, 0.0, ox,
            cr, ph, 0.0, oy,
            0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        tiff_image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(MODEL_TRANSFORMATION_TAG), &matrix[..])?;
    }

    tiff_image.write_data(image.as_slice())?;

    Ok(())
}

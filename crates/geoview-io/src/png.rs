use std::{fs::File, io::BufWriter, path::Path};

use geoview_image::Rgb8;
use png::{BitDepth, ColorType, Encoder};

use crate::error::IoError;

/// Write a painted canvas to a PNG file.
///
/// # Arguments
///
/// * `file_path` - Where to write the PNG.
/// * `frame` - The 8-bit RGB canvas.
pub fn write_frame_png(file_path: impl AsRef<Path>, frame: &Rgb8) -> Result<(), IoError> {
    let file = BufWriter::new(File::create(file_path)?);

    let mut encoder = Encoder::new(file, frame.width() as u32, frame.height() as u32);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(frame.as_slice())
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;

    Ok(())
}

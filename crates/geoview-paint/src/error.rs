use geoview_image::ImageError;

/// An error type for painting frames.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PaintError {
    /// The display buffer is not the raster the frame describes.
    #[error("Frame describes a {expected_width}x{expected_height} raster, buffer is {width}x{height}")]
    BufferMismatch {
        /// Raster width in the frame.
        expected_width: usize,
        /// Raster height in the frame.
        expected_height: usize,
        /// Width of the buffer.
        width: usize,
        /// Height of the buffer.
        height: usize,
    },

    /// Error allocating the canvas image.
    #[error(transparent)]
    Image(#[from] ImageError),
}

use std::path::{Path, PathBuf};

use crate::{
    error::IoError,
    geotiff::{decode_geotiff, read_geotiff, DecodedRaster},
};

/// Where a raster is loaded from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RasterSource {
    /// A file on disk; world file sidecars next to it are honoured.
    Path(PathBuf),
    /// An encoded raster held in memory.
    Bytes(Vec<u8>),
}

impl RasterSource {
    /// Short description used in logs and diagnostics.
    pub fn describe(&self) -> String {
        match self {
            RasterSource::Path(path) => path.display().to_string(),
            RasterSource::Bytes(bytes) => format!("<{} bytes in memory>", bytes.len()),
        }
    }
}

impl From<PathBuf> for RasterSource {
    fn from(path: PathBuf) -> Self {
        RasterSource::Path(path)
    }
}

impl From<&Path> for RasterSource {
    fn from(path: &Path) -> Self {
        RasterSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for RasterSource {
    fn from(bytes: Vec<u8>) -> Self {
        RasterSource::Bytes(bytes)
    }
}

/// A service that turns a [`RasterSource`] into a [`DecodedRaster`].
///
/// Decoding is a blocking call; implementations either complete or fail.
pub trait RasterDecoder {
    /// Decode the raster behind `source`.
    fn decode(&self, source: &RasterSource) -> Result<DecodedRaster, IoError>;
}

/// The default decoder, reading GeoTIFF files and buffers.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeoTiffDecoder;

impl RasterDecoder for GeoTiffDecoder {
    fn decode(&self, source: &RasterSource) -> Result<DecodedRaster, IoError> {
        match source {
            RasterSource::Path(path) => read_geotiff(path),
            RasterSource::Bytes(bytes) => decode_geotiff(bytes),
        }
    }
}

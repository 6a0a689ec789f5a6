#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`] variants for file access, decoding failures and
/// malformed georeferencing.
pub mod error;

/// Georeferencing extracted from GeoTIFF tags.
///
/// Turns the model transformation, tiepoint and pixel scale tags into affine
/// coefficients, and reads the raster type and EPSG code from the GeoKey
/// directory.
pub mod georef;

/// GeoTIFF raster reading and writing.
///
/// Decodes the first band of a GeoTIFF together with its geotransform.
/// See [`geotiff::read_geotiff`] and [`geotiff::decode_geotiff`].
pub mod geotiff;

/// PNG encoding of painted frames.
pub mod png;

/// The raster decode service consumed by a viewer session.
pub mod source;

/// ESRI world file sidecars (`.tfw`, `.wld`).
pub mod world_file;

pub use crate::error::IoError;
pub use crate::geotiff::{DecodedRaster, RasterBand};
pub use crate::georef::{GeoReferencing, RasterSpace};
pub use crate::source::{GeoTiffDecoder, RasterDecoder, RasterSource};

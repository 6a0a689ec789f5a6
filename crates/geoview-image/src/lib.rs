#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for raster display purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// operations to bring raster samples into the 8-bit display range.
pub mod normalize;

pub use crate::error::ImageError;
pub use crate::image::{Gray8, Image, ImageSize, Rgb8};

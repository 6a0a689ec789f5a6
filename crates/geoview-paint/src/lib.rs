#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Primitive drawing on images.
pub mod draw;

/// Error types for painting.
pub mod error;

/// Painting of complete frames.
pub mod frame;

pub use crate::error::PaintError;
pub use crate::frame::paint_frame;

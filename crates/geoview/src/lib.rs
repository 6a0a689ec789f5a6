#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Viewer configuration.
pub mod config;

/// Error types for the viewer core.
pub mod error;

/// Event based entry point of a session.
pub mod event;

/// Affine mapping between raster pixels and geographic coordinates.
pub mod geotransform;

/// Persistent location markers.
///
/// Marks keep their geographic coordinate only and are re-projected onto
/// the canvas every time the view changes.
pub mod marker;

/// Points in the three coordinate spaces of the viewer.
pub mod point;

/// Frame descriptions handed to a presentation layer.
pub mod render;

/// Orchestration of load, view and marks.
pub mod session;

pub mod viewport;

pub use crate::config::ViewerConfig;
pub use crate::error::{ConfigError, LoadError, ViewerError};
pub use crate::event::{ViewerEvent, ViewerResponse};
pub use crate::geotransform::GeoTransform;
pub use crate::marker::{Mark, MarkerGlyph, MarkerStore, MarkerStyle};
pub use crate::point::{CanvasPoint, GeoPoint, PixelPoint};
pub use crate::render::{ImageDescriptor, RenderFrame};
pub use crate::session::{PixelGeoReadout, RasterInfo, RasterSession};
pub use crate::viewport::{CanvasSize, ViewportSnapshot, ViewportState, ZoomDirection};

pub use geoview_io::{RasterDecoder, RasterSource};

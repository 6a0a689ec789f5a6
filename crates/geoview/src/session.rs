use std::fmt;

use geoview_image::{Gray8, ImageSize};
use geoview_io::{GeoReferencing, GeoTiffDecoder, RasterDecoder, RasterSource, RasterSpace};

use crate::{
    config::ViewerConfig,
    error::{LoadError, ViewerError},
    geotransform::GeoTransform,
    marker::MarkerStore,
    point::{CanvasPoint, GeoPoint},
    render::RenderFrame,
    viewport::{CanvasSize, ViewportSnapshot, ViewportState, ZoomDirection},
};

/// Description of a successfully loaded raster.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterInfo {
    /// Raster width in pixels.
    pub width: usize,
    /// Raster height in pixels.
    pub height: usize,
    /// Pixel to geographic mapping of the raster.
    pub geo_transform: GeoTransform,
    /// Where the geotransform came from.
    pub georeferencing: GeoReferencing,
    /// EPSG code of the geographic coordinates, if declared.
    pub epsg: Option<u16>,
    /// Raster type declared by the file.
    pub raster_space: RasterSpace,
    /// Where the raster was loaded from.
    pub source: String,
}

impl RasterInfo {
    /// Size of the raster.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// Pixel and geographic position under the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelGeoReadout {
    /// Column, truncated toward zero.
    pub pixel_x: i64,
    /// Row, truncated toward zero.
    pub pixel_y: i64,
    /// Geographic position of the continuous pixel location.
    pub geo: GeoPoint,
}

impl fmt::Display for PixelGeoReadout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "pixel ({}, {}) geo ({:.6}, {:.6})",
            self.pixel_x, self.pixel_y, self.geo.x, self.geo.y
        )
    }
}

#[derive(Clone, Debug)]
struct LoadedRaster {
    buffer: Gray8,
    transform: GeoTransform,
    info: RasterInfo,
}

/// The state of one viewer: the loaded raster, the view and the marks.
///
/// All methods take `&mut self` and run to completion, so events are applied
/// strictly in arrival order. Any failure leaves the session as it was.
///
/// # Example
///
/// ```no_run
/// use geoview::{GeoPoint, RasterSession, ViewerConfig, ZoomDirection};
///
/// let mut session = RasterSession::new(ViewerConfig::default())?;
/// let info = session.load(std::path::PathBuf::from("dem.tif"))?;
/// println!("loaded {}x{}", info.width, info.height);
///
/// session.zoom(ZoomDirection::In)?;
/// session.mark_at(GeoPoint::new(12.5, 41.9))?;
/// let frame = session.render()?;
/// assert_eq!(frame.markers.len(), 1);
/// # Ok::<(), geoview::ViewerError>(())
/// ```
pub struct RasterSession<D: RasterDecoder = GeoTiffDecoder> {
    config: ViewerConfig,
    decoder: D,
    raster: Option<LoadedRaster>,
    viewport: ViewportState,
    markers: MarkerStore,
    canvas: CanvasSize,
    drag_anchor: Option<CanvasPoint>,
}

impl RasterSession<GeoTiffDecoder> {
    /// Create a session that decodes GeoTIFF files.
    pub fn new(config: ViewerConfig) -> Result<Self, ViewerError> {
        Self::with_decoder(config, GeoTiffDecoder)
    }
}

impl Default for RasterSession<GeoTiffDecoder> {
    fn default() -> Self {
        Self::from_parts(ViewerConfig::default(), GeoTiffDecoder)
    }
}

impl<D: RasterDecoder> RasterSession<D> {
    /// Create a session with a custom decoder.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Config`] if `config` is invalid.
    pub fn with_decoder(config: ViewerConfig, decoder: D) -> Result<Self, ViewerError> {
        config.validate()?;
        Ok(Self::from_parts(config, decoder))
    }

    fn from_parts(config: ViewerConfig, decoder: D) -> Self {
        Self {
            canvas: config.canvas,
            config,
            decoder,
            raster: None,
            viewport: ViewportState::default(),
            markers: MarkerStore::new(),
            drag_anchor: None,
        }
    }

    /// Load a raster, replacing the current one.
    ///
    /// On success the view is reset and every mark is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::LoadFailed`] if the raster cannot be decoded. The
    /// previous raster, view and marks are kept in that case.
    pub fn load(&mut self, source: impl Into<RasterSource>) -> Result<RasterInfo, ViewerError> {
        let source = source.into();
        let loaded = match self.decode(&source) {
            Ok(loaded) => loaded,
            Err(err) => {
                log::warn!("failed to load {}: {err}", source.describe());
                return Err(ViewerError::LoadFailed(err));
            }
        };

        if !loaded.transform.is_invertible() {
            log::warn!(
                "{} has a singular geotransform, marks cannot be placed",
                loaded.info.source
            );
        }
        if loaded.info.georeferencing == GeoReferencing::Missing {
            log::warn!(
                "{} carries no georeferencing, using pixel coordinates",
                loaded.info.source
            );
        }
        log::info!(
            "loaded {} ({}x{}, epsg {:?})",
            loaded.info.source,
            loaded.info.width,
            loaded.info.height,
            loaded.info.epsg
        );

        let info = loaded.info.clone();
        self.raster = Some(loaded);
        self.viewport = ViewportState::reset();
        self.markers.clear();
        self.drag_anchor = None;

        Ok(info)
    }

    fn decode(&self, source: &RasterSource) -> Result<LoadedRaster, LoadError> {
        let decoded = self.decoder.decode(source)?;
        let buffer = decoded.band.to_display()?;
        let transform = GeoTransform::from_gdal(decoded.geo_transform);
        let size = buffer.size();

        Ok(LoadedRaster {
            buffer,
            transform,
            info: RasterInfo {
                width: size.width,
                height: size.height,
                geo_transform: transform,
                georeferencing: decoded.georeferencing,
                epsg: decoded.epsg,
                raster_space: decoded.raster_space,
                source: source.describe(),
            },
        })
    }

    fn loaded(&self) -> Result<&LoadedRaster, ViewerError> {
        self.raster.as_ref().ok_or(ViewerError::NoRasterLoaded)
    }

    /// The current view mapping.
    pub fn snapshot(&self) -> Result<ViewportSnapshot, ViewerError> {
        let raster = self.loaded()?;
        Ok(self
            .viewport
            .snapshot(self.canvas, raster.buffer.size(), self.config.fit_margin))
    }

    /// Pixel and geographic position under the pointer.
    ///
    /// `None` when no raster is loaded or the pointer is off the image.
    pub fn pointer_moved(&self, canvas: CanvasPoint) -> Option<PixelGeoReadout> {
        let raster = self.raster.as_ref()?;
        let snapshot = self.snapshot().ok()?;

        let pixel = snapshot.canvas_to_raster_pixel(canvas);
        if !snapshot.contains_raster_pixel(pixel) {
            return None;
        }

        Some(PixelGeoReadout {
            pixel_x: pixel.x as i64,
            pixel_y: pixel.y as i64,
            geo: raster.transform.pixel_to_geo(pixel),
        })
    }

    /// Place a mark at a geographic location and return where it is drawn.
    ///
    /// # Errors
    ///
    /// * [`ViewerError::NoRasterLoaded`] before the first load.
    /// * [`ViewerError::SingularTransform`] if the raster's transform cannot be inverted.
    /// * [`ViewerError::OutOfBounds`] if the location is off the raster.
    pub fn mark_at(&mut self, geo: GeoPoint) -> Result<CanvasPoint, ViewerError> {
        let snapshot = self.snapshot()?;
        let transform = self.loaded()?.transform;

        match self.markers.add(geo, &transform, &snapshot) {
            Ok(canvas) => {
                log::debug!(
                    "mark {} at ({}, {}) drawn at ({:.2}, {:.2})",
                    self.markers.len(),
                    geo.x,
                    geo.y,
                    canvas.x,
                    canvas.y
                );
                Ok(canvas)
            }
            Err(err) => {
                log::warn!("cannot mark ({}, {}): {err}", geo.x, geo.y);
                Err(err)
            }
        }
    }

    /// Apply one zoom step.
    pub fn zoom(&mut self, direction: ZoomDirection) -> Result<ViewportSnapshot, ViewerError> {
        self.loaded()?;
        self.viewport = self.viewport.zoomed(direction, &self.config);
        self.updated("zoom")
    }

    /// Start a drag at the pointer position.
    pub fn pan_start(&mut self, canvas: CanvasPoint) -> Result<ViewportSnapshot, ViewerError> {
        let snapshot = self.snapshot()?;
        self.drag_anchor = Some(canvas);
        Ok(snapshot)
    }

    /// Move the view by the pointer motion since the last drag event.
    ///
    /// A drag without a preceding [`RasterSession::pan_start`] starts at `canvas`.
    pub fn pan_drag(&mut self, canvas: CanvasPoint) -> Result<ViewportSnapshot, ViewerError> {
        self.loaded()?;
        let anchor = self.drag_anchor.unwrap_or(canvas);
        self.viewport = self
            .viewport
            .panned(canvas.x - anchor.x, canvas.y - anchor.y);
        self.drag_anchor = Some(canvas);
        self.updated("pan")
    }

    /// Finish the current drag.
    pub fn pan_end(&mut self) -> Result<ViewportSnapshot, ViewerError> {
        let snapshot = self.snapshot()?;
        self.drag_anchor = None;
        Ok(snapshot)
    }

    /// Change the canvas size.
    ///
    /// Without a raster the size is still recorded for the next load, and
    /// [`ViewerError::NoRasterLoaded`] is returned since there is no view yet.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Config`] and keeps the current size if `canvas`
    /// is negative or not finite.
    pub fn resize_canvas(&mut self, canvas: CanvasSize) -> Result<ViewportSnapshot, ViewerError> {
        canvas.validate()?;
        self.canvas = canvas;
        self.loaded()?;
        self.updated("resize")
    }

    fn updated(&self, what: &str) -> Result<ViewportSnapshot, ViewerError> {
        let snapshot = self.snapshot()?;
        log::debug!(
            "{what}: zoom {:.3}, pan ({:.1}, {:.1}), scale {:.4}",
            snapshot.zoom_factor,
            snapshot.pan_offset.0,
            snapshot.pan_offset.1,
            snapshot.effective_scale
        );
        Ok(snapshot)
    }

    /// Describe the current frame: the image placement and every marker.
    pub fn render(&self) -> Result<RenderFrame, ViewerError> {
        let snapshot = self.snapshot()?;
        let transform = self.loaded()?.transform;
        let markers = self.markers.redraw_all(&snapshot, &transform)?;
        Ok(RenderFrame::new(&snapshot, markers, self.config.marker))
    }

    /// The configuration of the session.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// The current canvas size.
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Zoom and pan.
    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    /// The marks of the loaded raster.
    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    /// Information about the loaded raster.
    pub fn raster_info(&self) -> Option<&RasterInfo> {
        self.raster.as_ref().map(|raster| &raster.info)
    }

    /// The geotransform of the loaded raster.
    pub fn geo_transform(&self) -> Option<GeoTransform> {
        self.raster.as_ref().map(|raster| raster.transform)
    }

    /// The 8-bit display band of the loaded raster.
    pub fn display_buffer(&self) -> Option<&Gray8> {
        self.raster.as_ref().map(|raster| &raster.buffer)
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }
}

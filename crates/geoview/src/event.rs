use geoview_io::{RasterDecoder, RasterSource};

use crate::{
    error::ViewerError,
    point::{CanvasPoint, GeoPoint},
    render::RenderFrame,
    session::{PixelGeoReadout, RasterInfo, RasterSession},
    viewport::{CanvasSize, ViewportSnapshot, ZoomDirection},
};

/// An input to the viewer, as produced by a presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerEvent {
    /// Load a new raster.
    Load(RasterSource),
    /// The pointer moved over the canvas.
    PointerMoved(CanvasPoint),
    /// One zoom step.
    Zoom(ZoomDirection),
    /// A drag started.
    PanStart(CanvasPoint),
    /// The pointer moved while dragging.
    PanDrag(CanvasPoint),
    /// The drag ended.
    PanEnd,
    /// The canvas changed size.
    Resize(CanvasSize),
    /// Mark a geographic location.
    Mark(GeoPoint),
    /// Produce a frame description.
    Render,
}

/// The result of a [`ViewerEvent`].
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerResponse {
    /// A raster was loaded.
    Loaded(RasterInfo),
    /// Readout under the pointer, `None` off the image.
    Readout(Option<PixelGeoReadout>),
    /// The view after a zoom, pan or resize.
    Viewport(ViewportSnapshot),
    /// Canvas position of a new mark.
    Marked(CanvasPoint),
    /// The current frame.
    Frame(RenderFrame),
}

impl<D: RasterDecoder> RasterSession<D> {
    /// Apply one event to the session.
    ///
    /// # Example
    ///
    /// ```
    /// use geoview::{RasterSession, ViewerError, ViewerEvent, ZoomDirection};
    ///
    /// let mut session = RasterSession::default();
    /// let res = session.dispatch(ViewerEvent::Zoom(ZoomDirection::In));
    /// assert!(matches!(res, Err(ViewerError::NoRasterLoaded)));
    /// ```
    pub fn dispatch(&mut self, event: ViewerEvent) -> Result<ViewerResponse, ViewerError> {
        log::trace!("dispatch {event:?}");
        let response = match event {
            ViewerEvent::Load(source) => ViewerResponse::Loaded(self.load(source)?),
            ViewerEvent::PointerMoved(canvas) => {
                ViewerResponse::Readout(self.pointer_moved(canvas))
            }
            ViewerEvent::Zoom(direction) => ViewerResponse::Viewport(self.zoom(direction)?),
            ViewerEvent::PanStart(canvas) => ViewerResponse::Viewport(self.pan_start(canvas)?),
            ViewerEvent::PanDrag(canvas) => ViewerResponse::Viewport(self.pan_drag(canvas)?),
            ViewerEvent::PanEnd => ViewerResponse::Viewport(self.pan_end()?),
            ViewerEvent::Resize(canvas) => ViewerResponse::Viewport(self.resize_canvas(canvas)?),
            ViewerEvent::Mark(geo) => ViewerResponse::Marked(self.mark_at(geo)?),
            ViewerEvent::Render => ViewerResponse::Frame(self.render()?),
        };
        Ok(response)
    }
}

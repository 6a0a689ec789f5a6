use geoview_image::ImageSize;
use serde::Serialize;

use crate::{
    marker::{MarkerGlyph, MarkerStyle},
    point::CanvasPoint,
    viewport::{CanvasSize, ViewportSnapshot},
};

/// The raster part of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ImageDescriptor {
    /// Raster width in pixels.
    pub width: usize,
    /// Raster height in pixels.
    pub height: usize,
}

impl From<ImageSize> for ImageDescriptor {
    fn from(size: ImageSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

/// Everything a presentation layer needs to draw one frame.
///
/// The image is drawn first, scaled by `effective_scale` with its upper-left
/// corner at `display_origin`. The markers go on top.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderFrame {
    /// The raster to draw.
    pub image: ImageDescriptor,
    /// Canvas position of the raster's upper-left corner.
    pub display_origin: CanvasPoint,
    /// Canvas pixels per raster pixel.
    pub effective_scale: f64,
    /// Size of the scaled raster on the canvas.
    pub display_size: CanvasSize,
    /// Marker centres, in insertion order.
    pub markers: Vec<CanvasPoint>,
    /// How to draw each marker.
    pub marker_style: MarkerStyle,
}

impl RenderFrame {
    pub(crate) fn new(
        snapshot: &ViewportSnapshot,
        markers: Vec<CanvasPoint>,
        marker_style: MarkerStyle,
    ) -> Self {
        Self {
            image: snapshot.image.into(),
            display_origin: snapshot.display_origin,
            effective_scale: snapshot.effective_scale,
            display_size: snapshot.display_size(),
            markers,
            marker_style,
        }
    }

    /// Marker geometry for every marker of the frame.
    pub fn glyphs(&self) -> impl Iterator<Item = MarkerGlyph> + '_ {
        self.markers
            .iter()
            .map(|center| MarkerGlyph::at(*center, &self.marker_style))
    }

    /// Map a canvas position back to a raster pixel, if it hits the image.
    pub fn canvas_to_pixel(&self, canvas: CanvasPoint) -> Option<(usize, usize)> {
        let x = (canvas.x - self.display_origin.x) / self.effective_scale;
        let y = (canvas.y - self.display_origin.y) / self.effective_scale;
        if x >= 0.0 && y >= 0.0 && x < self.image.width as f64 && y < self.image.height as f64 {
            Some((x as usize, y as usize))
        } else {
            None
        }
    }
}

//! View model mapping between canvas space and raster-pixel space.
//!
//! Three coordinate spaces are involved:
//!
//! - canvas space: pixels of the rendering surface,
//! - display-image space: the raster after fit-to-canvas scaling and zoom,
//! - raster-pixel space: native raster resolution.
//!
//! [`ViewportState`] is the small mutable part (zoom and pan). Every mapping
//! goes through a [`ViewportSnapshot`], an immutable value derived from the
//! state, the canvas size and the raster size. Snapshots are rebuilt after
//! every change instead of being patched.

use geoview_image::ImageSize;
use serde::{Deserialize, Serialize};

use crate::{
    config::ViewerConfig,
    error::ConfigError,
    point::{CanvasPoint, PixelPoint},
};

/// Size of the rendering surface in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in canvas pixels.
    pub width: f64,
    /// Height in canvas pixels.
    pub height: f64,
}

impl CanvasSize {
    /// Create a new canvas size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A canvas is realized once both dimensions exceed one pixel.
    pub fn is_realized(&self) -> bool {
        self.width > 1.0 && self.height > 1.0
    }

    /// Check that both dimensions are finite and not negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if valid(self.width) && valid(self.height) {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue(
                "canvas",
                format!("{}x{} is not a finite size", self.width, self.height),
            ))
        }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Direction of a discrete zoom step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    /// Magnify by one zoom step.
    In,
    /// Shrink by one zoom step.
    Out,
}

/// Scale that fits an image inside the canvas, leaving a margin.
///
/// `min(canvas_w / img_w, canvas_h / img_h) * margin`. While the canvas is
/// not realized, or the image is empty, the neutral scale `1.0` is returned.
///
/// # Example
///
/// ```
/// use geoview::viewport::{compute_fit_scale, CanvasSize};
///
/// let scale = compute_fit_scale(CanvasSize::new(800.0, 600.0), [400, 300].into(), 0.9);
/// assert!((scale - 1.8).abs() < 1e-12);
/// ```
pub fn compute_fit_scale(canvas: CanvasSize, image: ImageSize, margin: f64) -> f64 {
    if !canvas.is_realized() || image.width == 0 || image.height == 0 {
        return 1.0;
    }

    let scale_x = canvas.width / image.width as f64;
    let scale_y = canvas.height / image.height as f64;
    scale_x.min(scale_y) * margin
}

/// Zoom and pan of the view.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Multiplier applied on top of the fit-to-canvas scale.
    pub zoom_factor: f64,
    /// Accumulated pan, in canvas units.
    pub pan_offset: (f64, f64),
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom_factor: 1.0,
            pan_offset: (0.0, 0.0),
        }
    }
}

impl ViewportState {
    /// Back to zoom `1.0` with no pan.
    pub fn reset() -> Self {
        Self::default()
    }

    /// Apply one zoom step, silently clamped to the configured limits.
    ///
    /// Zoom keeps the image centred on the canvas plus the existing pan.
    pub fn zoomed(self, direction: ZoomDirection, config: &ViewerConfig) -> Self {
        let factor = match direction {
            ZoomDirection::In => config.zoom_step,
            ZoomDirection::Out => 1.0 / config.zoom_step,
        };
        let zoom_factor = (self.zoom_factor * factor).clamp(config.min_zoom, config.max_zoom);
        Self {
            zoom_factor,
            ..self
        }
    }

    /// Shift the view by a delta in canvas units. Pan is unbounded.
    pub fn panned(self, dx: f64, dy: f64) -> Self {
        Self {
            pan_offset: (self.pan_offset.0 + dx, self.pan_offset.1 + dy),
            ..self
        }
    }

    /// Derive the mapping for the given canvas and raster.
    pub fn snapshot(&self, canvas: CanvasSize, image: ImageSize, fit_margin: f64) -> ViewportSnapshot {
        let fit_scale = compute_fit_scale(canvas, image, fit_margin);
        let effective_scale = fit_scale * self.zoom_factor;

        let display_origin = CanvasPoint {
            x: (canvas.width - image.width as f64 * effective_scale) / 2.0 + self.pan_offset.0,
            y: (canvas.height - image.height as f64 * effective_scale) / 2.0 + self.pan_offset.1,
        };

        ViewportSnapshot {
            canvas,
            image,
            zoom_factor: self.zoom_factor,
            pan_offset: self.pan_offset,
            fit_scale,
            effective_scale,
            display_origin,
        }
    }
}

/// Immutable view mapping derived from a [`ViewportState`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportSnapshot {
    /// The canvas the snapshot was computed for.
    pub canvas: CanvasSize,
    /// The raster size the snapshot was computed for.
    pub image: ImageSize,
    /// Zoom multiplier at the time of the snapshot.
    pub zoom_factor: f64,
    /// Pan offset at the time of the snapshot.
    pub pan_offset: (f64, f64),
    /// Fit-to-canvas scale, before zoom.
    pub fit_scale: f64,
    /// Canvas pixels per raster pixel.
    pub effective_scale: f64,
    /// Canvas position of the raster's upper-left corner.
    pub display_origin: CanvasPoint,
}

impl ViewportSnapshot {
    /// Map a canvas position to a continuous raster-pixel position.
    pub fn canvas_to_raster_pixel(&self, canvas: CanvasPoint) -> PixelPoint {
        PixelPoint {
            x: (canvas.x - self.display_origin.x) / self.effective_scale,
            y: (canvas.y - self.display_origin.y) / self.effective_scale,
        }
    }

    /// Map a raster-pixel position to the canvas.
    pub fn raster_pixel_to_canvas(&self, pixel: PixelPoint) -> CanvasPoint {
        CanvasPoint {
            x: self.display_origin.x + pixel.x * self.effective_scale,
            y: self.display_origin.y + pixel.y * self.effective_scale,
        }
    }

    /// Whether the raster-pixel position lies on the raster.
    pub fn contains_raster_pixel(&self, pixel: PixelPoint) -> bool {
        self.image.contains(pixel.x, pixel.y)
    }

    /// Size of the displayed raster on the canvas.
    pub fn display_size(&self) -> CanvasSize {
        CanvasSize {
            width: self.image.width as f64 * self.effective_scale,
            height: self.image.height as f64 * self.effective_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn snapshot(state: ViewportState) -> ViewportSnapshot {
        state.snapshot(CanvasSize::new(800.0, 600.0), [400, 300].into(), 0.9)
    }

    #[test]
    fn fit_scale_example() {
        let snap = snapshot(ViewportState::default());
        assert_relative_eq!(snap.fit_scale, 1.8);
        assert_relative_eq!(snap.effective_scale, 1.8);
        assert_relative_eq!(snap.display_origin.x, 40.0);
        assert_relative_eq!(snap.display_origin.y, 30.0);
        assert_relative_eq!(snap.display_size().width, 720.0);
        assert_relative_eq!(snap.display_size().height, 540.0);
    }

    #[test]
    fn fit_scale_limited_by_narrow_side() {
        let scale = compute_fit_scale(CanvasSize::new(1000.0, 200.0), [100, 100].into(), 0.9);
        assert_relative_eq!(scale, 1.8);
    }

    #[test]
    fn fit_scale_unrealized_canvas() {
        assert_eq!(compute_fit_scale(CanvasSize::new(0.0, 0.0), [10, 10].into(), 0.9), 1.0);
        assert_eq!(compute_fit_scale(CanvasSize::new(1.0, 600.0), [10, 10].into(), 0.9), 1.0);
        assert_eq!(compute_fit_scale(CanvasSize::new(800.0, 600.0), [0, 10].into(), 0.9), 1.0);
    }

    #[test]
    fn canvas_pixel_roundtrip() {
        let state = ViewportState {
            zoom_factor: 2.5,
            pan_offset: (-35.0, 12.5),
        };
        let snap = snapshot(state);
        let canvas = CanvasPoint::new(123.4, 456.7);
        let back = snap.raster_pixel_to_canvas(snap.canvas_to_raster_pixel(canvas));
        assert_relative_eq!(back.x, canvas.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, canvas.y, epsilon = 1e-9);
    }

    #[test]
    fn origin_maps_to_pixel_zero() {
        let snap = snapshot(ViewportState::default());
        let px = snap.canvas_to_raster_pixel(CanvasPoint::new(40.0, 30.0));
        assert_relative_eq!(px.x, 0.0);
        assert_relative_eq!(px.y, 0.0);
        // the far edge is excluded
        let edge = snap.canvas_to_raster_pixel(CanvasPoint::new(761.0, 300.0));
        assert!(!snap.contains_raster_pixel(edge));
    }

    #[test]
    fn zoom_is_clamped() {
        let config = ViewerConfig::default();
        let mut state = ViewportState::default();
        for _ in 0..100 {
            state = state.zoomed(ZoomDirection::In, &config);
            assert!(state.zoom_factor <= 10.0);
        }
        assert_relative_eq!(state.zoom_factor, 10.0);

        for _ in 0..200 {
            state = state.zoomed(ZoomDirection::Out, &config);
            assert!(state.zoom_factor >= 0.1);
        }
        assert_relative_eq!(state.zoom_factor, 0.1);
    }

    #[test]
    fn zoom_in_then_out_returns() {
        let config = ViewerConfig::default();
        let state = ViewportState::default()
            .zoomed(ZoomDirection::In, &config)
            .zoomed(ZoomDirection::Out, &config);
        assert_relative_eq!(state.zoom_factor, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn zoom_keeps_image_centred() {
        let config = ViewerConfig::default();
        let state = ViewportState::default()
            .panned(10.0, -20.0)
            .zoomed(ZoomDirection::In, &config);
        let snap = snapshot(state);
        let centre = snap.raster_pixel_to_canvas(PixelPoint::new(200.0, 150.0));
        assert_relative_eq!(centre.x, 410.0, epsilon = 1e-9);
        assert_relative_eq!(centre.y, 280.0, epsilon = 1e-9);
    }

    #[test]
    fn pan_accumulates_unbounded() {
        let state = ViewportState::default()
            .panned(5000.0, 0.0)
            .panned(1.0, -7000.0);
        assert_eq!(state.pan_offset, (5001.0, -7000.0));
        let snap = snapshot(state);
        assert_relative_eq!(snap.display_origin.x, 5041.0);
        assert_relative_eq!(snap.display_origin.y, -6970.0);
    }

    #[test]
    fn reset_state() {
        let state = ViewportState::reset();
        assert_eq!(state.zoom_factor, 1.0);
        assert_eq!(state.pan_offset, (0.0, 0.0));
    }
}

use geoview::{CanvasPoint, CanvasSize, RenderFrame};
use geoview_image::{Gray8, ImageSize, Rgb8};
use rayon::prelude::*;

use crate::{
    draw::{draw_circle, draw_line},
    error::PaintError,
};

const BACKGROUND: [u8; 3] = [255, 255, 255];

/// Paint a frame onto an RGB canvas.
///
/// The canvas starts white. Each canvas pixel takes the raster pixel under its
/// centre (nearest neighbour), then every marker is drawn on top.
///
/// # Arguments
///
/// * `buffer` - The 8-bit display band the frame was rendered from.
/// * `frame` - The frame to paint.
/// * `canvas` - The size of the output image.
///
/// # Errors
///
/// Returns [`PaintError::BufferMismatch`] if `buffer` is not the raster of `frame`.
pub fn paint_frame(
    buffer: &Gray8,
    frame: &RenderFrame,
    canvas: CanvasSize,
) -> Result<Rgb8, PaintError> {
    if buffer.width() != frame.image.width || buffer.height() != frame.image.height {
        return Err(PaintError::BufferMismatch {
            expected_width: frame.image.width,
            expected_height: frame.image.height,
            width: buffer.width(),
            height: buffer.height(),
        });
    }

    let size = ImageSize {
        width: canvas.width.max(0.0) as usize,
        height: canvas.height.max(0.0) as usize,
    };
    let mut dst = Rgb8::from_size_val(size, 255)?;
    if size.area() == 0 {
        return Ok(dst);
    }

    // source column and row of every canvas column and row
    let cols = (0..size.width)
        .map(|x| {
            frame
                .canvas_to_pixel(CanvasPoint::new(x as f64 + 0.5, frame.display_origin.y))
                .map(|(col, _)| col)
        })
        .collect::<Vec<_>>();
    let rows = (0..size.height)
        .map(|y| {
            frame
                .canvas_to_pixel(CanvasPoint::new(frame.display_origin.x, y as f64 + 0.5))
                .map(|(_, row)| row)
        })
        .collect::<Vec<_>>();

    let src = buffer.as_slice();
    let src_cols = buffer.width();
    dst.as_slice_mut()
        .par_chunks_exact_mut(size.width * 3)
        .zip(rows.par_iter())
        .for_each(|(dst_row, row)| {
            let Some(row) = row else {
                return;
            };
            dst_row
                .chunks_exact_mut(3)
                .zip(cols.iter())
                .for_each(|(dst_pixel, col)| match col {
                    Some(col) => dst_pixel.fill(src[row * src_cols + col]),
                    None => dst_pixel.copy_from_slice(&BACKGROUND),
                });
        });

    let style = frame.marker_style;
    let reach = style.ring_radius() + style.cross_width.max(style.ring_width) as f64;
    let visible = |c: CanvasPoint| {
        c.x >= -reach
            && c.y >= -reach
            && c.x <= size.width as f64 + reach
            && c.y <= size.height as f64 + reach
    };
    for glyph in frame.glyphs().filter(|glyph| visible(glyph.center)) {
        let (h0, h1) = glyph.horizontal;
        let (v0, v1) = glyph.vertical;
        draw_line(
            &mut dst,
            (h0.x.round() as i64, h0.y.round() as i64),
            (h1.x.round() as i64, h1.y.round() as i64),
            style.color,
            style.cross_width as usize,
        );
        draw_line(
            &mut dst,
            (v0.x.round() as i64, v0.y.round() as i64),
            (v1.x.round() as i64, v1.y.round() as i64),
            style.color,
            style.cross_width as usize,
        );
        draw_circle(
            &mut dst,
            (glyph.center.x, glyph.center.y),
            glyph.radius,
            style.color,
            style.ring_width as usize,
        );
    }

    log::debug!(
        "painted {}x{} canvas with {} markers",
        size.width,
        size.height,
        frame.markers.len()
    );

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoview::{ImageDescriptor, MarkerStyle};
    use geoview_image::Image;

    fn frame(markers: Vec<CanvasPoint>) -> RenderFrame {
        // 20x10 raster on a 200x100 canvas: scale 9, origin (10, 5)
        RenderFrame {
            image: ImageDescriptor {
                width: 20,
                height: 10,
            },
            display_origin: CanvasPoint::new(10.0, 5.0),
            effective_scale: 9.0,
            display_size: CanvasSize::new(180.0, 90.0),
            markers,
            marker_style: MarkerStyle::default(),
        }
    }

    fn buffer() -> Gray8 {
        let data = (0..200).map(|v| if v % 20 < 10 { 40 } else { 200 }).collect();
        Image::new([20, 10].into(), data).expect("valid buffer")
    }

    #[test]
    fn paint_image_and_background() -> Result<(), PaintError> {
        let canvas = CanvasSize::new(200.0, 100.0);
        let img = paint_frame(&buffer(), &frame(Vec::new()), canvas)?;
        assert_eq!(img.size(), [200, 100].into());

        // margins stay white
        assert_eq!(img.get(5, 50, 0), Some(&255));
        assert_eq!(img.get(100, 2, 2), Some(&255));
        assert_eq!(img.get(195, 50, 1), Some(&255));
        // left half of the raster is dark, right half is light
        assert_eq!(img.get(10, 5, 0), Some(&40));
        assert_eq!(img.get(50, 50, 2), Some(&40));
        assert_eq!(img.get(150, 50, 1), Some(&200));
        assert_eq!(img.get(189, 94, 0), Some(&200));
        Ok(())
    }

    #[test]
    fn markers_are_drawn_on_top() -> Result<(), PaintError> {
        let canvas = CanvasSize::new(200.0, 100.0);
        let center = CanvasPoint::new(100.0, 50.0);
        let img = paint_frame(&buffer(), &frame(vec![center]), canvas)?;

        let red = |x: usize, y: usize| {
            [img.get(x, y, 0), img.get(x, y, 1), img.get(x, y, 2)]
                == [Some(&255), Some(&0), Some(&0)]
        };
        assert!(red(100, 50));
        assert!(red(90, 50));
        assert!(red(110, 51));
        assert!(red(100, 40));
        // ring at radius 12
        assert!(red(112, 50));
        assert!(red(100, 38));
        // between the arms and the ring
        assert!(!red(105, 45));
        Ok(())
    }

    #[test]
    fn far_markers_are_skipped() -> Result<(), PaintError> {
        let canvas = CanvasSize::new(200.0, 100.0);
        let mut far = frame(vec![
            CanvasPoint::new(1e19 + 50.0, 50.0),
            CanvasPoint::new(-1e19, -1e19),
            CanvasPoint::new(f64::NAN, 50.0),
            CanvasPoint::new(50.0, f64::INFINITY),
        ]);
        // panned so far that the raster is off the canvas too
        far.display_origin = CanvasPoint::new(1e19, 5.0);
        let img = paint_frame(&buffer(), &far, canvas)?;
        assert!(img.as_slice().iter().all(|v| *v == 255));
        Ok(())
    }

    #[test]
    fn markers_off_the_edge_are_clipped() -> Result<(), PaintError> {
        let canvas = CanvasSize::new(200.0, 100.0);
        let img = paint_frame(&buffer(), &frame(vec![CanvasPoint::new(-5.0, 50.0)]), canvas)?;
        // the right arm and the ring reach into the canvas
        assert_eq!(img.get(4, 50, 1), Some(&0));
        assert_eq!(img.get(7, 50, 1), Some(&0));
        Ok(())
    }

    #[test]
    fn buffer_mismatch() {
        let small = Image::new([2, 2].into(), vec![0u8; 4]).expect("valid buffer");
        let res = paint_frame(&small, &frame(Vec::new()), CanvasSize::new(10.0, 10.0));
        assert!(matches!(res, Err(PaintError::BufferMismatch { .. })));
    }

    #[test]
    fn empty_canvas() -> Result<(), PaintError> {
        let img = paint_frame(&buffer(), &frame(Vec::new()), CanvasSize::new(0.0, 0.0))?;
        assert_eq!(img.size().area(), 0);
        Ok(())
    }
}

use geoview_image::Image;

/// Set a pixel's color, ignoring positions outside the image.
#[inline]
pub fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x < 0 || y < 0 || x >= img.cols() as i64 || y >= img.rows() as i64 {
        return;
    }
    let start = (y as usize * img.cols() + x as usize) * C;
    img.as_slice_mut()[start..start + C].copy_from_slice(&color);
}

/// Draws a line on an image inplace using Bresenham's line algorithm.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line, as a square brush centred on the line.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = x1.saturating_sub(x0).saturating_abs();
    let dy = y1.saturating_sub(y0).saturating_abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;
    let half = thickness as i64 / 2;

    loop {
        for i in -half..=half {
            for j in -half..=half {
                set_pixel(img, x0.saturating_add(i), y0.saturating_add(j), color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = err.saturating_mul(2);
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a circle outline on an image inplace.
///
/// Every pixel whose centre lies within `thickness / 2` of the circle is set.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `center` - The centre of the circle as a tuple of (x, y).
/// * `radius` - The radius of the circle in pixels.
/// * `color` - The color of the outline.
/// * `thickness` - The width of the outline.
pub fn draw_circle<const C: usize>(
    img: &mut Image<u8, C>,
    center: (f64, f64),
    radius: f64,
    color: [u8; C],
    thickness: usize,
) {
    let half = (thickness.max(1) as f64) / 2.0;
    let reach = ((radius + half).ceil() as i64).saturating_add(1);
    let (cx, cy) = (center.0.round() as i64, center.1.round() as i64);

    // only rows and columns inside the image
    let (max_x, max_y) = (img.cols() as i64 - 1, img.rows() as i64 - 1);
    let (x_lo, x_hi) = (cx.saturating_sub(reach).max(0), cx.saturating_add(reach).min(max_x));
    let (y_lo, y_hi) = (cy.saturating_sub(reach).max(0), cy.saturating_add(reach).min(max_y));

    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            let dist = (x as f64 - center.0).hypot(y as f64 - center.1);
            if (dist - radius).abs() <= half {
                set_pixel(img, x, y, color);
            }
        }
    }
}

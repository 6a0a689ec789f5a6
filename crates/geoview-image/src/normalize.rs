//! Display normalization for raster bands.
//!
//! Raster bands come in many sample types (16-bit counts, floating point
//! elevations, signed reflectances). The viewer displays a single 8-bit band,
//! so anything that is not already `u8` is min-max scaled into `0..=255`:
//!
//! ```text
//! display = trunc((value - min) / (max - min) * 255)
//! ```
//!
//! Non-finite samples are ignored when searching the range and map to `0`.
//! A constant band (max == min) maps entirely to `0`.

use num_traits::ToPrimitive;

use crate::{error::ImageError, image::Image};

/// Find the minimum and maximum finite values in a single channel image.
///
/// # Arguments
///
/// * `src` - The input image.
///
/// # Returns
///
/// A tuple containing the minimum and maximum values as `f64`.
///
/// # Errors
///
/// Returns [`ImageError::EmptyImage`] if the image holds no finite sample.
///
/// # Example
///
/// ```
/// use geoview_image::{Image, ImageSize};
/// use geoview_image::normalize::find_min_max;
///
/// let image = Image::<i16, 1>::new(
///     ImageSize { width: 2, height: 2 },
///     vec![-3, 7, 0, 2],
/// )
/// .unwrap();
///
/// let (min, max) = find_min_max(&image).unwrap();
/// assert_eq!(min, -3.0);
/// assert_eq!(max, 7.0);
/// ```
pub fn find_min_max<T>(src: &Image<T, 1>) -> Result<(f64, f64), ImageError>
where
    T: ToPrimitive + Copy,
{
    src.as_slice()
        .iter()
        .filter_map(|v| v.to_f64())
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
        })
        .ok_or(ImageError::EmptyImage)
}

/// Scale a single channel image into the 8-bit display range.
///
/// # Arguments
///
/// * `src` - The input band of any numeric sample type.
///
/// # Returns
///
/// A new 8-bit image of the same size.
///
/// # Errors
///
/// Returns [`ImageError::EmptyImage`] if the image holds no finite sample.
pub fn normalize_to_display<T>(src: &Image<T, 1>) -> Result<Image<u8, 1>, ImageError>
where
    T: ToPrimitive + Copy,
{
    let (min, max) = find_min_max(src)?;
    let range = max - min;

    let data = src
        .as_slice()
        .iter()
        .map(|v| match v.to_f64() {
            Some(v) if v.is_finite() && range > 0.0 => ((v - min) / range * 255.0) as u8,
            _ => 0,
        })
        .collect();

    Image::new(src.size(), data)
}

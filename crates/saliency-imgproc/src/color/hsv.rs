use crate::parallel;
use saliency_image::{Image, ImageError};

/// Convert an RGB8 image to an HSV8 image.
///
/// The input image is assumed to have 3 channels in the order R, G, B.
///
/// # Returns
///
/// The HSV image with the following channels:
///
/// * H: The hue channel in the range [0, 255] (0-360 degrees).
/// * S: The saturation channel in the range [0, 255].
/// * V: The value channel in the range [0, 255].
///
/// Hue and saturation are truncated to the integer grid.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use saliency_image::{Image, ImageSize};
/// use saliency_imgproc::color::hsv_from_rgb_u8;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///        width: 1,
///        height: 1,
///     },
///     vec![255, 0, 0],
/// )
/// .unwrap();
///
/// let mut hsv = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
///
/// hsv_from_rgb_u8(&image, &mut hsv).unwrap();
///
/// assert_eq!(hsv.as_slice(), &[0, 255, 255]);
/// ```
pub fn hsv_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let (r, g, b) = (src_pixel[0], src_pixel[1], src_pixel[2]);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);

        dst_pixel[2] = max;

        if max == min {
            dst_pixel[0] = 0;
            dst_pixel[1] = 0;
            return;
        }

        let delta = (max - min) as f32;
        let s = delta / max as f32;
        let rc = (max - r) as f32 / delta;
        let gc = (max - g) as f32 / delta;
        let bc = (max - b) as f32 / delta;

        let h = if r == max {
            bc - gc
        } else if g == max {
            2.0 + rc - bc
        } else {
            4.0 + gc - rc
        };

        // wrap the hue into [0, 1)
        let h = (h / 6.0 + 1.0).rem_euclid(1.0);

        dst_pixel[0] = (h * 255.0) as u8;
        dst_pixel[1] = (s * 255.0) as u8;
    });

    Ok(())
}

/// Convert an HSV8 image, as produced by [`hsv_from_rgb_u8`], back to RGB8.
///
/// Precondition: the input and output images must have the same size.
pub fn rgb_from_hsv_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let (h, s, v) = (src_pixel[0], src_pixel[1], src_pixel[2]);

        if s == 0 {
            dst_pixel.fill(v);
            return;
        }

        let hf = h as f32 * 6.0 / 255.0;
        let sector = hf.floor();
        let f = hf - sector;
        let fs = s as f32 / 255.0;
        let vf = v as f32;

        let p = (vf * (1.0 - fs)).round() as u8;
        let q = (vf * (1.0 - fs * f)).round() as u8;
        let t = (vf * (1.0 - fs * (1.0 - f))).round() as u8;

        let (r, g, b) = match sector as u8 % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        dst_pixel[0] = r;
        dst_pixel[1] = g;
        dst_pixel[2] = b;
    });

    Ok(())
}

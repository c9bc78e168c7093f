use crate::parallel;
use saliency_image::{Image, ImageError};

/// Convert an RGB8 image to a full range (JPEG) YCbCr8 image.
///
/// The conversion is:
///
/// ```text
/// Y  =       0.299    * R + 0.587    * G + 0.114    * B
/// Cb = 128 - 0.168736 * R - 0.331264 * G + 0.5      * B
/// Cr = 128 + 0.5      * R - 0.418688 * G - 0.081312 * B
/// ```
///
/// with every channel rounded and saturated to [0, 255].
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use saliency_image::{Image, ImageSize};
/// use saliency_imgproc::color::ycbcr_from_rgb_u8;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///        width: 1,
///        height: 1,
///     },
///     vec![0, 0, 0],
/// )
/// .unwrap();
///
/// let mut ycbcr = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
///
/// ycbcr_from_rgb_u8(&image, &mut ycbcr).unwrap();
///
/// assert_eq!(ycbcr.as_slice(), &[0, 128, 128]);
/// ```
pub fn ycbcr_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0] as f32;
        let g = src_pixel[1] as f32;
        let b = src_pixel[2] as f32;

        let y = 0.299 * r + 0.587 * g + 0.114 * b;
        let cb = 128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b;
        let cr = 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b;

        // float to int casts saturate at the type bounds
        dst_pixel[0] = y.round() as u8;
        dst_pixel[1] = cb.round() as u8;
        dst_pixel[2] = cr.round() as u8;
    });

    Ok(())
}

/// Convert a full range YCbCr8 image back to RGB8.
///
/// Precondition: the input and output images must have the same size.
pub fn rgb_from_ycbcr_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let y = src_pixel[0] as f32;
        let cb = src_pixel[1] as f32 - 128.0;
        let cr = src_pixel[2] as f32 - 128.0;

        let r = y + 1.402 * cr;
        let g = y - 0.344136 * cb - 0.714136 * cr;
        let b = y + 1.772 * cb;

        dst_pixel[0] = r.round() as u8;
        dst_pixel[1] = g.round() as u8;
        dst_pixel[2] = b.round() as u8;
    });

    Ok(())
}

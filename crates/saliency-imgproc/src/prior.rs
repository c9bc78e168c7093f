//! Center bias priors.
//!
//! Human fixations favor the middle of an image. The prior is a separable gaussian density
//! centered on the image, blended into a saliency map either additively or multiplicatively.

use saliency_image::{Image, ImageError, ImageSize};

use crate::filter::kernels::gaussian_pdf_1d;

/// How the center prior is blended into a saliency map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriorBlend {
    /// `(1 - w) * x + w * prior`
    Add,
    /// `(1 - w) * x + w * (x * prior)`
    Mult,
}

/// Build the center prior mask of an image.
///
/// The mask is the outer product of two 1D normal densities, one per axis, with standard
/// deviation `axis_len * prop`. The densities are sampled on the integer grid running from
/// `-(n / 2)` to `(n - 1) / 2` and are not renormalized.
///
/// # Example
///
/// ```
/// use saliency_image::ImageSize;
/// use saliency_imgproc::prior::center_prior_mask;
///
/// let mask = center_prior_mask(ImageSize { width: 5, height: 5 }, 0.2);
/// let (peak, corner) = (mask.as_slice()[12], mask.as_slice()[0]);
/// assert!(peak > corner);
/// ```
pub fn center_prior_mask(size: ImageSize, prop: f64) -> Image<f64, 1> {
    let prior_rows = gaussian_pdf_1d(size.height, size.height as f64 * prop);
    let prior_cols = gaussian_pdf_1d(size.width, size.width as f64 * prop);

    Image::from_fn(size, |r, c, _| prior_rows[r] * prior_cols[c])
}

/// Blend a center prior mask into every channel of an image.
///
/// `weight` is not clamped: values outside `[0, 1]` extrapolate linearly.
///
/// # Arguments
///
/// * `src` - The saliency map with shape (H, W, C).
/// * `prior` - The prior mask with shape (H, W).
/// * `dst` - The blended map with shape (H, W, C).
/// * `weight` - The weight of the prior.
/// * `blend` - The blending law.
pub fn blend_center_prior<const C: usize>(
    src: &Image<f64, C>,
    prior: &Image<f64, 1>,
    dst: &mut Image<f64, C>,
    weight: f64,
    blend: PriorBlend,
) -> Result<(), ImageError> {
    for other in [prior.size(), dst.size()] {
        if src.size() != other {
            return Err(ImageError::InvalidImageSize(
                src.cols(),
                src.rows(),
                other.width,
                other.height,
            ));
        }
    }

    dst.as_slice_mut()
        .chunks_exact_mut(C)
        .zip(src.as_slice().chunks_exact(C))
        .zip(prior.as_slice())
        .for_each(|((dst_pixel, src_pixel), &p)| {
            for (d, &x) in dst_pixel.iter_mut().zip(src_pixel) {
                *d = match blend {
                    PriorBlend::Add => (1.0 - weight) * x + weight * p,
                    PriorBlend::Mult => (1.0 - weight) * x + weight * (x * p),
                };
            }
        });

    Ok(())
}

//! Normalization operations for saliency maps.
//!
//! All statistics (minimum, maximum, mean, standard deviation, sum) are taken over every
//! element of the image, all channels together.
//!
//! # Normalization Methods
//!
//! * **Min-Max rescaling** ([`normalize_min_max`]) - Map `[min, max]` onto a target range
//! * **Unit range** ([`normalize_unit_range`]) - Map `[min, max]` onto `[0, 1]`
//! * **Mean-Std Normalization** ([`normalize_mean_std`]) - Z-score normalization
//! * **Log density** ([`normalize_log_density`]) - Log-probability map
//!
//! # Degenerate inputs
//!
//! A constant image has a zero range and a zero standard deviation. The divisions are left
//! to IEEE arithmetic: the results are NaN or infinite, never clamped to a finite value.

use num_traits::Float;

use saliency_image::{Image, ImageError};

use crate::parallel;

/// Find the minimum and maximum values in an image.
///
/// # Errors
///
/// If the image holds no pixels, an error is returned.
///
/// # Example
///
/// ```
/// use saliency_image::{Image, ImageSize};
/// use saliency_imgproc::normalize::find_min_max;
///
/// let image = Image::<u8, 3>::new(
///   ImageSize {
///     width: 2,
///     height: 2,
///   },
///   vec![0u8, 1, 0, 1, 2, 3, 0, 1, 0, 1, 2, 3],
/// )
/// .unwrap();
///
/// let (min, max) = find_min_max(&image).unwrap();
/// assert_eq!(min, 0);
/// assert_eq!(max, 3);
/// ```
pub fn find_min_max<T, const C: usize>(image: &Image<T, C>) -> Result<(T, T), ImageError>
where
    T: Copy + PartialOrd,
{
    // get the first element in the image
    let first_element = match image.as_slice().iter().next() {
        Some(x) => x,
        None => return Err(ImageError::ImageDataNotInitialized),
    };

    let mut min = first_element;
    let mut max = first_element;

    for x in image.as_slice().iter() {
        if x < min {
            min = x;
        }
        if x > max {
            max = x;
        }
    }

    Ok((*min, *max))
}

/// Compute the mean and the population standard deviation of all the image elements.
///
/// # Errors
///
/// If the image holds no pixels, an error is returned.
pub fn find_mean_std<T, const C: usize>(image: &Image<T, C>) -> Result<(T, T), ImageError>
where
    T: Float,
{
    let data = image.as_slice();
    if data.is_empty() {
        return Err(ImageError::ImageDataNotInitialized);
    }

    let n = T::from(data.len()).ok_or(ImageError::CastError("float".into()))?;
    let mean = data.iter().fold(T::zero(), |acc, &x| acc + x) / n;
    let var = data
        .iter()
        .fold(T::zero(), |acc, &x| acc + (x - mean) * (x - mean))
        / n;

    Ok((mean, var.sqrt()))
}

/// Normalize an image using per-channel mean and standard deviation (Z-score normalization).
///
/// Applies the transformation `(pixel - μ) / σ` independently to each channel.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
/// * `dst` - The output normalized image with shape (H, W, C).
/// * `mean` - Array of mean values, one per channel.
/// * `std` - Array of standard deviation values, one per channel.
///
/// A zero `std` yields infinite or NaN values.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if `src` and `dst` have different dimensions.
pub fn normalize_mean_std<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    mean: &[T; C],
    std: &[T; C],
) -> Result<(), ImageError>
where
    T: Send + Sync + Float,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        src_pixel
            .iter()
            .zip(dst_pixel.iter_mut())
            .zip(mean.iter())
            .zip(std.iter())
            .for_each(|(((&src_val, dst_val), &mean_val), &std_val)| {
                *dst_val = (src_val - mean_val) / std_val;
            });
    });

    Ok(())
}

/// Rescale an image so that its minimum and maximum land on `min` and `max`.
///
/// The mapping is piecewise linear: `[min_val, max_val]` of the source is mapped onto
/// `[min, max]`, values are clamped to the source range first. A constant image has no
/// range and produces NaN everywhere.
///
/// # Arguments
///
/// * `src` - The input image of shape (height, width, channels).
/// * `dst` - The output image of shape (height, width, channels).
/// * `min` - The target value of the source minimum.
/// * `max` - The target value of the source maximum.
///
/// # Example
///
/// ```
/// use saliency_image::{Image, ImageSize};
/// use saliency_imgproc::normalize::normalize_min_max;
///
/// let image = Image::<f64, 1>::new(
///   ImageSize {
///     width: 3,
///     height: 1,
///   },
///   vec![2.0, 3.0, 6.0],
/// )
/// .unwrap();
///
/// let mut normalized = Image::<f64, 1>::from_size_val(image.size(), 0.0).unwrap();
///
/// normalize_min_max(&image, &mut normalized, -1.0, 1.0).unwrap();
///
/// assert_eq!(normalized.as_slice(), &[-1.0, -0.5, 1.0]);
/// ```
pub fn normalize_min_max<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    min: T,
    max: T,
) -> Result<(), ImageError>
where
    T: Send + Sync + Float,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (min_val, max_val) = find_min_max(src)?;
    let range = max_val - min_val;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        src_pixel
            .iter()
            .zip(dst_pixel.iter_mut())
            .for_each(|(&src_val, dst_val)| {
                let t = (src_val - min_val) / range;
                // NaN must survive the clamp
                let t = if t < T::zero() {
                    T::zero()
                } else if t > T::one() {
                    T::one()
                } else {
                    t
                };
                *dst_val = min + t * (max - min);
            });
    });

    Ok(())
}

/// Map the image range onto `[0, 1]` with `(x - min) * (1 / (max - min))`.
///
/// A constant image produces NaN everywhere.
pub fn normalize_unit_range<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Send + Sync + Float,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (min_val, max_val) = find_min_max(src)?;
    let scale = T::one() / (max_val - min_val);

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        src_pixel
            .iter()
            .zip(dst_pixel.iter_mut())
            .for_each(|(&src_val, dst_val)| *dst_val = scale * (src_val - min_val));
    });

    Ok(())
}

/// Turn an image into a log density.
///
/// The image is mapped to `[0, 1]`, divided by its total sum and the natural logarithm is
/// taken. The output is a log-probability map: the minimum element becomes `-inf` and no
/// value is in a displayable range.
///
/// # Example
///
/// ```
/// use saliency_image::{Image, ImageSize};
/// use saliency_imgproc::normalize::normalize_log_density;
///
/// let image = Image::<f64, 1>::new(
///   ImageSize {
///     width: 3,
///     height: 1,
///   },
///   vec![1.0, 2.0, 3.0],
/// )
/// .unwrap();
///
/// let mut log_density = Image::<f64, 1>::from_size_val(image.size(), 0.0).unwrap();
/// normalize_log_density(&image, &mut log_density).unwrap();
///
/// let total = log_density.as_slice().iter().map(|v| v.exp()).sum::<f64>();
/// assert!((total - 1.0).abs() < 1e-12);
/// ```
pub fn normalize_log_density<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Send + Sync + Float,
{
    normalize_unit_range(src, dst)?;

    let total = dst.as_slice().iter().fold(T::zero(), |acc, &x| acc + x);

    dst.as_slice_mut()
        .iter_mut()
        .for_each(|x| *x = (*x / total).ln());

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use saliency_image::{Image, ImageError, ImageSize};

    fn sample() -> Result<Image<f64, 3>, ImageError> {
        Image::<f64, 3>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0.0, 1.0, 0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 1.0, 2.0, 3.0],
        )
    }

    #[test]
    fn normalize_mean_std() -> Result<(), ImageError> {
        let image = sample()?;
        let image_expected = [-0.5, 0.0, -0.5, 0.5, 1.0, 2.5, -0.5, 0.0, -0.5, 0.5, 1.0, 2.5];

        let mut normalized = Image::<f64, 3>::from_size_val(image.size(), 0.0)?;
        super::normalize_mean_std(&image, &mut normalized, &[0.5, 1.0, 0.5], &[1.0; 3])?;

        normalized
            .as_slice()
            .iter()
            .zip(image_expected.iter())
            .for_each(|(a, b)| {
                assert_relative_eq!(a, b, epsilon = 1e-12);
            });

        Ok(())
    }

    #[test]
    fn find_mean_std() -> Result<(), ImageError> {
        let image = Image::<f64, 1>::new([4, 1].into(), vec![1.0, 2.0, 3.0, 4.0])?;
        let (mean, std) = super::find_mean_std(&image)?;
        assert_relative_eq!(mean, 2.5);
        // population standard deviation
        assert_relative_eq!(std, 1.25f64.sqrt());

        let empty = Image::<f64, 1>::new([0, 0].into(), vec![])?;
        assert!(super::find_mean_std(&empty).is_err());
        Ok(())
    }

    #[test]
    fn find_min_max() -> Result<(), ImageError> {
        let (min, max) = super::find_min_max(&sample()?)?;
        assert_eq!(min, 0.0);
        assert_eq!(max, 3.0);
        Ok(())
    }

    #[test]
    fn normalize_min_max() -> Result<(), ImageError> {
        let image = sample()?;
        let image_expected = [
            0.0, 0.33333334, 0.0, 0.33333334, 0.6666667, 1.0, 0.0, 0.33333334, 0.0, 0.33333334,
            0.6666667, 1.0,
        ];

        let mut normalized = Image::<f64, 3>::from_size_val(image.size(), 0.0)?;
        super::normalize_min_max(&image, &mut normalized, 0.0, 1.0)?;

        normalized
            .as_slice()
            .iter()
            .zip(image_expected.iter())
            .for_each(|(a, b)| {
                assert!((a - b).abs() < 1e-6);
            });

        Ok(())
    }

    #[test]
    fn normalize_min_max_constant_is_nan() -> Result<(), ImageError> {
        let image = Image::<f64, 1>::from_size_val([4, 4].into(), 128.0)?;
        let mut normalized = Image::<f64, 1>::from_size_val(image.size(), 0.0)?;
        super::normalize_min_max(&image, &mut normalized, 0.0, 1.0)?;
        assert!(normalized.as_slice().iter().all(|v| v.is_nan()));
        Ok(())
    }

    #[test]
    fn normalize_unit_range() -> Result<(), ImageError> {
        let image = Image::<f64, 1>::new([3, 1].into(), vec![-2.0, 0.0, 2.0])?;
        let mut normalized = Image::<f64, 1>::from_size_val(image.size(), 0.0)?;
        super::normalize_unit_range(&image, &mut normalized)?;
        assert_eq!(normalized.as_slice(), &[0.0, 0.5, 1.0]);
        Ok(())
    }

    #[test]
    fn normalize_log_density() -> Result<(), ImageError> {
        let image = Image::<f64, 1>::new([4, 1].into(), vec![1.0, 2.0, 3.0, 5.0])?;
        let mut log_density = Image::<f64, 1>::from_size_val(image.size(), 0.0)?;
        super::normalize_log_density(&image, &mut log_density)?;

        assert_eq!(log_density.as_slice()[0], f64::NEG_INFINITY);
        let total = log_density
            .as_slice()
            .iter()
            .map(|v| v.exp())
            .sum::<f64>();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        Ok(())
    }
}

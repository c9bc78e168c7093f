use saliency_image::{Image, ImageError, ImageSize};
use saliency_imgproc::{
    color::convert_color_space,
    filter::gaussian_blur_2d,
    normalize::{
        find_mean_std, find_min_max, normalize_log_density, normalize_mean_std,
        normalize_min_max, normalize_unit_range,
    },
    prior::{blend_center_prior, center_prior_mask, PriorBlend},
};

use crate::{
    config::{CenterPriorMode, PostProcessOptions, PreProcessOptions, ScaleMode, SmoothingMode},
    error::SaliencyError,
};

/// Re-encode an RGB8 image in the color space requested by the options.
///
/// The source image is not modified. A gray result keeps three identical channels.
///
/// # Example
///
/// ```
/// use saliency::{image::Image, pre_process, PreProcessOptions};
///
/// let image = Image::<u8, 3>::from_fn([2, 2].into(), |_, _, ch| [255, 0, 0][ch]);
/// let options = PreProcessOptions::from_json_str(r#"{"color_space": "gray"}"#).unwrap();
///
/// let gray = pre_process(&image, &options).unwrap();
/// assert_eq!(&gray.as_slice()[..3], &[76, 76, 76]);
/// ```
pub fn pre_process(
    image: &Image<u8, 3>,
    options: &PreProcessOptions,
) -> Result<Image<u8, 3>, SaliencyError> {
    Ok(convert_color_space(image, options.color_space)?)
}

/// Post-process a raw saliency map.
///
/// The stages always run in the same order, each one only when requested:
///
/// 1. smoothing with a gaussian kernel, correlated with zero padding,
/// 2. center bias blending, optionally after mapping the map to `[0, 1]`,
/// 3. output scaling.
///
/// Every channel is processed with the same kernel and prior mask. Statistics used by the
/// scaling laws are taken over all channels together.
///
/// A flat map has no range and no spread: the scaling divisions then produce NaN or
/// infinite values, which are returned as they are and reported with a warning.
///
/// # Errors
///
/// Returns [`SaliencyError::Imgproc`] if the smoothing kernel has an invalid size, or
/// [`SaliencyError::Image`] if the map is empty.
///
/// # Example
///
/// ```
/// use saliency::{image::Image, post_process, PostProcessOptions};
///
/// let map = Image::<f64, 1>::from_fn([3, 1].into(), |_, c, _| [2.0, 4.0, 6.0][c]);
/// let scaled = post_process(&map, &PostProcessOptions::default()).unwrap();
///
/// assert_eq!(scaled.as_slice(), &[0.0, 0.5, 1.0]);
/// ```
pub fn post_process<const C: usize>(
    image: &Image<f64, C>,
    options: &PostProcessOptions,
) -> Result<Image<f64, C>, SaliencyError> {
    let mut map = image.clone();
    let mut scratch = Image::<f64, C>::from_size_val(image.size(), 0.0)?;

    if let Some((kernel_size, sigma)) = smoothing_params(options, image.size()) {
        log::debug!("{} smoothing", options.do_smoothing);
        gaussian_blur_2d(&map, &mut scratch, (kernel_size, kernel_size), sigma)?;
        std::mem::swap(&mut map, &mut scratch);
    }

    let blend = match options.center_prior {
        CenterPriorMode::Default => None,
        CenterPriorMode::ProportionalAdd => Some(PriorBlend::Add),
        CenterPriorMode::ProportionalMult => Some(PriorBlend::Mult),
    };

    if let Some(blend) = blend {
        if options.center_prior_scale_first {
            warn_if_flat(&map, "center prior rescaling")?;
            normalize_unit_range(&map, &mut scratch)?;
            std::mem::swap(&mut map, &mut scratch);
        }

        log::debug!(
            "{} center prior: prop {}, weight {}",
            options.center_prior,
            options.center_prior_prop,
            options.center_prior_weight
        );
        let prior = center_prior_mask(map.size(), options.center_prior_prop);
        blend_center_prior(
            &map,
            &prior,
            &mut scratch,
            options.center_prior_weight,
            blend,
        )?;
        std::mem::swap(&mut map, &mut scratch);
    }

    log::debug!("{} output scaling", options.scale_output);
    match options.scale_output {
        ScaleMode::MinMax => {
            warn_if_flat(&map, "min-max scaling")?;
            normalize_min_max(&map, &mut scratch, options.scale_min, options.scale_max)?;
        }
        ScaleMode::Normalized => {
            let (mean, std) = find_mean_std(&map)?;
            if std == 0.0 {
                log::warn!("normalized scaling of a map with zero standard deviation");
            }
            normalize_mean_std(&map, &mut scratch, &[mean; C], &[std; C])?;
        }
        ScaleMode::LogDensity => {
            warn_if_flat(&map, "log-density scaling")?;
            normalize_log_density(&map, &mut scratch)?;
        }
    }

    Ok(scratch)
}

/// The kernel size and sigma of the requested smoothing, if any.
fn smoothing_params(options: &PostProcessOptions, size: ImageSize) -> Option<(f64, f64)> {
    match options.do_smoothing {
        SmoothingMode::Default => None,
        SmoothingMode::Custom => Some((options.smooth_size, options.smooth_std)),
        SmoothingMode::Proportional => {
            // sigma first: 3 * (prop * n) and (3 * prop) * n round differently
            let sigma = options.smooth_prop * size.width.max(size.height) as f64;
            Some((3.0 * sigma, sigma))
        }
    }
}

fn warn_if_flat<const C: usize>(map: &Image<f64, C>, stage: &str) -> Result<(), ImageError> {
    let (min, max) = find_min_max(map)?;
    if min == max {
        log::warn!("{stage} of a flat map (value {min}), the result is not finite");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use saliency_imgproc::{
        color::ColorSpace,
        filter::{correlate_2d, kernels::gaussian_kernel_2d},
    };

    fn ramp<const C: usize>(size: ImageSize) -> Image<f64, C> {
        Image::from_fn(size, |r, c, ch| (r * size.width + c) as f64 + ch as f64 * 0.5)
    }

    #[test]
    fn pre_process_rgb_is_copy() -> Result<(), SaliencyError> {
        let image = Image::<u8, 3>::from_fn([4, 3].into(), |r, c, ch| (r * 40 + c * 9 + ch) as u8);
        let out = pre_process(&image, &PreProcessOptions::default())?;
        assert_eq!(out, image);
        Ok(())
    }

    #[test]
    fn pre_process_color_spaces() -> Result<(), SaliencyError> {
        let image = Image::<u8, 3>::from_fn([4, 3].into(), |r, c, ch| (r * 40 + c * 9 + ch) as u8);
        for color_space in [
            ColorSpace::Gray,
            ColorSpace::YCbCr,
            ColorSpace::Lab,
            ColorSpace::Hsv,
        ] {
            let out = pre_process(&image, &PreProcessOptions { color_space })?;
            assert_eq!(out.size(), image.size());
        }
        Ok(())
    }

    #[test]
    fn smoothing_params_modes() {
        let size = ImageSize {
            width: 100,
            height: 40,
        };
        let mut options = PostProcessOptions::default();
        assert_eq!(smoothing_params(&options, size), None);

        options.do_smoothing = SmoothingMode::Custom;
        assert_eq!(smoothing_params(&options, size), Some((9.0, 3.0)));

        options.do_smoothing = SmoothingMode::Proportional;
        assert_eq!(smoothing_params(&options, size), Some((15.0, 5.0)));
    }

    #[test]
    fn default_options_only_scale() -> Result<(), SaliencyError> {
        let map = ramp::<1>([4, 4].into());
        let out = post_process(&map, &PostProcessOptions::default())?;

        assert_eq!(out.as_slice()[0], 0.0);
        assert_eq!(out.as_slice()[15], 1.0);
        assert_relative_eq!(out.as_slice()[5], 5.0 / 15.0);
        Ok(())
    }

    #[test]
    fn min_max_custom_range() -> Result<(), SaliencyError> {
        let map = ramp::<1>([5, 1].into());
        let options = PostProcessOptions {
            scale_min: -2.0,
            scale_max: 2.0,
            ..Default::default()
        };
        let out = post_process(&map, &options)?;
        assert_eq!(out.as_slice(), &[-2.0, -1.0, 0.0, 1.0, 2.0]);
        Ok(())
    }

    #[test]
    fn custom_smoothing_matches_correlation() -> Result<(), SaliencyError> {
        let map = ramp::<2>([7, 6].into());
        let options = PostProcessOptions {
            do_smoothing: SmoothingMode::Custom,
            smooth_size: 3.0,
            smooth_std: 1.0,
            scale_output: ScaleMode::MinMax,
            ..Default::default()
        };
        let out = post_process(&map, &options)?;

        let kernel = gaussian_kernel_2d((3.0, 3.0), 1.0)?;
        let mut smoothed = Image::<f64, 2>::from_size_val(map.size(), 0.0)?;
        correlate_2d(&map, &mut smoothed, &kernel)?;
        let mut expected = Image::<f64, 2>::from_size_val(map.size(), 0.0)?;
        normalize_min_max(&smoothed, &mut expected, 0.0, 1.0)?;

        assert_eq!(out, expected);
        Ok(())
    }

    #[test]
    fn sub_sample_custom_kernel_is_identity() -> Result<(), SaliencyError> {
        let map = ramp::<1>([4, 4].into());
        let options = PostProcessOptions {
            do_smoothing: SmoothingMode::Custom,
            smooth_size: 0.5,
            ..Default::default()
        };
        let out = post_process(&map, &options)?;
        assert_eq!(out, post_process(&map, &PostProcessOptions::default())?);
        Ok(())
    }

    #[test]
    fn invalid_kernel_size() {
        let map = ramp::<1>([4, 4].into());
        let options = PostProcessOptions {
            do_smoothing: SmoothingMode::Custom,
            smooth_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            post_process(&map, &options),
            Err(SaliencyError::Imgproc(_))
        ));
    }

    #[test]
    fn center_prior_mult_full_weight() -> Result<(), SaliencyError> {
        let map = Image::<f64, 1>::from_size_val([5, 5].into(), 3.0)?;
        let options = PostProcessOptions {
            center_prior: CenterPriorMode::ProportionalMult,
            center_prior_scale_first: false,
            center_prior_weight: 1.0,
            ..Default::default()
        };
        let out = post_process(&map, &options)?;

        // a flat map times the prior is the prior up to scale
        let prior = center_prior_mask(map.size(), 0.2);
        let mut expected = Image::<f64, 1>::from_size_val(map.size(), 0.0)?;
        normalize_min_max(&prior, &mut expected, 0.0, 1.0)?;
        for (a, b) in out.as_slice().iter().zip(expected.as_slice()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn center_prior_add_peaks_at_center() -> Result<(), SaliencyError> {
        let map = Image::<f64, 1>::from_fn([9, 9].into(), |r, c, _| ((r + c) % 2) as f64);
        let options = PostProcessOptions {
            center_prior: CenterPriorMode::ProportionalAdd,
            center_prior_weight: 0.9,
            ..Default::default()
        };
        let out = post_process(&map, &options)?;

        let center = out.get([4, 4, 0]).copied().unwrap_or_default();
        let corner = out.get([0, 0, 0]).copied().unwrap_or_default();
        assert!(center > corner);
        Ok(())
    }

    #[test]
    fn normalized_scaling() -> Result<(), SaliencyError> {
        let map = ramp::<3>([6, 5].into());
        let options = PostProcessOptions {
            scale_output: ScaleMode::Normalized,
            ..Default::default()
        };
        let out = post_process(&map, &options)?;

        let n = out.as_slice().len() as f64;
        let mean = out.as_slice().iter().sum::<f64>() / n;
        let var = out.as_slice().iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
        assert_relative_eq!(var, 1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn normalized_flat_map_is_not_finite() -> Result<(), SaliencyError> {
        let map = Image::<f64, 1>::from_size_val([3, 3].into(), 2.0)?;
        let options = PostProcessOptions {
            scale_output: ScaleMode::Normalized,
            ..Default::default()
        };
        let out = post_process(&map, &options)?;
        assert!(out.as_slice().iter().all(|v| v.is_nan()));
        Ok(())
    }

    #[test]
    fn empty_map() {
        let map = Image::<f64, 1>::from_fn([0, 0].into(), |_, _, _| 0.0);
        assert!(matches!(
            post_process(&map, &PostProcessOptions::default()),
            Err(SaliencyError::Image(ImageError::ImageDataNotInitialized))
        ));
    }
}

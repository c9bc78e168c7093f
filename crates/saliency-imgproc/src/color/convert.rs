use std::{fmt, str::FromStr};

use saliency_image::Image;

use super::{
    apply_transform, build_transform, gray_from_rgb_u8, hsv_from_rgb_u8, rgb_from_gray,
    ycbcr_from_rgb_u8, ColorProfile,
};
use crate::error::ImgprocError;

/// The color spaces an RGB8 image can be re-encoded to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorSpace {
    /// Leave the image untouched.
    Default,
    /// RGB, the encoding of the input.
    #[default]
    Rgb,
    /// Luma, expanded back to three identical channels.
    Gray,
    /// Full range JPEG YCbCr.
    YCbCr,
    /// CIE L*a*b*, reached through an sRGB -> Lab profile transform.
    Lab,
    /// Hue, saturation and value, all in [0, 255].
    Hsv,
}

impl ColorSpace {
    /// The canonical name of the color space.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorSpace::Default => "default",
            ColorSpace::Rgb => "RGB",
            ColorSpace::Gray => "gray",
            ColorSpace::YCbCr => "YCbCr",
            ColorSpace::Lab => "LAB",
            ColorSpace::Hsv => "HSV",
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorSpace {
    type Err = ImgprocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(ColorSpace::Default),
            "RGB" => Ok(ColorSpace::Rgb),
            "gray" => Ok(ColorSpace::Gray),
            "YCbCr" => Ok(ColorSpace::YCbCr),
            "LAB" => Ok(ColorSpace::Lab),
            "HSV" => Ok(ColorSpace::Hsv),
            other => Err(ImgprocError::UnsupportedColorSpace(other.to_string())),
        }
    }
}

/// Re-encode an RGB8 image in the given color space.
///
/// The output always has three channels: a gray result is replicated across them.
/// The source image is left untouched.
///
/// # Example
///
/// ```
/// use saliency_image::{Image, ImageSize};
/// use saliency_imgproc::color::{convert_color_space, ColorSpace};
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 1,
///         height: 1,
///     },
///     vec![255, 0, 0],
/// )
/// .unwrap();
///
/// let gray = convert_color_space(&image, ColorSpace::Gray).unwrap();
/// assert_eq!(gray.as_slice(), &[76, 76, 76]);
/// ```
pub fn convert_color_space(
    src: &Image<u8, 3>,
    color_space: ColorSpace,
) -> Result<Image<u8, 3>, ImgprocError> {
    log::debug!("converting {} image to {}", src.size(), color_space);

    let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;

    match color_space {
        ColorSpace::Default | ColorSpace::Rgb => dst = src.clone(),
        ColorSpace::Gray => {
            let mut gray = Image::<u8, 1>::from_size_val(src.size(), 0)?;
            gray_from_rgb_u8(src, &mut gray)?;
            rgb_from_gray(&gray, &mut dst)?;
        }
        ColorSpace::YCbCr => ycbcr_from_rgb_u8(src, &mut dst)?,
        ColorSpace::Hsv => hsv_from_rgb_u8(src, &mut dst)?,
        ColorSpace::Lab => {
            dst = src.clone();
            let rgb2lab = build_transform(ColorProfile::Srgb, ColorProfile::Lab);
            apply_transform(&mut dst, &rgb2lab);
        }
    }

    Ok(dst)
}

/// Coerce a real valued image to the 8 bit range.
///
/// Values are truncated toward zero and saturated at 0 and 255; NaN maps to 0.
pub fn coerce_u8<const C: usize>(src: &Image<f64, C>) -> Image<u8, C> {
    // float to int casts truncate and saturate
    src.map(|&x| x as u8)
}

#[cfg(test)]
mod tests {
    use super::{coerce_u8, convert_color_space, ColorSpace};
    use crate::color::{rgb_from_hsv_u8, rgb_from_ycbcr_u8};
    use crate::error::ImgprocError;
    use saliency_image::Image;

    fn synthetic_rgb() -> Result<Image<u8, 3>, ImgprocError> {
        Ok(Image::from_fn([8, 6].into(), |r, c, ch| {
            ((r * 37 + c * 23 + ch * 71) % 256) as u8
        }))
    }

    fn assert_close(a: &Image<u8, 3>, b: &Image<u8, 3>, tol: i32) {
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert!((*x as i32 - *y as i32).abs() <= tol, "{x} vs {y}");
        }
    }

    #[test]
    fn parse_color_space() {
        for name in ["default", "RGB", "gray", "YCbCr", "LAB", "HSV"] {
            let space: ColorSpace = name.parse().unwrap();
            assert_eq!(space.as_str(), name);
        }
        assert_eq!(
            "XYZ".parse::<ColorSpace>(),
            Err(ImgprocError::UnsupportedColorSpace("XYZ".into()))
        );
        assert_eq!(ColorSpace::default(), ColorSpace::Rgb);
    }

    #[test]
    fn identity_spaces() -> Result<(), ImgprocError> {
        let image = synthetic_rgb()?;
        assert_eq!(convert_color_space(&image, ColorSpace::Default)?, image);
        assert_eq!(convert_color_space(&image, ColorSpace::Rgb)?, image);
        Ok(())
    }

    #[test]
    fn gray_round_trip() -> Result<(), ImgprocError> {
        let image = Image::<u8, 3>::from_fn([5, 5].into(), |r, c, _| (r * 50 + c) as u8);
        let gray = convert_color_space(&image, ColorSpace::Gray)?;
        assert_close(&gray, &image, 1);
        Ok(())
    }

    #[test]
    fn ycbcr_round_trip() -> Result<(), ImgprocError> {
        let image = synthetic_rgb()?;
        let ycbcr = convert_color_space(&image, ColorSpace::YCbCr)?;
        let mut rgb = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        rgb_from_ycbcr_u8(&ycbcr, &mut rgb)?;
        assert_close(&rgb, &image, 3);
        Ok(())
    }

    #[test]
    fn hsv_round_trip() -> Result<(), ImgprocError> {
        let image = synthetic_rgb()?;
        let hsv = convert_color_space(&image, ColorSpace::Hsv)?;
        let mut rgb = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        rgb_from_hsv_u8(&hsv, &mut rgb)?;
        assert_close(&rgb, &image, 8);
        Ok(())
    }

    #[test]
    fn lab_keeps_source() -> Result<(), ImgprocError> {
        let image = synthetic_rgb()?;
        let copy = image.clone();
        let lab = convert_color_space(&image, ColorSpace::Lab)?;
        assert_eq!(image, copy);
        assert_ne!(lab, image);
        Ok(())
    }

    #[test]
    fn coerce_truncates_and_saturates() -> Result<(), ImgprocError> {
        let image = Image::<f64, 1>::new([5, 1].into(), vec![-3.0, 12.9, 255.5, 300.0, f64::NAN])?;
        assert_eq!(coerce_u8(&image).as_slice(), &[0, 12, 255, 255, 0]);
        Ok(())
    }
}

use palette::{FromColor, IntoColor, Lab, LinSrgb, Srgb};

use crate::parallel;
use saliency_image::Image;

/// A color profile an 8 bit, 3 channel image can be encoded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorProfile {
    /// Gamma encoded sRGB.
    Srgb,
    /// CIE L*a*b* (D65), stored as `L * 255 / 100`, `a + 128`, `b + 128`.
    Lab,
}

/// A transform between two color profiles, built with [`build_transform`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorTransform {
    src: ColorProfile,
    dst: ColorProfile,
}

impl ColorTransform {
    /// The profile the transform reads.
    pub fn src(&self) -> ColorProfile {
        self.src
    }

    /// The profile the transform writes.
    pub fn dst(&self) -> ColorProfile {
        self.dst
    }

    fn map_pixel(&self, pixel: &mut [u8]) {
        let mapped = match (self.src, self.dst) {
            (ColorProfile::Srgb, ColorProfile::Lab) => encode_lab(lab_from_srgb(pixel)),
            (ColorProfile::Lab, ColorProfile::Srgb) => srgb_from_lab(decode_lab(pixel)),
            _ => return,
        };
        pixel.copy_from_slice(&mapped);
    }
}

/// Build a transform from the `src` profile to the `dst` profile.
///
/// # Example
///
/// ```
/// use saliency_image::{Image, ImageSize};
/// use saliency_imgproc::color::{apply_transform, build_transform, ColorProfile};
///
/// let mut image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 1,
///         height: 1,
///     },
///     vec![255, 255, 255],
/// )
/// .unwrap();
///
/// let rgb2lab = build_transform(ColorProfile::Srgb, ColorProfile::Lab);
/// apply_transform(&mut image, &rgb2lab);
///
/// assert_eq!(image.as_slice(), &[255, 128, 128]);
/// ```
pub fn build_transform(src: ColorProfile, dst: ColorProfile) -> ColorTransform {
    ColorTransform { src, dst }
}

/// Apply a color transform to an image in place.
pub fn apply_transform(image: &mut Image<u8, 3>, transform: &ColorTransform) {
    if transform.src == transform.dst {
        return;
    }
    parallel::par_iter_rows_mut(image, |pixel| transform.map_pixel(pixel));
}

fn lab_from_srgb(pixel: &[u8]) -> Lab {
    let srgb = Srgb::new(
        pixel[0] as f32 / 255.0,
        pixel[1] as f32 / 255.0,
        pixel[2] as f32 / 255.0,
    );
    // sRGB has to be linearized before it can be mapped to L*a*b*
    let lin: LinSrgb<f32> = srgb.into_linear();
    Lab::from_color(lin)
}

fn srgb_from_lab(lab: Lab) -> [u8; 3] {
    let lin: LinSrgb<f32> = lab.into_color();
    let srgb: Srgb<f32> = Srgb::from_linear(lin);
    [
        (srgb.red * 255.0).round() as u8,
        (srgb.green * 255.0).round() as u8,
        (srgb.blue * 255.0).round() as u8,
    ]
}

fn encode_lab(lab: Lab) -> [u8; 3] {
    [
        (lab.l * 255.0 / 100.0).round() as u8,
        (lab.a + 128.0).round() as u8,
        (lab.b + 128.0).round() as u8,
    ]
}

fn decode_lab(pixel: &[u8]) -> Lab {
    Lab::new(
        pixel[0] as f32 * 100.0 / 255.0,
        pixel[1] as f32 - 128.0,
        pixel[2] as f32 - 128.0,
    )
}

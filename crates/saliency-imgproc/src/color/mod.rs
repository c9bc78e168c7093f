mod convert;
mod gray;
mod hsv;
mod lab;
mod ycbcr;

pub use convert::{coerce_u8, convert_color_space, ColorSpace};
pub use gray::{gray_from_rgb_u8, rgb_from_gray};
pub use hsv::{hsv_from_rgb_u8, rgb_from_hsv_u8};
pub use lab::{apply_transform, build_transform, ColorProfile, ColorTransform};
pub use ycbcr::{rgb_from_ycbcr_u8, ycbcr_from_rgb_u8};

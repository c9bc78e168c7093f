#![deny(missing_docs)]
//! Image types for saliency map processing

/// image representation for saliency processing.
pub mod image;

/// Error types for the image module.
pub mod error;

/// image basic operations.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};

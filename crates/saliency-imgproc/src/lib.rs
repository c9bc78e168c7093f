#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// Error types for the imgproc module.
pub mod error;

/// image filtering module.
pub mod filter;

/// operations to normalize images.
pub mod normalize;

/// module containing parallization utilities.
pub mod parallel;

/// center bias priors for saliency maps.
pub mod prior;

pub use crate::error::ImgprocError;

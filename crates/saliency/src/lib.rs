#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use saliency_image as image;

#[doc(inline)]
pub use saliency_imgproc as imgproc;

#[doc(inline)]
pub use saliency_io as io;

/// Pre- and post-processing options.
pub mod config;

/// Error types of the processing pipeline.
pub mod error;

/// The pre- and post-processing entry points.
pub mod pipeline;

pub use crate::config::{
    CenterPriorMode, PostProcessOptions, PreProcessOptions, ScaleMode, SmoothingMode,
};
pub use crate::error::SaliencyError;
pub use crate::pipeline::{post_process, pre_process};

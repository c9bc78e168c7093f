//! Filter operations
//!
//! This module provides the Gaussian kernels and the correlation used to smooth saliency maps.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;

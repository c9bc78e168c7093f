#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// High-level image writing functions.
///
/// See [`functional::save_image`] for writing a map with a given owner.
pub mod functional;

/// PNG image encoding.
pub mod png;

pub use crate::error::IoError;

use saliency_image::ImageError;

/// An error type for the imgproc module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImgprocError {
    /// The requested color space is not one of the supported names.
    #[error("{0} color space is not supported")]
    UnsupportedColorSpace(String),

    /// The kernel shape is not finite or not positive.
    #[error("Invalid kernel size ({0}, {1})")]
    InvalidKernelSize(f64, f64),

    /// Error from the underlying image.
    #[error(transparent)]
    Image(#[from] ImageError),
}

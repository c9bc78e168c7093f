use saliency_image::ImageError;
use saliency_imgproc::ImgprocError;
use saliency_io::IoError;

/// An error type for the saliency pipeline.
#[derive(thiserror::Error, Debug)]
pub enum SaliencyError {
    /// The options could not be read from JSON.
    #[error("Invalid options. {0}")]
    InvalidOptions(#[from] serde_json::Error),

    /// An option holds a value outside of its recognized names.
    #[error("unsupported value `{value}` for option `{option}`")]
    UnsupportedOption {
        /// The option name.
        option: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Error from the image processing kernels.
    #[error(transparent)]
    Imgproc(#[from] ImgprocError),

    /// Error from the underlying image.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error while saving a map.
    #[error(transparent)]
    Io(#[from] IoError),
}

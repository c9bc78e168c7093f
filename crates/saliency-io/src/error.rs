/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// The parent directory of the file does not exist and was not requested to be created.
    #[error("Parent directory does not exist: {0}")]
    ParentDoesNotExist(std::path::PathBuf),

    /// Error to manipulate the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to encode the PNG image.
    #[error("Failed to encode the png image. {0}")]
    PngEncodingError(String),
}

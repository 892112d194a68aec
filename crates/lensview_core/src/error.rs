use thiserror::Error;

#[derive(Debug, Error)]
pub enum LensError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Lens {width}x{height} at ({x}, {y}) does not fit the image")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("No source image set")]
    NoImage,
}

impl LensError {
    /// Create an invalid argument error with a message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LensError>;

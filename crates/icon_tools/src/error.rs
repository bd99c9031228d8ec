//! Error types for icon conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`IconError`].
pub type Result<T> = std::result::Result<T, IconError>;

/// Errors raised while decoding, resampling or encoding icons.
#[derive(Error, Debug)]
pub enum IconError {
    // ─────────────────────────────────────────────────────────────
    // Input Errors
    // ─────────────────────────────────────────────────────────────
    /// Source image does not exist.
    #[error("File not found: {}", path.display())]
    SourceNotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// Source is not a PNG file.
    #[error("Please select a PNG file: '{}'", path.display())]
    NotPng {
        /// Offending path.
        path: PathBuf,
    },

    /// Icon size outside of what an ICO container can hold.
    #[error("Invalid icon size '{value}': {reason}")]
    InvalidSize {
        /// Value as provided.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Colour string that is not `#rrggbb`.
    #[error("Invalid color '{value}': expected #rrggbb")]
    InvalidColor {
        /// Value as provided.
        value: String,
    },

    // ─────────────────────────────────────────────────────────────
    // Codec Errors
    // ─────────────────────────────────────────────────────────────
    /// Image could not be decoded.
    #[error("Failed to decode '{}': {message}", path.display())]
    Decode {
        /// Image path.
        path: PathBuf,
        /// Error description.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<image::ImageError>,
    },

    /// Image or icon container could not be encoded.
    #[error("Failed to encode '{}': {message}", path.display())]
    Encode {
        /// Output path.
        path: PathBuf,
        /// Error description.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ─────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────
    /// File I/O error.
    #[error("File operation failed for '{}': {message}", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Error description.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<std::io::Error>,
    },
}

impl IconError {
    /// Create a decode error from an `image` failure.
    pub fn decode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Decode {
            path: path.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create an encode error with a source.
    pub fn encode<E: std::error::Error + Send + Sync + 'static>(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Encode {
            path: path.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a file I/O error with a source.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create an invalid size error.
    pub fn invalid_size(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSize {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure was the OS refusing access to a file.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Io {
                source: Some(source),
                ..
            } => source.kind() == std::io::ErrorKind::PermissionDenied,
            Self::Decode {
                source: Some(image::ImageError::IoError(source)),
                ..
            } => source.kind() == std::io::ErrorKind::PermissionDenied,
            Self::Encode {
                source: Some(source),
                ..
            } => {
                if let Some(io) = source.downcast_ref::<std::io::Error>() {
                    io.kind() == std::io::ErrorKind::PermissionDenied
                } else if let Some(image::ImageError::IoError(io)) =
                    source.downcast_ref::<image::ImageError>()
                {
                    io.kind() == std::io::ErrorKind::PermissionDenied
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

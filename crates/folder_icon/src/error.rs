//! Error types for folder icon reconciliation.

use icon_tools::IconError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`FolderIconError`].
pub type Result<T> = std::result::Result<T, FolderIconError>;

/// Why a folder's icon could not be applied.
///
/// The `Display` text doubles as the per-folder reason shown in batch
/// summaries.
#[derive(Error, Debug)]
pub enum FolderIconError {
    // ─────────────────────────────────────────────────────────────
    // Target Errors
    // ─────────────────────────────────────────────────────────────
    /// Target path is missing or is not a directory.
    #[error("{reason}: {}", path.display())]
    InvalidTarget {
        /// Path as given.
        path: PathBuf,
        /// Short description.
        reason: &'static str,
    },

    /// Neither `folder.ico` nor `folder.png` exists.
    #[error("No folder.ico or folder.png found")]
    NoIconSource {
        /// Folder that was inspected.
        folder: PathBuf,
    },

    /// `folder.png` could not be converted into `folder.ico`.
    #[error("Failed to {action}: {source}")]
    RegenerationFailed {
        /// Folder being processed.
        folder: PathBuf,
        /// Either "convert PNG" or "regenerate ICO".
        action: &'static str,
        /// Underlying cause.
        #[source]
        source: IconError,
    },

    // ─────────────────────────────────────────────────────────────
    // Apply Errors
    // ─────────────────────────────────────────────────────────────
    /// The OS refused a write or attribute change.
    #[error("Permission denied (try running as administrator)")]
    PermissionDenied {
        /// File or folder that was refused.
        path: PathBuf,
    },

    /// File attributes could not be changed.
    #[error("Failed to set attributes on '{}': {source}", path.display())]
    AttributeSetFailed {
        /// File or folder being updated.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// `desktop.ini` could not be written.
    #[error("Failed to write '{}': {source}", path.display())]
    DescriptorWriteFailed {
        /// Descriptor path.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // Environment Errors
    // ─────────────────────────────────────────────────────────────
    /// Folder icons are a Windows shell feature.
    #[error("This tool only works on Windows.")]
    UnsupportedPlatform,

    /// A required external program is not on `PATH`.
    #[error("'{program}' was not found on PATH")]
    MissingDependency {
        /// Program name.
        program: String,
    },
}

impl FolderIconError {
    pub(crate) fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::InvalidTarget {
            path: path.into(),
            reason: "Folder not found",
        }
    }

    pub(crate) fn not_a_folder(path: impl Into<PathBuf>) -> Self {
        Self::InvalidTarget {
            path: path.into(),
            reason: "Path is not a folder",
        }
    }

    /// Map an attribute change failure, singling out access denied.
    pub(crate) fn attributes(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path }
        } else {
            Self::AttributeSetFailed { path, source }
        }
    }

    /// Map a descriptor write failure, singling out access denied.
    pub(crate) fn descriptor(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path }
        } else {
            Self::DescriptorWriteFailed { path, source }
        }
    }

    /// Map an icon generation failure, singling out access denied.
    pub(crate) fn regeneration(
        folder: impl Into<PathBuf>,
        ico_path: PathBuf,
        action: &'static str,
        source: IconError,
    ) -> Self {
        if source.is_permission_denied() {
            Self::PermissionDenied { path: ico_path }
        } else {
            Self::RegenerationFailed {
                folder: folder.into(),
                action,
                source,
            }
        }
    }
}

//! `desktop.ini` rendering and application.

use crate::attributes::{Attribute, FileAttributes};
use crate::error::{FolderIconError, Result};
use std::path::PathBuf;

/// Per-folder shell descriptor read by Explorer.
pub const DESKTOP_INI: &str = "desktop.ini";

/// How `desktop.ini` refers to the icon file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IconReference {
    /// Bare file name, resolved relative to the folder.
    #[default]
    Relative,
    /// Fully resolved path.
    Absolute,
}

/// A folder and the icon it should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderIconAssociation {
    pub folder: PathBuf,
    pub ico_path: PathBuf,
    pub reference: IconReference,
}

impl FolderIconAssociation {
    pub fn new(folder: impl Into<PathBuf>, ico_path: impl Into<PathBuf>, reference: IconReference) -> Self {
        Self {
            folder: folder.into(),
            ico_path: ico_path.into(),
            reference,
        }
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.folder.join(DESKTOP_INI)
    }

    /// The `IconResource` path value.
    ///
    /// Absolute references are canonicalised without the `\\?\` verbatim
    /// prefix, so the icon must exist.
    pub fn icon_resource(&self) -> std::io::Result<String> {
        match self.reference {
            IconReference::Relative => Ok(self
                .ico_path
                .file_name()
                .unwrap_or(self.ico_path.as_os_str())
                .to_string_lossy()
                .into_owned()),
            IconReference::Absolute => {
                Ok(dunce::canonicalize(&self.ico_path)?.to_string_lossy().into_owned())
            }
        }
    }

    /// Full descriptor text.
    pub fn render(&self) -> std::io::Result<String> {
        Ok(render_descriptor(&self.icon_resource()?))
    }
}

pub fn render_descriptor(icon_resource: &str) -> String {
    format!("[.ShellClassInfo]\nIconResource={icon_resource},0\n")
}

/// Write `desktop.ini` and mark the folder and descriptor for Explorer.
///
/// An existing descriptor has its protective attributes cleared first so it
/// can be overwritten.
pub fn apply_association(
    association: &FolderIconAssociation,
    attributes: &impl FileAttributes,
) -> Result<PathBuf> {
    let descriptor = association.descriptor_path();

    if descriptor.exists() {
        attributes
            .clear(
                &descriptor,
                &[Attribute::System, Attribute::Hidden, Attribute::ReadOnly],
            )
            .map_err(|e| FolderIconError::attributes(&descriptor, e))?;
    }

    let contents = association
        .render()
        .map_err(|e| FolderIconError::descriptor(&descriptor, e))?;
    std::fs::write(&descriptor, contents)
        .map_err(|e| FolderIconError::descriptor(&descriptor, e))?;
    log::debug!("Wrote {}", descriptor.display());

    attributes
        .set(&association.folder, &[Attribute::System])
        .map_err(|e| FolderIconError::attributes(&association.folder, e))?;
    attributes
        .set(&descriptor, &[Attribute::System, Attribute::Hidden])
        .map_err(|e| FolderIconError::attributes(&descriptor, e))?;

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn test_relative_descriptor() {
        let association =
            FolderIconAssociation::new("/music", "/music/folder.ico", IconReference::Relative);
        assert_eq!(
            association.render().unwrap(),
            "[.ShellClassInfo]\nIconResource=folder.ico,0\n"
        );
        assert_eq!(association.descriptor_path(), Path::new("/music/desktop.ini"));
    }

    #[test]
    fn test_absolute_descriptor_is_resolved() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("folder.ico"), b"").unwrap();

        let association = FolderIconAssociation::new(
            &nested,
            nested.join("..").join("a").join("folder.ico"),
            IconReference::Absolute,
        );
        let resource = association.icon_resource().unwrap();

        assert!(!resource.contains(".."));
        assert!(!resource.starts_with(r"\\?\"));
        assert_eq!(
            Path::new(&resource),
            dunce::canonicalize(nested.join("folder.ico")).unwrap()
        );
    }

    #[test]
    fn test_absolute_descriptor_requires_icon() {
        let association =
            FolderIconAssociation::new("/nowhere", "/nowhere/folder.ico", IconReference::Absolute);
        assert!(association.render().is_err());
    }
}

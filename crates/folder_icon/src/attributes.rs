//! File attribute backends.
//!
//! Explorer only honours `desktop.ini` when the folder carries the system
//! attribute and the descriptor itself is system + hidden.

use crate::error::{FolderIconError, Result};
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A DOS file attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    System,
    Hidden,
    ReadOnly,
}

impl Attribute {
    /// Letter used by `attrib`.
    pub fn flag(self) -> char {
        match self {
            Attribute::System => 's',
            Attribute::Hidden => 'h',
            Attribute::ReadOnly => 'r',
        }
    }
}

/// Capability to change file attributes.
///
/// Implementations report OS-level failures. A tool that ran but declined the
/// change is not an error.
pub trait FileAttributes {
    fn set(&self, path: &Path, attributes: &[Attribute]) -> io::Result<()>;
    fn clear(&self, path: &Path, attributes: &[Attribute]) -> io::Result<()>;
}

impl<T: FileAttributes + ?Sized> FileAttributes for &T {
    fn set(&self, path: &Path, attributes: &[Attribute]) -> io::Result<()> {
        (**self).set(path, attributes)
    }

    fn clear(&self, path: &Path, attributes: &[Attribute]) -> io::Result<()> {
        (**self).clear(path, attributes)
    }
}

impl<T: FileAttributes + ?Sized> FileAttributes for Box<T> {
    fn set(&self, path: &Path, attributes: &[Attribute]) -> io::Result<()> {
        (**self).set(path, attributes)
    }

    fn clear(&self, path: &Path, attributes: &[Attribute]) -> io::Result<()> {
        (**self).clear(path, attributes)
    }
}

/// Changes attributes by running the `attrib` executable.
#[derive(Debug, Clone)]
pub struct AttribCommand {
    program: PathBuf,
}

impl AttribCommand {
    pub const PROGRAM: &'static str = "attrib";

    /// Resolve `attrib` on `PATH`.
    pub fn locate() -> Result<Self> {
        match which::which(Self::PROGRAM) {
            Ok(program) => {
                log::debug!("Using {}", program.display());
                Ok(Self { program })
            }
            Err(e) => {
                log::debug!("Failed to locate {}: {}", Self::PROGRAM, e);
                Err(FolderIconError::MissingDependency {
                    program: Self::PROGRAM.to_string(),
                })
            }
        }
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, sign: char, path: &Path, attributes: &[Attribute]) -> io::Result<()> {
        let mut args = attributes
            .iter()
            .map(|attribute| OsString::from(format!("{sign}{}", attribute.flag())))
            .collect::<Vec<_>>();
        args.push(path.as_os_str().to_owned());

        #[allow(clippy::disallowed_methods)]
        let output = std::process::Command::new(&self.program)
            .args(&args)
            .output()?;

        if !output.status.success() {
            log::warn!(
                "{} {:?} exited with {}: {}",
                self.program.display(),
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout).trim()
            );
        }
        Ok(())
    }
}

impl FileAttributes for AttribCommand {
    fn set(&self, path: &Path, attributes: &[Attribute]) -> io::Result<()> {
        self.run('+', path, attributes)
    }

    fn clear(&self, path: &Path, attributes: &[Attribute]) -> io::Result<()> {
        self.run('-', path, attributes)
    }
}

#[cfg(windows)]
pub use native::NativeAttributes;

#[cfg(windows)]
mod native {
    use super::{Attribute, FileAttributes};
    use std::io;
    use std::path::Path;
    use windows::Win32::Storage::FileSystem::{
        FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_READONLY, FILE_ATTRIBUTE_SYSTEM,
        FILE_FLAGS_AND_ATTRIBUTES, GetFileAttributesW, INVALID_FILE_ATTRIBUTES,
        SetFileAttributesW,
    };
    use windows::core::{HSTRING, PCWSTR};

    /// Changes attributes through `GetFileAttributesW`/`SetFileAttributesW`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct NativeAttributes;

    impl FileAttributes for NativeAttributes {
        fn set(&self, path: &Path, attributes: &[Attribute]) -> io::Result<()> {
            let mask = mask(attributes);
            update(path, |current| current | mask)
        }

        fn clear(&self, path: &Path, attributes: &[Attribute]) -> io::Result<()> {
            let mask = mask(attributes);
            update(path, |current| current & !mask)
        }
    }

    fn mask(attributes: &[Attribute]) -> u32 {
        attributes
            .iter()
            .map(|attribute| match attribute {
                Attribute::System => FILE_ATTRIBUTE_SYSTEM.0,
                Attribute::Hidden => FILE_ATTRIBUTE_HIDDEN.0,
                Attribute::ReadOnly => FILE_ATTRIBUTE_READONLY.0,
            })
            .fold(0, |mask, bit| mask | bit)
    }

    fn update(path: &Path, change: impl FnOnce(u32) -> u32) -> io::Result<()> {
        let wide = HSTRING::from(path.as_os_str());
        let name = PCWSTR(wide.as_ptr());

        let current = unsafe { GetFileAttributesW(name) };
        if current == INVALID_FILE_ATTRIBUTES {
            return Err(io::Error::last_os_error());
        }

        let updated = change(current);
        if updated == current {
            return Ok(());
        }
        unsafe { SetFileAttributesW(name, FILE_FLAGS_AND_ATTRIBUTES(updated)) }
            .map_err(io::Error::from)
    }
}

/// Which attribute backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttributeBackend {
    /// Win32 file attribute API.
    #[default]
    Native,
    /// The `attrib` executable.
    Attrib,
}

impl fmt::Display for AttributeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeBackend::Native => write!(f, "native"),
            AttributeBackend::Attrib => write!(f, "attrib"),
        }
    }
}

impl FromStr for AttributeBackend {
    type Err = String;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(AttributeBackend::Native),
            "attrib" => Ok(AttributeBackend::Attrib),
            other => Err(format!(
                "unknown attribute backend '{other}' (expected 'native' or 'attrib')"
            )),
        }
    }
}

/// The attribute capability for this platform.
///
/// Fails with [`FolderIconError::UnsupportedPlatform`] outside Windows.
pub fn platform_attributes(backend: AttributeBackend) -> Result<Box<dyn FileAttributes>> {
    if !cfg!(windows) {
        return Err(FolderIconError::UnsupportedPlatform);
    }
    match backend {
        AttributeBackend::Native => native_attributes(),
        AttributeBackend::Attrib => Ok(Box::new(AttribCommand::locate()?)),
    }
}

#[cfg(windows)]
fn native_attributes() -> Result<Box<dyn FileAttributes>> {
    Ok(Box::new(NativeAttributes))
}

#[cfg(not(windows))]
fn native_attributes() -> Result<Box<dyn FileAttributes>> {
    Err(FolderIconError::UnsupportedPlatform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("native".parse::<AttributeBackend>(), Ok(AttributeBackend::Native));
        assert_eq!(" ATTRIB ".parse::<AttributeBackend>(), Ok(AttributeBackend::Attrib));
        assert!("powershell".parse::<AttributeBackend>().is_err());
        assert_eq!(AttributeBackend::default().to_string(), "native");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_unsupported_off_windows() {
        for backend in [AttributeBackend::Native, AttributeBackend::Attrib] {
            assert!(matches!(
                platform_attributes(backend),
                Err(FolderIconError::UnsupportedPlatform)
            ));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_attrib_command_exit_status_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let succeeding = AttribCommand::with_program("true");
        let failing = AttribCommand::with_program("false");

        assert!(succeeding.set(dir.path(), &[Attribute::System]).is_ok());
        assert!(
            failing
                .clear(dir.path(), &[Attribute::System, Attribute::Hidden])
                .is_ok()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_attrib_command_spawn_failure_is_reported() {
        let missing = AttribCommand::with_program("/nonexistent/bin/attrib");
        let err = missing
            .set(Path::new("desktop.ini"), &[Attribute::Hidden])
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(windows)]
    #[test]
    fn test_native_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("desktop.ini");
        std::fs::write(&file, "").unwrap();

        NativeAttributes
            .set(&file, &[Attribute::Hidden, Attribute::ReadOnly])
            .unwrap();
        assert!(std::fs::metadata(&file).unwrap().permissions().readonly());

        NativeAttributes
            .clear(&file, &[Attribute::Hidden, Attribute::ReadOnly])
            .unwrap();
        assert!(!std::fs::metadata(&file).unwrap().permissions().readonly());
    }
}

use crate::attributes::FileAttributes;
use crate::descriptor::{FolderIconAssociation, IconReference, apply_association};
use crate::error::{FolderIconError, Result};
use icon_tools::IconSizes;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const FOLDER_ICO: &str = "folder.ico";
pub const FOLDER_PNG: &str = "folder.png";

/// Widths Explorer needs to render a folder icon crisply at every view size.
pub const REQUIRED_WIDTHS: [u32; 4] = [16, 32, 48, 256];

/// The icon material found in a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// `folder.ico` and the widths of its frames.
    ExistingIco { path: PathBuf, widths: BTreeSet<u32> },
    /// Only `folder.png`.
    Png { path: PathBuf },
}

impl IconSource {
    /// Look for `folder.ico`, then `folder.png`.
    pub fn discover(folder: &Path) -> Option<Self> {
        let ico = folder.join(FOLDER_ICO);
        if ico.is_file() {
            let widths = ico_widths_or_empty(&ico);
            return Some(IconSource::ExistingIco { path: ico, widths });
        }

        let png = folder.join(FOLDER_PNG);
        if png.is_file() {
            return Some(IconSource::Png { path: png });
        }
        None
    }

}

pub fn missing_widths(widths: &BTreeSet<u32>) -> Vec<u32> {
    REQUIRED_WIDTHS
        .into_iter()
        .filter(|width| !widths.contains(width))
        .collect()
}

/// Frame widths of an ICO, or an empty set when it cannot be read.
pub fn ico_widths_or_empty(path: &Path) -> BTreeSet<u32> {
    icon_tools::ico_widths(path).unwrap_or_else(|e| {
        log::warn!("Treating unreadable icon as empty: {e}");
        BTreeSet::new()
    })
}

/// What reconciliation did to a folder's icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileAction {
    /// `folder.ico` already had every required width.
    UsedExisting,
    /// `folder.ico` was incomplete and rebuilt from `folder.png`.
    Regenerated { missing: Vec<u32> },
    /// `folder.ico` was generated from `folder.png`.
    Created,
    /// `folder.ico` is incomplete and there was no PNG to rebuild it from.
    KeptIncomplete { missing: Vec<u32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub folder: PathBuf,
    pub ico_path: PathBuf,
    pub action: ReconcileAction,
}

/// Progress reported while a single folder is reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileStep {
    FoundIco,
    MissingWidths(Vec<u32>),
    Regenerating,
    Regenerated,
    ConvertingPng,
    Created,
}

/// Receives per-folder progress from [`Reconciler`].
///
/// Every method defaults to doing nothing.
pub trait ReconcileObserver {
    /// `is_target` is false for subfolders of a recursive batch.
    fn started(&mut self, _folder: &Path, _is_target: bool) {}
    fn step(&mut self, _step: &ReconcileStep) {}
    fn finished(&mut self, _folder: &Path, _result: &Result<ReconcileOutcome>) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ReconcileObserver for Silent {}

/// Brings a folder's icon up to date and applies it.
pub struct Reconciler<A> {
    attributes: A,
    reference: IconReference,
}

impl<A: FileAttributes> Reconciler<A> {
    pub fn new(attributes: A) -> Self {
        Self {
            attributes,
            reference: IconReference::Relative,
        }
    }

    pub fn with_reference(mut self, reference: IconReference) -> Self {
        self.reference = reference;
        self
    }

    pub fn reconcile(&self, folder: &Path) -> Result<ReconcileOutcome> {
        self.reconcile_observed(folder, &mut Silent)
    }

    pub fn reconcile_observed(
        &self,
        folder: &Path,
        observer: &mut dyn ReconcileObserver,
    ) -> Result<ReconcileOutcome> {
        validate_target(folder)?;

        let (ico_path, action) = self.prepare_icon(folder, observer)?;
        let association = FolderIconAssociation::new(folder, &ico_path, self.reference);
        apply_association(&association, &self.attributes)?;

        log::info!("Applied {} to {}", ico_path.display(), folder.display());
        Ok(ReconcileOutcome {
            folder: folder.to_path_buf(),
            ico_path,
            action,
        })
    }

    fn prepare_icon(
        &self,
        folder: &Path,
        observer: &mut dyn ReconcileObserver,
    ) -> Result<(PathBuf, ReconcileAction)> {
        let png = folder.join(FOLDER_PNG);

        match IconSource::discover(folder) {
            Some(IconSource::ExistingIco { path: ico, widths }) => {
                observer.step(&ReconcileStep::FoundIco);
                let missing = missing_widths(&widths);
                if missing.is_empty() {
                    return Ok((ico, ReconcileAction::UsedExisting));
                }
                if !png.is_file() {
                    log::warn!(
                        "{} lacks sizes {:?} and there is no {} to rebuild it from",
                        ico.display(),
                        missing,
                        FOLDER_PNG
                    );
                    return Ok((ico, ReconcileAction::KeptIncomplete { missing }));
                }

                observer.step(&ReconcileStep::MissingWidths(missing.clone()));
                observer.step(&ReconcileStep::Regenerating);
                generate(folder, &png, &ico, REGENERATE_ICO)?;
                observer.step(&ReconcileStep::Regenerated);
                Ok((ico, ReconcileAction::Regenerated { missing }))
            }
            Some(IconSource::Png { path }) => {
                observer.step(&ReconcileStep::ConvertingPng);
                let ico = folder.join(FOLDER_ICO);
                generate(folder, &path, &ico, CONVERT_PNG)?;
                observer.step(&ReconcileStep::Created);
                Ok((ico, ReconcileAction::Created))
            }
            None => Err(FolderIconError::NoIconSource {
                folder: folder.to_path_buf(),
            }),
        }
    }
}

pub(crate) fn validate_target(folder: &Path) -> Result<()> {
    if !folder.exists() {
        return Err(FolderIconError::not_found(folder));
    }
    if !folder.is_dir() {
        return Err(FolderIconError::not_a_folder(folder));
    }
    Ok(())
}

const CONVERT_PNG: &str = "convert PNG";
const REGENERATE_ICO: &str = "regenerate ICO";

fn generate(folder: &Path, png: &Path, ico: &Path, action: &'static str) -> Result<()> {
    icon_tools::png_to_ico(png, &IconSizes::full(), ico)
        .map_err(|e| FolderIconError::regeneration(folder, ico.to_path_buf(), action, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_widths() {
        assert_eq!(missing_widths(&BTreeSet::from([16, 32, 48, 64, 256])), Vec::<u32>::new());
        assert_eq!(missing_widths(&BTreeSet::from([16, 32])), vec![48, 256]);
        assert_eq!(missing_widths(&BTreeSet::new()), REQUIRED_WIDTHS.to_vec());
    }

    #[test]
    fn test_discover_prefers_ico() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(IconSource::discover(dir.path()), None);

        std::fs::write(dir.path().join(FOLDER_PNG), b"png").unwrap();
        assert_eq!(
            IconSource::discover(dir.path()),
            Some(IconSource::Png {
                path: dir.path().join(FOLDER_PNG)
            })
        );

        std::fs::write(dir.path().join(FOLDER_ICO), b"garbage").unwrap();
        assert_eq!(
            IconSource::discover(dir.path()),
            Some(IconSource::ExistingIco {
                path: dir.path().join(FOLDER_ICO),
                widths: BTreeSet::new(),
            })
        );
    }

    #[test]
    fn test_validate_target() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "").unwrap();

        assert!(validate_target(dir.path()).is_ok());
        assert!(matches!(
            validate_target(&file),
            Err(FolderIconError::InvalidTarget {
                reason: "Path is not a folder",
                ..
            })
        ));
        assert!(matches!(
            validate_target(&dir.path().join("gone")),
            Err(FolderIconError::InvalidTarget {
                reason: "Folder not found",
                ..
            })
        ));
    }
}

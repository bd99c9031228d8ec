use crate::attributes::FileAttributes;
use crate::error::Result;
use crate::reconciler::{ReconcileObserver, ReconcileOutcome, Reconciler, validate_target};
use std::path::{Path, PathBuf};

/// Result of reconciling a folder and, optionally, its subfolders.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: usize,
    /// Folder name and failure reason, in processing order.
    pub failures: Vec<(String, String)>,
    pub outcomes: Vec<ReconcileOutcome>,
}

impl BatchReport {
    /// At least one folder was processed and none failed.
    pub fn is_success(&self) -> bool {
        self.processed > 0 && self.failures.is_empty()
    }

    fn record(&mut self, folder: &Path, result: Result<ReconcileOutcome>) {
        match result {
            Ok(outcome) => {
                self.processed += 1;
                self.outcomes.push(outcome);
            }
            Err(e) => {
                log::warn!("Failed to set icon for {}: {}", folder.display(), e);
                self.failures.push((display_name(folder), e.to_string()));
            }
        }
    }
}

impl<A: FileAttributes> Reconciler<A> {
    /// Reconcile `folder`, then each immediate subfolder when `recursive`.
    ///
    /// Subfolders are visited in name order and a failure never stops the
    /// batch. Only an invalid target fails the call itself.
    pub fn reconcile_batch(
        &self,
        folder: &Path,
        recursive: bool,
        observer: &mut dyn ReconcileObserver,
    ) -> Result<BatchReport> {
        validate_target(folder)?;

        let mut report = BatchReport::default();
        self.reconcile_one(folder, true, observer, &mut report);

        if recursive {
            match subfolders(folder) {
                Ok(subfolders) => {
                    for subfolder in subfolders {
                        self.reconcile_one(&subfolder, false, observer, &mut report);
                    }
                }
                Err(e) => {
                    log::warn!("Failed to list {}: {}", folder.display(), e);
                    report
                        .failures
                        .push((display_name(folder), format!("Failed to list subfolders: {e}")));
                }
            }
        }

        Ok(report)
    }

    fn reconcile_one(
        &self,
        folder: &Path,
        is_target: bool,
        observer: &mut dyn ReconcileObserver,
        report: &mut BatchReport,
    ) {
        observer.started(folder, is_target);
        let result = self.reconcile_observed(folder, observer);
        observer.finished(folder, &result);
        report.record(folder, result);
    }
}

fn subfolders(folder: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut subfolders = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_dir() {
            subfolders.push(path);
        }
    }
    subfolders.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(subfolders)
}

/// Last path component, or the whole path when there is none (`.`, `C:\`).
pub fn display_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.display().to_string())
}

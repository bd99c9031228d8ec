//! Human-readable progress and summaries.

use crate::batch::{BatchReport, display_name};
use crate::error::Result;
use crate::reconciler::{FOLDER_ICO, FOLDER_PNG, ReconcileObserver, ReconcileOutcome, ReconcileStep};
use std::io::Write;
use std::path::Path;

/// Failures listed individually before the rest are counted.
const MAX_LISTED_FAILURES: usize = 5;

/// Prints a per-folder processing log.
pub struct VerboseLog<W: Write> {
    out: W,
}

impl<W: Write> VerboseLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            log::debug!("Failed to write progress: {e}");
        }
    }
}

impl<W: Write> ReconcileObserver for VerboseLog<W> {
    fn started(&mut self, folder: &Path, is_target: bool) {
        if is_target {
            self.line(&format!("\nProcessing: {}", folder.display()));
        } else {
            self.line(&format!("\nProcessing subfolder: {}", display_name(folder)));
        }
    }

    fn step(&mut self, step: &ReconcileStep) {
        self.line(&step_message(step));
    }

    fn finished(&mut self, _folder: &Path, result: &Result<ReconcileOutcome>) {
        match result {
            Ok(_) => self.line("  ✓ Icon applied successfully"),
            Err(e) => self.line(&format!("  ✗ {e}")),
        }
    }
}

fn step_message(step: &ReconcileStep) -> String {
    match step {
        ReconcileStep::FoundIco => format!("  Found existing {FOLDER_ICO}"),
        ReconcileStep::MissingWidths(missing) => {
            format!("  ICO missing required sizes: {missing:?}")
        }
        ReconcileStep::Regenerating => format!("  Regenerating from {FOLDER_PNG}..."),
        ReconcileStep::Regenerated => format!("  Regenerated {FOLDER_ICO} with all sizes"),
        ReconcileStep::ConvertingPng => format!("  Found {FOLDER_PNG}, converting to ICO..."),
        ReconcileStep::Created => format!("  Created {FOLDER_ICO}"),
    }
}

/// Final summary for a batch, one line per entry.
pub fn render_summary(report: &BatchReport) -> String {
    let mut lines = Vec::new();

    if report.processed > 0 && report.failures.is_empty() {
        lines.push(format!(
            "✓ Successfully set icon for {} folder(s).",
            report.processed
        ));
        lines.push("  Refresh Windows Explorer (F5) to see the changes.".to_string());
    } else if report.processed > 0 {
        lines.push(format!(
            "⚠ Set icon for {} folder(s), but {} failed:",
            report.processed,
            report.failures.len()
        ));
        for (name, reason) in report.failures.iter().take(MAX_LISTED_FAILURES) {
            lines.push(format!("  • {name}: {reason}"));
        }
        if report.failures.len() > MAX_LISTED_FAILURES {
            lines.push(format!(
                "  ... and {} more",
                report.failures.len() - MAX_LISTED_FAILURES
            ));
        }
    } else {
        lines.push("✗ No folders were processed.".to_string());
        if let Some((name, reason)) = report.failures.first() {
            lines.push(format!("Error: {name}: {reason}"));
        }
    }

    let mut summary = lines.join("\n");
    summary.push('\n');
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolderIconError;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn failures(count: usize) -> Vec<(String, String)> {
        (1..=count)
            .map(|i| (format!("dir{i}"), "No folder.ico or folder.png found".to_string()))
            .collect()
    }

    #[test]
    fn test_summary_success() {
        let report = BatchReport {
            processed: 3,
            ..Default::default()
        };
        assert_eq!(
            render_summary(&report),
            indoc! {"
                ✓ Successfully set icon for 3 folder(s).
                  Refresh Windows Explorer (F5) to see the changes.
            "}
        );
    }

    #[test]
    fn test_summary_partial_truncates_failures() {
        let report = BatchReport {
            processed: 2,
            failures: failures(7),
            ..Default::default()
        };
        assert_eq!(
            render_summary(&report),
            indoc! {"
                ⚠ Set icon for 2 folder(s), but 7 failed:
                  • dir1: No folder.ico or folder.png found
                  • dir2: No folder.ico or folder.png found
                  • dir3: No folder.ico or folder.png found
                  • dir4: No folder.ico or folder.png found
                  • dir5: No folder.ico or folder.png found
                  ... and 2 more
            "}
        );
    }

    #[test]
    fn test_summary_nothing_processed() {
        let report = BatchReport {
            failures: failures(2),
            ..Default::default()
        };
        assert_eq!(
            render_summary(&report),
            indoc! {"
                ✗ No folders were processed.
                Error: dir1: No folder.ico or folder.png found
            "}
        );
    }

    #[test]
    fn test_verbose_log() {
        let mut log = VerboseLog::new(Vec::new());
        log.started(Path::new("/icons"), true);
        log.step(&ReconcileStep::FoundIco);
        log.step(&ReconcileStep::MissingWidths(vec![48, 256]));
        log.step(&ReconcileStep::Regenerating);
        log.step(&ReconcileStep::Regenerated);
        log.finished(
            Path::new("/icons"),
            &Ok(ReconcileOutcome {
                folder: "/icons".into(),
                ico_path: "/icons/folder.ico".into(),
                action: crate::ReconcileAction::Regenerated {
                    missing: vec![48, 256],
                },
            }),
        );
        log.started(Path::new("/icons/empty"), false);
        log.finished(
            Path::new("/icons/empty"),
            &Err(FolderIconError::NoIconSource {
                folder: "/icons/empty".into(),
            }),
        );

        let output = String::from_utf8(log.into_inner()).unwrap();
        assert_eq!(
            output,
            indoc! {"

                Processing: /icons
                  Found existing folder.ico
                  ICO missing required sizes: [48, 256]
                  Regenerating from folder.png...
                  Regenerated folder.ico with all sizes
                  ✓ Icon applied successfully

                Processing subfolder: empty
                  ✗ No folder.ico or folder.png found
            "}
        );
    }
}

//! PNG → ICO conversion driver.

use crate::container::png_to_ico;
use crate::error::{IconError, Result};
use crate::sizes::IconSizes;
use std::path::{Path, PathBuf};

/// Where a conversion writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Each source becomes `<dir>/<stem>.ico`.
    Directory(PathBuf),
    /// A single source written to exactly this path. Any further sources
    /// are reported as failures rather than overwriting it.
    File(PathBuf),
}

/// A user-specified conversion job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub sources: Vec<PathBuf>,
    pub sizes: IconSizes,
    pub destination: Destination,
}

impl ConversionRequest {
    pub fn new(sources: Vec<PathBuf>, sizes: IconSizes, destination: Destination) -> Self {
        Self {
            sources,
            sizes,
            destination,
        }
    }

    pub fn run(&self) -> ConversionSummary {
        match &self.destination {
            Destination::Directory(directory) => {
                convert_batch(&self.sources, &self.sizes, directory)
            }
            Destination::File(output) => {
                let mut summary = ConversionSummary::default();
                let mut sources = self.sources.iter();
                if let Some(first) = sources.next() {
                    summary.record(first, convert_file(first, &self.sizes, Some(output)));
                }
                for source in sources {
                    summary.reject(
                        source,
                        format!("only one source can be written to {}", output.display()),
                    );
                }
                summary
            }
        }
    }
}

/// Per-file tally of a batch conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Written icons, in input order.
    pub outputs: Vec<PathBuf>,
    /// Sources that could not be converted and why.
    pub failures: Vec<(PathBuf, String)>,
}

impl ConversionSummary {
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, source: &Path, result: Result<PathBuf>) {
        match result {
            Ok(output) => {
                log::info!("Converted {} -> {}", source.display(), output.display());
                self.succeeded += 1;
                self.outputs.push(output);
            }
            Err(e) => self.reject(source, e.to_string()),
        }
    }

    fn reject(&mut self, source: &Path, reason: String) {
        log::warn!("Failed to convert {}: {}", source.display(), reason);
        self.failed += 1;
        self.failures.push((source.to_path_buf(), reason));
    }
}

/// Convert every source into `<destination>/<stem>.ico`.
///
/// A failure on one source is recorded and the remaining sources are still
/// processed.
pub fn convert_batch(sources: &[PathBuf], sizes: &IconSizes, destination: &Path) -> ConversionSummary {
    let mut summary = ConversionSummary::default();

    if let Err(e) = std::fs::create_dir_all(destination) {
        log::warn!(
            "Failed to create output directory {}: {}",
            destination.display(),
            e
        );
    }

    for source in sources {
        let output = destination.join(ico_file_name(source));
        let result = png_to_ico(source, sizes, &output).map(|()| output);
        summary.record(source, result);
    }

    summary
}

/// Convert a single PNG.
///
/// `output` defaults to `<stem>.ico` next to the source. Returns the path
/// that was written.
pub fn convert_file(source: &Path, sizes: &IconSizes, output: Option<&Path>) -> Result<PathBuf> {
    if !source.exists() {
        return Err(IconError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }
    if !is_png(source) {
        return Err(IconError::NotPng {
            path: source.to_path_buf(),
        });
    }

    let output = match output {
        Some(output) => output.to_path_buf(),
        None => source.with_file_name(ico_file_name(source)),
    };
    png_to_ico(source, sizes, &output)?;
    log::debug!("Saved {} ({})", output.display(), sizes);
    Ok(output)
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("png"))
}

fn ico_file_name(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| "icon".into());
    let mut name = PathBuf::from(stem);
    name.set_extension("ico");
    name
}

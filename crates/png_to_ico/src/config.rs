//! Favicon option loading.
//!
//! Options come from an optional JSON file; flags given on the command line
//! override individual fields.

use anyhow::{Context as _, Result};
use clap::Args;
use icon_tools::{FaviconOptions, HexColor};
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default, Clone)]
pub struct FaviconArgs {
    /// Prefix for generated file names (letters, digits, '-' and '_')
    #[arg(long)]
    pub prefix: Option<String>,

    /// Background colour for apple-touch-icon.png
    #[arg(long, value_name = "COLOR")]
    pub background: Option<HexColor>,

    /// Manifest theme colour
    #[arg(long, value_name = "COLOR")]
    pub theme_color: Option<HexColor>,

    /// Manifest background colour
    #[arg(long, value_name = "COLOR")]
    pub manifest_background: Option<HexColor>,

    /// Application name written to manifest.json
    #[arg(long)]
    pub name: Option<String>,

    /// Short application name written to manifest.json
    #[arg(long)]
    pub short_name: Option<String>,

    /// JSON file with favicon options
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,
}

impl FaviconArgs {
    /// Load the options file, if any, then apply flag overrides.
    pub fn resolve(&self) -> Result<FaviconOptions> {
        let mut options = match &self.options {
            Some(path) => load_options(path)?,
            None => FaviconOptions::default(),
        };

        if let Some(prefix) = &self.prefix {
            options.prefix = prefix.clone();
        }
        if let Some(color) = self.background {
            options.background_color = color;
        }
        if let Some(color) = self.theme_color {
            options.theme_color = color;
        }
        if let Some(color) = self.manifest_background {
            options.manifest_background_color = color;
        }
        if let Some(name) = &self.name {
            options.name = name.clone();
        }
        if let Some(short_name) = &self.short_name {
            options.short_name = short_name.clone();
        }

        Ok(options)
    }
}

pub fn load_options(path: &Path) -> Result<FaviconOptions> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read favicon options from {}", path.display()))?;

    let options: FaviconOptions = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse favicon options from {}", path.display()))?;

    log::info!("Loaded favicon options from {}", path.display());
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_without_file() {
        let options = FaviconArgs::default().resolve().unwrap();
        assert_eq!(options, FaviconOptions::default());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favicon.json");
        std::fs::write(
            &path,
            r##"{"prefix": "docs-", "theme_color": "#202020", "name": "Docs"}"##,
        )
        .unwrap();

        let args = FaviconArgs {
            theme_color: Some(HexColor::new(0, 0, 0xff)),
            short_name: Some("D".into()),
            options: Some(path),
            ..Default::default()
        };
        let options = args.resolve().unwrap();

        assert_eq!(options.prefix, "docs-");
        assert_eq!(options.name, "Docs");
        assert_eq!(options.short_name, "D");
        assert_eq!(options.theme_color, HexColor::new(0, 0, 0xff));
        assert_eq!(options.background_color, HexColor::WHITE);
    }

    #[test]
    fn test_bad_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"theme_color": "teal"}"#).unwrap();

        let err = load_options(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse favicon options from"));

        let err = load_options(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read favicon options from"));
    }
}

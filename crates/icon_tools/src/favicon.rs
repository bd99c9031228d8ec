//! Web favicon set assembly.
//!
//! One source image becomes a fixed set of files in a destination directory:
//! a small multi-size `favicon.ico`, PNG variants for browsers and Android,
//! an opaque Apple touch icon, a web manifest and an HTML snippet linking all
//! of them with root-relative URLs.

use crate::color::HexColor;
use crate::container::{flatten_onto, open_image, stretch_square, write_ico, write_png};
use crate::error::{IconError, Result};
use crate::sizes::IconSizes;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APPLE_TOUCH_ICON_SIZE: u32 = 180;

/// PNG variants written next to `favicon.ico`, in generation order.
const PNG_VARIANTS: [(&str, u32); 4] = [
    ("favicon-16x16.png", 16),
    ("favicon-32x32.png", 32),
    ("android-chrome-192x192.png", 192),
    ("android-chrome-512x512.png", 512),
];

/// Style options for a favicon set.
///
/// Deserializable from JSON; missing fields fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaviconOptions {
    /// Prepended to every generated file name. Sanitised before use.
    pub prefix: String,
    /// Background the Apple touch icon is flattened onto.
    pub background_color: HexColor,
    pub theme_color: HexColor,
    /// Manifest `background_color`.
    pub manifest_background_color: HexColor,
    pub name: String,
    pub short_name: String,
}

impl Default for FaviconOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            background_color: HexColor::WHITE,
            theme_color: HexColor::WHITE,
            manifest_background_color: HexColor::WHITE,
            name: String::new(),
            short_name: String::new(),
        }
    }
}

/// Result of [`assemble_favicon_set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaviconSet {
    pub directory: PathBuf,
    /// The prefix actually applied after sanitising.
    pub prefix: String,
    /// Generated file names, in generation order.
    pub files: Vec<String>,
    pub html_snippet: String,
}

impl FaviconSet {
    pub fn paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.files.iter().map(|file| self.directory.join(file))
    }
}

#[derive(Debug, Serialize)]
struct WebManifest<'a> {
    name: &'a str,
    short_name: &'a str,
    icons: Vec<ManifestIcon>,
    theme_color: String,
    background_color: String,
    display: &'static str,
}

#[derive(Debug, Serialize)]
struct ManifestIcon {
    src: String,
    sizes: String,
    #[serde(rename = "type")]
    mime_type: &'static str,
}

/// Keep only ASCII letters, digits, `-` and `_`.
pub fn sanitize_prefix(prefix: &str) -> String {
    prefix
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Generate a complete favicon set from `source` into `destination`.
///
/// The destination directory is created when missing. Files are written in a
/// fixed order and generation stops at the first failure.
///
/// The PNG variants and the Apple touch icon are stretched to their square
/// size, so a non-square source is distorted rather than padded. Frames inside
/// `favicon.ico` keep the aspect ratio like every other ICO written here.
pub fn assemble_favicon_set(
    source: &Path,
    options: &FaviconOptions,
    destination: &Path,
) -> Result<FaviconSet> {
    let prefix = sanitize_prefix(options.prefix.trim());
    if prefix != options.prefix {
        log::debug!("Sanitised favicon prefix {:?} to {:?}", options.prefix, prefix);
    }

    let image = DynamicImage::ImageRgba8(open_image(source)?.to_rgba8());
    std::fs::create_dir_all(destination)
        .map_err(|e| IconError::io(destination, "Failed to create output directory", e))?;

    let mut files = Vec::with_capacity(8);
    let mut emit = |name: &str| {
        let file = format!("{prefix}{name}");
        let path = destination.join(&file);
        files.push(file);
        path
    };

    write_ico(&image, &IconSizes::favicon(), &emit("favicon.ico"))?;

    for (name, size) in PNG_VARIANTS {
        let frame = DynamicImage::ImageRgba8(stretch_square(&image, size));
        write_png(&frame, &emit(name))?;
    }

    let apple = flatten_onto(&image, APPLE_TOUCH_ICON_SIZE, options.background_color);
    write_png(&DynamicImage::ImageRgb8(apple), &emit("apple-touch-icon.png"))?;

    let manifest_path = emit("manifest.json");
    let manifest = serde_json::to_string_pretty(&web_manifest(&prefix, options))
        .map_err(|e| IconError::encode(&manifest_path, "Failed to serialize manifest", e))?;
    std::fs::write(&manifest_path, manifest)
        .map_err(|e| IconError::io(&manifest_path, "Failed to write manifest", e))?;

    let html_path = emit("favicon.html");
    let html_snippet = html_snippet(&prefix, options.theme_color);
    std::fs::write(&html_path, &html_snippet)
        .map_err(|e| IconError::io(&html_path, "Failed to write HTML snippet", e))?;

    log::info!(
        "Generated {} favicon files in {}",
        files.len(),
        destination.display()
    );

    Ok(FaviconSet {
        directory: destination.to_path_buf(),
        prefix,
        files,
        html_snippet,
    })
}

fn web_manifest<'a>(prefix: &str, options: &'a FaviconOptions) -> WebManifest<'a> {
    let icon = |size: u32| ManifestIcon {
        src: format!("/{prefix}android-chrome-{size}x{size}.png"),
        sizes: format!("{size}x{size}"),
        mime_type: "image/png",
    };
    WebManifest {
        name: &options.name,
        short_name: &options.short_name,
        icons: vec![icon(192), icon(512)],
        theme_color: options.theme_color.to_string(),
        background_color: options.manifest_background_color.to_string(),
        display: "standalone",
    }
}

/// The `<head>` markup that wires up a favicon set.
pub fn html_snippet(prefix: &str, theme_color: HexColor) -> String {
    format!(
        r#"<!-- Favicon -->
<link rel="icon" type="image/x-icon" href="/{prefix}favicon.ico">
<link rel="icon" type="image/png" sizes="32x32" href="/{prefix}favicon-32x32.png">
<link rel="icon" type="image/png" sizes="16x16" href="/{prefix}favicon-16x16.png">

<!-- Apple Touch Icon -->
<link rel="apple-touch-icon" sizes="180x180" href="/{prefix}apple-touch-icon.png">

<!-- Android Chrome -->
<link rel="manifest" href="/{prefix}manifest.json">
<meta name="theme-color" content="{theme_color}">
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn source_png(dir: &Path) -> PathBuf {
        let path = dir.join("logo.png");
        let image = RgbaImage::from_fn(64, 64, |x, _| {
            if x < 32 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        write_png(&DynamicImage::ImageRgba8(image), &path).unwrap();
        path
    }

    #[test]
    fn test_prefixed_set_has_eight_files() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_png(dir.path());
        let out = dir.path().join("public");
        let options = FaviconOptions {
            prefix: "site-".into(),
            ..Default::default()
        };

        let set = assemble_favicon_set(&source, &options, &out).unwrap();

        assert_eq!(
            set.files,
            vec![
                "site-favicon.ico",
                "site-favicon-16x16.png",
                "site-favicon-32x32.png",
                "site-android-chrome-192x192.png",
                "site-android-chrome-512x512.png",
                "site-apple-touch-icon.png",
                "site-manifest.json",
                "site-favicon.html",
            ]
        );
        assert!(set.paths().all(|path| path.is_file()));
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 8);

        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("site-manifest.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["icons"][0]["src"], "/site-android-chrome-192x192.png");
        assert_eq!(manifest["icons"][1]["sizes"], "512x512");
        assert_eq!(manifest["icons"][1]["type"], "image/png");
        assert_eq!(manifest["display"], "standalone");
    }

    #[test]
    fn test_prefix_is_sanitised_before_writing() {
        assert_eq!(sanitize_prefix("My Site!"), "MySite");
        assert_eq!(sanitize_prefix("a_b-c.d/e"), "a_b-cde");

        let dir = tempfile::tempdir().unwrap();
        let source = source_png(dir.path());
        let options = FaviconOptions {
            prefix: "My Site!".into(),
            ..Default::default()
        };

        let set = assemble_favicon_set(&source, &options, dir.path()).unwrap();

        assert_eq!(set.prefix, "MySite");
        assert!(dir.path().join("MySitefavicon.ico").is_file());
        assert!(set.html_snippet.contains("href=\"/MySitemanifest.json\""));
    }

    #[test]
    fn test_apple_touch_icon_is_opaque() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_png(dir.path());
        let options = FaviconOptions {
            background_color: "#000080".parse().unwrap(),
            ..Default::default()
        };

        assemble_favicon_set(&source, &options, dir.path()).unwrap();

        let apple = image::open(dir.path().join("apple-touch-icon.png")).unwrap();
        assert_eq!(apple.dimensions(), (180, 180));
        assert!(!apple.color().has_alpha());
        // Right half of the source is transparent.
        assert_eq!(apple.to_rgb8().get_pixel(170, 90).0, [0, 0, 0x80]);

        let android = image::open(dir.path().join("android-chrome-512x512.png")).unwrap();
        assert_eq!(android.dimensions(), (512, 512));
    }

    #[test]
    fn test_png_variants_stretch_non_square_sources() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("banner.png");
        let banner = RgbaImage::from_pixel(64, 32, Rgba([20, 140, 60, 255]));
        write_png(&DynamicImage::ImageRgba8(banner), &source).unwrap();

        assemble_favicon_set(&source, &FaviconOptions::default(), dir.path()).unwrap();

        let small = image::open(dir.path().join("favicon-16x16.png")).unwrap();
        assert_eq!(small.dimensions(), (16, 16));
        assert_eq!(small.to_rgba8().get_pixel(0, 0).0[3], 255);
        assert_eq!(small.to_rgba8().get_pixel(15, 15).0[3], 255);
    }

    #[test]
    fn test_manifest_uses_options() {
        let options = FaviconOptions {
            name: "Demo".into(),
            short_name: "D".into(),
            theme_color: "#123456".parse().unwrap(),
            manifest_background_color: "#abcdef".parse().unwrap(),
            ..Default::default()
        };

        let manifest = serde_json::to_string_pretty(&web_manifest("", &options)).unwrap();

        assert_eq!(
            manifest,
            indoc! {r##"
                {
                  "name": "Demo",
                  "short_name": "D",
                  "icons": [
                    {
                      "src": "/android-chrome-192x192.png",
                      "sizes": "192x192",
                      "type": "image/png"
                    },
                    {
                      "src": "/android-chrome-512x512.png",
                      "sizes": "512x512",
                      "type": "image/png"
                    }
                  ],
                  "theme_color": "#123456",
                  "background_color": "#abcdef",
                  "display": "standalone"
                }"##}
        );
    }

    #[test]
    fn test_html_snippet() {
        assert_eq!(
            html_snippet("web-", HexColor::new(0x33, 0x66, 0x99)),
            indoc! {r##"
                <!-- Favicon -->
                <link rel="icon" type="image/x-icon" href="/web-favicon.ico">
                <link rel="icon" type="image/png" sizes="32x32" href="/web-favicon-32x32.png">
                <link rel="icon" type="image/png" sizes="16x16" href="/web-favicon-16x16.png">

                <!-- Apple Touch Icon -->
                <link rel="apple-touch-icon" sizes="180x180" href="/web-apple-touch-icon.png">

                <!-- Android Chrome -->
                <link rel="manifest" href="/web-manifest.json">
                <meta name="theme-color" content="#336699">
            "##}
        );
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: FaviconOptions =
            serde_json::from_str(r##"{"prefix": "app-", "theme_color": "#000"}"##).unwrap();
        assert_eq!(options.prefix, "app-");
        assert_eq!(options.theme_color, HexColor::new(0, 0, 0));
        assert_eq!(options.background_color, HexColor::WHITE);
    }

    #[test]
    fn test_missing_source_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let err = assemble_favicon_set(&dir.path().join("nope.png"), &FaviconOptions::default(), &out)
            .unwrap_err();
        assert!(matches!(err, IconError::SourceNotFound { .. }));
        assert!(!out.exists());
    }
}

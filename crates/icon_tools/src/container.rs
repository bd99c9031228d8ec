//! ICO container encoding and inspection.
//!
//! Decoding and resampling go through the `image` crate; the multi-frame
//! container itself is written and read with `ico`, which keeps every frame
//! (the `image` ICO decoder only surfaces the largest one).

use crate::color::HexColor;
use crate::error::{IconError, Result};
use crate::sizes::IconSizes;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Decode an image from disk.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(IconError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    image::open(path).map_err(|e| IconError::decode(path, e))
}

/// Resample `image` into a `size`×`size` RGBA frame.
///
/// Square sources are scaled directly. Other aspect ratios are scaled to fit
/// and centred on a transparent canvas.
pub fn fit_square(image: &DynamicImage, size: u32) -> RgbaImage {
    if image.width() == image.height() {
        return imageops::resize(image, size, size, FilterType::Lanczos3);
    }

    let fitted = image.resize(size, size, FilterType::Lanczos3).to_rgba8();
    let mut canvas = RgbaImage::new(size, size);
    let x = (size - fitted.width()) / 2;
    let y = (size - fitted.height()) / 2;
    imageops::overlay(&mut canvas, &fitted, i64::from(x), i64::from(y));
    canvas
}

/// Resample `image` to exactly `size`×`size`, ignoring its aspect ratio.
pub fn stretch_square(image: &DynamicImage, size: u32) -> RgbaImage {
    imageops::resize(image, size, size, FilterType::Lanczos3)
}

/// Stretch `image` to `size` px and flatten it onto an opaque background.
pub fn flatten_onto(image: &DynamicImage, size: u32, background: HexColor) -> RgbImage {
    let [r, g, b] = background.to_rgb().0;
    let mut canvas = RgbaImage::from_pixel(size, size, image::Rgba([r, g, b, 255]));
    let frame = stretch_square(image, size);
    imageops::overlay(&mut canvas, &frame, 0, 0);
    DynamicImage::ImageRgba8(canvas).to_rgb8()
}

/// Encode `image` as a multi-resolution ICO with exactly one frame per size.
pub fn write_ico(image: &DynamicImage, sizes: &IconSizes, path: &Path) -> Result<()> {
    let mut icon_dir = ico::IconDir::new(ico::ResourceType::Icon);
    for size in sizes.iter() {
        let frame = fit_square(image, size);
        let icon_image = ico::IconImage::from_rgba_data(size, size, frame.into_raw());
        let entry = ico::IconDirEntry::encode(&icon_image)
            .map_err(|e| IconError::encode(path, format!("{size}px frame"), e))?;
        icon_dir.add_entry(entry);
    }

    let file = File::create(path).map_err(|e| IconError::io(path, "Failed to create icon", e))?;
    let mut writer = BufWriter::new(file);
    icon_dir
        .write(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| IconError::io(path, "Failed to write icon", e))?;

    log::debug!("Wrote {} ({})", path.display(), sizes);
    Ok(())
}

/// Decode the PNG at `source` and write it as an ICO at `output`.
pub fn png_to_ico(source: &Path, sizes: &IconSizes, output: &Path) -> Result<()> {
    let image = open_image(source)?;
    write_ico(&image, sizes, output)
}

/// Write an RGBA or RGB buffer as PNG.
pub fn write_png(image: &DynamicImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| IconError::encode(path, "Failed to write PNG", e))
}

/// Collect the width of every frame in an ICO container.
///
/// Works for single-frame and multi-frame files alike.
pub fn ico_widths(path: &Path) -> Result<BTreeSet<u32>> {
    let file = File::open(path).map_err(|e| IconError::io(path, "Failed to open icon", e))?;
    let icon_dir = ico::IconDir::read(BufReader::new(file)).map_err(|e| IconError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
        source: None,
    })?;
    Ok(icon_dir.entries().iter().map(|entry| entry.width()).collect())
}

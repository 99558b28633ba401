use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};

use crate::effect::EffectKind;
use crate::error::{DemoError, Result};
use crate::pixel_filter::PixelBuffer;

fn to_pixel_buffer(img: DynamicImage) -> Result<PixelBuffer> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PixelBuffer::new(width, height, rgba.into_raw())?)
}

/// Decode an image file into RGBA8.
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    log::info!("Loading image: {:?}", path);
    let img = image::open(path).map_err(|source| DemoError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let buffer = to_pixel_buffer(img)?;
    log::info!("Loaded {}x{} image", buffer.width(), buffer.height());
    Ok(buffer)
}

/// Decode encoded image bytes (PNG, JPEG, ...) into RGBA8.
pub fn load_from_memory(bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory(bytes).map_err(|source| DemoError::ImageLoad {
        path: PathBuf::from("<memory>"),
        source,
    })?;
    to_pixel_buffer(img)
}

/// Write `buffer` as a PNG.
pub fn save_png(path: &Path, buffer: &PixelBuffer) -> Result<()> {
    image::save_buffer_with_format(
        path,
        buffer.as_bytes(),
        buffer.width(),
        buffer.height(),
        image::ExtendedColorType::Rgba8,
        ImageFormat::Png,
    )
    .map_err(|source| DemoError::ImageSave {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Saved {:?}", path);
    Ok(())
}

/// `<dir>/<stem>_<effect>.png` next to `input`.
pub fn output_path(input: &Path, effect: EffectKind) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{}_{}.png", stem, effect.name()))
}

/// Colorful gradient used when no image is configured.
pub fn test_pattern(width: u32, height: u32) -> Result<PixelBuffer> {
    let mut data = Vec::new();
    for y in 0..height {
        for x in 0..width {
            data.push((x as u64 * 255 / width as u64) as u8);
            data.push((y as u64 * 255 / height as u64) as u8);
            data.push(128);
            data.push(255);
        }
    }
    Ok(PixelBuffer::new(width, height, data)?)
}

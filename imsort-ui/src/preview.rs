//! Decoding images into terminal sized bitmaps.
//!
//! A bitmap is drawn with one upper half block per cell, the foreground
//! carrying the top pixel and the background the bottom one. An area of
//! `w x h` cells therefore fits a bitmap of `w x 2h` pixels.

use std::path::{Path, PathBuf};

use image::{ImageReader, ImageResult, Rgba, RgbaImage, imageops::FilterType};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};
use tracing::{debug, warn};

const UPPER_HALF_BLOCK: &str = "▀";

#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Bitmap(RgbaImage),
    /// Shown instead of the bitmap when the image cannot be decoded.
    Fallback(String),
}

impl Preview {
    /// Decodes `path` and scales it down to fit `max_width x max_height` pixels.
    pub fn load(path: &Path, max_width: u32, max_height: u32) -> Self {
        match decode(path, max_width, max_height) {
            Ok(bitmap) => Preview::Bitmap(bitmap),
            Err(err) => {
                warn!("unable to load {}: {err}", path.display());
                Preview::Fallback(format!("Unable to load image: {err}"))
            }
        }
    }
}

fn decode(path: &Path, max_width: u32, max_height: u32) -> ImageResult<RgbaImage> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    let (width, height) = scaled_size(image.width(), image.height(), max_width, max_height);
    debug!(
        "decoded {} at {}x{}, showing {width}x{height}",
        path.display(),
        image.width(),
        image.height()
    );

    if (width, height) == (image.width(), image.height()) {
        Ok(image.to_rgba8())
    } else {
        Ok(image.resize_exact(width, height, FilterType::Lanczos3).to_rgba8())
    }
}

/// Uniform ratio that fits an image into the given bounds.
pub fn fit_ratio(width: u32, height: u32, max_width: u32, max_height: u32) -> f64 {
    if width == 0 || height == 0 {
        return 1.0;
    }
    f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    )
}

/// Size of an image after fitting it into the bounds. Images are only ever
/// scaled down.
pub fn scaled_size(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let ratio = fit_ratio(width, height, max_width, max_height);
    if ratio >= 1.0 {
        return (width, height);
    }
    let scale = |side: u32| ((f64::from(side) * ratio) as u32).max(1);
    (scale(width), scale(height))
}

/// Keeps the last decoded preview so redraws with the same image and area
/// do not decode again.
#[derive(Debug, Default)]
pub struct PreviewCache {
    key: Option<(PathBuf, u32, u32)>,
    preview: Option<Preview>,
}

impl PreviewCache {
    pub fn get(&mut self, path: &Path, max_width: u32, max_height: u32) -> &Preview {
        let key = (path.to_path_buf(), max_width, max_height);
        if self.key.as_ref() != Some(&key) {
            self.key = Some(key);
            self.preview = None;
        }
        self.preview
            .get_or_insert_with(|| Preview::load(path, max_width, max_height))
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.preview = None;
    }
}

/// Renders a bitmap centered in its area using half block cells.
pub struct HalfBlocks<'a>(pub &'a RgbaImage);

impl Widget for HalfBlocks<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let image = self.0;
        let columns = u16::try_from(image.width()).unwrap_or(u16::MAX).min(area.width);
        let rows = u16::try_from(image.height().div_ceil(2))
            .unwrap_or(u16::MAX)
            .min(area.height);
        let left = area.x + (area.width - columns) / 2;
        let top = area.y + (area.height - rows) / 2;

        for row in 0..rows {
            for column in 0..columns {
                let x = u32::from(column);
                let upper = image.get_pixel(x, u32::from(row) * 2);
                let lower_y = u32::from(row) * 2 + 1;

                if let Some(cell) = buf.cell_mut((left + column, top + row)) {
                    cell.set_symbol(UPPER_HALF_BLOCK).set_fg(to_color(upper));
                    if lower_y < image.height() {
                        cell.set_bg(to_color(image.get_pixel(x, lower_y)));
                    }
                }
            }
        }
    }
}

/// Blends the pixel over black.
fn to_color(pixel: &Rgba<u8>) -> Color {
    let [r, g, b, a] = pixel.0;
    let blend = |c: u8| ((u16::from(c) * u16::from(a)) / 255) as u8;
    Color::Rgb(blend(r), blend(g), blend(b))
}

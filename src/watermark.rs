//! Repeating rotated watermark generation.
//!
//! A watermark layer is built by stamping a tile across an oversized square
//! field in a brick-wall pattern, rotating the whole field, and cropping the
//! centered sub-rectangle back to the target size. The oversize (twice the
//! longest canvas edge) guarantees the rotated pattern still covers every
//! corner of the crop window.

use std::path::PathBuf;

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compositor;
use crate::error::ProcessError;
use crate::types::{ImageSize, Offset};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Options for the repeating text watermark.
///
/// Defaults mirror the library's stock look: translucent white 36px text,
/// rotated 30 degrees, loose horizontal spacing. `offset_factor` shifts the
/// finished layer relative to the image size before compositing; the stock
/// quarter shift up-left compensates for the stagger of the rotated field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatermarkOptions {
    #[serde(default = "default_font_file")]
    pub font_file: PathBuf,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// RGBA; alpha carries the watermark opacity.
    #[serde(default = "default_font_color")]
    pub font_color: [u8; 4],
    /// Degrees, counter-clockwise.
    #[serde(default = "default_rotate")]
    pub rotate: f64,
    /// Extra (horizontal, vertical) spacing between tiles, in pixels.
    #[serde(default = "default_gap")]
    pub gap: (u32, u32),
    /// Layer shift as a fraction of (width, height).
    #[serde(default = "default_offset_factor")]
    pub offset_factor: (f32, f32),
}

fn default_font_file() -> PathBuf {
    PathBuf::from("static/DejaVuSans.ttf")
}

fn default_font_size() -> f32 {
    36.0
}

fn default_font_color() -> [u8; 4] {
    [255, 255, 255, 51]
}

fn default_rotate() -> f64 {
    30.0
}

fn default_gap() -> (u32, u32) {
    (100, 20)
}

fn default_offset_factor() -> (f32, f32) {
    (-0.25, -0.25)
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            font_file: default_font_file(),
            font_size: default_font_size(),
            font_color: default_font_color(),
            rotate: default_rotate(),
            gap: default_gap(),
            offset_factor: default_offset_factor(),
        }
    }
}

impl WatermarkOptions {
    pub fn color(&self) -> Rgba<u8> {
        Rgba(self.font_color)
    }
}

/// Load and parse a TrueType/OpenType font file.
pub fn load_font(path: &std::path::Path) -> Result<FontVec, ProcessError> {
    let data = std::fs::read(path)?;
    FontVec::try_from_vec(data)
        .map_err(|_| ProcessError::TileRender(format!("failed to parse font {}", path.display())))
}

/// Pixel dimensions of `text` rendered at `font_size`.
pub fn measure_text(font: &FontVec, text: &str, font_size: f32) -> ImageSize {
    let (width, height) = text_size(PxScale::from(font_size), font, text);
    ImageSize::new(width.max(1), height.max(1))
}

/// Render `text` onto a transparent stamp sized to the text.
pub fn rasterize_text(
    font: &FontVec,
    text: &str,
    font_size: f32,
    color: Rgba<u8>,
) -> Result<RgbaImage, ProcessError> {
    let size = measure_text(font, text, font_size);
    let mut stamp = compositor::new_canvas(size, TRANSPARENT)?;
    draw_text_mut(&mut stamp, color, 0, 0, PxScale::from(font_size), font, text);
    Ok(stamp)
}

/// Build the watermark layer for a `canvas_size` image.
///
/// `render_tile` stamps one tile with its grid point at field coordinates
/// `(x, y)`; an error aborts the build with no partial layer returned.
/// Rows advance by `tile height + gap.1`, columns by `tile width + gap.0`,
/// and odd rows are indented half a tile width.
pub fn build_tiled_watermark<F>(
    canvas_size: ImageSize,
    tile_size: ImageSize,
    gap: (u32, u32),
    rotate_degrees: f64,
    mut render_tile: F,
) -> Result<RgbaImage, ProcessError>
where
    F: FnMut(&mut RgbaImage, i64, i64) -> Result<(), ProcessError>,
{
    if canvas_size.is_degenerate() {
        return Err(ProcessError::InvalidGeometry(
            "watermark canvas dimensions are degenerate".to_string(),
        ));
    }
    let x_interval = tile_size.width as i64 + gap.0 as i64;
    let y_interval = tile_size.height as i64 + gap.1 as i64;
    if x_interval == 0 || y_interval == 0 {
        return Err(ProcessError::InvalidGeometry(
            "tile intervals must be positive".to_string(),
        ));
    }

    let side = 2 * canvas_size.width.max(canvas_size.height) as u64;
    if side.checked_mul(side).is_none_or(|pixels| pixels > compositor::MAX_CANVAS_PIXELS) {
        return Err(ProcessError::Allocation(format!(
            "tile field for a {}x{} canvas exceeds the {} pixel ceiling",
            canvas_size.width,
            canvas_size.height,
            compositor::MAX_CANVAS_PIXELS
        )));
    }
    let field_side = side as u32;
    let mut field = compositor::new_canvas(ImageSize::new(field_side, field_side), TRANSPARENT)?;
    debug!(
        "tiling {}x{} field, intervals {}x{}",
        field_side, field_side, x_interval, y_interval
    );

    let side = field_side as i64;
    let mut row: u64 = 0;
    let mut y = 0i64;
    while y < side {
        row += 1;
        // Half-tile stagger on every other row, brick-wall style.
        let indent = (row % 2) as i64 * tile_size.width as i64 / 2;
        let mut x = indent;
        while x < side {
            render_tile(&mut field, x, y)?;
            x += x_interval;
        }
        y += y_interval;
    }

    let rotated = if rotate_degrees == 0.0 {
        field
    } else {
        // imageproc rotates clockwise for positive theta; our angles are
        // counter-clockwise.
        let theta = -(rotate_degrees.to_radians()) as f32;
        rotate_about_center(&field, theta, Interpolation::Bilinear, TRANSPARENT)
    };

    let crop_x = (field_side - canvas_size.width) / 2;
    let crop_y = (field_side - canvas_size.height) / 2;
    Ok(imageops::crop_imm(&rotated, crop_x, crop_y, canvas_size.width, canvas_size.height)
        .to_image())
}

/// Build a watermark layer by repeating a pre-rasterized stamp, centered on
/// each grid point.
pub fn tile_stamp(
    canvas_size: ImageSize,
    stamp: &RgbaImage,
    gap: (u32, u32),
    rotate_degrees: f64,
) -> Result<RgbaImage, ProcessError> {
    let tile_size = ImageSize::new(stamp.width(), stamp.height());
    let half_w = tile_size.width as i64 / 2;
    let half_h = tile_size.height as i64 / 2;
    build_tiled_watermark(canvas_size, tile_size, gap, rotate_degrees, |field, x, y| {
        imageops::overlay(field, stamp, x - half_w, y - half_h);
        Ok(())
    })
}

/// Render `text` as a repeating rotated watermark across `img`.
pub fn add_repeat_text_watermark(
    img: &DynamicImage,
    text: &str,
    options: &WatermarkOptions,
) -> Result<DynamicImage, ProcessError> {
    if text.is_empty() {
        return Err(ProcessError::InvalidArgument(
            "watermark text is empty".to_string(),
        ));
    }

    let font = load_font(&options.font_file)?;
    let stamp = rasterize_text(&font, text, options.font_size, options.color())?;

    let canvas_size = ImageSize::of_image(img);
    let layer = tile_stamp(canvas_size, &stamp, options.gap, options.rotate)?;

    let offset = Offset::new(
        (options.offset_factor.0 * canvas_size.width as f32) as i32,
        (options.offset_factor.1 * canvas_size.height as f32) as i32,
    );
    debug!(
        "compositing watermark layer at ({}, {})",
        offset.x, offset.y
    );
    let base = img.to_rgba8();
    Ok(DynamicImage::ImageRgba8(compositor::place(
        &base, &layer, offset,
    )))
}

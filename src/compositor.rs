//! Canvas allocation, alpha compositing and resampling.
//!
//! Every operation is a functional transform: inputs are borrowed, a new
//! buffer is returned. Placement offsets may be negative; out-of-bounds
//! overlay pixels are silently clipped.

use image::{DynamicImage, ImageBuffer, Rgba, RgbaImage, imageops, imageops::FilterType};
use tracing::debug;

use crate::error::ProcessError;
use crate::types::{ImageSize, Offset};

/// Upper bound on any single canvas allocation, in pixels (about 1 GiB of
/// RGBA data). The oversized watermark tile field is the dominant consumer.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

pub(crate) fn check_allocation(size: ImageSize) -> Result<(), ProcessError> {
    if size.is_degenerate() {
        return Err(ProcessError::Allocation(format!(
            "canvas dimensions {}x{} are not positive",
            size.width, size.height
        )));
    }
    if size.pixels() > MAX_CANVAS_PIXELS {
        return Err(ProcessError::Allocation(format!(
            "canvas {}x{} exceeds the {} pixel ceiling",
            size.width, size.height, MAX_CANVAS_PIXELS
        )));
    }
    Ok(())
}

/// Allocate a solid-color canvas.
pub fn new_canvas(size: ImageSize, background: Rgba<u8>) -> Result<RgbaImage, ProcessError> {
    check_allocation(size)?;
    Ok(ImageBuffer::from_pixel(size.width, size.height, background))
}

/// Composite `overlay` onto `base` at `offset` with alpha blending.
///
/// Fully opaque overlay pixels replace base pixels; partially transparent
/// ones blend `overlay * a + base * (1 - a)` per channel. The offset may be
/// negative or push the overlay past the base bounds.
pub fn place(base: &RgbaImage, overlay: &RgbaImage, offset: Offset) -> RgbaImage {
    let mut composed = base.clone();
    imageops::overlay(&mut composed, overlay, offset.x as i64, offset.y as i64);
    composed
}

/// Resample `img` to exactly `new_size`.
///
/// Aspect ratio is whatever the caller computed; no fitting is applied here.
pub fn scale(img: &DynamicImage, new_size: ImageSize) -> Result<DynamicImage, ProcessError> {
    check_allocation(new_size)?;
    let current = ImageSize::of_image(img);
    if current == new_size {
        return Ok(img.clone());
    }
    debug!(
        "resampling {}x{} -> {}x{}",
        current.width, current.height, new_size.width, new_size.height
    );
    Ok(img.resize_exact(new_size.width, new_size.height, FilterType::Lanczos3))
}

//! In-memory decode and encode.
//!
//! All codec work happens on byte buffers; persistence is a separate,
//! explicit write. JPEG goes through the quality-aware encoder, WebP through
//! the libwebp bindings, everything else through the image crate's own
//! encoders.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageEncoder, ImageFormat, ImageReader};
use tracing::debug;

use crate::error::ProcessError;
use crate::formats::OutputFormat;

/// Decode an image from raw bytes, detecting the container format.
pub fn decode(bytes: &[u8]) -> Result<(DynamicImage, ImageFormat), ProcessError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format().ok_or_else(|| {
        ProcessError::InvalidArgument("could not determine image format".to_string())
    })?;
    let img = reader.decode().map_err(ProcessError::Decode)?;
    debug!(
        "decoded {:?} image, {}x{}",
        format,
        img.width(),
        img.height()
    );
    Ok((img, format))
}

/// Encode to `format` at `quality` (0-100; meaningful for JPEG and WebP).
pub fn encode(
    img: &DynamicImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, ProcessError> {
    if quality > 100 {
        return Err(ProcessError::InvalidArgument(format!(
            "quality {} is out of range 0-100",
            quality
        )));
    }

    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel.
            let rgb_image = img.to_rgb8();
            let mut buffer = Cursor::new(Vec::new());
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            encoder
                .write_image(
                    rgb_image.as_raw(),
                    rgb_image.width(),
                    rgb_image.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(ProcessError::Encode)?;
            Ok(buffer.into_inner())
        }
        OutputFormat::WebP => {
            let rgba_image = img.to_rgba8();
            let encoder = webp::Encoder::from_rgba(
                rgba_image.as_raw(),
                rgba_image.width(),
                rgba_image.height(),
            );
            Ok(encoder.encode(quality as f32).to_vec())
        }
        OutputFormat::Png => {
            let mut buffer = Cursor::new(Vec::new());
            img.write_to(&mut buffer, ImageFormat::Png)
                .map_err(ProcessError::Encode)?;
            Ok(buffer.into_inner())
        }
        OutputFormat::Gif => {
            let mut buffer = Cursor::new(Vec::new());
            DynamicImage::ImageRgba8(img.to_rgba8())
                .write_to(&mut buffer, ImageFormat::Gif)
                .map_err(ProcessError::Encode)?;
            Ok(buffer.into_inner())
        }
        OutputFormat::Bmp => {
            let mut buffer = Cursor::new(Vec::new());
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_to(&mut buffer, ImageFormat::Bmp)
                .map_err(ProcessError::Encode)?;
            Ok(buffer.into_inner())
        }
    }
}

/// Encode and write to `path`.
pub fn save(
    img: &DynamicImage,
    path: &Path,
    format: OutputFormat,
    quality: u8,
) -> Result<(), ProcessError> {
    let bytes = encode(img, format, quality)?;
    std::fs::write(path, &bytes)?;
    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

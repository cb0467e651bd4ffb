//! Fluent editing facade over the functional core.
//!
//! An [`Editor`] owns one decoded image. Every transform consumes the editor
//! and returns a new one, so a chain like `open -> thumb -> watermark ->
//! save_as` never shares mutable state, and nothing touches disk until an
//! explicit save.

use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgba};
use tracing::debug;

use crate::codec;
use crate::compositor;
use crate::error::ProcessError;
use crate::formats::{self, OutputFormat};
use crate::geometry::{self, Anchor, FitMode};
use crate::orient;
use crate::types::ImageSize;
use crate::watermark::{self, WatermarkOptions};

/// Default letterbox background.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub mime: String,
}

pub struct Editor {
    img: DynamicImage,
    mime: String,
    output: OutputFormat,
    /// Original bytes, kept around for EXIF.
    raw: Vec<u8>,
    source_path: Option<PathBuf>,
}

impl Editor {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ProcessError> {
        let raw = std::fs::read(path.as_ref())?;
        let mut editor = Self::from_bytes(raw)?;
        editor.source_path = Some(path.as_ref().to_path_buf());
        Ok(editor)
    }

    pub fn from_bytes(raw: Vec<u8>) -> Result<Self, ProcessError> {
        let (img, detected) = codec::decode(&raw)?;
        let mime = detected.to_mime_type().to_string();
        let output = OutputFormat::from_image_format(detected).unwrap_or_else(|| {
            debug!("{:?} source is not an encode target, defaulting to PNG", detected);
            OutputFormat::Png
        });
        Ok(Self {
            img,
            mime,
            output,
            raw,
            source_path: None,
        })
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            width: self.img.width(),
            height: self.img.height(),
            mime: self.mime.clone(),
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.img
    }

    pub fn into_image(self) -> DynamicImage {
        self.img
    }

    /// Rotate/flip pixels upright per the EXIF orientation of the source.
    pub fn fix_orientation(mut self) -> Self {
        self.img = orient::fix_orientation(self.img, &self.raw);
        self
    }

    /// Switch the pending output format if the current MIME satisfies none
    /// of the `requested` extension tokens. Bytes are produced at save time.
    pub fn change_format(mut self, requested: &[&str]) -> Result<Self, ProcessError> {
        if let Some(target) = formats::needs_reencode(&self.mime, requested)? {
            let format = OutputFormat::from_extension(target).ok_or_else(|| {
                ProcessError::InvalidArgument(format!("unsupported target format: {}", target))
            })?;
            debug!("output format {} -> {}", self.mime, format.mime_type());
            self.output = format;
            self.mime = format.mime_type().to_string();
        }
        Ok(self)
    }

    /// Resize into a `width` x `height` box under `mode`, centered, padding
    /// with `background` where the scaled image leaves the canvas uncovered.
    pub fn resize(
        self,
        width: u32,
        height: u32,
        mode: FitMode,
        background: Rgba<u8>,
    ) -> Result<Self, ProcessError> {
        self.resize_anchored(width, height, mode, Anchor::Center, background)
    }

    pub fn resize_anchored(
        mut self,
        width: u32,
        height: u32,
        mode: FitMode,
        anchor: Anchor,
        background: Rgba<u8>,
    ) -> Result<Self, ProcessError> {
        let source = ImageSize::of_image(&self.img);
        let target = ImageSize::new(width, height);
        let layout = geometry::compute_layout(target, source, mode, anchor)?;

        if layout.is_noop(source) {
            debug!("layout already satisfied, keeping image as-is");
            return Ok(self);
        }

        let scaled = compositor::scale(&self.img, layout.scaled)?;
        let canvas = compositor::new_canvas(layout.canvas, background)?;
        let composed = compositor::place(&canvas, &scaled.to_rgba8(), layout.placement);
        self.img = DynamicImage::ImageRgba8(composed);
        Ok(self)
    }

    /// Thumbnail shorthand: orientation fix, then format change, then resize.
    pub fn thumb(
        self,
        width: u32,
        height: u32,
        mode: FitMode,
        format: &str,
    ) -> Result<Self, ProcessError> {
        self.fix_orientation()
            .change_format(&[format])?
            .resize(width, height, mode, WHITE)
    }

    pub fn add_repeat_text_watermark(
        mut self,
        text: &str,
        options: &WatermarkOptions,
    ) -> Result<Self, ProcessError> {
        self.img = watermark::add_repeat_text_watermark(&self.img, text, options)?;
        Ok(self)
    }

    /// Encode to the pending output format.
    pub fn to_bytes(&self, quality: u8) -> Result<Vec<u8>, ProcessError> {
        codec::encode(&self.img, self.output, quality)
    }

    /// Write back to the file this editor was opened from.
    pub fn save(self, quality: u8) -> Result<Self, ProcessError> {
        let path = self.source_path.clone().ok_or_else(|| {
            ProcessError::InvalidArgument(
                "editor was created from bytes; use save_as".to_string(),
            )
        })?;
        self.save_as(path, quality)
    }

    pub fn save_as(
        mut self,
        path: impl AsRef<Path>,
        quality: u8,
    ) -> Result<Self, ProcessError> {
        codec::save(&self.img, path.as_ref(), self.output, quality)?;
        self.source_path = Some(path.as_ref().to_path_buf());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(
            width,
            height,
            Rgba([10, 120, 200, 255]),
        ));
        codec::encode(&img, OutputFormat::Png, 100).unwrap()
    }

    #[test]
    fn test_info_reports_decoded_state() {
        let editor = Editor::from_bytes(png_bytes(64, 48)).unwrap();
        assert_eq!(
            editor.info(),
            ImageInfo {
                width: 64,
                height: 48,
                mime: "image/png".to_string(),
            }
        );
    }

    #[test]
    fn test_resize_cover_hits_target_box() {
        let editor = Editor::from_bytes(png_bytes(200, 100))
            .unwrap()
            .resize(80, 80, FitMode::Cover, WHITE)
            .unwrap();
        let info = editor.info();
        assert_eq!((info.width, info.height), (80, 80));
    }

    #[test]
    fn test_resize_contain_adopts_scaled_size() {
        let editor = Editor::from_bytes(png_bytes(200, 100))
            .unwrap()
            .resize(80, 80, FitMode::Contain, WHITE)
            .unwrap();
        let info = editor.info();
        assert_eq!((info.width, info.height), (80, 40));
    }

    #[test]
    fn test_noop_resize_skips_reallocation() {
        let editor = Editor::from_bytes(png_bytes(50, 50)).unwrap();
        let before = editor.image().as_bytes().as_ptr();
        let editor = editor.resize(50, 50, FitMode::Fill, WHITE).unwrap();
        let after = editor.image().as_bytes().as_ptr();
        assert_eq!(before, after, "no-op resize must not reallocate the buffer");
    }

    #[test]
    fn test_scale_down_keeps_small_images() {
        let editor = Editor::from_bytes(png_bytes(40, 30))
            .unwrap()
            .resize(100, 100, FitMode::ScaleDown, WHITE)
            .unwrap();
        let info = editor.info();
        assert_eq!((info.width, info.height), (40, 30));
    }

    #[test]
    fn test_change_format_keeps_matching_mime() {
        let editor = Editor::from_bytes(png_bytes(10, 10))
            .unwrap()
            .change_format(&["jpg", "png"])
            .unwrap();
        assert_eq!(editor.info().mime, "image/png");
    }

    #[test]
    fn test_change_format_switches_to_first_token() {
        let bmp = codec::encode(
            &DynamicImage::ImageRgba8(ImageBuffer::from_pixel(8, 8, Rgba([1, 2, 3, 255]))),
            OutputFormat::Bmp,
            100,
        )
        .unwrap();
        let editor = Editor::from_bytes(bmp)
            .unwrap()
            .change_format(&["jpg", "png"])
            .unwrap();
        assert_eq!(editor.info().mime, "image/jpeg");
        let bytes = editor.to_bytes(90).unwrap();
        let (_, format) = codec::decode(&bytes).unwrap();
        assert_eq!(format, image::ImageFormat::Jpeg);
    }

    #[test]
    fn test_change_format_rejects_empty_list() {
        let editor = Editor::from_bytes(png_bytes(10, 10)).unwrap();
        assert!(matches!(
            editor.change_format(&[]),
            Err(ProcessError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_save_without_path_rejected() {
        let editor = Editor::from_bytes(png_bytes(10, 10)).unwrap();
        assert!(matches!(
            editor.save(90),
            Err(ProcessError::InvalidArgument(_))
        ));
    }
}

//! Output formats and re-encode negotiation.

use image::ImageFormat;

use crate::error::ProcessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Bmp,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
            OutputFormat::Gif => "gif",
            OutputFormat::Bmp => "bmp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Gif => "image/gif",
            OutputFormat::Bmp => "image/bmp",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::WebP => ImageFormat::WebP,
            OutputFormat::Gif => ImageFormat::Gif,
            OutputFormat::Bmp => ImageFormat::Bmp,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::WebP),
            "gif" => Some(OutputFormat::Gif),
            "bmp" => Some(OutputFormat::Bmp),
            _ => None,
        }
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(OutputFormat::Jpeg),
            ImageFormat::Png => Some(OutputFormat::Png),
            ImageFormat::WebP => Some(OutputFormat::WebP),
            ImageFormat::Gif => Some(OutputFormat::Gif),
            ImageFormat::Bmp => Some(OutputFormat::Bmp),
            _ => None,
        }
    }
}

/// Decide whether an image of `current_mime` must be re-encoded to satisfy
/// `requested` format tokens (extensions, e.g. `"jpg"`).
///
/// Each token expands to its accepted MIME types; if the current MIME is in
/// the union, no re-encode happens. Otherwise the encode target is the first
/// token of the original list, regardless of which later token came closest.
pub fn needs_reencode<'a>(
    current_mime: &str,
    requested: &[&'a str],
) -> Result<Option<&'a str>, ProcessError> {
    if requested.is_empty() {
        return Err(ProcessError::InvalidArgument(
            "requested format list is empty".to_string(),
        ));
    }
    for token in requested {
        let matched = mime_guess::from_ext(token)
            .iter()
            .any(|mime| mime.essence_str() == current_mime);
        if matched {
            return Ok(None);
        }
    }
    Ok(Some(requested[0]))
}

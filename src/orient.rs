//! EXIF orientation correction.
//!
//! Cameras record sensor orientation instead of rotating pixels; decoding
//! ignores it. `fix_orientation` reads the tag from the original bytes and
//! applies the matching rotate/flip so the pixels are upright.

use image::DynamicImage;
use tracing::debug;

/// Read the EXIF orientation tag (1-8) from raw image bytes, if present.
pub fn orientation_from_exif(bytes: &[u8]) -> Option<u16> {
    let exif = match rexif::parse_buffer(bytes) {
        Ok(exif) => exif,
        Err(err) => {
            debug!("no usable EXIF data: {}", err);
            return None;
        }
    };
    exif.entries
        .iter()
        .find(|entry| entry.tag == rexif::ExifTag::Orientation)
        .and_then(|entry| match &entry.value {
            rexif::TagValue::U16(values) => values.first().copied(),
            _ => None,
        })
}

/// Apply the transform that makes an image with the given EXIF orientation
/// display upright. Values outside 2-8 are identity.
pub fn apply_orientation(img: DynamicImage, orientation: u16) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// Correct `img` per the orientation stored in its original `raw` bytes.
/// Missing or unparsable EXIF is a no-op.
pub fn fix_orientation(img: DynamicImage, raw: &[u8]) -> DynamicImage {
    match orientation_from_exif(raw) {
        Some(orientation) if orientation > 1 => {
            debug!("applying EXIF orientation {}", orientation);
            apply_orientation(img, orientation)
        }
        _ => img,
    }
}

//! Fit-layout computation for resize operations.
//!
//! Given a source size, a target box, and a fit mode mirroring CSS
//! `object-fit`, computes where the scaled image rectangle lands and how big
//! the output canvas is. Pure geometry, no pixel operations.

use std::str::FromStr;

use crate::error::ProcessError;
use crate::types::{ImageSize, Offset};

/// How to reconcile the source aspect ratio with the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Scale to fit entirely inside the target, preserving aspect ratio.
    /// The canvas adopts the scaled size, so no letterboxing occurs.
    Contain,
    /// Scale to fill the target, preserving aspect ratio. The canvas is
    /// exactly the target; overflow is cropped by compositing.
    Cover,
    /// Like [`Contain`](Self::Contain), but never upscales.
    ScaleDown,
    /// Stretch to exactly the target dimensions, distorting aspect ratio.
    Fill,
    /// No scaling; the source is placed into the target box as-is.
    None,
}

impl FromStr for FitMode {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contain" => Ok(FitMode::Contain),
            "cover" => Ok(FitMode::Cover),
            "scale-down" => Ok(FitMode::ScaleDown),
            "fill" => Ok(FitMode::Fill),
            "none" => Ok(FitMode::None),
            other => Err(ProcessError::InvalidArgument(format!(
                "unknown fit mode: {}",
                other
            ))),
        }
    }
}

/// Where to position a rectangle inside a box it does not fill exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    LeftCenter,
    #[default]
    Center,
    RightCenter,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    /// Axis factors in half-units: 0 pins to the leading edge, 1 centers,
    /// 2 pins to the trailing edge.
    fn factors(&self) -> (i64, i64) {
        match self {
            Anchor::TopLeft => (0, 0),
            Anchor::TopCenter => (1, 0),
            Anchor::TopRight => (2, 0),
            Anchor::LeftCenter => (0, 1),
            Anchor::Center => (1, 1),
            Anchor::RightCenter => (2, 1),
            Anchor::BottomLeft => (0, 2),
            Anchor::BottomCenter => (1, 2),
            Anchor::BottomRight => (2, 2),
        }
    }

    /// Placement of `inner` within `outer`. Negative when `inner` overflows
    /// the box (the overflow is split per the anchor, then cropped later).
    pub fn place(&self, outer: ImageSize, inner: ImageSize) -> Offset {
        let (fx, fy) = self.factors();
        let dx = outer.width as i64 - inner.width as i64;
        let dy = outer.height as i64 - inner.height as i64;
        Offset::new((dx * fx / 2) as i32, (dy * fy / 2) as i32)
    }
}

impl FromStr for Anchor {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-left" => Ok(Anchor::TopLeft),
            "top-center" => Ok(Anchor::TopCenter),
            "top-right" => Ok(Anchor::TopRight),
            "left-center" => Ok(Anchor::LeftCenter),
            "center" => Ok(Anchor::Center),
            "right-center" => Ok(Anchor::RightCenter),
            "bottom-left" => Ok(Anchor::BottomLeft),
            "bottom-center" => Ok(Anchor::BottomCenter),
            "bottom-right" => Ok(Anchor::BottomRight),
            other => Err(ProcessError::InvalidArgument(format!(
                "unknown anchor: {}",
                other
            ))),
        }
    }
}

/// The computed rectangle of the source image inside the output canvas.
///
/// `canvas` is carried explicitly: Contain and ScaleDown adopt the scaled
/// size (no padding), while Cover, Fill and None keep the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub canvas: ImageSize,
    pub scaled: ImageSize,
    pub placement: Offset,
}

impl Layout {
    /// True when applying this layout to `source` would change nothing.
    /// Callers use this to skip canvas allocation entirely.
    pub fn is_noop(&self, source: ImageSize) -> bool {
        self.placement == Offset::ZERO && self.scaled == source && self.canvas == source
    }
}

fn contain_ratio(target: ImageSize, source: ImageSize) -> f64 {
    let rw = target.width as f64 / source.width as f64;
    let rh = target.height as f64 / source.height as f64;
    rw.min(rh)
}

fn cover_ratio(target: ImageSize, source: ImageSize) -> f64 {
    let rw = target.width as f64 / source.width as f64;
    let rh = target.height as f64 / source.height as f64;
    rw.max(rh)
}

fn scale_size(source: ImageSize, ratio: f64) -> ImageSize {
    let width = (source.width as f64 * ratio).round().max(1.0) as u32;
    let height = (source.height as f64 * ratio).round().max(1.0) as u32;
    ImageSize::new(width, height)
}

/// Compute the layout of `source` fitted into `target` under `mode`.
///
/// The anchor governs placement whenever the scaled rectangle does not fill
/// the canvas exactly (Cover overflow, None underflow). Contain, ScaleDown
/// and Fill produce a canvas the scaled image fills edge to edge, so their
/// placement is always the origin.
pub fn compute_layout(
    target: ImageSize,
    source: ImageSize,
    mode: FitMode,
    anchor: Anchor,
) -> Result<Layout, ProcessError> {
    if source.is_degenerate() {
        return Err(ProcessError::InvalidGeometry(format!(
            "source dimensions {}x{} are degenerate",
            source.width, source.height
        )));
    }
    if target.is_degenerate() {
        return Err(ProcessError::InvalidGeometry(format!(
            "target dimensions {}x{} are degenerate",
            target.width, target.height
        )));
    }

    let layout = match mode {
        FitMode::Contain => {
            let scaled = scale_size(source, contain_ratio(target, source));
            Layout {
                canvas: scaled,
                scaled,
                placement: Offset::ZERO,
            }
        }
        FitMode::Cover => {
            let scaled = scale_size(source, cover_ratio(target, source));
            Layout {
                canvas: target,
                scaled,
                placement: anchor.place(target, scaled),
            }
        }
        FitMode::ScaleDown => {
            let scaled = scale_size(source, contain_ratio(target, source).min(1.0));
            Layout {
                canvas: scaled,
                scaled,
                placement: Offset::ZERO,
            }
        }
        FitMode::Fill => Layout {
            canvas: target,
            scaled: target,
            placement: Offset::ZERO,
        },
        FitMode::None => Layout {
            canvas: target,
            scaled: source,
            placement: anchor.place(target, source),
        },
    };

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: u32, h: u32) -> ImageSize {
        ImageSize::new(w, h)
    }

    #[test]
    fn test_contain_preserves_aspect_and_fits() {
        let layout =
            compute_layout(size(400, 300), size(1000, 500), FitMode::Contain, Anchor::Center)
                .unwrap();
        assert_eq!(layout.scaled, size(400, 200));
        assert_eq!(layout.canvas, size(400, 200));
        assert_eq!(layout.placement, Offset::ZERO);
        assert!(layout.scaled.fits_within(&size(400, 300)));
        // 2:1 in, 2:1 out
        assert_eq!(
            layout.scaled.width * 500,
            layout.scaled.height * 1000
        );
    }

    #[test]
    fn test_contain_upscales_small_sources() {
        let layout =
            compute_layout(size(400, 400), size(100, 50), FitMode::Contain, Anchor::Center)
                .unwrap();
        assert_eq!(layout.scaled, size(400, 200));
    }

    #[test]
    fn test_cover_fills_target() {
        let layout =
            compute_layout(size(400, 300), size(1000, 500), FitMode::Cover, Anchor::Center)
                .unwrap();
        assert_eq!(layout.canvas, size(400, 300));
        assert_eq!(layout.scaled, size(600, 300));
        assert!(layout.scaled.width >= 400 && layout.scaled.height >= 300);
        // Overflow split evenly: (400 - 600) / 2
        assert_eq!(layout.placement, Offset::new(-100, 0));
    }

    #[test]
    fn test_scale_down_never_upscales() {
        let layout =
            compute_layout(size(400, 300), size(200, 100), FitMode::ScaleDown, Anchor::Center)
                .unwrap();
        assert_eq!(layout.scaled, size(200, 100));
        assert_eq!(layout.canvas, size(200, 100));
    }

    #[test]
    fn test_scale_down_shrinks_large_sources() {
        let layout =
            compute_layout(size(400, 300), size(800, 600), FitMode::ScaleDown, Anchor::Center)
                .unwrap();
        assert_eq!(layout.scaled, size(400, 300));
    }

    #[test]
    fn test_fill_distorts_to_target() {
        let layout =
            compute_layout(size(400, 300), size(1000, 500), FitMode::Fill, Anchor::Center)
                .unwrap();
        assert_eq!(layout.scaled, size(400, 300));
        assert_eq!(layout.canvas, size(400, 300));
        assert_eq!(layout.placement, Offset::ZERO);
    }

    #[test]
    fn test_none_places_source_unscaled() {
        let layout =
            compute_layout(size(400, 300), size(100, 50), FitMode::None, Anchor::BottomRight)
                .unwrap();
        assert_eq!(layout.scaled, size(100, 50));
        assert_eq!(layout.canvas, size(400, 300));
        assert_eq!(layout.placement, Offset::new(300, 250));
    }

    #[test]
    fn test_anchor_placements() {
        let outer = size(100, 100);
        let inner = size(40, 20);
        assert_eq!(Anchor::TopLeft.place(outer, inner), Offset::ZERO);
        assert_eq!(Anchor::TopCenter.place(outer, inner), Offset::new(30, 0));
        assert_eq!(Anchor::TopRight.place(outer, inner), Offset::new(60, 0));
        assert_eq!(Anchor::LeftCenter.place(outer, inner), Offset::new(0, 40));
        assert_eq!(Anchor::Center.place(outer, inner), Offset::new(30, 40));
        assert_eq!(Anchor::RightCenter.place(outer, inner), Offset::new(60, 40));
        assert_eq!(Anchor::BottomLeft.place(outer, inner), Offset::new(0, 80));
        assert_eq!(Anchor::BottomCenter.place(outer, inner), Offset::new(30, 80));
        assert_eq!(Anchor::BottomRight.place(outer, inner), Offset::new(60, 80));
    }

    #[test]
    fn test_anchor_with_overflowing_inner() {
        let outer = size(100, 100);
        let inner = size(160, 100);
        assert_eq!(Anchor::Center.place(outer, inner), Offset::new(-30, 0));
        assert_eq!(Anchor::TopLeft.place(outer, inner), Offset::ZERO);
        assert_eq!(Anchor::BottomRight.place(outer, inner), Offset::new(-60, 0));
    }

    #[test]
    fn test_noop_detection() {
        let source = size(400, 300);
        let layout =
            compute_layout(size(400, 300), source, FitMode::Fill, Anchor::Center).unwrap();
        assert!(layout.is_noop(source));

        let layout =
            compute_layout(size(400, 300), source, FitMode::ScaleDown, Anchor::Center).unwrap();
        assert!(layout.is_noop(source));

        let layout =
            compute_layout(size(200, 300), source, FitMode::Contain, Anchor::Center).unwrap();
        assert!(!layout.is_noop(source));
    }

    #[test]
    fn test_degenerate_dimensions_rejected() {
        assert!(matches!(
            compute_layout(size(100, 100), size(0, 50), FitMode::Contain, Anchor::Center),
            Err(ProcessError::InvalidGeometry(_))
        ));
        assert!(matches!(
            compute_layout(size(0, 100), size(50, 50), FitMode::Cover, Anchor::Center),
            Err(ProcessError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_fit_mode_parsing() {
        assert_eq!("cover".parse::<FitMode>().unwrap(), FitMode::Cover);
        assert_eq!("scale-down".parse::<FitMode>().unwrap(), FitMode::ScaleDown);
        assert!(matches!(
            "stretch".parse::<FitMode>(),
            Err(ProcessError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_anchor_parsing() {
        assert_eq!("bottom-right".parse::<Anchor>().unwrap(), Anchor::BottomRight);
        assert!(matches!(
            "middle".parse::<Anchor>(),
            Err(ProcessError::InvalidArgument(_))
        ));
    }
}

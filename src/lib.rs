//! Fit-based image resizing and tiled, rotated watermark compositing.
//!
//! The core is a set of pure, functional transforms: [`geometry`] computes
//! CSS `object-fit`-style layouts, [`compositor`] allocates canvases and
//! alpha-blends layers, [`watermark`] builds repeating rotated watermark
//! layers, and [`formats`] decides when a re-encode is needed. [`editor`]
//! wraps them in a fluent pipeline for the common
//! decode -> orient -> resize -> watermark -> save flow.
//!
//! ```no_run
//! use sukashi::{Editor, FitMode, WatermarkOptions};
//!
//! Editor::open("photo.jpg")?
//!     .thumb(800, 600, FitMode::Cover, "jpg")?
//!     .add_repeat_text_watermark("© somebody", &WatermarkOptions::default())?
//!     .save_as("photo_thumb.jpg", 90)?;
//! # Ok::<(), sukashi::ProcessError>(())
//! ```

pub mod codec;
pub mod compositor;
pub mod editor;
pub mod error;
pub mod formats;
pub mod geometry;
pub mod orient;
pub mod types;
pub mod watermark;

pub use editor::{Editor, ImageInfo};
pub use error::ProcessError;
pub use formats::{OutputFormat, needs_reencode};
pub use geometry::{Anchor, FitMode, Layout, compute_layout};
pub use types::{ImageSize, Offset};
pub use watermark::WatermarkOptions;

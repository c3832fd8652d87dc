//! Glyph rasterization boundary.
//!
//! Everything that touches a font file lives behind the [`FontDriver`] trait.
//! The rest of the pipeline only ever sees a [`RasterizedGlyph`] (coverage
//! bitmap plus placement metrics) or a typed [`GlyphUnavailable`] value:
//!
//! ```text
//! RenderRequest  →  [FontDriver]  →  Ok(RasterizedGlyph)
//!   (char, px size, axes)              Err(GlyphUnavailable)
//! ```
//!
//! Search loops treat `Err` as "does not fit" and move on. Only the final
//! render of a required character escalates it into a run-terminating error.

pub mod font_driver;
pub mod headless_font_driver;
pub mod swash_font_driver;

pub use font_driver::FontDriver;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Variable font design coordinates: `wdth` and `wght` axis values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisCoords {
    /// Width axis (`wdth`), in design units (100 = normal).
    pub width: f32,
    /// Weight axis (`wght`), in design units (400 = regular).
    pub weight: f32,
}

impl AxisCoords {
    pub const fn new(width: f32, weight: f32) -> Self {
        Self { width, weight }
    }
}

impl fmt::Display for AxisCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[wdth={}, wght={}]", self.width, self.weight)
    }
}

/// One rasterization request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub ch: char,
    /// Nominal pixel size (pixels per em).
    pub pixel_size: u32,
    /// `None` leaves the font at its default design coordinates.
    pub axes: Option<AxisCoords>,
}

impl RenderRequest {
    pub fn new(ch: char, pixel_size: u32, axes: Option<AxisCoords>) -> Self {
        Self {
            ch,
            pixel_size,
            axes,
        }
    }
}

/// Placement metrics for one rendered glyph, in whole pixels.
///
/// `top` is the distance from the baseline up to the first bitmap row, so a
/// glyph sitting on the baseline has `top == height`. `descender` is negative
/// for faces that extend below the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphMetrics {
    pub width: usize,
    pub height: usize,
    pub left: i32,
    pub top: i32,
    pub advance: i32,
    pub ascender: i32,
    pub descender: i32,
}

/// Coverage bitmap (one byte per pixel, row-major) plus its metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterizedGlyph {
    pub metrics: GlyphMetrics,
    pub coverage: Vec<u8>,
}

impl RasterizedGlyph {
    /// A glyph with no ink, e.g. a space. Still carries advance and face metrics.
    pub fn empty(advance: i32, ascender: i32, descender: i32) -> Self {
        Self {
            metrics: GlyphMetrics {
                advance,
                ascender,
                descender,
                ..GlyphMetrics::default()
            },
            coverage: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.width == 0 || self.metrics.height == 0
    }

    /// Whether the bitmap grown by `outline` pixels on every side fits `(w, h)`.
    pub fn fits(&self, canvas_width: usize, canvas_height: usize, outline: usize) -> bool {
        self.metrics.width + 2 * outline <= canvas_width
            && self.metrics.height + 2 * outline <= canvas_height
    }

    /// Bitmap area, used to rank axis candidates.
    pub fn area(&self) -> usize {
        self.metrics.width * self.metrics.height
    }
}

/// Why a render attempt produced no glyph. Recoverable inside searches.
#[derive(Debug, Clone, PartialEq)]
pub enum GlyphUnavailable {
    /// The font has no mapping for the character.
    MissingGlyph(char),
    /// Axis coordinates were requested from a font without variation axes.
    AxesUnsupported,
    /// A zero pixel size was requested.
    InvalidPixelSize(u32),
    /// The scaler could not produce a bitmap for a mapped glyph.
    RenderFailed { ch: char, pixel_size: u32 },
}

impl fmt::Display for GlyphUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlyphUnavailable::MissingGlyph(ch) => {
                write!(f, "font has no glyph for {:?} (U+{:04X})", ch, *ch as u32)
            }
            GlyphUnavailable::AxesUnsupported => {
                write!(f, "font has no variation axes")
            }
            GlyphUnavailable::InvalidPixelSize(size) => {
                write!(f, "invalid pixel size {}", size)
            }
            GlyphUnavailable::RenderFailed { ch, pixel_size } => {
                write!(f, "failed to render {:?} at {} px", ch, pixel_size)
            }
        }
    }
}

impl std::error::Error for GlyphUnavailable {}

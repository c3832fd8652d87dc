//! Headless mock font driver implementation.
//!
//! Renders solid blocks whose size follows the pixel size and axis
//! coordinates, so size and axis searches behave monotonically without a
//! font file on disk.

use super::font_driver::FontDriver;
use super::{GlyphMetrics, GlyphUnavailable, RasterizedGlyph, RenderRequest};

const DEFAULT_WIDTH_RATIO: f32 = 0.5;
const DEFAULT_HEIGHT_RATIO: f32 = 0.7;

#[derive(Debug, Clone)]
pub struct HeadlessFontDriver {
    width_ratio: f32,
    height_ratio: f32,
    variable: bool,
    missing: Vec<char>,
    fixed: Option<GlyphMetrics>,
    calls: usize,
}

impl HeadlessFontDriver {
    pub fn new() -> Self {
        Self {
            width_ratio: DEFAULT_WIDTH_RATIO,
            height_ratio: DEFAULT_HEIGHT_RATIO,
            variable: true,
            missing: Vec::new(),
            fixed: None,
            calls: 0,
        }
    }

    /// Every request returns the same solid glyph with these metrics.
    pub fn with_fixed_glyph(metrics: GlyphMetrics) -> Self {
        Self {
            fixed: Some(metrics),
            ..Self::new()
        }
    }

    pub fn without_axes(mut self) -> Self {
        self.variable = false;
        self
    }

    pub fn with_missing(mut self, chars: &str) -> Self {
        self.missing.extend(chars.chars());
        self
    }

    /// Number of `rasterize` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls
    }

    fn scaled(size: u32, ratio: f32) -> usize {
        (size as f32 * ratio).ceil() as usize
    }

    fn synthesize(&self, request: &RenderRequest) -> GlyphMetrics {
        let size = request.pixel_size;
        let (width_scale, weight_extra) = match request.axes {
            Some(axes) => (
                axes.width / 100.0,
                ((axes.weight - 400.0) / 200.0).max(0.0).round() as usize,
            ),
            None => (1.0, 0),
        };
        let side = Self::scaled(size, 0.1).max(1);
        let ascender = Self::scaled(size, 0.8) as i32;
        let descender = -(Self::scaled(size, 0.2) as i32);

        let (width, height, top) = match request.ch {
            '-' => {
                let width = Self::scaled(size, 0.3 * width_scale) + weight_extra;
                let height = side;
                (width, height, Self::scaled(size, 0.35) as i32)
            }
            ':' => {
                let width = side + weight_extra;
                let height = Self::scaled(size, 0.5);
                (width, height, height as i32)
            }
            ' ' => (0, 0, 0),
            _ => {
                let width =
                    Self::scaled(size, self.width_ratio * width_scale) + weight_extra;
                let height = Self::scaled(size, self.height_ratio);
                (width, height, height as i32)
            }
        };

        GlyphMetrics {
            width,
            height,
            left: side as i32,
            top,
            advance: (width + 2 * side) as i32,
            ascender,
            descender,
        }
    }
}

impl Default for HeadlessFontDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FontDriver for HeadlessFontDriver {
    fn has_variable_axes(&self) -> bool {
        self.variable
    }

    fn rasterize(&mut self, request: &RenderRequest) -> Result<RasterizedGlyph, GlyphUnavailable> {
        self.calls += 1;

        if request.pixel_size == 0 {
            return Err(GlyphUnavailable::InvalidPixelSize(0));
        }
        if self.missing.contains(&request.ch) {
            return Err(GlyphUnavailable::MissingGlyph(request.ch));
        }
        if request.axes.is_some() && !self.variable {
            return Err(GlyphUnavailable::AxesUnsupported);
        }

        let metrics = self.fixed.unwrap_or_else(|| self.synthesize(request));
        Ok(RasterizedGlyph {
            metrics,
            coverage: vec![255; metrics.width * metrics.height],
        })
    }
}

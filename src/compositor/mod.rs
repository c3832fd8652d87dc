// src/compositor/mod.rs

//! Places a rendered glyph onto a fixed-size working canvas.
//!
//! The canvas is always freshly allocated per glyph. Offsets come from a
//! [`CenteringPolicy`] and are clamped to `[0, canvas_dim - glyph_dim]`
//! (or 0 when the glyph is larger than the canvas); the copy itself is
//! clipped, so an oversized glyph loses its right/bottom edge instead of
//! writing out of bounds.
//!
//! The `Baseline` policy works on a padded canvas (`outline + 2` on every
//! side by default) so outlines are not cut at the canvas edge; callers crop
//! back to the target size after outline synthesis.

use crate::rasterizer::{GlyphMetrics, RasterizedGlyph};
use log::trace;
use serde::{Deserialize, Serialize};

/// Extra padding beyond the outline radius used by padded layouts.
pub const BASELINE_PAD_EXTRA: usize = 2;

/// Single-channel 8-bit intensity grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            0
        }
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = value;
        }
    }

    /// Copy a `src_width`-wide coverage buffer with its top-left at `(x, y)`,
    /// dropping whatever falls outside the canvas.
    pub fn blit(&mut self, src: &[u8], src_width: usize, src_height: usize, x: usize, y: usize) {
        if x >= self.width || y >= self.height || src_width == 0 {
            return;
        }
        let cols = src_width.min(self.width - x);
        let rows = src_height.min(self.height - y);
        for row in 0..rows {
            let src_row = &src[row * src_width..row * src_width + cols];
            let start = (y + row) * self.width + x;
            self.pixels[start..start + cols].copy_from_slice(src_row);
        }
    }

    /// The `width × height` window starting at `(x, y)`; areas past the
    /// source edge come back as 0.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> Canvas {
        let mut out = Canvas::new(width, height);
        for row in 0..height {
            for col in 0..width {
                out.set(col, row, self.get(x + col, y + row));
            }
        }
        out
    }
}

/// How a glyph is positioned inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CenteringPolicy {
    /// Advance-width horizontal centring and bitmap-on-baseline vertical
    /// centring; narrow punctuation falls back to raw bitmap centring.
    #[default]
    Optical,
    /// Shared baseline centred within `ascender - descender` on a padded canvas.
    Baseline,
    /// Centre the bitmap's bounding box in both axes.
    BoundingBox,
}

/// Characters too narrow for advance-based centring.
pub fn is_narrow_punctuation(ch: char) -> bool {
    matches!(ch, '-' | ':')
}

/// Clamp a signed offset into `[0, canvas_dim - glyph_dim]`.
pub fn clamp_offset(offset: i64, canvas_dim: usize, glyph_dim: usize) -> usize {
    let max = canvas_dim.saturating_sub(glyph_dim) as i64;
    offset.min(max).max(0) as usize
}

/// Centre `inner` inside `outer`, flooring like integer division of a
/// possibly negative difference.
fn centred(outer: i64, inner: i64) -> i64 {
    (outer - inner).div_euclid(2)
}

/// Top-left corner of the bitmap on the working canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: usize,
    pub y: usize,
}

/// Unclamped offsets for a policy. Split out so tests can compare policies.
pub fn raw_offsets(
    policy: CenteringPolicy,
    ch: char,
    metrics: &GlyphMetrics,
    canvas_width: usize,
    canvas_height: usize,
    padding: usize,
) -> (i64, i64) {
    let w = canvas_width as i64;
    let h = canvas_height as i64;
    let bw = metrics.width as i64;
    let bh = metrics.height as i64;
    let top = metrics.top as i64;

    match policy {
        CenteringPolicy::Optical if is_narrow_punctuation(ch) => (centred(w, bw), centred(h, bh)),
        CenteringPolicy::Optical => {
            let x = centred(w, metrics.advance as i64) + metrics.left as i64;
            let baseline = (h + bh).div_euclid(2);
            (x, baseline - top)
        }
        CenteringPolicy::Baseline => {
            let pad = padding as i64;
            let ascender = metrics.ascender as i64;
            let font_height = ascender - metrics.descender as i64;
            let baseline = pad + centred(h - 2 * pad, font_height) + ascender;
            (centred(w, bw), baseline - top)
        }
        CenteringPolicy::BoundingBox => (centred(w, bw), centred(h, bh)),
    }
}

/// Builds working canvases for one target size and policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compositor {
    policy: CenteringPolicy,
    target_width: usize,
    target_height: usize,
    padding: usize,
}

impl Compositor {
    pub fn new(policy: CenteringPolicy, target_width: usize, target_height: usize) -> Self {
        Self {
            policy,
            target_width,
            target_height,
            padding: 0,
        }
    }

    /// Padding used by `policy` when none is configured explicitly.
    pub fn default_padding(policy: CenteringPolicy, outline_radius: usize) -> usize {
        match policy {
            CenteringPolicy::Baseline => outline_radius + BASELINE_PAD_EXTRA,
            CenteringPolicy::Optical | CenteringPolicy::BoundingBox => 0,
        }
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    /// Dimensions of the canvas glyphs are composed onto.
    pub fn working_size(&self) -> (usize, usize) {
        (
            self.target_width + 2 * self.padding,
            self.target_height + 2 * self.padding,
        )
    }

    pub fn placement(&self, ch: char, metrics: &GlyphMetrics) -> Placement {
        let (w, h) = self.working_size();
        let (x, y) = raw_offsets(self.policy, ch, metrics, w, h, self.padding);
        Placement {
            x: clamp_offset(x, w, metrics.width),
            y: clamp_offset(y, h, metrics.height),
        }
    }

    pub fn compose(&self, ch: char, glyph: &RasterizedGlyph) -> Canvas {
        let (w, h) = self.working_size();
        let mut canvas = Canvas::new(w, h);
        if glyph.is_empty() {
            return canvas;
        }
        let placement = self.placement(ch, &glyph.metrics);
        trace!(
            "Compositor: '{}' {}x{} at ({}, {}) on {}x{} ({:?})",
            ch,
            glyph.metrics.width,
            glyph.metrics.height,
            placement.x,
            placement.y,
            w,
            h,
            self.policy
        );
        canvas.blit(
            &glyph.coverage,
            glyph.metrics.width,
            glyph.metrics.height,
            placement.x,
            placement.y,
        );
        canvas
    }

    /// Strip the padding from a working canvas.
    pub fn crop_to_target(&self, canvas: &Canvas) -> Canvas {
        if self.padding == 0 {
            return canvas.clone();
        }
        canvas.crop(
            self.padding,
            self.padding,
            self.target_width,
            self.target_height,
        )
    }
}

#[cfg(test)]
mod tests;

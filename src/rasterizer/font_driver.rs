//! Font loading and glyph rasterization primitives.
//!
//! This module defines the `FontDriver` trait, a thin wrapper around whatever
//! actually decodes and scales font outlines (swash in production, a
//! synthetic block renderer in tests).

use super::{GlyphUnavailable, RasterizedGlyph, RenderRequest};

/// Font driver trait.
///
/// Implementors own one loaded font face and provide:
/// - Variation axis discovery
/// - Glyph rasterization to an 8-bit coverage bitmap with metrics
///
/// Search and pipeline code is generic over this trait, so every probe the
/// searches make goes through `rasterize`.
pub trait FontDriver {
    /// Whether the face exposes `wdth`/`wght` variation axes.
    ///
    /// The axis search is skipped entirely when this returns false.
    fn has_variable_axes(&self) -> bool;

    /// Rasterize one character.
    ///
    /// # Arguments
    /// * `request` - Character, pixel size and optional axis coordinates
    ///
    /// # Returns
    /// Coverage bitmap (1 byte per pixel, row-major, 0 = no ink) with its
    /// metrics, or a typed reason the glyph is unavailable. A glyph that
    /// exists but has no ink (space) is `Ok` with a zero-sized bitmap.
    fn rasterize(&mut self, request: &RenderRequest) -> Result<RasterizedGlyph, GlyphUnavailable>;
}

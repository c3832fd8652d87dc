// src/pipeline/mod.rs

//! Per-character rendering: rasterize → compose → outline → quantize → pack.

use crate::compositor::Compositor;
use crate::glyph::PackedGlyph;
use crate::outline::{self, DilationMethod};
use crate::quantize::QuantizationProfile;
use crate::rasterizer::{FontDriver, GlyphUnavailable, RenderRequest};
use crate::search::FontPlan;
use anyhow::{bail, Result};
use log::*;

/// Everything needed to turn one character into a [`PackedGlyph`] once the
/// run's [`FontPlan`] is fixed.
#[derive(Debug, Clone)]
pub struct GlyphPipeline {
    plan: FontPlan,
    compositor: Compositor,
    outline_radius: usize,
    dilation: DilationMethod,
    profile: QuantizationProfile,
}

impl GlyphPipeline {
    pub fn new(
        plan: FontPlan,
        compositor: Compositor,
        outline_radius: usize,
        dilation: DilationMethod,
        profile: QuantizationProfile,
    ) -> Self {
        Self {
            plan,
            compositor,
            outline_radius,
            dilation,
            profile,
        }
    }

    pub fn profile(&self) -> &QuantizationProfile {
        &self.profile
    }

    pub fn render<D: FontDriver>(&self, driver: &mut D, ch: char) -> Result<PackedGlyph> {
        let request = RenderRequest::new(ch, self.plan.pixel_size, self.plan.axes);
        let glyph = match driver.rasterize(&request) {
            Ok(glyph) => glyph,
            Err(reason @ GlyphUnavailable::MissingGlyph(_))
            | Err(reason @ GlyphUnavailable::RenderFailed { .. }) => {
                bail!(
                    "no glyph available for {:?} at {} px: {}",
                    ch,
                    self.plan.pixel_size,
                    reason
                );
            }
            Err(reason) => {
                bail!("cannot render {:?}: {}", ch, reason);
            }
        };

        let working = self.compositor.compose(ch, &glyph);
        let outlined = outline::synthesize(
            &working,
            self.outline_radius,
            self.dilation,
            self.profile.outline_gray(),
        );
        let target = self.compositor.crop_to_target(&outlined);
        let bytes = self.profile.quantize_and_pack(target.pixels());

        debug!(
            "GlyphPipeline: '{}' → {} bytes ({}x{} bitmap)",
            ch,
            bytes.len(),
            glyph.metrics.width,
            glyph.metrics.height
        );
        Ok(PackedGlyph::new(ch, target.width(), target.height(), bytes))
    }

    /// Render every character, stopping at the first one the font cannot
    /// provide.
    pub fn render_all<D: FontDriver>(&self, driver: &mut D, chars: &str) -> Result<Vec<PackedGlyph>> {
        chars.chars().map(|ch| self.render(driver, ch)).collect()
    }
}

#[cfg(test)]
mod tests;

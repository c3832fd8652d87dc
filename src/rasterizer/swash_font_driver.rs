//! swash-backed font driver.
//!
//! Loads one TrueType/OpenType face from disk and scales glyph outlines to
//! 8-bit alpha coverage, applying `wdth`/`wght` variation settings when asked.

use super::font_driver::FontDriver;
use super::{GlyphMetrics, GlyphUnavailable, RasterizedGlyph, RenderRequest};
use anyhow::{anyhow, bail, Context, Result};
use log::*;
use std::path::Path;
use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::Format;
use swash::{FontRef, NormalizedCoord, Setting, Tag};

const WIDTH_AXIS: Tag = u32::from_be_bytes(*b"wdth");
const WEIGHT_AXIS: Tag = u32::from_be_bytes(*b"wght");

/// Accepted font container extensions.
const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

pub struct SwashFontDriver {
    data: Vec<u8>,
    index: usize,
    context: ScaleContext,
    variable: bool,
}

impl SwashFontDriver {
    /// Load the first face of a `.ttf`/`.otf` file.
    ///
    /// Fails before any rendering happens if the extension is wrong or the
    /// bytes do not parse as a font.
    pub fn load(path: &Path) -> Result<Self> {
        check_font_extension(path)?;

        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read font file '{}'", path.display()))?;
        let index = 0;
        let font = FontRef::from_index(&data, index)
            .ok_or_else(|| anyhow!("'{}' is not a usable font file", path.display()))?;

        let variable = font
            .variations()
            .any(|axis| axis.tag() == WIDTH_AXIS || axis.tag() == WEIGHT_AXIS);
        info!(
            "SwashFontDriver: Loaded '{}' ({} bytes, variable axes: {})",
            path.display(),
            data.len(),
            variable
        );

        Ok(Self {
            data,
            index,
            context: ScaleContext::new(),
            variable,
        })
    }

    fn settings(request: &RenderRequest) -> Vec<Setting<f32>> {
        match request.axes {
            Some(axes) => vec![
                Setting {
                    tag: WIDTH_AXIS,
                    value: axes.width,
                },
                Setting {
                    tag: WEIGHT_AXIS,
                    value: axes.weight,
                },
            ],
            None => Vec::new(),
        }
    }
}

impl FontDriver for SwashFontDriver {
    fn has_variable_axes(&self) -> bool {
        self.variable
    }

    fn rasterize(&mut self, request: &RenderRequest) -> Result<RasterizedGlyph, GlyphUnavailable> {
        if request.pixel_size == 0 {
            return Err(GlyphUnavailable::InvalidPixelSize(0));
        }
        if request.axes.is_some() && !self.variable {
            return Err(GlyphUnavailable::AxesUnsupported);
        }
        let failed = GlyphUnavailable::RenderFailed {
            ch: request.ch,
            pixel_size: request.pixel_size,
        };

        let font = FontRef::from_index(&self.data, self.index).ok_or_else(|| failed.clone())?;
        let glyph_id = font.charmap().map(request.ch);
        if glyph_id == 0 {
            return Err(GlyphUnavailable::MissingGlyph(request.ch));
        }

        let size = request.pixel_size as f32;
        let settings = Self::settings(request);
        let coords: Vec<NormalizedCoord> = font
            .variations()
            .normalized_coords(settings.iter().copied())
            .collect();

        let face = font.metrics(&coords).scale(size);
        let ascender = face.ascent.round() as i32;
        let descender = -(face.descent.round() as i32);
        let advance = font
            .glyph_metrics(&coords)
            .scale(size)
            .advance_width(glyph_id)
            .round() as i32;

        let mut scaler = self
            .context
            .builder(font)
            .size(size)
            .hint(false)
            .variations(settings.iter().copied())
            .build();

        let mut render = Render::new(&[Source::Outline]);
        render.format(Format::Alpha);

        let Some(image) = render.render(&mut scaler, glyph_id) else {
            trace!(
                "SwashFontDriver: '{}' at {} px has no outline, treating as blank",
                request.ch,
                request.pixel_size
            );
            return Ok(RasterizedGlyph::empty(advance, ascender, descender));
        };

        let width = image.placement.width as usize;
        let height = image.placement.height as usize;
        if image.data.len() != width * height {
            debug!(
                "SwashFontDriver: '{}' at {} px returned {} bytes for a {}x{} mask",
                request.ch,
                request.pixel_size,
                image.data.len(),
                width,
                height
            );
            return Err(failed);
        }

        Ok(RasterizedGlyph {
            metrics: GlyphMetrics {
                width,
                height,
                left: image.placement.left,
                top: image.placement.top,
                advance,
                ascender,
                descender,
            },
            coverage: image.data,
        })
    }
}

/// Reject anything that is not a `.ttf`/`.otf` path.
pub fn check_font_extension(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension {
        Some(ext) if FONT_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => bail!(
            "Unsupported font file '{}': only .ttf and .otf are accepted",
            path.display()
        ),
    }
}

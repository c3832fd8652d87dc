// src/emit/header.rs

use crate::glyph::PackedGlyph;
use crate::search::FontPlan;
use anyhow::{Context, Result};
use log::info;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Run parameters recorded in the generated header's comments.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub width: usize,
    pub height: usize,
    pub plan: FontPlan,
    pub outline_radius: usize,
    /// Level palette, e.g. `0xF, 0x8, 0x7, 0x0`.
    pub palette: String,
}

impl HeaderInfo {
    fn dims(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    fn guard(&self) -> String {
        format!("FONT_I4_BLACK_WHITE_GRAY_{}_H", self.dims())
    }

    fn array_name(&self, glyph: &PackedGlyph) -> String {
        format!("char_{}_{}_i4", glyph.symbol_name(), self.dims())
    }
}

pub fn header_file_name(width: usize, height: usize) -> String {
    format!("font_chars_i4_{}x{}.h", width, height)
}

/// Render the full header text.
pub fn render_header(info: &HeaderInfo, glyphs: &[PackedGlyph]) -> String {
    let mut out = String::new();
    // fmt::Write for String never fails.
    let _ = write_header_text(&mut out, info, glyphs);
    out
}

fn write_header_text(
    out: &mut impl fmt::Write,
    info: &HeaderInfo,
    glyphs: &[PackedGlyph],
) -> fmt::Result {
    let guard = info.guard();
    let dims = info.dims();
    let per_line = (info.width / 2).max(1);
    let axes = match info.plan.axes {
        Some(axes) => axes.to_string(),
        None => "default".to_string(),
    };

    writeln!(out, "#ifndef {}", guard)?;
    writeln!(out, "#define {}", guard)?;
    writeln!(out)?;
    writeln!(out, "#include <stdint.h>")?;
    writeln!(out)?;
    writeln!(
        out,
        "// I4 font, levels {}. Size {}, 2 pixels per byte, high nibble first.",
        info.palette, dims
    )?;
    writeln!(
        out,
        "// font_pixel_size={}, outline_width={}, var_coords={}",
        info.plan.pixel_size, info.outline_radius, axes
    )?;
    writeln!(out)?;

    for glyph in glyphs {
        writeln!(
            out,
            "static const uint8_t {}[{}] = {{",
            info.array_name(glyph),
            glyph.bytes.len()
        )?;
        for chunk in glyph.bytes.chunks(per_line) {
            let row: Vec<String> = chunk.iter().map(|byte| format!("0x{:02X}", byte)).collect();
            writeln!(out, "    {},", row.join(", "))?;
        }
        writeln!(out, "}};")?;
        writeln!(out)?;
    }

    writeln!(out, "static const bitmap_i4_t i4_{}[{}] = {{", dims, glyphs.len())?;
    for glyph in glyphs {
        writeln!(
            out,
            "    {{ .width = {}, .height = {}, .pdata = {} }},",
            glyph.width,
            glyph.height,
            info.array_name(glyph)
        )?;
    }
    writeln!(out, "}};")?;
    writeln!(out)?;
    writeln!(out, "#endif // {}", guard)
}

/// Write the header into `dir` and return its path.
pub fn write_header(dir: &Path, info: &HeaderInfo, glyphs: &[PackedGlyph]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(header_file_name(info.width, info.height));
    fs::write(&path, render_header(info, glyphs))
        .with_context(|| format!("Failed to write header {}", path.display()))?;
    info!("HeaderEmitter: wrote {} glyphs to {}", glyphs.len(), path.display());
    Ok(path)
}

// src/cli.rs

//! Command line interface. Flags override values from `--config`.

use crate::compositor::CenteringPolicy;
use crate::config::Config;
use crate::outline::DilationMethod;
use crate::quantize::ProfileKind;
use crate::search::SizeStrategy;
use clap::Parser;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "osd-fontgen",
    author,
    version,
    about = "Render font glyphs into outlined 4-bit OSD bitmaps"
)]
pub struct Args {
    /// Glyph bitmap width in pixels
    #[arg(long)]
    pub width: Option<usize>,

    /// Glyph bitmap height in pixels
    #[arg(long)]
    pub height: Option<usize>,

    /// TTF or OTF font file (variable fonts supported)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Characters to export
    #[arg(long)]
    pub chars: Option<String>,

    /// Outline thickness in pixels
    #[arg(long, alias = "outline_width")]
    pub outline_width: Option<usize>,

    /// 1 searches the largest fitting pixel size, 0 uses the canvas height
    #[arg(long, alias = "auto_font_size", value_parser = clap::value_parser!(u8).range(0..=1))]
    pub auto_font_size: Option<u8>,

    /// Render previews for each of these pixel sizes instead of a header
    #[arg(long, num_args = 1.., value_parser = clap::value_parser!(u32).range(1..))]
    pub sizes: Vec<u32>,

    /// Directory for preview PNGs
    #[arg(long, alias = "preview_dir")]
    pub preview_dir: Option<PathBuf>,

    /// Directory for the generated header
    #[arg(long, alias = "output_dir")]
    pub output_dir: Option<PathBuf>,

    /// JSON config file; flags take precedence over its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// optical, baseline or bounding-box
    #[arg(long, value_parser = parse_snake_case::<CenteringPolicy>)]
    pub centering: Option<CenteringPolicy>,

    /// osd or white-gray
    #[arg(long, value_parser = parse_snake_case::<ProfileKind>)]
    pub profile: Option<ProfileKind>,

    /// square, iterated-kernel or disk
    #[arg(long, value_parser = parse_snake_case::<DilationMethod>)]
    pub dilation: Option<DilationMethod>,

    /// Skip the preview PNG
    #[arg(long)]
    pub no_preview: bool,
}

/// Parse a kebab- or snake-case name through the type's serde representation.
fn parse_snake_case<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    let name = value.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(name))
        .map_err(|e| format!("unrecognised value {:?}: {}", value, e))
}

impl Args {
    /// Batch mode: one preview per listed size, no header.
    pub fn is_batch(&self) -> bool {
        !self.sizes.is_empty()
    }

    /// Apply every flag that was given on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(width) = self.width {
            config.canvas.width = width;
        }
        if let Some(height) = self.height {
            config.canvas.height = height;
        }
        if let Some(font) = &self.font {
            config.font.path = Some(font.clone());
        }
        if let Some(chars) = &self.chars {
            config.export.charset = chars.clone();
        }
        if let Some(radius) = self.outline_width {
            config.outline.radius = radius;
        }
        match self.auto_font_size {
            Some(0) => config.search.size_strategy = SizeStrategy::CanvasHeight,
            Some(_) if config.search.size_strategy == SizeStrategy::CanvasHeight => {
                config.search.size_strategy = SizeStrategy::GlyphFit;
            }
            _ => {}
        }
        if let Some(dir) = &self.preview_dir {
            config.export.preview_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.export.output_dir = dir.clone();
        }
        if let Some(centering) = self.centering {
            config.placement.centering = centering;
        }
        if let Some(profile) = self.profile {
            config.quantize.profile = profile;
        }
        if let Some(method) = self.dilation {
            config.outline.method = method;
        }
        if self.no_preview {
            config.export.emit_preview = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("osd-fontgen").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test_log::test]
    fn test_flags_override_config() {
        let args = parse(&[
            "--width", "8", "--height", "16", "--font", "Roboto.ttf", "--chars", "0:",
            "--outline_width", "2", "--centering", "bounding-box", "--profile", "white_gray",
            "--dilation", "disk", "--no-preview",
        ]);
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!((config.canvas.width, config.canvas.height), (8, 16));
        assert_eq!(config.font.path, Some(PathBuf::from("Roboto.ttf")));
        assert_eq!(config.export.charset, "0:");
        assert_eq!(config.outline.radius, 2);
        assert_eq!(config.placement.centering, CenteringPolicy::BoundingBox);
        assert_eq!(config.quantize.profile, ProfileKind::WhiteGray);
        assert_eq!(config.outline.method, DilationMethod::Disk);
        assert!(!config.export.emit_preview);
        assert!(!args.is_batch());
    }

    #[test_log::test]
    fn test_auto_font_size_zero_uses_canvas_height() {
        let mut config = Config::default();
        parse(&["--auto-font-size", "0"]).apply(&mut config);
        assert_eq!(config.search.size_strategy, SizeStrategy::CanvasHeight);

        parse(&["--auto-font-size", "1"]).apply(&mut config);
        assert_eq!(config.search.size_strategy, SizeStrategy::GlyphFit);

        assert!(Args::try_parse_from(["osd-fontgen", "--auto-font-size", "2"]).is_err());
    }

    #[test_log::test]
    fn test_sizes_enable_batch_mode() {
        let args = parse(&["--sizes", "14", "16", "18"]);
        assert!(args.is_batch());
        assert_eq!(args.sizes, vec![14, 16, 18]);
    }

    #[test_log::test]
    fn test_zero_size_rejected_before_any_work() {
        assert!(Args::try_parse_from(["osd-fontgen", "--sizes", "14", "0"]).is_err());
        assert!(Args::try_parse_from(["osd-fontgen", "--sizes", "0"]).is_err());
    }

    #[test_log::test]
    fn test_unknown_enum_value_rejected() {
        assert!(Args::try_parse_from(["osd-fontgen", "--centering", "diagonal"]).is_err());
    }

    #[test_log::test]
    fn test_absent_flags_keep_config() {
        let mut config = Config::default();
        config.export.charset = "42".to_string();
        config.search.size_strategy = SizeStrategy::LineHeight;
        parse(&[]).apply(&mut config);
        assert_eq!(config.export.charset, "42");
        assert_eq!(config.search.size_strategy, SizeStrategy::LineHeight);
        assert!(config.export.emit_preview);
    }
}

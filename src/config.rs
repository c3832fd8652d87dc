// src/config.rs

//! Defines the configuration structures for the glyph generator.
//!
//! Every struct deserializes from JSON with `#[serde(default)]`, so a config
//! file only needs the fields it wants to change. Command line flags are
//! applied on top of the loaded values (see `cli`).

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compositor::{CenteringPolicy, Compositor};
use crate::outline::DilationMethod;
use crate::quantize::{Band, ProfileKind, QuantizationProfile};
pub use crate::search::SearchConfig;

/// Characters exported when none are configured.
pub const DEFAULT_CHARSET: &str = "0123456789- :";

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for one export run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Font file and optional fixed pixel size.
    pub font: FontConfig,
    /// Output canvas dimensions.
    pub canvas: CanvasConfig,
    /// Outline synthesis settings.
    pub outline: OutlineConfig,
    /// Glyph placement on the canvas.
    pub placement: PlacementConfig,
    /// Intensity to 4-bit level mapping.
    pub quantize: QuantizeConfig,
    /// Pixel size and axis search.
    pub search: SearchConfig,
    /// Character set and output locations.
    pub export: ExportConfig,
}

/// Font source.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FontConfig {
    /// Path to a `.ttf` or `.otf` file.
    pub path: Option<PathBuf>,
    /// Fixed pixel size; `None` runs the size search.
    pub pixel_size: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            width: 12,
            height: 24,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Outline thickness in pixels. 0 disables the outline.
    pub radius: usize,
    pub method: DilationMethod,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        OutlineConfig {
            radius: 1,
            method: DilationMethod::Square,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlacementConfig {
    pub centering: CenteringPolicy,
    /// Working canvas padding; `None` uses the policy's default.
    pub padding: Option<usize>,
}

/// Quantization profile selection.
///
/// `custom_bands` replaces the named profile entirely. `outline_gray`
/// overrides the intensity written into outline pixels for either.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QuantizeConfig {
    pub profile: ProfileKind,
    pub custom_bands: Option<Vec<Band>>,
    pub outline_gray: Option<u8>,
}

impl QuantizeConfig {
    pub fn build_profile(&self) -> Result<QuantizationProfile> {
        let named = QuantizationProfile::from_kind(self.profile);
        match (&self.custom_bands, self.outline_gray) {
            (Some(bands), gray) => QuantizationProfile::custom(
                bands.clone(),
                gray.unwrap_or(named.outline_gray()),
            )
            .context("Invalid custom quantization bands"),
            (None, Some(gray)) => QuantizationProfile::custom(named.bands().to_vec(), gray)
                .context("Invalid outline gray for quantization profile"),
            (None, None) => Ok(named),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Characters to export, in output order.
    pub charset: String,
    /// Directory receiving the C header.
    pub output_dir: PathBuf,
    /// Directory receiving preview sheets.
    pub preview_dir: PathBuf,
    pub emit_header: bool,
    pub emit_preview: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            charset: DEFAULT_CHARSET.to_string(),
            output_dir: PathBuf::from("."),
            preview_dir: PathBuf::from("previews"),
            emit_header: true,
            emit_preview: true,
        }
    }
}

impl Config {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse config JSON")
    }

    /// Reject configurations no run could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            bail!(
                "canvas must be at least 1x1, got {}x{}",
                self.canvas.width,
                self.canvas.height
            );
        }
        if self.export.charset.is_empty() {
            bail!("character set is empty");
        }
        let mut seen = HashSet::new();
        if let Some(ch) = self.export.charset.chars().find(|&ch| !seen.insert(ch)) {
            bail!(
                "character {:?} appears more than once in the character set",
                ch
            );
        }
        if self.font.pixel_size == Some(0) {
            bail!("pixel size must be positive");
        }

        let search = &self.search;
        if search.min_size == 0 || search.min_size > search.max_size {
            bail!(
                "invalid pixel size range [{}, {}]",
                search.min_size,
                search.max_size
            );
        }
        for (name, range) in [("wdth", &search.width_axis), ("wght", &search.weight_axis)] {
            if range.step <= 0.0 {
                bail!("{} axis step must be positive, got {}", name, range.step);
            }
            if range.min > range.max {
                bail!("{} axis range [{}, {}] is empty", name, range.min, range.max);
            }
        }

        self.quantize.build_profile()?;
        Ok(())
    }

    /// The compositor for this canvas and placement.
    pub fn compositor(&self) -> Compositor {
        let policy = self.placement.centering;
        let padding = self
            .placement
            .padding
            .unwrap_or_else(|| Compositor::default_padding(policy, self.outline.radius));
        Compositor::new(policy, self.canvas.width, self.canvas.height).with_padding(padding)
    }
}

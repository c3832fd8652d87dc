// src/quantize.rs

//! Grayscale → 4-bit level quantization and nibble packing.
//!
//! A profile is an ordered list of threshold bands. The highest band whose
//! minimum the intensity reaches wins; anything below every band becomes
//! `0x0` (transparent). Packed output is row-major, two pixels per byte,
//! most significant nibble first, with a single `0x0` pad nibble when the
//! pixel count is odd. Rows do not start on byte boundaries.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Multiplier that spreads a 4-bit level back over `0..=255`.
pub const NIBBLE_SCALE: u8 = 17;

pub const LEVEL_TRANSPARENT: u8 = 0x0;
pub const LEVEL_FOREGROUND: u8 = 0xF;

/// Distinct levels a profile may emit, counting `0x0` and `0xF`.
pub const MIN_LEVELS: usize = 3;
pub const MAX_LEVELS: usize = 4;

/// One threshold band: intensities `>= min` map to `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub min: u8,
    pub level: u8,
}

impl Band {
    pub const fn new(min: u8, level: u8) -> Self {
        Self { min, level }
    }
}

/// Built-in palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// Three levels: white `0xF`, gray `0x8`, transparent `0x0`.
    WhiteGray,
    /// Four levels: white `0xF`, gray `0x8`, dim gray `0x7`, transparent `0x0`.
    #[default]
    Osd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationProfile {
    /// Sorted by descending `min`.
    bands: Vec<Band>,
    /// Intensity written into outline-only pixels before quantization.
    outline_gray: u8,
}

impl QuantizationProfile {
    /// `>= 200 → 0xF`, `>= 80 → 0x8`; outline gray `0x88`.
    pub fn white_gray() -> Self {
        Self {
            bands: vec![Band::new(200, 0xF), Band::new(80, 0x8)],
            outline_gray: 136,
        }
    }

    /// `>= 220 → 0xF`, `>= 128 → 0x8`, `>= 80 → 0x7`; outline gray 180.
    pub fn osd() -> Self {
        Self {
            bands: vec![Band::new(220, 0xF), Band::new(128, 0x8), Band::new(80, 0x7)],
            outline_gray: 180,
        }
    }

    pub fn from_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::WhiteGray => Self::white_gray(),
            ProfileKind::Osd => Self::osd(),
        }
    }

    /// Build a profile from user bands.
    ///
    /// Every level must fit in a nibble, one band must produce `0xF`, band
    /// minimums must be non-zero and distinct, and each level scaled by 17
    /// must land back in its own band so unpacked previews requantize
    /// to the same nibble. The profile must emit 3 or 4 levels, and
    /// `outline_gray` must quantize to a level strictly between `0x0` and
    /// `0xF`.
    pub fn custom(mut bands: Vec<Band>, outline_gray: u8) -> Result<Self> {
        if bands.is_empty() {
            bail!("quantization profile needs at least one band");
        }
        bands.sort_by(|a, b| b.min.cmp(&a.min));

        for pair in bands.windows(2) {
            if pair[0].min == pair[1].min {
                bail!("duplicate band minimum {}", pair[0].min);
            }
        }
        for band in &bands {
            if band.level > LEVEL_FOREGROUND {
                bail!("band level 0x{:X} does not fit in 4 bits", band.level);
            }
            if band.min == 0 {
                bail!("band minimum must be above 0 so background stays 0x0");
            }
        }
        if !bands.iter().any(|band| band.level == LEVEL_FOREGROUND) {
            bail!("quantization profile has no 0xF (foreground) band");
        }

        let profile = Self {
            bands,
            outline_gray,
        };
        for band in &profile.bands {
            let reconstructed = band.level * NIBBLE_SCALE;
            if profile.quantize(reconstructed) != band.level {
                bail!(
                    "level 0x{:X} reconstructs to {} which quantizes to 0x{:X}",
                    band.level,
                    reconstructed,
                    profile.quantize(reconstructed)
                );
            }
        }

        let levels = profile.levels();
        if !(MIN_LEVELS..=MAX_LEVELS).contains(&levels.len()) {
            bail!(
                "quantization profile emits {} levels ({}); expected {} or {} including 0x0 and 0xF",
                levels.len(),
                profile.describe(),
                MIN_LEVELS,
                MAX_LEVELS
            );
        }
        let outline_level = profile.quantize(outline_gray);
        if outline_level == LEVEL_TRANSPARENT || outline_level == LEVEL_FOREGROUND {
            bail!(
                "outline gray {} quantizes to 0x{:X}; it must land on a middle level",
                outline_gray,
                outline_level
            );
        }
        Ok(profile)
    }

    pub fn outline_gray(&self) -> u8 {
        self.outline_gray
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Every level this profile can emit, highest first, always ending in `0x0`.
    pub fn levels(&self) -> Vec<u8> {
        let mut levels = Vec::with_capacity(self.bands.len() + 1);
        let emitted = self.bands.iter().map(|band| band.level);
        for level in emitted.chain(std::iter::once(LEVEL_TRANSPARENT)) {
            if !levels.contains(&level) {
                levels.push(level);
            }
        }
        levels
    }

    /// Map one intensity to its level.
    pub fn quantize(&self, value: u8) -> u8 {
        self.bands
            .iter()
            .find(|band| value >= band.min)
            .map_or(LEVEL_TRANSPARENT, |band| band.level)
    }

    /// Quantize then pack a row-major intensity grid.
    pub fn quantize_and_pack(&self, pixels: &[u8]) -> Vec<u8> {
        let levels: Vec<u8> = pixels.iter().map(|&value| self.quantize(value)).collect();
        pack_nibbles(&levels)
    }

    /// Palette summary for generated file comments, e.g. `0xF, 0x8, 0x7, 0x0`.
    pub fn describe(&self) -> String {
        self.levels()
            .iter()
            .map(|level| format!("0x{:X}", level))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for QuantizationProfile {
    fn default() -> Self {
        Self::from_kind(ProfileKind::default())
    }
}

/// Pack 4-bit levels two per byte, high nibble first, padding an odd tail with `0x0`.
pub fn pack_nibbles(levels: &[u8]) -> Vec<u8> {
    levels
        .chunks(2)
        .map(|pair| {
            let high = pair[0] & 0x0F;
            let low = pair.get(1).copied().unwrap_or(LEVEL_TRANSPARENT) & 0x0F;
            (high << 4) | low
        })
        .collect()
}

/// Inverse of [`pack_nibbles`]: the first `count` levels.
pub fn unpack_nibbles(bytes: &[u8], count: usize) -> Vec<u8> {
    bytes
        .iter()
        .flat_map(|&byte| [byte >> 4, byte & 0x0F])
        .take(count)
        .collect()
}

/// Packed length for a `width × height` grid.
pub fn packed_len(width: usize, height: usize) -> usize {
    (width * height).div_ceil(2)
}

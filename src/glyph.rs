// src/glyph.rs

//! Defines `PackedGlyph`, the unit of output per character.
//!
//! A `PackedGlyph` holds the quantized, nibble-packed pixels of one
//! character at a fixed canvas size. Header and preview emitters only ever
//! see this type.

use crate::quantize::{packed_len, unpack_nibbles, NIBBLE_SCALE};
use std::fmt;

/// Quantized 4-bit pixels for one character, two per byte, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedGlyph {
    /// The character this bitmap was rendered from.
    pub ch: char,
    pub width: usize,
    pub height: usize,
    /// `ceil(width * height / 2)` bytes, high nibble first.
    pub bytes: Vec<u8>,
}

impl PackedGlyph {
    pub fn new(ch: char, width: usize, height: usize, bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len(), packed_len(width, height));
        Self {
            ch,
            width,
            height,
            bytes,
        }
    }

    /// One level per pixel, padding dropped.
    pub fn levels(&self) -> Vec<u8> {
        unpack_nibbles(&self.bytes, self.width * self.height)
    }

    /// Approximate intensities (`level * 17`) for previews.
    pub fn intensities(&self) -> Vec<u8> {
        self.levels()
            .into_iter()
            .map(|level| level * NIBBLE_SCALE)
            .collect()
    }

    pub fn level_at(&self, x: usize, y: usize) -> u8 {
        let index = y * self.width + x;
        let byte = self.bytes[index / 2];
        if index % 2 == 0 {
            byte >> 4
        } else {
            byte & 0x0F
        }
    }

    /// Identifier-safe name: the character itself when alphanumeric,
    /// otherwise `uXXXX`.
    pub fn symbol_name(&self) -> String {
        safe_char_name(self.ch)
    }
}

pub fn safe_char_name(ch: char) -> String {
    if ch.is_ascii_alphanumeric() {
        ch.to_string()
    } else {
        format!("u{:04X}", ch as u32)
    }
}

// Prints the glyph as a block of hex levels, one row per line.
impl fmt::Display for PackedGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{:X}", self.level_at(x, y))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantize::pack_nibbles;

    #[test_log::test]
    fn test_level_at_follows_flattened_order() {
        // 3 wide: row 1 starts in the low nibble of byte 1.
        let levels = [0xF, 0x0, 0x7, 0x8, 0x0, 0xF];
        let glyph = PackedGlyph::new('0', 3, 2, pack_nibbles(&levels));
        assert_eq!(glyph.level_at(0, 0), 0xF);
        assert_eq!(glyph.level_at(2, 0), 0x7);
        assert_eq!(glyph.level_at(0, 1), 0x8);
        assert_eq!(glyph.level_at(2, 1), 0xF);
        assert_eq!(glyph.levels(), levels.to_vec());
    }

    #[test_log::test]
    fn test_intensities_scale_by_seventeen() {
        let glyph = PackedGlyph::new('-', 3, 1, pack_nibbles(&[0xF, 0x8, 0x0]));
        assert_eq!(glyph.intensities(), vec![255, 136, 0]);
    }

    #[test_log::test]
    fn test_symbol_names() {
        assert_eq!(safe_char_name('7'), "7");
        assert_eq!(safe_char_name('A'), "A");
        assert_eq!(safe_char_name(':'), "u003A");
        assert_eq!(safe_char_name(' '), "u0020");
        assert_eq!(safe_char_name('-'), "u002D");
    }

    #[test_log::test]
    fn test_display_renders_rows() {
        let glyph = PackedGlyph::new('1', 2, 2, pack_nibbles(&[0x0, 0xF, 0x8, 0x0]));
        assert_eq!(glyph.to_string(), "0F\n80\n");
    }
}

// src/pipeline/tests.rs

use super::*;
use crate::compositor::CenteringPolicy;
use crate::quantize::packed_len;
use crate::rasterizer::headless_font_driver::HeadlessFontDriver;
use crate::rasterizer::GlyphMetrics;

fn pipeline(policy: CenteringPolicy, width: usize, height: usize, radius: usize, size: u32) -> GlyphPipeline {
    let compositor = Compositor::new(policy, width, height)
        .with_padding(Compositor::default_padding(policy, radius));
    GlyphPipeline::new(
        FontPlan {
            pixel_size: size,
            axes: None,
        },
        compositor,
        radius,
        DilationMethod::Square,
        QuantizationProfile::osd(),
    )
}

#[test_log::test]
fn test_outlined_digit_end_to_end() {
    let mut driver = HeadlessFontDriver::with_fixed_glyph(GlyphMetrics {
        width: 4,
        height: 10,
        left: 1,
        top: 8,
        advance: 6,
        ..GlyphMetrics::default()
    });
    let glyph = pipeline(CenteringPolicy::Optical, 8, 16, 1, 12)
        .render(&mut driver, '0')
        .expect("render");

    assert_eq!(glyph.bytes.len(), 64);
    assert_eq!((glyph.width, glyph.height), (8, 16));
    // Body at x 2..6, y 5..15; one-pixel ring around it.
    assert_eq!(glyph.level_at(2, 5), 0xF);
    assert_eq!(glyph.level_at(5, 14), 0xF);
    assert_eq!(glyph.level_at(1, 4), 0x8);
    assert_eq!(glyph.level_at(6, 15), 0x8);
    assert_eq!(glyph.level_at(0, 0), 0x0);
    assert_eq!(glyph.level_at(7, 8), 0x0);

    let levels = glyph.levels();
    assert_eq!(levels.iter().filter(|&&l| l == 0xF).count(), 40);
    assert_eq!(levels.iter().filter(|&&l| l == 0x8).count(), 6 * 12 - 40);
}

#[test_log::test]
fn test_odd_canvas_pads_last_nibble() {
    let mut driver = HeadlessFontDriver::with_fixed_glyph(GlyphMetrics {
        width: 1,
        height: 1,
        top: 1,
        advance: 1,
        ..GlyphMetrics::default()
    });
    let glyph = pipeline(CenteringPolicy::BoundingBox, 3, 3, 0, 5)
        .render(&mut driver, '1')
        .expect("render");
    assert_eq!(glyph.bytes.len(), 5);
    assert_eq!(glyph.bytes[4] & 0x0F, 0x0);
    assert_eq!(glyph.level_at(1, 1), 0xF);
}

#[test_log::test]
fn test_space_yields_blank_glyph() {
    let mut driver = HeadlessFontDriver::new();
    let glyph = pipeline(CenteringPolicy::Optical, 12, 24, 1, 20)
        .render(&mut driver, ' ')
        .expect("space renders");
    assert_eq!(glyph.bytes.len(), packed_len(12, 24));
    assert!(glyph.bytes.iter().all(|&b| b == 0));
}

#[test_log::test]
fn test_missing_glyph_is_fatal() {
    let mut driver = HeadlessFontDriver::new().with_missing(":");
    let err = pipeline(CenteringPolicy::Optical, 12, 24, 1, 20)
        .render_all(&mut driver, "01:")
        .expect_err("missing colon must fail the run");
    let message = format!("{:#}", err);
    assert!(message.contains("no glyph available"), "{}", message);
    assert!(message.contains("':'"), "{}", message);
}

#[test_log::test]
fn test_baseline_policy_crops_back_to_target() {
    let mut driver = HeadlessFontDriver::new();
    let glyphs = pipeline(CenteringPolicy::Baseline, 12, 24, 1, 18)
        .render_all(&mut driver, "0-:")
        .expect("render");
    assert_eq!(glyphs.len(), 3);
    for glyph in &glyphs {
        assert_eq!((glyph.width, glyph.height), (12, 24));
        assert_eq!(glyph.bytes.len(), packed_len(12, 24));
        assert!(glyph.levels().contains(&0xF), "{:?} lost its body", glyph.ch);
    }
}

#[test_log::test]
fn test_hyphen_is_centred() {
    let mut driver = HeadlessFontDriver::new();
    let glyph = pipeline(CenteringPolicy::Optical, 10, 20, 0, 16)
        .render(&mut driver, '-')
        .expect("render");
    // 16 px: bitmap 5x2, centred at x 2..7, y 9..11.
    assert_eq!(glyph.level_at(2, 9), 0xF);
    assert_eq!(glyph.level_at(6, 10), 0xF);
    assert_eq!(glyph.level_at(1, 9), 0x0);
    assert_eq!(glyph.level_at(7, 9), 0x0);
    assert_eq!(glyph.level_at(2, 8), 0x0);
}

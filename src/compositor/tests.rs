// src/compositor/tests.rs

use super::*;
use crate::rasterizer::{GlyphMetrics, RasterizedGlyph};

fn metrics(width: usize, height: usize, top: i32, advance: i32, left: i32) -> GlyphMetrics {
    GlyphMetrics {
        width,
        height,
        left,
        top,
        advance,
        ascender: 19,
        descender: -5,
    }
}

fn solid(metrics: GlyphMetrics) -> RasterizedGlyph {
    RasterizedGlyph {
        coverage: vec![255; metrics.width * metrics.height],
        metrics,
    }
}

#[test_log::test]
fn test_optical_digit_placement() {
    let compositor = Compositor::new(CenteringPolicy::Optical, 8, 16);
    let placement = compositor.placement('0', &metrics(4, 10, 8, 6, 1));
    // x: (8 - 6) / 2 + 1, y: baseline (16 + 10) / 2 minus top 8.
    assert_eq!(placement, Placement { x: 2, y: 5 });
}

#[test_log::test]
fn test_hyphen_uses_bitmap_width_not_advance() {
    let m = metrics(2, 2, 9, 8, 1);
    let compositor = Compositor::new(CenteringPolicy::Optical, 10, 20);
    let hyphen = compositor.placement('-', &m);
    let (advance_x, _) = raw_offsets(CenteringPolicy::Optical, '0', &m, 10, 20, 0);

    assert_eq!(hyphen.x, 4);
    assert_eq!(advance_x, 2);
    assert_ne!(hyphen.x as i64, advance_x);
    assert_eq!(hyphen.y, 9, "narrow punctuation centres on bitmap height");
}

#[test_log::test]
fn test_colon_is_narrow_punctuation() {
    assert!(is_narrow_punctuation(':'));
    assert!(is_narrow_punctuation('-'));
    assert!(!is_narrow_punctuation('0'));
    assert!(!is_narrow_punctuation(' '));
}

#[test_log::test]
fn test_bounding_box_centres_both_axes() {
    let compositor = Compositor::new(CenteringPolicy::BoundingBox, 12, 24);
    let placement = compositor.placement('7', &metrics(5, 9, 30, 40, -10));
    assert_eq!(placement, Placement { x: 3, y: 7 });
}

#[test_log::test]
fn test_baseline_policy_aligns_glyph_bottoms() {
    let compositor = Compositor::new(CenteringPolicy::Baseline, 12, 24)
        .with_padding(Compositor::default_padding(CenteringPolicy::Baseline, 1));
    assert_eq!(compositor.padding(), 3);
    assert_eq!(compositor.working_size(), (18, 30));

    let digit = metrics(6, 14, 14, 8, 1);
    let colon = metrics(2, 7, 7, 4, 1);
    let d = compositor.placement('0', &digit);
    let c = compositor.placement(':', &colon);

    assert_eq!(d.y, 8);
    assert_eq!(d.y + digit.height, c.y + colon.height);
}

#[test_log::test]
fn test_negative_offsets_clamp_to_zero() {
    let compositor = Compositor::new(CenteringPolicy::Optical, 8, 16);
    // Advance far wider than the canvas pushes x negative; top above the
    // canvas pushes y negative.
    let placement = compositor.placement('8', &metrics(4, 6, 40, 30, 0));
    assert_eq!(placement, Placement { x: 0, y: 0 });
}

#[test_log::test]
fn test_placement_keeps_bitmap_inside_canvas() {
    for policy in [
        CenteringPolicy::Optical,
        CenteringPolicy::Baseline,
        CenteringPolicy::BoundingBox,
    ] {
        for (w, h) in [(8, 16), (10, 20), (12, 24), (3, 3)] {
            for bw in 1..=w {
                for bh in [1, h / 2, h] {
                    let bh = bh.max(1);
                    let m = metrics(bw, bh, (bh as i32) + 3, bw as i32 + 5, -2);
                    let compositor = Compositor::new(policy, w, h);
                    let p = compositor.placement('0', &m);
                    assert!(p.x + bw <= w, "{:?} x overflow on {}x{}", policy, w, h);
                    assert!(p.y + bh <= h, "{:?} y overflow on {}x{}", policy, w, h);
                }
            }
        }
    }
}

#[test_log::test]
fn test_oversized_glyph_is_clipped_not_panicking() {
    let compositor = Compositor::new(CenteringPolicy::Optical, 10, 20);
    let glyph = solid(metrics(12, 30, 30, 14, 1));
    assert_eq!(compositor.placement('0', &glyph.metrics), Placement { x: 0, y: 0 });

    let canvas = compositor.compose('0', &glyph);
    assert_eq!((canvas.width(), canvas.height()), (10, 20));
    assert!(canvas.pixels().iter().all(|&p| p == 255));
}

#[test_log::test]
fn test_compose_copies_coverage_at_offset() {
    let compositor = Compositor::new(CenteringPolicy::BoundingBox, 6, 6);
    let mut glyph = solid(metrics(2, 2, 2, 2, 0));
    glyph.coverage = vec![10, 20, 30, 40];

    let canvas = compositor.compose('x', &glyph);
    assert_eq!(canvas.get(2, 2), 10);
    assert_eq!(canvas.get(3, 2), 20);
    assert_eq!(canvas.get(2, 3), 30);
    assert_eq!(canvas.get(3, 3), 40);
    assert_eq!(canvas.pixels().iter().filter(|&&p| p != 0).count(), 4);
}

#[test_log::test]
fn test_empty_glyph_composes_blank_canvas() {
    let compositor = Compositor::new(CenteringPolicy::Optical, 8, 16);
    let canvas = compositor.compose(' ', &RasterizedGlyph::empty(4, 12, -3));
    assert_eq!(canvas, Canvas::new(8, 16));
}

#[test_log::test]
fn test_crop_to_target_strips_padding() {
    let compositor = Compositor::new(CenteringPolicy::Baseline, 4, 4).with_padding(2);
    let mut working = Canvas::new(8, 8);
    working.set(2, 2, 99);
    working.set(0, 0, 50);

    let cropped = compositor.crop_to_target(&working);
    assert_eq!((cropped.width(), cropped.height()), (4, 4));
    assert_eq!(cropped.get(0, 0), 99);
    assert_eq!(cropped.pixels().iter().filter(|&&p| p != 0).count(), 1);
}

#[test_log::test]
fn test_blit_past_edge_is_ignored() {
    let mut canvas = Canvas::new(4, 4);
    canvas.blit(&[255; 4], 2, 2, 4, 0);
    canvas.blit(&[255; 4], 2, 2, 0, 9);
    assert!(canvas.pixels().iter().all(|&p| p == 0));
}

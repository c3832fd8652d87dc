// src/search/mod.rs

//! Font parameter search.
//!
//! Picks the pixel size and variable-axis coordinates used for a whole
//! export run:
//!
//! - **Size**: largest pixel size whose test glyph, grown by the outline on
//!   every side, still fits the canvas (binary search), or the largest size
//!   whose face line height fits the canvas height.
//! - **Axes**: exhaustive `wdth × wght` grid scan keeping the fitting
//!   candidate with the largest bitmap area.
//! - **Small canvases**: a fixed narrow/light override that takes precedence
//!   over the axis scan.
//!
//! Every probe is an independent `FontDriver::rasterize` call. A probe that
//! comes back `Err` is a non-fit and never aborts the search.

use crate::rasterizer::{AxisCoords, FontDriver, RasterizedGlyph, RenderRequest};
use log::*;
use serde::{Deserialize, Serialize};

/// Line heights within this fraction of the canvas height end the
/// line-height search early.
const LINE_HEIGHT_FILL: f32 = 0.95;

/// Canvas plus the outline margin every glyph must leave around itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitTarget {
    pub width: usize,
    pub height: usize,
    pub outline: usize,
}

impl FitTarget {
    pub fn new(width: usize, height: usize, outline: usize) -> Self {
        Self {
            width,
            height,
            outline,
        }
    }

    pub fn admits(&self, glyph: &RasterizedGlyph) -> bool {
        glyph.fits(self.width, self.height, self.outline)
    }
}

/// How the run's pixel size is chosen when none is given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SizeStrategy {
    /// Binary search on the test glyph's bitmap plus outline.
    #[default]
    GlyphFit,
    /// Descending scan on `ascender - descender`.
    LineHeight,
    /// Use the canvas height as the pixel size.
    CanvasHeight,
}

/// Which of several equal-area axis candidates wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Earliest in scan order (`wdth` outer, `wght` inner).
    #[default]
    FirstSeen,
    /// Latest in scan order.
    LastSeen,
}

/// Inclusive `[min, max]` range sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl AxisRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Sample points, computed by index so steps do not accumulate error.
    pub fn values(&self) -> Vec<f32> {
        if self.step <= 0.0 || self.max < self.min {
            return Vec::new();
        }
        let count = ((self.max - self.min) / self.step + 1e-4).floor() as usize + 1;
        (0..count).map(|i| self.min + i as f32 * self.step).collect()
    }
}

/// Size chosen by a search, and whether anything actually fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeChoice {
    pub pixel_size: u32,
    /// False when nothing in range fit and the search fell back.
    pub fitted: bool,
}

/// Largest `s` in `[min, max]` with `fits(s)`, assuming `fits` is monotonically
/// non-increasing. `None` when no value fits.
pub fn max_satisfying(min: u32, max: u32, mut fits: impl FnMut(u32) -> bool) -> Option<u32> {
    let mut low = min as i64;
    let mut high = max as i64;
    let mut best = None;
    while low <= high {
        let mid = (low + high) / 2;
        if fits(mid as u32) {
            best = Some(mid as u32);
            low = mid + 1;
        } else {
            high = mid - 1;
        }
    }
    best
}

/// Render `request` and report whether it fits; failures are non-fits.
fn probe<D: FontDriver>(driver: &mut D, target: &FitTarget, request: &RenderRequest) -> Option<usize> {
    match driver.rasterize(request) {
        Ok(glyph) if target.admits(&glyph) => Some(glyph.area()),
        Ok(glyph) => {
            trace!(
                "Search: '{}' at {} px {:?} is {}x{}, too big for {}x{} (outline {})",
                request.ch,
                request.pixel_size,
                request.axes,
                glyph.metrics.width,
                glyph.metrics.height,
                target.width,
                target.height,
                target.outline
            );
            None
        }
        Err(reason) => {
            debug!("Search: skipping probe {:?}: {}", request, reason);
            None
        }
    }
}

/// Largest pixel size in `[min_size, max_size]` whose `test_char` fits.
///
/// Falls back to `min_size` (with `fitted == false`) when nothing fits.
pub fn find_max_font_size<D: FontDriver>(
    driver: &mut D,
    target: &FitTarget,
    axes: Option<AxisCoords>,
    min_size: u32,
    max_size: u32,
    test_char: char,
) -> SizeChoice {
    let found = max_satisfying(min_size, max_size, |size| {
        let request = RenderRequest::new(test_char, size, axes);
        probe(driver, target, &request).is_some()
    });

    match found {
        Some(pixel_size) => {
            info!(
                "SizeSearch: max pixel size {} for {}x{} (outline {}, axes {:?})",
                pixel_size, target.width, target.height, target.outline, axes
            );
            SizeChoice {
                pixel_size,
                fitted: true,
            }
        }
        None => {
            warn!(
                "SizeSearch: no size in [{}, {}] fits {}x{} with outline {}; using {}",
                min_size, max_size, target.width, target.height, target.outline, min_size
            );
            SizeChoice {
                pixel_size: min_size,
                fitted: false,
            }
        }
    }
}

/// Largest pixel size whose face line height (`ascender - descender`) fits
/// `canvas_height`, stopping early once the line fills 95% of it.
pub fn find_line_height_size<D: FontDriver>(
    driver: &mut D,
    canvas_height: usize,
    axes: Option<AxisCoords>,
    test_char: char,
) -> SizeChoice {
    let limit = canvas_height as i32;
    let fill = (canvas_height as f32 * LINE_HEIGHT_FILL).ceil() as i32;
    let mut largest_fitting = None;

    for size in (1..=canvas_height as u32).rev() {
        let request = RenderRequest::new(test_char, size, axes);
        let glyph = match driver.rasterize(&request) {
            Ok(glyph) => glyph,
            Err(reason) => {
                debug!("LineHeightSearch: skipping {} px: {}", size, reason);
                continue;
            }
        };
        let line = glyph.metrics.ascender - glyph.metrics.descender;
        trace!("LineHeightSearch: {} px → line height {}", size, line);
        if line <= limit {
            largest_fitting.get_or_insert(size);
            if line >= fill {
                break;
            }
        }
    }

    match largest_fitting {
        Some(pixel_size) => {
            info!(
                "LineHeightSearch: pixel size {} for canvas height {}",
                pixel_size, canvas_height
            );
            SizeChoice {
                pixel_size,
                fitted: true,
            }
        }
        None => {
            warn!(
                "LineHeightSearch: no line height fits {} px; using 1",
                canvas_height
            );
            SizeChoice {
                pixel_size: 1,
                fitted: false,
            }
        }
    }
}

/// Scan the `wdth × wght` grid at `pixel_size` and return the fitting
/// coordinates with the largest test glyph area.
///
/// Returns `None` when the font has no variation axes or nothing fits.
pub fn find_best_axis_coords<D: FontDriver>(
    driver: &mut D,
    target: &FitTarget,
    pixel_size: u32,
    width_axis: &AxisRange,
    weight_axis: &AxisRange,
    tie_break: TieBreak,
    test_char: char,
) -> Option<AxisCoords> {
    if !driver.has_variable_axes() {
        debug!("AxisSearch: font has no variation axes, skipping");
        return None;
    }

    let weights = weight_axis.values();
    let mut best: Option<(AxisCoords, usize)> = None;
    let mut candidates = 0usize;

    for width in width_axis.values() {
        for &weight in &weights {
            let axes = AxisCoords::new(width, weight);
            let request = RenderRequest::new(test_char, pixel_size, Some(axes));
            let Some(area) = probe(driver, target, &request) else {
                continue;
            };
            candidates += 1;
            let replace = match (best, tie_break) {
                (None, _) => true,
                (Some((_, best_area)), TieBreak::FirstSeen) => area > best_area,
                (Some((_, best_area)), TieBreak::LastSeen) => area >= best_area,
            };
            if replace {
                best = Some((axes, area));
            }
        }
    }

    match best {
        Some((axes, area)) => {
            info!(
                "AxisSearch: best axes {} (area {}) out of {} fitting candidates at {} px",
                axes, area, candidates, pixel_size
            );
            Some(axes)
        }
        None => {
            warn!(
                "AxisSearch: no axis coordinates fit {}x{} at {} px; using font defaults",
                target.width, target.height, pixel_size
            );
            None
        }
    }
}

/// Hand-tuned narrow/light coordinates for tiny canvases.
pub fn small_canvas_override(width: usize, height: usize) -> Option<AxisCoords> {
    if width <= 10 || height <= 20 {
        Some(AxisCoords::new(70.0, 300.0))
    } else if width <= 16 || height <= 32 {
        Some(AxisCoords::new(85.0, 400.0))
    } else {
        None
    }
}

/// Search knobs, shared with the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Strategy used when no explicit pixel size is given.
    pub size_strategy: SizeStrategy,
    /// Smallest pixel size the glyph-fit search considers.
    pub min_size: u32,
    /// Largest pixel size the glyph-fit search considers.
    pub max_size: u32,
    /// Representative character measured by all searches.
    pub test_char: char,
    /// `wdth` axis scan range.
    pub width_axis: AxisRange,
    /// `wght` axis scan range.
    pub weight_axis: AxisRange,
    /// Winner among equal-area axis candidates.
    pub tie_break: TieBreak,
    /// Apply the small-canvas axis override before searching.
    pub small_canvas_override: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            size_strategy: SizeStrategy::GlyphFit,
            min_size: 5,
            max_size: 256,
            test_char: '0',
            width_axis: AxisRange::new(50.0, 150.0, 5.0),
            weight_axis: AxisRange::new(200.0, 900.0, 50.0),
            tie_break: TieBreak::FirstSeen,
            small_canvas_override: true,
        }
    }
}

/// Pixel size and axis coordinates shared by every character of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontPlan {
    pub pixel_size: u32,
    pub axes: Option<AxisCoords>,
}

/// Resolve the run's [`FontPlan`].
///
/// Order: small-canvas override (dropped for static fonts), then pixel size
/// (explicit, or by strategy using the override axes), then axes (override,
/// else grid search at the chosen size, else font defaults).
pub fn resolve_plan<D: FontDriver>(
    driver: &mut D,
    target: &FitTarget,
    search: &SearchConfig,
    explicit_size: Option<u32>,
) -> FontPlan {
    let variable = driver.has_variable_axes();
    let override_axes = if search.small_canvas_override {
        small_canvas_override(target.width, target.height)
    } else {
        None
    };
    let override_axes = match override_axes {
        Some(axes) if !variable => {
            warn!(
                "FontPlan: ignoring small-canvas axes {} for a font without variation axes",
                axes
            );
            None
        }
        other => other,
    };

    let pixel_size = match explicit_size {
        Some(size) => size,
        None => match search.size_strategy {
            SizeStrategy::GlyphFit => {
                find_max_font_size(
                    driver,
                    target,
                    override_axes,
                    search.min_size,
                    search.max_size,
                    search.test_char,
                )
                .pixel_size
            }
            SizeStrategy::LineHeight => {
                find_line_height_size(driver, target.height, override_axes, search.test_char)
                    .pixel_size
            }
            SizeStrategy::CanvasHeight => target.height as u32,
        },
    };

    let axes = override_axes.or_else(|| {
        find_best_axis_coords(
            driver,
            target,
            pixel_size,
            &search.width_axis,
            &search.weight_axis,
            search.tie_break,
            search.test_char,
        )
    });

    info!("FontPlan: pixel size {}, axes {:?}", pixel_size, axes);
    FontPlan { pixel_size, axes }
}

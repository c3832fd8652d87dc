// src/outline.rs

//! Outline synthesis by morphological dilation.
//!
//! The composited coverage canvas is thresholded into a foreground mask,
//! the mask is dilated by the outline radius, and the band that dilation
//! added becomes the outline. The result is a two-tier canvas: 255 for
//! glyph body, the profile's outline gray for the band, 0 elsewhere.
//! Pixels outside the canvas are background; nothing wraps around edges.

use crate::compositor::Canvas;
use serde::{Deserialize, Serialize};

/// Coverage at or below this is treated as anti-aliasing noise.
pub const NOISE_THRESHOLD: u8 = 10;

/// Intensity written for glyph body pixels.
pub const BODY_INTENSITY: u8 = 255;

/// Structuring element used to grow the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DilationMethod {
    /// Square window of half-width `r` (Chebyshev distance `<= r`).
    #[default]
    Square,
    /// 3x3 dilation applied `r` times. Same result as `Square`.
    IteratedKernel,
    /// Euclidean disk, `dx² + dy² <= r²`.
    Disk,
}

/// Boolean grid with the same dimensions as the canvas it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    /// Pixels whose intensity is strictly above `threshold`.
    pub fn from_canvas(canvas: &Canvas, threshold: u8) -> Self {
        Self {
            width: canvas.width(),
            height: canvas.height(),
            bits: canvas.pixels().iter().map(|&value| value > threshold).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x < self.width && y < self.height {
            self.bits[y * self.width + x] = value;
        }
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }

    /// `self ∖ other`.
    pub fn difference(&self, other: &Mask) -> Mask {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        Mask {
            width: self.width,
            height: self.height,
            bits: self
                .bits
                .iter()
                .zip(&other.bits)
                .map(|(&a, &b)| a && !b)
                .collect(),
        }
    }

    pub fn is_subset_of(&self, other: &Mask) -> bool {
        self.bits.iter().zip(&other.bits).all(|(&a, &b)| !a || b)
    }

    pub fn dilate(&self, radius: usize, method: DilationMethod) -> Mask {
        if radius == 0 {
            return self.clone();
        }
        match method {
            DilationMethod::Square => self.dilate_square(radius),
            DilationMethod::IteratedKernel => {
                let mut mask = self.clone();
                for _ in 0..radius {
                    mask = mask.dilate_square(1);
                }
                mask
            }
            DilationMethod::Disk => self.dilate_disk(radius),
        }
    }

    /// Separable max filter: horizontal window, then vertical window.
    fn dilate_square(&self, radius: usize) -> Mask {
        let (w, h) = (self.width, self.height);
        let mut horizontal = vec![false; w * h];
        for y in 0..h {
            let row = &self.bits[y * w..(y + 1) * w];
            for x in 0..w {
                let lo = x.saturating_sub(radius);
                let hi = (x + radius).min(w.saturating_sub(1));
                horizontal[y * w + x] = row[lo..=hi].iter().any(|&bit| bit);
            }
        }

        let mut bits = vec![false; w * h];
        for x in 0..w {
            for y in 0..h {
                let lo = y.saturating_sub(radius);
                let hi = (y + radius).min(h.saturating_sub(1));
                bits[y * w + x] = (lo..=hi).any(|yy| horizontal[yy * w + x]);
            }
        }
        Mask {
            width: w,
            height: h,
            bits,
        }
    }

    fn dilate_disk(&self, radius: usize) -> Mask {
        let r = radius as isize;
        let offsets: Vec<(isize, isize)> = (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .filter(|(dx, dy)| dx * dx + dy * dy <= r * r)
            .collect();

        let mut out = self.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.bits[y * self.width + x] {
                    continue;
                }
                for &(dx, dy) in &offsets {
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx >= 0 && ny >= 0 {
                        out.set(nx as usize, ny as usize, true);
                    }
                }
            }
        }
        out
    }
}

/// Body and outline regions derived from one canvas.
#[derive(Debug, Clone)]
pub struct OutlineMasks {
    pub body: Mask,
    pub outline: Mask,
}

impl OutlineMasks {
    pub fn compute(canvas: &Canvas, radius: usize, method: DilationMethod) -> Self {
        let body = Mask::from_canvas(canvas, NOISE_THRESHOLD);
        let outline = if radius == 0 {
            Mask::new(canvas.width(), canvas.height())
        } else {
            body.dilate(radius, method).difference(&body)
        };
        Self { body, outline }
    }
}

/// Replace coverage with the two-tier body/outline intensities.
pub fn synthesize(canvas: &Canvas, radius: usize, method: DilationMethod, outline_gray: u8) -> Canvas {
    let masks = OutlineMasks::compute(canvas, radius, method);
    let mut result = Canvas::new(canvas.width(), canvas.height());
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            if masks.body.get(x, y) {
                result.set(x, y, BODY_INTENSITY);
            } else if masks.outline.get(x, y) {
                result.set(x, y, outline_gray);
            }
        }
    }
    result
}

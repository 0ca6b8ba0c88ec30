//! Basic drawing-surface geometry shared by all views.
//!

use serde::{Deserialize, Serialize};

/// Space kept free around the plotting area, in pixels.
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Usable width inside a surface `width` pixels wide.
    ///
    #[inline]
    pub fn inner_width(&self, width: f64) -> f64 {
        width - self.left - self.right
    }

    /// Usable height inside a surface `height` pixels high.
    ///
    #[inline]
    pub fn inner_height(&self, height: f64) -> f64 {
        height - self.top - self.bottom
    }
}

/// Rectangle in drawing-surface coordinates, `(x, y)` being the top-left corner.
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Cell {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Linear mapping of `v` from `[min, max]` onto `[start, start + span]`.
///
/// A degenerate range puts everything in the middle of the span.
///
#[inline]
pub(crate) fn scale(v: f64, min: f64, max: f64, start: f64, span: f64) -> f64 {
    let range = max - min;
    if range.abs() < f64::EPSILON {
        start + span / 2.
    } else {
        start + (v - min) / range * span
    }
}

/// Reverse of `scale()`.  A degenerate range gives back `min`.
///
#[inline]
pub(crate) fn unscale(p: f64, min: f64, max: f64, start: f64, span: f64) -> f64 {
    let range = max - min;
    if range.abs() < f64::EPSILON || span.abs() < f64::EPSILON {
        min
    } else {
        min + (p - start) / span * range
    }
}

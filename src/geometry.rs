//! Rectangle primitives for layout clustering.
//!
//! Coordinates follow the page convention of the content source: `x` grows to
//! the right, `y` grows downwards. A [`Rect`] may arrive inverted (`x1 < x0`),
//! so every comparison in this crate goes through [`Rect::normalize`] first.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An axis-aligned rectangle `(x0, y0, x1, y1)`.
///
/// Serialized as a four-element array, the same shape layout dumps use for
/// `bbox` values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Build a rectangle from a coordinate slice, as found in layout dumps.
    ///
    /// Fails with [`Error::InvalidGeometry`] unless exactly four finite values
    /// are given. Inverted coordinates are accepted and normalized.
    pub fn from_coords(coords: &[f64]) -> Result<Self> {
        let [x0, y0, x1, y1] = coords else {
            return Err(Error::InvalidGeometry(format!(
                "expected 4 coordinates, got {}",
                coords.len()
            )));
        };
        let rect = Rect::new(*x0, *y0, *x1, *y1);
        if !rect.is_finite() {
            return Err(Error::InvalidGeometry(format!(
                "non-finite coordinates in {:?}",
                coords
            )));
        }
        Ok(rect.normalize())
    }

    /// Width of the rectangle (negative if not normalized).
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the rectangle (negative if not normalized).
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Whether all four coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// Return the rectangle with `x0 <= x1` and `y0 <= y1`.
    pub fn normalize(&self) -> Rect {
        Rect {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        }
    }

    /// Smallest rectangle containing both rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let a = self.normalize();
        let b = other.normalize();
        Rect {
            x0: a.x0.min(b.x0),
            y0: a.y0.min(b.y0),
            x1: a.x1.max(b.x1),
            y1: a.y1.max(b.y1),
        }
    }

    /// Relaxed overlap test with independent per-axis tolerances.
    ///
    /// Two rectangles are neighbors unless one lies more than `dx` to the
    /// left/right of the other, or more than `dy` above/below it. Touching
    /// edges count as neighbors at zero tolerance.
    pub fn is_neighbor(&self, other: &Rect, dx: f64, dy: f64) -> bool {
        let a = self.normalize();
        let b = other.normalize();
        !(a.x1 < b.x0 - dx || a.x0 > b.x1 + dx || a.y1 < b.y0 - dy || a.y0 > b.y1 + dy)
    }

    /// Whether `other` lies entirely inside this rectangle (edges inclusive).
    pub fn contains(&self, other: &Rect) -> bool {
        let a = self.normalize();
        let b = other.normalize();
        b.x0 >= a.x0 && b.x1 <= a.x1 && b.y0 >= a.y0 && b.y1 <= a.y1
    }

    /// Whether the two rectangles share any point (edges inclusive).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.is_neighbor(other, 0.0, 0.0)
    }

    /// Reading-order comparison: bottom edge first, then left edge.
    ///
    /// The remaining coordinates break ties so that equal rectangles end up
    /// adjacent after sorting.
    pub fn reading_order(&self, other: &Rect) -> Ordering {
        self.y1
            .total_cmp(&other.y1)
            .then(self.x0.total_cmp(&other.x0))
            .then(self.y0.total_cmp(&other.y0))
            .then(self.x1.total_cmp(&other.x1))
    }
}

impl From<[f64; 4]> for Rect {
    fn from(c: [f64; 4]) -> Self {
        Rect::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Rect> for [f64; 4] {
    fn from(r: Rect) -> Self {
        [r.x0, r.y0, r.x1, r.y1]
    }
}

/// Free-function form of [`Rect::normalize`].
pub fn normalize(r: &Rect) -> Rect {
    r.normalize()
}

/// Free-function form of [`Rect::is_neighbor`].
pub fn neighbors(r1: &Rect, r2: &Rect, dx: f64, dy: f64) -> bool {
    r1.is_neighbor(r2, dx, dy)
}

/// Free-function form of [`Rect::union`].
pub fn union(r1: &Rect, r2: &Rect) -> Rect {
    r1.union(r2)
}

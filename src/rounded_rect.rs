// Copyright 2026 the Kanvaso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A rectangle with rounded corners.

use std::fmt;

use crate::Rect;

/// A rectangle with equal, elliptical corner radii.
///
/// The radii are clamped so that adjacent corners never overlap: `rx` is at
/// most half the rectangle's width and `ry` at most half its height.
#[derive(Clone, Copy, Default, PartialEq)]
pub struct RoundedRect {
    rect: Rect,
    rx: f64,
    ry: f64,
}

impl RoundedRect {
    /// A new rounded rectangle from a rectangle and corner radii.
    ///
    /// Negative or non-finite radii are treated as zero, which degenerates
    /// to a plain rectangle.
    #[inline]
    pub fn from_rect(rect: Rect, rx: f64, ry: f64) -> RoundedRect {
        let rect = rect.abs();
        let rx = clamp_radius(rx, rect.width());
        let ry = clamp_radius(ry, rect.height());
        RoundedRect { rect, rx, ry }
    }

    /// A new rounded rectangle with circular corners of radius `r`.
    #[inline]
    pub fn from_rect_radius(rect: Rect, r: f64) -> RoundedRect {
        RoundedRect::from_rect(rect, r, r)
    }

    /// The bounding rectangle.
    #[inline]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// The corner radius along the x axis, after clamping.
    #[inline]
    pub const fn radius_x(&self) -> f64 {
        self.rx
    }

    /// The corner radius along the y axis, after clamping.
    #[inline]
    pub const fn radius_y(&self) -> f64 {
        self.ry
    }

    /// Returns `true` if both radii are zero, i.e. this is a plain rectangle.
    #[inline]
    pub fn is_rect(&self) -> bool {
        self.rx == 0.0 && self.ry == 0.0
    }
}

fn clamp_radius(r: f64, extent: f64) -> f64 {
    if r.is_finite() && r > 0.0 {
        r.min(0.5 * extent)
    } else {
        0.0
    }
}

impl fmt::Debug for RoundedRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RoundedRect {{ rect: {:?}, rx: {:?}, ry: {:?} }}",
            self.rect, self.rx, self.ry
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radii_clamped() {
        let rr = RoundedRect::from_rect(Rect::new(0.0, 0.0, 10.0, 4.0), 20.0, 20.0);
        assert_eq!(rr.radius_x(), 5.0);
        assert_eq!(rr.radius_y(), 2.0);
    }

    #[test]
    fn invalid_radii_degenerate_to_rect() {
        let rr = RoundedRect::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0), -1.0, f64::NAN);
        assert!(rr.is_rect());
    }
}

// Copyright 2026 the Kanvaso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A circular or elliptical arc, lowered to cubic Béziers.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::{Point, Vec2};

/// A single arc segment of an axis-aligned ellipse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arc {
    /// The arc's center point.
    pub center: Point,
    /// The arc's radii; an ellipse where both radii are equal is a circle.
    pub radii: Vec2,
    /// The start angle in radians.
    pub start_angle: f64,
    /// The angle between the start and end of the arc, in radians.
    pub sweep_angle: f64,
}

impl Arc {
    /// A new arc.
    #[inline]
    pub fn new(
        center: impl Into<Point>,
        radii: impl Into<Vec2>,
        start_angle: f64,
        sweep_angle: f64,
    ) -> Arc {
        Arc {
            center: center.into(),
            radii: radii.into(),
            start_angle,
            sweep_angle,
        }
    }

    /// The point where the arc starts.
    #[inline]
    pub fn start_point(&self) -> Point {
        self.center + sample_ellipse(self.radii, self.start_angle)
    }

    /// Converts the arc into a series of conic (rational quadratic) segments
    /// of at most a quarter turn each, invoking the callback with the control
    /// point, end point and weight of each.
    ///
    /// The representation is exact. Sweeps are clamped to one full turn;
    /// a zero or non-finite sweep produces no segments.
    pub fn to_conics<P>(self, mut p: P)
    where
        P: FnMut(Point, Point, f64),
    {
        if !self.sweep_angle.is_finite() || self.sweep_angle == 0.0 {
            return;
        }
        let sweep = self.sweep_angle.clamp(-2.0 * PI, 2.0 * PI);
        let n = (sweep.abs() / FRAC_PI_2).ceil().max(1.0);
        let step = sweep / n;
        let weight = (0.5 * step).cos();
        let mut angle0 = self.start_angle;
        for _ in 0..(n as usize) {
            let angle1 = angle0 + step;
            let mid = sample_ellipse(self.radii, 0.5 * (angle0 + angle1));
            let ctrl = self.center + (1.0 / weight) * mid;
            let end = self.center + sample_ellipse(self.radii, angle1);
            p(ctrl, end, weight);
            angle0 = angle1;
        }
    }

    /// Converts the arc into a series of cubic Bézier segments, accurate to
    /// within `tolerance`, invoking the callback with the two control points
    /// and the end point of each.
    pub fn to_cubic_beziers<P>(self, tolerance: f64, mut p: P)
    where
        P: FnMut(Point, Point, Point),
    {
        let scaled_err = self.radii.x.max(self.radii.y) / tolerance;
        // Number of subdivisions per full circle for the error tolerance.
        // Slightly underestimates the error for single quadrants.
        let n_err = (1.1163 * scaled_err).powf(1.0 / 6.0).max(3.999_999);
        let n = (n_err * self.sweep_angle.abs() * (1.0 / (2.0 * PI)))
            .ceil()
            .max(1.0);
        let angle_step = self.sweep_angle / n;
        let arm_len = (4.0 / 3.0) * (0.25 * angle_step).abs().tan() * angle_step.signum();
        let mut angle0 = self.start_angle;
        let mut p0 = self.center + sample_ellipse(self.radii, angle0);
        for _ in 0..(n as usize) {
            let angle1 = angle0 + angle_step;
            let p1 = p0 + arm_len * sample_ellipse(self.radii, angle0 + FRAC_PI_2);
            let p3 = self.center + sample_ellipse(self.radii, angle1);
            let p2 = p3 - arm_len * sample_ellipse(self.radii, angle1 + FRAC_PI_2);
            p(p1, p2, p3);
            angle0 = angle1;
            p0 = p3;
        }
    }
}

fn sample_ellipse(radii: Vec2, angle: f64) -> Vec2 {
    Vec2::new(radii.x * angle.cos(), radii.y * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_circle_endpoints() {
        let arc = Arc::new((0.0, 0.0), (1.0, 1.0), 0.0, PI);
        let mut last = Point::new(1.0, 0.0);
        arc.to_cubic_beziers(1e-4, |_, _, p3| last = p3);
        assert!(last.distance(Point::new(-1.0, 0.0)) < 1e-9);
    }

    #[test]
    fn circle_points_stay_on_radius() {
        let arc = Arc::new((5.0, 5.0), (2.0, 2.0), 0.0, 2.0 * PI);
        arc.to_cubic_beziers(1e-5, |_, _, p3| {
            let r = p3.distance(Point::new(5.0, 5.0));
            assert!((r - 2.0).abs() < 1e-4, "radius drifted: {r}");
        });
    }

    #[test]
    fn quarter_turn_is_one_conic() {
        let arc = Arc::new((0.0, 0.0), (1.0, 1.0), 0.0, FRAC_PI_2);
        let mut segs = Vec::new();
        arc.to_conics(|ctrl, end, w| segs.push((ctrl, end, w)));
        assert_eq!(segs.len(), 1);
        let (ctrl, end, w) = segs[0];
        assert!((w - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!(ctrl.distance(Point::new(1.0, 1.0)) < 1e-12);
        assert!(end.distance(Point::new(0.0, 1.0)) < 1e-12);
    }

    #[test]
    fn full_turn_closes_in_four_conics() {
        let arc = Arc::new((3.0, 4.0), (2.0, 1.0), 0.5, 2.0 * PI);
        let mut segs = Vec::new();
        arc.to_conics(|ctrl, end, w| segs.push((ctrl, end, w)));
        assert_eq!(segs.len(), 4);
        assert!(segs[3].1.distance(arc.start_point()) < 1e-12);
    }

    #[test]
    fn negative_sweep() {
        let arc = Arc::new((0.0, 0.0), (1.0, 1.0), 0.0, -FRAC_PI_2);
        let mut last = Point::new(1.0, 0.0);
        arc.to_cubic_beziers(1e-4, |_, _, p3| last = p3);
        assert!(last.distance(Point::new(0.0, -1.0)) < 1e-9);
    }
}

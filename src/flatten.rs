// Copyright 2026 the Kanvaso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lowering of path elements to lines and cubics.
//!
//! The stroker and the renderer collaborators only understand lines and
//! cubic Béziers. This module rewrites a verb stream so that quadratics are
//! degree-elevated (exactly) and conic sections are approximated by
//! quadratics via rational subdivision, honoring the weight, then elevated
//! through the same path. Start and end points are always preserved exactly.

use crate::{Path, PathEl, Point, QuadBez};

/// Lower a path to an equivalent one containing only move, line, cubic and
/// close elements.
///
/// Conic approximation is accurate to within `tolerance`; everything else is
/// exact. The fill rule is preserved.
pub fn flatten(path: &Path, tolerance: f64) -> Path {
    let mut out = Path::with_fill_rule(path.fill_rule());
    for el in flatten_elements(path.elements(), tolerance) {
        out.push_el(el);
    }
    out
}

/// Element-stream version of [`flatten`].
pub(crate) fn flatten_elements(
    elements: impl Iterator<Item = PathEl>,
    tolerance: f64,
) -> std::vec::IntoIter<PathEl> {
    let mut out = Vec::new();
    let mut start = Point::ORIGIN;
    let mut last = Point::ORIGIN;
    for el in elements {
        match el {
            PathEl::MoveTo(p) => {
                start = p;
                last = p;
                out.push(el);
            }
            PathEl::LineTo(p) => {
                last = p;
                out.push(el);
            }
            PathEl::QuadTo(c, p) => {
                out.push(raise_el(QuadBez::new(last, c, p)));
                last = p;
            }
            PathEl::ConicTo(c, p, w) => {
                if w > 0.0 && w.is_finite() {
                    let conic = Conic {
                        p0: last,
                        p1: c,
                        p2: p,
                        w,
                    };
                    conic.lower(tolerance, MAX_CONIC_DEPTH, &mut out);
                } else {
                    // No usable weight; degrade to the chord.
                    out.push(PathEl::LineTo(p));
                }
                last = p;
            }
            PathEl::CurveTo(_, _, p) => {
                last = p;
                out.push(el);
            }
            PathEl::ClosePath => {
                last = start;
                out.push(el);
            }
        }
    }
    out.into_iter()
}

const MAX_CONIC_DEPTH: usize = 16;

fn raise_el(q: QuadBez) -> PathEl {
    let c = q.raise();
    PathEl::CurveTo(c.p1, c.p2, c.p3)
}

/// A conic section: a rational quadratic Bézier with weight `w` on the
/// control point. `w == 1` is an ordinary quadratic; a quarter circle has
/// `w = √2/2`.
#[derive(Clone, Copy)]
struct Conic {
    p0: Point,
    p1: Point,
    p2: Point,
    w: f64,
}

impl Conic {
    /// The curve point at t = 1/2.
    fn midpoint(&self) -> Point {
        let denom = 2.0 * (1.0 + self.w);
        ((self.p0.to_vec2() + 2.0 * self.w * self.p1.to_vec2() + self.p2.to_vec2()) / denom)
            .to_point()
    }

    /// Distance between this conic's midpoint and the midpoint of the plain
    /// quadratic with the same control polygon. Zero when `w == 1`; a good
    /// proxy for the maximum deviation, which occurs near t = 1/2.
    fn quad_error(&self) -> f64 {
        let quad_mid = (self.p0.to_vec2() + 2.0 * self.p1.to_vec2() + self.p2.to_vec2()) * 0.25;
        (self.midpoint().to_vec2() - quad_mid).hypot()
    }

    /// Split at t = 1/2 by rational de Casteljau.
    ///
    /// Both halves share the weight `√((1 + w) / 2)`, which tends toward 1:
    /// repeated subdivision converges on plain quadratics.
    fn subdivide(&self) -> (Conic, Conic) {
        let denom = 1.0 + self.w;
        let wp1 = self.w * self.p1.to_vec2();
        let m01 = ((self.p0.to_vec2() + wp1) / denom).to_point();
        let m12 = ((wp1 + self.p2.to_vec2()) / denom).to_point();
        let mid = self.midpoint();
        let w_half = (0.5 * denom).sqrt();
        (
            Conic {
                p0: self.p0,
                p1: m01,
                p2: mid,
                w: w_half,
            },
            Conic {
                p0: mid,
                p1: m12,
                p2: self.p2,
                w: w_half,
            },
        )
    }

    /// Recursively emit cubics approximating this conic.
    fn lower(&self, tolerance: f64, depth: usize, out: &mut Vec<PathEl>) {
        if depth == 0 || self.quad_error() <= tolerance {
            out.push(raise_el(QuadBez::new(self.p0, self.p1, self.p2)));
        } else {
            let (left, right) = self.subdivide();
            left.lower(tolerance, depth - 1, out);
            right.lower(tolerance, depth - 1, out);
        }
    }

    /// Exact evaluation of the rational curve, for tests.
    #[cfg(test)]
    fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let b0 = mt * mt;
        let b1 = 2.0 * mt * t * self.w;
        let b2 = t * t;
        let denom = b0 + b1 + b2;
        ((self.p0.to_vec2() * b0 + self.p1.to_vec2() * b1 + self.p2.to_vec2() * b2) / denom)
            .to_point()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CubicBez, ParamCurve, Path, Rect};

    #[test]
    fn quad_degree_elevation() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.quad_to((30.0, 60.0), (90.0, 0.0)).unwrap();
        let flat = flatten(&path, 1e-3);
        let els: Vec<_> = flat.elements().collect();
        assert_eq!(els.len(), 2);
        let PathEl::CurveTo(c1, c2, end) = els[1] else {
            panic!("expected a cubic, got {:?}", els[1]);
        };
        // c1 = p0 + 2/3 (ctrl - p0), c2 = end + 2/3 (ctrl - end)
        assert!(c1.distance(Point::new(20.0, 40.0)) < 1e-5);
        assert!(c2.distance(Point::new(50.0, 40.0)) < 1e-5);
        assert_eq!(end, Point::new(90.0, 0.0));
    }

    #[test]
    fn conic_weight_one_is_plain_quad() {
        let mut conic_path = Path::new();
        conic_path.move_to((0.0, 0.0));
        conic_path.conic_to((50.0, 50.0), (100.0, 0.0), 1.0).unwrap();

        let mut quad_path = Path::new();
        quad_path.move_to((0.0, 0.0));
        quad_path.quad_to((50.0, 50.0), (100.0, 0.0)).unwrap();

        let a: Vec<_> = flatten(&conic_path, 1e-3).elements().collect();
        let b: Vec<_> = flatten(&quad_path, 1e-3).elements().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn conic_honors_weight() {
        // Quarter circle of radius 100: conic with w = √2/2.
        let w = std::f64::consts::FRAC_1_SQRT_2;
        let conic = Conic {
            p0: Point::new(100.0, 0.0),
            p1: Point::new(100.0, 100.0),
            p2: Point::new(0.0, 100.0),
            w,
        };
        let mut path = Path::new();
        path.move_to(conic.p0);
        path.conic_to(conic.p1, conic.p2, w).unwrap();
        let flat = flatten(&path, 1e-3);

        // Every cubic endpoint must lie on the circle, and sampled points
        // must stay within tolerance of it.
        let mut last = conic.p0;
        for el in flat.elements().skip(1) {
            let PathEl::CurveTo(c1, c2, p3) = el else {
                panic!("expected cubics only");
            };
            let c = CubicBez::new(last, c1, c2, p3);
            for i in 0..=8 {
                let t = (i as f64) / 8.0;
                let r = c.eval(t).distance(Point::ORIGIN);
                assert!((r - 100.0).abs() < 5e-3, "off circle by {}", (r - 100.0).abs());
            }
            last = p3;
        }
        assert!(last.distance(conic.p2) < 1e-12, "endpoint drift");
    }

    #[test]
    fn conic_subdivision_interpolates() {
        let conic = Conic {
            p0: Point::new(0.0, 0.0),
            p1: Point::new(10.0, 20.0),
            p2: Point::new(20.0, 0.0),
            w: 3.0,
        };
        let (l, r) = conic.subdivide();
        assert_eq!(l.p0, conic.p0);
        assert_eq!(r.p2, conic.p2);
        assert!(l.p2.distance(conic.eval(0.5)) < 1e-12);
        assert!(l.eval(0.5).distance(conic.eval(0.25)) < 1e-12);
        assert!(r.eval(0.5).distance(conic.eval(0.75)) < 1e-12);
    }

    #[test]
    fn invalid_conic_weight_degrades_to_line() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.conic_to((10.0, 10.0), (20.0, 0.0), -1.0).unwrap();
        let flat = flatten(&path, 1e-3);
        let els: Vec<_> = flat.elements().collect();
        assert_eq!(els[1], PathEl::LineTo(Point::new(20.0, 0.0)));
    }

    #[test]
    fn lines_and_cubics_pass_through() {
        let mut path = Path::new();
        path.add_rect(Rect::new(0.0, 0.0, 5.0, 5.0));
        path.move_to((10.0, 10.0));
        path.curve_to((11.0, 10.0), (12.0, 11.0), (12.0, 12.0)).unwrap();
        let flat = flatten(&path, 1e-3);
        let a: Vec<_> = path.elements().collect();
        let b: Vec<_> = flat.elements().collect();
        assert_eq!(a, b);
    }
}

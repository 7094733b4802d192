// Copyright 2026 the Kanvaso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paths: an ordered, append-only record of verbs and points.

use std::fmt;
use std::ops::Mul;

use thiserror::Error;

use crate::flatten::flatten_elements;
use crate::{
    Affine, Arc, CubicBez, Line, ParamCurve, ParamCurveArclen, Point, QuadBez, Rect, RoundedRect,
    Vec2,
};

/// Weight of a conic section describing a quarter circle.
const QUARTER_CIRCLE_WEIGHT: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// A path verb. Each verb consumes a fixed number of points from the path's
/// point buffer (1, 1, 2, 2, 3 and 0 respectively); `ConicTo` additionally
/// consumes one weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verb {
    /// Start a new contour.
    MoveTo,
    /// A line to the next point.
    LineTo,
    /// A quadratic Bézier (control, end).
    QuadTo,
    /// A weighted conic section (control, end; rational quadratic).
    ConicTo,
    /// A cubic Bézier (control, control, end).
    CubicTo,
    /// Close the current contour back to its starting point.
    Close,
}

/// The rule used to determine a path's interior from overlapping or
/// self-intersecting contours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    /// A point is inside if its winding number is nonzero.
    #[default]
    NonZero,
    /// A point is inside if a ray to infinity crosses an odd number of edges.
    EvenOdd,
}

/// How [`Path::add_path`] splices one path onto another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddPathMode {
    /// Always start a new contour, regardless of endpoint adjacency.
    Append,
    /// Continue the current contour: if the current path's last point
    /// differs from the added path's first point, a connecting line is
    /// inserted; the added path's leading move never starts a new contour.
    Extend,
}

/// An error from structurally invalid path construction.
///
/// This is the one class of path problems surfaced to the caller: it
/// indicates a programming mistake, unlike degenerate geometry, which
/// silently resolves to empty output downstream.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// A line or curve verb was issued before any `move_to`.
    #[error("line or curve verb issued with no open contour (missing move_to)")]
    NoCurrentContour,
}

/// The element of a path: a verb bundled with its resolved points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathEl {
    /// Start a new contour at the point.
    MoveTo(Point),
    /// A line to the point.
    LineTo(Point),
    /// A quadratic Bézier: control point, then end point.
    QuadTo(Point, Point),
    /// A conic (rational quadratic): control point, end point, weight.
    ConicTo(Point, Point, f64),
    /// A cubic Bézier: two control points, then end point.
    CurveTo(Point, Point, Point),
    /// Close the current contour.
    ClosePath,
}

impl PathEl {
    /// The end point of this element, if it has one.
    #[inline]
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathEl::MoveTo(p) => Some(p),
            PathEl::LineTo(p) => Some(p),
            PathEl::QuadTo(_, p) => Some(p),
            PathEl::ConicTo(_, p, _) => Some(p),
            PathEl::CurveTo(_, _, p) => Some(p),
            PathEl::ClosePath => None,
        }
    }
}

/// A segment of a path, after conics have been lowered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSeg {
    /// A line segment.
    Line(Line),
    /// A quadratic Bézier segment.
    Quad(QuadBez),
    /// A cubic Bézier segment.
    Cubic(CubicBez),
}

/// A path: an ordered sequence of verbs, a flat point buffer, conic weights,
/// and a fill rule.
///
/// A path is built by the caller across multiple calls and then consumed
/// read-only by draw calls; drawing never mutates it. Every contour starts
/// with a move verb; issuing a line or curve verb first is rejected with
/// [`PathError::NoCurrentContour`]. The fill rule only affects how
/// overlapping contours are interpreted at fill time, not how the path is
/// built.
#[derive(Clone, Default)]
pub struct Path {
    verbs: Vec<Verb>,
    points: Vec<Point>,
    conic_weights: Vec<f64>,
    fill_rule: FillRule,
    // Builder bookkeeping; derived from the buffers but cheaper to carry.
    contour_start: Option<Point>,
    last_pt: Option<Point>,
    just_closed: bool,
}

impl Path {
    /// A new, empty path with the nonzero fill rule.
    #[inline]
    pub fn new() -> Path {
        Path::default()
    }

    /// A new, empty path with the given fill rule.
    #[inline]
    pub fn with_fill_rule(fill_rule: FillRule) -> Path {
        Path {
            fill_rule,
            ..Path::default()
        }
    }

    /// The path's fill rule.
    #[inline]
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Set the path's fill rule.
    #[inline]
    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.fill_rule = fill_rule;
    }

    /// Remove all verbs and points, keeping the fill rule.
    pub fn reset(&mut self) {
        self.verbs.clear();
        self.points.clear();
        self.conic_weights.clear();
        self.contour_start = None;
        self.last_pt = None;
        self.just_closed = false;
    }

    /// Returns `true` if the path has no verbs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// The number of verbs.
    #[inline]
    pub fn verb_count(&self) -> usize {
        self.verbs.len()
    }

    /// The number of points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// The path's verbs.
    #[inline]
    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    /// The path's point buffer.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The current point: the end point of the last verb, or the contour
    /// start right after a close.
    #[inline]
    pub fn current_point(&self) -> Option<Point> {
        self.last_pt
    }

    /// Returns `true` if every point in the path is finite.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite())
    }

    // ── Builder operations ──────────────────────────────────────────────

    /// Start a new contour at `p`.
    pub fn move_to(&mut self, p: impl Into<Point>) {
        let p = p.into();
        self.verbs.push(Verb::MoveTo);
        self.points.push(p);
        self.contour_start = Some(p);
        self.last_pt = Some(p);
        self.just_closed = false;
    }

    /// Add a line from the current point to `p`.
    ///
    /// # Errors
    ///
    /// [`PathError::NoCurrentContour`] if no `move_to` preceded this call.
    pub fn line_to(&mut self, p: impl Into<Point>) -> Result<(), PathError> {
        self.ensure_open()?;
        let p = p.into();
        self.verbs.push(Verb::LineTo);
        self.points.push(p);
        self.last_pt = Some(p);
        Ok(())
    }

    /// Add a quadratic Bézier from the current point.
    ///
    /// # Errors
    ///
    /// [`PathError::NoCurrentContour`] if no `move_to` preceded this call.
    pub fn quad_to(
        &mut self,
        ctrl: impl Into<Point>,
        end: impl Into<Point>,
    ) -> Result<(), PathError> {
        self.ensure_open()?;
        let end = end.into();
        self.verbs.push(Verb::QuadTo);
        self.points.push(ctrl.into());
        self.points.push(end);
        self.last_pt = Some(end);
        Ok(())
    }

    /// Add a conic section (rational quadratic Bézier) from the current
    /// point, with the given weight.
    ///
    /// A weight of 1 is an ordinary quadratic; a quarter circle has weight
    /// `√2/2`. Non-positive or non-finite weights degrade to a line at
    /// flatten time.
    ///
    /// # Errors
    ///
    /// [`PathError::NoCurrentContour`] if no `move_to` preceded this call.
    pub fn conic_to(
        &mut self,
        ctrl: impl Into<Point>,
        end: impl Into<Point>,
        weight: f64,
    ) -> Result<(), PathError> {
        self.ensure_open()?;
        let end = end.into();
        self.verbs.push(Verb::ConicTo);
        self.points.push(ctrl.into());
        self.points.push(end);
        self.conic_weights.push(weight);
        self.last_pt = Some(end);
        Ok(())
    }

    /// Add a cubic Bézier from the current point.
    ///
    /// # Errors
    ///
    /// [`PathError::NoCurrentContour`] if no `move_to` preceded this call.
    pub fn curve_to(
        &mut self,
        c1: impl Into<Point>,
        c2: impl Into<Point>,
        end: impl Into<Point>,
    ) -> Result<(), PathError> {
        self.ensure_open()?;
        let end = end.into();
        self.verbs.push(Verb::CubicTo);
        self.points.push(c1.into());
        self.points.push(c2.into());
        self.points.push(end);
        self.last_pt = Some(end);
        Ok(())
    }

    /// Close the current contour, connecting the current point back to the
    /// contour's starting point without adding a new point.
    ///
    /// A no-op on an empty path or when the contour is already closed.
    pub fn close(&mut self) {
        if self.contour_start.is_some() && !self.just_closed {
            self.verbs.push(Verb::Close);
            self.last_pt = self.contour_start;
            self.just_closed = true;
        }
    }

    /// After a close, a new verb continues from the closed contour's start
    /// point in a fresh contour.
    fn ensure_open(&mut self) -> Result<(), PathError> {
        match self.contour_start {
            None => Err(PathError::NoCurrentContour),
            Some(start) => {
                if self.just_closed {
                    self.move_to(start);
                }
                Ok(())
            }
        }
    }

    // ── Convenience constructors ────────────────────────────────────────

    /// Add a closed rectangular contour.
    pub fn add_rect(&mut self, rect: Rect) {
        let rect = rect.abs();
        self.move_to((rect.x0, rect.y0));
        let _ = self.line_to((rect.x1, rect.y0));
        let _ = self.line_to((rect.x1, rect.y1));
        let _ = self.line_to((rect.x0, rect.y1));
        self.close();
    }

    /// Add a closed oval contour inscribed in `rect`, built from four
    /// quarter-circle conics.
    pub fn add_oval(&mut self, rect: Rect) {
        let rect = rect.abs();
        let c = rect.center();
        let w = QUARTER_CIRCLE_WEIGHT;
        self.move_to((rect.x1, c.y));
        let _ = self.conic_to((rect.x1, rect.y1), (c.x, rect.y1), w);
        let _ = self.conic_to((rect.x0, rect.y1), (rect.x0, c.y), w);
        let _ = self.conic_to((rect.x0, rect.y0), (c.x, rect.y0), w);
        let _ = self.conic_to((rect.x1, rect.y0), (rect.x1, c.y), w);
        self.close();
    }

    /// Add a closed circular contour.
    pub fn add_circle(&mut self, center: impl Into<Point>, radius: f64) {
        let center = center.into();
        let r = radius.abs();
        self.add_oval(Rect::from_center_size(center, (2.0 * r, 2.0 * r)));
    }

    /// Add a closed rounded-rectangle contour, with quarter-ellipse conic
    /// corners.
    pub fn add_round_rect(&mut self, rr: RoundedRect) {
        if rr.is_rect() {
            self.add_rect(rr.rect());
            return;
        }
        let r = rr.rect();
        let (rx, ry) = (rr.radius_x(), rr.radius_y());
        let w = QUARTER_CIRCLE_WEIGHT;
        self.move_to((r.x0 + rx, r.y0));
        let _ = self.line_to((r.x1 - rx, r.y0));
        let _ = self.conic_to((r.x1, r.y0), (r.x1, r.y0 + ry), w);
        let _ = self.line_to((r.x1, r.y1 - ry));
        let _ = self.conic_to((r.x1, r.y1), (r.x1 - rx, r.y1), w);
        let _ = self.line_to((r.x0 + rx, r.y1));
        let _ = self.conic_to((r.x0, r.y1), (r.x0, r.y1 - ry), w);
        let _ = self.line_to((r.x0, r.y0 + ry));
        let _ = self.conic_to((r.x0, r.y0), (r.x0 + rx, r.y0), w);
        self.close();
    }

    /// Add an elliptical arc as a new contour, built from conic segments of
    /// at most a quarter turn each.
    pub fn add_arc(&mut self, arc: Arc) {
        self.move_to(arc.start_point());
        arc.to_conics(|ctrl, end, w| {
            let _ = self.conic_to(ctrl, end, w);
        });
    }

    /// Continue the current contour with an elliptical arc, inserting a
    /// connecting line when the current point is not the arc's start point.
    ///
    /// # Errors
    ///
    /// [`PathError::NoCurrentContour`] if no `move_to` preceded this call.
    pub fn extend_with_arc(&mut self, arc: Arc) -> Result<(), PathError> {
        self.ensure_open()?;
        let start = arc.start_point();
        if self.last_pt != Some(start) {
            self.line_to(start)?;
        }
        arc.to_conics(|ctrl, end, w| {
            let _ = self.conic_to(ctrl, end, w);
        });
        Ok(())
    }

    /// Add all of `other`'s geometry, translated by `offset`.
    ///
    /// With [`AddPathMode::Append`] the added geometry always starts its own
    /// contour. With [`AddPathMode::Extend`] the first contour of `other`
    /// continues the current contour: a connecting line is inserted if the
    /// endpoints differ, and no point is duplicated when they coincide.
    /// Contours after the first always append. Extending an empty path, or a
    /// path whose last contour is closed, degrades to Append.
    pub fn add_path(&mut self, other: &Path, offset: impl Into<Vec2>, mode: AddPathMode) {
        let offset = offset.into();
        let mut first = mode == AddPathMode::Extend;
        for el in other.elements() {
            match el {
                PathEl::MoveTo(p) => {
                    let p = p + offset;
                    if first && !self.just_closed {
                        first = false;
                        match self.last_pt {
                            None => self.move_to(p),
                            Some(last) if last != p => self.push_el(PathEl::LineTo(p)),
                            Some(_) => {}
                        }
                    } else {
                        first = false;
                        self.move_to(p);
                    }
                }
                el => self.push_el(translate_el(el, offset)),
            }
        }
    }

    /// Push an element without structural validation.
    ///
    /// Internal building blocks (the stroker, `add_path`) only produce
    /// elements that keep the path well formed.
    pub(crate) fn push_el(&mut self, el: PathEl) {
        match el {
            PathEl::MoveTo(p) => self.move_to(p),
            PathEl::LineTo(p) => {
                debug_assert!(self.contour_start.is_some(), "line with no contour");
                self.verbs.push(Verb::LineTo);
                self.points.push(p);
                self.last_pt = Some(p);
                self.just_closed = false;
            }
            PathEl::QuadTo(c, p) => {
                debug_assert!(self.contour_start.is_some(), "quad with no contour");
                self.verbs.push(Verb::QuadTo);
                self.points.push(c);
                self.points.push(p);
                self.last_pt = Some(p);
                self.just_closed = false;
            }
            PathEl::ConicTo(c, p, weight) => {
                debug_assert!(self.contour_start.is_some(), "conic with no contour");
                self.verbs.push(Verb::ConicTo);
                self.points.push(c);
                self.points.push(p);
                self.conic_weights.push(weight);
                self.last_pt = Some(p);
                self.just_closed = false;
            }
            PathEl::CurveTo(c1, c2, p) => {
                debug_assert!(self.contour_start.is_some(), "cubic with no contour");
                self.verbs.push(Verb::CubicTo);
                self.points.push(c1);
                self.points.push(c2);
                self.points.push(p);
                self.last_pt = Some(p);
                self.just_closed = false;
            }
            PathEl::ClosePath => self.close(),
        }
    }

    // ── Queries and transforms ──────────────────────────────────────────

    /// Iterate the path's elements.
    #[inline]
    pub fn elements(&self) -> Elements<'_> {
        Elements {
            path: self,
            verb_ix: 0,
            point_ix: 0,
            weight_ix: 0,
        }
    }

    /// Apply an affine transform to the path in place.
    ///
    /// Conic weights are invariant under affine maps.
    pub fn transform(&mut self, affine: Affine) {
        for p in &mut self.points {
            *p = affine * *p;
        }
        self.contour_start = self.contour_start.map(|p| affine * p);
        self.last_pt = self.last_pt.map(|p| affine * p);
    }

    /// Translate the path in place.
    pub fn offset(&mut self, v: impl Into<Vec2>) {
        self.transform(Affine::translate(v));
    }

    /// The bounding box of the path's control points.
    ///
    /// Cheap but loose: control points of curves may lie outside the curve.
    /// Returns [`Rect::ZERO`] for an empty path.
    pub fn bounding_box(&self) -> Rect {
        let mut points = self.points.iter();
        let Some(first) = points.next() else {
            return Rect::ZERO;
        };
        points.fold(Rect::from_points(*first, *first), |bbox, p| {
            bbox.union_pt(*p)
        })
    }

    /// The tight bounding box of the path's actual geometry, accurate to
    /// within `tolerance` for conic sections.
    pub fn tight_bounds(&self, tolerance: f64) -> Rect {
        let mut bbox: Option<Rect> = None;
        for seg in segments(flatten_elements(self.elements(), tolerance)) {
            let seg_bb = match seg {
                PathSeg::Line(l) => Rect::from_points(l.p0, l.p1),
                PathSeg::Quad(q) => q.bounding_box(),
                PathSeg::Cubic(c) => c.bounding_box(),
            };
            bbox = Some(match bbox {
                Some(bb) => bb.union(seg_bb),
                None => seg_bb,
            });
        }
        bbox.unwrap_or(Rect::ZERO)
    }
}

fn translate_el(el: PathEl, v: Vec2) -> PathEl {
    match el {
        PathEl::MoveTo(p) => PathEl::MoveTo(p + v),
        PathEl::LineTo(p) => PathEl::LineTo(p + v),
        PathEl::QuadTo(c, p) => PathEl::QuadTo(c + v, p + v),
        PathEl::ConicTo(c, p, w) => PathEl::ConicTo(c + v, p + v, w),
        PathEl::CurveTo(c1, c2, p) => PathEl::CurveTo(c1 + v, c2 + v, p + v),
        PathEl::ClosePath => PathEl::ClosePath,
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Path")
            .field("verbs", &self.verbs)
            .field("points", &self.points)
            .field("fill_rule", &self.fill_rule)
            .finish_non_exhaustive()
    }
}

/// Iterator over a path's elements.
#[derive(Debug)]
pub struct Elements<'a> {
    path: &'a Path,
    verb_ix: usize,
    point_ix: usize,
    weight_ix: usize,
}

impl Iterator for Elements<'_> {
    type Item = PathEl;

    fn next(&mut self) -> Option<PathEl> {
        let verb = *self.path.verbs.get(self.verb_ix)?;
        self.verb_ix += 1;
        let pts = &self.path.points;
        let ix = self.point_ix;
        Some(match verb {
            Verb::MoveTo => {
                self.point_ix += 1;
                PathEl::MoveTo(pts[ix])
            }
            Verb::LineTo => {
                self.point_ix += 1;
                PathEl::LineTo(pts[ix])
            }
            Verb::QuadTo => {
                self.point_ix += 2;
                PathEl::QuadTo(pts[ix], pts[ix + 1])
            }
            Verb::ConicTo => {
                self.point_ix += 2;
                let w = self.path.conic_weights[self.weight_ix];
                self.weight_ix += 1;
                PathEl::ConicTo(pts[ix], pts[ix + 1], w)
            }
            Verb::CubicTo => {
                self.point_ix += 3;
                PathEl::CurveTo(pts[ix], pts[ix + 1], pts[ix + 2])
            }
            Verb::Close => PathEl::ClosePath,
        })
    }
}

impl Mul<PathEl> for Affine {
    type Output = PathEl;

    fn mul(self, other: PathEl) -> PathEl {
        match other {
            PathEl::MoveTo(p) => PathEl::MoveTo(self * p),
            PathEl::LineTo(p) => PathEl::LineTo(self * p),
            PathEl::QuadTo(c, p) => PathEl::QuadTo(self * c, self * p),
            PathEl::ConicTo(c, p, w) => PathEl::ConicTo(self * c, self * p, w),
            PathEl::CurveTo(c1, c2, p) => PathEl::CurveTo(self * c1, self * c2, self * p),
            PathEl::ClosePath => PathEl::ClosePath,
        }
    }
}

impl Mul<&Path> for Affine {
    type Output = Path;

    fn mul(self, other: &Path) -> Path {
        let mut path = other.clone();
        path.transform(self);
        path
    }
}

/// Convert an element stream into segments, resolving the current point.
///
/// The stream must not contain conic elements; lower them first with
/// [`flatten`](crate::flatten). A conic encountered here is treated as a
/// plain quadratic after a debug assertion.
pub(crate) fn segments(elements: impl Iterator<Item = PathEl>) -> impl Iterator<Item = PathSeg> {
    let mut start = Point::ORIGIN;
    let mut last = Point::ORIGIN;
    elements.filter_map(move |el| {
        let (seg, end) = match el {
            PathEl::MoveTo(p) => {
                start = p;
                last = p;
                return None;
            }
            PathEl::LineTo(p) => (PathSeg::Line(Line::new(last, p)), p),
            PathEl::QuadTo(c, p) => (PathSeg::Quad(QuadBez::new(last, c, p)), p),
            PathEl::ConicTo(c, p, _) => {
                debug_assert!(false, "conic reached segment iteration; flatten first");
                (PathSeg::Quad(QuadBez::new(last, c, p)), p)
            }
            PathEl::CurveTo(c1, c2, p) => (PathSeg::Cubic(CubicBez::new(last, c1, c2, p)), p),
            PathEl::ClosePath => {
                if last == start {
                    return None;
                }
                (PathSeg::Line(Line::new(last, start)), start)
            }
        };
        last = end;
        Some(seg)
    })
}

impl ParamCurve for PathSeg {
    fn eval(&self, t: f64) -> Point {
        match *self {
            PathSeg::Line(l) => l.eval(t),
            PathSeg::Quad(q) => q.eval(t),
            PathSeg::Cubic(c) => c.eval(t),
        }
    }

    fn subsegment(&self, range: std::ops::Range<f64>) -> PathSeg {
        match *self {
            PathSeg::Line(l) => PathSeg::Line(l.subsegment(range)),
            PathSeg::Quad(q) => PathSeg::Quad(q.subsegment(range)),
            PathSeg::Cubic(c) => PathSeg::Cubic(c.subsegment(range)),
        }
    }
}

impl ParamCurveArclen for PathSeg {
    fn arclen(&self, accuracy: f64) -> f64 {
        match *self {
            PathSeg::Line(l) => l.arclen(accuracy),
            PathSeg::Quad(q) => q.arclen(accuracy),
            PathSeg::Cubic(c) => c.arclen(accuracy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_before_move_is_rejected() {
        let mut path = Path::new();
        assert_eq!(path.line_to((1.0, 1.0)), Err(PathError::NoCurrentContour));
        assert_eq!(
            path.quad_to((1.0, 0.0), (1.0, 1.0)),
            Err(PathError::NoCurrentContour)
        );
        assert_eq!(
            path.conic_to((1.0, 0.0), (1.0, 1.0), 0.5),
            Err(PathError::NoCurrentContour)
        );
        assert_eq!(
            path.curve_to((0.0, 1.0), (1.0, 1.0), (1.0, 0.0)),
            Err(PathError::NoCurrentContour)
        );
        assert!(path.is_empty());
    }

    #[test]
    fn close_reopens_at_contour_start() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0)).unwrap();
        path.close();
        assert_eq!(path.current_point(), Some(Point::new(0.0, 0.0)));
        // A verb after close starts a fresh contour at the close point.
        path.line_to((5.0, 5.0)).unwrap();
        let els: Vec<_> = path.elements().collect();
        assert_eq!(els[3], PathEl::MoveTo(Point::new(0.0, 0.0)));
        assert_eq!(els[4], PathEl::LineTo(Point::new(5.0, 5.0)));
    }

    #[test]
    fn double_close_is_noop() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((1.0, 0.0)).unwrap();
        path.close();
        let n = path.verb_count();
        path.close();
        assert_eq!(path.verb_count(), n);
    }

    #[test]
    fn add_path_append_always_new_contour() {
        let mut a = Path::new();
        a.move_to((0.0, 0.0));
        a.line_to((10.0, 0.0)).unwrap();

        let mut b = Path::new();
        b.move_to((10.0, 0.0));
        b.line_to((10.0, 10.0)).unwrap();

        // Adjacent endpoints, yet Append starts a separate contour.
        a.add_path(&b, Vec2::ZERO, AddPathMode::Append);
        let moves = a.verbs().iter().filter(|v| **v == Verb::MoveTo).count();
        assert_eq!(moves, 2);
    }

    #[test]
    fn add_path_extend_no_duplicate_point() {
        let mut a = Path::new();
        a.move_to((0.0, 0.0));
        a.line_to((10.0, 0.0)).unwrap();

        let mut b = Path::new();
        b.move_to((5.0, 0.0));
        b.line_to((5.0, 10.0)).unwrap();

        // After offsetting by (5, 0), b starts exactly at a's last point.
        a.add_path(&b, (5.0, 0.0), AddPathMode::Extend);
        let moves = a.verbs().iter().filter(|v| **v == Verb::MoveTo).count();
        assert_eq!(moves, 1);
        assert_eq!(a.point_count(), 3);
        assert_eq!(a.current_point(), Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn add_path_extend_inserts_bridge_line() {
        let mut a = Path::new();
        a.move_to((0.0, 0.0));
        a.line_to((10.0, 0.0)).unwrap();

        let mut b = Path::new();
        b.move_to((20.0, 20.0));
        b.line_to((30.0, 20.0)).unwrap();

        a.add_path(&b, Vec2::ZERO, AddPathMode::Extend);
        let els: Vec<_> = a.elements().collect();
        assert_eq!(els[2], PathEl::LineTo(Point::new(20.0, 20.0)));
        let moves = a.verbs().iter().filter(|v| **v == Verb::MoveTo).count();
        assert_eq!(moves, 1);
    }

    #[test]
    fn rect_contour() {
        let mut path = Path::new();
        path.add_rect(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(
            path.verbs(),
            &[Verb::MoveTo, Verb::LineTo, Verb::LineTo, Verb::LineTo, Verb::Close]
        );
        assert_eq!(path.bounding_box(), Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn oval_tight_bounds() {
        let mut path = Path::new();
        path.add_oval(Rect::new(0.0, 0.0, 10.0, 6.0));
        let bb = path.tight_bounds(1e-4);
        assert!((bb.x0 - 0.0).abs() < 1e-3);
        assert!((bb.y0 - 0.0).abs() < 1e-3);
        assert!((bb.x1 - 10.0).abs() < 1e-3);
        assert!((bb.y1 - 6.0).abs() < 1e-3);
    }

    #[test]
    fn circle_points_on_radius() {
        let mut path = Path::new();
        path.add_circle((5.0, 5.0), 3.0);
        // Conic end points interpolate the circle exactly.
        for el in path.elements() {
            if let Some(p) = el.end_point() {
                if matches!(el, PathEl::ConicTo(..) | PathEl::MoveTo(_)) {
                    let r = p.distance(Point::new(5.0, 5.0));
                    assert!((r - 3.0).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn arc_contour_stays_on_circle() {
        use std::f64::consts::FRAC_PI_2;
        let mut path = Path::new();
        path.add_arc(Arc::new((5.0, 5.0), (3.0, 3.0), 0.0, FRAC_PI_2));
        let els: Vec<_> = path.elements().collect();
        assert_eq!(els[0], PathEl::MoveTo(Point::new(8.0, 5.0)));
        assert_eq!(els.len(), 2);
        let PathEl::ConicTo(_, end, w) = els[1] else {
            panic!("expected a conic, got {:?}", els[1]);
        };
        assert!((w - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!(end.distance(Point::new(5.0, 8.0)) < 1e-12);
        // The flattened half turn stays on the circle.
        let mut flat = Path::new();
        flat.add_arc(Arc::new((5.0, 5.0), (3.0, 3.0), 0.0, std::f64::consts::PI));
        for seg in segments(flatten_elements(flat.elements(), 1e-4)) {
            let r = seg.end().distance(Point::new(5.0, 5.0));
            assert!((r - 3.0).abs() < 1e-3);
        }
    }

    #[test]
    fn extend_with_arc_connects_with_a_line() {
        use std::f64::consts::FRAC_PI_2;
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.extend_with_arc(Arc::new((5.0, 5.0), (3.0, 3.0), 0.0, FRAC_PI_2))
            .unwrap();
        let els: Vec<_> = path.elements().collect();
        assert_eq!(els[1], PathEl::LineTo(Point::new(8.0, 5.0)));
        assert!(matches!(els[2], PathEl::ConicTo(..)));

        let mut path = Path::new();
        assert_eq!(
            path.extend_with_arc(Arc::new((0.0, 0.0), (1.0, 1.0), 0.0, 1.0)),
            Err(PathError::NoCurrentContour)
        );
    }

    #[test]
    fn transform_in_place() {
        let mut path = Path::new();
        path.move_to((1.0, 0.0));
        path.line_to((2.0, 0.0)).unwrap();
        path.transform(Affine::scale(2.0));
        assert_eq!(path.points(), &[Point::new(2.0, 0.0), Point::new(4.0, 0.0)]);
        assert_eq!(path.current_point(), Some(Point::new(4.0, 0.0)));
    }
}

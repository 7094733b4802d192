// Copyright 2026 the Kanvaso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expansion of stroked paths into fillable outlines.

use std::borrow::Borrow;
use std::f64::consts::PI;

use smallvec::SmallVec;

use crate::flatten::flatten_elements;
use crate::{
    Affine, Arc, CubicBez, Line, ParamCurve, ParamCurveArclen, ParamCurveDeriv, Path, PathEl,
    PathSeg, Point, Vec2,
};

/// Defines the connection between two segments of a stroke.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Join {
    /// A straight line connecting the segments.
    Bevel,
    /// The segments are extended to their natural intersection point, up to
    /// the miter limit.
    Miter,
    /// An arc between the segments.
    Round,
}

/// Defines the shape to be drawn at the ends of a stroke.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Cap {
    /// The stroke ends exactly at the endpoint.
    Flat,
    /// Rounded cap with radius equal to half the stroke width.
    Round,
    /// Square cap extending half the stroke width past the endpoint.
    Square,
    /// Pointed cap with its apex half the stroke width past the endpoint.
    Triangular,
}

/// Describes the visual style of a stroke.
#[derive(Clone, Debug)]
pub struct Stroke {
    /// Width of the stroke.
    pub width: f64,
    /// Style for connecting segments of the stroke.
    pub join: Join,
    /// Limit for miter joins, as the ratio of miter length to stroke width.
    ///
    /// Values below 1 behave as 1.
    pub miter_limit: f64,
    /// Style for capping the beginning of an open subpath.
    pub start_cap: Cap,
    /// Style for capping the end of an open subpath.
    pub end_cap: Cap,
    /// Lengths of dashes in alternating on/off order.
    pub dash_pattern: Dashes,
    /// Offset of the first dash.
    pub dash_offset: f64,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 1.0,
            join: Join::Miter,
            miter_limit: 4.0,
            start_cap: Cap::Flat,
            end_cap: Cap::Flat,
            dash_pattern: Default::default(),
            dash_offset: 0.0,
        }
    }
}

impl Stroke {
    /// Creates a new stroke with the specified width.
    pub fn new(width: f64) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    /// Builder method for setting the join style.
    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    /// Builder method for setting the limit for miter joins.
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = limit;
        self
    }

    /// Builder method for setting the cap style for the start of the stroke.
    pub fn with_start_cap(mut self, cap: Cap) -> Self {
        self.start_cap = cap;
        self
    }

    /// Builder method for setting the cap style for the end of the stroke.
    pub fn with_end_cap(mut self, cap: Cap) -> Self {
        self.end_cap = cap;
        self
    }

    /// Builder method for setting both cap styles.
    pub fn with_caps(mut self, cap: Cap) -> Self {
        self.start_cap = cap;
        self.end_cap = cap;
        self
    }

    /// Builder method for setting the dashing parameters.
    pub fn with_dashes<P>(mut self, offset: f64, pattern: P) -> Self
    where
        P: IntoIterator,
        P::Item: Borrow<f64>,
    {
        self.dash_offset = offset;
        self.dash_pattern.clear();
        self.dash_pattern
            .extend(pattern.into_iter().map(|dash| *dash.borrow()));
        self
    }
}

/// Collection of values representing lengths in a dash pattern.
pub type Dashes = SmallVec<[f64; 4]>;

/// Internal structure used for creating strokes.
#[derive(Default)]
struct StrokeCtx {
    output: Path,
    forward_path: Vec<PathEl>,
    backward_path: Vec<PathEl>,
    start_pt: Point,
    start_norm: Vec2,
    start_tan: Vec2,
    last_pt: Point,
    last_tan: Vec2,
    // if hypot < (hypot + dot) * join_thresh, omit join altogether
    join_thresh: f64,
    tolerance: f64,
    // a contour was opened but no geometry has been emitted for it yet
    dot_pending: bool,
}

/// Expand a stroke into a fill.
///
/// The result contains only move, line, cubic and close elements; quadratics
/// and conics in the input are lowered first. A width that is zero, negative
/// or not finite yields an empty path.
pub fn stroke(path: impl IntoIterator<Item = PathEl>, style: &Stroke, tolerance: f64) -> Path {
    if !style.width.is_finite() || style.width <= 0.0 {
        return Path::new();
    }
    let lowered = flatten_elements(path.into_iter(), tolerance);
    if style.dash_pattern.is_empty() || style.dash_pattern.iter().sum::<f64>() <= 0.0 {
        stroke_undashed(lowered, style, tolerance)
    } else {
        let dashed = DashIterator::new(lowered, style.dash_offset, &style.dash_pattern);
        stroke_undashed(dashed, style, tolerance)
    }
}

/// Version of stroke expansion for styles with no dashes.
fn stroke_undashed(
    path: impl IntoIterator<Item = PathEl>,
    style: &Stroke,
    tolerance: f64,
) -> Path {
    let mut ctx = StrokeCtx {
        join_thresh: 2.0 * tolerance / style.width,
        tolerance,
        ..Default::default()
    };
    for el in path {
        let p0 = ctx.last_pt;
        match el {
            PathEl::MoveTo(p) => {
                ctx.finish(style);
                ctx.start_pt = p;
                ctx.last_pt = p;
                ctx.dot_pending = true;
            }
            PathEl::LineTo(p1) => {
                if p1 != p0 {
                    let tangent = p1 - p0;
                    ctx.do_join(style, tangent);
                    ctx.last_tan = tangent;
                    ctx.do_line(style, tangent, p1);
                }
            }
            PathEl::QuadTo(..) | PathEl::ConicTo(..) => {
                unreachable!("quadratics and conics are lowered before stroking")
            }
            PathEl::CurveTo(p1, p2, p3) => {
                if p1 != p0 && p2 != p0 && p3 != p0 {
                    ctx.do_curve(style, CubicBez::new(p0, p1, p2, p3));
                }
            }
            PathEl::ClosePath => {
                if p0 != ctx.start_pt {
                    let tangent = ctx.start_pt - p0;
                    ctx.do_join(style, tangent);
                    ctx.last_tan = tangent;
                    ctx.do_line(style, tangent, ctx.start_pt);
                }
                ctx.finish_closed(style);
            }
        }
    }
    ctx.finish(style);
    ctx.output
}

fn round_cap(out: &mut Path, tolerance: f64, center: Point, norm: Vec2) {
    round_join(out, tolerance, center, norm, PI);
}

fn round_join(out: &mut Path, tolerance: f64, center: Point, norm: Vec2, angle: f64) {
    let a = Affine::new([norm.x, norm.y, -norm.y, norm.x, center.x, center.y]);
    let arc = Arc::new(Point::ORIGIN, (1.0, 1.0), PI - angle, angle);
    arc.to_cubic_beziers(tolerance, |p1, p2, p3| {
        out.push_el(PathEl::CurveTo(a * p1, a * p2, a * p3));
    });
}

fn round_join_rev(out: &mut Vec<PathEl>, tolerance: f64, center: Point, norm: Vec2, angle: f64) {
    let a = Affine::new([norm.x, norm.y, norm.y, -norm.x, center.x, center.y]);
    let arc = Arc::new(Point::ORIGIN, (1.0, 1.0), PI - angle, angle);
    arc.to_cubic_beziers(tolerance, |p1, p2, p3| {
        out.push(PathEl::CurveTo(a * p1, a * p2, a * p3));
    });
}

fn square_cap(out: &mut Path, close: bool, center: Point, norm: Vec2) {
    let a = Affine::new([norm.x, norm.y, -norm.y, norm.x, center.x, center.y]);
    out.push_el(PathEl::LineTo(a * Point::new(1.0, 1.0)));
    out.push_el(PathEl::LineTo(a * Point::new(-1.0, 1.0)));
    if close {
        out.push_el(PathEl::ClosePath);
    } else {
        out.push_el(PathEl::LineTo(a * Point::new(-1.0, 0.0)));
    }
}

fn triangular_cap(out: &mut Path, close: bool, center: Point, norm: Vec2) {
    let a = Affine::new([norm.x, norm.y, -norm.y, norm.x, center.x, center.y]);
    out.push_el(PathEl::LineTo(a * Point::new(0.0, 1.0)));
    if close {
        out.push_el(PathEl::ClosePath);
    } else {
        out.push_el(PathEl::LineTo(a * Point::new(-1.0, 0.0)));
    }
}

fn extend_reversed(out: &mut Path, elements: &[PathEl]) {
    for i in (1..elements.len()).rev() {
        let end = elements[i - 1].end_point().unwrap();
        match elements[i] {
            PathEl::LineTo(_) => out.push_el(PathEl::LineTo(end)),
            PathEl::CurveTo(p1, p2, _) => out.push_el(PathEl::CurveTo(p2, p1, end)),
            _ => unreachable!(),
        }
    }
}

impl StrokeCtx {
    /// Append forward and backward paths to output, capping the ends.
    fn finish(&mut self, style: &Stroke) {
        if self.forward_path.is_empty() {
            if self.dot_pending {
                self.emit_dot(style);
            }
            return;
        }
        self.dot_pending = false;
        for el in &self.forward_path {
            self.output.push_el(*el);
        }
        let return_p = self.backward_path.last().unwrap().end_point().unwrap();
        let d = self.last_pt - return_p;
        match style.end_cap {
            Cap::Flat => self.output.push_el(PathEl::LineTo(return_p)),
            Cap::Round => round_cap(&mut self.output, self.tolerance, self.last_pt, d),
            Cap::Square => square_cap(&mut self.output, false, self.last_pt, d),
            Cap::Triangular => triangular_cap(&mut self.output, false, self.last_pt, d),
        }
        extend_reversed(&mut self.output, &self.backward_path);
        match style.start_cap {
            Cap::Flat => self.output.push_el(PathEl::ClosePath),
            Cap::Round => round_cap(
                &mut self.output,
                self.tolerance,
                self.start_pt,
                self.start_norm,
            ),
            Cap::Square => square_cap(&mut self.output, true, self.start_pt, self.start_norm),
            Cap::Triangular => {
                triangular_cap(&mut self.output, true, self.start_pt, self.start_norm);
            }
        }

        self.forward_path.clear();
        self.backward_path.clear();
    }

    /// Finish a closed contour: the outer and inner sides become separate
    /// subpaths with opposite winding, so the nonzero fill leaves the ring.
    fn finish_closed(&mut self, style: &Stroke) {
        if self.forward_path.is_empty() {
            if self.dot_pending {
                self.emit_dot(style);
            }
            return;
        }
        self.dot_pending = false;
        self.do_join(style, self.start_tan);
        for el in &self.forward_path {
            self.output.push_el(*el);
        }
        self.output.push_el(PathEl::ClosePath);
        let last_pt = self.backward_path.last().unwrap().end_point().unwrap();
        self.output.push_el(PathEl::MoveTo(last_pt));
        extend_reversed(&mut self.output, &self.backward_path);
        self.output.push_el(PathEl::ClosePath);
        self.forward_path.clear();
        self.backward_path.clear();
    }

    /// A contour with no geometry: round caps on both ends produce a dot of
    /// the stroke width; any other cap combination produces nothing.
    fn emit_dot(&mut self, style: &Stroke) {
        self.dot_pending = false;
        if style.start_cap != Cap::Round || style.end_cap != Cap::Round {
            return;
        }
        let r = 0.5 * style.width;
        self.output
            .push_el(PathEl::MoveTo(self.start_pt + Vec2::new(r, 0.0)));
        let arc = Arc::new(self.start_pt, (r, r), 0.0, 2.0 * PI);
        let out = &mut self.output;
        arc.to_cubic_beziers(self.tolerance, |p1, p2, p3| {
            out.push_el(PathEl::CurveTo(p1, p2, p3));
        });
        self.output.push_el(PathEl::ClosePath);
    }

    fn do_join(&mut self, style: &Stroke, tan0: Vec2) {
        let scale = 0.5 * style.width / tan0.hypot();
        let norm = scale * tan0.turn_90();
        let p0 = self.last_pt;
        if self.forward_path.is_empty() {
            self.forward_path.push(PathEl::MoveTo(p0 - norm));
            self.backward_path.push(PathEl::MoveTo(p0 + norm));
            self.start_tan = tan0;
            self.start_norm = norm;
        } else {
            let ab = self.last_tan;
            let cd = tan0;
            let cross = ab.cross(cd);
            let dot = ab.dot(cd);
            let hypot = cross.hypot(dot);
            if cross.abs() >= hypot * self.join_thresh {
                match style.join {
                    Join::Bevel => {
                        self.forward_path.push(PathEl::LineTo(p0 - norm));
                        self.backward_path.push(PathEl::LineTo(p0 + norm));
                    }
                    Join::Miter => {
                        let limit = style.miter_limit.max(1.0);
                        if 2.0 * hypot < (hypot + dot) * limit * limit {
                            let last_scale = 0.5 * style.width / ab.hypot();
                            let last_norm = last_scale * ab.turn_90();
                            if cross > 0.0 {
                                let fp_last = p0 - last_norm;
                                let fp_this = p0 - norm;
                                let h = ab.cross(fp_this - fp_last) / cross;
                                let miter_pt = fp_this - cd * h;
                                self.forward_path.push(PathEl::LineTo(miter_pt));
                            } else if cross < 0.0 {
                                let fp_last = p0 + last_norm;
                                let fp_this = p0 + norm;
                                let h = ab.cross(fp_this - fp_last) / cross;
                                let miter_pt = fp_this - cd * h;
                                self.backward_path.push(PathEl::LineTo(miter_pt));
                            }
                        }
                        self.forward_path.push(PathEl::LineTo(p0 - norm));
                        self.backward_path.push(PathEl::LineTo(p0 + norm));
                    }
                    Join::Round => {
                        let angle = cross.atan2(dot);
                        if cross > 0.0 {
                            self.backward_path.push(PathEl::LineTo(p0 + norm));
                            round_join_fwd(
                                &mut self.forward_path,
                                self.tolerance,
                                p0,
                                norm,
                                angle,
                            );
                        } else {
                            self.forward_path.push(PathEl::LineTo(p0 - norm));
                            round_join_rev(
                                &mut self.backward_path,
                                self.tolerance,
                                p0,
                                -norm,
                                -angle,
                            );
                        }
                    }
                }
            }
        }
    }

    fn do_line(&mut self, style: &Stroke, tangent: Vec2, p1: Point) {
        let scale = 0.5 * style.width / tangent.hypot();
        let norm = scale * tangent.turn_90();
        self.forward_path.push(PathEl::LineTo(p1 - norm));
        self.backward_path.push(PathEl::LineTo(p1 + norm));
        self.last_pt = p1;
    }

    fn do_curve(&mut self, style: &Stroke, c: CubicBez) {
        let (tan0, tan1) = c.tangents();
        self.do_join(style, tan0);
        self.last_tan = tan1;
        offset_cubic(c, -0.5 * style.width, self.tolerance, &mut self.forward_path);
        offset_cubic(c, 0.5 * style.width, self.tolerance, &mut self.backward_path);
        self.last_pt = c.p3;
    }
}

fn round_join_fwd(out: &mut Vec<PathEl>, tolerance: f64, center: Point, norm: Vec2, angle: f64) {
    let a = Affine::new([norm.x, norm.y, -norm.y, norm.x, center.x, center.y]);
    let arc = Arc::new(Point::ORIGIN, (1.0, 1.0), PI - angle, angle);
    arc.to_cubic_beziers(tolerance, |p1, p2, p3| {
        out.push(PathEl::CurveTo(a * p1, a * p2, a * p3));
    });
}

const MAX_OFFSET_DEPTH: usize = 10;

/// Append the offset of `c` at signed distance `d` as cubic elements.
///
/// Each subdivided piece is offset by displacing its control polygon, with
/// the interior control points found by intersecting the offset legs
/// (Tiller and Hanson's construction). The piece is accepted when probes at
/// three interior parameters are within `tolerance` of the true offset.
fn offset_cubic(c: CubicBez, d: f64, tolerance: f64, out: &mut Vec<PathEl>) {
    offset_cubic_rec(c, d, tolerance, MAX_OFFSET_DEPTH, out);
}

fn offset_cubic_rec(c: CubicBez, d: f64, tolerance: f64, depth: usize, out: &mut Vec<PathEl>) {
    let approx = offset_approx(c, d);
    if depth == 0 || offset_err(c, approx, d) <= tolerance {
        out.push(PathEl::CurveTo(approx.p1, approx.p2, approx.p3));
    } else {
        let (c0, c1) = c.subdivide();
        offset_cubic_rec(c0, d, tolerance, depth - 1, out);
        offset_cubic_rec(c1, d, tolerance, depth - 1, out);
    }
}

/// Single-cubic offset approximation via the control polygon.
fn offset_approx(c: CubicBez, d: f64) -> CubicBez {
    let (tan0, tan1) = c.tangents();
    let leg0 = c.p1 - c.p0;
    let leg1 = c.p2 - c.p1;
    let leg2 = c.p3 - c.p2;
    let n0 = d * leg_dir(leg0, tan0).turn_90();
    let n1 = d * leg_dir(leg1, tan0 + tan1).turn_90();
    let n2 = d * leg_dir(leg2, tan1).turn_90();
    let p0 = c.p0 + n0;
    let p3 = c.p3 + n2;
    let p1 = intersect(c.p0 + n0, leg0, c.p1 + n1, leg1).unwrap_or(c.p1 + n0);
    let p2 = intersect(c.p1 + n1, leg1, c.p2 + n2, leg2).unwrap_or(c.p2 + n2);
    CubicBez::new(p0, p1, p2, p3)
}

/// A unit direction for a control polygon leg, with a fallback for
/// degenerate legs.
fn leg_dir(leg: Vec2, fallback: Vec2) -> Vec2 {
    let v = if leg.hypot2() > f64::EPSILON {
        leg
    } else if fallback.hypot2() > f64::EPSILON {
        fallback
    } else {
        Vec2::new(1.0, 0.0)
    };
    v.normalize()
}

/// Intersection of the lines through `p` along `dp` and through `q` along
/// `dq`, or `None` when they are (nearly) parallel.
fn intersect(p: Point, dp: Vec2, q: Point, dq: Vec2) -> Option<Point> {
    let det = dp.cross(dq);
    if det.abs() * det.abs() < 1e-12 * dp.hypot2() * dq.hypot2() {
        return None;
    }
    let t = (q - p).cross(dq) / det;
    Some(p + t * dp)
}

/// Largest deviation of the approximation from the true offset, probed at
/// three interior parameters. The deviation is largest away from the
/// endpoints, which are exact by construction.
fn offset_err(c: CubicBez, approx: CubicBez, d: f64) -> f64 {
    let deriv = c.deriv();
    let mut err = 0.0_f64;
    for t in [0.25, 0.5, 0.75] {
        let tangent = deriv.eval(t).to_vec2();
        if tangent.hypot2() <= f64::EPSILON {
            continue;
        }
        let exact = c.eval(t) + d * tangent.normalize().turn_90();
        err = err.max(approx.eval(t).distance(exact));
    }
    err
}

/// Iterator rewriting an element stream into its dashed form.
struct DashIterator<'a, T> {
    inner: T,
    input_done: bool,
    closepath_pending: bool,
    dashes: &'a [f64],
    dash_ix: usize,
    init_dash_ix: usize,
    init_dash_remaining: f64,
    init_is_active: bool,
    is_active: bool,
    state: DashState,
    current_seg: PathSeg,
    t: f64,
    dash_remaining: f64,
    seg_remaining: f64,
    start_pt: Point,
    last_pt: Point,
    stash: Vec<PathEl>,
    stash_ix: usize,
}

#[derive(PartialEq, Eq)]
enum DashState {
    NeedInput,
    ToStash,
    Working,
    FromStash,
}

impl<T: Iterator<Item = PathEl>> Iterator for DashIterator<'_, T> {
    type Item = PathEl;

    fn next(&mut self) -> Option<PathEl> {
        loop {
            match self.state {
                DashState::NeedInput => {
                    if self.input_done {
                        return None;
                    }
                    self.get_input();
                    if self.input_done {
                        return None;
                    }
                    self.state = DashState::ToStash;
                }
                DashState::ToStash => {
                    if let Some(el) = self.step() {
                        self.stash.push(el);
                    }
                }
                DashState::Working => {
                    if let Some(el) = self.step() {
                        return Some(el);
                    }
                }
                DashState::FromStash => {
                    if let Some(el) = self.stash.get(self.stash_ix) {
                        self.stash_ix += 1;
                        return Some(*el);
                    } else {
                        self.stash.clear();
                        self.stash_ix = 0;
                        if self.input_done {
                            return None;
                        }
                        if self.closepath_pending {
                            self.closepath_pending = false;
                            self.state = DashState::NeedInput;
                        } else {
                            self.state = DashState::ToStash;
                        }
                    }
                }
            }
        }
    }
}

fn seg_to_el(el: &PathSeg) -> PathEl {
    match el {
        PathSeg::Line(l) => PathEl::LineTo(l.p1),
        PathSeg::Quad(q) => PathEl::QuadTo(q.p1, q.p2),
        PathSeg::Cubic(c) => PathEl::CurveTo(c.p1, c.p2, c.p3),
    }
}

const DASH_ACCURACY: f64 = 1e-6;

impl<'a, T: Iterator<Item = PathEl>> DashIterator<'a, T> {
    fn new(inner: T, dash_offset: f64, dashes: &'a [f64]) -> Self {
        let mut dash_ix = 0;
        let mut residue = dash_offset.max(0.0);
        let mut is_active = true;
        // Find place in dashes array for initial offset. The caller
        // guarantees the pattern has positive total length.
        loop {
            let dash_len = dashes[dash_ix];
            if residue < dash_len {
                break;
            }
            residue -= dash_len;
            dash_ix = (dash_ix + 1) % dashes.len();
            is_active = !is_active;
        }
        // Length until the first on/off transition.
        let dash_remaining = dashes[dash_ix] - residue;
        DashIterator {
            inner,
            input_done: false,
            closepath_pending: false,
            dashes,
            dash_ix,
            init_dash_ix: dash_ix,
            init_dash_remaining: dash_remaining,
            init_is_active: is_active,
            is_active,
            state: DashState::NeedInput,
            current_seg: PathSeg::Line(Line::new(Point::ORIGIN, Point::ORIGIN)),
            t: 0.0,
            dash_remaining,
            seg_remaining: 0.0,
            start_pt: Point::ORIGIN,
            last_pt: Point::ORIGIN,
            stash: Vec::new(),
            stash_ix: 0,
        }
    }

    fn get_input(&mut self) {
        loop {
            if self.closepath_pending {
                self.handle_closepath();
                break;
            }
            let Some(next_el) = self.inner.next() else {
                self.input_done = true;
                self.state = DashState::FromStash;
                return;
            };
            let p0 = self.last_pt;
            match next_el {
                PathEl::MoveTo(p) => {
                    if !self.stash.is_empty() {
                        self.state = DashState::FromStash;
                    }
                    self.start_pt = p;
                    self.last_pt = p;
                    self.reset_phase();
                    continue;
                }
                PathEl::LineTo(p1) => {
                    let l = Line::new(p0, p1);
                    self.seg_remaining = l.arclen(DASH_ACCURACY);
                    self.current_seg = PathSeg::Line(l);
                    self.last_pt = p1;
                }
                PathEl::QuadTo(..) | PathEl::ConicTo(..) => {
                    unreachable!("quadratics and conics are lowered before dashing")
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    let c = CubicBez::new(p0, p1, p2, p3);
                    self.seg_remaining = c.arclen(DASH_ACCURACY);
                    self.current_seg = PathSeg::Cubic(c);
                    self.last_pt = p3;
                }
                PathEl::ClosePath => {
                    self.closepath_pending = true;
                    if p0 != self.start_pt {
                        let l = Line::new(p0, self.start_pt);
                        self.seg_remaining = l.arclen(DASH_ACCURACY);
                        self.current_seg = PathSeg::Line(l);
                        self.last_pt = self.start_pt;
                    } else {
                        self.handle_closepath();
                    }
                }
            }
            break;
        }
        self.t = 0.0;
    }

    /// Move arc length forward to next event.
    fn step(&mut self) -> Option<PathEl> {
        let mut result = None;
        if self.state == DashState::ToStash && self.stash.is_empty() {
            if self.is_active {
                result = Some(PathEl::MoveTo(self.current_seg.start()));
            } else {
                self.state = DashState::Working;
            }
        } else if self.dash_remaining < self.seg_remaining {
            // next transition is a dash transition
            let seg = self.current_seg.subsegment(self.t..1.0);
            let t1 = seg.inv_arclen(self.dash_remaining, DASH_ACCURACY);
            if self.is_active {
                let subseg = seg.subsegment(0.0..t1);
                result = Some(seg_to_el(&subseg));
                self.state = DashState::Working;
            } else {
                let p = seg.eval(t1);
                result = Some(PathEl::MoveTo(p));
            }
            self.is_active = !self.is_active;
            self.t += t1 * (1.0 - self.t);
            self.seg_remaining -= self.dash_remaining;
            self.dash_ix += 1;
            if self.dash_ix == self.dashes.len() {
                self.dash_ix = 0;
            }
            self.dash_remaining = self.dashes[self.dash_ix];
        } else {
            if self.is_active {
                let seg = self.current_seg.subsegment(self.t..1.0);
                result = Some(seg_to_el(&seg));
            }
            self.dash_remaining -= self.seg_remaining;
            self.get_input();
        }
        result
    }

    fn handle_closepath(&mut self) {
        if self.state == DashState::ToStash {
            // Have looped back without breaking a dash, just play it back
            self.stash.push(PathEl::ClosePath);
        } else if self.is_active {
            // connect with path in stash, skip MoveTo.
            self.stash_ix = 1;
        }
        self.state = DashState::FromStash;
        self.reset_phase();
    }

    /// The dash phase restarts at each subpath.
    fn reset_phase(&mut self) {
        self.dash_ix = self.init_dash_ix;
        self.dash_remaining = self.init_dash_remaining;
        self.is_active = self.init_is_active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;

    fn line_path() -> Path {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((100.0, 0.0)).unwrap();
        path
    }

    fn assert_rect_close(r: Rect, expected: Rect, tol: f64) {
        assert!(
            (r.x0 - expected.x0).abs() < tol
                && (r.y0 - expected.y0).abs() < tol
                && (r.x1 - expected.x1).abs() < tol
                && (r.y1 - expected.y1).abs() < tol,
            "{r:?} != {expected:?}"
        );
    }

    fn endpoints(path: &Path) -> Vec<Point> {
        path.elements().filter_map(|el| el.end_point()).collect()
    }

    fn count_moves(path: &Path) -> usize {
        path.elements()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count()
    }

    #[test]
    fn invalid_width_yields_empty() {
        let mut rect_path = Path::new();
        rect_path.add_rect(Rect::new(0.0, 0.0, 50.0, 50.0));
        for width in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let style = Stroke::new(width);
            assert_eq!(stroke(line_path().elements(), &style, 1e-3).verb_count(), 0);
            assert_eq!(stroke(rect_path.elements(), &style, 1e-3).verb_count(), 0);
        }
    }

    #[test]
    fn flat_caps_bounds() {
        let out = stroke(line_path().elements(), &Stroke::new(10.0), 1e-3);
        assert_rect_close(out.bounding_box(), Rect::new(0.0, -5.0, 100.0, 5.0), 1e-9);
    }

    #[test]
    fn square_caps_extend() {
        let style = Stroke::new(10.0).with_caps(Cap::Square);
        let out = stroke(line_path().elements(), &style, 1e-3);
        assert_rect_close(out.bounding_box(), Rect::new(-5.0, -5.0, 105.0, 5.0), 1e-9);
    }

    #[test]
    fn triangular_cap_apex() {
        let style = Stroke::new(10.0).with_end_cap(Cap::Triangular);
        let out = stroke(line_path().elements(), &style, 1e-3);
        assert_rect_close(out.bounding_box(), Rect::new(0.0, -5.0, 105.0, 5.0), 1e-9);
        let apex = Point::new(105.0, 0.0);
        assert!(endpoints(&out).iter().any(|p| p.distance(apex) < 1e-9));
    }

    #[test]
    fn round_caps_bounds() {
        let style = Stroke::new(10.0).with_caps(Cap::Round);
        let out = stroke(line_path().elements(), &style, 1e-3);
        assert_rect_close(
            out.tight_bounds(1e-4),
            Rect::new(-5.0, -5.0, 105.0, 5.0),
            5e-3,
        );
    }

    #[test]
    fn miter_join_and_limit_fallback() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((100.0, 0.0)).unwrap();
        path.line_to((100.0, 100.0)).unwrap();
        let miter_pt = Point::new(110.0, -10.0);

        // A right angle needs a miter ratio of sqrt(2).
        let style = Stroke::new(20.0).with_join(Join::Miter).with_miter_limit(4.0);
        let out = stroke(path.elements(), &style, 1e-3);
        assert!(endpoints(&out).iter().any(|p| p.distance(miter_pt) < 1e-9));

        let style = Stroke::new(20.0).with_join(Join::Miter).with_miter_limit(1.2);
        let out = stroke(path.elements(), &style, 1e-3);
        assert!(!endpoints(&out).iter().any(|p| p.distance(miter_pt) < 1e-9));

        // Over the limit the output is exactly the bevel geometry.
        let bevel_style = Stroke::new(20.0).with_join(Join::Bevel);
        let bevel = stroke(path.elements(), &bevel_style, 1e-3);
        assert_eq!(
            out.elements().collect::<Vec<_>>(),
            bevel.elements().collect::<Vec<_>>()
        );
    }

    #[test]
    fn quads_and_conics_are_lowered_before_expansion() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.quad_to((50.0, 50.0), (100.0, 0.0)).unwrap();
        path.conic_to((150.0, -50.0), (200.0, 0.0), 2.0).unwrap();

        let out = stroke(path.elements(), &Stroke::new(10.0), 1e-3);
        assert!(out.verb_count() > 0);
        assert!(out
            .elements()
            .all(|el| !matches!(el, PathEl::QuadTo(..) | PathEl::ConicTo(..))));

        // The dashed input arm lowers the same way.
        let style = Stroke::new(10.0).with_dashes(0.0, [20.0, 10.0]);
        let out = stroke(path.elements(), &style, 1e-3);
        assert!(out.verb_count() > 0);
    }

    #[test]
    fn closed_contour_has_two_subpaths() {
        let mut path = Path::new();
        path.add_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        let out = stroke(path.elements(), &Stroke::new(10.0), 1e-3);
        assert_eq!(count_moves(&out), 2);
        assert_rect_close(
            out.bounding_box(),
            Rect::new(-5.0, -5.0, 105.0, 105.0),
            1e-9,
        );
    }

    #[test]
    fn curve_offset_within_tolerance() {
        // Stroke a quarter circle approximation and verify the offsets stay
        // within tolerance of concentric circles.
        let mut path = Path::new();
        path.move_to((100.0, 0.0));
        path.conic_to(
            (100.0, 100.0),
            (0.0, 100.0),
            std::f64::consts::FRAC_1_SQRT_2,
        )
        .unwrap();
        let tolerance = 1e-3;
        let out = stroke(path.elements(), &Stroke::new(20.0), tolerance);
        for p in endpoints(&out) {
            let r = p.distance(Point::ORIGIN);
            let inner = (r - 90.0).abs();
            let outer = (r - 110.0).abs();
            // Cap edges touch both circles; every on-curve point is near one.
            assert!(
                inner < 0.5 || outer < 0.5,
                "point {p:?} at radius {r} is on neither offset"
            );
        }
    }

    #[test]
    fn dashed_line_contours() {
        let style = Stroke::new(2.0).with_dashes(0.0, [10.0, 10.0]);
        let out = stroke(line_path().elements(), &style, 1e-3);
        // Dashes at [0,10), [20,30), [40,50), [60,70), [80,90): five contours.
        assert_eq!(count_moves(&out), 5);
    }

    #[test]
    fn dash_offset_shifts_pattern() {
        let style = Stroke::new(2.0).with_dashes(15.0, [10.0, 10.0]);
        let out = stroke(line_path().elements(), &style, 1e-3);
        // Phase starts 5 units into the gap, so the first dash begins at 5
        // and nothing touches the origin.
        assert_eq!(count_moves(&out), 5);
        let bounds = out.bounding_box();
        assert!((bounds.x0 - 5.0).abs() < 1e-6, "{bounds:?}");
    }

    #[test]
    fn uneven_dash_pattern() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((45.0, 0.0)).unwrap();
        let style = Stroke::new(2.0).with_dashes(0.0, [10.0, 5.0]);
        let out = stroke(path.elements(), &style, 1e-3);
        // On-spans at [0,10), [15,25), [30,40).
        assert_eq!(count_moves(&out), 3);
    }

    #[test]
    fn empty_dash_pattern_is_solid() {
        let style = Stroke::new(10.0).with_dashes(0.0, [] as [f64; 0]);
        let out = stroke(line_path().elements(), &style, 1e-3);
        assert_rect_close(out.bounding_box(), Rect::new(0.0, -5.0, 100.0, 5.0), 1e-9);
    }

    #[test]
    fn point_contour_round_caps_make_dot() {
        let mut path = Path::new();
        path.move_to((50.0, 50.0));
        let style = Stroke::new(10.0).with_caps(Cap::Round);
        let out = stroke(path.elements(), &style, 1e-3);
        assert_rect_close(
            out.tight_bounds(1e-4),
            Rect::new(45.0, 45.0, 55.0, 55.0),
            5e-3,
        );

        let out = stroke(path.elements(), &Stroke::new(10.0), 1e-3);
        assert_eq!(out.elements().count(), 0);
    }
}

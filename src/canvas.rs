// Copyright 2026 the Kanvaso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A canvas with a save/restore stack, recording into a display list.

use tracing::trace;

use crate::flatten::flatten;
use crate::render::{DisplayList, FillCommand, Renderer};
use crate::stroke::{stroke, Stroke};
use crate::{Affine, Arc, Color, FillRule, Path, Point, Rect, RoundedRect, DEFAULT_TOLERANCE};

/// How a clip shape combines with the existing clip region.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ClipOp {
    /// Subtract the shape from the clip region.
    Difference,
    /// Intersect the clip region with the shape.
    Intersect,
}

/// One recorded clip: a device-space shape, an op and an anti-alias flag.
///
/// The path contains only move, line, cubic and close elements.
#[derive(Clone, Debug)]
pub struct ClipRecord {
    /// Device-space clip shape.
    pub path: Path,
    /// How the shape combines with the clip region established so far.
    pub op: ClipOp,
    /// Whether the rasterizer should anti-alias the clip edge.
    pub anti_alias: bool,
}

/// Whether geometry is filled, stroked, or both.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum PaintStyle {
    /// Fill the interior of the shape.
    #[default]
    Fill,
    /// Stroke the outline of the shape.
    Stroke,
    /// Fill the interior, then stroke the outline on top.
    StrokeAndFill,
}

/// Describes how geometry is drawn: color, style and stroke parameters.
#[derive(Clone, Debug, Default)]
pub struct Paint {
    /// Solid color.
    pub color: Color,
    /// Fill, stroke, or both.
    pub style: PaintStyle,
    /// Stroke parameters, used by the stroking styles.
    pub stroke: Stroke,
}

impl Paint {
    /// A fill paint with the given color.
    pub fn fill(color: Color) -> Paint {
        Paint {
            color,
            ..Default::default()
        }
    }

    /// A stroke paint with the given color and stroke parameters.
    pub fn stroke(color: Color, stroke: Stroke) -> Paint {
        Paint {
            color,
            style: PaintStyle::Stroke,
            stroke,
        }
    }

    /// Builder method for setting the style.
    pub fn with_style(mut self, style: PaintStyle) -> Paint {
        self.style = style;
        self
    }
}

/// How [`Canvas::draw_points`] interprets its point list.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PointMode {
    /// Each point becomes a dot of the paint's stroke width.
    Points,
    /// Consecutive pairs become independent line segments.
    Lines,
    /// The points become one connected polyline.
    Polygon,
}

/// One level of canvas state: a transform and the clips pushed at this level.
#[derive(Clone, Debug)]
struct Frame {
    transform: Affine,
    clips: Vec<ClipRecord>,
}

impl Frame {
    fn base() -> Frame {
        Frame {
            transform: Affine::IDENTITY,
            clips: Vec::new(),
        }
    }
}

/// A drawing surface with a save/restore stack of transform and clip state.
///
/// Draws are recorded into a [`DisplayList`] and handed to a [`Renderer`]
/// by [`flush`](Canvas::flush), typically once per frame. All geometry in
/// the recorded commands is in device space with stroking already expanded.
#[derive(Clone, Debug)]
pub struct Canvas {
    frames: Vec<Frame>,
    list: DisplayList,
    tolerance: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::new()
    }
}

impl Canvas {
    /// A new canvas with an identity transform, no clips and the
    /// [default tolerance](crate::DEFAULT_TOLERANCE).
    pub fn new() -> Canvas {
        Canvas::with_tolerance(DEFAULT_TOLERANCE)
    }

    /// A new canvas with an explicit geometric tolerance.
    pub fn with_tolerance(tolerance: f64) -> Canvas {
        Canvas {
            frames: vec![Frame::base()],
            list: DisplayList::new(),
            tolerance,
        }
    }

    fn top(&self) -> &Frame {
        // The base frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Frame {
        let ix = self.frames.len() - 1;
        &mut self.frames[ix]
    }

    /// Push a copy of the current state.
    ///
    /// Returns the stack depth before the push, not after, so that
    /// `restore_to_count(save())` restores exactly the state saved here.
    pub fn save(&mut self) -> usize {
        let count = self.frames.len();
        let top = self.top().clone();
        self.frames.push(top);
        count
    }

    /// Push a layer boundary; equivalent to [`save`](Canvas::save).
    ///
    /// Layers are not composited separately here, so the bounds and paint
    /// are unused and the call only saves state.
    pub fn save_layer(&mut self, _bounds: Option<Rect>, _paint: &Paint) -> usize {
        self.save()
    }

    /// Pop the current state, discarding transform and clip changes made
    /// since the matching [`save`](Canvas::save).
    ///
    /// Restoring past the base state is a no-op.
    pub fn restore(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Pop states until the depth is `count`, clamped to the base state.
    pub fn restore_to_count(&mut self, count: usize) {
        while self.frames.len() > count && self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// The current stack depth. A fresh canvas reports 1.
    pub fn save_count(&self) -> usize {
        self.frames.len()
    }

    /// The current transform from local to device space.
    pub fn transform(&self) -> Affine {
        self.top().transform
    }

    /// Concatenate `transform` onto the current one, mapping new local
    /// coordinates through it first.
    pub fn concat(&mut self, transform: Affine) {
        let top = self.top_mut();
        top.transform *= transform;
    }

    /// Translate the local coordinate system.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.concat(Affine::translate((dx, dy)));
    }

    /// Scale the local coordinate system.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.concat(Affine::scale_non_uniform(sx, sy));
    }

    /// Rotate the local coordinate system by `radians` about its origin.
    pub fn rotate(&mut self, radians: f64) {
        self.concat(Affine::rotate(radians));
    }

    /// Rotate the local coordinate system by `radians` about `center`.
    pub fn rotate_about(&mut self, radians: f64, center: impl Into<Point>) {
        self.concat(Affine::rotate_about(radians, center.into()));
    }

    /// Skew the local coordinate system.
    pub fn skew(&mut self, sx: f64, sy: f64) {
        self.concat(Affine::skew(sx, sy));
    }

    /// Replace the current transform.
    pub fn set_transform(&mut self, transform: Affine) {
        self.top_mut().transform = transform;
    }

    /// Reset the current transform to identity.
    pub fn reset_transform(&mut self) {
        self.set_transform(Affine::IDENTITY);
    }

    /// Clip by a rectangle.
    pub fn clip_rect(&mut self, rect: Rect, op: ClipOp, anti_alias: bool) {
        let mut path = Path::new();
        path.add_rect(rect);
        self.clip_path(&path, op, anti_alias);
    }

    /// Clip by a rounded rectangle.
    pub fn clip_round_rect(&mut self, rr: RoundedRect, op: ClipOp, anti_alias: bool) {
        let mut path = Path::new();
        path.add_round_rect(rr);
        self.clip_path(&path, op, anti_alias);
    }

    /// Clip by an arbitrary path.
    ///
    /// The shape is captured in device space at the current transform;
    /// later transform changes do not move it.
    pub fn clip_path(&mut self, path: &Path, op: ClipOp, anti_alias: bool) {
        let tolerance = self.tolerance;
        let device = self.transform() * path;
        let record = ClipRecord {
            path: flatten(&device, tolerance),
            op,
            anti_alias,
        };
        self.top_mut().clips.push(record);
    }

    /// All clips currently in effect, outermost first.
    fn effective_clip(&self) -> Vec<ClipRecord> {
        self.frames
            .iter()
            .flat_map(|frame| frame.clips.iter().cloned())
            .collect()
    }

    /// Draw a path with the given paint.
    ///
    /// Empty paths, transparent paints and degenerate stroke widths record
    /// nothing.
    pub fn draw_path(&mut self, path: &Path, paint: &Paint) {
        if path.is_empty() || paint.color.is_transparent() {
            return;
        }
        let device = self.transform() * path;
        match paint.style {
            PaintStyle::Fill => self.record_fill(&device, paint),
            PaintStyle::Stroke => self.record_stroke(&device, paint),
            PaintStyle::StrokeAndFill => {
                self.record_fill(&device, paint);
                self.record_stroke(&device, paint);
            }
        }
    }

    fn record_fill(&mut self, device: &Path, paint: &Paint) {
        let outline = flatten(device, self.tolerance);
        self.record(outline, device.fill_rule(), paint.color);
    }

    fn record_stroke(&mut self, device: &Path, paint: &Paint) {
        let outline = stroke(device.elements(), &paint.stroke, self.tolerance);
        // Stroke outlines always fill under the nonzero rule.
        self.record(outline, FillRule::NonZero, paint.color);
    }

    fn record(&mut self, path: Path, fill_rule: FillRule, color: Color) {
        if path.is_empty() {
            return;
        }
        trace!(
            commands = self.list.len(),
            ?fill_rule,
            points = path.point_count(),
            "record fill"
        );
        self.list.push(FillCommand {
            path,
            fill_rule,
            color,
            clip: self.effective_clip(),
        });
    }

    /// Draw a rectangle.
    pub fn draw_rect(&mut self, rect: Rect, paint: &Paint) {
        let mut path = Path::new();
        path.add_rect(rect);
        self.draw_path(&path, paint);
    }

    /// Draw the oval inscribed in `rect`.
    pub fn draw_oval(&mut self, rect: Rect, paint: &Paint) {
        let mut path = Path::new();
        path.add_oval(rect);
        self.draw_path(&path, paint);
    }

    /// Draw a circle.
    pub fn draw_circle(&mut self, center: impl Into<Point>, radius: f64, paint: &Paint) {
        let mut path = Path::new();
        path.add_circle(center, radius);
        self.draw_path(&path, paint);
    }

    /// Draw a rounded rectangle.
    pub fn draw_round_rect(&mut self, rr: RoundedRect, paint: &Paint) {
        let mut path = Path::new();
        path.add_round_rect(rr);
        self.draw_path(&path, paint);
    }

    /// Draw the region between two rounded rectangles, filled under the
    /// even-odd rule so the inner shape punches a hole in the outer one.
    pub fn draw_drrect(&mut self, outer: RoundedRect, inner: RoundedRect, paint: &Paint) {
        let mut path = Path::new();
        path.set_fill_rule(FillRule::EvenOdd);
        path.add_round_rect(outer);
        path.add_round_rect(inner);
        self.draw_path(&path, paint);
    }

    /// Draw an arc of the oval inscribed in `oval`. Angles are in radians;
    /// a positive sweep runs in the direction of increasing angle.
    ///
    /// With `use_center` the arc becomes a closed wedge through the oval's
    /// center, otherwise it is an open arc (a fill closes it implicitly
    /// along the chord).
    pub fn draw_arc(
        &mut self,
        oval: Rect,
        start_angle: f64,
        sweep_angle: f64,
        use_center: bool,
        paint: &Paint,
    ) {
        if sweep_angle == 0.0 || !sweep_angle.is_finite() {
            return;
        }
        let oval = oval.abs();
        let arc = Arc::new(
            oval.center(),
            (0.5 * oval.width(), 0.5 * oval.height()),
            start_angle,
            sweep_angle,
        );
        let mut path = Path::new();
        if use_center {
            path.move_to(oval.center());
            let _ = path.extend_with_arc(arc);
            path.close();
        } else {
            path.add_arc(arc);
        }
        self.draw_path(&path, paint);
    }

    /// Fill the entire clip region with the paint's color.
    pub fn draw_paint(&mut self, paint: &Paint) {
        if paint.color.is_transparent() {
            return;
        }
        // Covers device space regardless of the transform; the clip bounds it.
        let mut path = Path::new();
        path.add_rect(Rect::new(-1e9, -1e9, 1e9, 1e9));
        self.record(path, FillRule::NonZero, paint.color);
    }

    /// Draw a line segment.
    pub fn draw_line(&mut self, p0: impl Into<Point>, p1: impl Into<Point>, paint: &Paint) {
        self.draw_points(PointMode::Lines, &[p0.into(), p1.into()], paint);
    }

    /// Draw a single point as a dot of the paint's stroke width.
    pub fn draw_point(&mut self, p: impl Into<Point>, paint: &Paint) {
        self.draw_points(PointMode::Points, &[p.into()], paint);
    }

    /// Draw a list of points as dots, segments or a polyline.
    pub fn draw_points(&mut self, mode: PointMode, points: &[Point], paint: &Paint) {
        if points.is_empty() {
            return;
        }
        let mut path = Path::new();
        match mode {
            PointMode::Points => {
                let width = if paint.stroke.width > 0.0 {
                    paint.stroke.width
                } else {
                    1.0
                };
                for pt in points {
                    path.add_circle(*pt, 0.5 * width);
                }
                // Dots are solid regardless of the paint style.
                let dot_paint = Paint {
                    color: paint.color,
                    style: PaintStyle::Fill,
                    stroke: paint.stroke.clone(),
                };
                self.draw_path(&path, &dot_paint);
                return;
            }
            PointMode::Lines => {
                for pair in points.chunks_exact(2) {
                    path.move_to(pair[0]);
                    let _ = path.line_to(pair[1]);
                }
            }
            PointMode::Polygon => {
                path.move_to(points[0]);
                for pt in &points[1..] {
                    let _ = path.line_to(*pt);
                }
            }
        }
        self.draw_path(&path, paint);
    }

    /// The commands recorded so far.
    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }

    /// Hand every recorded command to `renderer`, then clear the list.
    pub fn flush(&mut self, renderer: &mut impl Renderer) {
        trace!(commands = self.list.len(), "flush");
        for command in self.list.commands() {
            renderer.fill_path(command);
        }
        self.list.clear();
    }
}

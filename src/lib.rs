// Copyright 2026 the Kanvaso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A retained-path, immediate-mode 2D drawing core.
//!
//! Kanvaso turns abstract path geometry (move/line/quadratic/conic/cubic
//! verbs plus a fill rule) into GPU-fillable outlines. The interesting part
//! is the stroke pipeline: a [`Path`] and a [`Stroke`] style (width, caps,
//! joins, miter limit, dash pattern) are expanded into a new set of closed
//! contours whose nonzero-winding interior is the visual stroke. Around that
//! sits a small state machine: a [`Canvas`] with a save/restore stack of
//! transform and clip frames, recording draw calls into a [`DisplayList`]
//! that is flushed once per frame to a [`Renderer`] collaborator.
//!
//! # Example
//!
//! ```
//! use kanvaso::{Canvas, Color, Paint, Path, Stroke};
//!
//! let mut path = Path::new();
//! path.move_to((10.0, 10.0));
//! path.line_to((90.0, 10.0)).unwrap();
//! path.quad_to((90.0, 90.0), (10.0, 90.0)).unwrap();
//! path.close();
//!
//! let paint = Paint::stroke(Color::BLACK, Stroke::new(4.0));
//! let mut canvas = Canvas::new();
//! canvas.save();
//! canvas.translate(20.0, 0.0);
//! canvas.draw_path(&path, &paint);
//! canvas.restore();
//! ```
//!
//! Rasterization, text shaping and image decoding are external collaborators;
//! this crate produces the outline + fill rule + color triples they consume.

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(clippy::unreadable_literal, clippy::many_single_char_names)]

mod affine;
mod arc;
mod canvas;
mod color;
pub mod common;
mod cubicbez;
mod flatten;
mod line;
mod param_curve;
mod path;
mod point;
mod quadbez;
mod rect;
mod render;
mod rounded_rect;
mod stroke;
mod vec2;

pub use crate::affine::Affine;
pub use crate::arc::Arc;
pub use crate::canvas::{Canvas, ClipOp, ClipRecord, Paint, PaintStyle, PointMode};
pub use crate::color::Color;
pub use crate::cubicbez::CubicBez;
pub use crate::flatten::flatten;
pub use crate::line::{ConstPoint, Line};
pub use crate::param_curve::{ParamCurve, ParamCurveArclen, ParamCurveDeriv};
pub use crate::path::{
    AddPathMode, Elements, FillRule, Path, PathEl, PathError, PathSeg, Verb,
};
pub use crate::point::Point;
pub use crate::quadbez::QuadBez;
pub use crate::rect::Rect;
pub use crate::render::{DisplayList, FillCommand, Renderer};
pub use crate::rounded_rect::RoundedRect;
pub use crate::stroke::{stroke, Cap, Dashes, Join, Stroke};
pub use crate::vec2::Vec2;

/// The default geometric tolerance, in the same units as path coordinates.
///
/// Curve approximations (conic lowering, offset curves, round caps and
/// joins) are accurate to within this distance unless the caller overrides
/// it via [`Canvas::with_tolerance`].
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

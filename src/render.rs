// Copyright 2026 the Kanvaso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary between recording and rasterization.

use crate::canvas::ClipRecord;
use crate::{Color, FillRule, Path};

/// A single resolved fill: everything a rasterizer needs to draw one shape.
///
/// The path is in device space and contains only move, line, cubic and close
/// elements. Stroking has already been expanded, so a stroke arrives here as
/// a fill of its outline under the nonzero rule.
#[derive(Clone, Debug)]
pub struct FillCommand {
    /// Device-space outline to fill.
    pub path: Path,
    /// Winding rule for the fill.
    pub fill_rule: FillRule,
    /// Solid fill color.
    pub color: Color,
    /// Device-space clips in effect, innermost last. Empty means unclipped.
    pub clip: Vec<ClipRecord>,
}

/// An ordered list of fill commands recorded by a [`Canvas`].
///
/// [`Canvas`]: crate::Canvas
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    commands: Vec<FillCommand>,
}

impl DisplayList {
    /// A new, empty display list.
    pub fn new() -> DisplayList {
        DisplayList::default()
    }

    /// Append a command.
    pub fn push(&mut self, command: FillCommand) {
        self.commands.push(command);
    }

    /// The recorded commands, in draw order.
    pub fn commands(&self) -> &[FillCommand] {
        &self.commands
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Discard all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// A consumer of fill commands, typically a rasterizer or GPU backend.
pub trait Renderer {
    /// Draw one fill command.
    fn fill_path(&mut self, command: &FillCommand);
}

// Copyright 2026 the Kanvaso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A simple 8-bit RGBA color.

/// A color in non-premultiplied 8-bit RGBA.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
    /// Alpha component, 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    /// A new color from components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    /// A new opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 255 }
    }

    /// A new color from a `0xRRGGBBAA` value.
    pub const fn from_rgba32(rgba: u32) -> Color {
        Color {
            r: (rgba >> 24) as u8,
            g: (rgba >> 16) as u8,
            b: (rgba >> 8) as u8,
            a: rgba as u8,
        }
    }

    /// The same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Color {
        Color { a, ..self }
    }

    /// True if the color would leave no mark.
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba32_components() {
        let c = Color::from_rgba32(0x11223344);
        assert_eq!(c, Color::new(0x11, 0x22, 0x33, 0x44));
        assert_eq!(Color::from_rgba32(0x000000FF), Color::BLACK);
    }

    #[test]
    fn alpha_helpers() {
        assert!(Color::WHITE.with_alpha(0).is_transparent());
        assert!(!Color::TRANSPARENT.with_alpha(1).is_transparent());
    }
}

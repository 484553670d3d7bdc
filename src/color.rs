//! RGB565 colors and 4-bit alpha arithmetic
//!
//! This module defines the [`Color`] type used by every drawing operation and
//! the blending helpers shared by the backends.
//!
//! ## Color Representation
//!
//! A color is a packed 16-bit RGB565 value:
//!
//! | Bits    | Channel | Range |
//! |---------|---------|-------|
//! | 15..11  | Red     | 0..31 |
//! | 10..5   | Green   | 0..63 |
//! | 4..0    | Blue    | 0..31 |
//!
//! Mono4 bitmaps carry 16 levels per pixel. A level is either expanded into a
//! color through a 16-entry gradient ([`gradient_a4`]) or used directly as an
//! alpha weight ([`Color::blend_a4`]).
//!
//! ## Example
//!
//! ```
//! use gdc::Color;
//!
//! let fg = Color::WHITE;
//! let bg = Color::BLACK;
//!
//! assert_eq!(fg.blend_a4(bg, 15), fg);
//! assert_eq!(fg.blend_a4(bg, 0), bg);
//!
//! let gradient = gdc::color::gradient_a4(fg, bg);
//! assert_eq!(gradient[0], bg);
//! assert_eq!(gradient[15], fg);
//! ```

/// Highest 4-bit alpha level (fully opaque foreground)
pub const ALPHA_A4_MAX: u8 = 15;

/// A packed RGB565 color
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Color(u16);

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU16;
}

impl Color {
    /// Black (0x0000)
    pub const BLACK: Self = Self(0x0000);
    /// White (0xFFFF)
    pub const WHITE: Self = Self(0xFFFF);

    /// Create a color from a raw RGB565 value
    pub const fn from_u16(value: u16) -> Self {
        Self(value)
    }

    /// Create a color from 8-bit channels, dropping the low bits
    ///
    /// ```
    /// use gdc::Color;
    ///
    /// assert_eq!(Color::rgb(255, 255, 255), Color::WHITE);
    /// assert_eq!(Color::rgb(255, 0, 0).to_u16(), 0xF800);
    /// ```
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        let r = (r as u16 & 0xF8) << 8;
        let g = (g as u16 & 0xFC) << 3;
        let b = b as u16 >> 3;
        Self(r | g | b)
    }

    /// Convert a little-endian RGBA8888 word (`0xAABBGGRR`), ignoring alpha
    pub const fn from_rgba8888(value: u32) -> Self {
        let [r, g, b, _] = value.to_le_bytes();
        Self::rgb(r, g, b)
    }

    /// Raw RGB565 value
    pub const fn to_u16(self) -> u16 {
        self.0
    }

    /// 5-bit red channel
    pub const fn red(self) -> u16 {
        (self.0 & 0xF800) >> 11
    }

    /// 6-bit green channel
    pub const fn green(self) -> u16 {
        (self.0 & 0x07E0) >> 5
    }

    /// 5-bit blue channel
    pub const fn blue(self) -> u16 {
        self.0 & 0x001F
    }

    /// Blend `self` (foreground) over `bg` with a 4-bit alpha
    ///
    /// `alpha == 15` yields `self`, `alpha == 0` yields `bg`. Only the low
    /// nibble of `alpha` is used.
    pub const fn blend_a4(self, bg: Self, alpha: u8) -> Self {
        let a = (alpha & 0x0F) as u16;
        let inv = ALPHA_A4_MAX as u16 - a;

        let r = (self.red() * a + bg.red() * inv) / ALPHA_A4_MAX as u16;
        let g = (self.green() * a + bg.green() * inv) / ALPHA_A4_MAX as u16;
        let b = (self.blue() * a + bg.blue() * inv) / ALPHA_A4_MAX as u16;

        Self((r << 11) | (g << 5) | b)
    }

    /// Bytes as streamed to a display controller (big-endian)
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Bytes as stored in an RGB565 framebuffer (little-endian)
    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    /// Read a color from framebuffer bytes (little-endian)
    pub const fn from_le_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_le_bytes(bytes))
    }
}

impl From<u16> for Color {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<Color> for u16 {
    fn from(color: Color) -> Self {
        color.0
    }
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::raw::RawU16> for Color {
    fn from(raw: embedded_graphics_core::pixelcolor::raw::RawU16) -> Self {
        use embedded_graphics_core::pixelcolor::raw::RawData;
        Self(raw.into_inner())
    }
}

#[cfg(feature = "graphics")]
impl From<Color> for embedded_graphics_core::pixelcolor::raw::RawU16 {
    fn from(color: Color) -> Self {
        Self::new(color.0)
    }
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::Rgb565> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::Rgb565) -> Self {
        use embedded_graphics_core::pixelcolor::IntoStorage;
        Self(color.into_storage())
    }
}

#[cfg(feature = "graphics")]
impl From<Color> for embedded_graphics_core::pixelcolor::Rgb565 {
    fn from(color: Color) -> Self {
        embedded_graphics_core::pixelcolor::raw::RawU16::new(color.0).into()
    }
}

/// Build the 16-entry gradient from `bg` (level 0) to `fg` (level 15)
///
/// Used to expand Mono4 luminance values into RGB565 colors.
pub fn gradient_a4(fg: Color, bg: Color) -> [Color; 16] {
    let mut gradient = [bg; 16];
    for (level, entry) in (0u8..).zip(gradient.iter_mut()) {
        *entry = fg.blend_a4(bg, level);
    }
    gradient
}

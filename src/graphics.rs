//! Graphics support via embedded-graphics
//!
//! This module provides the [`GraphicGdc`] struct which wraps any device
//! context and implements the
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) trait from
//! the embedded-graphics ecosystem.
//!
//! Solid fills map onto a single [`Gdc::fill_rect`] call; individual pixels
//! become 1x1 fills, which the windowed backend streams without reprogramming
//! its window as long as they arrive left to right.
//!
//! ## Example
//!
//! ```rust
//! use embedded_graphics::{
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//! };
//! use gdc::{Color, GraphicGdc, Rgb565Gdc};
//!
//! let gdc = match Rgb565Gdc::new([0u8; 32 * 32 * 2], 64, gdc::Size::new(32, 32)) {
//!     Ok(gdc) => gdc,
//!     Err(_) => return,
//! };
//! let mut display = GraphicGdc::new(gdc);
//!
//! let _ = display.clear(Color::BLACK);
//! let _ = Rectangle::new(Point::new(4, 4), Size::new(8, 8))
//!     .into_styled(PrimitiveStyle::with_fill(Color::WHITE))
//!     .draw(&mut display);
//! ```

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    prelude::Pixel,
    primitives::Rectangle,
};

use crate::color::Color;
use crate::error::Error;
use crate::gdc::Gdc;
use crate::geometry::Rect;

/// Device context usable as an embedded-graphics draw target
pub struct GraphicGdc<G> {
    gdc: G,
}

impl<G: Gdc> GraphicGdc<G> {
    /// Wrap a device context
    pub fn new(gdc: G) -> Self {
        Self { gdc }
    }

    /// Get a reference to the wrapped device context
    pub fn gdc(&self) -> &G {
        &self.gdc
    }

    /// Get a mutable reference to the wrapped device context
    pub fn gdc_mut(&mut self) -> &mut G {
        &mut self.gdc
    }

    /// Unwrap the device context
    pub fn into_inner(self) -> G {
        self.gdc
    }
}

fn to_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

fn to_rect(area: &Rectangle) -> Rect {
    let x0 = area.top_left.x;
    let y0 = area.top_left.y;
    let x1 = x0.saturating_add(area.size.width.min(i32::MAX as u32) as i32);
    let y1 = y0.saturating_add(area.size.height.min(i32::MAX as u32) as i32);
    Rect::new(to_i16(x0), to_i16(y0), to_i16(x1), to_i16(y1))
}

impl<G: Gdc> DrawTarget for GraphicGdc<G> {
    type Color = Color;
    type Error = Error<G::Error>;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            let area = Rectangle::new(Point::new(x, y), Size::new(1, 1));
            self.gdc.fill_rect(to_rect(&area), color)?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.gdc.fill_rect(to_rect(area), color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let size = self.gdc.size();
        self.gdc
            .fill_rect(Rect::new(0, 0, size.width, size.height), color)
    }
}

impl<G: Gdc> OriginDimensions for GraphicGdc<G> {
    fn size(&self) -> Size {
        let size = self.gdc.size();
        Size::new(size.width.max(0) as u32, size.height.max(0) as u32)
    }
}

//! Graphics Device Context
//!
//! A small drawing layer for RGB565 surfaces. A device context ([`Gdc`])
//! clips every request against its surface and the source bitmaps, then
//! dispatches to a backend that either rasterizes into a memory framebuffer
//! or streams pixels into a display controller's RAM window.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Solid fills, bitmap copies and 4-bit alpha blending
//! - Optional 2D accelerator hook with per-bitmap CPU fallback
//! - Fixed-size first-fit heap for bitmap buffers
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use gdc::{Builder, Color, Dimensions, Display, Gdc, Interface, Rect};
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, rst);
//! let dims = match Dimensions::new(240, 240) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().dimensions(dims).ram_offset(0, 80).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(interface, config);
//! let _ = display.reset(&mut delay);
//!
//! if let Ok(mut gdc) = display.acquire_gdc() {
//!     let _ = gdc.fill_rect(Rect::new(0, 0, 240, 240), Color::BLACK);
//!     let _ = gdc.fill_rect(Rect::new(20, 20, 60, 40), Color::rgb(255, 0, 0));
//!     display.release_gdc(gdc);
//! }
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// Bitmap descriptors and pixel formats
pub mod bitmap;
/// Clipping of drawing requests
pub mod clip;
/// RGB565 color type and alpha helpers
pub mod color;
/// Display controller command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Display host and device context factory
pub mod display;
/// 2D accelerator hook
pub mod dma2d;
/// Error types for the crate
pub mod error;
/// Device context trait and dispatch
pub mod gdc;
/// Integer geometry primitives
pub mod geometry;
/// Fixed-size heap for bitmap buffers
pub mod heap;
/// Hardware interface abstraction
pub mod interface;
mod raster;
/// Memory framebuffer backend
pub mod rgb565;
/// Windowed streaming backend
pub mod wnd565;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use bitmap::{Bitmap, BitmapAttrs, BitmapInfo, BitmapRef, Format};
pub use clip::Clip;
pub use color::Color;
pub use config::{Builder, Config, Dimensions, MAX_COLUMNS, MAX_ROWS};
pub use display::Display;
pub use dma2d::{Dma2d, Dma2dParams, Layer, NoDma};
pub use error::{BitmapError, BuilderError, Error, Operation};
pub use gdc::{Gdc, GdcBackend, GdcResult};
pub use geometry::{Offset, Rect, Size};
pub use heap::{DEFAULT_HEAP_SIZE, GdcHeap, Heap, HeapBlock};
pub use interface::{DisplayInterface, Interface, InterfaceError};
pub use rgb565::Rgb565Gdc;
pub use wnd565::Wnd565;

#[cfg(feature = "graphics")]
pub use graphics::GraphicGdc;

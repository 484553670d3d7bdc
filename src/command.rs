//! Display controller command definitions
//!
//! Command bytes of the MIPI-DCS style controller (ST7789 class) behind the
//! windowed backend. Commands are sent over SPI with the DC pin low for
//! commands and high for data.
//!
//! ## Write Window Protocol
//!
//! Pixels are written by:
//! 1. [`CASET`] with the first and last column (big-endian words)
//! 2. [`RASET`] with the first and last row (big-endian words)
//! 3. [`RAMWR`] followed by pixel data
//!
//! The controller advances its write pointer row-major inside the window
//! after every pixel, so consecutive pixel data continues where the previous
//! burst stopped.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gdc::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::OutputPin;
//! # use embedded_hal::spi::{Operation, SpiDevice};
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
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin);
//! // Wake up and select 16 bits per pixel
//! let _ = interface.send_command(command::SLPOUT);
//! let _ = interface.send_command(command::COLMOD);
//! let _ = interface.send_data(&[command::COLMOD_RGB565]);
//! ```

// System control commands

/// Software reset (0x01)
///
/// Wait at least 120ms before issuing [`SLPOUT`].
pub const SWRESET: u8 = 0x01;

/// Enter sleep mode (0x10)
pub const SLPIN: u8 = 0x10;

/// Exit sleep mode (0x11)
///
/// Wait at least 120ms before the next command.
pub const SLPOUT: u8 = 0x11;

/// Normal display mode on (0x13)
pub const NORON: u8 = 0x13;

/// Display inversion off (0x20)
pub const INVOFF: u8 = 0x20;

/// Display inversion on (0x21)
///
/// Most IPS panels need inversion for correct colors.
pub const INVON: u8 = 0x21;

/// Display off (0x28)
pub const DISPOFF: u8 = 0x28;

/// Display on (0x29)
pub const DISPON: u8 = 0x29;

// Write window commands

/// Column address set (0x2A)
///
/// Requires 4 bytes: [x0 (MSB), x0 (LSB), x1 (MSB), x1 (LSB)], both inclusive.
pub const CASET: u8 = 0x2A;

/// Row address set (0x2B)
///
/// Requires 4 bytes: [y0 (MSB), y0 (LSB), y1 (MSB), y1 (LSB)], both inclusive.
pub const RASET: u8 = 0x2B;

/// Memory write (0x2C)
///
/// Following data bytes are pixels, written from the window's top-left corner.
pub const RAMWR: u8 = 0x2C;

// Pixel format and orientation

/// Memory data access control (0x36)
///
/// Requires 1 byte: row/column exchange, mirroring and RGB/BGR order.
pub const MADCTL: u8 = 0x36;

/// Interface pixel format (0x3A)
///
/// Requires 1 byte, see [`COLMOD_RGB565`].
pub const COLMOD: u8 = 0x3A;

/// [`COLMOD`] value selecting 16 bits per pixel (RGB565)
pub const COLMOD_RGB565: u8 = 0x55;

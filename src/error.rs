//! Error types for the graphics device context
//!
//! This module defines error types for drawing operations ([`Error`]),
//! bitmap construction ([`BitmapError`]) and configuration building
//! ([`BuilderError`]).
//!
//! ## Error Types
//!
//! - [`Error`] - Runtime errors returned by the dispatcher and the backends
//! - [`BitmapError`] - Storage that cannot hold the described bitmap
//! - [`BuilderError`] - Errors during configuration construction
//!
//! A request that is clipped away entirely is not an error: the drawing call
//! returns `Ok(())` without touching any pixel.
//!
//! ## Example
//!
//! ```
//! use gdc::{Builder, BuilderError, Dimensions};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Invalid dimensions
//! let result = Dimensions::new(1000, 500); // Too large
//! assert!(result.is_err());
//! ```

use crate::bitmap::Format;

/// Maximum number of columns addressable by the display controller
pub const MAX_COLUMNS: u16 = 240;

/// Maximum number of rows addressable by the display controller
pub const MAX_ROWS: u16 = 320;

/// Backend capability (virtual method) a drawing request resolved to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Solid fill
    Fill,
    /// Mono4 bitmap expanded through a gradient
    CopyMono4,
    /// RGB565 bitmap copy
    CopyRgb565,
    /// RGBA8888 bitmap copy
    CopyRgba8888,
    /// Mono4 alpha over a Mono4 background
    BlendMono4Mono4,
    /// Mono4 alpha over an RGB565 background
    BlendMono4Rgb565,
    /// Mono4 alpha over an RGBA8888 background
    BlendMono4Rgba8888,
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Fill => "fill",
            Self::CopyMono4 => "copy_mono4",
            Self::CopyRgb565 => "copy_rgb565",
            Self::CopyRgba8888 => "copy_rgba8888",
            Self::BlendMono4Mono4 => "blend_mono4_mono4",
            Self::BlendMono4Rgb565 => "blend_mono4_rgb565",
            Self::BlendMono4Rgba8888 => "blend_mono4_rgba8888",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when drawing through a device context
///
/// Generic over the backend's transport error so callers can match on the
/// underlying hardware failure.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// Interface error (window-set or pixel push failed)
    Interface(E),
    /// The backend does not implement this operation
    Unsupported(Operation),
    /// No operation exists for this pixel format (or format pair)
    UnsupportedFormat {
        /// Foreground / source format
        fg: Format,
        /// Background format for blends
        bg: Option<Format>,
    },
    /// The display context is already acquired
    Busy,
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::Unsupported(op) => write!(f, "Unsupported operation: {op}"),
            Self::UnsupportedFormat { fg, bg: None } => {
                write!(f, "Unsupported bitmap format: {fg:?}")
            }
            Self::UnsupportedFormat { fg, bg: Some(bg) } => {
                write!(f, "Unsupported format pair: {fg:?} over {bg:?}")
            }
            Self::Busy => write!(f, "Display context already acquired"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for Error<E> {}

/// Errors that can occur when describing a bitmap over storage
#[derive(Debug, PartialEq, Eq)]
pub enum BitmapError {
    /// Stride is shorter than one row of pixels
    StrideTooSmall {
        /// Minimum stride in bytes
        required: usize,
        /// Provided stride in bytes
        provided: usize,
    },
    /// Storage is shorter than `stride * height`
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Width or height is negative
    InvalidSize {
        /// Requested width
        width: i16,
        /// Requested height
        height: i16,
    },
}

impl core::fmt::Display for BitmapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::StrideTooSmall { required, provided } => write!(
                f,
                "Stride too small: required {required} bytes, provided {provided}"
            ),
            Self::BufferTooSmall { required, provided } => write!(
                f,
                "Buffer too small: required {required} bytes, provided {provided}"
            ),
            Self::InvalidSize { width, height } => {
                write!(f, "Invalid bitmap size: {width}x{height}")
            }
        }
    }
}

impl core::error::Error for BitmapError {}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in pixels requested
        width: u16,
        /// Height in pixels requested
        height: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (max {MAX_COLUMNS}x{MAX_ROWS})"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

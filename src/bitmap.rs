//! Bitmap descriptors
//!
//! A [`Bitmap`] borrows caller-owned pixel storage for the duration of a
//! drawing call. A [`BitmapRef`] places a bitmap relative to the destination
//! rectangle and carries the two colors used to interpret Mono4 data.
//!
//! ## Storage Layout
//!
//! Rows are `stride` bytes apart. Within a row:
//!
//! | Format   | Bytes per pixel | Packing |
//! |----------|-----------------|---------|
//! | Mono4    | 1/2             | even x in the low nibble, odd x in the high nibble |
//! | RGB565   | 2               | little-endian |
//! | RGBA8888 | 4               | little-endian |

use bitflags::bitflags;

use crate::color::Color;
use crate::error::BitmapError;
use crate::geometry::{Offset, Size};

/// Pixel format of a bitmap
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// Unknown or unset format
    #[default]
    Unknown,
    /// 4 bits per pixel luminance/alpha, two pixels per byte
    Mono4,
    /// 16-bit RGB565
    Rgb565,
    /// 32-bit RGBA8888
    Rgba8888,
}

impl Format {
    /// Minimum number of bytes needed to hold `width` pixels
    pub const fn min_stride(self, width: usize) -> usize {
        match self {
            Self::Unknown => 0,
            Self::Mono4 => width.div_ceil(2),
            Self::Rgb565 => width * 2,
            Self::Rgba8888 => width * 4,
        }
    }
}

bitflags! {
    /// Bitmap attribute flags
    pub struct BitmapAttrs: u8 {
        /// Storage is not accessible by the DMA engine
        const NO_DMA = 0x01;
    }
}

impl Default for BitmapAttrs {
    fn default() -> Self {
        Self::empty()
    }
}

/// Storage-less description of a bitmap
///
/// Backends report this for their drawing surface; it carries everything the
/// dispatcher needs to clip and to build an operation descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitmapInfo {
    /// Size in pixels
    pub size: Size,
    /// Distance between rows in bytes
    pub stride: usize,
    /// Pixel format
    pub format: Format,
    /// Attribute flags
    pub attrs: BitmapAttrs,
}

impl BitmapInfo {
    /// Validate this description against storage of `len` bytes
    pub fn validate(&self, len: usize) -> Result<(), BitmapError> {
        if self.size.width < 0 || self.size.height < 0 {
            return Err(BitmapError::InvalidSize {
                width: self.size.width,
                height: self.size.height,
            });
        }
        let min_stride = self.format.min_stride(self.size.width as usize);
        if self.stride < min_stride {
            return Err(BitmapError::StrideTooSmall {
                required: min_stride,
                provided: self.stride,
            });
        }
        let required = self
            .stride
            .checked_mul(self.size.height as usize)
            .unwrap_or(usize::MAX);
        if len < required {
            return Err(BitmapError::BufferTooSmall {
                required,
                provided: len,
            });
        }
        Ok(())
    }
}

/// A pixel buffer borrowed from its owner
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bitmap<'a> {
    data: &'a [u8],
    info: BitmapInfo,
}

impl<'a> Bitmap<'a> {
    /// Describe `data` as a bitmap
    ///
    /// # Errors
    ///
    /// Returns a [`BitmapError`] if the stride cannot hold a row of
    /// `size.width` pixels or `data` is shorter than `stride * size.height`.
    ///
    /// ## Example
    ///
    /// ```
    /// use gdc::{Bitmap, Format, Size};
    ///
    /// let pixels = [0u8; 8 * 4];
    /// let bitmap = Bitmap::new(&pixels, 8, Size::new(16, 4), Format::Mono4);
    /// assert!(bitmap.is_ok());
    ///
    /// let bitmap = Bitmap::new(&pixels, 8, Size::new(17, 4), Format::Mono4);
    /// assert!(bitmap.is_err());
    /// ```
    pub fn new(
        data: &'a [u8],
        stride: usize,
        size: Size,
        format: Format,
    ) -> Result<Self, BitmapError> {
        let info = BitmapInfo {
            size,
            stride,
            format,
            attrs: BitmapAttrs::empty(),
        };
        info.validate(data.len())?;
        Ok(Self { data, info })
    }

    /// Set attribute flags
    pub fn with_attrs(mut self, attrs: BitmapAttrs) -> Self {
        self.info.attrs = attrs;
        self
    }

    /// Storage-less description
    pub fn info(&self) -> BitmapInfo {
        self.info
    }

    /// Size in pixels
    pub fn size(&self) -> Size {
        self.info.size
    }

    /// Distance between rows in bytes
    pub fn stride(&self) -> usize {
        self.info.stride
    }

    /// Pixel format
    pub fn format(&self) -> Format {
        self.info.format
    }

    /// Attribute flags
    pub fn attrs(&self) -> BitmapAttrs {
        self.info.attrs
    }

    /// Underlying storage
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Storage starting at row `y`
    pub fn rows_from(&self, y: usize) -> &'a [u8] {
        self.data
            .get(self.info.stride.saturating_mul(y)..)
            .unwrap_or(&[])
    }
}

/// A bitmap positioned for drawing
///
/// `offset` is the position inside the bitmap that lands on the top-left
/// corner of the destination rectangle. Negative components place the bitmap
/// origin to the right of / below that corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BitmapRef<'a> {
    /// The referenced bitmap
    pub bitmap: Bitmap<'a>,
    /// Offset into the bitmap
    pub offset: Offset,
    /// Color for Mono4 level 15 (or the blended foreground)
    pub fg_color: Color,
    /// Color for Mono4 level 0
    pub bg_color: Color,
}

impl<'a> BitmapRef<'a> {
    /// Reference `bitmap` at offset zero, white on black
    pub fn new(bitmap: Bitmap<'a>) -> Self {
        Self {
            bitmap,
            offset: Offset::zero(),
            fg_color: Color::WHITE,
            bg_color: Color::BLACK,
        }
    }

    /// Set the offset into the bitmap
    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    /// Set the foreground color
    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg_color = color;
        self
    }

    /// Set the background color
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg_color = color;
        self
    }
}

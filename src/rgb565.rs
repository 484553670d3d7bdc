//! RGB565 framebuffer device context
//!
//! [`Rgb565Gdc`] draws into a linear little-endian RGB565 buffer owned (or
//! borrowed) by the context. Fills, Mono4 expansion, RGB565 copies and Mono4
//! over RGB565 blends are offered to an optional [`Dma2d`] engine first and
//! run on the CPU when the engine declines or the request is marked CPU-only.
//! Mono4 over Mono4 blends always run on the CPU. RGBA8888 sources are not
//! supported.
//!
//! ## Example
//!
//! ```
//! use gdc::{Bitmap, BitmapRef, Color, Format, Gdc, Rect, Rgb565Gdc, Size};
//!
//! let mut gdc = match Rgb565Gdc::new([0u8; 8 * 4 * 2], 16, Size::new(8, 4)) {
//!     Ok(gdc) => gdc,
//!     Err(_) => return,
//! };
//!
//! // A 2x1 glyph mask: level 0 then level 15
//! let mask = [0xF0u8];
//! let glyph = match Bitmap::new(&mask, 1, Size::new(2, 1), Format::Mono4) {
//!     Ok(glyph) => glyph,
//!     Err(_) => return,
//! };
//! let glyph = BitmapRef::new(glyph).with_fg(Color::WHITE).with_bg(Color::BLACK);
//!
//! let _ = gdc.draw_bitmap(Rect::new(0, 0, 2, 1), &glyph);
//! assert_eq!(gdc.pixel(0, 0), Some(Color::BLACK));
//! assert_eq!(gdc.pixel(1, 0), Some(Color::WHITE));
//! ```

use core::convert::Infallible;

use log::trace;

use crate::bitmap::{BitmapAttrs, BitmapInfo, Format};
use crate::color::Color;
use crate::dma2d::{Dma2d, Dma2dParams, NoDma};
use crate::error::{BitmapError, Error, Operation};
use crate::gdc::{GdcBackend, GdcResult};
use crate::geometry::Size;
use crate::raster::Raster;

type Accelerator<D> = fn(&mut D, &mut [u8], &Dma2dParams<'_>) -> bool;

/// Device context over an RGB565 buffer
pub struct Rgb565Gdc<B, D = NoDma> {
    buffer: B,
    info: BitmapInfo,
    dma: D,
}

impl<B> Rgb565Gdc<B, NoDma>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a context over `buffer` with rows `stride` bytes apart
    ///
    /// # Errors
    ///
    /// Returns a [`BitmapError`] if `stride` cannot hold `size.width` pixels
    /// or `buffer` is shorter than `stride * size.height`.
    pub fn new(buffer: B, stride: usize, size: Size) -> Result<Self, BitmapError> {
        let info = BitmapInfo {
            size,
            stride,
            format: Format::Rgb565,
            attrs: BitmapAttrs::empty(),
        };
        info.validate(buffer.as_ref().len())?;
        Ok(Self {
            buffer,
            info,
            dma: NoDma,
        })
    }
}

impl<B, D> Rgb565Gdc<B, D>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
    D: Dma2d,
{
    /// Attach a 2-D DMA engine
    pub fn with_dma<E: Dma2d>(mut self, dma: E) -> Rgb565Gdc<B, E> {
        self.dma.wait();
        Rgb565Gdc {
            buffer: self.buffer,
            info: self.info,
            dma,
        }
    }

    /// Set surface attributes, e.g. [`BitmapAttrs::NO_DMA`] for memory the
    /// engine cannot reach
    pub fn with_attrs(mut self, attrs: BitmapAttrs) -> Self {
        self.info.attrs = attrs;
        self
    }

    /// Read back the buffer once outstanding DMA work has completed
    pub fn buffer(&mut self) -> &[u8] {
        self.dma.wait();
        self.buffer.as_ref()
    }

    /// Color of the pixel at `(x, y)`, `None` outside the surface
    pub fn pixel(&mut self, x: i16, y: i16) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.info.size.width || y >= self.info.size.height {
            return None;
        }
        let start = y as usize * self.info.stride + x as usize * 2;
        match self.buffer().get(start..start + 2) {
            Some(&[lo, hi]) => Some(Color::from_le_bytes([lo, hi])),
            _ => None,
        }
    }

    /// The attached DMA engine
    pub fn dma(&self) -> &D {
        &self.dma
    }

    /// Fence and give the buffer back
    pub fn into_inner(mut self) -> B {
        self.dma.wait();
        self.buffer
    }

    fn execute(
        &mut self,
        op: Operation,
        params: &Dma2dParams<'_>,
        accelerator: Option<Accelerator<D>>,
    ) -> GdcResult<Infallible> {
        if !params.cpu_only {
            if let Some(accelerate) = accelerator {
                if accelerate(&mut self.dma, self.buffer.as_mut(), params) {
                    trace!(
                        "{op} {}x{} at ({}, {}) issued to DMA",
                        params.width, params.height, params.dst_x, params.dst_y
                    );
                    return Ok(());
                }
            }
        }

        let raster = Raster::new(op, params).ok_or(Error::Unsupported(op))?;
        write_rows(self.buffer.as_mut(), params, &raster);
        Ok(())
    }
}

fn write_rows(dst: &mut [u8], params: &Dma2dParams<'_>, raster: &Raster) {
    let start = usize::from(params.dst_x) * 2;
    let end = start + usize::from(params.width) * 2;
    let rows = dst
        .chunks_mut(params.dst_stride.max(1))
        .skip(usize::from(params.dst_y))
        .take(usize::from(params.height));

    for (n, row) in rows.enumerate() {
        let Some(row) = row.get_mut(start..end) else {
            break;
        };
        for (pixel, color) in row.chunks_exact_mut(2).zip(raster.row(params, n)) {
            pixel.copy_from_slice(&color.to_le_bytes());
        }
    }
}

impl<B, D> GdcBackend for Rgb565Gdc<B, D>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
    D: Dma2d,
{
    type Error = Infallible;

    fn bitmap_info(&self) -> Option<BitmapInfo> {
        Some(self.info)
    }

    fn fence(&mut self) {
        self.dma.wait();
    }

    fn fill(&mut self, params: &Dma2dParams<'_>) -> GdcResult<Infallible> {
        self.execute(Operation::Fill, params, Some(D::rgb565_fill))
    }

    fn copy_mono4(&mut self, params: &Dma2dParams<'_>) -> GdcResult<Infallible> {
        self.execute(Operation::CopyMono4, params, Some(D::rgb565_copy_mono4))
    }

    fn copy_rgb565(&mut self, params: &Dma2dParams<'_>) -> GdcResult<Infallible> {
        self.execute(Operation::CopyRgb565, params, Some(D::rgb565_copy_rgb565))
    }

    fn blend_mono4_mono4(&mut self, params: &Dma2dParams<'_>) -> GdcResult<Infallible> {
        self.execute(Operation::BlendMono4Mono4, params, None)
    }

    fn blend_mono4_rgb565(&mut self, params: &Dma2dParams<'_>) -> GdcResult<Infallible> {
        self.execute(
            Operation::BlendMono4Rgb565,
            params,
            Some(D::rgb565_blend_mono4_rgb565),
        )
    }
}

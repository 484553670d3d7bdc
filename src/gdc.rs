//! Graphics device context dispatch
//!
//! A device context is any type implementing [`GdcBackend`]: a table of
//! optional capabilities (fill, per-format copies and blends) plus an
//! introspection hook describing its drawing surface. Capabilities a backend
//! does not override report [`Error::Unsupported`].
//!
//! The [`Gdc`] extension trait is implemented for every backend and is the
//! drawing API callers use. Each request is clipped against the surface and
//! the participating bitmaps, flattened into a [`Dma2dParams`], fenced
//! against outstanding DMA work and then routed to the capability matching
//! the pixel format (or format pair).
//!
//! ## Example
//!
//! ```
//! use gdc::{Color, Format, Gdc, Rect, Rgb565Gdc, Size};
//!
//! let mut buffer = [0u8; 16 * 8 * 2];
//! let mut gdc = match Rgb565Gdc::new(&mut buffer[..], 32, Size::new(16, 8)) {
//!     Ok(gdc) => gdc,
//!     Err(_) => return,
//! };
//!
//! assert_eq!(gdc.size(), Size::new(16, 8));
//! assert_eq!(gdc.format(), Format::Rgb565);
//!
//! // Partially outside the surface: only the visible part is written
//! assert!(gdc.fill_rect(Rect::new(12, 4, 40, 40), Color::WHITE).is_ok());
//! // Entirely outside the surface: nothing to do
//! assert!(gdc.fill_rect(Rect::new(200, 0, 250, 8), Color::WHITE).is_ok());
//! ```

use log::warn;

use crate::bitmap::{BitmapAttrs, BitmapInfo, BitmapRef, Format};
use crate::clip::{Clip, clip};
use crate::color::Color;
use crate::dma2d::{Dma2dParams, Layer};
use crate::error::{Error, Operation};
use crate::geometry::{Offset, Rect, Size};

/// Result of a backend capability
pub type GdcResult<E> = Result<(), Error<E>>;

/// Capabilities of a concrete device context
///
/// Every drawing capability receives a descriptor that has already been
/// clipped to the surface and every source, so `params` never describes
/// pixels outside the surface returned by [`bitmap_info`](Self::bitmap_info).
pub trait GdcBackend {
    /// Transport error of the backend
    type Error: core::fmt::Debug;

    /// Storage-less description of the drawing surface
    ///
    /// `None` means the context has no surface; it then reports a zero size
    /// and every drawing request is clipped away.
    fn bitmap_info(&self) -> Option<BitmapInfo> {
        None
    }

    /// Backend part of [`Gdc::release`], called after the fence
    fn on_release(&mut self) {}

    /// Block until every asynchronous operation issued on this context has
    /// completed
    fn fence(&mut self) {}

    /// Pre-stage a write window for an upcoming burst of operations
    fn window_hint(&mut self, _params: &Dma2dParams<'_>) -> GdcResult<Self::Error> {
        Ok(())
    }

    /// Fill with `params.srca.fg`
    fn fill(&mut self, _params: &Dma2dParams<'_>) -> GdcResult<Self::Error> {
        unsupported(Operation::Fill)
    }

    /// Expand a Mono4 source through the `srca` gradient
    fn copy_mono4(&mut self, _params: &Dma2dParams<'_>) -> GdcResult<Self::Error> {
        unsupported(Operation::CopyMono4)
    }

    /// Copy an RGB565 source
    fn copy_rgb565(&mut self, _params: &Dma2dParams<'_>) -> GdcResult<Self::Error> {
        unsupported(Operation::CopyRgb565)
    }

    /// Copy an RGBA8888 source
    fn copy_rgba8888(&mut self, _params: &Dma2dParams<'_>) -> GdcResult<Self::Error> {
        unsupported(Operation::CopyRgba8888)
    }

    /// Blend `srca.fg` with Mono4 alpha over a Mono4 background
    fn blend_mono4_mono4(&mut self, _params: &Dma2dParams<'_>) -> GdcResult<Self::Error> {
        unsupported(Operation::BlendMono4Mono4)
    }

    /// Blend `srca.fg` with Mono4 alpha over an RGB565 background
    fn blend_mono4_rgb565(&mut self, _params: &Dma2dParams<'_>) -> GdcResult<Self::Error> {
        unsupported(Operation::BlendMono4Rgb565)
    }

    /// Blend `srca.fg` with Mono4 alpha over an RGBA8888 background
    fn blend_mono4_rgba8888(&mut self, _params: &Dma2dParams<'_>) -> GdcResult<Self::Error> {
        unsupported(Operation::BlendMono4Rgba8888)
    }
}

fn unsupported<E>(op: Operation) -> GdcResult<E> {
    warn!("{op} is not supported by this context");
    Err(Error::Unsupported(op))
}

fn unsupported_format<E>(fg: Format, bg: Option<Format>) -> GdcResult<E> {
    warn!("No operation for format {fg:?} over {bg:?}");
    Err(Error::UnsupportedFormat { fg, bg })
}

/// Drawing API shared by every device context
pub trait Gdc: GdcBackend {
    /// Fence on outstanding work, then release the backend
    fn release(&mut self) {
        self.fence();
        self.on_release();
    }

    /// Surface size, zero if the context has no surface
    fn size(&self) -> Size {
        self.bitmap_info().map_or(Size::zero(), |info| info.size)
    }

    /// Surface pixel format, [`Format::Unknown`] if the context has no surface
    fn format(&self) -> Format {
        self.bitmap_info().map_or(Format::Unknown, |info| info.format)
    }

    /// Block until every DMA operation issued on this context has completed
    ///
    /// Must be called before the CPU reads or writes the backing buffer.
    fn wait_for_pending_ops(&mut self) {
        self.fence();
    }

    /// Hint that the next operations will target `rect`
    ///
    /// Purely an optimization for windowed displays; other contexts ignore it.
    fn set_window_hint(&mut self, rect: Rect) -> GdcResult<Self::Error> {
        let info = self.bitmap_info().unwrap_or_default();
        let clip = clip(rect, info.size, None, None);
        let params = destination(&info, &clip);
        self.window_hint(&params)
    }

    /// Fill `rect` with `color`
    fn fill_rect(&mut self, rect: Rect, color: Color) -> GdcResult<Self::Error> {
        let info = self.bitmap_info().unwrap_or_default();
        let clip = clip(rect, info.size, None, None);
        if clip.is_empty() {
            return Ok(());
        }

        let params = Dma2dParams {
            srca: Layer::solid(color),
            ..destination(&info, &clip)
        };

        self.fence();
        self.fill(&params)
    }

    /// Draw `src` into `rect`
    ///
    /// The capability is selected by the format of `src`.
    fn draw_bitmap(&mut self, rect: Rect, src: &BitmapRef<'_>) -> GdcResult<Self::Error> {
        let info = self.bitmap_info().unwrap_or_default();
        let clip = clip(rect, info.size, Some(src), None);
        if clip.is_empty() {
            return Ok(());
        }

        let mut params = Dma2dParams {
            srca: layer(src, clip.fg),
            ..destination(&info, &clip)
        };
        params.cpu_only |= no_dma(src);

        self.fence();
        match src.bitmap.format() {
            Format::Mono4 => self.copy_mono4(&params),
            Format::Rgb565 => self.copy_rgb565(&params),
            Format::Rgba8888 => self.copy_rgba8888(&params),
            Format::Unknown => unsupported_format(Format::Unknown, None),
        }
    }

    /// Blend `fg` over `bg` into `rect`
    ///
    /// `fg` must be Mono4; its levels are the alpha of `fg.fg_color`. The
    /// capability is selected by the format of `bg`.
    fn draw_blended(
        &mut self,
        rect: Rect,
        fg: &BitmapRef<'_>,
        bg: &BitmapRef<'_>,
    ) -> GdcResult<Self::Error> {
        let info = self.bitmap_info().unwrap_or_default();
        let clip = clip(rect, info.size, Some(fg), Some(bg));
        if clip.is_empty() {
            return Ok(());
        }

        let mut params = Dma2dParams {
            srca: layer(fg, clip.fg),
            srcb: layer(bg, clip.bg),
            ..destination(&info, &clip)
        };
        params.cpu_only |= no_dma(fg) || no_dma(bg);

        self.fence();
        match (fg.bitmap.format(), bg.bitmap.format()) {
            (Format::Mono4, Format::Mono4) => self.blend_mono4_mono4(&params),
            (Format::Mono4, Format::Rgb565) => self.blend_mono4_rgb565(&params),
            (Format::Mono4, Format::Rgba8888) => self.blend_mono4_rgba8888(&params),
            (fg, bg) => unsupported_format(fg, Some(bg)),
        }
    }
}

impl<G: GdcBackend + ?Sized> Gdc for G {}

fn destination<'a>(info: &BitmapInfo, clip: &Clip) -> Dma2dParams<'a> {
    Dma2dParams {
        height: clip.height.max(0) as u16,
        width: clip.width.max(0) as u16,
        dst_x: clip.dst.x as u16,
        dst_y: clip.dst.y as u16,
        dst_stride: info.stride,
        cpu_only: info.attrs.contains(BitmapAttrs::NO_DMA),
        ..Dma2dParams::default()
    }
}

fn layer<'a>(src: &BitmapRef<'a>, start: Offset) -> Layer<'a> {
    Layer {
        rows: src.bitmap.rows_from(start.y as usize),
        x: start.x as u16,
        stride: src.bitmap.stride(),
        fg: src.fg_color,
        bg: src.bg_color,
    }
}

fn no_dma(src: &BitmapRef<'_>) -> bool {
    src.bitmap.attrs().contains(BitmapAttrs::NO_DMA)
}

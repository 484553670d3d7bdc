//! Operation descriptor and the 2-D DMA accelerator seam
//!
//! The dispatcher flattens every drawing request into a [`Dma2dParams`]
//! before handing it to a backend. The descriptor is built per call and never
//! retained.
//!
//! A hardware 2-D DMA engine plugs into the RGB565 backend through the
//! [`Dma2d`] trait. Every method may decline a job by returning `false`, in
//! which case the backend runs its CPU loop instead; [`NoDma`] declines
//! everything.

use crate::color::Color;

/// One source plane of an operation
///
/// `rows` starts at the first clipped row of the source bitmap; `x` is the
/// first clipped column. For a fill only `fg` is meaningful.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Layer<'a> {
    /// Source storage starting at the first participating row
    pub rows: &'a [u8],
    /// First participating column (in pixels)
    pub x: u16,
    /// Distance between rows in bytes
    pub stride: usize,
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
}

impl<'a> Layer<'a> {
    /// A layer with no storage, carrying only a color
    pub fn solid(color: Color) -> Self {
        Self {
            fg: color,
            ..Self::default()
        }
    }

    /// Bytes of row `n` relative to the first participating row
    ///
    /// Returns an empty slice past the end of storage.
    pub fn row(&self, n: usize) -> &'a [u8] {
        let start = n.saturating_mul(self.stride);
        let end = start.saturating_add(self.stride).min(self.rows.len());
        self.rows.get(start..end).unwrap_or(&[])
    }
}

/// Flattened description of one rectangle operation
///
/// The destination buffer itself belongs to the backend; the descriptor only
/// names the rectangle on it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dma2dParams<'a> {
    /// Rows to process
    pub height: u16,
    /// Pixels per row
    pub width: u16,
    /// Destination left edge
    pub dst_x: u16,
    /// Destination top edge
    pub dst_y: u16,
    /// Destination distance between rows in bytes
    pub dst_stride: usize,
    /// Source A (foreground); its `fg` is the fill color
    pub srca: Layer<'a>,
    /// Source B (background), used only by blends
    pub srcb: Layer<'a>,
    /// Process on the CPU only (some buffer is not DMA-accessible)
    pub cpu_only: bool,
}

/// A 2-D DMA engine accelerating RGB565 surfaces
///
/// `dst` is the whole destination surface; the rectangle to touch is given by
/// `params`. Returning `true` means the job was issued. An engine may keep
/// working after returning; [`wait`](Dma2d::wait) must block until every
/// issued job has completed. The backend calls `wait` before any CPU access to
/// the surface and before the surface is released.
pub trait Dma2d {
    /// Fill the destination rectangle with `params.srca.fg`
    fn rgb565_fill(&mut self, _dst: &mut [u8], _params: &Dma2dParams<'_>) -> bool {
        false
    }

    /// Expand a Mono4 source through the `srca` gradient
    fn rgb565_copy_mono4(&mut self, _dst: &mut [u8], _params: &Dma2dParams<'_>) -> bool {
        false
    }

    /// Copy an RGB565 source
    fn rgb565_copy_rgb565(&mut self, _dst: &mut [u8], _params: &Dma2dParams<'_>) -> bool {
        false
    }

    /// Blend `srca.fg` with Mono4 alpha over an RGB565 source
    fn rgb565_blend_mono4_rgb565(&mut self, _dst: &mut [u8], _params: &Dma2dParams<'_>) -> bool {
        false
    }

    /// Block until all issued jobs have completed
    fn wait(&mut self) {}
}

/// Absent accelerator: every job runs on the CPU
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDma;

impl Dma2d for NoDma {}

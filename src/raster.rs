//! Per-pixel formulas shared by the CPU paths of all backends
//!
//! A [`Raster`] turns an operation descriptor into a stream of RGB565 colors,
//! row by row. The RGB565 backend writes the stream into its buffer, the
//! windowed backend pushes it to the display, so both produce identical
//! pixels for the same request.

use crate::color::{Color, gradient_a4};
use crate::dma2d::Dma2dParams;
use crate::error::Operation;

/// Pixel generator for one operation
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Raster {
    /// Constant color
    Fill(Color),
    /// Mono4 level looked up in a gradient
    CopyMono4([Color; 16]),
    /// RGB565 source pixels
    CopyRgb565,
    /// Mono4 alpha of `fg` over a Mono4 background expanded through `gradient`
    BlendMono4Mono4 {
        /// Blended foreground color
        fg: Color,
        /// Background gradient
        gradient: [Color; 16],
    },
    /// Mono4 alpha of `fg` over RGB565 background pixels
    BlendMono4Rgb565 {
        /// Blended foreground color
        fg: Color,
    },
}

impl Raster {
    /// Raster for `op`, or `None` if no CPU formula exists for it
    pub(crate) fn new(op: Operation, p: &Dma2dParams<'_>) -> Option<Self> {
        match op {
            Operation::Fill => Some(Self::Fill(p.srca.fg)),
            Operation::CopyMono4 => Some(Self::CopyMono4(gradient_a4(p.srca.fg, p.srca.bg))),
            Operation::CopyRgb565 => Some(Self::CopyRgb565),
            Operation::BlendMono4Mono4 => Some(Self::BlendMono4Mono4 {
                fg: p.srca.fg,
                gradient: gradient_a4(p.srcb.fg, p.srcb.bg),
            }),
            Operation::BlendMono4Rgb565 => Some(Self::BlendMono4Rgb565 { fg: p.srca.fg }),
            Operation::CopyRgba8888 | Operation::BlendMono4Rgba8888 => None,
        }
    }

    /// Colors of row `n` of the clipped rectangle, left to right
    pub(crate) fn row(&self, p: &Dma2dParams<'_>, n: usize) -> impl Iterator<Item = Color> {
        let raster = *self;
        let srca = p.srca.row(n);
        let srcb = p.srcb.row(n);
        let ax = usize::from(p.srca.x);
        let bx = usize::from(p.srcb.x);
        (0..usize::from(p.width)).map(move |x| raster.pixel(srca, ax + x, srcb, bx + x))
    }

    fn pixel(&self, srca: &[u8], ax: usize, srcb: &[u8], bx: usize) -> Color {
        match self {
            Self::Fill(color) => *color,
            Self::CopyMono4(gradient) => gradient[usize::from(mono4_level(srca, ax))],
            Self::CopyRgb565 => rgb565_at(srca, ax),
            Self::BlendMono4Mono4 { fg, gradient } => {
                let bg = gradient[usize::from(mono4_level(srcb, bx))];
                fg.blend_a4(bg, mono4_level(srca, ax))
            }
            Self::BlendMono4Rgb565 { fg } => fg.blend_a4(rgb565_at(srcb, bx), mono4_level(srca, ax)),
        }
    }
}

/// 4-bit level of pixel `x` in a packed Mono4 row
///
/// Even pixels live in the low nibble, odd pixels in the high nibble.
pub(crate) fn mono4_level(row: &[u8], x: usize) -> u8 {
    let byte = row.get(x / 2).copied().unwrap_or(0);
    if x & 1 == 1 { byte >> 4 } else { byte & 0x0F }
}

/// RGB565 pixel `x` of a little-endian row
pub(crate) fn rgb565_at(row: &[u8], x: usize) -> Color {
    match row.get(2 * x..2 * x + 2) {
        Some(&[lo, hi]) => Color::from_le_bytes([lo, hi]),
        _ => Color::BLACK,
    }
}

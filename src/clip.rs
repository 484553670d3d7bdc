//! Clipping of a destination rectangle against a surface and up to two sources
//!
//! [`clip`] finds the single rectangle that is valid on the destination
//! surface and on every participating bitmap, and returns the start offset
//! into each buffer.
//!
//! ## Example
//!
//! ```
//! use gdc::{Bitmap, BitmapRef, Format, Offset, Rect, Size};
//! use gdc::clip::clip;
//!
//! let pixels = [0u8; 50 * 50];
//! let bitmap = match Bitmap::new(&pixels, 50, Size::new(100, 50), Format::Mono4) {
//!     Ok(bitmap) => bitmap,
//!     Err(_) => return,
//! };
//! let fg = BitmapRef::new(bitmap).with_offset(Offset::new(-3, -5));
//!
//! let c = clip(Rect::new(10, 10, 50, 50), Size::new(100, 100), Some(&fg), None);
//! assert_eq!(c.dst, Offset::new(13, 15));
//! assert_eq!(c.fg, Offset::new(0, 0));
//! assert_eq!((c.width, c.height), (37, 35));
//! ```

use crate::bitmap::BitmapRef;
use crate::geometry::{Offset, Rect, Size};

/// Result of clipping
///
/// `width` or `height` at or below zero means there is nothing to draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Clip {
    /// Top-left corner on the destination surface
    pub dst: Offset,
    /// Start position inside the foreground bitmap
    pub fg: Offset,
    /// Start position inside the background bitmap
    pub bg: Offset,
    /// Effective width
    pub width: i16,
    /// Effective height
    pub height: i16,
}

impl Clip {
    /// Returns true if nothing is left to draw
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Clip `dst` against a surface of `size` and the optional `fg` / `bg` bitmaps
///
/// A negative source offset moves the destination origin (and the other
/// source) forward by the same amount; a negative destination origin moves
/// both sources forward. The remaining size is the smallest extent available
/// on every participant.
pub fn clip(dst: Rect, size: Size, fg: Option<&BitmapRef<'_>>, bg: Option<&BitmapRef<'_>>) -> Clip {
    let mut dst_x = dst.x0;
    let mut dst_y = dst.y0;

    let mut fg_x: i16 = 0;
    let mut fg_y: i16 = 0;

    let mut bg_x: i16 = 0;
    let mut bg_y: i16 = 0;

    if let Some(fg) = fg {
        fg_x = fg_x.saturating_add(fg.offset.x);
        fg_y = fg_y.saturating_add(fg.offset.y);

        if fg_x < 0 {
            dst_x = dst_x.saturating_sub(fg_x);
            bg_x = bg_x.saturating_sub(fg_x);
            fg_x = 0;
        }

        if fg_y < 0 {
            dst_y = dst_y.saturating_sub(fg_y);
            bg_y = bg_y.saturating_sub(fg_y);
            fg_y = 0;
        }
    }

    if let Some(bg) = bg {
        bg_x = bg_x.saturating_add(bg.offset.x);
        bg_y = bg_y.saturating_add(bg.offset.y);

        if bg_x < 0 {
            dst_x = dst_x.saturating_sub(bg_x);
            fg_x = fg_x.saturating_sub(bg_x);
            bg_x = 0;
        }

        if bg_y < 0 {
            dst_y = dst_y.saturating_sub(bg_y);
            fg_y = fg_y.saturating_sub(bg_y);
            bg_y = 0;
        }
    }

    // Destination partially above / left of the surface
    if dst_x < 0 {
        fg_x = fg_x.saturating_sub(dst_x);
        bg_x = bg_x.saturating_sub(dst_x);
        dst_x = 0;
    }

    if dst_y < 0 {
        fg_y = fg_y.saturating_sub(dst_y);
        bg_y = bg_y.saturating_sub(dst_y);
        dst_y = 0;
    }

    let mut width = size.width.min(dst.x1).saturating_sub(dst_x);
    let mut height = size.height.min(dst.y1).saturating_sub(dst_y);

    if let Some(fg) = fg {
        let fg_size = fg.bitmap.size();
        width = width.min(fg_size.width.saturating_sub(fg_x));
        height = height.min(fg_size.height.saturating_sub(fg_y));
    }

    if let Some(bg) = bg {
        let bg_size = bg.bitmap.size();
        width = width.min(bg_size.width.saturating_sub(bg_x));
        height = height.min(bg_size.height.saturating_sub(bg_y));
    }

    Clip {
        dst: Offset::new(dst_x, dst_y),
        fg: Offset::new(fg_x, fg_y),
        bg: Offset::new(bg_x, bg_y),
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::{Bitmap, Format};

    static STORAGE: [u8; 100 * 100] = [0u8; 100 * 100];

    fn mono4(width: i16, height: i16) -> Bitmap<'static> {
        let stride = Format::Mono4.min_stride(width as usize);
        Bitmap::new(&STORAGE, stride, Size::new(width, height), Format::Mono4).unwrap()
    }

    #[test]
    fn test_no_sources_inside_surface() {
        let c = clip(Rect::new(10, 20, 30, 40), Size::new(100, 100), None, None);
        assert_eq!(c.dst, Offset::new(10, 20));
        assert_eq!(c.fg, Offset::zero());
        assert_eq!(c.bg, Offset::zero());
        assert_eq!((c.width, c.height), (20, 20));
    }

    #[test]
    fn test_destination_clamped_to_surface() {
        let c = clip(Rect::new(90, 95, 150, 150), Size::new(100, 100), None, None);
        assert_eq!((c.width, c.height), (10, 5));
    }

    #[test]
    fn test_fully_outside_surface_is_empty() {
        let c = clip(Rect::new(200, 0, 250, 10), Size::new(100, 100), None, None);
        assert!(c.width <= 0);
        assert!(c.is_empty());
    }

    #[test]
    fn test_negative_fg_offset_normalized() {
        let fg = BitmapRef::new(mono4(100, 100)).with_offset(Offset::new(-3, -5));
        let c = clip(Rect::new(10, 10, 50, 50), Size::new(100, 100), Some(&fg), None);
        assert_eq!(c.dst, Offset::new(13, 15));
        assert_eq!(c.fg, Offset::new(0, 0));
        assert_eq!((c.width, c.height), (40 - 3, 40 - 5));
    }

    #[test]
    fn test_positive_fg_offset_kept() {
        let fg = BitmapRef::new(mono4(100, 100)).with_offset(Offset::new(4, 7));
        let c = clip(Rect::new(10, 10, 50, 50), Size::new(100, 100), Some(&fg), None);
        assert_eq!(c.dst, Offset::new(10, 10));
        assert_eq!(c.fg, Offset::new(4, 7));
        assert_eq!((c.width, c.height), (40, 40));
    }

    #[test]
    fn test_negative_bg_offset_shifts_fg() {
        let fg = BitmapRef::new(mono4(100, 100)).with_offset(Offset::new(2, 1));
        let bg = BitmapRef::new(mono4(100, 100)).with_offset(Offset::new(-6, -4));
        let c = clip(
            Rect::new(10, 10, 50, 50),
            Size::new(100, 100),
            Some(&fg),
            Some(&bg),
        );
        assert_eq!(c.dst, Offset::new(16, 14));
        assert_eq!(c.fg, Offset::new(8, 5));
        assert_eq!(c.bg, Offset::new(0, 0));
        assert_eq!((c.width, c.height), (34, 36));
    }

    #[test]
    fn test_both_offsets_negative() {
        let fg = BitmapRef::new(mono4(100, 100)).with_offset(Offset::new(-3, -5));
        let bg = BitmapRef::new(mono4(100, 100)).with_offset(Offset::new(-2, -1));
        let c = clip(
            Rect::new(10, 10, 50, 50),
            Size::new(100, 100),
            Some(&fg),
            Some(&bg),
        );
        // fg shifts dst by (3,5) and bg to (3,5); bg stays positive
        assert_eq!(c.dst, Offset::new(13, 15));
        assert_eq!(c.fg, Offset::new(0, 0));
        assert_eq!(c.bg, Offset::new(1, 4));
        assert_eq!((c.width, c.height), (37, 35));
    }

    #[test]
    fn test_negative_destination_shifts_sources() {
        let fg = BitmapRef::new(mono4(100, 100));
        let c = clip(Rect::new(-5, -8, 20, 20), Size::new(100, 100), Some(&fg), None);
        assert_eq!(c.dst, Offset::new(0, 0));
        assert_eq!(c.fg, Offset::new(5, 8));
        assert_eq!((c.width, c.height), (20, 20));
    }

    #[test]
    fn test_clamped_by_source_size() {
        let fg = BitmapRef::new(mono4(16, 8)).with_offset(Offset::new(4, 2));
        let c = clip(Rect::new(0, 0, 50, 50), Size::new(100, 100), Some(&fg), None);
        assert_eq!((c.width, c.height), (12, 6));
    }

    #[test]
    fn test_result_bounded_by_every_participant() {
        let fg = BitmapRef::new(mono4(30, 60));
        let bg = BitmapRef::new(mono4(70, 20));
        let offsets = [-7i16, -1, 0, 3, 11];
        for &fx in &offsets {
            for &by in &offsets {
                let fg = fg.with_offset(Offset::new(fx, by));
                let bg = bg.with_offset(Offset::new(by, fx));
                let dst = Rect::new(-4, 5, 45, 90);
                let c = clip(dst, Size::new(40, 50), Some(&fg), Some(&bg));
                assert!(c.width <= 40 - c.dst.x);
                assert!(c.height <= 50 - c.dst.y);
                assert!(c.width <= dst.x1 - c.dst.x);
                assert!(c.height <= dst.y1 - c.dst.y);
                assert!(c.width <= 30 - c.fg.x);
                assert!(c.height <= 60 - c.fg.y);
                assert!(c.width <= 70 - c.bg.x);
                assert!(c.height <= 20 - c.bg.y);
                assert!(c.dst.x >= 0 && c.dst.y >= 0);
                assert!(c.fg.x >= 0 && c.fg.y >= 0);
                assert!(c.bg.x >= 0 && c.bg.y >= 0);
            }
        }
    }
}

//! Windowed display device context
//!
//! [`Wnd565`] draws on a display controller that is written through a
//! rectangular write window: program the window, then stream pixels which
//! the controller places row-major inside it. The context remembers the
//! programmed window and where the controller's write pointer currently is,
//! and only reprograms the window when the next operation cannot continue
//! from there.
//!
//! Pixels are produced by the same formulas as the RGB565 framebuffer
//! backend. RGBA8888 sources are not supported.

use log::{debug, trace};

use crate::bitmap::{BitmapAttrs, BitmapInfo, Format};
use crate::dma2d::Dma2dParams;
use crate::error::{Error, Operation};
use crate::gdc::{GdcBackend, GdcResult};
use crate::geometry::{Offset, Rect, Size};
use crate::interface::DisplayInterface;
use crate::raster::Raster;

/// Device context streaming RGB565 pixels to a display controller
pub struct Wnd565<I> {
    interface: I,
    info: BitmapInfo,
    ram_offset: (u16, u16),
    cursor_x: i16,
    cursor_y: i16,
    window: Rect,
}

impl<I> Wnd565<I>
where
    I: DisplayInterface,
{
    /// Create a context for a panel of `size` pixels
    ///
    /// No window is programmed until the first operation.
    pub fn new(interface: I, size: Size) -> Self {
        Self {
            interface,
            info: BitmapInfo {
                size,
                stride: size.width.max(0) as usize * 2,
                format: Format::Rgb565,
                attrs: BitmapAttrs::NO_DMA,
            },
            ram_offset: (0, 0),
            cursor_x: 0,
            cursor_y: 0,
            window: Rect::default(),
        }
    }

    /// Position of the panel inside controller RAM
    pub fn with_ram_offset(mut self, x: u16, y: u16) -> Self {
        self.ram_offset = (x, y);
        self
    }

    /// The currently programmed window, in panel coordinates
    pub fn window(&self) -> Rect {
        self.window
    }

    /// Where the next streamed pixel lands
    pub fn cursor(&self) -> Offset {
        Offset::new(self.cursor_x, self.cursor_y)
    }

    /// The underlying interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Give the interface back
    pub fn into_interface(self) -> I {
        self.interface
    }

    /// Returns true unless `params` can be streamed from the current write
    /// pointer inside the programmed window
    ///
    /// A single-row operation continues if it starts at the cursor and ends
    /// at or before the right edge. A multi-row operation additionally needs
    /// the window's horizontal extent to match exactly and must end at or
    /// above the bottom edge.
    fn window_update_needed(&self, params: &Dma2dParams<'_>) -> bool {
        let x = params.dst_x as i16;
        let y = params.dst_y as i16;
        let right = x.saturating_add(params.width as i16);
        let bottom = y.saturating_add(params.height as i16);

        if self.cursor_x != x || self.cursor_y != y {
            return true;
        }

        if !self.window.contains(self.cursor_x, self.cursor_y) {
            return true;
        }

        if params.height == 1 {
            right > self.window.x1
        } else {
            x != self.window.x0 || right != self.window.x1 || bottom > self.window.y1
        }
    }

    fn program_window(&mut self, params: &Dma2dParams<'_>) -> GdcResult<I::Error> {
        let (off_x, off_y) = self.ram_offset;
        let x0 = params.dst_x.saturating_add(off_x);
        let y0 = params.dst_y.saturating_add(off_y);
        let x1 = x0.saturating_add(params.width.saturating_sub(1));
        let y1 = y0.saturating_add(params.height.saturating_sub(1));

        trace!("Set window ({x0}, {y0})..=({x1}, {y1})");
        if let Err(e) = self.interface.set_window(x0, y0, x1, y1) {
            self.invalidate();
            return Err(Error::Interface(e));
        }

        let x = params.dst_x as i16;
        let y = params.dst_y as i16;
        self.window = Rect::new(
            x,
            y,
            x.saturating_add(params.width as i16),
            y.saturating_add(params.height as i16),
        );
        self.cursor_x = x;
        self.cursor_y = y;
        Ok(())
    }

    fn ensure_window(&mut self, params: &Dma2dParams<'_>) -> GdcResult<I::Error> {
        if self.window_update_needed(params) {
            self.program_window(params)?;
        }
        Ok(())
    }

    fn advance_cursor(&mut self, params: &Dma2dParams<'_>) {
        self.cursor_x = self.cursor_x.saturating_add(params.width as i16);
        if self.cursor_x >= self.window.x1 {
            self.cursor_x = self.window.x0;
            self.cursor_y = self.cursor_y.saturating_add(params.height as i16);
        }
    }

    /// Forget the controller state so the next operation reprograms it
    fn invalidate(&mut self) {
        self.window = Rect::default();
    }

    fn stream(&mut self, op: Operation, params: &Dma2dParams<'_>) -> GdcResult<I::Error> {
        let raster = Raster::new(op, params).ok_or(Error::Unsupported(op))?;

        self.ensure_window(params)?;

        for n in 0..usize::from(params.height) {
            for color in raster.row(params, n) {
                if let Err(e) = self.interface.push_pixel(color) {
                    self.invalidate();
                    return Err(Error::Interface(e));
                }
            }
        }

        self.advance_cursor(params);
        Ok(())
    }
}

impl<I> GdcBackend for Wnd565<I>
where
    I: DisplayInterface,
{
    type Error = I::Error;

    fn bitmap_info(&self) -> Option<BitmapInfo> {
        Some(self.info)
    }

    fn on_release(&mut self) {
        debug!("Windowed context released");
        self.invalidate();
    }

    fn window_hint(&mut self, params: &Dma2dParams<'_>) -> GdcResult<I::Error> {
        if params.width > 0 && params.height > 0 {
            self.ensure_window(params)?;
        }
        Ok(())
    }

    fn fill(&mut self, params: &Dma2dParams<'_>) -> GdcResult<I::Error> {
        self.stream(Operation::Fill, params)
    }

    fn copy_mono4(&mut self, params: &Dma2dParams<'_>) -> GdcResult<I::Error> {
        self.stream(Operation::CopyMono4, params)
    }

    fn copy_rgb565(&mut self, params: &Dma2dParams<'_>) -> GdcResult<I::Error> {
        self.stream(Operation::CopyRgb565, params)
    }

    fn blend_mono4_mono4(&mut self, params: &Dma2dParams<'_>) -> GdcResult<I::Error> {
        self.stream(Operation::BlendMono4Mono4, params)
    }

    fn blend_mono4_rgb565(&mut self, params: &Dma2dParams<'_>) -> GdcResult<I::Error> {
        self.stream(Operation::BlendMono4Rgb565, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::{Bitmap, BitmapRef};
    use crate::color::Color;
    use crate::gdc::Gdc;
    use crate::rgb565::Rgb565Gdc;
    use alloc::vec;
    use alloc::vec::Vec;
    use embedded_hal::delay::DelayNs;

    /// Interface recording window sets and pixels
    #[derive(Default)]
    struct Recorder {
        windows: Vec<(u16, u16, u16, u16)>,
        pixels: Vec<Color>,
        fail_after: Option<usize>,
    }

    impl DisplayInterface for Recorder {
        type Error = ();

        fn send_command(&mut self, _command: u8) -> Result<(), ()> {
            Ok(())
        }

        fn send_data(&mut self, _data: &[u8]) -> Result<(), ()> {
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D) {}

        fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), ()> {
            self.windows.push((x0, y0, x1, y1));
            Ok(())
        }

        fn push_pixel(&mut self, color: Color) -> Result<(), ()> {
            if self.fail_after == Some(self.pixels.len()) {
                return Err(());
            }
            self.pixels.push(color);
            Ok(())
        }
    }

    fn display() -> Wnd565<Recorder> {
        Wnd565::new(Recorder::default(), Size::new(240, 240))
    }

    #[test]
    fn test_first_fill_programs_exact_window() {
        let mut gdc = display();
        gdc.fill_rect(Rect::new(10, 20, 14, 23), Color::WHITE).unwrap();
        assert_eq!(gdc.interface().windows, [(10, 20, 13, 22)]);
        assert_eq!(gdc.interface().pixels.len(), 12);
        assert_eq!(gdc.window(), Rect::new(10, 20, 14, 23));
        // full-width multi-row op ends below the window
        assert_eq!(gdc.cursor(), Offset::new(10, 23));
    }

    #[test]
    fn test_adjacent_single_row_fills_share_window() {
        let mut gdc = display();
        gdc.set_window_hint(Rect::new(0, 10, 40, 11)).unwrap();
        assert_eq!(gdc.interface().windows.len(), 1);

        gdc.fill_rect(Rect::new(0, 10, 10, 11), Color::WHITE).unwrap();
        gdc.fill_rect(Rect::new(10, 10, 25, 11), Color::BLACK).unwrap();
        assert_eq!(gdc.interface().windows.len(), 1);
        assert_eq!(gdc.cursor(), Offset::new(25, 10));

        gdc.fill_rect(Rect::new(0, 30, 5, 31), Color::WHITE).unwrap();
        assert_eq!(gdc.interface().windows.len(), 2);
        assert_eq!(gdc.interface().windows[1], (0, 30, 4, 30));
    }

    #[test]
    fn test_single_row_past_right_edge_reprograms() {
        let mut gdc = display();
        gdc.set_window_hint(Rect::new(0, 0, 10, 1)).unwrap();
        gdc.fill_rect(Rect::new(0, 0, 6, 1), Color::WHITE).unwrap();
        gdc.fill_rect(Rect::new(6, 0, 12, 1), Color::WHITE).unwrap();
        assert_eq!(gdc.interface().windows.len(), 2);
    }

    #[test]
    fn test_row_wrap_continues_in_window() {
        let mut gdc = display();
        gdc.set_window_hint(Rect::new(4, 4, 8, 6)).unwrap();
        // fill the first row, then the second row starts at the left edge
        gdc.fill_rect(Rect::new(4, 4, 8, 5), Color::WHITE).unwrap();
        assert_eq!(gdc.cursor(), Offset::new(4, 5));
        gdc.fill_rect(Rect::new(4, 5, 8, 6), Color::WHITE).unwrap();
        assert_eq!(gdc.interface().windows.len(), 1);
    }

    #[test]
    fn test_multi_row_bands_share_window() {
        let mut gdc = display();
        gdc.set_window_hint(Rect::new(0, 0, 8, 8)).unwrap();
        gdc.fill_rect(Rect::new(0, 0, 8, 2), Color::WHITE).unwrap();
        gdc.fill_rect(Rect::new(0, 2, 8, 5), Color::WHITE).unwrap();
        assert_eq!(gdc.interface().windows.len(), 1);

        // too tall for the rest of the window
        gdc.fill_rect(Rect::new(0, 5, 8, 9), Color::WHITE).unwrap();
        assert_eq!(gdc.interface().windows.len(), 2);
    }

    #[test]
    fn test_multi_row_narrower_than_window_reprograms() {
        let mut gdc = display();
        gdc.set_window_hint(Rect::new(0, 0, 8, 8)).unwrap();
        gdc.fill_rect(Rect::new(0, 0, 4, 2), Color::WHITE).unwrap();
        assert_eq!(gdc.interface().windows.len(), 2);
    }

    #[test]
    fn test_empty_hint_programs_nothing() {
        let mut gdc = display();
        gdc.set_window_hint(Rect::new(300, 0, 310, 10)).unwrap();
        assert!(gdc.interface().windows.is_empty());
    }

    #[test]
    fn test_ram_offset_applied() {
        let mut gdc = Wnd565::new(Recorder::default(), Size::new(135, 240)).with_ram_offset(52, 40);
        gdc.fill_rect(Rect::new(0, 0, 2, 2), Color::WHITE).unwrap();
        assert_eq!(gdc.interface().windows, [(52, 40, 53, 41)]);
    }

    #[test]
    fn test_pixels_match_framebuffer_backend() {
        let mask = [0x10u8, 0x32, 0xFE, 0x98];
        let src = Bitmap::new(&mask, 2, Size::new(4, 2), Format::Mono4).unwrap();
        let src = BitmapRef::new(src)
            .with_fg(Color::rgb(255, 128, 0))
            .with_bg(Color::rgb(0, 0, 64));
        let rect = Rect::new(1, 1, 5, 3);

        let mut wnd = Wnd565::new(Recorder::default(), Size::new(6, 4));
        wnd.draw_bitmap(rect, &src).unwrap();

        let mut fb = Rgb565Gdc::new(vec![0u8; 6 * 4 * 2], 12, Size::new(6, 4)).unwrap();
        fb.draw_bitmap(rect, &src).unwrap();

        let mut expected = Vec::new();
        for y in 1..3 {
            for x in 1..5 {
                expected.push(fb.pixel(x, y).unwrap());
            }
        }
        assert_eq!(wnd.interface().pixels, expected);
    }

    #[test]
    fn test_blend_streams_blended_pixels() {
        let alpha = [0xF0u8];
        let bg = [0x34u8, 0x12, 0x34, 0x12];
        let fg = Bitmap::new(&alpha, 1, Size::new(2, 1), Format::Mono4).unwrap();
        let bg = Bitmap::new(&bg, 4, Size::new(2, 1), Format::Rgb565).unwrap();

        let mut gdc = display();
        gdc.draw_blended(
            Rect::new(0, 0, 2, 1),
            &BitmapRef::new(fg).with_fg(Color::WHITE),
            &BitmapRef::new(bg),
        )
        .unwrap();
        assert_eq!(
            gdc.interface().pixels,
            [Color::from_u16(0x1234), Color::WHITE]
        );
    }

    #[test]
    fn test_rgba8888_unsupported_streams_nothing() {
        let data = [0u8; 8];
        let src = Bitmap::new(&data, 8, Size::new(2, 1), Format::Rgba8888).unwrap();
        let mut gdc = display();
        assert_eq!(
            gdc.draw_bitmap(Rect::new(0, 0, 2, 1), &BitmapRef::new(src)),
            Err(Error::Unsupported(Operation::CopyRgba8888))
        );
        assert!(gdc.interface().windows.is_empty());
        assert!(gdc.interface().pixels.is_empty());
    }

    #[test]
    fn test_push_error_forces_reprogram() {
        let recorder = Recorder {
            fail_after: Some(3),
            ..Recorder::default()
        };
        let mut gdc = Wnd565::new(recorder, Size::new(16, 16));
        assert_eq!(
            gdc.fill_rect(Rect::new(0, 0, 4, 1), Color::WHITE),
            Err(Error::Interface(()))
        );
        assert_eq!(gdc.window(), Rect::default());

        gdc.release();
        let mut recorder = gdc.into_interface();
        recorder.fail_after = None;
        let mut gdc = Wnd565::new(recorder, Size::new(16, 16));
        gdc.fill_rect(Rect::new(0, 0, 4, 1), Color::WHITE).unwrap();
        assert_eq!(gdc.interface().windows.len(), 2);
    }
}

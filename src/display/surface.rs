/*
 *  display/surface.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Bit-packed, page-organised pixel surface
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::display::error::DisplayError;
use crate::display::traits::DisplayCapabilities;

/// Rows per page (one buffer byte holds one column of a page)
pub const PAGE_EDGE: u32 = 8;

/// A runtime-sized monochrome surface in controller RAM layout.
///
/// Byte `x + page * width` holds column `x` of page `page`; bit `n`
/// (LSB first) is row `page * 8 + n`. The buffer is allocated once and
/// never resized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelSurface {
    /// Create a zero-filled surface. Height must be a positive multiple of 8.
    pub fn new(width: u32, height: u32) -> Result<Self, DisplayError> {
        if width == 0 || height == 0 {
            return Err(DisplayError::InvalidConfiguration(
                format!("surface must be non-empty, got {}x{}", width, height)
            ));
        }
        if height % PAGE_EDGE != 0 {
            return Err(DisplayError::InvalidConfiguration(
                format!("surface height {} is not a multiple of {}", height, PAGE_EDGE)
            ));
        }
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(DisplayError::InvalidConfiguration(
                format!("surface {}x{} too large", width, height)
            ));
        }
        let pages = height / PAGE_EDGE;
        Ok(Self {
            buffer: vec![0; (width * pages) as usize],
            width,
            height,
        })
    }

    pub fn from_capabilities(caps: &DisplayCapabilities) -> Result<Self, DisplayError> {
        Self::new(caps.width, caps.height)
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn page_count(&self) -> u32 { self.height / PAGE_EDGE }

    pub fn capabilities(&self) -> DisplayCapabilities {
        DisplayCapabilities { width: self.width, height: self.height }
    }

    /// Packed bytes in transmission order
    pub fn as_bytes(&self) -> &[u8] { &self.buffer }

    /// True when (x, y) lies on the surface without wrapping
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Wrap (x, y) onto the surface and map to (byte index, bit mask)
    #[inline]
    fn locate(&self, x: i32, y: i32) -> (usize, u8) {
        let x = x.rem_euclid(self.width as i32) as u32;
        let y = y.rem_euclid(self.height as i32) as u32;
        let (page, offset) = (y / PAGE_EDGE, y % PAGE_EDGE);
        ((x + page * self.width) as usize, 1 << offset)
    }

    /// Set or clear one pixel. Out-of-range coordinates wrap around.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        let (i, mask) = self.locate(x, y);
        if on {
            self.buffer[i] |= mask;
        } else {
            self.buffer[i] &= !mask;
        }
    }

    /// Read one pixel, wrapping like [`set_pixel`](Self::set_pixel)
    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        let (i, mask) = self.locate(x, y);
        self.buffer[i] & mask != 0
    }

    /// Like [`set_pixel`](Self::set_pixel) but ignores off-surface
    /// coordinates instead of wrapping them. Returns whether a pixel was touched.
    pub fn set_pixel_clipped(&mut self, x: i32, y: i32, on: bool) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        self.set_pixel(x, y, on);
        true
    }

    /// Fill every pixel on or off
    pub fn fill(&mut self, on: bool) {
        self.buffer.fill(if on { 0xFF } else { 0x00 });
    }

    /// Number of lit pixels
    pub fn count_on(&self) -> usize {
        self.buffer.iter().map(|b| b.count_ones() as usize).sum()
    }
}

impl OriginDimensions for PixelSurface {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

// embedded-graphics clips rather than wraps
impl DrawTarget for PixelSurface {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            self.set_pixel_clipped(p.x, p.y, c.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.is_on());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_surface_creation() {
        let surface = PixelSurface::new(128, 64).unwrap();
        assert_eq!(surface.page_count(), 8);
        assert_eq!(surface.as_bytes().len(), 1024);
        assert_eq!(surface.count_on(), 0);
    }

    #[test]
    fn test_surface_rejects_bad_geometry() {
        assert!(PixelSurface::new(128, 60).is_err());
        assert!(PixelSurface::new(0, 64).is_err());
        assert!(PixelSurface::new(128, 0).is_err());
    }

    #[test]
    fn test_bit_layout() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        surface.set_pixel(5, 0, true);
        assert_eq!(surface.as_bytes()[5], 0x01);
        surface.set_pixel(5, 7, true);
        assert_eq!(surface.as_bytes()[5], 0x81);
        // row 9 lives in page 1, bit 1
        surface.set_pixel(3, 9, true);
        assert_eq!(surface.as_bytes()[3 + 128], 0x02);
    }

    #[test]
    fn test_set_and_clear() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        surface.set_pixel(10, 20, true);
        assert!(surface.get_pixel(10, 20));
        surface.set_pixel(10, 20, false);
        assert!(!surface.get_pixel(10, 20));
        assert_eq!(surface.count_on(), 0);
    }

    #[test]
    fn test_wrap_addressing() {
        let mut a = PixelSurface::new(128, 64).unwrap();
        let mut b = PixelSurface::new(128, 64).unwrap();
        a.set_pixel(128, 0, true);
        b.set_pixel(0, 0, true);
        assert_eq!(a, b);

        a.set_pixel(-1, -1, true);
        assert!(a.get_pixel(127, 63));
        assert!(a.get_pixel(255, 127));
    }

    #[test]
    fn test_clipped_variant() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        assert!(!surface.set_pixel_clipped(128, 0, true));
        assert!(!surface.set_pixel_clipped(-1, 3, true));
        assert_eq!(surface.count_on(), 0);
        assert!(surface.set_pixel_clipped(127, 63, true));
        assert!(surface.get_pixel(127, 63));
    }

    #[test]
    fn test_fill() {
        let mut surface = PixelSurface::new(128, 32).unwrap();
        surface.fill(true);
        assert!(surface.as_bytes().iter().all(|&b| b == 0xFF));
        surface.fill(false);
        assert!(surface.as_bytes().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_draw_target_clips() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        Rectangle::new(Point::new(120, 60), Size::new(16, 16))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut surface)
            .unwrap();
        // only the 8x4 on-surface part is painted, nothing wraps to the origin
        assert_eq!(surface.count_on(), 32);
        assert!(!surface.get_pixel(0, 0));
    }
}

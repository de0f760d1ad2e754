/*
 *  display/raster.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Line, rectangle, circle and arc primitives
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

//! All primitives paint through [`PixelSurface::set_pixel`], so anything
//! partially off-screen wraps to the opposite edge.

use std::mem::swap;

use crate::display::surface::PixelSurface;

/// How [`PixelSurface::draw_circle`] paints the disc
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircleStyle {
    /// Every point strictly inside the radius
    Filled,

    /// An annulus whose width is `thickness` (0..=1) as a fraction of the radius
    Ring { thickness: f32 },
}

impl PixelSurface {
    /// Bresenham line from (x1, y1) to (x2, y2), both endpoints inclusive
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, on: bool) {
        let (mut x1, mut y1, mut x2, mut y2) = (x1, y1, x2, y2);

        let steep = (y2 - y1).abs() > (x2 - x1).abs();
        if steep {
            swap(&mut x1, &mut y1);
            swap(&mut x2, &mut y2);
        }
        if x1 > x2 {
            swap(&mut x1, &mut x2);
            swap(&mut y1, &mut y2);
        }

        let dx = (x2 - x1) as i64;
        let dy = (y2 - y1).abs() as i64;
        let ystep = if y1 < y2 { 1 } else { -1 };

        // error is kept doubled so the dx/2 starting point stays exact
        let mut err = dx;
        let mut y = y1;
        for x in x1..=x2 {
            if steep {
                self.set_pixel(y, x, on);
            } else {
                self.set_pixel(x, y, on);
            }
            err -= 2 * dy;
            if err < 0 {
                y += ystep;
                err += 2 * dx;
            }
        }
    }

    /// From left-most point (x, y) draw a line right of length `length`
    pub fn draw_hline(&mut self, x: i32, y: i32, length: i32, on: bool) {
        self.draw_line(x, y, x + length, y, on);
    }

    /// From top-most point (x, y) draw a line down of height `height`
    pub fn draw_vline(&mut self, x: i32, y: i32, height: i32, on: bool) {
        self.draw_line(x, y, x, y + height, on);
    }

    /// Rectangle outline with corners (x, y) and (x + w, y + h)
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, on: bool) {
        self.draw_hline(x, y, w, on);
        self.draw_hline(x, y + h, w, on);
        self.draw_vline(x, y, h, on);
        self.draw_vline(x + w, y, h, on);
    }

    /// Solid rectangle: one horizontal line per row in `y..y + h`
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, on: bool) {
        for row in y..y + h {
            self.draw_hline(x, row, w, on);
        }
    }

    /// Circle by bounding-box scan around (cx, cy).
    ///
    /// A radius of zero paints the centre pixel only.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, style: CircleStyle, on: bool) {
        if r == 0 {
            self.set_pixel(cx, cy, on);
            return;
        }

        let outer = (r as i64) * (r as i64);
        let inner = match style {
            CircleStyle::Filled => None,
            CircleStyle::Ring { thickness } => {
                let t = thickness.clamp(0.0, 1.0);
                // squared as is: a negative edge still excludes the centre
                let edge = r as f32 - r as f32 * t - 1.0;
                Some(edge * edge)
            }
        };

        for i in cx - r..=cx + r {
            for j in cy - r..=cy + r {
                let (di, dj) = ((i - cx) as i64, (j - cy) as i64);
                let d2 = di * di + dj * dj;
                if d2 >= outer {
                    continue;
                }
                match inner {
                    Some(edge) if (d2 as f32) < edge => {}
                    _ => self.set_pixel(i, j, on),
                }
            }
        }
    }

    /// Arc between `start_deg` (inclusive) and `end_deg` (exclusive),
    /// swept in whole degrees over the radius band `[r * (1 - thickness) - 1, r)`.
    ///
    /// Points are plotted per (radius, degree) pair, so large radii show
    /// gaps between consecutive degrees.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_arc(
        &mut self,
        cx: i32,
        cy: i32,
        r: i32,
        start_deg: i32,
        end_deg: i32,
        thickness: f32,
        on: bool,
    ) {
        let t = thickness.clamp(0.0, 1.0);
        let lo = ((r as f32 * (1.0 - t) - 1.0).ceil() as i32).max(0);
        for radius in lo..r {
            let radius = radius as f32;
            for deg in start_deg..end_deg {
                let (sin, cos) = (deg as f32).to_radians().sin_cos();
                let x = (cx as f32 + radius * cos).round() as i32;
                let y = (cy as f32 + radius * sin).round() as i32;
                self.set_pixel(x, y, on);
            }
        }
    }
}

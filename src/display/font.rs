/*
 *  display/font.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  8x8 column-encoded glyph table and text renderer
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

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info};

use crate::display::error::{FontError, TextError};
use crate::display::surface::{PixelSurface, PAGE_EDGE};

/// First printable ASCII code in the table
pub const FIRST_CHAR: u8 = 32;

/// Last printable ASCII code in the table
pub const LAST_CHAR: u8 = 126;

/// Number of glyphs (ASCII 32..=126)
pub const GLYPH_COUNT: usize = (LAST_CHAR - FIRST_CHAR + 1) as usize;

/// Columns per glyph, which is also the horizontal advance
pub const GLYPH_WIDTH: usize = 8;

/// Size in bytes of a complete font resource
pub const FONT_FILE_LEN: usize = GLYPH_COUNT * GLYPH_WIDTH;

/// One glyph: 8 columns, each byte a vertical 8-pixel slice (LSB at top)
pub type Glyph = [u8; GLYPH_WIDTH];

/// Immutable glyph table for printable ASCII
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphTable {
    glyphs: Vec<Glyph>,
}

impl GlyphTable {
    /// Build from a flat font image: entry `n` at byte offset `n * 8`.
    /// Trailing bytes beyond the 95 entries are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FontError> {
        if bytes.len() < FONT_FILE_LEN {
            return Err(FontError::Truncated {
                expected: FONT_FILE_LEN,
                actual: bytes.len(),
            });
        }
        let glyphs = bytes[..FONT_FILE_LEN]
            .chunks_exact(GLYPH_WIDTH)
            .map(|chunk| {
                let mut glyph = [0u8; GLYPH_WIDTH];
                glyph.copy_from_slice(chunk);
                glyph
            })
            .collect();
        Ok(Self { glyphs })
    }

    /// Load a font resource from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FontError::NotFound(path.to_path_buf()),
            _ => FontError::Io(e),
        })?;
        let table = Self::from_bytes(&bytes)?;
        info!("Loaded {} glyphs from {}", GLYPH_COUNT, path.display());
        Ok(table)
    }

    /// Glyph for `c`, if it is printable ASCII
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        let code = u8::try_from(u32::from(c)).ok()?;
        if !(FIRST_CHAR..=LAST_CHAR).contains(&code) {
            return None;
        }
        self.glyphs.get((code - FIRST_CHAR) as usize)
    }

    /// Render `text` with its top-left corner at (x, y), advancing 8 pixels
    /// per character. Only set glyph bits are painted, and only where they
    /// land on the surface.
    ///
    /// The whole string is checked first; an unsupported character leaves
    /// the surface untouched. Returns the number of characters drawn.
    pub fn draw_text(
        &self,
        surface: &mut PixelSurface,
        text: &str,
        x: i32,
        y: i32,
        on: bool,
    ) -> Result<usize, TextError> {
        let glyphs = text
            .chars()
            .map(|c| self.glyph(c).ok_or(TextError::UnsupportedChar(c)))
            .collect::<Result<Vec<_>, _>>()?;

        for (index, glyph) in glyphs.iter().enumerate() {
            let left = x + (index * GLYPH_WIDTH) as i32;
            for (col, column) in glyph.iter().enumerate() {
                for row in 0..PAGE_EDGE {
                    if column & (1 << row) != 0 {
                        surface.set_pixel_clipped(left + col as i32, y + row as i32, on);
                    }
                }
            }
        }
        debug!("Drew {:?} at ({}, {})", text, x, y);
        Ok(glyphs.len())
    }
}

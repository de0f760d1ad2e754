/*
 *  display/pbm.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Binary PBM (P4) importer
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

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, warn};

use crate::display::error::ImportError;
use crate::display::surface::PixelSurface;

/// Magic token of a raw (binary) portable bitmap
pub const PBM_MAGIC: [u8; 2] = *b"P4";

const COMMENT: u8 = b'#';

const MAX_PREALLOC: usize = 64 * 1024;

/// Dimensions declared by a PBM header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PbmHeader {
    pub width: u32,
    pub height: u32,
}

impl PbmHeader {
    /// Bytes per packed row, rows are padded to a whole byte
    pub fn row_bytes(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }
}

fn next_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

/// Read one decimal header field, skipping whitespace and `#` comment lines.
/// Consumes the single whitespace byte that terminates the field.
fn read_field<R: BufRead>(reader: &mut R, name: &str) -> Result<u32, ImportError> {
    let mut digits = String::new();
    loop {
        let byte = next_byte(reader)?;
        match byte {
            None if digits.is_empty() => {
                return Err(ImportError::BadHeader(format!("missing {}", name)));
            }
            None => break,
            Some(COMMENT) if digits.is_empty() => {
                let mut rest = Vec::new();
                reader.read_until(b'\n', &mut rest)?;
            }
            Some(b) if b.is_ascii_whitespace() => {
                if !digits.is_empty() {
                    break;
                }
            }
            Some(b) if b.is_ascii_digit() => digits.push(b as char),
            Some(b) => {
                return Err(ImportError::BadHeader(
                    format!("unexpected byte 0x{:02X} in {}", b, name)
                ));
            }
        }
    }
    digits
        .parse()
        .map_err(|_| ImportError::BadHeader(format!("{} out of range: {}", name, digits)))
}

/// Parse a P4 header and return it with the packed pixel data
pub fn read_pbm<R: Read>(reader: R) -> Result<(PbmHeader, Vec<u8>), ImportError> {
    let mut reader = BufReader::new(reader);

    let mut magic = [0u8; 2];
    reader.read_exact(&mut magic).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ImportError::BadMagic(magic),
        _ => ImportError::Io(e),
    })?;
    if magic != PBM_MAGIC {
        return Err(ImportError::BadMagic(magic));
    }

    let width = read_field(&mut reader, "width")?;
    let height = read_field(&mut reader, "height")?;
    let header = PbmHeader { width, height };

    // header sizes are untrusted
    let expected = header.row_bytes().saturating_mul(height as usize);
    let mut data = Vec::with_capacity(expected.min(MAX_PREALLOC));
    reader.read_to_end(&mut data)?;
    Ok((header, data))
}

impl PixelSurface {
    /// Paint the set bits of a P4 bitmap onto the surface, top-left aligned.
    ///
    /// The stream is parsed completely before any pixel is touched. Bitmap
    /// pixels beyond the surface edges are skipped, clear bits leave the
    /// surface as it was.
    pub fn load_bitmap<R: Read>(&mut self, reader: R, on: bool) -> Result<PbmHeader, ImportError> {
        let (header, data) = read_pbm(reader)?;
        let row_bytes = header.row_bytes();

        let expected = row_bytes * header.height as usize;
        if data.len() < expected {
            warn!("PBM data short: expected {} bytes, got {}", expected, data.len());
        }

        let mut painted = 0usize;
        if row_bytes > 0 {
            for (y, row) in data.chunks(row_bytes).take(header.height as usize).enumerate() {
                for (i, &byte) in row.iter().enumerate() {
                    for bit in 0..8 {
                        let x = i * 8 + bit;
                        if x >= header.width as usize || byte & (0x80 >> bit) == 0 {
                            continue;
                        }
                        if self.set_pixel_clipped(x as i32, y as i32, on) {
                            painted += 1;
                        }
                    }
                }
            }
        }

        debug!("PBM {}x{}: {} pixels painted", header.width, header.height, painted);
        Ok(header)
    }

    /// [`load_bitmap`](Self::load_bitmap) from a file path
    pub fn load_bitmap_file(&mut self, path: impl AsRef<Path>, on: bool) -> Result<PbmHeader, ImportError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ImportError::NotFound(path.to_path_buf()),
            _ => ImportError::Io(e),
        })?;
        self.load_bitmap(file, on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATTERN: [u8; 8] = [0x81, 0x42, 0x24, 0x18, 0x18, 0x24, 0x42, 0x81];

    fn pbm(header: &str, data: &[u8]) -> Vec<u8> {
        let mut out = header.as_bytes().to_vec();
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn test_round_trip_8x8() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let bytes = pbm("P4\n# created by hand\n8 8\n", &PATTERN);
        let header = surface.load_bitmap(bytes.as_slice(), true).unwrap();
        assert_eq!(header, PbmHeader { width: 8, height: 8 });

        for (y, row) in PATTERN.iter().enumerate() {
            for x in 0..8 {
                let expected = row & (0x80 >> x) != 0;
                assert_eq!(surface.get_pixel(x, y as i32), expected, "({}, {})", x, y);
            }
        }
        assert_eq!(surface.count_on(), 16);
    }

    #[test]
    fn test_header_on_one_line() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let bytes = pbm("P4 8 1\n", &[0x80]);
        surface.load_bitmap(bytes.as_slice(), true).unwrap();
        assert!(surface.get_pixel(0, 0));
        assert_eq!(surface.count_on(), 1);
    }

    #[test]
    fn test_row_padding() {
        // 10 pixels wide: two bytes per row, low 6 bits of the second are padding
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let bytes = pbm("P4\n10 2\n", &[0x00, 0xFF, 0x80, 0x00]);
        surface.load_bitmap(bytes.as_slice(), true).unwrap();
        assert!(surface.get_pixel(8, 0));
        assert!(surface.get_pixel(9, 0));
        assert!(!surface.get_pixel(10, 0));
        assert!(surface.get_pixel(0, 1));
        assert_eq!(surface.count_on(), 3);
    }

    #[test]
    fn test_oversized_bitmap_is_clipped() {
        let mut surface = PixelSurface::new(16, 8).unwrap();
        // 24x16 all set: only the 16x8 top-left part lands
        let bytes = pbm("P4\n24 16\n", &[0xFF; 3 * 16]);
        surface.load_bitmap(bytes.as_slice(), true).unwrap();
        assert_eq!(surface.count_on(), 16 * 8);
    }

    #[test]
    fn test_clear_pixels() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        surface.fill(true);
        let bytes = pbm("P4\n8 8\n", &PATTERN);
        surface.load_bitmap(bytes.as_slice(), false).unwrap();
        assert_eq!(surface.count_on(), 128 * 64 - 16);
        assert!(!surface.get_pixel(0, 0));
    }

    #[test]
    fn test_bad_magic() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let err = surface.load_bitmap(&b"P1\n8 8\n0 1"[..], true).unwrap_err();
        assert!(matches!(err, ImportError::BadMagic(m) if &m == b"P1"));
        let err = surface.load_bitmap(&b""[..], true).unwrap_err();
        assert!(matches!(err, ImportError::BadMagic(_)));
        assert_eq!(surface.count_on(), 0);
    }

    #[test]
    fn test_bad_header() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let err = surface.load_bitmap(&b"P4\nwide 8\n"[..], true).unwrap_err();
        assert!(matches!(err, ImportError::BadHeader(_)));
        let err = surface.load_bitmap(&b"P4\n8"[..], true).unwrap_err();
        assert!(matches!(err, ImportError::BadHeader(_)));
    }

    #[test]
    fn test_short_data_paints_what_is_there() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let bytes = pbm("P4\n8 8\n", &PATTERN[..2]);
        surface.load_bitmap(bytes.as_slice(), true).unwrap();
        assert_eq!(surface.count_on(), 4);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let err = surface.load_bitmap_file(dir.path().join("nope.pbm"), true).unwrap_err();
        assert!(matches!(err, ImportError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.pbm");
        std::fs::write(&path, pbm("P4\n8 8\n", &PATTERN)).unwrap();
        let mut surface = PixelSurface::new(128, 64).unwrap();
        surface.load_bitmap_file(&path, true).unwrap();
        assert!(surface.get_pixel(7, 7));
    }
}

/*
 *  display/traits.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for bus transport abstraction
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

use crate::display::error::BusError;

/// Control byte addressing the command register (Co=1, D/C#=0)
pub const COMMAND_REGISTER: u8 = 0x80;

/// Control byte addressing the display RAM (Co=0, D/C#=1)
pub const DATA_REGISTER: u8 = 0x40;

/// Minimal transport abstraction - every bus implementation must provide this
///
/// The controller only ever needs two things from the wire: a single control
/// byte written to the command register, and a block of bytes written to a
/// register (in practice the data register). Address selection, retries and
/// timeouts belong to the implementation.
pub trait Bus {
    /// Write one command byte to [`COMMAND_REGISTER`]
    fn write_command(&mut self, cmd: u8) -> Result<(), BusError>;

    /// Write a block of bytes behind the given control byte
    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<(), BusError>;
}

impl<B: Bus + ?Sized> Bus for &mut B {
    fn write_command(&mut self, cmd: u8) -> Result<(), BusError> {
        (**self).write_command(cmd)
    }

    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<(), BusError> {
        (**self).write_block(register, bytes)
    }
}

impl<B: Bus + ?Sized> Bus for Box<B> {
    fn write_command(&mut self, cmd: u8) -> Result<(), BusError> {
        (**self).write_command(cmd)
    }

    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<(), BusError> {
        (**self).write_block(register, bytes)
    }
}

/// Display geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayCapabilities {
    /// Display width in pixels
    pub width: u32,

    /// Display height in pixels, a multiple of 8
    pub height: u32,
}

impl DisplayCapabilities {
    pub const SSD1306_128X64: Self = Self { width: 128, height: 64 };

    /// Number of 8-row pages
    pub fn page_count(&self) -> u32 {
        self.height / 8
    }

    /// Size of the packed frame in bytes
    pub fn buffer_len(&self) -> usize {
        (self.width * self.page_count()) as usize
    }
}

impl Default for DisplayCapabilities {
    fn default() -> Self {
        Self::SSD1306_128X64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::mock::MockBus;

    #[test]
    fn test_capabilities_page_math() {
        let caps = DisplayCapabilities::default();
        assert_eq!(caps.page_count(), 8);
        assert_eq!(caps.buffer_len(), 1024);
        let small = DisplayCapabilities { width: 128, height: 32 };
        assert_eq!(small.buffer_len(), 512);
    }

    #[test]
    fn test_boxed_bus_forwards() {
        let mock = MockBus::new();
        let mut boxed: Box<dyn Bus> = Box::new(mock.clone());
        boxed.write_command(0xAF).unwrap();
        boxed.write_block(DATA_REGISTER, &[1, 2]).unwrap();
        assert_eq!(mock.commands(), vec![0xAF]);
        assert_eq!(mock.blocks(), vec![(DATA_REGISTER, vec![1, 2])]);
    }
}

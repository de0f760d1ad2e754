/*
 *  display/drivers/i2c.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  I2C bus transport over embedded-hal
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

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use crate::display::error::{BusError, BusErrorKind};
use crate::display::traits::{Bus, COMMAND_REGISTER};

/// Default 7-bit address of an SSD1306 module
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Address with the module's address jumper/switch set
pub const ALTERNATE_ADDRESS: u8 = 0x3D;

/// [`Bus`] over any embedded-hal I2C implementation
///
/// Each command is a two byte write (control byte, command); a block is the
/// control byte followed by the payload in a single write.
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: u8,
    scratch: Vec<u8>,
}

impl<I2C: I2c> I2cBus<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address, scratch: Vec::new() }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give back the underlying I2C device
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn bus_error(&self, err: I2C::Error) -> BusError {
        let kind = match err.kind() {
            ErrorKind::NoAcknowledge(_) => BusErrorKind::Nack,
            ErrorKind::ArbitrationLoss => BusErrorKind::ArbitrationLoss,
            ErrorKind::Bus => BusErrorKind::Bus,
            ErrorKind::Overrun => BusErrorKind::Overrun,
            _ => BusErrorKind::Other,
        };
        BusError::new(kind, format!("device 0x{:02X}: {:?}", self.address, err))
    }
}

impl<I2C: I2c> Bus for I2cBus<I2C> {
    fn write_command(&mut self, cmd: u8) -> Result<(), BusError> {
        self.i2c
            .write(self.address, &[COMMAND_REGISTER, cmd])
            .map_err(|e| self.bus_error(e))
    }

    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<(), BusError> {
        self.scratch.clear();
        self.scratch.push(register);
        self.scratch.extend_from_slice(bytes);
        let result = self.i2c.write(self.address, &self.scratch);
        result.map_err(|e| self.bus_error(e))
    }
}

#[cfg(feature = "linux-i2c")]
mod linux {
    use linux_embedded_hal::I2cdev;
    use log::info;

    use super::I2cBus;
    use crate::display::error::{BusError, BusErrorKind};

    impl I2cBus<I2cdev> {
        /// Open a Linux I2C character device (e.g. "/dev/i2c-1")
        pub fn open(path: &str, address: u8) -> Result<Self, BusError> {
            let i2c = I2cdev::new(path).map_err(|e| {
                BusError::new(BusErrorKind::Disconnected, format!("Failed to open {}: {}", path, e))
            })?;
            info!("Opened {} for device 0x{:02X}", path, address);
            Ok(Self::new(i2c, address))
        }
    }
}

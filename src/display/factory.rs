/*
 *  display/factory.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Factory for building a ready display from configuration
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

use crate::config::{BusConfig, Config, DisplayConfig};
use crate::display::controller::DisplayController;
use crate::display::drivers::mock::MockBus;
use crate::display::error::DisplayFactoryError;
use crate::display::traits::{Bus, DisplayCapabilities};
use log::{debug, info};

#[cfg(feature = "linux-i2c")]
use crate::display::drivers::i2c::I2cBus;

/// Type alias for boxed bus trait objects
pub type BoxedBus = Box<dyn Bus>;

/// Controller over whichever bus the configuration picked
pub type BoxedDisplay = DisplayController<BoxedBus>;

/// Factory for creating displays from configuration
pub struct DisplayFactory;

impl DisplayFactory {
    /// Create a started display from configuration
    ///
    /// Opens the configured bus, runs the init sequence, blanks the panel,
    /// then applies contrast, inversion and rotation. A configured font that
    /// fails to load only disables text.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = Config {
    ///     display: Some(DisplayConfig {
    ///         bus: Some(BusConfig::Mock),
    ///         ..Default::default()
    ///     }),
    ///     ..Default::default()
    /// };
    ///
    /// let mut display = DisplayFactory::create_from_config(&config)?;
    /// ```
    pub fn create_from_config(config: &Config) -> Result<BoxedDisplay, DisplayFactoryError> {
        let display_config = config.display.as_ref()
            .ok_or(DisplayFactoryError::NoBusConfiguration)?;

        let bus = Self::create_bus(display_config)?;
        let caps = Self::capabilities(display_config);
        info!("Creating {}x{} display", caps.width, caps.height);

        let mut display = DisplayController::start(bus, caps)?;

        if let Some(level) = display_config.contrast {
            let _ = display.set_contrast(level);
        }
        if display_config.invert.unwrap_or(false) {
            let _ = display.set_invert(true);
        }
        if display_config.rotated.unwrap_or(false) {
            let _ = display.set_rotation(true);
        }

        if let Some(path) = config.font_path.as_ref() {
            // failure is logged by the controller; text just stays blank
            let _ = display.load_font(path);
        }

        if let Some(err) = display.last_bus_error() {
            debug!("Display started with bus error: {}", err);
        }
        Ok(display)
    }

    /// Panel geometry, defaulting to 128x64
    pub fn capabilities(config: &DisplayConfig) -> DisplayCapabilities {
        let default = DisplayCapabilities::default();
        DisplayCapabilities {
            width: config.width.unwrap_or(default.width),
            height: config.height.unwrap_or(default.height),
        }
    }

    /// Open the configured bus
    pub fn create_bus(config: &DisplayConfig) -> Result<BoxedBus, DisplayFactoryError> {
        let bus_config = config.bus.as_ref()
            .ok_or(DisplayFactoryError::NoBusConfiguration)?;

        match bus_config {
            #[cfg(feature = "linux-i2c")]
            BusConfig::I2c { bus, .. } => {
                let address = bus_config.address()
                    .ok_or_else(|| DisplayFactoryError::ConfigError("no i2c address".into()))?;
                debug!("Opening I2C bus {} at 0x{:02X}", bus, address);
                Ok(Box::new(I2cBus::open(bus, address)?))
            }

            #[cfg(not(feature = "linux-i2c"))]
            BusConfig::I2c { .. } => {
                Err(DisplayFactoryError::UnsupportedBus("i2c".to_string()))
            }

            BusConfig::Mock => {
                info!("Using mock bus, no hardware will be driven");
                Ok(Box::new(MockBus::new()))
            }
        }
    }
}

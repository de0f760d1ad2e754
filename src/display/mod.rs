/*
 *  display/mod.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - framebuffer, raster, import and panel protocol
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod surface;
pub mod factory;

// Drawing on the surface
pub mod raster;
pub mod font;
pub mod pbm;
pub mod graph;

// Panel protocol
pub mod controller;

// Bus transports
pub mod drivers;

// Re-exports for convenience
pub use traits::{Bus, DisplayCapabilities, COMMAND_REGISTER, DATA_REGISTER};
pub use error::{BusError, BusErrorKind, DisplayError, DisplayFactoryError, FontError, ImportError, TextError};
pub use surface::PixelSurface;
pub use raster::CircleStyle;
pub use font::GlyphTable;
pub use pbm::PbmHeader;
pub use graph::{PlotConfig, PlotMode, TimeSeriesPlot};
pub use controller::{ControllerState, DisplayController, Orientation, PowerState};
pub use factory::{BoxedBus, BoxedDisplay, DisplayFactory};
pub use drivers::mock::MockBus;
pub use drivers::i2c::I2cBus;

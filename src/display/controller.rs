/*
 *  display/controller.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  SSD1306 controller protocol: init, power, contrast, orientation, flush
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

use std::path::Path;

use log::{debug, info, warn};

use crate::display::error::{BusError, DisplayError, FontError, TextError};
use crate::display::font::GlyphTable;
use crate::display::surface::PixelSurface;
use crate::display::traits::{Bus, DisplayCapabilities, DATA_REGISTER};

/// SSD1306 commands
pub mod cmd {
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_ENTIRE_ON: u8 = 0xA4;
    pub const SET_NORM_INV: u8 = 0xA6;
    pub const SET_DISP: u8 = 0xAE;
    pub const SET_MEM_ADDR: u8 = 0x20;
    pub const SET_COL_ADDR: u8 = 0x21;
    pub const SET_PAGE_ADDR: u8 = 0x22;
    pub const SET_DISP_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA0;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_IREF_SELECT: u8 = 0xAD;
    pub const SET_COM_OUT_DIR: u8 = 0xC0;
    pub const SET_DISP_OFFSET: u8 = 0xD3;
    pub const SET_COM_PIN_CFG: u8 = 0xDA;
    pub const SET_DISP_CLK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOM_DESEL: u8 = 0xDB;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Largest panel the 8-bit column/mux arguments can address
const MAX_DIMENSION: u32 = 256;

/// Protocol lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    Initializing,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Off,
    On,
}

/// Scan direction; `Normal` is the orientation set up by `initialize`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    Rotated,
}

/// Drives one panel over an injected [`Bus`] and owns its pixel surface.
///
/// Drawing happens on [`surface_mut`](Self::surface_mut) and is local until
/// [`flush`](Self::flush). Bus-facing operations never abort: each failed
/// transaction is logged and recorded in [`last_bus_error`](Self::last_bus_error),
/// which always reflects the most recent transaction, and the first failure
/// of the operation is returned for callers that care.
pub struct DisplayController<B: Bus> {
    bus: B,
    surface: PixelSurface,
    font: Option<GlyphTable>,
    state: ControllerState,
    power: PowerState,
    orientation: Orientation,
    inverted: bool,
    contrast: u8,
    last_bus_error: Option<BusError>,
}

impl<B: Bus> DisplayController<B> {
    /// Create a controller with a zero-filled surface. Nothing is sent yet.
    pub fn new(bus: B, caps: DisplayCapabilities) -> Result<Self, DisplayError> {
        if caps.width > MAX_DIMENSION || caps.height > MAX_DIMENSION {
            return Err(DisplayError::InvalidConfiguration(
                format!("panel {}x{} exceeds {}x{}", caps.width, caps.height, MAX_DIMENSION, MAX_DIMENSION)
            ));
        }
        Ok(Self {
            bus,
            surface: PixelSurface::from_capabilities(&caps)?,
            font: None,
            state: ControllerState::Uninitialized,
            power: PowerState::Off,
            orientation: Orientation::Normal,
            inverted: false,
            contrast: 0,
            last_bus_error: None,
        })
    }

    /// Create, initialize, blank and flush: a ready-to-draw panel.
    ///
    /// Bus failures during startup are recorded, not returned.
    pub fn start(bus: B, caps: DisplayCapabilities) -> Result<Self, DisplayError> {
        let mut display = Self::new(bus, caps)?;
        let _ = display.initialize();
        display.surface.fill(false);
        let _ = display.flush();
        Ok(display)
    }

    /// Attach a glyph table for [`draw_text`](Self::draw_text)
    pub fn with_font(mut self, font: GlyphTable) -> Self {
        self.font = Some(font);
        self
    }

    /// Load the glyph table from a font file. On failure the controller
    /// keeps whatever table it had (usually none) and text stays a no-op.
    pub fn load_font(&mut self, path: impl AsRef<Path>) -> Result<(), FontError> {
        match GlyphTable::load(path.as_ref()) {
            Ok(table) => {
                self.font = Some(table);
                Ok(())
            }
            Err(e) => {
                warn!("Text rendering disabled: {}", e);
                Err(e)
            }
        }
    }

    pub fn set_font(&mut self, font: Option<GlyphTable>) {
        self.font = font;
    }

    pub fn font(&self) -> Option<&GlyphTable> { self.font.as_ref() }

    pub fn surface(&self) -> &PixelSurface { &self.surface }
    pub fn surface_mut(&mut self) -> &mut PixelSurface { &mut self.surface }

    pub fn bus(&self) -> &B { &self.bus }
    pub fn bus_mut(&mut self) -> &mut B { &mut self.bus }

    pub fn state(&self) -> ControllerState { self.state }
    pub fn power(&self) -> PowerState { self.power }
    pub fn orientation(&self) -> Orientation { self.orientation }
    pub fn is_inverted(&self) -> bool { self.inverted }
    pub fn contrast(&self) -> u8 { self.contrast }

    /// Outcome of the most recent bus transaction
    pub fn last_bus_error(&self) -> Option<&BusError> { self.last_bus_error.as_ref() }

    pub fn capabilities(&self) -> DisplayCapabilities { self.surface.capabilities() }

    /// Draw text with the loaded glyph table.
    ///
    /// Without a table this logs a warning and draws nothing (`Ok(0)`).
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, on: bool) -> Result<usize, TextError> {
        match &self.font {
            Some(font) => font.draw_text(&mut self.surface, text, x, y, on),
            None => {
                warn!("No font loaded, skipping text {:?}", text);
                Ok(0)
            }
        }
    }

    fn track(&mut self, result: Result<(), BusError>) -> Result<(), BusError> {
        match &result {
            Ok(()) => self.last_bus_error = None,
            Err(e) => {
                warn!("{}", e);
                self.last_bus_error = Some(e.clone());
            }
        }
        result
    }

    fn command(&mut self, cmd: u8) -> Result<(), BusError> {
        let result = self.bus.write_command(cmd);
        self.track(result)
    }

    /// Send every byte even if some fail; report the first failure
    fn commands(&mut self, cmds: &[u8]) -> Result<(), BusError> {
        let mut first = None;
        for &c in cmds {
            if let Err(e) = self.command(c) {
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    fn init_sequence(&self) -> Vec<u8> {
        let caps = self.capabilities();
        let com_pins = if caps.height <= 32 { 0x02 } else { 0x12 };
        vec![
            // display off
            cmd::SET_DISP,
            // horizontal addressing
            cmd::SET_MEM_ADDR, 0x00,
            // start at line 0
            cmd::SET_DISP_START_LINE,
            // column addr 127 mapped to SEG0
            cmd::SET_SEG_REMAP | 0x01,
            cmd::SET_MUX_RATIO, (caps.height - 1) as u8,
            // scan from COM[N] to COM0
            cmd::SET_COM_OUT_DIR | 0x08,
            cmd::SET_DISP_OFFSET, 0x00,
            cmd::SET_COM_PIN_CFG, com_pins,
            // timing and driving scheme
            cmd::SET_DISP_CLK_DIV, 0x80,
            cmd::SET_PRECHARGE, 0xF1,
            // 0.83 * Vcc
            cmd::SET_VCOM_DESEL, 0x30,
            cmd::SET_CONTRAST, 0xFF,
            // output follows RAM contents
            cmd::SET_ENTIRE_ON,
            cmd::SET_NORM_INV,
            // internal IREF
            cmd::SET_IREF_SELECT, 0x30,
            cmd::SET_CHARGE_PUMP, 0x14,
            // display on
            cmd::SET_DISP | 0x01,
        ]
    }

    /// Run the power-up configuration sequence.
    ///
    /// Best effort: the controller ends up `Active` and powered on whatever
    /// the individual commands returned.
    pub fn initialize(&mut self) -> Result<(), BusError> {
        self.state = ControllerState::Initializing;
        let sequence = self.init_sequence();
        let result = self.commands(&sequence);

        self.state = ControllerState::Active;
        self.power = PowerState::On;
        self.orientation = Orientation::Normal;
        self.inverted = false;
        self.contrast = 0xFF;

        match &result {
            Ok(()) => info!("Display initialized ({}x{})", self.surface.width(), self.surface.height()),
            Err(e) => warn!("Display initialized with bus errors: {}", e),
        }
        result
    }

    pub fn power_on(&mut self) -> Result<(), BusError> {
        self.power = PowerState::On;
        self.command(cmd::SET_DISP | 0x01)
    }

    pub fn power_off(&mut self) -> Result<(), BusError> {
        self.power = PowerState::Off;
        self.command(cmd::SET_DISP)
    }

    pub fn set_contrast(&mut self, level: u8) -> Result<(), BusError> {
        self.contrast = level;
        self.commands(&[cmd::SET_CONTRAST, level])
    }

    /// Swap lit and dark pixels in hardware
    pub fn set_invert(&mut self, invert: bool) -> Result<(), BusError> {
        self.inverted = invert;
        self.command(cmd::SET_NORM_INV | invert as u8)
    }

    /// Rotate the picture by 180 degrees (both scan directions flipped)
    ///
    /// `false` restores the init scan directions (0xC8, 0xA1) and `true` sends
    /// 0xC0, 0xA0, so `set_rotation(true)` is not a "rotate(1) = init" toggle.
    pub fn set_rotation(&mut self, rotated: bool) -> Result<(), BusError> {
        self.orientation = if rotated { Orientation::Rotated } else { Orientation::Normal };
        let normal = !rotated as u8;
        self.commands(&[
            cmd::SET_COM_OUT_DIR | (normal << 3),
            cmd::SET_SEG_REMAP | normal,
        ])
    }

    /// Send the whole surface: column range, page range, then one data block
    pub fn flush(&mut self) -> Result<(), BusError> {
        if self.state != ControllerState::Active {
            debug!("Flush while {:?}", self.state);
        }
        let caps = self.capabilities();
        let addressing = self.commands(&[
            cmd::SET_COL_ADDR, 0, (caps.width - 1) as u8,
            cmd::SET_PAGE_ADDR, 0, (caps.page_count() - 1) as u8,
        ]);

        let sent = self.bus.write_block(DATA_REGISTER, self.surface.as_bytes());
        let data = self.track(sent);
        debug!("Flushed {} bytes", self.surface.as_bytes().len());
        addressing.and(data)
    }
}

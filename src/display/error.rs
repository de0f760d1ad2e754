/*
 *  display/error.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error types for display subsystem
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

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Classification of a failed bus transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusErrorKind {
    /// Device did not acknowledge the address or a data byte
    Nack,

    /// Another master won arbitration
    ArbitrationLoss,

    /// Misplaced start/stop or other low level bus fault
    Bus,

    /// Receive buffer overrun in the controller
    Overrun,

    /// The bus device could not be opened or has gone away
    Disconnected,

    /// Anything the transport could not classify
    Other,
}

/// Transport failure reported by a [`Bus`](crate::display::traits::Bus)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusError {
    pub kind: BusErrorKind,
    pub message: String,
}

impl BusError {
    pub fn new(kind: BusErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Transient faults may clear on retry; a disconnected bus will not.
    pub fn is_transient(&self) -> bool {
        self.kind != BusErrorKind::Disconnected
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BusErrorKind::Nack =>
                write!(f, "Bus NACK: {}", self.message),
            BusErrorKind::ArbitrationLoss =>
                write!(f, "Bus arbitration lost: {}", self.message),
            BusErrorKind::Bus =>
                write!(f, "Bus fault: {}", self.message),
            BusErrorKind::Overrun =>
                write!(f, "Bus overrun: {}", self.message),
            BusErrorKind::Disconnected =>
                write!(f, "Bus disconnected: {}", self.message),
            BusErrorKind::Other =>
                write!(f, "Bus error: {}", self.message),
        }
    }
}

impl Error for BusError {}

/// Packed bitmap import failures
#[derive(Debug)]
pub enum ImportError {
    /// Bitmap file does not exist
    NotFound(PathBuf),

    /// Stream could not be read
    Io(io::Error),

    /// Leading token is not the binary PBM magic
    BadMagic([u8; 2]),

    /// Width/height line missing or unparsable
    BadHeader(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::NotFound(path) =>
                write!(f, "Bitmap not found: {}", path.display()),
            ImportError::Io(err) =>
                write!(f, "Bitmap read error: {}", err),
            ImportError::BadMagic(magic) =>
                write!(f, "Not a valid pbm P4 file (magic {:02X} {:02X})", magic[0], magic[1]),
            ImportError::BadHeader(msg) =>
                write!(f, "Bad pbm header: {}", msg),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ImportError {
    fn from(err: io::Error) -> Self {
        ImportError::Io(err)
    }
}

/// Font resource failures
#[derive(Debug)]
pub enum FontError {
    /// Font file does not exist
    NotFound(PathBuf),

    /// Font file could not be read
    Io(io::Error),

    /// Font file shorter than the 95 glyph table
    Truncated { expected: usize, actual: usize },
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::NotFound(path) =>
                write!(f, "Font not found: {}", path.display()),
            FontError::Io(err) =>
                write!(f, "Font read error: {}", err),
            FontError::Truncated { expected, actual } =>
                write!(f, "Font truncated: expected {} bytes, got {}", expected, actual),
        }
    }
}

impl Error for FontError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FontError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for FontError {
    fn from(err: io::Error) -> Self {
        FontError::Io(err)
    }
}

/// Text rendering failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// Character has no glyph (outside printable ASCII 32..=126)
    UnsupportedChar(char),
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextError::UnsupportedChar(c) =>
                write!(f, "No glyph for character {:?} (U+{:04X})", c, *c as u32),
        }
    }
}

impl Error for TextError {}

/// Unified error type for all display operations
#[derive(Debug)]
pub enum DisplayError {
    /// Invalid geometry or plot configuration
    InvalidConfiguration(String),

    /// Bus transaction failed
    Bus(BusError),

    /// Bitmap import failed
    Import(ImportError),

    /// Font load failed
    Font(FontError),

    /// Text rendering failed
    Text(TextError),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::InvalidConfiguration(msg) =>
                write!(f, "Invalid configuration: {}", msg),
            DisplayError::Bus(err) => write!(f, "{}", err),
            DisplayError::Import(err) => write!(f, "{}", err),
            DisplayError::Font(err) => write!(f, "{}", err),
            DisplayError::Text(err) => write!(f, "{}", err),
        }
    }
}

impl Error for DisplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DisplayError::InvalidConfiguration(_) => None,
            DisplayError::Bus(err) => Some(err),
            DisplayError::Import(err) => Some(err),
            DisplayError::Font(err) => Some(err),
            DisplayError::Text(err) => Some(err),
        }
    }
}

impl From<BusError> for DisplayError {
    fn from(err: BusError) -> Self {
        DisplayError::Bus(err)
    }
}

impl From<ImportError> for DisplayError {
    fn from(err: ImportError) -> Self {
        DisplayError::Import(err)
    }
}

impl From<FontError> for DisplayError {
    fn from(err: FontError) -> Self {
        DisplayError::Font(err)
    }
}

impl From<TextError> for DisplayError {
    fn from(err: TextError) -> Self {
        DisplayError::Text(err)
    }
}

/// Factory error types
#[derive(Debug)]
pub enum DisplayFactoryError {
    /// No bus configuration specified
    NoBusConfiguration,

    /// Bus kind not compiled into this build
    UnsupportedBus(String),

    /// Bus could not be opened
    BusOpenFailed(BusError),

    /// Configuration validation error
    ConfigError(String),
}

impl fmt::Display for DisplayFactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayFactoryError::NoBusConfiguration =>
                write!(f, "No bus configuration specified"),
            DisplayFactoryError::UnsupportedBus(kind) =>
                write!(f, "Bus type '{}' not supported by this build", kind),
            DisplayFactoryError::BusOpenFailed(err) =>
                write!(f, "Bus open failed: {}", err),
            DisplayFactoryError::ConfigError(msg) =>
                write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for DisplayFactoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DisplayFactoryError::BusOpenFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BusError> for DisplayFactoryError {
    fn from(err: BusError) -> Self {
        DisplayFactoryError::BusOpenFailed(err)
    }
}

impl From<DisplayError> for DisplayFactoryError {
    fn from(err: DisplayError) -> Self {
        match err {
            DisplayError::Bus(e) => DisplayFactoryError::BusOpenFailed(e),
            other => DisplayFactoryError::ConfigError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_error_transience() {
        assert!(BusError::new(BusErrorKind::Nack, "addr 0x3C").is_transient());
        assert!(!BusError::new(BusErrorKind::Disconnected, "/dev/i2c-1").is_transient());
    }

    #[test]
    fn test_import_error_source() {
        let err = ImportError::from(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(err.source().is_some());
        assert!(ImportError::BadMagic(*b"P1").source().is_none());
        assert!(ImportError::BadMagic(*b"P1").to_string().contains("50 31"));
    }

    #[test]
    fn test_display_error_wraps_bus() {
        let err: DisplayError = BusError::new(BusErrorKind::Nack, "x").into();
        assert!(matches!(err, DisplayError::Bus(_)));
        let factory: DisplayFactoryError = err.into();
        assert!(matches!(factory, DisplayFactoryError::BusOpenFailed(_)));
    }
}

use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::display::drivers::i2c::{ALTERNATE_ADDRESS, DEFAULT_ADDRESS};
use crate::display::surface::PAGE_EDGE;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// General options
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    /// 95 x 8 byte glyph file for text
    pub font_path: Option<PathBuf>,
    /// display-specific geometry & behavior
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub contrast: Option<u8>,       // 0-255
    pub invert: Option<bool>,
    pub rotated: Option<bool>,      // 180 degree flip
    pub bus: Option<BusConfig>,     // <- i2c wiring or mock
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BusConfig {
    I2c {
        bus: String,                // e.g. "/dev/i2c-1"
        address: Option<u8>,        // explicit 7-bit address wins
        #[serde(default)]
        address_switch: bool,       // module jumper set: 0x3D instead of 0x3C
    },
    /// Record traffic in memory, no hardware
    Mock,
}

impl BusConfig {
    /// Device address for an I2C bus
    pub fn address(&self) -> Option<u8> {
        match self {
            BusConfig::I2c { address: Some(a), .. } => Some(*a),
            BusConfig::I2c { address_switch: true, .. } => Some(ALTERNATE_ADDRESS),
            BusConfig::I2c { .. } => Some(DEFAULT_ADDRESS),
            BusConfig::Mock => None,
        }
    }
}

/// Demo scenes the binary can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scene {
    /// Black, then white
    Fill,
    /// A filled rectangle sliding across while rising
    Slide,
    /// Bouncing square with border and collision counter
    Bounce,
    /// White screen with a black rectangle
    Inverted,
    /// Circle, ring and arcs
    Shapes,
    /// Sine samples in a line plot and a bar plot
    Graph,
    /// Show a P4 bitmap (ARG is the file)
    Pbm,
    /// Show a line of text (ARG is the text)
    Text,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "oledfb", version, about = "Monochrome OLED framebuffer demos")]
pub struct Cli {
    /// Scene to play
    #[arg(value_enum)]
    pub scene: Scene,
    /// Scene argument (bitmap path or text)
    pub arg: Option<String>,
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Glyph file for text rendering
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub font: Option<PathBuf>,
    #[arg(long = "width")]
    pub display_width: Option<u32>,
    #[arg(long = "height")]
    pub display_height: Option<u32>,
    #[arg(long = "contrast")]
    pub display_contrast: Option<u8>,
    #[arg(long = "invert", action = ArgAction::Set)]
    pub display_invert: Option<bool>,
    #[arg(long = "rotated", action = ArgAction::Set)]
    pub display_rotated: Option<bool>,
    /// I2C device path, selects the i2c bus
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub i2c_bus: Option<String>,
    /// I2C address, decimal or 0x-prefixed hex
    #[arg(long, value_parser = parse_address)]
    pub address: Option<u8>,
    /// No hardware: record bus traffic in memory
    #[arg(long, action = ArgAction::SetTrue)]
    pub mock: bool,
    /// Frames for animated scenes
    #[arg(long, default_value_t = 200)]
    pub frames: u32,
    /// Delay between frames in milliseconds
    #[arg(long, default_value_t = 10)]
    pub delay_ms: u64,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

fn parse_address(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address {:?}: {}", s, e))
}

/// Public entry point: read YAML, merge CLI, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/oledfb/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/oledfb/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/oledfb.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["oledfb.yaml", "config/oledfb.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    if src.font_path.is_some()      { dst.font_path = src.font_path; }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.width.is_some()       { dst.width = src.width; }
    if src.height.is_some()      { dst.height = src.height; }
    if src.contrast.is_some()    { dst.contrast = src.contrast; }
    if src.invert.is_some()      { dst.invert = src.invert; }
    if src.rotated.is_some()     { dst.rotated = src.rotated; }
    if src.bus.is_some()         { dst.bus = src.bus; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    if cli.font.is_some()            { cfg.font_path = cli.font.clone(); }
    let any_case = cli.display_width.is_some()
        || cli.display_height.is_some()
        || cli.display_contrast.is_some()
        || cli.display_invert.is_some()
        || cli.display_rotated.is_some()
        || cli.i2c_bus.is_some()
        || cli.address.is_some()
        || cli.mock;

    if any_case && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.display_width.is_some()     { display.width = cli.display_width; }
        if cli.display_height.is_some()    { display.height = cli.display_height; }
        if cli.display_contrast.is_some()  { display.contrast = cli.display_contrast; }
        if cli.display_invert.is_some()    { display.invert = cli.display_invert; }
        if cli.display_rotated.is_some()   { display.rotated = cli.display_rotated; }

        if cli.mock {
            display.bus = Some(BusConfig::Mock);
        } else if let Some(path) = cli.i2c_bus.as_ref() {
            let (address, address_switch) = match &display.bus {
                Some(BusConfig::I2c { address, address_switch, .. }) => (*address, *address_switch),
                _ => (None, false),
            };
            display.bus = Some(BusConfig::I2c { bus: path.clone(), address, address_switch });
        }
        if let (Some(a), Some(BusConfig::I2c { address, .. })) = (cli.address, display.bus.as_mut()) {
            *address = Some(a);
        }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(display) = cfg.display.as_ref() {
        for (name, v) in [("width", display.width), ("height", display.height)] {
            match v {
                Some(0) => return Err(ConfigError::Validation(format!("display {} must be > 0", name))),
                Some(n) if n > 256 => {
                    return Err(ConfigError::Validation(format!("display {} must be <= 256", name)));
                }
                _ => {}
            }
        }
        if let Some(h) = display.height {
            if h % PAGE_EDGE != 0 {
                return Err(ConfigError::Validation(
                    format!("display height must be a multiple of {}", PAGE_EDGE)
                ));
            }
        }
        if let Some(BusConfig::I2c { bus, address, .. }) = display.bus.as_ref() {
            if bus.is_empty() {
                return Err(ConfigError::Validation("i2c bus path must not be empty".into()));
            }
            if address.is_some_and(|a| a > 0x7F) {
                return Err(ConfigError::Validation("i2c address must be 7-bit".into()));
            }
        }
    }
    Ok(())
}

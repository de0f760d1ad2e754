/*
 *  main.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Demo player for SSD1306 panels
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

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use oledfb::config::{self, Cli};
use oledfb::demo::{self, DemoOptions};
use oledfb::display::DisplayFactory;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load(&cli).context("loading configuration")?;

    if cli.dump_config {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    let level = config.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let mut display = DisplayFactory::create_from_config(&config)
        .context("creating display")?;

    let opts = DemoOptions {
        frames: cli.frames,
        delay: Duration::from_millis(cli.delay_ms),
        ..Default::default()
    };
    demo::run(&mut display, cli.scene, cli.arg.as_deref(), &opts)
        .with_context(|| format!("playing {:?}", cli.scene))?;

    if let Some(err) = display.last_bus_error() {
        error!("Last bus transaction failed: {}", err);
        bail!("display bus error: {}", err);
    }
    info!("Done");
    Ok(())
}

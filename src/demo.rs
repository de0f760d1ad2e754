/*
 *  demo.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Demonstration scenes for the binary
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

use std::thread;
use std::time::Duration;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use log::{debug, info};

use crate::config::Scene;
use crate::display::controller::DisplayController;
use crate::display::error::DisplayError;
use crate::display::graph::{PlotConfig, PlotMode, TimeSeriesPlot};
use crate::display::raster::CircleStyle;
use crate::display::traits::Bus;

/// Pacing for a scene
#[derive(Debug, Clone)]
pub struct DemoOptions {
    /// Upper bound on frames for animated scenes
    pub frames: u32,
    /// Pause after each animation frame
    pub delay: Duration,
    /// Pause after a still frame
    pub hold: Duration,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            frames: 200,
            delay: Duration::from_millis(10),
            hold: Duration::from_secs(1),
        }
    }
}

const SQUARE: i32 = 15;

/// Play one scene. Bus failures are left on the controller's sticky error;
/// only bad input (bitmap, text) ends a scene early.
pub fn run<B: Bus>(
    display: &mut DisplayController<B>,
    scene: Scene,
    arg: Option<&str>,
    opts: &DemoOptions,
) -> Result<(), DisplayError> {
    info!("Playing {:?}", scene);
    match scene {
        Scene::Fill => fill(display, opts),
        Scene::Slide => slide(display, opts),
        Scene::Bounce => bounce(display, opts)?,
        Scene::Inverted => inverted(display, opts),
        Scene::Shapes => shapes(display, opts),
        Scene::Graph => graph(display, opts)?,
        Scene::Pbm => {
            let path = arg.ok_or_else(|| {
                DisplayError::InvalidConfiguration("pbm scene needs a bitmap path".into())
            })?;
            display.surface_mut().fill(false);
            display.surface_mut().load_bitmap_file(path, true)?;
            show(display, opts.hold);
        }
        Scene::Text => {
            let text = arg.unwrap_or("Hello World!");
            display.surface_mut().fill(false);
            label(display, text, 0, 0)?;
            show(display, opts.hold);
        }
    }
    Ok(())
}

fn show<B: Bus>(display: &mut DisplayController<B>, pause: Duration) {
    // failures land in last_bus_error
    let _ = display.flush();
    if !pause.is_zero() {
        thread::sleep(pause);
    }
}

/// Text through the glyph table, or the built-in 6x10 font when none is loaded
fn label<B: Bus>(
    display: &mut DisplayController<B>,
    text: &str,
    x: i32,
    y: i32,
) -> Result<(), DisplayError> {
    if display.font().is_some() {
        display.draw_text(text, x, y, true)?;
    } else {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(display.surface_mut());
    }
    Ok(())
}

fn fill<B: Bus>(display: &mut DisplayController<B>, opts: &DemoOptions) {
    display.surface_mut().fill(false);
    show(display, opts.hold);
    display.surface_mut().fill(true);
    show(display, opts.hold);
}

fn slide<B: Bus>(display: &mut DisplayController<B>, opts: &DemoOptions) {
    let width = display.surface().width() as i32;
    let mut y = 30.0_f32;
    for x in (0..=width).take(opts.frames as usize) {
        y -= 0.3;
        let surface = display.surface_mut();
        surface.fill(false);
        surface.fill_rect(x, y.round() as i32, 20, 35, true);
        show(display, opts.delay);
    }
}

fn bounce<B: Bus>(display: &mut DisplayController<B>, opts: &DemoOptions) -> Result<(), DisplayError> {
    let right = display.surface().width() as i32 - 1;
    let bottom = display.surface().height() as i32 - 1;
    let (mut x, mut y) = (right as f32 / 2.0, bottom as f32 / 2.0);
    let (mut vx, mut vy) = (2.3_f32, 3.5_f32);
    let mut collisions = 0u32;

    for _ in 0..opts.frames {
        x += vx;
        y += vy;
        if x > (right - SQUARE) as f32 || x < 0.0 {
            vx = -vx;
            collisions += 1;
        }
        if y >= (bottom - SQUARE) as f32 || y < 0.0 {
            vy = -vy;
            collisions += 1;
        }

        let surface = display.surface_mut();
        surface.fill(false);
        surface.fill_rect(x.round() as i32, y.round() as i32, SQUARE, SQUARE, true);
        surface.draw_line(0, 0, right, 0, true);
        surface.draw_line(0, 0, 0, bottom, true);
        surface.draw_line(right, 0, right, bottom, true);
        surface.draw_line(0, bottom, right, bottom, true);
        label(display, &collisions.to_string(), 10, bottom / 2)?;
        show(display, opts.delay);
    }
    debug!("Bounce finished after {} collisions", collisions);
    Ok(())
}

fn inverted<B: Bus>(display: &mut DisplayController<B>, opts: &DemoOptions) {
    let surface = display.surface_mut();
    surface.fill(true);
    surface.fill_rect(10, 10, 20, 30, false);
    show(display, opts.hold);
}

fn shapes<B: Bus>(display: &mut DisplayController<B>, opts: &DemoOptions) {
    let w = display.surface().width() as i32;
    let h = display.surface().height() as i32;
    let r = h / 4;
    let surface = display.surface_mut();
    surface.fill(false);
    surface.draw_circle(w / 6, h / 2, r, CircleStyle::Filled, true);
    surface.draw_circle(w / 2, h / 2, r, CircleStyle::Ring { thickness: 0.3 }, true);
    surface.draw_arc(5 * w / 6, h / 2, r, 0, 270, 0.5, true);
    surface.draw_rect(0, 0, w - 1, h - 1, true);
    show(display, opts.hold);
}

fn graph<B: Bus>(display: &mut DisplayController<B>, opts: &DemoOptions) -> Result<(), DisplayError> {
    let w = display.surface().width();
    let h = display.surface().height();
    let half = h / 2;
    let mut line = TimeSeriesPlot::new(PlotConfig {
        origin_y: half as i32 - 1,
        width: w,
        height: half,
        min_value: -1.0,
        max_value: 1.0,
        mode: PlotMode::Line,
        ..Default::default()
    })?;
    let mut bars = TimeSeriesPlot::new(PlotConfig {
        origin_y: h as i32 - 1,
        width: w,
        height: half,
        min_value: -1.0,
        max_value: 1.0,
        mode: PlotMode::Bar,
        ..Default::default()
    })?;

    for frame in 0..opts.frames {
        let value = (frame as f64 * 0.2).sin();
        let surface = display.surface_mut();
        surface.fill(false);
        surface.push_sample(&mut line, value);
        surface.push_sample(&mut bars, value);
        show(display, opts.delay);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::mock::MockBus;
    use crate::display::traits::DisplayCapabilities;

    fn quick(frames: u32) -> DemoOptions {
        DemoOptions { frames, delay: Duration::ZERO, hold: Duration::ZERO }
    }

    fn panel() -> (DisplayController<MockBus>, MockBus) {
        let bus = MockBus::new();
        let display = DisplayController::start(bus.clone(), DisplayCapabilities::default()).unwrap();
        (display, bus)
    }

    #[test]
    fn test_fill_scene_ends_white() {
        let (mut display, bus) = panel();
        run(&mut display, Scene::Fill, None, &quick(1)).unwrap();
        assert_eq!(display.surface().count_on(), 128 * 64);
        // startup blank plus two frames
        assert_eq!(bus.blocks().len(), 3);
    }

    #[test]
    fn test_inverted_scene() {
        let (mut display, _bus) = panel();
        run(&mut display, Scene::Inverted, None, &quick(1)).unwrap();
        assert_eq!(display.surface().count_on(), 128 * 64 - 21 * 30);
        assert!(!display.surface().get_pixel(10, 10));
        assert!(display.surface().get_pixel(9, 9));
    }

    #[test]
    fn test_slide_scene_is_bounded_by_frames() {
        let (mut display, bus) = panel();
        run(&mut display, Scene::Slide, None, &quick(4)).unwrap();
        assert_eq!(bus.blocks().len(), 5);
        // last frame: x = 3, y = 30 - 1.2 rounds to 29
        assert!(display.surface().get_pixel(3, 29));
        assert!(display.surface().get_pixel(3, 63));
        assert!(!display.surface().get_pixel(2, 29));
        assert!(!display.surface().get_pixel(3, 28));
    }

    #[test]
    fn test_bounce_scene_draws_border_and_counter() {
        let (mut display, _bus) = panel();
        run(&mut display, Scene::Bounce, None, &quick(3)).unwrap();
        let surface = display.surface();
        assert!(surface.get_pixel(0, 0));
        assert!(surface.get_pixel(127, 63));
        assert!(surface.get_pixel(64, 63));
        // square + border + counter glyph
        assert!(surface.count_on() > 15 * 15);
    }

    #[test]
    fn test_text_scene_falls_back_to_builtin_font() {
        let (mut display, _bus) = panel();
        run(&mut display, Scene::Text, Some("Hi"), &quick(1)).unwrap();
        assert!(display.surface().count_on() > 0);
    }

    #[test]
    fn test_pbm_scene_needs_path() {
        let (mut display, _bus) = panel();
        let result = run(&mut display, Scene::Pbm, None, &quick(1));
        assert!(matches!(result, Err(DisplayError::InvalidConfiguration(_))));
        let result = run(&mut display, Scene::Pbm, Some("/nonexistent.pbm"), &quick(1));
        assert!(matches!(result, Err(DisplayError::Import(_))));
    }

    #[test]
    fn test_graph_and_shapes_scenes() {
        let (mut display, bus) = panel();
        run(&mut display, Scene::Graph, None, &quick(10)).unwrap();
        assert!(display.surface().count_on() > 0);
        run(&mut display, Scene::Shapes, None, &quick(1)).unwrap();
        assert!(display.surface().get_pixel(128 / 6, 32));
        assert_eq!(bus.blocks().len(), 1 + 10 + 1);
    }

    #[test]
    fn test_scene_survives_bus_failure() {
        let (mut display, bus) = panel();
        bus.fail_all(true);
        run(&mut display, Scene::Inverted, None, &quick(1)).unwrap();
        assert!(display.last_bus_error().is_some());
    }
}

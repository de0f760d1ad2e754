/*
 *  display/graph.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Scrolling time-series plot (line or bar)
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

use std::collections::VecDeque;

use crate::display::error::DisplayError;
use crate::display::surface::PixelSurface;

/// How each sample is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotMode {
    /// One pixel per sample
    #[default]
    Line,

    /// A vertical run from the sample down to the baseline
    Bar,
}

/// Placement and scaling of a plot
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Left edge
    pub origin_x: i32,

    /// Baseline row (bottom of the plot)
    pub origin_y: i32,

    /// Columns, which is also the number of samples kept
    pub width: u32,

    /// Rows above and including the baseline
    pub height: u32,

    /// Value drawn on the baseline
    pub min_value: f64,

    /// Value drawn on the top row
    pub max_value: f64,

    pub mode: PlotMode,

    /// Pixel state painted for samples
    pub on: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            origin_x: 0,
            origin_y: 63,
            width: 128,
            height: 64,
            min_value: 0.0,
            max_value: 255.0,
            mode: PlotMode::Line,
            on: true,
        }
    }
}

/// Ring of the most recent `width` samples, newest first
#[derive(Debug, Clone)]
pub struct TimeSeriesPlot {
    config: PlotConfig,
    slope: f64,
    offset: f64,
    samples: VecDeque<f64>,
}

impl TimeSeriesPlot {
    pub fn new(config: PlotConfig) -> Result<Self, DisplayError> {
        if config.width == 0 || config.height == 0 {
            return Err(DisplayError::InvalidConfiguration(
                format!("plot must be non-empty, got {}x{}", config.width, config.height)
            ));
        }
        let span = config.max_value - config.min_value;
        if !span.is_finite() || span == 0.0 {
            return Err(DisplayError::InvalidConfiguration(
                format!("plot range {}..{} is empty", config.min_value, config.max_value)
            ));
        }

        let slope = (1.0 - config.height as f64) / span;
        let offset = config.origin_y as f64 - slope * config.min_value;
        Ok(Self {
            samples: VecDeque::with_capacity(config.width as usize),
            config,
            slope,
            offset,
        })
    }

    pub fn config(&self) -> &PlotConfig { &self.config }

    /// Samples, newest first
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn len(&self) -> usize { self.samples.len() }
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }

    /// Record a sample, evicting the oldest once the plot is full
    pub fn push(&mut self, value: f64) {
        self.samples.push_front(value);
        if self.samples.len() > self.config.width as usize {
            self.samples.pop_back();
        }
    }

    /// Row a value maps to, `None` for NaN or infinite values
    pub fn map_value(&self, value: f64) -> Option<i32> {
        let y = (self.slope * value + self.offset).round_ties_even();
        y.is_finite().then_some(y as i32)
    }

    #[inline]
    fn in_band(&self, y: i32) -> bool {
        let base = self.config.origin_y;
        base - (self.config.height as i32) < y && y <= base
    }

    /// Paint every retained sample, newest at the right edge.
    ///
    /// Only sample pixels are written; the caller clears the plot area
    /// between frames if old traces should disappear.
    pub fn render(&self, surface: &mut PixelSurface) {
        let left = self.config.origin_x;
        let right = left + self.config.width as i32;
        let on = self.config.on;

        let mut x = right - 1;
        for value in self.samples() {
            if x < left {
                break;
            }
            if let Some(y) = self.map_value(value) {
                match self.config.mode {
                    PlotMode::Bar => {
                        // clamp to the band before walking, y may be near i32::MIN
                        let base = self.config.origin_y;
                        let top = y.max(base - self.config.height as i32 + 1);
                        for row in top..=base {
                            surface.set_pixel(x, row, on);
                        }
                    }
                    PlotMode::Line => {
                        if self.in_band(y) {
                            surface.set_pixel(x, y, on);
                        }
                    }
                }
            }
            x -= 1;
        }
    }
}

impl PixelSurface {
    /// Push `value` into `plot` and repaint it
    pub fn push_sample(&mut self, plot: &mut TimeSeriesPlot, value: f64) {
        plot.push(value);
        plot.render(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(mode: PlotMode) -> TimeSeriesPlot {
        TimeSeriesPlot::new(PlotConfig {
            origin_x: 10,
            origin_y: 20,
            width: 5,
            height: 11,
            min_value: 0.0,
            max_value: 10.0,
            mode,
            on: true,
        })
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_range() {
        let config = PlotConfig { min_value: 5.0, max_value: 5.0, ..Default::default() };
        assert!(TimeSeriesPlot::new(config).is_err());
        let config = PlotConfig { width: 0, ..Default::default() };
        assert!(TimeSeriesPlot::new(config).is_err());
    }

    #[test]
    fn test_fifo_eviction() {
        let mut plot = small(PlotMode::Line);
        for v in 1..=7 {
            plot.push(v as f64);
        }
        assert_eq!(plot.len(), 5);
        assert_eq!(plot.samples().collect::<Vec<_>>(), vec![7.0, 6.0, 5.0, 4.0, 3.0]);
    }

    #[test]
    fn test_eviction_is_by_age_not_value() {
        let mut plot = small(PlotMode::Line);
        for v in [9.0, 0.0, 9.0, 0.0, 9.0, 1.0] {
            plot.push(v);
        }
        assert_eq!(plot.samples().collect::<Vec<_>>(), vec![1.0, 9.0, 0.0, 9.0, 0.0]);
    }

    #[test]
    fn test_value_mapping() {
        let plot = TimeSeriesPlot::new(PlotConfig::default()).unwrap();
        assert_eq!(plot.map_value(0.0), Some(63));
        assert_eq!(plot.map_value(255.0), Some(0));
        assert_eq!(plot.map_value(f64::NAN), None);
    }

    #[test]
    fn test_line_render_newest_on_right() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let mut plot = small(PlotMode::Line);
        surface.push_sample(&mut plot, 0.0);
        surface.push_sample(&mut plot, 10.0);
        // newest (10.0) maps to the top row of the band, column 14
        assert!(surface.get_pixel(14, 10));
        // previous sample scrolled one column left, on the baseline
        assert!(surface.get_pixel(13, 20));
    }

    #[test]
    fn test_line_clips_out_of_band() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let mut plot = small(PlotMode::Line);
        surface.push_sample(&mut plot, 25.0);
        surface.push_sample(&mut plot, -5.0);
        assert_eq!(surface.count_on(), 0);
    }

    #[test]
    fn test_bar_render() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let mut plot = small(PlotMode::Bar);
        surface.push_sample(&mut plot, 5.0);
        // 5.0 maps to row 15: bar covers 15..=20
        assert_eq!(surface.count_on(), 6);
        assert!(surface.get_pixel(14, 15));
        assert!(surface.get_pixel(14, 20));
        assert!(!surface.get_pixel(14, 14));
    }

    #[test]
    fn test_bar_clipped_to_band() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let mut plot = small(PlotMode::Bar);
        surface.push_sample(&mut plot, 100.0);
        assert_eq!(surface.count_on(), 11);
    }

    #[test]
    fn test_bar_huge_value_fills_band() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let mut plot = small(PlotMode::Bar);
        assert_eq!(plot.map_value(1e12), Some(i32::MIN));
        surface.push_sample(&mut plot, 1e12);
        assert_eq!(surface.count_on(), 11);
        assert!(surface.get_pixel(14, 10));
        assert!(surface.get_pixel(14, 20));
        assert!(!surface.get_pixel(14, 9));
    }

    #[test]
    fn test_bar_full_window_of_huge_values() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let mut plot = small(PlotMode::Bar);
        for _ in 0..5 {
            surface.push_sample(&mut plot, 1e12);
        }
        assert_eq!(surface.count_on(), 5 * 11);
    }

    #[test]
    fn test_bar_extreme_values_stay_in_band() {
        for value in [-1e12, f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let mut surface = PixelSurface::new(128, 64).unwrap();
            let mut plot = small(PlotMode::Bar);
            surface.push_sample(&mut plot, value);
            assert_eq!(surface.count_on(), 0, "value {}", value);
        }
    }

    #[test]
    fn test_line_huge_value_is_clipped() {
        let mut surface = PixelSurface::new(128, 64).unwrap();
        let mut plot = small(PlotMode::Line);
        surface.push_sample(&mut plot, 1e12);
        surface.push_sample(&mut plot, f64::INFINITY);
        assert_eq!(surface.count_on(), 0);
    }
}

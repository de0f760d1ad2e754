//! Property-based tests for the pixel surface and raster primitives.
//! Addressing and line invariants checked over random coordinates.

use oledfb::display::{PixelSurface, PlotConfig, PlotMode, TimeSeriesPlot};

const W: i32 = 128;
const H: i32 = 64;

fn blank() -> PixelSurface {
    PixelSurface::new(W as u32, H as u32).unwrap()
}

proptest::proptest! {
    /// Out-of-range coordinates land on the same pixel as their wrapped form.
    #[test]
    fn set_pixel_wraps_like_modulo(x in -1000i32..1000, y in -1000i32..1000) {
        let mut wrapped = blank();
        wrapped.set_pixel(x, y, true);
        let mut direct = blank();
        direct.set_pixel(x.rem_euclid(W), y.rem_euclid(H), true);
        assert_eq!(wrapped, direct);
        assert!(wrapped.get_pixel(x, y));
        assert_eq!(wrapped.count_on(), 1);
    }

    /// Setting then clearing a pixel touches nothing else.
    #[test]
    fn set_then_clear_round_trip(x in 0i32..W, y in 0i32..H) {
        let mut surface = blank();
        surface.fill(true);
        surface.set_pixel(x, y, false);
        assert!(!surface.get_pixel(x, y));
        assert_eq!(surface.count_on(), (W * H - 1) as usize);
        surface.set_pixel(x, y, true);
        assert_eq!(surface.count_on(), (W * H) as usize);
    }

    /// Clipped writes never alter the surface outside the panel.
    #[test]
    fn clipped_pixel_ignores_outside(x in -500i32..500, y in -500i32..500) {
        let mut surface = blank();
        let painted = surface.set_pixel_clipped(x, y, true);
        let inside = (0..W).contains(&x) && (0..H).contains(&y);
        assert_eq!(painted, inside);
        assert_eq!(surface.count_on(), inside as usize);
    }

    /// Horizontal lines light exactly the span between their endpoints.
    #[test]
    fn horizontal_line_is_exact(x1 in 0i32..W, x2 in 0i32..W, y in 0i32..H) {
        let mut surface = blank();
        surface.draw_line(x1, y, x2, y, true);
        assert_eq!(surface.count_on(), ((x2 - x1).abs() + 1) as usize);
        for x in x1.min(x2)..=x1.max(x2) {
            assert!(surface.get_pixel(x, y));
        }
    }

    /// Vertical lines light exactly the span between their endpoints.
    #[test]
    fn vertical_line_is_exact(x in 0i32..W, y1 in 0i32..H, y2 in 0i32..H) {
        let mut surface = blank();
        surface.draw_line(x, y1, x, y2, true);
        assert_eq!(surface.count_on(), ((y2 - y1).abs() + 1) as usize);
    }

    /// Any in-bounds line covers both endpoints with one pixel per major-axis step.
    #[test]
    fn line_hits_endpoints(x1 in 0i32..W, y1 in 0i32..H, x2 in 0i32..W, y2 in 0i32..H) {
        let mut surface = blank();
        surface.draw_line(x1, y1, x2, y2, true);
        assert!(surface.get_pixel(x1, y1));
        assert!(surface.get_pixel(x2, y2));
        let major = (x2 - x1).abs().max((y2 - y1).abs());
        assert_eq!(surface.count_on(), (major + 1) as usize);
    }

    /// The plot never retains more samples than it has columns.
    #[test]
    fn plot_is_bounded(width in 1u32..64, pushes in 0usize..200) {
        let mut plot = TimeSeriesPlot::new(PlotConfig { width, ..Default::default() }).unwrap();
        for i in 0..pushes {
            plot.push(i as f64);
        }
        assert_eq!(plot.len(), pushes.min(width as usize));
        if pushes > 0 {
            assert_eq!(plot.samples().next(), Some((pushes - 1) as f64));
        }
    }

    /// A bar never leaves the plot band, whatever the sample.
    #[test]
    fn bar_stays_in_band(value in proptest::num::f64::ANY) {
        let mut surface = blank();
        let mut plot = TimeSeriesPlot::new(PlotConfig {
            origin_x: 10,
            origin_y: 20,
            width: 5,
            height: 11,
            min_value: 0.0,
            max_value: 10.0,
            mode: PlotMode::Bar,
            on: true,
        }).unwrap();
        surface.push_sample(&mut plot, value);
        assert!(surface.count_on() <= 11);
        for y in (0..H).filter(|y| !(10..=20).contains(y)) {
            assert!(!surface.get_pixel(14, y));
        }
    }
}

use crate::window::PlotWindow;
use imu_traits::ImuError;
use plotters::prelude::*;
use std::path::PathBuf;

pub const DEFAULT_Y_RANGE: (f64, f64) = (-5.0, 5.0);
pub const INITIAL_X_RANGE: (f64, f64) = (0.0, 10.0);

/// Everything needed to draw one refresh.
pub struct Frame<'a> {
    pub window: &'a PlotWindow,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

/// Chart backend driven by the live plotter.
pub trait Renderer {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), ImuError>;
}

fn render_error<E: std::fmt::Display>(err: E) -> ImuError {
    ImuError::Other(format!("plot rendering failed: {}", err))
}

/// Redraws a PNG on every refresh; any image viewer that reloads shows the live chart.
pub struct BitMapRenderer {
    path: PathBuf,
    size: (u32, u32),
}

impl BitMapRenderer {
    pub fn new(path: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

impl Renderer for BitMapRenderer {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), ImuError> {
        let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let (x0, mut x1) = frame.x_range;
        // A single point would give an empty range.
        if x1 <= x0 {
            x1 = x0 + 1e-3;
        }

        let mut chart = ChartBuilder::on(&root)
            .caption("Live G-Force Acceleration", ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(x0..x1, frame.y_range.0..frame.y_range.1)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc("Time (s)")
            .y_desc("G-Force")
            .draw()
            .map_err(render_error)?;

        let window = frame.window;
        let series = [
            ("X-axis", window.xs(), RED),
            ("Y-axis", window.ys(), GREEN),
            ("Z-axis", window.zs(), BLUE),
        ];
        for (label, values, color) in series {
            chart
                .draw_series(LineSeries::new(
                    window.times().iter().copied().zip(values.iter().copied()),
                    &color,
                ))
                .map_err(render_error)?
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        Ok(())
    }
}

use crate::render::{Frame, Renderer, DEFAULT_Y_RANGE, INITIAL_X_RANGE};
use crate::window::PlotWindow;
use imu_traits::{ImuError, SampleSource};
use log::trace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Pulls a sample per refresh and redraws the g-force chart.
pub struct LivePlotter<S, R> {
    source: S,
    renderer: R,
    window: PlotWindow,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl<S: SampleSource, R: Renderer> LivePlotter<S, R> {
    pub fn new(source: S, renderer: R, window: PlotWindow) -> Self {
        Self {
            source,
            renderer,
            window,
            x_range: INITIAL_X_RANGE,
            y_range: DEFAULT_Y_RANGE,
        }
    }

    pub fn tick(&mut self, elapsed: Duration) -> Result<(), ImuError> {
        let sample = self.source.sample()?;
        let g = sample.acceleration.to_g_force();
        let t = elapsed.as_secs_f64();
        self.window.push(t, g);
        trace!("plot t={:.3} g={}", t, g);

        if let Some(bounds) = self.window.time_bounds() {
            self.x_range = bounds;
        }

        self.renderer.draw(&Frame {
            window: &self.window,
            x_range: self.x_range,
            y_range: self.y_range,
        })
    }

    pub fn window(&self) -> &PlotWindow {
        &self.window
    }

    pub fn x_range(&self) -> (f64, f64) {
        self.x_range
    }

    pub fn y_range(&self) -> (f64, f64) {
        self.y_range
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

/// Fixed-period redraw trigger, runs until `running` is cleared or a frame fails.
pub struct Animation {
    interval: Duration,
}

impl Animation {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Calls `frame` with the time since the loop started. Returns the frame count.
    pub fn run<F>(&self, running: &AtomicBool, frame: F) -> Result<u64, ImuError>
    where
        F: FnMut(Duration) -> Result<(), ImuError>,
    {
        self.run_from(Instant::now(), running, frame)
    }

    /// Like [`Animation::run`], with frame times measured from `start`.
    pub fn run_from<F>(&self, start: Instant, running: &AtomicBool, mut frame: F) -> Result<u64, ImuError>
    where
        F: FnMut(Duration) -> Result<(), ImuError>,
    {
        let mut frames = 0u64;
        let mut next = Instant::now();
        while running.load(Ordering::SeqCst) {
            frame(start.elapsed())?;
            frames += 1;

            next += self.interval;
            let now = Instant::now();
            if next > now {
                thread::sleep(next - now);
            } else {
                next = now;
            }
        }
        Ok(frames)
    }
}

use crate::config::Config;
use crate::logger::{self, SampleLogger};
use crate::plotter::{Animation, LivePlotter};
use crate::render::{BitMapRenderer, Renderer};
use crate::window::PlotWindow;
use imu_traits::{ImuError, SampleSource};
use linux_bno055::Bno055;
use log::{error, info, warn};
use std::sync::atomic::AtomicBool;
use std::time::Instant;

/// Brings up the sensor and runs logger and plotter until `running` is cleared.
pub fn run(config: &Config, running: &AtomicBool) -> Result<(), ImuError> {
    config.validate()?;

    let plot_imu = Bno055::new(&config.bus)?;
    let log_imu = Bno055::open(&config.bus)?;
    let renderer = BitMapRenderer::new(&config.plot, config.plot_size);
    info!(
        "Plotting to {} every {:?}",
        config.plot.display(),
        config.plot_interval
    );

    run_with(config, log_imu, plot_imu, renderer, running)
}

/// Same as [`run`] with the sources and chart backend supplied by the caller.
pub fn run_with<L, P, R>(
    config: &Config,
    log_source: L,
    plot_source: P,
    renderer: R,
    running: &AtomicBool,
) -> Result<(), ImuError>
where
    L: SampleSource + Send + 'static,
    P: SampleSource,
    R: Renderer,
{
    logger::write_header(&config.output)?;
    // CSV rows and plot points share one zero.
    let start = Instant::now();
    let logger =
        SampleLogger::new(log_source, &config.output, config.log_interval).spawn_from(start);

    let mut plotter = LivePlotter::new(plot_source, renderer, PlotWindow::new(config.window));
    let mut logger_down = false;
    let plotted = Animation::new(config.plot_interval).run_from(start, running, |elapsed| {
        if !logger_down && logger.is_finished() {
            warn!("Sample logger is no longer running");
            logger_down = true;
        }
        plotter.tick(elapsed)
    });

    let logged = logger.stop();
    match (&plotted, &logged) {
        (Ok(frames), Ok(rows)) => info!("Stopped after {} frames and {} rows", frames, rows),
        (Err(e), _) => error!("Live plot failed: {}", e),
        (_, Err(e)) => error!("Sample logger failed: {}", e),
    }
    plotted?;
    logged?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::HEADER;
    use crate::render::Frame;
    use imu_traits::{Sample, Vector3};
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct Still;

    impl SampleSource for Still {
        fn sample(&mut self) -> Result<Sample, ImuError> {
            Ok(Sample {
                acceleration: Vector3::new(0.0, 0.0, -9.81),
                ..Default::default()
            })
        }
    }

    /// Stops the run after a fixed number of frames.
    struct StopAfter<'a> {
        frames: usize,
        running: &'a AtomicBool,
        seen: Arc<Mutex<Vec<usize>>>,
    }

    impl Renderer for StopAfter<'_> {
        fn draw(&mut self, frame: &Frame<'_>) -> Result<(), ImuError> {
            let mut seen = self.seen.lock().unwrap();
            seen.push(frame.window.len());
            if seen.len() >= self.frames {
                self.running.store(false, Ordering::SeqCst);
            }
            Ok(())
        }
    }

    fn config(name: &str) -> Config {
        let dir = std::env::temp_dir();
        let id = std::process::id();
        Config {
            output: dir.join(format!("imu-app-{}-{}.csv", name, id)),
            plot: PathBuf::from(format!("imu-app-{}-{}.png", name, id)),
            log_interval: Duration::from_millis(5),
            plot_interval: Duration::from_millis(5),
            window: 3,
            ..Default::default()
        }
    }

    #[test]
    fn runs_until_stopped_and_joins_logger() {
        let config = config("run");
        let running = AtomicBool::new(true);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let renderer = StopAfter {
            frames: 5,
            running: &running,
            seen: seen.clone(),
        };

        run_with(&config, Still, Still, renderer, &running).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 3, 3]);
        let text = fs::read_to_string(&config.output).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(HEADER));
        assert!(lines.count() >= 1);
        fs::remove_file(&config.output).unwrap();
    }

    #[test]
    fn invalid_config_never_opens_the_bus() {
        let config = Config {
            window: 0,
            bus: "/dev/does-not-exist".to_string(),
            ..Default::default()
        };
        let running = AtomicBool::new(true);
        assert!(matches!(
            run(&config, &running),
            Err(ImuError::ConfigurationError(_))
        ));
    }
}

use clap::Parser;
use imu_telemetry::config::{DEFAULT_OUTPUT, DEFAULT_PLOT};
use imu_telemetry::{app, Config};
use linux_bno055::DEFAULT_I2C_BUS;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// I2C bus the BNO055 sits on
    #[arg(short, long, default_value = DEFAULT_I2C_BUS)]
    bus: String,

    /// CSV file receiving every sample (overwritten on start)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// PNG redrawn with the live g-force chart
    #[arg(short, long, default_value = DEFAULT_PLOT)]
    plot: PathBuf,

    #[arg(long, default_value_t = 100)]
    log_interval_ms: u64,

    #[arg(long, default_value_t = 100)]
    plot_interval_ms: u64,

    /// Points kept on the chart
    #[arg(short, long, default_value_t = 100)]
    window: usize,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            bus: args.bus,
            output: args.output,
            plot: args.plot,
            log_interval: Duration::from_millis(args.log_interval_ms),
            plot_interval: Duration::from_millis(args.plot_interval_ms),
            window: args.window,
            ..Default::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from(Args::parse());

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Stopping...");
        r.store(false, Ordering::SeqCst);
    })?;

    info!("Press Ctrl+C to exit");
    app::run(&config, &running)?;
    Ok(())
}

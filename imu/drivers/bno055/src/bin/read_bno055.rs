use clap::Parser;
use linux_bno055::{Bno055, SampleSource, DEFAULT_I2C_BUS};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::{thread, time::Duration};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    #[clap(short, long, default_value = DEFAULT_I2C_BUS)]
    bus: String,
    #[clap(short, long, default_value_t = 100)]
    interval_ms: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut imu = Bno055::new(&args.bus)?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))?;

    println!("Reading IMU data...");
    println!("Press Ctrl+C to exit");

    while running.load(Ordering::SeqCst) {
        let sample = imu.sample()?;
        println!(
            "Gyroscope (rad/s): Yaw={:.2}, Pitch={:.2}, Roll={:.2}",
            sample.rate.yaw, sample.rate.pitch, sample.rate.roll
        );
        println!(
            "Accelerometer (m/s²): X={:.2}, Y={:.2}, Z={:.2}",
            sample.acceleration.x, sample.acceleration.y, sample.acceleration.z
        );
        println!("---");
        thread::sleep(Duration::from_millis(args.interval_ms));
    }

    Ok(())
}

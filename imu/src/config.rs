use crate::window::DEFAULT_CAPACITY;
use imu_traits::ImuError;
use linux_bno055::DEFAULT_I2C_BUS;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OUTPUT: &str = "sensor_data.csv";
pub const DEFAULT_PLOT: &str = "live_plot.png";
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_PLOT_SIZE: (u32, u32) = (800, 600);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// I2C bus device path.
    pub bus: String,
    /// CSV record, truncated on every start.
    pub output: PathBuf,
    /// PNG redrawn on every plot refresh.
    pub plot: PathBuf,
    pub plot_size: (u32, u32),
    pub log_interval: Duration,
    pub plot_interval: Duration,
    /// Points kept in the rolling plot window.
    pub window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus: DEFAULT_I2C_BUS.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            plot: PathBuf::from(DEFAULT_PLOT),
            plot_size: DEFAULT_PLOT_SIZE,
            log_interval: DEFAULT_INTERVAL,
            plot_interval: DEFAULT_INTERVAL,
            window: DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ImuError> {
        if self.log_interval.is_zero() || self.plot_interval.is_zero() {
            return Err(ImuError::ConfigurationError(
                "intervals must be non-zero".to_string(),
            ));
        }
        if self.window == 0 {
            return Err(ImuError::ConfigurationError(
                "plot window must hold at least one point".to_string(),
            ));
        }
        if self.output == self.plot {
            return Err(ImuError::ConfigurationError(format!(
                "log and plot both point at {}",
                self.output.display()
            )));
        }
        Ok(())
    }
}

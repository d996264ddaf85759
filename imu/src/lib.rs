pub mod app;
pub mod config;
pub mod logger;
pub mod plotter;
pub mod render;
pub mod window;

pub use config::Config;
pub use imu_traits::*;
pub use linux_bno055::{Bno055, OperationMode};
pub use logger::{LogRecord, LoggerHandle, SampleLogger};
pub use plotter::{Animation, LivePlotter};
pub use render::{BitMapRenderer, Frame, Renderer};
pub use window::PlotWindow;

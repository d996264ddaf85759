use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::sync::mpsc;

use log::trace;

/// Standard gravity used for the vertical offset and g-force scaling (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Number of bytes in one three-channel register read.
pub const BLOCK_LEN: usize = 6;

/// Three little-endian 16-bit channels, exactly as read off the device.
pub type RawRegisterBlock = [u8; BLOCK_LEN];

// --- Basic Types ---
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Rescales an acceleration in m/s² into multiples of standard gravity.
    pub fn to_g_force(&self) -> Vector3 {
        Vector3 {
            x: self.x / GRAVITY,
            y: self.y / GRAVITY,
            z: self.z / GRAVITY,
        }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector3(x={}, y={}, z={})", self.x, self.y, self.z)
    }
}

/// Angular rate in rad/s, in the order the gyroscope block reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngularRate {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl fmt::Display for AngularRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AngularRate(yaw={}, pitch={}, roll={})",
            self.yaw, self.pitch, self.roll
        )
    }
}

// --- Converted IMU Data ---
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    /// Net acceleration (m/s²); gravity is already removed from `z`.
    pub acceleration: Vector3,
    /// Angular velocity (rad/s)
    pub rate: AngularRate,
}

// --- Standard Error Type ---
#[derive(Debug)]
pub enum ImuError {
    /// Error originating from the underlying device communication (I2C)
    DeviceError(String),
    /// Error reading data from the device
    ReadError(String),
    /// Error writing telemetry to durable storage
    WriteError(String),
    /// Error during device or pipeline configuration
    ConfigurationError(String),
    /// Error sending a command to a background activity
    CommandSendError(String),
    /// Catch-all for other errors
    Other(String),
}

impl fmt::Display for ImuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImuError::DeviceError(s) => write!(f, "Device error: {}", s),
            ImuError::ReadError(s) => write!(f, "Read error: {}", s),
            ImuError::WriteError(s) => write!(f, "Write error: {}", s),
            ImuError::ConfigurationError(s) => write!(f, "Configuration error: {}", s),
            ImuError::CommandSendError(s) => write!(f, "Command send error: {}", s),
            ImuError::Other(s) => write!(f, "Other IMU error: {}", s),
        }
    }
}

impl StdError for ImuError {}

impl From<io::Error> for ImuError {
    fn from(err: io::Error) -> Self {
        ImuError::WriteError(err.to_string())
    }
}

impl<T> From<mpsc::SendError<T>> for ImuError {
    fn from(err: mpsc::SendError<T>) -> Self {
        ImuError::CommandSendError(err.to_string())
    }
}

/// Register-addressed access to a single device on a bus.
pub trait RegisterBus {
    /// Reads `length` consecutive bytes starting at `register`.
    fn read_block(&mut self, register: u8, length: usize) -> Result<Vec<u8>, ImuError>;
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read_block(&mut self, register: u8, length: usize) -> Result<Vec<u8>, ImuError> {
        (**self).read_block(register, length)
    }
}

/// Reads one three-channel block. A short read is an error, never zero-filled.
pub fn read_channels<B: RegisterBus + ?Sized>(
    bus: &mut B,
    register: u8,
) -> Result<RawRegisterBlock, ImuError> {
    let bytes = bus.read_block(register, BLOCK_LEN)?;
    trace!("read {:#04x}: {:02x?}", register, bytes);
    RawRegisterBlock::try_from(bytes.as_slice()).map_err(|_| {
        ImuError::ReadError(format!(
            "expected {} bytes from register {:#04x}, got {}",
            BLOCK_LEN,
            register,
            bytes.len()
        ))
    })
}

/// Anything that can produce a fresh converted reading on demand.
pub trait SampleSource {
    fn sample(&mut self) -> Result<Sample, ImuError>;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn sample(&mut self) -> Result<Sample, ImuError> {
        (**self).sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    struct FixedBus(Vec<u8>);

    impl RegisterBus for FixedBus {
        fn read_block(&mut self, _register: u8, length: usize) -> Result<Vec<u8>, ImuError> {
            Ok(self.0.iter().copied().take(length).collect())
        }
    }

    #[test]
    fn read_channels_returns_six_bytes() {
        let mut bus = FixedBus(vec![1, 2, 3, 4, 5, 6, 7]);
        let block = read_channels(&mut bus, 0x08).unwrap();
        assert_eq!(block, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn short_read_is_an_error() {
        let mut bus = FixedBus(vec![1, 2, 3]);
        match read_channels(&mut bus, 0x14) {
            Err(ImuError::ReadError(msg)) => assert!(msg.contains("got 3")),
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn g_force_divides_by_gravity() {
        let g = Vector3::new(GRAVITY, -2.0 * GRAVITY, 0.0).to_g_force();
        assert_abs_diff_eq!(g.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(g.y, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(g.z, 0.0);
    }
}

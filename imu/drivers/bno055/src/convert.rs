//! Raw register blocks to physical units.
//!
//! Both blocks hold three signed 16-bit channels, low byte first. The
//! accelerometer reports hundredths of m/s²; the gyroscope value is scaled
//! straight into rad/s.

use byteorder::{ByteOrder, LittleEndian};
use imu_traits::{AngularRate, RawRegisterBlock, Sample, Vector3, GRAVITY};

/// Accelerometer LSBs per m/s².
pub const ACCEL_LSB_PER_MS2: f64 = 100.0;

/// Gyroscope LSB to rad/s.
pub const GYRO_SCALE: f64 = 0.0174533;

/// Splits a block into its three signed channels.
pub fn decode_channels(block: &RawRegisterBlock) -> [i16; 3] {
    [
        LittleEndian::read_i16(&block[0..2]),
        LittleEndian::read_i16(&block[2..4]),
        LittleEndian::read_i16(&block[4..6]),
    ]
}

/// Net acceleration in m/s². Gravity is taken off the vertical axis only.
pub fn convert_acceleration(block: &RawRegisterBlock) -> Vector3 {
    let [x, y, z] = decode_channels(block);
    Vector3 {
        x: x as f64 / ACCEL_LSB_PER_MS2,
        y: y as f64 / ACCEL_LSB_PER_MS2,
        z: z as f64 / ACCEL_LSB_PER_MS2 - GRAVITY,
    }
}

pub fn convert_rate(block: &RawRegisterBlock) -> AngularRate {
    let [yaw, pitch, roll] = decode_channels(block);
    AngularRate {
        yaw: yaw as f64 * GYRO_SCALE,
        pitch: pitch as f64 * GYRO_SCALE,
        roll: roll as f64 * GYRO_SCALE,
    }
}

pub fn convert(accel: &RawRegisterBlock, gyro: &RawRegisterBlock) -> Sample {
    Sample {
        acceleration: convert_acceleration(accel),
        rate: convert_rate(gyro),
    }
}

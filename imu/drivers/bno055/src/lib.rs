pub mod convert;
pub mod registers;

use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};
pub use imu_traits::{
    read_channels, AngularRate, ImuError, RawRegisterBlock, RegisterBus, Sample, SampleSource,
    Vector3,
};
use log::{debug, error};
use num_traits::FromPrimitive;
pub use registers::OperationMode;
use registers::{AccelRegisters, ChipRegisters, Constants, GyroRegisters, RegisterPage, StatusRegisters};
use std::thread;
use std::time::Duration;

/// Default bus path, bus index 1.
pub const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";

pub struct BnoI2CError(LinuxI2CError);

impl From<LinuxI2CError> for BnoI2CError {
    fn from(err: LinuxI2CError) -> Self {
        BnoI2CError(err)
    }
}

impl From<BnoI2CError> for ImuError {
    fn from(err: BnoI2CError) -> Self {
        ImuError::DeviceError(err.0.to_string())
    }
}

fn device_error<E: std::error::Error>(err: E) -> ImuError {
    ImuError::DeviceError(err.to_string())
}

pub struct Bno055<D = LinuxI2CDevice> {
    i2c: D,
}

impl Bno055<LinuxI2CDevice> {
    /// Opens the BNO055 on the given I2C bus and brings it into raw AMG mode.
    ///
    /// # Arguments
    /// * `i2c_bus` - The I2C bus path (e.g., "/dev/i2c-1")
    pub fn new(i2c_bus: &str) -> Result<Self, ImuError> {
        let mut bno = Self::open(i2c_bus)?;
        bno.init()?;
        Ok(bno)
    }

    /// Opens a handle without touching device configuration.
    ///
    /// Used for a second reader on a device that another handle already
    /// brought up. Every block read is a single SMBus transaction, so reads
    /// from the two handles cannot interleave.
    pub fn open(i2c_bus: &str) -> Result<Self, ImuError> {
        let address = Constants::DefaultI2cAddr as u16;
        debug!("Opening BNO055 at {:#04x} on {}", address, i2c_bus);
        let i2c = LinuxI2CDevice::new(i2c_bus, address).map_err(BnoI2CError)?;
        Ok(Bno055 { i2c })
    }
}

impl<D: I2CDevice> Bno055<D> {
    /// Wraps an already opened device.
    pub fn from_device(i2c: D) -> Self {
        Bno055 { i2c }
    }

    /// Page 0, chip ID check, then raw accelerometer/magnetometer/gyroscope mode.
    pub fn init(&mut self) -> Result<(), ImuError> {
        self.set_page(RegisterPage::Page0)?;
        self.verify_chip_id()?;
        self.set_mode(OperationMode::Amg)?;
        debug!("BNO055 ready");
        Ok(())
    }

    fn set_page(&mut self, page: RegisterPage) -> Result<(), ImuError> {
        self.i2c
            .smbus_write_byte_data(ChipRegisters::PageId as u8, page as u8)
            .map_err(device_error)
    }

    fn verify_chip_id(&mut self) -> Result<(), ImuError> {
        let chip_id = self
            .i2c
            .smbus_read_byte_data(ChipRegisters::ChipId as u8)
            .map_err(device_error)?;
        if Constants::ChipId as u8 != chip_id {
            error!("Invalid chip ID. Expected 0xA0, got {:#x}", chip_id);
            return Err(ImuError::DeviceError("Invalid chip ID".to_string()));
        }
        Ok(())
    }

    /// Sets the operation mode of the BNO055.
    pub fn set_mode(&mut self, mode: OperationMode) -> Result<(), ImuError> {
        self.i2c
            .smbus_write_byte_data(StatusRegisters::OprMode as u8, mode as u8)
            .map_err(device_error)?;
        // Wait for mode switch to complete
        thread::sleep(Duration::from_millis(20));
        Ok(())
    }

    pub fn mode(&mut self) -> Result<OperationMode, ImuError> {
        let raw = self
            .i2c
            .smbus_read_byte_data(StatusRegisters::OprMode as u8)
            .map_err(device_error)?;
        OperationMode::from_u8(raw & 0x0F).ok_or_else(|| {
            ImuError::DeviceError(format!("Unsupported operation mode {:#04x}", raw))
        })
    }

    /// Raw accelerometer block (X, Y, Z).
    pub fn read_accel_block(&mut self) -> Result<RawRegisterBlock, ImuError> {
        read_channels(self, AccelRegisters::XLsb as u8)
    }

    /// Raw gyroscope block (yaw, pitch, roll).
    pub fn read_gyro_block(&mut self) -> Result<RawRegisterBlock, ImuError> {
        read_channels(self, GyroRegisters::YawLsb as u8)
    }
}

impl<D: I2CDevice> RegisterBus for Bno055<D> {
    fn read_block(&mut self, register: u8, length: usize) -> Result<Vec<u8>, ImuError> {
        // Register select and data read go out as one transaction; another
        // handle moving the register pointer in between would swap blocks.
        let length = u8::try_from(length).map_err(|_| {
            ImuError::ReadError(format!("block of {} bytes is too long", length))
        })?;
        self.i2c
            .smbus_read_i2c_block_data(register, length)
            .map_err(device_error)
    }
}

impl<D: I2CDevice> SampleSource for Bno055<D> {
    fn sample(&mut self) -> Result<Sample, ImuError> {
        let accel = self.read_accel_block()?;
        let gyro = self.read_gyro_block()?;
        Ok(convert::convert(&accel, &gyro))
    }
}

use num_derive::{FromPrimitive, ToPrimitive};

#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive)]
pub enum ChipRegisters {
    ChipId = 0x00,
    PageId = 0x07,
}

/// Start of the X, Y, Z accelerometer block.
#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive)]
pub enum AccelRegisters {
    XLsb = 0x08,
}

/// Start of the gyroscope block, which reports yaw, pitch, roll in that order.
#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive)]
pub enum GyroRegisters {
    YawLsb = 0x14,
}

#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive)]
pub enum StatusRegisters {
    OprMode = 0x3D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum OperationMode {
    Config = 0x00,
    AccOnly = 0x01,
    MagOnly = 0x02,
    GyrOnly = 0x03,
    AccMag = 0x04,
    AccGyro = 0x05,
    MagGyro = 0x06,
    Amg = 0x07,
}

#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive)]
pub enum RegisterPage {
    Page0 = 0,
}

#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive)]
pub enum Constants {
    ChipId = 0xA0,
    DefaultI2cAddr = 0x28,
}

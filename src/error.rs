//! Error definitions for CCS811 driver.

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq)]
pub enum Error<I2cError> {
    /// Underlying I2C transaction failed.
    I2c(I2cError),
    /// Transfer moved fewer bytes than expected, or the sensor did not confirm a write.
    Io,
    /// Address is unknown or not accessible in the requested direction.
    InvalidRegister(u8),
    /// HW_ID did not match (contains the value read).
    InvalidDevice(u8),
    /// STATUS reports no valid application firmware.
    FirmwareNotLoaded,
    /// Provided parameter was outside the accepted range.
    OutOfRange,
    /// Control command code not handled by the device.
    UnsupportedCommand(u32),
}

impl<I2cError: core::fmt::Debug> core::fmt::Display for Error<I2cError> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Error::Io => write!(f, "short transfer or unconfirmed write"),
            Error::InvalidRegister(reg) => write!(f, "invalid register 0x{:02X}", reg),
            Error::InvalidDevice(id) => write!(f, "unexpected hardware id 0x{:02X}", id),
            Error::FirmwareNotLoaded => write!(f, "application firmware not loaded"),
            Error::OutOfRange => write!(f, "parameter out of range"),
            Error::UnsupportedCommand(code) => write!(f, "unsupported control command {}", code),
        }
    }
}

impl<I2cError: core::fmt::Debug> core::error::Error for Error<I2cError> {}

//! Data types for CCS811 driver.

use crate::registers::{ErrorIdBits, StatusBits, be_value, decode_drive_mode};

/// Drive mode (sampling cadence) selected through MEAS_MODE bits 6-4.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum MeasurementMode {
    /// Measurements disabled.
    Idle = 0,
    /// Constant power, one sample per second.
    ConstantPower1s = 1,
    /// Pulse heating, one sample every 10 seconds.
    PulseHeating10s = 2,
    /// Low power pulse heating, one sample every 60 seconds.
    LowPowerPulseHeating60s = 3,
}

impl MeasurementMode {
    /// Map a drive mode index to a mode; `None` for reserved values.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Idle),
            1 => Some(Self::ConstantPower1s),
            2 => Some(Self::PulseHeating10s),
            3 => Some(Self::LowPowerPulseHeating60s),
            _ => None,
        }
    }

    /// Decode MEAS_MODE contents.
    pub fn from_meas_mode(raw: u8) -> Option<Self> {
        Self::from_index(decode_drive_mode(raw))
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u32> for MeasurementMode {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::from_index)
            .ok_or(())
    }
}

/// Lifecycle position of a driver instance.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DeviceState {
    #[default]
    Uninitialized,
    /// Software reset issued and settled.
    Reset,
    /// HW_ID matched.
    IdentityVerified,
    /// Sensor switched from boot to application mode.
    AppStarted,
    /// Drive mode configured; samples can be read.
    Measuring,
    /// `start` aborted; call `start` again to recover.
    Failed,
}

/// One ALG_RESULT_DATA sample.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Measurement {
    /// Equivalent CO2 in ppm.
    pub co2_ppm: u16,
    /// Total volatile organic compounds in ppb.
    pub tvoc_ppb: u16,
    /// STATUS snapshot taken with the sample.
    pub status: u8,
    /// ERROR_ID snapshot taken with the sample.
    pub error_id: u8,
    /// RAW_DATA: bits 15-10 sensor current (µA), bits 9-0 ADC voltage code.
    pub raw_data: u16,
}

impl Measurement {
    /// Decode the 8-byte ALG_RESULT_DATA burst (big-endian pairs).
    pub fn from_bytes(buf: &[u8; 8]) -> Self {
        Self {
            co2_ppm: be_value(&buf[0..2]) as u16,
            tvoc_ppb: be_value(&buf[2..4]) as u16,
            status: buf[4],
            error_id: buf[5],
            raw_data: be_value(&buf[6..8]) as u16,
        }
    }

    pub fn status_bits(&self) -> StatusBits {
        StatusBits::from_bits_truncate(self.status)
    }

    pub fn error_bits(&self) -> ErrorIdBits {
        ErrorIdBits::from_bits_truncate(self.error_id)
    }

    /// Sensor current in µA.
    pub fn raw_current_ua(&self) -> u8 {
        (self.raw_data >> 10) as u8
    }

    /// ADC voltage code (1023 = 1.65 V).
    pub fn raw_voltage_code(&self) -> u16 {
        self.raw_data & 0x03FF
    }

    /// Write the device text line, `CO2=<ppm> PPM, TVOC=<ppb> PPB\n`.
    pub fn write_line<W: core::fmt::Write>(&self, out: &mut W) -> core::fmt::Result {
        writeln!(out, "{}", self)
    }
}

impl core::fmt::Display for Measurement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "CO2={} PPM, TVOC={} PPB", self.co2_ppm, self.tvoc_ppb)
    }
}

/// Firmware versions reported by the bootloader.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FirmwareVersions {
    pub boot: u16,
    pub app: u16,
}

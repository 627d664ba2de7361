//! Driver configuration.

use crate::data_types::MeasurementMode;
use crate::registers::{DEFAULT_I2C_ADDRESS, WAIT_AFTER_APP_START_US, WAIT_AFTER_RESET_US};

/// Bus address, settling delays and the mode applied at the end of `start`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    pub(crate) address: u8,
    pub(crate) reset_delay_us: u32,
    pub(crate) app_start_delay_us: u32,
    pub(crate) startup_mode: MeasurementMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_I2C_ADDRESS,
            reset_delay_us: WAIT_AFTER_RESET_US,
            app_start_delay_us: WAIT_AFTER_APP_START_US,
            startup_mode: MeasurementMode::ConstantPower1s,
        }
    }
}

impl Config {
    /// 7-bit I2C address of the sensor.
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;

        self
    }

    pub fn reset_delay_us(mut self, us: u32) -> Self {
        self.reset_delay_us = us;

        self
    }

    pub fn app_start_delay_us(mut self, us: u32) -> Self {
        self.app_start_delay_us = us;

        self
    }

    /// Mode written as the last step of `start`.
    pub fn startup_mode(mut self, mode: MeasurementMode) -> Self {
        self.startup_mode = mode;

        self
    }

    pub fn get_address(&self) -> u8 {
        self.address
    }

    pub fn get_startup_mode(&self) -> MeasurementMode {
        self.startup_mode
    }
}

//! CCS811 Rust Driver
//!
//! `no_std` driver for the CCS811 eCO2/TVOC air-quality sensor over I2C.
//! Register access validates every address against the register catalogue before
//! touching the bus; [`Ccs811::start`] walks the sensor from reset into application
//! mode. Optional async API (`async`), `defmt` or `log` logging.

#![no_std]

// Logging macros are textually scoped: keep this module first.
pub(crate) mod fmt;

pub mod chardev;
pub mod config;
pub mod data_types;
pub mod driver;
pub mod error;
pub mod interface;
pub mod registers;
pub mod shared;

pub use chardev::CharDevice;
pub use config::Config;
pub use data_types::{DeviceState, Measurement, MeasurementMode};
pub use driver::Ccs811;
pub use error::Error;
pub use interface::{Bus, I2cBus};
#[cfg(feature = "async")]
pub use interface::AsyncBus;
pub use registers::DEFAULT_I2C_ADDRESS;
pub use shared::SharedCcs811;

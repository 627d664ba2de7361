//! Mutex-guarded driver handle for callers in different contexts.
//!
//! Every operation runs start to finish while holding the lock, so register
//! sequences (select then receive, write then confirm) from two callers never
//! interleave on the bus.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::data_types::{DeviceState, Measurement, MeasurementMode};
use crate::driver::Ccs811;
use crate::error::Error;
use crate::interface::Bus;

pub struct SharedCcs811<M: RawMutex, B, D> {
    inner: Mutex<M, RefCell<Ccs811<B, D>>>,
}

impl<M: RawMutex, B, D> SharedCcs811<M, B, D> {
    pub const fn new(driver: Ccs811<B, D>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(driver)),
        }
    }

    /// Run `f` with exclusive access to the driver.
    ///
    /// `f` must not call back into this same handle: the driver is already
    /// borrowed for the duration of the call and a nested access panics.
    pub fn with<R>(&self, f: impl FnOnce(&mut Ccs811<B, D>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn state(&self) -> DeviceState {
        self.with(|dev| dev.state())
    }

    pub fn into_inner(self) -> Ccs811<B, D> {
        self.inner.into_inner().into_inner()
    }
}

impl<M, B, D> SharedCcs811<M, B, D>
where
    M: RawMutex,
    B: Bus,
    D: embedded_hal::delay::DelayNs,
{
    pub fn start(&self) -> Result<(), Error<B::Error>> {
        self.with(|dev| dev.start())
    }

    pub fn set_mode(&self, mode: MeasurementMode) -> Result<(), Error<B::Error>> {
        self.with(|dev| dev.set_mode(mode))
    }

    /// Drive mode index as reported by the sensor (0-7).
    pub fn get_mode(&self) -> Result<u8, Error<B::Error>> {
        self.with(|dev| dev.get_mode())
    }

    pub fn read_sample(&self) -> Result<Measurement, Error<B::Error>> {
        self.with(|dev| dev.read_sample())
    }
}

//! CCS811 driver: register access and the startup sequence.
//! Blocking API over [`Bus`]; the async version mirrors it behind the `async` feature.

use crate::config::Config;
use crate::data_types::{DeviceState, FirmwareVersions, Measurement, MeasurementMode};
use crate::error::Error;
use crate::interface::Bus;
#[cfg(feature = "async")]
use crate::interface::AsyncBus;
use crate::interface::I2cBus;
use crate::registers::{
    ErrorIdBits, HW_ID_VALUE, MAX_REG_LEN, RESET_SEQUENCE, StatusBits, addr, be_value, decode_drive_mode, descriptor,
    encode_drive_mode, humidity_to_env, temperature_to_env,
};

/// CCS811 driver instance. Owns the bus, the delay provider and the lifecycle state.
pub struct Ccs811<B, D> {
    bus: B,
    delay: D,
    config: Config,
    state: DeviceState,
}

impl<I2C, D> Ccs811<I2cBus<I2C>, D> {
    /// Create a new driver instance with the default I2C address (0x5A).
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_config(i2c, delay, Config::default())
    }

    /// Create a new driver instance with a custom configuration.
    pub fn with_config(i2c: I2C, delay: D, config: Config) -> Self {
        Self::with_bus(I2cBus::new(i2c, config.address), delay, config)
    }

    /// Consume the driver and return the I2C peripheral.
    pub fn free(self) -> I2C {
        self.bus.release()
    }
}

impl<B, D> Ccs811<B, D> {
    /// Create a driver on top of any [`Bus`] implementation.
    pub fn with_bus(bus: B, delay: D, config: Config) -> Self {
        Self {
            bus,
            delay,
            config,
            state: DeviceState::Uninitialized,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the driver and return bus and delay.
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }
}

/// Width of a readable register, or `InvalidRegister`.
fn readable_width<E>(reg: u8) -> Result<usize, Error<E>> {
    match descriptor(reg) {
        Some(d) if d.readable => Ok(d.width as usize),
        _ => Err(Error::InvalidRegister(reg)),
    }
}

/// Build `[reg, payload..]` into `frame`, returning the frame length.
fn write_frame<E>(reg: u8, payload: &[u8], frame: &mut [u8; MAX_REG_LEN + 1]) -> Result<usize, Error<E>> {
    let width = match descriptor(reg) {
        Some(d) if d.writable => d.width as usize,
        _ => return Err(Error::InvalidRegister(reg)),
    };
    if payload.len() != width {
        return Err(Error::OutOfRange);
    }
    frame[0] = reg;
    frame[1..=width].copy_from_slice(payload);
    Ok(width + 1)
}

fn expect_len<E>(expected: usize, actual: usize) -> Result<(), Error<E>> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::Io)
    }
}

fn check_identity<E>(id: u8) -> Result<(), Error<E>> {
    if id == HW_ID_VALUE {
        Ok(())
    } else {
        error!("unexpected hardware id {:#x}", id);
        Err(Error::InvalidDevice(id))
    }
}

/// Returns whether ERROR_ID should be read for diagnostics.
fn check_app_valid<E>(status: StatusBits) -> Result<bool, Error<E>> {
    if !status.contains(StatusBits::APP_VALID) {
        error!("status error: app firmware not loaded");
        return Err(Error::FirmwareNotLoaded);
    }
    if status.contains(StatusBits::ERROR) {
        warn!("status error: previous error detected");
        return Ok(true);
    }
    Ok(false)
}

fn confirm_mode<E>(requested: MeasurementMode, meas_mode: u8) -> Result<(), Error<E>> {
    if decode_drive_mode(meas_mode) == requested.index() {
        Ok(())
    } else {
        Err(Error::Io)
    }
}

fn env_payload(humidity_milli_percent: u32, temperature_milli_celsius: i32) -> [u8; 4] {
    let hum = humidity_to_env(humidity_milli_percent).to_be_bytes();
    let temp = temperature_to_env(temperature_milli_celsius).to_be_bytes();
    [hum[0], hum[1], temp[0], temp[1]]
}

impl<B, D> Ccs811<B, D>
where
    B: Bus,
{
    /// Read a register and return its bytes as a big-endian integer.
    pub fn read_reg(&mut self, reg: u8) -> Result<u64, Error<B::Error>> {
        let width = readable_width::<B::Error>(reg)?;
        let mut buf = [0u8; MAX_REG_LEN];
        self.read_raw(reg, &mut buf[..width])?;
        Ok(be_value(&buf[..width]))
    }

    /// Write `payload` to a register. The payload length must equal the register width.
    pub fn write_reg(&mut self, reg: u8, payload: &[u8]) -> Result<(), Error<B::Error>> {
        let mut frame = [0u8; MAX_REG_LEN + 1];
        let len = write_frame::<B::Error>(reg, payload, &mut frame)?;
        let sent = self.bus.send(&frame[..len]).map_err(Error::I2c)?;
        expect_len(len, sent)
    }

    /// Select `reg`, then receive exactly `buf.len()` bytes.
    fn read_raw(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<B::Error>> {
        let sent = self.bus.send(&[reg]).map_err(Error::I2c)?;
        expect_len::<B::Error>(1, sent)?;
        let received = self.bus.recv(buf).map_err(Error::I2c)?;
        expect_len(buf.len(), received)
    }

    /// Write a new drive mode and read it back.
    pub fn set_mode(&mut self, mode: MeasurementMode) -> Result<(), Error<B::Error>> {
        match self.read_reg(addr::MEAS_MODE) {
            Ok(val) => debug!("read measure mode: value={:#x}", val as u8),
            Err(_) => debug!("read measure mode failed"),
        }
        self.write_reg(addr::MEAS_MODE, &[encode_drive_mode(mode.index())])?;
        let confirmed = self.read_reg(addr::MEAS_MODE)? as u8;
        debug!("read measure mode: value={:#x}", confirmed);
        confirm_mode(mode, confirmed)
    }

    /// Read the current drive mode index (MEAS_MODE bits 6-4), including values
    /// outside [`MeasurementMode`] such as the 250 ms raw-data mode 4.
    pub fn get_mode(&mut self) -> Result<u8, Error<B::Error>> {
        let raw = self.read_reg(addr::MEAS_MODE)? as u8;
        Ok(decode_drive_mode(raw))
    }

    /// Current drive mode as [`MeasurementMode`]; `None` when the sensor reports mode 4-7.
    pub fn measurement_mode(&mut self) -> Result<Option<MeasurementMode>, Error<B::Error>> {
        Ok(MeasurementMode::from_index(self.get_mode()?))
    }

    /// Read and decode ALG_RESULT_DATA.
    pub fn read_sample(&mut self) -> Result<Measurement, Error<B::Error>> {
        let mut buf = [0u8; 8];
        self.read_raw(addr::ALG_RESULT_DATA, &mut buf)?;
        trace!("data {:#x} {:#x} {:#x} {:#x}", buf[0], buf[1], buf[2], buf[3]);
        Ok(Measurement::from_bytes(&buf))
    }

    pub fn read_status(&mut self) -> Result<StatusBits, Error<B::Error>> {
        let val = self.read_reg(addr::STATUS)?;
        Ok(StatusBits::from_bits_truncate(val as u8))
    }

    pub fn read_error_id(&mut self) -> Result<ErrorIdBits, Error<B::Error>> {
        let val = self.read_reg(addr::ERROR_ID)?;
        Ok(ErrorIdBits::from_bits_truncate(val as u8))
    }

    /// True when a new sample is waiting in ALG_RESULT_DATA.
    pub fn data_ready(&mut self) -> Result<bool, Error<B::Error>> {
        Ok(self.read_status()?.contains(StatusBits::DATA_READY))
    }

    pub fn hardware_id(&mut self) -> Result<u8, Error<B::Error>> {
        Ok(self.read_reg(addr::HW_ID)? as u8)
    }

    pub fn hardware_version(&mut self) -> Result<u8, Error<B::Error>> {
        Ok(self.read_reg(addr::HW_VERSION)? as u8)
    }

    pub fn firmware_versions(&mut self) -> Result<FirmwareVersions, Error<B::Error>> {
        let boot = self.read_reg(addr::FW_BOOT_VERSION)? as u16;
        let app = self.read_reg(addr::FW_APP_VERSION)? as u16;
        Ok(FirmwareVersions { boot, app })
    }

    /// Read the algorithm baseline (opaque, restore with [`set_baseline`](Self::set_baseline)).
    pub fn baseline(&mut self) -> Result<u16, Error<B::Error>> {
        Ok(self.read_reg(addr::BASELINE)? as u16)
    }

    pub fn set_baseline(&mut self, baseline: u16) -> Result<(), Error<B::Error>> {
        self.write_reg(addr::BASELINE, &baseline.to_be_bytes())
    }

    /// Provide ambient humidity (milli-%RH) and temperature (milli-°C) for compensation.
    pub fn set_environment_data(
        &mut self,
        humidity_milli_percent: u32,
        temperature_milli_celsius: i32,
    ) -> Result<(), Error<B::Error>> {
        let payload = env_payload(humidity_milli_percent, temperature_milli_celsius);
        self.write_reg(addr::ENV_DATA, &payload)
    }
}

impl<B, D> Ccs811<B, D>
where
    B: Bus,
    D: embedded_hal::delay::DelayNs,
{
    /// Reset the sensor, verify it, start the application firmware and enter the startup mode.
    ///
    /// On error the driver is left in [`DeviceState::Failed`]; calling `start` again
    /// repeats the whole sequence.
    pub fn start(&mut self) -> Result<(), Error<B::Error>> {
        let result = self.run_startup();
        if result.is_err() {
            self.state = DeviceState::Failed;
        }
        result
    }

    fn run_startup(&mut self) -> Result<(), Error<B::Error>> {
        self.state = DeviceState::Uninitialized;

        self.write_reg(addr::SW_RESET, &RESET_SEQUENCE)?;
        self.delay.delay_us(self.config.reset_delay_us);
        self.state = DeviceState::Reset;

        let id = self.hardware_id()?;
        check_identity::<B::Error>(id)?;
        self.state = DeviceState::IdentityVerified;

        match self.hardware_version() {
            Ok(v) => debug!("hardware version {:#x}", v),
            Err(_) => debug!("read hardware version failed"),
        }

        let status = self.read_status()?;
        debug!("status {:#x}", status.bits());
        if check_app_valid::<B::Error>(status)? {
            match self.read_error_id() {
                Ok(err) => warn!("error id {:#x}", err.bits()),
                Err(_) => warn!("read error id failed"),
            }
        }

        match self.read_reg(addr::FW_BOOT_VERSION) {
            Ok(v) => debug!("firmware boot version {:#x}", v as u16),
            Err(_) => debug!("read firmware boot version failed"),
        }
        match self.read_reg(addr::FW_APP_VERSION) {
            Ok(v) => debug!("firmware app version {:#x}", v as u16),
            Err(_) => debug!("read firmware app version failed"),
        }

        match self.write_reg(addr::APP_START, &[]) {
            Ok(()) => self.state = DeviceState::AppStarted,
            Err(_) => warn!("write app start failed"),
        }
        self.delay.delay_us(self.config.app_start_delay_us);

        match self.read_status() {
            Ok(s) => debug!("status {:#x}", s.bits()),
            Err(_) => debug!("read status failed"),
        }

        self.set_mode(self.config.startup_mode)?;
        self.state = DeviceState::Measuring;
        info!("started in mode {}", self.config.startup_mode.index());
        Ok(())
    }
}

#[cfg(feature = "async")]
impl<B, D> Ccs811<B, D>
where
    B: AsyncBus,
{
    /// Async version of [`read_reg`](Self::read_reg).
    pub async fn read_reg_async(&mut self, reg: u8) -> Result<u64, Error<B::Error>> {
        let width = readable_width::<B::Error>(reg)?;
        let mut buf = [0u8; MAX_REG_LEN];
        self.read_raw_async(reg, &mut buf[..width]).await?;
        Ok(be_value(&buf[..width]))
    }

    pub async fn write_reg_async(&mut self, reg: u8, payload: &[u8]) -> Result<(), Error<B::Error>> {
        let mut frame = [0u8; MAX_REG_LEN + 1];
        let len = write_frame::<B::Error>(reg, payload, &mut frame)?;
        let sent = self.bus.send(&frame[..len]).await.map_err(Error::I2c)?;
        expect_len(len, sent)
    }

    async fn read_raw_async(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<B::Error>> {
        let sent = self.bus.send(&[reg]).await.map_err(Error::I2c)?;
        expect_len::<B::Error>(1, sent)?;
        let received = self.bus.recv(buf).await.map_err(Error::I2c)?;
        expect_len(buf.len(), received)
    }

    pub async fn set_mode_async(&mut self, mode: MeasurementMode) -> Result<(), Error<B::Error>> {
        match self.read_reg_async(addr::MEAS_MODE).await {
            Ok(val) => debug!("read measure mode: value={:#x}", val as u8),
            Err(_) => debug!("read measure mode failed"),
        }
        self.write_reg_async(addr::MEAS_MODE, &[encode_drive_mode(mode.index())])
            .await?;
        let confirmed = self.read_reg_async(addr::MEAS_MODE).await? as u8;
        debug!("read measure mode: value={:#x}", confirmed);
        confirm_mode(mode, confirmed)
    }

    pub async fn get_mode_async(&mut self) -> Result<u8, Error<B::Error>> {
        let raw = self.read_reg_async(addr::MEAS_MODE).await? as u8;
        Ok(decode_drive_mode(raw))
    }

    pub async fn measurement_mode_async(&mut self) -> Result<Option<MeasurementMode>, Error<B::Error>> {
        Ok(MeasurementMode::from_index(self.get_mode_async().await?))
    }

    pub async fn read_sample_async(&mut self) -> Result<Measurement, Error<B::Error>> {
        let mut buf = [0u8; 8];
        self.read_raw_async(addr::ALG_RESULT_DATA, &mut buf).await?;
        Ok(Measurement::from_bytes(&buf))
    }

    pub async fn read_status_async(&mut self) -> Result<StatusBits, Error<B::Error>> {
        let val = self.read_reg_async(addr::STATUS).await?;
        Ok(StatusBits::from_bits_truncate(val as u8))
    }

    pub async fn data_ready_async(&mut self) -> Result<bool, Error<B::Error>> {
        Ok(self.read_status_async().await?.contains(StatusBits::DATA_READY))
    }

    pub async fn baseline_async(&mut self) -> Result<u16, Error<B::Error>> {
        Ok(self.read_reg_async(addr::BASELINE).await? as u16)
    }

    pub async fn set_baseline_async(&mut self, baseline: u16) -> Result<(), Error<B::Error>> {
        self.write_reg_async(addr::BASELINE, &baseline.to_be_bytes()).await
    }

    pub async fn set_environment_data_async(
        &mut self,
        humidity_milli_percent: u32,
        temperature_milli_celsius: i32,
    ) -> Result<(), Error<B::Error>> {
        let payload = env_payload(humidity_milli_percent, temperature_milli_celsius);
        self.write_reg_async(addr::ENV_DATA, &payload).await
    }
}

#[cfg(feature = "async")]
impl<B, D> Ccs811<B, D>
where
    B: AsyncBus,
    D: embedded_hal_async::delay::DelayNs,
{
    /// Async version of [`start`](Self::start).
    pub async fn start_async(&mut self) -> Result<(), Error<B::Error>> {
        let result = self.run_startup_async().await;
        if result.is_err() {
            self.state = DeviceState::Failed;
        }
        result
    }

    async fn run_startup_async(&mut self) -> Result<(), Error<B::Error>> {
        self.state = DeviceState::Uninitialized;

        self.write_reg_async(addr::SW_RESET, &RESET_SEQUENCE).await?;
        self.delay.delay_us(self.config.reset_delay_us).await;
        self.state = DeviceState::Reset;

        let id = self.read_reg_async(addr::HW_ID).await? as u8;
        check_identity::<B::Error>(id)?;
        self.state = DeviceState::IdentityVerified;

        match self.read_reg_async(addr::HW_VERSION).await {
            Ok(v) => debug!("hardware version {:#x}", v as u8),
            Err(_) => debug!("read hardware version failed"),
        }

        let status = self.read_status_async().await?;
        debug!("status {:#x}", status.bits());
        if check_app_valid::<B::Error>(status)? {
            match self.read_reg_async(addr::ERROR_ID).await {
                Ok(err) => warn!("error id {:#x}", err as u8),
                Err(_) => warn!("read error id failed"),
            }
        }

        match self.read_reg_async(addr::FW_BOOT_VERSION).await {
            Ok(v) => debug!("firmware boot version {:#x}", v as u16),
            Err(_) => debug!("read firmware boot version failed"),
        }
        match self.read_reg_async(addr::FW_APP_VERSION).await {
            Ok(v) => debug!("firmware app version {:#x}", v as u16),
            Err(_) => debug!("read firmware app version failed"),
        }

        match self.write_reg_async(addr::APP_START, &[]).await {
            Ok(()) => self.state = DeviceState::AppStarted,
            Err(_) => warn!("write app start failed"),
        }
        self.delay.delay_us(self.config.app_start_delay_us).await;

        match self.read_status_async().await {
            Ok(s) => debug!("status {:#x}", s.bits()),
            Err(_) => debug!("read status failed"),
        }

        self.set_mode_async(self.config.startup_mode).await?;
        self.state = DeviceState::Measuring;
        info!("started in mode {}", self.config.startup_mode.index());
        Ok(())
    }
}

//! File-like facade: one text line per read, numeric control commands for the mode.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::data_types::MeasurementMode;
use crate::error::Error;
use crate::interface::Bus;
use crate::shared::SharedCcs811;

/// Control code: set the drive mode from the payload.
pub const SET_MODE: u32 = 100;
/// Control code: write the current drive mode into the payload.
pub const GET_MODE: u32 = 101;

/// Decoded control request.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    SetMode(MeasurementMode),
    GetMode,
}

impl Command {
    /// Decode a control code and its native-endian `u32` payload.
    pub fn decode<E>(code: u32, payload: &[u8; 4]) -> Result<Self, Error<E>> {
        match code {
            SET_MODE => {
                let mode = MeasurementMode::try_from(u32::from_ne_bytes(*payload))
                    .map_err(|_| Error::<E>::OutOfRange)?;
                Ok(Command::SetMode(mode))
            }
            GET_MODE => Ok(Command::GetMode),
            other => Err(Error::UnsupportedCommand(other)),
        }
    }
}

/// Longest text line: `CO2=65535 PPM, TVOC=65535 PPB\n` is 30 bytes.
const LINE_CAPACITY: usize = 32;

pub struct CharDevice<'a, M: RawMutex, B, D> {
    sensor: &'a SharedCcs811<M, B, D>,
}

impl<'a, M, B, D> CharDevice<'a, M, B, D>
where
    M: RawMutex,
    B: Bus,
    D: embedded_hal::delay::DelayNs,
{
    pub fn new(sensor: &'a SharedCcs811<M, B, D>) -> Self {
        Self { sensor }
    }

    /// Read one sample and render it as `CO2=<ppm> PPM, TVOC=<ppb> PPB\n` into `buf`.
    ///
    /// Returns the number of bytes written; a buffer too small for the line is `OutOfRange`.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, Error<B::Error>> {
        let sample = self.sensor.read_sample().inspect_err(|_| {
            error!("error reading ccs811 data");
        })?;
        debug!("read sample co2={} tvoc={}", sample.co2_ppm, sample.tvoc_ppb);
        let mut line: heapless::String<LINE_CAPACITY> = heapless::String::new();
        sample.write_line(&mut line).map_err(|_| Error::<B::Error>::OutOfRange)?;
        let out = buf.get_mut(..line.len()).ok_or(Error::OutOfRange)?;
        out.copy_from_slice(line.as_bytes());
        Ok(line.len())
    }

    /// Dispatch a control command. For [`GET_MODE`] the mode is written back into `payload`.
    pub fn ioctl(&self, code: u32, payload: &mut [u8; 4]) -> Result<(), Error<B::Error>> {
        trace!("ioctl cmd={}", code);
        match Command::decode::<B::Error>(code, payload)? {
            Command::SetMode(mode) => self.sensor.set_mode(mode),
            Command::GetMode => {
                let mode = self.sensor.get_mode()?;
                *payload = u32::from(mode).to_ne_bytes();
                Ok(())
            }
        }
    }
}

//! Bus primitives used by the driver.
//!
//! The sensor uses a select-then-transfer convention: the register address is
//! sent in its own write, followed by a separate read (or a write carrying the
//! address and payload together). Both primitives report how many bytes were
//! actually moved so the driver can reject short transfers.

/// Blocking byte-level bus to a single sensor.
pub trait Bus {
    type Error;

    /// Send `bytes` in one transfer, returning the number of bytes accepted.
    fn send(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;

    /// Receive into `buf`, returning the number of bytes filled.
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Async mirror of [`Bus`].
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait AsyncBus {
    type Error;

    async fn send(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;

    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// [`Bus`] over an `embedded-hal` I2C controller at a fixed address.
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cBus<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Return the 7-bit I2C address used by this bus.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Consume the bus and return the I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Bus for I2cBus<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Error = I2C::Error;

    fn send(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        self.i2c.write(self.address, bytes)?;
        Ok(bytes.len())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c.read(self.address, buf)?;
        Ok(buf.len())
    }
}

#[cfg(feature = "async")]
impl<I2C> AsyncBus for I2cBus<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    type Error = I2C::Error;

    async fn send(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        self.i2c.write(self.address, bytes).await?;
        Ok(bytes.len())
    }

    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c.read(self.address, buf).await?;
        Ok(buf.len())
    }
}

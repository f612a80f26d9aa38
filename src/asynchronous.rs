use crate::{
    check_device, check_len, error::Error, split_address, ADDRESS_LEN, READY_POLL_LIMIT,
    WIRE_BUFFER,
};
use embassy_futures::yield_now;
use embedded_hal_async::i2c::{Error as _, ErrorKind, I2c, Operation};

/// Async type alias for a driver sized for the Arduino Wire buffer
pub type AsyncWireEeprom<I2C> = AsyncI2cEeprom<I2C, WIRE_BUFFER>;

/// The generic async I2C EEPROM driver
pub struct AsyncI2cEeprom<I2C, const BUFFER: usize = WIRE_BUFFER>
where
    I2C: I2c,
{
    i2c: I2C,
}

impl<I2C, const BUFFER: usize> AsyncI2cEeprom<I2C, BUFFER>
where
    I2C: I2c,
{
    pub const MAX_WRITE: usize = BUFFER - ADDRESS_LEN;
    pub const MAX_READ: usize = BUFFER;

    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    async fn write_base(
        &mut self,
        device: u8,
        address: u16,
        data: &[u8],
    ) -> Result<(), Error<I2C::Error>> {
        let device = check_device(device)?;
        check_len(data.len(), Self::MAX_WRITE)?;
        let addr = split_address(address);

        let res = self
            .i2c
            .transaction(device, &mut [Operation::Write(&addr), Operation::Write(data)])
            .await
            .map_err(Error::I2c);

        #[cfg(feature = "defmt")]
        if res.is_ok() {
            defmt::trace!(
                "Write to {=u8} at {=u16}, {=usize}: {:?}",
                device,
                address,
                data.len(),
                data
            );
        } else {
            defmt::trace!("Failed to write");
        }
        res
    }

    async fn read_base(
        &mut self,
        device: u8,
        address: u16,
        buff: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        let device = check_device(device)?;
        check_len(buff.len(), Self::MAX_READ)?;
        if buff.is_empty() {
            return Ok(());
        }

        let res = self
            .i2c
            .write_read(device, &split_address(address), buff)
            .await
            .map_err(Error::I2c);

        #[cfg(feature = "defmt")]
        if res.is_ok() {
            defmt::trace!(
                "Read from {=u8} at {=u16}, {=usize}: {:?}",
                device,
                address,
                buff.len(),
                buff
            );
        } else {
            defmt::trace!("Failed to read");
        }
        res
    }

    /// Write one byte
    pub async fn write_byte(
        &mut self,
        device: u8,
        address: u16,
        value: u8,
    ) -> Result<(), Error<I2C::Error>> {
        self.write_base(device, address, &[value]).await
    }

    /// Write up to [`Self::MAX_WRITE`] bytes in one burst. Same page wraparound
    /// caveat as [`crate::blocking::I2cEeprom::write_page`]
    pub async fn write_page(
        &mut self,
        device: u8,
        page_address: u16,
        data: &[u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.write_base(device, page_address, data).await
    }

    pub async fn read_byte(&mut self, device: u8, address: u16) -> Result<u8, Error<I2C::Error>> {
        let mut buff = [0u8; 1];
        self.read_base(device, address, &mut buff).await?;
        Ok(buff[0])
    }

    pub async fn read_buffer(
        &mut self,
        device: u8,
        address: u16,
        buff: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.read_base(device, address, buff).await
    }

    /// Acknowledge poll, just less noisy than matching on the NACK yourself
    pub async fn poll_ready(&mut self, device: u8) -> Result<(), Error<I2C::Error>> {
        let device = check_device(device)?;
        match self.i2c.write(device, &[]).await {
            Ok(()) => Ok(()),
            Err(e) if matches!(e.kind(), ErrorKind::NoAcknowledge(_)) => Err(Error::Busy),
            Err(e) => Err(Error::I2c(e)),
        }
    }

    pub async fn wait_ready(&mut self, device: u8) -> Result<(), Error<I2C::Error>> {
        for _ in 0..READY_POLL_LIMIT {
            match self.poll_ready(device).await {
                Err(Error::Busy) => yield_now().await,
                res => return res,
            }
        }
        #[cfg(feature = "defmt")]
        defmt::trace!("Device {=u8} never became ready", device);
        Err(Error::Timeout)
    }
}

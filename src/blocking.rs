use crate::{
    check_device, check_len, error::Error, split_address, ADDRESS_LEN, READY_POLL_LIMIT,
    WIRE_BUFFER,
};
use embedded_hal::i2c::{Error as _, ErrorKind, I2c, Operation};

/// Type alias for a driver sized for the Arduino Wire buffer
pub type WireEeprom<I2C> = I2cEeprom<I2C, WIRE_BUFFER>;

/// The generic blocking I2C EEPROM driver
///
/// `BUFFER` is the largest transfer the transport moves in one transaction.
/// The two memory address bytes share that buffer on writes.
pub struct I2cEeprom<I2C, const BUFFER: usize = WIRE_BUFFER>
where
    I2C: I2c,
{
    i2c: I2C,
}

impl<I2C, const BUFFER: usize> I2cEeprom<I2C, BUFFER>
where
    I2C: I2c,
{
    /// Largest payload of a single write
    pub const MAX_WRITE: usize = BUFFER - ADDRESS_LEN;
    /// Largest payload of a single read
    pub const MAX_READ: usize = BUFFER;

    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_base(
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

    fn read_base(
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

    /// Write one byte. The chip starts its write cycle once the transaction ends
    pub fn write_byte(
        &mut self,
        device: u8,
        address: u16,
        value: u8,
    ) -> Result<(), Error<I2C::Error>> {
        self.write_base(device, address, &[value])
    }

    /// Write up to [`Self::MAX_WRITE`] bytes in one burst.
    ///
    /// The chip only advances the low bits of its address counter inside a page,
    /// so a burst running past the end of a page wraps to the start of that same
    /// page (a 6-bit wrap on 64-byte page parts). Keeping bursts inside a page is
    /// up to the caller, see [`crate::page_wrap`] and [`crate::storage`].
    pub fn write_page(
        &mut self,
        device: u8,
        page_address: u16,
        data: &[u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.write_base(device, page_address, data)
    }

    /// Read the byte at `address`
    pub fn read_byte(&mut self, device: u8, address: u16) -> Result<u8, Error<I2C::Error>> {
        let mut buff = [0u8; 1];
        self.read_base(device, address, &mut buff)?;
        Ok(buff[0])
    }

    /// Read up to [`Self::MAX_READ`] bytes starting at `address`
    pub fn read_buffer(
        &mut self,
        device: u8,
        address: u16,
        buff: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.read_base(device, address, buff)
    }

    /// Acknowledge poll, [`Error::Busy`] while the chip is in its write cycle
    pub fn poll_ready(&mut self, device: u8) -> Result<(), Error<I2C::Error>> {
        let device = check_device(device)?;
        match self.i2c.write(device, &[]) {
            Ok(()) => Ok(()),
            Err(e) if matches!(e.kind(), ErrorKind::NoAcknowledge(_)) => Err(Error::Busy),
            Err(e) => Err(Error::I2c(e)),
        }
    }

    /// Poll until the chip acknowledges, at most [`READY_POLL_LIMIT`] times
    pub fn wait_ready(&mut self, device: u8) -> Result<(), Error<I2C::Error>> {
        for _ in 0..READY_POLL_LIMIT {
            match self.poll_ready(device) {
                Err(Error::Busy) => continue,
                res => return res,
            }
        }
        #[cfg(feature = "defmt")]
        defmt::trace!("Device {=u8} never became ready", device);
        Err(Error::Timeout)
    }
}

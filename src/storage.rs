//! Implementation of the [`Storage`](embedded_storage::Storage) traits for one chip on the bus
//!
//! Unlike [`I2cEeprom::write_page`], writes here may be any length: they are
//! split on page boundaries and on the transport buffer, and every burst waits
//! for the chip's write cycle before the next one goes out.

use crate::{blocking::I2cEeprom, check_range, error::Error, ADDRESS_SPACE, WIRE_BUFFER};
use embedded_hal::i2c::I2c;
use embedded_storage::{ReadStorage, Storage};

pub const _32K: u32 = 0x1000;
pub const _64K: u32 = 0x2000;
pub const _128K: u32 = 0x4000;
pub const _256K: u32 = 0x8000;
pub const _512K: u32 = 0x10000;

/// Type alias for the AT24C32 / 24LC32
pub type At24c32<'a, I2C> = EepromStorage<'a, I2C, _32K, 32>;
/// Type alias for the AT24C64 / 24LC64
pub type At24c64<'a, I2C> = EepromStorage<'a, I2C, _64K, 32>;
/// Type alias for the AT24C128 / 24LC128
pub type At24c128<'a, I2C> = EepromStorage<'a, I2C, _128K, 64>;
/// Type alias for the AT24C256 / 24LC256
pub type At24c256<'a, I2C> = EepromStorage<'a, I2C, _256K, 64>;
/// Type alias for the AT24C512 / 24LC512
pub type At24c512<'a, I2C> = EepromStorage<'a, I2C, _512K, 128>;

/// A chip of `CAPACITY` bytes with `PAGE`-byte pages at a fixed device address
pub struct EepromStorage<
    'a,
    I2C,
    const CAPACITY: u32,
    const PAGE: u32,
    const BUFFER: usize = WIRE_BUFFER,
> where
    I2C: I2c,
{
    eeprom: &'a mut I2cEeprom<I2C, BUFFER>,
    device: u8,
}

impl<'a, I2C, const CAPACITY: u32, const PAGE: u32, const BUFFER: usize>
    EepromStorage<'a, I2C, CAPACITY, PAGE, BUFFER>
where
    I2C: I2c,
{
    const PAGE_NOT_EMPTY: () = assert!(PAGE > 0, "page size must not be zero");

    pub fn new(eeprom: &'a mut I2cEeprom<I2C, BUFFER>, device: u8) -> Self {
        let () = Self::PAGE_NOT_EMPTY;
        Self { eeprom, device }
    }

    /// Device address every access of this storage goes to
    pub fn device(&self) -> u8 {
        self.device
    }

    /// Both the chip and the two address bytes must cover the whole access
    fn check_access(offset: u32, length: usize) -> Result<(), Error<I2C::Error>> {
        check_range(CAPACITY, offset, length)?;
        check_range(ADDRESS_SPACE, offset, length)
    }
}

fn to_address<E>(offset: u32) -> Result<u16, Error<E>> {
    u16::try_from(offset).map_err(|_| Error::OutOfBounds)
}

impl<I2C, const CAPACITY: u32, const PAGE: u32, const BUFFER: usize> ReadStorage
    for EepromStorage<'_, I2C, CAPACITY, PAGE, BUFFER>
where
    I2C: I2c,
{
    type Error = Error<I2C::Error>;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        Self::check_access(offset, bytes.len())?;

        let mut address = offset;
        for chunk in bytes.chunks_mut(I2cEeprom::<I2C, BUFFER>::MAX_READ) {
            self.eeprom
                .read_buffer(self.device, to_address(address)?, chunk)?;
            address += chunk.len() as u32;
        }
        Ok(())
    }

    fn capacity(&self) -> usize {
        CAPACITY as usize
    }
}

impl<I2C, const CAPACITY: u32, const PAGE: u32, const BUFFER: usize> Storage
    for EepromStorage<'_, I2C, CAPACITY, PAGE, BUFFER>
where
    I2C: I2c,
{
    fn write(&mut self, mut offset: u32, mut bytes: &[u8]) -> Result<(), Self::Error> {
        Self::check_access(offset, bytes.len())?;

        while !bytes.is_empty() {
            // A burst must end on the page boundary or the chip wraps
            let room = (PAGE - offset % PAGE) as usize;
            let chunk_len = room
                .min(I2cEeprom::<I2C, BUFFER>::MAX_WRITE)
                .min(bytes.len());
            if chunk_len == 0 {
                // No room for data next to the address bytes
                return Err(Error::TooLong);
            }

            self.eeprom
                .write_page(self.device, to_address(offset)?, &bytes[..chunk_len])?;
            self.eeprom.wait_ready(self.device)?;

            bytes = &bytes[chunk_len..];
            offset += chunk_len as u32;
        }
        Ok(())
    }
}

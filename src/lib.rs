#![cfg_attr(not(test), no_std)]
//! This is a platform agnostic library for 24xx serial I2C EEPROMs using [embedded-hal](https://github.com/rust-embedded/embedded-hal).
//!
//! Any part addressed with two memory address bytes is supported, for example:
//! * AT24C32 / 24LC32
//! * AT24C64 / 24LC64
//! * AT24C128 / 24LC128
//! * AT24C256 / 24LC256
//! * AT24C512 / 24LC512
//!
//! The drivers are stateless: the device address is passed to every call, so a
//! single driver can talk to several chips on the same bus.

pub mod asynchronous;
pub mod blocking;
pub mod error;
pub mod storage;

#[cfg(test)]
mod sim;

use crate::error::Error;

/// Transmit buffer of the Arduino Wire library, the usual bottleneck for burst transfers
pub const WIRE_BUFFER: usize = 32;

/// Number of memory address bytes sent ahead of every transfer
pub const ADDRESS_LEN: usize = 2;

/// Bytes reachable through the two memory address bytes
pub const ADDRESS_SPACE: u32 = 0x1_0000;

/// Upper bound of acknowledge polls done by `wait_ready`
pub const READY_POLL_LIMIT: u32 = 1_000;

/// Splits a memory address into the high and low bytes put on the wire.
pub const fn split_address(address: u16) -> [u8; 2] {
    [(address >> 8) as u8, address as u8]
}

/// Memory location byte `index` of a page write starting at `address` lands on.
///
/// The chip only increments the low bits of its address counter during a page
/// write, so a burst crossing the end of a page continues at the start of the
/// same page. With 64-byte pages that is a 6-bit wraparound. `page_size` must be
/// a power of two.
///
/// # Panics
///
/// Panics if `page_size` is zero.
pub const fn page_wrap(address: u16, index: usize, page_size: u16) -> u16 {
    assert!(page_size > 0, "page size must not be zero");
    let mask = page_size - 1;
    let offset = ((address & mask) as usize + index) % page_size as usize;
    (address & !mask) | offset as u16
}

pub(crate) fn check_device<E>(device: u8) -> Result<u8, Error<E>> {
    if device > 0x7F {
        return Err(Error::InvalidDevice);
    }
    Ok(device)
}

pub(crate) fn check_len<E>(length: usize, max: usize) -> Result<(), Error<E>> {
    if length > max {
        return Err(Error::TooLong);
    }
    Ok(())
}

pub(crate) fn check_range<E>(capacity: u32, offset: u32, length: usize) -> Result<(), Error<E>> {
    let length = length as u32;
    if length > capacity || offset > capacity - length {
        return Err(Error::OutOfBounds);
    }
    Ok(())
}

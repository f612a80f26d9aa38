/// The error type used by the drivers and the storage adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Error raised by the I2C transport, passed through as is
    I2c(E),
    /// Transfer does not fit in the transport buffer
    TooLong,
    /// Device address does not fit in 7 bits
    InvalidDevice,
    /// Offset or length outside the chip
    OutOfBounds,
    /// The chip did not acknowledge, it is still in its write cycle
    Busy,
    /// The chip never acknowledged while waiting for the write cycle
    Timeout,
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "i2c error: {e:?}"),
            Error::TooLong => f.write_str("transfer exceeds the transport buffer"),
            Error::InvalidDevice => f.write_str("device address is not 7-bit"),
            Error::OutOfBounds => f.write_str("access outside of the chip"),
            Error::Busy => f.write_str("device busy"),
            Error::Timeout => f.write_str("device did not become ready"),
        }
    }
}

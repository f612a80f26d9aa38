//! Simulated 24xx EEPROM answering on an in-memory I2C bus.

use crate::page_wrap;
use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    Nack,
}

impl embedded_hal::i2c::Error for SimError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
    }
}

pub struct SimEeprom {
    pub device: u8,
    pub memory: Vec<u8>,
    pub page_size: u16,
    /// Transactions NACKed after each completed write
    pub write_cycle: u32,
    /// Every transaction attempted, acknowledged or not
    pub transactions: usize,
    /// Bytes of each write phase, address bytes included
    pub writes: Vec<Vec<u8>>,
    /// Length of each read phase
    pub reads: Vec<usize>,
    busy: u32,
    pointer: u16,
}

impl SimEeprom {
    pub fn new(device: u8, size: usize, page_size: u16) -> Self {
        Self {
            device,
            memory: vec![0xFF; size],
            page_size,
            write_cycle: 0,
            transactions: 0,
            writes: Vec::new(),
            reads: Vec::new(),
            busy: 0,
            pointer: 0,
        }
    }

    /// 24LC256 at the usual 0x50
    pub fn at24c256() -> Self {
        Self::new(0x50, 32_768, 64)
    }

    fn run(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), SimError> {
        self.transactions += 1;
        if address != self.device {
            return Err(SimError::Nack);
        }
        if self.busy > 0 {
            self.busy -= 1;
            return Err(SimError::Nack);
        }

        let mut pending = Vec::new();
        let mut programmed = false;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => pending.extend_from_slice(bytes),
                Operation::Read(buf) => {
                    programmed |= self.latch(&mut pending);
                    for byte in buf.iter_mut() {
                        *byte = self.memory[self.pointer as usize];
                        self.pointer = ((self.pointer as usize + 1) % self.memory.len()) as u16;
                    }
                    self.reads.push(buf.len());
                }
            }
        }
        programmed |= self.latch(&mut pending);

        if programmed {
            self.busy = self.write_cycle;
        }
        Ok(())
    }

    fn latch(&mut self, pending: &mut Vec<u8>) -> bool {
        if pending.is_empty() {
            return false;
        }
        let bytes = core::mem::take(pending);
        self.writes.push(bytes.clone());
        if bytes.len() < 2 {
            return false;
        }

        let start = u16::from_be_bytes([bytes[0], bytes[1]]) as usize % self.memory.len();
        let start = start as u16;
        let data = &bytes[2..];
        for (i, byte) in data.iter().enumerate() {
            self.memory[page_wrap(start, i, self.page_size) as usize] = *byte;
        }
        self.pointer = page_wrap(start, data.len(), self.page_size);
        !data.is_empty()
    }
}

impl ErrorType for SimEeprom {
    type Error = SimError;
}

impl embedded_hal::i2c::I2c for SimEeprom {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.run(address, operations)
    }
}

impl embedded_hal_async::i2c::I2c for SimEeprom {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.run(address, operations)
    }
}

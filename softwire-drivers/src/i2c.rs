//! embedded-hal I2C bus over a bit engine
//!
//! [`SoftI2c`] runs `embedded_hal::i2c::I2c` transactions on any
//! [`Protocol`] implementation. Adjacent operations of the same direction
//! are merged into one address phase; a direction change issues a
//! repeated start. The last byte read before a direction change or the
//! end of the transaction is NACKed. Empty reads are skipped entirely: a
//! read address phase with nothing to clock in would leave the device
//! driving SDA.

use embedded_hal::i2c::{
    self, ErrorKind, ErrorType, NoAcknowledgeSource, Operation, SevenBitAddress,
};
use softwire_core::{Direction, Error, Protocol};

/// Error from I2C operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// Address not acknowledged
    NackAddress,
    /// Data byte not acknowledged
    NackData,
    /// Write larger than the staging buffer
    Overrun,
}

impl From<Error> for I2cError {
    fn from(e: Error) -> Self {
        match e {
            Error::NackOnAddress => I2cError::NackAddress,
            Error::NackOnData => I2cError::NackData,
            Error::LengthExceeded => I2cError::Overrun,
        }
    }
}

impl i2c::Error for I2cError {
    fn kind(&self) -> ErrorKind {
        match self {
            I2cError::NackAddress => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            I2cError::NackData => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
            I2cError::Overrun => ErrorKind::Overrun,
        }
    }
}

/// `embedded_hal::i2c::I2c` implementation over a bit engine
///
/// A [`BitEngine`](softwire_core::BitEngine) must be claimed before the
/// first transaction.
pub struct SoftI2c<E> {
    engine: E,
}

impl<E: Protocol> SoftI2c<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_inner(self) -> E {
        self.engine
    }

    /// Send START and the address byte
    fn address(&mut self, address: u8, direction: Direction) -> Result<(), I2cError> {
        self.engine.start();
        self.engine
            .shift_out(((address & 0x7F) << 1) | direction.rw_bit());
        if self.engine.get_ack() {
            Ok(())
        } else {
            self.engine.stop();
            Err(I2cError::NackAddress)
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), I2cError> {
        for &byte in bytes {
            self.engine.shift_out(byte);
            if !self.engine.get_ack() {
                self.engine.stop();
                return Err(I2cError::NackData);
            }
        }
        Ok(())
    }

    fn read_bytes(&mut self, buffer: &mut [u8], more_follow: bool) {
        let len = buffer.len();
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = self.engine.shift_in();
            if more_follow || i + 1 < len {
                self.engine.send_ack();
            } else {
                self.engine.send_nack();
            }
        }
    }
}

fn direction_of(operation: &Operation<'_>) -> Direction {
    match operation {
        Operation::Read(_) => Direction::Read,
        Operation::Write(_) => Direction::Write,
    }
}

impl<E> ErrorType for SoftI2c<E> {
    type Error = I2cError;
}

impl<E: Protocol> i2c::I2c<SevenBitAddress> for SoftI2c<E> {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut current: Option<Direction> = None;

        for index in 0..operations.len() {
            if matches!(&operations[index], Operation::Read(buf) if buf.is_empty()) {
                continue;
            }

            let direction = direction_of(&operations[index]);
            if current != Some(direction) {
                if current.is_some() {
                    self.engine.repeated_start();
                }
                self.address(address, direction)?;
                current = Some(direction);
            }

            // Bytes still to be read in this run must be ACKed
            let more_follow = operations[index + 1..]
                .iter()
                .take_while(|op| matches!(op, Operation::Read(_)))
                .any(|op| matches!(op, Operation::Read(buf) if !buf.is_empty()));

            match &mut operations[index] {
                Operation::Write(bytes) => self.write_bytes(bytes)?,
                Operation::Read(buffer) => self.read_bytes(buffer, more_follow),
            }
        }

        if current.is_some() {
            self.engine.stop();
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "I2C transaction at {=u8:#x}: {} operations",
            address,
            operations.len()
        );

        Ok(())
    }
}

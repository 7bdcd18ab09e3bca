//! Software I2C bus
//!
//! [`SoftWire`] owns one bit engine and one set of staging buffers, so
//! exactly one transaction can be in flight per bus. Two ways in:
//!
//! - the staging API (`begin_transaction` / `stage` / `commit_write`,
//!   `request_read` / `consume`) for byte-at-a-time callers
//! - the [`I2cBus`] trait, which works directly on caller slices

use heapless::Vec;
use softwire_hal::{BusyWait, I2cBus, LineDriver, Pacing};

use crate::config::{BusConfig, BusSpeed, StretchPolicy, DEFAULT_BUFFER_SIZE};
use crate::engine::BitEngine;
use crate::error::Error;
use crate::message::{Message, MessageBuffer};
use crate::transfer::Protocol;

/// Lowest non-reserved 7-bit address
pub const FIRST_SCAN_ADDRESS: u8 = 0x08;

/// Highest non-reserved 7-bit address
pub const LAST_SCAN_ADDRESS: u8 = 0x77;

/// Number of addresses probed by [`SoftWire::scan`]
pub const SCAN_CAPACITY: usize = (LAST_SCAN_ADDRESS - FIRST_SCAN_ADDRESS + 1) as usize;

/// Bit-banged I2C master bus
pub struct SoftWire<L, P = BusyWait, const N: usize = DEFAULT_BUFFER_SIZE> {
    engine: BitEngine<L, P>,
    buffer: MessageBuffer<N>,
    transferred: usize,
    last_status: Result<(), Error>,
}

impl<L: LineDriver> SoftWire<L> {
    /// Create a bus paced by [`BusyWait`] with default buffers
    pub fn with_busy_wait(lines: L, config: BusConfig) -> Self {
        Self::new(lines, BusyWait, config)
    }
}

impl<L: LineDriver, P: Pacing, const N: usize> SoftWire<L, P, N> {
    /// Create a new bus
    ///
    /// Nothing is driven until [`initialize`](Self::initialize).
    pub fn new(lines: L, pacing: P, config: BusConfig) -> Self {
        Self {
            engine: BitEngine::new(lines, pacing, config),
            buffer: MessageBuffer::new(),
            transferred: 0,
            last_status: Ok(()),
        }
    }

    /// Claim both lines, drive them high and reset all buffer state
    pub fn initialize(&mut self) {
        self.buffer.reset();
        self.transferred = 0;
        self.last_status = Ok(());
        self.engine.claim();
        #[cfg(feature = "defmt")]
        defmt::debug!("softwire bus up, {} speed", self.engine.speed());
    }

    /// Release both lines
    pub fn shutdown(&mut self) {
        self.engine.release();
        #[cfg(feature = "defmt")]
        defmt::debug!("softwire bus released");
    }

    /// Switch to another speed preset
    pub fn set_speed(&mut self, speed: BusSpeed) {
        self.engine.set_speed(speed);
    }

    /// Select a speed preset from a frequency in Hz
    ///
    /// 400 kHz selects fast mode; anything else selects standard mode.
    pub fn set_clock(&mut self, frequency_hz: u32) {
        self.set_speed(BusSpeed::from_frequency(frequency_hz));
    }

    pub fn speed(&self) -> BusSpeed {
        self.engine.speed()
    }

    pub fn set_stretch_policy(&mut self, stretch: StretchPolicy) {
        self.engine.set_stretch_policy(stretch);
    }

    /// Start staging a write to `address`
    pub fn begin_transaction(&mut self, address: u8) {
        self.buffer.begin_transaction(address);
    }

    /// Stage one byte for the pending write
    ///
    /// A full buffer drops the byte and marks the write as overflowed.
    pub fn stage(&mut self, byte: u8) -> bool {
        self.buffer.stage(byte)
    }

    /// Stage several bytes, returning how many fit
    pub fn stage_bytes(&mut self, bytes: &[u8]) -> usize {
        self.buffer.stage_bytes(bytes)
    }

    /// Check if the pending write has dropped bytes
    pub fn is_overflowed(&self) -> bool {
        self.buffer.is_overflowed()
    }

    /// Send the staged bytes and finish with STOP
    pub fn commit_write(&mut self) -> Result<(), Error> {
        self.commit_write_with(true)
    }

    /// Send the staged bytes
    ///
    /// With `send_stop` false the bus is kept with a repeated START for a
    /// follow-up transaction. An overflowed write is refused without any
    /// bus activity and stays staged until the next `begin_transaction`;
    /// otherwise the staging area is cleared whatever the outcome.
    pub fn commit_write_with(&mut self, send_stop: bool) -> Result<(), Error> {
        if self.buffer.is_overflowed() {
            self.transferred = 0;
            self.last_status = Err(Error::LengthExceeded);
            return Err(Error::LengthExceeded);
        }

        let mut message = self.buffer.write_message();
        let result = self.engine.process(&mut message, send_stop);
        self.transferred = message.transferred();
        self.buffer.clear_tx();
        self.last_status = result;
        result
    }

    /// Read up to `count` bytes from `address`, finishing with STOP
    ///
    /// Returns the number of bytes available for [`consume`](Self::consume).
    pub fn request_read(&mut self, address: u8, count: usize) -> usize {
        self.request_read_with(address, count, true)
    }

    /// Read up to `count` bytes from `address`
    ///
    /// `count` is clamped to the free receive space. Whatever was actually
    /// received is appended to the bytes already available, even when the
    /// transaction fails. If nothing fits, the bus is left alone.
    pub fn request_read_with(&mut self, address: u8, count: usize, send_stop: bool) -> usize {
        let mut message = self.buffer.read_message(address, count);
        if message.requested_length() == 0 {
            self.transferred = 0;
            self.last_status = Ok(());
            return self.buffer.available();
        }

        let result = self.engine.process(&mut message, send_stop);
        let transferred = message.transferred();
        self.buffer.complete_read(transferred);
        self.transferred = transferred;
        self.last_status = result;
        self.buffer.available()
    }

    /// Number of received bytes not yet consumed
    pub fn available(&self) -> usize {
        self.buffer.available()
    }

    /// Take the next received byte, or 0 when drained
    pub fn consume(&mut self) -> u8 {
        self.buffer.consume()
    }

    /// Bytes moved by the last transaction
    pub fn transferred(&self) -> usize {
        self.transferred
    }

    /// Outcome of the last transaction
    pub fn last_status(&self) -> Result<(), Error> {
        self.last_status
    }

    /// Probe every non-reserved address with an empty write
    ///
    /// Returns the addresses that acknowledged, in ascending order.
    pub fn scan(&mut self) -> Vec<u8, SCAN_CAPACITY> {
        let mut found = Vec::new();
        for address in FIRST_SCAN_ADDRESS..=LAST_SCAN_ADDRESS {
            let mut probe = Message::write(address, &[]);
            if self.engine.process(&mut probe, true).is_ok() {
                // Capacity covers the whole scan range
                found.push(address).ok();
            }
        }
        found
    }

    /// Get access to the bit engine
    pub fn engine(&self) -> &BitEngine<L, P> {
        &self.engine
    }

    /// Get mutable access to the bit engine
    pub fn engine_mut(&mut self) -> &mut BitEngine<L, P> {
        &mut self.engine
    }

    /// Get access to the underlying line driver
    pub fn lines(&self) -> &L {
        self.engine.lines()
    }

    /// Get mutable access to the underlying line driver
    pub fn lines_mut(&mut self) -> &mut L {
        self.engine.lines_mut()
    }

    /// Release the line driver and pacing strategy
    pub fn into_parts(self) -> (L, P) {
        self.engine.into_parts()
    }

    fn run(&mut self, message: &mut Message<'_>, send_stop: bool) -> Result<(), Error> {
        let result = self.engine.process(message, send_stop);
        self.transferred = message.transferred();
        self.last_status = result;
        result
    }
}

impl<L: LineDriver, P: Pacing, const N: usize> I2cBus for SoftWire<L, P, N> {
    type Error = Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut message = Message::write(address, data);
        self.run(&mut message, true)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }
        let mut message = Message::read(address, buf);
        self.run(&mut message, true)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut message = Message::write(address, write_data);
        // Hold the bus for the read phase
        self.run(&mut message, read_buf.is_empty())?;
        self.read(address, read_buf)
    }
}

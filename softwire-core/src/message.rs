//! Transaction descriptor and staging buffers
//!
//! [`Message`] describes one bus transaction: who, which way, and the
//! bytes involved. [`MessageBuffer`] is the per-bus staging area that
//! accumulates bytes for the next write and holds bytes received by reads
//! until the application consumes them.

use heapless::Vec;

use crate::config::DEFAULT_BUFFER_SIZE;

/// Transfer direction, as encoded in the R/W bit of the address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Write,
    Read,
}

impl Direction {
    /// R/W bit value
    pub fn rw_bit(self) -> u8 {
        match self {
            Direction::Write => 0,
            Direction::Read => 1,
        }
    }
}

/// Bytes moved by a transaction
#[derive(Debug)]
pub enum Payload<'a> {
    /// Bytes to send
    Write(&'a [u8]),
    /// Destination for received bytes
    Read(&'a mut [u8]),
}

/// Transaction descriptor
///
/// The requested length is the payload length. The transferred count is
/// only moved forward by the transaction processor and never exceeds the
/// requested length.
#[derive(Debug)]
pub struct Message<'a> {
    address: u8,
    payload: Payload<'a>,
    transferred: usize,
}

impl<'a> Message<'a> {
    /// Describe a write of `data` to the device at `address`
    pub fn write(address: u8, data: &'a [u8]) -> Self {
        Self {
            address,
            payload: Payload::Write(data),
            transferred: 0,
        }
    }

    /// Describe a read filling `buf` from the device at `address`
    pub fn read(address: u8, buf: &'a mut [u8]) -> Self {
        Self {
            address,
            payload: Payload::Read(buf),
            transferred: 0,
        }
    }

    /// 7-bit target address
    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn direction(&self) -> Direction {
        match self.payload {
            Payload::Write(_) => Direction::Write,
            Payload::Read(_) => Direction::Read,
        }
    }

    /// Address byte as sent on the wire: address in the upper seven bits,
    /// R/W in bit 0. Only the low seven bits of the address are used.
    pub fn address_byte(&self) -> u8 {
        ((self.address & 0x7F) << 1) | self.direction().rw_bit()
    }

    pub fn payload(&self) -> &Payload<'a> {
        &self.payload
    }

    /// Number of bytes to move
    pub fn requested_length(&self) -> usize {
        match &self.payload {
            Payload::Write(data) => data.len(),
            Payload::Read(buf) => buf.len(),
        }
    }

    /// Number of bytes actually moved so far
    pub fn transferred(&self) -> usize {
        self.transferred
    }

    /// Bytes still to move
    pub fn remaining(&self) -> usize {
        self.requested_length() - self.transferred
    }

    /// Start over at zero bytes transferred
    pub fn reset_transferred(&mut self) {
        self.transferred = 0;
    }

    /// Next byte a write still has to send
    pub fn next_outgoing(&self) -> Option<u8> {
        match &self.payload {
            Payload::Write(data) => data.get(self.transferred).copied(),
            Payload::Read(_) => None,
        }
    }

    /// Count the last outgoing byte as acknowledged
    pub fn record_transfer(&mut self) {
        if self.transferred < self.requested_length() {
            self.transferred += 1;
        }
    }

    /// Store a received byte and count it
    ///
    /// Ignored once the read buffer is full, or for write messages.
    pub fn push_incoming(&mut self, byte: u8) {
        if let Payload::Read(buf) = &mut self.payload {
            if let Some(slot) = buf.get_mut(self.transferred) {
                *slot = byte;
                self.transferred += 1;
            }
        }
    }
}

/// Per-bus staging buffers
///
/// `N` is the capacity of both the transmit and the receive side.
#[derive(Debug, Clone)]
pub struct MessageBuffer<const N: usize = DEFAULT_BUFFER_SIZE> {
    address: u8,
    tx: Vec<u8, N>,
    tx_overflow: bool,
    rx: [u8; N],
    rx_index: usize,
    rx_len: usize,
}

impl<const N: usize> Default for MessageBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MessageBuffer<N> {
    /// Create empty buffers
    pub const fn new() -> Self {
        Self {
            address: 0,
            tx: Vec::new(),
            tx_overflow: false,
            rx: [0; N],
            rx_index: 0,
            rx_len: 0,
        }
    }

    /// Buffer capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Reset all indices and flags
    pub fn reset(&mut self) {
        self.tx.clear();
        self.tx_overflow = false;
        self.rx_index = 0;
        self.rx_len = 0;
    }

    /// Start staging a write to `address`
    ///
    /// Anything staged before is discarded.
    pub fn begin_transaction(&mut self, address: u8) {
        self.address = address;
        self.clear_tx();
    }

    /// Target of the staged write
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Append a byte to the staged write
    ///
    /// When the buffer is full the byte is dropped and the overflow flag
    /// is set; the pending write will then refuse to go out. Returns
    /// whether the byte was stored.
    pub fn stage(&mut self, byte: u8) -> bool {
        if self.tx.push(byte).is_err() {
            if !self.tx_overflow {
                #[cfg(feature = "defmt")]
                defmt::warn!("transmit buffer full ({} bytes), dropping", N);
            }
            self.tx_overflow = true;
            return false;
        }
        true
    }

    /// Append several bytes, returning how many were stored
    pub fn stage_bytes(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().filter(|&&byte| self.stage(byte)).count()
    }

    /// Bytes staged for the next write
    pub fn staged(&self) -> &[u8] {
        &self.tx
    }

    /// Check if staging has dropped bytes since the last reset
    pub fn is_overflowed(&self) -> bool {
        self.tx_overflow
    }

    /// Descriptor for writing the staged bytes
    pub fn write_message(&self) -> Message<'_> {
        Message::write(self.address, &self.tx)
    }

    /// Drop the staged bytes and clear the overflow flag
    pub fn clear_tx(&mut self) {
        self.tx.clear();
        self.tx_overflow = false;
    }

    /// Free space on the receive side
    pub fn rx_remaining(&self) -> usize {
        N - self.rx_len
    }

    /// Descriptor for reading up to `count` bytes into the free part of
    /// the receive buffer. `count` is clamped to the space left.
    pub fn read_message(&mut self, address: u8, count: usize) -> Message<'_> {
        let count = count.min(self.rx_remaining());
        let start = self.rx_len;
        Message::read(address, &mut self.rx[start..start + count])
    }

    /// Make `transferred` freshly read bytes available for consumption
    pub fn complete_read(&mut self, transferred: usize) {
        self.rx_len = (self.rx_len + transferred).min(N);
    }

    /// Number of received bytes not yet consumed
    pub fn available(&self) -> usize {
        self.rx_len - self.rx_index
    }

    /// Take the next received byte
    ///
    /// Returns 0 when nothing is left. The buffer is treated as drained,
    /// and both cursor and length reset, as soon as the last byte is
    /// taken or an empty buffer is read.
    pub fn consume(&mut self) -> u8 {
        if self.rx_index >= self.rx_len {
            self.rx_index = 0;
            self.rx_len = 0;
            return 0;
        }

        let byte = self.rx[self.rx_index];
        self.rx_index += 1;
        if self.rx_index == self.rx_len {
            self.rx_index = 0;
            self.rx_len = 0;
        }
        byte
    }
}

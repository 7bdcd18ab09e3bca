//! Slice-based bus access
//!
//! [`I2cBus`] moves whole caller buffers in one transaction each, with no
//! intermediate staging. Every method returns only after the bus has been
//! handed back: STOP on completion or on any NACK, or a repeated START
//! between the phases of [`I2cBus::write_read`].

/// One master talking to 7-bit addressed devices
pub trait I2cBus {
    type Error;

    /// Address `address` for writing and send `data`, then STOP
    ///
    /// An empty `data` still sends the address byte, so this doubles as a
    /// presence check.
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Address `address` for reading and fill `buf`, then STOP
    ///
    /// Every byte but the last is ACKed; the last is NACKed so the device
    /// lets go of SDA. An empty `buf` does not touch the bus.
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Send `write_data`, then read into `read_buf` without releasing the bus
    ///
    /// The write phase ends with a repeated START instead of STOP, so no
    /// other master can slip in before the read address goes out. A NACK
    /// during the write phase ends with STOP and skips the read.
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// Requested bus clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };
}

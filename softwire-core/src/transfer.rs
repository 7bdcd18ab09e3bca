//! Transaction processing
//!
//! [`Protocol`] is the capability interface every bus variant provides:
//! the eight electrical primitives plus [`Protocol::process`], which
//! composes them into one complete transaction. The bit-banged
//! [`BitEngine`](crate::engine::BitEngine) relies on the provided
//! `process`; a peripheral-backed variant would override it.
//!
//! # Transaction flow
//!
//! ```text
//!   Idle ──process()──▶ Addressing ──NACK──▶ Terminating (STOP)
//!                           │                     ▲
//!                          ACK                    │
//!                           ▼                     │
//!                      Transferring ──data NACK───┤
//!                           │                     │
//!                        all bytes ───────────────┘ (STOP or repeated START)
//! ```
//!
//! Every path that issued a START leaves the bus driven: either STOP
//! (both lines high) or a repeated START (clock high, data low). Skipping
//! the STOP after an address NACK would leave SCL low and swallow the first
//! clock pulse of the next transaction.

use crate::error::Error;
use crate::message::{Direction, Message};

/// I2C master primitives and transaction processing
pub trait Protocol {
    /// START condition: SDA falls, then SCL falls
    fn start(&mut self);

    /// STOP condition: SDA low, SCL released, SDA released
    fn stop(&mut self);

    /// Repeated START: both lines released, then SDA falls while SCL is high.
    /// The bus stays owned by this master.
    fn repeated_start(&mut self);

    /// Clock the ACK slot and return `true` if the slave pulled SDA low
    fn get_ack(&mut self) -> bool;

    /// Acknowledge a received byte
    fn send_ack(&mut self);

    /// Refuse a received byte, telling the slave to stop transmitting
    fn send_nack(&mut self);

    /// Clock in one byte, MSB first
    fn shift_in(&mut self) -> u8;

    /// Clock out one byte, MSB first
    fn shift_out(&mut self, byte: u8);

    /// Run one complete transaction
    ///
    /// Sends START and the address byte, then moves the message payload in
    /// the message's direction. On success the bus is left with a STOP if
    /// `send_stop` is set, or a repeated START otherwise.
    ///
    /// The message's transferred count is reset first and reflects the
    /// bytes actually moved when this returns, including on
    /// [`Error::NackOnData`].
    fn process(&mut self, message: &mut Message<'_>, send_stop: bool) -> Result<(), Error> {
        message.reset_transferred();

        self.start();
        self.shift_out(message.address_byte());
        if !self.get_ack() {
            self.stop();
            #[cfg(feature = "defmt")]
            defmt::debug!("address {=u8:#x} not acknowledged", message.address());
            return Err(Error::NackOnAddress);
        }

        match message.direction() {
            Direction::Read => {
                while message.remaining() > 0 {
                    let byte = self.shift_in();
                    message.push_incoming(byte);
                    if message.remaining() > 0 {
                        self.send_ack();
                    } else {
                        // NACK the final byte so the slave releases SDA
                        self.send_nack();
                    }
                }
            }
            Direction::Write => {
                while let Some(byte) = message.next_outgoing() {
                    self.shift_out(byte);
                    if !self.get_ack() {
                        self.stop();
                        #[cfg(feature = "defmt")]
                        defmt::debug!(
                            "address {=u8:#x}: data NACK after {} bytes",
                            message.address(),
                            message.transferred()
                        );
                        return Err(Error::NackOnData);
                    }
                    message.record_transfer();
                }
            }
        }

        if send_stop {
            self.stop();
        } else {
            self.repeated_start();
        }

        Ok(())
    }
}

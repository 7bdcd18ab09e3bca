//! Bit-banged I2C master
//!
//! This crate contains the board-agnostic protocol logic for driving an
//! I2C bus from two plain GPIO lines:
//!
//! - Bit engine producing START/STOP/ACK/byte transitions ([`engine`])
//! - Transaction processing over any protocol variant ([`transfer`])
//! - Transaction descriptor and staging buffers ([`message`])
//! - The bus object tying them together ([`bus`])
//! - Speed presets and clock stretching policy ([`config`])
//!
//! Pins and timing come in through the `softwire-hal` traits.
//!
//! # Example
//!
//! ```ignore
//! let mut bus = SoftWire::new(lines, BusyWait, BusConfig::FAST);
//! bus.initialize();
//!
//! bus.begin_transaction(0x3C);
//! bus.stage_bytes(&[0x00, 0xAF]);
//! bus.commit_write()?;
//!
//! let available = bus.request_read(0x48, 2);
//! let msb = bus.consume();
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod config;
pub mod engine;
pub mod error;
pub mod message;
pub mod transfer;

#[cfg(test)]
mod sim;

pub use bus::SoftWire;
pub use config::{BusConfig, BusSpeed, StretchPolicy, DEFAULT_BUFFER_SIZE};
pub use engine::BitEngine;
pub use error::{status_code, Error};
pub use message::{Direction, Message, MessageBuffer, Payload};
pub use transfer::Protocol;

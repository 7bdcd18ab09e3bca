//! embedded-hal adapters
//!
//! This crate connects the softwire traits to the `embedded-hal` 1.0
//! ecosystem in both directions:
//!
//! - Open-drain GPIO pins as a [`LineDriver`](softwire_hal::LineDriver)
//! - Any `DelayNs` timer as a [`Pacing`](softwire_hal::Pacing) strategy
//! - Any [`Protocol`](softwire_core::Protocol) as an `embedded_hal::i2c::I2c`
//!   bus, so existing device drivers run on bit-banged pins

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod delay;
pub mod i2c;
pub mod lines;

pub use delay::DelayPacing;
pub use i2c::{I2cError, SoftI2c};
pub use lines::OpenDrainLines;

//! Softwire Hardware Abstraction Layer
//!
//! This crate defines the traits the bit-banged I2C master consumes from
//! the platform. Chip-specific code (or the `softwire-drivers` adapters
//! for `embedded-hal` pins) implements them; the protocol logic in
//! `softwire-core` only ever talks to these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application / device drivers           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  softwire-core (engine, transfers)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  softwire-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │ simulated bus │
//! │   adapters    │       │   (tests)     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`line::LineDriver`] - Open-drain clock and data lines
//! - [`pacing::Pacing`] - Delay inserted before every line change
//! - [`i2c::I2cBus`] - I2C master operations

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod line;
pub mod pacing;

// Re-export key traits at crate root for convenience
pub use i2c::{I2cBus, I2cConfig};
pub use line::{Level, Line, LineDriver};
pub use pacing::{BusyWait, Pacing};

//! Bus configuration types

use softwire_hal::I2cConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default capacity of the transmit and receive staging buffers
pub const DEFAULT_BUFFER_SIZE: usize = 32;

/// Pacing ticks per transition in standard mode.
/// Roughly 90 kHz on a 72 MHz Cortex-M3 with busy-wait pacing.
pub const STANDARD_TICKS: u8 = 3;

/// Pacing ticks per transition in fast mode.
/// Roughly 240 kHz on a 72 MHz Cortex-M3 with busy-wait pacing.
pub const FAST_TICKS: u8 = 1;

/// Bus speed preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BusSpeed {
    /// Nominal 100 kHz
    #[default]
    Standard,
    /// Nominal 400 kHz
    Fast,
}

impl BusSpeed {
    /// Pacing ticks inserted before every line change
    pub fn ticks(self) -> u8 {
        match self {
            BusSpeed::Standard => STANDARD_TICKS,
            BusSpeed::Fast => FAST_TICKS,
        }
    }

    /// Select a preset from a requested clock frequency
    ///
    /// Only 400 kHz selects fast mode; every other value falls back to
    /// standard mode.
    pub fn from_frequency(frequency_hz: u32) -> Self {
        match frequency_hz {
            400_000 => BusSpeed::Fast,
            _ => BusSpeed::Standard,
        }
    }

    /// Nominal frequency of the preset in Hz
    pub fn nominal_frequency(self) -> u32 {
        match self {
            BusSpeed::Standard => I2cConfig::STANDARD.frequency,
            BusSpeed::Fast => I2cConfig::FAST.frequency,
        }
    }
}

impl From<I2cConfig> for BusSpeed {
    fn from(config: I2cConfig) -> Self {
        Self::from_frequency(config.frequency)
    }
}

/// What to do while a slave holds the clock low
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StretchPolicy {
    /// Wait for as long as the slave holds the clock
    #[default]
    Unbounded,
    /// Poll the clock at most `max_polls` times, then carry on regardless
    Bounded { max_polls: u32 },
}

/// Bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// Speed preset
    pub speed: BusSpeed,
    /// Clock stretching behaviour
    pub stretch: StretchPolicy,
}

impl BusConfig {
    /// Standard mode, unbounded clock stretching
    pub const STANDARD: Self = Self {
        speed: BusSpeed::Standard,
        stretch: StretchPolicy::Unbounded,
    };

    /// Fast mode, unbounded clock stretching
    pub const FAST: Self = Self {
        speed: BusSpeed::Fast,
        stretch: StretchPolicy::Unbounded,
    };
}

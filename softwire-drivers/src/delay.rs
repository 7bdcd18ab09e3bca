//! Timer-backed pacing
//!
//! Busy-wait pacing makes the bus frequency a function of the CPU clock.
//! [`DelayPacing`] turns each tick into a fixed wall-clock duration
//! instead, using any `embedded_hal::delay::DelayNs` provider.

use embedded_hal::delay::DelayNs;
use softwire_hal::Pacing;

/// Default tick length in nanoseconds
///
/// Standard mode (3 ticks) then spends about 9 µs per bit, fast mode
/// (1 tick) about 3 µs.
pub const DEFAULT_TICK_NS: u32 = 1_000;

/// Pacing strategy backed by a `DelayNs` timer
pub struct DelayPacing<D> {
    delay: D,
    tick_ns: u32,
}

impl<D: DelayNs> DelayPacing<D> {
    /// Create pacing with the default tick length
    pub fn new(delay: D) -> Self {
        Self::with_tick_ns(delay, DEFAULT_TICK_NS)
    }

    /// Create pacing with a custom tick length
    pub fn with_tick_ns(delay: D, tick_ns: u32) -> Self {
        Self { delay, tick_ns }
    }

    pub fn tick_ns(&self) -> u32 {
        self.tick_ns
    }

    /// Give the timer back
    pub fn free(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> Pacing for DelayPacing<D> {
    fn delay(&mut self, ticks: u8) {
        if ticks == 0 {
            return;
        }
        self.delay
            .delay_ns(self.tick_ns.saturating_mul(u32::from(ticks)));
    }
}

//! Pacing between line transitions
//!
//! The bit engine calls [`Pacing::delay`] before every level change. The
//! tick is abstract: what one tick means is up to the implementation, so
//! the same speed presets work on a slow AVR and a fast Cortex-M with
//! different pacing strategies.

/// Delay strategy used to pace line transitions
pub trait Pacing {
    /// Block for approximately `ticks` units
    fn delay(&mut self, ticks: u8);
}

/// Spin-loop pacing, one loop iteration per tick
///
/// The resulting bus frequency depends entirely on the CPU clock. Supply a
/// timer-backed strategy for precise timing.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusyWait;

impl Pacing for BusyWait {
    #[inline]
    fn delay(&mut self, ticks: u8) {
        for _ in 0..ticks {
            core::hint::spin_loop();
        }
    }
}

/// Closures can be used directly as a pacing strategy
impl<F: FnMut(u8)> Pacing for F {
    fn delay(&mut self, ticks: u8) {
        self(ticks)
    }
}

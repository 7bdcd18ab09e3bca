//! Bit-level I2C engine
//!
//! Produces the line transitions for each bus primitive by toggling the
//! clock and data lines through a [`LineDriver`]. Low level conventions:
//!
//! - SDA and SCL idle high
//! - the pacing delay always comes *before* a level change, never after
//! - every time SCL is released the engine waits for it to read back high,
//!   so a slave may stretch the clock
//!
//! The engine has no notion of success or failure. A missing ACK is just a
//! sampled level; it is up to [`Protocol::process`] to act on it.

use softwire_hal::{Level, Line, LineDriver, Pacing};

use crate::config::{BusConfig, BusSpeed, StretchPolicy};
use crate::transfer::Protocol;

/// Software (bit-banged) implementation of [`Protocol`]
pub struct BitEngine<L, P> {
    lines: L,
    pacing: P,
    speed: BusSpeed,
    ticks: u8,
    stretch: StretchPolicy,
    stretch_timeouts: u32,
}

impl<L: LineDriver, P: Pacing> BitEngine<L, P> {
    /// Create a new engine
    ///
    /// The lines are not touched until [`claim`](Self::claim) is called.
    pub fn new(lines: L, pacing: P, config: BusConfig) -> Self {
        Self {
            lines,
            pacing,
            speed: config.speed,
            ticks: config.speed.ticks(),
            stretch: config.stretch,
            stretch_timeouts: 0,
        }
    }

    /// Switch to another speed preset
    pub fn set_speed(&mut self, speed: BusSpeed) {
        self.speed = speed;
        self.ticks = speed.ticks();
    }

    /// Current speed preset
    pub fn speed(&self) -> BusSpeed {
        self.speed
    }

    /// Pacing ticks inserted before every line change
    pub fn ticks(&self) -> u8 {
        self.ticks
    }

    /// Change the clock stretching behaviour
    pub fn set_stretch_policy(&mut self, stretch: StretchPolicy) {
        self.stretch = stretch;
    }

    /// Number of times a bounded clock-stretch wait gave up
    pub fn stretch_timeouts(&self) -> u32 {
        self.stretch_timeouts
    }

    /// Get access to the underlying line driver
    pub fn lines(&self) -> &L {
        &self.lines
    }

    /// Get mutable access to the underlying line driver
    pub fn lines_mut(&mut self) -> &mut L {
        &mut self.lines
    }

    /// Release the line driver and pacing strategy
    pub fn into_parts(self) -> (L, P) {
        (self.lines, self.pacing)
    }

    /// Claim both lines and drive the bus to idle (both high)
    pub fn claim(&mut self) {
        self.lines.claim();
        self.set_scl(Level::High);
        self.set_sda(Level::High);
    }

    /// Release both lines to a non-driving state
    pub fn release(&mut self) {
        self.lines.release();
    }

    fn set_scl(&mut self, level: Level) {
        self.pacing.delay(self.ticks);
        self.lines.set_line(Line::Clock, level);
        if level.is_high() {
            self.wait_for_clock();
        }
    }

    fn set_sda(&mut self, level: Level) {
        self.pacing.delay(self.ticks);
        self.lines.set_line(Line::Data, level);
    }

    fn read_sda(&mut self) -> Level {
        self.lines.read_line(Line::Data)
    }

    /// Wait for a released clock to read back high
    fn wait_for_clock(&mut self) {
        let mut polls: u32 = 0;
        while self.lines.read_line(Line::Clock).is_low() {
            polls = polls.saturating_add(1);
            if let StretchPolicy::Bounded { max_polls } = self.stretch {
                if polls >= max_polls {
                    self.stretch_timeouts = self.stretch_timeouts.saturating_add(1);
                    #[cfg(feature = "defmt")]
                    defmt::warn!("SCL still held low after {} polls, continuing", polls);
                    return;
                }
            }
            core::hint::spin_loop();
        }
    }
}

impl<L: LineDriver, P: Pacing> Protocol for BitEngine<L, P> {
    fn start(&mut self) {
        self.set_sda(Level::Low);
        self.set_scl(Level::Low);
    }

    fn stop(&mut self) {
        self.set_sda(Level::Low);
        self.set_scl(Level::High);
        self.set_sda(Level::High);
    }

    fn repeated_start(&mut self) {
        self.set_sda(Level::High);
        self.set_scl(Level::High);
        self.set_sda(Level::Low);
    }

    fn get_ack(&mut self) -> bool {
        self.set_scl(Level::Low);
        // Only the slave may pull SDA during the ACK slot
        self.set_sda(Level::High);
        self.set_scl(Level::High);
        let ack = self.read_sda().is_low();
        self.set_scl(Level::Low);
        ack
    }

    fn send_ack(&mut self) {
        self.set_sda(Level::Low);
        self.set_scl(Level::High);
        self.set_scl(Level::Low);
    }

    fn send_nack(&mut self) {
        self.set_sda(Level::High);
        self.set_scl(Level::High);
        self.set_scl(Level::Low);
    }

    fn shift_in(&mut self) -> u8 {
        let mut byte: u8 = 0;
        self.set_sda(Level::High);
        // MSB first
        for bit in (0..8).rev() {
            self.set_scl(Level::High);
            if self.read_sda().is_high() {
                byte |= 1 << bit;
            }
            self.set_scl(Level::Low);
        }
        byte
    }

    fn shift_out(&mut self, byte: u8) {
        // MSB first
        for bit in (0..8).rev() {
            self.set_sda(Level::from(byte & (1 << bit) != 0));
            self.set_scl(Level::High);
            self.set_scl(Level::Low);
        }
    }
}

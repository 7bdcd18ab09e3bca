//! Open-drain line abstractions
//!
//! An I2C bus has two lines, clock and data. Each is open-drain: the
//! master either pulls it low or releases it, and an external pull-up
//! brings a released line high. Driving `High` therefore means "release".

/// One of the two bus lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// SCL
    Clock,
    /// SDA
    Data,
}

/// Electrical level of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    #[default]
    High,
}

impl Level {
    /// Check if this is the high (released) level
    pub fn is_high(self) -> bool {
        self == Level::High
    }

    /// Check if this is the low (pulled) level
    pub fn is_low(self) -> bool {
        self == Level::Low
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level.is_high()
    }
}

/// Driver for the clock and data lines
///
/// Implementations handle the actual pin manipulation for a specific
/// chip. Both operations are idempotent. Reads return the level actually
/// present on the wire, which may differ from the driven level when a
/// slave pulls the line low (ACK, clock stretching).
pub trait LineDriver {
    /// Drive a line to the given level
    fn set_line(&mut self, line: Line, level: Level);

    /// Read back the level present on a line
    ///
    /// Takes `&mut self` because pin reads typically require mutable access.
    fn read_line(&mut self, line: Line) -> Level;

    /// Take ownership of both lines as open-drain outputs
    fn claim(&mut self) {}

    /// Return both lines to a non-driving state
    fn release(&mut self) {
        self.set_line(Line::Clock, Level::High);
        self.set_line(Line::Data, Level::High);
    }
}

//! Open-drain GPIO lines
//!
//! Both pins must already be configured as open-drain outputs with input
//! read-back (most HALs call this `into_open_drain_output`). Setting a pin
//! high releases it to the pull-up.

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use softwire_hal::{Level, Line, LineDriver};

/// Clock and data pins driven as an I2C bus
pub struct OpenDrainLines<SCL, SDA> {
    scl: SCL,
    sda: SDA,
}

impl<SCL, SDA> OpenDrainLines<SCL, SDA>
where
    SCL: OutputPin + InputPin,
    SDA: OutputPin + InputPin,
{
    pub fn new(scl: SCL, sda: SDA) -> Self {
        Self { scl, sda }
    }

    /// Give the pins back
    pub fn free(self) -> (SCL, SDA) {
        (self.scl, self.sda)
    }
}

fn drive<P: OutputPin>(pin: &mut P, level: Level) {
    pin.set_state(PinState::from(level.is_high())).ok();
}

impl<SCL, SDA> LineDriver for OpenDrainLines<SCL, SDA>
where
    SCL: OutputPin + InputPin,
    SDA: OutputPin + InputPin,
{
    fn set_line(&mut self, line: Line, level: Level) {
        match line {
            Line::Clock => drive(&mut self.scl, level),
            Line::Data => drive(&mut self.sda, level),
        }
    }

    fn read_line(&mut self, line: Line) -> Level {
        // An unreadable pin counts as released: no ACK, no stretching
        let high = match line {
            Line::Clock => self.scl.is_high().unwrap_or(true),
            Line::Data => self.sda.is_high().unwrap_or(true),
        };
        Level::from(high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{self, ErrorType};

    // Mock open-drain pin; `pulled_low` simulates another device on the wire
    struct MockPin {
        driven_high: bool,
        pulled_low: bool,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                driven_high: true,
                pulled_low: false,
            }
        }
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.driven_high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.driven_high = true;
            Ok(())
        }
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.driven_high && !self.pulled_low)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }

    // Pin whose reads always fail
    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = digital::ErrorKind;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(digital::ErrorKind::Other)
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(digital::ErrorKind::Other)
        }
    }

    impl InputPin for BrokenPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Err(digital::ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Err(digital::ErrorKind::Other)
        }
    }

    #[test]
    fn test_set_and_read_lines() {
        let mut lines = OpenDrainLines::new(MockPin::new(), MockPin::new());
        lines.set_line(Line::Clock, Level::Low);
        assert_eq!(lines.read_line(Line::Clock), Level::Low);
        assert_eq!(lines.read_line(Line::Data), Level::High);

        lines.set_line(Line::Data, Level::Low);
        lines.set_line(Line::Clock, Level::High);
        assert_eq!(lines.read_line(Line::Clock), Level::High);
        assert_eq!(lines.read_line(Line::Data), Level::Low);
    }

    #[test]
    fn test_read_sees_other_device() {
        let mut lines = OpenDrainLines::new(MockPin::new(), MockPin::new());
        lines.set_line(Line::Data, Level::High);

        let (scl, mut sda) = lines.free();
        sda.pulled_low = true;
        let mut lines = OpenDrainLines::new(scl, sda);
        assert_eq!(lines.read_line(Line::Data), Level::Low);
    }

    #[test]
    fn test_release_lets_lines_float_high() {
        let mut lines = OpenDrainLines::new(MockPin::new(), MockPin::new());
        lines.set_line(Line::Clock, Level::Low);
        lines.set_line(Line::Data, Level::Low);
        lines.release();
        assert_eq!(lines.read_line(Line::Clock), Level::High);
        assert_eq!(lines.read_line(Line::Data), Level::High);
    }

    #[test]
    fn test_unreadable_pin_reads_high() {
        let mut lines = OpenDrainLines::new(BrokenPin, BrokenPin);
        lines.set_line(Line::Clock, Level::Low);
        assert_eq!(lines.read_line(Line::Clock), Level::High);
        assert_eq!(lines.read_line(Line::Data), Level::High);
    }

    #[test]
    fn test_pins_with_different_error_types() {
        let mut lines = OpenDrainLines::new(MockPin::new(), BrokenPin);
        lines.set_line(Line::Clock, Level::Low);
        lines.set_line(Line::Data, Level::Low);
        assert_eq!(lines.read_line(Line::Clock), Level::Low);
        assert_eq!(lines.read_line(Line::Data), Level::High);
    }
}

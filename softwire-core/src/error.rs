//! Transaction errors
//!
//! None of these are fatal and none are retried automatically. Every
//! error that occurs after a START has already returned the bus to idle
//! (STOP) before it reaches the caller.

use core::fmt;

/// Errors that can occur during a bus transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// More bytes were staged than the transmit buffer holds.
    /// Detected before any bus activity.
    LengthExceeded,
    /// No device acknowledged the address byte
    NackOnAddress,
    /// The device stopped acknowledging part way through a write
    NackOnData,
}

impl Error {
    /// Two-wire status code for this error
    ///
    /// `0` is reserved for success, see [`status_code`].
    pub fn code(self) -> u8 {
        match self {
            Error::LengthExceeded => 1,
            Error::NackOnAddress => 2,
            Error::NackOnData => 3,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LengthExceeded => f.write_str("transmit buffer length exceeded"),
            Error::NackOnAddress => f.write_str("address not acknowledged"),
            Error::NackOnData => f.write_str("data not acknowledged"),
        }
    }
}

/// Collapse a transaction result into a two-wire status code
pub fn status_code(result: Result<(), Error>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => e.code(),
    }
}

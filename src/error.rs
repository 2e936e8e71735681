//! Error types for the SX127x driver.

use core::fmt;

use crate::settings::{Setting, SettingError};

/// The main error type for the SX127x driver.
///
/// `SPI` is the error type of the bus, `PIN` the shared error type of the
/// reset and interrupt lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SPI, PIN> {
    /// A bus transaction failed.
    Spi(SPI),
    /// Driving or sampling a GPIO failed.
    Pin(PIN),
    /// No setting is registered under the given name.
    UnknownSetting,
    /// The value is outside the legal domain of the setting.
    InvalidValue(Setting),
    /// TX_DONE was not observed within the configured TX timeout.
    Timeout,
    /// The version register did not read back as expected after reset.
    VersionMismatch(u8),
    /// The payload does not fit in the FIFO.
    PayloadTooLarge(usize),
    /// The radio is already borrowed by the current execution context.
    Busy,
}

impl<SPI, PIN> From<SettingError> for Error<SPI, PIN> {
    fn from(err: SettingError) -> Self {
        match err {
            SettingError::Unknown => Error::UnknownSetting,
            SettingError::InvalidValue(setting) => Error::InvalidValue(setting),
        }
    }
}

impl<SPI: fmt::Debug, PIN: fmt::Debug> fmt::Display for Error<SPI, PIN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi(err) => write!(f, "bus error: {err:?}"),
            Self::Pin(err) => write!(f, "pin error: {err:?}"),
            Self::UnknownSetting => f.write_str("unknown setting"),
            Self::InvalidValue(setting) => write!(f, "invalid value for {}", setting.name()),
            Self::Timeout => f.write_str("timed out waiting for TX_DONE"),
            Self::VersionMismatch(version) => {
                write!(f, "unexpected silicon version 0x{version:02X}")
            }
            Self::PayloadTooLarge(len) => write!(f, "payload of {len} bytes does not fit"),
            Self::Busy => f.write_str("radio is busy"),
        }
    }
}

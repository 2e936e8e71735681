//! Register definitions for the SX127x radio in LoRa mode
//! Generated from the SX1276/77/78/79 datasheet, rev. 7
//!
//! [`Register`] is the raw address map. The registers that the TX/RX
//! sequencing touches directly are also available as typed registers for
//! use with [`Radio::read_register`](crate::Radio::read_register) and
//! [`Radio::write_register`](crate::Radio::write_register).

mod fifo;
mod irq;
mod packet;
mod system;

pub use fifo::*;
pub use irq::*;
pub use packet::*;
pub use system::*;

/// LoRa mode register address map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// FIFO read/write access
    Fifo = 0x00,
    /// Operating mode and LoRa/FSK selection
    OpMode = 0x01,
    /// RF carrier frequency, MSB
    FrfMsb = 0x06,
    /// RF carrier frequency, intermediate byte
    FrfMid = 0x07,
    /// RF carrier frequency, LSB
    FrfLsb = 0x08,
    /// PA selection and output power control
    PaConfig = 0x09,
    /// Low phase noise PLL and PA ramp time
    PaRamp = 0x0A,
    /// Over current protection
    Ocp = 0x0B,
    /// LNA settings
    Lna = 0x0C,
    /// FIFO SPI pointer
    FifoAddrPtr = 0x0D,
    /// Start TX data
    FifoTxBaseAddr = 0x0E,
    /// Start RX data
    FifoRxBaseAddr = 0x0F,
    /// Start address of the last packet received
    FifoRxCurrentAddr = 0x10,
    /// Optional IRQ flag mask
    IrqFlagsMask = 0x11,
    /// IRQ flags
    IrqFlags = 0x12,
    /// Number of received bytes
    RxNbBytes = 0x13,
    /// Estimation of last packet SNR
    PktSnrValue = 0x19,
    /// RSSI of last packet
    PktRssiValue = 0x1A,
    /// Current RSSI
    RssiValue = 0x1B,
    /// Modem PHY config 1
    ModemConfig1 = 0x1D,
    /// Modem PHY config 2
    ModemConfig2 = 0x1E,
    /// Size of preamble, MSB
    PreambleMsb = 0x20,
    /// Size of preamble, LSB
    PreambleLsb = 0x21,
    /// LoRa payload length
    PayloadLength = 0x22,
    /// Modem PHY config 3
    ModemConfig3 = 0x26,
    /// LoRa detection optimize for SF6
    DetectOptimize = 0x31,
    /// LoRa detection threshold for SF6
    DetectionThreshold = 0x37,
    /// LoRa sync word
    SyncWord = 0x39,
    /// Mapping of pins DIO0 to DIO3
    DioMapping1 = 0x40,
    /// Semtech ID relating the silicon revision
    Version = 0x42,
    /// Higher power settings of the PA
    PaDac = 0x4D,
}

impl Register {
    /// Raw register address
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

//! Last-packet quality registers
//!
//! Both registers describe the most recently received packet and are only
//! meaningful after `RX_DONE`.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister};

/// RSSI offset for the high frequency port (RFI_HF, band 1, >= 779 MHz)
pub const RSSI_OFFSET_HF: i16 = 157;

/// RSSI offset for the low frequency port (RFI_LF, bands 2 and 3)
pub const RSSI_OFFSET_LF: i16 = 164;

/// Carrier frequency at and above which the HF port offset applies
pub const HF_BAND_THRESHOLD_HZ: u32 = 779_000_000;

/// Packet RSSI register (address: 0x1A)
///
/// Raw RSSI of the last packet. The absolute value in dBm is
/// `raw - 157` on the HF port and `raw - 164` on the LF port.
#[register(0x1Au8)]
#[derive(Debug, Clone, Copy, ReadableRegister)]
pub struct PacketRssi {
    /// Uncorrected RSSI
    pub raw: u8,
}

impl PacketRssi {
    /// Corrects the raw value for the band `frequency_hz` lies in.
    pub fn dbm(self, frequency_hz: u32) -> i16 {
        let offset = if frequency_hz >= HF_BAND_THRESHOLD_HZ {
            RSSI_OFFSET_HF
        } else {
            RSSI_OFFSET_LF
        };
        self.raw as i16 - offset
    }
}

/// Packet SNR register (address: 0x19)
///
/// Two's complement estimate of the last packet SNR, in quarter dB.
#[register(0x19u8)]
#[derive(Debug, Clone, Copy, ReadableRegister)]
pub struct PacketSnr {
    /// SNR in units of 0.25 dB
    pub quarter_db: i8,
}

impl PacketSnr {
    /// SNR rounded towards zero, in dB
    pub fn db(self) -> i8 {
        self.quarter_db / 4
    }
}

impl FromByteArray for PacketRssi {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { raw: bytes[0] })
    }
}

impl FromByteArray for PacketSnr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            quarter_db: bytes[0] as i8,
        })
    }
}

//! Driver and modem configuration.

use crate::settings::{Bandwidth, CodingRate, LnaGain};

/// Bus timing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Delay after every register transaction before the next one is issued.
    ///
    /// Slower targets need roughly 1 ms for a write to be reflected in
    /// subsequent reads. `None` disables the delay.
    pub settle_delay_us: Option<u32>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            settle_delay_us: Some(1_000),
        }
    }
}

/// Transmit completion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxConfig {
    /// Interval between IRQ flag polls while waiting for TX_DONE.
    pub poll_interval_ms: u32,
    /// Give up waiting for TX_DONE after this long.
    pub timeout_ms: u32,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
            timeout_ms: 5_000,
        }
    }
}

/// Driver configuration, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    /// Bus timing policy.
    pub bus: BusConfig,
    /// Transmit completion policy.
    pub tx: TxConfig,
}

/// LoRa modem parameters applied by [`Radio::configure`](crate::Radio::configure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioConfig {
    /// The RF carrier frequency in Hz (e.g., `868_100_000` for 868.1 MHz).
    pub frequency_hz: u32,
    /// Signal bandwidth.
    pub bandwidth: Bandwidth,
    /// Forward error correction rate.
    pub coding_rate: CodingRate,
    /// Spreading factor, 6 to 12.
    pub spreading_factor: u8,
    /// Use implicit (fixed length, headerless) packets.
    pub implicit_header: bool,
    /// Generate and check the payload CRC.
    pub crc: bool,
    /// LoRa sync word. `0x34` is reserved for LoRaWAN networks.
    pub sync_word: u8,
    /// Preamble length in symbols, excluding the fixed 4.25 symbols.
    pub preamble_length: u16,
    /// LNA gain step.
    pub lna_gain: LnaGain,
    /// Boost the LNA current on the HF port.
    pub lna_boost_hf: bool,
    /// Over current protection trim in mA, `None` to disable protection.
    pub ocp_trim_ma: Option<u32>,
    /// Route the PA to the PA_BOOST pin instead of RFO.
    pub pa_boost: bool,
    /// Output power field, 0 to 15.
    pub output_power: u8,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 434_000_000,
            bandwidth: Bandwidth::Bw125kHz,
            coding_rate: CodingRate::Cr4_8,
            spreading_factor: 7,
            implicit_header: false,
            crc: false,
            sync_word: 0x12,
            preamble_length: 6,
            lna_gain: LnaGain::G1,
            lna_boost_hf: false,
            ocp_trim_ma: Some(200),
            pa_boost: true,
            output_power: 15,
        }
    }
}

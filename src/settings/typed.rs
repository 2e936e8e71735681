//! Typed views of the symbolic settings used by the driver itself
//!
//! Each enum mirrors a symbol table in the descriptor table; `symbol()`
//! yields the entry that [`SettingDescriptor::encode`](super::SettingDescriptor::encode)
//! accepts.

/// Operating mode (`RegOpMode` bits 2:0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Sleep, the only mode in which LoRa/FSK can be switched
    Sleep = 0,
    /// Standby, crystal oscillator running
    Standby = 1,
    /// Frequency synthesis TX
    FsTx = 2,
    /// Transmit the FIFO contents, then return to standby
    Tx = 3,
    /// Frequency synthesis RX
    FsRx = 4,
    /// Receive continuously until told otherwise
    RxContinuous = 5,
    /// Receive one packet, then return to standby
    RxSingle = 6,
    /// Channel activity detection
    Cad = 7,
}

impl Mode {
    /// Symbol table entry for the mode
    pub const fn symbol(self) -> &'static str {
        match self {
            Mode::Sleep => "SLEEP",
            Mode::Standby => "STDBY",
            Mode::FsTx => "FSTX",
            Mode::Tx => "TX",
            Mode::FsRx => "FSRX",
            Mode::RxContinuous => "RXCONTINUOUS",
            Mode::RxSingle => "RXSINGLE",
            Mode::Cad => "CAD",
        }
    }

    /// Mode for a raw 3-bit field value; higher bits are ignored
    pub const fn from_raw(raw: u32) -> Self {
        match raw & 0b111 {
            0 => Mode::Sleep,
            1 => Mode::Standby,
            2 => Mode::FsTx,
            3 => Mode::Tx,
            4 => Mode::FsRx,
            5 => Mode::RxContinuous,
            6 => Mode::RxSingle,
            _ => Mode::Cad,
        }
    }
}

/// LoRa signal bandwidth (`RegModemConfig1` bits 7:4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bandwidth {
    Bw7_8kHz,
    Bw10_4kHz,
    Bw15_6kHz,
    Bw20_8kHz,
    Bw31_25kHz,
    Bw41_7kHz,
    Bw62_5kHz,
    Bw125kHz,
    Bw250kHz,
    Bw500kHz,
}

impl Bandwidth {
    /// Symbol table entry for the bandwidth
    pub const fn symbol(self) -> &'static str {
        match self {
            Bandwidth::Bw7_8kHz => "7.8kHz",
            Bandwidth::Bw10_4kHz => "10.4kHz",
            Bandwidth::Bw15_6kHz => "15.6kHz",
            Bandwidth::Bw20_8kHz => "20.8kHz",
            Bandwidth::Bw31_25kHz => "31.25kHz",
            Bandwidth::Bw41_7kHz => "41.7kHz",
            Bandwidth::Bw62_5kHz => "62.5kHz",
            Bandwidth::Bw125kHz => "125kHz",
            Bandwidth::Bw250kHz => "250kHz",
            Bandwidth::Bw500kHz => "500kHz",
        }
    }

    /// Bandwidth in Hz
    pub const fn hz(self) -> u32 {
        match self {
            Bandwidth::Bw7_8kHz => 7_800,
            Bandwidth::Bw10_4kHz => 10_400,
            Bandwidth::Bw15_6kHz => 15_600,
            Bandwidth::Bw20_8kHz => 20_800,
            Bandwidth::Bw31_25kHz => 31_250,
            Bandwidth::Bw41_7kHz => 41_700,
            Bandwidth::Bw62_5kHz => 62_500,
            Bandwidth::Bw125kHz => 125_000,
            Bandwidth::Bw250kHz => 250_000,
            Bandwidth::Bw500kHz => 500_000,
        }
    }
}

/// LoRa forward error correction rate (`RegModemConfig1` bits 3:1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodingRate {
    Cr4_5,
    Cr4_6,
    Cr4_7,
    Cr4_8,
}

impl CodingRate {
    /// Symbol table entry for the coding rate
    pub const fn symbol(self) -> &'static str {
        match self {
            CodingRate::Cr4_5 => "4/5",
            CodingRate::Cr4_6 => "4/6",
            CodingRate::Cr4_7 => "4/7",
            CodingRate::Cr4_8 => "4/8",
        }
    }
}

/// LNA gain step (`RegLna` bits 7:5), G1 being the highest gain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LnaGain {
    G1,
    G2,
    G3,
    G4,
    G5,
    G6,
}

impl LnaGain {
    /// Symbol table entry for the gain step
    pub const fn symbol(self) -> &'static str {
        match self {
            LnaGain::G1 => "G1",
            LnaGain::G2 => "G2",
            LnaGain::G3 => "G3",
            LnaGain::G4 => "G4",
            LnaGain::G5 => "G5",
            LnaGain::G6 => "G6",
        }
    }
}

/// Duration of one LoRa symbol in microseconds.
///
/// Returns `None` for spreading factors the modem does not support.
pub fn symbol_time_us(spreading_factor: u8, bandwidth: Bandwidth) -> Option<u32> {
    if !(6..=12).contains(&spreading_factor) {
        return None;
    }
    let chips = 1u64 << spreading_factor;
    Some((chips * 1_000_000 / u64::from(bandwidth.hz())) as u32)
}

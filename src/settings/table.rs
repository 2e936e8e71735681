//! Static descriptor table
//!
//! Field positions follow the LoRa mode register description of the
//! SX1276/77/78/79 datasheet, section 6.4.

use super::{Setting, SettingDescriptor};
use crate::registers::Register;

/// Crystal oscillator frequency
pub const FXOSC_HZ: u64 = 32_000_000;

/// Frequency synthesizer resolution, as a power of two
const FSTEP_BITS: u32 = 19;

/// Converts a carrier frequency in Hz into the 24-bit `Frf` register value.
///
/// `Frf = f * 2^19 / Fxosc`, truncated. Returns `None` if the result does not
/// fit a `u32`; the 24-bit field limit is enforced by the descriptor.
pub fn frequency_to_raw(hz: u32) -> Option<u32> {
    u32::try_from((u64::from(hz) << FSTEP_BITS) / FXOSC_HZ).ok()
}

/// Converts an `Frf` register value back into Hz, truncated.
pub fn raw_to_frequency(raw: u32) -> u32 {
    ((u64::from(raw) * FXOSC_HZ) >> FSTEP_BITS) as u32
}

const LONG_RANGE_MODE: &[Option<&str>] = &[Some("FSK/OOK"), Some("LoRa")];

const MODE: &[Option<&str>] = &[
    Some("SLEEP"),
    Some("STDBY"),
    Some("FSTX"),
    Some("TX"),
    Some("FSRX"),
    Some("RXCONTINUOUS"),
    Some("RXSINGLE"),
    Some("CAD"),
];

const PA_SELECT: &[Option<&str>] = &[Some("RFO"), Some("PA_BOOST")];

const PA_RAMP: &[Option<&str>] = &[
    Some("3.4ms"),
    Some("2ms"),
    Some("1ms"),
    Some("500us"),
    Some("250us"),
    Some("125us"),
    Some("100us"),
    Some("62us"),
    Some("50us"),
    Some("40us"),
    Some("31us"),
    Some("25us"),
    Some("20us"),
    Some("15us"),
    Some("12us"),
    Some("10us"),
];

// Imax in mA. Codes above 27 all select 240 mA on the chip.
const OCP_TRIM: &[Option<&str>] = &[
    Some("45"),
    Some("50"),
    Some("55"),
    Some("60"),
    Some("65"),
    Some("70"),
    Some("75"),
    Some("80"),
    Some("85"),
    Some("90"),
    Some("95"),
    Some("100"),
    Some("105"),
    Some("110"),
    Some("115"),
    Some("120"),
    Some("130"),
    Some("140"),
    Some("150"),
    Some("160"),
    Some("170"),
    Some("180"),
    Some("190"),
    Some("200"),
    Some("210"),
    Some("220"),
    Some("230"),
    Some("240"),
];

const LNA_GAIN: &[Option<&str>] = &[
    None,
    Some("G1"),
    Some("G2"),
    Some("G3"),
    Some("G4"),
    Some("G5"),
    Some("G6"),
    None,
];

const BANDWIDTH: &[Option<&str>] = &[
    Some("7.8kHz"),
    Some("10.4kHz"),
    Some("15.6kHz"),
    Some("20.8kHz"),
    Some("31.25kHz"),
    Some("41.7kHz"),
    Some("62.5kHz"),
    Some("125kHz"),
    Some("250kHz"),
    Some("500kHz"),
];

const CODING_RATE: &[Option<&str>] = &[None, Some("4/5"), Some("4/6"), Some("4/7"), Some("4/8")];

const PA_DAC: &[Option<&str>] = &[
    None,
    None,
    None,
    None,
    Some("default"),
    None,
    None,
    Some("+20dBm"),
];

use Register as R;
use Setting as S;
use SettingDescriptor as D;

pub(super) static DESCRIPTORS: [SettingDescriptor; Setting::COUNT] = [
    D::bits(S::LongRangeMode, R::OpMode, 7, 0b1000_0000).symbols(LONG_RANGE_MODE),
    D::bits(S::AccessSharedReg, R::OpMode, 6, 0b0100_0000),
    D::bits(S::LowFrequencyModeOn, R::OpMode, 3, 0b0000_1000),
    D::bits(S::Mode, R::OpMode, 0, 0b0000_0111).symbols(MODE),
    D::bytes(S::CarrierFrequency, R::FrfMsb, 3).transform(frequency_to_raw, raw_to_frequency),
    D::bits(S::PaSelect, R::PaConfig, 7, 0b1000_0000).symbols(PA_SELECT),
    D::bits(S::MaxPower, R::PaConfig, 4, 0b0111_0000),
    D::bits(S::OutputPower, R::PaConfig, 0, 0b0000_1111),
    D::bits(S::PaRamp, R::PaRamp, 0, 0b0000_1111).symbols(PA_RAMP),
    D::bits(S::OcpOn, R::Ocp, 5, 0b0010_0000),
    D::bits(S::OcpTrim, R::Ocp, 0, 0b0001_1111).symbols(OCP_TRIM),
    D::bits(S::LnaGain, R::Lna, 5, 0b1110_0000).symbols(LNA_GAIN),
    D::bits(S::LnaBoostLf, R::Lna, 3, 0b0001_1000),
    D::bits(S::LnaBoostHf, R::Lna, 0, 0b0000_0011),
    D::byte(S::FifoAddrPtr, R::FifoAddrPtr),
    D::byte(S::FifoTxBaseAddr, R::FifoTxBaseAddr),
    D::byte(S::FifoRxBaseAddr, R::FifoRxBaseAddr),
    D::bits(S::Bandwidth, R::ModemConfig1, 4, 0b1111_0000).symbols(BANDWIDTH),
    D::bits(S::CodingRate, R::ModemConfig1, 1, 0b0000_1110).symbols(CODING_RATE),
    D::bits(S::ImplicitHeaderModeOn, R::ModemConfig1, 0, 0b0000_0001),
    D::bits(S::SpreadingFactor, R::ModemConfig2, 4, 0b1111_0000),
    D::bits(S::TxContinuousMode, R::ModemConfig2, 3, 0b0000_1000),
    D::bits(S::RxPayloadCrcOn, R::ModemConfig2, 2, 0b0000_0100),
    D::bits(S::PaDac, R::PaDac, 0, 0b0000_0111).symbols(PA_DAC),
    D::byte(S::SyncWord, R::SyncWord),
    D::bits(S::LowDataRateOptimize, R::ModemConfig3, 3, 0b0000_1000),
    D::bytes(S::PreambleLength, R::PreambleMsb, 2),
    D::bits(S::AgcAutoOn, R::ModemConfig3, 2, 0b0000_0100),
    D::bits(S::DetectionOptimize, R::DetectOptimize, 0, 0b0000_0111),
    D::byte(S::DetectionThreshold, R::DetectionThreshold),
];

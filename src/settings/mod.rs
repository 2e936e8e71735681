//! Named register settings
//!
//! Most SX127x configuration lives in bitfields packed several to a
//! register byte. A [`Setting`] names one such field (or one multi-byte
//! value), and its [`SettingDescriptor`] records where it lives and how
//! external values map onto raw codes.
//!
//! The descriptor table is static data built at compile time; [`lookup`]
//! is the string-keyed registry over it.
//!
//! # Example
//! ```
//! use sx127x::settings::{lookup, Setting, Value};
//!
//! let descriptor = lookup("coding_rate").unwrap();
//! assert_eq!(descriptor.setting, Setting::CodingRate);
//! assert_eq!(descriptor.encode(Value::Symbol("4/8")), Ok(4));
//! assert_eq!(descriptor.decode(4), Value::Symbol("4/8"));
//! ```

mod descriptor;
mod table;
mod typed;

pub use descriptor::*;
pub use table::{frequency_to_raw, raw_to_frequency, FXOSC_HZ};
pub use typed::*;

/// Failure to resolve or encode a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingError {
    /// No setting is registered under the requested name
    Unknown,
    /// The value is not in the setting's domain
    InvalidValue(Setting),
}

/// Identifier of every setting the driver knows about
///
/// The discriminant indexes the descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Setting {
    LongRangeMode,
    AccessSharedReg,
    LowFrequencyModeOn,
    Mode,
    CarrierFrequency,
    PaSelect,
    MaxPower,
    OutputPower,
    PaRamp,
    OcpOn,
    OcpTrim,
    LnaGain,
    LnaBoostLf,
    LnaBoostHf,
    FifoAddrPtr,
    FifoTxBaseAddr,
    FifoRxBaseAddr,
    Bandwidth,
    CodingRate,
    ImplicitHeaderModeOn,
    SpreadingFactor,
    TxContinuousMode,
    RxPayloadCrcOn,
    PaDac,
    SyncWord,
    LowDataRateOptimize,
    PreambleLength,
    AgcAutoOn,
    DetectionOptimize,
    DetectionThreshold,
}

impl Setting {
    /// Number of registered settings
    pub const COUNT: usize = Self::ALL.len();

    /// Every setting, in descriptor table order
    pub const ALL: [Setting; 30] = [
        Setting::LongRangeMode,
        Setting::AccessSharedReg,
        Setting::LowFrequencyModeOn,
        Setting::Mode,
        Setting::CarrierFrequency,
        Setting::PaSelect,
        Setting::MaxPower,
        Setting::OutputPower,
        Setting::PaRamp,
        Setting::OcpOn,
        Setting::OcpTrim,
        Setting::LnaGain,
        Setting::LnaBoostLf,
        Setting::LnaBoostHf,
        Setting::FifoAddrPtr,
        Setting::FifoTxBaseAddr,
        Setting::FifoRxBaseAddr,
        Setting::Bandwidth,
        Setting::CodingRate,
        Setting::ImplicitHeaderModeOn,
        Setting::SpreadingFactor,
        Setting::TxContinuousMode,
        Setting::RxPayloadCrcOn,
        Setting::PaDac,
        Setting::SyncWord,
        Setting::LowDataRateOptimize,
        Setting::PreambleLength,
        Setting::AgcAutoOn,
        Setting::DetectionOptimize,
        Setting::DetectionThreshold,
    ];

    /// Registry name of the setting
    pub const fn name(self) -> &'static str {
        match self {
            Setting::LongRangeMode => "long_range_mode",
            Setting::AccessSharedReg => "access_shared_reg",
            Setting::LowFrequencyModeOn => "low_frequency_mode_on",
            Setting::Mode => "mode",
            Setting::CarrierFrequency => "carrier_frequency",
            Setting::PaSelect => "pa_select",
            Setting::MaxPower => "max_power",
            Setting::OutputPower => "output_power",
            Setting::PaRamp => "pa_ramp",
            Setting::OcpOn => "ocp_on",
            Setting::OcpTrim => "ocp_trim",
            Setting::LnaGain => "lna_gain",
            Setting::LnaBoostLf => "lna_boost_lf",
            Setting::LnaBoostHf => "lna_boost_hf",
            Setting::FifoAddrPtr => "fifo_addr_ptr",
            Setting::FifoTxBaseAddr => "fifo_tx_base_addr",
            Setting::FifoRxBaseAddr => "fifo_rx_base_addr",
            Setting::Bandwidth => "bandwidth",
            Setting::CodingRate => "coding_rate",
            Setting::ImplicitHeaderModeOn => "implicit_header_mode_on",
            Setting::SpreadingFactor => "spreading_factor",
            Setting::TxContinuousMode => "tx_continuous_mode",
            Setting::RxPayloadCrcOn => "rx_payload_crc_on",
            Setting::PaDac => "pa_dac",
            Setting::SyncWord => "sync_word",
            Setting::LowDataRateOptimize => "low_data_rate_optimize",
            Setting::PreambleLength => "preamble_length",
            Setting::AgcAutoOn => "agc_auto_on",
            Setting::DetectionOptimize => "detection_optimize",
            Setting::DetectionThreshold => "detection_threshold",
        }
    }

    /// Field layout and codec of the setting
    pub fn descriptor(self) -> &'static SettingDescriptor {
        &table::DESCRIPTORS[self as usize]
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl core::str::FromStr for Setting {
    type Err = SettingError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Setting::ALL
            .into_iter()
            .find(|setting| setting.name() == name)
            .ok_or(SettingError::Unknown)
    }
}

impl core::fmt::Display for Setting {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves a setting by its registry name.
///
/// # Errors
/// * `SettingError::Unknown` - no setting is registered under `name`
pub fn lookup(name: &str) -> Result<&'static SettingDescriptor, SettingError> {
    name.parse::<Setting>().map(Setting::descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_setting() {
        for setting in Setting::ALL {
            assert_eq!(setting.descriptor().setting, setting);
        }
    }

    #[test]
    fn names_are_unique_and_resolve() {
        for setting in Setting::ALL {
            assert_eq!(lookup(setting.name()).unwrap().setting, setting);
            let duplicates = Setting::ALL
                .iter()
                .filter(|other| other.name() == setting.name())
                .count();
            assert_eq!(duplicates, 1, "{setting} registered twice");
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(lookup("carrier_freq").unwrap_err(), SettingError::Unknown);
        assert_eq!(lookup("").unwrap_err(), SettingError::Unknown);
        assert_eq!(lookup("Mode").unwrap_err(), SettingError::Unknown);
    }

    #[test]
    fn field_layouts_are_well_formed() {
        for setting in Setting::ALL {
            let d = setting.descriptor();
            assert_ne!(d.mask, 0, "{setting} has an empty mask");
            assert!(d.shift < 8, "{setting} shift out of range");
            assert_eq!(d.mask.trailing_zeros() as u8, d.shift, "{setting} mask/shift disagree");
            let field = d.mask >> d.shift;
            assert_eq!(field & field.wrapping_add(1), 0, "{setting} mask not contiguous");
            assert!(d.width >= 1);
            if d.width > 1 {
                assert_eq!(d.mask, 0xFF, "{setting} spans bytes but shares a register");
            }
        }
    }

    #[test]
    fn bitfields_sharing_a_register_do_not_overlap() {
        for a in Setting::ALL {
            for b in Setting::ALL {
                let (da, db) = (a.descriptor(), b.descriptor());
                if a != b && da.register == db.register && da.width == 1 && db.width == 1 {
                    assert_eq!(da.mask & db.mask, 0, "{a} overlaps {b}");
                }
            }
        }
    }
}

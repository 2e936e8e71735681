//! Silicon identification

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister};

/// Version reported by every SX1276/77/78/79 production part
pub const EXPECTED_VERSION: u8 = 0x12;

/// Version register (address: 0x42)
///
/// Bits 7:4 hold the full revision number, bits 3:0 the metal mask
/// revision. The register is only meaningful after the reset sequence has
/// completed, which makes it a convenient check that the reset took effect.
#[register(0x42u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct Version {
    /// Raw version byte
    pub value: u8,
}

impl Version {
    /// Full revision number
    pub fn revision(self) -> u8 {
        self.value >> 4
    }

    /// Metal mask revision number
    pub fn metal_mask(self) -> u8 {
        self.value & 0x0F
    }
}

impl FromByteArray for Version {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

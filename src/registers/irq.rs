//! Interrupt flag register
//!
//! The SX127x latches each interrupt cause into its own bit of `RegIrqFlags`
//! (0x12). Bits stay set until the host writes a 1 to them; writing 0 leaves
//! a bit untouched, so any subset of causes can be cleared without racing
//! against causes that fire in the meantime.

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

bitflags! {
    /// LoRa interrupt causes
    ///
    /// Reading the flags never clears them. Use
    /// [`Radio::clear_irqs`](crate::Radio::clear_irqs) to acknowledge.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqFlags: u8 {
        /// Valid LoRa signal detected during CAD
        const CAD_DETECTED = 1 << 0;
        /// FHSS change channel interrupt
        const FHSS_CHANGE_CHANNEL = 1 << 1;
        /// CAD complete
        const CAD_DONE = 1 << 2;
        /// FIFO payload transmission complete
        const TX_DONE = 1 << 3;
        /// Valid header received in RX
        const VALID_HEADER = 1 << 4;
        /// Payload CRC error
        const PAYLOAD_CRC_ERROR = 1 << 5;
        /// Packet reception complete
        const RX_DONE = 1 << 6;
        /// Timeout in RX single mode
        const RX_TIMEOUT = 1 << 7;
    }
}

/// IRQ flags register (address: 0x12)
///
/// Write-1-to-clear. Writing an `IrqFlagsRegister` clears exactly the flags
/// it contains.
#[register(0x12u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
pub struct IrqFlagsRegister {
    /// Latched interrupt causes
    pub flags: IrqFlags,
}

impl FromByteArray for IrqFlagsRegister {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: IrqFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for IrqFlagsRegister {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

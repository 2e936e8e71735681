//! FIFO pointer and length registers
//!
//! The SX127x has a single 256 byte packet buffer shared by TX and RX.
//! All host access goes through `RegFifo` (0x00) at the position held in
//! `RegFifoAddrPtr`, which the chip increments after every byte.
//!
//! # Usage
//! - TX: point `FifoAddrPtr` at `FifoTxBaseAddr`, write the payload, set
//!   `PayloadLength`
//! - RX: point `FifoAddrPtr` at `FifoRxCurrentAddr`, read `RxNbBytes` bytes

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// FIFO SPI pointer register (address: 0x0D)
#[register(0x0Du8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct FifoAddrPtr {
    /// Buffer position of the next FIFO access
    pub value: u8,
}

/// FIFO TX base address register (address: 0x0E)
///
/// Default: 0x80
#[register(0x0Eu8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
pub struct FifoTxBaseAddr {
    /// Buffer position where the TX payload starts
    pub value: u8,
}

/// FIFO RX current address register (address: 0x10)
///
/// Start address in the buffer of the last packet received. Read only.
#[register(0x10u8)]
#[derive(Debug, Clone, Copy, ReadableRegister)]
pub struct FifoRxCurrentAddr {
    /// Buffer position of the last received packet
    pub value: u8,
}

/// Received byte count register (address: 0x13)
///
/// Number of payload bytes of the last packet received. Read only.
#[register(0x13u8)]
#[derive(Debug, Clone, Copy, ReadableRegister)]
pub struct RxNbBytes {
    /// Payload length
    pub value: u8,
}

/// Payload length register (address: 0x22)
///
/// Number of bytes to transmit. In implicit header mode this is also the
/// expected RX length. A value of 0 is not permitted.
#[register(0x22u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
pub struct PayloadLength {
    /// Payload length in bytes
    pub value: u8,
}

impl Default for FifoTxBaseAddr {
    fn default() -> Self {
        Self { value: 0x80 }
    }
}

impl Default for PayloadLength {
    fn default() -> Self {
        Self { value: 0x01 }
    }
}

impl FromByteArray for FifoAddrPtr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for FifoAddrPtr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for FifoTxBaseAddr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for FifoTxBaseAddr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for FifoRxCurrentAddr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl FromByteArray for RxNbBytes {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl FromByteArray for PayloadLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for PayloadLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

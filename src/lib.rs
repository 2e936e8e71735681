#![cfg_attr(not(test), no_std)]
//! SX127x Radio Driver
//!
//! This crate provides a type-safe interface for the Semtech SX1276/7/8/9
//! long range transceivers operated in LoRa mode. The chip is driven over a
//! 4-wire SPI bus with a reset line and the DIO0 interrupt line, through the
//! `embedded-hal` 1.0 traits.
//!
//! # Features
//! - Frequency range: 137-1020 MHz (SX1276), band dependent on the variant
//! - LoRa modulation: SF6-12, BW 7.8-500 kHz
//! - Settings addressed by name or by [`Setting`], with symbolic values
//!   validated against the datasheet tables
//! - Blocking transmit with a bounded wait for TX_DONE
//! - Interrupt-driven receive through [`SharedRadio`]
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`bus`]: Register transaction framing over an `SpiDevice`
//! - [`settings`]: The setting registry: bitfield positions, codecs and
//!   symbol tables
//! - [`registers`]: Register address map and typed registers for the
//!   FIFO, IRQ and packet status registers
//! - [`device`]: Main device interface: settings access, reset, IRQ
//!   handling, TX and RX sequencing
//! - [`shared`]: Access to the radio from both foreground and interrupt
//!   context
//!
//! # Usage
//! Bring-up follows a fixed sequence:
//!
//! 1. Create a [`Radio`] with the SPI device, the reset and DIO0 pins and a
//!    delay source. This pulses reset and verifies the silicon version.
//! 2. Apply a [`RadioConfig`] with [`Radio::configure`], or write
//!    individual settings with [`Radio::set`].
//! 3. Wrap it in a [`SharedRadio`], arm the receive handler and route the
//!    platform's DIO0 edge interrupt to [`SharedRadio::on_rising_edge`].
//! 4. Enter [`Mode::RxContinuous`] to listen, and call [`Radio::send`]
//!    through [`SharedRadio::lock`] to transmit.
//!
//! # Important Notes
//! - LoRa mode can only be selected from SLEEP
//! - Writes to bitfields are read-modify-write and not atomic on the chip
//! - The RSSI correction depends on the carrier frequency last written
//!   through the driver; 434 MHz is assumed until one is
//!
//! # Example
//! ```no_run
//! use sx127x::{Config, Error, Mode, Radio, SharedRadio, Setting};
//! # use core::convert::Infallible;
//! # use embedded_hal::spi::SpiDevice;
//! # type E<SPI> = Error<<SPI as embedded_hal::spi::ErrorType>::Error, Infallible>;
//!
//! fn bring_up<SPI, RESET, DIO0, D>(
//!     spi: SPI,
//!     reset: RESET,
//!     dio0: DIO0,
//!     delay: D,
//! ) -> Result<SharedRadio<SPI, RESET, DIO0, D>, E<SPI>>
//! where
//!     SPI: SpiDevice,
//!     RESET: embedded_hal::digital::OutputPin<Error = Infallible>,
//!     DIO0: sx127x::EdgeInterrupt + embedded_hal::digital::InputPin<Error = Infallible>,
//!     D: embedded_hal::delay::DelayNs,
//! {
//!     let mut radio = Radio::new(spi, reset, dio0, delay, Config::default())?;
//!     radio.set(Setting::CarrierFrequency, 868_100_000u32)?;
//!     radio.set_by_name("coding_rate", "4/5")?;
//!     radio.set_mode(Mode::RxContinuous)?;
//!
//!     let shared = SharedRadio::new(radio);
//!     shared.arm(|packet| {
//!         if let Ok(packet) = packet {
//!             log::info!("{} bytes at {} dBm", packet.payload.len(), packet.rssi);
//!         }
//!     })?;
//!     Ok(shared)
//! }
//! ```

pub mod bus;
pub mod config;
pub mod device;
pub mod error;
pub mod registers;
pub mod settings;
pub mod shared;

#[cfg(test)]
mod mock;

pub use config::{BusConfig, Config, RadioConfig, TxConfig};
pub use device::{EdgeInterrupt, Packet, Radio};
pub use error::Error;
pub use registers::IrqFlags;
pub use settings::{Bandwidth, CodingRate, LnaGain, Mode, Setting, SettingError, Value};
pub use shared::{RxHandler, SharedRadio};

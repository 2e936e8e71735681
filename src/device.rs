//! SX127x Radio Device Interface
//!
//! This module provides the protocol layer of the driver: settings access
//! with read-modify-write of shared registers, the reset sequence, IRQ flag
//! handling, and the TX and RX sequences.
//!
//! The interface is built around the `Radio<SPI, RESET, DIO0, D>` struct
//! which exclusively owns the SPI device, the reset line, the DIO0 interrupt
//! line and a delay source for its whole lifetime. Every method takes
//! `&mut self`, so foreground use is serialized by the borrow checker. To
//! share the radio with an interrupt context see
//! [`SharedRadio`](crate::SharedRadio).
//!
//! # Example
//! ```no_run
//! use sx127x::{Config, Mode, Radio, RadioConfig};
//! # fn run<SPI, RESET, DIO0, D>(spi: SPI, reset: RESET, dio0: DIO0, delay: D)
//! # where
//! #     SPI: embedded_hal::spi::SpiDevice,
//! #     RESET: embedded_hal::digital::OutputPin<Error = core::convert::Infallible>,
//! #     DIO0: sx127x::EdgeInterrupt + embedded_hal::digital::InputPin<Error = core::convert::Infallible>,
//! #     D: embedded_hal::delay::DelayNs,
//! # {
//!
//! let mut radio = Radio::new(spi, reset, dio0, delay, Config::default()).unwrap();
//! radio.configure(&RadioConfig::default()).unwrap();
//!
//! // Blocks until TX_DONE or the TX timeout
//! radio.send(b"hello").unwrap();
//!
//! radio.set_mode(Mode::RxContinuous).unwrap();
//! # }
//! ```

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use heapless::Vec;
use regiface::{ByteArray, ReadableRegister, WritableRegister};

use crate::bus::RegisterBus;
use crate::config::{Config, RadioConfig, TxConfig};
use crate::error::Error;
use crate::registers::{
    FifoAddrPtr, FifoRxCurrentAddr, FifoTxBaseAddr, IrqFlags, IrqFlagsRegister, PacketRssi,
    PacketSnr, PayloadLength, Register, RxNbBytes, Version, EXPECTED_VERSION,
};
use crate::settings::{
    raw_to_frequency, symbol_time_us, Mode, Setting, SettingDescriptor, SettingError, Value,
};

/// Size of the chip's packet buffer
pub const FIFO_SIZE: usize = 256;

/// Largest payload that fits `RegPayloadLength`
pub const MAX_PAYLOAD: usize = 255;

/// Carrier frequency the chip comes out of reset with
pub const DEFAULT_FREQUENCY_HZ: u32 = 434_000_000;

/// Symbol duration above which low data rate optimization is mandatory
const LDRO_SYMBOL_TIME_US: u32 = 16_000;

/// An interrupt input that can report rising edges.
///
/// Implemented by the platform binding for the pin wired to DIO0. Enabling
/// the edge must make the platform call
/// [`SharedRadio::on_rising_edge`](crate::SharedRadio::on_rising_edge) from
/// its notification context on every subsequent rising edge.
pub trait EdgeInterrupt: InputPin {
    /// Starts delivering rising-edge notifications for this pin.
    fn enable_rising_edge(&mut self) -> Result<(), Self::Error>;
}

/// A received packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Payload bytes, exactly as many as the chip reported
    pub payload: Vec<u8, FIFO_SIZE>,
    /// Packet RSSI in dBm, corrected for the configured band
    pub rssi: i16,
}

/// Main device interface for the SX127x radio.
pub struct Radio<SPI, RESET, DIO0, D> {
    bus: RegisterBus<SPI, D>,
    reset: RESET,
    dio0: DIO0,
    tx: TxConfig,
    cache: [Option<u32>; Setting::COUNT],
}

impl<SPI, RESET, DIO0, D> Radio<SPI, RESET, DIO0, D> {
    /// Releases the SPI device, reset line, interrupt line and delay source.
    pub fn release(self) -> (SPI, RESET, DIO0, D) {
        let (spi, delay) = self.bus.release();
        (spi, self.reset, self.dio0, delay)
    }

    /// Raw value most recently written to `setting` through this driver,
    /// if any since the last reset.
    pub fn cached(&self, setting: Setting) -> Option<u32> {
        self.cache[setting.index()]
    }

    /// Carrier frequency last configured through this driver, or the
    /// power-on default if none was.
    pub fn carrier_frequency_hz(&self) -> u32 {
        self.cached(Setting::CarrierFrequency)
            .map(raw_to_frequency)
            .unwrap_or(DEFAULT_FREQUENCY_HZ)
    }

    /// Corrects a raw packet RSSI value for the configured band.
    pub fn adjust_rssi(&self, raw: u8) -> i16 {
        PacketRssi { raw }.dbm(self.carrier_frequency_hz())
    }
}

impl<SPI, RESET, DIO0, D, PINERR> Radio<SPI, RESET, DIO0, D>
where
    SPI: SpiDevice,
    RESET: OutputPin<Error = PINERR>,
    DIO0: EdgeInterrupt + InputPin<Error = PINERR>,
    D: DelayNs,
{
    /// Creates a new driver, resets the chip, checks its version and puts
    /// it in LoRa standby.
    ///
    /// # Errors
    /// * `Error::Spi` / `Error::Pin` - the reset sequence or version read failed
    /// * `Error::VersionMismatch` - the chip did not come out of reset
    ///   reporting an SX1276/77/78/79 version
    pub fn new(
        spi: SPI,
        reset: RESET,
        dio0: DIO0,
        delay: D,
        config: Config,
    ) -> Result<Self, Error<SPI::Error, PINERR>> {
        let mut radio = Self {
            bus: RegisterBus::new(spi, delay, config.bus),
            reset,
            dio0,
            tx: config.tx,
            cache: [None; Setting::COUNT],
        };

        radio.reset()?;

        let version = radio.version()?;
        if version.value != EXPECTED_VERSION {
            log::warn!(
                "sx127x::new unexpected version 0x{:02X}, reset did not take effect?",
                version.value
            );
            return Err(Error::VersionMismatch(version.value));
        }
        log::debug!(
            "sx127x::new revision {} mask {}",
            version.revision(),
            version.metal_mask()
        );

        radio.enter_lora_standby()?;
        Ok(radio)
    }

    /// Switches the modem to LoRa, points both FIFO base addresses at the
    /// start of the buffer and leaves the chip in standby.
    pub fn enter_lora_standby(&mut self) -> Result<(), Error<SPI::Error, PINERR>> {
        // LongRangeMode is only writable in sleep.
        self.set_mode(Mode::Sleep)?;
        self.set(Setting::LongRangeMode, "LoRa")?;
        self.set(Setting::FifoTxBaseAddr, 0u8)?;
        self.set(Setting::FifoRxBaseAddr, 0u8)?;
        self.set_mode(Mode::Standby)
    }

    /// Pulses the reset line: low for 1 ms, then high and 5 ms for the chip
    /// to come up. Register contents are undefined until this completes.
    ///
    /// Clears the settings cache, since every register returns to its
    /// power-on value.
    pub fn reset(&mut self) -> Result<(), Error<SPI::Error, PINERR>> {
        log::trace!("sx127x::reset");
        self.reset.set_low().map_err(Error::Pin)?;
        self.bus.delay().delay_ms(1);
        self.reset.set_high().map_err(Error::Pin)?;
        self.bus.delay().delay_ms(5);
        self.cache = [None; Setting::COUNT];
        Ok(())
    }

    /// Reads the silicon version register.
    pub fn version(&mut self) -> Result<Version, Error<SPI::Error, PINERR>> {
        self.read_register()
    }

    /// Reads a typed register from the device.
    ///
    /// # Type Parameters
    /// * `R` - Register type implementing ReadableRegister with u8 ID
    ///
    /// # Errors
    /// * `Error::Spi` - SPI communication failed
    pub fn read_register<R>(&mut self) -> Result<R, Error<SPI::Error, PINERR>>
    where
        R: ReadableRegister<IdType = u8, Error = Infallible>,
    {
        let mut raw_value = R::Array::new();
        self.bus
            .read_block(R::id(), raw_value.as_mut())
            .map_err(Error::Spi)?;

        match R::from_bytes(raw_value) {
            Ok(register) => Ok(register),
            Err(never) => match never {},
        }
    }

    /// Writes a typed register to the device.
    ///
    /// # Errors
    /// * `Error::Spi` - SPI communication failed
    pub fn write_register<R>(&mut self, register: R) -> Result<(), Error<SPI::Error, PINERR>>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let raw_value = match register.to_bytes() {
            Ok(raw_value) => raw_value,
            Err(never) => match never {},
        };

        self.bus
            .write_block(R::id(), raw_value.as_ref())
            .map_err(Error::Spi)
    }

    /// Reads a setting and decodes it.
    pub fn get(&mut self, setting: Setting) -> Result<Value<'static>, Error<SPI::Error, PINERR>> {
        let descriptor = setting.descriptor();
        let raw = self.read_field(descriptor)?;
        Ok(descriptor.decode(raw))
    }

    /// Encodes a value and writes it to a setting.
    ///
    /// Bitfields sharing a register are updated by read-modify-write, which
    /// is two transactions; the other fields of the register are preserved.
    ///
    /// # Errors
    /// * `Error::InvalidValue` - the value is not in the setting's domain;
    ///   nothing is written
    /// * `Error::Spi` - SPI communication failed
    pub fn set<'a>(
        &mut self,
        setting: Setting,
        value: impl Into<Value<'a>>,
    ) -> Result<(), Error<SPI::Error, PINERR>> {
        let descriptor = setting.descriptor();
        let raw = descriptor.encode(value.into())?;
        self.cache[setting.index()] = Some(raw);
        self.write_field(descriptor, raw)
    }

    /// Reads a setting by registry name.
    ///
    /// # Errors
    /// * `Error::UnknownSetting` - no setting is registered under `name`
    pub fn get_by_name(&mut self, name: &str) -> Result<Value<'static>, Error<SPI::Error, PINERR>> {
        let setting: Setting = name.parse()?;
        self.get(setting)
    }

    /// Writes a setting by registry name.
    ///
    /// # Errors
    /// * `Error::UnknownSetting` - no setting is registered under `name`
    /// * `Error::InvalidValue` - the value is not in the setting's domain
    pub fn set_by_name<'a>(
        &mut self,
        name: &str,
        value: impl Into<Value<'a>>,
    ) -> Result<(), Error<SPI::Error, PINERR>> {
        let setting: Setting = name.parse()?;
        self.set(setting, value)
    }

    /// Reads every registered setting, in table order.
    pub fn snapshot<F>(&mut self, mut f: F) -> Result<(), Error<SPI::Error, PINERR>>
    where
        F: FnMut(Setting, Value<'static>),
    {
        for setting in Setting::ALL {
            let value = self.get(setting)?;
            f(setting, value);
        }
        Ok(())
    }

    fn read_field(&mut self, descriptor: &SettingDescriptor) -> Result<u32, Error<SPI::Error, PINERR>> {
        let address = descriptor.register.addr();

        if descriptor.width > 1 {
            let mut buf = [0u8; 4];
            let bytes = &mut buf[4 - usize::from(descriptor.width)..];
            self.bus.read_block(address, bytes).map_err(Error::Spi)?;
            return Ok(bytes.iter().fold(0, |acc, b| acc << 8 | u32::from(*b)));
        }

        let value = self.bus.read_register(address).map_err(Error::Spi)?;
        Ok(u32::from((value & descriptor.mask) >> descriptor.shift))
    }

    fn write_field(
        &mut self,
        descriptor: &SettingDescriptor,
        raw: u32,
    ) -> Result<(), Error<SPI::Error, PINERR>> {
        let address = descriptor.register.addr();

        if descriptor.is_partial() {
            let current = self.bus.read_register(address).map_err(Error::Spi)?;
            let field = ((raw as u8) << descriptor.shift) & descriptor.mask;
            self.bus
                .write_register(address, (current & !descriptor.mask) | field)
                .map_err(Error::Spi)
        } else if descriptor.width == 1 {
            self.bus
                .write_register(address, raw as u8)
                .map_err(Error::Spi)
        } else {
            let bytes = raw.to_be_bytes();
            self.bus
                .write_block(address, &bytes[4 - usize::from(descriptor.width)..])
                .map_err(Error::Spi)
        }
    }

    /// Reads the current operating mode.
    pub fn mode(&mut self) -> Result<Mode, Error<SPI::Error, PINERR>> {
        let raw = self.read_field(Setting::Mode.descriptor())?;
        Ok(Mode::from_raw(raw))
    }

    /// Switches the operating mode.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<SPI::Error, PINERR>> {
        log::debug!("sx127x::set_mode {:?}", mode);
        self.set(Setting::Mode, mode.symbol())
    }

    /// Reads the latched interrupt causes. Does not clear them.
    pub fn irq_flags(&mut self) -> Result<IrqFlags, Error<SPI::Error, PINERR>> {
        self.read_register::<IrqFlagsRegister>()
            .map(|register| register.flags)
    }

    /// Clears exactly the interrupt causes in `flags`.
    pub fn clear_irqs(&mut self, flags: IrqFlags) -> Result<(), Error<SPI::Error, PINERR>> {
        self.write_register(IrqFlagsRegister { flags })
    }

    /// Whether a received packet is waiting in the FIFO.
    pub fn rx_ready(&mut self) -> Result<bool, Error<SPI::Error, PINERR>> {
        Ok(self.irq_flags()?.contains(IrqFlags::RX_DONE))
    }

    /// SNR of the last received packet, in dB.
    pub fn packet_snr(&mut self) -> Result<i8, Error<SPI::Error, PINERR>> {
        Ok(self.read_register::<PacketSnr>()?.db())
    }

    /// Transmits `payload` and blocks until the chip reports TX_DONE.
    ///
    /// The wait lasts at most [`TxConfig::timeout_ms`], bus settle delays
    /// included. Called through [`SharedRadio::lock`](crate::SharedRadio::lock)
    /// the whole wait runs inside a critical section.
    ///
    /// The chip is held in standby while the FIFO is loaded, switched to TX,
    /// and returned to whatever mode it was in before once the transmission
    /// finished or timed out. An empty payload is a no-op.
    ///
    /// # Errors
    /// * `Error::PayloadTooLarge` - more than [`MAX_PAYLOAD`] bytes
    /// * `Error::Timeout` - TX_DONE was not seen within the TX timeout
    /// * `Error::Spi` - SPI communication failed
    pub fn send(&mut self, payload: &[u8]) -> Result<(), Error<SPI::Error, PINERR>> {
        if payload.is_empty() {
            return Ok(());
        }
        if payload.len() > MAX_PAYLOAD {
            return Err(Error::PayloadTooLarge(payload.len()));
        }
        log::trace!("sx127x::send {} bytes", payload.len());

        let previous = self.mode()?;
        self.set_mode(Mode::Standby)?;

        let outcome = self.transmit(payload);

        // Restore even if loading or the wait failed; report the first error.
        let restored = self.set_mode(previous);
        outcome.and(restored)
    }

    fn transmit(&mut self, payload: &[u8]) -> Result<(), Error<SPI::Error, PINERR>> {
        let base = self.read_register::<FifoTxBaseAddr>()?;
        self.write_register(FifoAddrPtr { value: base.value })?;
        self.bus
            .write_block(Register::Fifo.addr(), payload)
            .map_err(Error::Spi)?;
        self.write_register(PayloadLength {
            value: payload.len() as u8,
        })?;

        // A TX_DONE latched by an earlier, timed out transmission would
        // otherwise end this wait on the first poll.
        self.clear_irqs(IrqFlags::TX_DONE)?;

        self.set_mode(Mode::Tx)?;
        self.wait_for_tx_done()
    }

    fn wait_for_tx_done(&mut self) -> Result<(), Error<SPI::Error, PINERR>> {
        let TxConfig {
            poll_interval_ms,
            timeout_ms,
        } = self.tx;
        let timeout_us = u64::from(timeout_ms) * 1_000;
        let poll_us = u64::from(poll_interval_ms.max(1)) * 1_000;
        // Every flag read is followed by the bus settle delay.
        let settle_us = u64::from(self.bus.config().settle_delay_us.unwrap_or(0));
        let mut waited_us: u64 = 0;

        loop {
            let flags = self.irq_flags()?;
            waited_us += settle_us;
            if flags.contains(IrqFlags::TX_DONE) {
                log::trace!("sx127x::send TX_DONE after ~{} us", waited_us);
                return self.clear_irqs(IrqFlags::TX_DONE);
            }
            if waited_us >= timeout_us {
                log::warn!("sx127x::send no TX_DONE after {} us", waited_us);
                return Err(Error::Timeout);
            }
            self.bus.delay().delay_ms(poll_interval_ms);
            waited_us += poll_us;
        }
    }

    /// Reads the packet the chip just received and acknowledges RX_DONE.
    ///
    /// Meant to run on the rising edge of DIO0 (mapped to RX_DONE). Other
    /// IRQ flags raised alongside, such as PAYLOAD_CRC_ERROR, are left set
    /// for the caller to inspect and clear.
    pub fn receive(&mut self) -> Result<Packet, Error<SPI::Error, PINERR>> {
        let current = self.read_register::<FifoRxCurrentAddr>()?;
        self.write_register(FifoAddrPtr {
            value: current.value,
        })?;

        let len = usize::from(self.read_register::<RxNbBytes>()?.value);
        let mut payload = Vec::new();
        payload
            .resize(len, 0)
            .map_err(|_| Error::PayloadTooLarge(len))?;
        self.bus
            .read_block(Register::Fifo.addr(), &mut payload)
            .map_err(Error::Spi)?;

        let rssi = self.read_register::<PacketRssi>()?;
        let rssi = rssi.dbm(self.carrier_frequency_hz());

        self.clear_irqs(IrqFlags::RX_DONE)?;

        log::debug!("sx127x::receive {} bytes, rssi {} dBm", len, rssi);
        Ok(Packet { payload, rssi })
    }

    /// Enables rising-edge notification on DIO0 and samples it.
    ///
    /// Returns `true` if the line is already high, in which case no edge
    /// will be reported for the pending event and the caller must handle it
    /// now.
    pub fn arm_interrupt(&mut self) -> Result<bool, Error<SPI::Error, PINERR>> {
        self.dio0.enable_rising_edge().map_err(Error::Pin)?;
        self.dio0.is_high().map_err(Error::Pin)
    }

    /// Applies a complete LoRa modem configuration.
    ///
    /// Leaves the chip in standby.
    ///
    /// # Errors
    /// * `Error::InvalidValue` - a parameter is outside its legal range;
    ///   settings applied before it stay applied
    pub fn configure(&mut self, config: &RadioConfig) -> Result<(), Error<SPI::Error, PINERR>> {
        if !(6..=12).contains(&config.spreading_factor) {
            return Err(SettingError::InvalidValue(Setting::SpreadingFactor).into());
        }
        log::debug!("sx127x::configure {} Hz", config.frequency_hz);

        self.enter_lora_standby()?;
        self.set(Setting::CarrierFrequency, config.frequency_hz)?;

        self.set(Setting::Bandwidth, config.bandwidth.symbol())?;
        self.set(Setting::CodingRate, config.coding_rate.symbol())?;
        self.set(Setting::ImplicitHeaderModeOn, config.implicit_header)?;
        self.set(Setting::SpreadingFactor, config.spreading_factor)?;
        self.set(Setting::RxPayloadCrcOn, config.crc)?;

        let ldro = symbol_time_us(config.spreading_factor, config.bandwidth)
            .is_some_and(|us| us > LDRO_SYMBOL_TIME_US);
        self.set(Setting::LowDataRateOptimize, ldro)?;
        self.set(Setting::AgcAutoOn, true)?;

        let (optimize, threshold) = match config.spreading_factor {
            6 => (0x05u8, 0x0Cu8),
            _ => (0x03, 0x0A),
        };
        self.set(Setting::DetectionOptimize, optimize)?;
        self.set(Setting::DetectionThreshold, threshold)?;

        self.set(Setting::SyncWord, config.sync_word)?;
        self.set(Setting::PreambleLength, config.preamble_length)?;

        self.set(Setting::LnaGain, config.lna_gain.symbol())?;
        self.set(
            Setting::LnaBoostHf,
            if config.lna_boost_hf { 0b11u8 } else { 0 },
        )?;

        match config.ocp_trim_ma {
            Some(ma) => {
                self.set(Setting::OcpTrim, ma)?;
                self.set(Setting::OcpOn, true)?;
            }
            None => self.set(Setting::OcpOn, false)?,
        }

        self.set(
            Setting::PaSelect,
            if config.pa_boost { "PA_BOOST" } else { "RFO" },
        )?;
        self.set(Setting::OutputPower, config.output_power)?;

        Ok(())
    }
}

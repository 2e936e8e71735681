//! SX127x register transaction framing
//!
//! Every access to the chip is a single half-duplex SPI transaction: one
//! address byte followed by the payload. The MSB of the address byte selects
//! the direction (0 = read, 1 = write). During a read the chip clocks out a
//! status byte while the address is shifted in, which is discarded, and then
//! the register contents. During a burst the address auto-increments, except
//! for `RegFifo` which reads/writes the packet buffer at `RegFifoAddrPtr`.
//!
//! After each transaction the bus waits the configured settle delay so that
//! writes are reflected before the next access.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{Operation, SpiDevice};

use crate::config::BusConfig;

const WRITE_FLAG: u8 = 0x80;

/// Framing of register transactions over an exclusively owned SPI device.
///
/// The bus takes `&mut self` for every transaction, so two transactions can
/// never be in flight at once on the same bus.
pub struct RegisterBus<SPI, D> {
    spi: SPI,
    delay: D,
    config: BusConfig,
}

impl<SPI, D> RegisterBus<SPI, D> {
    /// Creates a new bus wrapping the provided SPI device and delay source.
    pub fn new(spi: SPI, delay: D, config: BusConfig) -> Self {
        Self { spi, delay, config }
    }

    /// Releases the underlying SPI device and delay source.
    pub fn release(self) -> (SPI, D) {
        (self.spi, self.delay)
    }

    /// Bus timing policy in use.
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    pub(crate) fn delay(&mut self) -> &mut D {
        &mut self.delay
    }
}

impl<SPI, D> RegisterBus<SPI, D>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    /// Performs one framed transaction: the address byte followed by
    /// `payload` with chip select held, then the settle delay.
    ///
    /// # Errors
    /// * `SPI::Error` - the transaction failed
    pub fn transact(&mut self, address: u8, payload: Operation<'_, u8>) -> Result<(), SPI::Error> {
        let header = [address];
        let result = self
            .spi
            .transaction(&mut [Operation::Write(&header), payload]);

        if let Some(us) = self.config.settle_delay_us {
            self.delay.delay_us(us);
        }

        result
    }

    /// Reads a single register.
    pub fn read_register(&mut self, address: u8) -> Result<u8, SPI::Error> {
        let mut value = [0u8];
        self.read_block(address, &mut value)?;
        Ok(value[0])
    }

    /// Writes a single register.
    pub fn write_register(&mut self, address: u8, value: u8) -> Result<(), SPI::Error> {
        self.write_block(address, &[value])
    }

    /// Reads `bytes.len()` bytes starting at `address` in one burst.
    pub fn read_block(&mut self, address: u8, bytes: &mut [u8]) -> Result<(), SPI::Error> {
        log::trace!("sx127x::bus read 0x{:02X} x{}", address, bytes.len());
        self.transact(address & !WRITE_FLAG, Operation::Read(bytes))
    }

    /// Writes `bytes` starting at `address` in one burst.
    pub fn write_block(&mut self, address: u8, bytes: &[u8]) -> Result<(), SPI::Error> {
        log::trace!("sx127x::bus write 0x{:02X} {:02X?}", address, bytes);
        self.transact(address | WRITE_FLAG, Operation::Write(bytes))
    }
}

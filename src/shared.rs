//! Sharing the radio with the DIO0 interrupt context.
//!
//! Foreground code and the edge callback both need the bus: the former to
//! transmit and configure, the latter to drain the FIFO when a packet
//! arrives. [`SharedRadio`] keeps the [`Radio`] behind a
//! `critical_section::Mutex<RefCell<_>>`, so each of those runs as one
//! uninterrupted unit and neither can observe the other's half-finished
//! transaction sequence.

use core::cell::{Cell, RefCell};

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, SpiDevice};

use crate::device::{EdgeInterrupt, Packet, Radio};
use crate::error::Error;

/// Callback receiving the outcome of each interrupt-driven receive.
pub type RxHandler<E> = fn(Result<Packet, E>);

type SharedError<SPI, DIO0> =
    Error<<SPI as spi::ErrorType>::Error, <DIO0 as digital::ErrorType>::Error>;

/// A [`Radio`] usable from both foreground and interrupt context.
///
/// Intended to live in a `static`; every method takes `&self`. Each
/// [`lock`](SharedRadio::lock) and each edge-triggered receive runs inside
/// one critical section, with interrupts masked for its full duration.
pub struct SharedRadio<SPI, RESET, DIO0, D>
where
    SPI: spi::ErrorType,
    DIO0: digital::ErrorType,
{
    radio: Mutex<RefCell<Radio<SPI, RESET, DIO0, D>>>,
    handler: Mutex<Cell<Option<RxHandler<SharedError<SPI, DIO0>>>>>,
}

impl<SPI, RESET, DIO0, D, PINERR> SharedRadio<SPI, RESET, DIO0, D>
where
    SPI: SpiDevice,
    RESET: OutputPin<Error = PINERR>,
    DIO0: EdgeInterrupt + InputPin<Error = PINERR>,
    D: DelayNs,
    PINERR: core::fmt::Debug,
{
    /// Wraps `radio`. No handler is installed until [`arm`](Self::arm).
    pub fn new(radio: Radio<SPI, RESET, DIO0, D>) -> Self {
        Self {
            radio: Mutex::new(RefCell::new(radio)),
            handler: Mutex::new(Cell::new(None)),
        }
    }

    /// Consumes the wrapper and returns the radio.
    pub fn into_inner(self) -> Radio<SPI, RESET, DIO0, D> {
        self.radio.into_inner().into_inner()
    }

    /// Runs `f` with exclusive access to the radio inside a critical section.
    ///
    /// Interrupts stay masked until `f` returns. A [`Radio::send`] run
    /// through `lock` therefore masks them for the whole TX wait, up to
    /// [`TxConfig::timeout_ms`](crate::TxConfig::timeout_ms); keep that
    /// timeout short on targets with latency-sensitive interrupts.
    ///
    /// # Errors
    /// * `Error::Busy` - called from within another `lock` on the same radio
    /// * any error returned by `f`
    pub fn lock<T, F>(&self, f: F) -> Result<T, Error<SPI::Error, PINERR>>
    where
        F: FnOnce(&mut Radio<SPI, RESET, DIO0, D>) -> Result<T, Error<SPI::Error, PINERR>>,
    {
        critical_section::with(|cs| {
            let mut radio = self
                .radio
                .borrow(cs)
                .try_borrow_mut()
                .map_err(|_| Error::Busy)?;
            f(&mut radio)
        })
    }

    /// Installs `handler` and enables the DIO0 rising-edge interrupt.
    ///
    /// If DIO0 is already high, the edge that would have announced the
    /// pending packet has been missed, so the packet is received and handed
    /// to `handler` before this returns.
    pub fn arm(
        &self,
        handler: RxHandler<Error<SPI::Error, PINERR>>,
    ) -> Result<(), Error<SPI::Error, PINERR>> {
        critical_section::with(|cs| self.handler.borrow(cs).set(Some(handler)));

        if self.lock(|radio| radio.arm_interrupt())? {
            log::debug!("sx127x::arm DIO0 already high, delivering pending packet");
            self.on_rising_edge();
        }
        Ok(())
    }

    /// Removes the handler. Later edges are ignored.
    pub fn disarm(&self) {
        critical_section::with(|cs| self.handler.borrow(cs).set(None));
    }

    /// Entry point for the platform's DIO0 rising-edge notification.
    ///
    /// Receives the packet under the lock, then calls the handler outside
    /// the critical section.
    pub fn on_rising_edge(&self) {
        let Some(handler) = critical_section::with(|cs| self.handler.borrow(cs).get()) else {
            log::trace!("sx127x::on_rising_edge not armed");
            return;
        };

        let result = self.lock(|radio| radio.receive());
        if let Err(err) = &result {
            log::warn!("sx127x::on_rising_edge receive failed: {:?}", err);
        }
        handler(result);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;
    use crate::mock::{self, MockError, SharedChip};
    use crate::registers::{IrqFlags, Register as R};

    fn stage_packet(chip: &SharedChip, bytes: &[u8]) {
        let mut chip = chip.lock().unwrap();
        chip.regs[R::FifoRxCurrentAddr.addr() as usize] = 0x00;
        chip.regs[R::RxNbBytes.addr() as usize] = bytes.len() as u8;
        chip.regs[R::PktRssiValue.addr() as usize] = 100;
        chip.regs[R::IrqFlags.addr() as usize] |= IrqFlags::RX_DONE.bits();
        chip.fifo[..bytes.len()].copy_from_slice(bytes);
    }

    #[test]
    fn edge_delivers_packet_to_handler() {
        static RECEIVED: StdMutex<Vec<Result<Packet, MockError>>> = StdMutex::new(Vec::new());
        fn record(result: Result<Packet, MockError>) {
            RECEIVED.lock().unwrap().push(result);
        }

        let (radio, chip) = mock::radio();
        let shared = SharedRadio::new(radio);

        shared.arm(record).unwrap();
        assert!(RECEIVED.lock().unwrap().is_empty());
        assert!(chip.lock().unwrap().edge_enabled);

        stage_packet(&chip, b"abc");
        shared.on_rising_edge();

        let received = RECEIVED.lock().unwrap();
        assert_eq!(received.len(), 1);
        let packet = received[0].as_ref().unwrap();
        assert_eq!(packet.payload.as_slice(), b"abc");
        assert_eq!(packet.rssi, 100 - 164);
        drop(received);

        assert!(!shared.lock(|radio| radio.rx_ready()).unwrap());
    }

    #[test]
    fn arming_with_line_high_delivers_pending_packet() {
        static RECEIVED: StdMutex<Vec<Result<Packet, MockError>>> = StdMutex::new(Vec::new());
        fn record(result: Result<Packet, MockError>) {
            RECEIVED.lock().unwrap().push(result);
        }

        let (radio, chip) = mock::radio();
        stage_packet(&chip, &[0x42]);
        chip.lock().unwrap().dio0 = true;

        let shared = SharedRadio::new(radio);
        shared.arm(record).unwrap();

        let received = RECEIVED.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].as_ref().unwrap().payload.as_slice(), &[0x42]);
    }

    #[test]
    fn edge_without_handler_is_ignored() {
        let (radio, chip) = mock::radio();
        stage_packet(&chip, b"xyz");
        let shared = SharedRadio::new(radio);
        chip.lock().unwrap().take_frames();

        shared.on_rising_edge();

        assert!(chip.lock().unwrap().take_frames().is_empty());
        assert!(shared.lock(|radio| radio.rx_ready()).unwrap());
    }

    #[test]
    fn disarm_stops_delivery() {
        static RECEIVED: StdMutex<Vec<Result<Packet, MockError>>> = StdMutex::new(Vec::new());
        fn record(result: Result<Packet, MockError>) {
            RECEIVED.lock().unwrap().push(result);
        }

        let (radio, chip) = mock::radio();
        let shared = SharedRadio::new(radio);
        shared.arm(record).unwrap();
        shared.disarm();

        stage_packet(&chip, b"late");
        shared.on_rising_edge();

        assert!(RECEIVED.lock().unwrap().is_empty());
    }

    #[test]
    fn receive_failure_reaches_handler() {
        static RECEIVED: StdMutex<Vec<Result<Packet, MockError>>> = StdMutex::new(Vec::new());
        fn record(result: Result<Packet, MockError>) {
            RECEIVED.lock().unwrap().push(result);
        }

        let (radio, chip) = mock::radio();
        let shared = SharedRadio::new(radio);
        shared.arm(record).unwrap();

        chip.lock().unwrap().fail_bus = true;
        shared.on_rising_edge();

        let received = RECEIVED.lock().unwrap();
        assert!(matches!(received[..], [Err(Error::Spi(_))]));
    }

    #[test]
    fn nested_lock_is_busy() {
        let (radio, _chip) = mock::radio();
        let shared = SharedRadio::new(radio);

        let inner = shared.lock(|_| Ok(shared.lock(|radio| radio.mode())));

        assert_eq!(inner, Ok(Err(Error::Busy)));
    }

    #[test]
    fn send_through_lock() {
        let (radio, chip) = mock::radio();
        let shared = SharedRadio::new(radio);

        shared.lock(|radio| radio.send(b"hi")).unwrap();

        let chip = chip.lock().unwrap();
        assert_eq!(chip.regs[R::PayloadLength.addr() as usize], 2);
        drop(chip);

        let _radio = shared.into_inner();
    }
}

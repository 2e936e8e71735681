//! In-memory SX127x used by the unit tests.
//!
//! Models the register file, the FIFO behind `RegFifo` with its address
//! pointer, write-1-to-clear IRQ flags, and instant TX completion. Every
//! transaction, op-mode write and reset level is logged for inspection.

use core::convert::Infallible;
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, ErrorKind, Operation, SpiDevice};

use crate::config::Config;
use crate::device::{EdgeInterrupt, Radio};
use crate::error::Error;
use crate::registers::{IrqFlags, Register};
use crate::settings::Mode;

/// One logged SPI transaction. `address` has the direction bit stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
    Read { address: u8, len: usize },
    Write { address: u8, data: Vec<u8> },
}

pub(crate) struct Chip {
    pub regs: [u8; 0x80],
    pub fifo: [u8; 256],
    pub frames: Vec<Frame>,
    /// Mode field of every `RegOpMode` write, in order
    pub modes: Vec<u8>,
    pub reset_levels: Vec<bool>,
    pub dio0: bool,
    pub edge_enabled: bool,
    /// Raise TX_DONE as soon as TX mode is entered
    pub tx_completes: bool,
    pub fail_bus: bool,
    /// Reject write transactions to this address
    pub fail_write_to: Option<u8>,
    pub elapsed_ns: u64,
    pub first_frame_at_ns: Option<u64>,
}

impl Default for Chip {
    fn default() -> Self {
        let mut regs = [0u8; 0x80];
        for (register, value) in [
            (Register::OpMode, 0x09),
            (Register::FrfMsb, 0x6C),
            (Register::FrfMid, 0x80),
            (Register::FrfLsb, 0x00),
            (Register::PaConfig, 0x4F),
            (Register::PaRamp, 0x09),
            (Register::Ocp, 0x2B),
            (Register::Lna, 0x20),
            (Register::FifoTxBaseAddr, 0x80),
            (Register::ModemConfig1, 0x72),
            (Register::ModemConfig2, 0x70),
            (Register::PreambleLsb, 0x08),
            (Register::PayloadLength, 0x01),
            (Register::ModemConfig3, 0x04),
            (Register::DetectOptimize, 0xC3),
            (Register::DetectionThreshold, 0x0A),
            (Register::SyncWord, 0x12),
            (Register::Version, 0x12),
            (Register::PaDac, 0x84),
        ] {
            regs[register.addr() as usize] = value;
        }

        Self {
            regs,
            fifo: [0; 256],
            frames: Vec::new(),
            modes: Vec::new(),
            reset_levels: Vec::new(),
            dio0: false,
            edge_enabled: false,
            tx_completes: true,
            fail_bus: false,
            fail_write_to: None,
            elapsed_ns: 0,
            first_frame_at_ns: None,
        }
    }
}

impl Chip {
    pub fn take_frames(&mut self) -> Vec<Frame> {
        core::mem::take(&mut self.frames)
    }

    fn reg(&mut self, register: Register) -> &mut u8 {
        &mut self.regs[register.addr() as usize]
    }

    fn fifo_ptr(&mut self) -> usize {
        let ptr = *self.reg(Register::FifoAddrPtr);
        *self.reg(Register::FifoAddrPtr) = ptr.wrapping_add(1);
        usize::from(ptr)
    }

    fn read(&mut self, address: u8) -> u8 {
        if address == Register::Fifo.addr() {
            let ptr = self.fifo_ptr();
            return self.fifo[ptr];
        }
        self.regs[usize::from(address)]
    }

    fn write(&mut self, address: u8, value: u8) {
        if address == Register::Fifo.addr() {
            let ptr = self.fifo_ptr();
            self.fifo[ptr] = value;
        } else if address == Register::IrqFlags.addr() {
            *self.reg(Register::IrqFlags) &= !value;
        } else if address == Register::OpMode.addr() {
            *self.reg(Register::OpMode) = value;
            let mode = value & 0b111;
            self.modes.push(mode);
            if mode == Mode::Tx as u8 && self.tx_completes {
                *self.reg(Register::IrqFlags) |= IrqFlags::TX_DONE.bits();
            }
        } else {
            self.regs[usize::from(address)] = value;
        }
    }
}

fn next_address(address: u8) -> u8 {
    if address == Register::Fifo.addr() {
        address
    } else {
        (address + 1) & 0x7F
    }
}

pub(crate) type SharedChip = Arc<Mutex<Chip>>;

pub(crate) struct MockSpi(SharedChip);

impl spi::ErrorType for MockSpi {
    type Error = ErrorKind;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
        let mut chip = self.0.lock().unwrap();
        if chip.fail_bus {
            return Err(ErrorKind::Other);
        }
        if chip.first_frame_at_ns.is_none() {
            let now = chip.elapsed_ns;
            chip.first_frame_at_ns = Some(now);
        }

        let (header, payload) = match operations {
            [Operation::Write(header), payload] if header.len() == 1 => (header[0], payload),
            _ => return Err(ErrorKind::Other),
        };
        let mut address = header & 0x7F;

        match payload {
            Operation::Read(buf) if header & 0x80 == 0 => {
                chip.frames.push(Frame::Read {
                    address,
                    len: buf.len(),
                });
                for byte in buf.iter_mut() {
                    *byte = chip.read(address);
                    address = next_address(address);
                }
            }
            Operation::Write(_) if chip.fail_write_to == Some(address) => {
                return Err(ErrorKind::Other);
            }
            Operation::Write(data) if header & 0x80 != 0 => {
                chip.frames.push(Frame::Write {
                    address,
                    data: data.to_vec(),
                });
                for &byte in data.iter() {
                    chip.write(address, byte);
                    address = next_address(address);
                }
            }
            _ => return Err(ErrorKind::Other),
        }
        Ok(())
    }
}

pub(crate) struct MockReset(SharedChip);

impl digital::ErrorType for MockReset {
    type Error = Infallible;
}

impl OutputPin for MockReset {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.lock().unwrap().reset_levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.lock().unwrap().reset_levels.push(true);
        Ok(())
    }
}

pub(crate) struct MockDio0(SharedChip);

impl digital::ErrorType for MockDio0 {
    type Error = Infallible;
}

impl InputPin for MockDio0 {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.lock().unwrap().dio0)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.lock().unwrap().dio0)
    }
}

impl EdgeInterrupt for MockDio0 {
    fn enable_rising_edge(&mut self) -> Result<(), Infallible> {
        self.0.lock().unwrap().edge_enabled = true;
        Ok(())
    }
}

pub(crate) struct MockDelay(SharedChip);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.lock().unwrap().elapsed_ns += u64::from(ns);
    }
}

pub(crate) type MockRadio = Radio<MockSpi, MockReset, MockDio0, MockDelay>;
pub(crate) type MockError = Error<ErrorKind, Infallible>;

pub(crate) fn chip() -> SharedChip {
    Arc::new(Mutex::new(Chip::default()))
}

pub(crate) fn radio_with(chip: &SharedChip, config: Config) -> Result<MockRadio, MockError> {
    Radio::new(
        MockSpi(chip.clone()),
        MockReset(chip.clone()),
        MockDio0(chip.clone()),
        MockDelay(chip.clone()),
        config,
    )
}

pub(crate) fn radio() -> (MockRadio, SharedChip) {
    let chip = chip();
    let radio = radio_with(&chip, Config::default()).unwrap();
    (radio, chip)
}

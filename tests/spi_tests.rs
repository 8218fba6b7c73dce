//! Tests for the SPI transport
//!
//! Tests header encoding for standard, extended and FIFO accesses, chip
//! select framing, and error mapping.

use std::cell::RefCell;
use std::convert::Infallible;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::spi::{self, ErrorKind, ErrorType, SpiBus};

use cc112x_radio::drivers::cc112x::{reg, Register, Strobe, BURST_ACCESS, READ_ACCESS};
use cc112x_radio::error::Error;
use cc112x_radio::hal::spi::{RadioBus, SpiRadioBus};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Wire {
    CsLow,
    CsHigh,
    Write(Vec<u8>),
    Read(usize),
    Transfer(Vec<u8>),
}

#[derive(Default)]
struct Line {
    log: Vec<Wire>,
    miso: VecDeque<u8>,
    fail: bool,
}

#[derive(Debug)]
struct SpiFault;

impl spi::Error for SpiFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

struct MockSpi(Rc<RefCell<Line>>);

impl ErrorType for MockSpi {
    type Error = SpiFault;
}

impl SpiBus for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), SpiFault> {
        let mut line = self.0.borrow_mut();
        line.log.push(Wire::Read(words.len()));
        for word in words.iter_mut() {
            *word = line.miso.pop_front().unwrap_or(0);
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), SpiFault> {
        let mut line = self.0.borrow_mut();
        if line.fail {
            return Err(SpiFault);
        }
        line.log.push(Wire::Write(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), SpiFault> {
        self.write(write)?;
        self.read(read)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), SpiFault> {
        let mut line = self.0.borrow_mut();
        line.log.push(Wire::Transfer(words.to_vec()));
        for word in words.iter_mut() {
            *word = line.miso.pop_front().unwrap_or(0);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SpiFault> {
        Ok(())
    }
}

struct MockCs(Rc<RefCell<Line>>);

impl PinErrorType for MockCs {
    type Error = Infallible;
}

impl OutputPin for MockCs {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().log.push(Wire::CsLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().log.push(Wire::CsHigh);
        Ok(())
    }
}

fn transport() -> (SpiRadioBus<MockSpi, MockCs>, Rc<RefCell<Line>>) {
    let line = Rc::new(RefCell::new(Line::default()));
    let bus = SpiRadioBus::new(MockSpi(Rc::clone(&line)), MockCs(Rc::clone(&line)));
    (bus, line)
}

// ============================================================================
// Header Encoding
// ============================================================================

#[test]
fn standard_register_header() {
    assert_eq!(reg::IOCFG2.header(READ_ACCESS), ([0x81, 0], 1));
    assert_eq!(reg::DEV_ADDR.header(0), ([0x1F, 0], 1));
    assert!(!reg::DEV_ADDR.is_extended());
}

#[test]
fn extended_register_header() {
    assert!(reg::NUM_TXBYTES.is_extended());
    assert_eq!(reg::NUM_TXBYTES.header(READ_ACCESS), ([0xAF, 0xD6], 2));
    assert_eq!(reg::FREQ2.header(BURST_ACCESS), ([0x6F, 0x0C], 2));
}

#[test]
fn fifo_header() {
    assert_eq!(reg::FIFO.header(BURST_ACCESS), ([0x7F, 0], 1));
    assert_eq!(reg::FIFO.header(READ_ACCESS | BURST_ACCESS), ([0xFF, 0], 1));
}

#[test]
fn strobe_commands() {
    assert_eq!(Strobe::Sres.command(), 0x30);
    assert_eq!(Strobe::Srx.command(), 0x34);
    assert_eq!(Strobe::Stx.command(), 0x35);
    assert_eq!(Strobe::Sidle.command(), 0x36);
    assert_eq!(Strobe::Spwd.command(), 0x39);
    assert_eq!(Strobe::Sfrx.command(), 0x3A);
    assert_eq!(Strobe::Sftx.command(), 0x3B);
}

// ============================================================================
// Transactions
// ============================================================================

#[test]
fn read_extended_register() {
    let (mut bus, line) = transport();
    line.borrow_mut().miso.push_back(14);

    assert_eq!(bus.read_reg(reg::NUM_TXBYTES), Ok(14));
    assert_eq!(
        line.borrow().log,
        vec![
            Wire::CsLow,
            Wire::Write(vec![0xAF, 0xD6]),
            Wire::Read(1),
            Wire::CsHigh
        ]
    );
}

#[test]
fn write_standard_register() {
    let (mut bus, line) = transport();
    bus.write_reg(reg::DEV_ADDR, 0x42).unwrap();
    assert_eq!(
        line.borrow().log,
        vec![
            Wire::CsLow,
            Wire::Write(vec![0x1F]),
            Wire::Write(vec![0x42]),
            Wire::CsHigh
        ]
    );
}

#[test]
fn fifo_burst_write_and_read() {
    let (mut bus, line) = transport();
    bus.write_burst(reg::FIFO, &[3, 1, 2, 0]).unwrap();

    line.borrow_mut().miso.extend([7, 8, 9]);
    let mut out = [0u8; 3];
    bus.read_burst(reg::FIFO, &mut out).unwrap();
    assert_eq!(out, [7, 8, 9]);

    assert_eq!(
        line.borrow().log,
        vec![
            Wire::CsLow,
            Wire::Write(vec![0x7F]),
            Wire::Write(vec![3, 1, 2, 0]),
            Wire::CsHigh,
            Wire::CsLow,
            Wire::Write(vec![0xFF]),
            Wire::Read(3),
            Wire::CsHigh
        ]
    );
}

#[test]
fn strobe_returns_status_byte() {
    let (mut bus, line) = transport();
    line.borrow_mut().miso.push_back(0x1F);
    assert_eq!(bus.strobe(Strobe::Srx), Ok(0x1F));
    assert_eq!(
        line.borrow().log,
        vec![Wire::CsLow, Wire::Transfer(vec![0x34]), Wire::CsHigh]
    );
}

#[test]
fn bus_fault_maps_to_error_and_releases_cs() {
    let (mut bus, line) = transport();
    line.borrow_mut().fail = true;
    assert_eq!(bus.write_reg(Register::new(0x0028), 0x20), Err(Error::Bus));
    assert_eq!(line.borrow().log, vec![Wire::CsLow, Wire::CsHigh]);
}

//! Test doubles shared by the integration tests
//!
//! `MockBus` stands in for the CC112x behind the SPI transport: it records
//! every command, keeps a TX FIFO byte count, and serves register and RX FIFO
//! reads from values the test preloads. `MockIrq` shares its state so tests
//! can see whether the event line was masked while the FIFO was written.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use cc112x_radio::drivers::cc112x::{reg, Register, Strobe};
use cc112x_radio::error::{Error, Result};
use cc112x_radio::hal::gpio::IrqControl;
use cc112x_radio::hal::spi::RadioBus;
use cc112x_radio::radio::device::Cc112x;
use cc112x_radio::types::{Channel, NodeAddress, PowerState};

/// One command seen by the mock chip
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    ReadReg(Register),
    WriteReg(Register, u8),
    ReadBurst(Register, usize),
    WriteBurst(Register, Vec<u8>),
    Strobe(Strobe),
}

#[derive(Default)]
pub struct ChipState {
    pub calls: Vec<Call>,
    pub registers: HashMap<u16, u8>,
    pub tx_fifo: usize,
    pub tx_count_overrides: VecDeque<u8>,
    pub rx_fifo: Vec<u8>,
    pub fail_fifo_writes: bool,
    pub fail_fifo_reads: bool,
    pub irq_enabled: bool,
    /// Event-line mask seen at each FIFO write (true = enabled)
    pub irq_at_fifo_write: Vec<bool>,
}

/// Handle to the shared mock chip
#[derive(Clone, Default)]
pub struct Harness {
    pub chip: Rc<RefCell<ChipState>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bus(&self) -> MockBus {
        MockBus {
            chip: Rc::clone(&self.chip),
        }
    }

    pub fn irq(&self) -> MockIrq {
        MockIrq {
            chip: Rc::clone(&self.chip),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.chip.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.chip.borrow_mut().calls.clear();
    }

    pub fn set_reg(&self, register: Register, value: u8) {
        self.chip.borrow_mut().registers.insert(register.addr(), value);
    }

    pub fn reg(&self, register: Register) -> Option<u8> {
        self.chip.borrow().registers.get(&register.addr()).copied()
    }

    /// Next NUM_TXBYTES read returns `count` instead of the real fill level
    pub fn override_tx_count(&self, count: u8) {
        self.chip.borrow_mut().tx_count_overrides.push_back(count);
    }

    pub fn fail_fifo_writes(&self, fail: bool) {
        self.chip.borrow_mut().fail_fifo_writes = fail;
    }

    pub fn fail_fifo_reads(&self, fail: bool) {
        self.chip.borrow_mut().fail_fifo_reads = fail;
    }

    /// Override the RX byte count reported by the chip
    pub fn set_rx_count(&self, count: u8) {
        self.set_reg(reg::NUM_RXBYTES, count);
    }

    pub fn irq_enabled(&self) -> bool {
        self.chip.borrow().irq_enabled
    }

    pub fn irq_at_fifo_write(&self) -> Vec<bool> {
        self.chip.borrow().irq_at_fifo_write.clone()
    }

    /// Put a received frame in the RX FIFO with the given status registers
    pub fn load_rx(&self, wire: &[u8], marc_status: u8, rssi: u8, lqi: u8) {
        {
            let mut chip = self.chip.borrow_mut();
            chip.rx_fifo = wire.to_vec();
        }
        self.set_reg(reg::NUM_RXBYTES, wire.len() as u8);
        self.set_reg(reg::MARC_STATUS1, marc_status);
        self.set_reg(reg::RSSI1, rssi);
        self.set_reg(reg::LQI_VAL, lqi);
    }

    pub fn strobes(&self) -> Vec<Strobe> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Strobe(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn fifo_writes(&self) -> Vec<Vec<u8>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::WriteBurst(r, data) if r == reg::FIFO => Some(data),
                _ => None,
            })
            .collect()
    }

    pub fn fifo_reads(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::ReadBurst(r, _) if *r == reg::FIFO))
            .count()
    }
}

pub struct MockBus {
    chip: Rc<RefCell<ChipState>>,
}

impl RadioBus for MockBus {
    fn read_reg(&mut self, register: Register) -> Result<u8> {
        let mut chip = self.chip.borrow_mut();
        chip.calls.push(Call::ReadReg(register));
        if register == reg::NUM_TXBYTES {
            if let Some(count) = chip.tx_count_overrides.pop_front() {
                return Ok(count);
            }
            return Ok(chip.tx_fifo.min(255) as u8);
        }
        Ok(chip.registers.get(&register.addr()).copied().unwrap_or(0))
    }

    fn write_reg(&mut self, register: Register, value: u8) -> Result<()> {
        let mut chip = self.chip.borrow_mut();
        chip.calls.push(Call::WriteReg(register, value));
        chip.registers.insert(register.addr(), value);
        Ok(())
    }

    fn read_burst(&mut self, register: Register, buffer: &mut [u8]) -> Result<()> {
        let mut chip = self.chip.borrow_mut();
        chip.calls.push(Call::ReadBurst(register, buffer.len()));
        if register == reg::FIFO {
            let n = buffer.len().min(chip.rx_fifo.len());
            buffer[..n].copy_from_slice(&chip.rx_fifo[..n]);
            chip.rx_fifo.drain(..n);
            if chip.fail_fifo_reads {
                return Err(Error::Bus);
            }
        } else {
            for (i, byte) in buffer.iter_mut().enumerate() {
                *byte = chip
                    .registers
                    .get(&(register.addr() + i as u16))
                    .copied()
                    .unwrap_or(0);
            }
        }
        Ok(())
    }

    fn write_burst(&mut self, register: Register, data: &[u8]) -> Result<()> {
        let mut chip = self.chip.borrow_mut();
        chip.calls.push(Call::WriteBurst(register, data.to_vec()));
        if register == reg::FIFO {
            let enabled = chip.irq_enabled;
            chip.irq_at_fifo_write.push(enabled);
            if chip.fail_fifo_writes {
                return Err(Error::Bus);
            }
            chip.tx_fifo += data.len();
        } else {
            for (i, byte) in data.iter().enumerate() {
                chip.registers.insert(register.addr() + i as u16, *byte);
            }
        }
        Ok(())
    }

    fn strobe(&mut self, strobe: Strobe) -> Result<u8> {
        let mut chip = self.chip.borrow_mut();
        chip.calls.push(Call::Strobe(strobe));
        match strobe {
            Strobe::Sftx | Strobe::Sres => chip.tx_fifo = 0,
            Strobe::Sfrx => chip.rx_fifo.clear(),
            _ => {}
        }
        Ok(0x0F)
    }
}

pub struct MockIrq {
    chip: Rc<RefCell<ChipState>>,
}

impl IrqControl for MockIrq {
    fn enable(&mut self) {
        self.chip.borrow_mut().irq_enabled = true;
    }

    fn disable(&mut self) {
        self.chip.borrow_mut().irq_enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.chip.borrow().irq_enabled
    }
}

/// Delay that only counts what it was asked to wait
#[derive(Default)]
pub struct CountingDelay {
    pub us: Vec<u32>,
    pub ms: Vec<u32>,
}

impl embedded_hal::delay::DelayNs for CountingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_us(&mut self, us: u32) {
        self.us.push(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ms.push(ms);
    }
}

impl embedded_hal_async::delay::DelayNs for CountingDelay {
    async fn delay_ns(&mut self, _ns: u32) {}

    async fn delay_us(&mut self, us: u32) {
        self.us.push(us);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.ms.push(ms);
    }
}

/// Delay that runs a hook on every millisecond sleep, with the sleep index
pub struct HookDelay<F: FnMut(usize)> {
    pub sleeps: usize,
    pub hook: F,
}

impl<F: FnMut(usize)> HookDelay<F> {
    pub fn new(hook: F) -> Self {
        Self { sleeps: 0, hook }
    }
}

impl<F: FnMut(usize)> embedded_hal::delay::DelayNs for HookDelay<F> {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, _ms: u32) {
        self.sleeps += 1;
        (self.hook)(self.sleeps);
    }
}

pub type MockRadio = Cc112x<MockBus, MockIrq>;

/// Register table standing in for a board configuration
pub const TEST_CONFIG: &[(Register, u8)] = &[(reg::IOCFG2, 0x06), (Register::new(0x0028), 0x20)];

/// Device attached but not initialized
pub fn attach(harness: &Harness, address: u8) -> MockRadio {
    Cc112x::new(
        harness.bus(),
        harness.irq(),
        NodeAddress::new(address).expect("valid address"),
        Channel::default(),
    )
}

/// Device initialized into Receiving, with the call log cleared
pub fn ready(harness: &Harness, address: u8) -> MockRadio {
    let mut radio = attach(harness, address);
    radio
        .init(TEST_CONFIG, &mut CountingDelay::default())
        .expect("init");
    harness.clear_calls();
    radio
}

/// Device initialized and switched to Idle, with the call log cleared
pub fn idle(harness: &Harness, address: u8) -> MockRadio {
    let mut radio = ready(harness, address);
    radio.set_power(PowerState::Idle).expect("idle");
    harness.clear_calls();
    radio
}

//! SPI Transport
//!
//! Register and FIFO access to the CC112x over a four-wire SPI bus with a
//! manually driven chip select.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::drivers::cc112x::{Register, Strobe, BURST_ACCESS, READ_ACCESS};
use crate::error::{Error, Result};

/// Command surface the driver core needs from the transceiver
pub trait RadioBus {
    /// Read a single register
    fn read_reg(&mut self, reg: Register) -> Result<u8>;

    /// Write a single register
    fn write_reg(&mut self, reg: Register, value: u8) -> Result<()>;

    /// Read consecutive bytes starting at `reg` (or drain the FIFO)
    fn read_burst(&mut self, reg: Register, buffer: &mut [u8]) -> Result<()>;

    /// Write consecutive bytes starting at `reg` (or fill the FIFO)
    fn write_burst(&mut self, reg: Register, data: &[u8]) -> Result<()>;

    /// Issue a command strobe, returns the chip status byte
    fn strobe(&mut self, strobe: Strobe) -> Result<u8>;
}

/// CC112x transport over `embedded-hal` SPI
pub struct SpiRadioBus<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiRadioBus<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Create a new transport (chip select must idle high)
    #[must_use]
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Give back the bus and chip select
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// Run one chip-select framed transaction
    fn transaction<R>(
        &mut self,
        f: impl FnOnce(&mut SPI) -> core::result::Result<R, SPI::Error>,
    ) -> Result<R> {
        self.cs.set_low().map_err(|_| Error::Bus)?;
        let result = f(&mut self.spi).and_then(|r| self.spi.flush().map(|()| r));
        self.cs.set_high().map_err(|_| Error::Bus)?;
        result.map_err(|_| Error::Bus)
    }
}

impl<SPI, CS> RadioBus for SpiRadioBus<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    fn read_reg(&mut self, reg: Register) -> Result<u8> {
        let (header, len) = reg.header(READ_ACCESS);
        self.transaction(|spi| {
            let mut value = [0u8];
            spi.write(&header[..len])?;
            spi.read(&mut value)?;
            Ok(value[0])
        })
    }

    fn write_reg(&mut self, reg: Register, value: u8) -> Result<()> {
        let (header, len) = reg.header(0);
        self.transaction(|spi| {
            spi.write(&header[..len])?;
            spi.write(&[value])
        })
    }

    fn read_burst(&mut self, reg: Register, buffer: &mut [u8]) -> Result<()> {
        let (header, len) = reg.header(READ_ACCESS | BURST_ACCESS);
        self.transaction(|spi| {
            spi.write(&header[..len])?;
            spi.read(buffer)
        })
    }

    fn write_burst(&mut self, reg: Register, data: &[u8]) -> Result<()> {
        let (header, len) = reg.header(BURST_ACCESS);
        self.transaction(|spi| {
            spi.write(&header[..len])?;
            spi.write(data)
        })
    }

    fn strobe(&mut self, strobe: Strobe) -> Result<u8> {
        self.transaction(|spi| {
            let mut status = [strobe.command()];
            spi.transfer_in_place(&mut status)?;
            Ok(status[0])
        })
    }
}

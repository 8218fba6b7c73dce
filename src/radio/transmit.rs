//! Transmit Path
//!
//! Moves a framed packet into the TX FIFO, checks the FIFO byte count, and
//! starts the transmitter. The caller holds the event line masked for the
//! whole sequence.

use crate::drivers::cc112x::{reg, Strobe};
use crate::error::{Error, Result};
use crate::hal::spi::RadioBus;
use crate::radio::frame::Frame;

/// Load the FIFO and start transmitting
///
/// Returns the number of bytes handed to the hardware (`length + 1`).
pub fn start<B: RadioBus>(bus: &mut B, frame: &Frame) -> Result<usize> {
    let written = load_fifo(bus, frame)?;
    debug!("strobing TX");
    bus.strobe(Strobe::Stx)?;
    Ok(written)
}

/// Burst-write `frame` into the TX FIFO and verify the byte count
///
/// A count mismatch flushes the FIFO and writes once more. A second mismatch
/// fails with [`Error::FifoWrite`] and leaves the FIFO as the chip reported it.
pub fn load_fifo<B: RadioBus>(bus: &mut B, frame: &Frame) -> Result<usize> {
    let bytes = frame.as_bytes();

    if write_checked(bus, bytes)? {
        info!("TX FIFO loaded with {} bytes", bytes.len());
        return Ok(bytes.len());
    }

    warn!("TX FIFO byte count wrong, flushing and rewriting");
    bus.strobe(Strobe::Sftx)?;

    if write_checked(bus, bytes)? {
        info!("TX FIFO loaded with {} bytes on retry", bytes.len());
        return Ok(bytes.len());
    }

    error!("TX FIFO rejected {} bytes twice", bytes.len());
    Err(Error::FifoWrite)
}

/// One FIFO write followed by the count read-back
fn write_checked<B: RadioBus>(bus: &mut B, bytes: &[u8]) -> Result<bool> {
    bus.write_burst(reg::FIFO, bytes)?;
    let queued = bus.read_reg(reg::NUM_TXBYTES)?;
    Ok(usize::from(queued) == bytes.len())
}

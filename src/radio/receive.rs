//! Receive Path
//!
//! Runs from the interrupt handler once the event line drops at the end of a
//! frame. Checks the radio status, captures RSSI and LQI, and pulls the frame
//! out of the RX FIFO into the receive slot.

use crate::drivers::cc112x::{reg, MARC_STATUS1_RX_OK};
use crate::error::{Error, Result};
use crate::hal::spi::RadioBus;
use crate::radio::buffer::PacketBuffer;
use crate::radio::state::RadioState;
use crate::types::{LinkQuality, RxMetadata, Statistics};

/// Result of a completed reception
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RxOutcome {
    /// Frame stored in the receive slot
    Delivered {
        /// Bytes read from the FIFO
        len: usize,
        /// An unread frame was replaced
        overwritten: bool,
    },
    /// CRC failed, frame dropped
    Rejected,
}

#[cfg(feature = "embedded")]
impl defmt::Format for RxOutcome {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Delivered { len, overwritten } => {
                defmt::write!(f, "Delivered({}, overwritten={})", len, overwritten);
            }
            Self::Rejected => defmt::write!(f, "Rejected"),
        }
    }
}

/// Read a completed frame into `buffer`
///
/// Valid only in [`RadioState::ReceivingBusy`]; any other state fails with
/// [`Error::InvalidState`] before the bus is touched. A FIFO count that is
/// zero or shorter than the frame's length byte fails with
/// [`Error::RxFault`] and leaves the receive slot empty.
pub fn read_frame<B: RadioBus>(
    bus: &mut B,
    state: RadioState,
    buffer: &mut PacketBuffer,
    stats: &mut Statistics,
) -> Result<RxOutcome> {
    if state != RadioState::ReceivingBusy {
        error!("frame read attempted in state {}", state);
        return Err(Error::InvalidState);
    }

    let len = usize::from(bus.read_reg(reg::NUM_RXBYTES)?);
    let status = bus.read_reg(reg::MARC_STATUS1)?;
    if status != MARC_STATUS1_RX_OK {
        info!("RX status 0x{:02X}: FIFO overflow, CRC or address fault", status);
        stats.packets_in_fifo_fault += 1;
        return Err(Error::RxFault);
    }

    let rssi = bus.read_reg(reg::RSSI1)? as i8;
    let lqi = LinkQuality::from_raw(bus.read_reg(reg::LQI_VAL)?);
    if !lqi.crc_ok() {
        info!("CRC error, dropping frame");
        stats.packets_in_crc_fail += 1;
        return Ok(RxOutcome::Rejected);
    }

    if len == 0 {
        info!("RX FIFO empty at end of frame");
        stats.packets_in_fifo_fault += 1;
        return Err(Error::RxFault);
    }

    let (overwritten, target) = buffer.rx_target(len);
    if overwritten {
        stats.rx_overwritten += 1;
    }
    bus.read_burst(reg::FIFO, target)?;
    if !buffer.commit_rx(len, RxMetadata { rssi, lqi }) {
        info!("RX FIFO holds {} bytes, frame needs {}", len, buffer.rx().wire_len());
        stats.packets_in_fifo_fault += 1;
        return Err(Error::RxFault);
    }
    stats.packets_in += 1;

    let frame = buffer.rx();
    info!(
        "received frame from={} to={} payload len={}",
        frame.phy_src(),
        frame.address(),
        frame.data().len()
    );

    Ok(RxOutcome::Delivered { len, overwritten })
}

//! Packet Buffers
//!
//! One transmit slot and one receive slot, overwritten in place. There is no
//! frame queue: a reception that lands before the stack read the previous one
//! replaces it, and the overwrite is counted.

use crate::error::{Error, Result};
use crate::radio::frame::{Frame, FRAME_BUFFER_LEN};
use crate::types::{LinkQuality, RxMetadata};

/// Transmit and receive slots of one device
#[derive(Clone, Debug, Default)]
pub struct PacketBuffer {
    tx: Frame,
    rx: Frame,
    rx_meta: RxMetadata,
    rx_unread: bool,
}

impl PacketBuffer {
    /// Create empty slots
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tx: Frame::empty(),
            rx: Frame::empty(),
            rx_meta: RxMetadata {
                rssi: 0,
                lqi: LinkQuality::from_raw(0),
            },
            rx_unread: false,
        }
    }

    /// Copy a frame into the transmit slot
    pub fn load_tx(&mut self, frame: &Frame) {
        self.tx.clone_from(frame);
    }

    /// Frame in the transmit slot
    #[must_use]
    pub const fn tx(&self) -> &Frame {
        &self.tx
    }

    /// Frame in the receive slot
    #[must_use]
    pub const fn rx(&self) -> &Frame {
        &self.rx
    }

    /// Metadata of the frame in the receive slot
    #[must_use]
    pub const fn rx_meta(&self) -> RxMetadata {
        self.rx_meta
    }

    /// Whether the receive slot holds a frame the stack has not read yet
    #[must_use]
    pub const fn rx_unread(&self) -> bool {
        self.rx_unread
    }

    /// Receive slot as a FIFO target of `len` bytes
    ///
    /// The slot stays unreadable until [`Self::commit_rx`] accepts what was
    /// read into it. Returns whether an unread frame is being replaced.
    pub(crate) fn rx_target(&mut self, len: usize) -> (bool, &mut [u8]) {
        let overwritten = self.rx_unread;
        self.rx_unread = false;
        let len = len.min(FRAME_BUFFER_LEN);
        (overwritten, &mut self.rx.raw_mut()[..len])
    }

    /// Publish the receive slot after `len` bytes were read into it
    ///
    /// Fails when the read stopped short of the length byte's frame.
    pub(crate) fn commit_rx(&mut self, len: usize, meta: RxMetadata) -> bool {
        if len == 0 || self.rx.wire_len() > len {
            return false;
        }
        self.rx_meta = meta;
        self.rx_unread = true;
        true
    }

    /// Copy the received frame (length byte included) into `out`
    ///
    /// Returns 0 when nothing is buffered.
    pub fn read_rx(&mut self, out: &mut [u8]) -> Result<usize> {
        if !self.rx_unread {
            return Ok(0);
        }
        let frame = self.rx.as_bytes();
        if frame.len() > out.len() {
            return Err(Error::NoSpace);
        }
        out[..frame.len()].copy_from_slice(frame);
        self.rx_unread = false;
        Ok(frame.len())
    }
}

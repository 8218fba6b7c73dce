//! Layer 0 Frame
//!
//! ```text
//! +--------+---------+--------+-------+-------------+
//! | Length | Address | PhySrc | Flags |    Data     |
//! +--------+---------+--------+-------+-------------+
//!   1 byte   1 byte    1 byte   1 byte  <= 251 bytes
//! ```
//!
//! `Length` counts everything after itself. Flags bits 3:1 carry the protocol
//! and bit 0 the identification used for duplicate detection; both belong to
//! the layer above.

use crate::config::{HEADER_LENGTH, PACKET_LENGTH};
use crate::error::{Error, Result};

/// Bytes a frame buffer reserves: any value of the length byte plus itself
pub const FRAME_BUFFER_LEN: usize = u8::MAX as usize + 1;

/// Largest payload representable by the length byte
///
/// Frames built this large are still rejected by `send`; only
/// [`crate::config::MAX_DATA_LENGTH`] bytes fit through the hardware.
pub const MAX_FRAME_DATA: usize = u8::MAX as usize - HEADER_LENGTH;

const LENGTH: usize = 0;
const ADDRESS: usize = 1;
const PHY_SRC: usize = 2;
const FLAGS: usize = 3;
const DATA: usize = 4;

/// A frame stored in its exact wire layout
#[derive(Clone)]
pub struct Frame {
    raw: [u8; FRAME_BUFFER_LEN],
}

impl Frame {
    /// Empty frame (header only, zero addresses)
    #[must_use]
    pub const fn empty() -> Self {
        let mut raw = [0u8; FRAME_BUFFER_LEN];
        raw[LENGTH] = HEADER_LENGTH as u8;
        Self { raw }
    }

    /// Build a frame for `address` carrying `data`
    ///
    /// The source address is filled in by the driver when the frame is sent.
    pub fn new(address: u8, flags: u8, data: &[u8]) -> Result<Self> {
        if data.len() > MAX_FRAME_DATA {
            return Err(Error::Oversize);
        }
        let mut frame = Self::empty();
        frame.raw[LENGTH] = (HEADER_LENGTH + data.len()) as u8;
        frame.raw[ADDRESS] = address;
        frame.raw[FLAGS] = flags;
        frame.raw[DATA..DATA + data.len()].copy_from_slice(data);
        Ok(frame)
    }

    /// Parse a frame from wire bytes
    ///
    /// `bytes` must hold at least `length + 1` bytes; anything past the
    /// frame is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let length = usize::from(*bytes.first().ok_or(Error::InvalidArgument)?);
        if length < HEADER_LENGTH || bytes.len() < length + 1 {
            return Err(Error::InvalidArgument);
        }
        let mut frame = Self::empty();
        frame.raw[..=length].copy_from_slice(&bytes[..=length]);
        Ok(frame)
    }

    /// Value of the length byte
    #[must_use]
    pub const fn length(&self) -> u8 {
        self.raw[LENGTH]
    }

    /// Bytes moved through the FIFO for this frame (`length + 1`)
    #[must_use]
    pub const fn wire_len(&self) -> usize {
        self.raw[LENGTH] as usize + 1
    }

    /// Whether the frame fits through the hardware FIFO
    #[must_use]
    pub const fn fits_hardware(&self) -> bool {
        self.wire_len() <= PACKET_LENGTH
    }

    /// Destination address
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.raw[ADDRESS]
    }

    /// Source address written by the sender
    #[must_use]
    pub const fn phy_src(&self) -> u8 {
        self.raw[PHY_SRC]
    }

    /// Protocol flags
    #[must_use]
    pub const fn flags(&self) -> u8 {
        self.raw[FLAGS]
    }

    /// Payload bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        let end = self.wire_len().max(DATA);
        &self.raw[DATA..end]
    }

    /// Set the destination address
    pub fn set_address(&mut self, address: u8) {
        self.raw[ADDRESS] = address;
    }

    /// Set the source address
    pub fn set_phy_src(&mut self, phy_src: u8) {
        self.raw[PHY_SRC] = phy_src;
    }

    /// Set the protocol flags
    pub fn set_flags(&mut self, flags: u8) {
        self.raw[FLAGS] = flags;
    }

    /// Wire bytes of the frame, length byte first
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw[..self.wire_len()]
    }

    /// Whole backing buffer, for filling straight from the RX FIFO
    pub(crate) fn raw_mut(&mut self) -> &mut [u8; FRAME_BUFFER_LEN] {
        &mut self.raw
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Frame {}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Frame")
            .field("length", &self.length())
            .field("address", &self.address())
            .field("phy_src", &self.phy_src())
            .field("flags", &self.flags())
            .field("data", &self.data())
            .finish()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Frame(len={}, {}->{}, flags=0x{:02X})",
            self.length(),
            self.phy_src(),
            self.address(),
            self.flags()
        );
    }
}

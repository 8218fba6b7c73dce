//! Shared types used across the radio driver
//!
//! This module defines domain-specific types that enforce invariants
//! at construction time and provide type safety throughout the codebase.

use core::fmt;

use crate::config::{
    BASE_FREQ_HZ, CHANNEL_SPACING_HZ, DEFAULT_CHANNEL, DEFAULT_NODE_ADDRESS, MAX_CHANNEL,
    MIN_CHANNEL, MIN_NODE_ADDRESS,
};

/// Unicast node address
///
/// Address 0 is reserved for broadcast and is never a valid node address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeAddress(u8);

impl NodeAddress {
    /// Create a node address, returns None for the broadcast address
    #[must_use]
    pub const fn new(addr: u8) -> Option<Self> {
        if addr >= MIN_NODE_ADDRESS {
            Some(Self(addr))
        } else {
            None
        }
    }

    /// Get the raw address byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Derive the 8-byte interface identifier used for header compression
    ///
    /// Short link-layer addresses expand to `0000:00ff:fe00:00XX`.
    #[must_use]
    pub const fn interface_id(self) -> [u8; 8] {
        [0, 0, 0, 0xFF, 0xFE, 0, 0, self.0]
    }
}

impl Default for NodeAddress {
    fn default() -> Self {
        Self(DEFAULT_NODE_ADDRESS)
    }
}

impl fmt::Debug for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeAddress({})", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for NodeAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "node {}", self.0);
    }
}

/// Radio channel number within the regional channel plan
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Channel(u8);

impl Channel {
    /// Create a channel, returns None if out of range
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        if matches!(number, MIN_CHANNEL..=MAX_CHANNEL) {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Get the channel number
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Carrier frequency of this channel in Hz
    #[must_use]
    pub const fn carrier_hz(self) -> u32 {
        BASE_FREQ_HZ + self.0 as u32 * CHANNEL_SPACING_HZ
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self(DEFAULT_CHANNEL)
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel({} @ {} Hz)", self.0, self.carrier_hz())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Channel {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ch{}", self.0);
    }
}

/// Link quality reading with the CRC flag split off
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct LinkQuality {
    /// 7-bit link quality indicator
    quality: u8,
    /// Hardware CRC check passed
    crc_ok: bool,
}

impl LinkQuality {
    /// Bit of the raw LQI register carrying the CRC result
    pub const CRC_OK: u8 = 0x80;

    /// Split a raw `LQI_VAL` register byte
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self {
            quality: raw & !Self::CRC_OK,
            crc_ok: raw & Self::CRC_OK != 0,
        }
    }

    /// Quality magnitude (0-127)
    #[must_use]
    pub const fn quality(self) -> u8 {
        self.quality
    }

    /// Whether the frame passed the hardware CRC
    #[must_use]
    pub const fn crc_ok(self) -> bool {
        self.crc_ok
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LinkQuality {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "LQI {} (crc {})", self.quality, self.crc_ok);
    }
}

/// Metadata captured alongside a received frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RxMetadata {
    /// Signal strength in hardware units
    pub rssi: i8,
    /// Link quality with CRC flag removed
    pub lqi: LinkQuality,
}

#[cfg(feature = "embedded")]
impl defmt::Format for RxMetadata {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "RSSI {} {}", self.rssi, self.lqi);
    }
}

/// Requested radio power mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PowerState {
    /// Chip powered down, event line masked
    Off,
    /// Chip idle, event line masked
    Idle,
    /// Receiver armed
    #[default]
    Rx,
}

impl PowerState {
    /// Decode an option byte
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Off),
            1 => Some(Self::Idle),
            2 => Some(Self::Rx),
            _ => None,
        }
    }

    /// Encode as an option byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Idle => 1,
            Self::Rx => 2,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PowerState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Off => defmt::write!(f, "OFF"),
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::Rx => defmt::write!(f, "RX"),
        }
    }
}

/// Per-device traffic counters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Statistics {
    /// Frames received and handed upward
    pub packets_in: u32,
    /// Frames dropped because the CRC check failed
    pub packets_in_crc_fail: u32,
    /// Receptions aborted on a non-clean status register
    pub packets_in_fifo_fault: u32,
    /// Send requests that found a reception in progress
    pub packets_in_while_tx: u32,
    /// Received frames overwritten before the stack read them
    pub rx_overwritten: u32,
    /// Frames committed to the transmitter
    pub raw_packets_out: u32,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Statistics {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "in={} crc={} fifo={} rx/tx={} ovw={} out={}",
            self.packets_in,
            self.packets_in_crc_fail,
            self.packets_in_fifo_fault,
            self.packets_in_while_tx,
            self.rx_overwritten,
            self.raw_packets_out
        );
    }
}

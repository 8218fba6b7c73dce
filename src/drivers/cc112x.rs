//! CC112x Register Interface
//!
//! Register map, command strobes and status values of the TI CC1120/CC1125
//! family. Registers above 0x2F live in the extended space and are reached
//! through the 0x2F address prefix.

use crate::config::{LO_DIVIDER, XOSC_FREQ_HZ};
use crate::types::Channel;

/// Header bit selecting a read access
pub const READ_ACCESS: u8 = 0x80;

/// Header bit selecting a burst access
pub const BURST_ACCESS: u8 = 0x40;

/// Address prefix of the extended register space
pub const EXTENDED_PREFIX: u8 = 0x2F;

/// `MARC_STATUS1` value for "RX finished successfully"
pub const MARC_STATUS1_RX_OK: u8 = 0x80;

/// Register address, extended registers carry the prefix in the high byte
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Register(u16);

impl Register {
    /// Create a register address
    #[must_use]
    pub const fn new(addr: u16) -> Self {
        Self(addr)
    }

    /// Get the full address
    #[must_use]
    pub const fn addr(self) -> u16 {
        self.0
    }

    /// Check if the register lives in the extended space
    #[must_use]
    pub const fn is_extended(self) -> bool {
        (self.0 >> 8) as u8 == EXTENDED_PREFIX
    }

    /// SPI header bytes for an access with the given R/W and burst bits
    ///
    /// Returns the header buffer and how many of its bytes are used.
    #[must_use]
    pub const fn header(self, access: u8) -> ([u8; 2], usize) {
        if self.is_extended() {
            ([EXTENDED_PREFIX | access, self.0 as u8], 2)
        } else {
            ([(self.0 as u8 & 0x3F) | access, 0], 1)
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Register {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:04X}", self.0);
    }
}

/// Register addresses used by the driver
pub mod reg {
    use super::Register;

    /// GPIO2 pin configuration
    pub const IOCFG2: Register = Register::new(0x0001);
    /// Device address for hardware address filtering
    pub const DEV_ADDR: Register = Register::new(0x001F);
    /// Standard FIFO access (burst TX on write, burst RX on read)
    pub const FIFO: Register = Register::new(0x003F);
    /// Frequency word, high byte
    pub const FREQ2: Register = Register::new(0x2F0C);
    /// Frequency word, middle byte
    pub const FREQ1: Register = Register::new(0x2F0D);
    /// Frequency word, low byte
    pub const FREQ0: Register = Register::new(0x2F0E);
    /// Received signal strength, integer part
    pub const RSSI1: Register = Register::new(0x2F71);
    /// Link quality and CRC flag of the last frame
    pub const LQI_VAL: Register = Register::new(0x2F74);
    /// Main radio control status
    pub const MARC_STATUS1: Register = Register::new(0x2F94);
    /// Bytes currently held in the TX FIFO
    pub const NUM_TXBYTES: Register = Register::new(0x2FD6);
    /// Bytes currently held in the RX FIFO
    pub const NUM_RXBYTES: Register = Register::new(0x2FD7);
}

/// One-shot command strobes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Strobe {
    /// Reset chip
    Sres = 0x30,
    /// Enable receive
    Srx = 0x34,
    /// Enable transmit
    Stx = 0x35,
    /// Exit RX/TX, go idle
    Sidle = 0x36,
    /// Enter power down when CS goes high
    Spwd = 0x39,
    /// Flush the RX FIFO
    Sfrx = 0x3A,
    /// Flush the TX FIFO
    Sftx = 0x3B,
}

impl Strobe {
    /// Command byte on the wire
    #[must_use]
    pub const fn command(self) -> u8 {
        self as u8
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Strobe {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Sres => defmt::write!(f, "SRES"),
            Self::Srx => defmt::write!(f, "SRX"),
            Self::Stx => defmt::write!(f, "STX"),
            Self::Sidle => defmt::write!(f, "SIDLE"),
            Self::Spwd => defmt::write!(f, "SPWD"),
            Self::Sfrx => defmt::write!(f, "SFRX"),
            Self::Sftx => defmt::write!(f, "SFTX"),
        }
    }
}

/// 24-bit frequency word for a channel, as `[FREQ2, FREQ1, FREQ0]`
///
/// `FREQ = f_carrier * 2^16 * LO_DIVIDER / f_xosc`
#[must_use]
pub const fn freq_word(channel: Channel) -> [u8; 3] {
    let word = (channel.carrier_hz() as u64 * (1 << 16) * LO_DIVIDER as u64) / XOSC_FREQ_HZ as u64;
    [(word >> 16) as u8, (word >> 8) as u8, word as u8]
}

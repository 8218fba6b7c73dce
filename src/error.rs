//! Driver error type

use core::fmt;

/// Result alias used throughout the driver
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong between the caller and the transceiver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// TX FIFO byte count still wrong after flush and rewrite
    FifoWrite,
    /// Radio is not in a state that accepts a frame right now
    Busy,
    /// Radio did not become free within the poll bound
    Timeout,
    /// Radio sits in the fault state and needs `recover()` or `init()`
    Fault,
    /// Operation invoked from a state it is never valid in
    InvalidState,
    /// Status register reported overflow or an addressing fault
    RxFault,
    /// Frame exceeds the hardware packet length
    Oversize,
    /// Argument outside its valid range
    InvalidArgument,
    /// Caller buffer cannot hold the buffered frame
    NoSpace,
    /// Caller buffer cannot hold the option value
    Overflow,
    /// Option is not handled by this device
    NotSupported,
    /// Transport (SPI or chip select) failure
    Bus,
}

impl Error {
    /// Negative errno equivalent, for stacks that speak C return codes
    #[must_use]
    pub const fn errno(self) -> i32 {
        match self {
            Self::FifoWrite | Self::Fault | Self::Bus => -5, // EIO
            Self::Busy | Self::Timeout => -11,               // EAGAIN
            Self::InvalidState | Self::RxFault => -71,       // EPROTO
            Self::Oversize | Self::NoSpace => -28,           // ENOSPC
            Self::InvalidArgument => -22,                    // EINVAL
            Self::Overflow => -75,                           // EOVERFLOW
            Self::NotSupported => -95,                       // ENOTSUP
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::FifoWrite => "TX FIFO write could not be verified",
            Self::Busy => "radio busy",
            Self::Timeout => "timed out waiting for radio",
            Self::Fault => "radio in fault state",
            Self::InvalidState => "invalid radio state",
            Self::RxFault => "RX FIFO overflow or address fault",
            Self::Oversize => "frame too large",
            Self::InvalidArgument => "invalid argument",
            Self::NoSpace => "buffer too small for frame",
            Self::Overflow => "buffer too small for value",
            Self::NotSupported => "option not supported",
            Self::Bus => "bus error",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::FifoWrite => defmt::write!(f, "FifoWrite"),
            Self::Busy => defmt::write!(f, "Busy"),
            Self::Timeout => defmt::write!(f, "Timeout"),
            Self::Fault => defmt::write!(f, "Fault"),
            Self::InvalidState => defmt::write!(f, "InvalidState"),
            Self::RxFault => defmt::write!(f, "RxFault"),
            Self::Oversize => defmt::write!(f, "Oversize"),
            Self::InvalidArgument => defmt::write!(f, "InvalidArgument"),
            Self::NoSpace => defmt::write!(f, "NoSpace"),
            Self::Overflow => defmt::write!(f, "Overflow"),
            Self::NotSupported => defmt::write!(f, "NotSupported"),
            Self::Bus => defmt::write!(f, "Bus"),
        }
    }
}

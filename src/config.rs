//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the CC112x radio node.
//! Frame limits, channel plan, timing, and pin mappings are centralized here.

/// Maximum number of bytes moved through the FIFO for one frame
/// (length byte included)
pub const PACKET_LENGTH: usize = 255;

/// Header bytes counted by the length field (address, source, flags)
pub const HEADER_LENGTH: usize = 3;

/// Largest payload that fits in a frame the hardware accepts
pub const MAX_DATA_LENGTH: usize = PACKET_LENGTH - HEADER_LENGTH - 1;

/// Broadcast node address
pub const BROADCAST_ADDRESS: u8 = 0x00;

/// Lowest valid unicast node address
pub const MIN_NODE_ADDRESS: u8 = 0x01;

/// Default node address used before the stack assigns one
pub const DEFAULT_NODE_ADDRESS: u8 = 0x01;

/// Lowest channel number accepted by the driver
pub const MIN_CHANNEL: u8 = 0;

/// Highest channel number allowed in the deployment region
pub const MAX_CHANNEL: u8 = 30;

/// Channel selected at start-up
pub const DEFAULT_CHANNEL: u8 = 25;

/// Number of 5 ms sleeps `send` waits for the radio to become free
pub const SEND_POLL_ATTEMPTS: u32 = 100;

/// Sleep between two `send` state checks, in milliseconds
pub const SEND_POLL_INTERVAL_MS: u32 = 5;

/// Time the chip needs after a reset strobe, in microseconds
pub const RESET_WAIT_US: u32 = 610;

/// Depth of the interrupt-to-task event queue
pub const EVENT_QUEUE_DEPTH: usize = 4;

/// Crystal oscillator frequency (32 MHz)
pub const XOSC_FREQ_HZ: u32 = 32_000_000;

/// LO divider for the 820-960 MHz band
pub const LO_DIVIDER: u32 = 4;

/// Carrier frequency of channel 0 (863.000 MHz)
pub const BASE_FREQ_HZ: u32 = 863_000_000;

/// Spacing between adjacent channels (125 kHz)
pub const CHANNEL_SPACING_HZ: u32 = 125_000;

/// SPI clock for register and FIFO access
pub const SPI_FREQ_HZ: u32 = 4_000_000;

/// Pin assignments for the CC112x module on an STM32G474 Nucleo
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Status LED (directly on MCU)
    pub const LED_STATUS: &str = "PA5";

    /// SPI2 SCK
    pub const CC_SCK: &str = "PB13";

    /// SPI2 MISO (CC112x SO, doubles as GPIO1)
    pub const CC_MISO: &str = "PB14";

    /// SPI2 MOSI
    pub const CC_MOSI: &str = "PB15";

    /// SPI chip select (active low)
    pub const CC_CS: &str = "PB12";

    /// CC112x GPIO2, frame sync event line (EXTI6)
    pub const CC_GPIO2: &str = "PC6";

    /// CC112x hardware reset (active low)
    pub const CC_RESET: &str = "PC8";
}

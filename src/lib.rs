//! CC112x Radio Driver Library
//!
//! Driver for the TI CC1120/CC1125 sub-GHz transceiver family running a
//! simple half-duplex packet protocol, plus a network-device adapter that a
//! link-layer stack can drive.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    NETWORK STACK                             │
//! │        send  │  recv  │  get/set  │  isr  │  init           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    DEVICE ADAPTER (netdev)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RADIO CONTROL                             │
//! │  Frame  │  State Machine  │  TX Path  │  RX Path  │  Buffers │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  SPI transport  │  Event line  │  CC112x registers/strobes   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Owned device context**: one `Cc112x` per chip, shared through a
//!   critical-section handle instead of a global
//! - **Type-driven design**: channels and addresses are validated at construction
//! - **No unsafe**: hardware access goes through `embedded-hal` traits
//! - **Level-sampled interrupts**: the handler acts on where the event line is,
//!   not on which edge fired
//! - **Explicit error handling**: all fallible operations return `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// SPI transport and event-line control contracts.
pub mod hal;

/// Peripheral Drivers
///
/// CC112x register map, strobes and frequency programming.
pub mod drivers;

/// Radio Control Logic
///
/// Framing, state machine, transmit and receive paths.
pub mod radio;

/// Network device adapter
pub mod netdev;

/// Driver error type
pub mod error;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::drivers::cc112x::{reg, Register, Strobe};
    pub use crate::error::{Error, Result};
    pub use crate::hal::gpio::{IrqControl, IrqGuard, Level, SoftGate};
    pub use crate::hal::spi::{RadioBus, SpiRadioBus};
    pub use crate::netdev::{NetDevice, NetOpt, Netdev};
    pub use crate::radio::device::Cc112x;
    pub use crate::radio::frame::{Frame, FRAME_BUFFER_LEN};
    pub use crate::radio::shared::SharedRadio;
    pub use crate::radio::state::{IrqAction, RadioEvent, RadioState};

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    #[cfg(feature = "embedded")]
    pub use embassy_time::{Duration, Instant, Timer};
}

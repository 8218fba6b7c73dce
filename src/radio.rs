//! Radio Control Logic
//!
//! Frame layout, packet slots, the event-line state machine, and the transmit
//! and receive paths of one CC112x transceiver.

pub mod buffer;
pub mod device;
pub mod frame;
pub mod receive;
pub mod shared;
pub mod state;
pub mod transmit;

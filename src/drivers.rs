//! Peripheral Drivers
//!
//! Chip-level definitions for external ICs.

pub mod cc112x;
